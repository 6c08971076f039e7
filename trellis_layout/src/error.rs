// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for layout construction and lookups.

use alloc::string::String;

use crate::types::NodeId;

/// Failures reported by position constructors and the [`Layout`][crate::Layout] arena.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LayoutError {
    /// A sibling with the same name already exists under the parent.
    #[error("`{name}` already exists under {parent:?}")]
    DuplicateChild {
        /// Container or multi-layer that rejected the child.
        parent: NodeId,
        /// Offending name.
        name: String,
    },
    /// The position spec combines options that cannot be resolved.
    #[error("malformed position: {0}")]
    MalformedPosition(&'static str),
    /// A length or margin literal could not be parsed.
    #[error("invalid length literal `{0}`")]
    InvalidLength(String),
    /// The handle is stale or was never issued by this arena.
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    /// Children were added to a leaf.
    #[error("node {0:?} does not accept children")]
    NotAParent(NodeId),
    /// Container-only state (style, scrolling) was requested for another role.
    #[error("node {0:?} is not a container")]
    NotAContainer(NodeId),
    /// A cell placement was requested for a node without a grid-cell position.
    #[error("node {0:?} is not positioned on a grid cell")]
    NotAGridCell(NodeId),
}
