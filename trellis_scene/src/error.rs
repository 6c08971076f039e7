// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use trellis_layout::{LayoutError, NodeId};

use crate::scene::LayerId;

/// Failures reported by [`Scene`](crate::Scene).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SceneError {
    /// The layer handle was not issued by this scene.
    #[error("unknown layer {0:?}")]
    UnknownLayer(LayerId),
    /// The parent node lives in another layer.
    #[error("{parent:?} is not part of layer {layer:?}")]
    ForeignParent {
        /// Requested parent.
        parent: NodeId,
        /// Layer the element was added to.
        layer: LayerId,
    },
    /// The underlying layout rejected the operation.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
