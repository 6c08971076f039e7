// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Index: integer rectangles and a bounding quadtree.
//!
//! This crate is the spatial floor shared by the rest of Trellis.
//!
//! - [`Rect`]: integer origin + size rectangle with half-open containment, union,
//!   intersection, and "enclose these points".
//! - [`Quadtree`]: indexes rectangles under opaque ids and answers point and
//!   rectangle queries. Nodes split lazily once they exceed
//!   [`QuadtreeConfig::max_objects`]; an unbounded tree grows its root to fit
//!   whatever is inserted.
//! - [`MissingPolicy`]: per-call choice between ignoring and reporting a lookup
//!   miss, used by the remove-style APIs of the other Trellis crates.
//!
//! The id space of a quadtree is local and opaque. Callers map ids back to
//! their own objects.
//!
//! # Example
//!
//! ```rust
//! use trellis_index::{Quadtree, QuadtreeConfig, Rect};
//!
//! let mut tree = Quadtree::new(Rect::new(0, 0, 640, 480), QuadtreeConfig::default());
//! tree.insert(Rect::new(10, 10, 100, 40), "button");
//! tree.insert(Rect::new(10, 60, 100, 40), "checkbox");
//!
//! assert_eq!(tree.get_colliding_ids(20, 70), vec!["checkbox"]);
//! assert!(tree.get_colliding_ids(300, 300).is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod quadtree;
mod types;

pub use quadtree::{Quadrant, Quadtree, QuadtreeConfig};
pub use types::{MissingPolicy, Rect};
