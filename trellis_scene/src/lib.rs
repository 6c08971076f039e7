// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Scene: layered scenes over [`trellis_layout`].
//!
//! A [`Scene`] owns one [`Layout`](trellis_layout::Layout) and an ordered
//! stack of full-window layers. Each layer indexes the resolved rectangles of
//! its visible nodes in a [`Quadtree`](trellis_index::Quadtree), and hit tests
//! go through those quadtrees.
//!
//! - [`Scene::commit`] relays out every layer, rebuilds the indexes, and
//!   returns coarse [`Damage`] in window space.
//! - [`Scene::hit_test`] / [`Scene::hits_at`] take a [`kurbo::Point`] and
//!   return nodes topmost first: upper layers before lower ones, and within a
//!   layer later paint order first. [`QueryFilter`] restricts candidates by
//!   [`NodeFlags`](trellis_layout::NodeFlags).
//! - [`Scene::paint_order`] lists visible nodes bottom to top.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use trellis_layout::{Align, ContainerRelative, ContainerStyle, Element, Position, Size};
//! use trellis_scene::{QueryFilter, Scene};
//!
//! let mut scene = Scene::new(Size::new(320, 240));
//! let menu = scene.add_layer("menu", ContainerStyle::aligned(Align::Column));
//! let play = Position::container(ContainerRelative::sized(320, 40)).unwrap();
//! let quit = Position::container(ContainerRelative::sized(320, 40)).unwrap();
//! scene.add_element(menu, None, Element::leaf("play", play)).unwrap();
//! let quit = scene.add_element(menu, None, Element::leaf("quit", quit)).unwrap();
//!
//! let damage = scene.commit();
//! assert!(!damage.is_empty());
//! assert_eq!(scene.hit_test(Point::new(12.0, 55.0), QueryFilter::new().pickable()), Some(quit));
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Enable `std` (default) or `libm`
//! for kurbo's float support.

#![no_std]

extern crate alloc;

mod damage;
mod error;
mod scene;
mod util;

pub use damage::Damage;
pub use error::SceneError;
pub use scene::{LayerId, QueryFilter, Scene};
