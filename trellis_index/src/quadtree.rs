// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding quadtree with lazy subdivision and an optional self-expanding root.
//!
//! Each node keeps a short list of `(rect, id)` pairs. When a node holds more
//! than [`QuadtreeConfig::max_objects`] entries and sits above
//! [`QuadtreeConfig::max_levels`], it splits into four quadrants around its
//! midpoint and pushes down every object that fits strictly inside one
//! quadrant. Objects straddling a midline always stay at the level where they
//! were split.
//!
//! A tree built with [`Quadtree::unbounded`] starts as `Rect(0, 0, 0, 0)` and
//! grows to the union of its bound and any rectangle inserted outside it. Every
//! growth clears the tree and reinserts all stored objects, which is O(n) per
//! expansion and only cheap when expansions are rare.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use smallvec::SmallVec;

use crate::types::Rect;

/// Capacity and depth limits for a [`Quadtree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QuadtreeConfig {
    /// Number of local objects a node holds before it tries to split.
    pub max_objects: usize,
    /// Deepest level at which a node may still split (the root is level 0).
    pub max_levels: usize,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            max_objects: 10,
            max_levels: 5,
        }
    }
}

/// Quadrant indices produced by [`Quadtree::quadrant_of`].
///
/// `0` is top-right, `1` top-left, `2` bottom-left, `3` bottom-right.
pub type Quadrant = usize;

/// A node of the bounding quadtree; the root is the whole tree.
pub struct Quadtree<K> {
    config: QuadtreeConfig,
    level: usize,
    bounds: Rect,
    expanding: bool,
    objects: SmallVec<[(Rect, K); 8]>,
    nodes: Option<Box<[Self; 4]>>,
}

impl<K> Debug for Quadtree<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Quadtree")
            .field("level", &self.level)
            .field("bounds", &self.bounds)
            .field("expanding", &self.expanding)
            .field("local_objects", &self.objects.len())
            .field("split", &self.nodes.is_some())
            .finish_non_exhaustive()
    }
}

impl<K: Copy> Quadtree<K> {
    /// Create a quadtree over a fixed bound.
    ///
    /// Objects outside the bound are still stored; they are routed by the
    /// bound's midlines like any other object.
    pub fn new(bounds: Rect, config: QuadtreeConfig) -> Self {
        Self::node(bounds, 0, config, false)
    }

    /// Create a self-expanding quadtree starting at `Rect(0, 0, 0, 0)`.
    ///
    /// ```
    /// use trellis_index::{Quadtree, QuadtreeConfig, Rect};
    ///
    /// let mut tree = Quadtree::unbounded(QuadtreeConfig::default());
    /// tree.insert(Rect::new(10, 10, 20, 20), 7_u32);
    /// tree.insert(Rect::new(-50, 0, 10, 10), 8_u32);
    ///
    /// assert_eq!(tree.bounds(), Rect::new(-50, 0, 80, 30));
    /// assert_eq!(tree.get_colliding_ids(15, 15), vec![7]);
    /// ```
    pub fn unbounded(config: QuadtreeConfig) -> Self {
        Self::node(Rect::ZERO, 0, config, true)
    }

    fn node(bounds: Rect, level: usize, config: QuadtreeConfig, expanding: bool) -> Self {
        Self {
            config,
            level,
            bounds,
            expanding,
            objects: SmallVec::new(),
            nodes: None,
        }
    }

    /// Current bound of this node.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Depth of this node (the root is 0).
    pub fn level(&self) -> usize {
        self.level
    }

    /// Config shared by every node of the tree.
    pub fn config(&self) -> QuadtreeConfig {
        self.config
    }

    /// Objects stored directly on this node.
    pub fn objects(&self) -> &[(Rect, K)] {
        &self.objects
    }

    /// Child quadrants, empty until the node has split.
    pub fn nodes(&self) -> &[Self] {
        match &self.nodes {
            Some(nodes) => &nodes[..],
            None => &[],
        }
    }

    /// Total number of objects in this subtree.
    pub fn len(&self) -> usize {
        self.objects.len() + self.nodes().iter().map(Self::len).sum::<usize>()
    }

    /// Whether the subtree stores no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.nodes().iter().all(Self::is_empty)
    }

    /// Drop every object and quadrant. A self-expanding root shrinks back to zero.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.nodes = None;
        if self.expanding {
            self.bounds = Rect::ZERO;
        }
    }

    /// Insert `rect` under `id`.
    pub fn insert(&mut self, rect: Rect, id: K) {
        if self.expanding && !self.bounds.contains_rect(&rect) {
            self.expand_to(rect);
        }
        self.insert_inner(rect, id);
    }

    /// Candidate objects that may intersect `rect`.
    ///
    /// The result is a superset: it contains every stored object intersecting
    /// `rect`, plus local objects of visited nodes that may not.
    pub fn retrieve(&self, rect: Rect) -> Vec<(Rect, K)> {
        let mut out = Vec::new();
        self.visit_candidates(&rect, &mut |r, k| out.push((r, k)));
        out
    }

    /// Ids of all objects whose rectangle contains the point.
    pub fn get_colliding_ids(&self, x: i32, y: i32) -> Vec<K> {
        let mut out = Vec::new();
        let reach = |mx: i32, my: i32| {
            let (top, left) = (y < my, x < mx);
            [top && !left, top && left, !top && left, !top && !left]
        };
        self.visit(&reach, &mut |r, k| {
            if r.contains_point(x, y) {
                out.push(k);
            }
        });
        out
    }

    /// Ids of all objects intersecting `rect`.
    pub fn get_intersecting_ids(&self, rect: Rect) -> Vec<K> {
        let mut out = Vec::new();
        self.visit_candidates(&rect, &mut |r, k| {
            if r.intersects(&rect) {
                out.push(k);
            }
        });
        out
    }

    /// Quadrant that fully holds `rect`, or `None` if it straddles a midline.
    pub fn quadrant_of(&self, rect: &Rect) -> Option<Quadrant> {
        quadrant_of(&self.bounds, rect)
    }

    fn insert_inner(&mut self, rect: Rect, id: K) {
        let bounds = self.bounds;
        if let Some(nodes) = self.nodes.as_deref_mut()
            && let Some(q) = quadrant_of(&bounds, &rect)
        {
            nodes[q].insert_inner(rect, id);
            return;
        }

        self.objects.push((rect, id));
        if self.objects.len() <= self.config.max_objects || self.level >= self.config.max_levels {
            return;
        }

        if self.nodes.is_none() {
            self.split();
        }
        let Some(nodes) = self.nodes.as_deref_mut() else {
            return;
        };
        let pending = core::mem::take(&mut self.objects);
        for (r, k) in pending {
            match quadrant_of(&bounds, &r) {
                Some(q) => nodes[q].insert_inner(r, k),
                None => self.objects.push((r, k)),
            }
        }
    }

    fn split(&mut self) {
        let b = self.bounds;
        let (mx, my) = b.center();
        let level = self.level + 1;
        log::trace!("quadtree split at level {} over {:?}", self.level, b);
        self.nodes = Some(Box::new([
            Self::node(Rect::from_edges(mx, b.top(), b.right(), my), level, self.config, false),
            Self::node(Rect::from_edges(b.left(), b.top(), mx, my), level, self.config, false),
            Self::node(Rect::from_edges(b.left(), my, mx, b.bottom()), level, self.config, false),
            Self::node(Rect::from_edges(mx, my, b.right(), b.bottom()), level, self.config, false),
        ]));
    }

    fn expand_to(&mut self, rect: Rect) {
        let grown = self.bounds.union(&rect);
        let mut stored = Vec::with_capacity(self.len());
        self.drain_into(&mut stored);
        log::debug!(
            "quadtree root grows {:?} -> {:?}, reinserting {} objects",
            self.bounds,
            grown,
            stored.len()
        );
        self.bounds = grown;
        for (r, k) in stored {
            self.insert_inner(r, k);
        }
    }

    fn drain_into(&mut self, out: &mut Vec<(Rect, K)>) {
        out.extend(self.objects.drain(..));
        if let Some(mut nodes) = self.nodes.take() {
            for n in nodes.iter_mut() {
                n.drain_into(out);
            }
        }
    }

    fn visit_candidates<F: FnMut(Rect, K)>(&self, query: &Rect, f: &mut F) {
        let reach = |mx: i32, my: i32| {
            let top = query.top() < my;
            let bottom = query.bottom() > my;
            let left = query.left() < mx;
            let right = query.right() > mx;
            [top && right, top && left, bottom && left, bottom && right]
        };
        self.visit(&reach, f);
    }

    /// Walk local objects, then every quadrant `reach` selects from the midlines.
    fn visit<R, F>(&self, reach: &R, f: &mut F)
    where
        R: Fn(i32, i32) -> [bool; 4],
        F: FnMut(Rect, K),
    {
        for &(r, k) in &self.objects {
            f(r, k);
        }
        let Some(nodes) = self.nodes.as_deref() else {
            return;
        };
        let (mx, my) = self.bounds.center();
        for (node, hit) in nodes.iter().zip(reach(mx, my)) {
            if hit {
                node.visit(reach, f);
            }
        }
    }
}

impl<K: Copy + PartialEq> Quadtree<K> {
    /// Remove every object stored under `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: K) -> bool {
        let before = self.objects.len();
        self.objects.retain(|(_, k)| *k != id);
        let mut removed = self.objects.len() != before;
        if let Some(nodes) = self.nodes.as_deref_mut() {
            for n in nodes.iter_mut() {
                removed |= n.remove(id);
            }
        }
        removed
    }
}

fn quadrant_of(bounds: &Rect, rect: &Rect) -> Option<Quadrant> {
    let (mx, my) = bounds.center();
    let top = rect.bottom() <= my;
    let bottom = rect.top() >= my;
    let left = rect.right() <= mx;
    let right = rect.left() >= mx;
    match (top, bottom, left, right) {
        (true, _, _, true) => Some(0),
        (true, _, true, _) => Some(1),
        (_, true, true, _) => Some(2),
        (_, true, _, true) => Some(3),
        _ => None,
    }
}
