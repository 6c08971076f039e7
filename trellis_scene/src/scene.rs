// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Point;
use trellis_index::{MissingPolicy, Quadtree, QuadtreeConfig, Rect};
use trellis_layout::{ContainerStyle, Element, Layout, NodeFlags, NodeId, Position, Size};

use crate::damage::Damage;
use crate::error::SceneError;
use crate::util::{pixel_of, to_kurbo};

/// Handle of a layer; higher layers are drawn later and hit first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub(crate) u32);

/// Flag requirements a node must meet to be reported by a hit test.
///
/// The empty filter accepts every indexed node. Only visible nodes are
/// indexed, so [`pickable`](Self::pickable) is the usual pointer filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryFilter {
    /// Flags a node must carry, all of them.
    pub require: NodeFlags,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            require: NodeFlags::empty(),
        }
    }
}

impl QueryFilter {
    /// Filter accepting any node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Additionally require `flags`.
    #[must_use]
    pub fn with(mut self, flags: NodeFlags) -> Self {
        self.require |= flags;
        self
    }

    /// Additionally require [`NodeFlags::VISIBLE`].
    #[must_use]
    pub fn visible(self) -> Self {
        self.with(NodeFlags::VISIBLE)
    }

    /// Additionally require [`NodeFlags::PICKABLE`].
    #[must_use]
    pub fn pickable(self) -> Self {
        self.with(NodeFlags::PICKABLE)
    }

    /// Whether a node carrying `flags` passes.
    pub fn accepts(&self, flags: NodeFlags) -> bool {
        flags.contains(self.require)
    }
}

struct Layer {
    name: String,
    root: NodeId,
    index: Quadtree<NodeId>,
    /// Paint order of indexed nodes.
    order: HashMap<NodeId, usize>,
}

/// A stack of full-window layers over one [`Layout`].
///
/// Each layer has a root node and a quadtree rebuilt on every
/// [`commit`](Self::commit) from the resolved rectangles of its visible
/// nodes. Hit testing queries those quadtrees, so it reflects the last commit.
pub struct Scene {
    layout: Layout,
    layers: Vec<Layer>,
    config: QuadtreeConfig,
    committed: HashMap<NodeId, Rect>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<&str> = self.layers.iter().map(|l| l.name.as_str()).collect();
        f.debug_struct("Scene")
            .field("layers", &names)
            .field("nodes", &self.layout.len())
            .field("committed", &self.committed.len())
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Create an empty scene for a window of the given size.
    pub fn new(window: Size) -> Self {
        Self::with_config(window, QuadtreeConfig::default())
    }

    /// Create an empty scene with custom quadtree tuning.
    pub fn with_config(window: Size, config: QuadtreeConfig) -> Self {
        Self {
            layout: Layout::new(window),
            layers: Vec::new(),
            config,
            committed: HashMap::new(),
        }
    }

    /// Push a container layer covering the window.
    pub fn add_layer(&mut self, name: impl Into<String>, style: ContainerStyle) -> LayerId {
        let name = name.into();
        let root = self
            .layout
            .insert_root(Element::container(name.clone(), Position::window(), style));
        self.push_layer(name, root)
    }

    /// Push a multi-layer root covering the window; children overlap.
    pub fn add_stack_layer(&mut self, name: impl Into<String>) -> LayerId {
        let name = name.into();
        let root = self
            .layout
            .insert_root(Element::multi_layer(name.clone(), Position::window()));
        self.push_layer(name, root)
    }

    fn push_layer(&mut self, name: String, root: NodeId) -> LayerId {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "LayerId uses 32-bit indices."
        )]
        let id = LayerId(self.layers.len() as u32);
        self.layers.push(Layer {
            name,
            root,
            index: Quadtree::unbounded(self.config),
            order: HashMap::new(),
        });
        id
    }

    /// Root node of a layer.
    pub fn layer_root(&self, layer: LayerId) -> Option<NodeId> {
        self.layer(layer).ok().map(|l| l.root)
    }

    /// Layer that owns a live node.
    pub fn layer_of(&self, id: NodeId) -> Option<LayerId> {
        let root = self.root_of(id)?;
        self.layers
            .iter()
            .position(|l| l.root == root)
            .and_then(|i| u32::try_from(i).ok())
            .map(LayerId)
    }

    /// Add `element` under `parent`, or under the layer root when `parent` is `None`.
    pub fn add_element(
        &mut self,
        layer: LayerId,
        parent: Option<NodeId>,
        element: Element,
    ) -> Result<NodeId, SceneError> {
        let root = self.layer(layer)?.root;
        let parent = parent.unwrap_or(root);
        if self.layout.is_alive(parent) && self.root_of(parent) != Some(root) {
            log::warn!("add_element: {parent:?} belongs to another layer than {layer:?}");
            return Err(SceneError::ForeignParent { parent, layer });
        }
        Ok(self.layout.add_child(parent, element)?)
    }

    /// Remove a node and its subtree. Geometry disappears on the next commit.
    pub fn remove_element(&mut self, id: NodeId, policy: MissingPolicy) -> Result<(), SceneError> {
        Ok(self.layout.remove(id, policy)?)
    }

    /// The underlying layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Mutable access to the underlying layout.
    pub fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    /// Change the window size. Takes effect on the next commit.
    pub fn set_window_size(&mut self, window: Size) {
        self.layout.set_window_size(window);
    }

    /// Relayout every layer, rebuild the quadtrees, and report what moved.
    pub fn commit(&mut self) -> Damage {
        let mut current = HashMap::new();
        for layer in &mut self.layers {
            self.layout.update_layout(layer.root);
            layer.index.clear();
            layer.order.clear();
            for id in visible_subtree(&self.layout, layer.root) {
                let Some(rect) = self.layout.rect(id) else {
                    continue;
                };
                layer.order.insert(id, layer.order.len());
                layer.index.insert(rect, id);
                current.insert(id, rect);
            }
            log::trace!(
                "committed layer `{}`: {} nodes indexed",
                layer.name,
                layer.index.len()
            );
        }

        let mut damage = Damage::default();
        for (id, old) in &self.committed {
            match current.get(id) {
                Some(new) if new == old => {}
                Some(new) => {
                    damage.dirty_rects.push(to_kurbo(*old));
                    damage.dirty_rects.push(to_kurbo(*new));
                }
                None => damage.dirty_rects.push(to_kurbo(*old)),
            }
        }
        for (id, new) in &current {
            if !self.committed.contains_key(id) {
                damage.dirty_rects.push(to_kurbo(*new));
            }
        }
        self.committed = current;
        damage
    }

    /// Topmost node under `point` that satisfies `filter`.
    pub fn hit_test(&self, point: Point, filter: QueryFilter) -> Option<NodeId> {
        self.hits_at(point, filter).into_iter().next()
    }

    /// Every node under `point` that satisfies `filter`, topmost first.
    ///
    /// Layers are visited top to bottom; within a layer, later paint order wins.
    pub fn hits_at(&self, point: Point, filter: QueryFilter) -> Vec<NodeId> {
        let Some((x, y)) = pixel_of(point) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for layer in self.layers.iter().rev() {
            let mut hits: Vec<(usize, NodeId)> = layer
                .index
                .get_colliding_ids(x, y)
                .into_iter()
                .filter(|&id| self.layout.flags(id).is_some_and(|f| filter.accepts(f)))
                .filter_map(|id| layer.order.get(&id).map(|&o| (o, id)))
                .collect();
            hits.sort_unstable_by(|a, b| b.0.cmp(&a.0));
            out.extend(hits.into_iter().map(|(_, id)| id));
        }
        out
    }

    /// Visible nodes bottom layer first, each layer in depth-first order.
    pub fn paint_order(&self) -> Vec<NodeId> {
        self.layers
            .iter()
            .flat_map(|l| visible_subtree(&self.layout, l.root))
            .collect()
    }

    fn layer(&self, layer: LayerId) -> Result<&Layer, SceneError> {
        self.layers
            .get(layer.0 as usize)
            .ok_or(SceneError::UnknownLayer(layer))
    }

    fn root_of(&self, mut id: NodeId) -> Option<NodeId> {
        if !self.layout.is_alive(id) {
            return None;
        }
        while let Some(p) = self.layout.parent_of(id) {
            id = p;
        }
        Some(id)
    }
}

/// Depth-first nodes under `root`, skipping invisible subtrees.
fn visible_subtree(layout: &Layout, root: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = alloc::vec![root];
    while let Some(id) = stack.pop() {
        if !layout
            .flags(id)
            .is_some_and(|f| f.contains(NodeFlags::VISIBLE))
        {
            continue;
        }
        out.push(id);
        stack.extend(layout.children_of(id).iter().rev().copied());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_layout::{Align, ContainerRelative, LayerRelative, Length};

    fn sized(w: i32, h: i32) -> Position {
        Position::container(ContainerRelative::sized(w, h)).unwrap()
    }

    fn overlay(x: i32, y: i32, w: i32, h: i32) -> Position {
        Position::multi_layer(
            LayerRelative {
                width: Length::Px(w),
                height: Length::Px(h),
            },
            x,
            y,
        )
        .unwrap()
    }

    #[test]
    fn commit_lays_out_and_hit_tests_through_quadtree() {
        let mut scene = Scene::new(Size::new(300, 100));
        let ui = scene.add_layer("ui", ContainerStyle::aligned(Align::Row));
        let a = scene
            .add_element(ui, None, Element::leaf("a", sized(100, 100)))
            .unwrap();
        let b = scene
            .add_element(ui, None, Element::leaf("b", sized(100, 100)))
            .unwrap();
        let damage = scene.commit();
        assert!(!damage.is_empty());

        let root = scene.layer_root(ui).unwrap();
        assert_eq!(scene.hit_test(Point::new(150.0, 50.0), QueryFilter::new()), Some(b));
        assert_eq!(
            scene.hits_at(Point::new(50.0, 50.0), QueryFilter::new()),
            [a, root]
        );
        assert_eq!(
            scene.hit_test(Point::new(250.0, 50.0), QueryFilter::new()),
            Some(root)
        );
        assert_eq!(scene.hit_test(Point::new(350.0, 50.0), QueryFilter::new()), None);
    }

    #[test]
    fn upper_layers_win_and_filters_apply() {
        let mut scene = Scene::new(Size::new(200, 200));
        let world = scene.add_stack_layer("world");
        let hud = scene.add_stack_layer("hud");
        let ground = scene
            .add_element(world, None, Element::leaf("ground", overlay(0, 0, 200, 200)))
            .unwrap();
        let label = scene
            .add_element(
                hud,
                None,
                Element::leaf("label", overlay(10, 10, 50, 20))
                    .with_flags(NodeFlags::VISIBLE),
            )
            .unwrap();
        scene.commit();

        let p = Point::new(20.0, 15.0);
        let hud_root = scene.layer_root(hud).unwrap();
        assert_eq!(scene.hit_test(p, QueryFilter::new()), Some(label));
        assert_eq!(
            scene.hit_test(p, QueryFilter::new().pickable()),
            Some(hud_root),
            "label is not pickable"
        );
        let all = scene.hits_at(p, QueryFilter::new());
        assert_eq!(all.len(), 4);
        assert_eq!(all.last(), scene.layer_root(world).as_ref());
        assert!(all.contains(&ground));
    }

    #[test]
    fn invisible_subtrees_are_skipped() {
        let mut scene = Scene::new(Size::new(100, 100));
        let layer = scene.add_stack_layer("l");
        let panel = scene
            .add_element(
                layer,
                None,
                Element::multi_layer("panel", overlay(0, 0, 50, 50)),
            )
            .unwrap();
        let inner = scene
            .add_element(layer, Some(panel), Element::leaf("inner", overlay(0, 0, 10, 10)))
            .unwrap();
        scene.commit();
        assert_eq!(scene.hit_test(Point::new(5.0, 5.0), QueryFilter::new()), Some(inner));

        scene.layout_mut().set_flags(panel, NodeFlags::empty());
        scene.commit();
        let root = scene.layer_root(layer).unwrap();
        assert_eq!(scene.hit_test(Point::new(5.0, 5.0), QueryFilter::new()), Some(root));
        assert_eq!(scene.paint_order(), [root]);
    }

    #[test]
    fn damage_reports_moves_and_removals() {
        let mut scene = Scene::new(Size::new(100, 100));
        let layer = scene.add_stack_layer("l");
        let dot = scene
            .add_element(layer, None, Element::leaf("dot", overlay(0, 0, 10, 10)))
            .unwrap();
        scene.commit();
        assert!(scene.commit().is_empty(), "nothing changed");

        scene.layout_mut().set_x(dot, 40);
        let moved = scene.commit();
        assert_eq!(
            moved.dirty_rects,
            [
                kurbo::Rect::new(0.0, 0.0, 10.0, 10.0),
                kurbo::Rect::new(40.0, 0.0, 50.0, 10.0)
            ]
        );

        scene.remove_element(dot, MissingPolicy::Error).unwrap();
        let removed = scene.commit();
        assert_eq!(
            removed.union_rect(),
            Some(kurbo::Rect::new(40.0, 0.0, 50.0, 10.0))
        );
        assert_eq!(scene.hit_test(Point::new(45.0, 5.0), QueryFilter::new()), scene.layer_root(layer));
    }

    #[test]
    fn window_resize_damages_layer_roots() {
        let mut scene = Scene::new(Size::new(100, 100));
        let layer = scene.add_stack_layer("l");
        scene.commit();
        scene.set_window_size(Size::new(200, 100));
        let damage = scene.commit();
        assert_eq!(damage.union_rect(), Some(kurbo::Rect::new(0.0, 0.0, 200.0, 100.0)));
        assert_eq!(scene.layout().width(scene.layer_root(layer).unwrap()), Some(200));
    }

    #[test]
    fn elements_must_stay_in_their_layer() {
        let mut scene = Scene::new(Size::new(10, 10));
        let a = scene.add_stack_layer("a");
        let b = scene.add_stack_layer("b");
        let in_a = scene
            .add_element(a, None, Element::multi_layer("group", overlay(0, 0, 5, 5)))
            .unwrap();
        assert_eq!(
            scene.add_element(b, Some(in_a), Element::leaf("x", overlay(0, 0, 1, 1))),
            Err(SceneError::ForeignParent {
                parent: in_a,
                layer: b
            })
        );
        assert_eq!(scene.layer_of(in_a), Some(a));
        assert_eq!(
            scene.add_element(LayerId(9), None, Element::leaf("x", overlay(0, 0, 1, 1))),
            Err(SceneError::UnknownLayer(LayerId(9)))
        );
        let dup = scene.add_element(a, None, Element::leaf("group", overlay(0, 0, 1, 1)));
        assert!(matches!(
            dup,
            Err(SceneError::Layout(trellis_layout::LayoutError::DuplicateChild { .. }))
        ));
    }

    #[test]
    fn filters_require_every_flag() {
        let both = NodeFlags::VISIBLE | NodeFlags::PICKABLE;
        assert!(QueryFilter::new().accepts(NodeFlags::empty()));
        assert!(QueryFilter::new().pickable().accepts(both));
        assert!(!QueryFilter::new().pickable().accepts(NodeFlags::VISIBLE));
        assert_eq!(
            QueryFilter::new().visible().pickable(),
            QueryFilter::new().with(both)
        );
    }

    #[test]
    fn far_pointer_misses_a_split_index() {
        let config = QuadtreeConfig {
            max_objects: 1,
            max_levels: 4,
        };
        let mut scene = Scene::with_config(Size::new(100, 100), config);
        let world = scene.add_stack_layer("world");
        for (i, x) in [0, 60, 30].into_iter().enumerate() {
            let name = alloc::format!("t{i}");
            scene
                .add_element(world, None, Element::leaf(name, overlay(x, 5, 10, 10)))
                .unwrap();
        }
        scene.commit();
        let far = Point::new(f64::from(i32::MAX), 5.0);
        assert!(scene.hits_at(far, QueryFilter::new()).is_empty());
        assert_eq!(scene.hits_at(Point::new(62.0, 6.0), QueryFilter::new()).len(), 2);
    }
}
