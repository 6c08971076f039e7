// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout arena: nodes, child lists, and the recompute pass.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;
use trellis_index::{MissingPolicy, Rect};

use crate::error::LayoutError;
use crate::position::{Position, ResolveContext, Strategy};
use crate::scroll::Scrollbars;
use crate::solver::{Frame, Measured, grid_cell_width, pack_grid, pack_line, pack_wrapped};
use crate::types::{Align, Axis, ContainerStyle, Element, NodeFlags, NodeId, Role, Size};

#[derive(Clone, Debug, Default)]
struct ContainerState {
    style: ContainerStyle,
    scroll: (i32, i32),
    content: Size,
    scrollbars: Scrollbars,
}

#[derive(Clone, Debug)]
enum Kind {
    Leaf,
    Container(ContainerState),
    MultiLayer,
}

impl Kind {
    fn from_role(role: Role) -> Self {
        match role {
            Role::Leaf => Self::Leaf,
            Role::Container(style) => Self::Container(ContainerState {
                style,
                ..ContainerState::default()
            }),
            Role::MultiLayer => Self::MultiLayer,
        }
    }

    fn role(&self) -> Role {
        match self {
            Self::Leaf => Role::Leaf,
            Self::Container(state) => Role::Container(state.style),
            Self::MultiLayer => Role::MultiLayer,
        }
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    names: HashMap<String, NodeId>,
    position: Position,
    kind: Kind,
    flags: NodeFlags,
}

impl Node {
    fn new(generation: u32, element: Element) -> Self {
        Self {
            generation,
            name: element.name,
            parent: None,
            children: Vec::new(),
            names: HashMap::new(),
            position: element.position,
            kind: Kind::from_role(element.role),
            flags: element.flags,
        }
    }
}

/// Arena of layout nodes.
///
/// Handles are generational [`NodeId`]s. Children keep a handle to their
/// parent; parents own the ordered child list, which is also paint and
/// event order.
///
/// Geometry accessors are pure. Coordinates written by containers only
/// change in [`Layout::update_layout`].
#[derive(Clone, Debug, Default)]
pub struct Layout {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    window: Size,
}

impl Layout {
    /// Create an empty arena for a window of the given size.
    pub fn new(window: Size) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    /// Insert a node with no parent.
    pub fn insert_root(&mut self, element: Element) -> NodeId {
        self.alloc(element)
    }

    /// Insert `element` as the last child of `parent`.
    ///
    /// Fails without touching the arena when `parent` is stale, is a leaf, or
    /// already has a child with the same name.
    pub fn add_child(&mut self, parent: NodeId, element: Element) -> Result<NodeId, LayoutError> {
        let Some(p) = self.node_opt(parent) else {
            log::warn!("add_child: unknown parent {parent:?}");
            return Err(LayoutError::UnknownNode(parent));
        };
        if !p.kind.role().holds_children() {
            log::warn!("add_child: {parent:?} (`{}`) is a leaf", p.name);
            return Err(LayoutError::NotAParent(parent));
        }
        if p.names.contains_key(&element.name) {
            log::warn!("add_child: `{}` already exists under {parent:?}", element.name);
            return Err(LayoutError::DuplicateChild {
                parent,
                name: element.name,
            });
        }
        let name = element.name.clone();
        let id = self.alloc(element);
        let p = self.node_mut(parent);
        p.children.push(id);
        p.names.insert(name, id);
        self.node_mut(id).parent = Some(parent);
        Ok(id)
    }

    /// Remove a node and its subtree.
    ///
    /// A stale `id` is `Ok` under [`MissingPolicy::Ignore`].
    pub fn remove(&mut self, id: NodeId, policy: MissingPolicy) -> Result<(), LayoutError> {
        if !self.is_alive(id) {
            return if policy.is_error() {
                Err(LayoutError::UnknownNode(id))
            } else {
                Ok(())
            };
        }
        if let Some(parent) = self.node(id).parent {
            let name = self.node(id).name.clone();
            let p = self.node_mut(parent);
            p.children.retain(|c| *c != id);
            if p.names.get(&name) == Some(&id) {
                p.names.remove(&name);
            }
        }
        self.free_subtree(id);
        Ok(())
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    /// Whether the arena has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Child of `parent` named `name`.
    pub fn child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.node_opt(parent)?.names.get(name).copied()
    }

    /// Children in insertion order, or an empty slice for stale ids.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.node_opt(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// Parent of a live node, `None` for roots and stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Name of a live node.
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.node_opt(id).map(|n| n.name.as_str())
    }

    /// Role of a live node.
    pub fn role(&self, id: NodeId) -> Option<Role> {
        self.node_opt(id).map(|n| n.kind.role())
    }

    /// Position of a live node.
    pub fn position(&self, id: NodeId) -> Option<&Position> {
        self.node_opt(id).map(|n| &n.position)
    }

    /// Flags of a live node.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    /// Replace the flags of a live node.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags = flags;
        }
    }

    // --- geometry ---

    /// Resolved rectangle of a live node.
    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.is_alive(id).then(|| self.resolved(id))
    }

    /// Resolved x.
    pub fn x(&self, id: NodeId) -> Option<i32> {
        self.rect(id).map(|r| r.x)
    }

    /// Resolved y.
    pub fn y(&self, id: NodeId) -> Option<i32> {
        self.rect(id).map(|r| r.y)
    }

    /// Resolved width.
    pub fn width(&self, id: NodeId) -> Option<i32> {
        self.rect(id).map(|r| r.width)
    }

    /// Resolved height.
    pub fn height(&self, id: NodeId) -> Option<i32> {
        self.rect(id).map(|r| r.height)
    }

    /// Write the literal x of a live node.
    pub fn set_x(&mut self, id: NodeId, x: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            n.position.set_x(x);
        }
    }

    /// Write the literal y of a live node.
    pub fn set_y(&mut self, id: NodeId, y: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            n.position.set_y(y);
        }
    }

    /// Write the literal width of a live node.
    pub fn set_w(&mut self, id: NodeId, w: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            n.position.set_w(w);
        }
    }

    /// Write the literal height of a live node.
    pub fn set_h(&mut self, id: NodeId, h: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            n.position.set_h(h);
        }
    }

    /// Window size used by full-window positions.
    pub fn window_size(&self) -> Size {
        self.window
    }

    /// Change the window size. Takes effect on the next resolve.
    pub fn set_window_size(&mut self, window: Size) {
        self.window = window;
    }

    /// Move a grid-cell node onto `(col, row)`.
    ///
    /// The cell survives later layout passes, including under containers.
    pub fn place_on_cell(&mut self, id: NodeId, col: i32, row: i32) -> Result<(), LayoutError> {
        let n = self
            .node_opt_mut(id)
            .ok_or(LayoutError::UnknownNode(id))?;
        let Strategy::GridCell {
            tile_width,
            tile_height,
        } = *n.position.strategy()
        else {
            return Err(LayoutError::NotAGridCell(id));
        };
        n.position.set_x(col * tile_width);
        n.position.set_y(row * tile_height);
        Ok(())
    }

    // --- containers ---

    /// Replace a container's style. Takes effect on the next layout pass.
    pub fn set_style(&mut self, id: NodeId, style: ContainerStyle) -> Result<(), LayoutError> {
        self.container_mut(id)?.style = style;
        Ok(())
    }

    /// Content width measured by the last layout pass.
    pub fn content_width(&self, id: NodeId) -> Option<i32> {
        self.container(id).map(|c| c.content.width)
    }

    /// Content height measured by the last layout pass.
    pub fn content_height(&self, id: NodeId) -> Option<i32> {
        self.container(id).map(|c| c.content.height)
    }

    /// Scrollbars produced by the last layout pass.
    pub fn scrollbars(&self, id: NodeId) -> Option<&Scrollbars> {
        self.container(id).map(|c| &c.scrollbars)
    }

    /// Current scroll offset.
    pub fn scroll_offset(&self, id: NodeId) -> Option<(i32, i32)> {
        self.container(id).map(|c| c.scroll)
    }

    /// Set the scroll offset without relaying out.
    pub fn set_scroll_offset(&mut self, id: NodeId, offset: (i32, i32)) -> Result<(), LayoutError> {
        self.container_mut(id)?.scroll = offset;
        Ok(())
    }

    /// Add `(dx, dy)` to the scroll offset and rerun the full layout of `id`.
    pub fn update_scroll_layout(&mut self, id: NodeId, dx: i32, dy: i32) -> Result<(), LayoutError> {
        let state = self.container_mut(id)?;
        state.scroll = (state.scroll.0 + dx, state.scroll.1 + dy);
        self.update_layout(id);
        Ok(())
    }

    /// Recompute the subtree rooted at `id` and write positions back.
    ///
    /// Content-sized containers are fitted bottom-up first, then every
    /// container places its children top-down. Output depends only on child
    /// specs, fixed container boxes, and scroll offsets, so repeated calls
    /// agree. Percentages on an axis the parent fits to its content resolve
    /// to 0.
    pub fn update_layout(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.fit(id);
        self.place(id);
    }

    fn fit(&mut self, id: NodeId) {
        let children = self.node(id).children.clone();
        for child in children {
            self.fit(child);
        }
        let n = self.node(id);
        if matches!(n.kind, Kind::Container(_))
            && (n.position.is_auto(Axis::Horizontal) || n.position.is_auto(Axis::Vertical))
        {
            self.arrange(id);
        }
    }

    fn place(&mut self, id: NodeId) {
        if matches!(self.node(id).kind, Kind::Container(_)) {
            self.arrange(id);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.place(child);
        }
    }

    fn arrange(&mut self, id: NodeId) {
        let Kind::Container(state) = &self.node(id).kind else {
            return;
        };
        let style = state.style;
        let (dx, dy) = state.scroll;
        let children: SmallVec<[NodeId; 16]> = self.node(id).children.iter().copied().collect();
        for &c in &children {
            self.node_mut(c).position.cell_width_limit = None;
        }

        let bounds = self.resolved(id);
        let cx = self.child_context(id);
        let measured: SmallVec<[Measured; 16]> = children
            .iter()
            .map(|&c| {
                let p = &self.node(c).position;
                let size = Size::new(p.resolve_width(&cx), p.resolve_height(&cx));
                p.container_spec()
                    .map_or(Measured::flush(size), |spec| Measured::relative(size, spec))
            })
            .collect();

        let own = &self.node(id).position;
        let frame = Frame {
            rect: bounds.translate(dx, dy),
            fit_width: own.is_auto(Axis::Horizontal),
            fit_height: own.is_auto(Axis::Vertical),
        };
        let out = match style.align {
            Align::Row => pack_line(&measured, Axis::Horizontal, frame),
            Align::Column => pack_line(&measured, Axis::Vertical, frame),
            Align::RowWrap => pack_wrapped(&measured, Axis::Horizontal, frame),
            Align::ColumnWrap => pack_wrapped(&measured, Axis::Vertical, frame),
            Align::Grid => pack_grid(&measured, &style.grid, frame),
        };
        let cell_limit = (style.align == Align::Grid).then(|| {
            if frame.fit_width {
                measured.iter().map(|m| m.size.width).max().unwrap_or(0)
            } else {
                grid_cell_width(&style.grid, bounds.width)
            }
        });

        for (&c, r) in children.iter().zip(&out.placements) {
            let p = &mut self.node_mut(c).position;
            // Grid-cell nodes keep the cell chosen by `place_on_cell`.
            if !matches!(p.strategy(), Strategy::GridCell { .. }) {
                p.place_at(r.x, r.y, bounds);
            }
            p.cell_width_limit = cell_limit;
        }

        let own = &mut self.node_mut(id).position;
        if frame.fit_width {
            own.set_w(out.content.width);
        }
        if frame.fit_height {
            own.set_h(out.content.height);
        }
        let bounds = self.resolved(id);
        if let Kind::Container(state) = &mut self.node_mut(id).kind {
            state.content = out.content;
            state
                .scrollbars
                .sync(style.overflow, bounds, out.content, (dx, dy), style.scrollbar_thickness);
        }
        log::trace!(
            "arranged {id:?} as {:?}: {} children, content {:?}",
            style.align,
            children.len(),
            out.content
        );
    }

    // --- traversal ---

    /// Nodes of the subtree rooted at `root` in depth-first pre-order.
    ///
    /// This is paint order; reverse it for event dispatch.
    pub fn depth_first(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(root) {
            return out;
        }
        let mut stack = alloc::vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    // --- internals ---

    fn alloc(&mut self, element: Element) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, element));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, element)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices."
        )]
        NodeId::new(idx as u32, generation)
    }

    fn resolved(&self, id: NodeId) -> Rect {
        let n = self.node(id);
        let cx = match n.parent {
            Some(p) => self.child_context(p),
            None => ResolveContext {
                parent: None,
                window: self.window,
            },
        };
        n.position.resolve(&cx)
    }

    /// Context the children of `id` resolve against.
    ///
    /// A container fitted to its content on an axis offers no extent there,
    /// so child percentages on that axis resolve to 0.
    fn child_context(&self, id: NodeId) -> ResolveContext {
        let n = self.node(id);
        let mut parent = self.resolved(id);
        if matches!(n.kind, Kind::Container(_)) {
            if n.position.is_auto(Axis::Horizontal) {
                parent.width = 0;
            }
            if n.position.is_auto(Axis::Vertical) {
                parent.height = 0;
            }
        }
        ResolveContext {
            parent: Some(parent),
            window: self.window,
        }
    }

    fn container(&self, id: NodeId) -> Option<&ContainerState> {
        match &self.node_opt(id)?.kind {
            Kind::Container(state) => Some(state),
            _ => None,
        }
    }

    fn container_mut(&mut self, id: NodeId) -> Result<&mut ContainerState, LayoutError> {
        match &mut self
            .node_opt_mut(id)
            .ok_or(LayoutError::UnknownNode(id))?
            .kind
        {
            Kind::Container(state) => Ok(state),
            _ => Err(LayoutError::NotAContainer(id)),
        }
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.idx())?
            .as_ref()
            .filter(|n| n.generation == id.1)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::length::{Length, Margin};
    use crate::margins::Margins;
    use crate::position::{ContainerRelative, LayerRelative};
    use crate::types::{GridConfig, ScrollAxes};

    fn boxed(w: impl Into<Length>, h: impl Into<Length>) -> Position {
        Position::container(ContainerRelative::sized(w, h)).unwrap()
    }

    fn root(layout: &mut Layout, rect: Rect, style: ContainerStyle) -> NodeId {
        layout.insert_root(Element::container("root", Position::fixed(rect), style))
    }

    fn leaf(layout: &mut Layout, parent: NodeId, name: &str, w: i32, h: i32) -> NodeId {
        layout
            .add_child(parent, Element::leaf(name, boxed(w, h)))
            .unwrap()
    }

    fn all_rects(layout: &Layout, root: NodeId) -> Vec<Rect> {
        layout
            .depth_first(root)
            .into_iter()
            .map(|id| layout.rect(id).unwrap())
            .collect()
    }

    #[test]
    fn row_of_percentage_margins_fills_exactly() {
        let mut layout = Layout::default();
        let r = root(&mut layout, Rect::new(0, 0, 300, 40), ContainerStyle::default());
        let spec = ContainerRelative::sized(100, 40)
            .with_margins(Margins::uniform(Margin::Percent(10.0)));
        for name in ["c", "a", "b"] {
            layout
                .add_child(r, Element::leaf(name, Position::container(spec).unwrap()))
                .unwrap();
        }
        layout.update_layout(r);
        assert_eq!(layout.content_width(r), Some(300));
        let xs: Vec<i32> = layout
            .children_of(r)
            .iter()
            .map(|&c| layout.x(c).unwrap())
            .collect();
        assert_eq!(xs, [0, 100, 200]);
    }

    #[test]
    fn row_wrap_starts_second_line() {
        let mut layout = Layout::default();
        let r = root(
            &mut layout,
            Rect::new(0, 0, 100, 100),
            ContainerStyle::aligned(Align::RowWrap),
        );
        let a = leaf(&mut layout, r, "a", 60, 10);
        let b = leaf(&mut layout, r, "b", 60, 10);
        let c = leaf(&mut layout, r, "c", 30, 10);
        layout.update_layout(r);
        assert_eq!(layout.rect(a), Some(Rect::new(0, 0, 60, 10)));
        assert_eq!(layout.rect(b), Some(Rect::new(0, 10, 60, 10)));
        assert_eq!(layout.rect(c), Some(Rect::new(60, 10, 30, 10)));
        assert_eq!(layout.content_height(r), Some(20));
    }

    #[test]
    fn column_sum_matches_content() {
        let mut layout = Layout::default();
        let r = root(
            &mut layout,
            Rect::new(0, 0, 50, 500),
            ContainerStyle::aligned(Align::Column),
        );
        let spec = ContainerRelative::sized(10, 7).with_margins(Margins::uniform(Margin::Px(2)));
        for i in 0..4 {
            let name = alloc::format!("k{i}");
            layout
                .add_child(r, Element::leaf(name, Position::container(spec).unwrap()))
                .unwrap();
        }
        leaf(&mut layout, r, "flush", 10, 5);
        layout.update_layout(r);
        assert_eq!(layout.content_height(r), Some(4 * (2 + 7 + 2) + 5));
    }

    #[test]
    fn auto_container_fits_content_and_relayout_is_stable() {
        let mut layout = Layout::default();
        let r = root(
            &mut layout,
            Rect::new(10, 10, 400, 400),
            ContainerStyle::aligned(Align::Column),
        );
        let row = layout
            .add_child(
                r,
                Element::container("row", boxed(Length::Auto, Length::Auto), ContainerStyle::default()),
            )
            .unwrap();
        let a = leaf(&mut layout, row, "a", 30, 10);
        let b = leaf(&mut layout, row, "b", 20, 15);
        let below = leaf(&mut layout, r, "below", 5, 5);

        layout.update_layout(r);
        assert_eq!(layout.rect(row), Some(Rect::new(10, 10, 50, 15)));
        assert_eq!(layout.rect(a), Some(Rect::new(10, 10, 30, 10)));
        assert_eq!(layout.rect(b), Some(Rect::new(40, 10, 20, 15)));
        assert_eq!(layout.rect(below), Some(Rect::new(10, 25, 5, 5)));

        let first = all_rects(&layout, r);
        layout.update_layout(r);
        layout.update_layout(r);
        assert_eq!(all_rects(&layout, r), first);
    }

    #[test]
    fn percentage_child_of_auto_row_does_not_feed_back() {
        let mut layout = Layout::default();
        let r = root(
            &mut layout,
            Rect::new(0, 0, 400, 400),
            ContainerStyle::aligned(Align::Column),
        );
        let row = layout
            .add_child(
                r,
                Element::container("row", boxed(Length::Auto, Length::Auto), ContainerStyle::default()),
            )
            .unwrap();
        let half = layout
            .add_child(row, Element::leaf("half", boxed(Length::Percent(50.0), 10)))
            .unwrap();
        let fixed = leaf(&mut layout, row, "fixed", 100, 20);

        layout.update_layout(r);
        let first = all_rects(&layout, r);
        for _ in 0..3 {
            layout.update_layout(r);
            assert_eq!(all_rects(&layout, r), first);
        }
        assert_eq!(layout.rect(row), Some(Rect::new(0, 0, 100, 20)));
        assert_eq!(layout.rect(half), Some(Rect::new(0, 0, 0, 10)));
        assert_eq!(layout.rect(fixed), Some(Rect::new(0, 0, 100, 20)));
    }

    #[test]
    fn auto_parents_are_stable_for_every_length() {
        let mut layout = Layout::default();
        let r = root(
            &mut layout,
            Rect::new(0, 0, 400, 400),
            ContainerStyle::aligned(Align::Column),
        );
        let row = layout
            .add_child(
                r,
                Element::container("row", boxed(Length::Auto, Length::Auto), ContainerStyle::default()),
            )
            .unwrap();
        leaf(&mut layout, row, "px", 30, 10);
        let pct = layout
            .add_child(row, Element::leaf("pct", boxed(Length::Percent(50.0), 12)))
            .unwrap();
        let square = layout
            .add_child(row, Element::leaf("square", boxed(Length::Square, 20)))
            .unwrap();
        let auto = layout
            .add_child(row, Element::leaf("auto", boxed(Length::Auto, 5)))
            .unwrap();
        layout.set_w(auto, 7);
        let stretchy = ContainerRelative {
            width_stretch_ratio: 2.0,
            ..ContainerRelative::sized(10, 10)
        }
        .with_margins(Margins {
            left: Some(Margin::Percent(50.0)),
            ..Margins::default()
        });
        let stretchy = layout
            .add_child(row, Element::leaf("stretchy", Position::container(stretchy).unwrap()))
            .unwrap();

        let flow = layout
            .add_child(
                r,
                Element::container(
                    "flow",
                    boxed(Length::Auto, Length::Auto),
                    ContainerStyle::aligned(Align::RowWrap),
                ),
            )
            .unwrap();
        for name in ["f0", "f1", "f2"] {
            leaf(&mut layout, flow, name, 60, 10);
        }

        let wrap = layout
            .add_child(
                r,
                Element::container(
                    "wrap",
                    boxed(100, Length::Auto),
                    ContainerStyle::aligned(Align::RowWrap),
                ),
            )
            .unwrap();
        leaf(&mut layout, wrap, "w0", 60, 10);
        leaf(&mut layout, wrap, "w1", 60, 10);
        let tall = layout
            .add_child(wrap, Element::leaf("tall", boxed(30, Length::Percent(100.0))))
            .unwrap();

        layout.update_layout(r);
        let first = all_rects(&layout, r);
        for _ in 0..3 {
            layout.update_layout(r);
            assert_eq!(all_rects(&layout, r), first);
        }

        assert_eq!(layout.rect(row), Some(Rect::new(0, 0, 67, 20)));
        assert_eq!(layout.width(pct), Some(0));
        assert_eq!(layout.rect(square), Some(Rect::new(30, 0, 20, 20)));
        assert_eq!(layout.rect(auto), Some(Rect::new(50, 0, 7, 5)));
        assert_eq!(layout.rect(stretchy), Some(Rect::new(57, 0, 10, 10)));

        assert_eq!(layout.rect(flow), Some(Rect::new(0, 20, 180, 10)), "fitted wrap never breaks");
        assert_eq!(layout.rect(wrap), Some(Rect::new(0, 30, 100, 20)));
        assert_eq!(layout.rect(tall), Some(Rect::new(60, 40, 30, 0)));
    }

    #[test]
    fn percentage_children_follow_container() {
        let mut layout = Layout::default();
        let r = root(&mut layout, Rect::new(0, 0, 300, 80), ContainerStyle::default());
        let half = layout
            .add_child(r, Element::leaf("half", boxed(Length::Percent(50.0), Length::Square)))
            .unwrap();
        layout.update_layout(r);
        assert_eq!(layout.width(half), Some(150));
        assert_eq!(layout.height(half), Some(150));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut layout = Layout::default();
        let r = root(&mut layout, Rect::new(0, 0, 10, 10), ContainerStyle::default());
        let first = leaf(&mut layout, r, "dup", 1, 1);
        let err = layout
            .add_child(r, Element::leaf("dup", boxed(1, 1)))
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::DuplicateChild {
                parent: r,
                name: "dup".into()
            }
        );
        assert_eq!(layout.children_of(r), &[first]);
        assert_eq!(layout.len(), 2);
    }

    #[test]
    fn leaves_and_stale_parents_reject_children() {
        let mut layout = Layout::default();
        let r = root(&mut layout, Rect::new(0, 0, 10, 10), ContainerStyle::default());
        let l = leaf(&mut layout, r, "l", 1, 1);
        assert_eq!(
            layout.add_child(l, Element::leaf("x", boxed(1, 1))),
            Err(LayoutError::NotAParent(l))
        );
        layout.remove(r, MissingPolicy::Ignore).unwrap();
        assert_eq!(
            layout.add_child(r, Element::leaf("x", boxed(1, 1))),
            Err(LayoutError::UnknownNode(r))
        );
    }

    #[test]
    fn remove_takes_subtree_and_frees_name() {
        let mut layout = Layout::default();
        let r = root(
            &mut layout,
            Rect::new(0, 0, 100, 100),
            ContainerStyle::aligned(Align::Column),
        );
        let inner = layout
            .add_child(
                r,
                Element::container("inner", boxed(100, 50), ContainerStyle::default()),
            )
            .unwrap();
        let deep = leaf(&mut layout, inner, "deep", 5, 5);
        layout.remove(inner, MissingPolicy::Error).unwrap();
        assert!(!layout.is_alive(inner));
        assert!(!layout.is_alive(deep));
        assert_eq!(layout.child_by_name(r, "inner"), None);
        assert_eq!(
            layout.remove(deep, MissingPolicy::Error),
            Err(LayoutError::UnknownNode(deep))
        );
        assert_eq!(layout.remove(deep, MissingPolicy::Ignore), Ok(()));

        // Slot reuse bumps the generation.
        let again = leaf(&mut layout, r, "inner", 1, 1);
        assert_ne!(again, inner);
        assert_eq!(layout.child_by_name(r, "inner"), Some(again));
        assert_eq!(layout.name_of(inner), None);
    }

    #[test]
    fn scrollbar_appears_follows_offset_and_disappears() {
        let mut layout = Layout::default();
        let style = ContainerStyle {
            align: Align::Column,
            overflow: ScrollAxes::VERTICAL,
            ..ContainerStyle::default()
        };
        let r = root(&mut layout, Rect::new(0, 0, 100, 50), style);
        let a = leaf(&mut layout, r, "a", 100, 30);
        let b = leaf(&mut layout, r, "b", 100, 30);
        let c = leaf(&mut layout, r, "c", 100, 30);
        layout.update_layout(r);
        let bar = layout.scrollbars(r).unwrap().vertical.unwrap();
        assert_eq!(bar.rect, Rect::new(90, 0, 10, 50));
        assert_eq!(bar.content_extent, 90);
        assert!(layout.scrollbars(r).unwrap().horizontal.is_none());

        layout.update_scroll_layout(r, 0, -20).unwrap();
        assert_eq!(layout.scroll_offset(r), Some((0, -20)));
        assert_eq!(layout.y(a), Some(-20));
        assert_eq!(layout.y(b), Some(10));
        assert_eq!(layout.scrollbars(r).unwrap().vertical.unwrap().offset, -20);

        layout.remove(b, MissingPolicy::Error).unwrap();
        layout.remove(c, MissingPolicy::Error).unwrap();
        layout.set_scroll_offset(r, (0, 0)).unwrap();
        layout.update_layout(r);
        assert!(layout.scrollbars(r).unwrap().is_empty());
        assert_eq!(layout.y(a), Some(0));
    }

    #[test]
    fn grid_caps_widths_and_resets_on_mode_change() {
        let mut layout = Layout::default();
        let style = ContainerStyle {
            align: Align::Grid,
            grid: GridConfig {
                cols: 3,
                row_spacing: 2,
                col_spacing: 0,
            },
            ..ContainerStyle::default()
        };
        let r = root(&mut layout, Rect::new(0, 0, 90, 90), style);
        let wide = leaf(&mut layout, r, "wide", 50, 10);
        let kids: Vec<NodeId> = (0..3)
            .map(|i| leaf(&mut layout, r, &alloc::format!("n{i}"), 10, 20))
            .collect();
        layout.update_layout(r);
        assert_eq!(layout.rect(wide), Some(Rect::new(0, 0, 30, 10)));
        assert_eq!(layout.rect(kids[0]), Some(Rect::new(30, 0, 10, 20)));
        assert_eq!(layout.rect(kids[2]), Some(Rect::new(0, 22, 10, 20)));
        assert_eq!(layout.content_height(r), Some(42));

        layout
            .set_style(r, ContainerStyle::aligned(Align::Row))
            .unwrap();
        layout.update_layout(r);
        assert_eq!(layout.width(wide), Some(50), "cell limit is dropped");
    }

    #[test]
    fn multi_layer_children_overlay_parent() {
        let mut layout = Layout::default();
        let stack = layout.insert_root(Element::multi_layer(
            "stack",
            Position::fixed(Rect::new(10, 20, 200, 100)),
        ));
        let full = layout
            .add_child(
                stack,
                Element::leaf(
                    "full",
                    Position::multi_layer(LayerRelative::default(), 0, 0).unwrap(),
                ),
            )
            .unwrap();
        let badge = layout
            .add_child(
                stack,
                Element::leaf(
                    "badge",
                    Position::multi_layer(
                        LayerRelative {
                            width: Length::Px(16),
                            height: Length::Percent(50.0),
                        },
                        5,
                        5,
                    )
                    .unwrap(),
                ),
            )
            .unwrap();
        layout.update_layout(stack);
        assert_eq!(layout.rect(full), Some(Rect::new(10, 20, 200, 100)));
        assert_eq!(layout.rect(badge), Some(Rect::new(15, 25, 16, 50)));
    }

    #[test]
    fn window_root_tracks_window_size() {
        let mut layout = Layout::new(Size::new(640, 480));
        let w = layout.insert_root(Element::container(
            "screen",
            Position::window(),
            ContainerStyle::default(),
        ));
        assert_eq!(layout.rect(w), Some(Rect::new(0, 0, 640, 480)));
        layout.set_window_size(Size::new(800, 600));
        assert_eq!(layout.width(w), Some(800));
    }

    #[test]
    fn cells_are_placed_by_tile() {
        let mut layout = Layout::default();
        let world = layout.insert_root(Element::multi_layer(
            "world",
            Position::fixed(Rect::new(0, 0, 320, 320)),
        ));
        let tile = layout
            .add_child(world, Element::leaf("snake", Position::grid_cell(16, 16)))
            .unwrap();
        layout.place_on_cell(tile, 2, 3).unwrap();
        assert_eq!(layout.rect(tile), Some(Rect::new(32, 48, 16, 16)));
        assert_eq!(
            layout.place_on_cell(world, 0, 0),
            Err(LayoutError::NotAGridCell(world))
        );
    }

    #[test]
    fn grid_cells_keep_their_cell_under_containers() {
        let mut layout = Layout::default();
        let r = root(&mut layout, Rect::new(0, 0, 320, 320), ContainerStyle::default());
        let before = leaf(&mut layout, r, "before", 40, 10);
        let tile = layout
            .add_child(r, Element::leaf("tile", Position::grid_cell(16, 16)))
            .unwrap();
        layout.place_on_cell(tile, 3, 1).unwrap();
        layout.update_layout(r);
        assert_eq!(layout.rect(tile), Some(Rect::new(48, 16, 16, 16)));
        assert_eq!(layout.rect(before), Some(Rect::new(0, 0, 40, 10)));
    }

    #[test]
    fn container_only_calls_on_leaves() {
        let mut layout = Layout::default();
        let l = layout.insert_root(Element::leaf("l", boxed(1, 1)));
        assert_eq!(layout.content_width(l), None);
        assert_eq!(
            layout.update_scroll_layout(l, 0, 1),
            Err(LayoutError::NotAContainer(l))
        );
    }

    #[test]
    fn depth_first_is_insertion_order() {
        let mut layout = Layout::default();
        let r = root(&mut layout, Rect::new(0, 0, 10, 10), ContainerStyle::default());
        let a = layout
            .add_child(r, Element::container("a", boxed(1, 1), ContainerStyle::default()))
            .unwrap();
        let a1 = leaf(&mut layout, a, "a1", 1, 1);
        let b = leaf(&mut layout, r, "b", 1, 1);
        assert_eq!(layout.depth_first(r), [r, a, a1, b]);
        assert_eq!(layout.parent_of(a1), Some(a));
        assert_eq!(layout.parent_of(r), None);
    }
}
