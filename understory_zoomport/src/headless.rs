// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`Host`] for tests, demos and benchmarks.
//!
//! [`HeadlessDocument`] models just enough of a document to drive a
//! [`crate::ZoomPort`]: a tree of boxes with layout offsets, scroll
//! containers that clamp their offsets to the scrollable range, per-element
//! transforms, and the layout-zoom fallback. It also keeps a log of every
//! transform applied so that transition sequences can be inspected.

use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::host::Host;
use crate::transform::{SurfaceTransform, Transition};

/// Handle to a node in a [`HeadlessDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NodeKind {
    Element,
    Text,
}

#[derive(Clone, Debug)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Offset within the parent and natural size.
    layout: Rect,
    scroll: Vec2,
    scrolling_enabled: bool,
    transform: SurfaceTransform,
    transition: Option<Transition>,
    layout_zoom: f64,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>, layout: Rect) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            layout,
            scroll: Vec2::ZERO,
            scrolling_enabled: true,
            transform: SurfaceTransform::IDENTITY,
            transition: None,
            layout_zoom: 1.0,
        }
    }

    /// Maps node-local coordinates into the parent's content coordinates.
    fn local_to_parent(&self) -> Affine {
        Affine::translate(self.layout.origin().to_vec2())
            * self.transform.to_affine()
            * Affine::scale(self.layout_zoom)
    }
}

/// One call to [`Host::set_transform`], as recorded by [`HeadlessDocument`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppliedTransform {
    /// Node the transform was applied to.
    pub node: NodeId,
    /// The transform.
    pub transform: SurfaceTransform,
    /// Transition the host was asked to animate with.
    pub transition: Option<Transition>,
}

/// In-memory document tree implementing [`Host`].
#[derive(Clone, Debug)]
pub struct HeadlessDocument {
    nodes: Vec<Node>,
    transforms: bool,
    log: Vec<AppliedTransform>,
}

impl Default for HeadlessDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDocument {
    /// Creates an empty document whose elements can be transformed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            transforms: true,
            log: Vec::new(),
        }
    }

    /// Creates an empty document that only supports the layout-zoom fallback.
    #[must_use]
    pub fn without_transforms() -> Self {
        Self {
            transforms: false,
            ..Self::new()
        }
    }

    /// Builds the usual preview setup: a viewport at the page origin with a
    /// single surface child.
    ///
    /// Returns the document, the viewport and the surface.
    #[must_use]
    pub fn preview(viewport: Size, content: Size) -> (Self, NodeId, NodeId) {
        let mut doc = Self::new();
        let (vp, surface) = doc.add_preview(viewport, content);
        (doc, vp, surface)
    }

    /// Adds a viewport at the page origin with a single surface child.
    pub fn add_preview(&mut self, viewport: Size, content: Size) -> (NodeId, NodeId) {
        let vp = self.add_root(Rect::from_origin_size(Point::ORIGIN, viewport));
        let surface = self.add_element(vp, Rect::from_origin_size(Point::ORIGIN, content));
        (vp, surface)
    }

    /// Adds a root element positioned at `rect` in page space.
    pub fn add_root(&mut self, rect: Rect) -> NodeId {
        self.push(Node::new(NodeKind::Element, None, rect))
    }

    /// Adds an element under `parent`; `rect` is its offset within the parent
    /// and its natural size.
    pub fn add_element(&mut self, parent: NodeId, rect: Rect) -> NodeId {
        self.add_child(NodeKind::Element, parent, rect)
    }

    /// Adds a text node under `parent`. Text nodes are not elements.
    pub fn add_text(&mut self, parent: NodeId, rect: Rect) -> NodeId {
        self.add_child(NodeKind::Text, parent, rect)
    }

    fn add_child(&mut self, kind: NodeKind, parent: NodeId, rect: Rect) -> NodeId {
        let id = self.push(Node::new(kind, Some(parent), rect));
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Transform currently applied to `node`.
    #[must_use]
    pub fn transform(&self, node: NodeId) -> SurfaceTransform {
        self.node(node).map_or(SurfaceTransform::IDENTITY, |n| n.transform)
    }

    /// Transition currently attached to `node`.
    #[must_use]
    pub fn transition(&self, node: NodeId) -> Option<Transition> {
        self.node(node).and_then(|n| n.transition)
    }

    /// Layout zoom currently applied to `node`.
    #[must_use]
    pub fn layout_zoom(&self, node: NodeId) -> f64 {
        self.node(node).map_or(1.0, |n| n.layout_zoom)
    }

    /// Returns `true` if the user may scroll `node`.
    #[must_use]
    pub fn scrolling_enabled(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.scrolling_enabled)
    }

    /// Every transform applied so far, oldest first.
    #[must_use]
    pub fn transform_log(&self) -> &[AppliedTransform] {
        &self.log
    }

    /// Simulates the user scrolling `node`.
    ///
    /// Returns `false`, leaving the offset alone, while scrolling is disabled.
    pub fn user_scroll_to(&mut self, node: NodeId, offset: Vec2) -> bool {
        if !self.scrolling_enabled(node) {
            return false;
        }
        self.set_scroll_offset(node, offset);
        true
    }

    /// Maps node-local coordinates to page space.
    fn to_page(&self, id: NodeId) -> Affine {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(c) = cursor {
            let Some(node) = self.node(c) else { break };
            chain.push(node);
            cursor = node.parent;
        }
        let mut affine = Affine::IDENTITY;
        for (depth, node) in chain.iter().enumerate().rev() {
            affine *= node.local_to_parent();
            // A scroll container shifts its children, not itself.
            if depth > 0 {
                affine *= Affine::translate(-node.scroll);
            }
        }
        affine
    }

    /// Furthest extent of `id`'s children in its content coordinates.
    fn scroll_extent(&self, id: NodeId) -> Size {
        let Some(node) = self.node(id) else {
            return Size::ZERO;
        };
        node.children
            .iter()
            .filter_map(|c| self.node(*c))
            .map(|child| {
                child
                    .local_to_parent()
                    .transform_rect_bbox(Rect::from_origin_size(Point::ORIGIN, child.layout.size()))
            })
            .fold(Size::ZERO, |acc, r| {
                Size::new(acc.width.max(r.x1), acc.height.max(r.y1))
            })
    }

    /// Largest valid scroll offset of `node`.
    #[must_use]
    pub fn max_scroll(&self, node: NodeId) -> Vec2 {
        let Some(n) = self.node(node) else {
            return Vec2::ZERO;
        };
        let extent = self.scroll_extent(node);
        let size = n.layout.size();
        Vec2::new(
            (extent.width - size.width).max(0.0),
            (extent.height - size.height).max(0.0),
        )
    }
}

impl Host for HeadlessDocument {
    type Element = NodeId;

    fn is_element(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.kind == NodeKind::Element)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    fn first_element_child(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?
            .children
            .iter()
            .copied()
            .find(|c| self.is_element(*c))
    }

    fn client_rect(&self, node: NodeId) -> Rect {
        let Some(n) = self.node(node) else {
            return Rect::ZERO;
        };
        // The node's own scroll offset does not move its box.
        let local = Rect::from_origin_size(Point::ORIGIN, n.layout.size());
        self.to_page(node).transform_rect_bbox(local)
    }

    fn layout_offset(&self, node: NodeId, ancestor: NodeId) -> Option<Point> {
        let mut offset = Vec2::ZERO;
        let mut cursor = node;
        while cursor != ancestor {
            let n = self.node(cursor)?;
            offset += n.layout.origin().to_vec2();
            cursor = n.parent?;
        }
        Some(offset.to_point())
    }

    fn scroll_offset(&self, node: NodeId) -> Vec2 {
        self.node(node).map_or(Vec2::ZERO, |n| n.scroll)
    }

    fn set_scroll_offset(&mut self, node: NodeId, offset: Vec2) {
        let max = self.max_scroll(node);
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.scroll = Vec2::new(offset.x.clamp(0.0, max.x), offset.y.clamp(0.0, max.y));
        }
    }

    fn set_scrolling_enabled(&mut self, node: NodeId, enabled: bool) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.scrolling_enabled = enabled;
        }
    }

    fn set_transform(
        &mut self,
        node: NodeId,
        transform: SurfaceTransform,
        transition: Option<Transition>,
    ) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.transform = transform;
            n.transition = transition;
            self.log.push(AppliedTransform {
                node,
                transform,
                transition,
            });
        }
    }

    fn set_layout_zoom(&mut self, node: NodeId, scale: f64) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.layout_zoom = scale;
        }
    }

    fn supports_transforms(&self) -> bool {
        self.transforms
    }
}
