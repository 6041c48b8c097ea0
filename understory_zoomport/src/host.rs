// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the controller and whatever actually renders the page.

use core::fmt;

use kurbo::{Point, Rect, Size, Vec2};

use crate::transform::{SurfaceTransform, Transition};

/// Access to the rendering tree the controller operates on.
///
/// A browser host wraps DOM elements, a native host wraps its own widget
/// handles, and [`crate::headless::HeadlessDocument`] keeps everything in
/// memory for tests.
///
/// Coordinates follow the usual document conventions:
/// - "Page space" is the coordinate system pointer events are reported in.
/// - "Layout" offsets ignore any transform applied to the surface.
/// - Client rects are rendered bounds and therefore include transforms.
pub trait Host {
    /// Handle to a node in the host's tree.
    type Element: Copy + Eq + fmt::Debug;

    /// Returns `true` if `node` refers to a live element (as opposed to text,
    /// comments, or a handle whose node is gone).
    fn is_element(&self, node: Self::Element) -> bool;

    /// Parent of `node`, if any.
    fn parent(&self, node: Self::Element) -> Option<Self::Element>;

    /// First element child of `node`, if any.
    fn first_element_child(&self, node: Self::Element) -> Option<Self::Element>;

    /// Rendered bounds of `node` in page space.
    fn client_rect(&self, node: Self::Element) -> Rect;

    /// Untransformed layout position of `node` relative to `ancestor`.
    ///
    /// Returns `None` when `ancestor` is not an ancestor of `node`.
    fn layout_offset(&self, node: Self::Element, ancestor: Self::Element) -> Option<Point>;

    /// Current scroll offset of a scroll container.
    fn scroll_offset(&self, node: Self::Element) -> Vec2;

    /// Sets the scroll offset of a scroll container.
    ///
    /// Hosts clamp the offset to the scrollable range, as browsers do.
    fn set_scroll_offset(&mut self, node: Self::Element, offset: Vec2);

    /// Allows or forbids user scrolling of a scroll container.
    fn set_scrolling_enabled(&mut self, node: Self::Element, enabled: bool);

    /// Applies a transform to `node`, animated when `transition` is given.
    ///
    /// Passing `None` must also clear any transition left over from a
    /// previous call, so the transform takes effect immediately.
    fn set_transform(
        &mut self,
        node: Self::Element,
        transform: SurfaceTransform,
        transition: Option<Transition>,
    );

    /// Resizes `node` to `scale * 100%` of its natural size through layout.
    ///
    /// This is the fallback for hosts that cannot transform elements.
    fn set_layout_zoom(&mut self, node: Self::Element, scale: f64);

    /// Returns `true` if the host can apply (and animate) transforms.
    fn supports_transforms(&self) -> bool;
}

/// Which half of a viewport/surface pair an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameRole {
    /// The fixed-size scroll container.
    Viewport,
    /// The content inside the viewport.
    Surface,
}

/// Reasons a viewport/surface pair cannot be bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindError {
    /// The handle for the given role does not refer to an element.
    NotAnElement(FrameRole),
    /// No surface was supplied and the viewport has no element child.
    MissingSurface,
    /// The surface is not a direct child of the viewport.
    NotAChild,
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnElement(FrameRole::Viewport) => f.write_str("viewport is not an element"),
            Self::NotAnElement(FrameRole::Surface) => f.write_str("surface is not an element"),
            Self::MissingSurface => f.write_str("viewport has no child element to use as surface"),
            Self::NotAChild => f.write_str("surface is not a direct child of the viewport"),
        }
    }
}

impl core::error::Error for BindError {}

/// A viewport element and the surface element it scrolls.
///
/// `Frame` owns the host and exposes the handful of measurements and
/// mutations the controller needs, already specialized to the bound pair.
#[derive(Debug)]
pub struct Frame<H: Host> {
    host: H,
    viewport: H::Element,
    surface: H::Element,
}

impl<H: Host> Frame<H> {
    /// Binds `viewport` and `surface` inside `host`.
    ///
    /// When `surface` is `None`, the viewport's first element child is used.
    ///
    /// # Errors
    ///
    /// Fails if either handle is not an element, if no surface can be found,
    /// or if the surface is not a direct child of the viewport. The host is
    /// returned alongside the error.
    pub fn bind(
        host: H,
        viewport: H::Element,
        surface: Option<H::Element>,
    ) -> Result<Self, (H, BindError)> {
        if !host.is_element(viewport) {
            return Err((host, BindError::NotAnElement(FrameRole::Viewport)));
        }
        let surface = match surface.or_else(|| host.first_element_child(viewport)) {
            Some(surface) => surface,
            None => return Err((host, BindError::MissingSurface)),
        };
        if !host.is_element(surface) {
            return Err((host, BindError::NotAnElement(FrameRole::Surface)));
        }
        if host.parent(surface) != Some(viewport) {
            return Err((host, BindError::NotAChild));
        }
        Ok(Self {
            host,
            viewport,
            surface,
        })
    }

    /// The viewport element.
    #[must_use]
    pub fn viewport(&self) -> H::Element {
        self.viewport
    }

    /// The surface element.
    #[must_use]
    pub fn surface(&self) -> H::Element {
        self.surface
    }

    /// Shared access to the host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Exclusive access to the host.
    ///
    /// Mutating the viewport or surface behind the controller's back breaks
    /// its assumptions; this is meant for the rest of the document.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Gives the host back.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Size of the visible window.
    #[must_use]
    pub fn viewport_size(&self) -> Size {
        self.host.client_rect(self.viewport).size()
    }

    /// Page-space position of the viewport's top-left corner.
    #[must_use]
    pub fn viewport_origin(&self) -> Point {
        self.host.client_rect(self.viewport).origin()
    }

    /// Rendered (scaled) size of the surface.
    #[must_use]
    pub fn content_size(&self) -> Size {
        self.host.client_rect(self.surface).size()
    }

    /// Current scroll offset of the viewport.
    #[must_use]
    pub fn scroll_offset(&self) -> Vec2 {
        self.host.scroll_offset(self.viewport)
    }

    /// Scrolls the viewport.
    pub fn set_scroll_offset(&mut self, offset: Vec2) {
        self.host.set_scroll_offset(self.viewport, offset);
    }

    /// Allows or forbids user scrolling of the viewport.
    pub fn set_scrolling_enabled(&mut self, enabled: bool) {
        self.host.set_scrolling_enabled(self.viewport, enabled);
    }

    /// Layout offset of `element` within the viewport plus its rendered size.
    ///
    /// Returns `None` for nodes that are not elements or not inside the
    /// viewport.
    #[must_use]
    pub fn element_bounds(&self, element: H::Element) -> Option<(Point, Size)> {
        if !self.host.is_element(element) {
            return None;
        }
        let offset = self.host.layout_offset(element, self.viewport)?;
        Some((offset, self.host.client_rect(element).size()))
    }

    /// Applies a transform to the surface.
    pub fn apply_transform(&mut self, transform: SurfaceTransform, transition: Option<Transition>) {
        self.host.set_transform(self.surface, transform, transition);
    }

    /// Resizes the surface through layout (fallback path).
    pub fn apply_layout_zoom(&mut self, scale: f64) {
        self.host.set_layout_zoom(self.surface, scale);
    }
}
