// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoom requests and their resolution into a target scale and region.

use alloc::boxed::Box;
use core::fmt;

use kurbo::{Point, Size, Vec2};

use crate::environment::Strategy;
use crate::region::Region;

/// Invoked once a zoom transition has had its total wait time to finish.
pub type Callback = Box<dyn FnOnce()>;

/// A single call to [`crate::ZoomPort::to`].
///
/// A request names one target: an element, an explicit region, or a scale.
/// When several are given, an element wins over coordinates and an explicit
/// scale wins over `width`/`height`. Invalid numbers (non-finite values,
/// non-positive scales or extents, negative padding) are ignored field by
/// field.
///
/// ```rust
/// use understory_zoomport::ZoomRequest;
///
/// // Zoom so that a 200x100 area at (40, 40) fills the viewport, with no
/// // padding and panning enabled once the transition is done.
/// let request: ZoomRequest<u32> = ZoomRequest::to_region(40.0, 40.0, 200.0, 100.0)
///     .with_panning(true);
/// assert!(request.has_target());
/// ```
pub struct ZoomRequest<E> {
    pub(crate) element: Option<E>,
    pub(crate) x: Option<f64>,
    pub(crate) y: Option<f64>,
    pub(crate) width: Option<f64>,
    pub(crate) height: Option<f64>,
    pub(crate) scale: Option<f64>,
    pub(crate) padding: Option<f64>,
    pub(crate) callback: Option<Callback>,
    pub(crate) transitions_on: Option<bool>,
    pub(crate) panning_on: Option<bool>,
}

impl<E> Default for ZoomRequest<E> {
    fn default() -> Self {
        Self {
            element: None,
            x: None,
            y: None,
            width: None,
            height: None,
            scale: None,
            padding: None,
            callback: None,
            transitions_on: None,
            panning_on: None,
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for ZoomRequest<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoomRequest")
            .field("element", &self.element)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("scale", &self.scale)
            .field("padding", &self.padding)
            .field("callback", &self.callback.is_some())
            .field("transitions_on", &self.transitions_on)
            .field("panning_on", &self.panning_on)
            .finish()
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

fn positive(v: f64) -> Option<f64> {
    (v.is_finite() && v > 0.0).then_some(v)
}

impl<E> ZoomRequest<E> {
    /// An empty request. It only has an effect once a target or a flag is set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Zoom to fit `element`, with the configured default padding.
    #[must_use]
    pub fn to_element(element: E) -> Self {
        Self::new().with_element(element)
    }

    /// Zoom to fit the given content-space rectangle.
    #[must_use]
    pub fn to_region(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new()
            .with_x(x)
            .with_y(y)
            .with_width(width)
            .with_height(height)
    }

    /// Zoom to `scale`, keeping the current center.
    #[must_use]
    pub fn to_scale(scale: f64) -> Self {
        Self::new().with_scale(scale)
    }

    /// Sets the element target.
    #[must_use]
    pub fn with_element(mut self, element: E) -> Self {
        self.element = Some(element);
        self
    }

    /// Sets the left edge of the target region.
    #[must_use]
    pub fn with_x(mut self, x: f64) -> Self {
        self.x = finite(x);
        self
    }

    /// Sets the top edge of the target region.
    #[must_use]
    pub fn with_y(mut self, y: f64) -> Self {
        self.y = finite(y);
        self
    }

    /// Sets the width of the target region.
    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = positive(width);
        self
    }

    /// Sets the height of the target region.
    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = positive(height);
        self
    }

    /// Sets an explicit scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = positive(scale);
        self
    }

    /// Sets the padding added around the target region on every side.
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = (padding.is_finite() && padding >= 0.0).then_some(padding);
        self
    }

    /// Sets a callback to run once the zoom has settled.
    #[must_use]
    pub fn with_callback(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Sets an already boxed callback, or clears it.
    #[must_use]
    pub fn with_boxed_callback(mut self, callback: Option<Callback>) -> Self {
        self.callback = callback;
        self
    }

    /// Turns animated transitions on or off before zooming.
    #[must_use]
    pub fn with_transitions(mut self, on: bool) -> Self {
        self.transitions_on = Some(on);
        self
    }

    /// Turns edge panning on or off before zooming.
    #[must_use]
    pub fn with_panning(mut self, on: bool) -> Self {
        self.panning_on = Some(on);
        self
    }

    /// Returns `true` if the request names something to zoom to.
    #[must_use]
    pub fn has_target(&self) -> bool {
        self.element.is_some()
            || self.x.is_some()
            || self.y.is_some()
            || self.width.is_some()
            || self.height.is_some()
            || self.scale.is_some()
            || self.padding.is_some()
    }
}

/// Where a request will take the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTarget {
    /// Scale after the zoom. May be invalid; the controller rejects those.
    pub scale: f64,
    /// Content-space region the zoom centers on.
    pub region: Region,
}

/// How the request's element relates to the bound frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ElementTarget {
    /// No usable element.
    None,
    /// The viewport or surface itself, meaning "everything at 100%".
    Frame,
    /// Layout offset within the viewport and rendered size.
    Bounds(Point, Size),
}

/// Measurements a request is resolved against.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Measurements {
    pub(crate) level: f64,
    pub(crate) viewport: Size,
    pub(crate) scroll: Vec2,
    pub(crate) content: Size,
    pub(crate) strategy: Strategy,
    pub(crate) default_padding: f64,
}

impl Measurements {
    pub(crate) fn visible_region(&self) -> Region {
        Region::new(
            self.scroll.x,
            self.scroll.y,
            self.viewport.width,
            self.viewport.height,
        )
        .scaled(1.0 / self.level)
    }
}

/// Resolves a request into a target scale and region.
///
/// Returns `None` when the request has no target at all.
pub(crate) fn resolve<E>(
    request: &ZoomRequest<E>,
    element: ElementTarget,
    m: &Measurements,
) -> Option<ZoomTarget> {
    let has_target = element != ElementTarget::None
        || request.x.is_some()
        || request.y.is_some()
        || request.width.is_some()
        || request.height.is_some()
        || request.scale.is_some()
        || request.padding.is_some();
    if !has_target {
        return None;
    }

    let mut scale = None;
    let mut padding = 0.0;
    let mut region = m.visible_region();

    if let ElementTarget::Bounds(offset, size) = element {
        padding = m.default_padding;
        // Rendered sizes include the current transform.
        let size = if m.strategy.fits_regions() {
            Size::new(size.width / m.level, size.height / m.level)
        } else {
            size
        };
        region = Region::new(offset.x, offset.y, size.width, size.height);
    } else {
        scale = if element == ElementTarget::Frame {
            Some(1.0)
        } else {
            request.scale
        };
        if let Some(s) = scale {
            region = Region::from_center(
                region.center(),
                Size::new(m.viewport.width / s, m.viewport.height / s),
            );
        }
        if let Some(x) = request.x {
            region.x = x;
        }
        if let Some(y) = request.y {
            region.y = y;
        }
        if scale.is_none() && (request.width.is_some() || request.height.is_some()) {
            region.width = request.width.unwrap_or(1.0);
            region.height = request.height.unwrap_or(1.0);
        }
    }

    if let Some(p) = request.padding {
        padding = p;
    }
    region = region.padded(padding);

    if m.strategy.fits_regions() {
        region = region
            .fit_aspect(m.viewport.width / m.viewport.height)
            .clamp_to_bounds(m.content.width / m.level, m.content.height / m.level);
    }

    let scale = scale.unwrap_or_else(|| {
        (m.viewport.width / region.width).min(m.viewport.height / region.height)
    });
    Some(ZoomTarget { scale, region })
}
