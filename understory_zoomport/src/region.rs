// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size};

/// Axis-aligned rectangle in unscaled content coordinates.
///
/// Content coordinates are the surface's own pixels before any zoom is
/// applied, so a region keeps describing the same part of the content no
/// matter what the current scale is.
///
/// Width and height are expected to be non-negative. Zero-area regions are
/// accepted everywhere and stay zero-area.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Region {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Region {
    /// Creates a region from its origin and extents.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a region with the given `size` centered on `center`.
    #[must_use]
    pub fn from_center(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    /// Center point of the region.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Bounding rectangle (`left`, `top`, `right`, `bottom`).
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.x + self.width,
            self.y + self.height,
        )
    }

    /// Extents of the region.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Width divided by height.
    ///
    /// Not finite for regions without height.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Expands every edge outward by `padding`.
    #[must_use]
    pub fn padded(&self, padding: f64) -> Self {
        Self::new(
            self.x - padding,
            self.y - padding,
            self.width + padding * 2.0,
            self.height + padding * 2.0,
        )
    }

    /// Grows the shorter dimension so that `width / height == target_aspect`.
    ///
    /// A region that is too wide grows in height, one that is too tall grows
    /// in width. The center stays fixed. Non-finite or non-positive aspects
    /// leave the region untouched, as do regions whose own aspect is
    /// undefined (zero area).
    #[must_use]
    pub fn fit_aspect(&self, target_aspect: f64) -> Self {
        if !target_aspect.is_finite() || target_aspect <= 0.0 {
            return *self;
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return *self;
        }
        let current = self.aspect_ratio();
        let mut out = *self;
        if target_aspect < current {
            let height = self.width / target_aspect;
            out.y += (self.height - height) / 2.0;
            out.height = height;
        } else if target_aspect > current {
            let width = self.height * target_aspect;
            out.x += (self.width - width) / 2.0;
            out.width = width;
        }
        out
    }

    /// Translates the region so it lies within `[0, content_width] x [0, content_height]`.
    ///
    /// Clamping never resizes. On each axis a region sticking out before the
    /// origin moves to the origin; one sticking out past the far edge moves
    /// back by the overflow, but not past the origin. A region larger than the
    /// content therefore ends up aligned with the origin. Applying the clamp
    /// twice gives the same result as applying it once.
    #[must_use]
    pub fn clamp_to_bounds(&self, content_width: f64, content_height: f64) -> Self {
        Self::new(
            clamp_axis(self.x, self.width, content_width),
            clamp_axis(self.y, self.height, content_height),
            self.width,
            self.height,
        )
    }

    /// Returns the region scaled by `factor` about the content origin.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }
}

impl From<Region> for Rect {
    fn from(region: Region) -> Self {
        region.rect()
    }
}

fn clamp_axis(start: f64, extent: f64, limit: f64) -> f64 {
    if start < 0.0 {
        0.0
    } else if start + extent > limit {
        let overflow = start + extent - limit;
        start - overflow.min(start)
    } else {
        start
    }
}
