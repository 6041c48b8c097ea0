// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface transforms and the transitions used to animate them.

use core::fmt;

use kurbo::{Affine, Point, Vec2};

/// A uniform scale followed by a translation, applied around an origin.
///
/// This mirrors the CSS pair `transform-origin: origin` +
/// `transform: scale(scale) translate(translate)`: the translation is
/// expressed in the scaled coordinate system, and the whole transform pivots
/// around `origin` in untransformed surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceTransform {
    /// Pivot point in untransformed surface coordinates.
    pub origin: Point,
    /// Uniform scale factor.
    pub scale: f64,
    /// Translation applied after scaling, in pre-scale units.
    pub translate: Vec2,
}

impl SurfaceTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        origin: Point::ORIGIN,
        scale: 1.0,
        translate: Vec2::ZERO,
    };

    /// Pure scale about the surface origin.
    #[must_use]
    pub const fn scale(scale: f64) -> Self {
        Self {
            origin: Point::ORIGIN,
            scale,
            translate: Vec2::ZERO,
        }
    }

    /// Creates a transform from all of its parts.
    #[must_use]
    pub const fn new(origin: Point, scale: f64, translate: Vec2) -> Self {
        Self {
            origin,
            scale,
            translate,
        }
    }

    /// Returns the equivalent affine map from surface to viewport-content space.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        let origin = self.origin.to_vec2();
        Affine::translate(origin)
            * Affine::scale(self.scale)
            * Affine::translate(self.translate)
            * Affine::translate(-origin)
    }
}

impl Default for SurfaceTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Formats the CSS `transform` value, e.g. `scale(2) translate(10px, 5px)`.
impl fmt::Display for SurfaceTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scale({}) translate({}px, {}px)",
            self.scale, self.translate.x, self.translate.y
        )
    }
}

/// Timing curve for a transition.
///
/// The variants correspond to the CSS named timing functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// CSS `ease`: quick start, gentle stop.
    #[default]
    Ease,
    /// CSS `ease-in`.
    EaseIn,
    /// CSS `ease-out`.
    EaseOut,
    /// CSS `ease-in-out`.
    EaseInOut,
}

impl Easing {
    /// The CSS keyword for this curve.
    #[must_use]
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Ease => "ease",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
        }
    }

    const fn control_points(self) -> Option<(f64, f64, f64, f64)> {
        match self {
            Self::Linear => None,
            Self::Ease => Some((0.25, 0.1, 0.25, 1.0)),
            Self::EaseIn => Some((0.42, 0.0, 1.0, 1.0)),
            Self::EaseOut => Some((0.0, 0.0, 0.58, 1.0)),
            Self::EaseInOut => Some((0.42, 0.0, 0.58, 1.0)),
        }
    }

    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    ///
    /// Hosts that interpolate transforms themselves (canvas renderers, tests)
    /// can use this; hosts backed by CSS pass [`Easing::css_name`] through
    /// instead. Inputs outside `[0, 1]` are clamped.
    #[must_use]
    pub fn sample(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self.control_points() {
            None => t,
            Some((x1, y1, x2, y2)) => cubic(solve_param(t, x1, x2), y1, y2),
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

/// One-dimensional cubic Bézier with fixed end points `0` and `1`.
fn cubic(u: f64, p1: f64, p2: f64) -> f64 {
    let v = 1.0 - u;
    3.0 * v * v * u * p1 + 3.0 * v * u * u * p2 + u * u * u
}

fn cubic_slope(u: f64, p1: f64, p2: f64) -> f64 {
    let v = 1.0 - u;
    3.0 * v * v * p1 + 6.0 * v * u * (p2 - p1) + 3.0 * u * u * (1.0 - p2)
}

/// Finds the curve parameter whose x coordinate is `x`.
fn solve_param(x: f64, x1: f64, x2: f64) -> f64 {
    const EPSILON: f64 = 1e-7;

    // Newton first; it converges in a handful of steps for the CSS curves.
    let mut u = x;
    for _ in 0..8 {
        let err = cubic(u, x1, x2) - x;
        if err.abs() < EPSILON {
            return u;
        }
        let slope = cubic_slope(u, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        u -= err / slope;
    }

    // Flat spots: fall back to bisection, x(u) is monotonic on [0, 1].
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    u = x;
    for _ in 0..48 {
        let value = cubic(u, x1, x2);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = u;
        } else {
            hi = u;
        }
        u = (lo + hi) / 2.0;
    }
    u
}

/// An animated change of a surface transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// How long the animation runs.
    pub duration_ms: u64,
    /// Timing curve.
    pub easing: Easing,
}

/// Formats the CSS `transition` value, e.g. `transform 400ms ease`.
impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transform {}ms {}", self.duration_ms, self.easing)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::ToString;

    use kurbo::{Point, Vec2};

    use super::{Easing, SurfaceTransform, Transition};

    fn assert_close(a: Point, b: Point) {
        assert!((a - b).hypot() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn pure_scale_maps_about_origin() {
        let t = SurfaceTransform::scale(2.0);
        assert_close(t.to_affine() * Point::new(10.0, 5.0), Point::new(20.0, 10.0));
    }

    #[test]
    fn origin_is_a_fixed_point_without_translation() {
        let origin = Point::new(100.0, 50.0);
        let t = SurfaceTransform::new(origin, 3.0, Vec2::ZERO);
        assert_close(t.to_affine() * origin, origin);
    }

    #[test]
    fn translation_is_in_scaled_units() {
        let t = SurfaceTransform::new(Point::ORIGIN, 2.0, Vec2::new(5.0, 0.0));
        assert_close(t.to_affine() * Point::ORIGIN, Point::new(10.0, 0.0));
    }

    #[test]
    fn css_formatting() {
        let t = SurfaceTransform::new(Point::ORIGIN, 2.0, Vec2::new(10.0, -5.5));
        assert_eq!(t.to_string(), "scale(2) translate(10px, -5.5px)");
        let tr = Transition {
            duration_ms: 400,
            easing: Easing::Ease,
        };
        assert_eq!(tr.to_string(), "transform 400ms ease");
        assert_eq!(Easing::EaseInOut.to_string(), "ease-in-out");
    }

    #[test]
    fn easing_end_points_and_monotonicity() {
        for easing in [
            Easing::Linear,
            Easing::Ease,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert!(easing.sample(0.0).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.sample(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
            let mut last = 0.0;
            for i in 1..=20 {
                let v = easing.sample(f64::from(i) / 20.0);
                assert!(v + 1e-9 >= last, "{easing:?} is not monotonic");
                last = v;
            }
        }
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        let a = Easing::EaseInOut.sample(0.25);
        let b = Easing::EaseInOut.sample(0.75);
        assert!((a + b - 1.0).abs() < 1e-5, "{a} + {b} != 1");
        assert!((Easing::EaseInOut.sample(0.5) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn sample_clamps_input() {
        assert_eq!(Easing::Linear.sample(-1.0), 0.0);
        assert_eq!(Easing::Linear.sample(2.0), 1.0);
    }
}
