// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::transform::{Easing, Transition};

/// Tunables for a [`crate::ZoomPort`].
///
/// The defaults match a typical document preview: a 400 ms `ease`
/// transition, a 100 ms safety margin around it, 20 units of padding around
/// zoomed elements, and edge panning within the outer 12% of the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomConfig {
    /// Padding, in content units, added around an element target.
    pub default_padding: f64,
    /// Length of the animated part of a transition.
    pub transition_duration_ms: u64,
    /// Delay between the anchor transform and the animation start, also
    /// added to the duration to get the total wait.
    pub safety_margin_ms: u64,
    /// Timing curve of the animated transform.
    pub easing: Easing,
    /// Width of the edge band that triggers panning, as a fraction of the
    /// viewport dimension.
    pub pan_band: f64,
    /// Scroll distance per pan tick at full proximity, before dividing by
    /// the current scale.
    pub pan_speed: f64,
    /// Interval between pan ticks.
    pub pan_interval_ms: u64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            default_padding: 20.0,
            transition_duration_ms: 400,
            safety_margin_ms: 100,
            easing: Easing::Ease,
            pan_band: 0.12,
            pan_speed: 14.0,
            pan_interval_ms: 16,
        }
    }
}

impl ZoomConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the padding added around element targets.
    ///
    /// Negative or non-finite values are ignored.
    #[must_use]
    pub fn with_default_padding(mut self, padding: f64) -> Self {
        if padding.is_finite() && padding >= 0.0 {
            self.default_padding = padding;
        }
        self
    }

    /// Sets the transition duration and timing curve.
    #[must_use]
    pub fn with_transition(mut self, duration_ms: u64, easing: Easing) -> Self {
        self.transition_duration_ms = duration_ms;
        self.easing = easing;
        self
    }

    /// Sets the safety margin around transitions.
    #[must_use]
    pub fn with_safety_margin(mut self, margin_ms: u64) -> Self {
        self.safety_margin_ms = margin_ms;
        self
    }

    /// Sets the edge-pan band (fraction of the viewport) and speed.
    ///
    /// Values that are not finite and positive are ignored.
    #[must_use]
    pub fn with_panning(mut self, band: f64, speed: f64) -> Self {
        if band.is_finite() && band > 0.0 {
            self.pan_band = band;
        }
        if speed.is_finite() && speed > 0.0 {
            self.pan_speed = speed;
        }
        self
    }

    /// Sets the interval between pan ticks. Zero is raised to one millisecond.
    #[must_use]
    pub fn with_pan_interval(mut self, interval_ms: u64) -> Self {
        self.pan_interval_ms = interval_ms.max(1);
        self
    }

    /// Transition duration plus the safety margin.
    ///
    /// This is when a transition's callback fires, how long a transition
    /// blocks new requests, and how long panning waits before engaging.
    #[must_use]
    pub fn total_wait_ms(&self) -> u64 {
        self.transition_duration_ms
            .saturating_add(self.safety_margin_ms)
    }

    /// The transition applied to the animated transform.
    #[must_use]
    pub fn transition(&self) -> Transition {
        Transition {
            duration_ms: self.transition_duration_ms,
            easing: self.easing,
        }
    }
}
