// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition state machine: anchor, animate, settle.
//!
//! An animated zoom goes through three host updates:
//!
//! 1. **Anchor**, immediately: the transform origin moves to the new center.
//!    Moving the origin would make the picture jump, so the transform is
//!    re-expressed around the new origin with the *previous* scale. Nothing
//!    moves on screen.
//! 2. **Animate**, after the safety margin: user scrolling is disabled and
//!    the final scale is applied with a transition. The translation folds in
//!    the scroll offset the settled state will use, so the animation lands
//!    exactly where the settled view will be.
//! 3. **Settle**, after the transition duration: the transform is pinned to
//!    a plain scale without transition, the scroll offset is set to the
//!    exact target, dropping any drift the animation accumulated, and
//!    scrolling is re-enabled. The settle deadline is also the end of the
//!    total wait, so the controller is idle again once it has run.
//!
//! Non-animated zooms skip straight to the settled state.
//!
//! Switching strategies between zooms (a controller created before the
//! environment was probed) first undoes whatever the old strategy left on
//! the surface, so the surface is never scaled twice.

use kurbo::{Point, Vec2};
use understory_timing::{TimerId, TimerQueue};

use crate::config::ZoomConfig;
use crate::controller::ZoomTimer;
use crate::environment::Strategy;
use crate::host::{Frame, Host};
use crate::request::ZoomTarget;
use crate::transform::SurfaceTransform;

/// Observable state of the transition scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionPhase {
    /// No transition in flight; new requests are accepted.
    Idle,
    /// The anchor or animated transform is showing.
    Animating,
}

/// Everything needed to carry one zoom through its stages.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Magnify {
    /// Scale after the zoom.
    pub(crate) scale: f64,
    /// Center of the target region in content coordinates.
    pub(crate) center: Point,
    /// Center of the viewport in viewport coordinates.
    pub(crate) frame_center: Point,
    /// Scroll offset at the start of the zoom.
    pub(crate) scroll: Vec2,
    /// Scroll offset once settled.
    pub(crate) offset: Vec2,
}

impl Magnify {
    pub(crate) fn new<H: Host>(frame: &Frame<H>, target: &ZoomTarget) -> Self {
        let viewport = frame.viewport_size();
        let frame_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        let center = target.region.center();
        let scale = target.scale;
        Self {
            scale,
            center,
            frame_center,
            scroll: frame.scroll_offset(),
            offset: center.to_vec2() * scale - frame_center.to_vec2(),
        }
    }

    /// Same picture as a plain `scale(previous)`, pivoting on the new center.
    pub(crate) fn anchor_transform(&self, previous: f64) -> SurfaceTransform {
        SurfaceTransform::new(
            self.center,
            previous,
            self.center.to_vec2() * (1.0 - 1.0 / previous),
        )
    }

    /// The animated end state, seen through the unchanged starting scroll.
    pub(crate) fn animated_transform(&self) -> SurfaceTransform {
        let s = self.scale;
        let translate = (self.center.to_vec2() * (s - 1.0) - (self.offset - self.scroll)) / s;
        SurfaceTransform::new(self.center, s, translate)
    }

    /// A plain `scale(s)` expressed around the frame center.
    pub(crate) fn settled_transform(&self) -> SurfaceTransform {
        let s = self.scale;
        SurfaceTransform::new(
            self.frame_center,
            s,
            self.frame_center.to_vec2() * (1.0 - 1.0 / s),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Stage {
    Idle,
    /// Anchor applied, waiting for the safety margin.
    Anchored { plan: Magnify, timer: TimerId },
    /// Animated transform applied, waiting for the duration.
    Moving { plan: Magnify, timer: TimerId },
}

/// Serializes zoom transitions; at most one is ever in flight.
#[derive(Debug)]
pub(crate) struct TransitionScheduler {
    stage: Stage,
    /// Strategy the surface was last zoomed with.
    rendered: Option<Strategy>,
}

impl TransitionScheduler {
    pub(crate) fn new() -> Self {
        Self {
            stage: Stage::Idle,
            rendered: None,
        }
    }

    pub(crate) fn phase(&self) -> TransitionPhase {
        match self.stage {
            Stage::Idle => TransitionPhase::Idle,
            Stage::Anchored { .. } | Stage::Moving { .. } => TransitionPhase::Animating,
        }
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.stage != Stage::Idle
    }

    /// Starts a transition from `previous` to `target.scale`.
    ///
    /// Callers check [`TransitionScheduler::is_busy`] first.
    pub(crate) fn begin<H: Host>(
        &mut self,
        frame: &mut Frame<H>,
        timers: &mut TimerQueue<ZoomTimer>,
        now: u64,
        config: &ZoomConfig,
        strategy: Strategy,
        animate: bool,
        previous: f64,
        target: &ZoomTarget,
    ) {
        debug_assert!(!self.is_busy(), "transitions never overlap");
        let plan = Magnify::new(frame, target);
        match self.rendered.replace(strategy) {
            Some(Strategy::Layout) if strategy != Strategy::Layout => {
                frame.apply_layout_zoom(1.0);
                tracing::debug!("layout zoom cleared after strategy change");
            }
            Some(Strategy::Transform) if strategy != Strategy::Transform => {
                frame.apply_transform(SurfaceTransform::IDENTITY, None);
                tracing::debug!("transform cleared after strategy change");
            }
            _ => {}
        }
        match strategy {
            Strategy::Layout => {
                frame.apply_layout_zoom(plan.scale);
                frame.set_scroll_offset(plan.offset);
            }
            Strategy::Transform if !animate => {
                frame.apply_transform(SurfaceTransform::scale(plan.scale), None);
                frame.set_scroll_offset(plan.offset);
            }
            Strategy::Transform => {
                frame.apply_transform(plan.anchor_transform(previous), None);
                let timer = timers.schedule_after(now, config.safety_margin_ms, ZoomTimer::Animate);
                self.stage = Stage::Anchored { plan, timer };
                tracing::trace!(scale = plan.scale, "zoom transition anchored");
            }
        }
    }

    /// Advances the state machine when one of its timers expires.
    pub(crate) fn on_timer<H: Host>(
        &mut self,
        id: TimerId,
        deadline: u64,
        frame: &mut Frame<H>,
        timers: &mut TimerQueue<ZoomTimer>,
        config: &ZoomConfig,
    ) {
        match self.stage {
            Stage::Anchored { plan, timer } if timer == id => {
                frame.set_scrolling_enabled(false);
                frame.apply_transform(plan.animated_transform(), Some(config.transition()));
                let timer =
                    timers.schedule_after(deadline, config.transition_duration_ms, ZoomTimer::Settle);
                self.stage = Stage::Moving { plan, timer };
                tracing::trace!(scale = plan.scale, "zoom transition animating");
            }
            Stage::Moving { plan, timer } if timer == id => {
                frame.apply_transform(plan.settled_transform(), None);
                frame.set_scroll_offset(plan.offset);
                frame.set_scrolling_enabled(true);
                self.stage = Stage::Idle;
                tracing::trace!(scale = plan.scale, "zoom transition settled");
            }
            _ => {
                tracing::trace!(?id, "stale transition timer ignored");
            }
        }
    }

    /// Drops any in-flight transition, leaving the frame scrollable.
    pub(crate) fn abandon<H: Host>(&mut self, frame: &mut Frame<H>, timers: &mut TimerQueue<ZoomTimer>) {
        match self.stage {
            Stage::Anchored { timer, .. } | Stage::Moving { timer, .. } => {
                timers.cancel(timer);
                frame.set_scrolling_enabled(true);
            }
            Stage::Idle => {}
        }
        self.stage = Stage::Idle;
    }
}
