// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge panning: scroll toward the viewport edge the pointer is close to.

use kurbo::{Point, Size, Vec2};
use understory_timing::{TimerId, TimerQueue};

use crate::config::ZoomConfig;
use crate::controller::{ZoomState, ZoomTimer};
use crate::host::{Frame, Host};

/// Last pointer position seen by a controller, in page space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    last: Option<Point>,
}

impl PointerState {
    /// Records a pointer position.
    pub fn observe(&mut self, position: Point) {
        self.last = Some(position);
    }

    /// The last recorded position, if any.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        self.last
    }

    /// Forgets the recorded position.
    pub fn clear(&mut self) {
        self.last = None;
    }
}

/// Scroll nudge for a pointer at `pointer` (relative to the viewport's
/// top-left corner) in a viewport of size `viewport`.
///
/// Each axis is handled independently. Within `band * extent` of an edge
/// the nudge grows linearly from zero at the inner border of the band to
/// `speed / scale` at the edge itself. Pointers outside the viewport, or
/// outside every band, produce no nudge on that axis.
#[must_use]
pub fn edge_pan_delta(pointer: Vec2, viewport: Size, scale: f64, band: f64, speed: f64) -> Vec2 {
    let step = speed / scale;
    Vec2::new(
        axis_delta(pointer.x, viewport.width, viewport.width * band, step),
        axis_delta(pointer.y, viewport.height, viewport.height * band, step),
    )
}

fn axis_delta(pos: f64, extent: f64, band: f64, step: f64) -> f64 {
    if !(band > 0.0) || !step.is_finite() {
        return 0.0;
    }
    if pos > 0.0 && pos < band {
        -(1.0 - pos / band) * step
    } else if pos > extent - band && pos < extent {
        (1.0 - (extent - pos) / band) * step
    } else {
        0.0
    }
}

/// Engage/tick bookkeeping for edge panning.
#[derive(Debug, Default)]
pub(crate) struct EdgePanner {
    engage: Option<TimerId>,
    tick: Option<TimerId>,
}

impl EdgePanner {
    /// Schedules the first tick after the total wait, so that panning does not
    /// fight a zoom that is just starting.
    pub(crate) fn enable(&mut self, timers: &mut TimerQueue<ZoomTimer>, now: u64, config: &ZoomConfig) {
        if self.engage.is_some() || self.tick.is_some() {
            return;
        }
        self.engage = Some(timers.schedule_after(now, config.total_wait_ms(), ZoomTimer::PanEngage));
    }

    /// Cancels both the pending engage and the running tick.
    pub(crate) fn disable(&mut self, timers: &mut TimerQueue<ZoomTimer>) {
        timers.cancel_slot(&mut self.engage);
        timers.cancel_slot(&mut self.tick);
    }

    pub(crate) fn is_engaged(&self) -> bool {
        self.tick.is_some()
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.engage.is_some()
    }

    pub(crate) fn on_engage(
        &mut self,
        id: TimerId,
        deadline: u64,
        timers: &mut TimerQueue<ZoomTimer>,
        config: &ZoomConfig,
    ) {
        if self.engage != Some(id) {
            return;
        }
        self.engage = None;
        self.tick = Some(schedule_tick(timers, deadline, config));
        tracing::debug!("edge panning engaged");
    }

    /// Runs one tick and schedules the next.
    ///
    /// Ticks during a transition only reschedule; panning resumes once the
    /// transition has settled. A tick that runs late does not replay the ticks
    /// it missed: the next one is counted from the current time instead.
    pub(crate) fn on_tick<H: Host>(
        &mut self,
        id: TimerId,
        deadline: u64,
        frame: &mut Frame<H>,
        timers: &mut TimerQueue<ZoomTimer>,
        state: &ZoomState,
        transitioning: bool,
        config: &ZoomConfig,
    ) {
        if self.tick != Some(id) {
            return;
        }
        let interval = config.pan_interval_ms.max(1);
        let from = if deadline.saturating_add(interval) <= state.now {
            state.now
        } else {
            deadline
        };
        self.tick = Some(schedule_tick(timers, from, config));

        if transitioning || state.scale <= 1.0 {
            return;
        }
        let Some(pointer) = state.pointer.position() else {
            return;
        };
        let relative = pointer - frame.viewport_origin();
        let delta = edge_pan_delta(
            relative,
            frame.viewport_size(),
            state.scale,
            config.pan_band,
            config.pan_speed,
        );
        if delta != Vec2::ZERO {
            let scroll = frame.scroll_offset();
            frame.set_scroll_offset(scroll + delta);
        }
    }
}

fn schedule_tick(timers: &mut TimerQueue<ZoomTimer>, from: u64, config: &ZoomConfig) -> TimerId {
    timers.schedule_after(from, config.pan_interval_ms.max(1), ZoomTimer::PanTick)
}
