// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The zoom controller.

use core::fmt;

use kurbo::{Point, Vec2};
use understory_timing::{TimerId, TimerQueue};

use crate::config::ZoomConfig;
use crate::environment::{CapabilityError, Environment};
use crate::host::{BindError, Frame, Host};
use crate::panner::{EdgePanner, PointerState};
use crate::region::Region;
use crate::request::{Callback, ElementTarget, Measurements, ZoomRequest, ZoomTarget, resolve};
use crate::scheduler::{TransitionPhase, TransitionScheduler};

/// Payload of every timer a controller schedules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ZoomTimer {
    /// Start the animated transform after the safety margin.
    Animate,
    /// Pin the final transform once the transition has run.
    Settle,
    /// Run the callback of the last accepted request.
    Callback,
    /// Start edge panning.
    PanEngage,
    /// One edge-panning step.
    PanTick,
}

/// Mutable per-controller state shared with the scheduler and the panner.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ZoomState {
    pub(crate) scale: f64,
    pub(crate) transitions_on: bool,
    pub(crate) panning_on: bool,
    /// Latest time passed to [`ZoomPort::advance`].
    pub(crate) now: u64,
    pub(crate) pointer: PointerState,
}

/// Why [`ZoomPort::to`] left the view alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The request named no element, region, scale or padding.
    NoTarget,
    /// The resolved scale was not a finite, positive number.
    InvalidScale,
    /// An animated transition is still running.
    TransitionInFlight,
}

/// Result of [`ZoomPort::to`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomOutcome {
    /// The request was accepted and the controller is now at `scale`.
    Committed {
        /// The new scale.
        scale: f64,
    },
    /// The request was dropped without any state change.
    Ignored(IgnoreReason),
}

impl ZoomOutcome {
    /// Returns `true` if the request was accepted.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Zoom and edge-pan controller for one viewport/surface pair.
///
/// The controller never reads a clock. Hosts pass the current time to
/// [`ZoomPort::advance`] and use [`ZoomPort::next_deadline`] to know when
/// to call it again. Every timer-driven step (the stages of an animated
/// transition, request callbacks and edge-pan ticks) runs from inside
/// `advance`.
pub struct ZoomPort<H: Host> {
    frame: Frame<H>,
    environment: Environment,
    config: ZoomConfig,
    state: ZoomState,
    timers: TimerQueue<ZoomTimer>,
    scheduler: TransitionScheduler,
    panner: EdgePanner,
    callback: Option<(TimerId, Callback)>,
}

impl<H: Host> fmt::Debug for ZoomPort<H>
where
    H: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoomPort")
            .field("frame", &self.frame)
            .field("environment", &self.environment)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("timers", &self.timers.len())
            .field("scheduler", &self.scheduler)
            .field("panner", &self.panner)
            .field("callback", &self.callback.as_ref().map(|(id, _)| *id))
            .finish()
    }
}

impl<H: Host> ZoomPort<H> {
    /// Binds a controller to `viewport` and `surface` inside `host`.
    ///
    /// When `surface` is `None` the viewport's first element child is used.
    /// The viewport is made scrollable and scrolled to the origin, then
    /// `initial` (if any) is applied as a first [`ZoomPort::to`] call.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] if the pair cannot be bound. The error is also
    /// logged; no controller is created and the host is dropped.
    pub fn create(
        host: H,
        viewport: H::Element,
        surface: Option<H::Element>,
        environment: &Environment,
        config: ZoomConfig,
        initial: Option<ZoomRequest<H::Element>>,
    ) -> Result<Self, BindError> {
        match Frame::bind(host, viewport, surface) {
            Ok(frame) => Ok(Self::with_frame(frame, environment, config, initial)),
            Err((_, err)) => {
                tracing::error!(?viewport, ?surface, %err, "cannot create zoom controller");
                Err(err)
            }
        }
    }

    /// Builds a controller around an already bound frame.
    pub fn with_frame(
        frame: Frame<H>,
        environment: &Environment,
        config: ZoomConfig,
        initial: Option<ZoomRequest<H::Element>>,
    ) -> Self {
        let mut port = Self {
            frame,
            environment: environment.clone(),
            config,
            state: ZoomState {
                scale: 1.0,
                transitions_on: false,
                panning_on: false,
                now: 0,
                pointer: PointerState::default(),
            },
            timers: TimerQueue::new(),
            scheduler: TransitionScheduler::new(),
            panner: EdgePanner::default(),
            callback: None,
        };
        port.frame.set_scrolling_enabled(true);
        port.frame.set_scroll_offset(Vec2::ZERO);
        if let Some(request) = initial {
            let _ = port.to(request);
        }
        port
    }

    /// Current scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    /// Zooms to `scale` around the current center.
    ///
    /// Values that are not finite and positive are ignored. Returns the
    /// scale in effect afterwards.
    pub fn set_scale(&mut self, scale: f64) -> f64 {
        if scale.is_finite() && scale > 0.0 {
            let _ = self.to(ZoomRequest::to_scale(scale));
        } else {
            tracing::debug!(scale, "ignoring invalid scale");
        }
        self.state.scale
    }

    /// The part of the content currently visible, in content coordinates.
    #[must_use]
    pub fn visible_region(&self) -> Region {
        self.measure().visible_region()
    }

    /// Whether zoom changes are animated.
    #[must_use]
    pub fn transitions_on(&self) -> bool {
        self.state.transitions_on
    }

    /// Turns animated transitions on or off.
    ///
    /// # Errors
    ///
    /// Enabling transitions fails with
    /// [`CapabilityError::TransformsUnsupported`] when the environment uses
    /// the layout fallback; transitions then stay off.
    pub fn set_transitions_on(&mut self, on: bool) -> Result<(), CapabilityError> {
        if on && !self.environment.strategy().can_animate() {
            tracing::warn!("transitions are not supported by this environment");
            self.state.transitions_on = false;
            return Err(CapabilityError::TransformsUnsupported);
        }
        self.state.transitions_on = on;
        Ok(())
    }

    /// Whether edge panning is enabled.
    #[must_use]
    pub fn panning_on(&self) -> bool {
        self.state.panning_on
    }

    /// Turns edge panning on or off.
    ///
    /// Panning engages after the total transition wait; turning it off
    /// stops it at once, including a pending engage.
    pub fn set_panning_on(&mut self, on: bool) {
        if on == self.state.panning_on {
            return;
        }
        self.state.panning_on = on;
        if on {
            self.panner
                .enable(&mut self.timers, self.state.now, &self.config);
        } else {
            self.panner.disable(&mut self.timers);
        }
    }

    /// Zooms as described by `request`.
    ///
    /// The request's `transitions_on`/`panning_on` flags are applied first,
    /// even when the zoom itself is ignored.
    pub fn to(&mut self, request: ZoomRequest<H::Element>) -> ZoomOutcome {
        if let Some(on) = request.transitions_on {
            let _ = self.set_transitions_on(on);
        }
        if let Some(on) = request.panning_on {
            self.set_panning_on(on);
        }

        let Some(target) = self.plan(&request) else {
            return self.ignore(IgnoreReason::NoTarget);
        };
        if !(target.scale.is_finite() && target.scale > 0.0) {
            return self.ignore(IgnoreReason::InvalidScale);
        }
        if self.scheduler.is_busy() {
            return self.ignore(IgnoreReason::TransitionInFlight);
        }

        let strategy = self.environment.strategy();
        let previous = self.state.scale;
        self.scheduler.begin(
            &mut self.frame,
            &mut self.timers,
            self.state.now,
            &self.config,
            strategy,
            self.state.transitions_on && strategy.can_animate(),
            previous,
            &target,
        );
        self.state.scale = target.scale;
        if target.scale <= 1.0 {
            self.state.pointer.clear();
        }

        if let Some((id, _)) = self.callback.take() {
            self.timers.cancel(id);
        }
        if let Some(callback) = request.callback {
            let id = self.timers.schedule_after(
                self.state.now,
                self.config.total_wait_ms(),
                ZoomTimer::Callback,
            );
            self.callback = Some((id, callback));
        }

        tracing::debug!(
            previous,
            scale = target.scale,
            ?strategy,
            region = ?target.region,
            "zoom committed"
        );
        ZoomOutcome::Committed {
            scale: target.scale,
        }
    }

    fn ignore(&self, reason: IgnoreReason) -> ZoomOutcome {
        tracing::debug!(?reason, scale = self.state.scale, "zoom request ignored");
        ZoomOutcome::Ignored(reason)
    }

    /// Resolves `request` against the current view without changing it.
    ///
    /// Returns `None` when the request has no target. The returned scale may
    /// be invalid, in which case [`ZoomPort::to`] would ignore the request.
    #[must_use]
    pub fn plan(&self, request: &ZoomRequest<H::Element>) -> Option<ZoomTarget> {
        let element = match request.element {
            None => ElementTarget::None,
            Some(el) if el == self.frame.viewport() || el == self.frame.surface() => {
                ElementTarget::Frame
            }
            Some(el) => match self.frame.element_bounds(el) {
                Some((offset, size)) => ElementTarget::Bounds(offset, size),
                None => {
                    tracing::debug!(element = ?el, "zoom element is not inside the viewport");
                    ElementTarget::None
                }
            },
        };
        resolve(request, element, &self.measure())
    }

    fn measure(&self) -> Measurements {
        Measurements {
            level: self.state.scale,
            viewport: self.frame.viewport_size(),
            scroll: self.frame.scroll_offset(),
            content: self.frame.content_size(),
            strategy: self.environment.strategy(),
            default_padding: self.config.default_padding,
        }
    }

    /// Zooms back to 100%, then runs `callback` once settled.
    pub fn out(&mut self, callback: Option<Callback>) -> ZoomOutcome {
        self.to(ZoomRequest::to_scale(1.0).with_boxed_callback(callback))
    }

    /// Zooms back to 100%.
    pub fn reset(&mut self) -> ZoomOutcome {
        self.out(None)
    }

    /// Records a pointer position in page space, for edge panning.
    ///
    /// Positions are only tracked while zoomed in, and zooming back to full
    /// size or below forgets the last one.
    pub fn pointer_moved(&mut self, position: Point) {
        if self.state.scale > 1.0 {
            self.state.pointer.observe(position);
        }
    }

    /// Runs every step that is due at `now`.
    ///
    /// Time never goes backwards; an earlier `now` than a previous call is
    /// treated as the previous time. A due callback runs last, after the
    /// transition step sharing its deadline.
    pub fn advance(&mut self, now: u64) {
        self.state.now = self.state.now.max(now);
        let mut ready = None;
        while let Some(expired) = self.timers.pop_due(self.state.now) {
            match expired.payload {
                ZoomTimer::Animate | ZoomTimer::Settle => self.scheduler.on_timer(
                    expired.id,
                    expired.deadline,
                    &mut self.frame,
                    &mut self.timers,
                    &self.config,
                ),
                ZoomTimer::Callback => {
                    if let Some((_, callback)) =
                        self.callback.take_if(|(id, _)| *id == expired.id)
                    {
                        ready = Some(callback);
                    }
                }
                ZoomTimer::PanEngage => self.panner.on_engage(
                    expired.id,
                    expired.deadline,
                    &mut self.timers,
                    &self.config,
                ),
                ZoomTimer::PanTick => self.panner.on_tick(
                    expired.id,
                    expired.deadline,
                    &mut self.frame,
                    &mut self.timers,
                    &self.state,
                    self.scheduler.is_busy(),
                    &self.config,
                ),
            }
        }
        if let Some(callback) = ready {
            callback();
        }
    }

    /// Time of the last [`ZoomPort::advance`] call.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.state.now
    }

    /// When [`ZoomPort::advance`] next has work to do, if ever.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Returns `true` while an animated transition is in flight.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.scheduler.is_busy()
    }

    /// Stage of the current transition.
    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.scheduler.phase()
    }

    /// Returns `true` once edge panning is ticking.
    #[must_use]
    pub fn is_panning_engaged(&self) -> bool {
        self.panner.is_engaged()
    }

    /// Returns `true` while edge panning waits to engage.
    #[must_use]
    pub fn is_panning_pending(&self) -> bool {
        self.panner.is_pending()
    }

    /// The bound viewport/surface pair.
    #[must_use]
    pub fn frame(&self) -> &Frame<H> {
        &self.frame
    }

    /// Shared access to the host.
    #[must_use]
    pub fn host(&self) -> &H {
        self.frame.host()
    }

    /// Exclusive access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        self.frame.host_mut()
    }

    /// The controller's configuration.
    #[must_use]
    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    /// The shared environment.
    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Stops every timer and hands the host back.
    ///
    /// Pending callbacks are dropped without running and the viewport is
    /// left scrollable. The applied transform and scroll offset stay as they
    /// are.
    pub fn dispose(mut self) -> H {
        self.scheduler.abandon(&mut self.frame, &mut self.timers);
        self.panner.disable(&mut self.timers);
        self.timers.clear();
        self.callback = None;
        self.frame.set_scrolling_enabled(true);
        tracing::debug!(scale = self.state.scale, "zoom controller disposed");
        self.frame.into_host()
    }
}
