// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-time capability probe shared by every controller on a page.

use alloc::rc::Rc;
use core::cell::Cell;
use core::fmt;

use crate::host::Host;

/// How zoom changes are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// The host transforms the surface; transitions can be animated and
    /// target regions are fitted to the viewport before zooming.
    Transform,
    /// The host resizes the surface through layout. Zoom changes are applied
    /// at once and target regions are used as given.
    Layout,
}

impl Strategy {
    /// Returns `true` if target regions are aspect-fitted and clamped.
    #[must_use]
    pub fn fits_regions(self) -> bool {
        matches!(self, Self::Transform)
    }

    /// Returns `true` if transitions can be animated.
    #[must_use]
    pub fn can_animate(self) -> bool {
        matches!(self, Self::Transform)
    }
}

/// Shared handle to the probed rendering capabilities.
///
/// Create one per page, hand clones to every controller, and call
/// [`Environment::probe`] once the rendering surface is ready. Controllers
/// created before the probe keep working on [`Strategy::Layout`] and pick up
/// the probed strategy as soon as it is known.
#[derive(Clone, Default)]
pub struct Environment {
    strategy: Rc<Cell<Option<Strategy>>>,
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("strategy", &self.strategy.get())
            .finish()
    }
}

impl Environment {
    /// Creates an unprobed environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an environment with a fixed strategy, skipping the probe.
    #[must_use]
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self {
            strategy: Rc::new(Cell::new(Some(strategy))),
        }
    }

    /// Probes `host` for transform support and records the result.
    ///
    /// Only the first call probes; later calls return the recorded strategy.
    pub fn probe<H: Host>(&self, host: &H) -> Strategy {
        if let Some(strategy) = self.strategy.get() {
            return strategy;
        }
        let strategy = if host.supports_transforms() {
            Strategy::Transform
        } else {
            Strategy::Layout
        };
        tracing::debug!(?strategy, "zoom environment probed");
        self.strategy.set(Some(strategy));
        strategy
    }

    /// Returns `true` once [`Environment::probe`] has run.
    #[must_use]
    pub fn is_probed(&self) -> bool {
        self.strategy.get().is_some()
    }

    /// The strategy in effect, [`Strategy::Layout`] until probed.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy.get().unwrap_or(Strategy::Layout)
    }
}

/// A capability the environment does not provide was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapabilityError {
    /// Animated transitions need transform support.
    TransformsUnsupported,
}

impl fmt::Display for CapabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransformsUnsupported => {
                f.write_str("animated transitions need transform support")
            }
        }
    }
}

impl core::error::Error for CapabilityError {}
