// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_zoomport --heading-base-level=0

//! Understory Zoomport: zoom and edge-pan controller for a scrollable viewport.
//!
//! A zoomport is a fixed-size, scrollable **viewport** with a single
//! **surface** child holding the content. [`ZoomPort`] zooms the surface to
//! a scale, to an explicit region, or to fit an element, keeps the scroll
//! offset in step so that the target ends up centered, and optionally
//! scrolls toward whichever edge the pointer approaches.
//!
//! The controller does not render anything itself. It drives a [`Host`],
//! which owns the actual tree of elements:
//! - Measurements come from the host: rendered rects, layout offsets, the
//!   scroll offset.
//! - Mutations go back through it: transforms with optional transitions,
//!   scroll offsets, the scrolling-enabled flag, and the layout-zoom
//!   fallback.
//! - Time is host-driven too. Call [`ZoomPort::advance`] with the current
//!   time in milliseconds and wake up again at [`ZoomPort::next_deadline`].
//!
//! Whether zooms can be animated depends on the host. An [`Environment`] is
//! probed once per page and shared by all controllers; hosts without
//! transform support get [`Strategy::Layout`], which resizes the surface
//! instead and never animates.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Size, Vec2};
//! use understory_zoomport::headless::HeadlessDocument;
//! use understory_zoomport::{Environment, Region, ZoomConfig, ZoomPort, ZoomRequest};
//!
//! let (doc, viewport, surface) =
//!     HeadlessDocument::preview(Size::new(800.0, 600.0), Size::new(2000.0, 1500.0));
//!
//! let env = Environment::new();
//! env.probe(&doc);
//!
//! let mut port =
//!     ZoomPort::create(doc, viewport, Some(surface), &env, ZoomConfig::default(), None).unwrap();
//!
//! // Zoom in around the current center.
//! port.to(ZoomRequest::to_scale(2.0));
//! assert_eq!(port.scale(), 2.0);
//! assert_eq!(port.visible_region(), Region::new(200.0, 150.0, 400.0, 300.0));
//! assert_eq!(port.frame().scroll_offset(), Vec2::new(400.0, 300.0));
//!
//! // Animated zooms run from `advance`.
//! port.set_transitions_on(true).unwrap();
//! port.reset();
//! assert!(port.is_transitioning());
//! while let Some(deadline) = port.next_deadline() {
//!     port.advance(deadline);
//! }
//! assert_eq!(port.scale(), 1.0);
//! assert!(!port.is_transitioning());
//! ```
//!
//! ## Targets
//!
//! [`ZoomRequest`] selects where to go. An element wins over coordinates:
//! its layout box, padded by [`ZoomConfig::default_padding`], becomes the
//! target region. Otherwise an explicit scale keeps the current center, and
//! `x`/`y`/`width`/`height` describe a region directly. With transforms
//! available, regions are widened to the viewport's aspect ratio and shifted
//! back inside the content before the scale is derived from them.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod controller;
mod environment;
pub mod headless;
mod host;
mod panner;
mod region;
mod request;
mod scheduler;
mod transform;

pub use config::ZoomConfig;
pub use controller::{IgnoreReason, ZoomOutcome, ZoomPort};
pub use environment::{CapabilityError, Environment, Strategy};
pub use host::{BindError, Frame, FrameRole, Host};
pub use panner::{PointerState, edge_pan_delta};
pub use region::Region;
pub use request::{Callback, ZoomRequest, ZoomTarget};
pub use scheduler::TransitionPhase;
pub use transform::{Easing, SurfaceTransform, Transition};
