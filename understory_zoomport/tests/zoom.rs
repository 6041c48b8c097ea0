// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for `ZoomPort` driven through the headless host.
//!
//! These cover target resolution end to end, the transition stages as the
//! host sees them, the in-flight guard, callbacks, and the layout fallback.

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Rect, Size, Vec2};
use understory_zoomport::headless::{HeadlessDocument, NodeId};
use understory_zoomport::{
    BindError, CapabilityError, Environment, FrameRole, Host, IgnoreReason, Region, Strategy,
    TransitionPhase, ZoomConfig, ZoomOutcome, ZoomPort, ZoomRequest,
};

const VIEWPORT: Size = Size::new(800.0, 600.0);
const CONTENT: Size = Size::new(2_000.0, 1_500.0);

fn setup(strategy: Strategy) -> (ZoomPort<HeadlessDocument>, NodeId) {
    let (mut doc, vp, surface) = HeadlessDocument::preview(VIEWPORT, CONTENT);
    let cell = doc.add_element(surface, Rect::new(100.0, 100.0, 300.0, 200.0));
    let env = Environment::with_strategy(strategy);
    let port = ZoomPort::create(doc, vp, Some(surface), &env, ZoomConfig::default(), None)
        .expect("preview binds");
    (port, cell)
}

fn settle(port: &mut ZoomPort<HeadlessDocument>) {
    while let Some(deadline) = port.next_deadline() {
        port.advance(deadline);
    }
}

fn assert_region_close(a: Region, b: Region) {
    let eps = 1e-6;
    assert!(
        (a.x - b.x).abs() < eps
            && (a.y - b.y).abs() < eps
            && (a.width - b.width).abs() < eps
            && (a.height - b.height).abs() < eps,
        "{a:?} != {b:?}"
    );
}

#[test]
fn scale_two_shows_the_middle_quarter() {
    let (mut port, _) = setup(Strategy::Transform);
    let before = port.visible_region();
    assert_eq!(before, Region::new(0.0, 0.0, 800.0, 600.0));

    let outcome = port.to(ZoomRequest::to_scale(2.0));
    assert_eq!(outcome, ZoomOutcome::Committed { scale: 2.0 });

    let after = port.visible_region();
    assert_eq!(after, Region::new(200.0, 150.0, 400.0, 300.0));
    assert_eq!(after.center(), before.center());
    assert_eq!(port.frame().scroll_offset(), Vec2::new(400.0, 300.0));
}

#[test]
fn element_zoom_fits_the_padded_box_to_the_viewport() {
    let (mut port, cell) = setup(Strategy::Transform);
    let target = port.plan(&ZoomRequest::to_element(cell)).expect("has a target");
    assert_region_close(target.region, Region::new(80.0, 60.0, 240.0, 180.0));

    assert!(port.to(ZoomRequest::to_element(cell)).is_committed());
    assert!((port.scale() - 800.0 / 240.0).abs() < 1e-9);

    let visible = port.visible_region();
    assert_region_close(visible, Region::new(80.0, 60.0, 240.0, 180.0));
    assert!((visible.aspect_ratio() - 800.0 / 600.0).abs() < 1e-9);
}

#[test]
fn element_zoom_without_transforms_uses_the_padded_box_as_is() {
    let (mut port, cell) = setup(Strategy::Layout);
    let target = port.plan(&ZoomRequest::to_element(cell)).expect("has a target");
    assert_eq!(target.region, Region::new(80.0, 80.0, 240.0, 140.0));

    port.to(ZoomRequest::to_element(cell));
    let surface = port.frame().surface();
    assert_eq!(port.host().layout_zoom(surface), port.scale());
    assert!(port.host().transform_log().is_empty());
}

#[test]
fn zooming_to_the_viewport_or_surface_means_full_size() {
    let (mut port, _) = setup(Strategy::Transform);
    port.set_scale(3.0);
    let surface = port.frame().surface();
    assert_eq!(
        port.to(ZoomRequest::to_element(surface)),
        ZoomOutcome::Committed { scale: 1.0 }
    );
    port.set_scale(3.0);
    let vp = port.frame().viewport();
    assert_eq!(
        port.to(ZoomRequest::to_element(vp)),
        ZoomOutcome::Committed { scale: 1.0 }
    );
}

#[test]
fn reset_twice_ends_at_full_size() {
    let (mut port, cell) = setup(Strategy::Transform);
    port.to(ZoomRequest::to_element(cell));
    port.reset();
    port.reset();
    assert_eq!(port.scale(), 1.0);

    port.set_transitions_on(true).unwrap();
    port.set_scale(2.0);
    settle(&mut port);
    port.reset();
    port.reset();
    settle(&mut port);
    assert_eq!(port.scale(), 1.0);
}

#[test]
fn requests_inside_the_total_wait_are_ignored() {
    let (mut port, cell) = setup(Strategy::Transform);
    port.set_transitions_on(true).unwrap();
    assert!(port.to(ZoomRequest::to_scale(2.0)).is_committed());

    for now in [0, 100, 499] {
        port.advance(now);
        assert_eq!(
            port.to(ZoomRequest::to_element(cell)),
            ZoomOutcome::Ignored(IgnoreReason::TransitionInFlight),
            "at {now} ms"
        );
        assert_eq!(port.scale(), 2.0);
    }

    port.advance(500);
    assert!(port.to(ZoomRequest::to_scale(4.0)).is_committed());
}

#[test]
fn invalid_requests_leave_everything_alone() {
    let (mut port, _) = setup(Strategy::Transform);
    port.set_scale(2.0);
    let scroll = port.frame().scroll_offset();

    assert_eq!(port.set_scale(f64::NAN), 2.0);
    assert_eq!(port.set_scale(-1.0), 2.0);
    assert_eq!(port.set_scale(0.0), 2.0);
    assert_eq!(
        port.to(ZoomRequest::new().with_scale(f64::INFINITY)),
        ZoomOutcome::Ignored(IgnoreReason::NoTarget)
    );
    assert_eq!(port.frame().scroll_offset(), scroll);
}

#[test]
fn anchor_does_not_move_the_picture() {
    let (mut port, _) = setup(Strategy::Transform);
    port.set_scale(2.0);
    let surface = port.frame().surface();
    let before = port.host().client_rect(surface);

    port.set_transitions_on(true).unwrap();
    port.to(ZoomRequest::to_scale(4.0));
    assert_eq!(port.phase(), TransitionPhase::Animating);
    let anchored = port.host().client_rect(surface);
    assert!((anchored.x0 - before.x0).abs() < 1e-9, "{anchored:?} vs {before:?}");
    assert!((anchored.y0 - before.y0).abs() < 1e-9, "{anchored:?} vs {before:?}");
    assert!((anchored.width() - before.width()).abs() < 1e-9);
}

#[test]
fn animation_lands_where_the_settled_view_is() {
    let (mut port, _) = setup(Strategy::Transform);
    port.set_scale(2.0);
    port.set_transitions_on(true).unwrap();
    port.to(ZoomRequest::to_scale(4.0));
    let surface = port.frame().surface();
    let vp = port.frame().viewport();

    port.advance(100);
    let log = port.host().transform_log();
    let animated = log.last().expect("animated transform");
    assert_eq!(animated.transition, Some(port.config().transition()));
    assert!(!port.host().scrolling_enabled(vp));
    let during = port.host().client_rect(surface);

    port.advance(500);
    assert!(port.host().transition(surface).is_none());
    assert!(port.host().scrolling_enabled(vp));
    let after = port.host().client_rect(surface);
    assert!((during.x0 - after.x0).abs() < 1e-6, "{during:?} vs {after:?}");
    assert!((during.y0 - after.y0).abs() < 1e-6, "{during:?} vs {after:?}");

    assert_eq!(port.visible_region(), Region::new(300.0, 225.0, 200.0, 150.0));
}

#[test]
fn user_cannot_scroll_while_animating() {
    let (mut port, _) = setup(Strategy::Transform);
    port.set_transitions_on(true).unwrap();
    port.to(ZoomRequest::to_scale(2.0));
    port.advance(100);
    let vp = port.frame().viewport();
    assert!(!port.host_mut().user_scroll_to(vp, Vec2::new(5.0, 5.0)));
    port.advance(500);
    assert!(port.host_mut().user_scroll_to(vp, Vec2::new(5.0, 5.0)));
}

#[test]
fn callback_runs_once_after_the_total_wait() {
    let (mut port, _) = setup(Strategy::Transform);
    port.set_transitions_on(true).unwrap();
    let count = Rc::new(Cell::new(0));
    let seen = count.clone();
    port.to(ZoomRequest::to_scale(2.0).with_callback(move || seen.set(seen.get() + 1)));

    port.advance(499);
    assert_eq!(count.get(), 0);
    port.advance(500);
    assert_eq!(count.get(), 1);
    assert_eq!(port.phase(), TransitionPhase::Idle);
    port.advance(10_000);
    assert_eq!(count.get(), 1);
}

#[test]
fn out_runs_its_callback() {
    let (mut port, _) = setup(Strategy::Layout);
    port.set_scale(2.0);
    let done = Rc::new(Cell::new(false));
    let flag = done.clone();
    port.out(Some(Box::new(move || flag.set(true))));
    assert_eq!(port.scale(), 1.0);
    port.advance(500);
    assert!(done.get());
}

#[test]
fn transitions_need_transform_support() {
    let mut doc = HeadlessDocument::without_transforms();
    let (vp, surface) = doc.add_preview(VIEWPORT, CONTENT);
    let env = Environment::new();
    env.probe(&doc);
    let mut port =
        ZoomPort::create(doc, vp, Some(surface), &env, ZoomConfig::default(), None).unwrap();

    assert_eq!(
        port.set_transitions_on(true),
        Err(CapabilityError::TransformsUnsupported)
    );
    assert!(!port.transitions_on());

    // A request carrying the flag still zooms, without animating.
    assert!(port.to(ZoomRequest::to_scale(2.0).with_transitions(true)).is_committed());
    assert!(!port.is_transitioning());
    assert_eq!(port.host().layout_zoom(surface), 2.0);
}

#[test]
fn controllers_created_before_the_probe_use_the_fallback() {
    let (doc, vp, surface) = HeadlessDocument::preview(VIEWPORT, CONTENT);
    let env = Environment::new();
    let mut port =
        ZoomPort::create(doc, vp, Some(surface), &env, ZoomConfig::default(), None).unwrap();

    port.set_scale(2.0);
    assert_eq!(port.host().layout_zoom(surface), 2.0);
    assert!(port.set_transitions_on(true).is_err());

    env.probe(port.host());
    assert_eq!(port.environment().strategy(), Strategy::Transform);
    assert!(port.set_transitions_on(true).is_ok());
}

#[test]
fn switching_to_transforms_drops_the_layout_zoom() {
    let (doc, vp, surface) = HeadlessDocument::preview(VIEWPORT, CONTENT);
    let env = Environment::new();
    let mut port =
        ZoomPort::create(doc, vp, Some(surface), &env, ZoomConfig::default(), None).unwrap();
    port.set_scale(2.0);
    env.probe(port.host());

    port.reset();
    assert_eq!(port.host().layout_zoom(surface), 1.0);
    assert_eq!(port.host().client_rect(surface).size(), CONTENT);
    assert_region_close(port.visible_region(), Region::new(0.0, 0.0, 800.0, 600.0));

    port.set_scale(3.0);
    assert_eq!(port.host().layout_zoom(surface), 1.0);
    assert_eq!(
        port.host().client_rect(surface).size(),
        Size::new(6_000.0, 4_500.0)
    );
}

#[test]
fn initial_request_is_applied_on_creation() {
    let (mut doc, vp, surface) = HeadlessDocument::preview(VIEWPORT, CONTENT);
    doc.set_scroll_offset(vp, Vec2::new(100.0, 100.0));
    let env = Environment::with_strategy(Strategy::Transform);
    let port = ZoomPort::create(
        doc,
        vp,
        None,
        &env,
        ZoomConfig::default(),
        Some(ZoomRequest::to_scale(0.5)),
    )
    .unwrap();
    assert_eq!(port.frame().surface(), surface);
    assert_eq!(port.scale(), 0.5);
    assert_eq!(port.frame().scroll_offset(), Vec2::ZERO);
}

#[test]
fn binding_errors_are_reported() {
    let env = Environment::with_strategy(Strategy::Transform);
    let config = ZoomConfig::default();

    let mut doc = HeadlessDocument::new();
    let vp = doc.add_root(Rect::new(0.0, 0.0, 800.0, 600.0));
    let text = doc.add_text(vp, Rect::new(0.0, 0.0, 10.0, 10.0));
    let err = ZoomPort::create(doc.clone(), vp, None, &env, config, None).unwrap_err();
    assert_eq!(err, BindError::MissingSurface);

    let err = ZoomPort::create(doc.clone(), text, None, &env, config, None).unwrap_err();
    assert_eq!(err, BindError::NotAnElement(FrameRole::Viewport));

    let err = ZoomPort::create(doc.clone(), vp, Some(text), &env, config, None).unwrap_err();
    assert_eq!(err, BindError::NotAnElement(FrameRole::Surface));

    let surface = doc.add_element(vp, Rect::new(0.0, 0.0, 100.0, 100.0));
    let nested = doc.add_element(surface, Rect::new(0.0, 0.0, 10.0, 10.0));
    let err = ZoomPort::create(doc, vp, Some(nested), &env, config, None).unwrap_err();
    assert_eq!(err, BindError::NotAChild);
}

#[test]
fn dispose_stops_everything_and_returns_the_host() {
    let (mut port, _) = setup(Strategy::Transform);
    let count = Rc::new(Cell::new(0));
    let seen = count.clone();
    port.set_transitions_on(true).unwrap();
    port.set_panning_on(true);
    port.to(ZoomRequest::to_scale(2.0).with_callback(move || seen.set(1)));
    port.advance(100);
    let vp = port.frame().viewport();

    let doc = port.dispose();
    assert!(doc.scrolling_enabled(vp));
    assert_eq!(count.get(), 0);
}

#[test]
fn phase_is_animating_until_the_total_wait_then_idle() {
    let (mut port, _) = setup(Strategy::Transform);
    port.set_transitions_on(true).unwrap();
    assert!(port.to(ZoomRequest::to_scale(2.0)).is_committed());

    let mut seen = vec![port.phase()];
    for now in 0..=600 {
        port.advance(now);
        let phase = port.phase();
        assert_eq!(phase == TransitionPhase::Idle, now >= 500, "at {now} ms");
        if seen.last() != Some(&phase) {
            seen.push(phase);
        }
    }
    assert_eq!(seen, [TransitionPhase::Animating, TransitionPhase::Idle]);
    assert!(port.host().scrolling_enabled(port.frame().viewport()));
}
