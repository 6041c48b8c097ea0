// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge panning basics.
//!
//! Zoom in, park the pointer near the right edge of the viewport, and watch
//! the scroll offset creep toward it one tick at a time.
//!
//! Run:
//! - `cargo run -p understory_examples --example edge_pan`

use kurbo::{Point, Size};
use understory_zoomport::headless::HeadlessDocument;
use understory_zoomport::{Environment, Strategy, ZoomConfig, ZoomPort, ZoomRequest};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (doc, viewport, surface) =
        HeadlessDocument::preview(Size::new(640.0, 480.0), Size::new(1_920.0, 1_440.0));
    let env = Environment::with_strategy(Strategy::Transform);
    let config = ZoomConfig::default().with_panning(0.15, 20.0);
    let mut port = ZoomPort::create(
        doc,
        viewport,
        Some(surface),
        &env,
        config,
        Some(ZoomRequest::to_scale(2.0).with_panning(true)),
    )
    .expect("the preview tree is well formed");

    // 20 px from the right edge, vertically centered.
    port.pointer_moved(Point::new(620.0, 240.0));

    let mut now = 0;
    for _ in 0..12 {
        let Some(deadline) = port.next_deadline() else {
            break;
        };
        now = deadline;
        port.advance(now);
        let scroll = port.frame().scroll_offset();
        println!(
            "t={now:>4} ms engaged={:<5} scroll=({:.2}, {:.2})",
            port.is_panning_engaged(),
            scroll.x,
            scroll.y
        );
    }

    // Pointer back in the middle: ticks continue but nothing moves.
    port.pointer_moved(Point::new(320.0, 240.0));
    let before = port.frame().scroll_offset();
    port.advance(now + 160);
    println!(
        "after moving to the center: moved={}",
        port.frame().scroll_offset() != before
    );

    port.set_panning_on(false);
    println!("panning off, next wake-up: {:?}", port.next_deadline());
}
