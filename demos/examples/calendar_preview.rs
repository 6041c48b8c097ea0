// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Calendar print preview.
//!
//! Drive a `ZoomPort` over a headless month page with the controls a print
//! preview offers: zoom in, zoom out, 100%, a percentage field, and fit to
//! the page. Every control prints the zoom readout and the visible region.
//!
//! Run:
//! - `cargo run -p understory_examples --example calendar_preview`
//! - `RUST_LOG=understory_zoomport=trace cargo run -p understory_examples --example calendar_preview`

use kurbo::{Rect, Size};
use understory_zoomport::headless::{HeadlessDocument, NodeId};
use understory_zoomport::{Environment, ZoomConfig, ZoomPort, ZoomRequest};

/// One press of a preview control.
#[derive(Debug)]
enum Control<'a> {
    ZoomIn,
    ZoomOut,
    ActualSize,
    /// Text typed into the zoom field, like `"150%"`.
    Entry(&'a str),
    FitPage,
}

struct Preview {
    port: ZoomPort<HeadlessDocument>,
    month_page: NodeId,
    now: u64,
}

impl Preview {
    fn new(env: &Environment) -> Self {
        let mut doc = HeadlessDocument::new();
        let (viewport, desk) = doc.add_preview(Size::new(900.0, 700.0), Size::new(1_000.0, 1_200.0));
        // US Letter at 96 dpi, centered on the desk.
        let month_page = doc.add_element(desk, Rect::new(92.0, 72.0, 908.0, 1_128.0));
        // Six weeks of seven days under a header band.
        for week in 0..6 {
            for day in 0..7 {
                let x = 40.0 + f64::from(day) * 105.0;
                let y = 200.0 + f64::from(week) * 130.0;
                doc.add_element(month_page, Rect::new(x, y, x + 100.0, y + 125.0));
            }
        }
        env.probe(&doc);

        let mut port = ZoomPort::create(
            doc,
            viewport,
            Some(desk),
            env,
            ZoomConfig::default(),
            Some(ZoomRequest::new().with_transitions(true)),
        )
        .expect("the preview tree is well formed");
        port.set_scale(0.5);
        let mut preview = Self {
            port,
            month_page,
            now: 0,
        };
        preview.run_until_idle();
        preview
    }

    fn press(&mut self, control: Control<'_>) {
        let scale = self.port.scale();
        match control {
            Control::ZoomIn => {
                self.port.set_scale(scale * 2.0);
            }
            Control::ZoomOut => {
                self.port.set_scale(scale / 2.0);
            }
            Control::ActualSize => {
                self.port.reset();
            }
            Control::Entry(text) => match parse_percent(text) {
                Some(percent) => {
                    self.port.set_scale(percent / 100.0);
                }
                None => tracing::warn!(text, "not a zoom level"),
            },
            Control::FitPage => {
                self.port.to(ZoomRequest::to_element(self.month_page));
            }
        }
        self.run_until_idle();
    }

    /// Plays the clock forward until the transition and its callback are done.
    fn run_until_idle(&mut self) {
        while self.port.is_transitioning() {
            let Some(deadline) = self.port.next_deadline() else {
                break;
            };
            self.now = deadline;
            self.port.advance(self.now);
        }
    }

    fn readout(&self) -> String {
        format_percent(self.port.scale())
    }
}

/// Reads a zoom percentage the way a lenient text field would: the leading
/// number counts and anything after it (usually `%`) is ignored.
fn parse_percent(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(text.len(), |(i, _)| i);
    text[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn format_percent(scale: f64) -> String {
    let percent = scale * 100.0;
    if (percent - percent.round()).abs() < 1e-9 {
        format!("{percent:.0}%")
    } else {
        format!("{percent:.1}%")
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let env = Environment::new();
    let mut preview = Preview::new(&env);
    println!("Strategy: {:?}", env.strategy());
    println!("Initial zoom: {}", preview.readout());

    for control in [
        Control::ZoomIn,
        Control::ZoomIn,
        Control::ZoomOut,
        Control::Entry("150%"),
        Control::Entry("lots"),
        Control::FitPage,
        Control::ActualSize,
    ] {
        let label = format!("{control:?}");
        preview.press(control);
        let visible = preview.port.visible_region();
        println!(
            "{label:>16} -> {:>6} at t={:>4} ms, showing {:.0}x{:.0} from ({:.0}, {:.0})",
            preview.readout(),
            preview.now,
            visible.width,
            visible.height,
            visible.x,
            visible.y,
        );
    }
}
