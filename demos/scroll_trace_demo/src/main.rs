// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated scroll sweep that exercises the engine and the diagnostics
//! pipeline.
//!
//! Scrolls a synthetic five-card stack down past its end and back up,
//! recording events to both a
//! [`PrettyPrintSink`](scroll_stack_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](scroll_stack_debug::recorder::RecorderSink), then exports
//! a Chrome trace JSON file.

use std::cell::Cell;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use scroll_stack_core::backend::{CardPresenter, CardSetup};
use scroll_stack_core::config::StackConfig;
use scroll_stack_core::engine::{SharedStack, StackEngine};
use scroll_stack_core::source::StaticSource;
use scroll_stack_core::synth::CardTransform;
use scroll_stack_core::trace::{
    CardEvent, PassBeginEvent, PassEndEvent, ReentrySkippedEvent, StackCompleteEvent, TraceSink,
    Tracer,
};

use scroll_stack_debug::pretty::PrettyPrintSink;
use scroll_stack_debug::recorder::RecorderSink;

const CARD_COUNT: usize = 5;
/// Scroll distance between simulated scroll events.
const SCROLL_STEP: f64 = 75.0;

fn main() {
    // -- sinks -------------------------------------------------------------
    let pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut sinks = Tee {
        pretty,
        recorder: RecorderSink::new(),
    };

    // -- engine ------------------------------------------------------------
    let config = StackConfig {
        rotation_amount: 0.5,
        blur_amount: 1.5,
        ..StackConfig::default()
    };
    let completions = Rc::new(Cell::new(0_u32));
    let counter = Rc::clone(&completions);
    let mut engine = StackEngine::new(config)
        .expect("demo config is valid")
        .on_stack_complete(move || counter.set(counter.get() + 1));

    let source = StaticSource::stacked(CARD_COUNT, 600.0, 320.0, config.item_distance, 900.0);
    let mut presenter = CountingPresenter::default();
    engine.bind(&source, &mut presenter);
    let shared = SharedStack::new(engine);

    // -- simulated scroll: down past the end, then back up -----------------
    let end = source.end.unwrap_or(0.0);
    let mut offsets = Vec::new();
    let mut scroll = 0.0;
    while scroll <= end {
        offsets.push(scroll);
        scroll += SCROLL_STEP;
    }
    let down = offsets.clone();
    offsets.extend(down.iter().rev().skip(1));

    for &offset in &offsets {
        let mut tracer = Tracer::new(&mut sinks);
        shared.trigger(&source.at(offset), &mut presenter, &mut tracer);
        // Repeat the same offset: everything should be gated.
        if offset == 0.0 {
            shared.trigger(&source.at(offset), &mut presenter, &mut tracer);
        }
    }

    // -- export Chrome trace -----------------------------------------------
    let path = "scroll_trace.json";
    let file = File::create(path).expect("failed to create scroll_trace.json");
    let mut writer = BufWriter::new(file);
    scroll_stack_debug::chrome::export(sinks.recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    let passes = shared.with_engine(|engine| engine.pass_count()).unwrap_or(0);
    println!(
        "Wrote {path} ({passes} passes, {} writes, {} completions)",
        presenter.writes,
        completions.get(),
    );
}

/// Counts presenter writes instead of touching a real UI.
#[derive(Debug, Default)]
struct CountingPresenter {
    writes: usize,
}

impl CardPresenter for CountingPresenter {
    fn bind(&mut self, setup: &CardSetup) {
        println!(
            "bound {} cards, {}px apart",
            setup.card_count, setup.item_distance
        );
    }

    fn apply(&mut self, _index: usize, _transform: &CardTransform) {
        self.writes += 1;
    }
}

/// Forwards every event to both sinks.
struct Tee {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for Tee {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.pretty.on_pass_begin(e);
        self.recorder.on_pass_begin(e);
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        self.pretty.on_pass_end(e);
        self.recorder.on_pass_end(e);
    }

    fn on_card(&mut self, e: &CardEvent) {
        self.pretty.on_card(e);
        self.recorder.on_card(e);
    }

    fn on_reentry_skipped(&mut self, e: &ReentrySkippedEvent) {
        self.pretty.on_reentry_skipped(e);
        self.recorder.on_reentry_skipped(e);
    }

    fn on_stack_complete(&mut self, e: &StackCompleteEvent) {
        self.pretty.on_stack_complete(e);
        self.recorder.on_stack_complete(e);
    }
}
