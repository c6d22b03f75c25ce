// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use scroll_stack_core::progress::CardPhase;
use scroll_stack_core::trace::{
    CardEvent, PassBeginEvent, PassEndEvent, ReentrySkippedEvent, StackCompleteEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    cards: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("cards", &self.cards)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            cards: true,
        }
    }

    /// Enables or disables the per-card lines (on by default).
    #[must_use]
    pub fn with_cards(mut self, cards: bool) -> Self {
        self.cards = cards;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn phase_name(phase: CardPhase) -> &'static str {
    match phase {
        CardPhase::BeforeStack => "before",
        CardPhase::Pinned => "pinned",
        CardPhase::Settled => "settled",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[pass:begin] pass={} scroll={:.2}px height={:.1}px cards={}",
            e.pass, e.scroll_offset, e.container_height, e.card_count,
        );
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        let _ = writeln!(
            self.writer,
            "[pass:end] pass={} written={} unchanged={}",
            e.pass, e.written, e.unchanged,
        );
    }

    fn on_card(&mut self, e: &CardEvent) {
        if !self.cards {
            return;
        }
        let t = &e.transform;
        let write = if e.written { "write" } else { "skip" };
        let _ = writeln!(
            self.writer,
            "[card] pass={} card={} {} p={:.3} y={}px scale={} rot={}deg blur={}px z={} {write}",
            e.pass,
            e.card,
            phase_name(e.phase),
            e.progress,
            t.translate_y,
            t.scale,
            t.rotation,
            t.blur,
            t.z_index,
        );
    }

    fn on_reentry_skipped(&mut self, e: &ReentrySkippedEvent) {
        let _ = writeln!(self.writer, "[reentry] skipped during pass={}", e.pass);
    }

    fn on_stack_complete(&mut self, e: &StackCompleteEvent) {
        let _ = writeln!(
            self.writer,
            "[complete] pass={} scroll={:.2}px",
            e.pass, e.scroll_offset,
        );
    }
}
