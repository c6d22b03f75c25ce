// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for evaluation passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! engine calls at each stage of a pass. All method bodies default to no-ops,
//! so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. Without the `trace`
//! feature its methods compile to nothing; with it, each is one `Option`
//! branch. `CardEvent` additionally needs `trace-rich`.

#[cfg(feature = "trace-rich")]
use crate::progress::CardPhase;
#[cfg(feature = "trace-rich")]
use crate::synth::CardTransform;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a pass starts, after the source has been sampled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassBeginEvent {
    /// Monotonic pass counter.
    pub pass: u64,
    /// Scroll offset sampled for this pass.
    pub scroll_offset: f64,
    /// Container height sampled for this pass.
    pub container_height: f64,
    /// Number of bound cards.
    pub card_count: u32,
}

/// Emitted when a pass finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PassEndEvent {
    /// Pass counter.
    pub pass: u64,
    /// Cards whose transform was written to the presenter.
    pub written: u32,
    /// Cards held back by the change gate.
    pub unchanged: u32,
}

/// Per-card evaluation record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardEvent {
    /// Pass counter.
    pub pass: u64,
    /// Card index.
    pub card: u32,
    /// Phase at this pass's scroll offset.
    pub phase: CardPhase,
    /// Scale progress in `[0, 1]`.
    pub progress: f64,
    /// Synthesized (rounded) transform.
    pub transform: CardTransform,
    /// Whether the change gate admitted the write.
    pub written: bool,
}

/// Emitted when a trigger is dropped because the engine is busy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReentrySkippedEvent {
    /// Counter of the pass that was in flight.
    pub pass: u64,
}

/// Emitted when every card has settled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackCompleteEvent {
    /// Pass counter.
    pub pass: u64,
    /// Scroll offset at which completion was observed.
    pub scroll_offset: f64,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the start of a pass.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called at the end of a pass.
    fn on_pass_end(&mut self, e: &PassEndEvent) {
        _ = e;
    }

    /// Called once per card per pass (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_card(&mut self, e: &CardEvent) {
        _ = e;
    }

    /// Called when a re-entrant trigger is dropped.
    fn on_reentry_skipped(&mut self, e: &ReentrySkippedEvent) {
        _ = e;
    }

    /// Called when the stack completes.
    fn on_stack_complete(&mut self, e: &StackCompleteEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Optional sink handle threaded through a pass; see the [module docs](self).
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Dispatches to `sink`.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self::none()
        }
    }

    /// Discards everything.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self {
            #[cfg(feature = "trace")]
            sink: None,
            #[cfg(not(feature = "trace"))]
            _marker: core::marker::PhantomData,
        }
    }

    #[inline]
    fn emit(&mut self, event: impl FnOnce(&mut dyn TraceSink)) {
        #[cfg(feature = "trace")]
        if let Some(s) = self.sink.as_deref_mut() {
            event(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = event;
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        self.emit(|s| s.on_pass_begin(e));
    }

    /// Emits a [`PassEndEvent`].
    #[inline]
    pub fn pass_end(&mut self, e: &PassEndEvent) {
        self.emit(|s| s.on_pass_end(e));
    }

    /// Emits a [`CardEvent`].
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn card(&mut self, e: &CardEvent) {
        self.emit(|s| s.on_card(e));
    }

    /// Emits a [`ReentrySkippedEvent`].
    #[inline]
    pub fn reentry_skipped(&mut self, e: &ReentrySkippedEvent) {
        self.emit(|s| s.on_reentry_skipped(e));
    }

    /// Emits a [`StackCompleteEvent`].
    #[inline]
    pub fn stack_complete(&mut self, e: &StackCompleteEvent) {
        self.emit(|s| s.on_stack_complete(e));
    }
}

impl Default for Tracer<'_> {
    fn default() -> Self {
        Self::none()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
