// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].

use scroll_stack_core::progress::CardPhase;
use scroll_stack_core::synth::CardTransform;
use scroll_stack_core::trace::{
    CardEvent, PassBeginEvent, PassEndEvent, ReentrySkippedEvent, StackCompleteEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_PASS_BEGIN: u8 = 1;
const TAG_PASS_END: u8 = 2;
const TAG_CARD: u8 = 3;
const TAG_REENTRY_SKIPPED: u8 = 4;
const TAG_STACK_COMPLETE: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_phase(&mut self, p: CardPhase) {
        self.write_u8(match p {
            CardPhase::BeforeStack => 0,
            CardPhase::Pinned => 1,
            CardPhase::Settled => 2,
        });
    }

    fn write_transform(&mut self, t: &CardTransform) {
        self.write_f64(t.translate_y);
        self.write_f64(t.scale);
        self.write_f64(t.rotation);
        self.write_f64(t.blur);
        self.write_i32(t.z_index);
    }
}

impl TraceSink for RecorderSink {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.write_u8(TAG_PASS_BEGIN);
        self.write_u64(e.pass);
        self.write_f64(e.scroll_offset);
        self.write_f64(e.container_height);
        self.write_u32(e.card_count);
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        self.write_u8(TAG_PASS_END);
        self.write_u64(e.pass);
        self.write_u32(e.written);
        self.write_u32(e.unchanged);
    }

    fn on_card(&mut self, e: &CardEvent) {
        self.write_u8(TAG_CARD);
        self.write_u64(e.pass);
        self.write_u32(e.card);
        self.write_phase(e.phase);
        self.write_f64(e.progress);
        self.write_transform(&e.transform);
        self.write_u8(u8::from(e.written));
    }

    fn on_reentry_skipped(&mut self, e: &ReentrySkippedEvent) {
        self.write_u8(TAG_REENTRY_SKIPPED);
        self.write_u64(e.pass);
    }

    fn on_stack_complete(&mut self, e: &StackCompleteEvent) {
        self.write_u8(TAG_STACK_COMPLETE);
        self.write_u64(e.pass);
        self.write_f64(e.scroll_offset);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`PassBeginEvent`].
    PassBegin(PassBeginEvent),
    /// A [`PassEndEvent`].
    PassEnd(PassEndEvent),
    /// A [`CardEvent`].
    Card(CardEvent),
    /// A [`ReentrySkippedEvent`].
    ReentrySkipped(ReentrySkippedEvent),
    /// A [`StackCompleteEvent`].
    StackComplete(StackCompleteEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
///
/// Stops at the first unknown tag or truncated record.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let end = self.pos.checked_add(N)?;
        let bytes = self.data.get(self.pos..end)?.try_into().ok()?;
        self.pos = end;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_i32(&mut self) -> Option<i32> {
        self.take().map(i32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_phase(&mut self) -> Option<CardPhase> {
        Some(match self.read_u8()? {
            0 => CardPhase::BeforeStack,
            1 => CardPhase::Pinned,
            _ => CardPhase::Settled,
        })
    }

    fn read_transform(&mut self) -> Option<CardTransform> {
        Some(CardTransform {
            translate_y: self.read_f64()?,
            scale: self.read_f64()?,
            rotation: self.read_f64()?,
            blur: self.read_f64()?,
            z_index: self.read_i32()?,
        })
    }

    fn decode_pass_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassBegin(PassBeginEvent {
            pass: self.read_u64()?,
            scroll_offset: self.read_f64()?,
            container_height: self.read_f64()?,
            card_count: self.read_u32()?,
        }))
    }

    fn decode_pass_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassEnd(PassEndEvent {
            pass: self.read_u64()?,
            written: self.read_u32()?,
            unchanged: self.read_u32()?,
        }))
    }

    fn decode_card(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Card(CardEvent {
            pass: self.read_u64()?,
            card: self.read_u32()?,
            phase: self.read_phase()?,
            progress: self.read_f64()?,
            transform: self.read_transform()?,
            written: self.read_u8()? != 0,
        }))
    }

    fn decode_reentry_skipped(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ReentrySkipped(ReentrySkippedEvent {
            pass: self.read_u64()?,
        }))
    }

    fn decode_stack_complete(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::StackComplete(StackCompleteEvent {
            pass: self.read_u64()?,
            scroll_offset: self.read_f64()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_PASS_BEGIN => self.decode_pass_begin(),
            TAG_PASS_END => self.decode_pass_end(),
            TAG_CARD => self.decode_card(),
            TAG_REENTRY_SKIPPED => self.decode_reentry_skipped(),
            TAG_STACK_COMPLETE => self.decode_stack_complete(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
