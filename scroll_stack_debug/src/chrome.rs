// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Passes carry no wall-clock time, so the timeline is synthetic: pass `n`
//! occupies `[n * PASS_SPACING_US, n * PASS_SPACING_US + PASS_SPAN_US]`, and
//! the scroll offset is drawn as a counter track.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Distance between consecutive passes on the exported timeline, in µs.
pub const PASS_SPACING_US: f64 = 1000.0;

/// Width of one pass on the exported timeline, in µs.
pub const PASS_SPAN_US: f64 = 800.0;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Each card gets its own thread row (`tid = card + 1`); pass spans live on
/// row 0.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::PassBegin(e) => {
                let ts = pass_start_us(e.pass);
                events.push(json!({
                    "ph": "B",
                    "name": "Pass",
                    "cat": "Pass",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "pass": e.pass,
                        "scroll_offset": e.scroll_offset,
                        "container_height": e.container_height,
                        "card_count": e.card_count,
                    }
                }));
                events.push(json!({
                    "ph": "C",
                    "name": "Scroll",
                    "ts": ts,
                    "pid": 0,
                    "args": {
                        "offset": e.scroll_offset,
                    }
                }));
            }
            RecordedEvent::PassEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": "Pass",
                    "cat": "Pass",
                    "ts": pass_start_us(e.pass) + PASS_SPAN_US,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "written": e.written,
                        "unchanged": e.unchanged,
                    }
                }));
            }
            RecordedEvent::Card(e) => {
                let t = e.transform;
                let name = if e.written { "CardWrite" } else { "CardSkip" };
                events.push(json!({
                    "ph": "i",
                    "name": name,
                    "cat": "Card",
                    "ts": pass_start_us(e.pass) + PASS_SPAN_US / 2.0,
                    "pid": 0,
                    "tid": u64::from(e.card) + 1,
                    "s": "t",
                    "args": {
                        "pass": e.pass,
                        "phase": format!("{:?}", e.phase),
                        "progress": e.progress,
                        "translate_y": t.translate_y,
                        "scale": t.scale,
                        "rotation": t.rotation,
                        "blur": t.blur,
                        "z_index": t.z_index,
                    }
                }));
            }
            RecordedEvent::ReentrySkipped(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "ReentrySkipped",
                    "cat": "Pass",
                    "ts": pass_start_us(e.pass) + PASS_SPAN_US / 2.0,
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "pass": e.pass,
                    }
                }));
            }
            RecordedEvent::StackComplete(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "StackComplete",
                    "cat": "Pass",
                    "ts": pass_start_us(e.pass) + PASS_SPAN_US,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "pass": e.pass,
                        "scroll_offset": e.scroll_offset,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn pass_start_us(pass: u64) -> f64 {
    pass as f64 * PASS_SPACING_US
}
