// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core engine for scroll-linked card stacks.
//!
//! `scroll_stack_core` turns a scroll position into per-card visual
//! transforms that make an ordered set of cards pile up on top of each other
//! as the user scrolls. It is `no_std` compatible (with `alloc`) and knows
//! nothing about the DOM: the host supplies geometry through
//! [`ScrollSource`](source::ScrollSource) and receives writes through
//! [`CardPresenter`](backend::CardPresenter).
//!
//! # Architecture
//!
//! Every scroll or resize notification runs one synchronous pass:
//!
//! ```text
//!   ScrollSource (scroll offset, container height, card tops)
//!       │
//!       ▼
//!   Thresholds::resolve() ──► CardGeometry (pin start / pin end / scale end)
//!                                   │
//!                 ┌─────────────────┘
//!                 ▼
//!   progress() + CardPhase ──► synthesize() ──► CardTransform
//!                                                    │
//!                 ┌──────────────────────────────────┘
//!                 ▼
//!   TransformCache::admit() ──► CardPresenter::apply()
//! ```
//!
//! **[`config`]**: [`StackConfig`](config::StackConfig) tunables,
//! [`Threshold`](config::Threshold) parsing, and validation errors.
//!
//! **[`geometry`]**: Resolves percentage/pixel thresholds against the
//! container height and derives each card's pin and scale trigger points.
//!
//! **[`progress`]**: Clamped linear progress, per-card phase, and the index
//! of the topmost stacked card.
//!
//! **[`synth`]**: Builds a [`CardTransform`](synth::CardTransform) from
//! progress and phase.
//!
//! **[`gate`]**: Tolerance comparison and the per-card cache of
//! last-applied transforms.
//!
//! **[`engine`]**: [`StackEngine`](engine::StackEngine), which runs the
//! pass, and [`SharedStack`](engine::SharedStack), which drops re-entrant
//! triggers.
//!
//! **[`source`]** / **[`backend`]**: The capability traits hosts implement.
//!
//! **[`transform`]**: Column-major 4×4 matrix for presenters that write
//! composed matrices.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and pass events,
//! with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Links `std` and enables `std` support in
//!   dependencies. Float math then uses the inherent `f64` methods.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-card
//!   evaluation events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod backend;
pub mod config;
pub mod engine;
pub mod gate;
pub mod geometry;
pub mod progress;
pub mod source;
pub mod synth;
pub mod trace;
pub mod transform;
