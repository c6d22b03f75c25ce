// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host geometry input.
//!
//! The engine never reads the rendering environment directly. Each pass
//! samples a [`ScrollSource`], which makes the whole pipeline testable with
//! fixed numbers (see [`StaticSource`]).

use alloc::vec::Vec;

/// Scroll position and card geometry, as seen by the host right now.
///
/// All values are CSS pixels in the coordinate space of the configured
/// [`ScrollMode`](crate::config::ScrollMode): document-relative for window
/// scrolling, container-relative for contained scrolling.
pub trait ScrollSource {
    /// Current scroll offset.
    fn scroll_offset(&self) -> f64;

    /// Height of the viewport or scroll container.
    fn container_height(&self) -> f64;

    /// Number of cards, fixed for the lifetime of a binding.
    fn card_count(&self) -> usize;

    /// Offset of card `index` in the scrollable flow.
    fn card_top(&self, index: usize) -> f64;

    /// Offset of the end-of-stack marker, if the host has one.
    fn end_top(&self) -> Option<f64>;
}

/// A [`ScrollSource`] backed by plain numbers.
///
/// Used by tests and by native simulations; the scroll offset is the only
/// field that normally changes between passes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaticSource {
    /// Current scroll offset.
    pub scroll: f64,
    /// Viewport or container height.
    pub height: f64,
    /// Card offsets, in stack order.
    pub card_tops: Vec<f64>,
    /// End-of-stack marker offset.
    pub end: Option<f64>,
}

impl StaticSource {
    /// Lays out `count` cards of height `card_height` separated by `gap`,
    /// starting at `first_top`, with the end marker right after the last
    /// card.
    #[must_use]
    pub fn stacked(count: usize, first_top: f64, card_height: f64, gap: f64, height: f64) -> Self {
        let pitch = card_height + gap;
        let card_tops: Vec<f64> = (0..count).map(|i| first_top + pitch * i as f64).collect();
        let end = card_tops.last().map(|top| top + card_height);
        Self {
            scroll: 0.0,
            height,
            card_tops,
            end,
        }
    }

    /// Returns a copy scrolled to `scroll`.
    #[must_use]
    pub fn at(&self, scroll: f64) -> Self {
        Self {
            scroll,
            ..self.clone()
        }
    }
}

impl ScrollSource for StaticSource {
    fn scroll_offset(&self) -> f64 {
        self.scroll
    }

    fn container_height(&self) -> f64 {
        self.height
    }

    fn card_count(&self) -> usize {
        self.card_tops.len()
    }

    fn card_top(&self, index: usize) -> f64 {
        self.card_tops.get(index).copied().unwrap_or(0.0)
    }

    fn end_top(&self) -> Option<f64> {
        self.end
    }
}
