// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Threshold resolution and per-card trigger points.
//!
//! Everything here is a pure function of the configuration and the geometry
//! sampled for the current pass. Nothing is cached between passes, so resize
//! notifications are handled by simply evaluating again.

use crate::config::{StackConfig, Threshold};
use crate::progress::CardPhase;

impl Threshold {
    /// Resolves this threshold to pixels for a container of the given height.
    #[inline]
    #[must_use]
    pub fn resolve(self, container_height: f64) -> f64 {
        match self {
            Self::Percent(p) => p / 100.0 * container_height,
            Self::Pixels(px) => px,
        }
    }
}

/// Pixel thresholds resolved for one pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    /// Pin-start threshold, including the header offset.
    pub stack_px: f64,
    /// Scale-complete threshold.
    pub scale_end_px: f64,
}

impl Thresholds {
    /// Resolves the configured trigger positions against `container_height`.
    #[must_use]
    pub fn resolve(config: &StackConfig, container_height: f64) -> Self {
        Self {
            stack_px: config.stack_position.resolve(container_height) + config.header_offset,
            scale_end_px: config.scale_end_position.resolve(container_height),
        }
    }
}

/// Scroll offsets at which one card changes behavior.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardGeometry {
    /// Card position in the stack.
    pub index: usize,
    /// Card's offset in the scrollable flow.
    pub card_top: f64,
    /// Scroll offset at which the card pins (and starts scaling).
    pub pin_start: f64,
    /// Scroll offset after which every card settles. Shared by all cards.
    pub pin_end: f64,
    /// Scroll offset at which the card reaches its resting scale.
    pub scale_end: f64,
}

impl CardGeometry {
    /// Derives the trigger points for card `index`.
    ///
    /// `end_top` is the offset of the end-of-stack marker; hosts pass `0.0`
    /// when the marker is missing, which collapses the pinned range.
    #[must_use]
    pub fn new(
        index: usize,
        card_top: f64,
        end_top: f64,
        container_height: f64,
        thresholds: &Thresholds,
        config: &StackConfig,
    ) -> Self {
        Self {
            index,
            card_top,
            pin_start: pin_start(index, card_top, thresholds, config),
            pin_end: end_top - container_height / 2.0,
            scale_end: card_top - thresholds.scale_end_px,
        }
    }

    /// Which phase the card is in at `scroll`.
    #[must_use]
    pub fn phase(&self, scroll: f64) -> CardPhase {
        if scroll > self.pin_end {
            CardPhase::Settled
        } else if scroll >= self.pin_start {
            CardPhase::Pinned
        } else {
            CardPhase::BeforeStack
        }
    }

    /// Vertical offset that keeps the card in its stack slot while scroll is
    /// at `scroll`.
    #[inline]
    #[must_use]
    pub fn slot_offset(&self, scroll: f64, thresholds: &Thresholds, config: &StackConfig) -> f64 {
        scroll - self.card_top + thresholds.stack_px + stack_shift(self.index, config)
    }
}

/// Scroll offset at which card `index` (whose top is `card_top`) pins.
#[inline]
#[must_use]
pub fn pin_start(index: usize, card_top: f64, thresholds: &Thresholds, config: &StackConfig) -> f64 {
    card_top - thresholds.stack_px - stack_shift(index, config)
}

#[inline]
fn stack_shift(index: usize, config: &StackConfig) -> f64 {
    config.item_stack_distance * index as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds(container_height: f64) -> Thresholds {
        Thresholds::resolve(&StackConfig::default(), container_height)
    }

    #[test]
    fn percent_scales_with_container() {
        assert_eq!(Threshold::Percent(20.0).resolve(1000.0), 200.0);
        assert_eq!(Threshold::Percent(20.0).resolve(500.0), 100.0);
        assert_eq!(Threshold::Pixels(75.0).resolve(500.0), 75.0);
    }

    #[test]
    fn stack_threshold_includes_header_offset() {
        let t = thresholds(1000.0);
        assert_eq!(t.stack_px, 300.0);
        assert_eq!(t.scale_end_px, 100.0);

        let config = StackConfig {
            header_offset: 0.0,
            stack_position: Threshold::Pixels(64.0),
            ..StackConfig::default()
        };
        assert_eq!(Thresholds::resolve(&config, 1000.0).stack_px, 64.0);
    }

    #[test]
    fn card_trigger_points() {
        let config = StackConfig::default();
        let t = thresholds(1000.0);
        let g = CardGeometry::new(1, 1200.0, 2600.0, 1000.0, &t, &config);
        assert_eq!(g.pin_start, 1200.0 - 300.0 - 20.0);
        assert_eq!(g.pin_end, 2100.0);
        assert_eq!(g.scale_end, 1100.0);
    }

    #[test]
    fn pin_start_is_monotonic_for_increasing_tops() {
        let config = StackConfig::default();
        let t = thresholds(800.0);
        let mut prev = f64::NEG_INFINITY;
        for i in 0..8 {
            let top = 300.0 + i as f64 * 700.0;
            let start = pin_start(i, top, &t, &config);
            assert!(start >= prev, "card {i}: {start} < {prev}");
            prev = start;
        }
    }

    #[test]
    fn missing_end_marker_collapses_pin_range() {
        let config = StackConfig::default();
        let t = thresholds(1000.0);
        let g = CardGeometry::new(0, 500.0, 0.0, 1000.0, &t, &config);
        assert_eq!(g.pin_end, -500.0);
        // Every non-negative scroll offset is already past the end.
        assert_eq!(g.phase(0.0), CardPhase::Settled);
    }

    #[test]
    fn phases_follow_scroll() {
        let config = StackConfig::default();
        let t = thresholds(1000.0);
        let g = CardGeometry::new(0, 500.0, 2600.0, 1000.0, &t, &config);
        assert_eq!(g.phase(199.0), CardPhase::BeforeStack);
        assert_eq!(g.phase(200.0), CardPhase::Pinned);
        assert_eq!(g.phase(2100.0), CardPhase::Pinned);
        assert_eq!(g.phase(2100.5), CardPhase::Settled);
    }
}
