// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll progress and card phases.
//!
//! A card moves through three phases as scroll increases:
//!
//! ```text
//!   BeforeStack ──(scroll ≥ pin_start)──► Pinned ──(scroll > pin_end)──► Settled
//! ```
//!
//! No transition is stored. The phase is recomputed from the current scroll
//! offset on every pass, so scrolling back up walks the same states in
//! reverse.

/// Where a card is in its stacking lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardPhase {
    /// Scroll has not reached the card's pin start; it sits in the flow.
    BeforeStack,
    /// The card tracks scroll 1:1 and stays put on screen.
    Pinned,
    /// Scroll has passed the end of the stack; the card's offset is frozen.
    Settled,
}

/// Linear progress of `scroll` from `start` (0) to `end` (1), clamped.
///
/// An empty or inverted range (`start >= end`) behaves like a step at `end`,
/// so the result is always finite.
#[must_use]
pub fn progress(scroll: f64, start: f64, end: f64) -> f64 {
    if scroll < start {
        return 0.0;
    }
    if scroll >= end {
        return 1.0;
    }
    ((scroll - start) / (end - start)).clamp(0.0, 1.0)
}

/// Index of the topmost card that has reached its pin start.
///
/// `pin_starts` are the per-card pin-start offsets in stack order. Returns
/// `None` when no card has pinned yet.
#[must_use]
pub fn top_card_index(scroll: f64, pin_starts: impl IntoIterator<Item = f64>) -> Option<usize> {
    pin_starts
        .into_iter()
        .enumerate()
        .filter(|&(_, start)| scroll >= start)
        .map(|(i, _)| i)
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_clamps_to_unit_range() {
        assert_eq!(progress(-50.0, 0.0, 100.0), 0.0);
        assert_eq!(progress(0.0, 0.0, 100.0), 0.0);
        assert_eq!(progress(25.0, 0.0, 100.0), 0.25);
        assert_eq!(progress(100.0, 0.0, 100.0), 1.0);
        assert_eq!(progress(1e9, 0.0, 100.0), 1.0);
    }

    #[test]
    fn empty_range_is_a_step() {
        assert_eq!(progress(9.0, 10.0, 10.0), 0.0);
        assert_eq!(progress(10.0, 10.0, 10.0), 1.0);
        // Inverted: the card's scale end lies before its pin start.
        assert_eq!(progress(15.0, 20.0, 10.0), 0.0);
        assert_eq!(progress(25.0, 20.0, 10.0), 1.0);
    }

    #[test]
    fn progress_is_monotonic() {
        let mut prev = 0.0;
        for step in 0..=40 {
            let p = progress(f64::from(step) * 5.0, 20.0, 180.0);
            assert!(p >= prev, "step {step}: {p} < {prev}");
            assert!((0.0..=1.0).contains(&p), "step {step}: {p} out of range");
            prev = p;
        }
    }

    #[test]
    fn top_card_is_last_pinned() {
        let starts = [200.0, 880.0, 1560.0];
        assert_eq!(top_card_index(0.0, starts), None);
        assert_eq!(top_card_index(200.0, starts), Some(0));
        assert_eq!(top_card_index(1000.0, starts), Some(1));
        assert_eq!(top_card_index(1560.0, starts), Some(2));
        assert_eq!(top_card_index(1e6, starts), Some(2));
    }
}
