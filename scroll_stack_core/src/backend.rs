// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for host integrations.
//!
//! A backend crate provides three pieces:
//!
//! - **Scroll source**: Implements [`ScrollSource`] by reading scroll
//!   offset and element geometry from the host.
//!
//! - **Presenter**: Implements [`CardPresenter`] to write transforms to the
//!   host's card elements.
//!
//! - **Subscription**: Calls the engine on scroll and resize notifications
//!   and stops doing so when dropped. This is backend-specific and not
//!   abstracted by a trait because listener registration and lifetime differ
//!   fundamentally across hosts.
//!
//! # Crate boundaries
//!
//! `scroll_stack_core` owns the math, the cache, and this contract module.
//! Backend crates depend on `scroll_stack_core` and provide host glue.
//!
//! [`ScrollSource`]: crate::source::ScrollSource

use crate::synth::CardTransform;

/// One-time structural setup for a bound card set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardSetup {
    /// Number of cards discovered.
    pub card_count: usize,
    /// Gap appended after each non-final card.
    pub item_distance: f64,
}

impl CardSetup {
    /// Gap to place after card `index`; the last card gets none.
    #[must_use]
    pub fn gap_after(&self, index: usize) -> Option<f64> {
        (index + 1 < self.card_count).then_some(self.item_distance)
    }
}

/// Writes card transforms to a host presentation layer.
///
/// The DOM presenter and test doubles implement this trait, enabling the
/// engine to run without a live rendering environment.
///
/// # Pass pseudocode
///
/// ```rust,ignore
/// fn on_scroll() {
///     // The engine samples the source, computes every card's transform,
///     // and calls `presenter.apply` only for cards that changed.
///     let report = engine.evaluate(&source, &mut presenter, &mut tracer);
/// }
/// ```
pub trait CardPresenter {
    /// Applies one-time styles to the freshly discovered cards.
    fn bind(&mut self, setup: &CardSetup);

    /// Writes `transform` to card `index`: translate, scale, and rotate as
    /// one composed operation, plus the blur filter and paint order.
    fn apply(&mut self, index: usize, transform: &CardTransform);

    /// Releases the cards. Called once on engine disposal.
    fn release(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_card_has_no_gap() {
        let setup = CardSetup {
            card_count: 3,
            item_distance: 400.0,
        };
        assert_eq!(setup.gap_after(0), Some(400.0));
        assert_eq!(setup.gap_after(1), Some(400.0));
        assert_eq!(setup.gap_after(2), None);
    }
}
