// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inline-style card writes.

use alloc::format;
use alloc::string::{String, ToString as _};
use alloc::vec::Vec;

use scroll_stack_core::backend::{CardPresenter, CardSetup};
use scroll_stack_core::synth::CardTransform;
use scroll_stack_core::transform::Transform3d;
use web_sys::HtmlElement;

/// Writes [`CardTransform`]s to card elements as inline styles.
///
/// The composed translate/scale/rotate is written as one CSS `matrix3d()`
/// relative to a `top center` origin. Blur becomes a `filter`, and paint
/// order a `z-index`.
pub struct DomCardPresenter {
    cards: Vec<HtmlElement>,
}

impl core::fmt::Debug for DomCardPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomCardPresenter")
            .field("cards_len", &self.cards.len())
            .finish()
    }
}

impl DomCardPresenter {
    /// Creates a presenter for `cards`, in stack order.
    #[must_use]
    pub fn new(cards: Vec<HtmlElement>) -> Self {
        Self { cards }
    }
}

impl CardPresenter for DomCardPresenter {
    fn bind(&mut self, setup: &CardSetup) {
        for (i, card) in self.cards.iter().enumerate() {
            let s = card.style();
            if let Some(gap) = setup.gap_after(i) {
                let _ = s.set_property("margin-bottom", &format!("{gap}px"));
            }
            let _ = s.set_property("will-change", "transform, filter");
            let _ = s.set_property("transform-origin", "top center");
            let _ = s.set_property("backface-visibility", "hidden");
            let _ = s.set_property("transform", "translateZ(0)");
            let _ = s.set_property("perspective", "1000px");
        }
    }

    fn apply(&mut self, index: usize, transform: &CardTransform) {
        let Some(card) = self.cards.get(index) else {
            return;
        };
        let s = card.style();
        let _ = s.set_property("transform", &matrix3d_css(&transform.to_matrix()));
        match filter_css(transform.blur) {
            Some(filter) => {
                let _ = s.set_property("filter", &filter);
            }
            None => {
                let _ = s.remove_property("filter");
            }
        }
        let _ = s.set_property("z-index", &transform.z_index.to_string());
    }

    fn release(&mut self) {
        self.cards.clear();
    }
}

/// Formats a transform as a CSS `matrix3d()` value.
fn matrix3d_css(xf: &Transform3d) -> String {
    let c0 = xf.col(0);
    let c1 = xf.col(1);
    let c2 = xf.col(2);
    let c3 = xf.col(3);

    format!(
        "matrix3d({},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{})",
        c0[0],
        c0[1],
        c0[2],
        c0[3],
        c1[0],
        c1[1],
        c1[2],
        c1[3],
        c2[0],
        c2[1],
        c2[2],
        c2[3],
        c3[0],
        c3[1],
        c3[2],
        c3[3],
    )
}

/// `blur(Npx)` for a positive radius; `None` clears the filter.
fn filter_css(blur: f64) -> Option<String> {
    (blur > 0.0).then(|| format!("blur({blur}px)"))
}
