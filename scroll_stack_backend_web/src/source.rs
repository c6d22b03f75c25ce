// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM geometry sampling.

use alloc::vec::Vec;

use scroll_stack_core::config::ScrollMode;
use scroll_stack_core::source::ScrollSource;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{HtmlElement, Node, NodeList, Window};

/// Class selector of the stacked cards.
pub const CARD_SELECTOR: &str = ".scroll-stack-card";

/// Class selector of the end-of-stack sentinel.
pub const END_SELECTOR: &str = ".scroll-stack-end";

/// Class name given to a sentinel created by
/// [`ensure_end`](DomScrollSource::ensure_end).
pub const END_CLASS: &str = "scroll-stack-end";

/// A [`ScrollSource`] that reads live DOM geometry.
///
/// In [`ScrollMode::Window`] the document scrolls: offsets are document
/// relative (`getBoundingClientRect().top + scrollY`) and the container is
/// the viewport. In [`ScrollMode::Contained`] the scroller element scrolls:
/// offsets come from `offsetTop` and the container is the scroller's client
/// box.
pub struct DomScrollSource {
    window: Window,
    scroller: HtmlElement,
    mode: ScrollMode,
    cards: Vec<HtmlElement>,
    end: Option<HtmlElement>,
    /// Whether `end` was created by us rather than found in the markup.
    owns_end: bool,
}

impl core::fmt::Debug for DomScrollSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomScrollSource")
            .field("window", &"Window")
            .field("scroller", &"HtmlElement")
            .field("mode", &self.mode)
            .field("cards_len", &self.cards.len())
            .field("end", &self.end.is_some())
            .field("owns_end", &self.owns_end)
            .finish()
    }
}

impl DomScrollSource {
    /// Finds the cards and the end sentinel.
    ///
    /// Window mode searches the whole document; contained mode searches the
    /// scroller's subtree. A missing sentinel is not an error.
    ///
    /// # Errors
    ///
    /// Fails if there is no global `window` or `document`, or if a selector
    /// query throws.
    pub fn discover(scroller: HtmlElement, mode: ScrollMode) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global `window`"))?;

        let (cards, end) = match mode {
            ScrollMode::Window => {
                let document = window
                    .document()
                    .ok_or_else(|| JsValue::from_str("no global `document`"))?;
                (
                    document.query_selector_all(CARD_SELECTOR)?,
                    document.query_selector(END_SELECTOR)?,
                )
            }
            ScrollMode::Contained => (
                scroller.query_selector_all(CARD_SELECTOR)?,
                scroller.query_selector(END_SELECTOR)?,
            ),
        };

        Ok(Self {
            window,
            scroller,
            mode,
            cards: html_elements(&cards),
            end: end.and_then(|el| el.dyn_into::<HtmlElement>().ok()),
            owns_end: false,
        })
    }

    /// Appends an empty end sentinel after the last card if none was found.
    ///
    /// Without a sentinel every card counts as settled from the first pass.
    /// The sentinel goes into the last card's parent, or the scroller when
    /// there are no cards. Returns `true` if one was created.
    ///
    /// # Errors
    ///
    /// Fails if the element cannot be created or inserted.
    pub fn ensure_end(&mut self) -> Result<bool, JsValue> {
        if self.end.is_some() {
            return Ok(false);
        }
        let document = self
            .window
            .document()
            .ok_or_else(|| JsValue::from_str("no global `document`"))?;
        let sentinel: HtmlElement = document.create_element("div")?.unchecked_into();
        sentinel.set_class_name(END_CLASS);

        let parent: Node = match self.cards.last().and_then(|card| card.parent_node()) {
            Some(parent) => parent,
            None => self.scroller.clone().into(),
        };
        parent.append_child(&sentinel)?;

        self.end = Some(sentinel);
        self.owns_end = true;
        Ok(true)
    }

    /// Removes the sentinel if [`ensure_end`](Self::ensure_end) created it.
    pub fn remove_created_end(&self) {
        if self.owns_end
            && let Some(end) = &self.end
        {
            end.remove();
        }
    }

    /// The discovered cards, in stack order.
    #[must_use]
    pub fn cards(&self) -> &[HtmlElement] {
        &self.cards
    }

    /// The scroller element passed to [`discover`](Self::discover).
    #[must_use]
    pub fn scroller(&self) -> &HtmlElement {
        &self.scroller
    }

    /// The global window.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Where scroll offsets are measured.
    #[must_use]
    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    fn element_offset(&self, el: &HtmlElement) -> f64 {
        match self.mode {
            ScrollMode::Window => el.get_bounding_client_rect().top() + self.scroll_offset(),
            ScrollMode::Contained => f64::from(el.offset_top()),
        }
    }
}

impl ScrollSource for DomScrollSource {
    fn scroll_offset(&self) -> f64 {
        match self.mode {
            ScrollMode::Window => self.window.scroll_y().unwrap_or(0.0),
            ScrollMode::Contained => f64::from(self.scroller.scroll_top()),
        }
    }

    fn container_height(&self) -> f64 {
        match self.mode {
            ScrollMode::Window => self
                .window
                .inner_height()
                .ok()
                .and_then(|h| h.as_f64())
                .unwrap_or(0.0),
            ScrollMode::Contained => f64::from(self.scroller.client_height()),
        }
    }

    fn card_count(&self) -> usize {
        self.cards.len()
    }

    fn card_top(&self, index: usize) -> f64 {
        self.cards
            .get(index)
            .map_or(0.0, |card| self.element_offset(card))
    }

    fn end_top(&self) -> Option<f64> {
        self.end.as_ref().map(|el| self.element_offset(el))
    }
}

/// Collects the `HtmlElement`s of a node list, skipping anything else.
fn html_elements(list: &NodeList) -> Vec<HtmlElement> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}
