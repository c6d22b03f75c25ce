// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for scroll stacks.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`DomScrollSource`]: reads scroll offset and card offsets from the DOM
//! - [`DomCardPresenter`]: writes card transforms as inline styles
//! - [`ScrollListener`]: passive `scroll` + `resize` subscription
//! - [`ScrollStack`]: all of the above wired to a
//!   [`SharedStack`](scroll_stack_core::engine::SharedStack)
//!
//! Cards are the `.scroll-stack-card` elements (in document order) and the
//! end of the stack is marked by a `.scroll-stack-end` element.

#![no_std]

extern crate alloc;

mod listener;
mod presenter;
mod source;
mod stack;

pub use listener::ScrollListener;
pub use presenter::DomCardPresenter;
pub use scroll_stack_core::backend::CardPresenter;
pub use scroll_stack_core::source::ScrollSource;
pub use source::{CARD_SELECTOR, DomScrollSource, END_SELECTOR};
pub use stack::ScrollStack;
