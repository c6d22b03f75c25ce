// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll and resize subscription.
//!
//! [`ScrollListener`] registers one JS closure as a passive `scroll` listener
//! on the scroll target and as a `resize` listener on the window. Both
//! registrations are removed when the listener is dropped.

use alloc::boxed::Box;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{AddEventListenerOptions, EventTarget, Window};

type ListenerClosure = Closure<dyn FnMut()>;

/// A live `scroll` + `resize` subscription.
///
/// The callback runs synchronously inside the browser's event dispatch, so it
/// may be invoked again before a previous invocation has returned if the
/// callback itself causes scrolling; pair it with
/// [`SharedStack`](scroll_stack_core::engine::SharedStack) to drop those
/// nested calls.
pub struct ScrollListener {
    scroll_target: EventTarget,
    resize_target: EventTarget,
    closure: ListenerClosure,
}

impl ScrollListener {
    /// Subscribes `callback` to scroll events on `scroll_target` and resize
    /// events on `window`.
    ///
    /// # Errors
    ///
    /// Fails if either `addEventListener` call throws. A failure after the
    /// first registration removes it again.
    pub fn new(
        window: &Window,
        scroll_target: EventTarget,
        callback: impl FnMut() + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut()>);
        let resize_target: EventTarget = window.clone().into();

        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        scroll_target.add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            closure.as_ref().unchecked_ref(),
            &options,
        )?;

        if let Err(err) =
            resize_target.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        {
            let _ = scroll_target
                .remove_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
            return Err(err);
        }

        Ok(Self {
            scroll_target,
            resize_target,
            closure,
        })
    }
}

impl Drop for ScrollListener {
    fn drop(&mut self) {
        let _ = self
            .scroll_target
            .remove_event_listener_with_callback("scroll", self.closure.as_ref().unchecked_ref());
        let _ = self
            .resize_target
            .remove_event_listener_with_callback("resize", self.closure.as_ref().unchecked_ref());
    }
}

impl core::fmt::Debug for ScrollListener {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollListener")
            .field("scroll_target", &"EventTarget")
            .field("resize_target", &"EventTarget")
            .finish_non_exhaustive()
    }
}
