// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A mounted scroll stack.

use alloc::rc::Rc;
use alloc::string::ToString as _;
use core::cell::RefCell;

use scroll_stack_core::config::{ScrollMode, StackConfig};
use scroll_stack_core::engine::{PassReport, SharedStack, StackEngine};
use scroll_stack_core::trace::Tracer;
use wasm_bindgen::JsValue;
use web_sys::{EventTarget, HtmlElement};

use crate::listener::ScrollListener;
use crate::presenter::DomCardPresenter;
use crate::source::DomScrollSource;

/// A stack bound to live DOM elements.
///
/// Mounting discovers the cards, appends an end sentinel if the markup has
/// none, applies the one-time card styles, runs an initial pass, and
/// subscribes to scroll and resize notifications. Dropping the handle
/// unsubscribes, disposes the engine, and removes a sentinel it created.
pub struct ScrollStack {
    inner: Rc<StackInner>,
    listener: Option<ScrollListener>,
}

struct StackInner {
    shared: SharedStack,
    source: DomScrollSource,
    presenter: RefCell<DomCardPresenter>,
}

impl StackInner {
    fn run_pass(&self) -> Option<PassReport> {
        let mut presenter = self.presenter.try_borrow_mut().ok()?;
        self.shared
            .trigger(&self.source, &mut *presenter, &mut Tracer::none())
    }
}

impl ScrollStack {
    /// Mounts a stack with a fresh engine for `config`.
    ///
    /// # Errors
    ///
    /// Fails if `config` is invalid, if the DOM cannot be queried, or if the
    /// listeners cannot be registered.
    pub fn mount(scroller: HtmlElement, config: StackConfig) -> Result<Self, JsValue> {
        let engine = StackEngine::new(config).map_err(|err| JsValue::from_str(&err.to_string()))?;
        Self::mount_engine(scroller, engine)
    }

    /// Mounts a stack driven by `engine`, for example one carrying a
    /// completion hook.
    ///
    /// # Errors
    ///
    /// Fails if the DOM cannot be queried or the listeners cannot be
    /// registered.
    pub fn mount_engine(scroller: HtmlElement, mut engine: StackEngine) -> Result<Self, JsValue> {
        let mode = engine.config().scroll_mode;
        let mut source = DomScrollSource::discover(scroller, mode)?;
        source.ensure_end()?;
        let mut presenter = DomCardPresenter::new(source.cards().to_vec());
        engine.bind(&source, &mut presenter);

        let scroll_target: EventTarget = match mode {
            ScrollMode::Window => source.window().clone().into(),
            ScrollMode::Contained => source.scroller().clone().into(),
        };
        let window = source.window().clone();

        let inner = Rc::new(StackInner {
            shared: SharedStack::new(engine),
            source,
            presenter: RefCell::new(presenter),
        });
        inner.run_pass();

        let listener_inner = Rc::clone(&inner);
        let listener = ScrollListener::new(&window, scroll_target, move || {
            listener_inner.run_pass();
        })
        .inspect_err(|_| inner.source.remove_created_end())?;

        Ok(Self {
            inner,
            listener: Some(listener),
        })
    }

    /// Runs a pass now, e.g. after the host changed layout without scrolling.
    ///
    /// Returns `None` if a pass is already in flight.
    pub fn refresh(&self) -> Option<PassReport> {
        self.inner.run_pass()
    }

    /// The shared engine handle.
    #[must_use]
    pub fn shared(&self) -> &SharedStack {
        &self.inner.shared
    }
}

impl Drop for ScrollStack {
    fn drop(&mut self) {
        // Unsubscribe before tearing down so no pass observes a disposed engine.
        self.listener.take();
        if let Ok(mut presenter) = self.inner.presenter.try_borrow_mut() {
            self.inner
                .shared
                .with_engine(|engine| engine.dispose(&mut *presenter));
        }
        self.inner.source.remove_created_end();
    }
}

impl core::fmt::Debug for ScrollStack {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollStack")
            .field("source", &self.inner.source)
            .field("shared", &self.inner.shared)
            .field("listening", &self.listener.is_some())
            .finish()
    }
}
