// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The evaluation pass.
//!
//! [`StackEngine::evaluate`] runs one synchronous pass over all bound cards:
//!
//! 1. **Sample**: read scroll offset, container height, card tops, and the
//!    end marker from the [`ScrollSource`].
//! 2. **Resolve**: turn the configured thresholds into pixels and derive
//!    each card's [`CardGeometry`].
//! 3. **Synthesize**: compute every card's [`CardTransform`].
//! 4. **Gate**: hand each transform to the [`TransformCache`]; only
//!    admitted ones reach [`CardPresenter::apply`].
//!
//! Nothing about scroll history is stored apart from the gate's cache and the
//! completion flag, so passes can be run in any order.
//!
//! Hosts that deliver notifications re-entrantly share the engine through
//! [`SharedStack`], which drops a trigger that arrives while a pass is still
//! running.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::backend::{CardPresenter, CardSetup};
use crate::config::{ConfigError, StackConfig};
use crate::gate::TransformCache;
use crate::geometry::{CardGeometry, Thresholds};
use crate::progress::{CardPhase, top_card_index};
use crate::source::ScrollSource;
use crate::synth::{CardTransform, synthesize};
use crate::trace::{
    PassBeginEvent, PassEndEvent, ReentrySkippedEvent, StackCompleteEvent, Tracer,
};

/// Outcome of one [`StackEngine::evaluate`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PassReport {
    /// Pass counter.
    pub pass: u64,
    /// Cards written to the presenter.
    pub written: usize,
    /// Cards held back by the change gate.
    pub unchanged: usize,
    /// Topmost card that has reached its pin start.
    pub top_card: Option<usize>,
    /// Whether every card is settled at this pass's scroll offset.
    pub all_settled: bool,
    /// Whether this pass fired the completion hook.
    pub completed: bool,
}

type CompletionHook = Box<dyn FnMut()>;

/// Computes and applies card transforms for one mounted stack.
///
/// Owns the configuration, the last-applied transform cache, and the
/// completion state. Construct one per mounted view and call
/// [`dispose`](Self::dispose) on teardown.
pub struct StackEngine {
    config: StackConfig,
    cache: TransformCache,
    geometry: Vec<CardGeometry>,
    card_count: usize,
    pass: u64,
    completed: bool,
    on_complete: Option<CompletionHook>,
}

impl fmt::Debug for StackEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackEngine")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .field("geometry_len", &self.geometry.len())
            .field("card_count", &self.card_count)
            .field("pass", &self.pass)
            .field("completed", &self.completed)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl StackEngine {
    /// Creates an engine with no cards bound.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found by
    /// [`StackConfig::validate`].
    pub fn new(config: StackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            cache: TransformCache::new(),
            geometry: Vec::new(),
            card_count: 0,
            pass: 0,
            completed: false,
            on_complete: None,
        })
    }

    /// Sets the hook fired when every card has settled.
    ///
    /// The hook fires at most once per crossing into the settled state; it is
    /// re-armed when scroll moves back above the end of the stack. It runs in
    /// the middle of a pass, so it must not reach back into this engine.
    #[must_use]
    pub fn on_stack_complete(mut self, hook: impl FnMut() + 'static) -> Self {
        self.set_on_stack_complete(hook);
        self
    }

    /// Replaces the completion hook. See [`on_stack_complete`](Self::on_stack_complete).
    pub fn set_on_stack_complete(&mut self, hook: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(hook));
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Number of bound cards.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.card_count
    }

    /// Number of passes run so far.
    #[must_use]
    pub fn pass_count(&self) -> u64 {
        self.pass
    }

    /// Whether the stack is currently complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// The transform last written to card `index`.
    #[must_use]
    pub fn last_applied(&self, index: usize) -> Option<&CardTransform> {
        self.cache.get(index)
    }

    /// Last-applied transforms, one slot per card written so far.
    pub fn transforms(&self) -> impl Iterator<Item = Option<&CardTransform>> + '_ {
        self.cache.iter()
    }

    /// Binds the cards currently reported by `source`.
    ///
    /// Runs the presenter's one-time setup and forgets any previously applied
    /// transforms, so the next pass writes every card.
    pub fn bind<S, P>(&mut self, source: &S, presenter: &mut P)
    where
        S: ScrollSource + ?Sized,
        P: CardPresenter + ?Sized,
    {
        self.card_count = source.card_count();
        self.cache.clear();
        self.geometry.clear();
        self.completed = false;
        presenter.bind(&CardSetup {
            card_count: self.card_count,
            item_distance: self.config.item_distance,
        });
    }

    /// Runs one pass and writes every changed card to `presenter`.
    ///
    /// Does nothing when no cards are bound.
    pub fn evaluate<S, P>(
        &mut self,
        source: &S,
        presenter: &mut P,
        tracer: &mut Tracer<'_>,
    ) -> PassReport
    where
        S: ScrollSource + ?Sized,
        P: CardPresenter + ?Sized,
    {
        if self.card_count == 0 {
            return PassReport {
                pass: self.pass,
                ..PassReport::default()
            };
        }

        let pass = self.pass;
        self.pass += 1;

        let scroll = source.scroll_offset();
        let container_height = source.container_height();
        let end_top = source.end_top().unwrap_or(0.0);

        tracer.pass_begin(&PassBeginEvent {
            pass,
            scroll_offset: scroll,
            container_height,
            card_count: saturating_u32(self.card_count),
        });

        let thresholds = Thresholds::resolve(&self.config, container_height);
        self.geometry.clear();
        self.geometry.extend((0..self.card_count).map(|i| {
            CardGeometry::new(
                i,
                source.card_top(i),
                end_top,
                container_height,
                &thresholds,
                &self.config,
            )
        }));

        let top_card = top_card_index(scroll, self.geometry.iter().map(|g| g.pin_start));

        let mut report = PassReport {
            pass,
            top_card,
            all_settled: true,
            ..PassReport::default()
        };

        for geometry in &self.geometry {
            let transform = synthesize(geometry, scroll, &thresholds, &self.config, top_card);
            let phase = geometry.phase(scroll);
            report.all_settled &= phase == CardPhase::Settled;

            let written = self.cache.admit(geometry.index, transform);
            if written {
                presenter.apply(geometry.index, &transform);
                report.written += 1;
            } else {
                report.unchanged += 1;
            }

            #[cfg(feature = "trace-rich")]
            tracer.card(&crate::trace::CardEvent {
                pass,
                card: saturating_u32(geometry.index),
                phase,
                progress: crate::synth::scale_progress(geometry, scroll),
                transform,
                written,
            });
        }

        if report.all_settled {
            if !self.completed {
                self.completed = true;
                report.completed = true;
                tracer.stack_complete(&StackCompleteEvent {
                    pass,
                    scroll_offset: scroll,
                });
                if let Some(hook) = &mut self.on_complete {
                    hook();
                }
            }
        } else {
            self.completed = false;
        }

        tracer.pass_end(&PassEndEvent {
            pass,
            written: saturating_u32(report.written),
            unchanged: saturating_u32(report.unchanged),
        });

        report
    }

    /// Tears the binding down: clears the cache and completion state and
    /// releases the presenter.
    pub fn dispose<P>(&mut self, presenter: &mut P)
    where
        P: CardPresenter + ?Sized,
    {
        self.cache.clear();
        self.geometry.clear();
        self.card_count = 0;
        self.completed = false;
        presenter.release();
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// SharedStack
// ---------------------------------------------------------------------------

/// A reference-counted engine handle with a re-entrancy guard.
///
/// Listener closures each hold a clone. [`trigger`](Self::trigger) runs a
/// pass unless one is already in flight, in which case the nested trigger is
/// dropped (not queued) and reported through
/// [`TraceSink::on_reentry_skipped`](crate::trace::TraceSink::on_reentry_skipped).
#[derive(Clone)]
pub struct SharedStack {
    inner: Rc<SharedInner>,
}

struct SharedInner {
    engine: RefCell<StackEngine>,
    /// Set for the duration of a pass.
    updating: Cell<bool>,
    /// Counter of the pass in flight, for skip events.
    in_flight: Cell<u64>,
}

impl fmt::Debug for SharedStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedStack")
            .field("updating", &self.inner.updating.get())
            .field("handles", &Rc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}

/// Clears the updating flag even if a pass unwinds.
struct UpdatingGuard<'a>(&'a Cell<bool>);

impl Drop for UpdatingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl SharedStack {
    /// Wraps `engine` for shared use.
    #[must_use]
    pub fn new(engine: StackEngine) -> Self {
        Self {
            inner: Rc::new(SharedInner {
                engine: RefCell::new(engine),
                updating: Cell::new(false),
                in_flight: Cell::new(0),
            }),
        }
    }

    /// Returns `true` while a pass is running.
    #[must_use]
    pub fn is_updating(&self) -> bool {
        self.inner.updating.get()
    }

    /// Runs a pass, or returns `None` if one is already in flight or the
    /// engine is borrowed through [`with_engine`](Self::with_engine).
    pub fn trigger<S, P>(
        &self,
        source: &S,
        presenter: &mut P,
        tracer: &mut Tracer<'_>,
    ) -> Option<PassReport>
    where
        S: ScrollSource + ?Sized,
        P: CardPresenter + ?Sized,
    {
        let skipped = ReentrySkippedEvent {
            pass: self.inner.in_flight.get(),
        };
        if self.inner.updating.get() {
            tracer.reentry_skipped(&skipped);
            return None;
        }
        // Borrowed elsewhere, e.g. from inside `with_engine`.
        let Ok(mut engine) = self.inner.engine.try_borrow_mut() else {
            tracer.reentry_skipped(&skipped);
            return None;
        };
        self.inner.updating.set(true);
        let _guard = UpdatingGuard(&self.inner.updating);
        self.inner.in_flight.set(engine.pass_count());
        Some(engine.evaluate(source, presenter, tracer))
    }

    /// Runs `f` with exclusive access to the engine, or returns `None` while a
    /// pass is in flight.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut StackEngine) -> R) -> Option<R> {
        if self.inner.updating.get() {
            return None;
        }
        let mut engine = self.inner.engine.try_borrow_mut().ok()?;
        Some(f(&mut engine))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Threshold;
    use crate::source::StaticSource;

    /// Records every presenter call.
    #[derive(Default)]
    struct RecordingPresenter {
        setup: Option<CardSetup>,
        writes: Vec<(usize, CardTransform)>,
        released: bool,
    }

    impl CardPresenter for RecordingPresenter {
        fn bind(&mut self, setup: &CardSetup) {
            self.setup = Some(*setup);
        }

        fn apply(&mut self, index: usize, transform: &CardTransform) {
            self.writes.push((index, *transform));
        }

        fn release(&mut self) {
            self.released = true;
        }
    }

    /// Three 300px cards at 500, 1200, 1900 in a 1000px container; the end
    /// marker sits at 2200, so every card settles after scroll 1700.
    fn source() -> StaticSource {
        StaticSource::stacked(3, 500.0, 300.0, 400.0, 1000.0)
    }

    fn bound(config: StackConfig) -> (StackEngine, RecordingPresenter) {
        let mut engine = StackEngine::new(config).unwrap();
        let mut presenter = RecordingPresenter::default();
        engine.bind(&source(), &mut presenter);
        (engine, presenter)
    }

    fn run(engine: &mut StackEngine, presenter: &mut RecordingPresenter, scroll: f64) -> PassReport {
        engine.evaluate(&source().at(scroll), presenter, &mut Tracer::none())
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = StackConfig {
            base_scale: f64::NAN,
            ..StackConfig::default()
        };
        assert_eq!(
            StackEngine::new(config).unwrap_err(),
            ConfigError::NonFinite {
                field: "base_scale"
            }
        );
    }

    #[test]
    fn bind_runs_presenter_setup() {
        let (engine, presenter) = bound(StackConfig::default());
        assert_eq!(engine.card_count(), 3);
        assert_eq!(
            presenter.setup,
            Some(CardSetup {
                card_count: 3,
                item_distance: 400.0,
            })
        );
    }

    #[test]
    fn unbound_engine_does_nothing() {
        let mut engine = StackEngine::new(StackConfig::default()).unwrap();
        let mut presenter = RecordingPresenter::default();
        let report = run(&mut engine, &mut presenter, 500.0);
        assert_eq!(report.written, 0);
        assert!(!report.all_settled);
        assert!(presenter.writes.is_empty());
        assert_eq!(engine.pass_count(), 0);
    }

    #[test]
    fn first_pass_writes_every_card() {
        let (mut engine, mut presenter) = bound(StackConfig::default());
        let report = run(&mut engine, &mut presenter, 0.0);
        assert_eq!(report.written, 3);
        assert_eq!(report.top_card, None);
        let indices: Vec<usize> = presenter.writes.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, [0, 1, 2]);
        assert_eq!(engine.transforms().flatten().count(), 3);
        for (i, xf) in &presenter.writes {
            assert_eq!(*xf, CardTransform::rest(*i));
        }
    }

    #[test]
    fn re_evaluation_is_idempotent() {
        let (mut engine, mut presenter) = bound(StackConfig::default());
        run(&mut engine, &mut presenter, 950.0);
        let writes = presenter.writes.len();
        let report = run(&mut engine, &mut presenter, 950.0);
        assert_eq!(report.written, 0);
        assert_eq!(report.unchanged, 3);
        assert_eq!(presenter.writes.len(), writes);
    }

    #[test]
    fn sub_tolerance_scroll_is_gated() {
        let (mut engine, mut presenter) = bound(StackConfig::default());
        // Cards 0 and 1 are pinned and fully scaled; card 2 is before its pin.
        run(&mut engine, &mut presenter, 1200.0);
        assert_eq!(engine.last_applied(0).unwrap().translate_y, 1000.0);

        let report = run(&mut engine, &mut presenter, 1200.03);
        assert_eq!(report.written, 0);
        assert_eq!(engine.last_applied(0).unwrap().translate_y, 1000.0);

        let report = run(&mut engine, &mut presenter, 1200.1);
        assert_eq!(report.written, 2);
        assert_eq!(engine.last_applied(0).unwrap().translate_y, 1000.1);
        assert_eq!(engine.last_applied(2).unwrap().translate_y, 0.0);
    }

    #[test]
    fn three_card_scenario() {
        let (mut engine, mut presenter) = bound(StackConfig::default());

        // Card 0 pins at 500 - 300 = 200.
        run(&mut engine, &mut presenter, 200.0);
        let c0 = *engine.last_applied(0).unwrap();
        assert_eq!(c0.scale, 1.0);
        assert_eq!(c0.translate_y, 0.0);

        // Past its scale end (500 - 100 = 400) card 0 rests at base scale.
        run(&mut engine, &mut presenter, 600.0);
        let c0 = *engine.last_applied(0).unwrap();
        assert_eq!(c0.scale, 0.85);
        assert_eq!(c0.translate_y, 400.0);

        // Pin end is 2200 - 1000 / 2 = 1700; translation freezes after it.
        run(&mut engine, &mut presenter, 1700.0);
        let frozen = engine.last_applied(0).unwrap().translate_y;
        assert_eq!(frozen, 1500.0);
        let report = run(&mut engine, &mut presenter, 2400.0);
        assert_eq!(engine.last_applied(0).unwrap().translate_y, frozen);
        assert!(report.all_settled);

        // Later cards rest at larger scales.
        assert_eq!(engine.last_applied(1).unwrap().scale, 0.88);
        assert_eq!(engine.last_applied(2).unwrap().scale, 0.91);
    }

    #[test]
    fn blur_scenario() {
        let (mut engine, mut presenter) = bound(StackConfig {
            blur_amount: 4.0,
            ..StackConfig::default()
        });
        // Card 2 pins at 1900 - 300 - 40 = 1560.
        let report = run(&mut engine, &mut presenter, 1600.0);
        assert_eq!(report.top_card, Some(2));
        let blurs: Vec<f64> = (0..3)
            .map(|i| engine.last_applied(i).unwrap().blur)
            .collect();
        assert_eq!(blurs, [8.0, 4.0, 0.0]);
    }

    #[test]
    fn completion_fires_once_per_crossing() {
        let fired = Rc::new(Cell::new(0_u32));
        let counter = Rc::clone(&fired);
        let mut engine = StackEngine::new(StackConfig::default())
            .unwrap()
            .on_stack_complete(move || counter.set(counter.get() + 1));
        let mut presenter = RecordingPresenter::default();
        engine.bind(&source(), &mut presenter);

        assert!(!run(&mut engine, &mut presenter, 1700.0).completed);
        assert_eq!(fired.get(), 0);

        assert!(run(&mut engine, &mut presenter, 1800.0).completed);
        assert!(!run(&mut engine, &mut presenter, 2000.0).completed);
        assert_eq!(fired.get(), 1);
        assert!(engine.is_complete());

        // Scrolling back re-arms the hook.
        run(&mut engine, &mut presenter, 1000.0);
        assert!(!engine.is_complete());
        run(&mut engine, &mut presenter, 1900.0);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn missing_end_marker_settles_immediately() {
        let (mut engine, mut presenter) = bound(StackConfig::default());
        let mut src = source();
        src.end = None;
        let report = engine.evaluate(&src, &mut presenter, &mut Tracer::none());
        assert!(report.all_settled);
        assert!(report.completed);
    }

    #[test]
    fn pixel_thresholds_ignore_container_height() {
        let config = StackConfig {
            stack_position: Threshold::Pixels(50.0),
            header_offset: 0.0,
            ..StackConfig::default()
        };
        let (mut engine, mut presenter) = bound(config);
        // Card 0 pins at 500 - 50 = 450.
        run(&mut engine, &mut presenter, 460.0);
        assert_eq!(engine.last_applied(0).unwrap().translate_y, 10.0);
    }

    #[test]
    fn dispose_releases_and_forgets() {
        let (mut engine, mut presenter) = bound(StackConfig::default());
        run(&mut engine, &mut presenter, 300.0);
        engine.dispose(&mut presenter);
        assert!(presenter.released);
        assert_eq!(engine.card_count(), 0);
        assert!(engine.last_applied(0).is_none());

        let writes = presenter.writes.len();
        run(&mut engine, &mut presenter, 400.0);
        assert_eq!(presenter.writes.len(), writes);
    }

    /// Re-triggers the shared engine from inside `apply`.
    struct ReentrantPresenter {
        shared: SharedStack,
        source: StaticSource,
        nested: Vec<Option<PassReport>>,
    }

    impl CardPresenter for ReentrantPresenter {
        fn bind(&mut self, _setup: &CardSetup) {}

        fn apply(&mut self, _index: usize, _transform: &CardTransform) {
            let mut inner = RecordingPresenter::default();
            let nested = self
                .shared
                .trigger(&self.source, &mut inner, &mut Tracer::none());
            self.nested.push(nested);
        }
    }

    #[test]
    fn reentrant_triggers_are_dropped() {
        let src = source();
        let mut engine = StackEngine::new(StackConfig::default()).unwrap();
        engine.bind(&src, &mut RecordingPresenter::default());
        let shared = SharedStack::new(engine);

        let mut presenter = ReentrantPresenter {
            shared: shared.clone(),
            source: src.at(300.0),
            nested: Vec::new(),
        };
        let report = shared
            .trigger(&src.at(300.0), &mut presenter, &mut Tracer::none())
            .unwrap();

        assert_eq!(report.written, 3);
        assert_eq!(presenter.nested, [None, None, None]);
        assert!(!shared.is_updating());
        assert_eq!(shared.with_engine(|e| e.pass_count()), Some(1));
    }

    #[cfg(feature = "trace")]
    #[test]
    fn passes_are_traced() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Counts {
            begins: u32,
            ends: Vec<PassEndEvent>,
            completes: u32,
        }
        impl TraceSink for Counts {
            fn on_pass_begin(&mut self, _e: &PassBeginEvent) {
                self.begins += 1;
            }
            fn on_pass_end(&mut self, e: &PassEndEvent) {
                self.ends.push(*e);
            }
            fn on_stack_complete(&mut self, _e: &StackCompleteEvent) {
                self.completes += 1;
            }
        }

        let (mut engine, mut presenter) = bound(StackConfig::default());
        let mut sink = Counts::default();
        let mut tracer = Tracer::new(&mut sink);
        engine.evaluate(&source().at(0.0), &mut presenter, &mut tracer);
        engine.evaluate(&source().at(0.0), &mut presenter, &mut tracer);
        engine.evaluate(&source().at(3000.0), &mut presenter, &mut tracer);
        drop(tracer);

        assert_eq!(sink.begins, 3);
        assert_eq!(sink.completes, 1);
        assert_eq!(
            sink.ends[1],
            PassEndEvent {
                pass: 1,
                written: 0,
                unchanged: 3,
            }
        );
    }

    #[cfg(feature = "trace")]
    #[test]
    fn trigger_inside_with_engine_is_traced() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Skips(Vec<ReentrySkippedEvent>);
        impl TraceSink for Skips {
            fn on_reentry_skipped(&mut self, e: &ReentrySkippedEvent) {
                self.0.push(*e);
            }
        }

        let (engine, _) = bound(StackConfig::default());
        let shared = SharedStack::new(engine);
        let mut sink = Skips::default();
        let mut presenter = RecordingPresenter::default();

        let nested = shared.with_engine(|_| {
            let mut tracer = Tracer::new(&mut sink);
            shared.trigger(&source().at(300.0), &mut presenter, &mut tracer)
        });
        assert_eq!(nested, Some(None));
        assert!(presenter.writes.is_empty());
        assert_eq!(sink.0, [ReentrySkippedEvent { pass: 0 }]);
    }
}
