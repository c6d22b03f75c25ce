// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change gating for presenter writes.
//!
//! Scroll and resize notifications arrive far more often than a card's
//! transform visibly changes. [`TransformCache`] remembers the last
//! transform written to each card and only admits a new one when some
//! component moved beyond [`Tolerance`].
//!
//! The cache is owned by one [`StackEngine`](crate::engine::StackEngine) and
//! is cleared on [`dispose`](crate::engine::StackEngine::dispose).

use alloc::vec::Vec;

use crate::synth::CardTransform;

/// Per-component thresholds below which a change is ignored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    /// Translation, in pixels.
    pub translate: f64,
    /// Scale factor.
    pub scale: f64,
    /// Rotation, in degrees.
    pub rotation: f64,
    /// Blur radius, in pixels.
    pub blur: f64,
}

impl Tolerance {
    /// 0.05 px, 0.0005 scale, 0.05°, 0.05 px blur.
    pub const DEFAULT: Self = Self {
        translate: 0.05,
        scale: 0.0005,
        rotation: 0.05,
        blur: 0.05,
    };
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl CardTransform {
    /// Returns `true` if any component differs from `other` by more than
    /// `tolerance`.
    ///
    /// Z-index is not compared; it is a function of the card index alone.
    #[must_use]
    pub fn differs_from(&self, other: &Self, tolerance: Tolerance) -> bool {
        (self.translate_y - other.translate_y).abs() > tolerance.translate
            || (self.scale - other.scale).abs() > tolerance.scale
            || (self.rotation - other.rotation).abs() > tolerance.rotation
            || (self.blur - other.blur).abs() > tolerance.blur
    }
}

/// Last-applied transform per card.
#[derive(Clone, Debug, Default)]
pub struct TransformCache {
    applied: Vec<Option<CardTransform>>,
}

impl TransformCache {
    /// Creates an empty cache with [`Tolerance::DEFAULT`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides whether `transform` should be written to card `index`.
    ///
    /// On the first call for a card, or when `transform` differs from the
    /// cached one beyond tolerance, the cache is updated and `true` is
    /// returned. Otherwise the cache is left alone and `false` is returned.
    pub fn admit(&mut self, index: usize, transform: CardTransform) -> bool {
        if self.applied.len() <= index {
            self.applied.resize(index + 1, None);
        }
        if let Some(last) = &self.applied[index]
            && !transform.differs_from(last, Tolerance::DEFAULT)
        {
            return false;
        }
        self.applied[index] = Some(transform);
        true
    }

    /// Returns the last transform admitted for card `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CardTransform> {
        self.applied.get(index).and_then(Option::as_ref)
    }

    /// Iterates the last admitted transform of every tracked card slot.
    pub fn iter(&self) -> impl Iterator<Item = Option<&CardTransform>> + '_ {
        self.applied.iter().map(Option::as_ref)
    }

    /// Number of card slots tracked so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.applied.len()
    }

    /// Returns `true` if no card has been admitted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.applied.iter().all(Option::is_none)
    }

    /// Forgets every cached transform, so the next pass writes all cards.
    pub fn clear(&mut self) {
        self.applied.clear();
    }
}
