// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-card transform synthesis.
//!
//! [`synthesize`] combines a card's [`CardGeometry`], the current scroll
//! offset, and the index of the topmost stacked card into a
//! [`CardTransform`]:
//!
//! - **Scale** eases from 1 to the card's resting scale
//!   `base_scale + index * item_scale` as scroll moves from the pin start to
//!   the scale end. Later cards rest larger, so the pile reads as depth.
//! - **Rotation** is `index * rotation_amount * progress`.
//! - **Blur** grows with depth below the top card: `(top - index) *
//!   blur_amount`. The top card and anything not yet covered stay sharp.
//! - **Translation** is 0 before the pin start, follows scroll while pinned,
//!   and freezes at its `pin_end` value once settled.
//! - **Z-index** is `index + 10`.
//!
//! Outputs are rounded (2 decimals, 3 for scale) so that float noise never
//! reaches the [change gate](crate::gate).

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::config::StackConfig;
use crate::geometry::{CardGeometry, Thresholds};
use crate::progress::{CardPhase, progress};
use crate::transform::Transform3d;

/// Paint order of card 0; later cards stack above it.
pub const BASE_Z_INDEX: i32 = 10;

/// The visual state written to one card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardTransform {
    /// Vertical translation in pixels.
    pub translate_y: f64,
    /// Uniform scale factor.
    pub scale: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Blur radius in pixels; `0.0` means no filter.
    pub blur: f64,
    /// Paint order.
    pub z_index: i32,
}

impl CardTransform {
    /// The untransformed state of card `index`.
    #[must_use]
    pub fn rest(index: usize) -> Self {
        Self {
            translate_y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            blur: 0.0,
            z_index: z_index(index),
        }
    }

    /// Rounds to the precision used for comparison and output.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            translate_y: round_to(self.translate_y, 100.0),
            scale: round_to(self.scale, 1000.0),
            rotation: round_to(self.rotation, 100.0),
            blur: round_to(self.blur, 100.0),
            z_index: self.z_index,
        }
    }

    /// Composes translate · scale · rotate into one matrix.
    ///
    /// The matrix is relative to the card's transform origin (top center for
    /// the DOM presenter); blur and z-order are not part of it.
    #[must_use]
    pub fn to_matrix(&self) -> Transform3d {
        Transform3d::from_translation(0.0, self.translate_y, 0.0)
            * Transform3d::from_uniform_scale(self.scale)
            * Transform3d::from_rotation_z_degrees(self.rotation)
    }
}

/// Computes the transform of the card described by `geometry` at `scroll`.
///
/// `top_card` is the index of the topmost pinned card (see
/// [`top_card_index`](crate::progress::top_card_index)); it is only
/// consulted when `blur_amount` is non-zero.
#[must_use]
pub fn synthesize(
    geometry: &CardGeometry,
    scroll: f64,
    thresholds: &Thresholds,
    config: &StackConfig,
    top_card: Option<usize>,
) -> CardTransform {
    let index = geometry.index;
    let i = index as f64;

    let p = scale_progress(geometry, scroll);
    let target_scale = config.base_scale + i * config.item_scale;
    let scale = 1.0 - p * (1.0 - target_scale);

    let rotation = if config.rotation_amount == 0.0 {
        0.0
    } else {
        i * config.rotation_amount * p
    };

    let blur = match top_card {
        Some(top) if config.blur_amount != 0.0 && index < top => {
            ((top - index) as f64 * config.blur_amount).max(0.0)
        }
        _ => 0.0,
    };

    let translate_y = match geometry.phase(scroll) {
        CardPhase::BeforeStack => 0.0,
        CardPhase::Pinned => geometry.slot_offset(scroll, thresholds, config),
        CardPhase::Settled => geometry.slot_offset(geometry.pin_end, thresholds, config),
    };

    CardTransform {
        translate_y,
        scale,
        rotation,
        blur,
        z_index: z_index(index),
    }
    .rounded()
}

/// Scale progress of a card: 0 at its pin start, 1 at its scale end.
#[inline]
#[must_use]
pub fn scale_progress(geometry: &CardGeometry, scroll: f64) -> f64 {
    progress(scroll, geometry.pin_start, geometry.scale_end)
}

fn z_index(index: usize) -> i32 {
    i32::try_from(index).map_or(i32::MAX, |i| i.saturating_add(BASE_Z_INDEX))
}

fn round_to(value: f64, factor: f64) -> f64 {
    let r = (value * factor).round() / factor;
    // Normalize -0.0 so cached and fresh values print identically.
    if r == 0.0 { 0.0 } else { r }
}
