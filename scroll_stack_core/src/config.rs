// Copyright 2026 the Scroll Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack configuration and validation.
//!
//! A [`StackConfig`] is immutable for the lifetime of a
//! [`StackEngine`](crate::engine::StackEngine); changing any tunable means
//! constructing a new engine.
//!
//! Trigger positions are [`Threshold`] values: either a percentage of the
//! container height or an absolute pixel distance. They can be parsed from
//! the usual CSS-ish spellings:
//!
//! ```
//! use scroll_stack_core::config::Threshold;
//!
//! assert_eq!("20%".parse::<Threshold>(), Ok(Threshold::Percent(20.0)));
//! assert_eq!("150px".parse::<Threshold>(), Ok(Threshold::Pixels(150.0)));
//! assert_eq!("64".parse::<Threshold>(), Ok(Threshold::Pixels(64.0)));
//! assert!("top".parse::<Threshold>().is_err());
//! ```

use alloc::string::{String, ToString as _};
use core::fmt;
use core::str::FromStr;

/// A trigger position measured from the top of the scroll container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Threshold {
    /// Percentage of the container height (`20.0` means 20%).
    Percent(f64),
    /// Absolute distance in pixels.
    Pixels(f64),
}

impl Threshold {
    /// Returns the raw numeric value, whatever the unit.
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Percent(v) | Self::Pixels(v) => v,
        }
    }
}

impl FromStr for Threshold {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ConfigError::InvalidThreshold {
            value: trimmed.to_string(),
        };

        let (number, make): (&str, fn(f64) -> Self) =
            if let Some(number) = trimmed.strip_suffix('%') {
                (number, Self::Percent)
            } else if let Some(number) = trimmed.strip_suffix("px") {
                (number, Self::Pixels)
            } else {
                (trimmed, Self::Pixels)
            };

        let value: f64 = number.trim_end().parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        Ok(make(value))
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(v) => write!(f, "{v}%"),
            Self::Pixels(v) => write!(f, "{v}px"),
        }
    }
}

/// Where scroll position and card offsets are read from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollMode {
    /// The whole document scrolls; offsets are document-relative.
    Window,
    /// A dedicated scroll container; offsets are container-relative.
    #[default]
    Contained,
}

/// Tunables for a card stack.
///
/// All distances are in CSS pixels. Use [`StackConfig::default`] and override
/// the fields you need, then hand the result to
/// [`StackEngine::new`](crate::engine::StackEngine::new), which validates it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackConfig {
    /// Vertical gap appended after every card except the last.
    pub item_distance: f64,
    /// Additional resting scale per card index.
    pub item_scale: f64,
    /// Additional pin offset per card index, so stacked cards peek out below
    /// each other.
    pub item_stack_distance: f64,
    /// Where a card starts pinning.
    pub stack_position: Threshold,
    /// Where a card reaches its resting scale.
    pub scale_end_position: Threshold,
    /// Resting scale of card 0 once fully stacked.
    pub base_scale: f64,
    /// Degrees of rotation per card index at full progress.
    pub rotation_amount: f64,
    /// Blur radius in pixels per level of depth below the top card.
    pub blur_amount: f64,
    /// Document or container scrolling.
    pub scroll_mode: ScrollMode,
    /// Fixed pixel offset added to the stack threshold, for fixed headers
    /// covering the top of the viewport.
    pub header_offset: f64,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            item_distance: 400.0,
            item_scale: 0.03,
            item_stack_distance: 20.0,
            stack_position: Threshold::Percent(20.0),
            scale_end_position: Threshold::Percent(10.0),
            base_scale: 0.85,
            rotation_amount: 0.0,
            blur_amount: 0.0,
            scroll_mode: ScrollMode::Contained,
            header_offset: 100.0,
        }
    }
}

impl StackConfig {
    /// Checks that every field can feed the transform math.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFinite`] for NaN or infinite values and
    /// [`ConfigError::Negative`] for a negative gap, base scale, or blur.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let numeric = [
            ("item_distance", self.item_distance),
            ("item_scale", self.item_scale),
            ("item_stack_distance", self.item_stack_distance),
            ("stack_position", self.stack_position.value()),
            ("scale_end_position", self.scale_end_position.value()),
            ("base_scale", self.base_scale),
            ("rotation_amount", self.rotation_amount),
            ("blur_amount", self.blur_amount),
            ("header_offset", self.header_offset),
        ];
        for (field, value) in numeric {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
        }

        let non_negative = [
            ("item_distance", self.item_distance),
            ("base_scale", self.base_scale),
            ("blur_amount", self.blur_amount),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Negative { field });
            }
        }

        Ok(())
    }
}

/// A configuration value that cannot drive the transform math.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A threshold string was not `<number>%`, `<number>px`, or `<number>`.
    InvalidThreshold {
        /// The rejected input, trimmed.
        value: String,
    },
    /// A numeric field was NaN or infinite.
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A field that must be non-negative was negative.
    Negative {
        /// Name of the offending field.
        field: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidThreshold { value } => {
                write!(f, "invalid threshold {value:?}: expected `N%`, `Npx`, or `N`")
            }
            Self::NonFinite { field } => write!(f, "`{field}` must be finite"),
            Self::Negative { field } => write!(f, "`{field}` must not be negative"),
        }
    }
}

impl core::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn defaults_match_documented_values() {
        let c = StackConfig::default();
        assert_eq!(c.item_distance, 400.0);
        assert_eq!(c.item_scale, 0.03);
        assert_eq!(c.item_stack_distance, 20.0);
        assert_eq!(c.stack_position, Threshold::Percent(20.0));
        assert_eq!(c.scale_end_position, Threshold::Percent(10.0));
        assert_eq!(c.base_scale, 0.85);
        assert_eq!(c.rotation_amount, 0.0);
        assert_eq!(c.blur_amount, 0.0);
        assert_eq!(c.scroll_mode, ScrollMode::Contained);
        assert_eq!(c.header_offset, 100.0);
        assert_eq!(c.validate(), Ok(()));
    }

    #[test]
    fn parses_percent_and_pixels() {
        assert_eq!("20%".parse(), Ok(Threshold::Percent(20.0)));
        assert_eq!(" 12.5 % ".parse(), Ok(Threshold::Percent(12.5)));
        assert_eq!("150px".parse(), Ok(Threshold::Pixels(150.0)));
        assert_eq!("-40".parse(), Ok(Threshold::Pixels(-40.0)));
    }

    #[test]
    fn rejects_malformed_thresholds() {
        for input in ["", "%", "px", "abc", "20 percent", "NaN%", "inf"] {
            let err = input.parse::<Threshold>().unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidThreshold { .. }),
                "{input:?} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        let t = Threshold::Percent(33.0);
        assert_eq!(format!("{t}").parse(), Ok(t));
        let t = Threshold::Pixels(8.5);
        assert_eq!(format!("{t}").parse(), Ok(t));
    }

    #[test]
    fn validate_rejects_non_finite() {
        let c = StackConfig {
            rotation_amount: f64::NAN,
            ..StackConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::NonFinite {
                field: "rotation_amount"
            })
        );

        let c = StackConfig {
            stack_position: Threshold::Pixels(f64::INFINITY),
            ..StackConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::NonFinite {
                field: "stack_position"
            })
        );
    }

    #[test]
    fn validate_rejects_negative_scale_and_blur() {
        let c = StackConfig {
            base_scale: -0.1,
            ..StackConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::Negative {
                field: "base_scale"
            })
        );

        let c = StackConfig {
            blur_amount: -1.0,
            ..StackConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::Negative {
                field: "blur_amount"
            })
        );
    }

    #[test]
    fn error_messages_name_the_field() {
        let msg = format!("{}", ConfigError::Negative { field: "item_distance" });
        assert!(msg.contains("item_distance"), "got {msg}");
    }
}
