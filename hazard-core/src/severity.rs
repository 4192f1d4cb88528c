//! Ordinal severity bands for rendering collaborators.

use std::fmt;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered severity band derived from a value relative to the batch maximum.
///
/// # Examples
/// ```
/// use hazard_core::{BandThresholds, SeverityBand};
///
/// let bands = BandThresholds::default();
/// assert_eq!(SeverityBand::classify(24.0, 24.0, &bands), SeverityBand::Severe);
/// assert_eq!(SeverityBand::classify(1.0, 24.0, &bands), SeverityBand::VeryLow);
/// assert!(SeverityBand::High > SeverityBand::Medium);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SeverityBand {
    /// Below the `low` threshold.
    VeryLow,
    /// At least the `low` threshold.
    Low,
    /// At least the `medium` threshold.
    Medium,
    /// At least the `high` threshold.
    High,
    /// At least the `severe` threshold.
    Severe,
}

impl SeverityBand {
    /// Classify `value` against the observed maximum `max`.
    ///
    /// The ratio `value / max` is compared against `thresholds`, highest band
    /// first. A non-positive `max` gives a ratio of zero. The function is
    /// total: NaN and negative ratios land in [`SeverityBand::VeryLow`].
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "band selection divides by the batch maximum"
    )]
    pub fn classify(value: f64, max: f64, thresholds: &BandThresholds) -> Self {
        let ratio = if max > 0.0 { value / max } else { 0.0 };
        if ratio >= thresholds.severe {
            Self::Severe
        } else if ratio >= thresholds.high {
            Self::High
        } else if ratio >= thresholds.medium {
            Self::Medium
        } else if ratio >= thresholds.low {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryLow => "very_low",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Severe => "severe",
        }
    }
}

impl fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`BandThresholds::new`].
#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum BandThresholdsError {
    /// A threshold was not finite or fell outside `(0, 1]`.
    #[error("band threshold {value} must be finite and within (0, 1]")]
    OutOfRange {
        /// Rejected threshold.
        value: f64,
    },
    /// Thresholds were not strictly ascending.
    #[error("band thresholds must be strictly ascending from low to severe")]
    NotAscending,
}

/// Lower ratio bounds for each band above [`SeverityBand::VeryLow`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawThresholds"))]
pub struct BandThresholds {
    low: f64,
    medium: f64,
    high: f64,
    severe: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            low: 0.10,
            medium: 0.25,
            high: 0.50,
            severe: 0.75,
        }
    }
}

impl BandThresholds {
    /// Validates and constructs thresholds.
    ///
    /// # Errors
    /// Returns [`BandThresholdsError`] when a threshold is outside `(0, 1]`
    /// or the sequence is not strictly ascending.
    pub fn new(low: f64, medium: f64, high: f64, severe: f64) -> Result<Self, BandThresholdsError> {
        let ordered = [low, medium, high, severe];
        if let Some(value) = ordered
            .iter()
            .copied()
            .find(|value| !(value.is_finite() && *value > 0.0 && *value <= 1.0))
        {
            return Err(BandThresholdsError::OutOfRange { value });
        }
        if ordered.windows(2).any(|pair| match pair {
            [lower, upper] => lower >= upper,
            _ => false,
        }) {
            return Err(BandThresholdsError::NotAscending);
        }
        Ok(Self {
            low,
            medium,
            high,
            severe,
        })
    }

    /// Ratio at which [`SeverityBand::Low`] starts.
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    /// Ratio at which [`SeverityBand::Medium`] starts.
    #[must_use]
    pub const fn medium(&self) -> f64 {
        self.medium
    }

    /// Ratio at which [`SeverityBand::High`] starts.
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// Ratio at which [`SeverityBand::Severe`] starts.
    #[must_use]
    pub const fn severe(&self) -> f64 {
        self.severe
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawThresholds {
    low: f64,
    medium: f64,
    high: f64,
    severe: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawThresholds> for BandThresholds {
    type Error = BandThresholdsError;

    fn try_from(raw: RawThresholds) -> Result<Self, Self::Error> {
        Self::new(raw.low, raw.medium, raw.high, raw.severe)
    }
}
