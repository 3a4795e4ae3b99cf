//! Threshold configuration and the evaluator deciding the fan state.
//!
//! Evaluation is pure and stateless: the same reading and configuration
//! always produce the same command. There is no hysteresis band, so a reading
//! hovering exactly at the threshold toggles the fan between polls.

use serde::Serialize;

use crate::actuator::ActuatorCommand;
use crate::error::{HeatGuardError, ValidationError};
use crate::reading::Reading;

/// Normal body temperature, in degrees Fahrenheit.
pub const DEFAULT_BASELINE: f64 = 98.6;

/// Temperature at or above which cooling is engaged, in degrees Fahrenheit.
pub const DEFAULT_HIGH_THRESHOLD: f64 = 104.0;

/// Baseline and danger threshold for a monitored subject.
///
/// Invariant: both values are finite and `high_threshold > baseline`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdConfig {
    baseline: f64,
    high_threshold: f64,
}

impl ThresholdConfig {
    /// Build a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HeatGuardError::Validation`] when either value is not finite
    /// or when `high_threshold` is not strictly above `baseline`.
    pub fn new(baseline: f64, high_threshold: f64) -> Result<Self, HeatGuardError> {
        if !baseline.is_finite() || !high_threshold.is_finite() {
            return Err(ValidationError::NonFiniteThreshold.into());
        }
        if high_threshold <= baseline {
            return Err(ValidationError::ThresholdNotAboveBaseline {
                baseline,
                high: high_threshold,
            }
            .into());
        }
        Ok(Self {
            baseline,
            high_threshold,
        })
    }

    #[must_use]
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    #[must_use]
    pub fn high_threshold(&self) -> f64 {
        self.high_threshold
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            baseline: DEFAULT_BASELINE,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

/// Map a reading (or its absence) to the command the fan should receive.
///
/// An absent reading always yields [`ActuatorCommand::Off`]: cooling is never
/// engaged without confirmed data.
#[must_use]
pub fn decide(reading: Option<&Reading>, config: &ThresholdConfig) -> ActuatorCommand {
    match reading {
        Some(reading) if reading.temperature() >= config.high_threshold => ActuatorCommand::On,
        _ => ActuatorCommand::Off,
    }
}
