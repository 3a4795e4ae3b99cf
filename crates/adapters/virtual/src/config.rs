//! Simulation configuration for the virtual thermometer.

use serde::Deserialize;

/// Sawtooth body-temperature profile.
///
/// The thermometer starts at `start_temperature`, rises by `step` on every
/// fetch and falls back to the start once it passes `peak_temperature`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// First reading, in degrees Fahrenheit.
    pub start_temperature: f64,
    /// Highest reading before the profile wraps, in degrees Fahrenheit.
    pub peak_temperature: f64,
    /// Increase per fetch, in degrees Fahrenheit.
    pub step: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_temperature: 98.6,
            peak_temperature: 105.0,
            step: 0.8,
        }
    }
}
