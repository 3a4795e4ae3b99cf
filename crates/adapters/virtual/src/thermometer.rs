//! Virtual thermometer — a simulated health-data source.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use heatguard_app::ports::TemperatureSource;
use heatguard_domain::error::CollaboratorError;
use heatguard_domain::reading::Reading;

use crate::config::SimulationConfig;

struct State {
    current: Option<f64>,
    drift: Option<SimulationConfig>,
    reachable: bool,
}

/// A simulated thermometer.
///
/// Holds either a fixed value (set through
/// [`set_temperature`](Self::set_temperature)) or follows a sawtooth
/// [`SimulationConfig`] profile, advancing one step per fetch.
pub struct VirtualThermometer {
    state: Mutex<State>,
}

impl VirtualThermometer {
    /// A thermometer with no sample yet.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_state(None, None)
    }

    /// A thermometer that always reports `temperature`.
    #[must_use]
    pub fn fixed(temperature: f64) -> Self {
        Self::with_state(Some(temperature), None)
    }

    /// A thermometer following the sawtooth profile in `config`.
    #[must_use]
    pub fn drifting(config: SimulationConfig) -> Self {
        Self::with_state(Some(config.start_temperature), Some(config))
    }

    fn with_state(current: Option<f64>, drift: Option<SimulationConfig>) -> Self {
        Self {
            state: Mutex::new(State {
                current,
                drift,
                reachable: true,
            }),
        }
    }

    /// Override the next reported value (`None` means no sample).
    pub fn set_temperature(&self, temperature: Option<f64>) {
        self.lock_state().current = temperature;
    }

    /// Simulate the health-data provider going away or coming back.
    pub fn set_reachable(&self, reachable: bool) {
        self.lock_state().reachable = reachable;
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TemperatureSource for VirtualThermometer {
    async fn fetch_latest(&self, _timeout: Duration) -> Result<Option<Reading>, CollaboratorError> {
        let mut state = self.lock_state();
        if !state.reachable {
            return Err(CollaboratorError::Unavailable);
        }
        let Some(temperature) = state.current else {
            return Ok(None);
        };
        if let Some(drift) = &state.drift {
            let next = temperature + drift.step;
            state.current = Some(if next > drift.peak_temperature {
                drift.start_temperature
            } else {
                next
            });
        }
        tracing::trace!(temperature, "virtual thermometer sampled");
        Ok(Some(Reading::now(temperature)))
    }
}
