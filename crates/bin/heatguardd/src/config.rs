//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `heatguard.toml` in the working directory (or the path in
//! `HEATGUARD_CONFIG`). Every field has a default taken from the usual
//! heat-stroke values, so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use heatguard_adapter_virtual::SimulationConfig;
use heatguard_domain::error::HeatGuardError;
use heatguard_domain::threshold::{DEFAULT_BASELINE, DEFAULT_HIGH_THRESHOLD, ThresholdConfig};

const DEFAULT_PATH: &str = "heatguard.toml";

/// Longest accepted poll cadence: one day.
const MAX_POLL_CADENCE_SECS: u64 = 86_400;

/// Daemon configuration, one field per TOML table.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Thresholds and timing of the control loop.
    pub monitor: MonitorConfig,
    /// Which accessory to drive.
    pub accessory: AccessoryConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Virtual thermometer profile.
    pub simulation: SimulationConfig,
}

/// Control loop configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Normal body temperature, in degrees Fahrenheit.
    pub baseline: f64,
    /// Temperature at or above which the fan is turned on.
    pub high_threshold: f64,
    /// Seconds between two polls.
    pub poll_cadence_secs: u64,
    /// Upper bound on a temperature fetch, in seconds.
    pub fetch_timeout_secs: u64,
    /// Upper bound on a fan command, in seconds.
    pub command_timeout_secs: u64,
}

/// Cooling accessory lookup.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AccessoryConfig {
    /// Exact accessory name to look for in the home.
    pub name: String,
}

/// Tracing output.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `heatguard.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting values are invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("HEATGUARD_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HEATGUARD_BASELINE") {
            if let Ok(baseline) = val.parse() {
                self.monitor.baseline = baseline;
            }
        }
        if let Ok(val) = std::env::var("HEATGUARD_HIGH_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                self.monitor.high_threshold = threshold;
            }
        }
        if let Ok(val) = std::env::var("HEATGUARD_POLL_CADENCE_SECS") {
            if let Ok(secs) = val.parse() {
                self.monitor.poll_cadence_secs = secs;
            }
        }
        if let Ok(val) = std::env::var("HEATGUARD_FAN_NAME") {
            self.accessory.name = val;
        }
        if let Ok(val) = std::env::var("HEATGUARD_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds()?;
        if self.monitor.poll_cadence_secs == 0 {
            return Err(ConfigError::Validation(
                "poll_cadence_secs must be non-zero".to_string(),
            ));
        }
        if self.monitor.poll_cadence_secs > MAX_POLL_CADENCE_SECS {
            return Err(ConfigError::Validation(format!(
                "poll_cadence_secs must not exceed {MAX_POLL_CADENCE_SECS}"
            )));
        }
        if self.monitor.fetch_timeout_secs == 0 || self.monitor.command_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "timeouts must be non-zero".to_string(),
            ));
        }
        if self.accessory.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "accessory name must not be empty".to_string(),
            ));
        }
        if !(self.simulation.step.is_finite() && self.simulation.step > 0.0) {
            return Err(ConfigError::Validation(
                "simulation step must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Validated baseline and threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Domain`] if the threshold is not above the
    /// baseline.
    pub fn thresholds(&self) -> Result<ThresholdConfig, ConfigError> {
        Ok(ThresholdConfig::new(
            self.monitor.baseline,
            self.monitor.high_threshold,
        )?)
    }

    #[must_use]
    pub fn poll_cadence(&self) -> Duration {
        Duration::from_secs(self.monitor.poll_cadence_secs)
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.monitor.fetch_timeout_secs)
    }

    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.monitor.command_timeout_secs)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            baseline: DEFAULT_BASELINE,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
            poll_cadence_secs: 60,
            fetch_timeout_secs: 10,
            command_timeout_secs: 10,
        }
    }
}

impl Default for AccessoryConfig {
    fn default() -> Self {
        Self {
            name: "Fan".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Why the daemon configuration could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file is not valid TOML for this schema.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// The file exists but could not be read.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Domain invariant violation (e.g. threshold below baseline).
    #[error("invalid monitor configuration")]
    Domain(#[from] HeatGuardError),
    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
