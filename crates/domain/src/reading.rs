//! Reading — a single body-temperature observation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// UTC instant attached to readings and events.
pub type Timestamp = DateTime<Utc>;

/// One temperature sample, in degrees Fahrenheit.
///
/// Readings are immutable once produced. A temperature source yields at most
/// one per poll and the control loop consumes it exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    temperature: f64,
    timestamp: Timestamp,
}

impl Reading {
    /// Create a reading taken at `timestamp`.
    #[must_use]
    pub fn new(temperature: f64, timestamp: Timestamp) -> Self {
        Self {
            temperature,
            timestamp,
        }
    }

    /// Create a reading stamped with the current time.
    #[must_use]
    pub fn now(temperature: f64) -> Self {
        Self::new(temperature, Utc::now())
    }

    /// Temperature in degrees Fahrenheit.
    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// When the sample was taken.
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Signed distance from `baseline`, positive when warmer.
    #[must_use]
    pub fn deviation_from(&self, baseline: f64) -> f64 {
        self.temperature - baseline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_expose_temperature_and_timestamp() {
        let ts = Utc::now();
        let reading = Reading::new(101.2, ts);
        assert!((reading.temperature() - 101.2).abs() < f64::EPSILON);
        assert_eq!(reading.timestamp(), ts);
    }

    #[test]
    fn should_compute_deviation_from_baseline() {
        let reading = Reading::now(100.6);
        assert!((reading.deviation_from(98.6) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn should_serialize_field_names() {
        let reading = Reading::now(99.0);
        let json = serde_json::to_value(reading).unwrap();
        assert_eq!(json["temperature"], serde_json::json!(99.0));
        assert!(json.get("timestamp").is_some());
    }
}
