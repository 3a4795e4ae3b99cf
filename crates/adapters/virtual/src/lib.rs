//! # heatguard-adapter-virtual
//!
//! Virtual/demo adapter that provides simulated collaborators for testing and
//! demonstration purposes.
//!
//! ## Provided collaborators
//!
//! | Type | Port | Behaviour |
//! |------|------|-----------|
//! | [`VirtualThermometer`] | `TemperatureSource` | Fixed value, empty, or sawtooth drift |
//! | [`VirtualFan`] | `Actuator` | Holds an on/off state, can be made unreachable |
//! | [`VirtualHome`] | `AccessoryLocator` | Finds a fan by exact name |
//!
//! ## Dependency rule
//!
//! Depends on `heatguard-app` (port traits) and `heatguard-domain` only.

mod config;
mod fan;
mod thermometer;

pub use config::SimulationConfig;
pub use fan::VirtualFan;
pub use thermometer::VirtualThermometer;

use std::sync::Arc;

use heatguard_app::ports::{AccessoryLocator, Actuator};
use heatguard_domain::error::CollaboratorError;

/// A simulated home holding a list of fans.
pub struct VirtualHome {
    accessories: Vec<Arc<VirtualFan>>,
    cooling_device_name: String,
}

impl VirtualHome {
    /// Create a home whose cooling device is the accessory named
    /// `cooling_device_name`.
    #[must_use]
    pub fn new(cooling_device_name: impl Into<String>) -> Self {
        Self {
            accessories: Vec::new(),
            cooling_device_name: cooling_device_name.into(),
        }
    }

    /// Add an accessory to the home.
    #[must_use]
    pub fn with_accessory(mut self, fan: Arc<VirtualFan>) -> Self {
        self.accessories.push(fan);
        self
    }
}

impl AccessoryLocator for VirtualHome {
    type Actuator = Arc<VirtualFan>;

    async fn find_cooling_device(&self) -> Result<Option<Arc<VirtualFan>>, CollaboratorError> {
        let found = self
            .accessories
            .iter()
            .find(|fan| fan.accessory().name == self.cooling_device_name)
            .cloned();
        match &found {
            Some(fan) => tracing::info!(
                accessory = %fan.accessory().name,
                id = %fan.accessory().id,
                "cooling device located"
            ),
            None => tracing::warn!(
                wanted = %self.cooling_device_name,
                available = self.accessories.len(),
                "no cooling device matches"
            ),
        }
        Ok(found)
    }
}
