//! Virtual fan — responds to on/off commands.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use heatguard_app::ports::Actuator;
use heatguard_domain::accessory::Accessory;
use heatguard_domain::actuator::{ActuatorCommand, ActuatorState};
use heatguard_domain::error::{CollaboratorError, HeatGuardError};

/// A simulated cooling fan.
///
/// The fan starts in [`ActuatorState::Unknown`] like a real accessory whose
/// power state has never been read.
pub struct VirtualFan {
    accessory: Accessory,
    state: Mutex<ActuatorState>,
    reachable: AtomicBool,
    commands: AtomicUsize,
}

impl VirtualFan {
    /// Create a fan named `name`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `name` is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, HeatGuardError> {
        let accessory = Accessory::builder()
            .name(name)
            .manufacturer("heatguard")
            .model("VFan-1")
            .build()?;
        Ok(Self {
            accessory,
            state: Mutex::new(ActuatorState::Unknown),
            reachable: AtomicBool::new(true),
            commands: AtomicUsize::new(0),
        })
    }

    /// Current power state of the simulated device.
    #[must_use]
    pub fn state(&self) -> ActuatorState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of commands received, including rejected ones.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.load(Ordering::SeqCst)
    }

    /// Simulate the accessory dropping off the network or coming back.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }
}

impl Actuator for VirtualFan {
    fn accessory(&self) -> &Accessory {
        &self.accessory
    }

    async fn set_state(
        &self,
        command: ActuatorCommand,
        _timeout: Duration,
    ) -> Result<(), CollaboratorError> {
        self.commands.fetch_add(1, Ordering::SeqCst);
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Unavailable);
        }
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = ActuatorState::from(command);
        tracing::debug!(fan = %self.accessory.name, %command, "virtual fan switched");
        Ok(())
    }
}
