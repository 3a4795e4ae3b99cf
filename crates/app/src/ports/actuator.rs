//! Actuator port — the cooling device.

use std::future::Future;
use std::time::Duration;

use heatguard_domain::accessory::Accessory;
use heatguard_domain::actuator::ActuatorCommand;
use heatguard_domain::error::CollaboratorError;

/// A single addressable cooling device accepting on/off commands.
///
/// Device-level idempotence is not assumed: sending `On` to a fan that is
/// already on is still an outbound call. Deduplication is the job of
/// [`ActuatorStateGuard`](crate::actuator_guard::ActuatorStateGuard).
pub trait Actuator {
    /// Descriptor of the underlying accessory.
    fn accessory(&self) -> &Accessory;

    /// Drive the device to the state `command` asks for.
    ///
    /// Resolves once the device confirmed the change.
    fn set_state(
        &self,
        command: ActuatorCommand,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), CollaboratorError>> + Send;
}

impl<T: Actuator + Send + Sync> Actuator for std::sync::Arc<T> {
    fn accessory(&self) -> &Accessory {
        (**self).accessory()
    }

    fn set_state(
        &self,
        command: ActuatorCommand,
        timeout: Duration,
    ) -> impl Future<Output = Result<(), CollaboratorError>> + Send {
        (**self).set_state(command, timeout)
    }
}
