//! Accessory locator port — resolves the cooling device once before start.
//!
//! Re-resolution on topology changes belongs to the adapter. The control loop
//! keeps whatever was resolved, and treats an absent device as a failed
//! command on every attempt.

use std::future::Future;

use heatguard_domain::error::CollaboratorError;

use super::Actuator;

/// Finds the cooling device in the home's accessory network.
pub trait AccessoryLocator {
    /// Concrete actuator handed to the control loop.
    type Actuator: Actuator;

    /// Look up the cooling device, returning `Ok(None)` when none matches.
    fn find_cooling_device(
        &self,
    ) -> impl Future<Output = Result<Option<Self::Actuator>, CollaboratorError>> + Send;
}
