//! Temperature source port — the health-data provider.

use std::future::Future;
use std::time::Duration;

use heatguard_domain::error::CollaboratorError;
use heatguard_domain::reading::Reading;

/// Supplies the most recent body-temperature sample on demand.
pub trait TemperatureSource {
    /// Fetch the single most recent sample.
    ///
    /// Returns `Ok(None)` when the provider holds no sample. `timeout` is the
    /// bound the caller will enforce; implementations may use it to size
    /// their own transport deadlines.
    fn fetch_latest(
        &self,
        timeout: Duration,
    ) -> impl Future<Output = Result<Option<Reading>, CollaboratorError>> + Send;
}

impl<T: TemperatureSource + Send + Sync> TemperatureSource for std::sync::Arc<T> {
    fn fetch_latest(
        &self,
        timeout: Duration,
    ) -> impl Future<Output = Result<Option<Reading>, CollaboratorError>> + Send {
        (**self).fetch_latest(timeout)
    }
}
