//! Event bus port — publish/subscribe for control-loop events.

use std::future::Future;

use heatguard_domain::error::HeatGuardError;
use heatguard_domain::event::Event;

/// Publishes domain events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), HeatGuardError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), HeatGuardError>> + Send {
        (**self).publish(event)
    }
}
