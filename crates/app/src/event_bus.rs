//! In-process event bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use heatguard_domain::error::HeatGuardError;
use heatguard_domain::event::Event;

use crate::ports::EventPublisher;

/// Fan-out of control-loop [`Event`]s to any number of observers.
///
/// The control loop publishes a record for every reading, missing sample,
/// failed fetch and fan command. Observers such as the daemon's event logger
/// or a test harness subscribe here. A slow observer lags and loses the
/// oldest events instead of blocking the loop.
pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
}

impl InProcessEventBus {
    /// Create a bus keeping up to `capacity` undelivered events per observer.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Observe control-loop events published from now on.
    ///
    /// Earlier events are not replayed: subscribe before calling
    /// [`ControlLoop::start`](crate::control_loop::ControlLoop::start) to see
    /// `LoopStarted`.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), HeatGuardError>> + Send {
        match self.sender.send(event) {
            Ok(observers) => tracing::trace!(observers, "control loop event delivered"),
            // nobody is watching; the loop keeps running
            Err(broadcast::error::SendError(event)) => {
                tracing::trace!(kind = ?event.kind, "control loop event dropped, no observers");
            }
        }
        async { Ok(()) }
    }
}
