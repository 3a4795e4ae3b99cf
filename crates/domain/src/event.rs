//! Event — an immutable record of something the control loop observed or did.
//!
//! Events form the observability channel of the controller. They are
//! distinct from logs: a missing sample and a failed fetch both drive the fan
//! off, but they are published as different [`EventKind`]s.

use serde::{Deserialize, Serialize};

use crate::actuator::ActuatorCommand;
use crate::id::EventId;
use crate::reading::{Reading, Timestamp};

/// What happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    LoopStarted { cadence_ms: u64 },
    LoopStopped,
    /// A timer tick arrived while a fetch was still outstanding.
    TickSkipped,
    ReadingReceived { reading: Reading },
    NoData,
    FetchFailed { error: String },
    CommandApplied { command: ActuatorCommand },
    /// The command was not sent because the device already matches it or
    /// another command is in flight.
    CommandSuppressed {
        command: ActuatorCommand,
        reason: SuppressionReason,
    },
    CommandFailed {
        command: ActuatorCommand,
        error: String,
    },
    /// A command completed after the loop was stopped; its result was ignored.
    CommandDiscarded { command: ActuatorCommand },
}

/// Why a desired command did not reach the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressionReason {
    AlreadyApplied,
    CommandInFlight,
}

/// A timestamped [`EventKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub kind: EventKind,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create a new event stamped with the current time.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            id: EventId::new(),
            kind,
            timestamp: chrono::Utc::now(),
        }
    }
}
