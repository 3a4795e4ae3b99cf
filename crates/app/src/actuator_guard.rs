//! Actuator state guard — idempotent, single-flight actuator commands.
//!
//! The guard remembers the last state the device *confirmed* and refuses to
//! send a command that would not change it. At most one command is in flight
//! at any time: a second request while one is outstanding is dropped, not
//! queued, because the next poll re-evaluates with fresher data anyway.
//!
//! Commands are split in two steps so callers can claim the in-flight slot
//! while holding their own lock:
//!
//! 1. [`begin`](ActuatorStateGuard::begin) — synchronous check-and-set
//! 2. [`execute`](ActuatorStateGuard::execute) — the asynchronous device call
//!
//! [`apply`](ActuatorStateGuard::apply) chains both.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use heatguard_domain::accessory::Accessory;
use heatguard_domain::actuator::{ActuatorCommand, ActuatorState};
use heatguard_domain::error::CollaboratorError;

use crate::ports::Actuator;

/// Result of asking the guard to drive the device.
#[derive(Debug)]
pub enum ApplyOutcome {
    /// The device confirmed the command.
    Applied(ActuatorCommand),
    /// The device already is in the desired state; nothing was sent.
    NoOp,
    /// Another command is in flight; this one was dropped.
    Busy,
    /// The device call failed or timed out; confirmed state is unchanged.
    Failed(CollaboratorError),
    /// The command completed after its owner stopped; the result was ignored.
    Discarded,
}

/// A claimed in-flight slot, to be passed to [`ActuatorStateGuard::execute`].
#[derive(Debug)]
#[must_use = "a pending command holds the in-flight slot until executed"]
pub struct PendingCommand {
    command: ActuatorCommand,
    epoch: u64,
}

impl PendingCommand {
    #[must_use]
    pub fn command(&self) -> ActuatorCommand {
        self.command
    }
}

#[derive(Debug, Default)]
struct GuardState {
    confirmed: ActuatorState,
    in_flight: bool,
    epoch: u64,
}

/// Tracks the confirmed actuator state and serializes commands.
pub struct ActuatorStateGuard<A> {
    actuator: Option<A>,
    command_timeout: Duration,
    state: Mutex<GuardState>,
}

impl<A: Actuator> ActuatorStateGuard<A> {
    /// Create a guard around `actuator`.
    ///
    /// `None` means no cooling device was resolved; every command then fails
    /// with [`CollaboratorError::NoDevice`] without any outbound call.
    #[must_use]
    pub fn new(actuator: Option<A>, command_timeout: Duration) -> Self {
        Self {
            actuator,
            command_timeout,
            state: Mutex::new(GuardState::default()),
        }
    }

    /// Accessory behind the guard, if one was resolved.
    #[must_use]
    pub fn accessory(&self) -> Option<&Accessory> {
        self.actuator.as_ref().map(Actuator::accessory)
    }

    /// Claim the in-flight slot for `desired`.
    ///
    /// # Errors
    ///
    /// Returns the final outcome instead of a slot when no command must be
    /// sent: [`ApplyOutcome::NoOp`] if the device already matches, or
    /// [`ApplyOutcome::Busy`] if another command is outstanding.
    pub fn begin(&self, desired: ActuatorCommand) -> Result<PendingCommand, ApplyOutcome> {
        let mut state = self.lock_state();
        if state.confirmed.satisfies(desired) {
            tracing::debug!(command = %desired, "actuator already in desired state");
            return Err(ApplyOutcome::NoOp);
        }
        if state.in_flight {
            tracing::debug!(command = %desired, "actuator command in flight, dropping");
            return Err(ApplyOutcome::Busy);
        }
        state.in_flight = true;
        Ok(PendingCommand {
            command: desired,
            epoch: state.epoch,
        })
    }

    /// Send a claimed command to the device and record the confirmation.
    ///
    /// The call is bounded by the guard's command timeout. The in-flight slot
    /// is released when this future completes or is dropped.
    pub async fn execute(&self, pending: PendingCommand) -> ApplyOutcome {
        let _slot = InFlightSlot { state: &self.state };
        let command = pending.command;

        let result = match &self.actuator {
            None => Err(CollaboratorError::NoDevice),
            Some(actuator) => tokio::time::timeout(
                self.command_timeout,
                actuator.set_state(command, self.command_timeout),
            )
            .await
            .unwrap_or(Err(CollaboratorError::Timeout(self.command_timeout))),
        };

        let mut state = self.lock_state();
        if state.epoch != pending.epoch {
            tracing::debug!(%command, "ignoring actuator completion from a stopped loop");
            return ApplyOutcome::Discarded;
        }
        match result {
            Ok(()) => {
                state.confirmed = ActuatorState::from(command);
                let accessory = self.accessory().map_or("<none>", |a| a.name.as_str());
                tracing::info!(%accessory, "cooling device turned {command}");
                ApplyOutcome::Applied(command)
            }
            Err(err) => {
                tracing::warn!(%err, %command, "actuator command failed");
                ApplyOutcome::Failed(err)
            }
        }
    }

    /// Drive the device towards `desired`, skipping redundant or overlapping
    /// commands.
    pub async fn apply(&self, desired: ActuatorCommand) -> ApplyOutcome {
        match self.begin(desired) {
            Ok(pending) => self.execute(pending).await,
            Err(outcome) => outcome,
        }
    }
}

impl<A> ActuatorStateGuard<A> {
    /// Last state the device confirmed.
    #[must_use]
    pub fn confirmed_state(&self) -> ActuatorState {
        self.lock_state().confirmed
    }

    /// Whether a command is currently outstanding.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.lock_state().in_flight
    }

    /// Make the completion of any outstanding command a no-op.
    ///
    /// The in-flight slot stays claimed until that command actually completes.
    pub fn discard_pending(&self) {
        let mut state = self.lock_state();
        state.epoch = state.epoch.wrapping_add(1);
    }

    fn lock_state(&self) -> MutexGuard<'_, GuardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the in-flight flag on drop.
struct InFlightSlot<'a> {
    state: &'a Mutex<GuardState>,
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight = false;
    }
}
