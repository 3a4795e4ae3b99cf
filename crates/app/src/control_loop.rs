//! Control loop — periodic sampling, evaluation and actuation.
//!
//! The loop is a small state machine:
//!
//! ```text
//! Idle ──start──▶ Polling ──tick──▶ AwaitingReading ──fetch done──▶ Polling
//!   ▲                                                                 │
//!   └──────────────────────────── stop (from any state) ─────────────┘
//! ```
//!
//! Each tick spawns a [`PollCycle`] so the timer never waits on a
//! collaborator. Ticks arriving while a fetch is outstanding are skipped.
//! When the fetch completes the loop returns to `Polling` *before* the
//! actuator command is sent, so a slow fan delays neither the timer nor the
//! next fetch; overlapping commands are rejected by the
//! [`ActuatorStateGuard`].
//!
//! `stop` bumps a generation counter. A cycle whose generation is no longer
//! current drops its result without touching any state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};

use heatguard_domain::actuator::{ActuatorCommand, ActuatorState};
use heatguard_domain::error::{CollaboratorError, HeatGuardError, ValidationError};
use heatguard_domain::event::{Event, EventKind, SuppressionReason};
use heatguard_domain::reading::Reading;
use heatguard_domain::threshold::{ThresholdConfig, decide};

use crate::actuator_guard::{ActuatorStateGuard, ApplyOutcome};
use crate::ports::{Actuator, EventPublisher, TemperatureSource};

/// Default bound on a single temperature fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound on a single actuator command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// No timer armed.
    Idle,
    /// Timer armed, no fetch outstanding.
    Polling,
    /// A fetch is outstanding; ticks are skipped.
    AwaitingReading,
}

/// What the temperature source produced for one cycle.
#[derive(Debug)]
pub enum FetchOutcome {
    Reading(Reading),
    NoData,
    Failed(CollaboratorError),
}

impl FetchOutcome {
    /// The reading, if the fetch produced one.
    #[must_use]
    pub fn reading(&self) -> Option<&Reading> {
        match self {
            Self::Reading(reading) => Some(reading),
            Self::NoData | Self::Failed(_) => None,
        }
    }
}

/// Summary of one tick-to-command pass.
#[derive(Debug)]
pub enum CycleReport {
    Completed {
        fetch: FetchOutcome,
        command: ActuatorCommand,
        outcome: ApplyOutcome,
    },
    /// The loop was stopped while the fetch was outstanding.
    Discarded,
}

/// Result of a single timer tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// A fetch was started; the cycle runs in the background.
    Started(PollCycle),
    /// The previous fetch is still outstanding.
    Skipped,
    /// The loop is not running.
    Idle,
}

/// Handle to a running poll cycle.
///
/// Dropping the handle detaches the cycle; it still runs to completion.
#[derive(Debug)]
pub struct PollCycle {
    handle: JoinHandle<CycleReport>,
}

impl PollCycle {
    /// Wait for the cycle to finish.
    ///
    /// # Errors
    ///
    /// Returns the [`JoinError`] if the cycle task panicked or was aborted.
    pub async fn join(self) -> Result<CycleReport, JoinError> {
        self.handle.await
    }
}

struct RunState {
    phase: LoopPhase,
    generation: u64,
}

struct Inner<S, A, P> {
    source: S,
    guard: ActuatorStateGuard<A>,
    publisher: P,
    thresholds: ThresholdConfig,
    fetch_timeout: Duration,
    run: Mutex<RunState>,
}

/// Owned monitoring-and-control loop for one subject and one cooling device.
pub struct ControlLoop<S, A, P> {
    inner: Arc<Inner<S, A, P>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<S, A, P> ControlLoop<S, A, P>
where
    S: TemperatureSource + Send + Sync + 'static,
    A: Actuator + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    /// Create an idle loop.
    pub fn new(
        source: S,
        guard: ActuatorStateGuard<A>,
        publisher: P,
        thresholds: ThresholdConfig,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                guard,
                publisher,
                thresholds,
                fetch_timeout,
                run: Mutex::new(RunState {
                    phase: LoopPhase::Idle,
                    generation: 0,
                }),
            }),
            timer: Mutex::new(None),
        }
    }

    /// Arm the recurring timer. The first tick fires one `cadence` from now.
    ///
    /// # Errors
    ///
    /// Returns [`HeatGuardError::AlreadyRunning`] if the loop is not idle, or
    /// a validation error if `cadence` is zero or too large for the timer to
    /// schedule.
    pub async fn start(&self, cadence: Duration) -> Result<(), HeatGuardError> {
        if cadence.is_zero() {
            return Err(ValidationError::ZeroDuration {
                field: "poll cadence",
            }
            .into());
        }
        // the timer derives each next deadline by adding `cadence`
        let first_tick = Instant::now()
            .checked_add(cadence)
            .filter(|first| first.checked_add(cadence).is_some())
            .ok_or(ValidationError::CadenceTooLarge(cadence))?;
        {
            let mut run = self.inner.lock_run();
            if run.phase != LoopPhase::Idle {
                return Err(HeatGuardError::AlreadyRunning);
            }
            run.phase = LoopPhase::Polling;
        }

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(first_tick, cadence);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if let TickOutcome::Idle = inner.tick().await {
                    break;
                }
            }
        });
        if let Some(previous) = self.lock_timer().replace(handle) {
            previous.abort();
        }

        tracing::info!(
            cadence_ms = duration_millis(cadence),
            high_threshold = self.inner.thresholds.high_threshold(),
            "control loop started"
        );
        self.inner
            .publish(EventKind::LoopStarted {
                cadence_ms: duration_millis(cadence),
            })
            .await;
        Ok(())
    }

    /// Cancel the timer and return to `Idle`.
    ///
    /// Never waits for in-flight work: an outstanding fetch or command is
    /// left to complete and its result is ignored. Returns whether the loop
    /// was running.
    pub async fn stop(&self) -> bool {
        let was_running = self.inner.halt();
        if let Some(timer) = self.lock_timer().take() {
            timer.abort();
        }

        if was_running {
            tracing::info!("control loop stopped");
            self.inner.publish(EventKind::LoopStopped).await;
        }
        was_running
    }

    /// Handle one timer tick.
    ///
    /// The armed timer calls this on every period; it is public so an
    /// embedding scheduler can drive the loop itself.
    pub async fn tick(&self) -> TickOutcome {
        self.inner.tick().await
    }

    #[must_use]
    pub fn phase(&self) -> LoopPhase {
        self.inner.lock_run().phase
    }

    /// Last state the cooling device confirmed.
    #[must_use]
    pub fn actuator_state(&self) -> ActuatorState {
        self.inner.guard.confirmed_state()
    }

    #[must_use]
    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.inner.thresholds
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S, A, P> Drop for ControlLoop<S, A, P> {
    fn drop(&mut self) {
        self.inner.halt();
        if let Some(timer) = self
            .timer
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            timer.abort();
        }
    }
}

impl<S, A, P> Inner<S, A, P>
where
    S: TemperatureSource + Send + Sync + 'static,
    A: Actuator + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    async fn tick(self: &Arc<Self>) -> TickOutcome {
        let generation = {
            let mut run = self.lock_run();
            match run.phase {
                LoopPhase::Idle => return TickOutcome::Idle,
                LoopPhase::AwaitingReading => None,
                LoopPhase::Polling => {
                    run.phase = LoopPhase::AwaitingReading;
                    Some(run.generation)
                }
            }
        };

        let Some(generation) = generation else {
            tracing::debug!("previous fetch still outstanding, skipping tick");
            self.publish(EventKind::TickSkipped).await;
            return TickOutcome::Skipped;
        };

        let handle = tokio::spawn(Arc::clone(self).run_cycle(generation));
        TickOutcome::Started(PollCycle { handle })
    }

    async fn run_cycle(self: Arc<Self>, generation: u64) -> CycleReport {
        let fetch = self.fetch().await;
        let command = decide(fetch.reading(), &self.thresholds);

        let pending = {
            let mut run = self.lock_run();
            if run.generation != generation || run.phase != LoopPhase::AwaitingReading {
                tracing::debug!(?fetch, "discarding fetch result from a stopped loop");
                return CycleReport::Discarded;
            }
            run.phase = LoopPhase::Polling;
            self.guard.begin(command)
        };

        self.report_fetch(&fetch).await;

        let outcome = match pending {
            Ok(pending) => self.guard.execute(pending).await,
            Err(outcome) => outcome,
        };
        self.report_outcome(command, &outcome).await;

        CycleReport::Completed {
            fetch,
            command,
            outcome,
        }
    }

    async fn fetch(&self) -> FetchOutcome {
        let result = tokio::time::timeout(
            self.fetch_timeout,
            self.source.fetch_latest(self.fetch_timeout),
        )
        .await
        .unwrap_or(Err(CollaboratorError::Timeout(self.fetch_timeout)));

        match result {
            Ok(Some(reading)) => FetchOutcome::Reading(reading),
            Ok(None) => FetchOutcome::NoData,
            Err(err) => FetchOutcome::Failed(err),
        }
    }

    async fn report_fetch(&self, fetch: &FetchOutcome) {
        let kind = match fetch {
            FetchOutcome::Reading(reading) => {
                tracing::debug!(
                    temperature = reading.temperature(),
                    deviation = reading.deviation_from(self.thresholds.baseline()),
                    "reading received"
                );
                EventKind::ReadingReceived { reading: *reading }
            }
            FetchOutcome::NoData => {
                tracing::info!("no temperature sample available, keeping cooling off");
                EventKind::NoData
            }
            FetchOutcome::Failed(err) if err.is_timeout() => {
                tracing::warn!(%err, "temperature fetch timed out, keeping cooling off");
                EventKind::FetchFailed {
                    error: err.to_string(),
                }
            }
            FetchOutcome::Failed(err) => {
                tracing::warn!(%err, "temperature fetch failed, keeping cooling off");
                EventKind::FetchFailed {
                    error: err.to_string(),
                }
            }
        };
        self.publish(kind).await;
    }

    async fn report_outcome(&self, command: ActuatorCommand, outcome: &ApplyOutcome) {
        let kind = match outcome {
            ApplyOutcome::Applied(command) => EventKind::CommandApplied { command: *command },
            ApplyOutcome::NoOp => EventKind::CommandSuppressed {
                command,
                reason: SuppressionReason::AlreadyApplied,
            },
            ApplyOutcome::Busy => EventKind::CommandSuppressed {
                command,
                reason: SuppressionReason::CommandInFlight,
            },
            ApplyOutcome::Failed(err) => EventKind::CommandFailed {
                command,
                error: err.to_string(),
            },
            ApplyOutcome::Discarded => EventKind::CommandDiscarded { command },
        };
        self.publish(kind).await;
    }

    async fn publish(&self, kind: EventKind) {
        if let Err(err) = self.publisher.publish(Event::new(kind)).await {
            tracing::debug!(%err, "failed to publish control loop event");
        }
    }
}

impl<S, A, P> Inner<S, A, P> {
    /// Return to `Idle` and invalidate every outstanding cycle and command.
    fn halt(&self) -> bool {
        let mut run = self.lock_run();
        let was_running = run.phase != LoopPhase::Idle;
        run.phase = LoopPhase::Idle;
        run.generation = run.generation.wrapping_add(1);
        self.guard.discard_pending();
        was_running
    }

    fn lock_run(&self) -> MutexGuard<'_, RunState> {
        self.run.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
