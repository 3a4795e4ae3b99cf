//! # heatguard-app
//!
//! Application layer — the monitoring-and-control loop and **port
//! definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `TemperatureSource` — latest body-temperature sample
//!   - `Actuator` — on/off commands for the cooling device
//!   - `AccessoryLocator` — one-time resolution of the cooling device
//!   - `EventPublisher` — observability events
//! - Provide the **driving** side:
//!   - `ActuatorStateGuard` — idempotent, single-flight actuator commands
//!   - `ControlLoop` — timer-driven polling, evaluation and actuation
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `heatguard-domain` only (plus `tokio` for tasks, timers and
//! channels). Never imports adapter crates. Adapters depend on *this* crate,
//! not the reverse.

pub mod actuator_guard;
pub mod control_loop;
pub mod event_bus;
pub mod ports;
