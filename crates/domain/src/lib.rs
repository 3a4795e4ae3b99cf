//! # heatguard-domain
//!
//! Pure domain model for the heatguard cooling controller.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Readings** (a single body-temperature observation)
//! - Define **Thresholds** and the pure evaluator mapping a reading to a
//!   desired actuator command
//! - Define **Actuator** commands and confirmed states
//! - Define **Accessories** (the addressable cooling device)
//! - Define **Events** (observability records emitted by the control loop)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod accessory;
pub mod actuator;
pub mod event;
pub mod reading;
pub mod threshold;
