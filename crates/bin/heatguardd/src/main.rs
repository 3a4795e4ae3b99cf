//! # heatguardd — heatguard daemon
//!
//! Composition root that wires the collaborators together and runs the
//! control loop until interrupted.
//!
//! ## Responsibilities
//! - Load configuration (`heatguard.toml`, env vars)
//! - Initialise tracing
//! - Build the simulated home, locate the cooling device once
//! - Construct the actuator guard, event bus and control loop
//! - Start polling and stop cleanly on Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use heatguard_adapter_virtual::{VirtualFan, VirtualHome, VirtualThermometer};
use heatguard_app::actuator_guard::ActuatorStateGuard;
use heatguard_app::control_loop::ControlLoop;
use heatguard_app::event_bus::InProcessEventBus;
use heatguard_app::ports::AccessoryLocator;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Collaborators
    let thermometer = Arc::new(VirtualThermometer::drifting(config.simulation.clone()));
    let fan = Arc::new(VirtualFan::new(&config.accessory.name)?);
    let home = VirtualHome::new(&config.accessory.name).with_accessory(fan);

    let device = match home.find_cooling_device().await {
        Ok(device) => device,
        Err(err) => {
            tracing::warn!(error = %err, "cooling device lookup failed");
            None
        }
    };

    // Event bus
    let event_bus = Arc::new(InProcessEventBus::new(256));
    let mut events = event_bus.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::debug!(id = %event.id, kind = ?event.kind, "event"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event logger lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Control loop
    let guard = ActuatorStateGuard::new(device, config.command_timeout());
    let control = ControlLoop::new(
        thermometer,
        guard,
        Arc::clone(&event_bus),
        config.thresholds()?,
        config.fetch_timeout(),
    );
    control.start(config.poll_cadence()).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");
    control.stop().await;

    Ok(())
}
