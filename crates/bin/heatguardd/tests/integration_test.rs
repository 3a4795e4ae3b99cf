//! End-to-end tests for the full heatguardd stack.
//!
//! Each test wires the virtual home (thermometer + fan), the actuator guard,
//! the in-process event bus and a real timer-driven control loop, then
//! drives the simulated subject and observes the fan.

use std::sync::Arc;
use std::time::Duration;

use heatguard_adapter_virtual::{VirtualFan, VirtualHome, VirtualThermometer};
use heatguard_app::actuator_guard::ActuatorStateGuard;
use heatguard_app::control_loop::{ControlLoop, LoopPhase};
use heatguard_app::event_bus::InProcessEventBus;
use heatguard_app::ports::AccessoryLocator;
use heatguard_domain::actuator::{ActuatorCommand, ActuatorState};
use heatguard_domain::event::{Event, EventKind};
use heatguard_domain::threshold::ThresholdConfig;
use tokio::sync::broadcast;

const CADENCE: Duration = Duration::from_millis(10);
const TIMEOUT: Duration = Duration::from_secs(1);

type Loop = ControlLoop<Arc<VirtualThermometer>, Arc<VirtualFan>, Arc<InProcessEventBus>>;

struct Harness {
    thermometer: Arc<VirtualThermometer>,
    fan: Arc<VirtualFan>,
    events: broadcast::Receiver<Event>,
    control: Loop,
}

/// Build a fully-wired loop whose home names its cooling device `wanted`.
async fn harness(temperature: f64, wanted: &str) -> Harness {
    let thermometer = Arc::new(VirtualThermometer::fixed(temperature));
    let fan = Arc::new(VirtualFan::new("Fan").expect("fan name is valid"));
    let home = VirtualHome::new(wanted).with_accessory(Arc::clone(&fan));
    let device = home
        .find_cooling_device()
        .await
        .expect("virtual lookup never fails");

    let event_bus = Arc::new(InProcessEventBus::new(4096));
    let events = event_bus.subscribe();
    let control = ControlLoop::new(
        Arc::clone(&thermometer),
        ActuatorStateGuard::new(device, TIMEOUT),
        event_bus,
        ThresholdConfig::default(),
        TIMEOUT,
    );

    Harness {
        thermometer,
        fan,
        events,
        control,
    }
}

/// Poll `condition` until it holds, failing the test after two seconds.
async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition should hold before the deadline");
}

/// Drain events until one matches `predicate`.
async fn wait_for_event(
    events: &mut broadcast::Receiver<Event>,
    mut predicate: impl FnMut(&EventKind) -> bool,
) -> EventKind {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let event = events.recv().await.expect("bus stays open");
            if predicate(&event.kind) {
                return event.kind;
            }
        }
    })
    .await
    .expect("event should arrive before the deadline")
}

// ---------------------------------------------------------------------------
// Cooling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_turn_fan_on_then_off_as_subject_cools() {
    let h = harness(104.6, "Fan").await;
    h.control.start(CADENCE).await.unwrap();

    wait_until(|| h.fan.state() == ActuatorState::On).await;
    h.thermometer.set_temperature(Some(99.1));
    wait_until(|| h.fan.state() == ActuatorState::Off).await;
    tokio::time::sleep(CADENCE * 5).await;

    assert!(h.control.stop().await);
    assert_eq!(h.fan.command_count(), 2);
    assert_eq!(h.control.actuator_state(), ActuatorState::Off);
}

#[tokio::test]
async fn should_keep_fan_off_below_threshold() {
    let mut h = harness(103.9, "Fan").await;
    h.control.start(CADENCE).await.unwrap();

    wait_for_event(&mut h.events, |kind| {
        matches!(
            kind,
            EventKind::CommandApplied {
                command: ActuatorCommand::Off
            }
        )
    })
    .await;
    h.control.stop().await;

    assert_eq!(h.fan.state(), ActuatorState::Off);
    assert_eq!(h.fan.command_count(), 1);
}

#[tokio::test]
async fn should_turn_fan_off_when_no_sample_is_available() {
    let mut h = harness(104.0, "Fan").await;
    h.control.start(CADENCE).await.unwrap();
    wait_until(|| h.fan.state() == ActuatorState::On).await;

    h.thermometer.set_temperature(None);

    wait_for_event(&mut h.events, |kind| matches!(kind, EventKind::NoData)).await;
    wait_until(|| h.fan.state() == ActuatorState::Off).await;
    h.control.stop().await;
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_fail_safe_when_thermometer_is_unreachable() {
    let mut h = harness(105.0, "Fan").await;
    h.control.start(CADENCE).await.unwrap();
    wait_until(|| h.fan.state() == ActuatorState::On).await;

    h.thermometer.set_reachable(false);

    wait_for_event(&mut h.events, |kind| {
        matches!(kind, EventKind::FetchFailed { .. })
    })
    .await;
    wait_until(|| h.fan.state() == ActuatorState::Off).await;
    assert_eq!(h.control.phase(), LoopPhase::Polling);
    h.control.stop().await;
}

#[tokio::test]
async fn should_keep_polling_when_fan_is_unreachable() {
    let mut h = harness(104.5, "Fan").await;
    h.fan.set_reachable(false);
    h.control.start(CADENCE).await.unwrap();

    let kind = wait_for_event(&mut h.events, |kind| {
        matches!(kind, EventKind::CommandFailed { .. })
    })
    .await;
    assert_eq!(
        kind,
        EventKind::CommandFailed {
            command: ActuatorCommand::On,
            error: "collaborator unavailable".to_string(),
        }
    );
    assert_eq!(h.control.actuator_state(), ActuatorState::Unknown);

    h.fan.set_reachable(true);
    wait_until(|| h.fan.state() == ActuatorState::On).await;
    assert_eq!(h.control.actuator_state(), ActuatorState::On);
    h.control.stop().await;
}

#[tokio::test]
async fn should_report_missing_cooling_device() {
    let mut h = harness(104.5, "Ceiling Fan").await;
    h.control.start(CADENCE).await.unwrap();

    let kind = wait_for_event(&mut h.events, |kind| {
        matches!(kind, EventKind::CommandFailed { .. })
    })
    .await;
    h.control.stop().await;

    assert_eq!(
        kind,
        EventKind::CommandFailed {
            command: ActuatorCommand::On,
            error: "no cooling device resolved".to_string(),
        }
    );
    assert_eq!(h.fan.command_count(), 0);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_stop_driving_the_fan_after_stop() {
    let mut h = harness(104.5, "Fan").await;
    h.control.start(CADENCE).await.unwrap();
    wait_until(|| h.fan.state() == ActuatorState::On).await;

    assert!(h.control.stop().await);
    assert!(!h.control.stop().await);
    wait_for_event(&mut h.events, |kind| matches!(kind, EventKind::LoopStopped)).await;

    h.thermometer.set_temperature(Some(98.6));
    tokio::time::sleep(CADENCE * 10).await;

    assert_eq!(h.control.phase(), LoopPhase::Idle);
    assert_eq!(h.fan.state(), ActuatorState::On);
    assert_eq!(h.fan.command_count(), 1);
}

#[tokio::test]
async fn should_restart_after_stop() {
    let h = harness(104.5, "Fan").await;
    h.control.start(CADENCE).await.unwrap();
    wait_until(|| h.fan.state() == ActuatorState::On).await;
    h.control.stop().await;

    h.thermometer.set_temperature(Some(98.6));
    h.control.start(CADENCE).await.unwrap();

    wait_until(|| h.fan.state() == ActuatorState::Off).await;
    h.control.stop().await;
}
