//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the control loop and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod accessory_locator;
pub mod actuator;
pub mod event_bus;
pub mod temperature_source;

pub use accessory_locator::AccessoryLocator;
pub use actuator::Actuator;
pub use event_bus::EventPublisher;
pub use temperature_source::TemperatureSource;
