//! Actuator commands and confirmed actuator states.

use serde::{Deserialize, Serialize};

/// What the controller wants the cooling device to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActuatorCommand {
    On,
    Off,
}

impl std::fmt::Display for ActuatorCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
        }
    }
}

/// Last state the device confirmed.
///
/// [`Unknown`](Self::Unknown) only exists before the first confirmed command;
/// there is no conversion back into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActuatorState {
    On,
    Off,
    #[default]
    Unknown,
}

impl ActuatorState {
    /// Whether the device is already in the state `command` asks for.
    #[must_use]
    pub fn satisfies(self, command: ActuatorCommand) -> bool {
        self == Self::from(command)
    }
}

impl From<ActuatorCommand> for ActuatorState {
    fn from(command: ActuatorCommand) -> Self {
        match command {
            ActuatorCommand::On => Self::On,
            ActuatorCommand::Off => Self::Off,
        }
    }
}

impl std::fmt::Display for ActuatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_unknown() {
        assert_eq!(ActuatorState::default(), ActuatorState::Unknown);
    }

    #[test]
    fn should_map_commands_to_matching_states() {
        assert_eq!(ActuatorState::from(ActuatorCommand::On), ActuatorState::On);
        assert_eq!(
            ActuatorState::from(ActuatorCommand::Off),
            ActuatorState::Off
        );
    }

    #[test]
    fn should_not_satisfy_any_command_when_unknown() {
        assert!(!ActuatorState::Unknown.satisfies(ActuatorCommand::On));
        assert!(!ActuatorState::Unknown.satisfies(ActuatorCommand::Off));
    }

    #[test]
    fn should_satisfy_only_the_matching_command() {
        assert!(ActuatorState::On.satisfies(ActuatorCommand::On));
        assert!(!ActuatorState::On.satisfies(ActuatorCommand::Off));
    }

    #[test]
    fn should_display_lowercase_variant_name() {
        assert_eq!(ActuatorCommand::On.to_string(), "on");
        assert_eq!(ActuatorState::Unknown.to_string(), "unknown");
    }

    #[test]
    fn should_serialize_as_lowercase_string() {
        let json = serde_json::to_string(&ActuatorCommand::Off).unwrap();
        assert_eq!(json, "\"off\"");
    }
}
