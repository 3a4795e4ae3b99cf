//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts via `#[from]`.
//! Collaborator failures never surface as [`HeatGuardError`]: the control
//! loop absorbs them and reports the [`CollaboratorError`] through events.

use std::time::Duration;

/// Top-level error for heatguard operations.
#[derive(Debug, thiserror::Error)]
pub enum HeatGuardError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// `start` was called on a control loop that is not idle.
    #[error("control loop is already running")]
    AlreadyRunning,
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("threshold values must be finite")]
    NonFiniteThreshold,

    #[error("high threshold {high} must be above baseline {baseline}")]
    ThresholdNotAboveBaseline { baseline: f64, high: f64 },

    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    /// The timer cannot schedule a deadline this far in the future.
    #[error("poll cadence {0:?} is too large to schedule")]
    CadenceTooLarge(Duration),
}

/// Why a call to an external collaborator did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    /// The call did not complete within the caller-supplied bound.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The collaborator is known but currently unreachable.
    #[error("collaborator unavailable")]
    Unavailable,

    /// No cooling device was resolved before the loop started.
    #[error("no cooling device resolved")]
    NoDevice,

    /// Transport-level failure reported by the collaborator.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CollaboratorError {
    /// Wrap an arbitrary collaborator error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }

    /// Whether the failure was caused by the call exceeding its bound.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
