//! Error types for the stepper widget

use std::fmt;

use thiserror::Error;

/// Direction of a footer-triggered navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Next,
    Prev,
}

impl fmt::Display for NavDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavDirection::Next => write!(f, "next"),
            NavDirection::Prev => write!(f, "previous"),
        }
    }
}

#[derive(Error, Debug)]
pub enum StepperError {
    /// A stepper component was rendered or triggered without a controller in scope.
    /// This is a wiring mistake in the embedding application.
    #[error("{component} must be used within a Stepper")]
    OutsideStepper { component: &'static str },

    /// The pre-navigation hook signalled failure; the step change was not committed
    #[error("{direction} navigation was rejected: {source}")]
    HookRejected {
        direction: NavDirection,
        #[source]
        source: anyhow::Error,
    },

    /// A controlled step value was fed to a stepper built in uncontrolled mode
    #[error("stepper is uncontrolled; controlled step updates are not accepted")]
    NotControlled,
}

impl StepperError {
    /// True for errors that come from the embedding application's wiring rather
    /// than from a user action
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            StepperError::OutsideStepper { .. } | StepperError::NotControlled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_stepper_message_names_component() {
        let err = StepperError::OutsideStepper {
            component: "StepList",
        };
        assert_eq!(err.to_string(), "StepList must be used within a Stepper");
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_hook_rejected_keeps_source() {
        let err = StepperError::HookRejected {
            direction: NavDirection::Next,
            source: anyhow::anyhow!("email is required"),
        };
        assert_eq!(
            err.to_string(),
            "next navigation was rejected: email is required"
        );
        assert!(!err.is_configuration_error());
        assert!(std::error::Error::source(&err).is_some());
    }
}
