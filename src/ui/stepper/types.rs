//! Type definitions for the stepper widget

use serde::{Deserialize, Serialize};

/// One step as declared by the embedding application.
///
/// Position in the step list defines the (1-indexed) step number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDescriptor {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Glyph shown in place of the step number while the step is not completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl StepDescriptor {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            icon: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Snapshot of the controller's navigation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    pub current_step: usize,
    /// Zero until the step list has registered its length
    pub total_steps: usize,
}

impl NavigationState {
    pub fn can_go_next(&self) -> bool {
        self.current_step < self.total_steps
    }

    pub fn can_go_prev(&self) -> bool {
        self.current_step > 1
    }

    pub fn is_last_step(&self) -> bool {
        self.total_steps > 0 && self.current_step == self.total_steps
    }
}

/// Progress of a single step relative to the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Active,
    Upcoming,
}

impl StepStatus {
    pub fn of(step: usize, current_step: usize) -> Self {
        use std::cmp::Ordering;
        match step.cmp(&current_step) {
            Ordering::Less => StepStatus::Completed,
            Ordering::Equal => StepStatus::Active,
            Ordering::Greater => StepStatus::Upcoming,
        }
    }
}

/// The step change a navigation hook is being asked to approve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTransition {
    pub from: usize,
    pub to: usize,
}

/// Result of a footer trigger that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// The hook passed and the step change was handed to the controller
    Committed,
    /// Another navigation from the same footer is still pending
    Busy,
    /// The corresponding button is disabled at the current step
    Disabled,
}
