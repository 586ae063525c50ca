//! Multi-step wizard widget
//!
//! A [`Stepper`] owns the [`StepController`] and hands a [`StepperContext`] to
//! its children: the [`StepList`] (indicator bar, step-count registration), the
//! [`StepContents`] dispatch table and the [`NavigationFooter`]. Children only
//! talk to the controller through the [`StepHandle`] they get from that context.

use std::rc::Rc;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

pub mod content;
pub mod controller;
pub mod error;
pub mod footer;
pub mod indicator;
pub mod types;

pub use content::{StepContent, StepContents};
pub use controller::{ControlMode, StepChangeCallback, StepController, StepHandle, StepperContext};
pub use error::{NavDirection, StepperError};
pub use footer::{
    FooterButton, FooterButtons, FooterConfig, FooterContent, FooterState, NavHook,
    NavigationFooter,
};
pub use indicator::{indicators, ConnectorState, StepIndicator, StepList, StepMarker};
pub use types::*;


/// A step value owned by the embedding application
#[derive(Clone)]
pub struct ControlledStep {
    pub step: usize,
    pub on_change: StepChangeCallback,
}

/// Construction-time options for a [`Stepper`]
pub struct StepperOptions {
    /// Initial step when uncontrolled
    pub default_step: usize,
    /// Supplying this puts the stepper in controlled mode for its whole lifetime
    pub controlled: Option<ControlledStep>,
    pub footer: FooterConfig,
    pub footer_content: FooterContent,
    pub on_next: Option<NavHook>,
    pub on_prev: Option<NavHook>,
}

impl Default for StepperOptions {
    fn default() -> Self {
        Self {
            default_step: 1,
            controlled: None,
            footer: FooterConfig::default(),
            footer_content: FooterContent::Default,
            on_next: None,
            on_prev: None,
        }
    }
}

/// Screen regions used by a rendered stepper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepperLayout {
    pub indicators: Rect,
    pub content: Rect,
    pub footer: Rect,
}

pub struct Stepper {
    handle: StepHandle,
    steps: StepList,
    contents: StepContents,
    footer: Rc<NavigationFooter>,
}

impl Stepper {
    pub fn new(options: StepperOptions, steps: Vec<StepDescriptor>) -> Self {
        let controller = match options.controlled {
            Some(ControlledStep { step, on_change }) => StepController::controlled(step, on_change),
            None => StepController::uncontrolled(options.default_step),
        };
        let handle = StepHandle::new(controller);

        let mut footer = NavigationFooter::new(options.footer).with_content(options.footer_content);
        if let Some(hook) = options.on_next {
            footer = footer.with_on_next(hook);
        }
        if let Some(hook) = options.on_prev {
            footer = footer.with_on_prev(hook);
        }

        let stepper = Self {
            handle,
            steps: StepList::new(steps),
            contents: StepContents::new(),
            footer: Rc::new(footer),
        };
        stepper.sync_steps();
        stepper
    }

    pub fn with_contents(mut self, contents: StepContents) -> Self {
        self.contents = contents;
        self
    }

    pub fn handle(&self) -> &StepHandle {
        &self.handle
    }

    /// Context to pass to children rendered by the embedding application
    pub fn context(&self) -> StepperContext {
        StepperContext::provide(self.handle.clone())
    }

    pub fn steps(&self) -> &StepList {
        &self.steps
    }

    pub fn set_steps(&mut self, steps: Vec<StepDescriptor>) {
        self.steps.set_steps(steps);
        self.sync_steps();
    }

    pub fn contents(&self) -> &StepContents {
        &self.contents
    }

    pub fn footer(&self) -> Rc<NavigationFooter> {
        Rc::clone(&self.footer)
    }

    pub async fn next(&self) -> Result<NavOutcome, StepperError> {
        self.footer.next(&self.context()).await
    }

    pub async fn prev(&self) -> Result<NavOutcome, StepperError> {
        self.footer.prev(&self.context()).await
    }

    /// Jump through the step's indicator; unreachable steps are ignored
    pub fn jump_to(&self, step: usize) -> Result<bool, StepperError> {
        self.steps.click(&self.context(), step)
    }

    /// Handle a mouse click at a terminal cell for a stepper drawn in `area`
    pub fn click(&self, area: Rect, column: u16, row: u16) -> Result<bool, StepperError> {
        let layout = self.layout(area);
        match self.steps.hit_test(layout.indicators, column, row) {
            Some(step) => self.jump_to(step),
            None => Ok(false),
        }
    }

    pub fn layout(&self, area: Rect) -> StepperLayout {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Indicators
                Constraint::Length(1), // Spacer
                Constraint::Min(1),    // Content
                Constraint::Length(1), // Footer
            ])
            .split(inner);

        StepperLayout {
            indicators: chunks[0],
            content: chunks[2],
            footer: chunks[3],
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) -> Result<(), StepperError> {
        let ctx = self.context();
        let state = self.handle.state();

        let title = match self.steps.steps().get(state.current_step - 1) {
            Some(step) => format!(
                " Step {} of {}: {} ",
                state.current_step, state.total_steps, step.title
            ),
            None => " Steps ".to_string(),
        };
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .render(area, buf);

        let layout = self.layout(area);
        self.steps.render(&ctx, layout.indicators, buf)?;
        self.contents.render(&ctx, layout.content, buf)?;
        self.footer.render(&ctx, layout.footer, buf)?;
        Ok(())
    }

    fn sync_steps(&self) {
        if let Err(err) = self.steps.sync(&self.context()) {
            // Unreachable: the stepper always provides its own context
            tracing::error!(error = %err, "Failed to register step count");
        }
    }
}
