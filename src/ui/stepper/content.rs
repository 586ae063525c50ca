//! Step content panes: only the pane for the current step is rendered

use std::collections::BTreeMap;
use std::fmt;

use ratatui::{buffer::Buffer, layout::Rect, widgets::Paragraph, widgets::Widget};

use super::controller::StepperContext;
use super::error::StepperError;

/// Something that can draw itself inside a stepper.
///
/// Implemented for closures so panes can be written inline:
/// `|ctx: &StepperContext, area: Rect, buf: &mut Buffer| { ... }`
pub trait StepContent {
    fn render(&self, ctx: &StepperContext, area: Rect, buf: &mut Buffer);
}

impl<F> StepContent for F
where
    F: Fn(&StepperContext, Rect, &mut Buffer),
{
    fn render(&self, ctx: &StepperContext, area: Rect, buf: &mut Buffer) {
        self(ctx, area, buf);
    }
}

impl StepContent for Paragraph<'static> {
    fn render(&self, _ctx: &StepperContext, area: Rect, buf: &mut Buffer) {
        Widget::render(self.clone(), area, buf);
    }
}

/// Dispatch table from step number to the pane shown on that step
#[derive(Default)]
pub struct StepContents {
    panes: BTreeMap<usize, Box<dyn StepContent>>,
}

impl fmt::Debug for StepContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepContents")
            .field("steps", &self.panes.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl StepContents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the pane for `step`, replacing any earlier declaration
    pub fn pane(mut self, step: usize, content: impl StepContent + 'static) -> Self {
        self.insert(step, content);
        self
    }

    pub fn insert(&mut self, step: usize, content: impl StepContent + 'static) {
        if self.panes.insert(step, Box::new(content)).is_some() {
            tracing::debug!(step, "Replaced content pane");
        }
    }

    /// Step whose pane would be rendered right now, if one is declared
    pub fn visible_step(&self, ctx: &StepperContext) -> Result<Option<usize>, StepperError> {
        let current = ctx.stepper("StepContents")?.current_step();
        Ok(self.panes.contains_key(&current).then_some(current))
    }

    pub fn render(
        &self,
        ctx: &StepperContext,
        area: Rect,
        buf: &mut Buffer,
    ) -> Result<(), StepperError> {
        let current = ctx.stepper("StepContents")?.current_step();
        if let Some(pane) = self.panes.get(&current) {
            pane.render(ctx, area, buf);
        }
        Ok(())
    }
}
