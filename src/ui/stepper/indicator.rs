//! Step list: indicator bar and step-count registration

use std::cell::Cell;
use std::fmt;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
};

use super::controller::StepperContext;
use super::error::StepperError;
use super::types::{StepDescriptor, StepStatus};

const CHECK_GLYPH: &str = "✓";
const CONNECTOR_GLYPH: &str = "─";

/// Glyph shown inside an indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepMarker {
    Check,
    Icon(String),
    Number(usize),
}

impl fmt::Display for StepMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepMarker::Check => f.write_str(CHECK_GLYPH),
            StepMarker::Icon(icon) => f.write_str(icon),
            StepMarker::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Divider drawn after an indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorState {
    Completed,
    Incomplete,
}

/// Render model for one step indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepIndicator {
    pub step: usize,
    pub title: String,
    pub description: Option<String>,
    pub status: StepStatus,
    /// False means the indicator is disabled; clicks on it change nothing
    pub is_clickable: bool,
    pub marker: StepMarker,
    /// None for the last indicator
    pub connector: Option<ConnectorState>,
}

impl StepIndicator {
    pub fn is_completed(&self) -> bool {
        self.status == StepStatus::Completed
    }

    pub fn is_active(&self) -> bool {
        self.status == StepStatus::Active
    }

    fn marker_style(&self) -> Style {
        match self.status {
            StepStatus::Completed => Style::default().fg(Color::Green),
            StepStatus::Active => Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            StepStatus::Upcoming => Style::default().fg(Color::DarkGray),
        }
    }

    fn title_style(&self) -> Style {
        match self.status {
            StepStatus::Completed => Style::default().fg(Color::White),
            StepStatus::Active => Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            StepStatus::Upcoming => Style::default().fg(Color::DarkGray),
        }
    }
}

/// Build the indicator models for `steps` with `current_step` active
pub fn indicators(steps: &[StepDescriptor], current_step: usize) -> Vec<StepIndicator> {
    let last = steps.len();
    steps
        .iter()
        .enumerate()
        .map(|(index, descriptor)| {
            let step = index + 1;
            let status = StepStatus::of(step, current_step);
            let marker = match (status, &descriptor.icon) {
                (StepStatus::Completed, _) => StepMarker::Check,
                (_, Some(icon)) => StepMarker::Icon(icon.clone()),
                (_, None) => StepMarker::Number(step),
            };
            let connector = (step < last).then(|| {
                if step < current_step {
                    ConnectorState::Completed
                } else {
                    ConnectorState::Incomplete
                }
            });

            StepIndicator {
                step,
                title: descriptor.title.clone(),
                description: descriptor.description.clone(),
                status,
                is_clickable: step <= current_step,
                marker,
                connector,
            }
        })
        .collect()
}

/// Declarative list of steps. Reports its length to the controller and draws
/// the indicator bar.
#[derive(Debug)]
pub struct StepList {
    steps: Vec<StepDescriptor>,
    registered_len: Cell<Option<usize>>,
}

impl StepList {
    pub fn new(steps: Vec<StepDescriptor>) -> Self {
        Self {
            steps,
            registered_len: Cell::new(None),
        }
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Replace the declared steps. The new count is registered on the next sync.
    pub fn set_steps(&mut self, steps: Vec<StepDescriptor>) {
        self.steps = steps;
    }

    /// Push the step count into the controller if it changed since the last push
    pub fn sync(&self, ctx: &StepperContext) -> Result<bool, StepperError> {
        let handle = ctx.stepper("StepList")?;
        let len = self.steps.len();
        if self.registered_len.get() == Some(len) {
            return Ok(false);
        }
        self.registered_len.set(Some(len));
        Ok(handle.register_step_count(len))
    }

    pub fn indicators(&self, ctx: &StepperContext) -> Result<Vec<StepIndicator>, StepperError> {
        let handle = ctx.stepper("StepList")?;
        Ok(indicators(&self.steps, handle.current_step()))
    }

    /// Jump to `step` if its indicator is clickable. Returns whether the step
    /// change was requested.
    pub fn click(&self, ctx: &StepperContext, step: usize) -> Result<bool, StepperError> {
        let handle = ctx.stepper("StepList")?;
        let reachable = step >= 1 && step <= self.steps.len() && step <= handle.current_step();
        if !reachable {
            tracing::trace!(step, "Ignoring click on disabled step indicator");
            return Ok(false);
        }
        Ok(handle.go_to_step(step))
    }

    /// Map a terminal cell inside `area` to the step whose indicator covers it
    pub fn hit_test(&self, area: Rect, column: u16, row: u16) -> Option<usize> {
        let inside = column >= area.x
            && column < area.x.saturating_add(area.width)
            && row >= area.y
            && row < area.y.saturating_add(area.height);
        if !inside {
            return None;
        }
        self.segments(area)
            .iter()
            .position(|segment| column >= segment.x && column < segment.x + segment.width)
            .map(|index| index + 1)
    }

    pub fn render(
        &self,
        ctx: &StepperContext,
        area: Rect,
        buf: &mut Buffer,
    ) -> Result<(), StepperError> {
        self.sync(ctx)?;
        let items = self.indicators(ctx)?;
        for (indicator, segment) in items.iter().zip(self.segments(area).iter()) {
            render_indicator(indicator, *segment, buf);
        }
        Ok(())
    }

    fn segments(&self, area: Rect) -> Vec<Rect> {
        let count = self.steps.len();
        if count == 0 {
            return Vec::new();
        }
        let constraints = vec![Constraint::Ratio(1, count as u32); count];
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area)
            .to_vec()
    }
}

fn render_indicator(indicator: &StepIndicator, area: Rect, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let right = area.x + area.width;

    // Marker, e.g. " 2 " or " ✓ "
    let marker = format!(" {} ", indicator.marker);
    let (x, _) = buf.set_stringn(
        area.x,
        area.y,
        &marker,
        area.width as usize,
        indicator.marker_style(),
    );

    let title_x = x;
    let mut end = x;
    if title_x < right {
        let (after_title, _) = buf.set_stringn(
            title_x,
            area.y,
            &indicator.title,
            (right - title_x) as usize,
            indicator.title_style(),
        );
        end = after_title;
    }

    if let Some(connector) = indicator.connector {
        let start = end.saturating_add(1);
        // Leave one cell of padding before the next indicator
        let stop = right.saturating_sub(1);
        if start < stop {
            let style = match connector {
                ConnectorState::Completed => Style::default().fg(Color::Green),
                ConnectorState::Incomplete => Style::default().fg(Color::DarkGray),
            };
            buf.set_string(
                start,
                area.y,
                CONNECTOR_GLYPH.repeat((stop - start) as usize),
                style,
            );
        }
    }

    if let Some(description) = &indicator.description {
        if area.height > 1 && title_x < right {
            buf.set_stringn(
                title_x,
                area.y + 1,
                description,
                (right - title_x) as usize,
                Style::default().fg(Color::DarkGray),
            );
        }
    }
}
