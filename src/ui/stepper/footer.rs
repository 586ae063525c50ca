//! Navigation footer with asynchronous pre-navigation hooks
//!
//! A trigger moves the footer from `Idle` to `Navigating`, awaits the optional
//! hook for that direction and commits through the controller only if the hook
//! succeeds. The footer always returns to `Idle`, including when the trigger
//! future is dropped before the hook settles.

use std::cell::Cell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures_util::future::{self, FutureExt, LocalBoxFuture};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};

use super::content::StepContent;
use super::controller::StepperContext;
use super::error::{NavDirection, StepperError};
use super::types::{NavOutcome, StepTransition};

pub const DEFAULT_NEXT_LABEL: &str = "Next";
pub const DEFAULT_PREV_LABEL: &str = "Previous";
pub const DEFAULT_FINISH_LABEL: &str = "Finish";

pub type HookFuture = LocalBoxFuture<'static, anyhow::Result<()>>;

/// Gate run before a step change is committed. An `Err` blocks the change.
///
/// The [`StepTransition`] is taken when the trigger starts. If the step moves
/// while the hook is pending (for example through an indicator click), the
/// commit still goes one step from wherever the stepper is then, so the
/// committed step can differ from `transition.to`.
#[derive(Clone)]
pub struct NavHook(Rc<dyn Fn(StepTransition) -> HookFuture>);

impl NavHook {
    pub fn from_async<F, Fut>(hook: F) -> Self
    where
        F: Fn(StepTransition) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        Self(Rc::new(move |transition| hook(transition).boxed_local()))
    }

    /// Wrap a synchronous hook; its result is delivered as an already-ready future
    pub fn from_sync<F>(hook: F) -> Self
    where
        F: Fn(StepTransition) -> anyhow::Result<()> + 'static,
    {
        Self(Rc::new(move |transition| {
            future::ready(hook(transition)).boxed_local()
        }))
    }

    fn call(&self, transition: StepTransition) -> HookFuture {
        (self.0)(transition)
    }
}

impl fmt::Debug for NavHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NavHook")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterState {
    Idle,
    Navigating,
}

/// Resets the footer to `Idle` when dropped
struct NavigatingGuard<'a> {
    state: &'a Cell<FooterState>,
}

impl<'a> NavigatingGuard<'a> {
    fn enter(state: &'a Cell<FooterState>) -> Self {
        state.set(FooterState::Navigating);
        Self { state }
    }
}

impl Drop for NavigatingGuard<'_> {
    fn drop(&mut self) {
        self.state.set(FooterState::Idle);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterConfig {
    pub show_default_actions: bool,
    pub next_label: String,
    pub prev_label: String,
    pub finish_label: String,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            show_default_actions: true,
            next_label: DEFAULT_NEXT_LABEL.to_string(),
            prev_label: DEFAULT_PREV_LABEL.to_string(),
            finish_label: DEFAULT_FINISH_LABEL.to_string(),
        }
    }
}

/// What the footer draws
pub enum FooterContent {
    /// Previous/next buttons, subject to `show_default_actions`
    Default,
    /// Caller-supplied content; default buttons are never drawn
    Custom(Box<dyn StepContent>),
}

impl fmt::Debug for FooterContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FooterContent::Default => f.write_str("Default"),
            FooterContent::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Render model for one default button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterButton {
    pub label: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterButtons {
    pub prev: FooterButton,
    pub next: FooterButton,
}

#[derive(Debug)]
pub struct NavigationFooter {
    config: FooterConfig,
    on_next: Option<NavHook>,
    on_prev: Option<NavHook>,
    content: FooterContent,
    state: Cell<FooterState>,
}

impl NavigationFooter {
    pub fn new(config: FooterConfig) -> Self {
        Self {
            config,
            on_next: None,
            on_prev: None,
            content: FooterContent::Default,
            state: Cell::new(FooterState::Idle),
        }
    }

    pub fn with_on_next(mut self, hook: NavHook) -> Self {
        self.on_next = Some(hook);
        self
    }

    pub fn with_on_prev(mut self, hook: NavHook) -> Self {
        self.on_prev = Some(hook);
        self
    }

    pub fn with_custom_content(self, content: impl StepContent + 'static) -> Self {
        self.with_content(FooterContent::Custom(Box::new(content)))
    }

    pub fn with_content(mut self, content: FooterContent) -> Self {
        self.content = content;
        self
    }

    pub fn config(&self) -> &FooterConfig {
        &self.config
    }

    pub fn state(&self) -> FooterState {
        self.state.get()
    }

    pub fn is_navigating(&self) -> bool {
        self.state.get() == FooterState::Navigating
    }

    /// Button models, or None when the default buttons are not shown
    pub fn buttons(&self, ctx: &StepperContext) -> Result<Option<FooterButtons>, StepperError> {
        let state = ctx.stepper("NavigationFooter")?.state();
        if matches!(self.content, FooterContent::Custom(_)) || !self.config.show_default_actions {
            return Ok(None);
        }

        let navigating = self.is_navigating();
        let next_label = if state.is_last_step() {
            &self.config.finish_label
        } else {
            &self.config.next_label
        };

        Ok(Some(FooterButtons {
            prev: FooterButton {
                label: self.config.prev_label.clone(),
                disabled: !state.can_go_prev() || navigating,
            },
            next: FooterButton {
                label: next_label.clone(),
                disabled: !state.can_go_next() || navigating,
            },
        }))
    }

    pub async fn next(&self, ctx: &StepperContext) -> Result<NavOutcome, StepperError> {
        self.navigate(ctx, NavDirection::Next).await
    }

    pub async fn prev(&self, ctx: &StepperContext) -> Result<NavOutcome, StepperError> {
        self.navigate(ctx, NavDirection::Prev).await
    }

    async fn navigate(
        &self,
        ctx: &StepperContext,
        direction: NavDirection,
    ) -> Result<NavOutcome, StepperError> {
        let handle = ctx.stepper("NavigationFooter")?;
        if self.is_navigating() {
            tracing::trace!(%direction, "Navigation already in progress");
            return Ok(NavOutcome::Busy);
        }

        let state = handle.state();
        let allowed = match direction {
            NavDirection::Next => state.can_go_next(),
            NavDirection::Prev => state.can_go_prev(),
        };
        if !allowed {
            return Ok(NavOutcome::Disabled);
        }

        let _guard = NavigatingGuard::enter(&self.state);

        let (hook, to) = match direction {
            NavDirection::Next => (self.on_next.as_ref(), state.current_step + 1),
            NavDirection::Prev => (self.on_prev.as_ref(), state.current_step - 1),
        };
        if let Some(hook) = hook {
            let transition = StepTransition {
                from: state.current_step,
                to,
            };
            if let Err(source) = hook.call(transition).await {
                tracing::warn!(
                    %direction,
                    from = transition.from,
                    to = transition.to,
                    error = %source,
                    "Navigation hook rejected step change"
                );
                return Err(StepperError::HookRejected { direction, source });
            }
        }

        match direction {
            NavDirection::Next => handle.next_step(),
            NavDirection::Prev => handle.prev_step(),
        };
        Ok(NavOutcome::Committed)
    }

    pub fn render(
        &self,
        ctx: &StepperContext,
        area: Rect,
        buf: &mut Buffer,
    ) -> Result<(), StepperError> {
        if let FooterContent::Custom(content) = &self.content {
            ctx.stepper("NavigationFooter")?;
            content.render(ctx, area, buf);
            return Ok(());
        }

        let Some(buttons) = self.buttons(ctx)? else {
            return Ok(());
        };
        if area.width == 0 || area.height == 0 {
            return Ok(());
        }

        let prev = format!("< {}", buttons.prev.label);
        buf.set_stringn(
            area.x,
            area.y,
            &prev,
            area.width as usize,
            button_style(&buttons.prev, false),
        );

        let next = format!("{} >", buttons.next.label);
        let next_width = next.chars().count() as u16;
        let next_x = (area.x + area.width).saturating_sub(next_width).max(area.x);
        buf.set_stringn(
            next_x,
            area.y,
            &next,
            area.width as usize,
            button_style(&buttons.next, true),
        );
        Ok(())
    }
}

fn button_style(button: &FooterButton, primary: bool) -> Style {
    if button.disabled {
        Style::default().fg(Color::DarkGray)
    } else if primary {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}
