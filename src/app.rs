use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
    Frame,
};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use stepwise::config::Config;
use stepwise::ui::keybindings::{help_line, key_action, WizardAction};
use stepwise::ui::stepper::{
    ControlledStep, NavDirection, NavHook, NavOutcome, StepChangeCallback, StepContents,
    StepDescriptor, StepTransition, Stepper, StepperContext, StepperError,
};
use stepwise::ui::terminal_guard::TerminalSession;

type NavResult = Result<NavOutcome, StepperError>;

pub struct App {
    config: Config,
    stepper: Stepper,
    /// Demo checkbox on the acceptance step
    accepted: Rc<Cell<bool>>,
    /// Step requested by the stepper while in controlled mode, not yet applied
    requested_step: Rc<Cell<Option<usize>>>,
    acceptance_step: usize,
    nav_tx: UnboundedSender<NavResult>,
    nav_rx: UnboundedReceiver<NavResult>,
    /// Last navigation error for display
    status_message: Option<String>,
    /// Area the stepper was last drawn into, for mouse hit-testing
    stepper_area: Rect,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, controlled: bool) -> Self {
        let steps = config.steps.clone();
        let acceptance_step = acceptance_step(steps.len());
        let accepted = Rc::new(Cell::new(false));
        let requested_step = Rc::new(Cell::new(None));

        let mut options = config.stepper_options();
        options.on_next = Some(validation_hook(
            Rc::clone(&accepted),
            Duration::from_millis(config.wizard.validation_delay_ms),
            acceptance_step,
        ));
        if controlled || config.wizard.controlled {
            let on_change: StepChangeCallback = {
                let requested_step = Rc::clone(&requested_step);
                Rc::new(move |step| requested_step.set(Some(step)))
            };
            options.controlled = Some(ControlledStep {
                step: options.default_step,
                on_change,
            });
        }

        let contents = build_contents(&steps, acceptance_step, &accepted);
        let stepper = Stepper::new(options, steps).with_contents(contents);
        tracing::info!(
            steps = stepper.handle().total_steps(),
            controlled = stepper.handle().is_controlled(),
            "Wizard ready"
        );

        let (nav_tx, nav_rx) = mpsc::unbounded_channel();
        Self {
            config,
            stepper,
            accepted,
            requested_step,
            acceptance_step,
            nav_tx,
            nav_rx,
            status_message: None,
            stepper_area: Rect::default(),
            should_quit: false,
        }
    }

    /// Run the wizard until the user quits. Must be called inside a
    /// `tokio::task::LocalSet` since navigation hooks run as local tasks.
    pub async fn run(&mut self) -> Result<()> {
        let mut session = TerminalSession::start()?;
        let tick_rate = Duration::from_millis(self.config.ui.tick_rate_ms);

        while !self.should_quit {
            self.apply_requested_step()?;
            self.drain_navigation_results();

            let mut render_result = Ok(());
            session.terminal().draw(|frame| {
                render_result = self.render(frame);
            })?;
            render_result?;

            // Mouse motion reporting can queue many events per tick
            let mut pending = Vec::new();
            while event::poll(Duration::ZERO)? {
                pending.push(event::read()?);
            }
            self.handle_events(pending)?;

            // Yield so pending navigation hooks can make progress
            tokio::time::sleep(tick_rate).await;
        }

        Ok(())
    }

    fn handle_events(&mut self, events: impl IntoIterator<Item = Event>) -> Result<()> {
        for event in events {
            match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    self.handle_key(key.code)?;
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    self.stepper
                        .click(self.stepper_area, mouse.column, mouse.row)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<()> {
        match key_action(code) {
            Some(action) => self.handle_action(action),
            None => Ok(()),
        }
    }

    fn handle_action(&mut self, action: WizardAction) -> Result<()> {
        match action {
            WizardAction::Next => self.spawn_navigation(NavDirection::Next),
            WizardAction::Prev => self.spawn_navigation(NavDirection::Prev),
            WizardAction::Jump(step) => {
                if self.stepper.jump_to(step)? {
                    self.status_message = None;
                }
            }
            WizardAction::Toggle => {
                if self.stepper.handle().current_step() == self.acceptance_step {
                    self.accepted.set(!self.accepted.get());
                }
            }
            WizardAction::Quit => self.should_quit = true,
        }
        Ok(())
    }

    fn spawn_navigation(&self, direction: NavDirection) {
        let footer = self.stepper.footer();
        let ctx = self.stepper.context();
        let tx = self.nav_tx.clone();
        tokio::task::spawn_local(async move {
            let result = match direction {
                NavDirection::Next => footer.next(&ctx).await,
                NavDirection::Prev => footer.prev(&ctx).await,
            };
            if tx.send(result).is_err() {
                tracing::trace!(%direction, "Wizard closed before navigation settled");
            }
        });
    }

    fn drain_navigation_results(&mut self) {
        while let Ok(result) = self.nav_rx.try_recv() {
            match result {
                Ok(NavOutcome::Committed) => self.status_message = None,
                Ok(NavOutcome::Busy | NavOutcome::Disabled) => {}
                Err(err) => {
                    tracing::info!(error = %err, "Step change not allowed");
                    self.status_message = Some(match err {
                        StepperError::HookRejected { source, .. } => source.to_string(),
                        other => other.to_string(),
                    });
                }
            }
        }
    }

    /// Feed a step requested in controlled mode back into the stepper
    fn apply_requested_step(&mut self) -> Result<()> {
        if let Some(step) = self.requested_step.take() {
            tracing::debug!(step, "Applying requested step");
            self.stepper.handle().set_controlled_step(step)?;
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) -> Result<(), StepperError> {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(8),    // Wizard
                Constraint::Length(1), // Status
                Constraint::Length(1), // Help
            ])
            .split(frame.area());
        self.stepper_area = chunks[0];

        let buf = frame.buffer_mut();
        self.stepper.render(chunks[0], buf)?;
        self.render_status(chunks[1], buf);

        Paragraph::new(Line::from(Span::styled(
            help_line(),
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
        Ok(())
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let line = if self.stepper.footer().is_navigating() {
            Line::from(Span::styled("Checking...", Style::default().fg(Color::Yellow)))
        } else if let Some(message) = &self.status_message {
            Line::from(vec![
                Span::styled("! ", Style::default().fg(Color::Red)),
                Span::styled(message.as_str(), Style::default().fg(Color::Red)),
            ])
        } else {
            Line::default()
        };
        Paragraph::new(line).render(area, buf);
    }
}

/// The demo asks for acceptance on the step before the last one
fn acceptance_step(total: usize) -> usize {
    total.saturating_sub(1).max(1)
}

fn validation_hook(accepted: Rc<Cell<bool>>, delay: Duration, acceptance_step: usize) -> NavHook {
    NavHook::from_async(move |transition: StepTransition| {
        let accepted = accepted.get();
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if transition.from == acceptance_step && !accepted {
                anyhow::bail!("Accept the terms to continue");
            }
            Ok(())
        }
    })
}

fn build_contents(
    steps: &[StepDescriptor],
    acceptance_step: usize,
    accepted: &Rc<Cell<bool>>,
) -> StepContents {
    let total = steps.len();
    let mut contents = StepContents::new();
    for (index, descriptor) in steps.iter().enumerate() {
        let step = index + 1;
        let descriptor = descriptor.clone();
        let accepted = Rc::clone(accepted);
        contents.insert(
            step,
            move |_ctx: &StepperContext, area: Rect, buf: &mut Buffer| {
                let mut lines = vec![
                    Line::from(Span::styled(
                        descriptor.title.clone(),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                ];
                if let Some(description) = &descriptor.description {
                    lines.push(Line::from(description.clone()));
                    lines.push(Line::from(""));
                }
                if step == acceptance_step {
                    let mark = if accepted.get() { "x" } else { " " };
                    lines.push(Line::from(vec![
                        Span::styled(format!("[{mark}]"), Style::default().fg(Color::Cyan)),
                        Span::raw(" I accept the terms (Space to toggle)"),
                    ]));
                }
                if step == total {
                    lines.push(Line::from(Span::styled(
                        "All set. Press q to exit.",
                        Style::default().fg(Color::Green),
                    )));
                }
                Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .render(area, buf);
            },
        );
    }
    contents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse_moved(column: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row: 1,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn test_app(controlled: bool) -> App {
        let mut config = Config::default();
        config.wizard.validation_delay_ms = 0;
        App::new(config, controlled)
    }

    #[test]
    fn test_acceptance_step() {
        assert_eq!(acceptance_step(4), 3);
        assert_eq!(acceptance_step(1), 1);
        assert_eq!(acceptance_step(0), 1);
    }

    #[test]
    fn test_toggle_only_on_acceptance_step() {
        let mut app = test_app(false);
        app.handle_action(WizardAction::Toggle).unwrap();
        assert!(!app.accepted.get());

        app.stepper.handle().go_to_step(3);
        app.handle_action(WizardAction::Toggle).unwrap();
        assert!(app.accepted.get());
    }

    #[test]
    fn test_quit() {
        let mut app = test_app(false);
        app.handle_key(KeyCode::Char('q')).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_jump_key_respects_reachability() {
        let mut app = test_app(false);
        app.stepper.handle().go_to_step(2);
        app.handle_key(KeyCode::Char('4')).unwrap();
        assert_eq!(app.stepper.handle().current_step(), 2);
        app.handle_key(KeyCode::Char('1')).unwrap();
        assert_eq!(app.stepper.handle().current_step(), 1);
    }

    #[test]
    fn test_every_queued_event_is_handled_in_one_batch() {
        let mut app = test_app(false);
        app.stepper.handle().go_to_step(3);

        let mut events: Vec<Event> = (0..40).map(mouse_moved).collect();
        events.push(key(KeyCode::Char(' ')));
        events.extend((0..40).map(mouse_moved));
        events.push(key(KeyCode::Char('1')));
        events.push(key(KeyCode::Char('q')));
        app.handle_events(events).unwrap();

        assert!(app.accepted.get());
        assert_eq!(app.stepper.handle().current_step(), 1);
        assert!(app.should_quit);
    }

    #[test]
    fn test_controlled_request_is_applied_on_next_tick() {
        let mut app = test_app(true);
        assert!(app.stepper.handle().is_controlled());

        app.stepper.handle().next_step();
        assert_eq!(app.stepper.handle().current_step(), 1);

        app.apply_requested_step().unwrap();
        assert_eq!(app.stepper.handle().current_step(), 2);
    }

    #[tokio::test]
    async fn test_rejected_navigation_sets_status() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let mut app = test_app(false);
                app.stepper.handle().go_to_step(3);

                app.handle_action(WizardAction::Next).unwrap();
                // Let the spawned navigation task settle
                for _ in 0..10 {
                    tokio::task::yield_now().await;
                }
                app.drain_navigation_results();

                assert_eq!(app.stepper.handle().current_step(), 3);
                assert_eq!(
                    app.status_message.as_deref(),
                    Some("Accept the terms to continue")
                );

                app.accepted.set(true);
                app.handle_action(WizardAction::Next).unwrap();
                for _ in 0..10 {
                    tokio::task::yield_now().await;
                }
                app.drain_navigation_results();

                assert_eq!(app.stepper.handle().current_step(), 4);
                assert!(app.status_message.is_none());
            })
            .await;
    }
}
