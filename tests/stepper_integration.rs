//! Integration tests for the stepper through the public library API
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test stepper_integration
//! ```

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Paragraph;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use stepwise::config::Config;
use stepwise::ui::stepper::{
    indicators, ConnectorState, ControlledStep, NavHook, NavOutcome, StepChangeCallback,
    StepContents, StepDescriptor, StepMarker, StepStatus, Stepper, StepperError,
    StepperOptions,
};

// ─── Helpers ────────────────────────────────────────────────────────────────

fn onboarding() -> Vec<StepDescriptor> {
    vec![
        StepDescriptor::new("Account").with_description("Create your login"),
        StepDescriptor::new("Profile").with_icon("@"),
        StepDescriptor::new("Confirm"),
    ]
}

fn rendered(stepper: &Stepper, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    stepper.render(area, &mut buf).unwrap();
    buf.content
        .chunks(width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

// ─── Uncontrolled flow ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_walk_through_wizard_with_footer() {
    let stepper = Stepper::new(StepperOptions::default(), onboarding());
    let handle = stepper.handle();
    assert_eq!(handle.total_steps(), 3);

    assert_eq!(stepper.prev().await.unwrap(), NavOutcome::Disabled);
    assert_eq!(stepper.next().await.unwrap(), NavOutcome::Committed);
    assert_eq!(stepper.next().await.unwrap(), NavOutcome::Committed);
    assert_eq!(handle.current_step(), 3);
    assert!(handle.state().is_last_step());

    // Finish does not advance past the end
    assert_eq!(stepper.next().await.unwrap(), NavOutcome::Disabled);
    assert_eq!(handle.current_step(), 3);

    assert_eq!(stepper.prev().await.unwrap(), NavOutcome::Committed);
    assert_eq!(handle.current_step(), 2);
}

#[test]
fn test_indicator_states_follow_current_step() {
    let stepper = Stepper::new(
        StepperOptions {
            default_step: 2,
            ..StepperOptions::default()
        },
        onboarding(),
    );
    let items = stepper.steps().indicators(&stepper.context()).unwrap();

    assert_eq!(items[0].status, StepStatus::Completed);
    assert_eq!(items[0].marker, StepMarker::Check);
    assert_eq!(items[0].connector, Some(ConnectorState::Completed));

    assert_eq!(items[1].status, StepStatus::Active);
    assert_eq!(items[1].marker, StepMarker::Icon("@".to_string()));
    assert!(items[1].is_clickable);

    assert_eq!(items[2].status, StepStatus::Upcoming);
    assert!(!items[2].is_clickable);
    assert_eq!(items[2].connector, None);

    // Pure function gives the same answer
    assert_eq!(indicators(&onboarding(), 2), items);
}

// ─── Async gating ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_async_gate_blocks_until_valid() {
    let form_valid = Rc::new(Cell::new(false));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let on_next = {
        let form_valid = Rc::clone(&form_valid);
        let seen = Rc::clone(&seen);
        NavHook::from_async(move |transition| {
            seen.borrow_mut().push((transition.from, transition.to));
            let valid = form_valid.get();
            async move {
                tokio::task::yield_now().await;
                if valid {
                    Ok(())
                } else {
                    anyhow::bail!("form has errors")
                }
            }
        })
    };
    let stepper = Stepper::new(
        StepperOptions {
            on_next: Some(on_next),
            ..StepperOptions::default()
        },
        onboarding(),
    );

    let err = stepper.next().await.unwrap_err();
    assert!(matches!(err, StepperError::HookRejected { .. }));
    assert_eq!(stepper.handle().current_step(), 1);
    assert!(!stepper.footer().is_navigating());

    form_valid.set(true);
    assert_eq!(stepper.next().await.unwrap(), NavOutcome::Committed);
    assert_eq!(stepper.handle().current_step(), 2);
    assert_eq!(*seen.borrow(), vec![(1, 2), (1, 2)]);
}

// ─── Controlled mode ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_application_owned_step() {
    let app_step = Rc::new(Cell::new(1));
    let on_change: StepChangeCallback = {
        let app_step = Rc::clone(&app_step);
        Rc::new(move |step| app_step.set(step))
    };
    let stepper = Stepper::new(
        StepperOptions {
            controlled: Some(ControlledStep { step: 1, on_change }),
            ..StepperOptions::default()
        },
        onboarding(),
    );

    assert_eq!(stepper.next().await.unwrap(), NavOutcome::Committed);
    assert_eq!(app_step.get(), 2);
    assert_eq!(stepper.handle().current_step(), 1);

    // The application decides to accept the change
    stepper.handle().set_controlled_step(app_step.get()).unwrap();
    assert_eq!(stepper.handle().current_step(), 2);
}

#[test]
fn test_uncontrolled_stepper_refuses_external_step() {
    let stepper = Stepper::new(StepperOptions::default(), onboarding());
    assert!(matches!(
        stepper.handle().set_controlled_step(2),
        Err(StepperError::NotControlled)
    ));
}

// ─── Rendering ──────────────────────────────────────────────────────────────

#[test]
fn test_render_full_wizard() {
    let stepper = Stepper::new(StepperOptions::default(), onboarding()).with_contents(
        StepContents::new()
            .pane(1, Paragraph::new("Choose a username"))
            .pane(2, Paragraph::new("Tell us about yourself")),
    );

    let text = rendered(&stepper, 72, 10);
    assert!(text.contains("Step 1 of 3: Account"));
    assert!(text.contains("Account"));
    assert!(text.contains("Create your login"));
    assert!(text.contains("Choose a username"));
    assert!(!text.contains("Tell us about yourself"));
    assert!(text.contains("Next >"));

    stepper.handle().go_to_step(3);
    let text = rendered(&stepper, 72, 10);
    assert!(text.contains("✓ Account"));
    assert!(text.contains("Finish >"));
    // No pane declared for step 3
    assert!(!text.contains("Choose a username"));
}

// ─── Configuration ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_config_driven_labels() {
    let mut config = Config::default();
    config.wizard.next_label = "Continue".to_string();
    config.wizard.default_step = 2;

    let stepper = Stepper::new(config.stepper_options(), config.steps.clone());
    assert_eq!(stepper.handle().current_step(), 2);
    assert_eq!(stepper.handle().total_steps(), config.steps.len());

    let text = rendered(&stepper, 80, 10);
    assert!(text.contains("Continue >"));
    assert!(text.contains("< Previous"));
}
