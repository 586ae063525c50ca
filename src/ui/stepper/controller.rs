//! Step controller: the single source of truth for wizard navigation
//!
//! A [`StepController`] is shared between the stepper's children through a
//! cloneable [`StepHandle`]. Children never reach it implicitly; they receive a
//! [`StepperContext`] as an explicit parameter and ask it for the handle.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::error::StepperError;
use super::types::NavigationState;

/// Callback invoked with the requested step when the stepper is controlled
pub type StepChangeCallback = Rc<dyn Fn(usize)>;

/// Who owns the current step value. Fixed for the lifetime of a controller.
pub enum ControlMode {
    /// The embedding application owns the value and is told about requested changes
    Controlled {
        step: usize,
        on_change: StepChangeCallback,
    },
    /// The controller owns the value
    Uncontrolled { step: usize },
}

impl fmt::Debug for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlMode::Controlled { step, .. } => f
                .debug_struct("Controlled")
                .field("step", step)
                .finish_non_exhaustive(),
            ControlMode::Uncontrolled { step } => {
                f.debug_struct("Uncontrolled").field("step", step).finish()
            }
        }
    }
}

/// What a navigation request resolved to
enum Request {
    OutOfRange,
    Applied,
    Delegated(StepChangeCallback),
}

#[derive(Debug)]
pub struct StepController {
    mode: ControlMode,
    total_steps: usize,
}

impl StepController {
    /// Create a controller that owns its step, starting at `default_step`
    pub fn uncontrolled(default_step: usize) -> Self {
        Self {
            mode: ControlMode::Uncontrolled {
                step: default_step.max(1),
            },
            total_steps: 0,
        }
    }

    /// Create a controller whose step is owned by the caller
    pub fn controlled(step: usize, on_change: StepChangeCallback) -> Self {
        Self {
            mode: ControlMode::Controlled { step, on_change },
            total_steps: 0,
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self.mode, ControlMode::Controlled { .. })
    }

    /// Current step, kept within `1..=max(total_steps, 1)` once steps are registered
    pub fn current_step(&self) -> usize {
        let raw = match &self.mode {
            ControlMode::Controlled { step, .. } | ControlMode::Uncontrolled { step } => *step,
        };
        if self.total_steps == 0 {
            raw.max(1)
        } else {
            raw.clamp(1, self.total_steps)
        }
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn state(&self) -> NavigationState {
        NavigationState {
            current_step: self.current_step(),
            total_steps: self.total_steps,
        }
    }

    pub fn can_go_next(&self) -> bool {
        self.state().can_go_next()
    }

    pub fn can_go_prev(&self) -> bool {
        self.state().can_go_prev()
    }

    /// Record the number of declared steps. Returns false when nothing changed.
    pub fn register_step_count(&mut self, count: usize) -> bool {
        if self.total_steps == count {
            return false;
        }
        self.total_steps = count;

        if let ControlMode::Uncontrolled { step } = &mut self.mode {
            let upper = count.max(1);
            if *step > upper {
                tracing::debug!(step = *step, upper, "Clamping step to registered count");
                *step = upper;
            }
        }
        true
    }

    /// Feed back a step value owned by the embedding application
    pub fn set_controlled_step(&mut self, value: usize) -> Result<(), StepperError> {
        match &mut self.mode {
            ControlMode::Controlled { step, .. } => {
                *step = value;
                Ok(())
            }
            ControlMode::Uncontrolled { .. } => Err(StepperError::NotControlled),
        }
    }

    fn request(&mut self, target: usize) -> Request {
        if target < 1 || target > self.total_steps {
            return Request::OutOfRange;
        }
        match &mut self.mode {
            ControlMode::Controlled { on_change, .. } => Request::Delegated(Rc::clone(on_change)),
            ControlMode::Uncontrolled { step } => {
                *step = target;
                Request::Applied
            }
        }
    }
}

/// Shared handle to a [`StepController`].
///
/// Every operation borrows the controller only for its own duration, so no
/// borrow is ever held across an await point or while calling user callbacks.
#[derive(Debug, Clone)]
pub struct StepHandle {
    inner: Rc<RefCell<StepController>>,
}

impl StepHandle {
    pub fn new(controller: StepController) -> Self {
        Self {
            inner: Rc::new(RefCell::new(controller)),
        }
    }

    pub fn current_step(&self) -> usize {
        self.inner.borrow().current_step()
    }

    pub fn total_steps(&self) -> usize {
        self.inner.borrow().total_steps()
    }

    pub fn state(&self) -> NavigationState {
        self.inner.borrow().state()
    }

    pub fn can_go_next(&self) -> bool {
        self.inner.borrow().can_go_next()
    }

    pub fn can_go_prev(&self) -> bool {
        self.inner.borrow().can_go_prev()
    }

    pub fn is_controlled(&self) -> bool {
        self.inner.borrow().is_controlled()
    }

    /// Request a step change. Out-of-range targets are ignored and return false.
    pub fn go_to_step(&self, target: usize) -> bool {
        let request = self.inner.borrow_mut().request(target);
        match request {
            Request::OutOfRange => {
                tracing::trace!(
                    target,
                    total = self.total_steps(),
                    "Ignoring out-of-range step request"
                );
                false
            }
            Request::Applied => {
                tracing::debug!(step = target, "Step changed");
                true
            }
            Request::Delegated(on_change) => {
                tracing::debug!(step = target, "Forwarding step change to owner");
                on_change(target);
                true
            }
        }
    }

    pub fn next_step(&self) -> bool {
        self.go_to_step(self.current_step() + 1)
    }

    pub fn prev_step(&self) -> bool {
        self.go_to_step(self.current_step().saturating_sub(1))
    }

    pub fn register_step_count(&self, count: usize) -> bool {
        let changed = self.inner.borrow_mut().register_step_count(count);
        if changed {
            tracing::info!(total_steps = count, "Registered step count");
        }
        changed
    }

    pub fn set_controlled_step(&self, step: usize) -> Result<(), StepperError> {
        self.inner.borrow_mut().set_controlled_step(step)
    }
}

/// Explicit scope passed to every stepper component.
///
/// An empty context models a component placed outside any `Stepper`; asking it
/// for the controller fails with [`StepperError::OutsideStepper`].
#[derive(Debug, Clone, Default)]
pub struct StepperContext {
    handle: Option<StepHandle>,
}

impl StepperContext {
    pub fn provide(handle: StepHandle) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// Context with no controller in scope
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn stepper(&self, component: &'static str) -> Result<&StepHandle, StepperError> {
        self.handle
            .as_ref()
            .ok_or(StepperError::OutsideStepper { component })
    }
}
