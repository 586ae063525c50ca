pub mod keybindings;
pub mod stepper;
pub mod terminal_guard;

pub use stepper::{Stepper, StepperOptions};
