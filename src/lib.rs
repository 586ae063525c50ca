//! stepwise - multi-step wizard widget for ratatui
//!
//! The stepper lives in [`ui::stepper`]; [`config`] and [`logging`] carry the
//! ambient setup shared with the `stepwise` demo binary.

pub mod config;
pub mod logging;
pub mod ui;
