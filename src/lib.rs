//! Bread maker controller.
//!
//! Kneads, lets the dough rise, bakes, then sounds an alarm. Durations are
//! set with three buttons on a 16x2 character display. The crate builds
//! for the host as well so the control logic can be tested against
//! simulated peripherals; the ATmega328P board support lives behind the
//! `firmware` feature.

#![cfg_attr(not(test), no_std)]

pub mod logger;

pub mod application;
pub mod config;
pub mod drivers;
pub mod error;
pub mod hal;
pub mod os;
pub mod ui;

#[cfg(test)]
mod testing;

pub use application::{Application, Phase, Settings};
pub use error::Error;
pub use logger::{LogType, Logger};
pub use os::{Scheduler, Task};
