//! Hardware abstraction.
//!
//! Drivers only see the `embedded-hal` capability traits re-exported here.
//! The ATmega328P implementations behind them are compiled for the
//! firmware image only.

pub use embedded_hal::adc::{Channel, OneShot};
pub use embedded_hal::blocking::delay::{DelayMs, DelayUs};
pub use embedded_hal::digital::v2::{InputPin, OutputPin};

#[cfg(feature = "firmware")]
pub mod adc;
#[cfg(feature = "firmware")]
pub mod gpio;
#[cfg(feature = "firmware")]
pub mod timer;
#[cfg(feature = "firmware")]
pub mod uart;

#[cfg(feature = "firmware")]
pub use adc::Adc;
#[cfg(feature = "firmware")]
pub use gpio::{board, Analog, Input, Output, Pin};
#[cfg(feature = "firmware")]
pub use timer::Delay;
#[cfg(feature = "firmware")]
pub use uart::Uart;
