//! Unified error type for the firmware.
//!
//! Variants carry no data; the concrete HAL error is dropped at the driver
//! boundary since the control loop has no way to act on it beyond logging.

use ufmt::derive::uDebug;

/// Top-level error type used across the drivers and the state machine.
#[derive(Debug, uDebug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Reading or driving a digital line failed.
    Gpio,
    /// The analog conversion failed.
    Adc,
}
