//! Best-effort event log over any `ufmt` sink.
//!
//! Lines look like `[12345 SYS] phase RunningKnead`. Write errors are
//! swallowed; the control loop never depends on the log.

use core::convert::Infallible;
use ufmt::uWrite;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogType {
    System,
    Sensor,
    Error,
    Debug,
}

impl LogType {
    pub fn tag(self) -> &'static str {
        match self {
            LogType::System => "SYS",
            LogType::Sensor => "SEN",
            LogType::Error => "ERR",
            LogType::Debug => "DBG",
        }
    }

    /// Sensor and debug lines are only worth the serial time in debug builds
    pub fn enabled(self) -> bool {
        match self {
            LogType::System | LogType::Error => true,
            LogType::Sensor | LogType::Debug => cfg!(feature = "debug"),
        }
    }
}

pub struct Logger<W> {
    sink: W,
    now_ms: u32,
}

impl<W: uWrite> Logger<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, now_ms: 0 }
    }

    /// Update the timestamp used for the next lines
    #[inline]
    pub fn stamp(&mut self, now_ms: u32) {
        self.now_ms = now_ms;
    }

    /// Writes the line prefix; returns false when the line should be skipped
    pub fn begin(&mut self, log_type: LogType) -> bool {
        if !log_type.enabled() {
            return false;
        }
        let now_ms = self.now_ms;
        ufmt::uwrite!(self.sink, "[{} {}] ", now_ms, log_type.tag()).is_ok()
    }

    pub fn sink(&mut self) -> &mut W {
        &mut self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Sink that drops everything
pub struct Silent;

impl uWrite for Silent {
    type Error = Infallible;

    fn write_str(&mut self, _s: &str) -> Result<(), Infallible> {
        Ok(())
    }
}

/// `log!(logger, LogType::System, "phase {:?}", phase)`
#[macro_export]
macro_rules! log {
    ($logger:expr, $log_type:expr, $($arg:tt)*) => {{
        let logger = &mut $logger;
        if logger.begin($log_type) {
            let _ = ufmt::uwriteln!(logger.sink(), $($arg)*);
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::LogBuf;

    #[test]
    fn system_lines_carry_timestamp_and_tag() {
        let mut logger = Logger::new(LogBuf::default());
        logger.stamp(1234);
        crate::log!(logger, LogType::System, "boot {}", 7u8);
        assert_eq!(logger.into_inner().0, "[1234 SYS] boot 7\n");
    }

    #[test]
    fn errors_are_always_logged() {
        let mut logger = Logger::new(LogBuf::default());
        crate::log!(logger, LogType::Error, "fault");
        assert!(logger.into_inner().0.contains("ERR] fault"));
    }

    #[cfg(not(feature = "debug"))]
    #[test]
    fn debug_lines_are_filtered() {
        let mut logger = Logger::new(LogBuf::default());
        crate::log!(logger, LogType::Debug, "noise");
        crate::log!(logger, LogType::Sensor, "temp {}", 80u8);
        assert!(logger.into_inner().0.is_empty());
    }

    #[test]
    fn silent_sink_accepts_everything() {
        let mut logger = Logger::new(Silent);
        crate::log!(logger, LogType::System, "gone");
    }
}
