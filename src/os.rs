//! Cooperative scheduler: a fixed 1ms polling loop, no interrupts.

use crate::application::Phase;
use crate::config::{TEMP_SAMPLE_TICKS, TICKS_PER_SECOND, TICK_MS};
use crate::error::Error;
use embedded_hal::blocking::delay::DelayMs;

/// Work performed once per scheduler quantum
pub trait Task {
    fn tick(&mut self, now_ms: u32) -> Result<(), Error>;

    /// A tick returned an error; the loop keeps going
    fn on_fault(&mut self, _error: Error) {}
}

/// Per-tick counters that turn ticks into run seconds and sample cadence
#[derive(Debug, Default)]
pub struct TickClock {
    sub_second: u16,
    seconds: u32,
    sample_ticks: u16,
}

impl TickClock {
    pub const fn new() -> Self {
        Self {
            sub_second: 0,
            seconds: 0,
            sample_ticks: 0,
        }
    }

    /// Account for one tick spent in `phase`. Returns true when a
    /// temperature sample is due.
    pub fn advance(&mut self, phase: Phase) -> bool {
        if phase.is_running() {
            self.sub_second += 1;
            if self.sub_second >= TICKS_PER_SECOND {
                self.sub_second = 0;
                self.seconds = self.seconds.wrapping_add(1);
            }
        } else {
            self.sub_second = 0;
        }

        if phase == Phase::RunningBake {
            self.sample_ticks += 1;
            if self.sample_ticks >= TEMP_SAMPLE_TICKS {
                self.sample_ticks = 0;
                return true;
            }
        } else {
            // a new bake never reuses a half-elapsed cadence
            self.sample_ticks = 0;
        }
        false
    }

    /// Whole seconds since the current running phase began
    #[inline]
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn restart(&mut self) {
        self.sub_second = 0;
        self.seconds = 0;
    }
}

pub struct Scheduler<D> {
    delay: D,
    tick_count: u32,
}

impl<D: DelayMs<u16>> Scheduler<D> {
    pub fn new(delay: D) -> Self {
        Self {
            delay,
            tick_count: 0,
        }
    }

    /// Block for one quantum, then run the task once
    pub fn step<T: Task>(&mut self, task: &mut T) -> Result<(), Error> {
        self.delay.delay_ms(TICK_MS);
        self.tick_count = self.tick_count.wrapping_add(1);
        task.tick(self.tick_count.wrapping_mul(TICK_MS as u32))
    }

    pub fn run<T: Task>(mut self, task: &mut T) -> ! {
        loop {
            if let Err(e) = self.step(task) {
                task.on_fault(e);
            }
        }
    }

    #[inline]
    pub fn get_ticks(&self) -> u32 {
        self.tick_count
    }
}
