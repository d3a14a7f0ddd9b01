use avr_device::atmega328p::TC0;
use core::marker::PhantomData;
use embedded_hal::blocking::delay::{DelayMs, DelayUs};

use crate::config::CPU_FREQ_HZ;

#[derive(Clone, Copy)]
#[repr(u8)]
enum Prescaler {
    Div8 = 2,
    Div64 = 3,
}

const COUNTS_PER_MS: u8 = (CPU_FREQ_HZ / 64 / 1000) as u8;
const COUNTS_PER_US: u16 = (CPU_FREQ_HZ / 8 / 1_000_000) as u16;
// Largest microsecond span that still fits the 8-bit counter
const MAX_US_CHUNK: u16 = 255 / COUNTS_PER_US;

/// Busy-wait delays on Timer0 in normal mode.
///
/// Copies share the timer. Nothing runs from interrupts, so two waits
/// can never overlap.
#[derive(Clone, Copy)]
pub struct Delay {
    _timer: PhantomData<TC0>,
}

impl Delay {
    pub fn new(_timer: TC0) -> Self {
        unsafe {
            (*TC0::ptr()).tccr0a.write(|w| w.bits(0));
            (*TC0::ptr()).tccr0b.write(|w| w.bits(0));
        }
        Self {
            _timer: PhantomData,
        }
    }

    fn wait_counts(&mut self, prescaler: Prescaler, counts: u8) {
        unsafe {
            let p = TC0::ptr();
            (*p).tccr0b.write(|w| w.bits(0));
            (*p).tcnt0.write(|w| w.bits(0));
            (*p).tccr0b.write(|w| w.bits(prescaler as u8));
            while (*p).tcnt0.read().bits() < counts {}
            (*p).tccr0b.write(|w| w.bits(0));
        }
    }
}

impl DelayMs<u16> for Delay {
    fn delay_ms(&mut self, ms: u16) {
        for _ in 0..ms {
            self.wait_counts(Prescaler::Div64, COUNTS_PER_MS);
        }
    }
}

impl DelayUs<u16> for Delay {
    fn delay_us(&mut self, us: u16) {
        let mut left = us;
        while left > 0 {
            let chunk = left.min(MAX_US_CHUNK);
            self.wait_counts(Prescaler::Div8, (chunk * COUNTS_PER_US) as u8);
            left -= chunk;
        }
    }
}
