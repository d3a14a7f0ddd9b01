use avr_device::atmega328p::USART0;
use core::convert::Infallible;

use crate::config::CPU_FREQ_HZ;

const U2X0: u8 = 1 << 1;
const UDRE0: u8 = 1 << 5;
const TXEN0: u8 = 1 << 3;
// 8 data bits, no parity, 1 stop bit
const UCSZ_8N1: u8 = 0x06;

/// Double-speed divisor, rounded to nearest
const fn ubrr(baud: u32) -> u16 {
    ((CPU_FREQ_HZ / (4 * baud) - 1) / 2) as u16
}

/// Polled, transmit-only USART0 used as the log sink
pub struct Uart {
    _usart: USART0,
}

impl Uart {
    pub fn new(usart: USART0, baud: u32) -> Self {
        unsafe {
            let p = USART0::ptr();
            (*p).ubrr0.write(|w| w.bits(ubrr(baud)));
            (*p).ucsr0a.write(|w| w.bits(U2X0));
            (*p).ucsr0c.write(|w| w.bits(UCSZ_8N1));
            (*p).ucsr0b.write(|w| w.bits(TXEN0));
        }
        Self { _usart: usart }
    }

    pub fn write_byte(&mut self, byte: u8) {
        unsafe {
            let p = USART0::ptr();
            while (*p).ucsr0a.read().bits() & UDRE0 == 0 {}
            (*p).udr0.write(|w| w.bits(byte));
        }
    }
}

impl ufmt::uWrite for Uart {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        for b in s.bytes() {
            if b == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(b);
        }
        Ok(())
    }
}
