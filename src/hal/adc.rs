use avr_device::atmega328p::{ADC, PORTC};
use core::convert::Infallible;
use embedded_hal::adc::{Channel, OneShot};

use super::gpio::{Analog, Pin};

// ADEN | prescaler div128 (125kHz @ 16MHz)
const ADCSRA_ENABLE_DIV128: u8 = 0x87;
const ADSC: u8 = 0x40;
// REFS0: AVCC reference, right adjusted result
const ADMUX_AVCC: u8 = 0x40;

/// Single-conversion ADC. Conversions are started on the first `read`
/// and polled to completion through `nb`.
pub struct Adc {
    _adc: ADC,
    active: Option<u8>,
}

impl Adc {
    pub fn new(adc: ADC) -> Self {
        unsafe {
            (*ADC::ptr()).adcsra.write(|w| w.bits(ADCSRA_ENABLE_DIV128));
            (*ADC::ptr()).admux.write(|w| w.bits(ADMUX_AVCC));
        }
        Self {
            _adc: adc,
            active: None,
        }
    }

    pub(crate) fn disable_digital_input(&mut self, channel: u8) {
        unsafe {
            (*ADC::ptr())
                .didr0
                .modify(|r, w| w.bits(r.bits() | (1 << channel)));
        }
    }

    fn start(&mut self, channel: u8) {
        unsafe {
            (*ADC::ptr())
                .admux
                .modify(|r, w| w.bits((r.bits() & 0xF0) | (channel & 0x0F)));
            (*ADC::ptr()).adcsra.modify(|r, w| w.bits(r.bits() | ADSC));
        }
        self.active = Some(channel);
    }

    fn busy(&self) -> bool {
        unsafe { (*ADC::ptr()).adcsra.read().bits() & ADSC != 0 }
    }
}

impl<PIN: Channel<Adc, ID = u8>> OneShot<Adc, u16, PIN> for Adc {
    type Error = Infallible;

    fn read(&mut self, _pin: &mut PIN) -> nb::Result<u16, Self::Error> {
        match self.active {
            None => {
                self.start(PIN::channel());
                Err(nb::Error::WouldBlock)
            }
            Some(_) if self.busy() => Err(nb::Error::WouldBlock),
            Some(channel) => {
                self.active = None;
                if channel != PIN::channel() {
                    // a conversion for another pin finished first
                    return Err(nb::Error::WouldBlock);
                }
                Ok(unsafe { (*ADC::ptr()).adc.read().bits() })
            }
        }
    }
}

impl<const P: u8> Channel<Adc> for Pin<PORTC, P, Analog> {
    type ID = u8;

    fn channel() -> u8 {
        P
    }
}
