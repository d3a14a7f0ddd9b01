use avr_device::atmega328p::{PORTB, PORTC, PORTD};
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::{InputPin, OutputPin};

pub trait PinMode {}
pub struct Input;
pub struct Output;
/// Digital input buffer disabled, owned by the ADC mux
pub struct Analog;
impl PinMode for Input {}
impl PinMode for Output {}
impl PinMode for Analog {}

#[derive(Debug)]
pub struct Pin<PORT, const PIN: u8, MODE> {
    _port: PhantomData<PORT>,
    _mode: PhantomData<MODE>,
}

impl<PORT, const P: u8, MODE> Pin<PORT, P, MODE> {
    const fn new() -> Self {
        Pin {
            _port: PhantomData,
            _mode: PhantomData,
        }
    }
}

macro_rules! impl_port {
    ($PORT:ident, $ddr:ident, $port:ident, $pin:ident) => {
        impl<const P: u8, MODE: PinMode> Pin<$PORT, P, MODE> {
            pub fn into_output(self) -> Pin<$PORT, P, Output> {
                unsafe {
                    // Drive low before switching direction
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin::new()
            }

            pub fn into_pull_up_input(self) -> Pin<$PORT, P, Input> {
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin::new()
            }
        }

        impl<const P: u8> OutputPin for Pin<$PORT, P, Output> {
            type Error = Infallible;

            #[inline]
            fn set_high(&mut self) -> Result<(), Infallible> {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Ok(())
            }

            #[inline]
            fn set_low(&mut self) -> Result<(), Infallible> {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                }
                Ok(())
            }
        }

        impl<const P: u8> InputPin for Pin<$PORT, P, Input> {
            type Error = Infallible;

            #[inline]
            fn is_high(&self) -> Result<bool, Infallible> {
                Ok(unsafe { (*$PORT::ptr()).$pin.read().bits() & (1 << P) != 0 })
            }

            #[inline]
            fn is_low(&self) -> Result<bool, Infallible> {
                self.is_high().map(|high| !high)
            }
        }
    };
}

impl_port!(PORTB, ddrb, portb, pinb);
impl_port!(PORTC, ddrc, portc, pinc);
impl_port!(PORTD, ddrd, portd, pind);

impl<const P: u8> Pin<PORTC, P, Input> {
    /// Hand the pin to the ADC; its digital input buffer is switched off
    pub fn into_analog_input(self, adc: &mut crate::hal::Adc) -> Pin<PORTC, P, Analog> {
        unsafe {
            (*PORTC::ptr()).portc.modify(|r, w| w.bits(r.bits() & !(1 << P)));
        }
        adc.disable_digital_input(P);
        Pin::new()
    }
}

// Bread maker board pin definitions
#[allow(non_camel_case_types)]
pub mod board {
    use super::*;

    // Character display (PORTB control, PORTD high nibble data)
    pub type LCD_RS = Pin<PORTB, 0, Input>;
    pub type LCD_EN = Pin<PORTB, 1, Input>;
    pub type LCD_D4 = Pin<PORTD, 4, Input>;
    pub type LCD_D5 = Pin<PORTD, 5, Input>;
    pub type LCD_D6 = Pin<PORTD, 6, Input>;
    pub type LCD_D7 = Pin<PORTD, 7, Input>;

    // Power outputs
    pub type HEATER = Pin<PORTD, 2, Input>;
    pub type MOTOR = Pin<PORTD, 3, Input>;
    pub type BUZZER = Pin<PORTC, 1, Input>;

    // Buttons (PORTC, active low)
    pub type BTN_SELECT = Pin<PORTC, 2, Input>;
    pub type BTN_UP = Pin<PORTC, 3, Input>;
    pub type BTN_DOWN = Pin<PORTC, 4, Input>;

    // Oven probe on ADC0
    pub type TEMP_PROBE = Pin<PORTC, 0, Input>;

    /// Every pin the board uses, in its reset state (input, no pull-up)
    pub struct Pins {
        pub lcd_rs: LCD_RS,
        pub lcd_en: LCD_EN,
        pub lcd_d4: LCD_D4,
        pub lcd_d5: LCD_D5,
        pub lcd_d6: LCD_D6,
        pub lcd_d7: LCD_D7,
        pub heater: HEATER,
        pub motor: MOTOR,
        pub buzzer: BUZZER,
        pub select: BTN_SELECT,
        pub up: BTN_UP,
        pub down: BTN_DOWN,
        pub temp_probe: TEMP_PROBE,
    }

    impl Pins {
        /// Taking the port peripherals by value keeps the pins unique
        pub fn new(_portb: PORTB, _portc: PORTC, _portd: PORTD) -> Self {
            Self {
                lcd_rs: Pin::new(),
                lcd_en: Pin::new(),
                lcd_d4: Pin::new(),
                lcd_d5: Pin::new(),
                lcd_d6: Pin::new(),
                lcd_d7: Pin::new(),
                heater: Pin::new(),
                motor: Pin::new(),
                buzzer: Pin::new(),
                select: Pin::new(),
                up: Pin::new(),
                down: Pin::new(),
                temp_probe: Pin::new(),
            }
        }
    }
}
