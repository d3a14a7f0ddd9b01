//! HD44780-class character display over a 4-bit data path.
//!
//! Wiring is RS + E control lines and D4..D7 data lines; the R/W line is
//! tied low so the driver never reads the busy flag and relies on fixed
//! settle delays instead.

use crate::error::Error;
use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::OutputPin;

/// Instruction codes used by the firmware
pub mod command {
    pub const CLEAR: u8 = 0x01;
    pub const HOME: u8 = 0x02;
    /// 4-bit bus, 2 lines, 5x8 font
    pub const FUNCTION_SET_4BIT_2LINE: u8 = 0x28;
    pub const DISPLAY_OFF: u8 = 0x08;
    pub const DISPLAY_ON_CURSOR_BLINK: u8 = 0x0F;
    pub const DISPLAY_ON_CURSOR_OFF: u8 = 0x0C;
    pub const SET_DDRAM_ROW0: u8 = 0x80;
    pub const SET_DDRAM_ROW1: u8 = 0xC0;
}

/// Sent once the controller is listening on four data lines
const INIT_COMMANDS: [u8; 6] = [
    command::FUNCTION_SET_4BIT_2LINE,
    command::DISPLAY_OFF,
    command::CLEAR,
    command::DISPLAY_ON_CURSOR_BLINK,
    command::SET_DDRAM_ROW0,
    command::DISPLAY_ON_CURSOR_OFF,
];

const POWER_ON_MS: u16 = 20;
const ENABLE_PULSE_US: u16 = 1;
const SETTLE_US: u16 = 50;
const SLOW_COMMAND_MS: u16 = 2;

/// Operations the state machine needs from a character display.
///
/// `uWrite` lets callers format numbers straight onto the screen with
/// `ufmt::uwrite!`.
pub trait CharDisplay: ufmt::uWrite<Error = Error> {
    /// Bring the controller up from power-on
    fn init(&mut self) -> Result<(), Error>;
    fn clear(&mut self) -> Result<(), Error>;
    fn home(&mut self) -> Result<(), Error>;
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Error>;
    /// Raw character code at the cursor
    fn write_byte(&mut self, c: u8) -> Result<(), Error>;
    fn write_string(&mut self, s: &str) -> Result<(), Error>;
}

pub struct Lcd<RS, EN, D4, D5, D6, D7, D> {
    rs: RS,
    en: EN,
    d4: D4,
    d5: D5,
    d6: D6,
    d7: D7,
    delay: D,
}

impl<RS, EN, D4, D5, D6, D7, D> Lcd<RS, EN, D4, D5, D6, D7, D>
where
    RS: OutputPin,
    EN: OutputPin,
    D4: OutputPin,
    D5: OutputPin,
    D6: OutputPin,
    D7: OutputPin,
    D: DelayMs<u16> + DelayUs<u16>,
{
    pub fn new(rs: RS, en: EN, d4: D4, d5: D5, d6: D6, d7: D7, delay: D) -> Self {
        Self { rs, en, d4, d5, d6, d7, delay }
    }

    /// Power-on sequence mandated by the controller datasheet.
    ///
    /// The first three pulses are read as 8-bit function sets, so only the
    /// upper nibble on D4..D7 counts until the bus is switched to 4 bits.
    pub fn init(&mut self) -> Result<(), Error> {
        self.rs.set_low().map_err(|_| Error::Gpio)?;
        self.en.set_low().map_err(|_| Error::Gpio)?;
        self.delay.delay_ms(POWER_ON_MS);

        self.send_nibble(0x3)?;
        self.delay.delay_ms(5);
        self.pulse_enable()?;
        self.delay.delay_us(200);
        self.pulse_enable()?;

        self.send_nibble(0x2)?;

        for &cmd in INIT_COMMANDS.iter() {
            self.write_command(cmd)?;
        }
        Ok(())
    }

    pub fn write_command(&mut self, cmd: u8) -> Result<(), Error> {
        self.rs.set_low().map_err(|_| Error::Gpio)?;
        self.send_byte(cmd)?;
        // clear and return-home take ~1.5ms
        if cmd < 0x04 {
            self.delay.delay_ms(SLOW_COMMAND_MS);
        }
        Ok(())
    }

    pub fn write_char(&mut self, c: u8) -> Result<(), Error> {
        self.rs.set_high().map_err(|_| Error::Gpio)?;
        self.send_byte(c)
    }

    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Error> {
        let base = if row == 0 {
            command::SET_DDRAM_ROW0
        } else {
            command::SET_DDRAM_ROW1
        };
        self.write_command(base | (col & 0x3F))
    }

    pub fn write_string(&mut self, s: &str) -> Result<(), Error> {
        for b in s.bytes() {
            self.write_char(b)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), Error> {
        self.write_command(command::CLEAR)
    }

    pub fn home(&mut self) -> Result<(), Error> {
        self.write_command(command::HOME)
    }

    /// Give the pins and delay back
    pub fn release(self) -> (RS, EN, D4, D5, D6, D7, D) {
        (self.rs, self.en, self.d4, self.d5, self.d6, self.d7, self.delay)
    }

    // High nibble first
    fn send_byte(&mut self, b: u8) -> Result<(), Error> {
        self.send_nibble(b >> 4)?;
        self.send_nibble(b & 0x0F)
    }

    fn send_nibble(&mut self, nibble: u8) -> Result<(), Error> {
        set_line(&mut self.d4, nibble & 0x01 != 0)?;
        set_line(&mut self.d5, nibble & 0x02 != 0)?;
        set_line(&mut self.d6, nibble & 0x04 != 0)?;
        set_line(&mut self.d7, nibble & 0x08 != 0)?;
        self.pulse_enable()
    }

    fn pulse_enable(&mut self) -> Result<(), Error> {
        self.en.set_high().map_err(|_| Error::Gpio)?;
        self.delay.delay_us(ENABLE_PULSE_US);
        self.en.set_low().map_err(|_| Error::Gpio)?;
        self.delay.delay_us(SETTLE_US);
        Ok(())
    }
}

fn set_line<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), Error> {
    if high {
        pin.set_high().map_err(|_| Error::Gpio)
    } else {
        pin.set_low().map_err(|_| Error::Gpio)
    }
}

impl<RS, EN, D4, D5, D6, D7, D> ufmt::uWrite for Lcd<RS, EN, D4, D5, D6, D7, D>
where
    RS: OutputPin,
    EN: OutputPin,
    D4: OutputPin,
    D5: OutputPin,
    D6: OutputPin,
    D7: OutputPin,
    D: DelayMs<u16> + DelayUs<u16>,
{
    type Error = Error;

    fn write_str(&mut self, s: &str) -> Result<(), Error> {
        self.write_string(s)
    }
}

impl<RS, EN, D4, D5, D6, D7, D> CharDisplay for Lcd<RS, EN, D4, D5, D6, D7, D>
where
    RS: OutputPin,
    EN: OutputPin,
    D4: OutputPin,
    D5: OutputPin,
    D6: OutputPin,
    D7: OutputPin,
    D: DelayMs<u16> + DelayUs<u16>,
{
    fn init(&mut self) -> Result<(), Error> {
        Lcd::init(self)
    }

    fn clear(&mut self) -> Result<(), Error> {
        Lcd::clear(self)
    }

    fn home(&mut self) -> Result<(), Error> {
        Lcd::home(self)
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Error> {
        Lcd::set_cursor(self, col, row)
    }

    fn write_byte(&mut self, c: u8) -> Result<(), Error> {
        Lcd::write_char(self, c)
    }

    fn write_string(&mut self, s: &str) -> Result<(), Error> {
        Lcd::write_string(self, s)
    }
}
