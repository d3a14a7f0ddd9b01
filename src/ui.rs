//! Screen layouts for the 16x2 display.
//!
//! Every line is padded so a redraw overwrites whatever was there before
//! without clearing the whole screen.

use crate::config::LCD_COLUMNS;
use crate::drivers::CharDisplay;
use crate::error::Error;
use ufmt::{uwrite, uWrite};

const CONFIG_TITLE_WIDTH: u8 = 13;

/// Writes `seconds` as `MM:SS`, each field zero padded to two digits.
///
/// The minutes field is not wrapped into hours, so 3600 renders `60:00`.
pub fn write_clock<W: uWrite + ?Sized>(w: &mut W, seconds: u32) -> Result<(), W::Error> {
    let minutes = seconds / 60;
    let rest = seconds - minutes * 60;
    if minutes < 10 {
        w.write_char('0')?;
    }
    uwrite!(w, "{}:", minutes)?;
    if rest < 10 {
        w.write_char('0')?;
    }
    uwrite!(w, "{}", rest)
}

fn pad<D: CharDisplay>(d: &mut D, written: u8, width: u8) -> Result<(), Error> {
    for _ in written..width {
        d.write_byte(b' ')?;
    }
    Ok(())
}

pub fn splash<D: CharDisplay>(d: &mut D) -> Result<(), Error> {
    d.clear()?;
    d.write_string("Bread Maker")?;
    d.set_cursor(0, 1)?;
    d.write_string("Ready")
}

/// Setup screen for one phase duration
pub fn config<D: CharDisplay>(d: &mut D, title: &str, minutes: u8) -> Result<(), Error> {
    d.set_cursor(0, 0)?;
    d.write_string("CFG: ")?;
    d.write_string(title)?;
    pad(d, 5 + title.len() as u8, CONFIG_TITLE_WIDTH)?;

    d.set_cursor(0, 1)?;
    d.write_string("Time: ")?;
    write_clock(d, minutes as u32 * 60)?;
    d.write_string("  ")
}

/// Phase title and countdown on the top row
pub fn header<D: CharDisplay>(d: &mut D, title: &str, remaining: u32) -> Result<(), Error> {
    d.set_cursor(0, 0)?;
    d.write_string(title)?;
    d.write_byte(b' ')?;
    write_clock(d, remaining)?;
    d.write_string("   ")
}

pub fn temperature<D: CharDisplay>(d: &mut D, celsius: u8) -> Result<(), Error> {
    d.set_cursor(0, 1)?;
    uwrite!(d, "Tmp:{}C", celsius)?;
    d.write_string("        ")
}

pub fn blank_line<D: CharDisplay>(d: &mut D, row: u8) -> Result<(), Error> {
    d.set_cursor(0, row)?;
    pad(d, 0, LCD_COLUMNS)
}

pub fn done<D: CharDisplay>(d: &mut D) -> Result<(), Error> {
    d.set_cursor(0, 0)?;
    line(d, "BREAD READY!")?;
    d.set_cursor(0, 1)?;
    line(d, "SEL: new batch")
}

fn line<D: CharDisplay>(d: &mut D, text: &str) -> Result<(), Error> {
    d.write_string(text)?;
    pad(d, text.len() as u8, LCD_COLUMNS)
}
