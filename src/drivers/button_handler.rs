use crate::config::DEBOUNCE_TICKS;
use crate::error::Error;
use embedded_hal::digital::v2::InputPin;
use ufmt::derive::uDebug;

/// Logical press reported by the debouncer
#[derive(Copy, Clone, Debug, uDebug, PartialEq, Eq)]
pub enum ButtonEvent {
    Select,
    Up,
    Down,
}

/// Instantaneous button levels, `true` meaning pressed
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Keys {
    pub select: bool,
    pub up: bool,
    pub down: bool,
}

impl Keys {
    pub fn any(&self) -> bool {
        self.select || self.up || self.down
    }
}

/// Source of button snapshots
pub trait Keypad {
    fn read(&mut self) -> Result<Keys, Error>;

    fn select_held(&mut self) -> Result<bool, Error> {
        Ok(self.read()?.select)
    }
}

/// Three momentary buttons, active low with pull-ups
pub struct ButtonHandler<S, U, D> {
    select: S,
    up: U,
    down: D,
}

impl<S, U, D> ButtonHandler<S, U, D>
where
    S: InputPin,
    U: InputPin,
    D: InputPin,
{
    pub fn new(select: S, up: U, down: D) -> Self {
        Self { select, up, down }
    }
}

impl<S, U, D> Keypad for ButtonHandler<S, U, D>
where
    S: InputPin,
    U: InputPin,
    D: InputPin,
{
    fn read(&mut self) -> Result<Keys, Error> {
        Ok(Keys {
            select: self.select.is_low().map_err(|_| Error::Gpio)?,
            up: self.up.is_low().map_err(|_| Error::Gpio)?,
            down: self.down.is_low().map_err(|_| Error::Gpio)?,
        })
    }

    fn select_held(&mut self) -> Result<bool, Error> {
        self.select.is_low().map_err(|_| Error::Gpio)
    }
}

/// Countdown plus "already reported" latch shared by all three buttons.
///
/// At most one event is reported per press; the latch only clears once
/// every button reads released.
#[derive(Debug, Default)]
pub struct Debouncer {
    countdown: u16,
    reported: bool,
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            countdown: 0,
            reported: false,
        }
    }

    /// Called once per scheduler tick
    #[inline]
    pub fn tick(&mut self) {
        self.countdown = self.countdown.saturating_sub(1);
    }

    pub fn poll(&mut self, keys: Keys) -> Option<ButtonEvent> {
        if !keys.any() {
            self.reported = false;
            return None;
        }
        if self.countdown > 0 || self.reported {
            return None;
        }

        // Select wins over Up, Up over Down
        let event = if keys.select {
            ButtonEvent::Select
        } else if keys.up {
            ButtonEvent::Up
        } else {
            ButtonEvent::Down
        };
        self.reported = true;
        self.countdown = DEBOUNCE_TICKS;
        Some(event)
    }

    /// Forget any pending press, e.g. after a screen change
    pub fn reset(&mut self) {
        self.countdown = 0;
        self.reported = false;
    }

    pub fn countdown(&self) -> u16 {
        self.countdown
    }

    pub fn is_latched(&self) -> bool {
        self.reported
    }
}
