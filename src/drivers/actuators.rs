use crate::error::Error;
use embedded_hal::digital::v2::OutputPin;

/// Power outputs of the appliance
pub trait Outputs {
    fn set_motor(&mut self, on: bool) -> Result<(), Error>;
    fn set_heater(&mut self, on: bool) -> Result<(), Error>;
    fn set_buzzer(&mut self, on: bool) -> Result<(), Error>;

    fn all_off(&mut self) -> Result<(), Error> {
        self.set_motor(false)?;
        self.set_heater(false)?;
        self.set_buzzer(false)
    }
}

/// Kneading motor, heating element and buzzer, each on one line, active high
pub struct Actuators<M, H, B> {
    motor: M,
    heater: H,
    buzzer: B,
}

impl<M, H, B> Actuators<M, H, B>
where
    M: OutputPin,
    H: OutputPin,
    B: OutputPin,
{
    pub fn new(motor: M, heater: H, buzzer: B) -> Self {
        Self {
            motor,
            heater,
            buzzer,
        }
    }

    pub fn release(self) -> (M, H, B) {
        (self.motor, self.heater, self.buzzer)
    }
}

fn drive<P: OutputPin>(pin: &mut P, on: bool) -> Result<(), Error> {
    if on {
        pin.set_high().map_err(|_| Error::Gpio)
    } else {
        pin.set_low().map_err(|_| Error::Gpio)
    }
}

impl<M, H, B> Outputs for Actuators<M, H, B>
where
    M: OutputPin,
    H: OutputPin,
    B: OutputPin,
{
    fn set_motor(&mut self, on: bool) -> Result<(), Error> {
        drive(&mut self.motor, on)
    }

    fn set_heater(&mut self, on: bool) -> Result<(), Error> {
        drive(&mut self.heater, on)
    }

    fn set_buzzer(&mut self, on: bool) -> Result<(), Error> {
        drive(&mut self.buzzer, on)
    }
}
