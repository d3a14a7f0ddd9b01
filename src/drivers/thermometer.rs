//! Oven temperature probe on a single ADC channel.

use crate::config::{
    CELSIUS_AT_RAW_MAX, CELSIUS_AT_RAW_MIN, SENSOR_RAW_MAX, SENSOR_RAW_MIN, TEMP_CEIL_C,
    TEMP_FLOOR_C,
};
use crate::error::Error;
use core::marker::PhantomData;
use embedded_hal::adc::{Channel, OneShot};

pub trait TemperatureSensor {
    /// Take one reading, in whole degrees Celsius
    fn sample(&mut self) -> Result<u8, Error>;
}

/// Linear map from the probe's raw reading to Celsius, clamped.
///
/// Integer division truncates toward zero, matching the calibration the
/// constants were tuned against.
pub fn to_celsius(raw: u16) -> u8 {
    let raw = raw as i32;
    let celsius = (raw - SENSOR_RAW_MIN) * (CELSIUS_AT_RAW_MAX - CELSIUS_AT_RAW_MIN)
        / (SENSOR_RAW_MAX - SENSOR_RAW_MIN)
        + CELSIUS_AT_RAW_MIN;
    celsius.clamp(TEMP_FLOOR_C, TEMP_CEIL_C) as u8
}

/// Probe on one channel of an ADC.
///
/// `ADC` is the converter's marker type, which need not be the handle `A`.
pub struct Thermometer<A, ADC, P> {
    adc: A,
    probe: P,
    last_raw: u16,
    _adc: PhantomData<ADC>,
}

impl<A, ADC, P> Thermometer<A, ADC, P>
where
    A: OneShot<ADC, u16, P>,
    P: Channel<ADC>,
{
    pub fn new(adc: A, probe: P) -> Self {
        Self {
            adc,
            probe,
            last_raw: 0,
            _adc: PhantomData,
        }
    }

    /// Blocking conversion
    pub fn read_raw(&mut self) -> Result<u16, Error> {
        let raw = nb::block!(self.adc.read(&mut self.probe)).map_err(|_| Error::Adc)?;
        self.last_raw = raw;
        Ok(raw)
    }

    pub fn last_raw(&self) -> u16 {
        self.last_raw
    }

    pub fn release(self) -> (A, P) {
        (self.adc, self.probe)
    }
}

impl<A, ADC, P> TemperatureSensor for Thermometer<A, ADC, P>
where
    A: OneShot<ADC, u16, P>,
    P: Channel<ADC>,
{
    fn sample(&mut self) -> Result<u8, Error> {
        self.read_raw().map(to_celsius)
    }
}
