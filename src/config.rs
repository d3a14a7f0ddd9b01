//! Configuration constants for the bread maker firmware

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate (double speed mode)
pub const UART_BAUD: u32 = 57_600;

/// Scheduler quantum in milliseconds
pub const TICK_MS: u16 = 1;

/// Scheduler ticks in one second of run time
pub const TICKS_PER_SECOND: u16 = 1000;

/// Debounce countdown loaded after every reported press (~500ms)
pub const DEBOUNCE_TICKS: u16 = 500;

/// Poll interval while waiting for the select button to be released
pub const RELEASE_POLL_MS: u16 = 10;

/// Ticks between temperature samples while baking (~500ms)
pub const TEMP_SAMPLE_TICKS: u16 = 500;

/// Temperature shown before the first sample of a bake
pub const INITIAL_TEMPERATURE_C: u8 = 25;

/// Raw ADC reading mapped to [`CELSIUS_AT_RAW_MIN`]
pub const SENSOR_RAW_MIN: i32 = 150;
/// Raw ADC reading mapped to [`CELSIUS_AT_RAW_MAX`]
pub const SENSOR_RAW_MAX: i32 = 600;
pub const CELSIUS_AT_RAW_MIN: i32 = 29;
pub const CELSIUS_AT_RAW_MAX: i32 = 120;

/// Reported temperatures are clamped to this range
pub const TEMP_FLOOR_C: i32 = 0;
pub const TEMP_CEIL_C: i32 = 150;

/// End-of-cycle buzzer pattern
pub const BUZZER_PULSES: u16 = 100;
pub const BUZZER_HALF_PERIOD_MS: u16 = 1;

/// How long the boot splash stays on screen
pub const SPLASH_MS: u16 = 1500;

/// Character display width
pub const LCD_COLUMNS: u8 = 16;

/// Editable range and power-on default of a phase duration, in minutes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min: u8,
    pub max: u8,
    pub default: u8,
}

impl Bounds {
    pub fn clamp(&self, minutes: u8) -> u8 {
        minutes.clamp(self.min, self.max)
    }
}

pub const KNEAD_MINUTES: Bounds = Bounds { min: 1, max: 99, default: 25 };
pub const RISE_MINUTES: Bounds = Bounds { min: 1, max: 180, default: 90 };
pub const BAKE_MINUTES: Bounds = Bounds { min: 1, max: 99, default: 40 };
