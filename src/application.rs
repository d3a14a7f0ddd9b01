//! Application layer: the bread maker's phase state machine.
//!
//! Three setup screens edit the knead/rise/bake durations, then the three
//! timed phases run back to back driving the motor and heater, and the
//! cycle ends on a buzzer alarm waiting for Select.

use crate::config::{
    Bounds, BAKE_MINUTES, BUZZER_HALF_PERIOD_MS, BUZZER_PULSES, INITIAL_TEMPERATURE_C,
    KNEAD_MINUTES, RELEASE_POLL_MS, RISE_MINUTES, SPLASH_MS,
};
use crate::drivers::{ButtonEvent, CharDisplay, Debouncer, Keypad, Outputs, TemperatureSensor};
use crate::error::Error;
use crate::log;
use crate::logger::{LogType, Logger};
use crate::os::{Task, TickClock};
use crate::ui;
use embedded_hal::blocking::delay::DelayMs;
use ufmt::derive::uDebug;
use ufmt::uWrite;

#[derive(Clone, Copy, Debug, uDebug, PartialEq, Eq)]
pub enum Phase {
    ConfigKnead,
    ConfigRise,
    ConfigBake,
    RunningKnead,
    RunningRise,
    RunningBake,
    Done,
}

impl Phase {
    pub fn is_config(self) -> bool {
        matches!(self, Phase::ConfigKnead | Phase::ConfigRise | Phase::ConfigBake)
    }

    pub fn is_running(self) -> bool {
        matches!(
            self,
            Phase::RunningKnead | Phase::RunningRise | Phase::RunningBake
        )
    }

    /// Successor in the cycle; `Done` wraps back to the first setup screen
    pub fn next(self) -> Phase {
        match self {
            Phase::ConfigKnead => Phase::ConfigRise,
            Phase::ConfigRise => Phase::ConfigBake,
            Phase::ConfigBake => Phase::RunningKnead,
            Phase::RunningKnead => Phase::RunningRise,
            Phase::RunningRise => Phase::RunningBake,
            Phase::RunningBake => Phase::Done,
            Phase::Done => Phase::ConfigKnead,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Phase::ConfigKnead | Phase::RunningKnead => "KNEAD",
            Phase::ConfigRise | Phase::RunningRise => "RISE",
            Phase::ConfigBake | Phase::RunningBake => "BAKE",
            Phase::Done => "DONE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

/// Phase durations in minutes. Volatile: lost on power down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub knead: u8,
    pub rise: u8,
    pub bake: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            knead: KNEAD_MINUTES.default,
            rise: RISE_MINUTES.default,
            bake: BAKE_MINUTES.default,
        }
    }
}

impl Settings {
    /// Duration belonging to a setup or running phase, 0 for `Done`
    pub fn minutes(&self, phase: Phase) -> u8 {
        match phase {
            Phase::ConfigKnead | Phase::RunningKnead => self.knead,
            Phase::ConfigRise | Phase::RunningRise => self.rise,
            Phase::ConfigBake | Phase::RunningBake => self.bake,
            Phase::Done => 0,
        }
    }

    /// Each duration pulled into its editable range
    pub fn clamped(self) -> Self {
        Self {
            knead: KNEAD_MINUTES.clamp(self.knead),
            rise: RISE_MINUTES.clamp(self.rise),
            bake: BAKE_MINUTES.clamp(self.bake),
        }
    }

    /// Nudge the duration edited on `phase`'s setup screen by one minute.
    /// Returns false when already at the bound or not on a setup screen.
    pub fn adjust(&mut self, phase: Phase, step: Step) -> bool {
        let (value, bounds): (&mut u8, Bounds) = match phase {
            Phase::ConfigKnead => (&mut self.knead, KNEAD_MINUTES),
            Phase::ConfigRise => (&mut self.rise, RISE_MINUTES),
            Phase::ConfigBake => (&mut self.bake, BAKE_MINUTES),
            _ => return false,
        };
        match step {
            Step::Up if *value < bounds.max => *value += 1,
            Step::Down if *value > bounds.min => *value -= 1,
            _ => return false,
        }
        true
    }
}

/// Main application state and logic
pub struct Application<DISP, KEYS, OUT, TEMP, D, W> {
    display: DISP,
    keys: KEYS,
    outputs: OUT,
    sensor: TEMP,
    delay: D,
    log: Logger<W>,
    debouncer: Debouncer,
    clock: TickClock,
    phase: Phase,
    settings: Settings,
    last_second: u32,
    remaining: u32,
    temperature: u8,
}

impl<DISP, KEYS, OUT, TEMP, D, W> Application<DISP, KEYS, OUT, TEMP, D, W>
where
    DISP: CharDisplay,
    KEYS: Keypad,
    OUT: Outputs,
    TEMP: TemperatureSensor,
    D: DelayMs<u16>,
    W: uWrite,
{
    pub fn new(
        display: DISP,
        keys: KEYS,
        outputs: OUT,
        sensor: TEMP,
        delay: D,
        log: Logger<W>,
    ) -> Self {
        Self {
            display,
            keys,
            outputs,
            sensor,
            delay,
            log,
            debouncer: Debouncer::new(),
            clock: TickClock::new(),
            phase: Phase::ConfigKnead,
            settings: Settings::default(),
            last_second: 0,
            remaining: 0,
            temperature: INITIAL_TEMPERATURE_C,
        }
    }

    /// Start from `settings` instead of the defaults, clamped to the bounds
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings.clamped();
        self
    }

    /// Power-up: everything off, display brought up, first setup screen shown
    pub fn start(&mut self) -> Result<(), Error> {
        self.outputs.all_off()?;
        self.display.init()?;
        ui::splash(&mut self.display)?;
        self.delay.delay_ms(SPLASH_MS);
        self.display.clear()?;

        let (knead, rise, bake) = (self.settings.knead, self.settings.rise, self.settings.bake);
        log!(self.log, LogType::System, "boot knead={} rise={} bake={}", knead, rise, bake);
        self.refresh_display()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining
    }

    pub fn temperature(&self) -> u8 {
        self.temperature
    }

    /// One scheduler quantum
    pub fn tick(&mut self, now_ms: u32) -> Result<(), Error> {
        self.log.stamp(now_ms);
        self.debouncer.tick();

        if self.clock.advance(self.phase) {
            // A failed conversion keeps the last reading until the next cadence
            match self.sensor.sample() {
                Ok(celsius) => {
                    self.temperature = celsius;
                    log!(self.log, LogType::Sensor, "temp {}C", celsius);
                }
                Err(e) => self.on_fault(e),
            }
        }

        // Running phases never look at the buttons
        let event = if self.phase.is_running() {
            None
        } else {
            let keys = self.keys.read()?;
            self.debouncer.poll(keys)
        };

        self.handle(event)
    }

    /// Redraw the current phase's screen from state
    pub fn refresh_display(&mut self) -> Result<(), Error> {
        match self.phase {
            Phase::ConfigKnead | Phase::ConfigRise | Phase::ConfigBake => {
                let minutes = self.settings.minutes(self.phase);
                ui::config(&mut self.display, self.phase.title(), minutes)
            }
            Phase::RunningKnead | Phase::RunningRise | Phase::RunningBake => {
                ui::header(&mut self.display, self.phase.title(), self.remaining)?;
                if self.phase == Phase::RunningBake {
                    ui::temperature(&mut self.display, self.temperature)
                } else {
                    ui::blank_line(&mut self.display, 1)
                }
            }
            Phase::Done => ui::done(&mut self.display),
        }
    }

    fn handle(&mut self, event: Option<ButtonEvent>) -> Result<(), Error> {
        match (self.phase, event) {
            (phase, _) if phase.is_running() => self.manage_phase(),
            (phase, Some(ButtonEvent::Up)) if phase.is_config() => self.edit(Step::Up),
            (phase, Some(ButtonEvent::Down)) if phase.is_config() => self.edit(Step::Down),
            (phase, Some(ButtonEvent::Select)) if phase.is_config() => self.confirm(),
            (Phase::Done, Some(ButtonEvent::Select)) => self.restart(),
            _ => Ok(()),
        }
    }

    fn edit(&mut self, step: Step) -> Result<(), Error> {
        if !self.settings.adjust(self.phase, step) {
            return Ok(());
        }
        let (title, minutes) = (self.phase.title(), self.settings.minutes(self.phase));
        log!(self.log, LogType::Debug, "{} = {} min", title, minutes);
        self.refresh_display()
    }

    /// Select on a setup screen. Holds everything until the button is let
    /// go so one long press cannot skip through several screens.
    fn confirm(&mut self) -> Result<(), Error> {
        while self.keys.select_held()? {
            self.delay.delay_ms(RELEASE_POLL_MS);
        }

        if self.phase == Phase::ConfigBake {
            self.outputs.set_motor(true)?;
        }
        self.enter(self.phase.next())?;
        self.debouncer.reset();
        Ok(())
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.remaining = 0;
        self.clock.restart();
        self.enter(Phase::ConfigKnead)
    }

    fn enter(&mut self, next: Phase) -> Result<(), Error> {
        self.phase = next;
        if next.is_running() {
            self.clock.restart();
            self.last_second = 0;
            self.remaining = self.settings.minutes(next) as u32 * 60;
        }
        log!(self.log, LogType::System, "phase {:?}", next);

        self.display.clear()?;
        self.refresh_display()
    }

    /// Runs once per distinct elapsed second of a running phase
    fn manage_phase(&mut self) -> Result<(), Error> {
        let now = self.clock.seconds();
        if now == self.last_second {
            return Ok(());
        }
        self.last_second = now;

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return self.refresh_display();
        }

        match self.phase {
            Phase::RunningKnead => {
                self.outputs.set_motor(false)?;
                self.enter(Phase::RunningRise)
            }
            Phase::RunningRise => {
                self.outputs.set_heater(true)?;
                self.enter(Phase::RunningBake)
            }
            Phase::RunningBake => {
                self.outputs.set_heater(false)?;
                self.enter(Phase::Done)?;
                self.sound_alarm()
            }
            _ => Ok(()),
        }
    }

    /// Blocking finale, nothing else runs meanwhile
    fn sound_alarm(&mut self) -> Result<(), Error> {
        for _ in 0..BUZZER_PULSES {
            self.outputs.set_buzzer(true)?;
            self.delay.delay_ms(BUZZER_HALF_PERIOD_MS);
            self.outputs.set_buzzer(false)?;
            self.delay.delay_ms(BUZZER_HALF_PERIOD_MS);
        }
        Ok(())
    }
}

impl<DISP, KEYS, OUT, TEMP, D, W> Task for Application<DISP, KEYS, OUT, TEMP, D, W>
where
    DISP: CharDisplay,
    KEYS: Keypad,
    OUT: Outputs,
    TEMP: TemperatureSensor,
    D: DelayMs<u16>,
    W: uWrite,
{
    fn tick(&mut self, now_ms: u32) -> Result<(), Error> {
        Application::tick(self, now_ms)
    }

    fn on_fault(&mut self, error: Error) {
        log!(self.log, LogType::Error, "fault {:?}", error);
    }
}
