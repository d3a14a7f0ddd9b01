//! Simulated board for host tests.
//!
//! Every fake peripheral shares one [`Bench`]: delays advance simulated
//! time, buttons are pressed on a timeline, and the display lines feed a
//! model of the HD44780 that decodes the nibble stream and checks the
//! controller's timing.

use crate::application::{Application, Phase, Settings};
use crate::config::DEBOUNCE_TICKS;
use crate::drivers::{Actuators, ButtonHandler, Lcd, Thermometer};
use crate::logger::Logger;
use crate::os::Scheduler;
use core::convert::Infallible;
use embedded_hal::adc::{Channel, OneShot};
use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::{InputPin, OutputPin};
use std::cell::RefCell;
use std::rc::Rc;
use ufmt::uWrite;

pub type Shared = Rc<RefCell<Bench>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    Rs,
    En,
    D4,
    D5,
    D6,
    D7,
    Motor,
    Heater,
    Buzzer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Select,
    Up,
    Down,
}

pub struct Bench {
    pub now_us: u64,
    levels: [bool; 9],
    presses: Vec<(Button, u64, u64)>,
    pub button_reads: u32,
    pub adc_raw: u16,
    pub adc_reads: u32,
    pub adc_fails: bool,
    pub buzzer_pulses: u32,
    pub lcd: LcdModel,
    pub log: String,
}

pub type SimLcd = Lcd<SimOutput, SimOutput, SimOutput, SimOutput, SimOutput, SimOutput, SimDelay>;
pub type SimKeys = ButtonHandler<SimButton, SimButton, SimButton>;
pub type SimOutputs = Actuators<SimOutput, SimOutput, SimOutput>;
pub type SimThermometer = Thermometer<SimAdc, SimAdc, SimProbe>;
pub type SimApp = Application<SimLcd, SimKeys, SimOutputs, SimThermometer, SimDelay, SimLog>;

impl Bench {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> Shared {
        Rc::new(RefCell::new(Bench {
            now_us: 0,
            levels: [false; 9],
            presses: Vec::new(),
            button_reads: 0,
            adc_raw: 0,
            adc_reads: 0,
            adc_fails: false,
            buzzer_pulses: 0,
            lcd: LcdModel::new(),
            log: String::new(),
        }))
    }

    pub fn level(&self, line: Line) -> bool {
        self.levels[line as usize]
    }

    /// Hold `button` down from now for `hold_ms`
    pub fn press(&mut self, button: Button, hold_ms: u64) {
        let start = self.now_us;
        self.presses.push((button, start, start + hold_ms * 1000));
    }

    fn pressed(&self, button: Button) -> bool {
        let now = self.now_us;
        self.presses
            .iter()
            .any(|&(b, start, end)| b == button && start <= now && now < end)
    }

    fn drive(&mut self, line: Line, high: bool) {
        let was = self.levels[line as usize];
        self.levels[line as usize] = high;
        match line {
            Line::En if !was && high => self.lcd.enable_rise(self.now_us),
            Line::En if was && !high => {
                let nibble = (self.level(Line::D4) as u8)
                    | (self.level(Line::D5) as u8) << 1
                    | (self.level(Line::D6) as u8) << 2
                    | (self.level(Line::D7) as u8) << 3;
                let rs = self.level(Line::Rs);
                self.lcd.latch(self.now_us, rs, nibble);
            }
            Line::Buzzer if !was && high => self.buzzer_pulses += 1,
            _ => {}
        }
    }

    pub fn output(bench: &Shared, line: Line) -> SimOutput {
        SimOutput {
            bench: bench.clone(),
            line,
        }
    }

    pub fn button(bench: &Shared, button: Button) -> SimButton {
        SimButton {
            bench: bench.clone(),
            button,
        }
    }

    pub fn delay(bench: &Shared) -> SimDelay {
        SimDelay {
            bench: bench.clone(),
        }
    }

    pub fn lcd(bench: &Shared) -> SimLcd {
        Lcd::new(
            Bench::output(bench, Line::Rs),
            Bench::output(bench, Line::En),
            Bench::output(bench, Line::D4),
            Bench::output(bench, Line::D5),
            Bench::output(bench, Line::D6),
            Bench::output(bench, Line::D7),
            Bench::delay(bench),
        )
    }

    pub fn app(bench: &Shared) -> SimApp {
        let keys = ButtonHandler::new(
            Bench::button(bench, Button::Select),
            Bench::button(bench, Button::Up),
            Bench::button(bench, Button::Down),
        );
        let outputs = Actuators::new(
            Bench::output(bench, Line::Motor),
            Bench::output(bench, Line::Heater),
            Bench::output(bench, Line::Buzzer),
        );
        let thermometer = Thermometer::new(
            SimAdc {
                bench: bench.clone(),
            },
            SimProbe,
        );
        Application::new(
            Bench::lcd(bench),
            keys,
            outputs,
            thermometer,
            Bench::delay(bench),
            Logger::new(SimLog {
                bench: bench.clone(),
            }),
        )
    }
}

/// Controller model: display memory plus busy-time bookkeeping
pub struct LcdModel {
    four_bit: bool,
    init_pulses: u8,
    pending: Option<u8>,
    bytes: Vec<(bool, u8)>,
    ddram: [u8; 128],
    addr: u8,
    busy_until_us: u64,
    enable_rise_us: u64,
    violations: u32,
}

impl LcdModel {
    fn new() -> Self {
        Self {
            four_bit: false,
            init_pulses: 0,
            pending: None,
            bytes: Vec::new(),
            ddram: [b' '; 128],
            addr: 0,
            // Vcc rise time before the first instruction
            busy_until_us: 15_000,
            enable_rise_us: 0,
            violations: 0,
        }
    }

    fn enable_rise(&mut self, now: u64) {
        self.enable_rise_us = now;
    }

    fn latch(&mut self, now: u64, rs: bool, nibble: u8) {
        if now < self.busy_until_us || now - self.enable_rise_us < 1 {
            self.violations += 1;
        }

        if !self.four_bit {
            // 8-bit function set; D0..D3 are not wired
            self.busy_until_us = now
                + match self.init_pulses {
                    0 => 4_100,
                    1 => 100,
                    _ => 37,
                };
            self.init_pulses += 1;
            if nibble == 0x2 {
                self.four_bit = true;
            }
            return;
        }

        match self.pending.take() {
            None => self.pending = Some(nibble),
            Some(high) => {
                let byte = high << 4 | nibble;
                self.bytes.push((rs, byte));
                self.execute(now, rs, byte);
            }
        }
    }

    fn execute(&mut self, now: u64, rs: bool, byte: u8) {
        let mut busy = 37;
        if rs {
            self.ddram[self.addr as usize] = byte;
            self.addr = (self.addr + 1) & 0x7F;
        } else if byte == 0x01 {
            self.ddram = [b' '; 128];
            self.addr = 0;
            busy = 1_520;
        } else if byte & 0xFE == 0x02 {
            self.addr = 0;
            busy = 1_520;
        } else if byte & 0x80 != 0 {
            self.addr = byte & 0x7F;
        }
        self.busy_until_us = now + busy;
    }

    pub fn four_bit(&self) -> bool {
        self.four_bit
    }

    pub fn timing_violations(&self) -> u32 {
        self.violations
    }

    /// Every decoded transfer as (RS, byte)
    pub fn bytes(&self) -> &[(bool, u8)] {
        &self.bytes
    }

    pub fn commands(&self) -> Vec<u8> {
        self.bytes
            .iter()
            .filter(|(rs, _)| !rs)
            .map(|&(_, b)| b)
            .collect()
    }

    pub fn row(&self, row: u8) -> String {
        let base = if row == 0 { 0x00 } else { 0x40 };
        self.ddram[base..base + 16]
            .iter()
            .map(|&b| b as char)
            .collect()
    }
}

pub struct SimOutput {
    bench: Shared,
    line: Line,
}

impl OutputPin for SimOutput {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.bench.borrow_mut().drive(self.line, true);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.bench.borrow_mut().drive(self.line, false);
        Ok(())
    }
}

pub struct SimButton {
    bench: Shared,
    button: Button,
}

impl InputPin for SimButton {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        self.is_low().map(|low| !low)
    }

    // Active low: pressed pulls the line down
    fn is_low(&self) -> Result<bool, Infallible> {
        let mut bench = self.bench.borrow_mut();
        bench.button_reads += 1;
        Ok(bench.pressed(self.button))
    }
}

#[derive(Clone)]
pub struct SimDelay {
    bench: Shared,
}

impl DelayMs<u16> for SimDelay {
    fn delay_ms(&mut self, ms: u16) {
        self.bench.borrow_mut().now_us += ms as u64 * 1000;
    }
}

impl DelayUs<u16> for SimDelay {
    fn delay_us(&mut self, us: u16) {
        self.bench.borrow_mut().now_us += us as u64;
    }
}

pub struct SimAdc {
    bench: Shared,
}

pub struct SimProbe;

impl Channel<SimAdc> for SimProbe {
    type ID = u8;

    fn channel() -> u8 {
        0
    }
}

impl OneShot<SimAdc, u16, SimProbe> for SimAdc {
    type Error = ();

    fn read(&mut self, _pin: &mut SimProbe) -> nb::Result<u16, ()> {
        let mut bench = self.bench.borrow_mut();
        bench.adc_reads += 1;
        if bench.adc_fails {
            Err(nb::Error::Other(()))
        } else {
            Ok(bench.adc_raw)
        }
    }
}

/// Log sink appending to the bench
pub struct SimLog {
    bench: Shared,
}

impl uWrite for SimLog {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.bench.borrow_mut().log.push_str(s);
        Ok(())
    }
}

/// Standalone string sink
#[derive(Default)]
pub struct LogBuf(pub String);

impl uWrite for LogBuf {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.0.push_str(s);
        Ok(())
    }
}

/// A started application on a bench, driven tick by tick
pub struct Rig {
    pub bench: Shared,
    pub app: SimApp,
    scheduler: Scheduler<SimDelay>,
}

impl Rig {
    pub fn new(settings: Settings) -> Self {
        let bench = Bench::new();
        let mut app = Bench::app(&bench).with_settings(settings);
        app.start().unwrap();
        let scheduler = Scheduler::new(Bench::delay(&bench));
        Self {
            bench,
            app,
            scheduler,
        }
    }

    pub fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.scheduler.step(&mut self.app).unwrap();
        }
    }

    pub fn press(&mut self, button: Button, hold_ms: u64) {
        self.bench.borrow_mut().press(button, hold_ms);
    }

    /// Short press and release. Stops on the tick the phase changes.
    pub fn click(&mut self, button: Button) {
        if !self.app.phase().is_running() {
            // let any earlier debounce window run out
            self.run(DEBOUNCE_TICKS as u32 + 10);
        }
        let start = self.app.phase();
        self.press(button, 50);
        for _ in 0..600 {
            self.run(1);
            if self.app.phase() != start {
                return;
            }
        }
    }

    /// From the knead setup screen straight into kneading
    pub fn start_cycle(&mut self) {
        assert_eq!(self.app.phase(), Phase::ConfigKnead);
        self.click(Button::Select);
        self.click(Button::Select);
        self.click(Button::Select);
        assert_eq!(self.app.phase(), Phase::RunningKnead);
    }

    pub fn row(&self, row: u8) -> String {
        self.bench.borrow().lcd.row(row)
    }

    pub fn button_reads(&self) -> u32 {
        self.bench.borrow().button_reads
    }

    /// Display transfers emitted while running `f`
    pub fn capture<F: FnOnce(&mut SimApp)>(&mut self, f: F) -> Vec<(bool, u8)> {
        let start = self.bench.borrow().lcd.bytes().len();
        f(&mut self.app);
        self.bench.borrow().lcd.bytes()[start..].to_vec()
    }
}
