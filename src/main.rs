#![no_std]
#![no_main]

use panic_halt as _;

use avr_device::atmega328p::Peripherals;
use breadmaker_firmware::config::UART_BAUD;
use breadmaker_firmware::drivers::{Actuators, ButtonHandler, Lcd, Thermometer};
use breadmaker_firmware::hal::{board::Pins, Adc, Delay, Uart};
use breadmaker_firmware::{Application, Logger, Scheduler, Task};

#[avr_device::entry]
fn main() -> ! {
    // Only reached once after reset, so the peripherals are still available
    let dp = match Peripherals::take() {
        Some(dp) => dp,
        None => loop {},
    };

    let delay = Delay::new(dp.TC0);
    let serial = Uart::new(dp.USART0, UART_BAUD);
    let mut adc = Adc::new(dp.ADC);
    let pins = Pins::new(dp.PORTB, dp.PORTC, dp.PORTD);

    let lcd = Lcd::new(
        pins.lcd_rs.into_output(),
        pins.lcd_en.into_output(),
        pins.lcd_d4.into_output(),
        pins.lcd_d5.into_output(),
        pins.lcd_d6.into_output(),
        pins.lcd_d7.into_output(),
        delay,
    );
    let buttons = ButtonHandler::new(
        pins.select.into_pull_up_input(),
        pins.up.into_pull_up_input(),
        pins.down.into_pull_up_input(),
    );
    let outputs = Actuators::new(
        pins.motor.into_output(),
        pins.heater.into_output(),
        pins.buzzer.into_output(),
    );
    let probe = pins.temp_probe.into_analog_input(&mut adc);
    let thermometer = Thermometer::new(adc, probe);

    let mut app = Application::new(
        lcd,
        buttons,
        outputs,
        thermometer,
        delay,
        Logger::new(serial),
    );

    if let Err(e) = app.start() {
        app.on_fault(e);
    }

    Scheduler::new(delay).run(&mut app)
}
