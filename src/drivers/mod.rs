pub mod actuators;
pub mod button_handler;
pub mod lcd;
pub mod thermometer;

pub use actuators::{Actuators, Outputs};
pub use button_handler::{ButtonEvent, ButtonHandler, Debouncer, Keypad, Keys};
pub use lcd::{CharDisplay, Lcd};
pub use thermometer::{TemperatureSensor, Thermometer};
