//! GPIO button inputs.
//!
//! Three physical buttons (active-low with internal pull-up):
//!   - A (HOME)         - toggle the home screen
//!   - B (TELEPORT)     - type the teleport command
//!   - Built-in (SET)   - settings / next coordinate field
//!
//! The pins are only sampled here; debouncing happens in
//! `tpdial::ui::input` on the main loop.

use embassy_nrf::gpio::{AnyPin, Input, Pull};
use tpdial::ui::ButtonLevels;

pub struct ButtonPins {
    home: Input<'static>,
    teleport: Input<'static>,
    settings: Input<'static>,
}

impl ButtonPins {
    pub fn new(home: AnyPin, teleport: AnyPin, settings: AnyPin) -> Self {
        Self {
            home: Input::new(home, Pull::Up),
            teleport: Input::new(teleport, Pull::Up),
            settings: Input::new(settings, Pull::Up),
        }
    }

    /// Instantaneous levels, `true` = pressed.
    pub fn sample(&self) -> ButtonLevels {
        ButtonLevels {
            home: self.home.is_low(),
            teleport: self.teleport.is_low(),
            settings: self.settings.is_low(),
        }
    }
}
