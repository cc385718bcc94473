//! Button sampling with time-window debouncing.
//!
//! Buttons are sampled (not interrupt driven) once per main-loop tick,
//! so the source does not need to debounce anything. A press fires on
//! the released → pressed transition, and only if the previous accepted
//! press of the same button is more than the debounce window ago.

use crate::config::BUTTON_DEBOUNCE_MS;

/// Physical buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Button A - toggles the HOME screen.
    Home,
    /// Button B - teleport (sends the command).
    Teleport,
    /// Built-in dial button - settings / edit-field advance.
    Settings,
}

/// Instantaneous pressed levels, already converted from active-low.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonLevels {
    pub home: bool,
    pub teleport: bool,
    pub settings: bool,
}

/// Debounced edge detector for one button.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    window_ms: u64,
    was_pressed: bool,
    last_accepted_ms: Option<u64>,
}

impl Debouncer {
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            was_pressed: false,
            last_accepted_ms: None,
        }
    }

    /// Feed one level sample; returns `true` for an accepted press.
    pub fn sample(&mut self, pressed: bool, now_ms: u64) -> bool {
        let rising = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        if !rising {
            return false;
        }

        if let Some(last) = self.last_accepted_ms {
            if now_ms.saturating_sub(last) <= self.window_ms {
                return false;
            }
        }
        self.last_accepted_ms = Some(now_ms);
        true
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(BUTTON_DEBOUNCE_MS)
    }
}

/// Accepted presses from one sampling pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Presses {
    pub home: bool,
    pub teleport: bool,
    pub settings: bool,
}

impl Presses {
    /// Presses in processing order: Home, Teleport, Settings.
    pub fn iter(self) -> impl Iterator<Item = Button> {
        [
            (self.home, Button::Home),
            (self.teleport, Button::Teleport),
            (self.settings, Button::Settings),
        ]
        .into_iter()
        .filter_map(|(hit, button)| hit.then_some(button))
    }
}

/// The three buttons, each with its own debounce state.
#[derive(Clone, Copy, Debug, Default)]
pub struct ButtonPanel {
    home: Debouncer,
    teleport: Debouncer,
    settings: Debouncer,
}

impl ButtonPanel {
    pub fn sample(&mut self, levels: ButtonLevels, now_ms: u64) -> Presses {
        Presses {
            home: self.home.sample(levels.home, now_ms),
            teleport: self.teleport.sample(levels.teleport, now_ms),
            settings: self.settings.sample(levels.settings, now_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_press() {
        let mut d = Debouncer::new(50);
        assert!(d.sample(true, 100));
        // Held down: no repeat.
        assert!(!d.sample(true, 200));
        assert!(!d.sample(true, 300));
        assert!(!d.sample(false, 310));
    }

    #[test]
    fn first_press_after_boot_is_accepted() {
        let mut d = Debouncer::new(50);
        assert!(d.sample(true, 0));
    }

    #[test]
    fn bounce_inside_window_is_ignored() {
        let mut d = Debouncer::new(50);
        assert!(d.sample(true, 1000));
        assert!(!d.sample(false, 1005));
        assert!(!d.sample(true, 1010));
        assert!(!d.sample(false, 1030));
        assert!(!d.sample(true, 1050));
    }

    #[test]
    fn presses_further_apart_than_window_both_fire() {
        let mut d = Debouncer::new(50);
        assert!(d.sample(true, 1000));
        assert!(!d.sample(false, 1020));
        assert!(d.sample(true, 1051));
    }

    #[test]
    fn rejected_edge_does_not_move_the_window() {
        let mut d = Debouncer::new(50);
        assert!(d.sample(true, 0));
        d.sample(false, 10);
        assert!(!d.sample(true, 40));
        d.sample(false, 45);
        // 60 ms after the accepted press, 20 ms after the rejected one.
        assert!(d.sample(true, 60));
    }

    #[test]
    fn panel_buttons_are_independent() {
        let mut panel = ButtonPanel::default();
        let p = panel.sample(
            ButtonLevels {
                home: true,
                teleport: false,
                settings: true,
            },
            500,
        );
        assert_eq!(
            p,
            Presses {
                home: true,
                teleport: false,
                settings: true
            }
        );

        let p = panel.sample(
            ButtonLevels {
                home: false,
                teleport: true,
                settings: false,
            },
            510,
        );
        assert!(p.teleport);
        assert!(!p.home && !p.settings);
    }

    #[test]
    fn presses_iterate_in_processing_order() {
        let p = Presses {
            home: true,
            teleport: true,
            settings: true,
        };
        let mut it = p.iter();
        assert_eq!(it.next(), Some(Button::Home));
        assert_eq!(it.next(), Some(Button::Teleport));
        assert_eq!(it.next(), Some(Button::Settings));
        assert_eq!(it.next(), None);
    }
}
