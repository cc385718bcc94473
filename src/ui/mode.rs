//! Top-level UI mode and the nested settings edit cycle.
//!
//! ```text
//!            A                         built-in
//!  Home ◄─────────► Normal ◄──────────────────────────┐
//!    │                │ built-in                      │
//!    │ B              │ B         Settings(X) → (Y) → (Z) → (Done)
//!    ▼                ▼             built-in advances each field
//!  Confirm{from_home} ── transmission finishes ──► Normal
//! ```
//!
//! The edit field only exists inside `Mode::Settings`, so an edit field
//! outside of settings cannot be represented.

use crate::ui::input::Button;

/// Coordinate field being edited in settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditField {
    X,
    Y,
    Z,
    /// All three fields visited; the next press leaves settings.
    Done,
}

impl EditField {
    /// The field after this one, or `None` when Done is left.
    pub fn next(self) -> Option<Self> {
        match self {
            EditField::X => Some(EditField::Y),
            EditField::Y => Some(EditField::Z),
            EditField::Z => Some(EditField::Done),
            EditField::Done => None,
        }
    }
}

/// UI mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Magnitude gauge; dial selects a value.
    #[default]
    Normal,
    /// Shows the stored home coordinates.
    Home,
    /// A command is being typed out. `from_home` selects the template.
    Confirm { from_home: bool },
    /// Editing home coordinates.
    Settings(EditField),
}

/// What a transition asks the surrounding controller to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Press ignored in this mode.
    None,
    /// Plain screen change (Normal ↔ Home, entering settings).
    ModeChanged,
    /// Moved to the next coordinate field.
    FieldAdvanced,
    /// Last coordinate field confirmed.
    EditDone,
    /// Left settings; coordinates keep their edited values.
    ExitSettings,
    /// Build and start sending a command.
    StartTeleport { from_home: bool },
}

impl Mode {
    /// Apply one debounced press.
    pub fn on_press(self, button: Button) -> (Mode, Action) {
        match (self, button) {
            // The transmission is modal until it finishes.
            (Mode::Confirm { .. }, _) => (self, Action::None),

            (Mode::Normal, Button::Home) => (Mode::Home, Action::ModeChanged),
            (Mode::Home, Button::Home) => (Mode::Normal, Action::ModeChanged),
            (Mode::Settings(_), Button::Home) => (self, Action::None),

            (Mode::Normal | Mode::Home, Button::Teleport) => {
                let from_home = self == Mode::Home;
                (Mode::Confirm { from_home }, Action::StartTeleport { from_home })
            }
            (Mode::Settings(_), Button::Teleport) => (self, Action::None),

            (Mode::Normal | Mode::Home, Button::Settings) => {
                (Mode::Settings(EditField::X), Action::ModeChanged)
            }
            (Mode::Settings(field), Button::Settings) => match field.next() {
                Some(EditField::Done) => (Mode::Settings(EditField::Done), Action::EditDone),
                Some(next) => (Mode::Settings(next), Action::FieldAdvanced),
                None => (Mode::Normal, Action::ExitSettings),
            },
        }
    }

    /// Field accepting dial input, if any.
    pub fn active_field(self) -> Option<EditField> {
        match self {
            Mode::Settings(EditField::Done) => None,
            Mode::Settings(field) => Some(field),
            _ => None,
        }
    }
}

/// Home coordinates. Unbounded; may go negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coordinates {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Add dial steps to `field`. `Done` takes no input.
    pub fn nudge(&mut self, field: EditField, steps: i32) {
        let slot = match field {
            EditField::X => &mut self.x,
            EditField::Y => &mut self.y,
            EditField::Z => &mut self.z,
            EditField::Done => return,
        };
        *slot = slot.wrapping_add(steps);
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        let (x, y, z) = crate::config::DEFAULT_HOME;
        Self::new(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_button_toggles_home() {
        let (m, a) = Mode::Normal.on_press(Button::Home);
        assert_eq!(m, Mode::Home);
        assert_eq!(a, Action::ModeChanged);
        let (m, _) = m.on_press(Button::Home);
        assert_eq!(m, Mode::Normal);
    }

    #[test]
    fn teleport_snapshots_origin() {
        let (m, a) = Mode::Home.on_press(Button::Teleport);
        assert_eq!(m, Mode::Confirm { from_home: true });
        assert_eq!(a, Action::StartTeleport { from_home: true });

        let (m, a) = Mode::Normal.on_press(Button::Teleport);
        assert_eq!(m, Mode::Confirm { from_home: false });
        assert_eq!(a, Action::StartTeleport { from_home: false });
    }

    #[test]
    fn confirm_ignores_every_button() {
        let confirm = Mode::Confirm { from_home: false };
        for b in [Button::Home, Button::Teleport, Button::Settings] {
            assert_eq!(confirm.on_press(b), (confirm, Action::None));
        }
    }

    #[test]
    fn settings_cycle_visits_every_field() {
        let (m, a) = Mode::Normal.on_press(Button::Settings);
        assert_eq!((m, a), (Mode::Settings(EditField::X), Action::ModeChanged));
        let (m, a) = m.on_press(Button::Settings);
        assert_eq!((m, a), (Mode::Settings(EditField::Y), Action::FieldAdvanced));
        let (m, a) = m.on_press(Button::Settings);
        assert_eq!((m, a), (Mode::Settings(EditField::Z), Action::FieldAdvanced));
        let (m, a) = m.on_press(Button::Settings);
        assert_eq!((m, a), (Mode::Settings(EditField::Done), Action::EditDone));
        let (m, a) = m.on_press(Button::Settings);
        assert_eq!((m, a), (Mode::Normal, Action::ExitSettings));
    }

    #[test]
    fn settings_reachable_from_home() {
        let (m, _) = Mode::Home.on_press(Button::Settings);
        assert_eq!(m, Mode::Settings(EditField::X));
    }

    #[test]
    fn settings_ignores_home_and_teleport() {
        let s = Mode::Settings(EditField::Y);
        assert_eq!(s.on_press(Button::Home), (s, Action::None));
        assert_eq!(s.on_press(Button::Teleport), (s, Action::None));
    }

    #[test]
    fn only_editing_fields_take_dial_input() {
        assert_eq!(Mode::Settings(EditField::Z).active_field(), Some(EditField::Z));
        assert_eq!(Mode::Settings(EditField::Done).active_field(), None);
        assert_eq!(Mode::Normal.active_field(), None);
        assert_eq!(Mode::Home.active_field(), None);
    }

    #[test]
    fn nudge_touches_one_axis() {
        let mut c = Coordinates::new(1, 2, 3);
        c.nudge(EditField::Y, -10);
        assert_eq!(c, Coordinates::new(1, -8, 3));
        c.nudge(EditField::Done, 99);
        assert_eq!(c, Coordinates::new(1, -8, 3));
    }

    #[test]
    fn default_home_is_spawn_height() {
        assert_eq!(Coordinates::default(), Coordinates::new(0, 80, 0));
    }
}
