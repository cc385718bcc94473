//! The main-loop state machine.
//!
//! One [`Controller::tick`] per loop iteration:
//!
//! 1. sample the buttons and apply accepted presses to the [`Mode`],
//! 2. advance the [`Transmitter`] by at most one character,
//! 3. route the drained dial delta to whichever consumer the mode selects,
//! 4. hand back a [`Frame`] when a redraw is due.
//!
//! All state here is owned by the main loop. The only cross-context data
//! is the dial delta, which the caller drains from
//! [`EncoderDelta`](crate::encoder::EncoderDelta) before each tick.

use crate::config::{DONE_HOLD_MS, ENCODER_COUNTS_PER_NOTCH, REDRAW_INTERVAL_MS};
use crate::encoder::NotchAccumulator;
use crate::feedback::{Cue, FeedbackSink};
use crate::magnitude::{MagnitudeSelector, Shift};
use crate::transmit::{Command, KeystrokeSink, Transmitter, TxEvent};
use crate::ui::frame::{Frame, Gauge};
use crate::ui::input::{Button, ButtonLevels, ButtonPanel};
use crate::ui::mode::{Action, Coordinates, Mode};

/// Inputs gathered by the caller for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInput {
    pub now_ms: u64,
    pub buttons: ButtonLevels,
    /// Raw counts drained since the previous tick.
    pub encoder_delta: i32,
}

pub struct Controller {
    mode: Mode,
    panel: ButtonPanel,
    notches: NotchAccumulator,
    magnitude: MagnitudeSelector,
    coords: Coordinates,
    tx: Transmitter,
    last_draw_ms: Option<u64>,
    // Latched until the next gauge frame.
    pending_shift: Option<Shift>,
    pending_ceiling: bool,
    // Completion time of the last transmission while its Done screen holds.
    done_at: Option<u64>,
}

impl Controller {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            panel: ButtonPanel::default(),
            notches: NotchAccumulator::new(ENCODER_COUNTS_PER_NOTCH),
            magnitude: MagnitudeSelector::new(),
            coords: Coordinates::default(),
            tx: Transmitter::new(),
            last_draw_ms: None,
            pending_shift: None,
            pending_ceiling: false,
            done_at: None,
        }
    }

    pub fn with_counts_per_notch(mut self, counts_per_notch: f32) -> Self {
        self.notches = NotchAccumulator::new(counts_per_notch);
        self
    }

    pub fn with_coordinates(mut self, coords: Coordinates) -> Self {
        self.coords = coords;
        self
    }

    pub fn with_magnitude_index(mut self, index: usize) -> Self {
        self.magnitude = MagnitudeSelector::at_index(index);
        self
    }

    pub fn tick<K, F>(&mut self, input: TickInput, keys: &mut K, feedback: &mut F) -> Option<Frame>
    where
        K: KeystrokeSink,
        F: FeedbackSink,
    {
        let now = input.now_ms;

        // Presses landing in the same tick are judged against the mode the
        // tick started in, so HOME + TELEPORT together teleports forward.
        let start = self.mode;
        for button in self.panel.sample(input.buttons, now).iter() {
            self.press(button, start, now, feedback);
        }

        if let Some(event) = self.tx.poll(now, keys) {
            self.on_tx_event(event, now, feedback);
        }

        self.route_dial(input.encoder_delta, feedback);

        let due = match self.last_draw_ms {
            Some(last) => now.wrapping_sub(last) > REDRAW_INTERVAL_MS,
            None => true,
        };
        if !due {
            return None;
        }
        self.last_draw_ms = Some(now);
        Some(self.frame(now, feedback))
    }

    fn press<F: FeedbackSink>(&mut self, button: Button, start: Mode, now: u64, feedback: &mut F) {
        let before = self.mode;
        let (mut after, action) = before.on_press(button);

        match action {
            Action::None => return,
            Action::ModeChanged => feedback.cue(Cue::ModeChange),
            Action::FieldAdvanced => feedback.cue(Cue::FieldAdvance),
            Action::EditDone => feedback.cue(Cue::EditDone),
            Action::ExitSettings => {
                // Stray partial notches from editing must not leak into
                // the magnitude.
                self.notches.resync();
                feedback.cue(Cue::ModeChange);
            }
            Action::StartTeleport { .. } => {
                let from_home = start == Mode::Home;
                after = Mode::Confirm { from_home };
                let command = if from_home {
                    Command::Home(self.coords)
                } else {
                    Command::Forward(self.magnitude.value())
                };
                if !self.tx.arm(command, now) {
                    return;
                }
                #[cfg(feature = "defmt")]
                defmt::info!("Teleport armed: {}", self.tx.pending());
            }
        }

        #[cfg(feature = "defmt")]
        defmt::info!("Mode: {} -> {}", before, after);
        self.mode = after;
        self.pending_shift = None;
        self.pending_ceiling = false;
        self.done_at = None;
    }

    fn on_tx_event<F: FeedbackSink>(&mut self, event: TxEvent, now: u64, feedback: &mut F) {
        match event {
            TxEvent::SlashSent => feedback.cue(Cue::TeleportStart),
            TxEvent::Sent(_) => {}
            TxEvent::Completed => {
                #[cfg(feature = "defmt")]
                defmt::info!("Teleport sent");
                feedback.cue(Cue::TeleportDone);
                self.mode = Mode::Normal;
                self.done_at = Some(now);
            }
        }
    }

    fn route_dial<F: FeedbackSink>(&mut self, delta: i32, feedback: &mut F) {
        match self.mode {
            Mode::Normal => {
                let steps = self.notches.apply(delta);
                let update = self.magnitude.update(steps);
                if steps != 0 {
                    feedback.cue(Cue::Step);
                }
                if let Some(shift) = update.shift {
                    feedback.cue(Cue::LevelChanged);
                    self.pending_shift = Some(shift);
                }
                if update.at_ceiling_ascending {
                    feedback.cue(Cue::Ceiling);
                    self.pending_ceiling = true;
                }
            }
            mode => {
                if let Some(field) = mode.active_field() {
                    let steps = self.notches.apply(delta);
                    self.coords.nudge(field, steps);
                }
                // Anything else drops the motion.
            }
        }
    }

    fn frame<F: FeedbackSink>(&mut self, now: u64, feedback: &mut F) -> Frame {
        if let Some(at) = self.done_at {
            if now.wrapping_sub(at) <= DONE_HOLD_MS {
                return Frame::Done;
            }
            self.done_at = None;
        }

        match self.mode {
            Mode::Normal => {
                let mut gauge = Gauge::new(self.magnitude.value());
                gauge.shift = self.pending_shift.take();
                gauge.ceiling = core::mem::take(&mut self.pending_ceiling);
                if gauge.ceiling && gauge.shift.is_none() {
                    feedback.cue(Cue::MaxJitter);
                }
                Frame::Gauge(gauge)
            }
            Mode::Home => Frame::Home(self.coords),
            Mode::Confirm { from_home } => Frame::Teleport {
                from_home,
                phase: self.tx.phase(),
            },
            Mode::Settings(field) => Frame::Settings {
                coords: self.coords,
                field,
            },
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coords
    }

    pub fn magnitude(&self) -> &MagnitudeSelector {
        &self.magnitude
    }

    pub fn transmitter(&self) -> &Transmitter {
        &self.tx
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Typed(heapless::Vec<u8, 64>);

    impl KeystrokeSink for Typed {
        fn send(&mut self, byte: u8) {
            let _ = self.0.push(byte);
        }
    }

    #[derive(Default)]
    struct Heard(heapless::Vec<Cue, 64>);

    impl FeedbackSink for Heard {
        fn cue(&mut self, cue: Cue) {
            let _ = self.0.push(cue);
        }
    }

    fn idle(now_ms: u64) -> TickInput {
        TickInput {
            now_ms,
            ..Default::default()
        }
    }

    fn dial(now_ms: u64, encoder_delta: i32) -> TickInput {
        TickInput {
            now_ms,
            encoder_delta,
            ..Default::default()
        }
    }

    fn pressing(now_ms: u64, button: Button) -> TickInput {
        let mut buttons = ButtonLevels::default();
        match button {
            Button::Home => buttons.home = true,
            Button::Teleport => buttons.teleport = true,
            Button::Settings => buttons.settings = true,
        }
        TickInput {
            now_ms,
            buttons,
            encoder_delta: 0,
        }
    }

    /// Press and release `button`, starting at `at`; returns the time after.
    fn click(c: &mut Controller, at: u64, button: Button, keys: &mut Typed, fx: &mut Heard) -> u64 {
        c.tick(pressing(at, button), keys, fx);
        c.tick(idle(at + 10), keys, fx);
        at + 100
    }

    fn unit() -> Controller {
        Controller::new().with_counts_per_notch(1.0)
    }

    #[test]
    fn first_tick_draws_the_gauge() {
        let mut c = unit();
        let frame = c.tick(idle(0), &mut Typed::default(), &mut Heard::default());
        assert_eq!(frame, Some(Frame::Gauge(Gauge::new(0))));
    }

    #[test]
    fn redraw_is_rate_limited() {
        let mut c = unit();
        let (mut k, mut f) = (Typed::default(), Heard::default());
        assert!(c.tick(idle(0), &mut k, &mut f).is_some());
        assert!(c.tick(idle(10), &mut k, &mut f).is_none());
        assert!(c.tick(idle(20), &mut k, &mut f).is_none());
        assert!(c.tick(idle(21), &mut k, &mut f).is_some());
    }

    #[test]
    fn dial_in_normal_moves_magnitude() {
        let mut c = unit();
        let (mut k, mut f) = (Typed::default(), Heard::default());
        c.tick(dial(0, 3), &mut k, &mut f);
        assert_eq!(c.magnitude().value(), 3);
        assert_eq!(f.0.as_slice(), &[Cue::Step]);
    }

    #[test]
    fn crossing_a_decade_latches_shift_for_next_frame() {
        let mut c = unit().with_magnitude_index(9);
        let (mut k, mut f) = (Typed::default(), Heard::default());
        c.tick(idle(0), &mut k, &mut f);
        c.tick(dial(5, 1), &mut k, &mut f);
        assert!(f.0.contains(&Cue::LevelChanged));
        match c.tick(idle(30), &mut k, &mut f) {
            Some(Frame::Gauge(g)) => {
                assert_eq!(g.value, 10);
                assert_eq!(g.shift, Some(Shift::Up));
            }
            other => panic!("expected gauge, got {:?}", other),
        }
        match c.tick(idle(60), &mut k, &mut f) {
            Some(Frame::Gauge(g)) => assert_eq!(g.shift, None),
            other => panic!("expected gauge, got {:?}", other),
        }
    }

    #[test]
    fn pushing_against_ceiling_bounces() {
        let mut c = unit().with_magnitude_index(46);
        let (mut k, mut f) = (Typed::default(), Heard::default());
        c.tick(idle(0), &mut k, &mut f);
        c.tick(dial(5, 2), &mut k, &mut f);
        assert!(f.0.contains(&Cue::Ceiling));
        match c.tick(idle(30), &mut k, &mut f) {
            Some(Frame::Gauge(g)) => assert!(g.ceiling),
            other => panic!("expected gauge, got {:?}", other),
        }
        assert!(f.0.contains(&Cue::MaxJitter));
    }

    #[test]
    fn dial_in_home_is_discarded() {
        let mut c = unit();
        let (mut k, mut f) = (Typed::default(), Heard::default());
        click(&mut c, 0, Button::Home, &mut k, &mut f);
        assert_eq!(c.mode(), Mode::Home);
        c.tick(dial(200, 7), &mut k, &mut f);
        assert_eq!(c.magnitude().value(), 0);
        assert_eq!(c.coordinates(), Coordinates::default());
    }

    #[test]
    fn settings_motion_does_not_leak_into_magnitude() {
        let mut c = Controller::new().with_counts_per_notch(4.0);
        let (mut k, mut f) = (Typed::default(), Heard::default());
        let mut t = click(&mut c, 0, Button::Settings, &mut k, &mut f);
        // Three counts: a partial notch stays in the carry.
        c.tick(dial(t, 3), &mut k, &mut f);
        for _ in 0..4 {
            t = click(&mut c, t, Button::Settings, &mut k, &mut f);
        }
        assert_eq!(c.mode(), Mode::Normal);
        c.tick(dial(t, 1), &mut k, &mut f);
        assert_eq!(c.magnitude().value(), 0);
    }

    /// Tick every millisecond from `from` until the transmission completes;
    /// returns the completion time.
    fn run_to_done(c: &mut Controller, from: u64, keys: &mut Typed, fx: &mut Heard) -> u64 {
        for now in from..from + 10_000 {
            c.tick(idle(now), keys, fx);
            if fx.0.last() == Some(&Cue::TeleportDone) {
                return now;
            }
        }
        panic!("transmission never finished");
    }

    #[test]
    fn done_screen_holds_for_the_whole_window() {
        let mut c = unit();
        let (mut k, mut f) = (Typed::default(), Heard::default());
        let t = click(&mut c, 0, Button::Teleport, &mut k, &mut f);
        let done_at = run_to_done(&mut c, t, &mut k, &mut f);
        assert_eq!(c.mode(), Mode::Normal);

        let mut drawn = 0;
        for now in done_at + 1..=done_at + DONE_HOLD_MS {
            if let Some(frame) = c.tick(idle(now), &mut k, &mut f) {
                assert_eq!(frame, Frame::Done, "at {} ms after completion", now - done_at);
                drawn += 1;
            }
        }
        assert!(drawn as u64 >= DONE_HOLD_MS / (REDRAW_INTERVAL_MS + 1));

        let after = (done_at + DONE_HOLD_MS + 1..done_at + DONE_HOLD_MS + 100)
            .find_map(|now| c.tick(idle(now), &mut k, &mut f));
        assert!(matches!(after, Some(Frame::Gauge(_))));
    }

    #[test]
    fn mode_change_ends_the_done_screen() {
        let mut c = unit();
        let (mut k, mut f) = (Typed::default(), Heard::default());
        let t = click(&mut c, 0, Button::Teleport, &mut k, &mut f);
        let done_at = run_to_done(&mut c, t, &mut k, &mut f);
        click(&mut c, done_at + 100, Button::Home, &mut k, &mut f);
        assert_eq!(c.tick(idle(done_at + 200), &mut k, &mut f), Some(Frame::Home(c.coordinates())));
    }

    #[test]
    fn home_and_teleport_in_one_tick_teleports_forward() {
        let mut c = unit().with_magnitude_index(3);
        let (mut k, mut f) = (Typed::default(), Heard::default());
        let both = TickInput {
            now_ms: 0,
            buttons: ButtonLevels {
                home: true,
                teleport: true,
                settings: false,
            },
            encoder_delta: 0,
        };
        c.tick(both, &mut k, &mut f);
        assert_eq!(c.mode(), Mode::Confirm { from_home: false });
        assert_eq!(c.transmitter().pending(), "/tp @s ^0 ^0 ^3\n");
    }

    #[test]
    fn teleport_after_home_in_earlier_tick_is_from_home() {
        let mut c = unit().with_coordinates(Coordinates::new(1, 2, 3));
        let (mut k, mut f) = (Typed::default(), Heard::default());
        let t = click(&mut c, 0, Button::Home, &mut k, &mut f);
        click(&mut c, t, Button::Teleport, &mut k, &mut f);
        assert_eq!(c.mode(), Mode::Confirm { from_home: true });
        assert_eq!(c.transmitter().pending(), "/tp @s 1 2 3\n");
    }
}
