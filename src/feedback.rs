//! Audio feedback cues.
//!
//! The core only says *which* cue to play; the buzzer task turns a cue
//! into its tone sequence. Cues are advisory and never acknowledged.

/// A single buzzer note followed by a silent gap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tone {
    pub freq_hz: u32,
    pub duration_ms: u32,
    pub gap_ms: u32,
}

const fn tone(freq_hz: u32, duration_ms: u32, gap_ms: u32) -> Tone {
    Tone {
        freq_hz,
        duration_ms,
        gap_ms,
    }
}

/// Transition points that make a sound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cue {
    Boot,
    /// Dial moved at least one notch in Normal mode.
    Step,
    /// Value crossed a power of ten.
    LevelChanged,
    /// Dial pushed upward against the last table entry.
    Ceiling,
    /// Gauge bounce while pinned at the ceiling.
    MaxJitter,
    ModeChange,
    FieldAdvance,
    EditDone,
    /// Leading `/` sent.
    TeleportStart,
    /// Whole command sent.
    TeleportDone,
}

const BOOT: &[Tone] = &[tone(8000, 20, 0)];
const STEP: &[Tone] = &[tone(800, 20, 0)];
const LEVEL_CHANGED: &[Tone] = &[tone(6000, 30, 0)];
const CEILING: &[Tone] = &[tone(6000, 10, 10), tone(6000, 10, 10), tone(6000, 10, 0)];
const MAX_JITTER: &[Tone] = &[tone(7000, 100, 0)];
const CLICK: &[Tone] = &[tone(1200, 60, 0)];
const EDIT_DONE: &[Tone] = &[tone(2000, 80, 80), tone(3000, 80, 0)];
// Rising sweep: 800 Hz + 200 Hz per note.
const TELEPORT_START: &[Tone] = &[
    tone(800, 30, 30),
    tone(1000, 30, 30),
    tone(1200, 30, 30),
    tone(1400, 30, 30),
    tone(1600, 30, 30),
    tone(1800, 30, 30),
];
const TELEPORT_DONE: &[Tone] = &[tone(1800, 80, 80), tone(2500, 80, 0)];

impl Cue {
    pub fn tones(self) -> &'static [Tone] {
        match self {
            Cue::Boot => BOOT,
            Cue::Step => STEP,
            Cue::LevelChanged => LEVEL_CHANGED,
            Cue::Ceiling => CEILING,
            Cue::MaxJitter => MAX_JITTER,
            Cue::ModeChange | Cue::FieldAdvance => CLICK,
            Cue::EditDone => EDIT_DONE,
            Cue::TeleportStart => TELEPORT_START,
            Cue::TeleportDone => TELEPORT_DONE,
        }
    }

    /// Total time the cue occupies the buzzer.
    #[cfg(test)]
    pub fn duration_ms(self) -> u32 {
        self.tones().iter().map(|t| t.duration_ms + t.gap_ms).sum()
    }
}

/// Receiver of cue requests (buzzer queue on target, a recorder in tests).
pub trait FeedbackSink {
    fn cue(&mut self, cue: Cue);
}
