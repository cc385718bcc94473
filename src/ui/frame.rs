//! Renderer snapshots.
//!
//! A [`Frame`] is everything the display needs for one redraw. The
//! renderer keeps no UI state of its own beyond animation framing.

use crate::magnitude::{level_of, Shift, MAGNITUDES};
use crate::transmit::Phase;
use crate::ui::mode::{Coordinates, EditField};

/// Gauge view of the current magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gauge {
    pub value: u32,
    pub level: u8,
    /// One ring per decade; the outermost one is partially filled.
    pub rings: u8,
    /// Fill of the outermost ring, 0..=100.
    pub progress_percent: u8,
    /// Pending shift animation.
    pub shift: Option<Shift>,
    /// Pending ceiling bounce.
    pub ceiling: bool,
}

impl Gauge {
    pub fn new(value: u32) -> Self {
        let level = level_of(value);
        Self {
            value,
            level,
            rings: level + 1,
            progress_percent: progress_percent(value, level),
            shift: None,
            ceiling: false,
        }
    }
}

fn progress_percent(value: u32, level: u8) -> u8 {
    if value == MAGNITUDES[MAGNITUDES.len() - 1] {
        return 100;
    }
    if value == 0 {
        return 0;
    }
    let decade = 10u32.pow(level as u32) * 10;
    (value.saturating_mul(100) / decade).min(100) as u8
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Frame {
    Gauge(Gauge),
    Home(Coordinates),
    Teleport { from_home: bool, phase: Phase },
    Settings { coords: Coordinates, field: EditField },
    /// Shown once after a command has been sent.
    Done,
}
