//! Host-testable core of the tpdial firmware.
//!
//! tpdial is a single-dial controller: turning the dial picks a
//! teleport distance from a fixed non-linear scale, three buttons move
//! between screens, and a `/tp` command is typed into the host over USB
//! HID one keystroke at a time.
//!
//! Everything in this library is pure logic with no hardware access, so
//! it runs under `cargo test --lib` on the host. The embedded binary
//! (`main.rs`, `embedded` feature) owns the peripherals and feeds this
//! core from its main loop:
//!
//! ```text
//!  QDEC task ──► EncoderDelta ──┐
//!  button pins ─────────────────┼──► Controller::tick ──► Frame ──► OLED
//!                               │           │
//!                               │           ├──► KeystrokeSink ──► USB HID
//!                               │           └──► FeedbackSink ───► buzzer
//! ```

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod controller;
pub mod encoder;
pub mod error;
pub mod feedback;
pub mod magnitude;
pub mod transmit;

// ═══════════════════════════════════════════════════════════════════════════
// HID
// ═══════════════════════════════════════════════════════════════════════════

pub mod hid {
    pub mod keyboard;

    pub use keyboard::KeyboardReport;
}

// ═══════════════════════════════════════════════════════════════════════════
// UI state
// ═══════════════════════════════════════════════════════════════════════════

pub mod ui {
    pub mod frame;
    pub mod input;
    pub mod mode;

    pub use frame::{Frame, Gauge};
    pub use input::{Button, ButtonLevels};
    pub use mode::{Coordinates, EditField, Mode};
}

pub use controller::{Controller, TickInput};
pub use error::Error;
