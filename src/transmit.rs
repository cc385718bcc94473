//! Paced, non-blocking command transmission.
//!
//! A command is typed into the host one character per satisfied timing
//! condition, the way a person at a keyboard would. The leading `/`
//! opens the game's command line, so the character after it waits
//! longer than the rest:
//!
//! ```text
//!  arm ──100ms──► '/' ──400ms──► 't' ──100ms──► 'p' ── … ──► '\n' ──100ms──► Done
//! ```
//!
//! [`Transmitter::poll`] is called every main-loop tick and never emits
//! more than one character per call.

use crate::config::{COMMAND_CAPACITY, KEYSTROKE_INTERVAL_MS, SLASH_SETTLE_MS};
use crate::ui::mode::Coordinates;
use core::fmt::Write;
use heapless::String;

/// Receives typed characters in order. No flow control.
pub trait KeystrokeSink {
    fn send(&mut self, byte: u8);
}

/// Which command to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Absolute teleport to the home coordinates.
    Home(Coordinates),
    /// Relative teleport `distance` blocks straight ahead.
    Forward(u32),
}

impl Command {
    /// Render into `out`, replacing its contents.
    pub fn render(&self, out: &mut String<COMMAND_CAPACITY>) -> core::fmt::Result {
        out.clear();
        match self {
            Command::Home(c) => writeln!(out, "/tp @s {} {} {}", c.x, c.y, c.z),
            Command::Forward(distance) => writeln!(out, "/tp @s ^0 ^0 ^{}", distance),
        }
    }
}

/// Map a command byte to the code handed to the keystroke sink.
///
/// `@` and `^` are sent as their literal ASCII codes rather than
/// whatever a layout-dependent lookup would pick.
pub fn translate(byte: u8) -> u8 {
    match byte {
        b'@' => 0x40,
        b'^' => 0x5E,
        other => other,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    #[default]
    Idle,
    SendingSlash,
    SendingBody,
    /// Last activation finished; ready to be armed again.
    Done,
}

/// What a [`Transmitter::poll`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxEvent {
    SlashSent,
    Sent(u8),
    Completed,
}

#[derive(Debug, Default)]
pub struct Transmitter {
    phase: Phase,
    buffer: String<COMMAND_CAPACITY>,
    cursor: usize,
    last_send_ms: u64,
    delay_ms: u64,
}

impl Transmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build `command` and start sending it.
    ///
    /// Returns `false` (and changes nothing) while a transmission is in
    /// flight.
    pub fn arm(&mut self, command: Command, now_ms: u64) -> bool {
        if self.is_busy() {
            return false;
        }

        self.cursor = 0;
        self.last_send_ms = now_ms;
        self.delay_ms = KEYSTROKE_INTERVAL_MS;
        self.phase = if command.render(&mut self.buffer).is_ok() {
            Phase::SendingSlash
        } else {
            // Cannot happen with the sized buffer; terminate instead of
            // typing a truncated command.
            self.buffer.clear();
            Phase::SendingBody
        };
        true
    }

    /// Advance by at most one character.
    pub fn poll<K: KeystrokeSink>(&mut self, now_ms: u64, keys: &mut K) -> Option<TxEvent> {
        if !self.is_busy() || now_ms.wrapping_sub(self.last_send_ms) <= self.delay_ms {
            return None;
        }

        if self.phase == Phase::SendingSlash {
            keys.send(b'/');
            self.cursor = 1;
            self.phase = Phase::SendingBody;
            self.last_send_ms = now_ms;
            self.delay_ms = SLASH_SETTLE_MS;
            return Some(TxEvent::SlashSent);
        }

        match self.buffer.as_bytes().get(self.cursor) {
            Some(&byte) if byte != 0 => {
                let code = translate(byte);
                keys.send(code);
                self.cursor += 1;
                self.last_send_ms = now_ms;
                self.delay_ms = KEYSTROKE_INTERVAL_MS;
                Some(TxEvent::Sent(code))
            }
            // Terminator or past the end.
            _ => {
                self.buffer.clear();
                self.cursor = 0;
                self.phase = Phase::Done;
                Some(TxEvent::Completed)
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::SendingSlash | Phase::SendingBody)
    }

    /// The command being sent (empty when not busy).
    pub fn pending(&self) -> &str {
        self.buffer.as_str()
    }

    /// Bytes not yet handed to the sink.
    #[cfg(test)]
    pub fn remaining(&self) -> &[u8] {
        self.buffer.as_bytes().get(self.cursor..).unwrap_or(&[])
    }
}
