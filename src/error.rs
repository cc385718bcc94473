//! Unified error type for tpdial.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! The input and transmission state machines have no error paths of
//! their own; these variants only surface at the hardware edges.

/// Top-level error type used by the firmware tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // USB
    /// USB stack returned an error while writing a report.
    Usb,

    /// Keystroke queue to the HID writer is full; the byte is dropped.
    KeystrokeQueueFull,

    /// The byte has no boot keyboard mapping.
    UnmappedKey(u8),

    // Feedback
    /// Buzzer cue queue is full; the cue is dropped.
    CueQueueFull,

    // UI / Display
    /// I²C transaction to the display failed.
    Display,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Usb => f.write_str("usb write failed"),
            Error::KeystrokeQueueFull => f.write_str("keystroke queue full"),
            Error::UnmappedKey(b) => write!(f, "no key mapping for byte {:#04x}", b),
            Error::CueQueueFull => f.write_str("cue queue full"),
            Error::Display => f.write_str("display write failed"),
        }
    }
}
