//! Application-wide constants and compile-time configuration.
//!
//! All pin assignments, timing parameters and fixed tables' tuning
//! knobs live here so they can be adjusted in one place. Nothing in
//! here is configurable at runtime and nothing is persisted.

// Input

/// Button debounce window (ms). No two accepted presses of the same
/// button can be closer together than this.
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Raw QDEC counts that make up one dial notch.
///
/// The nRF QDEC reports every valid quadrature transition, and the
/// dial used on the reference board has one full cycle per detent.
pub const ENCODER_COUNTS_PER_NOTCH: f32 = 4.0;

/// Period of the cooperative main loop (ms).
pub const MAIN_LOOP_PERIOD_MS: u64 = 2;

/// Minimum time between two redraw frames (ms).
pub const REDRAW_INTERVAL_MS: u64 = 20;

// Command transmission

/// Pace between two body characters of a command (ms).
pub const KEYSTROKE_INTERVAL_MS: u64 = 100;

/// Settle time after the leading `/` so the receiving application can
/// open its command line before the body arrives (ms).
pub const SLASH_SETTLE_MS: u64 = 400;

/// Capacity of the command buffer. The longest command,
/// `/tp @s -2147483648 -2147483648 -2147483648\n`, is 43 bytes.
pub const COMMAND_CAPACITY: usize = 48;

/// How long the completion screen stays up after the last character
/// (ms). A time check only; the loop keeps running underneath it.
pub const DONE_HOLD_MS: u64 = 680;

/// Coordinates the HOME command teleports to until edited.
pub const DEFAULT_HOME: (i32, i32, i32) = (0, 80, 0);

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "tpdial";
pub const USB_PRODUCT: &str = "Teleport Dial";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 1;

/// How long a key stays pressed before the release report (ms).
pub const KEY_PRESS_HOLD_MS: u64 = 10;

/// Depth of the main loop → HID writer keystroke queue.
pub const KEYSTROKE_QUEUE_DEPTH: usize = 32;

/// Depth of the main loop → buzzer cue queue.
pub const CUE_QUEUE_DEPTH: usize = 8;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button A (HOME)        → P0.11
//   Button B (TELEPORT)    → P0.12
//   Built-in (SETTINGS)    → P0.24
//   Dial QDEC A            → P0.03
//   Dial QDEC B            → P0.04
//   I²C SDA                → P0.26
//   I²C SCL                → P0.27
//   Buzzer (PWM0 ch0)      → P0.13
