//! USB Device subsystem - presents a boot-protocol keyboard to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb` with a single HID interface:
//!
//! - Interface 0: Keyboard (boot protocol)
//!
//! The writer task drains the keystroke queue filled by the main loop's
//! transmitter and types each character into the host.

pub mod hid_device;
