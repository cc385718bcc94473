//! USB HID boot keyboard.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral and exposes a single keyboard endpoint. The main loop
//! hands characters to [`QueuedKeys`]; [`hid_writer_task`] turns each
//! one into a press report followed by a release report.

use defmt::{info, warn};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;
use tpdial::config;
use tpdial::hid::keyboard::{KeyboardReport, KEYBOARD_REPORT_DESCRIPTOR, KEYBOARD_REPORT_SIZE};
use tpdial::transmit::KeystrokeSink;
use tpdial::Error;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

/// Concrete USB driver type.
pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

/// Keyboard endpoint writer.
pub type KeyboardWriter = HidWriter<'static, UsbDriver, KEYBOARD_REPORT_SIZE>;

static KB_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();

/// Characters waiting to be typed, in order.
static KEYSTROKES: Channel<CriticalSectionRawMutex, u8, { config::KEYSTROKE_QUEUE_DEPTH }> =
    Channel::new();

/// Keystroke sink for the main loop. Never blocks.
pub struct QueuedKeys;

impl KeystrokeSink for QueuedKeys {
    fn send(&mut self, byte: u8) {
        if KEYSTROKES.try_send(byte).is_err() {
            warn!("{} - dropping {=u8:#x}", Error::KeystrokeQueueFull, byte);
        }
    }
}

/// Build result containing the USB device runner and the keyboard writer.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub keyboard_writer: KeyboardWriter,
}

/// Initialise the USB stack and create the keyboard device.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> UsbHidDevice {
    // Create the low-level USB driver with hardware VBUS detection.
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 128]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    let kb_state = KB_STATE.init(State::new());
    let kb_config = HidConfig {
        report_descriptor: KEYBOARD_REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let keyboard_writer = HidWriter::new(&mut builder, kb_state, kb_config);

    let device = builder.build();

    info!("USB HID keyboard initialised");

    UsbHidDevice {
        device,
        keyboard_writer,
    }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

async fn write_report(keyboard: &mut KeyboardWriter, report: &KeyboardReport) -> Result<(), Error> {
    let mut buf = [0u8; KEYBOARD_REPORT_SIZE];
    let n = report.serialize(&mut buf);
    keyboard.write(&buf[..n]).await.map_err(|_| Error::Usb)
}

/// Type one character: press, hold, release.
async fn type_byte(keyboard: &mut KeyboardWriter, byte: u8) -> Result<(), Error> {
    let press = KeyboardReport::for_ascii(byte).ok_or(Error::UnmappedKey(byte))?;
    write_report(keyboard, &press).await?;
    Timer::after(Duration::from_millis(config::KEY_PRESS_HOLD_MS)).await;
    write_report(keyboard, &KeyboardReport::released()).await
}

/// Keystroke forwarding task - drains the keystroke queue into the
/// keyboard endpoint.
pub async fn hid_writer_task(mut keyboard: KeyboardWriter) -> ! {
    info!("HID writer task started - waiting for keystrokes");

    loop {
        let byte = KEYSTROKES.receive().await;
        if let Err(e) = type_byte(&mut keyboard, byte).await {
            warn!("USB keyboard: {}", e);
        }
    }
}
