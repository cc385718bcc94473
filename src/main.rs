//! tpdial firmware entry point (nRF52840).
//!
//! Tasks:
//!   - dial    - QDEC readings → shared encoder delta
//!   - usb     - USB device stack
//!   - hid     - keystroke queue → keyboard endpoint
//!   - buzzer  - cue queue → PWM tones
//!   - main    - cooperative loop driving `tpdial::Controller`

#![no_std]
#![no_main]

mod audio;
mod dial;
mod usb;

mod ui {
    pub mod buttons;
    pub mod display;
}

use defmt::{error, info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_nrf::gpio::Pin;
use embassy_nrf::{bind_interrupts, peripherals, twim};
use embassy_time::{Duration, Instant, Ticker};
use tpdial::config;
use tpdial::controller::{Controller, TickInput};
use tpdial::encoder::EncoderDelta;
use tpdial::feedback::{Cue, FeedbackSink};
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// Dial motion shared between the QDEC task and the main loop.
static DIAL: EncoderDelta = EncoderDelta::new();

#[embassy_executor::task]
async fn dial_task(dial: dial::Dial) -> ! {
    dial::run_dial(dial, &DIAL).await
}

#[embassy_executor::task]
async fn usb_task(device: embassy_usb::UsbDevice<'static, usb::hid_device::UsbDriver>) -> ! {
    usb::hid_device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn hid_task(keyboard: usb::hid_device::KeyboardWriter) -> ! {
    usb::hid_device::hid_writer_task(keyboard).await
}

#[embassy_executor::task]
async fn buzzer_task(buzzer: audio::Buzzer) -> ! {
    audio::run_buzzer(buzzer).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("tpdial starting");

    let dial = dial::init(p.QDEC, p.P0_03.degrade(), p.P0_04.degrade());
    unwrap!(spawner.spawn(dial_task(dial)));

    let usb = usb::hid_device::init(p.USBD);
    unwrap!(spawner.spawn(usb_task(usb.device)));
    unwrap!(spawner.spawn(hid_task(usb.keyboard_writer)));

    let buzzer = audio::init(p.PWM0, p.P0_13.degrade());
    unwrap!(spawner.spawn(buzzer_task(buzzer)));

    let buttons = ui::buttons::ButtonPins::new(
        p.P0_11.degrade(),
        p.P0_12.degrade(),
        p.P0_24.degrade(),
    );

    let mut i2c_config = twim::Config::default();
    i2c_config.frequency = twim::Frequency::K400;
    let i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, i2c_config);
    let mut display = match ui::display::init(i2c) {
        Ok(d) => Some(d),
        Err(e) => {
            error!("Display init failed: {} - running headless", e);
            None
        }
    };

    let mut keys = usb::hid_device::QueuedKeys;
    let mut cues = audio::QueuedCues;
    cues.cue(Cue::Boot);

    let mut controller = Controller::new();
    let mut ticker = Ticker::every(Duration::from_millis(config::MAIN_LOOP_PERIOD_MS));

    info!("Main loop running");
    loop {
        let input = TickInput {
            now_ms: Instant::now().as_millis(),
            buttons: buttons.sample(),
            encoder_delta: DIAL.drain(),
        };

        if let Some(frame) = controller.tick(input, &mut keys, &mut cues) {
            if let Some(d) = display.as_mut() {
                if let Err(e) = ui::display::draw(d, &frame) {
                    warn!("Display: {}", e);
                }
            }
        }

        ticker.next().await;
    }
}
