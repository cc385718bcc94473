//! Rotary dial via the nRF QDEC peripheral.
//!
//! The QDEC task is the asynchronous position source: it folds every
//! hardware reading into a raw position and pushes the difference into
//! the shared [`EncoderDelta`] for the main loop to drain.

use defmt::{debug, info};
use embassy_nrf::gpio::AnyPin;
use embassy_nrf::peripherals;
use embassy_nrf::bind_interrupts;
use embassy_nrf::qdec::{Config, InterruptHandler, NumSamples, Qdec, SamplePeriod};
use tpdial::encoder::{EncoderDelta, PositionTap};

bind_interrupts!(struct Irqs {
    QDEC => InterruptHandler<peripherals::QDEC>;
});

pub type Dial = Qdec<'static, peripherals::QDEC>;

/// Configure the QDEC on the dial's A/B pins.
pub fn init(qdec: peripherals::QDEC, a: AnyPin, b: AnyPin) -> Dial {
    let mut config = Config::default();
    config.num_samples = NumSamples::_1smpl;
    config.period = SamplePeriod::_128us;
    config.debounce = true;
    Qdec::new(qdec, Irqs, a, b, config)
}

/// Forward dial motion forever.
pub async fn run_dial(mut dial: Dial, shared: &'static EncoderDelta) -> ! {
    info!("Dial task started");

    let mut position: i32 = 0;
    let mut tap = PositionTap::new(position);

    loop {
        let counts = dial.read().await;
        position = position.wrapping_add(counts as i32);
        debug!("Dial: {} (position {})", counts, position);
        tap.observe(position, shared);
    }
}
