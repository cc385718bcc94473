//! Piezo buzzer on PWM0.
//!
//! The main loop queues [`Cue`]s without waiting; the buzzer task plays
//! them back-to-back. A full queue drops the cue.

use defmt::{info, warn};
use embassy_nrf::gpio::AnyPin;
use embassy_nrf::peripherals;
use embassy_nrf::pwm::{Prescaler, SimplePwm};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};
use tpdial::config;
use tpdial::feedback::{Cue, FeedbackSink, Tone};
use tpdial::Error;

/// PWM counter clock after the Div16 prescaler (16 MHz / 16).
const PWM_CLOCK_HZ: u32 = 1_000_000;

pub type Buzzer = SimplePwm<'static, peripherals::PWM0>;

static CUES: Channel<CriticalSectionRawMutex, Cue, { config::CUE_QUEUE_DEPTH }> = Channel::new();

/// Cue sink for the main loop. Never blocks.
pub struct QueuedCues;

impl FeedbackSink for QueuedCues {
    fn cue(&mut self, cue: Cue) {
        if CUES.try_send(cue).is_err() {
            warn!("{} - dropping {}", Error::CueQueueFull, cue);
        }
    }
}

pub fn init(pwm: peripherals::PWM0, pin: AnyPin) -> Buzzer {
    let mut buzzer = SimplePwm::new_1ch(pwm, pin);
    buzzer.set_prescaler(Prescaler::Div16);
    buzzer.disable();
    buzzer
}

async fn play(buzzer: &mut Buzzer, tone: &Tone) {
    // 15-bit counter: anything below ~31 Hz is clamped.
    let period = (PWM_CLOCK_HZ / tone.freq_hz.max(1)).min(0x7FFF) as u16;
    buzzer.set_max_duty(period);
    buzzer.set_duty(0, period / 2);
    buzzer.enable();
    Timer::after(Duration::from_millis(tone.duration_ms as u64)).await;
    buzzer.disable();
    if tone.gap_ms > 0 {
        Timer::after(Duration::from_millis(tone.gap_ms as u64)).await;
    }
}

/// Play queued cues forever.
pub async fn run_buzzer(mut buzzer: Buzzer) -> ! {
    info!("Buzzer task started");

    loop {
        let cue = CUES.receive().await;
        for tone in cue.tones() {
            play(&mut buzzer, tone).await;
        }
    }
}
