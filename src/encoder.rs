//! Rotary dial accumulation.
//!
//! Raw motion arrives from an asynchronous, higher-priority context
//! (the QDEC task) and is consumed by the cooperative main loop:
//!
//! ```text
//!  QDEC task                         main loop
//!  ─────────                         ─────────
//!  PositionTap::observe(pos) ──┐
//!                              ▼
//!                     EncoderDelta (AtomicI32)
//!                              │ drain()  (swap with 0)
//!                              ▼
//!                     NotchAccumulator::apply() ──► steps
//! ```
//!
//! The atomic counter is the only data shared across the two contexts.
//! `fetch_add` on one side and `swap(0)` on the other make every raw
//! count land in exactly one drain.

use core::sync::atomic::{AtomicI32, Ordering};

/// Shared raw-delta counter between the position source and the main loop.
///
/// `const`-constructible so it can live in a `static`.
pub struct EncoderDelta {
    pending: AtomicI32,
}

impl EncoderDelta {
    pub const fn new() -> Self {
        Self {
            pending: AtomicI32::new(0),
        }
    }

    /// Add motion from the asynchronous side.
    pub fn record(&self, delta: i32) {
        if delta != 0 {
            self.pending.fetch_add(delta, Ordering::AcqRel);
        }
    }

    /// Read and clear everything recorded since the last drain.
    ///
    /// Returns 0 if nothing changed.
    pub fn drain(&self) -> i32 {
        self.pending.swap(0, Ordering::AcqRel)
    }
}

impl Default for EncoderDelta {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts a monotonic raw position into deltas for [`EncoderDelta`].
///
/// Owned by the asynchronous side; the main loop never touches it.
#[derive(Debug, Default)]
pub struct PositionTap {
    last: i32,
}

impl PositionTap {
    /// Start tracking from `position` (no motion is reported for it).
    pub const fn new(position: i32) -> Self {
        Self { last: position }
    }

    /// Fold a new raw position reading into `shared`.
    pub fn observe(&mut self, position: i32, shared: &EncoderDelta) {
        let delta = position.wrapping_sub(self.last);
        self.last = position;
        shared.record(delta);
    }
}

/// Integer notch steps from raw counts, carrying the fractional remainder.
///
/// Invariant: `carry` stays in (-1, 1) and applying 0 changes nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NotchAccumulator {
    counts_per_notch: f32,
    carry: f32,
}

impl NotchAccumulator {
    /// `counts_per_notch` must be positive; see
    /// [`ENCODER_COUNTS_PER_NOTCH`](crate::config::ENCODER_COUNTS_PER_NOTCH).
    pub const fn new(counts_per_notch: f32) -> Self {
        Self {
            counts_per_notch,
            carry: 0.0,
        }
    }

    /// Add `delta` raw counts and return the whole notches completed.
    ///
    /// The carry is truncated toward zero, so a reversal first eats the
    /// partial notch before producing steps in the other direction.
    pub fn apply(&mut self, delta: i32) -> i32 {
        self.carry += delta as f32 / self.counts_per_notch;
        // `as i32` truncates toward zero.
        let steps = self.carry as i32;
        self.carry -= steps as f32;
        steps
    }

    /// Fractional notch remainder.
    pub fn carry(&self) -> f32 {
        self.carry
    }

    /// Drop any partial notch.
    pub fn resync(&mut self) {
        self.carry = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empty_counter_is_zero() {
        let shared = EncoderDelta::new();
        assert_eq!(shared.drain(), 0);
        assert_eq!(shared.drain(), 0);
    }

    #[test]
    fn drain_clears_recorded_motion() {
        let shared = EncoderDelta::new();
        shared.record(3);
        shared.record(-1);
        shared.record(5);
        assert_eq!(shared.drain(), 7);
        assert_eq!(shared.drain(), 0);
    }

    #[test]
    fn position_tap_reports_differences() {
        let shared = EncoderDelta::new();
        let mut tap = PositionTap::new(100);
        tap.observe(104, &shared);
        tap.observe(101, &shared);
        assert_eq!(shared.drain(), 1);
        tap.observe(101, &shared);
        assert_eq!(shared.drain(), 0);
        tap.observe(90, &shared);
        assert_eq!(shared.drain(), -11);
    }

    #[test]
    fn position_tap_survives_wraparound() {
        let shared = EncoderDelta::new();
        let mut tap = PositionTap::new(i32::MAX);
        tap.observe(i32::MIN, &shared);
        assert_eq!(shared.drain(), 1);
    }

    #[test]
    fn unit_notch_passes_counts_straight_through() {
        let mut acc = NotchAccumulator::new(1.0);
        assert_eq!(acc.apply(5), 5);
        assert_eq!(acc.apply(-2), -2);
        assert_eq!(acc.carry(), 0.0);
    }

    #[test]
    fn zero_input_is_a_no_op() {
        let mut acc = NotchAccumulator::new(4.0);
        acc.apply(3);
        let before = acc.carry();
        for _ in 0..10 {
            assert_eq!(acc.apply(0), 0);
        }
        assert_eq!(acc.carry(), before);
    }

    #[test]
    fn partial_notches_carry_over() {
        let mut acc = NotchAccumulator::new(4.0);
        assert_eq!(acc.apply(1), 0);
        assert_eq!(acc.apply(2), 0);
        assert_eq!(acc.apply(1), 1);
        assert_eq!(acc.carry(), 0.0);
        assert_eq!(acc.apply(9), 2);
        assert_eq!(acc.carry(), 0.25);
    }

    #[test]
    fn reversal_consumes_carry_first() {
        let mut acc = NotchAccumulator::new(4.0);
        assert_eq!(acc.apply(3), 0);
        // 0.75 - 1.0 = -0.25: no whole notch in either direction.
        assert_eq!(acc.apply(-4), 0);
        assert_eq!(acc.carry(), -0.25);
        assert_eq!(acc.apply(-3), -1);
    }

    #[test]
    fn resync_drops_partial_notch() {
        let mut acc = NotchAccumulator::new(4.0);
        acc.apply(3);
        acc.resync();
        assert_eq!(acc.carry(), 0.0);
        assert_eq!(acc.apply(1), 0);
    }
}
