//! Non-linear magnitude selection.
//!
//! Each dial notch moves exactly one table entry, so small values get
//! fine control and large values move in coarse jumps:
//!
//! ```text
//! index  0   1 … 9   10 … 18   19 … 27   28 … 36    37 … 45     46
//! value  0   1 … 9   10 … 90  100 … 900 1000…9000 10000…90000 99999
//! ```

/// Selectable magnitudes, strictly increasing.
pub const MAGNITUDES: [u32; 47] = [
    0, //
    1, 2, 3, 4, 5, 6, 7, 8, 9, //
    10, 20, 30, 40, 50, 60, 70, 80, 90, //
    100, 200, 300, 400, 500, 600, 700, 800, 900, //
    1000, 2000, 3000, 4000, 5000, 6000, 7000, 8000, 9000, //
    10000, 20000, 30000, 40000, 50000, 60000, 70000, 80000, 90000, //
    99999,
];

const LAST_INDEX: usize = MAGNITUDES.len() - 1;

/// Order of magnitude: `floor(log10(value))`, 0 for 0.
pub fn level_of(value: u32) -> u8 {
    match value.checked_ilog10() {
        Some(l) => l as u8,
        None => 0,
    }
}

/// Direction of an order-of-magnitude change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shift {
    Up,
    Down,
}

/// Result of one [`MagnitudeSelector::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagnitudeUpdate {
    pub value: u32,
    /// Level differs from the previous update's level.
    pub shift: Option<Shift>,
    /// Index is the last one and this update stepped upward.
    pub at_ceiling_ascending: bool,
    /// Index actually moved.
    pub moved: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagnitudeSelector {
    index: usize,
    last_level: u8,
}

impl MagnitudeSelector {
    pub const fn new() -> Self {
        Self {
            index: 0,
            last_level: 0,
        }
    }

    /// Start at `index` (clamped to the table).
    pub fn at_index(index: usize) -> Self {
        let index = index.min(LAST_INDEX);
        Self {
            index,
            last_level: level_of(MAGNITUDES[index]),
        }
    }

    /// Move by `steps` table entries, clamped at both ends.
    pub fn update(&mut self, steps: i32) -> MagnitudeUpdate {
        let before = self.index;
        let magnitude = steps.unsigned_abs() as usize;
        self.index = if steps >= 0 {
            before.saturating_add(magnitude).min(LAST_INDEX)
        } else {
            before.saturating_sub(magnitude)
        };

        let value = MAGNITUDES[self.index];
        let level = level_of(value);
        let shift = match level.cmp(&self.last_level) {
            core::cmp::Ordering::Greater => Some(Shift::Up),
            core::cmp::Ordering::Less => Some(Shift::Down),
            core::cmp::Ordering::Equal => None,
        };
        self.last_level = level;

        MagnitudeUpdate {
            value,
            shift,
            at_ceiling_ascending: self.index == LAST_INDEX && steps > 0,
            moved: self.index != before,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn value(&self) -> u32 {
        MAGNITUDES[self.index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_strictly_increasing() {
        assert!(MAGNITUDES.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(MAGNITUDES[0], 0);
        assert_eq!(MAGNITUDES[LAST_INDEX], 99999);
    }

    #[test]
    fn levels() {
        assert_eq!(level_of(0), 0);
        assert_eq!(level_of(1), 0);
        assert_eq!(level_of(9), 0);
        assert_eq!(level_of(10), 1);
        assert_eq!(level_of(100), 2);
        assert_eq!(level_of(1000), 3);
        assert_eq!(level_of(10000), 4);
        assert_eq!(level_of(99999), 4);
    }

    #[test]
    fn five_steps_from_nine_walk_five_entries() {
        let mut sel = MagnitudeSelector::at_index(9);
        assert_eq!(sel.value(), 9);
        let u = sel.update(5);
        assert_eq!(sel.index(), 14);
        assert_eq!(u.value, 50);
        assert_eq!(u.shift, Some(Shift::Up));
    }

    #[test]
    fn clamps_at_ceiling_and_flags_it() {
        let mut sel = MagnitudeSelector::at_index(LAST_INDEX - 1);
        let u = sel.update(10);
        assert_eq!(sel.index(), LAST_INDEX);
        assert!(u.at_ceiling_ascending);
        assert!(u.moved);

        let u = sel.update(1);
        assert_eq!(sel.index(), LAST_INDEX);
        assert!(u.at_ceiling_ascending);
        assert!(!u.moved);
        assert_eq!(u.shift, None);
    }

    #[test]
    fn no_ceiling_flag_without_upward_step() {
        let mut sel = MagnitudeSelector::at_index(LAST_INDEX);
        assert!(!sel.update(0).at_ceiling_ascending);
        assert!(!sel.update(-1).at_ceiling_ascending);
    }

    #[test]
    fn clamps_at_floor() {
        let mut sel = MagnitudeSelector::at_index(3);
        let u = sel.update(-100);
        assert_eq!(sel.index(), 0);
        assert_eq!(u.value, 0);
        let u = sel.update(-1);
        assert!(!u.moved);
        assert_eq!(sel.index(), 0);
    }

    #[test]
    fn level_change_reported_once() {
        let mut sel = MagnitudeSelector::at_index(18); // 90
        let u = sel.update(1); // 100
        assert_eq!(u.shift, Some(Shift::Up));
        let u = sel.update(0);
        assert_eq!(u.shift, None);
        let u = sel.update(-1); // back to 90
        assert_eq!(u.shift, Some(Shift::Down));
    }

    #[test]
    fn level_stays_inside_a_decade() {
        let mut sel = MagnitudeSelector::at_index(10); // 10
        for _ in 0..8 {
            assert_eq!(sel.update(1).shift, None);
        }
        assert_eq!(sel.value(), 90);
    }

    #[test]
    fn extreme_step_counts_do_not_overflow() {
        let mut sel = MagnitudeSelector::new();
        sel.update(i32::MAX);
        assert_eq!(sel.index(), LAST_INDEX);
        sel.update(i32::MIN);
        assert_eq!(sel.index(), 0);
    }
}
