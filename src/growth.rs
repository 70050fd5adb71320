//! Day accounting: converts wall-clock time into virtual days and applies
//! water decay and growth once per whole day.

use crate::config::{
    MAX_WATER, RESET_WATER, SKIP_DAY_WATER_LOSS, WATER_DECAY_PER_DAY, WATER_PER_POUR,
};

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrowthState {
    pub water_level: f64,
    pub tree_age: u64,
    /// Instant up to which whole days have been applied
    pub last_checkpoint: i64,
}

impl GrowthState {
    pub fn new(water_level: f64, tree_age: u64, last_checkpoint: i64) -> Self {
        Self {
            water_level: water_level.clamp(0.0, MAX_WATER),
            tree_age,
            last_checkpoint,
        }
    }

    /// Apply every whole virtual day elapsed since the last checkpoint.
    ///
    /// The checkpoint only moves by whole days, so the partial day left over
    /// keeps counting toward the next call. Returns the number of days applied.
    pub fn advance(&mut self, now: i64, ms_per_day: i64) -> u64 {
        if ms_per_day <= 0 {
            return 0;
        }

        // Clock skew can put `now` before the checkpoint
        let elapsed = now.saturating_sub(self.last_checkpoint).max(0);
        if elapsed < ms_per_day {
            return 0;
        }

        let days = elapsed / ms_per_day;
        self.last_checkpoint += days * ms_per_day;

        let days = days as u64;
        self.apply_days(days, WATER_DECAY_PER_DAY * days as f64);
        days
    }

    /// Pour one can. Returns false when the tank was already full.
    pub fn water(&mut self) -> bool {
        if self.water_level >= MAX_WATER {
            return false;
        }
        self.water_level = (self.water_level + WATER_PER_POUR).min(MAX_WATER);
        true
    }

    /// One day's decay and growth, independent of the clock
    pub fn skip_day(&mut self) {
        self.apply_days(1, SKIP_DAY_WATER_LOSS);
    }

    pub fn warp(&mut self, days: u64) {
        self.tree_age = self.tree_age.saturating_add(days);
        self.water_level = RESET_WATER;
    }

    pub fn reset(&mut self, now: i64) {
        self.water_level = RESET_WATER;
        self.tree_age = 0;
        self.last_checkpoint = now;
    }

    fn apply_days(&mut self, days: u64, water_loss: f64) {
        self.water_level = (self.water_level - water_loss).clamp(0.0, MAX_WATER);
        // Growth checks the level after this batch's decay
        if self.water_level > 0.0 {
            self.tree_age = self.tree_age.saturating_add(days);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const D: i64 = 1_000;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn sub_day_elapsed_is_noop() {
        for elapsed in [0, 1, D / 2, D - 1] {
            let mut state = GrowthState::new(40.0, 5, 10_000);
            let before = state;
            assert_eq!(state.advance(10_000 + elapsed, D), 0);
            assert_eq!(state, before);
        }
    }

    #[test]
    fn batched_decay_and_growth() {
        let mut state = GrowthState::new(40.0, 5, 0);
        assert_eq!(state.advance(3 * D, D), 3);
        assert!(approx(state.water_level, 39.7));
        assert_eq!(state.tree_age, 8);
    }

    #[test]
    fn no_growth_when_water_runs_out() {
        let mut state = GrowthState::new(0.5, 12, 0);
        assert_eq!(state.advance(10 * D, D), 10);
        assert_eq!(state.water_level, 0.0);
        assert_eq!(state.tree_age, 12);
    }

    #[test]
    fn catch_up_is_idempotent() {
        let mut once = GrowthState::new(60.0, 1, 0);
        once.advance(7 * D + 123, D);

        let mut twice = GrowthState::new(60.0, 1, 0);
        twice.advance(7 * D + 123, D);
        assert_eq!(twice.advance(7 * D + 123, D), 0);

        assert_eq!(once, twice);
    }

    #[test]
    fn remainder_is_preserved() {
        let start = 50_000;
        let mut state = GrowthState::new(60.0, 0, start);
        let r = D - 1;

        assert_eq!(state.advance(start + 4 * D + r, D), 4);
        assert_eq!(state.last_checkpoint, start + 4 * D);

        // One more millisecond completes the fifth day
        assert_eq!(state.advance(start + 5 * D, D), 1);
        assert_eq!(state.last_checkpoint, start + 5 * D);
        assert_eq!(state.tree_age, 5);
    }

    #[test]
    fn fast_ticks_never_lose_partial_days() {
        let mut state = GrowthState::new(80.0, 0, 0);
        let mut total = 0;
        // 7 ms steps up to 10_010 ms
        for step in 0..=1_430 {
            total += state.advance(step * 7, D);
        }
        assert_eq!(total, 10);
        assert_eq!(state.tree_age, 10);
    }

    #[test]
    fn negative_elapsed_counts_as_zero() {
        let mut state = GrowthState::new(30.0, 2, 100 * D);
        let before = state;
        assert_eq!(state.advance(0, D), 0);
        assert_eq!(state.advance(i64::MIN, D), 0);
        assert_eq!(state, before);
    }

    #[test]
    fn multi_year_gap_catches_up() {
        let ms_per_day = 333;
        let ten_years = 10 * 365 * 24 * 60 * 60 * 1_000_i64;
        let mut state = GrowthState::new(100.0, 0, 0);
        let days = state.advance(ten_years, ms_per_day);

        assert_eq!(days, (ten_years / ms_per_day) as u64);
        assert_eq!(state.water_level, 0.0);
        assert_eq!(state.tree_age, 0);
        assert!(ten_years - state.last_checkpoint < ms_per_day);
    }

    #[test]
    fn non_positive_day_length_does_nothing() {
        let mut state = GrowthState::new(30.0, 2, 0);
        assert_eq!(state.advance(1_000_000, 0), 0);
        assert_eq!(state.advance(1_000_000, -5), 0);
    }

    #[test]
    fn water_clamps_at_full() {
        let mut state = GrowthState::new(95.0, 0, 0);
        assert!(state.water());
        assert_eq!(state.water_level, 100.0);
        assert!(!state.water());
        assert_eq!(state.water_level, 100.0);
    }

    #[test]
    fn constructor_clamps_water() {
        assert_eq!(GrowthState::new(250.0, 0, 0).water_level, 100.0);
        assert_eq!(GrowthState::new(-3.0, 0, 0).water_level, 0.0);
    }

    #[test]
    fn warp_refills_and_ages() {
        let mut state = GrowthState::new(20.0, 100, 0);
        state.warp(730);
        assert_eq!(state.tree_age, 830);
        assert_eq!(state.water_level, 100.0);
    }

    #[test]
    fn skip_day_until_dry() {
        let mut state = GrowthState::new(5.0, 3, 0);
        for _ in 0..10 {
            state.skip_day();
        }
        assert_eq!(state.water_level, 0.0);
        // First skip already empties the tank, so no growth at all
        assert_eq!(state.tree_age, 3);
    }

    #[test]
    fn skip_day_grows_while_water_remains() {
        let mut state = GrowthState::new(35.0, 0, 0);
        for _ in 0..5 {
            state.skip_day();
        }
        assert_eq!(state.water_level, 0.0);
        assert_eq!(state.tree_age, 3);
    }

    #[test]
    fn reset_restores_seed() {
        let mut state = GrowthState::new(3.0, 900, 0);
        state.reset(42);
        assert_eq!(state, GrowthState::new(100.0, 0, 42));
    }
}
