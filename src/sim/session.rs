//! Session counters and countdown clock

use serde::{Deserialize, Serialize};

/// Score, erased count and remaining time for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCounters {
    score: u64,
    erased: u64,
    /// Whole seconds left
    remaining_time: u32,
    /// Time accumulated toward the next whole second
    accumulator: f32,
    ended: bool,
}

impl SessionCounters {
    pub fn new(initial_time_secs: u32) -> Self {
        Self {
            score: 0,
            erased: 0,
            remaining_time: initial_time_secs,
            accumulator: 0.0,
            ended: false,
        }
    }

    /// Advance the clock. Returns true exactly once, on the tick the clock hits zero.
    ///
    /// At most one second is taken off per call. The fraction past a whole
    /// second carries over so frame-sized steps do not drift.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.ended {
            return false;
        }
        if dt.is_finite() && dt > 0.0 {
            self.accumulator += dt;
        }
        if self.accumulator >= 1.0 {
            // Drop any extra whole seconds from one oversized step
            self.accumulator = (self.accumulator - 1.0).fract();
            self.remaining_time = self.remaining_time.saturating_sub(1);
        }
        if self.remaining_time == 0 {
            self.ended = true;
            return true;
        }
        false
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn add_erased(&mut self, count: u64) {
        self.erased = self.erased.saturating_add(count);
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn erased(&self) -> u64 {
        self.erased
    }

    pub fn remaining_time(&self) -> u32 {
        self.remaining_time
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_counts_down_whole_seconds() {
        let mut session = SessionCounters::new(3);
        for _ in 0..59 {
            assert!(!session.tick(1.0 / 60.0));
        }
        assert_eq!(session.remaining_time(), 3);
        // 60 f32 sixtieths land just short of 1.0
        for _ in 0..3 {
            session.tick(1.0 / 60.0);
        }
        assert_eq!(session.remaining_time(), 2);
    }

    #[test]
    fn test_clock_keeps_pace_at_frame_rate() {
        let mut session = SessionCounters::new(60);
        for _ in 0..3570 {
            session.tick(crate::consts::SIM_DT);
        }
        // 59.5 s simulated
        assert_eq!(session.remaining_time(), 1);
        assert!(!session.is_ended());
        for _ in 0..60 {
            session.tick(crate::consts::SIM_DT);
        }
        assert!(session.is_ended());
    }

    #[test]
    fn test_session_end_fires_once() {
        let mut session = SessionCounters::new(2);
        assert!(!session.tick(1.0));
        assert_eq!(session.remaining_time(), 1);
        assert!(session.tick(1.0));
        assert_eq!(session.remaining_time(), 0);
        assert!(session.is_ended());
        assert!(!session.tick(1.0));
        assert!(!session.tick(5.0));
        assert_eq!(session.remaining_time(), 0);
    }

    #[test]
    fn test_large_step_takes_one_second() {
        let mut session = SessionCounters::new(10);
        session.tick(4.5);
        assert_eq!(session.remaining_time(), 9);
        // Only the half second carries over
        session.tick(0.25);
        assert_eq!(session.remaining_time(), 9);
        session.tick(0.25);
        assert_eq!(session.remaining_time(), 8);
    }

    #[test]
    fn test_zero_initial_time_ends_on_first_tick() {
        let mut session = SessionCounters::new(0);
        assert!(session.tick(0.0));
        assert!(!session.tick(0.0));
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let mut session = SessionCounters::new(5);
        session.tick(-3.0);
        session.tick(f32::NAN);
        assert_eq!(session.remaining_time(), 5);
        assert!(!session.is_ended());
    }

    #[test]
    fn test_counters_only_grow() {
        let mut session = SessionCounters::new(5);
        session.add_score(300);
        session.add_score(0);
        session.add_erased(3);
        assert_eq!(session.score(), 300);
        assert_eq!(session.erased(), 3);
        session.add_score(u64::MAX);
        assert_eq!(session.score(), u64::MAX);
    }
}
