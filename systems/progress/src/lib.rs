#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Best-level record keeping with calendar-day rollover.
//!
//! The record survives for the lifetime of the session; persistence across
//! process restarts is the host's concern, which is why the snapshot type
//! derives serde.

use chrono::NaiveDate;
use ham_rhythm_core::Level;
use serde::{Deserialize, Serialize};

/// Tracks the best level reached lifetime-wide and within the current day.
#[derive(Clone, Debug)]
pub struct ProgressRecord {
    best_all_time: Level,
    best_today: Option<Level>,
    record_date: NaiveDate,
}

impl ProgressRecord {
    /// Creates a fresh record anchored to the provided date.
    ///
    /// The lifetime best starts at level 1 and the daily best starts empty,
    /// matching a player who has not yet cleared anything.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            best_all_time: Level::FIRST,
            best_today: None,
            record_date: today,
        }
    }

    /// Folds the observed wall-clock date into the record.
    ///
    /// When the date differs from the stored one the daily best is cleared
    /// and the new date stored; repeating the same date is a no-op. Returns
    /// whether a rollover happened.
    pub fn observe_date(&mut self, today: NaiveDate) -> bool {
        if today == self.record_date {
            return false;
        }

        self.record_date = today;
        self.best_today = None;
        true
    }

    /// Raises both bests to at least `level` after a successful clear.
    ///
    /// Both records are monotonic and never decrease. Returns whether
    /// either best advanced.
    pub fn record_clear(&mut self, level: Level) -> bool {
        let mut advanced = false;

        if level > self.best_all_time {
            self.best_all_time = level;
            advanced = true;
        }

        match self.best_today {
            Some(best) if best >= level => {}
            _ => {
                self.best_today = Some(level);
                advanced = true;
            }
        }

        advanced
    }

    /// Best level reached across the lifetime of the record.
    #[must_use]
    pub const fn best_all_time(&self) -> Level {
        self.best_all_time
    }

    /// Best level reached during the current calendar day, if any.
    #[must_use]
    pub const fn best_today(&self) -> Option<Level> {
        self.best_today
    }

    /// Captures a serializable read-only copy for display or persistence.
    #[must_use]
    pub const fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            best_all_time: self.best_all_time,
            best_today: self.best_today,
            record_date: self.record_date,
        }
    }
}

/// Immutable copy of the record used for sidebar display and persistence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Best level reached across the lifetime of the record.
    pub best_all_time: Level,
    /// Best level reached during the current calendar day, if any.
    pub best_today: Option<Level>,
    /// Date the daily best applies to.
    pub record_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(ordinal: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, ordinal).expect("valid test date")
    }

    #[test]
    fn rollover_clears_the_daily_best_only() {
        let mut record = ProgressRecord::new(day(1));
        assert!(record.record_clear(Level::new(6)));
        assert!(record.observe_date(day(2)));
        assert_eq!(record.best_today(), None);
        assert_eq!(record.best_all_time(), Level::new(6));
    }

    #[test]
    fn observing_the_same_date_twice_is_a_no_op() {
        let mut record = ProgressRecord::new(day(1));
        let _ = record.record_clear(Level::new(4));
        assert!(record.observe_date(day(2)));
        assert!(!record.observe_date(day(2)));
        assert_eq!(record.best_today(), None);
    }

    #[test]
    fn records_never_decrease() {
        let mut record = ProgressRecord::new(day(1));
        assert!(record.record_clear(Level::new(9)));
        assert!(!record.record_clear(Level::new(3)));
        assert_eq!(record.best_all_time(), Level::new(9));
        assert_eq!(record.best_today(), Some(Level::new(9)));
    }

    #[test]
    fn daily_best_never_exceeds_the_lifetime_best() {
        let mut record = ProgressRecord::new(day(1));
        for level in [2u32, 7, 5, 11] {
            let _ = record.record_clear(Level::new(level));
            let today = record.best_today().expect("daily best after a clear");
            assert!(today <= record.best_all_time());
        }
    }

    #[test]
    fn clears_after_rollover_repopulate_the_daily_best() {
        let mut record = ProgressRecord::new(day(1));
        let _ = record.record_clear(Level::new(12));
        let _ = record.observe_date(day(2));
        assert!(record.record_clear(Level::new(5)));
        assert_eq!(record.best_today(), Some(Level::new(5)));
        assert_eq!(record.best_all_time(), Level::new(12));
    }

    #[test]
    fn snapshot_round_trips_through_bincode() {
        let mut record = ProgressRecord::new(day(3));
        let _ = record.record_clear(Level::new(8));
        let snapshot = record.snapshot();
        let bytes = bincode::serialize(&snapshot).expect("serialize");
        let restored: ProgressSnapshot = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, snapshot);
    }
}
