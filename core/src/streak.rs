use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Dates older than this many days before today fall out of
/// `recent_dates`.
pub const RECENT_WINDOW_DAYS: i64 = 14;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StreakState {
    pub count: i64,
    pub last_logged: Option<NaiveDate>,
    #[serde(default)]
    pub recent_dates: BTreeSet<NaiveDate>,
}

impl StreakState {
    /// Advance the streak for a logging event on `today`.
    ///
    /// Continuation rule: last logged yesterday extends the run,
    /// re-logging today is idempotent, any gap (or a future/empty
    /// stamp) restarts at 1. The date stamp, recent-dates insert,
    /// and window prune happen on every call, same-day re-logs
    /// included.
    pub fn record_activity(&mut self, today: NaiveDate) {
        let yesterday = today - chrono::Duration::days(1);
        self.count = match self.last_logged {
            Some(d) if d == today => self.count,
            Some(d) if d == yesterday => self.count + 1,
            _ => 1,
        };
        self.last_logged = Some(today);
        self.recent_dates.insert(today);
        let cutoff = today - chrono::Duration::days(RECENT_WINDOW_DAYS);
        self.recent_dates.retain(|d| *d >= cutoff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_first_activity_starts_at_one() {
        let mut s = StreakState::default();
        s.record_activity(date("2025-03-10"));
        assert_eq!(s.count, 1);
        assert_eq!(s.last_logged, Some(date("2025-03-10")));
        assert!(s.recent_dates.contains(&date("2025-03-10")));
    }

    #[test]
    fn test_yesterday_continues() {
        let mut s = StreakState {
            count: 4,
            last_logged: Some(date("2025-03-09")),
            recent_dates: BTreeSet::new(),
        };
        s.record_activity(date("2025-03-10"));
        assert_eq!(s.count, 5);
        assert_eq!(s.last_logged, Some(date("2025-03-10")));
    }

    #[test]
    fn test_gap_resets_to_one() {
        let mut s = StreakState {
            count: 7,
            last_logged: Some(date("2025-03-07")),
            recent_dates: BTreeSet::new(),
        };
        s.record_activity(date("2025-03-10"));
        assert_eq!(s.count, 1);
    }

    #[test]
    fn test_same_day_is_idempotent() {
        let mut s = StreakState {
            count: 5,
            last_logged: Some(date("2025-03-10")),
            recent_dates: BTreeSet::new(),
        };
        s.record_activity(date("2025-03-10"));
        assert_eq!(s.count, 5);
    }

    #[test]
    fn test_future_stamp_resets() {
        // Clock rollback: stored date is ahead of "today"
        let mut s = StreakState {
            count: 9,
            last_logged: Some(date("2025-03-12")),
            recent_dates: BTreeSet::new(),
        };
        s.record_activity(date("2025-03-10"));
        assert_eq!(s.count, 1);
        assert_eq!(s.last_logged, Some(date("2025-03-10")));
    }

    #[test]
    fn test_recent_dates_pruned_to_window() {
        let mut s = StreakState::default();
        s.recent_dates.insert(date("2025-02-01"));
        s.recent_dates.insert(date("2025-03-01"));
        s.record_activity(date("2025-03-10"));
        // 2025-02-24 is exactly 14 days back and would survive
        assert!(!s.recent_dates.contains(&date("2025-02-01")));
        assert!(s.recent_dates.contains(&date("2025-03-01")));
        assert!(s.recent_dates.contains(&date("2025-03-10")));
    }

    #[test]
    fn test_prune_runs_on_same_day_relog() {
        let mut s = StreakState {
            count: 1,
            last_logged: Some(date("2025-03-10")),
            recent_dates: [date("2025-02-01"), date("2025-03-10")].into_iter().collect(),
        };
        s.record_activity(date("2025-03-10"));
        assert_eq!(s.count, 1);
        assert!(!s.recent_dates.contains(&date("2025-02-01")));
    }
}
