use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Remote lookup calls permitted per calendar day.
pub const DAILY_CALL_LIMIT: u32 = 150;

/// Daily call budget against the quota-limited nutrition API.
/// Rollover rule matches the ledger: a stale date means usage is
/// treated as 0 before any check or increment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiQuotaState {
    pub date: NaiveDate,
    pub calls_used: u32,
}

impl ApiQuotaState {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            calls_used: 0,
        }
    }

    #[must_use]
    pub fn usage_for(&self, today: NaiveDate) -> u32 {
        if self.date == today { self.calls_used } else { 0 }
    }

    #[must_use]
    pub fn can_call(&self, today: NaiveDate) -> bool {
        self.usage_for(today) < DAILY_CALL_LIMIT
    }

    #[must_use]
    pub fn remaining(&self, today: NaiveDate) -> u32 {
        DAILY_CALL_LIMIT.saturating_sub(self.usage_for(today))
    }

    /// Count one call, rolling over first if the date changed. Usage
    /// is capped at the limit: two callers racing through the gate on
    /// the last slot must not push the stored count past it.
    pub fn record_call(&mut self, today: NaiveDate) {
        self.calls_used = (self.usage_for(today) + 1).min(DAILY_CALL_LIMIT);
        self.date = today;
    }

    /// Unconditionally zero usage and stamp today. Invoked once per
    /// day by an external scheduler; a missed run is harmless because
    /// the rollover check catches the stale date on next use.
    pub fn reset(&mut self, today: NaiveDate) {
        self.calls_used = 0;
        self.date = today;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_fresh_state_can_call() {
        let q = ApiQuotaState::new(date("2025-03-10"));
        assert!(q.can_call(date("2025-03-10")));
        assert_eq!(q.remaining(date("2025-03-10")), DAILY_CALL_LIMIT);
    }

    #[test]
    fn test_gate_closes_at_limit() {
        let today = date("2025-03-10");
        let mut q = ApiQuotaState::new(today);
        for _ in 0..DAILY_CALL_LIMIT {
            assert!(q.can_call(today));
            q.record_call(today);
        }
        assert!(!q.can_call(today));
        assert_eq!(q.remaining(today), 0);
    }

    #[test]
    fn test_rollover_reopens_gate() {
        let monday = date("2025-03-10");
        let tuesday = date("2025-03-11");
        let mut q = ApiQuotaState::new(monday);
        for _ in 0..DAILY_CALL_LIMIT {
            q.record_call(monday);
        }
        assert!(!q.can_call(monday));
        assert!(q.can_call(tuesday));
        q.record_call(tuesday);
        assert_eq!(q.date, tuesday);
        assert_eq!(q.calls_used, 1);
    }

    #[test]
    fn test_over_limit_state_never_underflows() {
        // Stored usage can land past the limit (e.g. persisted by an
        // older build); reads must saturate, not panic
        let today = date("2025-03-10");
        let q = ApiQuotaState {
            date: today,
            calls_used: DAILY_CALL_LIMIT + 1,
        };
        assert_eq!(q.remaining(today), 0);
        assert!(!q.can_call(today));
    }

    #[test]
    fn test_record_call_caps_at_limit() {
        let today = date("2025-03-10");
        let mut q = ApiQuotaState::new(today);
        for _ in 0..DAILY_CALL_LIMIT {
            q.record_call(today);
        }
        // A racing caller that passed the gate before the count
        // landed still records; the stored usage stays at the limit
        q.record_call(today);
        assert_eq!(q.calls_used, DAILY_CALL_LIMIT);
        assert_eq!(q.remaining(today), 0);
    }

    #[test]
    fn test_reset_zeroes_and_stamps() {
        let monday = date("2025-03-10");
        let tuesday = date("2025-03-11");
        let mut q = ApiQuotaState::new(monday);
        q.record_call(monday);
        q.record_call(monday);
        q.reset(tuesday);
        assert_eq!(q.calls_used, 0);
        assert_eq!(q.date, tuesday);
    }
}
