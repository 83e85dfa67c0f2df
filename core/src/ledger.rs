use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::NutritionRecord;

/// One calendar day's accumulated intake. At most one live record
/// exists; touching it on a new date resets rather than appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMacroTotals {
    pub date: NaiveDate,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl DailyMacroTotals {
    #[must_use]
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            protein_g: 0.0,
            carbs_g: 0.0,
            fat_g: 0.0,
        }
    }

    /// Fold a record into the totals. A stale stored date is
    /// discarded, never added to: the result starts from zero and
    /// contains exactly the new values.
    #[must_use]
    pub fn added(self, today: NaiveDate, record: &NutritionRecord) -> Self {
        let mut totals = if self.date == today {
            self
        } else {
            Self::empty(today)
        };
        totals.protein_g += record.protein_g;
        totals.carbs_g += record.carbs_g;
        totals.fat_g += record.fat_g;
        totals
    }

    /// Snapshot as of `today`. Reads verify the stored date
    /// themselves, so a read on a new day before any write returns
    /// zeros rather than yesterday's totals.
    #[must_use]
    pub fn as_of(&self, today: NaiveDate) -> Self {
        if self.date == today {
            self.clone()
        } else {
            Self::empty(today)
        }
    }

    #[must_use]
    pub fn protein_for(&self, today: NaiveDate) -> f64 {
        if self.date == today { self.protein_g } else { 0.0 }
    }

    #[must_use]
    pub fn carbs_for(&self, today: NaiveDate) -> f64 {
        if self.date == today { self.carbs_g } else { 0.0 }
    }

    #[must_use]
    pub fn fat_for(&self, today: NaiveDate) -> f64 {
        if self.date == today { self.fat_g } else { 0.0 }
    }
}
