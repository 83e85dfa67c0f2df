use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;

use crate::catalog::FoodCatalog;
use crate::db::Database;
use crate::error::{LookupError, LookupResult};
use crate::goals;
use crate::ledger::DailyMacroTotals;
use crate::models::{DietPreferences, MacroTargets, NutritionRecord, UserProfile, WeightEntry};
use crate::normalize::{self, ImageAnalysis, SearchResult};
use crate::quota::ApiQuotaState;
use crate::streak::StreakState;

/// Boundary to the remote nutrition service. Implementations own
/// transport concerns; a failure here must surface before any core
/// state mutates.
pub trait NutritionLookupProvider: Send + Sync {
    /// Free-text search. `Ok(None)` means the service responded but
    /// had no match.
    fn search(&self, query: &str) -> LookupResult<Option<SearchResult>>;

    /// Classify a meal photo.
    fn analyze_image(&self, image_ref: &str) -> LookupResult<ImageAnalysis>;
}

/// High-level operations composing the engines over one database.
pub struct NoshService {
    db: Database,
}

impl NoshService {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            db: Database::open(path)?,
        })
    }

    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn new_in_memory() -> Result<Self> {
        Ok(Self {
            db: Database::open_in_memory()?,
        })
    }

    #[must_use]
    pub fn db(&self) -> &Database {
        &self.db
    }

    // --- Meal logging ---

    /// Log an already-normalized record for `today`.
    ///
    /// First-meal flag, streak and ledger move together in one
    /// transaction; none of them applies if any write fails. A record
    /// with all-zero macros advances the streak and flag but leaves
    /// the ledger alone.
    pub fn log_meal(&self, record: &NutritionRecord, today: NaiveDate) -> Result<DailyMacroTotals> {
        self.db.transaction(|db| {
            db.mark_first_meal_logged()?;

            let mut streak = db.get_streak()?;
            streak.record_activity(today);
            db.set_streak(&streak)?;

            if record.has_macros() {
                let totals = db
                    .get_totals()?
                    .unwrap_or_else(|| DailyMacroTotals::empty(today))
                    .added(today, record);
                db.set_totals(&totals)?;
                Ok(totals)
            } else {
                Ok(db
                    .get_totals()?
                    .map_or_else(|| DailyMacroTotals::empty(today), |t| t.as_of(today)))
            }
        })
    }

    /// Today's running totals; zeros on a new day before any write.
    pub fn totals(&self, today: NaiveDate) -> Result<DailyMacroTotals> {
        Ok(self
            .db
            .get_totals()?
            .map_or_else(|| DailyMacroTotals::empty(today), |t| t.as_of(today)))
    }

    pub fn streak(&self) -> Result<StreakState> {
        self.db.get_streak()
    }

    pub fn has_logged_first_meal(&self) -> Result<bool> {
        self.db.has_logged_first_meal()
    }

    // --- Remote-driven logging paths ---

    /// Search the remote service for `query` and log the best match.
    /// The governor is consulted before the call; the call is counted
    /// and the meal logged only after a successful response.
    pub fn log_from_search(
        &self,
        provider: &dyn NutritionLookupProvider,
        query: &str,
        today: NaiveDate,
    ) -> LookupResult<NutritionRecord> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::InvalidInput("empty search query".to_string()));
        }
        self.check_quota(today)?;
        let result = provider.search(query)?;
        self.consume_quota(today)?;
        let record = result
            .and_then(normalize::search_result_to_record)
            .ok_or(LookupError::NoDataFound)?;
        self.log_meal(&record, today)?;
        Ok(record)
    }

    /// Analyze a meal photo and log the result. Image analyses always
    /// normalize to a record, so this only fails on quota, transport,
    /// or persistence.
    pub fn log_from_image(
        &self,
        provider: &dyn NutritionLookupProvider,
        image_ref: &str,
        today: NaiveDate,
    ) -> LookupResult<NutritionRecord> {
        if image_ref.trim().is_empty() {
            return Err(LookupError::InvalidInput("empty image reference".to_string()));
        }
        self.check_quota(today)?;
        let analysis = provider.analyze_image(image_ref)?;
        self.consume_quota(today)?;
        let record = normalize::image_analysis_to_record(analysis);
        self.log_meal(&record, today)?;
        Ok(record)
    }

    /// Log from the bundled offline catalog. Quota-free.
    pub fn log_from_catalog(&self, query: &str, today: NaiveDate) -> LookupResult<NutritionRecord> {
        if query.trim().is_empty() {
            return Err(LookupError::InvalidInput("empty catalog query".to_string()));
        }
        let food = FoodCatalog::bundled()
            .lookup(query)
            .ok_or(LookupError::NoDataFound)?;
        let record = normalize::catalog_hit_to_record(food);
        self.log_meal(&record, today)?;
        Ok(record)
    }

    // --- Quota ---

    pub fn quota(&self, today: NaiveDate) -> Result<ApiQuotaState> {
        Ok(self
            .db
            .get_quota()?
            .unwrap_or_else(|| ApiQuotaState::new(today)))
    }

    pub fn reset_quota(&self, today: NaiveDate) -> Result<ApiQuotaState> {
        let mut quota = self.quota(today)?;
        quota.reset(today);
        self.db.set_quota(&quota)?;
        Ok(quota)
    }

    fn check_quota(&self, today: NaiveDate) -> LookupResult<()> {
        let quota = self.quota(today)?;
        if quota.can_call(today) {
            Ok(())
        } else {
            Err(LookupError::QuotaExceeded)
        }
    }

    fn consume_quota(&self, today: NaiveDate) -> LookupResult<()> {
        let mut quota = self.quota(today)?;
        quota.record_call(today);
        self.db.set_quota(&quota)?;
        Ok(())
    }

    // --- Profile, preferences, goals, weight ---

    pub fn profile(&self) -> Result<Option<UserProfile>> {
        self.db.get_profile()
    }

    pub fn set_profile(&self, profile: &UserProfile) -> Result<()> {
        self.db.set_profile(profile)
    }

    pub fn preferences(&self) -> Result<Option<DietPreferences>> {
        self.db.get_preferences()
    }

    pub fn set_preferences(&self, prefs: &DietPreferences) -> Result<()> {
        self.db.set_preferences(prefs)
    }

    /// Targets from the stored profile and preferences; unset
    /// entities fall back to defaults, which routes through the
    /// no-biometrics calorie table.
    pub fn compute_goals(&self) -> Result<MacroTargets> {
        let profile = self.db.get_profile()?.unwrap_or_default();
        let prefs = self.db.get_preferences()?.unwrap_or_default();
        Ok(goals::compute_goals(&profile, &prefs))
    }

    /// Record today's weight. The profile's current weight and the
    /// history entry for today move together or not at all.
    pub fn set_weight(&self, today: NaiveDate, weight_kg: f64) -> Result<WeightEntry> {
        self.db.transaction(|db| {
            let entry = db.upsert_weight(today, weight_kg)?;
            let mut profile = db.get_profile()?.unwrap_or_default();
            profile.weight_kg = weight_kg;
            db.set_profile(&profile)?;
            Ok(entry)
        })
    }

    pub fn weight_history(&self) -> Result<Vec<WeightEntry>> {
        self.db.get_weight_history()
    }
}
