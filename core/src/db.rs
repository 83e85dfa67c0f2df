use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ledger::DailyMacroTotals;
use crate::models::{DietPreferences, UserProfile, WeightEntry};
use crate::quota::ApiQuotaState;
use crate::streak::StreakState;

// app_state document keys
const KEY_PROFILE: &str = "profile";
const KEY_PREFERENCES: &str = "preferences";
const KEY_TOTALS: &str = "daily_totals";
const KEY_STREAK: &str = "streak";
const KEY_QUOTA: &str = "api_quota";
const KEY_FIRST_MEAL: &str = "has_logged_first_meal";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS app_state (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS weight_entries (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    date TEXT NOT NULL UNIQUE,
                    weight_kg REAL NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_weight_entries_date ON weight_entries(date);

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    /// Run `f` inside a single transaction. Rolls back on error, so a
    /// reader never observes a half-applied update.
    pub fn transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let result = f(self)?;
        tx.commit()?;
        Ok(result)
    }

    // --- Generic JSON-document state ---

    fn get_doc<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        match value {
            Some(json) => {
                let doc = serde_json::from_str(&json)
                    .with_context(|| format!("Corrupt state document '{key}'"))?;
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    fn set_doc<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        let now = Local::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO app_state (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
            params![key, json, now],
        )?;
        Ok(())
    }

    // --- Typed accessors ---

    pub fn get_profile(&self) -> Result<Option<UserProfile>> {
        self.get_doc(KEY_PROFILE)
    }

    pub fn set_profile(&self, profile: &UserProfile) -> Result<()> {
        self.set_doc(KEY_PROFILE, profile)
    }

    pub fn get_preferences(&self) -> Result<Option<DietPreferences>> {
        self.get_doc(KEY_PREFERENCES)
    }

    pub fn set_preferences(&self, prefs: &DietPreferences) -> Result<()> {
        self.set_doc(KEY_PREFERENCES, prefs)
    }

    pub fn get_totals(&self) -> Result<Option<DailyMacroTotals>> {
        self.get_doc(KEY_TOTALS)
    }

    pub fn set_totals(&self, totals: &DailyMacroTotals) -> Result<()> {
        self.set_doc(KEY_TOTALS, totals)
    }

    pub fn get_streak(&self) -> Result<StreakState> {
        Ok(self.get_doc(KEY_STREAK)?.unwrap_or_default())
    }

    pub fn set_streak(&self, streak: &StreakState) -> Result<()> {
        self.set_doc(KEY_STREAK, streak)
    }

    pub fn get_quota(&self) -> Result<Option<ApiQuotaState>> {
        self.get_doc(KEY_QUOTA)
    }

    pub fn set_quota(&self, quota: &ApiQuotaState) -> Result<()> {
        self.set_doc(KEY_QUOTA, quota)
    }

    pub fn has_logged_first_meal(&self) -> Result<bool> {
        Ok(self.get_doc(KEY_FIRST_MEAL)?.unwrap_or(false))
    }

    pub fn mark_first_meal_logged(&self) -> Result<()> {
        self.set_doc(KEY_FIRST_MEAL, &true)
    }

    // --- Weight history ---

    pub fn upsert_weight(&self, date: NaiveDate, weight_kg: f64) -> Result<WeightEntry> {
        let now = Local::now().to_rfc3339();
        let date_str = date.format("%Y-%m-%d").to_string();
        self.conn.execute(
            "INSERT INTO weight_entries (date, weight_kg, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(date) DO UPDATE SET
                weight_kg = excluded.weight_kg,
                updated_at = excluded.updated_at",
            params![date_str, weight_kg, now, now],
        )?;
        self.get_weight(date)?
            .context("Weight entry not found after upsert")
    }

    pub fn get_weight(&self, date: NaiveDate) -> Result<Option<WeightEntry>> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let mut stmt = self.conn.prepare(
            "SELECT date, weight_kg, updated_at FROM weight_entries WHERE date = ?1",
        )?;
        let mut rows = stmt.query(params![date_str])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Self::weight_entry_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// Full history, ascending by date.
    pub fn get_weight_history(&self) -> Result<Vec<WeightEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, weight_kg, updated_at FROM weight_entries ORDER BY date ASC",
        )?;
        let entries = stmt
            .query_map([], Self::weight_entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn weight_entry_from_row(row: &rusqlite::Row) -> rusqlite::Result<WeightEntry> {
        let date_str: String = row.get(0)?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date"));
        Ok(WeightEntry {
            date,
            weight_kg: row.get(1)?,
            updated_at: row.get(2)?,
        })
    }
}
