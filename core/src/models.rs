use std::collections::BTreeSet;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Coerce a macro value into the representable range: finite and
/// non-negative, everything else becomes 0.
#[must_use]
pub fn sanitize_macro(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// An upstream nutrient that did not map to any macro. Display only;
/// these never feed the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherNutrient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// The canonical shape every lookup source is converted into.
/// Immutable once constructed; never partially populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub title: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other_nutrients: Vec<OtherNutrient>,
}

impl NutritionRecord {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        calories: f64,
        protein_g: f64,
        carbs_g: f64,
        fat_g: f64,
    ) -> Self {
        Self {
            title: title.into(),
            calories: sanitize_macro(calories),
            protein_g: sanitize_macro(protein_g),
            carbs_g: sanitize_macro(carbs_g),
            fat_g: sanitize_macro(fat_g),
            other_nutrients: Vec::new(),
        }
    }

    /// Attach display-only nutrients that did not map to a macro.
    #[must_use]
    pub fn with_other_nutrients(mut self, nutrients: Vec<OtherNutrient>) -> Self {
        self.other_nutrients = nutrients;
        self
    }

    /// True when at least one macro is positive. All-zero records
    /// still count as logging activity but stay out of the ledger.
    #[must_use]
    pub fn has_macros(&self) -> bool {
        self.protein_g > 0.0 || self.carbs_g > 0.0 || self.fat_g > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    Male,
    Female,
    Other,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserProfile {
    pub display_name: String,
    pub weight_kg: f64,
    pub goal_weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub sex: BiologicalSex,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub photo_ref: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DietGoal {
    LoseWeight,
    #[default]
    Maintain,
    GainMuscle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    HighlyActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalPace {
    Slowly,
    #[default]
    Steadily,
    Quickly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Restriction {
    Vegetarian,
    Vegan,
    GlutenFree,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DietPreferences {
    pub goal: DietGoal,
    pub activity: ActivityLevel,
    pub pace: GoalPace,
    #[serde(default)]
    pub restrictions: BTreeSet<Restriction>,
}

/// Whole-gram targets derived from profile + preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub calories: i64,
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fat_g: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeightEntry {
    pub date: NaiveDate,
    pub weight_kg: f64,
    pub updated_at: String,
}

pub fn validate_sex(s: &str) -> Result<BiologicalSex> {
    match s.to_lowercase().as_str() {
        "male" | "m" => Ok(BiologicalSex::Male),
        "female" | "f" => Ok(BiologicalSex::Female),
        "other" => Ok(BiologicalSex::Other),
        "unknown" => Ok(BiologicalSex::Unknown),
        _ => bail!("Invalid sex '{s}'. Valid values: male, female, other, unknown"),
    }
}

pub fn validate_goal(s: &str) -> Result<DietGoal> {
    match s.to_lowercase().as_str() {
        "lose" | "lose-weight" => Ok(DietGoal::LoseWeight),
        "maintain" => Ok(DietGoal::Maintain),
        "gain" | "gain-muscle" => Ok(DietGoal::GainMuscle),
        _ => bail!("Invalid goal '{s}'. Valid values: lose, maintain, gain"),
    }
}

pub fn validate_activity(s: &str) -> Result<ActivityLevel> {
    match s.to_lowercase().as_str() {
        "sedentary" => Ok(ActivityLevel::Sedentary),
        "light" | "lightly-active" => Ok(ActivityLevel::LightlyActive),
        "moderate" | "moderately-active" => Ok(ActivityLevel::ModeratelyActive),
        "high" | "highly-active" => Ok(ActivityLevel::HighlyActive),
        _ => bail!("Invalid activity level '{s}'. Valid values: sedentary, light, moderate, high"),
    }
}

pub fn validate_pace(s: &str) -> Result<GoalPace> {
    match s.to_lowercase().as_str() {
        "slowly" | "slow" => Ok(GoalPace::Slowly),
        "steadily" | "steady" => Ok(GoalPace::Steadily),
        "quickly" | "quick" => Ok(GoalPace::Quickly),
        _ => bail!("Invalid pace '{s}'. Valid values: slowly, steadily, quickly"),
    }
}

/// Parse a list of restriction names. "none" is a UI sentinel, not a
/// stored value: choosing it clears the whole set.
pub fn validate_restrictions(names: &[String]) -> Result<BTreeSet<Restriction>> {
    let mut set = BTreeSet::new();
    for name in names {
        match name.to_lowercase().as_str() {
            "none" => return Ok(BTreeSet::new()),
            "vegetarian" => {
                set.insert(Restriction::Vegetarian);
            }
            "vegan" => {
                set.insert(Restriction::Vegan);
            }
            "gluten-free" | "glutenfree" => {
                set.insert(Restriction::GlutenFree);
            }
            _ => bail!(
                "Invalid restriction '{name}'. Valid values: vegetarian, vegan, gluten-free, none"
            ),
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sanitizes_non_finite() {
        let r = NutritionRecord::new("Soup", f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -3.0);
        assert_eq!(r.calories, 0.0);
        assert_eq!(r.protein_g, 0.0);
        assert_eq!(r.carbs_g, 0.0);
        assert_eq!(r.fat_g, 0.0);
        assert!(!r.has_macros());
    }

    #[test]
    fn test_record_keeps_positive_values() {
        let r = NutritionRecord::new("Oats", 389.0, 16.9, 66.3, 6.9);
        assert_eq!(r.calories, 389.0);
        assert_eq!(r.protein_g, 16.9);
        assert!(r.has_macros());
    }

    #[test]
    fn test_has_macros_single_positive() {
        let r = NutritionRecord::new("Egg white", 17.0, 3.6, 0.0, 0.0);
        assert!(r.has_macros());
    }

    #[test]
    fn test_validate_sex() {
        assert_eq!(validate_sex("Male").unwrap(), BiologicalSex::Male);
        assert_eq!(validate_sex("f").unwrap(), BiologicalSex::Female);
        assert!(validate_sex("robot").is_err());
    }

    #[test]
    fn test_validate_goal_and_pace() {
        assert_eq!(validate_goal("lose").unwrap(), DietGoal::LoseWeight);
        assert_eq!(validate_pace("quick").unwrap(), GoalPace::Quickly);
        assert!(validate_goal("bulk").is_err());
    }

    #[test]
    fn test_restrictions_none_sentinel_clears() {
        let set = validate_restrictions(&["vegan".into(), "none".into()]).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_restrictions_dedup() {
        let set =
            validate_restrictions(&["vegan".into(), "vegan".into(), "gluten-free".into()]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Restriction::Vegan));
        assert!(set.contains(&Restriction::GlutenFree));
    }
}
