use serde::{Deserialize, Deserializer};

use crate::catalog::CatalogFood;
use crate::models::{NutritionRecord, OtherNutrient};

/// The three upstream shapes a meal can be logged from. Closed set:
/// each variant has exactly one normalization path.
#[derive(Debug)]
pub enum LookupSource {
    Search(SearchResult),
    Image(ImageAnalysis),
    Catalog(CatalogFood),
}

/// Normalize any lookup source into the canonical record. `None`
/// means no usable nutrition data; absence is not an error.
#[must_use]
pub fn normalize(source: LookupSource) -> Option<NutritionRecord> {
    match source {
        LookupSource::Search(result) => search_result_to_record(result),
        LookupSource::Image(analysis) => Some(image_analysis_to_record(analysis)),
        LookupSource::Catalog(food) => Some(catalog_hit_to_record(&food)),
    }
}

// --- Structured search / analyzed-recipe shape ---

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    pub nutrition: Option<NutritionBlock>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NutritionBlock {
    #[serde(default)]
    pub nutrients: Vec<Nutrient>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Nutrient {
    pub name: String,
    #[serde(default, deserialize_with = "de_flexible_f64")]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
}

const CALORIE_NAMES: &[&str] = &["calories", "energy"];
const PROTEIN_NAMES: &[&str] = &["protein"];
const CARB_NAMES: &[&str] = &["carbohydrates", "carbs"];
const FAT_NAMES: &[&str] = &["fat", "total fat"];

fn nutrient_amount(nutrients: &[Nutrient], names: &[&str]) -> f64 {
    nutrients
        .iter()
        .find(|n| names.iter().any(|name| n.name.eq_ignore_ascii_case(name)))
        .map_or(0.0, |n| n.amount)
}

/// Requires a nutrition block; a result without one yields no record,
/// so the orchestrator never logs a meal with unknown macros.
/// Nutrients that match no macro ride along on the record for
/// display.
#[must_use]
pub fn search_result_to_record(result: SearchResult) -> Option<NutritionRecord> {
    let block = result.nutrition?;
    Some(
        NutritionRecord::new(
            result.title,
            nutrient_amount(&block.nutrients, CALORIE_NAMES),
            nutrient_amount(&block.nutrients, PROTEIN_NAMES),
            nutrient_amount(&block.nutrients, CARB_NAMES),
            nutrient_amount(&block.nutrients, FAT_NAMES),
        )
        .with_other_nutrients(unmatched_nutrients(&block)),
    )
}

/// Nutrients that did not map to any macro. Retained for display
/// only; they never feed the ledger.
#[must_use]
pub fn unmatched_nutrients(block: &NutritionBlock) -> Vec<OtherNutrient> {
    block
        .nutrients
        .iter()
        .filter(|n| {
            ![CALORIE_NAMES, PROTEIN_NAMES, CARB_NAMES, FAT_NAMES]
                .iter()
                .any(|names| names.iter().any(|name| n.name.eq_ignore_ascii_case(name)))
        })
        .map(|n| OtherNutrient {
            name: n.name.clone(),
            amount: n.amount,
            unit: n.unit.clone(),
        })
        .collect()
}

// --- Image-classification shape ---

#[derive(Debug, Deserialize)]
pub struct ImageAnalysis {
    pub category: Option<ImageCategory>,
    #[serde(default)]
    pub recipes: Vec<RecipeCandidate>,
    pub nutrition: Option<ImageNutrition>,
}

#[derive(Debug, Deserialize)]
pub struct ImageCategory {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RecipeCandidate {
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImageNutrition {
    pub calories: Option<NutrientAmount>,
    pub fat: Option<NutrientAmount>,
    pub protein: Option<NutrientAmount>,
    pub carbs: Option<NutrientAmount>,
}

#[derive(Debug, Deserialize)]
pub struct NutrientAmount {
    #[serde(default, deserialize_with = "de_flexible_f64")]
    pub value: f64,
    #[serde(default)]
    pub unit: String,
}

fn amount_value(amount: Option<&NutrientAmount>) -> f64 {
    amount.map_or(0.0, |a| a.value)
}

/// Image analyses always yield a record: every field is optional
/// upstream and each macro is read independently, defaulting to 0.
/// Title resolution: classified category, else the first candidate
/// recipe, else "Analyzed dish".
#[must_use]
pub fn image_analysis_to_record(analysis: ImageAnalysis) -> NutritionRecord {
    let title = analysis
        .category
        .map(|c| c.name)
        .or_else(|| analysis.recipes.into_iter().next().map(|r| r.title))
        .unwrap_or_else(|| "Analyzed dish".to_string());
    let nutrition = analysis.nutrition.unwrap_or_default();
    NutritionRecord::new(
        title,
        amount_value(nutrition.calories.as_ref()),
        amount_value(nutrition.protein.as_ref()),
        amount_value(nutrition.carbs.as_ref()),
        amount_value(nutrition.fat.as_ref()),
    )
}

// --- Catalog shape ---

#[must_use]
pub fn catalog_hit_to_record(food: &CatalogFood) -> NutritionRecord {
    NutritionRecord::new(
        food.name.clone(),
        food.calories,
        food.protein_g,
        food.carbs_g,
        food.fat_g,
    )
}

/// Accept a JSON number or a number encoded as a JSON string.
/// Malformed strings decode as 0 rather than failing the whole
/// payload.
fn de_flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct Flexible;

    impl serde::de::Visitor<'_> for Flexible {
        type Value = f64;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("a number or a string containing a number")
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        #[allow(clippy::cast_precision_loss)]
        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        #[allow(clippy::cast_precision_loss)]
        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<f64, E> {
            Ok(v.trim().parse().unwrap_or(0.0))
        }
    }

    deserializer.deserialize_any(Flexible)
}
