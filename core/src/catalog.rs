use std::sync::OnceLock;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One canonical food in the bundled offline dataset, macros per
/// typical serving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFood {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Offline food lookup table: a zero-cost, quota-free alternative to
/// the remote API. Static after load.
#[derive(Debug, Default)]
pub struct FoodCatalog {
    foods: Vec<CatalogFood>,
}

static BUNDLED: OnceLock<FoodCatalog> = OnceLock::new();

impl FoodCatalog {
    /// The dataset compiled into the binary, parsed once per process.
    /// A malformed dataset yields an empty catalog, not an error.
    pub fn bundled() -> &'static FoodCatalog {
        BUNDLED.get_or_init(|| {
            Self::from_json(include_str!("../data/catalog.json")).unwrap_or_default()
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let foods: Vec<CatalogFood> = serde_json::from_str(json)?;
        Ok(Self { foods })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.foods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// Tiered lookup, first hit wins: name exact, name contains
    /// query, alias exact, alias contains query, query contains name,
    /// query contains alias. Query is trimmed and lowercased.
    #[must_use]
    pub fn lookup(&self, query: &str) -> Option<&CatalogFood> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return None;
        }

        self.find(|name| name == q)
            .or_else(|| self.find(|name| name.contains(&q)))
            .or_else(|| self.find_alias(|alias| alias == q))
            .or_else(|| self.find_alias(|alias| alias.contains(&q)))
            .or_else(|| self.find(|name| q.contains(name)))
            .or_else(|| self.find_alias(|alias| q.contains(alias)))
    }

    fn find(&self, pred: impl Fn(&str) -> bool) -> Option<&CatalogFood> {
        self.foods.iter().find(|f| pred(&f.name.to_lowercase()))
    }

    fn find_alias(&self, pred: impl Fn(&str) -> bool) -> Option<&CatalogFood> {
        self.foods
            .iter()
            .find(|f| f.aliases.iter().any(|a| pred(&a.to_lowercase())))
    }
}
