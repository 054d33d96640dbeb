use serde::{Deserialize, Serialize};

/// Comparison key for an ingredient name: trimmed and lowercased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// One line of a dish's ingredient list, as stored in the catalog.
///
/// Stored documents are not trusted: any field may be blank and the quantity
/// may be missing. Use [`DishIngredient::is_complete`] before aggregating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DishIngredient {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub category: String,
}

impl DishIngredient {
    pub fn new(
        name: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity: Some(quantity),
            unit: unit.into(),
            category: category.into(),
        }
    }

    /// Aggregation key: normalized name and trimmed unit.
    pub fn key(&self) -> (String, String) {
        (normalize_name(&self.name), self.unit.trim().to_owned())
    }

    /// The usable quantity, if present, finite and strictly positive.
    pub fn usable_quantity(&self) -> Option<f64> {
        self.quantity.filter(|q| q.is_finite() && *q > 0.0)
    }

    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.unit.trim().is_empty()
            && !self.category.trim().is_empty()
            && self.usable_quantity().is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub category: String,
    pub servings: i64,
    pub ingredients: Vec<DishIngredient>,
}

impl Dish {
    /// Baseline yield used to scale ingredients, never below one.
    pub fn baseline_servings(&self) -> f64 {
        self.servings.max(1) as f64
    }
}
