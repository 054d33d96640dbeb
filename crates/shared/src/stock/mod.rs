use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::dish::normalize_name;

/// Threshold applied when an item has no threshold of its own.
pub const DEFAULT_LOW_STOCK_THRESHOLD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    Low,
    Available,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
    pub low_stock_threshold: Option<f64>,
}

impl StockItem {
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    pub fn status(&self) -> StockStatus {
        let threshold = self
            .low_stock_threshold
            .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);

        if self.quantity <= 0.0 {
            StockStatus::OutOfStock
        } else if self.quantity <= threshold {
            StockStatus::Low
        } else {
            StockStatus::Available
        }
    }
}
