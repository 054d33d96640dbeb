use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::Date;

#[derive(
    EnumString,
    Display,
    AsRefStr,
    VariantArray,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    #[default]
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Brunch,
}

impl MealType {
    /// Position of the slot within a day, used to order a day's meals.
    pub fn slot_order(&self) -> u8 {
        match self {
            MealType::Breakfast => 0,
            MealType::Brunch => 1,
            MealType::Lunch => 2,
            MealType::Snack => 3,
            MealType::Dinner => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: String,
    pub user_id: String,
    pub date: Date,
    pub meal_type: MealType,
    pub dish_id: String,
    pub planned_servings: i64,
    pub prepared: bool,
    pub prepared_at: Option<i64>,
}

impl MealPlan {
    /// Servings used for scaling. Zero or negative counts fall back to one so
    /// that a planned meal always contributes its ingredients.
    pub fn effective_servings(&self) -> f64 {
        if self.planned_servings > 0 {
            self.planned_servings as f64
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use time::macros::date;

    #[test]
    fn test_meal_type_string_forms() {
        assert_eq!(MealType::Breakfast.to_string(), "breakfast");
        assert_eq!(MealType::from_str("Dinner").unwrap(), MealType::Dinner);
        assert_eq!(MealType::from_str("brunch").unwrap(), MealType::Brunch);
        assert!(MealType::from_str("supper").is_err());
    }

    #[test]
    fn test_slot_order_is_chronological() {
        let mut slots = MealType::VARIANTS.to_vec();
        slots.sort_by_key(MealType::slot_order);
        assert_eq!(
            slots,
            vec![
                MealType::Breakfast,
                MealType::Brunch,
                MealType::Lunch,
                MealType::Snack,
                MealType::Dinner
            ]
        );
    }

    #[test]
    fn test_effective_servings() {
        let mut plan = MealPlan {
            id: "1".to_owned(),
            user_id: "john".to_owned(),
            date: date!(2025 - 03 - 04),
            meal_type: MealType::Dinner,
            dish_id: "ndole".to_owned(),
            planned_servings: 6,
            prepared: false,
            prepared_at: None,
        };
        assert_eq!(plan.effective_servings(), 6.0);
        plan.planned_servings = 0;
        assert_eq!(plan.effective_servings(), 1.0);
        plan.planned_servings = -2;
        assert_eq!(plan.effective_servings(), 1.0);
    }
}
