use crate::{DateRange, dish::Dish, mealplan::MealPlan, stock::StockItem};

/// Read access to the dish catalog.
#[async_trait::async_trait]
pub trait DishSource: Send + Sync {
    async fn find_dish(&self, user_id: &str, id: &str) -> crate::Result<Option<Dish>>;
}

/// Read access to planned meals.
#[async_trait::async_trait]
pub trait MealPlanSource: Send + Sync {
    /// Plans of `user_id` dated within `range`, restricted to meals not yet
    /// prepared when `outstanding_only` is set.
    async fn meal_plans(
        &self,
        user_id: &str,
        range: &DateRange,
        outstanding_only: bool,
    ) -> crate::Result<Vec<MealPlan>>;
}

/// Read access to the pantry.
#[async_trait::async_trait]
pub trait StockSource: Send + Sync {
    async fn stock_items(&self, user_id: &str) -> crate::Result<Vec<StockItem>>;
}
