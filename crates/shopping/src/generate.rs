use std::collections::{BTreeSet, HashMap};

use famplan_shared::{DishSource, MealPlanSource, Metadata, StockSource};
use futures::future::try_join_all;

use crate::{ShoppingList, ShoppingRequest, aggregate};

/// Loads the acting user's plans, dishes and stock, then aggregates them.
///
/// Each referenced dish is fetched once, concurrently. Any store failure
/// aborts the whole list; a dish that no longer exists does not.
pub async fn generate(
    dishes: &dyn DishSource,
    plans: &dyn MealPlanSource,
    stock: &dyn StockSource,
    metadata: &Metadata,
    request: &ShoppingRequest,
) -> famplan_shared::Result<ShoppingList> {
    let user_id = metadata.trigger_by()?;

    let (meal_plans, stock_items) = futures::try_join!(
        plans.meal_plans(&user_id, &request.range, request.outstanding_only),
        stock.stock_items(&user_id),
    )?;

    let dish_ids = meal_plans
        .iter()
        .map(|plan| plan.dish_id.as_str())
        .collect::<BTreeSet<_>>();

    let found = try_join_all(
        dish_ids
            .into_iter()
            .map(|id| dishes.find_dish(&user_id, id)),
    )
    .await?;

    let dishes_by_id = found
        .into_iter()
        .flatten()
        .map(|dish| (dish.id.to_owned(), dish))
        .collect::<HashMap<_, _>>();

    let list = aggregate(request, &meal_plans, &dishes_by_id, &stock_items);

    tracing::info!(
        user_id = %user_id,
        start = %request.range.start(),
        end = %request.range.end(),
        plans = list.plans_considered,
        skipped_plans = list.skipped_plans,
        entries = list.len(),
        "shopping list generated"
    );

    Ok(list)
}
