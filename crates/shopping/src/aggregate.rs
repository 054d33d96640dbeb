use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use famplan_shared::{
    DateRange, category_or_other,
    dish::Dish,
    mealplan::{MealPlan, MealType},
    stock::StockItem,
};
use serde::Serialize;
use strum::{AsRefStr, Display};
use time::Date;

/// Which meal plans a shopping list covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShoppingRequest {
    pub range: DateRange,
    /// Ignore meals already marked as prepared.
    pub outstanding_only: bool,
}

impl ShoppingRequest {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            outstanding_only: false,
        }
    }

    pub fn outstanding_only(mut self, value: bool) -> Self {
        self.outstanding_only = value;
        self
    }

    pub fn covers(&self, plan: &MealPlan) -> bool {
        self.range.contains(plan.date) && !(self.outstanding_only && plan.prepared)
    }
}

/// One planned meal's contribution to an entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provenance {
    pub meal_plan_id: String,
    pub dish_id: String,
    pub dish_name: String,
    pub date: Date,
    pub meal_type: MealType,
    pub quantity: f64,
}

/// Stock exists under the same name but in other units, so it was not
/// subtracted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitMismatch {
    pub stock_units: Vec<String>,
}

impl fmt::Display for UnitMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "different units in stock ({})", self.stock_units.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingListEntry {
    /// Trimmed name of the first ingredient line contributing to the entry.
    pub name: String,
    pub unit: String,
    pub category: String,
    pub required_quantity: f64,
    /// Matching stock subtracted from the requirement, `None` when nothing
    /// matched on name and unit.
    pub stock_quantity: Option<f64>,
    pub quantity_to_buy: f64,
    pub sources: Vec<Provenance>,
    pub warning: Option<UnitMismatch>,
}

impl ShoppingListEntry {
    /// Quantity to buy rounded to two decimals.
    pub fn display_quantity(&self) -> f64 {
        round2(self.quantity_to_buy)
    }

    /// Display quantity without trailing zeros (`2`, `0.5`, `1.25`). Entries
    /// rounding to zero are dropped by [`aggregate`], so this is never `0`.
    pub fn formatted_quantity(&self) -> String {
        let formatted = format!("{:.2}", self.display_quantity());
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub name: String,
    pub entries: Vec<ShoppingListEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShoppingListStatus {
    NoMealsPlanned,
    FullyStocked,
    ToBuy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingList {
    pub range: DateRange,
    /// Plans inside the request, including those whose dish is gone.
    pub plans_considered: usize,
    /// Plans whose dish could not be found.
    pub skipped_plans: usize,
    /// Ingredient lines ignored because a field was missing or unusable.
    pub skipped_ingredients: usize,
    pub categories: Vec<CategoryGroup>,
}

impl ShoppingList {
    pub fn status(&self) -> ShoppingListStatus {
        if self.plans_considered == 0 {
            ShoppingListStatus::NoMealsPlanned
        } else if self.categories.is_empty() {
            ShoppingListStatus::FullyStocked
        } else {
            ShoppingListStatus::ToBuy
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &ShoppingListEntry> {
        self.categories.iter().flat_map(|group| group.entries.iter())
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|group| group.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Default)]
struct Requirement {
    name: String,
    category: String,
    quantity: f64,
    sources: Vec<Provenance>,
}

/// Sums the ingredients needed by the plans in `request`, scaled by planned
/// servings, and subtracts matching stock. Entries left with nothing to buy
/// are dropped.
///
/// Missing dishes and malformed ingredient lines are skipped and counted,
/// they never fail the whole list.
pub fn aggregate(
    request: &ShoppingRequest,
    plans: &[MealPlan],
    dishes_by_id: &HashMap<String, Dish>,
    stock: &[StockItem],
) -> ShoppingList {
    let mut requirements: BTreeMap<(String, String), Requirement> = BTreeMap::new();
    let mut plans_considered = 0;
    let mut skipped_plans = 0;
    let mut skipped_ingredients = 0;

    for plan in plans.iter().filter(|plan| request.covers(plan)) {
        plans_considered += 1;

        let Some(dish) = dishes_by_id.get(&plan.dish_id) else {
            tracing::warn!(
                meal_plan_id = %plan.id,
                dish_id = %plan.dish_id,
                "dish not found, meal plan skipped"
            );
            skipped_plans += 1;
            continue;
        };

        let multiplier = plan.effective_servings() / dish.baseline_servings();

        for ingredient in &dish.ingredients {
            let Some(quantity) = ingredient.usable_quantity().filter(|_| ingredient.is_complete())
            else {
                tracing::debug!(
                    dish_id = %dish.id,
                    ingredient = %ingredient.name,
                    "malformed ingredient skipped"
                );
                skipped_ingredients += 1;
                continue;
            };

            let contribution = quantity * multiplier;
            let requirement = requirements.entry(ingredient.key()).or_default();
            if requirement.name.is_empty() {
                requirement.name = ingredient.name.trim().to_owned();
            }
            if requirement.category.is_empty() {
                requirement.category = ingredient.category.trim().to_owned();
            }
            requirement.quantity += contribution;
            requirement.sources.push(Provenance {
                meal_plan_id: plan.id.to_owned(),
                dish_id: dish.id.to_owned(),
                dish_name: dish.name.to_owned(),
                date: plan.date,
                meal_type: plan.meal_type,
                quantity: contribution,
            });
        }
    }

    let mut stock_by_name: HashMap<String, Vec<&StockItem>> = HashMap::new();
    for item in stock {
        stock_by_name
            .entry(item.normalized_name())
            .or_default()
            .push(item);
    }

    let mut groups: BTreeMap<String, Vec<ShoppingListEntry>> = BTreeMap::new();

    // BTreeMap iteration keeps entries sorted by normalized name then unit.
    for ((name, unit), requirement) in requirements {
        let (stock_quantity, warning) = match stock_by_name.get(&name) {
            None => (None, None),
            Some(items) => {
                let matching = items
                    .iter()
                    .filter(|item| item.unit.trim() == unit)
                    .collect::<Vec<_>>();

                if matching.is_empty() {
                    let mut stock_units = items
                        .iter()
                        .map(|item| item.unit.trim().to_owned())
                        .collect::<Vec<_>>();
                    stock_units.sort();
                    stock_units.dedup();

                    tracing::warn!(
                        ingredient = %name,
                        unit = %unit,
                        stock_units = ?stock_units,
                        "unit mismatch with stock, full quantity kept"
                    );

                    (None, Some(UnitMismatch { stock_units }))
                } else {
                    let on_hand = matching
                        .iter()
                        .map(|item| item.quantity)
                        .filter(|quantity| quantity.is_finite())
                        .sum::<f64>()
                        .max(0.0);

                    (Some(on_hand), None)
                }
            }
        };

        // Summed fractions leave residue like 5.55e-17, judge on what is shown.
        let quantity_to_buy = requirement.quantity - stock_quantity.unwrap_or_default();
        if round2(quantity_to_buy) <= 0.0 {
            continue;
        }

        let category = category_or_other(&requirement.category).to_owned();
        groups
            .entry(category.to_owned())
            .or_default()
            .push(ShoppingListEntry {
                name: requirement.name,
                unit,
                category,
                required_quantity: requirement.quantity,
                stock_quantity,
                quantity_to_buy,
                sources: requirement.sources,
                warning,
            });
    }

    ShoppingList {
        range: request.range,
        plans_considered,
        skipped_plans,
        skipped_ingredients,
        categories: groups
            .into_iter()
            .map(|(name, entries)| CategoryGroup { name, entries })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use famplan_shared::dish::DishIngredient;
    use time::macros::date;

    fn range() -> DateRange {
        DateRange::new(date!(2025 - 03 - 03), date!(2025 - 03 - 09)).unwrap()
    }

    fn ndole() -> Dish {
        Dish {
            id: "ndole".to_owned(),
            user_id: "john".to_owned(),
            name: "Ndolé".to_owned(),
            category: "Plat".to_owned(),
            servings: 4,
            ingredients: vec![DishIngredient::new("poisson", 2.0, "kg", "Poissons")],
        }
    }

    fn eru() -> Dish {
        Dish {
            id: "eru".to_owned(),
            user_id: "john".to_owned(),
            name: "Eru".to_owned(),
            category: "Plat".to_owned(),
            servings: 2,
            ingredients: vec![
                DishIngredient::new("Feuilles d'eru", 300.0, "g", "Légumes"),
                DishIngredient::new("Huile de palme", 0.25, "L", "Épicerie"),
                DishIngredient::new(" Poisson ", 1.0, "kg", "Poissons"),
            ],
        }
    }

    fn dishes() -> HashMap<String, Dish> {
        [ndole(), eru()]
            .into_iter()
            .map(|dish| (dish.id.to_owned(), dish))
            .collect()
    }

    fn plan(id: &str, date: Date, dish_id: &str, planned_servings: i64) -> MealPlan {
        MealPlan {
            id: id.to_owned(),
            user_id: "john".to_owned(),
            date,
            meal_type: MealType::Dinner,
            dish_id: dish_id.to_owned(),
            planned_servings,
            prepared: false,
            prepared_at: None,
        }
    }

    fn stock(name: &str, quantity: f64, unit: &str) -> StockItem {
        StockItem {
            id: name.to_owned(),
            user_id: "john".to_owned(),
            name: name.to_owned(),
            quantity,
            unit: unit.to_owned(),
            category: "Poissons".to_owned(),
            low_stock_threshold: None,
        }
    }

    #[test]
    fn test_ndole_scenario() {
        let plans = vec![plan("1", date!(2025 - 03 - 04), "ndole", 6)];
        let list = aggregate(
            &ShoppingRequest::new(range()),
            &plans,
            &dishes(),
            &[stock("Poisson", 1.0, "kg")],
        );

        assert_eq!(list.status(), ShoppingListStatus::ToBuy);
        assert_eq!(list.len(), 1);
        let entry = list.entries().next().unwrap();
        assert_eq!(entry.name, "poisson");
        assert_eq!(entry.unit, "kg");
        assert_eq!(entry.category, "Poissons");
        assert_eq!(entry.required_quantity, 3.0);
        assert_eq!(entry.stock_quantity, Some(1.0));
        assert_eq!(entry.display_quantity(), 2.0);
        assert_eq!(entry.warning, None);
        assert_eq!(entry.sources.len(), 1);
        assert_eq!(entry.sources[0].dish_name, "Ndolé");
        assert_eq!(entry.sources[0].quantity, 3.0);
    }

    #[test]
    fn test_unit_mismatch_keeps_full_quantity() {
        let plans = vec![plan("1", date!(2025 - 03 - 04), "ndole", 6)];
        let list = aggregate(
            &ShoppingRequest::new(range()),
            &plans,
            &dishes(),
            &[stock("Poisson", 1000.0, "g")],
        );

        let entry = list.entries().next().unwrap();
        assert_eq!(entry.display_quantity(), 3.0);
        assert_eq!(entry.stock_quantity, None);
        let warning = entry.warning.as_ref().unwrap();
        assert_eq!(warning.stock_units, vec!["g"]);
        assert_eq!(warning.to_string(), "different units in stock (g)");
    }

    #[test]
    fn test_matching_servings_requires_listed_quantity() {
        let plans = vec![plan("1", date!(2025 - 03 - 04), "ndole", 4)];
        let list = aggregate(&ShoppingRequest::new(range()), &plans, &dishes(), &[]);

        let entry = list.entries().next().unwrap();
        assert_eq!(entry.required_quantity, 2.0);
        assert_eq!(entry.quantity_to_buy, 2.0);
        assert_eq!(entry.stock_quantity, None);
    }

    #[test]
    fn test_sufficient_stock_drops_entry() {
        let plans = vec![plan("1", date!(2025 - 03 - 04), "ndole", 6)];
        let list = aggregate(
            &ShoppingRequest::new(range()),
            &plans,
            &dishes(),
            &[stock("POISSON", 2.0, "kg"), stock("poisson", 1.0, "kg")],
        );

        assert!(list.is_empty());
        assert_eq!(list.status(), ShoppingListStatus::FullyStocked);
        assert_eq!(list.plans_considered, 1);
    }

    #[test]
    fn test_deleted_dish_is_skipped() {
        let plans = vec![
            plan("1", date!(2025 - 03 - 04), "gone", 4),
            plan("2", date!(2025 - 03 - 05), "ndole", 4),
        ];
        let list = aggregate(&ShoppingRequest::new(range()), &plans, &dishes(), &[]);

        assert_eq!(list.plans_considered, 2);
        assert_eq!(list.skipped_plans, 1);
        assert_eq!(list.len(), 1);
        assert_eq!(list.entries().next().unwrap().quantity_to_buy, 2.0);
    }

    #[test]
    fn test_zero_servings_count_as_one() {
        let plans = vec![plan("1", date!(2025 - 03 - 04), "ndole", 0)];
        let list = aggregate(&ShoppingRequest::new(range()), &plans, &dishes(), &[]);

        assert_eq!(list.entries().next().unwrap().required_quantity, 0.5);
    }

    #[test]
    fn test_sums_across_dishes_and_keeps_sorted_partition() {
        let plans = vec![
            plan("1", date!(2025 - 03 - 04), "ndole", 4),
            plan("2", date!(2025 - 03 - 05), "eru", 4),
        ];
        let list = aggregate(&ShoppingRequest::new(range()), &plans, &dishes(), &[]);

        let categories = list
            .categories
            .iter()
            .map(|group| group.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(categories, vec!["Légumes", "Poissons", "Épicerie"]);

        let poisson = &list.categories[1].entries[0];
        assert_eq!(poisson.name, "poisson");
        assert_eq!(list.categories[2].entries[0].name, "Huile de palme");
        assert_eq!(poisson.required_quantity, 4.0);
        assert_eq!(poisson.sources.len(), 2);

        assert_eq!(list.categories[0].entries[0].required_quantity, 600.0);
        assert_eq!(list.categories[2].entries[0].formatted_quantity(), "0.5");
        assert!(list.categories.iter().all(|group| {
            group.entries.iter().all(|entry| entry.category == group.name)
                && group.entries.is_sorted_by(|a, b| {
                    (a.name.to_lowercase(), &a.unit) <= (b.name.to_lowercase(), &b.unit)
                })
        }));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_deficits_are_additive_over_disjoint_plans() {
        let first = vec![plan("1", date!(2025 - 03 - 04), "ndole", 3)];
        let second = vec![plan("2", date!(2025 - 03 - 06), "eru", 5)];
        let both = [first.clone(), second.clone()].concat();
        let request = ShoppingRequest::new(range());

        let quantity = |plans: &[MealPlan]| {
            aggregate(&request, plans, &dishes(), &[])
                .entries()
                .find(|entry| entry.name.eq_ignore_ascii_case("poisson"))
                .map(|entry| entry.quantity_to_buy)
                .unwrap_or_default()
        };

        assert_eq!(quantity(&both), quantity(&first) + quantity(&second));
    }

    #[test]
    fn test_range_and_outstanding_filters() {
        let mut prepared = plan("2", date!(2025 - 03 - 05), "ndole", 4);
        prepared.prepared = true;
        let plans = vec![
            plan("1", date!(2025 - 03 - 02), "ndole", 4),
            prepared,
            plan("3", date!(2025 - 03 - 09), "ndole", 4),
            plan("4", date!(2025 - 03 - 10), "ndole", 4),
        ];

        let list = aggregate(&ShoppingRequest::new(range()), &plans, &dishes(), &[]);
        assert_eq!(list.plans_considered, 2);
        assert_eq!(list.entries().next().unwrap().quantity_to_buy, 4.0);

        let request = ShoppingRequest::new(range()).outstanding_only(true);
        let list = aggregate(&request, &plans, &dishes(), &[]);
        assert_eq!(list.plans_considered, 1);
        assert_eq!(list.entries().next().unwrap().sources[0].meal_plan_id, "3");
    }

    #[test]
    fn test_malformed_ingredients_are_skipped() {
        let mut dish = ndole();
        dish.ingredients.push(DishIngredient {
            name: "sel".to_owned(),
            quantity: None,
            unit: "g".to_owned(),
            category: "Épicerie".to_owned(),
        });
        dish.ingredients
            .push(DishIngredient::new("piment", 2.0, "", "Épicerie"));
        dish.ingredients
            .push(DishIngredient::new("ail", -1.0, "gousse", "Légumes"));
        let dishes = HashMap::from([(dish.id.to_owned(), dish)]);

        let plans = vec![plan("1", date!(2025 - 03 - 04), "ndole", 4)];
        let list = aggregate(&ShoppingRequest::new(range()), &plans, &dishes, &[]);

        assert_eq!(list.skipped_ingredients, 3);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_first_contributor_name_is_kept() {
        let plans = vec![
            plan("1", date!(2025 - 03 - 04), "eru", 2),
            plan("2", date!(2025 - 03 - 05), "ndole", 4),
        ];
        let list = aggregate(&ShoppingRequest::new(range()), &plans, &dishes(), &[]);

        let poisson = list
            .entries()
            .find(|entry| entry.unit == "kg")
            .unwrap();
        assert_eq!(poisson.name, "Poisson");
        assert_eq!(poisson.required_quantity, 3.0);
        assert_eq!(poisson.sources.len(), 2);
    }

    #[test]
    fn test_fractional_residue_counts_as_stocked() {
        let dish = Dish {
            servings: 1,
            ingredients: vec![DishIngredient::new("poisson", 0.1, "kg", "Poissons")],
            ..ndole()
        };
        let dishes = HashMap::from([(dish.id.to_owned(), dish)]);
        let plans = vec![
            plan("1", date!(2025 - 03 - 04), "ndole", 1),
            plan("2", date!(2025 - 03 - 05), "ndole", 1),
            plan("3", date!(2025 - 03 - 06), "ndole", 1),
        ];

        let list = aggregate(
            &ShoppingRequest::new(range()),
            &plans,
            &dishes,
            &[stock("poisson", 0.3, "kg")],
        );

        assert!(list.is_empty());
        assert_eq!(list.status(), ShoppingListStatus::FullyStocked);

        let list = aggregate(
            &ShoppingRequest::new(range()),
            &plans,
            &dishes,
            &[stock("poisson", 0.2, "kg")],
        );
        assert_eq!(list.len(), 1);
        assert_eq!(list.entries().next().unwrap().formatted_quantity(), "0.1");
    }

    #[test]
    fn test_no_plans() {
        let list = aggregate(&ShoppingRequest::new(range()), &[], &dishes(), &[]);
        assert_eq!(list.status(), ShoppingListStatus::NoMealsPlanned);
    }

    #[test]
    fn test_display_quantity_rounds() {
        let dish = Dish {
            servings: 3,
            ..ndole()
        };
        let dishes = HashMap::from([(dish.id.to_owned(), dish)]);
        let plans = vec![plan("1", date!(2025 - 03 - 04), "ndole", 1)];
        let list = aggregate(&ShoppingRequest::new(range()), &plans, &dishes, &[]);

        let entry = list.entries().next().unwrap();
        assert_eq!(entry.display_quantity(), 0.67);
        assert_eq!(entry.formatted_quantity(), "0.67");
    }
}
