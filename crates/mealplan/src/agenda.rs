use std::{collections::HashMap, fmt};

use famplan_shared::{
    DateRange,
    dish::Dish,
    mealplan::{MealPlan, MealType},
};
use serde::Serialize;
use time::Date;

pub const DELETED_DISH_LABEL: &str = "deleted dish";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaMeal {
    pub meal_plan_id: String,
    pub meal_type: MealType,
    pub dish_name: String,
    pub planned_servings: i64,
    pub prepared: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaDay {
    pub date: Date,
    pub meals: Vec<AgendaMeal>,
}

/// Day by day view of a planned week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Agenda {
    pub range: DateRange,
    pub days: Vec<AgendaDay>,
}

impl Agenda {
    /// Monday to Sunday of the week containing `date`. Plans outside that
    /// week are ignored.
    pub fn week(date: Date, plans: &[MealPlan], dishes: &HashMap<String, Dish>) -> Self {
        let range = DateRange::week_of(date);
        let days = range
            .days()
            .map(|day| {
                let mut meals = plans
                    .iter()
                    .filter(|plan| plan.date == day)
                    .map(|plan| AgendaMeal {
                        meal_plan_id: plan.id.to_owned(),
                        meal_type: plan.meal_type,
                        dish_name: dishes
                            .get(&plan.dish_id)
                            .map(|dish| dish.name.to_owned())
                            .unwrap_or_else(|| DELETED_DISH_LABEL.to_owned()),
                        planned_servings: plan.planned_servings,
                        prepared: plan.prepared,
                    })
                    .collect::<Vec<_>>();
                meals.sort_by_key(|meal| meal.meal_type.slot_order());

                AgendaDay { date: day, meals }
            })
            .collect();

        Self { range, days }
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(|day| day.meals.is_empty())
    }
}

impl fmt::Display for Agenda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Week of {} to {}",
            self.range.start(),
            self.range.end()
        )?;

        for day in &self.days {
            writeln!(f)?;
            writeln!(f, "{} {}", day.date.weekday(), day.date)?;

            if day.meals.is_empty() {
                writeln!(f, "  Nothing planned")?;
                continue;
            }

            for meal in &day.meals {
                let check = if meal.prepared { "x" } else { " " };
                writeln!(
                    f,
                    "  [{check}] {:<9} {} ({} servings) #{}",
                    meal.meal_type.as_ref(),
                    meal.dish_name,
                    meal.planned_servings,
                    meal.meal_plan_id
                )?;
            }
        }

        Ok(())
    }
}
