use std::{collections::HashMap, io::Write};

use anyhow::Result;
use famplan_mealplan::{Agenda, Command, PlanInput, Query};
use famplan_shared::{DateRange, Metadata};
use sqlx::SqlitePool;
use time::OffsetDateTime;

use super::PlanCommands;

pub async fn run(
    pool: SqlitePool,
    command: PlanCommands,
    metadata: &Metadata,
    out: &mut impl Write,
) -> Result<()> {
    let user_id = metadata.trigger_by()?;
    let query = Query(pool.clone());
    let dishes = famplan_dish::Query(pool.clone());
    let command_handler = Command(pool);

    match command {
        PlanCommands::Add {
            date,
            meal,
            dish,
            servings,
        } => {
            let input = PlanInput {
                date,
                meal_type: meal,
                dish_id: dish,
                planned_servings: servings,
            };
            let id = command_handler.plan(input, metadata).await?;
            writeln!(out, "{id}")?;
        }
        PlanCommands::List {
            from,
            to,
            outstanding,
        } => {
            let range = DateRange::new(from, to)?;
            let plans = query.list(&user_id, &range, outstanding).await?;
            let names = dishes
                .list(&user_id)
                .await?
                .into_iter()
                .map(|dish| (dish.id, dish.name))
                .collect::<HashMap<_, _>>();

            if plans.is_empty() {
                writeln!(out, "No meals planned between {from} and {to}.")?;
            }
            for plan in plans {
                writeln!(
                    out,
                    "{}  {} {:<9} {} x{}{}",
                    plan.id,
                    plan.date,
                    plan.meal_type.as_ref(),
                    names
                        .get(&plan.dish_id)
                        .map(String::as_str)
                        .unwrap_or(famplan_mealplan::DELETED_DISH_LABEL),
                    plan.planned_servings,
                    if plan.prepared { " (prepared)" } else { "" }
                )?;
            }
        }
        PlanCommands::Week { date } => {
            let date = date.unwrap_or_else(|| OffsetDateTime::now_utc().date());
            let range = DateRange::week_of(date);
            let plans = query.list(&user_id, &range, false).await?;
            let dishes_by_id = dishes
                .list(&user_id)
                .await?
                .into_iter()
                .map(|dish| (dish.id.to_owned(), dish))
                .collect::<HashMap<_, _>>();

            write!(out, "{}", Agenda::week(date, &plans, &dishes_by_id))?;
        }
        PlanCommands::Prepared { id } => {
            let plan = command_handler.mark_prepared(&id, metadata).await?;
            writeln!(out, "Meal {} on {} prepared", plan.id, plan.date)?;
        }
        PlanCommands::Delete { id } => {
            command_handler.delete(&id, metadata).await?;
            writeln!(out, "Deleted meal plan {id}")?;
        }
    }

    Ok(())
}
