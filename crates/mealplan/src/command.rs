use famplan_db::table;
use famplan_shared::{
    Metadata, format_date,
    mealplan::{MealPlan, MealType},
};
use sea_query::{Expr, ExprTrait, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use sqlx::SqlitePool;
use time::{Date, OffsetDateTime};
use ulid::Ulid;
use validator::Validate;

use crate::Query;

#[derive(Clone)]
pub struct Command(pub SqlitePool);

#[derive(Validate, Deserialize, Clone, Debug)]
pub struct PlanInput {
    pub date: Date,
    pub meal_type: MealType,
    #[validate(length(min = 1))]
    pub dish_id: String,
    #[validate(range(min = 1, max = 100))]
    pub planned_servings: i64,
}

impl Command {
    pub async fn plan(
        &self,
        input: PlanInput,
        metadata: &Metadata,
    ) -> famplan_shared::Result<String> {
        let user_id = metadata.trigger_by()?;
        input.validate()?;

        let dish_id = input.dish_id.trim();
        if famplan_dish::Query(self.0.clone())
            .find(dish_id, &user_id)
            .await?
            .is_none()
        {
            famplan_shared::not_found!("dish {dish_id}");
        }

        let id = Ulid::new().to_string();
        let statement = sea_query::Query::insert()
            .into_table(table::MealPlan::Table)
            .columns([
                table::MealPlan::Id,
                table::MealPlan::UserId,
                table::MealPlan::Date,
                table::MealPlan::MealType,
                table::MealPlan::DishId,
                table::MealPlan::PlannedServings,
                table::MealPlan::Prepared,
                table::MealPlan::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                user_id.to_owned().into(),
                format_date(input.date)?.into(),
                input.meal_type.to_string().into(),
                dish_id.to_owned().into(),
                input.planned_servings.into(),
                false.into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.0).await?;

        tracing::info!(
            meal_plan_id = %id,
            user_id = %user_id,
            date = %input.date,
            meal_type = %input.meal_type,
            "meal planned"
        );

        Ok(id)
    }

    pub async fn delete(
        &self,
        id: impl Into<String>,
        metadata: &Metadata,
    ) -> famplan_shared::Result<()> {
        let id = id.into();
        let user_id = metadata.trigger_by()?;

        let statement = sea_query::Query::delete()
            .from_table(table::MealPlan::Table)
            .and_where(Expr::col(table::MealPlan::Id).eq(&id))
            .and_where(Expr::col(table::MealPlan::UserId).eq(&user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

        if result.rows_affected() == 0 {
            famplan_shared::not_found!("meal plan {id}");
        }

        tracing::info!(meal_plan_id = %id, user_id = %user_id, "meal plan deleted");

        Ok(())
    }

    /// Marks a planned meal as cooked. Returns the plan as stored afterwards;
    /// a plan already prepared keeps its original `prepared_at`.
    pub async fn mark_prepared(
        &self,
        id: impl Into<String>,
        metadata: &Metadata,
    ) -> famplan_shared::Result<MealPlan> {
        let id = id.into();
        let user_id = metadata.trigger_by()?;

        let query = Query(self.0.clone());
        let Some(mut plan) = query.find(&id, &user_id).await? else {
            famplan_shared::not_found!("meal plan {id}");
        };

        if plan.prepared {
            tracing::debug!(meal_plan_id = %id, "meal plan already prepared");
            return Ok(plan);
        }

        let prepared_at = OffsetDateTime::now_utc().unix_timestamp();
        let statement = sea_query::Query::update()
            .table(table::MealPlan::Table)
            .values([
                (table::MealPlan::Prepared, true.into()),
                (table::MealPlan::PreparedAt, prepared_at.into()),
            ])
            .and_where(Expr::col(table::MealPlan::Id).eq(&id))
            .and_where(Expr::col(table::MealPlan::UserId).eq(&user_id))
            .and_where(Expr::col(table::MealPlan::Prepared).eq(false))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

        if result.rows_affected() == 0 {
            tracing::debug!(meal_plan_id = %id, "meal plan prepared concurrently");

            let Some(plan) = query.find(&id, &user_id).await? else {
                famplan_shared::not_found!("meal plan {id}");
            };

            return Ok(plan);
        }

        tracing::info!(meal_plan_id = %id, user_id = %user_id, "meal prepared");

        plan.prepared = true;
        plan.prepared_at = Some(prepared_at);

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn input(planned_servings: i64) -> PlanInput {
        PlanInput {
            date: date!(2025 - 03 - 04),
            meal_type: MealType::Dinner,
            dish_id: "01JNDOLE".to_owned(),
            planned_servings,
        }
    }

    #[test]
    fn test_planned_servings_range() {
        assert!(input(1).validate().is_ok());
        assert!(input(100).validate().is_ok());
        assert!(input(0).validate().is_err());
        assert!(input(-3).validate().is_err());
        assert!(input(101).validate().is_err());
    }

    #[test]
    fn test_dish_is_required() {
        let mut input = input(4);
        input.dish_id = String::new();
        assert!(input.validate().is_err());
    }
}
