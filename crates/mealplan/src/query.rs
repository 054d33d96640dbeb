use std::str::FromStr;

use famplan_db::table;
use famplan_shared::{
    DateRange, MealPlanSource, format_date,
    mealplan::{MealPlan, MealType},
    parse_date,
};
use sea_query::{Expr, ExprTrait, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(Clone)]
pub struct Query(pub SqlitePool);

#[derive(FromRow)]
pub struct MealPlanRow {
    pub id: String,
    pub user_id: String,
    pub date: String,
    pub meal_type: String,
    pub dish_id: String,
    pub planned_servings: i64,
    pub prepared: bool,
    pub prepared_at: Option<i64>,
}

impl TryFrom<MealPlanRow> for MealPlan {
    type Error = famplan_shared::Error;

    fn try_from(row: MealPlanRow) -> Result<Self, Self::Error> {
        let meal_type = MealType::from_str(&row.meal_type).map_err(|_| {
            famplan_shared::Error::Server(format!(
                "meal plan {} has unknown meal type {}",
                row.id, row.meal_type
            ))
        })?;

        Ok(Self {
            date: parse_date(&row.date)?,
            meal_type,
            id: row.id,
            user_id: row.user_id,
            dish_id: row.dish_id,
            planned_servings: row.planned_servings,
            prepared: row.prepared,
            prepared_at: row.prepared_at,
        })
    }
}

const COLUMNS: [table::MealPlan; 8] = [
    table::MealPlan::Id,
    table::MealPlan::UserId,
    table::MealPlan::Date,
    table::MealPlan::MealType,
    table::MealPlan::DishId,
    table::MealPlan::PlannedServings,
    table::MealPlan::Prepared,
    table::MealPlan::PreparedAt,
];

impl Query {
    pub async fn find(
        &self,
        id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> famplan_shared::Result<Option<MealPlan>> {
        let id = id.into();
        let user_id = user_id.into();
        let statement = sea_query::Query::select()
            .columns(COLUMNS)
            .from(table::MealPlan::Table)
            .and_where(Expr::col(table::MealPlan::Id).eq(&id))
            .and_where(Expr::col(table::MealPlan::UserId).eq(&user_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_as_with::<_, MealPlanRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?;

        row.map(MealPlan::try_from).transpose()
    }

    /// Plans dated within `range`, ordered by day and then by meal slot.
    pub async fn list(
        &self,
        user_id: impl Into<String>,
        range: &DateRange,
        outstanding_only: bool,
    ) -> famplan_shared::Result<Vec<MealPlan>> {
        let user_id = user_id.into();
        let mut statement = sea_query::Query::select()
            .columns(COLUMNS)
            .from(table::MealPlan::Table)
            .and_where(Expr::col(table::MealPlan::UserId).eq(&user_id))
            .and_where(Expr::col(table::MealPlan::Date).gte(format_date(range.start())?))
            .and_where(Expr::col(table::MealPlan::Date).lte(format_date(range.end())?))
            .order_by(table::MealPlan::Date, Order::Asc)
            .order_by(table::MealPlan::CreatedAt, Order::Asc)
            .to_owned();

        if outstanding_only {
            statement.and_where(Expr::col(table::MealPlan::Prepared).eq(false));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_as_with::<_, MealPlanRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        let mut plans = rows
            .into_iter()
            .map(MealPlan::try_from)
            .collect::<famplan_shared::Result<Vec<_>>>()?;

        plans.sort_by_key(|plan| (plan.date, plan.meal_type.slot_order()));

        Ok(plans)
    }
}

#[async_trait::async_trait]
impl MealPlanSource for Query {
    async fn meal_plans(
        &self,
        user_id: &str,
        range: &DateRange,
        outstanding_only: bool,
    ) -> famplan_shared::Result<Vec<MealPlan>> {
        self.list(user_id, range, outstanding_only).await
    }
}
