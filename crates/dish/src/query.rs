use famplan_db::table;
use famplan_shared::{
    DishSource,
    dish::{Dish, DishIngredient},
};
use sea_query::{Expr, ExprTrait, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow, types::Json};

#[derive(Clone)]
pub struct Query(pub SqlitePool);

#[derive(FromRow)]
pub struct DishRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub category: String,
    pub servings: i64,
    pub ingredients: Json<Vec<DishIngredient>>,
}

impl From<DishRow> for Dish {
    fn from(row: DishRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            category: row.category,
            servings: row.servings,
            ingredients: row.ingredients.0,
        }
    }
}

const COLUMNS: [table::Dish; 6] = [
    table::Dish::Id,
    table::Dish::UserId,
    table::Dish::Name,
    table::Dish::Category,
    table::Dish::Servings,
    table::Dish::Ingredients,
];

impl Query {
    pub async fn find(
        &self,
        id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> famplan_shared::Result<Option<Dish>> {
        let id = id.into();
        let user_id = user_id.into();
        let statement = sea_query::Query::select()
            .columns(COLUMNS)
            .from(table::Dish::Table)
            .and_where(Expr::col(table::Dish::Id).eq(&id))
            .and_where(Expr::col(table::Dish::UserId).eq(&user_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_as_with::<_, DishRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?;

        Ok(row.map(Dish::from))
    }

    pub async fn list(&self, user_id: impl Into<String>) -> famplan_shared::Result<Vec<Dish>> {
        let user_id = user_id.into();
        let statement = sea_query::Query::select()
            .columns(COLUMNS)
            .from(table::Dish::Table)
            .and_where(Expr::col(table::Dish::UserId).eq(&user_id))
            .order_by(table::Dish::Name, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_as_with::<_, DishRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        Ok(rows.into_iter().map(Dish::from).collect())
    }
}

#[async_trait::async_trait]
impl DishSource for Query {
    async fn find_dish(&self, user_id: &str, id: &str) -> famplan_shared::Result<Option<Dish>> {
        self.find(id, user_id).await
    }
}
