use famplan_db::table;
use famplan_shared::{StockSource, stock::StockItem};
use sea_query::{Expr, ExprTrait, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(Clone)]
pub struct Query(pub SqlitePool);

#[derive(FromRow)]
pub struct StockItemRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
    pub low_stock_threshold: Option<f64>,
}

impl From<StockItemRow> for StockItem {
    fn from(row: StockItemRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            quantity: row.quantity,
            unit: row.unit,
            category: row.category,
            low_stock_threshold: row.low_stock_threshold,
        }
    }
}

const COLUMNS: [table::StockItem; 7] = [
    table::StockItem::Id,
    table::StockItem::UserId,
    table::StockItem::Name,
    table::StockItem::Quantity,
    table::StockItem::Unit,
    table::StockItem::Category,
    table::StockItem::LowStockThreshold,
];

impl Query {
    pub async fn find(
        &self,
        id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> famplan_shared::Result<Option<StockItem>> {
        let id = id.into();
        let user_id = user_id.into();
        let statement = sea_query::Query::select()
            .columns(COLUMNS)
            .from(table::StockItem::Table)
            .and_where(Expr::col(table::StockItem::Id).eq(&id))
            .and_where(Expr::col(table::StockItem::UserId).eq(&user_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_as_with::<_, StockItemRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?;

        Ok(row.map(StockItem::from))
    }

    pub async fn list(&self, user_id: impl Into<String>) -> famplan_shared::Result<Vec<StockItem>> {
        let user_id = user_id.into();
        let statement = sea_query::Query::select()
            .columns(COLUMNS)
            .from(table::StockItem::Table)
            .and_where(Expr::col(table::StockItem::UserId).eq(&user_id))
            .order_by(table::StockItem::Name, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let rows = sqlx::query_as_with::<_, StockItemRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        Ok(rows.into_iter().map(StockItem::from).collect())
    }
}

#[async_trait::async_trait]
impl StockSource for Query {
    async fn stock_items(&self, user_id: &str) -> famplan_shared::Result<Vec<StockItem>> {
        self.list(user_id).await
    }
}
