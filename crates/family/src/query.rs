use famplan_db::table;
use sea_query::{Expr, ExprTrait, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(Clone)]
pub struct Query(pub SqlitePool);

#[derive(FromRow, Serialize, Debug, Clone, PartialEq)]
pub struct FamilyMember {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub role: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
    pub preferences: Option<String>,
    pub notes: Option<String>,
}

const COLUMNS: [table::FamilyMember; 8] = [
    table::FamilyMember::Id,
    table::FamilyMember::UserId,
    table::FamilyMember::Name,
    table::FamilyMember::Role,
    table::FamilyMember::Age,
    table::FamilyMember::Email,
    table::FamilyMember::Preferences,
    table::FamilyMember::Notes,
];

impl Query {
    pub async fn find(
        &self,
        id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> famplan_shared::Result<Option<FamilyMember>> {
        let id = id.into();
        let user_id = user_id.into();
        let statement = sea_query::Query::select()
            .columns(COLUMNS)
            .from(table::FamilyMember::Table)
            .and_where(Expr::col(table::FamilyMember::Id).eq(&id))
            .and_where(Expr::col(table::FamilyMember::UserId).eq(&user_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, FamilyMember, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?)
    }

    pub async fn list(
        &self,
        user_id: impl Into<String>,
    ) -> famplan_shared::Result<Vec<FamilyMember>> {
        let user_id = user_id.into();
        let statement = sea_query::Query::select()
            .columns(COLUMNS)
            .from(table::FamilyMember::Table)
            .and_where(Expr::col(table::FamilyMember::UserId).eq(&user_id))
            .order_by(table::FamilyMember::Name, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, FamilyMember, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    /// Members with an email address, the people a shopping list can be
    /// shared with.
    pub async fn recipients(
        &self,
        user_id: impl Into<String>,
    ) -> famplan_shared::Result<Vec<FamilyMember>> {
        let user_id = user_id.into();
        let statement = sea_query::Query::select()
            .columns(COLUMNS)
            .from(table::FamilyMember::Table)
            .and_where(Expr::col(table::FamilyMember::UserId).eq(&user_id))
            .and_where(Expr::col(table::FamilyMember::Email).is_not_null())
            .order_by(table::FamilyMember::Name, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, FamilyMember, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }
}
