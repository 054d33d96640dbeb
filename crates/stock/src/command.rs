use famplan_db::table;
use famplan_shared::Metadata;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use ulid::Ulid;
use validator::{Validate, ValidationError};

#[derive(Clone)]
pub struct Command(pub SqlitePool);

#[derive(Validate, Deserialize, Clone, Debug, Default)]
#[validate(schema(function = "validate_threshold"))]
pub struct StockInput {
    /// Existing item to overwrite, a new item is created when absent.
    pub id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(custom(function = "validate_quantity"))]
    pub quantity: f64,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    pub low_stock_threshold: Option<f64>,
}

fn validate_quantity(quantity: f64) -> Result<(), ValidationError> {
    if quantity.is_finite() && quantity >= 0.0 {
        return Ok(());
    }

    Err(ValidationError::new("invalid_quantity")
        .with_message("Quantity must be zero or more".into()))
}

fn validate_threshold(input: &StockInput) -> Result<(), ValidationError> {
    match input.low_stock_threshold {
        Some(threshold) if !threshold.is_finite() || threshold < 0.0 => {
            Err(ValidationError::new("invalid_low_stock_threshold")
                .with_message("Low stock threshold must be zero or more".into()))
        }
        _ => Ok(()),
    }
}

impl StockInput {
    fn trimmed(self) -> Self {
        Self {
            id: self
                .id
                .map(|id| id.trim().to_owned())
                .filter(|id| !id.is_empty()),
            name: self.name.trim().to_owned(),
            quantity: self.quantity,
            unit: self.unit.trim().to_owned(),
            category: self.category.trim().to_owned(),
            low_stock_threshold: self.low_stock_threshold,
        }
    }
}

impl Command {
    /// Inserts a pantry item, or overwrites the one named by `input.id`.
    /// Returns the item id.
    pub async fn upsert(
        &self,
        input: StockInput,
        metadata: &Metadata,
    ) -> famplan_shared::Result<String> {
        let user_id = metadata.trigger_by()?;
        let input = input.trimmed();
        input.validate()?;

        let now = OffsetDateTime::now_utc().unix_timestamp();

        let Some(id) = input.id.to_owned() else {
            let id = Ulid::new().to_string();
            let statement = Query::insert()
                .into_table(table::StockItem::Table)
                .columns([
                    table::StockItem::Id,
                    table::StockItem::UserId,
                    table::StockItem::Name,
                    table::StockItem::Quantity,
                    table::StockItem::Unit,
                    table::StockItem::Category,
                    table::StockItem::LowStockThreshold,
                    table::StockItem::UpdatedAt,
                ])
                .values_panic([
                    id.to_owned().into(),
                    user_id.to_owned().into(),
                    input.name.to_owned().into(),
                    input.quantity.into(),
                    input.unit.to_owned().into(),
                    input.category.to_owned().into(),
                    input.low_stock_threshold.into(),
                    now.into(),
                ])
                .to_owned();

            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&self.0).await?;

            tracing::info!(
                stock_item_id = %id,
                user_id = %user_id,
                name = %input.name,
                "stock item added"
            );

            return Ok(id);
        };

        let statement = Query::update()
            .table(table::StockItem::Table)
            .values([
                (table::StockItem::Name, input.name.to_owned().into()),
                (table::StockItem::Quantity, input.quantity.into()),
                (table::StockItem::Unit, input.unit.to_owned().into()),
                (table::StockItem::Category, input.category.to_owned().into()),
                (
                    table::StockItem::LowStockThreshold,
                    input.low_stock_threshold.into(),
                ),
                (table::StockItem::UpdatedAt, now.into()),
            ])
            .and_where(Expr::col(table::StockItem::Id).eq(&id))
            .and_where(Expr::col(table::StockItem::UserId).eq(&user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

        if result.rows_affected() == 0 {
            famplan_shared::not_found!("stock item {id}");
        }

        tracing::info!(
            stock_item_id = %id,
            user_id = %user_id,
            quantity = input.quantity,
            "stock item updated"
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

        let statement = Query::delete()
            .from_table(table::StockItem::Table)
            .and_where(Expr::col(table::StockItem::Id).eq(&id))
            .and_where(Expr::col(table::StockItem::UserId).eq(&user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

        if result.rows_affected() == 0 {
            famplan_shared::not_found!("stock item {id}");
        }

        tracing::info!(stock_item_id = %id, user_id = %user_id, "stock item deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> StockInput {
        StockInput {
            name: " Poisson ".to_owned(),
            quantity: 1.0,
            unit: "kg".to_owned(),
            category: "Poissons".to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_quantity_is_accepted() {
        let mut input = input();
        input.quantity = 0.0;
        assert!(input.trimmed().validate().is_ok());
    }

    #[test]
    fn test_invalid_quantity_is_rejected() {
        for quantity in [-0.5, f64::NAN, f64::INFINITY] {
            let mut input = input();
            input.quantity = quantity;
            assert!(input.trimmed().validate().is_err(), "quantity {quantity} accepted");
        }
    }

    #[test]
    fn test_blank_fields_are_rejected() {
        let mut blank_unit = input();
        blank_unit.unit = "  ".to_owned();
        assert!(blank_unit.trimmed().validate().is_err());

        let mut blank_category = input();
        blank_category.category = String::new();
        assert!(blank_category.trimmed().validate().is_err());
    }

    #[test]
    fn test_threshold_must_not_be_negative() {
        let mut input = input();
        input.low_stock_threshold = Some(-1.0);
        assert!(input.clone().trimmed().validate().is_err());
        input.low_stock_threshold = Some(2.0);
        assert!(input.trimmed().validate().is_ok());
    }

    #[test]
    fn test_blank_id_means_insert() {
        let mut input = input();
        input.id = Some("  ".to_owned());
        assert_eq!(input.trimmed().id, None);
    }
}
