use famplan_db::table;
use famplan_shared::{Metadata, dish::DishIngredient};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use time::OffsetDateTime;
use ulid::Ulid;
use validator::{Validate, ValidationError};

#[derive(Clone)]
pub struct Command(pub SqlitePool);

#[derive(Validate, Serialize, Deserialize, Clone, Debug)]
pub struct IngredientInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(custom(function = "validate_quantity"))]
    pub quantity: f64,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
}

#[derive(Validate, Deserialize, Clone, Debug)]
pub struct DishInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(range(min = 1, max = 100))]
    pub servings: i64,
    #[validate(length(min = 1), nested)]
    pub ingredients: Vec<IngredientInput>,
}

fn validate_quantity(quantity: f64) -> Result<(), ValidationError> {
    if quantity.is_finite() && quantity > 0.0 {
        return Ok(());
    }

    Err(ValidationError::new("invalid_quantity")
        .with_message("Quantity must be a positive number".into()))
}

impl DishInput {
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            category: self.category.trim().to_owned(),
            servings: self.servings,
            ingredients: self
                .ingredients
                .into_iter()
                .map(|i| IngredientInput {
                    name: i.name.trim().to_owned(),
                    quantity: i.quantity,
                    unit: i.unit.trim().to_owned(),
                    category: i.category.trim().to_owned(),
                })
                .collect(),
        }
    }

    fn dish_ingredients(&self) -> Vec<DishIngredient> {
        self.ingredients
            .iter()
            .map(|i| DishIngredient::new(&i.name, i.quantity, &i.unit, &i.category))
            .collect()
    }
}

impl Command {
    pub async fn create(
        &self,
        input: DishInput,
        metadata: &Metadata,
    ) -> famplan_shared::Result<String> {
        let user_id = metadata.trigger_by()?;
        let input = input.trimmed();
        input.validate()?;

        let id = Ulid::new().to_string();
        let ingredients = serde_json::to_string(&input.dish_ingredients())?;

        let statement = Query::insert()
            .into_table(table::Dish::Table)
            .columns([
                table::Dish::Id,
                table::Dish::UserId,
                table::Dish::Name,
                table::Dish::Category,
                table::Dish::Servings,
                table::Dish::Ingredients,
                table::Dish::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                user_id.to_owned().into(),
                input.name.to_owned().into(),
                input.category.to_owned().into(),
                input.servings.into(),
                ingredients.into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.0).await?;

        tracing::info!(dish_id = %id, user_id = %user_id, name = %input.name, "dish created");

        Ok(id)
    }

    pub async fn update(
        &self,
        id: impl Into<String>,
        input: DishInput,
        metadata: &Metadata,
    ) -> famplan_shared::Result<()> {
        let id = id.into();
        let user_id = metadata.trigger_by()?;
        let input = input.trimmed();
        input.validate()?;

        let ingredients = serde_json::to_string(&input.dish_ingredients())?;

        let statement = Query::update()
            .table(table::Dish::Table)
            .values([
                (table::Dish::Name, input.name.to_owned().into()),
                (table::Dish::Category, input.category.to_owned().into()),
                (table::Dish::Servings, input.servings.into()),
                (table::Dish::Ingredients, ingredients.into()),
                (
                    table::Dish::UpdatedAt,
                    OffsetDateTime::now_utc().unix_timestamp().into(),
                ),
            ])
            .and_where(Expr::col(table::Dish::Id).eq(&id))
            .and_where(Expr::col(table::Dish::UserId).eq(&user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

        if result.rows_affected() == 0 {
            famplan_shared::not_found!("dish {id}");
        }

        tracing::info!(dish_id = %id, user_id = %user_id, "dish updated");

        Ok(())
    }

    pub async fn delete(
        &self,
        id: impl Into<String>,
        metadata: &Metadata,
    ) -> famplan_shared::Result<()> {
        let id = id.into();
        let user_id = metadata.trigger_by()?;

        let statement = Query::delete()
            .from_table(table::Dish::Table)
            .and_where(Expr::col(table::Dish::Id).eq(&id))
            .and_where(Expr::col(table::Dish::UserId).eq(&user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

        if result.rows_affected() == 0 {
            famplan_shared::not_found!("dish {id}");
        }

        // Meal plans keep their dish reference; the shopping list skips them.
        tracing::info!(dish_id = %id, user_id = %user_id, "dish deleted");

        Ok(())
    }
}
