use std::io::Write;

use anyhow::Result;
use famplan_dish::{Command, DishInput, IngredientInput, Query};
use famplan_shared::Metadata;
use sqlx::SqlitePool;

use super::{DishArgs, DishCommands};

/// Parses `name;quantity;unit;category`.
pub fn parse_ingredient(value: &str) -> Result<IngredientInput, String> {
    let parts = value.split(';').map(str::trim).collect::<Vec<_>>();
    let [name, quantity, unit, category] = parts[..] else {
        return Err(format!(
            "'{value}' must be written as name;quantity;unit;category"
        ));
    };

    let quantity = quantity
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| format!("'{quantity}' is not a quantity"))?;

    Ok(IngredientInput {
        name: name.to_owned(),
        quantity,
        unit: unit.to_owned(),
        category: category.to_owned(),
    })
}

impl From<DishArgs> for DishInput {
    fn from(args: DishArgs) -> Self {
        Self {
            name: args.name,
            category: args.category,
            servings: args.servings,
            ingredients: args.ingredients,
        }
    }
}

pub async fn run(
    pool: SqlitePool,
    command: DishCommands,
    metadata: &Metadata,
    out: &mut impl Write,
) -> Result<()> {
    let user_id = metadata.trigger_by()?;
    let query = Query(pool.clone());
    let command_handler = Command(pool);

    match command {
        DishCommands::Add(args) => {
            let id = command_handler.create(args.into(), metadata).await?;
            writeln!(out, "{id}")?;
        }
        DishCommands::Update { id, dish } => {
            command_handler.update(&id, dish.into(), metadata).await?;
            writeln!(out, "{id}")?;
        }
        DishCommands::List => {
            let dishes = query.list(&user_id).await?;
            if dishes.is_empty() {
                writeln!(out, "No dishes yet.")?;
            }
            for dish in dishes {
                writeln!(
                    out,
                    "{}  {} ({}, {} servings, {} ingredients)",
                    dish.id,
                    dish.name,
                    dish.category,
                    dish.servings,
                    dish.ingredients.len()
                )?;
            }
        }
        DishCommands::Show { id } => {
            let Some(dish) = query.find(&id, &user_id).await? else {
                anyhow::bail!("dish {id} not found");
            };

            writeln!(out, "{} ({}, {} servings)", dish.name, dish.category, dish.servings)?;
            for ingredient in &dish.ingredients {
                writeln!(
                    out,
                    "- {} {} {} [{}]",
                    ingredient
                        .quantity
                        .map(|q| q.to_string())
                        .unwrap_or_else(|| "?".to_owned()),
                    ingredient.unit,
                    ingredient.name,
                    ingredient.category
                )?;
            }
        }
        DishCommands::Delete { id } => {
            command_handler.delete(&id, metadata).await?;
            writeln!(out, "Deleted dish {id}")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingredient() {
        let ingredient = parse_ingredient("poisson; 1,5 ;kg;Poissons").unwrap();
        assert_eq!(ingredient.name, "poisson");
        assert_eq!(ingredient.quantity, 1.5);
        assert_eq!(ingredient.unit, "kg");
        assert_eq!(ingredient.category, "Poissons");
    }

    #[test]
    fn test_parse_ingredient_rejects_malformed() {
        assert!(parse_ingredient("poisson;2;kg").is_err());
        assert!(parse_ingredient("poisson;deux;kg;Poissons").is_err());
    }
}
