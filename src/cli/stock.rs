use std::io::Write;

use anyhow::Result;
use famplan_shared::{Metadata, stock::StockStatus};
use famplan_stock::{Command, Query, StockInput, group_by_category};
use sqlx::SqlitePool;

use super::StockCommands;

pub async fn run(
    pool: SqlitePool,
    command: StockCommands,
    metadata: &Metadata,
    out: &mut impl Write,
) -> Result<()> {
    let user_id = metadata.trigger_by()?;
    let query = Query(pool.clone());
    let command_handler = Command(pool);

    match command {
        StockCommands::Set {
            id,
            name,
            quantity,
            unit,
            category,
            threshold,
        } => {
            let input = StockInput {
                id,
                name,
                quantity,
                unit,
                category,
                low_stock_threshold: threshold,
            };
            let id = command_handler.upsert(input, metadata).await?;
            writeln!(out, "{id}")?;
        }
        StockCommands::List => {
            let groups = group_by_category(query.list(&user_id).await?);
            if groups.is_empty() {
                writeln!(out, "Pantry is empty.")?;
            }
            for group in groups {
                writeln!(out, "{}", group.name)?;
                for item in group.items {
                    let status = match item.status() {
                        StockStatus::OutOfStock => " (out of stock)",
                        StockStatus::Low => " (low)",
                        StockStatus::Available => "",
                    };
                    writeln!(
                        out,
                        "- {} {} {}{}  #{}",
                        item.quantity, item.unit, item.name, status, item.id
                    )?;
                }
            }
        }
        StockCommands::Delete { id } => {
            command_handler.delete(&id, metadata).await?;
            writeln!(out, "Deleted stock item {id}")?;
        }
    }

    Ok(())
}
