use std::io::Write;

use anyhow::Result;
use famplan_shared::{DateRange, Metadata};
use famplan_shopping::{ShoppingRequest, generate, render_html, render_text};
use sqlx::SqlitePool;
use time::OffsetDateTime;

use super::{Format, ShoppingArgs};
use crate::config::Config;

fn request(args: &ShoppingArgs, config: &Config) -> Result<ShoppingRequest> {
    let week = DateRange::week_of(OffsetDateTime::now_utc().date());
    let range = DateRange::new(
        args.from.unwrap_or(week.start()),
        args.to.unwrap_or(week.end()),
    )?;

    let outstanding_only = if args.all {
        false
    } else {
        args.outstanding || config.shopping.outstanding_only
    };

    Ok(ShoppingRequest::new(range).outstanding_only(outstanding_only))
}

pub async fn run(
    pool: SqlitePool,
    args: ShoppingArgs,
    config: &Config,
    metadata: &Metadata,
    out: &mut impl Write,
) -> Result<()> {
    let request = request(&args, config)?;

    let list = generate(
        &famplan_dish::Query(pool.clone()),
        &famplan_mealplan::Query(pool.clone()),
        &famplan_stock::Query(pool),
        metadata,
        &request,
    )
    .await?;

    match args.format {
        Format::Text => write!(out, "{}", render_text(&list))?,
        Format::Html => writeln!(out, "{}", render_html(&list)?)?,
        Format::Json => writeln!(out, "{}", serde_json::to_string_pretty(&list)?)?,
    }

    Ok(())
}
