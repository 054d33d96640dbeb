use std::io::Write;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use famplan_shared::{Metadata, mealplan::MealType, parse_date};
use time::Date;

use crate::config::Config;

mod database;
mod dish;
mod family;
mod plan;
mod shopping;
mod stock;

/// famplan - family meal planning and shopping lists
#[derive(Parser, Debug)]
#[command(name = "famplan")]
#[command(about = "Plan family meals, track the pantry and build shopping lists", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Household member the command acts for
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Manage the dish catalog
    #[command(subcommand)]
    Dish(DishCommands),
    /// Manage planned meals
    #[command(subcommand)]
    Plan(PlanCommands),
    /// Manage pantry stock
    #[command(subcommand)]
    Stock(StockCommands),
    /// Manage household members
    #[command(subcommand)]
    Family(FamilyCommands),
    /// Build the shopping list for a period
    Shopping(ShoppingArgs),
}

#[derive(Args, Debug)]
pub struct DishArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub category: String,
    /// Number of servings the ingredient quantities yield
    #[arg(long)]
    pub servings: i64,
    /// Ingredient as `name;quantity;unit;category`, repeat for each one
    #[arg(long = "ingredient", value_parser = dish::parse_ingredient)]
    pub ingredients: Vec<famplan_dish::IngredientInput>,
}

#[derive(Subcommand, Debug)]
pub enum DishCommands {
    /// Add a dish
    Add(DishArgs),
    /// Replace a dish's details and ingredients
    Update {
        id: String,
        #[command(flatten)]
        dish: DishArgs,
    },
    /// List dishes
    List,
    /// Show a dish with its ingredients
    Show { id: String },
    /// Delete a dish
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum PlanCommands {
    /// Plan a dish for a meal
    Add {
        #[arg(long, value_parser = parse_date_arg)]
        date: Date,
        /// breakfast, brunch, lunch, snack or dinner
        #[arg(long)]
        meal: MealType,
        #[arg(long)]
        dish: String,
        #[arg(long)]
        servings: i64,
    },
    /// List planned meals between two dates
    List {
        #[arg(long, value_parser = parse_date_arg)]
        from: Date,
        #[arg(long, value_parser = parse_date_arg)]
        to: Date,
        /// Only meals not prepared yet
        #[arg(long)]
        outstanding: bool,
    },
    /// Show the week containing a date, today by default
    Week {
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<Date>,
    },
    /// Mark a planned meal as prepared
    Prepared { id: String },
    /// Delete a planned meal
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum StockCommands {
    /// Add a pantry item, or overwrite it when `--id` is given
    Set {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        quantity: f64,
        #[arg(long)]
        unit: String,
        #[arg(long)]
        category: String,
        /// Quantity at or below which the item is reported as low
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// List pantry items by category
    List,
    /// Delete a pantry item
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum FamilyCommands {
    /// Add a household member
    Add {
        #[arg(long)]
        name: String,
        /// Parent, child, grandparent...
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        age: Option<i64>,
        /// Address the shopping list can be shared with
        #[arg(long)]
        email: Option<String>,
        /// Dietary preferences
        #[arg(long)]
        preferences: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List household members
    List,
    /// List members a shopping list can be shared with
    Recipients,
    /// Delete a household member
    Delete { id: String },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Html,
    Json,
}

#[derive(Args, Debug)]
pub struct ShoppingArgs {
    /// First day, Monday of the current week by default
    #[arg(long, value_parser = parse_date_arg)]
    pub from: Option<Date>,
    /// Last day, Sunday of the current week by default
    #[arg(long, value_parser = parse_date_arg)]
    pub to: Option<Date>,
    /// Include meals already prepared
    #[arg(long, conflicts_with = "outstanding")]
    pub all: bool,
    /// Only meals not prepared yet
    #[arg(long)]
    pub outstanding: bool,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

fn parse_date_arg(value: &str) -> Result<Date, String> {
    parse_date(value).map_err(|_| format!("'{value}' is not a date, expected YYYY-MM-DD"))
}

fn metadata(user: Option<String>) -> Result<Metadata> {
    match user {
        Some(user) if !user.trim().is_empty() => Ok(Metadata::by(user.trim())),
        _ => anyhow::bail!("--user is required for this command"),
    }
}

/// Executes a parsed command, writing its report to `out`.
pub async fn run(cli: Cli, config: Config, out: &mut impl Write) -> Result<()> {
    let command = match cli.command {
        Commands::Migrate => return database::migrate(&config).await,
        Commands::Reset => return database::reset(&config).await,
        command => command,
    };

    let metadata = metadata(cli.user)?;
    let pool = database::connect(&config).await?;

    let result = match command {
        Commands::Dish(command) => dish::run(pool.clone(), command, &metadata, out).await,
        Commands::Plan(command) => plan::run(pool.clone(), command, &metadata, out).await,
        Commands::Stock(command) => stock::run(pool.clone(), command, &metadata, out).await,
        Commands::Family(command) => family::run(pool.clone(), command, &metadata, out).await,
        Commands::Shopping(args) => {
            shopping::run(pool.clone(), args, &config, &metadata, out).await
        }
        Commands::Migrate | Commands::Reset => Ok(()),
    };

    pool.close().await;

    result
}
