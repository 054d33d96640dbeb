mod dish;
mod meal_plan;
mod stock_item;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "famplan",
    "m0001",
    vec_box![],
    vec_box![
        dish::CreateTable,
        dish::CreateIdx1,
        meal_plan::CreateTable,
        meal_plan::CreateIdx1,
        stock_item::CreateTable,
        stock_item::CreateIdx1,
    ]
);
