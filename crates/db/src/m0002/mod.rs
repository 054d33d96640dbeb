mod family_member;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "famplan",
    "m0002",
    vec_box![],
    vec_box![family_member::CreateTable, family_member::CreateIdx1]
);
