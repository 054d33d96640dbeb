mod command;
mod date;
pub mod dish;
mod event;
pub mod mealplan;
mod source;
pub mod stock;

pub use command::*;
pub use date::*;
pub use event::*;
pub use source::*;

/// Bucket used for records without a usable category.
pub const OTHER_CATEGORY: &str = "Other";

/// Returns the trimmed category, or [`OTHER_CATEGORY`] when it is blank.
pub fn category_or_other(category: &str) -> &str {
    let category = category.trim();
    if category.is_empty() {
        OTHER_CATEGORY
    } else {
        category
    }
}
