use std::fmt::Write;

use askama::Template;

use crate::{ShoppingList, ShoppingListStatus};

const NO_MEALS_PLANNED: &str = "No meals planned for this period.";
const FULLY_STOCKED: &str = "Everything needed is already in stock.";

fn empty_message(list: &ShoppingList) -> Option<&'static str> {
    match list.status() {
        ShoppingListStatus::NoMealsPlanned => Some(NO_MEALS_PLANNED),
        ShoppingListStatus::FullyStocked => Some(FULLY_STOCKED),
        ShoppingListStatus::ToBuy => None,
    }
}

/// Plain text list suitable for sharing in a message.
pub fn render_text(list: &ShoppingList) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Shopping list {} to {}",
        list.range.start(),
        list.range.end()
    );

    if let Some(message) = empty_message(list) {
        let _ = writeln!(out, "\n{message}");
    }

    for group in &list.categories {
        let _ = writeln!(out, "\n{}", group.name);
        for entry in &group.entries {
            let _ = writeln!(
                out,
                "- {} {} {}",
                entry.formatted_quantity(),
                entry.unit,
                entry.name
            );
            if let Some(warning) = &entry.warning {
                let _ = writeln!(out, "  ! {warning}");
            }
        }
    }

    if list.skipped_plans > 0 {
        let _ = writeln!(
            out,
            "\n{} planned meal(s) skipped, dish no longer exists.",
            list.skipped_plans
        );
    }

    out
}

struct HtmlEntry {
    name: String,
    quantity: String,
    unit: String,
    warning: String,
}

struct HtmlGroup {
    name: String,
    entries: Vec<HtmlEntry>,
}

#[derive(Template)]
#[template(path = "shopping-list.html")]
struct ShoppingListTemplate {
    start: String,
    end: String,
    empty_message: Option<&'static str>,
    groups: Vec<HtmlGroup>,
    skipped_plans: usize,
}

/// HTML fragment of the list, escaped by the template engine.
pub fn render_html(list: &ShoppingList) -> famplan_shared::Result<String> {
    let template = ShoppingListTemplate {
        start: list.range.start().to_string(),
        end: list.range.end().to_string(),
        empty_message: empty_message(list),
        groups: list
            .categories
            .iter()
            .map(|group| HtmlGroup {
                name: group.name.to_owned(),
                entries: group
                    .entries
                    .iter()
                    .map(|entry| HtmlEntry {
                        name: entry.name.to_owned(),
                        quantity: entry.formatted_quantity(),
                        unit: entry.unit.to_owned(),
                        warning: entry
                            .warning
                            .as_ref()
                            .map(ToString::to_string)
                            .unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect(),
        skipped_plans: list.skipped_plans,
    };

    template
        .render()
        .map_err(|err| famplan_shared::Error::Unknown(err.into()))
}
