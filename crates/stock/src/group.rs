use std::collections::BTreeMap;

use famplan_shared::{category_or_other, stock::StockItem};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockCategory {
    pub name: String,
    pub items: Vec<StockItem>,
}

/// Groups pantry items by category. Categories are sorted by name and items
/// by normalized name, blank categories land in "Other".
pub fn group_by_category(items: Vec<StockItem>) -> Vec<StockCategory> {
    let mut groups: BTreeMap<String, Vec<StockItem>> = BTreeMap::new();

    for item in items {
        groups
            .entry(category_or_other(&item.category).to_owned())
            .or_default()
            .push(item);
    }

    groups
        .into_iter()
        .map(|(name, mut items)| {
            items.sort_by_cached_key(|item| (item.normalized_name(), item.unit.to_owned()));
            StockCategory { name, items }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, category: &str) -> StockItem {
        StockItem {
            name: name.to_owned(),
            quantity: 1.0,
            unit: "kg".to_owned(),
            category: category.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_group_by_category() {
        let groups = group_by_category(vec![
            item("riz", "Épicerie"),
            item("Poisson", "Poissons"),
            item("sel", " "),
            item("Farine", "Épicerie"),
            item("crevettes", "Poissons"),
        ]);

        let names = groups.iter().map(|g| g.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Other", "Poissons", "Épicerie"]);

        let poissons = groups[1]
            .items
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(poissons, vec!["crevettes", "Poisson"]);

        let epicerie = groups[2]
            .items
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(epicerie, vec!["Farine", "riz"]);

        assert_eq!(groups.iter().map(|g| g.items.len()).sum::<usize>(), 5);
    }

    #[test]
    fn test_group_empty() {
        assert!(group_by_category(vec![]).is_empty());
    }
}
