use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::catalog::RecipeCatalog;
use crate::meal_plan::WeeklyPlan;

/// Normalized ingredient identity used for aggregation-map keys and toggle
/// lookups. Two differently-cased spellings of the same ingredient name are
/// intentionally the same shopping item.
pub type ItemKey = String;

pub fn normalize_name(name: &str) -> ItemKey {
    name.trim().to_lowercase()
}

/// One line of the shopping list: the summed amount of every occurrence of an
/// ingredient across the plan. Name casing, unit and category come from the
/// first occurrence; amounts are summed without unit reconciliation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AggregatedItem {
    pub name: String,
    pub amount: f64,
    pub unit: String,
    pub category: String,
    pub checked: bool,
}

impl AggregatedItem {
    pub fn key(&self) -> ItemKey {
        normalize_name(&self.name)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AggregatedList {
    /// Items in first-seen insertion order.
    pub items: Vec<AggregatedItem>,
    /// Distinct categories in first-seen order.
    pub categories: Vec<String>,
}

impl AggregatedList {
    pub fn remaining_count(&self) -> usize {
        self.items.iter().filter(|i| !i.checked).count()
    }

    /// checked / total, defined as 0.0 for an empty list.
    pub fn completion_ratio(&self) -> f64 {
        if self.items.is_empty() {
            return 0.0;
        }
        let checked = self.items.iter().filter(|i| i.checked).count();
        checked as f64 / self.items.len() as f64
    }

    /// Items grouped by category for presentation, preserving first-seen
    /// category order and, within a category, item insertion order.
    pub fn grouped_by_category(&self) -> Vec<(&str, Vec<&AggregatedItem>)> {
        self.categories
            .iter()
            .map(|cat| {
                let members = self
                    .items
                    .iter()
                    .filter(|i| &i.category == cat)
                    .collect::<Vec<_>>();
                (cat.as_str(), members)
            })
            .collect()
    }

    /// The checked-state overlay to feed into the next `aggregate` call.
    /// Only keys still present in the list are carried, so an item that
    /// disappears from the plan and later reappears starts unchecked.
    pub fn checked_overlay(&self) -> HashMap<ItemKey, bool> {
        self.items.iter().map(|i| (i.key(), i.checked)).collect()
    }
}

/// Walks the plan's slots in stored order, resolves each scheduled recipe and
/// merges ingredient amounts by normalized name. Slots with no recipe id and
/// slots whose recipe is no longer in the catalog contribute nothing; neither
/// is an error. Pure with respect to its inputs, so recomputing on every
/// plan or catalog change is safe.
pub fn aggregate(
    plan: &WeeklyPlan,
    catalog: &RecipeCatalog,
    previous_checked: &HashMap<ItemKey, bool>,
) -> AggregatedList {
    let mut items: Vec<AggregatedItem> = Vec::new();
    let mut index_by_key: HashMap<ItemKey, usize> = HashMap::new();

    for slot in &plan.slots {
        let recipe_id = match slot.recipe_id.as_deref() {
            Some(id) => id,
            None => continue,
        };
        let recipe = match catalog.resolve(recipe_id) {
            Some(recipe) => recipe,
            None => {
                debug!(
                    "slot {} {} references unknown recipe '{}', skipping",
                    slot.date, slot.meal_type, recipe_id
                );
                continue;
            }
        };

        for ingredient in &recipe.ingredients {
            let key = normalize_name(&ingredient.name);
            match index_by_key.get(&key).copied() {
                Some(idx) => {
                    let existing = &mut items[idx];
                    if existing.unit != ingredient.unit {
                        // Known simplification: first-seen unit wins, amounts
                        // are summed without conversion.
                        debug!(
                            "unit mismatch for '{}': keeping '{}', adding amount given in '{}'",
                            existing.name, existing.unit, ingredient.unit
                        );
                    }
                    existing.amount += ingredient.amount;
                }
                None => {
                    let checked = previous_checked.get(&key).copied().unwrap_or(false);
                    index_by_key.insert(key, items.len());
                    items.push(AggregatedItem {
                        name: ingredient.name.clone(),
                        amount: ingredient.amount,
                        unit: ingredient.unit.clone(),
                        category: ingredient.category.clone(),
                        checked,
                    });
                }
            }
        }
    }

    let mut categories: Vec<String> = Vec::new();
    for item in &items {
        if !categories.contains(&item.category) {
            categories.push(item.category.clone());
        }
    }

    AggregatedList { items, categories }
}

/// Pure toggle transition: returns a new overlay with exactly one key
/// flipped. A key absent from the overlay counts as unchecked, so its first
/// toggle yields `true`.
pub fn toggle_item(overlay: &HashMap<ItemKey, bool>, key: &str) -> HashMap<ItemKey, bool> {
    let mut next = overlay.clone();
    let entry = next.entry(key.to_string()).or_insert(false);
    *entry = !*entry;
    next
}
