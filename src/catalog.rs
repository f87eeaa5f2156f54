use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use log::debug;

/// An ingredient as declared on a recipe. `amount` is the quantity for the
/// whole recipe in `unit`; `category` is the shopping aisle (e.g. "Produce").
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
    pub category: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub prep_time_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
}

/// Ordered, append-only collection of recipes. Existing entries are never
/// mutated in place; growth comes from suggestion merges or explicit pushes.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
}

impl RecipeCatalog {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        RecipeCatalog { recipes }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {:?}", path))?;
        let recipes: Vec<Recipe> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog file {:?}", path))?;
        Ok(RecipeCatalog { recipes })
    }

    pub fn resolve(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn push(&mut self, recipe: Recipe) {
        self.recipes.push(recipe);
    }

    /// Appends every incoming recipe whose id is not already in the catalog.
    /// Returns the number actually added.
    pub fn merge(&mut self, incoming: Vec<Recipe>) -> usize {
        let mut added = 0;
        for recipe in incoming {
            if self.resolve(&recipe.id).is_some() {
                debug!("skipping duplicate recipe id '{}'", recipe.id);
                continue;
            }
            self.recipes.push(recipe);
            added += 1;
        }
        added
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
