use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::quantity::parser::is_plural_unit;
use crate::quantity::{format_quantity, parse_quantity};
use crate::recipe::{Ingredient, Recipe};
use crate::scaling::{cooking_time_adjustment, scale_cooking_time, scaling_factor};

/// One ingredient of a recipe after per-recipe scaling.
///
/// Unparsable quantities come through untouched with `parsed: false` and
/// none of the scaling fields set.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScaledIngredient {
    #[serde(flatten)]
    pub ingredient: Ingredient,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaled_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaling_factor: Option<f64>,
    pub parsed: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScaledRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub scaled_ingredients: Vec<ScaledIngredient>,
    pub scaling_factor: f64,
    pub original_servings: u32,
    pub target_servings: u32,
    pub cooking_time_adjustment: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaled_prep_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaled_cook_time: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ShoppingListItem {
    pub name: String,
    pub quantity: String,
    pub category: String,
    pub notes: String,
}

/// A merged shopping-list line: every ingredient with the same normalized
/// name and unit, summed across recipes.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ConsolidatedEntry {
    pub name: String,
    pub quantity: String,
    pub category: String,
    pub notes: String,
    pub recipes: Vec<String>,
    #[serde(skip)]
    pub normalized_name: String,
    #[serde(skip)]
    pub unit: String,
    #[serde(skip)]
    pub total_amount: f64,
}

impl ScaledRecipe {
    /// Shopping list for this recipe alone, without merging.
    pub fn shopping_list(&self) -> Vec<ShoppingListItem> {
        let notes = format!("For {} ({} servings)", self.recipe.title, self.target_servings);
        self.scaled_ingredients
            .iter()
            .map(|scaled| ShoppingListItem {
                name: scaled.ingredient.name.clone(),
                quantity: scaled.ingredient.quantity_text().to_string(),
                category: scaled.ingredient.category_or_default().to_string(),
                notes: notes.clone(),
            })
            .collect()
    }
}

pub struct ConsolidationEngine {
    config: EngineConfig,
}

impl Default for ConsolidationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ConsolidationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn original_servings(&self, recipe: &Recipe) -> u32 {
        let servings = recipe.effective_servings(self.config.default_servings);
        if recipe.servings != Some(i64::from(servings)) {
            debug!(
                "Recipe '{}' has servings {:?}, assuming {}",
                recipe.title, recipe.servings, servings
            );
        }
        servings
    }

    /// Scales each recipe independently to `target_servings` without merging.
    pub fn scale_recipes(&self, recipes: &[Recipe], target_servings: u32) -> Result<Vec<ScaledRecipe>> {
        check_target(target_servings)?;
        let scaled = recipes
            .par_iter()
            .map(|recipe| self.scale_recipe(recipe, target_servings))
            .collect::<Result<Vec<_>>>()?;
        info!("Scaled {} recipes to {} servings", scaled.len(), target_servings);
        Ok(scaled)
    }

    pub fn scale_recipe(&self, recipe: &Recipe, target_servings: u32) -> Result<ScaledRecipe> {
        check_target(target_servings)?;
        let ingredients = recipe.ingredients()?;
        let original_servings = self.original_servings(recipe);
        let factor = scaling_factor(original_servings, target_servings);

        let scaled_ingredients = ingredients
            .iter()
            .map(|ingredient| scale_ingredient(ingredient, factor))
            .collect::<Result<Vec<_>>>()?;

        let adjustment = cooking_time_adjustment(factor);
        Ok(ScaledRecipe {
            recipe: recipe.clone(),
            scaled_ingredients,
            scaling_factor: factor,
            original_servings,
            target_servings,
            cooking_time_adjustment: adjustment,
            scaled_prep_time: recipe.prep_time.as_ref().map(|t| scale_cooking_time(t, adjustment)),
            scaled_cook_time: recipe.cook_time.as_ref().map(|t| scale_cooking_time(t, adjustment)),
        })
    }

    /// Builds one shopping list out of several recipes, each scaled to
    /// `target_servings`. Ingredients whose quantity cannot be parsed are left
    /// out. Entries come back in order of first appearance.
    pub fn consolidate(&self, recipes: &[Recipe], target_servings: u32) -> Result<Vec<ConsolidatedEntry>> {
        check_target(target_servings)?;

        let per_recipe = recipes
            .par_iter()
            .map(|recipe| self.scale_for_list(recipe, target_servings))
            .collect::<Result<Vec<_>>>()?;

        let builder = per_recipe
            .into_iter()
            .flatten()
            .fold(ShoppingListBuilder::default(), |mut builder, line| {
                builder.add(line);
                builder
            });
        let entries = builder.finish()?;
        info!(
            "Consolidated {} recipes into {} shopping list entries",
            recipes.len(),
            entries.len()
        );
        Ok(entries)
    }

    fn scale_for_list<'a>(&self, recipe: &'a Recipe, target_servings: u32) -> Result<Vec<ScaledLine<'a>>> {
        let ingredients = recipe.ingredients()?;
        let factor = scaling_factor(self.original_servings(recipe), target_servings);

        let lines = ingredients
            .iter()
            .filter_map(|ingredient| match parse_quantity(ingredient.quantity_text()) {
                Some(quantity) if (quantity.amount * factor).is_finite() => Some(ScaledLine {
                    name: &ingredient.name,
                    normalized_name: ingredient.normalized_name(),
                    unit_key: quantity.unit_key().to_string(),
                    unit: quantity.unit,
                    amount: quantity.amount * factor,
                    category: ingredient.category_or_default(),
                    recipe_title: &recipe.title,
                }),
                Some(_) => {
                    debug!(
                        "Dropping '{}' from '{}': {:?} overflows when scaled",
                        ingredient.name,
                        recipe.title,
                        ingredient.quantity_text()
                    );
                    None
                }
                None => {
                    debug!(
                        "Dropping '{}' from '{}': cannot parse quantity {:?}",
                        ingredient.name,
                        recipe.title,
                        ingredient.quantity_text()
                    );
                    None
                }
            })
            .collect();
        Ok(lines)
    }
}

fn check_target(target_servings: u32) -> Result<()> {
    if target_servings == 0 {
        return Err(EngineError::InvalidTargetServings(0));
    }
    Ok(())
}

fn scale_ingredient(ingredient: &Ingredient, factor: f64) -> Result<ScaledIngredient> {
    let Some(quantity) = parse_quantity(ingredient.quantity_text()) else {
        return Ok(unscaled(ingredient));
    };

    let scaled_amount = quantity.amount * factor;
    if !scaled_amount.is_finite() {
        debug!(
            "Keeping '{}' unscaled: {:?} overflows when scaled",
            ingredient.name,
            ingredient.quantity_text()
        );
        return Ok(unscaled(ingredient));
    }

    let mut scaled = ingredient.clone();
    scaled.quantity = Some(format_quantity(scaled_amount, &quantity.unit)?);
    Ok(ScaledIngredient {
        ingredient: scaled,
        original_quantity: ingredient.quantity.clone(),
        scaled_amount: Some(scaled_amount),
        unit: Some(quantity.unit),
        scaling_factor: Some(factor),
        parsed: true,
    })
}

fn unscaled(ingredient: &Ingredient) -> ScaledIngredient {
    ScaledIngredient {
        ingredient: ingredient.clone(),
        original_quantity: None,
        scaled_amount: None,
        unit: None,
        scaling_factor: None,
        parsed: false,
    }
}

struct ScaledLine<'a> {
    name: &'a str,
    normalized_name: String,
    unit_key: String,
    unit: String,
    amount: f64,
    category: &'a str,
    recipe_title: &'a str,
}

struct Accumulator<'a> {
    name: &'a str,
    normalized_name: String,
    /// Display unit: the first spelling seen, upgraded to a plural one.
    unit: String,
    total: f64,
    category: &'a str,
    recipes: Vec<&'a str>,
}

/// Call-local merge state: entries in first-seen order plus an index by
/// (normalized name, canonical unit).
#[derive(Default)]
struct ShoppingListBuilder<'a> {
    entries: Vec<Accumulator<'a>>,
    index: HashMap<(String, String), usize>,
}

impl<'a> ShoppingListBuilder<'a> {
    fn add(&mut self, line: ScaledLine<'a>) {
        let key = (line.normalized_name, line.unit_key);
        match self.index.get(&key) {
            Some(&slot) => {
                let entry = &mut self.entries[slot];
                let total = entry.total + line.amount;
                if !total.is_finite() {
                    debug!(
                        "Dropping '{}' from '{}': total for '{}' overflows",
                        line.name, line.recipe_title, entry.name
                    );
                    return;
                }
                entry.total = total;
                if !is_plural_unit(&entry.unit) && is_plural_unit(&line.unit) {
                    entry.unit = line.unit;
                }
                if !entry.recipes.contains(&line.recipe_title) {
                    entry.recipes.push(line.recipe_title);
                }
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(Accumulator {
                    name: line.name,
                    normalized_name: key.0,
                    unit: line.unit,
                    total: line.amount,
                    category: line.category,
                    recipes: vec![line.recipe_title],
                });
            }
        }
    }

    fn finish(self) -> Result<Vec<ConsolidatedEntry>> {
        self.entries
            .into_iter()
            .map(|entry| {
                Ok(ConsolidatedEntry {
                    name: entry.name.to_string(),
                    quantity: format_quantity(entry.total, &entry.unit)?,
                    category: entry.category.to_string(),
                    notes: format!("For: {}", entry.recipes.join(", ")),
                    recipes: entry.recipes.iter().map(|title| title.to_string()).collect(),
                    normalized_name: entry.normalized_name,
                    unit: entry.unit,
                    total_amount: entry.total,
                })
            })
            .collect()
    }
}

/// Groups entries by category, categories in order of first appearance.
pub fn group_by_category(entries: &[ConsolidatedEntry]) -> Vec<(&str, Vec<&ConsolidatedEntry>)> {
    let mut groups: Vec<(&str, Vec<&ConsolidatedEntry>)> = Vec::new();
    for entry in entries {
        match groups.iter_mut().find(|(category, _)| *category == entry.category) {
            Some((_, members)) => members.push(entry),
            None => groups.push((entry.category.as_str(), vec![entry])),
        }
    }
    groups
}
