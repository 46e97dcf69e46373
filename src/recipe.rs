use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EngineError, Result};

pub const DEFAULT_CATEGORY: &str = "Other";

/// A recipe record as handed over by the persistence layer.
///
/// Fields the engine does not know about are kept in `extra` so they can be
/// echoed back untouched in the per-recipe scaling output.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<i64>,
    #[serde(default)]
    pub ingredients: Option<Vec<Ingredient>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<CookingTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<CookingTime>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Ingredient {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Prep/cook times are stored either as plain minutes or as free text
/// ("25 minutes", "1 hour").
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum CookingTime {
    Minutes(f64),
    Text(String),
}

impl Recipe {
    pub fn new(title: impl Into<String>, servings: Option<i64>, ingredients: Vec<Ingredient>) -> Self {
        Self {
            title: title.into(),
            servings,
            ingredients: Some(ingredients),
            ..Default::default()
        }
    }

    /// The ingredient list, or a contract violation if the record has none.
    pub fn ingredients(&self) -> Result<&[Ingredient]> {
        self.ingredients
            .as_deref()
            .ok_or_else(|| EngineError::MissingIngredients {
                title: self.title.clone(),
            })
    }

    /// Serving count used for scaling; absent or non-positive values fall back
    /// to `default_servings`.
    pub fn effective_servings(&self, default_servings: u32) -> u32 {
        match self.servings {
            Some(servings) if servings > 0 => u32::try_from(servings).unwrap_or(u32::MAX),
            _ => default_servings,
        }
    }
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: Some(quantity.into()),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn quantity_text(&self) -> &str {
        self.quantity.as_deref().unwrap_or("")
    }

    pub fn category_or_default(&self) -> &str {
        match self.category.as_deref() {
            Some(category) if !category.is_empty() => category,
            _ => DEFAULT_CATEGORY,
        }
    }

    /// Lowercased, trimmed name used as the first half of the merge key.
    pub fn normalized_name(&self) -> String {
        self.name.trim().to_lowercase()
    }
}
