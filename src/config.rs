use dotenv::dotenv;
use std::env;

use crate::error::{EngineError, Result};

pub const DEFAULT_SERVINGS_ENV_VAR: &str = "RECIPE_DEFAULT_SERVINGS";
pub const FALLBACK_DEFAULT_SERVINGS: u32 = 4;

/// Policy knobs for a consolidation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Serving count assumed for recipes that carry none (or a non-positive one).
    pub default_servings: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_servings: FALLBACK_DEFAULT_SERVINGS,
        }
    }
}

impl EngineConfig {
    pub fn with_default_servings(default_servings: u32) -> Result<Self> {
        if default_servings == 0 {
            return Err(EngineError::InvalidDefaultServings(default_servings.to_string()));
        }
        Ok(Self { default_servings })
    }

    /// Reads `RECIPE_DEFAULT_SERVINGS` (after loading any `.env` file).
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        match env::var(DEFAULT_SERVINGS_ENV_VAR) {
            Ok(raw) => Self::from_setting(&raw),
            Err(_) => Ok(Self::default()),
        }
    }

    fn from_setting(raw: &str) -> Result<Self> {
        let servings = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| EngineError::InvalidDefaultServings(raw.to_string()))?;
        Self::with_default_servings(servings)
    }
}
