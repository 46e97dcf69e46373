use thiserror::Error;

/// Failures that indicate a broken caller rather than bad recipe data.
///
/// Per-ingredient problems (an unparsable quantity, a missing serving count)
/// never show up here; they are recovered where they happen.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("recipe '{title}' has no ingredients array")]
    MissingIngredients { title: String },

    #[error("target servings must be a positive integer, got {0}")]
    InvalidTargetServings(i64),

    #[error("amount must be finite and non-negative, got {0}")]
    InvalidAmount(f64),

    #[error("default servings must be a positive integer, got '{0}'")]
    InvalidDefaultServings(String),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
