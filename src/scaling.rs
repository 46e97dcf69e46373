use crate::error::{EngineError, Result};
use crate::recipe::CookingTime;

/// Checks a caller-supplied target serving count.
pub fn validate_target_servings(target_servings: i64) -> Result<u32> {
    match u32::try_from(target_servings) {
        Ok(target) if target > 0 => Ok(target),
        _ => Err(EngineError::InvalidTargetServings(target_servings)),
    }
}

/// `target / original`; callers guarantee both are positive.
pub fn scaling_factor(original_servings: u32, target_servings: u32) -> f64 {
    f64::from(target_servings) / f64::from(original_servings)
}

/// Scales one amount from `original_servings` to `target_servings`.
pub fn scale(amount: f64, original_servings: u32, target_servings: u32) -> f64 {
    amount * scaling_factor(original_servings, target_servings)
}

/// Cooking time does not grow linearly with the batch size: each doubling
/// adds 30% and each halving removes 20%.
pub fn cooking_time_adjustment(scaling_factor: f64) -> f64 {
    if scaling_factor > 1.0 {
        1.0 + scaling_factor.log2() * 0.3
    } else if scaling_factor < 1.0 && scaling_factor > 0.0 {
        1.0 - (1.0 / scaling_factor).log2() * 0.2
    } else {
        1.0
    }
}

/// Applies a time adjustment to the first "<number> <unit>" in `text`
/// ("25 minutes" -> "30 minutes"). Text without a recognisable time is
/// returned as is.
pub fn scale_time_text(text: &str, adjustment: f64) -> String {
    let re = regex!(r"(?i)([0-9]+)\s*(minutes?|mins?|hours?|hrs?)");

    let Some(cap) = re.captures(text) else {
        return text.to_string();
    };
    match (cap.get(1), cap.get(2)) {
        (Some(number), Some(unit)) => match number.as_str().parse::<f64>() {
            Ok(amount) => format!("{} {}", (amount * adjustment).round(), unit.as_str()),
            Err(_) => text.to_string(),
        },
        _ => text.to_string(),
    }
}

/// Scaled rendering of a stored prep/cook time.
pub fn scale_cooking_time(time: &CookingTime, adjustment: f64) -> String {
    match time {
        CookingTime::Minutes(minutes) => format!("{} minutes", (minutes * adjustment).round()),
        CookingTime::Text(text) => scale_time_text(text, adjustment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_doubles_amount() {
        assert_eq!(scale(2.0, 4, 8), 4.0);
        assert_eq!(scale(1.0, 2, 8), 4.0);
        assert_eq!(scale(3.0, 6, 2), 1.0);
    }

    #[test]
    fn test_validate_target_servings() {
        assert_eq!(validate_target_servings(8), Ok(8));
        assert_eq!(validate_target_servings(0), Err(EngineError::InvalidTargetServings(0)));
        assert_eq!(validate_target_servings(-2), Err(EngineError::InvalidTargetServings(-2)));
    }

    #[test]
    fn test_scaling_factor() {
        assert_eq!(scaling_factor(4, 8), 2.0);
        assert_eq!(scaling_factor(4, 2), 0.5);
        assert_eq!(scaling_factor(4, 4), 1.0);
    }

    #[test]
    fn test_cooking_time_adjustment() {
        assert_eq!(cooking_time_adjustment(1.0), 1.0);
        assert!((cooking_time_adjustment(2.0) - 1.3).abs() < 1e-12);
        assert!((cooking_time_adjustment(4.0) - 1.6).abs() < 1e-12);
        assert!((cooking_time_adjustment(0.5) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_scale_time_text() {
        assert_eq!(scale_time_text("20 minutes", 1.3), "26 minutes");
        assert_eq!(scale_time_text("Bake 45 Mins until golden", 0.8), "36 Mins");
        assert_eq!(scale_time_text("2hrs", 1.5), "3 hrs");
        assert_eq!(scale_time_text("overnight", 2.0), "overnight");
        assert_eq!(scale_time_text("350 degrees", 2.0), "350 degrees");
        assert_eq!(scale_time_text("Rest 10 MINUTES, then 1 hour", 2.0), "20 MINUTES");
    }

    #[test]
    fn test_scale_cooking_time_minutes() {
        assert_eq!(scale_cooking_time(&CookingTime::Minutes(30.0), 1.3), "39 minutes");
        assert_eq!(
            scale_cooking_time(&CookingTime::Text("1 hour".to_string()), 1.6),
            "2 hour"
        );
    }
}
