use crate::error::{EngineError, Result};

const RELATIVE_TOLERANCE: f64 = 1.0e-6;
/// Fraction strings this long or longer read worse than the decimal.
const MAX_FRACTION_LEN: usize = 8;
const MAX_TERMS: usize = 32;
const MAX_PARTIAL_QUOTIENT: f64 = 1.0e9;

/// Renders an amount for display, e.g. `1.5, "cups"` -> `"1 1/2 cups"`.
///
/// The amount is rounded to two decimals first, then shown as a whole
/// number, a (mixed) fraction, or the rounded decimal when the fraction
/// would be unwieldy. Negative and non-finite amounts are rejected.
pub fn format_quantity(amount: f64, unit: &str) -> Result<String> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(EngineError::InvalidAmount(amount));
    }

    let rounded = round_to_hundredths(amount);
    let fraction = to_fraction_string(rounded);
    let number = if fraction.len() < MAX_FRACTION_LEN {
        fraction
    } else {
        rounded.to_string()
    };

    Ok(format!("{} {}", number, unit.trim()).trim().to_string())
}

/// Continued-fraction approximation of a non-negative finite value.
///
/// Stops at the first convergent that is within `1e-6 * value` of the target
/// or that rounds to the same hundredths as the target, so 0.33 becomes
/// `1/3` rather than `33/100`.
pub fn to_fraction_string(value: f64) -> String {
    if value.fract() == 0.0 {
        return value.to_string();
    }

    let tolerance = value * RELATIVE_TOLERANCE;
    let (mut h1, mut h2, mut k1, mut k2): (u64, u64, u64, u64) = (1, 0, 0, 1);
    let mut b = value;

    for _ in 0..MAX_TERMS {
        let a = b.floor();
        if a > MAX_PARTIAL_QUOTIENT {
            break;
        }
        let a = a as u64;
        let next = a
            .checked_mul(h1)
            .and_then(|h| h.checked_add(h2))
            .zip(a.checked_mul(k1).and_then(|k| k.checked_add(k2)));
        let Some((h, k)) = next else {
            break;
        };
        (h2, h1) = (h1, h);
        (k2, k1) = (k1, k);

        let approx = h1 as f64 / k1 as f64;
        if (value - approx).abs() <= tolerance || round_to_hundredths(approx) == value {
            break;
        }

        let remainder = b - b.floor();
        if remainder <= f64::EPSILON {
            break;
        }
        b = 1.0 / remainder;
    }

    if k1 == 0 {
        return value.to_string();
    }

    if h1 >= k1 {
        let whole = h1 / k1;
        let remainder = h1 % k1;
        if remainder == 0 {
            return whole.to_string();
        }
        return format!("{} {}/{}", whole, remainder, k1);
    }

    format!("{}/{}", h1, k1)
}

fn round_to_hundredths(value: f64) -> f64 {
    let scaled = value * 100.0;
    // Anything this large is already a whole number.
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}
