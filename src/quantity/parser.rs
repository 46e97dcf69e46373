//! Two-rule grammar for ingredient quantities.
//!
//! ```text
//! quantity := fraction | decimal
//! fraction := [DIGITS WS+] DIGITS "/" DIGITS [WS*] [unit]
//! decimal  := (DIGITS ["." DIGITS*] | "." DIGITS) [WS*] [unit]
//! unit     := rest of the text, trimmed, lowercased, inner whitespace collapsed
//! ```
//!
//! The fraction rule is tried first, otherwise "1 1/2 cups" would read as the
//! number 1 with the unit "1/2 cups".

use super::Quantity;

/// Parses a raw quantity such as `"1 1/2 cups"`, `"2.5 oz"` or `"3"`.
///
/// Returns `None` when the text does not start with a number (`""`,
/// `"a pinch"`), names a fraction with a zero denominator, or overflows.
pub fn parse_quantity(text: &str) -> Option<Quantity> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    match fraction_rule(text) {
        RuleMatch::Matched(quantity) => Some(quantity),
        RuleMatch::Rejected => None,
        RuleMatch::NoMatch => decimal_rule(text),
    }
}

enum RuleMatch {
    Matched(Quantity),
    /// Shape matched but the value is unusable (zero denominator, overflow).
    Rejected,
    NoMatch,
}

fn fraction_rule(text: &str) -> RuleMatch {
    let re = regex!(r"(?s)^(?:([0-9]+)[ \t]+)?([0-9]+)/([0-9]+)\s*(.*)$");

    let Some(cap) = re.captures(text) else {
        return RuleMatch::NoMatch;
    };
    let whole = cap.get(1).map_or(0.0, |m| parse_digits(m.as_str()));
    let numerator = cap.get(2).map_or(0.0, |m| parse_digits(m.as_str()));
    let denominator = cap.get(3).map_or(0.0, |m| parse_digits(m.as_str()));
    let rest = cap.get(4).map_or("", |m| m.as_str());

    let amount = whole + numerator / denominator;
    if denominator == 0.0 || !amount.is_finite() {
        return RuleMatch::Rejected;
    }
    RuleMatch::Matched(Quantity {
        amount,
        unit: normalize_unit(rest),
    })
}

fn decimal_rule(text: &str) -> Option<Quantity> {
    let re = regex!(r"(?s)^([0-9]+(?:\.[0-9]*)?|\.[0-9]+)\s*(.*)$");

    let cap = re.captures(text)?;
    let number = cap.get(1)?;
    // A bare numerator belongs to the fraction rule, which already declined it.
    if text[number.end()..].starts_with('/') {
        return None;
    }

    let amount = number.as_str().parse::<f64>().ok()?;
    if !amount.is_finite() {
        return None;
    }
    Some(Quantity {
        amount,
        unit: normalize_unit(cap.get(2).map_or("", |m| m.as_str())),
    })
}

/// Lowercases, trims and collapses whitespace runs inside the unit.
pub fn normalize_unit(unit: &str) -> String {
    unit.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Merge key for a normalized unit: a trailing plural "s" is dropped so that
/// "cup" and "cups" compare equal ("glass" keeps its double "s").
pub fn canonical_unit(unit: &str) -> &str {
    match unit.strip_suffix('s') {
        Some(stem) if !stem.is_empty() && !stem.ends_with('s') => stem,
        _ => unit,
    }
}

/// True when `unit` is the plural spelling of its canonical form.
pub fn is_plural_unit(unit: &str) -> bool {
    canonical_unit(unit).len() < unit.len()
}

fn parse_digits(digits: &str) -> f64 {
    // ASCII digits only, so this can overflow to infinity but never fail.
    digits.parse::<f64>().unwrap_or(f64::INFINITY)
}
