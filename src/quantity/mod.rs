//! Free-text quantities: parsing "1 1/2 cups" into numbers and rendering
//! scaled numbers back into cooking fractions.

use serde::{Deserialize, Serialize};

pub mod fraction;
pub mod parser;

pub use fraction::{format_quantity, to_fraction_string};
pub use parser::parse_quantity;

/// A parsed amount with its normalized (lowercase, possibly empty) unit.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Quantity {
    pub amount: f64,
    pub unit: String,
}

impl Quantity {
    /// Unit form used when deciding whether two quantities can be summed.
    pub fn unit_key(&self) -> &str {
        parser::canonical_unit(&self.unit)
    }
}
