//! The billing stages, in the order the pipeline runs them.
//!
//! Every stage takes the record set by value and hands back an owned value,
//! so no stage keeps a reference into data a later stage mutates.

pub mod aggregation;
pub mod amount;
pub mod bonus;
pub mod filter;
pub mod loader;
pub mod locale;
pub mod metrics;
pub mod reconcile;
pub mod writer;

use crate::domain::model::ClassRecord;
use crate::utils::error::BillingError;

/// Rounds through the decimal text that ends up in the output, so a value
/// and its rendering never disagree.
pub(crate) fn round_to(value: f64, decimals: usize) -> (f64, String) {
    let text = format!("{:.*}", decimals, value);
    let rounded = text.parse().unwrap_or(value);
    (rounded, text)
}

/// A derived value that an earlier stage should have produced is missing.
pub(crate) fn missing_derived(record: &ClassRecord, column: &str) -> BillingError {
    BillingError::FieldParse {
        row: record.row,
        field: column.to_string(),
        value: String::new(),
        reason: "derived value missing; stages ran out of order".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_matches_rendered_text() {
        assert_eq!(round_to(1.5, 1), (1.5, "1.5".to_string()));
        assert_eq!(round_to(2.0 / 3.0, 2), (0.67, "0.67".to_string()));
        assert_eq!(round_to(-0.5, 1), (-0.5, "-0.5".to_string()));
    }
}
