use crate::core::stages::{missing_derived, round_to};
use crate::domain::model::{
    RecordSet, BASE_RATE_COLUMN, BONUS_COLUMN, DURATION_COLUMN, FINAL_RATE_COLUMN,
    TOTAL_AMOUNT_COLUMN,
};
use crate::utils::error::Result;

/// Base rate times bonus, rounded to cents.
pub fn final_rate(base_rate: f64, multiplier: f64) -> (f64, String) {
    round_to(base_rate * multiplier, 2)
}

/// Rounded rate times rounded duration, rounded to cents again.
pub fn total_amount(final_rate: f64, duration_hours: f64) -> (f64, String) {
    round_to(final_rate * duration_hours, 2)
}

pub fn calculate_amounts(mut set: RecordSet) -> Result<RecordSet> {
    tracing::info!("⚙️ Calculating final payment amounts");

    for record in &mut set.records {
        let billing = record.billing;
        let base_rate = billing
            .base_rate
            .ok_or_else(|| missing_derived(record, BASE_RATE_COLUMN))?;
        let multiplier = billing
            .bonus_multiplier
            .ok_or_else(|| missing_derived(record, BONUS_COLUMN))?;
        let duration = billing
            .duration_hours
            .ok_or_else(|| missing_derived(record, DURATION_COLUMN))?;

        let (rate, rate_text) = final_rate(base_rate, multiplier);
        let (amount, amount_text) = total_amount(rate, duration);
        tracing::debug!("Row {}: {} x {}h = {}", record.row, rate_text, duration, amount_text);

        record.billing.final_rate = Some(rate);
        record.billing.total_amount = Some(amount);
        record.set(FINAL_RATE_COLUMN, rate_text);
        record.set(TOTAL_AMOUNT_COLUMN, amount_text);
    }

    Ok(set)
}
