use crate::core::stages::filter::ensure_billable;
use crate::core::stages::{missing_derived, round_to};
use crate::domain::model::{
    RecordSet, SummaryRecord, DURATION_COLUMN, TOTAL_AMOUNT_COLUMN,
};
use crate::utils::error::Result;

/// Builds the totals row from the rounded per-record values.
///
/// The amount total is the sum of the per-record amounts as rendered, so it
/// always equals what a reader gets by adding up the `Stundenbetrag` column.
pub fn aggregate(set: RecordSet, instructor: &str) -> Result<(RecordSet, SummaryRecord)> {
    tracing::info!("⚙️ Adding summary totals");
    ensure_billable(&set, instructor)?;

    let mut total_hours = 0.0;
    let mut total_payment = 0.0;
    for record in &set.records {
        total_hours += record
            .billing
            .duration_hours
            .ok_or_else(|| missing_derived(record, DURATION_COLUMN))?;
        total_payment += record
            .billing
            .total_amount
            .ok_or_else(|| missing_derived(record, TOTAL_AMOUNT_COLUMN))?;
    }

    let (_, hours_text) = round_to(total_hours, 1);
    let (_, payment_text) = round_to(total_payment, 2);
    tracing::info!(
        "Totals for {} classes: {}h, {}",
        set.len(),
        hours_text,
        payment_text
    );

    let mut summary = SummaryRecord::new();
    summary.set(DURATION_COLUMN, hours_text);
    summary.set(TOTAL_AMOUNT_COLUMN, payment_text);

    Ok((set, summary))
}
