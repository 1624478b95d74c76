use crate::domain::model::{ClassRecord, RecordSet, INSTRUCTOR_COLUMN, STATUS_COLUMN};
use crate::utils::error::{BillingError, Result};

/// Statuses of classes that did not take place.
pub const EXCLUDED_STATUSES: [&str; 2] = ["Storniert", "Abgesagt"];

/// Exact comparison: no trimming, no case folding.
pub fn is_billable(record: &ClassRecord, instructor: &str) -> bool {
    let cancelled = record
        .get(STATUS_COLUMN)
        .is_some_and(|status| EXCLUDED_STATUSES.contains(&status));
    !cancelled && record.get(INSTRUCTOR_COLUMN) == Some(instructor)
}

pub fn filter_records(mut set: RecordSet, instructor: &str) -> Result<RecordSet> {
    let before = set.len();
    set.records.retain(|record| is_billable(record, instructor));

    tracing::info!(
        "Kept {} of {} classes for instructor '{}'",
        set.len(),
        before,
        instructor
    );

    ensure_billable(&set, instructor)?;
    Ok(set)
}

pub fn ensure_billable(set: &RecordSet, instructor: &str) -> Result<()> {
    if set.is_empty() {
        tracing::error!("No valid classes found in the input file after filtering");
        return Err(BillingError::NoBillableRecords {
            instructor: instructor.to_string(),
        });
    }
    Ok(())
}
