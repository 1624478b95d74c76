use crate::domain::model::{ClassRecord, RecordSet, REQUIRED_COLUMNS};
use crate::utils::error::{BillingError, Result};

pub const DELIMITER: u8 = b';';

/// Parses a `;`-delimited activity export into a [`RecordSet`].
///
/// The header is checked for the required columns before any data row is
/// read. Values are kept exactly as they appear in the file; header names are
/// trimmed.
pub fn load_records(data: &[u8], source: &str) -> Result<RecordSet> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    if headers.iter().all(|header| header.trim().is_empty()) {
        tracing::error!("Input file '{}' is empty or missing header row", source);
        return Err(BillingError::EmptyInput {
            path: source.to_string(),
        });
    }

    let columns: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
    check_required_columns(&columns)?;
    tracing::info!("✅ All required columns are present in '{}'", source);

    let mut set = RecordSet::new(source, columns);
    for (index, result) in reader.records().enumerate() {
        let row = result?;
        let row_number = index + 1;

        if row.len() > set.columns.len() {
            tracing::warn!(
                "Row {} has {} cells but the header has {}; extra cells dropped",
                row_number,
                row.len(),
                set.columns.len()
            );
        }

        let record = ClassRecord::from_pairs(
            row_number,
            set.columns.iter().map(String::as_str).zip(row.iter()),
        );
        set.records.push(record);
    }

    tracing::info!("📥 Loaded {} records from '{}'", set.len(), source);
    Ok(set)
}

pub fn check_required_columns(columns: &[String]) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !columns.iter().any(|column| column == *required))
        .map(|required| required.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        tracing::error!("Missing required columns: {}", missing.join(", "));
        Err(BillingError::MissingColumns { columns: missing })
    }
}
