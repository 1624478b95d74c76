use crate::core::stages::loader::DELIMITER;
use crate::domain::model::{BillingSheet, BACKFILL_VALUE};
use crate::domain::ports::Storage;
use crate::utils::error::{BillingError, Result};
use std::path::Path;

pub const OUTPUT_PREFIX: &str = "processed-";

/// `<output_dir>/processed-<input file name>`.
pub fn output_path_for(source: &str, output_dir: &str) -> String {
    let file_name = Path::new(source)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string());

    Path::new(output_dir)
        .join(format!("{}{}", OUTPUT_PREFIX, file_name))
        .to_string_lossy()
        .into_owned()
}

/// Serializes header, records and the summary line into one buffer.
pub fn render_csv(sheet: &BillingSheet, output_path: &str) -> Result<Vec<u8>> {
    let columns = &sheet.records.columns;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(columns)?;
    for record in &sheet.records.records {
        writer.write_record(
            columns
                .iter()
                .map(|column| record.get(column).unwrap_or(BACKFILL_VALUE)),
        )?;
    }
    writer.write_record(columns.iter().map(|column| sheet.summary.get(column)))?;

    writer.into_inner().map_err(|e| BillingError::Write {
        path: output_path.to_string(),
        source: e.into_error(),
    })
}

/// Writes the finished sheet in a single call; a failed run leaves no file.
pub fn write_sheet<S: Storage>(storage: &S, sheet: &BillingSheet, output_path: &str) -> Result<()> {
    let data = render_csv(sheet, output_path)?;
    tracing::debug!("Writing {} bytes to '{}'", data.len(), output_path);
    storage.write_file(output_path, &data)?;
    tracing::info!("Processed data written to '{}'", output_path);
    Ok(())
}
