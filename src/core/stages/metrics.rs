use crate::core::stages::round_to;
use crate::domain::model::{
    ClassRecord, RecordSet, ATTENDANCE_COLUMN, BASE_RATE_COLUMN, CAPACITY_COLUMN,
    DURATION_COLUMN, END_TIME_COLUMN, REGISTERED_COLUMN, START_TIME_COLUMN,
};
use crate::utils::error::{BillingError, Result};

pub const DEFAULT_CAPACITY: i64 = 8;
pub const DEFAULT_REGISTERED: i64 = 0;

/// Adds duration, base rate and attendance rate to every record.
pub fn derive_metrics(mut set: RecordSet, base_hourly_rate: f64) -> Result<RecordSet> {
    tracing::info!("⚙️ Calculating class durations and attendance");

    let base_rate_text = render_rate(base_hourly_rate);
    for record in &mut set.records {
        let (duration, duration_text) = class_duration(record)?;
        record.billing.duration_hours = Some(duration);
        record.set(DURATION_COLUMN, duration_text);

        record.billing.base_rate = Some(base_hourly_rate);
        record.set(BASE_RATE_COLUMN, base_rate_text.as_str());

        let attendance = attendance_rate(record)?;
        tracing::debug!(
            "Row {}: {}h, attendance {}",
            record.row,
            duration,
            attendance
        );
        record.set(ATTENDANCE_COLUMN, attendance);
    }

    Ok(set)
}

/// Shortest round-trip text with at least one fractional digit: `20.0`, `22.5`.
pub fn render_rate(value: f64) -> String {
    format!("{:?}", value)
}

/// Converts `HH:MM` (24h) to fractional hours.
pub fn time_to_hours(value: &str) -> std::result::Result<f64, String> {
    let (hours, minutes) = value
        .trim()
        .split_once(':')
        .ok_or_else(|| "expected HH:MM".to_string())?;

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hours) || hours.len() > 2 || !all_digits(minutes) || minutes.len() != 2 {
        return Err("expected HH:MM".to_string());
    }

    let hours: u32 = hours.parse().map_err(|_| "expected HH:MM".to_string())?;
    let minutes: u32 = minutes.parse().map_err(|_| "expected HH:MM".to_string())?;
    if hours > 23 || minutes > 59 {
        return Err("time out of range".to_string());
    }

    Ok(hours as f64 + minutes as f64 / 60.0)
}

/// End minus start, rounded to one decimal. End before start gives a
/// negative duration; classes past midnight are not supported.
pub fn class_duration(record: &ClassRecord) -> Result<(f64, String)> {
    let start = parse_time(record, START_TIME_COLUMN)?;
    let end = parse_time(record, END_TIME_COLUMN)?;
    Ok(round_to(end - start, 1))
}

fn parse_time(record: &ClassRecord, column: &str) -> Result<f64> {
    let value = record.get(column).ok_or_else(|| BillingError::FieldParse {
        row: record.row,
        field: column.to_string(),
        value: String::new(),
        reason: "column missing".to_string(),
    })?;

    time_to_hours(value).map_err(|reason| BillingError::FieldParse {
        row: record.row,
        field: column.to_string(),
        value: value.to_string(),
        reason,
    })
}

/// Registered over capacity as a percentage with one decimal, e.g. `"75.0%"`.
/// Signed counts pass through unchanged, so `-1` of 8 gives `"-12.5%"`.
pub fn attendance_rate(record: &ClassRecord) -> Result<String> {
    let registered = parse_count(record, REGISTERED_COLUMN, DEFAULT_REGISTERED)?;
    let capacity = parse_count(record, CAPACITY_COLUMN, DEFAULT_CAPACITY)?;

    if capacity == 0 {
        return Err(BillingError::FieldParse {
            row: record.row,
            field: CAPACITY_COLUMN.to_string(),
            value: "0".to_string(),
            reason: "capacity must be greater than zero".to_string(),
        });
    }

    let rate = registered as f64 / capacity as f64 * 100.0;
    Ok(format!("{:.1}%", rate))
}

fn parse_count(record: &ClassRecord, column: &str, default: i64) -> Result<i64> {
    match record.get(column).map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| BillingError::FieldParse {
            row: record.row,
            field: column.to_string(),
            value: value.to_string(),
            reason: "expected an integer".to_string(),
        }),
    }
}
