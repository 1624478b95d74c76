use serde::Serialize;
use std::collections::HashMap;

pub const DATE_COLUMN: &str = "Datum";
pub const NAME_COLUMN: &str = "Name";
pub const INSTRUCTOR_COLUMN: &str = "Trainer";
pub const STATUS_COLUMN: &str = "Status";
pub const START_TIME_COLUMN: &str = "Startzeit";
pub const END_TIME_COLUMN: &str = "Endzeit";
pub const REGISTERED_COLUMN: &str = "Angemeldet";
pub const CAPACITY_COLUMN: &str = "Max. Teilnehmer";

pub const DURATION_COLUMN: &str = "Dauer-in-Stunden";
pub const BASE_RATE_COLUMN: &str = "Stundensatz-Basis";
pub const ATTENDANCE_COLUMN: &str = "Anmeldequote";
pub const BONUS_COLUMN: &str = "Bonus-Faktor";
pub const FINAL_RATE_COLUMN: &str = "Stundensatz-Final";
pub const TOTAL_AMOUNT_COLUMN: &str = "Stundenbetrag";

/// Columns every export must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = [DATE_COLUMN, NAME_COLUMN, INSTRUCTOR_COLUMN];

/// Derived columns in the order they are appended to the output header.
pub const DERIVED_COLUMNS: [&str; 6] = [
    DURATION_COLUMN,
    BASE_RATE_COLUMN,
    ATTENDANCE_COLUMN,
    BONUS_COLUMN,
    FINAL_RATE_COLUMN,
    TOTAL_AMOUNT_COLUMN,
];

/// Date label of the trailing totals row. Invoice rendering matches on it.
pub const SUMMARY_LABEL: &str = "Gesamt (Monat)";

/// Value given to cells a record never had.
pub const BACKFILL_VALUE: &str = "";

/// Numeric values produced by the derivation stages, kept alongside the
/// rendered text so later stages never parse their own output.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Billing {
    pub duration_hours: Option<f64>,
    pub base_rate: Option<f64>,
    pub bonus_multiplier: Option<f64>,
    pub final_rate: Option<f64>,
    pub total_amount: Option<f64>,
}

/// One class entry of the activity export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassRecord {
    /// 1-based data row in the source file, header excluded.
    pub row: usize,
    fields: HashMap<String, String>,
    pub billing: Billing,
}

impl ClassRecord {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            ..Self::default()
        }
    }

    pub fn from_pairs<K, V>(row: usize, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Self::new(row);
        for (key, value) in pairs {
            record.set(key, value);
        }
        record
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub(crate) fn get_mut(&mut self, column: &str) -> Option<&mut String> {
        self.fields.get_mut(column)
    }
}

/// Records of one run together with the canonical column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    /// Path of the file the records were loaded from.
    pub source: String,
    pub columns: Vec<String>,
    pub records: Vec<ClassRecord>,
}

impl RecordSet {
    pub fn new(source: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            source: source.into(),
            columns,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Trailing totals row. Cells not set explicitly render blank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryRecord {
    fields: HashMap<String, String>,
}

impl SummaryRecord {
    pub fn new() -> Self {
        let mut summary = Self::default();
        summary.set(DATE_COLUMN, SUMMARY_LABEL);
        summary
    }

    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    pub(crate) fn get_mut(&mut self, column: &str) -> Option<&mut String> {
        self.fields.get_mut(column)
    }
}

/// Output of the transform phase, ready for the writer.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingSheet {
    pub records: RecordSet,
    pub summary: SummaryRecord,
}

/// What a finished run reports back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub input_file: String,
    pub output_file: String,
    pub loaded_records: usize,
    pub billed_records: usize,
    pub total_hours: String,
    pub total_amount: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_record_defaults_to_blank() {
        let summary = SummaryRecord::new();
        assert_eq!(summary.get(DATE_COLUMN), SUMMARY_LABEL);
        assert_eq!(summary.get(NAME_COLUMN), "");
        assert_eq!(summary.get(TOTAL_AMOUNT_COLUMN), "");
    }

    #[test]
    fn test_class_record_from_pairs() {
        let record = ClassRecord::from_pairs(3, [(DATE_COLUMN, "01.03.2025"), (NAME_COLUMN, "Yoga")]);
        assert_eq!(record.row, 3);
        assert_eq!(record.get(NAME_COLUMN), Some("Yoga"));
        assert!(!record.contains(INSTRUCTOR_COLUMN));
    }
}
