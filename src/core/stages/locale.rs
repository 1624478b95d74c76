use crate::domain::model::{
    BillingSheet, BASE_RATE_COLUMN, BONUS_COLUMN, DURATION_COLUMN, FINAL_RATE_COLUMN,
    TOTAL_AMOUNT_COLUMN,
};

/// Record columns rewritten to decimal commas. The attendance rate keeps its point.
pub const NUMERIC_COLUMNS: [&str; 5] = [
    DURATION_COLUMN,
    BASE_RATE_COLUMN,
    BONUS_COLUMN,
    FINAL_RATE_COLUMN,
    TOTAL_AMOUNT_COLUMN,
];

/// Summary columns rewritten to decimal commas.
pub const SUMMARY_NUMERIC_COLUMNS: [&str; 2] = [DURATION_COLUMN, TOTAL_AMOUNT_COLUMN];

pub fn to_decimal_comma(value: &str) -> String {
    value.replace('.', ",")
}

/// Last transform step. Afterwards the numeric columns are display text.
pub fn localize(mut sheet: BillingSheet) -> BillingSheet {
    tracing::info!("⚙️ Formatting numbers with decimal commas");

    for record in &mut sheet.records.records {
        for column in NUMERIC_COLUMNS {
            if let Some(value) = record.get_mut(column) {
                *value = to_decimal_comma(value);
            }
        }
    }

    for column in SUMMARY_NUMERIC_COLUMNS {
        if let Some(value) = sheet.summary.get_mut(column) {
            *value = to_decimal_comma(value);
        }
    }

    sheet
}
