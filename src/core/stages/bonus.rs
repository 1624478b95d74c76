use crate::core::stages::{metrics::render_rate, missing_derived};
use crate::domain::model::{RecordSet, ATTENDANCE_COLUMN, BONUS_COLUMN};
use crate::utils::error::Result;

/// Tier lookup on the rendered attendance text, not on the ratio: `"50.0%"`
/// earns the bonus, `"50.4%"` and `"75.0%"` do not.
pub fn bonus_multiplier(attendance_rate: &str) -> f64 {
    match attendance_rate {
        "100.0%" => 2.0,
        "50.0%" => 1.5,
        _ => 1.0,
    }
}

pub fn apply_bonus(mut set: RecordSet) -> Result<RecordSet> {
    tracing::info!("⚙️ Applying bonus factors");

    for record in &mut set.records {
        let multiplier = record
            .get(ATTENDANCE_COLUMN)
            .map(bonus_multiplier)
            .ok_or_else(|| missing_derived(record, ATTENDANCE_COLUMN))?;

        record.billing.bonus_multiplier = Some(multiplier);
        record.set(BONUS_COLUMN, render_rate(multiplier));
    }

    Ok(set)
}
