use crate::domain::model::{RecordSet, BACKFILL_VALUE, DERIVED_COLUMNS};

/// Appends the derived columns to the header and backfills cells a record
/// never had, so every record covers the full column list. The summary is
/// not touched; its unset cells already render blank.
pub fn reconcile_fields(mut set: RecordSet) -> RecordSet {
    for column in DERIVED_COLUMNS {
        if !set.columns.iter().any(|existing| existing == column) {
            set.columns.push(column.to_string());
        }
    }

    let mut backfilled = 0;
    for record in &mut set.records {
        for column in &set.columns {
            if !record.contains(column) {
                record.set(column.as_str(), BACKFILL_VALUE);
                backfilled += 1;
            }
        }
    }

    if backfilled > 0 {
        tracing::debug!("Backfilled {} missing cells", backfilled);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ClassRecord, DURATION_COLUMN, STATUS_COLUMN, TOTAL_AMOUNT_COLUMN};

    #[test]
    fn test_derived_columns_appended_in_fixed_order() {
        let set = RecordSet::new("export.csv", vec!["Datum".into(), "Name".into()]);
        let set = reconcile_fields(set);

        assert_eq!(
            set.columns,
            vec![
                "Datum",
                "Name",
                "Dauer-in-Stunden",
                "Stundensatz-Basis",
                "Anmeldequote",
                "Bonus-Faktor",
                "Stundensatz-Final",
                "Stundenbetrag",
            ]
        );
    }

    #[test]
    fn test_existing_derived_column_keeps_its_position() {
        let set = RecordSet::new(
            "export.csv",
            vec![TOTAL_AMOUNT_COLUMN.into(), "Datum".into()],
        );
        let set = reconcile_fields(set);

        assert_eq!(set.columns[0], TOTAL_AMOUNT_COLUMN);
        assert_eq!(set.columns[2], DURATION_COLUMN);
        assert_eq!(set.columns.len(), 7);
    }

    #[test]
    fn test_missing_cells_are_backfilled() {
        let mut set = RecordSet::new("export.csv", vec!["Datum".into(), STATUS_COLUMN.into()]);
        set.records
            .push(ClassRecord::from_pairs(1, [("Datum", "01.03.2025"), (DURATION_COLUMN, "1.5")]));

        let set = reconcile_fields(set);
        let record = &set.records[0];
        assert_eq!(record.get(STATUS_COLUMN), Some(BACKFILL_VALUE));
        assert_eq!(record.get(DURATION_COLUMN), Some("1.5"));
        assert!(set.columns.iter().all(|column| record.contains(column)));
    }
}
