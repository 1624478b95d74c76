use crate::app::discovery::discover_input_file;
use crate::core::stages::{
    aggregation::aggregate, amount::calculate_amounts, bonus::apply_bonus,
    filter::filter_records, loader::load_records, locale::localize, metrics::derive_metrics,
    reconcile::reconcile_fields, writer,
};
use crate::core::{BillingSheet, ConfigProvider, Pipeline, RecordSet, Storage};
use crate::utils::error::Result;

/// Billing run over one activity export: load, transform in stage order, write.
pub struct BillingPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> BillingPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn input_path(&self) -> Result<String> {
        match self.config.input_file() {
            Some(path) => Ok(path.to_string()),
            None => discover_input_file(
                &self.storage,
                self.config.input_directory(),
                self.config.input_file_pattern(),
            ),
        }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for BillingPipeline<S, C> {
    fn extract(&self) -> Result<RecordSet> {
        let path = self.input_path()?;
        tracing::info!("Using input file: {}", path);

        let data = self.storage.read_file(&path)?;
        load_records(&data, &path)
    }

    fn transform(&self, data: RecordSet) -> Result<BillingSheet> {
        let instructor = self.config.instructor();

        let set = filter_records(data, instructor)?;
        let set = derive_metrics(set, self.config.base_hourly_rate())?;
        let set = apply_bonus(set)?;
        let set = calculate_amounts(set)?;
        let (set, summary) = aggregate(set, instructor)?;
        let set = reconcile_fields(set);

        Ok(localize(BillingSheet {
            records: set,
            summary,
        }))
    }

    fn load(&self, result: BillingSheet) -> Result<String> {
        let output_path =
            writer::output_path_for(&result.records.source, self.config.output_directory());
        writer::write_sheet(&self.storage, &result, &output_path)?;
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{SUMMARY_LABEL, TOTAL_AMOUNT_COLUMN};
    use crate::utils::error::BillingError;
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    const EXPORT: &str = "Datum;Name;Trainer;Status;Startzeit;Endzeit;Angemeldet;Max. Teilnehmer\n\
        03.03.2025;Vinyasa;Victoria;Aktiv;09:00;10:30;4;8\n\
        04.03.2025;Hatha;Victoria;Storniert;18:00;19:00;0;8\n\
        05.03.2025;Yin;Anna;Aktiv;18:00;19:00;8;8\n\
        06.03.2025;Power;Victoria;Aktiv;18:00;19:30;6;8\n";

    #[derive(Default)]
    struct MockStorage {
        files: RefCell<BTreeMap<String, Vec<u8>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &str) -> Self {
            let storage = Self::default();
            storage
                .files
                .borrow_mut()
                .insert(path.to_string(), data.as_bytes().to_vec());
            storage
        }

        fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.borrow().get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files.borrow().get(path).cloned().ok_or_else(|| {
                BillingError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .borrow_mut()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }

        fn list_files(&self, dir: &str) -> Result<Vec<String>> {
            let prefix = format!("{}/", dir);
            Ok(self
                .files
                .borrow()
                .keys()
                .filter_map(|path| path.strip_prefix(&prefix))
                .filter(|name| !name.contains('/'))
                .map(str::to_string)
                .collect())
        }
    }

    struct MockConfig {
        instructor: String,
        base_hourly_rate: f64,
        input_file: Option<String>,
    }

    impl MockConfig {
        fn new(instructor: &str) -> Self {
            Self {
                instructor: instructor.to_string(),
                base_hourly_rate: 20.0,
                input_file: None,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn instructor(&self) -> &str {
            &self.instructor
        }

        fn base_hourly_rate(&self) -> f64 {
            self.base_hourly_rate
        }

        fn input_directory(&self) -> &str {
            "input_csv"
        }

        fn input_file_pattern(&self) -> &str {
            "aktivitaetsbericht-*.csv"
        }

        fn input_file(&self) -> Option<&str> {
            self.input_file.as_deref()
        }

        fn output_directory(&self) -> &str {
            "output_csv"
        }
    }

    #[test]
    fn test_extract_discovers_input() {
        let storage = MockStorage::with_file("input_csv/aktivitaetsbericht-03-2025.csv", EXPORT);
        let pipeline = BillingPipeline::new(storage, MockConfig::new("Victoria"));

        let set = pipeline.extract().unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.source, "input_csv/aktivitaetsbericht-03-2025.csv");
    }

    #[test]
    fn test_extract_prefers_explicit_input() {
        let storage = MockStorage::with_file("elsewhere/march.csv", EXPORT);
        let mut config = MockConfig::new("Victoria");
        config.input_file = Some("elsewhere/march.csv".to_string());
        let pipeline = BillingPipeline::new(storage, config);

        assert_eq!(pipeline.extract().unwrap().source, "elsewhere/march.csv");
    }

    #[test]
    fn test_extract_without_input_fails() {
        let pipeline = BillingPipeline::new(MockStorage::default(), MockConfig::new("Victoria"));
        let err = pipeline.extract().unwrap_err();
        assert!(matches!(err, BillingError::NoInputFound { .. }));
    }

    #[test]
    fn test_transform_bills_only_active_classes_of_instructor() {
        let storage = MockStorage::with_file("input_csv/aktivitaetsbericht-03-2025.csv", EXPORT);
        let pipeline = BillingPipeline::new(storage, MockConfig::new("Victoria"));

        let sheet = pipeline.transform(pipeline.extract().unwrap()).unwrap();
        let records = &sheet.records.records;
        assert_eq!(records.len(), 2);

        // 09:00-10:30 at 4/8: 1.5h, bonus 1.5, 30.00/h
        assert_eq!(records[0].get("Dauer-in-Stunden"), Some("1,5"));
        assert_eq!(records[0].get("Anmeldequote"), Some("50.0%"));
        assert_eq!(records[0].get("Bonus-Faktor"), Some("1,5"));
        assert_eq!(records[0].get("Stundensatz-Final"), Some("30,00"));
        assert_eq!(records[0].get(TOTAL_AMOUNT_COLUMN), Some("45,00"));

        // 18:00-19:30 at 6/8: 75% sits between the tiers, no bonus
        assert_eq!(records[1].get("Anmeldequote"), Some("75.0%"));
        assert_eq!(records[1].get("Bonus-Faktor"), Some("1,0"));
        assert_eq!(records[1].get("Stundensatz-Final"), Some("20,00"));
        assert_eq!(records[1].get(TOTAL_AMOUNT_COLUMN), Some("30,00"));

        assert_eq!(sheet.summary.get("Datum"), SUMMARY_LABEL);
        assert_eq!(sheet.summary.get("Dauer-in-Stunden"), "3,0");
        assert_eq!(sheet.summary.get(TOTAL_AMOUNT_COLUMN), "75,00");
        assert_eq!(sheet.records.columns.len(), 14);
    }

    #[test]
    fn test_load_writes_processed_file() {
        let storage = MockStorage::with_file("input_csv/aktivitaetsbericht-03-2025.csv", EXPORT);
        let pipeline = BillingPipeline::new(storage, MockConfig::new("Victoria"));

        let sheet = pipeline.transform(pipeline.extract().unwrap()).unwrap();
        let output = pipeline.load(sheet).unwrap();
        let expected = std::path::Path::new("output_csv")
            .join("processed-aktivitaetsbericht-03-2025.csv")
            .to_string_lossy()
            .into_owned();
        assert_eq!(output, expected);

        let written = String::from_utf8(pipeline.storage.get_file(&output).unwrap()).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with(";Stundensatz-Final;Stundenbetrag"));
        assert!(lines[3].starts_with("Gesamt (Monat);"));
    }

    #[test]
    fn test_transform_with_unknown_instructor_fails() {
        let storage = MockStorage::with_file("input_csv/aktivitaetsbericht-03-2025.csv", EXPORT);
        let pipeline = BillingPipeline::new(storage, MockConfig::new("Victoria "));

        let err = pipeline.transform(pipeline.extract().unwrap()).unwrap_err();
        assert!(matches!(err, BillingError::NoBillableRecords { .. }));
    }
}
