use crate::core::Pipeline;
use crate::domain::model::{RunReport, DURATION_COLUMN, TOTAL_AMOUNT_COLUMN};
use crate::utils::error::Result;

pub struct BillingEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> BillingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load once. The first error aborts the run
    /// before anything is written.
    pub fn run(&self) -> Result<RunReport> {
        tracing::info!("🛠 Starting billing run");

        let records = self.pipeline.extract()?;
        let input_file = records.source.clone();
        let loaded_records = records.len();

        let sheet = self.pipeline.transform(records)?;
        let billed_records = sheet.records.len();
        let total_hours = sheet.summary.get(DURATION_COLUMN).to_string();
        let total_amount = sheet.summary.get(TOTAL_AMOUNT_COLUMN).to_string();
        tracing::info!(
            "Billed {} of {} classes: {}h, {}",
            billed_records,
            loaded_records,
            total_hours,
            total_amount
        );

        let output_file = self.pipeline.load(sheet)?;
        tracing::info!("🛠 Processing completed, output saved to: {}", output_file);

        Ok(RunReport {
            input_file,
            output_file,
            loaded_records,
            billed_records,
            total_hours,
            total_amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BillingSheet, ClassRecord, RecordSet, SummaryRecord};
    use crate::utils::error::BillingError;
    use std::cell::Cell;

    struct StubPipeline {
        fail_transform: bool,
        loaded: Cell<bool>,
    }

    impl Pipeline for StubPipeline {
        fn extract(&self) -> Result<RecordSet> {
            let mut set = RecordSet::new("input_csv/export.csv", vec!["Datum".into()]);
            set.records.push(ClassRecord::new(1));
            set.records.push(ClassRecord::new(2));
            Ok(set)
        }

        fn transform(&self, mut data: RecordSet) -> Result<BillingSheet> {
            if self.fail_transform {
                return Err(BillingError::NoBillableRecords {
                    instructor: "Victoria".to_string(),
                });
            }
            data.records.truncate(1);
            let mut summary = SummaryRecord::new();
            summary.set(DURATION_COLUMN, "1,5");
            summary.set(TOTAL_AMOUNT_COLUMN, "45,00");
            Ok(BillingSheet {
                records: data,
                summary,
            })
        }

        fn load(&self, _result: BillingSheet) -> Result<String> {
            self.loaded.set(true);
            Ok("output_csv/processed-export.csv".to_string())
        }
    }

    #[test]
    fn test_run_reports_counts_and_totals() {
        let engine = BillingEngine::new(StubPipeline {
            fail_transform: false,
            loaded: Cell::new(false),
        });

        let report = engine.run().unwrap();
        assert_eq!(report.input_file, "input_csv/export.csv");
        assert_eq!(report.output_file, "output_csv/processed-export.csv");
        assert_eq!(report.loaded_records, 2);
        assert_eq!(report.billed_records, 1);
        assert_eq!(report.total_hours, "1,5");
        assert_eq!(report.total_amount, "45,00");
    }

    #[test]
    fn test_failed_transform_skips_load() {
        let engine = BillingEngine::new(StubPipeline {
            fail_transform: true,
            loaded: Cell::new(false),
        });

        assert!(engine.run().is_err());
        assert!(!engine.pipeline.loaded.get());
    }
}
