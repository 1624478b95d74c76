pub mod etl;
pub mod pipeline;
pub mod stages;

pub use crate::domain::model::{BillingSheet, ClassRecord, RecordSet, SummaryRecord};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
