use crate::domain::model::{BillingSheet, RecordSet};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
    /// File names (not paths) directly inside `dir`. A missing directory lists as empty.
    fn list_files(&self, dir: &str) -> Result<Vec<String>>;
}

pub trait ConfigProvider {
    fn instructor(&self) -> &str;
    fn base_hourly_rate(&self) -> f64;
    fn input_directory(&self) -> &str;
    fn input_file_pattern(&self) -> &str;
    /// Explicit input file; skips discovery when set.
    fn input_file(&self) -> Option<&str>;
    fn output_directory(&self) -> &str;
}

pub trait Pipeline {
    fn extract(&self) -> Result<RecordSet>;
    fn transform(&self, data: RecordSet) -> Result<BillingSheet>;
    fn load(&self, result: BillingSheet) -> Result<String>;
}
