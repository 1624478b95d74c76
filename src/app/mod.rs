pub mod discovery;
pub mod ingestion;
