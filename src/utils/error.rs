use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("No input file matching '{pattern}' found in '{directory}'")]
    NoInputFound { directory: String, pattern: String },

    #[error("Input file '{path}' is empty or missing its header row")]
    EmptyInput { path: String },

    #[error("Missing required columns in the input file: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("No billable classes for instructor '{instructor}' after filtering")]
    NoBillableRecords { instructor: String },

    #[error("Cannot parse field '{field}' on row {row} (value {value:?}): {reason}")]
    FieldParse {
        row: usize,
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to write processed data to '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Target directory does not exist: {path}")]
    TargetDirectoryMissing { path: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value {value:?} for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BillingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoInputFound { .. }
            | Self::EmptyInput { .. }
            | Self::MissingColumns { .. }
            | Self::TargetDirectoryMissing { .. } => ErrorCategory::Input,
            Self::NoBillableRecords { .. } | Self::FieldParse { .. } | Self::CsvError(_) => {
                ErrorCategory::Data
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::Write { .. } | Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::NoInputFound { directory, .. } => format!(
                "Run the ingest command or place the activity export in '{}'",
                directory
            ),
            Self::EmptyInput { .. } => {
                "Export the activity report again; the file has no content".to_string()
            }
            Self::MissingColumns { .. } => {
                "Check that the export uses ';' as delimiter and includes Datum, Name and Trainer"
                    .to_string()
            }
            Self::NoBillableRecords { .. } => {
                "Check the configured instructor name; it must match the Trainer column exactly"
                    .to_string()
            }
            Self::FieldParse { field, .. } => {
                format!("Fix the '{}' value in the export and run again", field)
            }
            Self::Write { .. } | Self::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            Self::TargetDirectoryMissing { .. } => {
                "Create the directory or set auto_create_directories = true".to_string()
            }
            Self::CsvError(_) => "Make sure the input file is valid UTF-8 CSV".to_string(),
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line overrides".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Input problem: {}", self),
            ErrorCategory::Data => format!("Data problem: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("File operation error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BillingError>;
