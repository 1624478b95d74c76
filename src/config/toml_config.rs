use crate::core::ConfigProvider;
use crate::utils::error::{BillingError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "studio-billing.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub ingestion: IngestionConfig,
    pub processing: ProcessingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    pub source_directory: String,
    pub source_file_pattern: String,
    pub target_directory: String,
    pub output_filename_format: String,
    pub auto_create_directories: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            source_directory: "~/Downloads".to_string(),
            source_file_pattern: "Aktivitaetsbericht*.csv".to_string(),
            target_directory: "input_csv".to_string(),
            output_filename_format: "aktivitaetsbericht-{month:02}-{year}.csv".to_string(),
            auto_create_directories: true,
        }
    }
}

impl IngestionConfig {
    /// Source directory with a leading `~` expanded from `$HOME`.
    pub fn source_directory(&self) -> String {
        expand_home(&self.source_directory)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub input_directory: String,
    pub input_file_pattern: String,
    /// Explicit input file; discovery is skipped when set.
    pub input_file: Option<String>,
    pub base_hourly_rate: f64,
    pub output_directory: String,
    pub instructor: String,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            input_directory: "input_csv".to_string(),
            input_file_pattern: "aktivitaetsbericht-*.csv".to_string(),
            input_file: None,
            base_hourly_rate: 20.0,
            output_directory: "output_csv".to_string(),
            instructor: "Victoria".to_string(),
        }
    }
}

impl ProcessingConfig {
    /// Points processing at a freshly ingested export. An input file chosen on
    /// the command line or in the config file wins.
    pub fn use_ingested_input(&mut self, ingested: &Path) {
        if self.input_file.is_none() {
            let path = ingested.to_string_lossy().into_owned();
            tracing::info!("Billing the ingested export: {}", path);
            self.input_file = Some(path);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write a log file next to the console output.
    pub enabled: bool,
    pub directory: String,
    pub filename: String,
    pub level: String,
    /// JSON lines instead of plain text in the log file.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: "logs".to_string(),
            filename: "action.log".to_string(),
            level: "info".to_string(),
            json: false,
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn expand_home(path: &str) -> String {
    match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => match std::env::var("HOME") {
            Ok(home) => format!("{}{}", home, rest),
            Err(_) => path.to_string(),
        },
        _ => path.to_string(),
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| BillingError::ConfigError {
            message: format!(
                "Cannot read configuration file '{}': {}",
                path.as_ref().display(),
                e
            ),
        })?;
        Self::from_toml_str(&content)
    }

    /// Explicit path must exist; without one the default file is used when
    /// present and built-in defaults otherwise.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BillingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_positive_amount(
            "processing.base_hourly_rate",
            self.processing.base_hourly_rate,
        )?;
        validation::validate_non_empty_string("processing.instructor", &self.processing.instructor)?;
        validation::validate_path("processing.input_directory", &self.processing.input_directory)?;
        validation::validate_file_pattern(
            "processing.input_file_pattern",
            &self.processing.input_file_pattern,
        )?;
        validation::validate_path("processing.output_directory", &self.processing.output_directory)?;
        if let Some(input) = &self.processing.input_file {
            validation::validate_path("processing.input_file", input)?;
        }

        validation::validate_path("ingestion.source_directory", &self.ingestion.source_directory)?;
        validation::validate_file_pattern(
            "ingestion.source_file_pattern",
            &self.ingestion.source_file_pattern,
        )?;
        validation::validate_path("ingestion.target_directory", &self.ingestion.target_directory)?;
        validation::validate_file_pattern(
            "ingestion.output_filename_format",
            &self.ingestion.output_filename_format,
        )?;

        if self.logging.enabled {
            validation::validate_path("logging.directory", &self.logging.directory)?;
            validation::validate_file_pattern("logging.filename", &self.logging.filename)?;
        }
        validation::validate_one_of("logging.level", &self.logging.level, &LOG_LEVELS)?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn instructor(&self) -> &str {
        &self.processing.instructor
    }

    fn base_hourly_rate(&self) -> f64 {
        self.processing.base_hourly_rate
    }

    fn input_directory(&self) -> &str {
        &self.processing.input_directory
    }

    fn input_file_pattern(&self) -> &str {
        &self.processing.input_file_pattern
    }

    fn input_file(&self) -> Option<&str> {
        self.processing.input_file.as_deref()
    }

    fn output_directory(&self) -> &str {
        &self.processing.output_directory
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
