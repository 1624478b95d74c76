use crate::config::toml_config::LoggingConfig;
use crate::utils::error::Result;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

fn default_filter(verbose: bool, level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("studio_billing=debug,info")
        } else {
            EnvFilter::new(format!("studio_billing={}", level))
        }
    })
}

/// Console logging only, used before the configuration is available.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, "info"))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Console logging plus an append-only log file from the `[logging]` section.
pub fn init_logger_with_file(verbose: bool, settings: &LoggingConfig) -> Result<()> {
    let dir = Path::new(&settings.directory);
    fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(&settings.filename))?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false);
    let file_layer = if settings.json {
        file_layer.json().boxed()
    } else {
        file_layer.boxed()
    };

    tracing_subscriber::registry()
        .with(default_filter(verbose, &settings.level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .with(file_layer)
        .init();

    Ok(())
}
