use crate::app::discovery::FilePattern;
use crate::config::toml_config::IngestionConfig;
use crate::utils::error::{BillingError, Result};
use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(month|year)(?::0?(\d)d?)?\}").expect("valid placeholder regex"));

/// Fills `{month}`, `{month:02}` and `{year}` in a file name template.
pub fn render_file_name(format: &str, date: NaiveDate) -> String {
    PLACEHOLDER
        .replace_all(format, |caps: &Captures| {
            let value = match &caps[1] {
                "month" => date.month() as i32,
                _ => date.year(),
            };
            let width = caps
                .get(2)
                .and_then(|w| w.as_str().parse::<usize>().ok())
                .unwrap_or(0);
            format!("{:0width$}", value, width = width)
        })
        .into_owned()
}

/// Moves the first matching raw export from the download folder into the
/// input directory under its month-stamped name.
pub fn ingest_export(settings: &IngestionConfig, today: NaiveDate) -> Result<PathBuf> {
    tracing::info!("📥 Started ingestion process");

    let source_dir = settings.source_directory();
    let pattern = FilePattern::new(&settings.source_file_pattern)?;
    let names = match fs::read_dir(&source_dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect::<Vec<_>>(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    let Some(source_name) = pattern.select(names).into_iter().next() else {
        tracing::error!("No matching source file found!");
        return Err(BillingError::NoInputFound {
            directory: source_dir,
            pattern: pattern.as_str().to_string(),
        });
    };
    let source_path = Path::new(&source_dir).join(&source_name);
    tracing::info!("Found source file: {}", source_path.display());

    let target_dir = Path::new(&settings.target_directory);
    if !target_dir.is_dir() {
        if settings.auto_create_directories {
            fs::create_dir_all(target_dir)?;
            tracing::info!("Created target directory: {}", target_dir.display());
        } else {
            return Err(BillingError::TargetDirectoryMissing {
                path: settings.target_directory.clone(),
            });
        }
    }

    let target_path = target_dir.join(render_file_name(&settings.output_filename_format, today));
    move_file(&source_path, &target_path)?;
    tracing::info!("File moved and renamed to '{}'", target_path.display());

    Ok(target_path)
}

fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Err(rename_err) = fs::rename(from, to) {
        // Rename fails across filesystems; copy and remove instead.
        tracing::debug!("Rename failed ({}), copying instead", rename_err);
        fs::copy(from, to).map_err(|_| rename_err)?;
        fs::remove_file(from)?;
    }
    Ok(())
}
