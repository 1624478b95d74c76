use crate::domain::ports::Storage;
use crate::utils::error::{BillingError, Result};
use regex::Regex;
use std::path::Path;

/// File name pattern with `*` and `?` wildcards, e.g. `aktivitaetsbericht-*.csv`.
#[derive(Debug, Clone)]
pub struct FilePattern {
    pattern: String,
    regex: Regex,
}

impl FilePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let mut expr = String::from("^");
        for c in pattern.chars() {
            match c {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                other => expr.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
        }
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| BillingError::ConfigError {
            message: format!("Invalid file pattern '{}': {}", pattern, e),
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Matching names, sorted so repeated runs pick the same file.
    pub fn select<I>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut matching: Vec<String> = names.into_iter().filter(|n| self.matches(n)).collect();
        matching.sort();
        matching
    }
}

/// Path of the first export in `directory` matching `pattern`.
pub fn discover_input_file<S: Storage>(storage: &S, directory: &str, pattern: &str) -> Result<String> {
    let pattern = FilePattern::new(pattern)?;
    let candidates = pattern.select(storage.list_files(directory)?);

    let Some(first) = candidates.first() else {
        tracing::error!(
            "No input file matching '{}' found in '{}'",
            pattern.as_str(),
            directory
        );
        return Err(BillingError::NoInputFound {
            directory: directory.to_string(),
            pattern: pattern.as_str().to_string(),
        });
    };

    if candidates.len() > 1 {
        tracing::warn!(
            "{} files match '{}', using '{}'",
            candidates.len(),
            pattern.as_str(),
            first
        );
    }

    Ok(Path::new(directory).join(first).to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcards() {
        let pattern = FilePattern::new("aktivitaetsbericht-*.csv").unwrap();
        assert!(pattern.matches("aktivitaetsbericht-03-2025.csv"));
        assert!(pattern.matches("aktivitaetsbericht-.csv"));
        assert!(!pattern.matches("aktivitaetsbericht-03-2025.csv.bak"));
        assert!(!pattern.matches("processed-aktivitaetsbericht-03-2025.csv"));
        assert!(!pattern.matches("aktivitaetsberichtXcsv"));

        let single = FilePattern::new("export-?.csv").unwrap();
        assert!(single.matches("export-1.csv"));
        assert!(!single.matches("export-12.csv"));
    }

    #[test]
    fn test_select_sorts_matches() {
        let pattern = FilePattern::new("*.csv").unwrap();
        let names = vec![
            "b.csv".to_string(),
            "notes.txt".to_string(),
            "a.csv".to_string(),
        ];
        assert_eq!(pattern.select(names), vec!["a.csv", "b.csv"]);
    }
}
