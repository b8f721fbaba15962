use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PdhError, Result};

/// Directory scanned when no directory is given, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "./notebooks/datasets/raw/";

/// Glob matched against file names when indexing a directory.
pub const DEFAULT_PATTERN: &str = "*.pdh";

/// Preamble lines before the data block.
pub const DEFAULT_HEADER_LINES: usize = 5;

/// Lines at the end of the file that are not data (the XML footer).
pub const DEFAULT_FOOTER_LINES: usize = 496;

/// Column separator of the data block.
pub const DEFAULT_DELIMITER: &str = "   ";

// ---------------------------------------------------------------------------
// Layout of a single file
// ---------------------------------------------------------------------------

/// Fixed shape of the instrument's export format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdhLayout {
    pub header_lines: usize,
    pub footer_lines: usize,
    pub delimiter: String,
}

impl Default for PdhLayout {
    fn default() -> Self {
        Self {
            header_lines: DEFAULT_HEADER_LINES,
            footer_lines: DEFAULT_FOOTER_LINES,
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Reader configuration
// ---------------------------------------------------------------------------

/// Where to look for files and how to cut them.
///
/// Every field is optional in the JSON form:
///
/// ```json
/// { "data_dir": "./raw", "layout": { "footer_lines": 500 } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub data_dir: PathBuf,
    pub pattern: String,
    pub layout: PdhLayout,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            pattern: DEFAULT_PATTERN.to_string(),
            layout: PdhLayout::default(),
        }
    }
}

impl ReaderConfig {
    /// Default configuration pointing at `dir`.
    pub fn for_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: dir.into(),
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PdhError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| PdhError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if config.layout.delimiter.is_empty() {
            return Err(PdhError::Config {
                path: path.to_path_buf(),
                message: "delimiter must not be empty".to_string(),
            });
        }
        log::debug!("Loaded reader configuration from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_defaults_match_instrument_layout() {
        let config = ReaderConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./notebooks/datasets/raw/"));
        assert_eq!(config.pattern, "*.pdh");
        assert_eq!(config.layout.header_lines, 5);
        assert_eq!(config.layout.footer_lines, 496);
        assert_eq!(config.layout.delimiter, "   ");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let file = write_config(r#"{ "data_dir": "raw", "layout": { "footer_lines": 12 } }"#);
        let config = ReaderConfig::from_json_file(file.path()).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("raw"));
        assert_eq!(config.pattern, DEFAULT_PATTERN);
        assert_eq!(config.layout.header_lines, DEFAULT_HEADER_LINES);
        assert_eq!(config.layout.footer_lines, 12);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let file = write_config("{ not json");
        let result = ReaderConfig::from_json_file(file.path());
        assert!(matches!(result, Err(PdhError::Config { .. })));
    }

    #[test]
    fn test_empty_delimiter_rejected() {
        let file = write_config(r#"{ "layout": { "delimiter": "" } }"#);
        let result = ReaderConfig::from_json_file(file.path());
        assert!(matches!(result, Err(PdhError::Config { .. })));
    }
}
