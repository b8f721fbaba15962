use std::collections::BTreeSet;
use std::path::Path;

use crate::config::{PdhLayout, ReaderConfig, DEFAULT_PATTERN};
use crate::data::index::FileIndex;
use crate::data::loader::{extract_data, extract_metadata};
use crate::data::model::{DataTable, XmlDocument};
use crate::error::Result;

/// Names of the PDH files in `dir`.
pub fn list_available(dir: &Path) -> Result<BTreeSet<String>> {
    let index = FileIndex::scan(dir, DEFAULT_PATTERN)?;
    Ok(index.names().map(str::to_string).collect())
}

/// Access to the PDH files of one directory by logical name.
///
/// The index is built once in the constructor. Every `get_*` call re-reads
/// the file, so results always reflect its current content.
#[derive(Debug, Clone)]
pub struct PdhReader {
    index: FileIndex,
    layout: PdhLayout,
}

impl PdhReader {
    /// Index `dir` with the instrument's default layout.
    pub fn open(dir: &Path) -> Result<Self> {
        Self::with_config(&ReaderConfig::for_dir(dir))
    }

    /// Index the default data directory.
    pub fn open_default() -> Result<Self> {
        Self::with_config(&ReaderConfig::default())
    }

    pub fn with_config(config: &ReaderConfig) -> Result<Self> {
        let index = FileIndex::scan(&config.data_dir, &config.pattern)?;
        Ok(Self {
            index,
            layout: config.layout.clone(),
        })
    }

    /// Logical names of the indexed files.
    pub fn available_files(&self) -> BTreeSet<String> {
        self.index.names().map(str::to_string).collect()
    }

    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    pub fn layout(&self) -> &PdhLayout {
        &self.layout
    }

    pub fn path_of(&self, name: &str) -> Result<&Path> {
        self.index.resolve(name)
    }

    /// The data block of `name` as a two-column table.
    pub fn get_data(&self, name: &str) -> Result<DataTable> {
        let path = self.index.resolve(name)?;
        extract_data(path, &self.layout)
    }

    /// The XML footer of `name` as a tree.
    pub fn get_metadata(&self, name: &str) -> Result<XmlDocument> {
        let path = self.index.resolve(name)?;
        extract_metadata(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdhError;
    use tempfile::TempDir;

    #[test]
    fn test_list_available_single_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("sample.pdh"), "").unwrap();

        let names = list_available(dir.path()).unwrap();
        assert_eq!(names, BTreeSet::from(["sample".to_string()]));
    }

    #[test]
    fn test_unknown_name_for_both_extractions() {
        let dir = TempDir::new().unwrap();
        let reader = PdhReader::open(dir.path()).unwrap();

        assert!(matches!(reader.get_data("missing"), Err(PdhError::UnknownFile { .. })));
        assert!(matches!(reader.get_metadata("missing"), Err(PdhError::UnknownFile { .. })));
    }

    #[test]
    fn test_open_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = PdhReader::open(&dir.path().join("absent"));
        assert!(matches!(result, Err(PdhError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_custom_layout_is_used() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("short.pdh"), "h\n1.0   2.0\n<a/>\n").unwrap();

        let mut config = ReaderConfig::for_dir(dir.path());
        config.layout.header_lines = 1;
        config.layout.footer_lines = 1;
        let reader = PdhReader::with_config(&config).unwrap();

        assert_eq!(reader.get_data("short").unwrap().len(), 1);
        assert_eq!(reader.get_metadata("short").unwrap().root.name, "a");
    }

    #[test]
    fn test_reader_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PdhReader>();
    }
}
