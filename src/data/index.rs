//! Directory discovery: logical name (file stem) → path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::{PdhError, Result};

/// Files of one directory scan, keyed by stem. Built once, never mutated.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    directory: PathBuf,
    files: BTreeMap<String, PathBuf>,
}

impl FileIndex {
    /// Scan `dir` (non-recursively) for regular files whose name matches `pattern`.
    ///
    /// Symlinks are followed: a link to a file is indexed, a link to a
    /// directory is not. A missing directory is an error; an empty one is not.
    pub fn scan(dir: &Path, pattern: &str) -> Result<Self> {
        if !dir.is_dir() {
            return Err(PdhError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        let matcher = Pattern::new(pattern).map_err(|e| PdhError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        let entries = std::fs::read_dir(dir).map_err(|e| PdhError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut files = BTreeMap::new();
        for entry_result in entries {
            let entry = entry_result.map_err(|e| PdhError::DirectoryRead {
                path: dir.to_path_buf(),
                source: e,
            })?;

            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                log::debug!("Skipping non UTF-8 file name {}", path.display());
                continue;
            };
            if !matcher.matches(file_name) {
                continue;
            }
            if !path.is_file() {
                log::debug!("Skipping {}: not a regular file", path.display());
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some(previous) = files.insert(stem.to_string(), path.clone()) {
                log::warn!(
                    "'{stem}' matches both {} and {}; keeping the latter",
                    previous.display(),
                    path.display()
                );
            }
        }

        log::info!("Indexed {} file(s) in {}", files.len(), dir.display());

        Ok(Self {
            directory: dir.to_path_buf(),
            files,
        })
    }

    /// The scanned directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Logical names of all indexed files.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Path of the file called `name`.
    pub fn resolve(&self, name: &str) -> Result<&Path> {
        self.files
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| PdhError::UnknownFile {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
