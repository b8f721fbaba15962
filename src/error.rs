//! Error types for reading PDH files.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while indexing a directory or extracting a PDH file.
#[derive(Debug, Error)]
pub enum PdhError {
    // === File System Errors ===
    /// The directory to index does not exist or is not a directory.
    #[error("directory not found: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },

    /// Failed to list the directory or one of its entries.
    #[error("failed to read directory {}: {source}", .path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An indexed file could not be opened or read.
    #[error("failed to read file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Lookup Errors ===
    /// The logical name is not present in the index.
    #[error("unknown file '{name}'")]
    UnknownFile { name: String },

    // === Parse Errors ===
    /// A line of the data block is not two numeric columns.
    #[error("{}:{line}: {message}", .path.display())]
    DataParse {
        path: PathBuf,
        /// 1-based line number in the source file.
        line: usize,
        message: String,
    },

    /// The XML-shaped lines do not form a well-formed document.
    #[error("{}:{line}:{column}: malformed metadata: {message}", .path.display())]
    MetadataParse {
        path: PathBuf,
        /// 1-based line number in the source file.
        line: usize,
        /// 1-based byte column within that line.
        column: usize,
        message: String,
    },

    /// The file is not valid UTF-8.
    #[error("{}:{line}:{column}: invalid UTF-8", .path.display())]
    Encoding {
        path: PathBuf,
        /// 1-based line number of the first invalid byte.
        line: usize,
        /// 1-based byte column of the first invalid byte.
        column: usize,
    },

    // === Configuration Errors ===
    /// The file name pattern is not a valid glob.
    #[error("invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A configuration file could not be read or decoded.
    #[error("invalid configuration {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PdhError>;

impl PdhError {
    /// Whether this error comes from the filesystem rather than file content.
    pub fn is_filesystem(&self) -> bool {
        matches!(
            self,
            PdhError::DirectoryNotFound { .. }
                | PdhError::DirectoryRead { .. }
                | PdhError::FileRead { .. }
        )
    }
}
