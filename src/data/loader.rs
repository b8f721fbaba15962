use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::config::PdhLayout;
use crate::error::{PdhError, Result};

use super::classify::is_metadata_line;
use super::model::{DataRecord, DataTable, XmlDocument};
use super::xml::parse_document;

// ---------------------------------------------------------------------------
// Data block
// ---------------------------------------------------------------------------

/// Read the data block of the file at `path`.
///
/// The first `layout.header_lines` lines and the last `layout.footer_lines`
/// lines are skipped. Blank lines inside the window are ignored. When the
/// file is too short to hold any data the window is empty and so is the
/// result.
pub fn extract_data(path: &Path, layout: &PdhLayout) -> Result<DataTable> {
    let bytes = std::fs::read(path).map_err(|e| PdhError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let text = decode_utf8(bytes).map_err(|(line, column)| PdhError::Encoding {
        path: path.to_path_buf(),
        line,
        column,
    })?;

    let lines: Vec<&str> = text.lines().collect();
    let end = lines.len().saturating_sub(layout.footer_lines);
    let start = layout.header_lines.min(end);

    if start == end {
        log::debug!(
            "{}: {} line(s) leave no room for data between {} header and {} footer lines",
            path.display(),
            lines.len(),
            layout.header_lines,
            layout.footer_lines
        );
    }

    let mut records = Vec::with_capacity(end - start);
    for (offset, line) in lines[start..end].iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record =
            parse_data_row(line, &layout.delimiter).map_err(|message| PdhError::DataParse {
                path: path.to_path_buf(),
                line: start + offset + 1,
                message,
            })?;
        records.push(record);
    }

    log::debug!("{}: read {} data row(s)", path.display(), records.len());
    Ok(DataTable::new(records))
}

/// Split a row on `delimiter` and parse its first two fields. Extra fields are ignored.
fn parse_data_row(line: &str, delimiter: &str) -> std::result::Result<DataRecord, String> {
    let mut fields = line
        .trim()
        .split(delimiter)
        .map(str::trim)
        .filter(|f| !f.is_empty());

    let (Some(q), Some(i)) = (fields.next(), fields.next()) else {
        return Err(format!("expected at least 2 columns in '{}'", line.trim()));
    };

    Ok(DataRecord {
        scattering_vector: parse_number(q, "scattering_vector")?,
        counts_per_area: parse_number(i, "counts_per_area")?,
    })
}

fn parse_number(field: &str, column: &str) -> std::result::Result<f64, String> {
    field
        .parse::<f64>()
        .map_err(|_| format!("{column}: '{field}' is not a number"))
}

/// Decode `bytes`, or give the 1-based (line, column) of the first invalid byte.
fn decode_utf8(bytes: Vec<u8>) -> std::result::Result<String, (usize, usize)> {
    String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = valid.iter().rposition(|&b| b == b'\n').map_or(0, |p| p + 1);
        (line, valid.len() - line_start + 1)
    })
}

// ---------------------------------------------------------------------------
// Metadata footer
// ---------------------------------------------------------------------------

/// Failure while scanning a file for metadata lines.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid UTF-8 at line {line}, column {column}")]
    Utf8 { line: usize, column: usize },
}

/// XML-shaped lines of a file, concatenated verbatim in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataBuffer {
    text: String,
    /// Byte offset in `text` and 1-based source line of every buffered line.
    lines: Vec<(usize, usize)>,
}

impl MetadataBuffer {
    /// Scan `reader` line by line, keeping the lines that look like XML.
    pub fn collect<R: BufRead>(mut reader: R) -> std::result::Result<Self, CollectError> {
        let mut buffer = Self::default();
        let mut raw = Vec::new();
        let mut line_no = 0;
        loop {
            raw.clear();
            if reader.read_until(b'\n', &mut raw)? == 0 {
                break;
            }
            line_no += 1;
            let line = std::str::from_utf8(&raw).map_err(|e| CollectError::Utf8 {
                line: line_no,
                column: e.valid_up_to() + 1,
            })?;
            if is_metadata_line(line) {
                buffer.lines.push((buffer.text.len(), line_no));
                buffer.text.push_str(line);
            }
        }
        Ok(buffer)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Source line numbers of the buffered lines, in buffer order.
    pub fn source_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.iter().map(|&(_, line)| line)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Map a byte offset of the buffer to a 1-based (source line, column).
    ///
    /// Offsets past the end land on the last buffered line. An empty buffer maps to `(0, 0)`.
    pub fn source_position(&self, offset: usize) -> (usize, usize) {
        let idx = self
            .lines
            .partition_point(|&(start, _)| start <= offset)
            .saturating_sub(1);
        match self.lines.get(idx) {
            Some(&(start, line)) => {
                let line_end = self
                    .lines
                    .get(idx + 1)
                    .map_or(self.text.len(), |&(next, _)| next);
                let column = offset.min(line_end).saturating_sub(start) + 1;
                (line, column)
            }
            None => (0, 0),
        }
    }
}

/// Collect the XML-shaped lines of the file at `path` and parse them as one document.
pub fn extract_metadata(path: &Path) -> Result<XmlDocument> {
    let file = File::open(path).map_err(|e| PdhError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let buffer = MetadataBuffer::collect(BufReader::new(file)).map_err(|e| match e {
        CollectError::Io(source) => PdhError::FileRead {
            path: path.to_path_buf(),
            source,
        },
        CollectError::Utf8 { line, column } => PdhError::Encoding {
            path: path.to_path_buf(),
            line,
            column,
        },
    })?;

    if buffer.is_empty() {
        return Err(PdhError::MetadataParse {
            path: path.to_path_buf(),
            line: 0,
            column: 0,
            message: "no XML-shaped lines found".to_string(),
        });
    }

    let document = parse_document(buffer.text()).map_err(|e| {
        let (line, column) = buffer.source_position(e.offset);
        PdhError::MetadataParse {
            path: path.to_path_buf(),
            line,
            column,
            message: e.message,
        }
    })?;

    log::debug!(
        "{}: parsed <{}> with {} element(s)",
        path.display(),
        document.root.name,
        document.element_count()
    );
    Ok(document)
}
