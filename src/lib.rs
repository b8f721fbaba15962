//! Split SAXS `.pdh` exports into their numeric data block and XML metadata footer.
//!
//! ```no_run
//! use std::path::Path;
//! use pdh_reader::PdhReader;
//!
//! let reader = PdhReader::open(Path::new("./raw"))?;
//! for name in reader.available_files() {
//!     let table = reader.get_data(&name)?;
//!     let metadata = reader.get_metadata(&name)?;
//!     println!("{name}: {} rows, root <{}>", table.len(), metadata.root.name);
//! }
//! # Ok::<(), pdh_reader::PdhError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod reader;

pub use config::{PdhLayout, ReaderConfig};
pub use data::classify::{classify, is_metadata_line, LineKind};
pub use data::index::FileIndex;
pub use data::model::{DataRecord, DataTable, XmlAttribute, XmlDeclaration, XmlDocument, XmlElement, XmlNode};
pub use error::{PdhError, Result};
pub use reader::{list_available, PdhReader};
