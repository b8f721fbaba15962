use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use pdh_reader::{DataTable, PdhReader, XmlDocument};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Loaded file
// ---------------------------------------------------------------------------

/// Both halves of one file, as extracted when it was first shown.
pub struct LoadedFile {
    pub table: DataTable,
    /// The footer tree, or the reason it could not be parsed.
    pub metadata: Result<XmlDocument, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Data,
    Metadata,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Index of the opened directory (None until a directory is opened).
    pub reader: Option<PdhReader>,

    /// Extracted files, keyed by logical name.
    pub loaded: BTreeMap<String, LoadedFile>,

    /// Names whose curves are drawn.
    pub visible: BTreeSet<String>,

    /// File shown in the details panel.
    pub focused: Option<String>,

    pub detail_tab: DetailTab,

    pub color_map: ColorMap,

    /// Plot log10(I) against log10(q).
    pub log_scale: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            reader: None,
            loaded: BTreeMap::new(),
            visible: BTreeSet::new(),
            focused: None,
            detail_tab: DetailTab::Data,
            color_map: ColorMap::default(),
            log_scale: true,
            status_message: None,
        }
    }
}

impl AppState {
    /// Index `dir` and reset everything that belonged to the previous directory.
    pub fn open_directory(&mut self, dir: &Path) {
        match PdhReader::open(dir) {
            Ok(reader) => {
                log::info!(
                    "Opened {} with {} file(s)",
                    dir.display(),
                    reader.index().len()
                );
                self.set_reader(reader);
            }
            Err(e) => {
                log::error!("Failed to open directory: {e:#}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn set_reader(&mut self, reader: PdhReader) {
        self.color_map = ColorMap::new(reader.index().names());
        self.loaded.clear();
        self.visible.clear();
        self.focused = None;
        self.status_message = None;

        let first = reader.index().names().next().map(str::to_string);
        self.reader = Some(reader);
        if let Some(name) = first {
            self.set_visible(&name, true);
            self.focused = Some(name);
        }
    }

    /// Names of all indexed files.
    pub fn names(&self) -> Vec<String> {
        self.reader
            .as_ref()
            .map(|r| r.index().names().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Show or hide the curve of `name`, extracting the file on first show.
    pub fn set_visible(&mut self, name: &str, visible: bool) {
        if !visible {
            self.visible.remove(name);
            return;
        }
        if self.ensure_loaded(name) {
            self.visible.insert(name.to_string());
        }
    }

    pub fn focus(&mut self, name: &str) {
        if self.ensure_loaded(name) {
            self.focused = Some(name.to_string());
        }
    }

    pub fn focused_file(&self) -> Option<(&str, &LoadedFile)> {
        let name = self.focused.as_deref()?;
        self.loaded.get(name).map(|f| (name, f))
    }

    /// Extract `name` if it is not loaded yet. False when the data block failed.
    fn ensure_loaded(&mut self, name: &str) -> bool {
        if self.loaded.contains_key(name) {
            return true;
        }
        let Some(reader) = &self.reader else {
            return false;
        };

        let table = match reader.get_data(name) {
            Ok(table) => table,
            Err(e) => {
                log::error!("Failed to load data of '{name}': {e}");
                self.status_message = Some(format!("Error: {e}"));
                return false;
            }
        };
        let metadata = reader.get_metadata(name).map_err(|e| {
            log::warn!("Metadata of '{name}' unavailable: {e}");
            e.to_string()
        });

        log::info!("Loaded '{name}' with {} rows", table.len());
        self.loaded
            .insert(name.to_string(), LoadedFile { table, metadata });
        true
    }
}
