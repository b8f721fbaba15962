use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – file list
// ---------------------------------------------------------------------------

/// Render the left panel: one row per indexed file.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Files");
    ui.separator();

    let Some(reader) = &state.reader else {
        ui.label("No directory opened.");
        return;
    };
    ui.label(
        RichText::new(reader.index().directory().display().to_string())
            .small()
            .weak(),
    );

    let names = state.names();
    if names.is_empty() {
        ui.label("No .pdh files in this directory.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            for name in &names {
                state.set_visible(name, true);
            }
        }
        if ui.small_button("None").clicked() {
            state.visible.clear();
        }
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for name in &names {
                ui.horizontal(|ui: &mut Ui| {
                    let mut checked = state.visible.contains(name);
                    let swatch = RichText::new("■").color(state.color_map.color_for(name));
                    if ui.checkbox(&mut checked, swatch).changed() {
                        state.set_visible(name, checked);
                    }

                    let is_focused = state.focused.as_deref() == Some(name.as_str());
                    if ui.selectable_label(is_focused, name).clicked() {
                        state.focus(name);
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                reload(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(reader) = &state.reader {
            ui.label(format!(
                "{} files, {} shown",
                reader.index().len(),
                state.visible.len()
            ));
        }

        ui.separator();

        if ui.selectable_label(state.log_scale, "Log-Log").clicked() {
            state.log_scale = !state.log_scale;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open a folder of .pdh files")
        .pick_folder();

    if let Some(path) = folder {
        state.open_directory(&path);
    }
}

/// Re-scan the current directory and drop cached extractions.
fn reload(state: &mut AppState) {
    let Some(dir) = state
        .reader
        .as_ref()
        .map(|r| r.index().directory().to_path_buf())
    else {
        return;
    };
    state.open_directory(&dir);
}
