use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use pdh_reader::{DataTable, XmlDocument, XmlElement, XmlNode};

use crate::state::{AppState, DetailTab};

// ---------------------------------------------------------------------------
// Bottom panel – focused file
// ---------------------------------------------------------------------------

/// Render the data table or metadata tree of the focused file.
pub fn details_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.detail_tab, DetailTab::Data, "Data");
        ui.selectable_value(&mut state.detail_tab, DetailTab::Metadata, "Metadata");
        if let Some(name) = &state.focused {
            ui.separator();
            ui.strong(name);
        }
    });
    ui.separator();

    let Some((name, file)) = state.focused_file() else {
        ui.label("Select a file to see its data and metadata.");
        return;
    };

    match state.detail_tab {
        DetailTab::Data => data_table(ui, &file.table),
        DetailTab::Metadata => match &file.metadata {
            Ok(doc) => metadata_tree(ui, name, doc),
            Err(message) => {
                ui.label(RichText::new(message).color(Color32::RED));
            }
        },
    }
}

fn data_table(ui: &mut Ui, table: &DataTable) {
    if table.is_empty() {
        ui.label("The data block is empty.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(40.0))
        .column(Column::auto().at_least(140.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|ui| {
                ui.strong("scattering_vector");
            });
            header.col(|ui| {
                ui.strong("counts_per_area");
            });
        })
        .body(|body| {
            body.rows(18.0, table.len(), |mut row| {
                let idx = row.index();
                let record = &table.records[idx];
                row.col(|ui| {
                    ui.label(idx.to_string());
                });
                row.col(|ui| {
                    ui.monospace(format!("{:.6e}", record.scattering_vector));
                });
                row.col(|ui| {
                    ui.monospace(format!("{:.6e}", record.counts_per_area));
                });
            });
        });
}

fn metadata_tree(ui: &mut Ui, name: &str, doc: &XmlDocument) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if let Some(decl) = &doc.declaration {
                ui.label(
                    RichText::new(format!(
                        "XML {}{}",
                        decl.version,
                        decl.encoding
                            .as_deref()
                            .map(|e| format!(", {e}"))
                            .unwrap_or_default()
                    ))
                    .weak(),
                );
            }
            element_node(ui, &doc.root, name, 0);
        });
}

/// Leaves render on one line; elements with child elements collapse.
fn element_node(ui: &mut Ui, element: &XmlElement, id: &str, depth: usize) {
    if element.elements().next().is_none() {
        ui.horizontal(|ui: &mut Ui| {
            ui.monospace(element.to_string());
            ui.label(element.text());
        });
        return;
    }

    egui::CollapsingHeader::new(RichText::new(element.to_string()).monospace())
        .id_salt(id)
        .default_open(depth == 0)
        .show(ui, |ui: &mut Ui| {
            for (i, child) in element.children.iter().enumerate() {
                match child {
                    XmlNode::Element(el) => {
                        element_node(ui, el, &format!("{id}/{i}"), depth + 1);
                    }
                    XmlNode::Text(text) => {
                        ui.label(text);
                    }
                }
            }
        });
}
