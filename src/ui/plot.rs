use eframe::egui::Ui;
use egui_plot::{Line, Plot, PlotPoints};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Scattering curves (central panel)
// ---------------------------------------------------------------------------

/// Render I(q) of every visible file in the central panel.
pub fn curve_plot(ui: &mut Ui, state: &AppState) {
    if state.reader.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a folder of .pdh files  (File → Open folder…)");
        });
        return;
    }

    let (x_label, y_label) = if state.log_scale {
        ("log10 q", "log10 I(q)")
    } else {
        ("q", "I(q)")
    };

    Plot::new("curve_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for name in &state.visible {
                let Some(file) = state.loaded.get(name) else {
                    continue;
                };

                let points: PlotPoints = file
                    .table
                    .iter()
                    .filter_map(|r| {
                        let (q, i) = (r.scattering_vector, r.counts_per_area);
                        if !state.log_scale {
                            Some([q, i])
                        } else if q > 0.0 && i > 0.0 {
                            // log10 of non-positive values is undefined
                            Some([q.log10(), i.log10()])
                        } else {
                            None
                        }
                    })
                    .collect();

                let line = Line::new(points)
                    .name(name)
                    .color(state.color_map.color_for(name))
                    .width(1.5);

                plot_ui.line(line);
            }
        });
}
