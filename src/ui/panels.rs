use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::cli::DEFAULT_OUTPUT;
use crate::color::ColorMethod;
use crate::data::filter::Bound;
use crate::data::model::TargetListKind;
use crate::figure::output;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – bound and presentation widgets
// ---------------------------------------------------------------------------

/// Value a bound starts at when its checkbox is first ticked.
fn initial_value(bound: Bound) -> f64 {
    match bound {
        Bound::Teff => 4000.0,
        Bound::Dist => 20.0,
        Bound::Period => 25.0,
        Bound::Mass => 20.0,
        Bound::Insol => 100.0,
    }
}

fn drag_speed(bound: Bound) -> f64 {
    match bound {
        Bound::Teff => 10.0,
        Bound::Dist | Bound::Period | Bound::Mass | Bound::Insol => 0.1,
    }
}

fn color_method_label(method: ColorMethod) -> &'static str {
    match method {
        ColorMethod::Transit => "Transit / non-transit",
        ColorMethod::Teff => "Host Teff",
    }
}

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Bounds");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Upper bounds: unticked means unconstrained ----
            for bound in Bound::ALL {
                let current = state.options.bound(bound);
                let mut enabled = current.is_some();
                let mut value = current.unwrap_or_else(|| initial_value(bound));

                ui.horizontal(|ui: &mut Ui| {
                    ui.checkbox(&mut enabled, bound.label());
                    ui.add_enabled(
                        enabled,
                        egui::DragValue::new(&mut value)
                            .speed(drag_speed(bound))
                            .range(0.0..=f64::MAX),
                    );
                });

                state.set_bound(bound, enabled.then_some(value));
            }

            ui.separator();

            // ---- Colour method ----
            ui.strong("Color by");
            let mut method = state.options.color_method;
            egui::ComboBox::from_id_salt("color_by")
                .selected_text(color_method_label(method))
                .show_ui(ui, |ui: &mut Ui| {
                    for m in [ColorMethod::Transit, ColorMethod::Teff] {
                        ui.selectable_value(&mut method, m, color_method_label(m));
                    }
                });
            state.set_color_method(method);

            // ---- Target list overlay ----
            ui.strong("Target list");
            let mut kind = state.options.target_list;
            egui::ComboBox::from_id_salt("target_list")
                .selected_text(kind.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for k in [TargetListKind::None, TargetListKind::Mirecle, TargetListKind::Hwo] {
                        ui.selectable_value(&mut kind, k, k.to_string());
                    }
                });
            state.set_target_list(kind);

            ui.separator();

            // ---- Markers ----
            ui.strong("Markers");
            let mut size = state.options.size_scale;
            ui.add(
                egui::Slider::new(&mut size, 0.1..=10.0)
                    .logarithmic(true)
                    .text("Size"),
            );
            state.set_size_scale(size);

            let mut alpha = state.options.alpha;
            ui.add(egui::Slider::new(&mut alpha, 0.0..=1.0).text("Opacity"));
            state.set_alpha(alpha);
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Save figure…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.catalog.is_some() {
            ui.label(format!(
                "{} planets loaded, {} plotted",
                state.catalog_len(),
                state.figure.planet_count()
            ));
        }
        if let Some(source) = &state.source {
            ui.separator();
            ui.label(RichText::new(source.display().to_string()).weak());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open planet catalog")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save figure")
        .set_file_name(DEFAULT_OUTPUT)
        .add_filter("SVG", &["svg"])
        .add_filter("JSON figure", &["json"])
        .save_file();

    let Some(path) = file else {
        return;
    };
    match output::save(&state.figure, &path) {
        Ok(()) => state.status_message = None,
        Err(e) => {
            log::error!("Failed to save figure: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}
