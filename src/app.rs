use std::path::PathBuf;

use eframe::egui;

use crate::data::filter::FilterOptions;
use crate::data::model::PlanetCatalog;
use crate::state::{AppState, TargetListPaths};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExoplanetApp {
    pub state: AppState,
}

impl ExoplanetApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl Default for ExoplanetApp {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl eframe::App for ExoplanetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: bounds and presentation ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::insolation_plot(ui, &self.state);
        });
    }
}

/// Open the interactive viewer on an already loaded catalog and block until
/// the window is closed.
pub fn run_viewer(
    catalog: PlanetCatalog,
    source: Option<PathBuf>,
    options: FilterOptions,
    target_lists: TargetListPaths,
) -> anyhow::Result<()> {
    let state = AppState::new(Some(catalog), source, options, target_lists);

    let native = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Nearby Exoplanets",
        native,
        Box::new(move |_cc| Ok(Box::new(ExoplanetApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
