use std::path::{Path, PathBuf};

use crate::cli::{Cli, DEFAULT_HWO_LIST, DEFAULT_MIRECLE_LIST};
use crate::color::ColorMethod;
use crate::data::filter::{Bound, FilterOptions};
use crate::data::model::{PlanetCatalog, TargetListKind};
use crate::figure::{self, Figure};
use crate::{attach_target_list, load_catalog, make_figure};

// ---------------------------------------------------------------------------
// Target list locations
// ---------------------------------------------------------------------------

/// Where the viewer looks for target list files when one is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetListPaths {
    pub mirecle: PathBuf,
    pub hwo: PathBuf,
}

impl Default for TargetListPaths {
    fn default() -> Self {
        Self {
            mirecle: PathBuf::from(DEFAULT_MIRECLE_LIST),
            hwo: PathBuf::from(DEFAULT_HWO_LIST),
        }
    }
}

impl From<&Cli> for TargetListPaths {
    fn from(cli: &Cli) -> Self {
        Self {
            mirecle: cli.mirecle_list.clone(),
            hwo: cli.hwo_list.clone(),
        }
    }
}

impl TargetListPaths {
    fn path_for(&self, kind: TargetListKind) -> Option<&Path> {
        match kind {
            TargetListKind::None => None,
            TargetListKind::Mirecle => Some(&self.mirecle),
            TargetListKind::Hwo => Some(&self.hwo),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct AppState {
    /// Loaded catalog (None until a file is loaded).
    pub catalog: Option<PlanetCatalog>,

    /// File the catalog was loaded from.
    pub source: Option<PathBuf>,

    /// Current filter and presentation options.
    pub options: FilterOptions,

    /// Figure for the current catalog and options (cached).
    pub figure: Figure,

    pub target_lists: TargetListPaths,

    /// Target lists already merged into the catalog.
    attached: Vec<TargetListKind>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        let options = FilterOptions::default();
        Self {
            catalog: None,
            source: None,
            figure: figure::render(&[], &options),
            options,
            target_lists: TargetListPaths::default(),
            attached: Vec::new(),
            status_message: None,
        }
    }
}

impl AppState {
    pub fn new(
        catalog: Option<PlanetCatalog>,
        source: Option<PathBuf>,
        options: FilterOptions,
        target_lists: TargetListPaths,
    ) -> Self {
        let mut state = Self {
            options,
            target_lists,
            ..Default::default()
        };
        // Anything selected on the command line was attached before launch.
        if state.options.target_list != TargetListKind::None {
            state.attached.push(state.options.target_list);
        }
        match catalog {
            Some(c) => state.set_catalog(c, source),
            None => state.refresh(),
        }
        state
    }

    /// Ingest a newly loaded catalog and redraw.
    pub fn set_catalog(&mut self, catalog: PlanetCatalog, source: Option<PathBuf>) {
        self.catalog = Some(catalog);
        self.source = source;
        self.status_message = None;
        let selected = self.options.target_list;
        self.attached.retain(|k| *k == selected);
        self.refresh();
    }

    /// Load a catalog from disk, reporting failures in the status line.
    pub fn open(&mut self, path: &Path) {
        match load_catalog(path) {
            Ok(mut catalog) => {
                // A fresh catalog carries no list flags from earlier files.
                self.attached.clear();
                self.attach_selected(&mut catalog);
                self.set_catalog(catalog, Some(path.to_path_buf()));
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Recompute the cached figure after an option change.
    pub fn refresh(&mut self) {
        let Some(catalog) = &self.catalog else {
            self.figure = figure::render(&[], &self.options);
            return;
        };
        match make_figure(catalog, &self.options) {
            Ok(figure) => self.figure = figure,
            Err(e) => {
                log::warn!("Keeping the previous figure: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Number of planets in the catalog.
    pub fn catalog_len(&self) -> usize {
        self.catalog.as_ref().map_or(0, PlanetCatalog::len)
    }

    pub fn set_bound(&mut self, bound: Bound, value: Option<f64>) {
        if self.options.bound(bound) != value {
            self.options.set_bound(bound, value);
            self.refresh();
        }
    }

    pub fn set_color_method(&mut self, method: ColorMethod) {
        if self.options.color_method != method {
            self.options.color_method = method;
            self.refresh();
        }
    }

    /// Select a target list, loading its file the first time it is used.
    pub fn set_target_list(&mut self, kind: TargetListKind) {
        if self.options.target_list == kind {
            return;
        }
        self.options.target_list = kind;
        if let Some(mut catalog) = self.catalog.take() {
            self.attach_selected(&mut catalog);
            self.catalog = Some(catalog);
        }
        self.refresh();
    }

    pub fn set_size_scale(&mut self, size_scale: f64) {
        if size_scale > 0.0 && self.options.size_scale != size_scale {
            self.options.size_scale = size_scale;
            self.refresh();
        }
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        let alpha = alpha.clamp(0.0, 1.0);
        if self.options.alpha != alpha {
            self.options.alpha = alpha;
            self.refresh();
        }
    }

    fn attach_selected(&mut self, catalog: &mut PlanetCatalog) {
        let kind = self.options.target_list;
        if kind == TargetListKind::None || self.attached.contains(&kind) {
            return;
        }
        if let Some(path) = self.target_lists.path_for(kind) {
            attach_target_list(catalog, kind, path);
        }
        self.attached.push(kind);
    }
}
