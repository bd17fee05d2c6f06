//! Plot nearby exoplanets by distance and insolation.
//!
//! The pipeline is a single synchronous pass:
//! [`load_catalog`] → [`data::filter::filter`] → [`figure::points::to_plot_points`]
//! → [`figure::render`], with [`make_figure`] running the last three for
//! embedding applications.

pub mod app;
pub mod cli;
pub mod color;
pub mod data;
pub mod error;
pub mod figure;
pub mod state;
pub mod ui;

use std::path::Path;

use data::filter::{filter, FilterOptions};
use data::model::{PlanetCatalog, TargetListKind};
use data::targets::TargetList;
use figure::points::to_plot_points;
use figure::Figure;

pub use error::{Error, Result};

/// Load a catalog (`.csv`, `.json`, `.parquet`).
pub fn load_catalog(path: &Path) -> Result<PlanetCatalog> {
    let catalog = data::loader::load_file(path).map_err(|e| Error::data_load(path, &e))?;
    log::info!("Loaded {} planets from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Flag the members of a target list in the catalog.
///
/// A missing list file is not fatal: the catalog keeps whatever membership
/// columns it was loaded with.
pub fn attach_target_list(catalog: &mut PlanetCatalog, kind: TargetListKind, path: &Path) -> usize {
    if kind == TargetListKind::None {
        return 0;
    }
    if !path.exists() {
        log::warn!(
            "{kind} target list {} not found; using membership columns from the dataset ({} members)",
            path.display(),
            catalog.member_count(kind)
        );
        return 0;
    }
    match TargetList::load(kind, path) {
        Ok(list) => list.mark(catalog),
        Err(e) => {
            log::warn!("Ignoring {kind} target list: {e:#}");
            0
        }
    }
}

/// Filter the catalog and render the figure. Same semantics as the command
/// line, returning the figure instead of writing it.
///
/// Options the command line would reject fail with [`Error::InvalidOption`].
pub fn make_figure(catalog: &PlanetCatalog, options: &FilterOptions) -> Result<Figure> {
    options.validate()?;
    let kept = filter(&catalog.records, options);
    let points = to_plot_points(&kept, options);
    log::debug!("{} of {} filtered planets placed on the plot", points.len(), kept.len());
    let mut figure = figure::render(&points, options);
    figure.credit = figure::credit_for(catalog.retrieved.as_deref());
    Ok(figure)
}
