use std::path::PathBuf;

use clap::Parser;

use crate::color::ColorMethod;
use crate::data::filter::{FilterOptions, DEFAULT_ALPHA, DEFAULT_SIZE_SCALE};
use crate::data::model::TargetListKind;

pub const DEFAULT_OUTPUT: &str = "nearby_exoplanets_insolation.svg";
pub const DEFAULT_DATA: &str = "nearby_exoplanets.csv";
pub const DEFAULT_MIRECLE_LIST: &str = "mirecle_targets.csv";
pub const DEFAULT_HWO_LIST: &str = "hwo_targets.csv";

/// Plot nearby exoplanets by distance and stellar insolation.
#[derive(Debug, Parser)]
#[command(name = "nearby-exoplanets", version)]
#[command(about = "Plot nearby exoplanets by distance and stellar insolation")]
pub struct Cli {
    /// Maximum host star effective temperature (K)
    #[arg(short = 't', long = "max_teff", visible_alias = "max-teff", value_parser = parse_bound)]
    pub max_teff: Option<f64>,

    /// Maximum distance from the Sun (pc)
    #[arg(short = 'd', long = "max_dist", visible_alias = "max-dist", value_parser = parse_bound)]
    pub max_dist: Option<f64>,

    /// Maximum orbital period (days)
    #[arg(short = 'p', long = "max_period", visible_alias = "max-period", value_parser = parse_bound)]
    pub max_period: Option<f64>,

    /// Maximum planet mass (Earth masses)
    #[arg(short = 'm', long = "max_mass", visible_alias = "max-mass", value_parser = parse_bound)]
    pub max_mass: Option<f64>,

    /// Maximum insolation (relative to Earth)
    #[arg(short = 'i', long = "max_insol", visible_alias = "max-insol", value_parser = parse_bound)]
    pub max_insol: Option<f64>,

    /// Output file (.svg or .json)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Marker size multiplier
    #[arg(short, long, default_value_t = DEFAULT_SIZE_SCALE, value_parser = parse_size)]
    pub size: f64,

    /// Marker opacity, 0 (transparent) to 1 (opaque)
    #[arg(short, long, default_value_t = DEFAULT_ALPHA, value_parser = parse_alpha)]
    pub alpha: f64,

    /// Overlay the MIRECLE target list
    #[arg(long, conflicts_with = "hwo")]
    pub mirecle: bool,

    /// Overlay the Habitable Worlds Observatory target list
    #[arg(long)]
    pub hwo: bool,

    /// How to colour the markers
    #[arg(short, long, value_enum, default_value_t = ColorMethod::Transit)]
    pub color: ColorMethod,

    /// Planet catalog (.csv, .json or .parquet)
    #[arg(long, default_value = DEFAULT_DATA)]
    pub data: PathBuf,

    /// MIRECLE target list CSV
    #[arg(long, default_value = DEFAULT_MIRECLE_LIST)]
    pub mirecle_list: PathBuf,

    /// HWO target list CSV
    #[arg(long, default_value = DEFAULT_HWO_LIST)]
    pub hwo_list: PathBuf,

    /// Download a fresh catalog from the NASA Exoplanet Archive if the local copy is stale
    #[arg(long)]
    pub refresh: bool,

    /// Open the interactive viewer instead of writing a file
    #[arg(long)]
    pub show: bool,
}

impl Cli {
    pub fn target_list(&self) -> TargetListKind {
        if self.mirecle {
            TargetListKind::Mirecle
        } else if self.hwo {
            TargetListKind::Hwo
        } else {
            TargetListKind::None
        }
    }

    /// Path of the list file for the selected target list, if any.
    pub fn target_list_path(&self) -> Option<&PathBuf> {
        match self.target_list() {
            TargetListKind::None => None,
            TargetListKind::Mirecle => Some(&self.mirecle_list),
            TargetListKind::Hwo => Some(&self.hwo_list),
        }
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            max_teff: self.max_teff,
            max_dist: self.max_dist,
            max_period: self.max_period,
            max_mass: self.max_mass,
            max_insol: self.max_insol,
            target_list: self.target_list(),
            size_scale: self.size,
            alpha: self.alpha,
            color_method: self.color,
        }
    }
}

fn parse_number(s: &str) -> Result<f64, String> {
    let v: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("'{s}' is not a finite number"))
    }
}

fn parse_bound(s: &str) -> Result<f64, String> {
    parse_number(s)
}

fn parse_size(s: &str) -> Result<f64, String> {
    let v = parse_number(s)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(format!("size must be positive, got {v}"))
    }
}

fn parse_alpha(s: &str) -> Result<f64, String> {
    let v = parse_number(s)?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(format!("alpha must be between 0 and 1, got {v}"))
    }
}
