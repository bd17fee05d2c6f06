use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

// ---------------------------------------------------------------------------
// TargetListKind – which curated list (if any) is overlaid
// ---------------------------------------------------------------------------

/// Curated target lists that can be overlaid on the main plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetListKind {
    #[default]
    None,
    Mirecle,
    Hwo,
}

impl TargetListKind {
    /// Legend label of the overlay series.
    pub fn overlay_label(self) -> Option<&'static str> {
        match self {
            TargetListKind::None => None,
            TargetListKind::Mirecle => Some("MIRECLE Targets"),
            TargetListKind::Hwo => Some("HWO Targets"),
        }
    }
}

impl FromStr for TargetListKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(TargetListKind::None),
            "mirecle" => Ok(TargetListKind::Mirecle),
            "hwo" => Ok(TargetListKind::Hwo),
            other => Err(Error::InvalidOption(format!(
                "unknown target list '{other}' (expected none, mirecle or hwo)"
            ))),
        }
    }
}

impl fmt::Display for TargetListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TargetListKind::None => "none",
            TargetListKind::Mirecle => "mirecle",
            TargetListKind::Hwo => "hwo",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// PlanetRecord – one row of the archive table
// ---------------------------------------------------------------------------

/// A single planet together with the properties of its host star.
///
/// Every numeric attribute is optional: the archive leaves plenty of cells
/// blank, and a blank cell must fail any bound placed on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanetRecord {
    /// Planet designation (`pl_name`).
    pub name: String,
    /// Host star name (`hostname`).
    pub host: String,
    pub hip_name: Option<String>,
    pub hd_name: Option<String>,
    /// Host star effective temperature in K.
    pub teff: Option<f64>,
    /// Distance from the Sun in parsecs.
    pub distance: Option<f64>,
    /// Orbital period in days.
    pub period: Option<f64>,
    /// Planet mass in Earth masses.
    pub mass: Option<f64>,
    /// Insolation flux relative to Earth.
    pub insolation: Option<f64>,
    /// Planet equilibrium temperature in K.
    pub eq_temp: Option<f64>,
    /// Host star radius in solar radii.
    pub star_radius: Option<f64>,
    pub transiting: bool,
    pub in_mirecle: bool,
    pub in_hwo: bool,
}

impl PlanetRecord {
    /// Whether the record belongs to the given target list.
    pub fn is_member(&self, list: TargetListKind) -> bool {
        match list {
            TargetListKind::None => false,
            TargetListKind::Mirecle => self.in_mirecle,
            TargetListKind::Hwo => self.in_hwo,
        }
    }
}

/// Approximate insolation from stellar luminosity (log10 L/L☉) and orbital
/// semi-major axis (AU).
pub fn approx_insolation(log_luminosity: f64, semi_major_axis: f64) -> Option<f64> {
    if !log_luminosity.is_finite() || !semi_major_axis.is_finite() || semi_major_axis <= 0.0 {
        return None;
    }
    Some(10f64.powf(log_luminosity) / semi_major_axis.powi(2))
}

// ---------------------------------------------------------------------------
// PlanetCatalog – the complete loaded table
// ---------------------------------------------------------------------------

/// Known stellar radius fixes applied after loading.
const RADIUS_CORRECTIONS: &[(&str, f64)] = &[("GJ 667 C", 0.42)];

/// The full parsed table, in dataset order.
#[derive(Debug, Clone, Default)]
pub struct PlanetCatalog {
    pub records: Vec<PlanetRecord>,
    /// When the table was downloaded, from its `# <stamp>` header line.
    pub retrieved: Option<String>,
}

impl PlanetCatalog {
    /// Build a catalog from loaded records, applying known corrections.
    pub fn from_records(mut records: Vec<PlanetRecord>) -> Self {
        for rec in &mut records {
            if let Some((_, radius)) = RADIUS_CORRECTIONS
                .iter()
                .find(|(host, _)| rec.host == *host)
            {
                rec.star_radius = Some(*radius);
            }
        }
        PlanetCatalog {
            records,
            retrieved: None,
        }
    }

    /// Number of planets.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of planets flagged as members of `list`.
    pub fn member_count(&self, list: TargetListKind) -> usize {
        self.records.iter().filter(|r| r.is_member(list)).count()
    }
}
