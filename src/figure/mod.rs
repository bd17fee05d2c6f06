//! Figure layer: plot points, the figure model, and its writers.
//!
//! ```text
//!  filtered records ──▶ points::to_plot_points ──▶ render ──▶ Figure
//!                                                              │
//!                                  ┌───────────────┬───────────┴─────┐
//!                                  ▼               ▼                 ▼
//!                              svg (plotters)   json (serde)    viewer (egui)
//! ```
pub mod output;
pub mod points;
pub mod svg;

use serde::Serialize;

use crate::color::{ColorMethod, ColorScale, Rgb, LINE_COLOR, NONTRANSIT_COLOR, TRANSIT_COLOR};
use crate::data::filter::FilterOptions;
use points::{marker_size, PlotPoint, PointCategory};

// ---------------------------------------------------------------------------
// Figure constants
// ---------------------------------------------------------------------------

/// Distance extent used when neither a bound nor any data sets one.
pub const DEFAULT_DIST_EXTENT: f64 = 20.0;

/// Semi-major axes (AU) of the solar-system reference planets.
pub const REFERENCE_PLANETS: [(&str, f64); 3] =
    [("Mercury", 0.387), ("Venus", 0.723), ("Mars", 1.523)];

/// Mass key entries: label, mass (Earth masses), y position.
pub const MASS_KEY: [(&str, f64, f64); 3] = [
    ("Mars-mass", 0.107, 0.75),
    ("Earth-mass", 1.0, 1.0),
    ("Neptune-mass", 17.15, 1.5),
];

pub const X_LABEL: &str = "Distance (pc)";
pub const Y_LABEL: &str = "Stellar Insolation Flux (relative to Earth)";
pub const CREDIT: &str = "NASA Exoplanet Archive";

/// Credit line, carrying the download stamp when the catalog has one.
pub fn credit_for(retrieved: Option<&str>) -> String {
    match retrieved {
        Some(stamp) => format!("{CREDIT} {stamp}"),
        None => CREDIT.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Figure model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    Linear,
    Log,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub label: String,
    pub scale: AxisScale,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStyle {
    Filled,
    /// Ring only: used for target-list overlays.
    Open,
}

/// One legend group of points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub style: MarkerStyle,
    /// Legend swatch colour.
    pub color: Rgb,
    pub show_in_legend: bool,
    pub points: Vec<PlotPoint>,
}

/// A horizontal line at the insolation a solar-system planet receives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub label: String,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMarker {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Colorbar {
    pub title: String,
    pub scale: ColorScale,
}

/// A fully described figure, independent of any drawing backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub credit: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<Series>,
    pub reference_lines: Vec<ReferenceLine>,
    pub mass_key: Vec<KeyMarker>,
    pub mass_key_alpha: f64,
    pub colorbar: Option<Colorbar>,
}

impl Figure {
    /// Number of planets drawn, not counting overlay rings.
    pub fn planet_count(&self) -> usize {
        self.series
            .iter()
            .filter(|s| s.style == MarkerStyle::Filled)
            .map(|s| s.points.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.planet_count() == 0
    }
}

// ---------------------------------------------------------------------------
// Rendering: points → Figure
// ---------------------------------------------------------------------------

/// Insolation of a planet orbiting the Sun at `a` AU.
pub fn solar_insolation(a: f64) -> f64 {
    1.0 / (a * a)
}

/// Title describing the active distance / temperature bounds.
pub fn title_for(options: &FilterOptions) -> String {
    let mut title = String::from("Known Planets");
    if let Some(t) = options.max_teff {
        title.push_str(&format!(" Around Stars Cooler Than {t} K"));
    }
    if let Some(d) = options.max_dist {
        title.push_str(&format!(" Within {d} pc"));
    }
    title
}

/// Build the figure for a set of plot points.
///
/// Empty input is not an error: the result has no planet series but keeps
/// its axes, reference lines and mass key.
pub fn render(points: &[PlotPoint], options: &FilterOptions) -> Figure {
    let mut series = Vec::new();
    let mut colorbar = None;

    match options.color_method {
        ColorMethod::Transit => {
            for (category, color) in [
                (PointCategory::Transiting, TRANSIT_COLOR),
                (PointCategory::NonTransiting, NONTRANSIT_COLOR),
            ] {
                let members: Vec<PlotPoint> = points
                    .iter()
                    .filter(|p| p.category == category)
                    .cloned()
                    .collect();
                if !members.is_empty() {
                    series.push(Series {
                        name: category.label().to_string(),
                        style: MarkerStyle::Filled,
                        color,
                        show_in_legend: true,
                        points: members,
                    });
                }
            }
        }
        ColorMethod::Teff => {
            if !points.is_empty() {
                series.push(Series {
                    name: PointCategory::Planet.label().to_string(),
                    style: MarkerStyle::Filled,
                    color: LINE_COLOR,
                    show_in_legend: false,
                    points: points.to_vec(),
                });
            }
            colorbar = ColorScale::spanning(points.iter().filter_map(|p| p.teff)).map(|scale| {
                Colorbar {
                    title: "Teff (K)".to_string(),
                    scale,
                }
            });
        }
    }

    if let Some(label) = options.target_list.overlay_label() {
        let rings: Vec<PlotPoint> = points
            .iter()
            .filter(|p| p.target)
            .map(|p| PlotPoint {
                color: LINE_COLOR,
                alpha: 1.0,
                ..p.clone()
            })
            .collect();
        if !rings.is_empty() {
            series.push(Series {
                name: label.to_string(),
                style: MarkerStyle::Open,
                color: LINE_COLOR,
                show_in_legend: true,
                points: rings,
            });
        }
    }

    let x_extent = x_extent(points, options);
    let reference_lines: Vec<ReferenceLine> = REFERENCE_PLANETS
        .iter()
        .map(|(label, a)| ReferenceLine {
            label: label.to_string(),
            y: solar_insolation(*a),
        })
        .collect();
    let mass_key = MASS_KEY
        .iter()
        .map(|(label, mass, y)| KeyMarker {
            label: label.to_string(),
            x: 0.95 * x_extent,
            y: *y,
            size: marker_size(*mass, options.size_scale),
        })
        .collect();

    let (y_min, y_max) = y_range(points, &reference_lines);

    Figure {
        title: title_for(options),
        credit: CREDIT.to_string(),
        x_axis: Axis {
            label: X_LABEL.to_string(),
            scale: AxisScale::Linear,
            min: 0.0,
            max: x_extent * 1.05,
        },
        y_axis: Axis {
            label: Y_LABEL.to_string(),
            scale: AxisScale::Log,
            min: y_min,
            max: y_max,
        },
        series,
        reference_lines,
        mass_key,
        mass_key_alpha: options.alpha,
        colorbar,
    }
}

/// Right edge of the data region: the distance bound if set, widened to
/// the farthest point.
fn x_extent(points: &[PlotPoint], options: &FilterOptions) -> f64 {
    let data_max = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let extent = match options.max_dist.filter(|d| d.is_finite() && *d > 0.0) {
        Some(d) => d.max(data_max),
        None if data_max.is_finite() && data_max > 0.0 => data_max,
        None => DEFAULT_DIST_EXTENT,
    };
    if extent > 0.0 {
        extent
    } else {
        DEFAULT_DIST_EXTENT
    }
}

/// Log-axis range covering the data, the reference lines and the mass key.
fn y_range(points: &[PlotPoint], lines: &[ReferenceLine]) -> (f64, f64) {
    let key_min = MASS_KEY.iter().map(|(_, _, y)| *y).fold(f64::INFINITY, f64::min);
    let lo = points
        .iter()
        .map(|p| p.y)
        .chain(lines.iter().map(|l| l.y))
        .fold(key_min, f64::min);
    let hi = points
        .iter()
        .map(|p| p.y)
        .chain(lines.iter().map(|l| l.y))
        .fold(f64::NEG_INFINITY, f64::max);
    (lo / 2.0, hi * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::TargetListKind;
    use approx::assert_relative_eq;

    fn point(name: &str, x: f64, y: f64, category: PointCategory, target: bool) -> PlotPoint {
        PlotPoint {
            name: name.into(),
            x,
            y,
            color: TRANSIT_COLOR,
            size: 20.0,
            alpha: 0.5,
            category,
            target,
            teff: Some(3000.0),
            period: None,
            mass: Some(1.0),
            eq_temp: None,
        }
    }

    #[test]
    fn empty_points_give_a_valid_figure() {
        let fig = render(&[], &FilterOptions::default());
        assert!(fig.is_empty());
        assert!(fig.series.is_empty());
        assert_eq!(fig.x_axis.max, DEFAULT_DIST_EXTENT * 1.05);
        assert!(fig.y_axis.min > 0.0 && fig.y_axis.min < fig.y_axis.max);
        assert_eq!(fig.reference_lines.len(), 3);
        assert_eq!(fig.mass_key.len(), 3);
    }

    #[test]
    fn transit_series_come_in_fixed_order() {
        let points = vec![
            point("n", 3.0, 1.0, PointCategory::NonTransiting, false),
            point("t", 4.0, 2.0, PointCategory::Transiting, false),
        ];
        let fig = render(&points, &FilterOptions::default());
        let names: Vec<&str> = fig.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Transiting", "Non-Transiting"]);
        assert_eq!(fig.planet_count(), 2);
    }

    #[test]
    fn overlay_rings_only_members() {
        let points = vec![
            point("in", 3.0, 1.0, PointCategory::Transiting, true),
            point("out", 4.0, 2.0, PointCategory::Transiting, false),
        ];
        let options = FilterOptions {
            target_list: TargetListKind::Mirecle,
            ..Default::default()
        };
        let fig = render(&points, &options);
        let overlay = fig.series.last().unwrap();
        assert_eq!(overlay.name, "MIRECLE Targets");
        assert_eq!(overlay.style, MarkerStyle::Open);
        assert_eq!(overlay.points.len(), 1);
        assert_eq!(overlay.points[0].name, "in");
        assert_eq!(overlay.points[0].alpha, 1.0);
        assert_eq!(fig.planet_count(), 2);
    }

    #[test]
    fn teff_mode_adds_colorbar() {
        let mut a = point("a", 3.0, 1.0, PointCategory::Planet, false);
        let mut b = point("b", 4.0, 2.0, PointCategory::Planet, false);
        a.teff = Some(2700.0);
        b.teff = Some(3900.0);
        let options = FilterOptions {
            color_method: ColorMethod::Teff,
            ..Default::default()
        };
        let fig = render(&[a, b], &options);
        let bar = fig.colorbar.unwrap();
        assert_eq!(bar.scale, ColorScale { min: 2700.0, max: 3900.0 });
        assert!(!fig.series[0].show_in_legend);
    }

    #[test]
    fn mass_key_sits_near_the_distance_bound() {
        let options = FilterOptions {
            max_dist: Some(10.0),
            size_scale: 2.0,
            ..Default::default()
        };
        let fig = render(&[], &options);
        assert_relative_eq!(fig.mass_key[0].x, 9.5);
        assert_relative_eq!(fig.mass_key[2].size, 20.0 * 2.0 * 17.15);
        assert_eq!(fig.title, "Known Planets Within 10 pc");
    }

    #[test]
    fn y_range_covers_points_and_reference_lines() {
        let points = vec![point("hot", 3.0, 250.0, PointCategory::Transiting, false)];
        let fig = render(&points, &FilterOptions::default());
        assert!(fig.y_axis.max >= 250.0);
        let mars = solar_insolation(1.523);
        assert!(fig.y_axis.min <= mars);
    }

    #[test]
    fn credit_carries_the_download_stamp() {
        assert_eq!(credit_for(Some("2024/05/01 12:00")), "NASA Exoplanet Archive 2024/05/01 12:00");
        assert_eq!(credit_for(None), CREDIT);
        assert_eq!(render(&[], &FilterOptions::default()).credit, CREDIT);
    }

    #[test]
    fn title_names_both_bounds() {
        let options = FilterOptions {
            max_teff: Some(3700.0),
            max_dist: Some(20.0),
            ..Default::default()
        };
        assert_eq!(
            title_for(&options),
            "Known Planets Around Stars Cooler Than 3700 K Within 20 pc"
        );
    }
}
