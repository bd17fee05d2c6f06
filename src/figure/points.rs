use serde::Serialize;

use crate::color::{ColorMethod, ColorScale, Rgb, MISSING_COLOR, NONTRANSIT_COLOR, TRANSIT_COLOR};
use crate::data::filter::FilterOptions;
use crate::data::model::PlanetRecord;

/// Marker area of an Earth-mass planet at `size_scale = 1`.
pub const MARKER_AREA: f64 = 20.0;

/// Marker area for a planet of `mass` Earth masses.
pub fn marker_size(mass: f64, size_scale: f64) -> f64 {
    MARKER_AREA * size_scale * mass
}

/// Colour category a point is grouped under in the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointCategory {
    Transiting,
    NonTransiting,
    /// Continuously coloured (Teff mode): one undifferentiated group.
    Planet,
}

impl PointCategory {
    pub fn label(self) -> &'static str {
        match self {
            PointCategory::Transiting => "Transiting",
            PointCategory::NonTransiting => "Non-Transiting",
            PointCategory::Planet => "Planets",
        }
    }
}

/// A plot-ready planet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub name: String,
    /// Distance (pc).
    pub x: f64,
    /// Insolation (Earth units).
    pub y: f64,
    pub color: Rgb,
    /// Marker area.
    pub size: f64,
    pub alpha: f64,
    pub category: PointCategory,
    /// On the selected target list.
    pub target: bool,
    // Hover details.
    pub teff: Option<f64>,
    pub period: Option<f64>,
    pub mass: Option<f64>,
    pub eq_temp: Option<f64>,
}

/// Position on the distance / log-insolation plane, if the record has one.
fn placement(record: &PlanetRecord) -> Option<(f64, f64)> {
    let x = record.distance.filter(|d| d.is_finite())?;
    let y = record.insolation.filter(|s| s.is_finite() && *s > 0.0)?;
    Some((x, y))
}

/// Map filtered records to plot points.
///
/// x is distance, y is insolation. Records that cannot be placed on those
/// axes are left out. A planet without a mass is drawn at Earth mass.
pub fn to_plot_points(records: &[&PlanetRecord], options: &FilterOptions) -> Vec<PlotPoint> {
    let placed: Vec<(&PlanetRecord, (f64, f64))> = records
        .iter()
        .filter_map(|r| placement(r).map(|xy| (*r, xy)))
        .collect();

    let teff_scale = match options.color_method {
        ColorMethod::Teff => ColorScale::spanning(placed.iter().filter_map(|(r, _)| r.teff)),
        ColorMethod::Transit => None,
    };

    placed
        .into_iter()
        .map(|(rec, (x, y))| {
            let (category, color) = match options.color_method {
                ColorMethod::Transit if rec.transiting => (PointCategory::Transiting, TRANSIT_COLOR),
                ColorMethod::Transit => (PointCategory::NonTransiting, NONTRANSIT_COLOR),
                ColorMethod::Teff => {
                    let color = match (rec.teff.filter(|t| t.is_finite()), teff_scale) {
                        (Some(t), Some(scale)) => scale.color_for(t),
                        _ => MISSING_COLOR,
                    };
                    (PointCategory::Planet, color)
                }
            };
            let mass = rec.mass.filter(|m| m.is_finite() && *m > 0.0).unwrap_or(1.0);

            PlotPoint {
                name: rec.name.clone(),
                x,
                y,
                color,
                size: marker_size(mass, options.size_scale),
                alpha: options.alpha,
                category,
                target: rec.is_member(options.target_list),
                teff: rec.teff,
                period: rec.period,
                mass: rec.mass,
                eq_temp: rec.eq_temp,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::cividis;
    use crate::data::model::TargetListKind;

    fn planet(name: &str, teff: f64, dist: f64, mass: Option<f64>, insol: f64, transit: bool) -> PlanetRecord {
        PlanetRecord {
            name: name.into(),
            teff: Some(teff),
            distance: Some(dist),
            mass,
            insolation: Some(insol),
            transiting: transit,
            ..Default::default()
        }
    }

    #[test]
    fn transit_method_splits_into_two_categories() {
        let a = planet("a", 3000.0, 5.0, Some(1.0), 0.8, true);
        let b = planet("b", 3300.0, 7.0, Some(2.0), 2.0, false);
        let points = to_plot_points(&[&a, &b], &FilterOptions::default());
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].category, PointCategory::Transiting);
        assert_eq!(points[0].color, TRANSIT_COLOR);
        assert_eq!(points[1].category, PointCategory::NonTransiting);
        assert_eq!(points[1].color, NONTRANSIT_COLOR);
        assert_eq!((points[1].x, points[1].y), (7.0, 2.0));
    }

    #[test]
    fn teff_method_spans_the_colormap() {
        let cool = planet("cool", 2600.0, 5.0, Some(1.0), 0.8, true);
        let warm = planet("warm", 3800.0, 6.0, Some(1.0), 0.8, false);
        let options = FilterOptions {
            color_method: ColorMethod::Teff,
            ..Default::default()
        };
        let points = to_plot_points(&[&cool, &warm], &options);
        assert_eq!(points[0].color, cividis(0.0));
        assert_eq!(points[1].color, cividis(1.0));
        assert!(points.iter().all(|p| p.category == PointCategory::Planet));
    }

    #[test]
    fn size_scales_with_mass_and_option() {
        let heavy = planet("heavy", 3000.0, 5.0, Some(10.0), 0.8, true);
        let massless = planet("massless", 3000.0, 5.0, None, 0.8, true);
        let options = FilterOptions {
            size_scale: 2.0,
            alpha: 0.3,
            ..Default::default()
        };
        let points = to_plot_points(&[&heavy, &massless], &options);
        assert_eq!(points[0].size, 400.0);
        assert_eq!(points[1].size, 40.0);
        assert!(points.iter().all(|p| p.alpha == 0.3));
    }

    #[test]
    fn unplaceable_records_are_skipped() {
        let mut no_dist = planet("no-dist", 3000.0, 5.0, Some(1.0), 0.8, true);
        no_dist.distance = None;
        let zero_insol = planet("zero", 3000.0, 5.0, Some(1.0), 0.0, true);
        let ok = planet("ok", 3000.0, 5.0, Some(1.0), 0.8, true);
        let points = to_plot_points(&[&no_dist, &zero_insol, &ok], &FilterOptions::default());
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].name, "ok");
    }

    #[test]
    fn target_flag_follows_selected_list() {
        let mut member = planet("member", 3000.0, 5.0, Some(1.0), 0.8, true);
        member.in_hwo = true;
        let hwo = FilterOptions {
            target_list: TargetListKind::Hwo,
            ..Default::default()
        };
        let mirecle = FilterOptions {
            target_list: TargetListKind::Mirecle,
            ..Default::default()
        };
        assert!(to_plot_points(&[&member], &hwo)[0].target);
        assert!(!to_plot_points(&[&member], &mirecle)[0].target);
    }
}
