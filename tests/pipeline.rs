//! End-to-end tests: catalog file → filter → plot points → figure → output.

use std::io::Write;

use proptest::prelude::*;

use nearby_exoplanets::color::ColorMethod;
use nearby_exoplanets::data::filter::{filter, Bound, FilterOptions};
use nearby_exoplanets::data::model::{PlanetCatalog, PlanetRecord, TargetListKind};
use nearby_exoplanets::figure::points::to_plot_points;
use nearby_exoplanets::figure::{output, MarkerStyle};
use nearby_exoplanets::{attach_target_list, load_catalog, make_figure, Error};

const CATALOG_CSV: &str = "\
# nearby planets, test copy
pl_name,hostname,hip_name,st_teff,sy_dist,pl_orbper,pl_bmasse,pl_insol,tran_flag
Cool b,Cool,HIP 1,3000,5,10,1,0.8,1
Hot b,Hot,HIP 2,5000,50,400,10,5,0
Faint b,Faint,,3300,12,30,,0.2,0
";

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::File::create(&path)
        .unwrap()
        .write_all(contents.as_bytes())
        .unwrap();
    path
}

fn record(teff: f64, dist: f64, period: f64, mass: f64, insol: f64, transit: bool) -> PlanetRecord {
    PlanetRecord {
        name: format!("p-{teff}-{dist}"),
        teff: Some(teff),
        distance: Some(dist),
        period: Some(period),
        mass: Some(mass),
        insolation: Some(insol),
        transiting: transit,
        ..Default::default()
    }
}

#[test]
fn cool_star_bound_keeps_first_record_only() {
    let records = vec![
        record(3000.0, 5.0, 10.0, 1.0, 0.8, true),
        record(5000.0, 50.0, 400.0, 10.0, 5.0, false),
    ];
    let options = FilterOptions {
        max_teff: Some(4000.0),
        ..Default::default()
    };
    let kept = filter(&records, &options);
    assert_eq!(kept, vec![&records[0]]);
}

#[test]
fn empty_catalog_still_renders() {
    let catalog = PlanetCatalog::default();
    let fig = make_figure(&catalog, &FilterOptions::default()).unwrap();
    assert!(fig.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let svg = dir.path().join("empty.svg");
    output::save(&fig, &svg).unwrap();
    assert!(std::fs::read_to_string(&svg).unwrap().contains("<svg"));
}

#[test]
fn csv_to_svg_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let data = write(&dir, "planets.csv", CATALOG_CSV);
    let catalog = load_catalog(&data).unwrap();
    assert_eq!(catalog.len(), 3);

    let options = FilterOptions {
        max_teff: Some(4000.0),
        max_dist: Some(20.0),
        ..Default::default()
    };
    let fig = make_figure(&catalog, &options).unwrap();
    assert_eq!(fig.planet_count(), 2);
    assert_eq!(fig.title, "Known Planets Around Stars Cooler Than 4000 K Within 20 pc");

    let out = dir.path().join("plot.svg");
    output::save(&fig, &out).unwrap();
    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.contains("Mercury"));
    assert!(svg.contains("Transiting"));
}

#[test]
fn out_of_range_presentation_options_are_rejected() {
    let catalog = PlanetCatalog::from_records(vec![record(3000.0, 5.0, 10.0, 1.0, 0.8, true)]);
    let loud = FilterOptions {
        alpha: 5.0,
        ..Default::default()
    };
    let shrunk = FilterOptions {
        size_scale: -2.0,
        ..Default::default()
    };
    let unbounded_nan = FilterOptions {
        max_insol: Some(f64::NAN),
        ..Default::default()
    };
    for options in [loud, shrunk, unbounded_nan] {
        let err = make_figure(&catalog, &options).unwrap_err();
        assert!(matches!(err, Error::InvalidOption(_)), "{options:?}");
    }
}

#[test]
fn stamped_download_is_credited_on_the_figure() {
    let dir = tempfile::tempdir().unwrap();
    let stamped = CATALOG_CSV.replacen("nearby planets, test copy", "2024/05/01 12:00", 1);
    let data = write(&dir, "planets.csv", &stamped);
    let catalog = load_catalog(&data).unwrap();
    let fig = make_figure(&catalog, &FilterOptions::default()).unwrap();
    assert_eq!(fig.credit, "NASA Exoplanet Archive 2024/05/01 12:00");
}

#[test]
fn missing_dataset_is_a_load_error() {
    let err = load_catalog(std::path::Path::new("/nonexistent/nearby.csv")).unwrap_err();
    assert!(matches!(err, Error::DataLoad { .. }));
}

#[test]
fn unsupported_output_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let fig = make_figure(&PlanetCatalog::default(), &FilterOptions::default()).unwrap();
    let err = output::save(&fig, &dir.path().join("plot.gif")).unwrap_err();
    assert!(matches!(err, Error::UnsupportedOutput(_)));
}

/// Target-list members are highlighted only among planets that already pass
/// the numeric bounds; the list never adds or removes planets.
#[test]
fn target_list_members_are_subject_to_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let data = write(&dir, "planets.csv", CATALOG_CSV);
    let list = write(&dir, "mirecle.csv", "name\nCool b\nHot b\n");

    let mut catalog = load_catalog(&data).unwrap();
    assert_eq!(attach_target_list(&mut catalog, TargetListKind::Mirecle, &list), 2);

    let options = FilterOptions {
        max_teff: Some(4000.0),
        target_list: TargetListKind::Mirecle,
        ..Default::default()
    };
    let fig = make_figure(&catalog, &options).unwrap();
    assert_eq!(fig.planet_count(), 2);

    let rings = fig
        .series
        .iter()
        .find(|s| s.style == MarkerStyle::Open)
        .unwrap();
    let names: Vec<&str> = rings.points.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Cool b"]);
}

#[test]
fn hwo_list_matches_hosts_by_hip_id() {
    let dir = tempfile::tempdir().unwrap();
    let data = write(&dir, "planets.csv", CATALOG_CSV);
    let list = write(&dir, "hwo.csv", "ID(HIP),ID(HD),Common Name\nHIP 2,,\n,,Faint\n");

    let mut catalog = load_catalog(&data).unwrap();
    assert_eq!(attach_target_list(&mut catalog, TargetListKind::Hwo, &list), 2);
    assert_eq!(catalog.member_count(TargetListKind::Hwo), 2);
    assert_eq!(catalog.member_count(TargetListKind::Mirecle), 0);
}

#[test]
fn missing_target_list_file_is_not_fatal() {
    let mut catalog = PlanetCatalog::from_records(vec![record(3000.0, 5.0, 10.0, 1.0, 0.8, true)]);
    let marked = attach_target_list(
        &mut catalog,
        TargetListKind::Mirecle,
        std::path::Path::new("/nonexistent/mirecle.csv"),
    );
    assert_eq!(marked, 0);
    assert_eq!(catalog.len(), 1);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn maybe(value: impl Strategy<Value = f64>) -> impl Strategy<Value = Option<f64>> {
    prop_oneof![1 => Just(None), 4 => value.prop_map(Some)]
}

prop_compose! {
    fn arb_record()(
        teff in maybe(2000.0..7000.0f64),
        distance in maybe(0.0..100.0f64),
        period in maybe(0.1..5000.0f64),
        mass in maybe(0.01..5000.0f64),
        insolation in maybe(0.0..1000.0f64),
        transiting in any::<bool>(),
        in_mirecle in any::<bool>(),
        idx in 0u32..10_000,
    ) -> PlanetRecord {
        PlanetRecord {
            name: format!("planet {idx}"),
            teff,
            distance,
            period,
            mass,
            insolation,
            transiting,
            in_mirecle,
            ..Default::default()
        }
    }
}

prop_compose! {
    fn arb_options()(
        max_teff in maybe(2000.0..7000.0f64),
        max_dist in maybe(0.0..100.0f64),
        max_period in maybe(0.1..5000.0f64),
        max_mass in maybe(0.01..5000.0f64),
        max_insol in maybe(0.0..1000.0f64),
        mirecle in any::<bool>(),
        teff_colors in any::<bool>(),
    ) -> FilterOptions {
        FilterOptions {
            max_teff,
            max_dist,
            max_period,
            max_mass,
            max_insol,
            target_list: if mirecle { TargetListKind::Mirecle } else { TargetListKind::None },
            color_method: if teff_colors { ColorMethod::Teff } else { ColorMethod::Transit },
            ..Default::default()
        }
    }
}

proptest! {
    #[test]
    fn survivors_respect_every_active_bound(
        records in prop::collection::vec(arb_record(), 0..60),
        options in arb_options(),
    ) {
        for rec in filter(&records, &options) {
            for bound in Bound::ALL {
                if let Some(max) = options.bound(bound) {
                    let v = bound.value_of(rec);
                    prop_assert!(v.is_some_and(|v| v <= max), "{:?} = {:?} above {}", bound, v, max);
                }
            }
        }
    }

    #[test]
    fn filtering_is_idempotent(
        records in prop::collection::vec(arb_record(), 0..60),
        options in arb_options(),
    ) {
        let once: Vec<PlanetRecord> = filter(&records, &options).into_iter().cloned().collect();
        let twice: Vec<PlanetRecord> = filter(&once, &options).into_iter().cloned().collect();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn unbounded_filter_is_identity(
        records in prop::collection::vec(arb_record(), 0..60),
        mirecle in any::<bool>(),
    ) {
        let options = FilterOptions {
            target_list: if mirecle { TargetListKind::Mirecle } else { TargetListKind::None },
            ..Default::default()
        };
        let kept: Vec<PlanetRecord> = filter(&records, &options).into_iter().cloned().collect();
        prop_assert_eq!(kept, records);
    }

    #[test]
    fn plot_points_are_deterministic(
        records in prop::collection::vec(arb_record(), 0..60),
        options in arb_options(),
    ) {
        let kept = filter(&records, &options);
        prop_assert_eq!(to_plot_points(&kept, &options), to_plot_points(&kept, &options));
    }

    #[test]
    fn every_plotted_point_is_on_the_log_axis(
        records in prop::collection::vec(arb_record(), 0..60),
        options in arb_options(),
    ) {
        let fig = make_figure(&PlanetCatalog::from_records(records), &options).unwrap();
        prop_assert!(fig.y_axis.min > 0.0);
        for series in &fig.series {
            for p in &series.points {
                prop_assert!(p.y > 0.0 && p.y.is_finite());
                prop_assert!(p.y >= fig.y_axis.min && p.y <= fig.y_axis.max);
            }
        }
    }
}
