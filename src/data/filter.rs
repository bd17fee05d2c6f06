use serde::Serialize;

use super::model::{PlanetRecord, TargetListKind};
use crate::color::ColorMethod;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Filter options: numeric upper bounds plus presentation settings
// ---------------------------------------------------------------------------

/// Marker scale used when none is given.
pub const DEFAULT_SIZE_SCALE: f64 = 1.0;
/// Marker opacity used when none is given.
pub const DEFAULT_ALPHA: f64 = 0.5;

/// Everything a single invocation needs to go from catalog to figure.
///
/// Each `max_*` bound is inclusive; `None` means "no constraint".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Host star effective temperature (K). Default: unset.
    pub max_teff: Option<f64>,
    /// Distance from the Sun (pc). Default: unset.
    pub max_dist: Option<f64>,
    /// Orbital period (days). Default: unset.
    pub max_period: Option<f64>,
    /// Planet mass (Earth masses). Default: unset.
    pub max_mass: Option<f64>,
    /// Insolation (Earth units). Default: unset.
    pub max_insol: Option<f64>,
    /// Target list overlay. Default: none.
    pub target_list: TargetListKind,
    /// Marker size multiplier. Default: 1.0.
    pub size_scale: f64,
    /// Marker opacity in [0, 1]. Default: 0.5.
    pub alpha: f64,
    /// How markers are coloured. Default: by transit flag.
    pub color_method: ColorMethod,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            max_teff: None,
            max_dist: None,
            max_period: None,
            max_mass: None,
            max_insol: None,
            target_list: TargetListKind::None,
            size_scale: DEFAULT_SIZE_SCALE,
            alpha: DEFAULT_ALPHA,
            color_method: ColorMethod::default(),
        }
    }
}

/// The five numeric upper bounds, in flag order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    Teff,
    Dist,
    Period,
    Mass,
    Insol,
}

impl Bound {
    pub const ALL: [Bound; 5] = [Bound::Teff, Bound::Dist, Bound::Period, Bound::Mass, Bound::Insol];

    /// Human-readable label with unit.
    pub fn label(self) -> &'static str {
        match self {
            Bound::Teff => "Max Teff (K)",
            Bound::Dist => "Max distance (pc)",
            Bound::Period => "Max period (days)",
            Bound::Mass => "Max mass (M⊕)",
            Bound::Insol => "Max insolation (S⊕)",
        }
    }

    /// The record attribute this bound constrains.
    pub fn value_of(self, record: &PlanetRecord) -> Option<f64> {
        match self {
            Bound::Teff => record.teff,
            Bound::Dist => record.distance,
            Bound::Period => record.period,
            Bound::Mass => record.mass,
            Bound::Insol => record.insolation,
        }
    }
}

impl FilterOptions {
    pub fn bound(&self, bound: Bound) -> Option<f64> {
        match bound {
            Bound::Teff => self.max_teff,
            Bound::Dist => self.max_dist,
            Bound::Period => self.max_period,
            Bound::Mass => self.max_mass,
            Bound::Insol => self.max_insol,
        }
    }

    pub fn set_bound(&mut self, bound: Bound, value: Option<f64>) {
        let slot = match bound {
            Bound::Teff => &mut self.max_teff,
            Bound::Dist => &mut self.max_dist,
            Bound::Period => &mut self.max_period,
            Bound::Mass => &mut self.max_mass,
            Bound::Insol => &mut self.max_insol,
        };
        *slot = value;
    }

    /// Reject options the command line would refuse: an opacity outside
    /// [0, 1], a marker scale that is not a positive number, or a NaN bound.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(Error::InvalidOption(format!(
                "alpha must be between 0 and 1, got {}",
                self.alpha
            )));
        }
        if !(self.size_scale.is_finite() && self.size_scale > 0.0) {
            return Err(Error::InvalidOption(format!(
                "size must be a positive number, got {}",
                self.size_scale
            )));
        }
        for bound in Bound::ALL {
            if self.bound(bound).is_some_and(f64::is_nan) {
                return Err(Error::InvalidOption(format!("{} is not a number", bound.label())));
            }
        }
        Ok(())
    }

    /// Whether no numeric bound is active.
    pub fn is_unbounded(&self) -> bool {
        Bound::ALL.iter().all(|b| self.bound(*b).is_none())
    }

    /// Whether `record` satisfies every active bound.
    pub fn accepts(&self, record: &PlanetRecord) -> bool {
        Bound::ALL
            .iter()
            .all(|b| within(b.value_of(record), self.bound(*b)))
    }
}

/// A value passes an upper bound when the bound is unset, or when the value
/// is present, finite, and not above it. Missing data fails an active bound.
fn within(value: Option<f64>, bound: Option<f64>) -> bool {
    match bound {
        None => true,
        Some(max) => value.is_some_and(|v| v.is_finite() && v <= max),
    }
}

/// Return the records that pass all active bounds, in dataset order.
///
/// The target list does not narrow this set: members are highlighted as an
/// overlay, and only if they survive the same bounds.
pub fn filter<'a>(records: &'a [PlanetRecord], options: &FilterOptions) -> Vec<&'a PlanetRecord> {
    let kept: Vec<&PlanetRecord> = records.iter().filter(|r| options.accepts(r)).collect();
    log::debug!("filter kept {} of {} records", kept.len(), records.len());
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(teff: f64, dist: f64, period: f64, mass: f64, insol: f64, transit: bool) -> PlanetRecord {
        PlanetRecord {
            name: format!("planet-{teff}-{dist}"),
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
    fn max_teff_keeps_only_cool_host() {
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
    fn unbounded_options_keep_everything_in_order() {
        let records = vec![
            record(5000.0, 50.0, 400.0, 10.0, 5.0, false),
            record(3000.0, 5.0, 10.0, 1.0, 0.8, true),
            PlanetRecord::default(),
        ];
        let options = FilterOptions::default();
        assert!(options.is_unbounded());
        let kept = filter(&records, &options);
        assert_eq!(kept.len(), 3);
        assert!(kept.iter().zip(&records).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn bounds_are_inclusive() {
        let records = vec![record(4000.0, 20.0, 25.0, 20.0, 100.0, true)];
        let options = FilterOptions {
            max_teff: Some(4000.0),
            max_dist: Some(20.0),
            max_period: Some(25.0),
            max_mass: Some(20.0),
            max_insol: Some(100.0),
            ..Default::default()
        };
        assert_eq!(filter(&records, &options).len(), 1);
    }

    #[test]
    fn missing_value_fails_active_bound_only() {
        let mut no_mass = record(3000.0, 5.0, 10.0, 1.0, 0.8, true);
        no_mass.mass = None;
        let records = vec![no_mass];

        let by_mass = FilterOptions {
            max_mass: Some(100.0),
            ..Default::default()
        };
        assert!(filter(&records, &by_mass).is_empty());

        let by_dist = FilterOptions {
            max_dist: Some(100.0),
            ..Default::default()
        };
        assert_eq!(filter(&records, &by_dist).len(), 1);
    }

    #[test]
    fn nan_value_fails_active_bound() {
        let mut rec = record(3000.0, 5.0, 10.0, 1.0, 0.8, true);
        rec.period = Some(f64::NAN);
        let options = FilterOptions {
            max_period: Some(1e9),
            ..Default::default()
        };
        assert!(filter(&[rec], &options).is_empty());
    }

    #[test]
    fn set_bound_round_trips_each_slot() {
        let mut options = FilterOptions::default();
        for (i, b) in Bound::ALL.iter().enumerate() {
            options.set_bound(*b, Some(i as f64));
        }
        assert_eq!(options.max_teff, Some(0.0));
        assert_eq!(options.max_insol, Some(4.0));
        assert!(!options.is_unbounded());
        options.set_bound(Bound::Mass, None);
        assert_eq!(options.bound(Bound::Mass), None);
    }

    #[test]
    fn default_options_are_valid() {
        assert!(FilterOptions::default().validate().is_ok());
        let edges = FilterOptions {
            alpha: 0.0,
            size_scale: 1e-3,
            max_dist: Some(f64::INFINITY),
            ..Default::default()
        };
        assert!(edges.validate().is_ok());
    }

    #[test]
    fn alpha_outside_unit_interval_is_rejected() {
        for alpha in [5.0, -0.1, f64::NAN] {
            let options = FilterOptions {
                alpha,
                ..Default::default()
            };
            assert!(matches!(options.validate(), Err(Error::InvalidOption(_))), "alpha {alpha}");
        }
    }

    #[test]
    fn non_positive_size_is_rejected() {
        for size_scale in [-2.0, 0.0, f64::NAN, f64::INFINITY] {
            let options = FilterOptions {
                size_scale,
                ..Default::default()
            };
            assert!(matches!(options.validate(), Err(Error::InvalidOption(_))), "size {size_scale}");
        }
    }

    #[test]
    fn nan_bound_is_rejected() {
        for bound in Bound::ALL {
            let mut options = FilterOptions::default();
            options.set_bound(bound, Some(f64::NAN));
            let err = options.validate().unwrap_err();
            assert!(err.to_string().contains(bound.label()));
        }
    }

    #[test]
    fn target_list_does_not_narrow_the_filtered_set() {
        let mut member = record(3000.0, 5.0, 10.0, 1.0, 0.8, true);
        member.in_mirecle = true;
        let other = record(3200.0, 6.0, 12.0, 2.0, 1.1, false);
        let records = vec![member, other];
        let options = FilterOptions {
            target_list: TargetListKind::Mirecle,
            ..Default::default()
        };
        assert_eq!(filter(&records, &options).len(), 2);
    }
}
