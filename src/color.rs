use eframe::egui::Color32;
use palette::{IntoColor, LinSrgb, Mix, Srgb};
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Rgb – backend-neutral colour carried by plot points
// ---------------------------------------------------------------------------

/// An opaque 8-bit sRGB colour. Opacity is carried separately on each point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// `#rrggbb` form, used by the JSON figure document.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Egui colour with the given opacity in [0, 1].
    pub fn to_color32(self, alpha: f64) -> Color32 {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color32::from_rgba_unmultiplied(self.r, self.g, self.b, a)
    }

    fn to_linear(self) -> LinSrgb {
        Srgb::new(self.r, self.g, self.b)
            .into_format::<f32>()
            .into_linear()
    }

    fn from_linear(lin: LinSrgb) -> Self {
        let srgb: Srgb = lin.into_color();
        let srgb = srgb.into_format::<u8>();
        Rgb::new(srgb.red, srgb.green, srgb.blue)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

// ---------------------------------------------------------------------------
// Fixed colours
// ---------------------------------------------------------------------------

pub const TRANSIT_COLOR: Rgb = Rgb::new(0x94, 0x67, 0xbd);
pub const NONTRANSIT_COLOR: Rgb = Rgb::new(0x1f, 0x77, 0xb4);
/// Marker outlines, target-list rings and the mass key.
pub const LINE_COLOR: Rgb = Rgb::new(0x2f, 0x2f, 0x2f);
/// Dashed solar-system reference lines.
pub const REFERENCE_COLOR: Rgb = Rgb::new(0xc9, 0x64, 0x3b);
/// Teff colouring of a planet whose host has no temperature.
pub const MISSING_COLOR: Rgb = Rgb::new(0x99, 0x99, 0x99);

// ---------------------------------------------------------------------------
// Colour method
// ---------------------------------------------------------------------------

/// How markers are coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMethod {
    /// Two categories: transiting and non-transiting planets.
    #[default]
    Transit,
    /// Continuous colormap on host star effective temperature.
    Teff,
}

// ---------------------------------------------------------------------------
// Continuous colormap
// ---------------------------------------------------------------------------

/// Cividis anchor colours, evenly spaced over [0, 1].
const CIVIDIS: [Rgb; 5] = [
    Rgb::new(0x00, 0x22, 0x4e),
    Rgb::new(0x41, 0x4d, 0x6b),
    Rgb::new(0x7c, 0x7b, 0x78),
    Rgb::new(0xbc, 0xaf, 0x6f),
    Rgb::new(0xfe, 0xe8, 0x38),
];

/// Sample the cividis colormap at `t` (clamped to [0, 1]), interpolating in
/// linear RGB between anchors.
pub fn cividis(t: f64) -> Rgb {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let segments = (CIVIDIS.len() - 1) as f64;
    let pos = t * segments;
    let i = (pos.floor() as usize).min(CIVIDIS.len() - 2);
    let frac = (pos - i as f64) as f32;
    let a = CIVIDIS[i].to_linear();
    let b = CIVIDIS[i + 1].to_linear();
    Rgb::from_linear(a.mix(b, frac))
}

/// Linear normalisation of a value onto a [min, max] range for colormap
/// lookup. A degenerate range maps to the middle of the colormap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    /// Scale spanning the finite values in `values`, if any.
    pub fn spanning(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<ColorScale>, v| match acc {
                None => Some(ColorScale { min: v, max: v }),
                Some(s) => Some(ColorScale {
                    min: s.min.min(v),
                    max: s.max.max(v),
                }),
            })
    }

    pub fn normalize(&self, v: f64) -> f64 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            0.5
        } else {
            (v - self.min) / range
        }
    }

    pub fn color_for(&self, v: f64) -> Rgb {
        cividis(self.normalize(v))
    }
}
