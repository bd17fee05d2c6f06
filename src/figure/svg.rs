use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{Figure, MarkerStyle};
use crate::color::{cividis, Rgb, LINE_COLOR, REFERENCE_COLOR};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Static SVG output via plotters
// ---------------------------------------------------------------------------

/// Default canvas size in pixels.
pub const CANVAS: (u32, u32) = (1380, 780);

const COLORBAR_WIDTH: i32 = 130;
const FONT: &str = "serif";

impl From<Rgb> for RGBColor {
    fn from(c: Rgb) -> Self {
        RGBColor(c.r, c.g, c.b)
    }
}

/// Radius in pixels of a marker with the given area.
pub fn marker_radius(area: f64) -> i32 {
    area.max(0.0).sqrt().round().max(1.0) as i32
}

/// Write the figure to an SVG file.
pub fn write_svg(figure: &Figure, path: &Path, size: (u32, u32)) -> Result<()> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    draw(figure, &root).map_err(|e| Error::Render(e.to_string()))?;
    root.present().map_err(|e| Error::Render(e.to_string()))?;
    Ok(())
}

/// Render the figure to an in-memory SVG document.
pub fn to_svg_string(figure: &Figure, size: (u32, u32)) -> Result<String> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
        draw(figure, &root).map_err(|e| Error::Render(e.to_string()))?;
        root.present().map_err(|e| Error::Render(e.to_string()))?;
    }
    Ok(buf)
}

type DrawResult<DB> = std::result::Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Draw the figure on any plotters backend.
pub fn draw<DB: DrawingBackend>(figure: &Figure, root: &DrawingArea<DB, Shift>) -> DrawResult<DB> {
    root.fill(&WHITE)?;
    let (width, height) = root.dim_in_pixel();

    // The right strip stays empty unless there is a colorbar to draw.
    let plot_width = match &figure.colorbar {
        Some(_) => (width as i32 - COLORBAR_WIDTH).max(1),
        None => width as i32,
    };
    let (plot_area, bar_area) = root.split_horizontally(plot_width);

    let (x0, x1) = (figure.x_axis.min, figure.x_axis.max);
    let (y0, y1) = (figure.y_axis.min, figure.y_axis.max);

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(&figure.title, (FONT, 26).into_font().style(FontStyle::Bold))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(x0..x1, (y0..y1).log_scale())?;

    chart
        .configure_mesh()
        .x_desc(figure.x_axis.label.as_str())
        .y_desc(figure.y_axis.label.as_str())
        .axis_desc_style((FONT, 20))
        .label_style((FONT, 16))
        .draw()?;

    // Solar-system reference lines sit underneath the planets.
    let reference: RGBColor = REFERENCE_COLOR.into();
    for line in &figure.reference_lines {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x0, line.y), (x1, line.y)],
            reference.stroke_width(1),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            line.label.clone(),
            (x0 + 0.01 * (x1 - x0), line.y * 0.8),
            (FONT, 16).into_font().color(&reference),
        )))?;
    }

    for series in &figure.series {
        let drawn = chart.draw_series(series.points.iter().map(|p| {
            let color = RGBColor::from(p.color).mix(p.alpha);
            let style = match series.style {
                MarkerStyle::Filled => color.filled(),
                MarkerStyle::Open => color.stroke_width(2),
            };
            Circle::new((p.x, p.y), marker_radius(p.size), style)
        }))?;
        if series.show_in_legend {
            let swatch: RGBColor = series.color.into();
            let style = series.style;
            drawn.label(series.name.as_str()).legend(move |(x, y)| {
                let s = match style {
                    MarkerStyle::Filled => swatch.filled(),
                    MarkerStyle::Open => swatch.stroke_width(2),
                };
                Circle::new((x, y), 6, s)
            });
        }
    }

    // Mass key: reference marker sizes near the right edge.
    let key_color = RGBColor::from(LINE_COLOR).mix(figure.mass_key_alpha);
    for marker in &figure.mass_key {
        chart.draw_series(std::iter::once(Circle::new(
            (marker.x, marker.y),
            marker_radius(marker.size),
            key_color.filled(),
        )))?;
    }
    if let Some(heaviest) = figure.mass_key.last() {
        chart.draw_series(std::iter::once(Text::new(
            "Mass Key",
            (heaviest.x - 0.04 * (x1 - x0), heaviest.y * 1.6),
            (FONT, 18).into_font(),
        )))?;
    }
    for marker in &figure.mass_key {
        chart.draw_series(std::iter::once(Text::new(
            marker.label.clone(),
            (marker.x - 0.16 * (x1 - x0), marker.y),
            (FONT, 14).into_font(),
        )))?;
    }

    if figure.series.iter().any(|s| s.show_in_legend) {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(&WHITE.mix(0.7))
            .border_style(&BLACK)
            .label_font((FONT, 18))
            .draw()?;
    }

    if let Some(bar) = &figure.colorbar {
        draw_colorbar(&bar_area, &bar.title, bar.scale.min, bar.scale.max)?;
    }

    root.draw(&Text::new(
        figure.credit.as_str(),
        (12, height as i32 - 22),
        (FONT, 14).into_font(),
    ))?;
    Ok(())
}

/// Vertical cividis gradient with min / max labels.
fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    min: f64,
    max: f64,
) -> DrawResult<DB> {
    const STEPS: i32 = 100;
    let (_, height) = area.dim_in_pixel();
    let top = 90;
    let bottom = height as i32 - 110;
    let step = ((bottom - top) / STEPS).max(1);

    area.draw(&Text::new(title, (10, top - 40), (FONT, 18).into_font()))?;
    for i in 0..STEPS {
        let t = 1.0 - i as f64 / (STEPS - 1) as f64;
        let color: RGBColor = cividis(t).into();
        let y = top + i * step;
        area.draw(&Rectangle::new([(20, y), (50, y + step)], color.filled()))?;
    }
    let end = top + STEPS * step;
    area.draw(&Text::new(format!("{max:.0}"), (58, top), (FONT, 16).into_font()))?;
    area.draw(&Text::new(format!("{min:.0}"), (58, end - 16), (FONT, 16).into_font()))?;
    Ok(())
}
