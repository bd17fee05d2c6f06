use eframe::egui::{self, Align2, RichText, Sense, Ui};
use egui_plot::{GridMark, HLine, Legend, LineStyle, Plot, PlotPoint as PlotCoord, Points, Text};

use crate::color::{cividis, LINE_COLOR, REFERENCE_COLOR};
use crate::figure::{Colorbar, Figure, MarkerStyle};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Insolation plot (central panel)
// ---------------------------------------------------------------------------

/// Screen radius of a marker whose area is `size`.
fn marker_radius(size: f64) -> f32 {
    (size.max(1.0).sqrt() / 2.0) as f32
}

/// Tick labels on the log-insolation axis: only whole decades are labelled.
fn decade_label(mark: GridMark) -> String {
    let decade = mark.value.round();
    if (mark.value - decade).abs() > 1e-6 {
        return String::new();
    }
    format!("{}", 10f64.powf(decade))
}

/// Planet shown in the hover label: the nearest point in axis-normalised
/// coordinates, if the pointer is close enough to it.
struct HoverTarget {
    x: f64,
    log_y: f64,
    text: String,
}

fn hover_targets(figure: &Figure) -> Vec<HoverTarget> {
    figure
        .series
        .iter()
        .filter(|s| s.style == MarkerStyle::Filled)
        .flat_map(|s| &s.points)
        .map(|p| {
            let mut text = format!("{}\n{:.2} pc, {:.3} S⊕", p.name, p.x, p.y);
            if let Some(t) = p.teff {
                text.push_str(&format!("\nTeff {t:.0} K"));
            }
            if let Some(m) = p.mass {
                text.push_str(&format!("\n{m:.2} M⊕"));
            }
            if let Some(per) = p.period {
                text.push_str(&format!("\nP = {per:.2} d"));
            }
            if let Some(eq) = p.eq_temp {
                text.push_str(&format!("\nTeq {eq:.0} K"));
            }
            HoverTarget {
                x: p.x,
                log_y: p.y.log10(),
                text,
            }
        })
        .collect()
}

/// Render the figure in the central panel.
pub fn insolation_plot(ui: &mut Ui, state: &AppState) {
    if state.catalog.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a catalog to plot planets  (File → Open…)");
        });
        return;
    }

    let figure = &state.figure;
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(&figure.title);
    });
    if let Some(bar) = &figure.colorbar {
        colorbar_strip(ui, bar);
    }

    let targets = hover_targets(figure);
    let x_span = (figure.x_axis.max - figure.x_axis.min).max(f64::EPSILON);
    let y_lo = figure.y_axis.min.log10();
    let y_hi = figure.y_axis.max.log10();
    let y_span = (y_hi - y_lo).max(f64::EPSILON);

    Plot::new("insolation_plot")
        .legend(Legend::default())
        .x_axis_label(figure.x_axis.label.clone())
        .y_axis_label(figure.y_axis.label.clone())
        .y_axis_formatter(|mark, _range| decade_label(mark))
        .include_x(figure.x_axis.min)
        .include_x(figure.x_axis.max)
        .include_y(y_lo)
        .include_y(y_hi)
        .label_formatter(move |_name, value: &PlotCoord| {
            let nearest = targets.iter().min_by(|a, b| {
                let da = ((a.x - value.x) / x_span).powi(2) + ((a.log_y - value.y) / y_span).powi(2);
                let db = ((b.x - value.x) / x_span).powi(2) + ((b.log_y - value.y) / y_span).powi(2);
                da.total_cmp(&db)
            });
            match nearest {
                Some(t)
                    if ((t.x - value.x) / x_span).abs() < 0.02
                        && ((t.log_y - value.y) / y_span).abs() < 0.02 =>
                {
                    t.text.clone()
                }
                _ => format!("{:.2} pc\n{:.3} S⊕", value.x, 10f64.powf(value.y)),
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            // ---- Solar-system reference lines ----
            for line in &figure.reference_lines {
                let y = line.y.log10();
                plot_ui.hline(
                    HLine::new(y)
                        .color(REFERENCE_COLOR.to_color32(0.8))
                        .style(LineStyle::dashed_loose()),
                );
                plot_ui.text(
                    Text::new(
                        PlotCoord::new(figure.x_axis.min, y),
                        RichText::new(&line.label).color(REFERENCE_COLOR.to_color32(1.0)),
                    )
                    .anchor(Align2::LEFT_BOTTOM),
                );
            }

            // ---- Planets, one item per marker so sizes can differ ----
            for series in &figure.series {
                let name = if series.show_in_legend {
                    series.name.as_str()
                } else {
                    ""
                };
                let filled = series.style == MarkerStyle::Filled;
                for p in &series.points {
                    plot_ui.points(
                        Points::new(vec![[p.x, p.y.log10()]])
                            .name(name)
                            .color(p.color.to_color32(p.alpha))
                            .radius(marker_radius(p.size))
                            .filled(filled),
                    );
                }
            }

            // ---- Mass key ----
            for key in &figure.mass_key {
                let y = key.y.log10();
                plot_ui.points(
                    Points::new(vec![[key.x, y]])
                        .color(LINE_COLOR.to_color32(figure.mass_key_alpha))
                        .radius(marker_radius(key.size)),
                );
                plot_ui.text(
                    Text::new(PlotCoord::new(key.x, y), format!("{}   ", key.label))
                        .anchor(Align2::RIGHT_CENTER),
                );
            }
        });

    ui.label(RichText::new(&figure.credit).small().weak());
}

/// A horizontal cividis strip with the scale endpoints.
fn colorbar_strip(ui: &mut Ui, bar: &Colorbar) {
    const STEPS: usize = 64;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("{}  {:.0}", bar.title, bar.scale.min));
        let (rect, _) = ui.allocate_exact_size(egui::vec2(200.0, 12.0), Sense::hover());
        let step = rect.width() / STEPS as f32;
        for i in 0..STEPS {
            let t = i as f64 / (STEPS - 1) as f64;
            let cell = egui::Rect::from_min_size(
                rect.min + egui::vec2(i as f32 * step, 0.0),
                egui::vec2(step + 0.5, rect.height()),
            );
            ui.painter()
                .rect_filled(cell, 0.0, cividis(t).to_color32(1.0));
        }
        ui.label(format!("{:.0}", bar.scale.max));
    });
}
