use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoint,
    PlotPoints, Points, Polygon, Text,
};

use crate::chart::spec::{
    BeforeAfter, CategoryCounts, ChartSpec, Contingency, CorrelationHeatmap, NumericPanel,
    NumericView, PieChart,
};
use crate::color::{coolwarm, generate_palette, ColorMap};
use crate::state::AppState;
use crate::stats::summary::{BoxSummary, Histogram};

const CHART_HEIGHT: f32 = 420.0;
const PANEL_HEIGHT: f32 = 320.0;
const BEFORE_COLOR: Color32 = Color32::from_rgb(135, 206, 235); // skyblue
const AFTER_COLOR: Color32 = Color32::from_rgb(250, 128, 114); // salmon
/// Radial offset of every pie wedge.
const PIE_EXPLODE: f64 = 0.05;

// ---------------------------------------------------------------------------
// Chart area (central panel)
// ---------------------------------------------------------------------------

/// Draw the current chart, if any.
pub fn chart_view(ui: &mut Ui, state: &AppState) {
    let Some(chart) = &state.chart else {
        if state.dataset.is_some() {
            ui.label("Pick a plot type and press \"Generate plot\".");
        }
        return;
    };

    ui.heading(chart.title());
    match chart {
        ChartSpec::CategoryBars(bars) => category_bars(ui, bars),
        ChartSpec::Pie(pie) => pie_chart(ui, pie),
        ChartSpec::BeforeAfter(panels) => before_after(ui, panels),
        ChartSpec::Heatmap(heat) => heatmap(ui, heat),
        ChartSpec::GroupedBars(table) => grouped_bars(ui, table),
    }
}

/// Axis formatter that prints category labels at integer positions.
fn label_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Categorical charts
// ---------------------------------------------------------------------------

fn category_bars(ui: &mut Ui, spec: &CategoryCounts) {
    let palette = generate_palette(spec.categories.len());
    let bars: Vec<Bar> = spec
        .counts
        .iter()
        .zip(&spec.categories)
        .zip(palette)
        .enumerate()
        .map(|(i, ((&count, label), color))| {
            Bar::new(i as f64, count as f64)
                .width(0.8)
                .name(label)
                .fill(color)
        })
        .collect();

    Plot::new("category_bars")
        .height(CHART_HEIGHT)
        .x_axis_label(spec.column.as_str())
        .y_axis_label("count")
        .x_axis_formatter(label_axis(spec.categories.clone()))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(&spec.column));
        });
}

fn pie_chart(ui: &mut Ui, spec: &PieChart) {
    let colors = ColorMap::new(&spec.labels);

    Plot::new("pie_chart")
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for (label, share) in spec.labels.iter().zip(&spec.shares) {
                let sweep = share * TAU;
                let mid = start + sweep / 2.0;
                let center = [PIE_EXPLODE * mid.cos(), PIE_EXPLODE * mid.sin()];
                let color = colors.color_for(label);

                for wedge in wedge_polygons(center, 1.0, start, sweep) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(wedge))
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, color))
                            .name(label),
                    );
                }

                let anchor = PlotPoint::new(center[0] + 0.65 * mid.cos(), center[1] + 0.65 * mid.sin());
                plot_ui.text(Text::new(anchor, format!("{:.1}%", share * 100.0)));
                let outside = PlotPoint::new(center[0] + 1.2 * mid.cos(), center[1] + 1.2 * mid.sin());
                plot_ui.text(Text::new(outside, label.as_str()));

                start += sweep;
            }
        });
}

/// Split a wedge into pieces of at most a quarter turn so every polygon is
/// convex.
fn wedge_polygons(center: [f64; 2], radius: f64, start: f64, sweep: f64) -> Vec<Vec<[f64; 2]>> {
    const STEP: f64 = TAU / 120.0;
    let pieces = (sweep / (TAU / 4.0)).ceil().max(1.0) as usize;
    let piece_sweep = sweep / pieces as f64;

    (0..pieces)
        .map(|p| {
            let from = start + piece_sweep * p as f64;
            let segments = (piece_sweep / STEP).ceil().max(1.0) as usize;
            let mut points = vec![center];
            for s in 0..=segments {
                let angle = from + piece_sweep * s as f64 / segments as f64;
                points.push([
                    center[0] + radius * angle.cos(),
                    center[1] + radius * angle.sin(),
                ]);
            }
            points
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Before / after numeric panels
// ---------------------------------------------------------------------------

fn before_after(ui: &mut Ui, spec: &BeforeAfter) {
    let b = &spec.bounds;
    ui.label(format!(
        "Q1 {:.3}  ·  median {:.3}  ·  Q3 {:.3}  ·  fences [{:.3}, {:.3}]",
        b.q1, b.median, b.q3, b.lower, b.upper
    ));
    ui.columns(2, |columns| {
        numeric_panel(&mut columns[0], "before", &spec.before, BEFORE_COLOR);
        numeric_panel(&mut columns[1], "after", &spec.after, AFTER_COLOR);
    });
}

fn numeric_panel(ui: &mut Ui, id: &str, panel: &NumericPanel, color: Color32) {
    ui.label(RichText::new(&panel.title).strong());
    let plot = Plot::new(("numeric_panel", id))
        .height(PANEL_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false);

    match &panel.view {
        NumericView::Histogram(hist) => {
            ui.label(format!("n = {}", hist.total()));
            plot.y_axis_label("count").show(ui, |plot_ui| {
                plot_ui.bar_chart(histogram_bars(hist, color));
            });
        }
        NumericView::Density { histogram, kde } => {
            ui.label(format!("n = {}", histogram.total()));
            let curve: PlotPoints = kde.iter().copied().collect();
            plot.y_axis_label("count").show(ui, |plot_ui| {
                plot_ui.bar_chart(histogram_bars(histogram, color.gamma_multiply(0.6)));
                plot_ui.line(Line::new(curve).color(color).width(2.0));
            });
        }
        NumericView::Spread(summary) => {
            plot.show_x(false).show(ui, |plot_ui| {
                plot_ui.box_plot(box_plot(summary, color));
                if !summary.fliers.is_empty() {
                    let fliers: PlotPoints = summary.fliers.iter().map(|&v| [0.0, v]).collect();
                    plot_ui.points(Points::new(fliers).radius(3.0).color(Color32::DARK_GRAY));
                }
            });
        }
    }
}

fn histogram_bars(hist: &Histogram, color: Color32) -> BarChart {
    let width = hist.bin_width();
    let bars = hist
        .centers()
        .into_iter()
        .zip(&hist.counts)
        .map(|(center, &count)| {
            Bar::new(center, count as f64)
                .width(width)
                .fill(color)
                .stroke(Stroke::new(1.0, Color32::BLACK))
        })
        .collect();
    BarChart::new(bars)
}

fn box_plot(summary: &BoxSummary, color: Color32) -> BoxPlot {
    let spread = BoxSpread::new(
        summary.lower_whisker,
        summary.q1,
        summary.median,
        summary.q3,
        summary.upper_whisker,
    );
    BoxPlot::new(vec![BoxElem::new(0.0, spread)
        .box_width(0.5)
        .whisker_width(0.3)
        .fill(color)
        .stroke(Stroke::new(1.5, Color32::BLACK))])
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

fn heatmap(ui: &mut Ui, spec: &CorrelationHeatmap) {
    let n = spec.columns.len();
    // first column at the top, like a printed matrix
    let mut y_labels = spec.columns.clone();
    y_labels.reverse();

    Plot::new("correlation_heatmap")
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_grid(false)
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(label_axis(spec.columns.clone()))
        .y_axis_formatter(label_axis(y_labels))
        .show(ui, |plot_ui| {
            for (i, row) in spec.values.iter().enumerate() {
                let y = (n - 1 - i) as f64;
                for (j, &value) in row.iter().enumerate() {
                    let x = j as f64;
                    let fill = value.map(coolwarm).unwrap_or(Color32::LIGHT_GRAY);
                    let square = vec![
                        [x - 0.5, y - 0.5],
                        [x + 0.5, y - 0.5],
                        [x + 0.5, y + 0.5],
                        [x - 0.5, y + 0.5],
                    ];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(square))
                            .fill_color(fill)
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                    let annotation = match value {
                        Some(v) => format!("{v:.2}"),
                        None => "n/a".to_string(),
                    };
                    plot_ui.text(
                        Text::new(PlotPoint::new(x, y), annotation).color(Color32::BLACK),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Contingency table as grouped bars
// ---------------------------------------------------------------------------

fn grouped_bars(ui: &mut Ui, spec: &Contingency) {
    ui.label(format!(
        "{} by {} ({} complete rows)",
        spec.row_column,
        spec.column_column,
        spec.total()
    ));
    let groups = spec.column_labels.len().max(1);
    let width = 0.8 / groups as f64;
    let colors = ColorMap::new(&spec.column_labels);

    let charts: Vec<BarChart> = spec
        .column_labels
        .iter()
        .enumerate()
        .map(|(j, label)| {
            let offset = (j as f64 - (groups as f64 - 1.0) / 2.0) * width;
            let color = colors.color_for(label);
            let bars = spec
                .counts
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    Bar::new(i as f64 + offset, row[j] as f64)
                        .width(width)
                        .fill(color)
                })
                .collect();
            BarChart::new(bars).name(label).color(color)
        })
        .collect();

    Plot::new("grouped_bars")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(spec.row_column.as_str())
        .y_axis_label("count")
        .x_axis_formatter(label_axis(spec.row_labels.clone()))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wedges_are_split_into_quarter_turns() {
        let full = wedge_polygons([0.0, 0.0], 1.0, 0.0, TAU);
        assert_eq!(full.len(), 4);
        for wedge in &full {
            assert_eq!(wedge[0], [0.0, 0.0]);
            assert!(wedge.len() >= 3);
        }
        let sliver = wedge_polygons([0.0, 0.0], 1.0, 0.0, 0.01);
        assert_eq!(sliver.len(), 1);
    }

    #[test]
    fn label_axis_only_labels_integer_ticks() {
        let fmt = label_axis(vec!["a".into(), "b".into()]);
        let range = 0.0..=1.0;
        assert_eq!(fmt(GridMark { value: 1.0, step_size: 1.0 }, &range), "b");
        assert_eq!(fmt(GridMark { value: 0.5, step_size: 0.5 }, &range), "");
        assert_eq!(fmt(GridMark { value: 5.0, step_size: 1.0 }, &range), "");
    }
}
