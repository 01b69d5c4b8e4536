//! Chart Plotter Module
//! Draws the yearly freight summaries as interactive egui_plot charts.

use crate::data::{month_tick_label, tick_position};
use crate::stats::{format_compact, ModeMonthVolume, ModeTotal, PivotTable};
use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};
use std::collections::BTreeMap;

pub const CHART_HEIGHT: f32 = 320.0;

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

/// Label for an integer tick position, blank between categories.
pub fn category_label(labels: &[String], value: f64) -> String {
    tick_position(value)
        .and_then(|idx| usize::try_from(idx).ok())
        .and_then(|idx| labels.get(idx).cloned())
        .unwrap_or_default()
}

/// Creates the dashboard's interactive charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// One line per transport mode, months on the x-axis.
    pub fn draw_volume_over_time(ui: &mut egui::Ui, id: &str, volumes: &[ModeMonthVolume]) {
        let mut by_mode: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
        for v in volumes {
            by_mode
                .entry(v.mode.as_str())
                .or_default()
                .push([v.month as f64, v.weight]);
        }

        Plot::new(id)
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Month")
            .y_axis_label("Weight (tons)")
            .include_x(1.0)
            .include_x(12.0)
            .include_y(0.0)
            .x_axis_formatter(|mark, _range| month_tick_label(mark.value))
            .show(ui, |plot_ui| {
                for (i, (mode, points)) in by_mode.into_iter().enumerate() {
                    let color = Self::color(i);
                    plot_ui.line(
                        Line::new(PlotPoints::from(points.clone()))
                            .color(color)
                            .width(2.0)
                            .name(mode),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from(points))
                            .radius(3.5)
                            .color(color)
                            .name(mode),
                    );
                }
            });
    }

    /// One bar per mode, each in its own color.
    pub fn draw_mode_bars(ui: &mut egui::Ui, id: &str, totals: &[ModeTotal], y_label: &str) {
        let labels: Vec<String> = totals.iter().map(|t| t.mode.clone()).collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Mode")
            .y_axis_label(y_label)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                for (i, total) in totals.iter().enumerate() {
                    let bar = Bar::new(i as f64, total.total)
                        .name(format!("{}: {}", total.mode, format_compact(total.total)))
                        .width(0.7);
                    plot_ui.bar_chart(
                        BarChart::new(vec![bar])
                            .color(Self::color(i))
                            .name(&total.mode),
                    );
                }
            });
    }

    /// Horizontal bars, smallest volume at the bottom.
    pub fn draw_least_used(ui: &mut egui::Ui, id: &str, totals: &[ModeTotal]) {
        let labels: Vec<String> = totals.iter().map(|t| t.mode.clone()).collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Volume")
            .include_x(0.0)
            .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                for (i, total) in totals.iter().enumerate() {
                    let bar = Bar::new(i as f64, total.total)
                        .name(format!("{}: {}", total.mode, format_compact(total.total)))
                        .width(0.6);
                    plot_ui.bar_chart(
                        BarChart::new(vec![bar])
                            .horizontal()
                            .color(Self::color(i))
                            .name(&total.mode),
                    );
                }
            });
    }

    /// Rows along the x-axis, one stacked segment per column.
    pub fn draw_stacked_bars(ui: &mut egui::Ui, id: &str, table: &PivotTable, y_label: &str) {
        let labels = table.rows.clone();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("State")
            .y_axis_label(y_label)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                let mut stacked: Vec<BarChart> = Vec::with_capacity(table.columns.len());

                for (c, column) in table.columns.iter().enumerate() {
                    let bars: Vec<Bar> = table
                        .column_values(c)
                        .into_iter()
                        .enumerate()
                        .map(|(r, value)| {
                            Bar::new(r as f64, value)
                                .name(format!("{} / {}", table.rows[r], column))
                                .width(0.7)
                        })
                        .collect();

                    let below: Vec<&BarChart> = stacked.iter().collect();
                    let chart = BarChart::new(bars)
                        .color(Self::color(c))
                        .name(column)
                        .stack_on(&below);
                    stacked.push(chart);
                }

                for chart in stacked {
                    plot_ui.bar_chart(chart);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_integer_ticks() {
        let labels = vec!["Air".to_string(), "Rail".to_string()];
        assert_eq!(category_label(&labels, 0.0), "Air");
        assert_eq!(category_label(&labels, 1.0000000001), "Rail");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(ChartPlotter::color(0), ChartPlotter::color(PALETTE.len()));
    }
}
