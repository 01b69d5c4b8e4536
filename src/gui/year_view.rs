//! Year View Widget
//! Central scrollable panel for one year: KPIs followed by the six chart cards.

use crate::charts::{ChartPlotter, ReportChart};
use crate::data::YearlyDataset;
use crate::stats::{format_thousands, YearSummary};
use egui::{Color32, RichText, ScrollArea};

const CARD_SPACING: f32 = 15.0;
const WARNING_COLOR: Color32 = Color32::from_rgb(243, 156, 18);
const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// What a year tab shows.
#[derive(Debug, Clone)]
pub enum YearContent {
    Summary(Box<YearSummary>),
    /// Empty dataset; aggregations were skipped.
    NoData { load_error: Option<String> },
    /// Data loaded but an aggregation failed.
    Failed(String),
}

/// One year's insights, computed when the tab is shown.
pub struct YearView {
    pub year: i32,
    pub content: YearContent,
}

/// The three KPI strings in display order.
pub fn kpi_labels(summary: &YearSummary) -> [(&'static str, String); 3] {
    [
        (
            "Total Shipments",
            format_thousands(summary.kpis.shipments as f64, 0),
        ),
        (
            "Total Weight (tons)",
            format_thousands(summary.kpis.total_weight, 0),
        ),
        ("Total Value ($)", format_thousands(summary.kpis.total_value, 2)),
    ]
}

impl YearView {
    pub fn build(dataset: &YearlyDataset) -> Self {
        let content = if dataset.is_empty() {
            YearContent::NoData {
                load_error: dataset.load_error.clone(),
            }
        } else {
            match YearSummary::compute(dataset) {
                Ok(summary) => YearContent::Summary(Box::new(summary)),
                Err(e) => {
                    tracing::error!(year = dataset.year, "aggregation failed: {e}");
                    YearContent::Failed(e.to_string())
                }
            }
        };

        Self {
            year: dataset.year,
            content,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.heading(RichText::new(format!("📊 Insights for {}", self.year)).size(22.0));
        ui.add_space(10.0);

        match &self.content {
            YearContent::NoData { load_error } => {
                if let Some(message) = load_error {
                    ui.label(RichText::new(message).color(ERROR_COLOR));
                    ui.add_space(5.0);
                }
                ui.label(
                    RichText::new("⚠ No data available.")
                        .size(16.0)
                        .color(WARNING_COLOR),
                );
            }
            YearContent::Failed(message) => {
                ui.label(RichText::new(format!("Error: {message}")).color(ERROR_COLOR));
            }
            YearContent::Summary(summary) => {
                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        Self::draw_kpis(ui, summary);
                        ui.add_space(CARD_SPACING);
                        for chart in ReportChart::ALL {
                            Self::draw_chart_card(ui, summary, chart);
                            ui.add_space(CARD_SPACING);
                        }
                    });
            }
        }
    }

    fn draw_kpis(ui: &mut egui::Ui, summary: &YearSummary) {
        let kpis = kpi_labels(summary);
        ui.columns(kpis.len(), |columns| {
            for (ui, (label, value)) in columns.iter_mut().zip(kpis.iter()) {
                egui::Frame::none()
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .rounding(8.0)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(RichText::new(*label).size(13.0).color(Color32::GRAY));
                        ui.label(RichText::new(value).size(26.0).strong());
                    });
            }
        });
    }

    fn draw_chart_card(ui: &mut egui::Ui, summary: &YearSummary, chart: ReportChart) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(chart.heading()).size(18.0).strong());
                ui.label(RichText::new(chart.title(summary.year)).size(12.0).color(Color32::GRAY));
                ui.add_space(8.0);

                let id = format!("{}_{:?}", summary.year, chart);
                match chart {
                    ReportChart::VolumeOverTime => ChartPlotter::draw_volume_over_time(
                        ui,
                        &id,
                        &summary.volume_by_mode_over_time,
                    ),
                    ReportChart::RegionByMode => ChartPlotter::draw_stacked_bars(
                        ui,
                        &id,
                        &summary.volume_by_region_and_mode,
                        "Weight (tons)",
                    ),
                    ReportChart::CostByMode => ChartPlotter::draw_mode_bars(
                        ui,
                        &id,
                        &summary.cost_by_mode,
                        "Freight Charges",
                    ),
                    ReportChart::ValueByMode => {
                        ChartPlotter::draw_mode_bars(ui, &id, &summary.value_by_mode, "Value")
                    }
                    ReportChart::LeastUsedModes => {
                        ChartPlotter::draw_least_used(ui, &id, &summary.least_used_modes)
                    }
                    ReportChart::TradeByState => ChartPlotter::draw_stacked_bars(
                        ui,
                        &id,
                        &summary.export_vs_import_by_state,
                        "Weight (tons)",
                    ),
                }
            });
    }
}
