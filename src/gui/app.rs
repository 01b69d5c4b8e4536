//! Freight Dashboard Main Application
//! Main window with year tabs, control panel and the selected year's insights.

use crate::config::DashboardConfig;
use crate::data::DatasetCache;
use crate::gui::{ControlPanel, ControlPanelAction, YearView};
use crate::report::{ExportOutcome, ReportExporter};
use crate::stats::YearSummary;
use egui::{RichText, SidePanel, TopBottomPanel};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// Report export result from background thread
enum ExportResult {
    Progress(f32, String),
    Complete(ExportOutcome),
    Error(String),
}

/// Main application window.
pub struct FreightDashboardApp {
    config: DashboardConfig,
    cache: DatasetCache,
    control_panel: ControlPanel,
    selected_year: i32,
    view: Option<YearView>,

    // Async report export
    export_rx: Option<Receiver<ExportResult>>,
    is_exporting: bool,
}

impl FreightDashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let control_panel = ControlPanel::new(
            config.data_dir.display().to_string(),
            config.file_pattern.clone(),
        );
        let selected_year = config.years.first().copied().unwrap_or_default();

        Self {
            cache: DatasetCache::from_config(config.clone()),
            config,
            control_panel,
            selected_year,
            view: None,
            export_rx: None,
            is_exporting: false,
        }
    }

    fn select_year(&mut self, year: i32) {
        if year != self.selected_year {
            self.selected_year = year;
            self.view = None;
        }
    }

    /// Build the selected year's view, loading through the cache on first visit.
    fn ensure_view(&mut self) {
        if self.view.as_ref().is_some_and(|v| v.year == self.selected_year) {
            return;
        }

        let dataset = self.cache.get_or_load(self.selected_year);
        self.view = Some(YearView::build(dataset));
        self.control_panel.cached_years = self.cache.len();
    }

    /// Drop cached datasets so every year is read from disk again.
    fn handle_reload(&mut self) {
        let status = if self.cache.is_empty() {
            "Nothing cached yet"
        } else {
            "Cache cleared"
        };
        self.cache.clear();
        self.view = None;
        self.control_panel.cached_years = 0;
        self.control_panel.set_progress(0.0, status);
    }

    /// Summaries of every configured year that has data.
    fn collect_summaries(&mut self) -> Vec<YearSummary> {
        let mut summaries = Vec::new();
        for &year in &self.config.years {
            let dataset = self.cache.get_or_load(year);
            if dataset.is_empty() {
                continue;
            }
            match YearSummary::compute(dataset) {
                Ok(summary) => summaries.push(summary),
                Err(e) => tracing::warn!(year, "skipping year in report: {e}"),
            }
        }
        self.control_panel.cached_years = self.cache.len();
        summaries
    }

    /// Handle report export - charts are rendered on a background thread
    fn handle_export_report(&mut self) {
        if self.is_exporting {
            return;
        }

        let Some(dir) = rfd::FileDialog::new()
            .set_title("Choose report folder")
            .pick_folder()
        else {
            return; // User cancelled
        };

        self.control_panel.set_progress(5.0, "Aggregating years...");
        let summaries = self.collect_summaries();
        if summaries.is_empty() {
            self.control_panel.set_progress(0.0, "No data to export");
            return;
        }

        let (tx, rx) = channel();
        self.export_rx = Some(rx);
        self.is_exporting = true;

        thread::spawn(move || {
            Self::run_export(dir, summaries, tx);
        });
    }

    /// Run export (called from background thread)
    fn run_export(
        dir: PathBuf,
        summaries: Vec<YearSummary>,
        tx: std::sync::mpsc::Sender<ExportResult>,
    ) {
        let progress_tx = tx.clone();
        let result = ReportExporter::export(&dir, &summaries, move |pct, status| {
            let _ = progress_tx.send(ExportResult::Progress(pct, status));
        });

        match result {
            Ok(outcome) => {
                if let Err(e) = open::that(&outcome.dir) {
                    tracing::warn!("could not open {}: {e}", outcome.dir.display());
                }
                let _ = tx.send(ExportResult::Complete(outcome));
            }
            Err(e) => {
                tracing::error!("report export failed: {e}");
                let _ = tx.send(ExportResult::Error(e.to_string()));
            }
        }
    }

    /// Check for export results
    fn check_export_results(&mut self) {
        // Take the receiver temporarily to avoid borrow issues
        let rx = self.export_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    ExportResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    ExportResult::Complete(outcome) => {
                        self.control_panel.set_progress(
                            100.0,
                            &format!(
                                "Complete! {} charts for {} years",
                                outcome.charts, outcome.years
                            ),
                        );
                        self.is_exporting = false;
                        should_keep_receiver = false;
                    }
                    ExportResult::Error(error) => {
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.is_exporting = false;
                        should_keep_receiver = false;
                    }
                }
            }

            // Put receiver back if still needed
            if should_keep_receiver {
                self.export_rx = Some(rx);
            }
        }
    }
}

impl eframe::App for FreightDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_export_results();

        // Request repaint while exporting
        if self.is_exporting {
            ctx.request_repaint();
        }
        self.control_panel.export_enabled = !self.is_exporting;

        // Header - title and year tabs
        TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.label(RichText::new("📦 Freight Transport Analysis Dashboard").size(24.0).strong());
            ui.label(format!(
                "Multi-Year Freight Insights ({})",
                self.config.year_span()
            ));
            ui.add_space(6.0);

            let mut clicked = None;
            ui.horizontal(|ui| {
                for &year in &self.config.years {
                    // Years already in the cache are drawn bold.
                    let mut text = RichText::new(year.to_string()).size(16.0);
                    if self.cache.contains(year) {
                        text = text.strong();
                    }
                    let tab = ui.selectable_label(self.selected_year == year, text);
                    if tab.clicked() {
                        clicked = Some(year);
                    }
                }
            });
            if let Some(year) = clicked {
                self.select_year(year);
            }
            ui.add_space(4.0);
        });

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::ReloadData => self.handle_reload(),
                        ControlPanelAction::ExportReport => self.handle_export_report(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - selected year
        self.ensure_view();
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(view) = &self.view {
                view.show(ui);
            }
        });
    }
}
