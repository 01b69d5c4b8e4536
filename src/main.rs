//! Freight Dashboard - Multi-Year Freight Transport Analysis
//!
//! Loads one freight transaction CSV per year and shows KPIs and charts per year.

mod charts;
mod config;
mod data;
mod gui;
mod report;
mod stats;

use anyhow::Context;
use config::DashboardConfig;
use eframe::egui;
use gui::FreightDashboardApp;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let config = DashboardConfig::load().context("loading dashboard configuration")?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        years = ?config.years,
        "starting dashboard"
    );

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Freight Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Freight Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(FreightDashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run dashboard: {e}"))
}
