//! Report Export Module
//! Writes every loaded year's charts as PNG plus a JSON summary of the tables.
//!
//! Layout:
//! ```text
//! <dir>/summary.json
//! <dir>/<year>/1_volume_by_mode_over_time.png
//! ...
//! <dir>/<year>/6_export_vs_import_by_state.png
//! ```

use crate::charts::{RenderError, ReportChart, StaticChartRenderer};
use crate::stats::YearSummary;
use rayon::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SUMMARY_FILE: &str = "summary.json";

const CHART_WIDTH: u32 = 1400;
const CHART_HEIGHT: u32 = 800;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Render error for {year} {chart:?}: {source}")]
    Render {
        year: i32,
        chart: ReportChart,
        source: RenderError,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No years with data to export")]
    NothingToExport,
}

#[derive(Serialize)]
struct ReportSummary<'a> {
    title: &'a str,
    years: &'a [YearSummary],
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
    pub dir: PathBuf,
    pub years: usize,
    pub charts: usize,
}

pub struct ReportExporter;

impl ReportExporter {
    /// Render and write all charts, then the JSON summary. `progress` receives
    /// a percentage and a status line after each year.
    pub fn export(
        dir: &Path,
        summaries: &[YearSummary],
        mut progress: impl FnMut(f32, String),
    ) -> Result<ExportOutcome, ReportError> {
        if summaries.is_empty() {
            return Err(ReportError::NothingToExport);
        }
        fs::create_dir_all(dir)?;

        let mut charts = 0;
        for (idx, summary) in summaries.iter().enumerate() {
            let year_dir = dir.join(summary.year.to_string());
            fs::create_dir_all(&year_dir)?;

            let rendered: Vec<(ReportChart, Vec<u8>)> = ReportChart::ALL
                .par_iter()
                .map(|&chart| {
                    StaticChartRenderer::render_png(summary, chart, CHART_WIDTH, CHART_HEIGHT)
                        .map(|png| (chart, png))
                        .map_err(|source| ReportError::Render {
                            year: summary.year,
                            chart,
                            source,
                        })
                })
                .collect::<Result<_, _>>()?;

            for (chart, png) in rendered {
                fs::write(year_dir.join(chart.file_name()), png)?;
                charts += 1;
            }

            let pct = (idx + 1) as f32 / summaries.len() as f32 * 90.0;
            progress(pct, format!("Rendered {} ({}/{})", summary.year, idx + 1, summaries.len()));
            tracing::info!(year = summary.year, dir = %year_dir.display(), "rendered charts");
        }

        Self::write_summary(dir, summaries)?;
        progress(100.0, format!("Report written to {}", dir.display()));

        Ok(ExportOutcome {
            dir: dir.to_path_buf(),
            years: summaries.len(),
            charts,
        })
    }

    /// Write KPIs and aggregation tables for every year to `summary.json`.
    pub fn write_summary(dir: &Path, summaries: &[YearSummary]) -> Result<PathBuf, ReportError> {
        let path = dir.join(SUMMARY_FILE);
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(
            writer,
            &ReportSummary {
                title: "Freight Transport Analysis",
                years: summaries,
            },
        )?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::labels::enrich;
    use crate::data::YearlyDataset;
    use crate::stats::PivotTable;
    use polars::prelude::*;
    use std::sync::Arc;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn two_truck_summary(year: i32) -> YearSummary {
        let raw = df! {
            "DISAGMOT" => [5i64, 5],
            "TRDTYPE" => [1i64, 2],
            "MONTH" => [1i64, 1],
            "USASTATE" => ["CA", "CA"],
            "SHIPWT" => [100.0, 50.0],
            "FREIGHT_CHARGES" => [10.0, 5.0],
            "VALUE" => [1000.0, 500.0],
        }
        .unwrap();
        let dataset = YearlyDataset {
            year,
            frame: Arc::new(enrich(&raw, year).unwrap()),
            load_error: None,
        };
        YearSummary::compute(&dataset).unwrap()
    }

    fn assert_charts_written(year_dir: &Path) {
        for chart in ReportChart::ALL {
            let bytes = fs::read(year_dir.join(chart.file_name())).unwrap();
            assert!(
                bytes.starts_with(&PNG_MAGIC),
                "{} is not a png",
                chart.file_name()
            );
        }
    }

    #[test]
    fn nothing_to_export_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReportExporter::export(dir.path(), &[], |_, _| {}).unwrap_err();
        assert!(matches!(err, ReportError::NothingToExport));
    }

    #[test]
    fn export_writes_six_charts_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let mut steps = Vec::new();

        let outcome =
            ReportExporter::export(dir.path(), &[two_truck_summary(2020)], |pct, _| {
                steps.push(pct)
            })
            .unwrap();

        assert_eq!(outcome.charts, 6);
        assert_eq!(outcome.years, 1);
        assert_eq!(outcome.dir, dir.path());
        assert_charts_written(&dir.path().join("2020"));
        assert!(dir.path().join(SUMMARY_FILE).is_file());
        assert_eq!(steps, vec![90.0, 100.0]);
    }

    #[test]
    fn empty_tables_still_render() {
        let mut bare = two_truck_summary(2021);
        bare.volume_by_mode_over_time.clear();
        bare.volume_by_region_and_mode = PivotTable::default();
        bare.cost_by_mode.clear();
        bare.value_by_mode.clear();
        bare.least_used_modes.clear();
        bare.export_vs_import_by_state = PivotTable::default();

        let dir = tempfile::tempdir().unwrap();
        let outcome =
            ReportExporter::export(dir.path(), &[two_truck_summary(2020), bare], |_, _| {})
                .unwrap();

        assert_eq!(outcome.charts, 12);
        assert_charts_written(&dir.path().join("2020"));
        assert_charts_written(&dir.path().join("2021"));
    }

    #[test]
    fn summary_json_holds_every_year() {
        let dir = tempfile::tempdir().unwrap();
        let path = ReportExporter::write_summary(
            dir.path(),
            &[two_truck_summary(2020), two_truck_summary(2021)],
        )
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        let years = json["years"].as_array().unwrap();
        assert_eq!(years.len(), 2);
        assert_eq!(years[0]["year"], 2020);
        assert_eq!(years[0]["kpis"]["shipments"], 2);
        assert_eq!(years[1]["cost_by_mode"][0]["mode"], "Truck");
        assert_eq!(years[1]["export_vs_import_by_state"]["columns"][1], "Import");
        assert_eq!(years[1]["export_vs_import_by_state"]["values"][0][1], 100.0);
    }
}
