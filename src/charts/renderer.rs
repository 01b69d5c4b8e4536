//! Static Chart Renderer
//! Renders the six yearly charts to PNG with plotters for report export.
//!
//! Every chart is drawn into an in-memory RGB buffer and encoded with `image`,
//! so nothing touches disk until the exporter writes the bytes.

use super::plotter::PALETTE;
use crate::data::month_tick_label;
use crate::stats::{format_compact, ModeMonthVolume, ModeTotal, PivotTable, YearSummary};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::io::Cursor;
use thiserror::Error;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 28);
const VALUE_FONT: (&str, u32) = ("sans-serif", 15);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing error: {0}")]
    Draw(String),
    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Bitmap buffer does not match {0}x{1}")]
    Buffer(u32, u32),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// The charts shown for every year, in dashboard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportChart {
    VolumeOverTime,
    RegionByMode,
    CostByMode,
    ValueByMode,
    LeastUsedModes,
    TradeByState,
}

impl ReportChart {
    pub const ALL: [ReportChart; 6] = [
        ReportChart::VolumeOverTime,
        ReportChart::RegionByMode,
        ReportChart::CostByMode,
        ReportChart::ValueByMode,
        ReportChart::LeastUsedModes,
        ReportChart::TradeByState,
    ];

    pub fn heading(self) -> &'static str {
        match self {
            ReportChart::VolumeOverTime => "1. Freight Volume by Mode Over Time",
            ReportChart::RegionByMode => "2. Freight Volume by Region and Mode",
            ReportChart::CostByMode => "3. Operational Costs by Mode",
            ReportChart::ValueByMode => "4. Value of Goods by Mode",
            ReportChart::LeastUsedModes => "5. Least Used Transport Modes",
            ReportChart::TradeByState => "6. Export vs Import by State",
        }
    }

    pub fn title(self, year: i32) -> String {
        match self {
            ReportChart::VolumeOverTime => format!("Freight Volume by Mode Over Time - {year}"),
            ReportChart::RegionByMode => format!("Freight Volume by State and Mode - {year}"),
            ReportChart::CostByMode => format!("Total Freight Charges by Mode - {year}"),
            ReportChart::ValueByMode => format!("Total Value of Freight by Mode - {year}"),
            ReportChart::LeastUsedModes => {
                format!("Least Used Transport Modes by Volume - {year}")
            }
            ReportChart::TradeByState => format!("Export vs Import Volumes by State - {year}"),
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ReportChart::VolumeOverTime => "1_volume_by_mode_over_time.png",
            ReportChart::RegionByMode => "2_volume_by_region_and_mode.png",
            ReportChart::CostByMode => "3_cost_by_mode.png",
            ReportChart::ValueByMode => "4_value_by_mode.png",
            ReportChart::LeastUsedModes => "5_least_used_modes.png",
            ReportChart::TradeByState => "6_export_vs_import_by_state.png",
        }
    }
}

fn palette_color(index: usize) -> RGBColor {
    let c = PALETTE[index % PALETTE.len()];
    RGBColor(c.r(), c.g(), c.b())
}

/// Upper bound of a value axis with headroom for bar labels.
fn axis_max(max: f64) -> f64 {
    if max > 0.0 && max.is_finite() {
        max * 1.1
    } else {
        1.0
    }
}

fn segment_label(labels: &[String], value: &SegmentValue<i32>) -> String {
    match value {
        SegmentValue::CenterOf(i) if *i >= 0 => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

fn draw_empty(root: &Area<'_>, title: &str) -> Result<(), RenderError> {
    let area = root.titled(title, CAPTION_FONT).map_err(draw_err)?;
    let (w, h) = area.dim_in_pixel();
    area.draw(&Text::new(
        "No data",
        (w as i32 / 2 - 40, h as i32 / 2),
        ("sans-serif", 22),
    ))
    .map_err(draw_err)?;
    Ok(())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render one chart of a year's summary as PNG bytes.
    pub fn render_png(
        summary: &YearSummary,
        chart: ReportChart,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![255u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let title = chart.title(summary.year);
            match chart {
                ReportChart::VolumeOverTime => {
                    Self::draw_lines(&root, &title, &summary.volume_by_mode_over_time)?
                }
                ReportChart::RegionByMode => Self::draw_stacked(
                    &root,
                    &title,
                    &summary.volume_by_region_and_mode,
                    "Weight (tons)",
                )?,
                ReportChart::CostByMode => {
                    Self::draw_bars(&root, &title, &summary.cost_by_mode, "Freight Charges")?
                }
                ReportChart::ValueByMode => {
                    Self::draw_bars(&root, &title, &summary.value_by_mode, "Value")?
                }
                ReportChart::LeastUsedModes => {
                    Self::draw_horizontal_bars(&root, &title, &summary.least_used_modes)?
                }
                ReportChart::TradeByState => Self::draw_stacked(
                    &root,
                    &title,
                    &summary.export_vs_import_by_state,
                    "Weight (tons)",
                )?,
            }

            root.present().map_err(draw_err)?;
        }

        let img = image::RgbImage::from_raw(width, height, buffer)
            .ok_or(RenderError::Buffer(width, height))?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }

    fn draw_lines(
        root: &Area<'_>,
        title: &str,
        volumes: &[ModeMonthVolume],
    ) -> Result<(), RenderError> {
        if volumes.is_empty() {
            return draw_empty(root, title);
        }
        let mut by_mode: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
        for v in volumes {
            by_mode
                .entry(v.mode.as_str())
                .or_default()
                .push((v.month as f64, v.weight));
        }
        let max = volumes.iter().map(|v| v.weight).fold(0.0, f64::max);

        let mut chart = ChartBuilder::on(root)
            .caption(title, CAPTION_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d(0.5f64..12.5f64, 0f64..axis_max(max))
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Month")
            .y_desc("Weight (tons)")
            .x_labels(12)
            .x_label_formatter(&|x| month_tick_label(*x))
            .y_label_formatter(&|y| format_compact(*y))
            .draw()
            .map_err(draw_err)?;

        for (i, (mode, points)) in by_mode.into_iter().enumerate() {
            let color = palette_color(i);
            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
                .map_err(draw_err)?
                .label(mode)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            chart
                .draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))
                .map_err(draw_err)?;
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_bars(
        root: &Area<'_>,
        title: &str,
        totals: &[ModeTotal],
        y_desc: &str,
    ) -> Result<(), RenderError> {
        if totals.is_empty() {
            return draw_empty(root, title);
        }
        let labels: Vec<String> = totals.iter().map(|t| t.mode.clone()).collect();
        let max = totals.iter().map(|t| t.total).fold(0.0, f64::max);

        let mut chart = ChartBuilder::on(root)
            .caption(title, CAPTION_FONT)
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(90)
            .build_cartesian_2d((0..totals.len() as i32).into_segmented(), 0f64..axis_max(max))
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Mode")
            .y_desc(y_desc)
            .x_labels(totals.len().max(1))
            .x_label_formatter(&|v| segment_label(&labels, v))
            .y_label_formatter(&|y| format_compact(*y))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(totals.iter().enumerate().map(|(i, t)| {
                let i = i as i32;
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), t.total)],
                    palette_color(i as usize).filled(),
                );
                bar.set_margin(0, 0, 12, 12);
                bar
            }))
            .map_err(draw_err)?;

        chart
            .draw_series(totals.iter().enumerate().map(|(i, t)| {
                Text::new(
                    format_compact(t.total),
                    (SegmentValue::CenterOf(i as i32), t.total),
                    VALUE_FONT,
                )
            }))
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_horizontal_bars(
        root: &Area<'_>,
        title: &str,
        totals: &[ModeTotal],
    ) -> Result<(), RenderError> {
        if totals.is_empty() {
            return draw_empty(root, title);
        }
        let labels: Vec<String> = totals.iter().map(|t| t.mode.clone()).collect();
        let max = totals.iter().map(|t| t.total).fold(0.0, f64::max);

        let mut chart = ChartBuilder::on(root)
            .caption(title, CAPTION_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(220)
            .build_cartesian_2d(0f64..axis_max(max), (0..totals.len() as i32).into_segmented())
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc("Volume")
            .y_labels(totals.len().max(1))
            .y_label_formatter(&|v| segment_label(&labels, v))
            .x_label_formatter(&|x| format_compact(*x))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(totals.iter().enumerate().map(|(i, t)| {
                let i = i as i32;
                let mut bar = Rectangle::new(
                    [(0.0, SegmentValue::Exact(i)), (t.total, SegmentValue::Exact(i + 1))],
                    palette_color(i as usize).filled(),
                );
                bar.set_margin(8, 8, 0, 0);
                bar
            }))
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_stacked(
        root: &Area<'_>,
        title: &str,
        table: &PivotTable,
        y_desc: &str,
    ) -> Result<(), RenderError> {
        if table.is_empty() {
            return draw_empty(root, title);
        }
        let row_totals: Vec<f64> = table.values.iter().map(|row| row.iter().sum()).collect();
        let max = row_totals.iter().copied().fold(0.0, f64::max);
        let rows = table.rows.len() as i32;

        let mut chart = ChartBuilder::on(root)
            .caption(title, CAPTION_FONT)
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(90)
            .build_cartesian_2d((0..rows).into_segmented(), 0f64..axis_max(max))
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("State")
            .y_desc(y_desc)
            .x_labels(table.rows.len().max(1))
            .x_label_style(
                ("sans-serif", 12)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_label_formatter(&|v| segment_label(&table.rows, v))
            .y_label_formatter(&|y| format_compact(*y))
            .draw()
            .map_err(draw_err)?;

        let mut base = vec![0.0; table.rows.len()];
        for (c, column) in table.columns.iter().enumerate() {
            let color = palette_color(c);
            let segments: Vec<Rectangle<(SegmentValue<i32>, f64)>> = table
                .column_values(c)
                .into_iter()
                .enumerate()
                .map(|(r, value)| {
                    let bottom = base[r];
                    base[r] += value;
                    let mut bar = Rectangle::new(
                        [
                            (SegmentValue::Exact(r as i32), bottom),
                            (SegmentValue::Exact(r as i32 + 1), bottom + value),
                        ],
                        color.filled(),
                    );
                    bar.set_margin(0, 0, 2, 2);
                    bar
                })
                .collect();

            chart
                .draw_series(segments)
                .map_err(draw_err)?
                .label(column)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(draw_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_files_are_distinct() {
        let mut names: Vec<&str> = ReportChart::ALL.iter().map(|c| c.file_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ReportChart::ALL.len());
        assert!(names.iter().all(|n| n.ends_with(".png")));
    }

    #[test]
    fn titles_carry_the_year() {
        for chart in ReportChart::ALL {
            assert!(chart.title(2023).ends_with("2023"));
        }
    }

    #[test]
    fn axis_keeps_headroom() {
        assert_eq!(axis_max(0.0), 1.0);
        assert!(axis_max(100.0) > 100.0);
        assert_eq!(axis_max(f64::NAN), 1.0);
    }

    #[test]
    fn segment_labels_use_centers() {
        let labels = vec!["CA".to_string(), "TX".to_string()];
        assert_eq!(segment_label(&labels, &SegmentValue::CenterOf(1)), "TX");
        assert_eq!(segment_label(&labels, &SegmentValue::Exact(1)), "");
        assert_eq!(segment_label(&labels, &SegmentValue::Last), "");
    }
}
