//! Aggregation Module
//! Headline KPIs and the six per-year freight summaries.

use crate::data::columns;
use crate::data::YearlyDataset;
use polars::prelude::*;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Number of groups shown in the least-used-modes summary.
pub const LEAST_USED_LIMIT: usize = 5;

#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("No data available for {0}")]
    EmptyDataset(i32),
}

/// Headline metrics for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub shipments: usize,
    pub total_weight: f64,
    pub total_value: f64,
}

impl Kpis {
    pub fn compute(df: &DataFrame) -> Result<Self, AggregationError> {
        Ok(Self {
            shipments: df.height(),
            total_weight: column_sum(df, columns::WEIGHT)?,
            total_value: column_sum(df, columns::VALUE)?,
        })
    }
}

/// Shipped weight for one mode in one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeMonthVolume {
    pub month: i64,
    pub month_name: String,
    pub mode: String,
    pub weight: f64,
}

/// A metric summed over one transport mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeTotal {
    pub mode: String,
    pub total: f64,
}

/// Two-dimensional sum table. Absent combinations hold zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PivotTable {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// `values[row][column]`
    pub values: Vec<Vec<f64>>,
}

impl PivotTable {
    #[cfg(test)]
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.rows.iter().position(|name| name == row)?;
        let c = self.columns.iter().position(|name| name == column)?;
        Some(self.values[r][c])
    }

    /// All row values of one column, in row order.
    pub fn column_values(&self, column: usize) -> Vec<f64> {
        self.values.iter().map(|row| row[column]).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }
}

/// Everything the dashboard shows for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub kpis: Kpis,
    pub volume_by_mode_over_time: Vec<ModeMonthVolume>,
    pub volume_by_region_and_mode: PivotTable,
    pub cost_by_mode: Vec<ModeTotal>,
    pub value_by_mode: Vec<ModeTotal>,
    pub least_used_modes: Vec<ModeTotal>,
    pub export_vs_import_by_state: PivotTable,
}

impl YearSummary {
    /// Run every aggregation over a non-empty dataset.
    pub fn compute(dataset: &YearlyDataset) -> Result<Self, AggregationError> {
        if dataset.is_empty() {
            return Err(AggregationError::EmptyDataset(dataset.year));
        }
        let df = dataset.frame.as_ref();

        Ok(Self {
            year: dataset.year,
            kpis: Kpis::compute(df)?,
            volume_by_mode_over_time: Aggregations::volume_by_mode_over_time(df)?,
            volume_by_region_and_mode: Aggregations::volume_by_region_and_mode(df)?,
            cost_by_mode: Aggregations::cost_by_mode(df)?,
            value_by_mode: Aggregations::value_by_mode(df)?,
            least_used_modes: Aggregations::least_used_modes(df)?,
            export_vs_import_by_state: Aggregations::export_vs_import_by_state(df)?,
        })
    }
}

/// Grouping and pivoting over an enriched yearly table.
pub struct Aggregations;

impl Aggregations {
    /// Weight per (month, mode), ascending by month then mode.
    pub fn volume_by_mode_over_time(
        df: &DataFrame,
    ) -> Result<Vec<ModeMonthVolume>, AggregationError> {
        let grouped = grouped_sum(
            df,
            &[columns::MONTH_ORDER, columns::MONTH_NAME, columns::MODE_LABEL],
            columns::WEIGHT,
        )?;

        let months = grouped.column(columns::MONTH_ORDER)?.cast(&DataType::Int64)?;
        let months = months.i64()?;
        let names = string_values(&grouped, columns::MONTH_NAME)?;
        let modes = string_values(&grouped, columns::MODE_LABEL)?;
        let weights = float_values(&grouped, columns::WEIGHT)?;

        let mut volumes: Vec<ModeMonthVolume> = months
            .into_iter()
            .zip(names)
            .zip(modes)
            .zip(weights)
            .filter_map(|(((month, month_name), mode), weight)| {
                Some(ModeMonthVolume {
                    month: month?,
                    month_name: month_name?,
                    mode: mode?,
                    weight,
                })
            })
            .collect();

        volumes.sort_by(|a, b| a.month.cmp(&b.month).then_with(|| a.mode.cmp(&b.mode)));
        Ok(volumes)
    }

    /// Weight pivoted by state × mode.
    pub fn volume_by_region_and_mode(df: &DataFrame) -> Result<PivotTable, AggregationError> {
        pivot_sum(df, columns::STATE, columns::MODE_LABEL, columns::WEIGHT)
    }

    /// Freight charges per mode, largest first.
    pub fn cost_by_mode(df: &DataFrame) -> Result<Vec<ModeTotal>, AggregationError> {
        let mut totals = mode_totals(df, columns::FREIGHT_CHARGES)?;
        sort_descending(&mut totals);
        Ok(totals)
    }

    /// Goods value per mode, largest first.
    pub fn value_by_mode(df: &DataFrame) -> Result<Vec<ModeTotal>, AggregationError> {
        let mut totals = mode_totals(df, columns::VALUE)?;
        sort_descending(&mut totals);
        Ok(totals)
    }

    /// The modes moving the least weight, smallest first.
    pub fn least_used_modes(df: &DataFrame) -> Result<Vec<ModeTotal>, AggregationError> {
        let mut totals = mode_totals(df, columns::WEIGHT)?;
        totals.sort_by(|a, b| a.total.total_cmp(&b.total).then_with(|| a.mode.cmp(&b.mode)));
        totals.truncate(LEAST_USED_LIMIT);
        Ok(totals)
    }

    /// Weight pivoted by state × trade direction.
    pub fn export_vs_import_by_state(df: &DataFrame) -> Result<PivotTable, AggregationError> {
        pivot_sum(df, columns::STATE, columns::TRADE_LABEL, columns::WEIGHT)
    }
}

fn column_sum(df: &DataFrame, name: &str) -> Result<f64, AggregationError> {
    let values = df.column(name)?.cast(&DataType::Float64)?;
    Ok(values.f64()?.sum().unwrap_or(0.0))
}

/// Sum `value` per distinct combination of `keys`. Rows with a null key are
/// left out of the grouping.
fn grouped_sum(df: &DataFrame, keys: &[&str], value: &str) -> PolarsResult<DataFrame> {
    let mut lazy = df.clone().lazy();
    for key in keys {
        lazy = lazy.filter(col(*key).is_not_null());
    }

    lazy.group_by(keys.iter().map(|key| col(*key)).collect::<Vec<_>>())
        .agg([col(value).cast(DataType::Float64).sum()])
        .collect()
}

fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let values = df.column(name)?.cast(&DataType::String)?;
    Ok(values
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<f64>> {
    let values = df.column(name)?.cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().map(|v| v.unwrap_or(0.0)).collect())
}

fn mode_totals(df: &DataFrame, value: &str) -> Result<Vec<ModeTotal>, AggregationError> {
    let grouped = grouped_sum(df, &[columns::MODE_LABEL], value)?;
    let modes = string_values(&grouped, columns::MODE_LABEL)?;
    let totals = float_values(&grouped, value)?;

    Ok(modes
        .into_iter()
        .zip(totals)
        .filter_map(|(mode, total)| Some(ModeTotal { mode: mode?, total }))
        .collect())
}

fn sort_descending(totals: &mut [ModeTotal]) {
    totals.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.mode.cmp(&b.mode)));
}

/// Sum `value` by (`index`, `column`) into a zero-filled table with sorted
/// row and column labels.
fn pivot_sum(
    df: &DataFrame,
    index: &str,
    column: &str,
    value: &str,
) -> Result<PivotTable, AggregationError> {
    let grouped = grouped_sum(df, &[index, column], value)?;
    let index_values = string_values(&grouped, index)?;
    let column_values = string_values(&grouped, column)?;
    let sums = float_values(&grouped, value)?;

    let cells: Vec<(String, String, f64)> = index_values
        .into_iter()
        .zip(column_values)
        .zip(sums)
        .filter_map(|((row, col), sum)| Some((row?, col?, sum)))
        .collect();

    let rows: Vec<String> = cells
        .iter()
        .map(|(row, _, _)| row.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let columns: Vec<String> = cells
        .iter()
        .map(|(_, col, _)| col.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let row_pos: HashMap<&str, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();
    let col_pos: HashMap<&str, usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut values = vec![vec![0.0; columns.len()]; rows.len()];
    for (row, col, sum) in &cells {
        values[row_pos[row.as_str()]][col_pos[col.as_str()]] += sum;
    }

    Ok(PivotTable {
        rows,
        columns,
        values,
    })
}
