//! Stats module - yearly aggregations and number formatting

mod aggregations;
mod format;

pub use aggregations::{ModeMonthVolume, ModeTotal, PivotTable, YearSummary};
pub use format::{format_compact, format_thousands};
