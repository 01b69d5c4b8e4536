//! Data module - yearly CSV loading, label enrichment and caching

mod cache;
pub(crate) mod labels;
mod loader;

pub use cache::{DatasetCache, YearlyDataset};
pub use labels::{month_tick_label, tick_position};

/// Column names used across the dashboard, after normalization.
pub mod columns {
    pub const MODE_CODE: &str = "DISAGMOT";
    pub const TRADE_CODE: &str = "TRDTYPE";
    pub const MONTH: &str = "MONTH";
    pub const STATE: &str = "USASTATE";
    pub const WEIGHT: &str = "SHIPWT";
    pub const FREIGHT_CHARGES: &str = "FREIGHT_CHARGES";
    pub const VALUE: &str = "VALUE";

    pub const MODE_LABEL: &str = "Mode_Label";
    pub const TRADE_LABEL: &str = "Trade_Type";
    pub const MONTH_NAME: &str = "Month_Name";
    pub const MONTH_ORDER: &str = "MONTH_ORDER";
    pub const YEAR: &str = "YEAR";
}
