//! Label Enricher Module
//! Maps numeric transport, trade and month codes to readable labels.

use super::columns;
use super::loader::DatasetError;
use polars::prelude::*;

/// A fixed code → label lookup. Unknown codes have no label.
pub trait CodeTable: Sized + Copy + 'static {
    /// Every entry of the table, in code order.
    const ALL: &'static [Self];

    fn code(self) -> i64;
    fn label(self) -> &'static str;

    fn from_code(code: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|entry| entry.code() == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportMode {
    Vessel,
    Air,
    Mail,
    Truck,
    Rail,
    Pipeline,
    Other,
    ForeignTradeZone,
}

impl CodeTable for TransportMode {
    const ALL: &'static [Self] = &[
        Self::Vessel,
        Self::Air,
        Self::Mail,
        Self::Truck,
        Self::Rail,
        Self::Pipeline,
        Self::Other,
        Self::ForeignTradeZone,
    ];

    // Code 2 is not assigned.
    fn code(self) -> i64 {
        match self {
            Self::Vessel => 1,
            Self::Air => 3,
            Self::Mail => 4,
            Self::Truck => 5,
            Self::Rail => 6,
            Self::Pipeline => 7,
            Self::Other => 8,
            Self::ForeignTradeZone => 9,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Vessel => "Vessel",
            Self::Air => "Air",
            Self::Mail => "Mail (U.S. Postal Service)",
            Self::Truck => "Truck",
            Self::Rail => "Rail",
            Self::Pipeline => "Pipeline",
            Self::Other => "Other",
            Self::ForeignTradeZone => "Foreign Trade Zones (FTZs)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeType {
    Import,
    Export,
}

impl CodeTable for TradeType {
    const ALL: &'static [Self] = &[Self::Import, Self::Export];

    fn code(self) -> i64 {
        match self {
            Self::Import => 1,
            Self::Export => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Import => "Import",
            Self::Export => "Export",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    Jan = 1,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl CodeTable for Month {
    const ALL: &'static [Self] = &[
        Self::Jan,
        Self::Feb,
        Self::Mar,
        Self::Apr,
        Self::May,
        Self::Jun,
        Self::Jul,
        Self::Aug,
        Self::Sep,
        Self::Oct,
        Self::Nov,
        Self::Dec,
    ];

    fn code(self) -> i64 {
        self as i64
    }

    fn label(self) -> &'static str {
        match self {
            Self::Jan => "Jan",
            Self::Feb => "Feb",
            Self::Mar => "Mar",
            Self::Apr => "Apr",
            Self::May => "May",
            Self::Jun => "Jun",
            Self::Jul => "Jul",
            Self::Aug => "Aug",
            Self::Sep => "Sep",
            Self::Oct => "Oct",
            Self::Nov => "Nov",
            Self::Dec => "Dec",
        }
    }
}

/// Whole-number position of an axis tick, `None` between whole numbers.
pub fn tick_position(value: f64) -> Option<i64> {
    let rounded = value.round();
    ((value - rounded).abs() <= 1e-6).then_some(rounded as i64)
}

/// Month name for a tick on a 1..=12 axis, blank anywhere else.
pub fn month_tick_label(value: f64) -> String {
    tick_position(value)
        .and_then(Month::from_code)
        .map(|month| month.label().to_string())
        .unwrap_or_default()
}

/// Build a label column from a code column. Returns the column and the number
/// of non-null codes that had no entry in the table.
fn label_column<T: CodeTable>(
    df: &DataFrame,
    source: &str,
    target: &str,
) -> Result<(Column, usize), DatasetError> {
    let codes = df
        .column(source)
        .map_err(|_| DatasetError::MissingColumn(source.to_string()))?
        .cast(&DataType::Int64)?;
    let codes = codes.i64()?;

    let mut unmapped = 0;
    let labels: Vec<Option<&'static str>> = codes
        .into_iter()
        .map(|code| {
            let label = code.and_then(T::from_code).map(T::label);
            if code.is_some() && label.is_none() {
                unmapped += 1;
            }
            label
        })
        .collect();

    Ok((Column::new(target.into(), labels), unmapped))
}

/// Add mode, trade-type and month labels plus the month order and the year.
///
/// Codes outside the tables become null labels. They are counted and logged
/// but the records are kept as they are.
pub fn enrich(df: &DataFrame, year: i32) -> Result<DataFrame, DatasetError> {
    let (mode, unmapped_modes) =
        label_column::<TransportMode>(df, columns::MODE_CODE, columns::MODE_LABEL)?;
    let (trade, unmapped_trades) =
        label_column::<TradeType>(df, columns::TRADE_CODE, columns::TRADE_LABEL)?;
    let (month, unmapped_months) =
        label_column::<Month>(df, columns::MONTH, columns::MONTH_NAME)?;

    let month_order = df
        .column(columns::MONTH)
        .map_err(|_| DatasetError::MissingColumn(columns::MONTH.to_string()))?
        .cast(&DataType::Int64)?
        .with_name(columns::MONTH_ORDER.into());
    let year_col = Column::new(columns::YEAR.into(), vec![year; df.height()]);

    let mut enriched = df.clone();
    enriched
        .with_column(mode)?
        .with_column(trade)?
        .with_column(month)?
        .with_column(month_order)?
        .with_column(year_col)?;

    if unmapped_modes + unmapped_trades + unmapped_months > 0 {
        tracing::warn!(
            year,
            unmapped_modes,
            unmapped_trades,
            unmapped_months,
            "records with codes outside the label tables"
        );
    }

    Ok(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df! {
            "DISAGMOT" => [5i64, 2, 9, 1],
            "TRDTYPE" => [1i64, 2, 3, 1],
            "MONTH" => [1i64, 12, 13, 6],
            "SHIPWT" => [100.0, 50.0, 1.0, 2.0],
        }
        .unwrap()
    }

    fn labels(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    #[test]
    fn mode_table_is_non_contiguous() {
        assert_eq!(TransportMode::from_code(1), Some(TransportMode::Vessel));
        assert_eq!(TransportMode::from_code(2), None);
        assert_eq!(TransportMode::from_code(9), Some(TransportMode::ForeignTradeZone));
        assert_eq!(TransportMode::ALL.len(), 8);
    }

    #[test]
    fn month_codes_follow_calendar_order() {
        for (i, month) in Month::ALL.iter().enumerate() {
            assert_eq!(Month::from_code(i as i64 + 1), Some(*month));
        }
        assert_eq!(Month::from_code(0), None);
        assert_eq!(Month::from_code(12), Some(Month::Dec));
    }

    #[test]
    fn month_ticks_only_on_whole_months() {
        assert_eq!(month_tick_label(1.0), "Jan");
        assert_eq!(month_tick_label(11.9999999), "Dec");
        assert_eq!(month_tick_label(6.5), "");
        assert_eq!(month_tick_label(0.0), "");
        assert_eq!(month_tick_label(13.0), "");
        assert_eq!(tick_position(-2.0), Some(-2));
        assert_eq!(tick_position(0.25), None);
    }

    #[test]
    fn known_codes_get_labels_and_unknown_stay_null() {
        let enriched = enrich(&sample(), 2021).unwrap();

        assert_eq!(
            labels(&enriched, "Mode_Label"),
            vec![
                Some("Truck".to_string()),
                None,
                Some("Foreign Trade Zones (FTZs)".to_string()),
                Some("Vessel".to_string()),
            ]
        );
        assert_eq!(
            labels(&enriched, "Trade_Type"),
            vec![
                Some("Import".to_string()),
                Some("Export".to_string()),
                None,
                Some("Import".to_string()),
            ]
        );
        assert_eq!(
            labels(&enriched, "Month_Name"),
            vec![
                Some("Jan".to_string()),
                Some("Dec".to_string()),
                None,
                Some("Jun".to_string()),
            ]
        );
    }

    #[test]
    fn stamps_year_and_month_order() {
        let enriched = enrich(&sample(), 2023).unwrap();

        let years: Vec<Option<i32>> = enriched.column("YEAR").unwrap().i32().unwrap().into_iter().collect();
        assert_eq!(years, vec![Some(2023); 4]);

        let order: Vec<Option<i64>> = enriched
            .column("MONTH_ORDER")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(order, vec![Some(1), Some(12), Some(13), Some(6)]);
    }

    #[test]
    fn input_frame_is_untouched() {
        let df = sample();
        let _ = enrich(&df, 2020).unwrap();
        assert_eq!(df.width(), 4);
    }

    #[test]
    fn missing_code_column_fails() {
        let df = df! { "DISAGMOT" => [5i64] }.unwrap();
        let err = enrich(&df, 2020).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(name) if name == "TRDTYPE"));
    }
}
