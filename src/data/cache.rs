//! Dataset Cache Module
//! Read-through, write-once store of enriched datasets keyed by year.

use super::labels::enrich;
use super::loader::{DataLoader, DatasetError};
use crate::config::DashboardConfig;
use polars::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

/// Where raw yearly tables come from.
pub trait DatasetSource {
    fn load(&self, year: i32) -> Result<DataFrame, DatasetError>;
}

/// Reads `{data_dir}/{pattern}` for each year.
pub struct CsvSource {
    config: DashboardConfig,
}

impl CsvSource {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }
}

impl DatasetSource for CsvSource {
    fn load(&self, year: i32) -> Result<DataFrame, DatasetError> {
        DataLoader::load_csv(&self.config.file_for_year(year))
    }
}

/// Enriched records for one year. Empty when loading failed.
#[derive(Debug, Clone)]
pub struct YearlyDataset {
    pub year: i32,
    pub frame: Arc<DataFrame>,
    pub load_error: Option<String>,
}

impl YearlyDataset {
    fn prepare(source: &dyn DatasetSource, year: i32) -> Self {
        match source.load(year).and_then(|df| enrich(&df, year)) {
            Ok(df) => Self {
                year,
                frame: Arc::new(df),
                load_error: None,
            },
            Err(e) => {
                let message = format!("Failed to load {year}: {e}");
                tracing::error!("{message}");
                Self {
                    year,
                    frame: Arc::new(DataFrame::empty()),
                    load_error: Some(message),
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }
}

/// Per-session cache of yearly datasets. Failed loads are cached as empty
/// datasets so the failure is reported without touching disk again.
pub struct DatasetCache {
    source: Box<dyn DatasetSource + Send>,
    entries: HashMap<i32, YearlyDataset>,
}

impl DatasetCache {
    pub fn new(source: Box<dyn DatasetSource + Send>) -> Self {
        Self {
            source,
            entries: HashMap::new(),
        }
    }

    pub fn from_config(config: DashboardConfig) -> Self {
        Self::new(Box::new(CsvSource::new(config)))
    }

    /// Return the cached dataset for `year`, loading and enriching it on a miss.
    pub fn get_or_load(&mut self, year: i32) -> &YearlyDataset {
        let source = self.source.as_ref();
        self.entries.entry(year).or_insert_with(|| {
            tracing::info!(year, "cache miss, loading dataset");
            YearlyDataset::prepare(source, year)
        })
    }

    pub fn contains(&self, year: i32) -> bool {
        self.entries.contains_key(&year)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached year; the next access reloads from the source.
    pub fn clear(&mut self) {
        tracing::info!(years = self.entries.len(), "clearing dataset cache");
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const HEADER: &str = "DISAGMOT,TRDTYPE,MONTH,USASTATE,SHIPWT,FREIGHT_CHARGES,VALUE\n";

    fn write_year_file(dir: &Path, year: i32, rows: &str) {
        std::fs::write(dir.join(format!("{year}_TransData.csv")), format!("{HEADER}{rows}")).unwrap();
    }

    fn labels(dataset: &YearlyDataset, name: &str) -> Vec<Option<String>> {
        dataset
            .frame
            .column(name)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    struct CountingSource {
        loads: Arc<AtomicUsize>,
    }

    impl DatasetSource for CountingSource {
        fn load(&self, year: i32) -> Result<DataFrame, DatasetError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if year == 1999 {
                return Err(DatasetError::NotFound(format!("{year}_TransData.csv").into()));
            }
            Ok(df! {
                "DISAGMOT" => [5i64, 5],
                "TRDTYPE" => [1i64, 2],
                "MONTH" => [1i64, 1],
                "USASTATE" => ["CA", "CA"],
                "SHIPWT" => [100.0, 50.0],
                "FREIGHT_CHARGES" => [10.0, 5.0],
                "VALUE" => [1000.0, 500.0],
            }?)
        }
    }

    fn counting_cache() -> (DatasetCache, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        let cache = DatasetCache::new(Box::new(CountingSource {
            loads: loads.clone(),
        }));
        (cache, loads)
    }

    #[test]
    fn second_access_is_served_from_cache() {
        let (mut cache, loads) = counting_cache();

        let first = cache.get_or_load(2020).frame.clone();
        let second = cache.get_or_load(2020).frame.clone();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(cache.contains(2020));
        assert_eq!(first.column("YEAR").unwrap().i32().unwrap().get(0), Some(2020));
    }

    #[test]
    fn years_are_cached_independently() {
        let (mut cache, loads) = counting_cache();

        assert!(!cache.get_or_load(2020).is_empty());
        assert!(!cache.get_or_load(2021).is_empty());

        assert_eq!(cache.len(), 2);
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_load_is_cached_as_empty_with_message() {
        let (mut cache, loads) = counting_cache();

        let dataset = cache.get_or_load(1999);
        assert!(dataset.is_empty());
        assert!(dataset
            .load_error
            .as_deref()
            .is_some_and(|m| m.starts_with("Failed to load 1999")));

        cache.get_or_load(1999);
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        // other years are unaffected
        assert!(!cache.get_or_load(2022).is_empty());
    }

    #[test]
    fn clear_forces_reload() {
        let (mut cache, loads) = counting_cache();

        cache.get_or_load(2020);
        cache.clear();
        assert!(cache.is_empty());

        cache.get_or_load(2020);
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_file_on_disk_yields_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let mut cache = DatasetCache::from_config(config);

        let dataset = cache.get_or_load(2024);
        assert!(dataset.is_empty());
        assert!(dataset.load_error.is_some());
    }

    #[test]
    fn csv_on_disk_is_loaded_and_enriched() {
        let dir = tempfile::tempdir().unwrap();
        write_year_file(
            dir.path(),
            2021,
            "5.0,1,1,CA,100,10,1000\n5.0,2,1,,50,5,500\n3,1,13,TX,20,2,200\n",
        );
        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let mut cache = DatasetCache::from_config(config);

        let dataset = cache.get_or_load(2021);
        assert!(dataset.load_error.is_none());
        assert_eq!(dataset.frame.height(), 3);
        assert_eq!(
            labels(dataset, "Mode_Label"),
            vec![
                Some("Truck".to_string()),
                Some("Truck".to_string()),
                Some("Air".to_string()),
            ]
        );
        assert_eq!(
            labels(dataset, "Month_Name"),
            vec![Some("Jan".to_string()), Some("Jan".to_string()), None]
        );
        assert_eq!(
            labels(dataset, "USASTATE"),
            vec![Some("CA".to_string()), None, Some("TX".to_string())]
        );
    }

    #[test]
    fn header_only_file_is_empty_without_error() {
        let dir = tempfile::tempdir().unwrap();
        write_year_file(dir.path(), 2022, "");
        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let mut cache = DatasetCache::from_config(config);

        let dataset = cache.get_or_load(2022);
        assert!(dataset.is_empty());
        assert!(dataset.load_error.is_none());
    }
}
