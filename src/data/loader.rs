//! CSV Data Loader Module
//! Reads one year's transaction file with Polars and normalizes its column names.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Every way a yearly dataset can fail to load. The dashboard shows all of
/// them the same way: a warning and an empty dataset for that year.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Missing column: {0}")]
    MissingColumn(String),
}

/// Trim surrounding whitespace and join inner words with underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().replace(' ', "_")
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file, inferring column types over the whole file.
    pub fn load_csv(path: &Path) -> Result<DataFrame, DatasetError> {
        if !path.is_file() {
            return Err(DatasetError::NotFound(path.to_path_buf()));
        }

        let mut df = LazyCsvReader::new(path)
            .with_infer_schema_length(None)
            .finish()?
            .collect()?;

        let renames: Vec<(String, String)> = df
            .get_column_names()
            .iter()
            .filter_map(|name| {
                let normalized = normalize_column_name(name.as_str());
                (normalized != name.as_str()).then(|| (name.to_string(), normalized))
            })
            .collect();
        for (old, new) in &renames {
            df.rename(old, new.as_str().into())?;
        }

        tracing::info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded csv"
        );
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn normalizes_whitespace_in_names() {
        assert_eq!(normalize_column_name("  FREIGHT CHARGES "), "FREIGHT_CHARGES");
        assert_eq!(normalize_column_name("SHIPWT"), "SHIPWT");
        assert_eq!(normalize_column_name("\tCONT VAL MO\n"), "CONT_VAL_MO");
    }

    #[test]
    fn loaded_columns_have_no_spaces() {
        let file = write_csv(
            " DISAGMOT ,TRDTYPE,FREIGHT CHARGES,SHIPWT\n5,1,10,100\n5,2,5,50\n",
        );

        let df = DataLoader::load_csv(file.path()).unwrap();
        assert_eq!(df.height(), 2);
        for name in df.get_column_names() {
            assert_eq!(name.as_str(), name.trim());
            assert!(!name.contains(' '), "column {name} still has a space");
        }
        assert!(df.column("FREIGHT_CHARGES").is_ok());
        assert!(df.column("DISAGMOT").is_ok());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1999_TransData.csv");

        let err = DataLoader::load_csv(&path).unwrap_err();
        assert!(matches!(err, DatasetError::NotFound(p) if p == path));
    }
}
