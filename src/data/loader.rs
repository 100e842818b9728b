//! CSV Data Loader Module
//! Loads the waste statistics CSV with Polars and drops incomplete rows.

use polars::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const COL_YEAR: &str = "year";
pub const COL_WASTE_TYPE: &str = "waste_type";
pub const COL_DISPOSED: &str = "waste_disposed_of_tonne";
pub const COL_RECYCLED: &str = "total_waste_recycled_tonne";
pub const COL_RECYCLING_RATE: &str = "recycling_rate";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("CSV file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Malformed values in column '{column}': {reason}")]
    Malformed { column: String, reason: String },
}

/// Columns every waste CSV must carry, with the type each is coerced to.
fn required_schema() -> [(&'static str, DataType); 5] {
    [
        (COL_YEAR, DataType::Int64),
        (COL_WASTE_TYPE, DataType::String),
        (COL_DISPOSED, DataType::Float64),
        (COL_RECYCLED, DataType::Float64),
        (COL_RECYCLING_RATE, DataType::Float64),
    ]
}

/// One (year, waste type) observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WasteRecord {
    pub year: i64,
    pub waste_type: String,
    pub waste_disposed_of_tonne: f64,
    pub total_waste_recycled_tonne: f64,
    pub recycling_rate: f64,
}

/// Cleaned, immutable waste statistics table.
#[derive(Debug, Clone)]
pub struct WasteTable {
    df: DataFrame,
    source: Option<PathBuf>,
}

impl WasteTable {
    /// Validate and clean a raw DataFrame.
    ///
    /// The required columns are strictly cast to their expected types, so a
    /// value that cannot be converted fails the whole load. Rows with a null
    /// in any column, or NaN in any float column, are dropped afterwards.
    pub fn from_dataframe(mut df: DataFrame) -> Result<Self, LoaderError> {
        for (name, dtype) in required_schema() {
            let column = df
                .column(name)
                .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
            if column.dtype() == &dtype {
                continue;
            }

            let cast = column
                .as_materialized_series()
                .strict_cast(&dtype)
                .map_err(|e| LoaderError::Malformed {
                    column: name.to_string(),
                    reason: e.to_string(),
                })?;
            df.with_column(cast)?;
        }

        let raw_rows = df.height();
        let df = df.drop_nulls::<String>(None)?;

        let nan_free = df
            .get_columns()
            .iter()
            .filter(|c| matches!(c.dtype(), DataType::Float32 | DataType::Float64))
            .map(|c| col(c.name().clone()).is_not_nan())
            .reduce(|acc, expr| acc.and(expr));

        let df = match nan_free {
            Some(predicate) => df.lazy().filter(predicate).collect()?,
            None => df,
        };

        debug!(
            raw_rows,
            kept_rows = df.height(),
            "dropped rows with missing values"
        );

        Ok(Self { df, source: None })
    }

    /// Get a reference to the cleaned DataFrame.
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Path the table was read from, if it came from disk.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Get the number of rows.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Get list of column names.
    pub fn columns(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Get list of numeric column names, in file order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .filter(|col| {
                matches!(
                    col.dtype(),
                    DataType::Float32
                        | DataType::Float64
                        | DataType::Int8
                        | DataType::Int16
                        | DataType::Int32
                        | DataType::Int64
                        | DataType::UInt8
                        | DataType::UInt16
                        | DataType::UInt32
                        | DataType::UInt64
                )
            })
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Distinct waste types in order of first appearance.
    pub fn waste_types(&self) -> Vec<String> {
        self.df
            .column(COL_WASTE_TYPE)
            .ok()
            .and_then(|col| col.as_materialized_series().unique_stable().ok())
            .and_then(|unique| {
                unique
                    .str()
                    .ok()
                    .map(|ca| ca.into_iter().flatten().map(str::to_string).collect())
            })
            .unwrap_or_default()
    }

    /// Distinct years in order of first appearance.
    pub fn years(&self) -> Vec<i64> {
        self.df
            .column(COL_YEAR)
            .ok()
            .and_then(|col| col.as_materialized_series().unique_stable().ok())
            .and_then(|unique| {
                unique
                    .i64()
                    .ok()
                    .map(|ca| ca.into_iter().flatten().collect())
            })
            .unwrap_or_default()
    }

    /// Materialize the typed records.
    pub fn records(&self) -> Result<Vec<WasteRecord>, LoaderError> {
        let years = self.df.column(COL_YEAR)?.i64()?;
        let types = self.df.column(COL_WASTE_TYPE)?.str()?;
        let disposed = self.df.column(COL_DISPOSED)?.f64()?;
        let recycled = self.df.column(COL_RECYCLED)?.f64()?;
        let rates = self.df.column(COL_RECYCLING_RATE)?.f64()?;

        let records = years
            .into_iter()
            .zip(types.into_iter())
            .zip(disposed.into_iter())
            .zip(recycled.into_iter())
            .zip(rates.into_iter())
            .filter_map(|((((year, waste_type), disposed), recycled), rate)| {
                Some(WasteRecord {
                    year: year?,
                    waste_type: waste_type?.to_string(),
                    waste_disposed_of_tonne: disposed?,
                    total_waste_recycled_tonne: recycled?,
                    recycling_rate: rate?,
                })
            })
            .collect();

        Ok(records)
    }
}

/// Reads waste statistics CSV files.
pub struct WasteLoader;

impl WasteLoader {
    /// Load and clean a CSV file using Polars.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<WasteTable, LoaderError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let raw = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        let mut table = WasteTable::from_dataframe(raw)?;
        table.source = Some(path.to_path_buf());

        info!(
            path = %path.display(),
            rows = table.height(),
            columns = table.columns().len(),
            "loaded waste statistics"
        );

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const HEADER: &str =
        "waste_type,waste_disposed_of_tonne,total_waste_recycled_tonne,total_waste_generated_tonne,recycling_rate,year\n";

    #[test]
    fn test_load_drops_rows_with_missing_values() {
        let csv = format!(
            "{HEADER}Food,679900,111100,791000,14,2016\n\
             Plastics,,59500,822200,7,2016\n\
             Paper/Cardboard,607100,575000,1182100,,2016\n\
             Food,679900,129700,809600,16,2017\n"
        );
        let file = write_csv(&csv);

        let table = WasteLoader::load_csv(file.path()).unwrap();

        assert_eq!(table.height(), 2);
        assert_eq!(table.source(), Some(file.path()));
        for column in table.dataframe().get_columns() {
            assert_eq!(column.null_count(), 0, "nulls left in {}", column.name());
        }
        let records = table.records().unwrap();
        assert!(records.iter().all(|r| r.waste_type == "Food"));
        assert_eq!(records[1].year, 2017);
        assert_eq!(records[1].waste_disposed_of_tonne, 679900.0);
        assert_eq!(records[1].total_waste_recycled_tonne, 129700.0);
    }

    #[test]
    fn test_load_missing_file() {
        let err = WasteLoader::load_csv("/definitely/not/here/2003_2017_waste.csv").unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }

    #[test]
    fn test_load_missing_required_column() {
        let file = write_csv("waste_type,year\nFood,2016\n");
        let err = WasteLoader::load_csv(file.path()).unwrap_err();
        match err {
            LoaderError::MissingColumn(name) => assert_eq!(name, COL_DISPOSED),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_rejects_unparsable_numbers() {
        let csv = format!(
            "{HEADER}Food,679900,111100,791000,14,2016\n\
             Plastics,lots,59500,822200,7,2016\n"
        );
        let file = write_csv(&csv);
        let err = WasteLoader::load_csv(file.path()).unwrap_err();
        match err {
            LoaderError::Malformed { column, .. } => assert_eq!(column, COL_DISPOSED),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_numeric_columns_and_distinct_values() {
        let csv = format!(
            "{HEADER}Plastics,762700,59500,822200,7,2016\n\
             Food,679900,111100,791000,14,2016\n\
             Plastics,763400,51800,815200,6,2017\n"
        );
        let file = write_csv(&csv);
        let table = WasteLoader::load_csv(file.path()).unwrap();

        assert_eq!(
            table.numeric_columns(),
            vec![
                COL_DISPOSED.to_string(),
                COL_RECYCLED.to_string(),
                "total_waste_generated_tonne".to_string(),
                COL_RECYCLING_RATE.to_string(),
                COL_YEAR.to_string(),
            ]
        );
        assert_eq!(table.waste_types(), vec!["Plastics", "Food"]);
        assert_eq!(table.years(), vec![2016, 2017]);
    }

    #[test]
    fn test_from_dataframe_drops_nan_rows() {
        let df = DataFrame::new(vec![
            Column::new(COL_YEAR.into(), vec![2016i64, 2016, 2017]),
            Column::new(COL_WASTE_TYPE.into(), vec!["Food", "Glass", "Food"]),
            Column::new(COL_DISPOSED.into(), vec![1.0, 2.0, 3.0]),
            Column::new(COL_RECYCLED.into(), vec![1.0, f64::NAN, 3.0]),
            Column::new(COL_RECYCLING_RATE.into(), vec![50.0, 10.0, 50.0]),
        ])
        .unwrap();

        let table = WasteTable::from_dataframe(df).unwrap();

        assert_eq!(table.height(), 2);
        assert_eq!(table.waste_types(), vec!["Food"]);
    }
}
