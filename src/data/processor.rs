//! Data Processor Module
//! Per-view transforms: waste type filter, group-by-sum and sorting.

use crate::data::loader::{
    WasteTable, COL_DISPOSED, COL_RECYCLED, COL_RECYCLING_RATE, COL_WASTE_TYPE, COL_YEAR,
};
use polars::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Sort order for the recycling rate bar chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RateSort {
    #[default]
    None,
    Ascending,
    Descending,
}

impl RateSort {
    pub const ALL: [RateSort; 3] = [RateSort::None, RateSort::Ascending, RateSort::Descending];

    pub fn label(&self) -> &'static str {
        match self {
            RateSort::None => "None",
            RateSort::Ascending => "Ascending",
            RateSort::Descending => "Descending",
        }
    }
}

/// Sort key for the stacked tonnage chart. Keyed sorts are descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TonnageSort {
    #[default]
    TotalWaste,
    WasteDisposed,
    TotalWasteRecycled,
    None,
}

impl TonnageSort {
    pub const ALL: [TonnageSort; 4] = [
        TonnageSort::TotalWaste,
        TonnageSort::WasteDisposed,
        TonnageSort::TotalWasteRecycled,
        TonnageSort::None,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TonnageSort::TotalWaste => "Total Waste",
            TonnageSort::WasteDisposed => "Waste Disposed",
            TonnageSort::TotalWasteRecycled => "Total Waste Recycled",
            TonnageSort::None => "None",
        }
    }

    /// Whether the recycled segment leads each stacked bar.
    pub fn recycled_first(&self) -> bool {
        matches!(self, TonnageSort::TotalWasteRecycled)
    }
}

/// Recycling rate of one waste type in one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatePoint {
    pub year: i64,
    pub recycling_rate: f64,
}

/// Summed recycling rate for one waste type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeRate {
    pub waste_type: String,
    pub recycling_rate: f64,
}

/// Summed tonnages for one waste type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeTonnage {
    pub waste_type: String,
    pub disposed: f64,
    pub recycled: f64,
    pub total_waste: f64,
}

impl TypeTonnage {
    pub fn new(waste_type: String, disposed: f64, recycled: f64) -> Self {
        Self {
            waste_type,
            disposed,
            recycled,
            total_waste: disposed + recycled,
        }
    }
}

/// Handles the table transforms behind each chart view.
pub struct WasteProcessor;

impl WasteProcessor {
    /// Rows of one waste type, as (year, recycling rate), in source order.
    pub fn filter_by_waste_type(
        table: &WasteTable,
        waste_type: &str,
    ) -> Result<Vec<RatePoint>, ProcessorError> {
        let filtered = table
            .dataframe()
            .clone()
            .lazy()
            .filter(col(COL_WASTE_TYPE).eq(lit(waste_type)))
            .select([col(COL_YEAR), col(COL_RECYCLING_RATE)])
            .collect()?;

        let years = filtered.column(COL_YEAR)?.i64()?;
        let rates = filtered.column(COL_RECYCLING_RATE)?.f64()?;

        let points: Vec<RatePoint> = years
            .into_iter()
            .zip(rates.into_iter())
            .filter_map(|(year, rate)| {
                Some(RatePoint {
                    year: year?,
                    recycling_rate: rate?,
                })
            })
            .collect();

        debug!(waste_type, rows = points.len(), "filtered by waste type");
        Ok(points)
    }

    /// Recycling rate summed per waste type for one year, keyed by waste type.
    pub fn recycling_rate_by_type(
        table: &WasteTable,
        year: i64,
        sort: RateSort,
    ) -> Result<Vec<TypeRate>, ProcessorError> {
        let grouped = Self::year_frame(table, year)
            .group_by([col(COL_WASTE_TYPE)])
            .agg([col(COL_RECYCLING_RATE).sum()])
            .sort([COL_WASTE_TYPE], SortMultipleOptions::default())
            .collect()?;

        let types = grouped.column(COL_WASTE_TYPE)?.str()?;
        let rates = grouped.column(COL_RECYCLING_RATE)?.f64()?;

        let mut rows: Vec<TypeRate> = types
            .into_iter()
            .zip(rates.into_iter())
            .filter_map(|(waste_type, rate)| {
                Some(TypeRate {
                    waste_type: waste_type?.to_string(),
                    recycling_rate: rate?,
                })
            })
            .collect();

        match sort {
            RateSort::None => {}
            RateSort::Ascending => Self::sort_rows(&mut rows, |r| r.recycling_rate, false),
            RateSort::Descending => Self::sort_rows(&mut rows, |r| r.recycling_rate, true),
        }

        debug!(year, groups = rows.len(), ?sort, "grouped recycling rate");
        Ok(rows)
    }

    /// Disposed and recycled tonnage summed per waste type for one year.
    pub fn tonnage_by_type(
        table: &WasteTable,
        year: i64,
        sort: TonnageSort,
    ) -> Result<Vec<TypeTonnage>, ProcessorError> {
        let grouped = Self::year_frame(table, year)
            .group_by([col(COL_WASTE_TYPE)])
            .agg([col(COL_DISPOSED).sum(), col(COL_RECYCLED).sum()])
            .sort([COL_WASTE_TYPE], SortMultipleOptions::default())
            .collect()?;

        let types = grouped.column(COL_WASTE_TYPE)?.str()?;
        let disposed = grouped.column(COL_DISPOSED)?.f64()?;
        let recycled = grouped.column(COL_RECYCLED)?.f64()?;

        let mut rows: Vec<TypeTonnage> = types
            .into_iter()
            .zip(disposed.into_iter())
            .zip(recycled.into_iter())
            .filter_map(|((waste_type, disposed), recycled)| {
                Some(TypeTonnage::new(
                    waste_type?.to_string(),
                    disposed?,
                    recycled?,
                ))
            })
            .collect();

        match sort {
            TonnageSort::TotalWaste => Self::sort_rows(&mut rows, |r| r.total_waste, true),
            TonnageSort::WasteDisposed => Self::sort_rows(&mut rows, |r| r.disposed, true),
            TonnageSort::TotalWasteRecycled => Self::sort_rows(&mut rows, |r| r.recycled, true),
            TonnageSort::None => {}
        }

        debug!(year, groups = rows.len(), ?sort, "grouped tonnage");
        Ok(rows)
    }

    fn year_frame(table: &WasteTable, year: i64) -> LazyFrame {
        table
            .dataframe()
            .clone()
            .lazy()
            .filter(col(COL_YEAR).eq(lit(year)))
    }

    /// Stable ascending sort; descending is its exact reverse.
    fn sort_rows<T>(rows: &mut [T], key: impl Fn(&T) -> f64, descending: bool) {
        rows.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal));
        if descending {
            rows.reverse();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_fixtures::{sample_table, table_from_rows};

    #[test]
    fn test_filter_by_waste_type_returns_all_matching_rows_in_source_order() {
        let table = sample_table();
        let points = WasteProcessor::filter_by_waste_type(&table, "Food").unwrap();

        let expected: Vec<RatePoint> = table
            .records()
            .unwrap()
            .into_iter()
            .filter(|r| r.waste_type == "Food")
            .map(|r| RatePoint {
                year: r.year,
                recycling_rate: r.recycling_rate,
            })
            .collect();

        assert_eq!(points, expected);
        assert_eq!(
            points.iter().map(|p| p.year).collect::<Vec<_>>(),
            vec![2017, 2015, 2016]
        );
    }

    #[test]
    fn test_filter_by_unknown_waste_type_is_empty() {
        let table = sample_table();
        let points = WasteProcessor::filter_by_waste_type(&table, "Glass").unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_recycling_rate_sums_duplicate_types() {
        let table = table_from_rows(&[
            (2017, "Food", 10.0, 5.0, 40.0),
            (2017, "Plastics", 20.0, 1.0, 6.0),
            (2017, "Food", 12.0, 7.0, 60.0),
            (2016, "Food", 11.0, 3.0, 99.0),
        ]);

        let rows = WasteProcessor::recycling_rate_by_type(&table, 2017, RateSort::None).unwrap();

        assert_eq!(
            rows,
            vec![
                TypeRate {
                    waste_type: "Food".to_string(),
                    recycling_rate: 100.0,
                },
                TypeRate {
                    waste_type: "Plastics".to_string(),
                    recycling_rate: 6.0,
                },
            ]
        );
    }

    #[test]
    fn test_recycling_rate_one_row_per_type_in_year() {
        let table = sample_table();
        let rows = WasteProcessor::recycling_rate_by_type(&table, 2017, RateSort::None).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.waste_type.as_str()).collect();
        assert_eq!(names, vec!["C&D", "Food", "Paper/Cardboard", "Plastics"]);
    }

    #[test]
    fn test_unsorted_tonnage_is_ordered_by_waste_type() {
        let table = table_from_rows(&[
            (2017, "Plastics", 20.0, 1.0, 6.0),
            (2017, "Food", 10.0, 5.0, 40.0),
            (2017, "C&D", 3.0, 9.0, 99.0),
            (2017, "Food", 12.0, 7.0, 60.0),
        ]);

        let rows = WasteProcessor::tonnage_by_type(&table, 2017, TonnageSort::None).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.waste_type.as_str()).collect();
        assert_eq!(names, vec!["C&D", "Food", "Plastics"]);
        assert_eq!(rows[1].disposed, 22.0);
    }

    #[test]
    fn test_ascending_and_descending_are_exact_reverses() {
        let table = table_from_rows(&[
            (2017, "Food", 1.0, 1.0, 16.0),
            (2017, "Plastics", 1.0, 1.0, 6.0),
            (2017, "Glass", 1.0, 1.0, 16.0),
            (2017, "C&D", 1.0, 1.0, 99.0),
        ]);

        let asc = WasteProcessor::recycling_rate_by_type(&table, 2017, RateSort::Ascending).unwrap();
        let mut desc =
            WasteProcessor::recycling_rate_by_type(&table, 2017, RateSort::Descending).unwrap();

        assert_eq!(asc.first().unwrap().waste_type, "Plastics");
        assert_eq!(asc.last().unwrap().waste_type, "C&D");
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_tonnage_total_is_exact_sum() {
        let table = sample_table();
        let rows = WasteProcessor::tonnage_by_type(&table, 2017, TonnageSort::None).unwrap();

        assert_eq!(rows.len(), 4);
        for row in &rows {
            assert_eq!(row.total_waste, row.disposed + row.recycled);
        }
        let food = rows.iter().find(|r| r.waste_type == "Food").unwrap();
        assert_eq!(food.disposed, 679900.0);
        assert_eq!(food.recycled, 129700.0);
    }

    #[test]
    fn test_tonnage_sort_keys_are_descending() {
        let table = sample_table();

        let by_total = WasteProcessor::tonnage_by_type(&table, 2017, TonnageSort::TotalWaste).unwrap();
        assert!(by_total
            .windows(2)
            .all(|w| w[0].total_waste >= w[1].total_waste));
        assert_eq!(by_total[0].waste_type, "C&D");

        let by_disposed =
            WasteProcessor::tonnage_by_type(&table, 2017, TonnageSort::WasteDisposed).unwrap();
        assert!(by_disposed.windows(2).all(|w| w[0].disposed >= w[1].disposed));
        assert_eq!(by_disposed[0].waste_type, "Plastics");

        let by_recycled =
            WasteProcessor::tonnage_by_type(&table, 2017, TonnageSort::TotalWasteRecycled).unwrap();
        assert!(by_recycled.windows(2).all(|w| w[0].recycled >= w[1].recycled));
        assert!(TonnageSort::TotalWasteRecycled.recycled_first());
        assert!(!TonnageSort::TotalWaste.recycled_first());
    }

    #[test]
    fn test_year_without_rows_is_empty() {
        let table = sample_table();
        assert!(WasteProcessor::tonnage_by_type(&table, 1999, TonnageSort::TotalWaste)
            .unwrap()
            .is_empty());
        assert!(WasteProcessor::recycling_rate_by_type(&table, 1999, RateSort::Descending)
            .unwrap()
            .is_empty());
    }
}
