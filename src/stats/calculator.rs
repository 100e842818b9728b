//! Statistics Calculator Module
//! Pairwise Pearson correlation over the numeric columns of the table.

use crate::data::WasteTable;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use tracing::debug;

/// Square correlation matrix, rows and columns in `columns` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Coefficient at (row, col). NaN marks an undefined pair.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(f64::NAN)
    }
}

/// Handles statistical calculations with multi-threading support.
pub struct CorrelationCalculator;

impl CorrelationCalculator {
    /// Pearson correlation coefficient using sample covariance.
    ///
    /// Returns NaN when fewer than two observations are given or either
    /// series has zero variance.
    pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
        if x.len() != y.len() || x.len() < 2 {
            return f64::NAN;
        }

        let denom = x.std_dev() * y.std_dev();
        if denom == 0.0 || !denom.is_finite() {
            return f64::NAN;
        }

        (x.covariance(y) / denom).clamp(-1.0, 1.0)
    }

    /// Compute the full correlation matrix of the table's numeric columns.
    pub fn compute(table: &WasteTable) -> PolarsResult<CorrelationMatrix> {
        let columns = table.numeric_columns();
        let df = table.dataframe();

        let data: Vec<Vec<f64>> = columns
            .iter()
            .map(|name| {
                let values = df.column(name)?.cast(&DataType::Float64)?;
                Ok(values
                    .f64()?
                    .into_iter()
                    .map(|v| v.unwrap_or(f64::NAN))
                    .collect())
            })
            .collect::<PolarsResult<_>>()?;

        let n = columns.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();

        // Use rayon for parallel computation
        let coefficients: Vec<(usize, usize, f64)> = pairs
            .par_iter()
            .map(|&(i, j)| (i, j, Self::pearson(&data[i], &data[j])))
            .collect();

        let mut values = vec![vec![f64::NAN; n]; n];
        for (i, row) in values.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        for (i, j, r) in coefficients {
            values[i][j] = r;
            values[j][i] = r;
        }

        debug!(columns = n, rows = table.height(), "computed correlation matrix");
        Ok(CorrelationMatrix { columns, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_fixtures::{sample_table, table_from_rows};

    #[test]
    fn test_pearson_perfect_positive() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        assert!((CorrelationCalculator::pearson(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [10.0, 8.0, 6.0, 4.0, 2.0];
        assert!((CorrelationCalculator::pearson(&x, &y) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_undefined_cases() {
        assert!(CorrelationCalculator::pearson(&[1.0], &[2.0]).is_nan());
        assert!(CorrelationCalculator::pearson(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]).is_nan());
        assert!(CorrelationCalculator::pearson(&[1.0, 2.0], &[1.0, 2.0, 3.0]).is_nan());
    }

    #[test]
    fn test_matrix_is_symmetric_with_unit_diagonal() {
        let table = sample_table();
        let matrix = CorrelationCalculator::compute(&table).unwrap();

        assert_eq!(matrix.columns, table.numeric_columns());
        assert_eq!(matrix.len(), 4);
        for i in 0..matrix.len() {
            assert_eq!(matrix.get(i, i), 1.0);
            for j in 0..matrix.len() {
                let (a, b) = (matrix.get(i, j), matrix.get(j, i));
                assert!(a == b || (a.is_nan() && b.is_nan()));
                assert!(a.is_nan() || (-1.0..=1.0).contains(&a));
            }
        }
    }

    #[test]
    fn test_matrix_excludes_text_columns() {
        let table = sample_table();
        let matrix = CorrelationCalculator::compute(&table).unwrap();
        assert!(!matrix.columns.iter().any(|c| c == "waste_type"));
    }

    #[test]
    fn test_constant_column_keeps_unit_diagonal() {
        let table = table_from_rows(&[
            (2017, "Food", 1.0, 5.0, 10.0),
            (2017, "Plastics", 2.0, 5.0, 20.0),
            (2017, "Glass", 3.0, 5.0, 30.0),
        ]);
        let matrix = CorrelationCalculator::compute(&table).unwrap();
        let recycled = matrix
            .columns
            .iter()
            .position(|c| c == "total_waste_recycled_tonne")
            .unwrap();
        let disposed = matrix
            .columns
            .iter()
            .position(|c| c == "waste_disposed_of_tonne")
            .unwrap();
        let rate = matrix
            .columns
            .iter()
            .position(|c| c == "recycling_rate")
            .unwrap();

        assert_eq!(matrix.get(recycled, recycled), 1.0);
        assert!(matrix.get(recycled, disposed).is_nan());
        assert!((matrix.get(disposed, rate) - 1.0).abs() < 1e-12);
    }
}
