//! Stats module - Correlation analysis

mod calculator;

pub use calculator::{CorrelationCalculator, CorrelationMatrix};
