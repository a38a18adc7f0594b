//! Deterministic rankings.
//!
//! Both rankings use a stable sort over input that is already in declared
//! order, so ties keep that order.

use std::cmp::Ordering;

use crate::dataset::{CorrelationMatrix, Dataset};
use crate::domain::Category;
use crate::error::MetricError;

/// Rank categories by value, descending.
///
/// Ties are broken by declared category order regardless of input order.
pub fn rank_by_value(values: &[(Category, f64)]) -> Vec<(Category, f64)> {
    let mut ranked = values.to_vec();
    ranked.sort_by_key(|(c, _)| c.ordinal());
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked
}

/// Rank the tracked categories by their value in `year`.
pub fn rank_year(dataset: &Dataset, year: i32) -> Result<Vec<(Category, f64)>, MetricError> {
    let i = dataset.year_index(year).ok_or(MetricError::YearOutOfRange(year))?;
    let values: Vec<(Category, f64)> = Category::TRACKED
        .iter()
        .map(|&c| (c, dataset.series(c)[i]))
        .collect();
    Ok(rank_by_value(&values))
}

/// Rank every other label by `|r|` against `reference`, descending.
///
/// The reference label is excluded. Ties keep label order.
pub fn rank_by_absolute_correlation(
    matrix: &CorrelationMatrix,
    reference: &str,
) -> Result<Vec<(String, f64)>, MetricError> {
    let row = matrix
        .row(reference)
        .ok_or_else(|| MetricError::UnknownLabel(reference.to_string()))?;

    let mut ranked: Vec<(String, f64)> = matrix
        .labels()
        .iter()
        .zip(row)
        .filter(|(label, _)| label.as_str() != reference)
        .map(|(label, r)| (label.clone(), r))
        .collect();
    ranked.sort_by(|a, b| b.1.abs().partial_cmp(&a.1.abs()).unwrap_or(Ordering::Equal));
    Ok(ranked)
}
