//! Error types.
//!
//! The library reports two typed failures:
//!
//! - [`SchemaError`]: the bundle could not be parsed or violates an invariant.
//!   Fatal at load time; no partial dataset is ever returned.
//! - [`MetricError`]: a derived-metric function was called outside its domain.
//!
//! The binary wraps both in [`AppError`], which carries a process exit code.

use thiserror::Error;

/// The bundle is malformed or inconsistent.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("bundle is not valid JSON for the expected shape: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read bundle '{path}': {message}")]
    Io { path: String, message: String },

    #[error("series '{series}' has {actual} values but the year axis has {expected}")]
    LengthMismatch {
        series: String,
        expected: usize,
        actual: usize,
    },

    #[error("year axis of '{series}' is empty")]
    EmptyYearAxis { series: String },

    #[error("year axis of '{series}' is not consecutive at index {index} ({prev} -> {next})")]
    YearAxis {
        series: String,
        index: usize,
        prev: i32,
        next: i32,
    },

    #[error("forecast '{category}' year {year}: expected lo <= fc <= hi, got {lo} / {fc} / {hi}")]
    ForecastBounds {
        category: String,
        year: i32,
        lo: f64,
        fc: f64,
        hi: f64,
    },

    #[error("forecast '{category}' is malformed: {message}")]
    ForecastShape { category: String, message: String },

    #[error("series '{series}' has a negative value {value} in {year}")]
    NegativeValue { series: String, year: i32, value: f64 },

    #[error("series '{series}' has a non-finite value in {year}")]
    NonFinite { series: String, year: i32 },

    #[error("correlation matrix is malformed: {0}")]
    CorrelationShape(String),

    #[error("correlation matrix is not symmetric at ({row}, {col}): {a} vs {b}")]
    CorrelationAsymmetric {
        row: usize,
        col: usize,
        a: f64,
        b: f64,
    },

    #[error("correlation matrix diagonal at {index} is {value}, expected 1.0")]
    CorrelationDiagonal { index: usize, value: f64 },

    #[error("correlation coefficient at ({row}, {col}) is outside [-1, 1]: {value}")]
    CorrelationRange { row: usize, col: usize, value: f64 },

    #[error("'{section}' references unknown category '{name}'")]
    UnknownCategory { section: &'static str, name: String },

    #[error("'{section}' has no entry for category '{name}'")]
    MissingCategory { section: &'static str, name: String },
}

/// A derived metric was requested with out-of-domain arguments.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("unknown correlation label '{0}'")]
    UnknownLabel(String),

    #[error("year {0} is outside the historical axis")]
    YearOutOfRange(i32),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        AppError::new(2, format!("Dataset load failed: {err}"))
    }
}

impl From<MetricError> for AppError {
    fn from(err: MetricError) -> Self {
        AppError::new(3, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_errors_map_to_exit_code_2() {
        let err: AppError = SchemaError::CorrelationShape("empty".to_string()).into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn metric_errors_map_to_exit_code_3() {
        let err: AppError = MetricError::InvalidRange("first value must be > 0".to_string()).into();
        assert_eq!(err.exit_code(), 3);
    }
}
