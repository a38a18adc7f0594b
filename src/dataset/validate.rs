//! Shape checks shared by the dataset constructors.

use crate::error::SchemaError;

/// A year axis is non-empty and advances by exactly one year per entry.
pub(crate) fn check_year_axis(series: &str, years: &[i32]) -> Result<(), SchemaError> {
    if years.is_empty() {
        return Err(SchemaError::EmptyYearAxis {
            series: series.to_string(),
        });
    }
    for (i, w) in years.windows(2).enumerate() {
        if w[1] != w[0] + 1 {
            return Err(SchemaError::YearAxis {
                series: series.to_string(),
                index: i + 1,
                prev: w[0],
                next: w[1],
            });
        }
    }
    Ok(())
}

pub(crate) fn check_len(series: &str, expected: usize, actual: usize) -> Result<(), SchemaError> {
    if expected != actual {
        return Err(SchemaError::LengthMismatch {
            series: series.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Every value must be finite. Callers check lengths first.
pub(crate) fn check_finite(series: &str, years: &[i32], values: &[f64]) -> Result<(), SchemaError> {
    for (&year, &value) in years.iter().zip(values) {
        if !value.is_finite() {
            return Err(SchemaError::NonFinite {
                series: series.to_string(),
                year,
            });
        }
    }
    Ok(())
}

/// Every value must be finite and `>= 0` (monetary amounts).
pub(crate) fn check_non_negative(series: &str, years: &[i32], values: &[f64]) -> Result<(), SchemaError> {
    check_finite(series, years, values)?;
    for (&year, &value) in years.iter().zip(values) {
        if value < 0.0 {
            return Err(SchemaError::NegativeValue {
                series: series.to_string(),
                year,
                value,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_axis_rejects_duplicates_and_reversals() {
        assert!(check_year_axis("a", &[1995, 1996, 1997]).is_ok());
        assert!(check_year_axis("a", &[2025]).is_ok());

        let err = check_year_axis("a", &[1995, 1995]).unwrap_err();
        assert!(matches!(err, SchemaError::YearAxis { index: 1, .. }));

        let err = check_year_axis("a", &[1995, 1997, 1996]).unwrap_err();
        assert!(matches!(err, SchemaError::YearAxis { index: 2, prev: 1997, next: 1996, .. }));
    }

    #[test]
    fn year_axis_rejects_gaps_and_empty() {
        let err = check_year_axis("a", &[1995, 1997, 1998]).unwrap_err();
        assert!(matches!(err, SchemaError::YearAxis { index: 1, prev: 1995, next: 1997, .. }));

        let err = check_year_axis("a", &[]).unwrap_err();
        assert!(matches!(err, SchemaError::EmptyYearAxis { .. }));
    }

    #[test]
    fn non_negative_rejects_negatives_and_nan() {
        assert!(check_non_negative("s", &[1, 2], &[0.0, 3.0]).is_ok());
        assert!(matches!(
            check_non_negative("s", &[1, 2], &[0.0, -3.0]),
            Err(SchemaError::NegativeValue { year: 2, .. })
        ));
        assert!(matches!(
            check_non_negative("s", &[1], &[f64::NAN]),
            Err(SchemaError::NonFinite { year: 1, .. })
        ));
    }
}
