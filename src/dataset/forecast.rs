//! Per-category forecast with its 95% interval.

use serde::Serialize;

use crate::dataset::bundle::RawForecast;
use crate::dataset::validate::{check_len, check_non_negative, check_year_axis};
use crate::domain::{Category, YearValue};
use crate::error::SchemaError;

/// Number of forecast years every category carries.
pub const FORECAST_HORIZON: usize = 6;

/// One forecast year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub year: i32,
    pub central: f64,
    pub lower: f64,
    pub upper: f64,
}

/// A validated forecast series.
///
/// Invariants (checked in [`ForecastSeries::new`]):
/// - the historical axis is non-empty and strictly increasing
/// - exactly [`FORECAST_HORIZON`] forecast years, all after the last historical year
/// - `lower <= central <= upper` and all values non-negative
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSeries {
    category: Category,
    hist_years: Vec<i32>,
    hist_values: Vec<f64>,
    points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    pub fn new(category: Category, raw: RawForecast) -> Result<Self, SchemaError> {
        let name = category.display_name();
        let shape_err = |message: String| SchemaError::ForecastShape {
            category: name.to_string(),
            message,
        };

        if raw.hist_x.is_empty() {
            return Err(shape_err("historical axis is empty".to_string()));
        }
        check_year_axis(&format!("forecast.{name}.hist_x"), &raw.hist_x)?;
        check_len(&format!("forecast.{name}.hist_y"), raw.hist_x.len(), raw.hist_y.len())?;
        check_non_negative(&format!("forecast.{name}.hist_y"), &raw.hist_x, &raw.hist_y)?;

        if raw.fc_yrs.len() != FORECAST_HORIZON {
            return Err(shape_err(format!(
                "expected {FORECAST_HORIZON} forecast years, got {}",
                raw.fc_yrs.len()
            )));
        }
        check_year_axis(&format!("forecast.{name}.fc_yrs"), &raw.fc_yrs)?;
        for (label, values) in [("fc", &raw.fc), ("lo", &raw.lo), ("hi", &raw.hi)] {
            let series = format!("forecast.{name}.{label}");
            check_len(&series, raw.fc_yrs.len(), values.len())?;
            check_non_negative(&series, &raw.fc_yrs, values)?;
        }

        let last_hist = raw.hist_x[raw.hist_x.len() - 1];
        if raw.fc_yrs[0] <= last_hist {
            return Err(shape_err(format!(
                "first forecast year {} does not follow last historical year {last_hist}",
                raw.fc_yrs[0]
            )));
        }

        let mut points = Vec::with_capacity(FORECAST_HORIZON);
        for i in 0..FORECAST_HORIZON {
            let p = ForecastPoint {
                year: raw.fc_yrs[i],
                central: raw.fc[i],
                lower: raw.lo[i],
                upper: raw.hi[i],
            };
            if !(p.lower <= p.central && p.central <= p.upper) {
                return Err(SchemaError::ForecastBounds {
                    category: name.to_string(),
                    year: p.year,
                    lo: p.lower,
                    fc: p.central,
                    hi: p.upper,
                });
            }
            points.push(p);
        }

        Ok(Self {
            category,
            hist_years: raw.hist_x,
            hist_values: raw.hist_y,
            points,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// The category's own historical axis (may start later than the shared axis).
    pub fn hist_years(&self) -> &[i32] {
        &self.hist_years
    }

    pub fn hist_values(&self) -> &[f64] {
        &self.hist_values
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn first_historical(&self) -> YearValue {
        YearValue {
            year: self.hist_years[0],
            value: self.hist_values[0],
        }
    }

    pub fn last_historical(&self) -> YearValue {
        let i = self.hist_years.len() - 1;
        YearValue {
            year: self.hist_years[i],
            value: self.hist_values[i],
        }
    }

    pub fn first_forecast(&self) -> ForecastPoint {
        self.points[0]
    }

    pub fn last_forecast(&self) -> ForecastPoint {
        self.points[FORECAST_HORIZON - 1]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn raw(lo: [f64; 6], fc: [f64; 6], hi: [f64; 6]) -> RawForecast {
        RawForecast {
            hist_x: vec![2023, 2024, 2025],
            hist_y: vec![10.0, 11.0, 12.0],
            fc: fc.to_vec(),
            lo: lo.to_vec(),
            hi: hi.to_vec(),
            fc_yrs: vec![2026, 2027, 2028, 2029, 2030, 2031],
        }
    }

    #[test]
    fn accepts_well_formed_interval() {
        let f = ForecastSeries::new(
            Category::Radio,
            raw([0.0; 6], [13.0, 14.0, 15.0, 16.0, 17.0, 18.0], [20.0; 6]),
        )
        .unwrap();
        assert_eq!(f.last_historical(), YearValue { year: 2025, value: 12.0 });
        assert_eq!(f.first_forecast().year, 2026);
        assert_eq!(f.last_forecast().central, 18.0);
        assert_eq!(f.first_historical().year, 2023);
    }

    #[test]
    fn rejects_central_above_upper_without_clamping() {
        let err = ForecastSeries::new(
            Category::Radio,
            raw([0.0; 6], [13.0, 14.0, 25.0, 16.0, 17.0, 18.0], [20.0; 6]),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::ForecastBounds { year: 2028, .. }));
    }

    #[test]
    fn rejects_lower_above_central() {
        let err = ForecastSeries::new(
            Category::Radio,
            raw([14.0, 0.0, 0.0, 0.0, 0.0, 0.0], [13.0; 6], [20.0; 6]),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::ForecastBounds { year: 2026, .. }));
    }

    #[test]
    fn rejects_wrong_horizon_and_overlap() {
        let mut r = raw([0.0; 6], [1.0; 6], [2.0; 6]);
        r.fc_yrs.pop();
        assert!(matches!(
            ForecastSeries::new(Category::Radio, r),
            Err(SchemaError::ForecastShape { .. })
        ));

        let mut r = raw([0.0; 6], [1.0; 6], [2.0; 6]);
        r.fc_yrs = vec![2025, 2026, 2027, 2028, 2029, 2030];
        assert!(matches!(
            ForecastSeries::new(Category::Radio, r),
            Err(SchemaError::ForecastShape { .. })
        ));
    }
}
