//! Growth rates: year-over-year and compound annual.

use crate::dataset::Dataset;
use crate::domain::{Category, Trend, YoyPoint};
use crate::error::MetricError;

/// Year-over-year growth in percent.
///
/// The output has one point per input year. The first year has no prior
/// value, so its `percent` is `None`; so is any year whose previous value is
/// zero. Undefined points are never dropped or zero-filled.
pub fn year_over_year_growth(years: &[i32], series: &[f64]) -> Vec<YoyPoint> {
    years
        .iter()
        .zip(series)
        .enumerate()
        .map(|(i, (&year, &value))| {
            let percent = if i == 0 {
                None
            } else {
                let prev = series[i - 1];
                (prev != 0.0).then(|| (value - prev) / prev * 100.0)
            };
            YoyPoint { year, percent }
        })
        .collect()
}

/// Compound annual growth rate in percent.
///
/// `((last / first)^(1 / years) - 1) * 100`
pub fn compound_annual_growth_rate(first: f64, last: f64, years: f64) -> Result<f64, MetricError> {
    if !(first > 0.0) {
        return Err(MetricError::InvalidRange(format!(
            "CAGR base value must be > 0, got {first}"
        )));
    }
    if !(years > 0.0) {
        return Err(MetricError::InvalidRange(format!(
            "CAGR span must be > 0 years, got {years}"
        )));
    }
    Ok(((last / first).powf(1.0 / years) - 1.0) * 100.0)
}

/// CAGR over the category's own real span (not the shared axis).
///
/// Reproduces the embedded per-category figures, which start at each
/// category's first real observation.
pub fn category_cagr(dataset: &Dataset, category: Category) -> Result<f64, MetricError> {
    let forecast = dataset.forecast(category);
    let first = forecast.first_historical();
    let last = forecast.last_historical();
    compound_annual_growth_rate(first.value, last.value, f64::from(last.year - first.year))
}

/// Classify a CAGR (percent) into a trend bucket.
pub fn trend(cagr: f64) -> Trend {
    if cagr > 5.0 {
        Trend::Growing
    } else if cagr > 0.0 {
        Trend::RisingSlightly
    } else if cagr > -3.0 {
        Trend::FallingSlightly
    } else {
        Trend::Declining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_ratio_series_has_constant_growth() {
        let years = [2000, 2001, 2002, 2003, 2004];
        let series = [100.0, 110.0, 121.0, 133.1, 146.41];
        let yoy = year_over_year_growth(&years, &series);

        assert_eq!(yoy.len(), 5);
        assert_eq!(yoy[0], YoyPoint { year: 2000, percent: None });
        for p in &yoy[1..] {
            let v = p.percent.unwrap();
            assert!((v - 10.0).abs() < 1e-9, "expected 10%, got {v}");
        }
    }

    #[test]
    fn zero_previous_value_is_undefined() {
        let yoy = year_over_year_growth(&[1, 2, 3, 4], &[0.0, 0.0, 50.0, 75.0]);
        assert_eq!(yoy[1].percent, None);
        assert_eq!(yoy[2].percent, None);
        assert!((yoy[3].percent.unwrap() - 50.0).abs() < 1e-12);
    }

    #[test]
    fn empty_series_yields_nothing() {
        assert!(year_over_year_growth(&[], &[]).is_empty());
    }

    #[test]
    fn cagr_doubling_over_ten_years() {
        let v = compound_annual_growth_rate(100.0, 200.0, 10.0).unwrap();
        assert!((v - 7.177).abs() < 1e-3, "got {v}");
    }

    #[test]
    fn cagr_rejects_non_positive_inputs() {
        assert!(matches!(
            compound_annual_growth_rate(0.0, 200.0, 10.0),
            Err(MetricError::InvalidRange(_))
        ));
        assert!(matches!(
            compound_annual_growth_rate(-5.0, 200.0, 10.0),
            Err(MetricError::InvalidRange(_))
        ));
        assert!(matches!(
            compound_annual_growth_rate(100.0, 200.0, 0.0),
            Err(MetricError::InvalidRange(_))
        ));
    }

    #[test]
    fn declining_series_has_negative_cagr() {
        let v = compound_annual_growth_rate(200.0, 100.0, 10.0).unwrap();
        assert!(v < 0.0);
    }

    #[test]
    fn span_cagr_matches_embedded_figures() {
        let ds = Dataset::embedded().unwrap();
        for c in Category::ALL {
            let computed = category_cagr(&ds, c).unwrap();
            let embedded = ds.cagr(c);
            assert!(
                (computed - embedded).abs() < 0.02,
                "{}: computed {computed:.3} vs embedded {embedded}",
                c.display_name()
            );
        }
    }

    #[test]
    fn trend_buckets() {
        assert_eq!(trend(28.97), Trend::Growing);
        assert_eq!(trend(3.32), Trend::RisingSlightly);
        assert_eq!(trend(-1.79), Trend::FallingSlightly);
        assert_eq!(trend(-5.09), Trend::Declining);
    }
}
