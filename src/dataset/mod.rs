//! Dataset store: parse, validate and expose the statistics bundle.
//!
//! A [`Dataset`] is built once at startup and then only borrowed. There is no
//! process-wide cache; callers hold the value and pass references around.
//!
//! Validation is all-or-nothing. Any schema or invariant violation returns a
//! [`SchemaError`] and no dataset.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::{Category, Covariate, ModelMetrics, RegressionFit, StructuralBreak};
use crate::error::SchemaError;

pub mod bundle;
pub mod correlation;
pub mod forecast;
mod validate;

pub use bundle::{EMBEDDED_BUNDLE, RawBundle, RawForecast, RawHistory};
pub use correlation::CorrelationMatrix;
pub use forecast::{FORECAST_HORIZON, ForecastPoint, ForecastSeries};

use validate::{check_finite, check_len, check_non_negative, check_year_axis};

/// Absolute difference (currency units) below which `Total` is considered reconciled.
const RECONCILIATION_TOLERANCE: f64 = 1.0;

/// Where to read the bundle from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleSource {
    Embedded,
    File(PathBuf),
}

/// Load a dataset from the given source.
pub fn load(source: &BundleSource) -> Result<Dataset, SchemaError> {
    match source {
        BundleSource::Embedded => Dataset::embedded(),
        BundleSource::File(path) => Dataset::from_path(path),
    }
}

/// A year where `Total` differs from the sum of the tracked categories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconciliationGap {
    pub year: i32,
    pub total: f64,
    pub tracked_sum: f64,
}

impl ReconciliationGap {
    /// `total - tracked_sum`. Negative when the categories over-count.
    pub fn gap(&self) -> f64 {
        self.total - self.tracked_sum
    }
}

/// Immutable, validated statistics bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    years: Vec<i32>,
    /// Indexed by `Category::ordinal()`.
    series: Vec<Vec<f64>>,
    tv_aggregate: Option<Vec<f64>>,
    /// Indexed like `Covariate::ALL`.
    covariates: Vec<Vec<f64>>,
    /// Indexed by `Category::ordinal()`.
    forecasts: Vec<ForecastSeries>,
    /// Indexed by `Category::ordinal()`.
    metrics: Vec<ModelMetrics>,
    /// Indexed by `Category::ordinal()`.
    cagr: Vec<f64>,
    correlation: CorrelationMatrix,
    regression: RegressionFit,
    breaks: Vec<StructuralBreak>,
}

impl Dataset {
    /// Load the bundle compiled into the binary.
    pub fn embedded() -> Result<Self, SchemaError> {
        Self::from_json_str(EMBEDDED_BUNDLE)
    }

    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let text = std::fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        info!(path = %path.display(), "loading bundle from file");
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let raw: RawBundle = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    /// Validate a parsed bundle.
    pub fn from_raw(raw: RawBundle) -> Result<Self, SchemaError> {
        let RawBundle {
            mut hist,
            cagr,
            forecast,
            regression,
            corr,
            corr_labels,
            metrics,
            breaks,
        } = raw;

        // (a) shared year axis and aligned series.
        let years = std::mem::take(&mut hist.years);
        check_year_axis("hist.years", &years)?;

        let mut series = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let values = hist.take_category(category.code());
            let name = format!("hist.{}", category.code());
            check_len(&name, years.len(), values.len())?;
            check_non_negative(&name, &years, &values)?;
            series.push(values);
        }

        let mut covariates = Vec::with_capacity(Covariate::ALL.len());
        for covariate in Covariate::ALL {
            let values = hist.take_category(covariate.code());
            let name = format!("hist.{}", covariate.code());
            check_len(&name, years.len(), values.len())?;
            check_finite(&name, &years, &values)?;
            covariates.push(values);
        }

        let tv_aggregate = match hist.tv.take() {
            Some(values) => {
                check_len("hist.tv", years.len(), values.len())?;
                check_non_negative("hist.tv", &years, &values)?;
                Some(values)
            }
            None => None,
        };

        // (b) forecasts, (d) category references.
        let mut forecast = resolve_categories("forecast", forecast)?;
        let mut forecasts = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let raw = forecast.remove(&category).ok_or_else(|| SchemaError::MissingCategory {
                section: "forecast",
                name: category.display_name().to_string(),
            })?;
            forecasts.push(ForecastSeries::new(category, raw)?);
        }

        let metrics_by_cat = resolve_categories("metrics", metrics)?;
        let metrics = require_all("metrics", &metrics_by_cat)?;
        for (category, m) in Category::ALL.iter().zip(&metrics) {
            let values = [m.aic, m.bic, m.rmse, m.cagr];
            if values.iter().any(|v| !v.is_finite()) {
                return Err(SchemaError::NonFinite {
                    series: format!("metrics.{}", category.display_name()),
                    year: 0,
                });
            }
        }

        let cagr_by_cat = resolve_categories("cagr", cagr)?;
        let cagr = require_all("cagr", &cagr_by_cat)?;

        // (c) correlation matrix.
        let correlation = CorrelationMatrix::new(corr_labels, &corr)?;

        check_len(
            "regression.y_scatter",
            regression.x_scatter.len(),
            regression.y_scatter.len(),
        )?;
        check_len(
            "regression.yr_scatter",
            regression.x_scatter.len(),
            regression.yr_scatter.len(),
        )?;
        check_len("regression.y_line", regression.x_line.len(), regression.y_line.len())?;

        debug!(
            years = years.len(),
            labels = correlation.dim(),
            breaks = breaks.len(),
            "bundle validated"
        );

        Ok(Self {
            years,
            series,
            tv_aggregate,
            covariates,
            forecasts,
            metrics,
            cagr,
            correlation,
            regression,
            breaks,
        })
    }

    /// Shared historical year axis (strictly increasing).
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn first_year(&self) -> i32 {
        self.years.first().copied().unwrap_or_default()
    }

    pub fn last_year(&self) -> i32 {
        self.years.last().copied().unwrap_or_default()
    }

    pub fn year_index(&self, year: i32) -> Option<usize> {
        self.years.binary_search(&year).ok()
    }

    /// Historical values of a category on the shared axis.
    pub fn series(&self, category: Category) -> &[f64] {
        &self.series[category.ordinal()]
    }

    pub fn covariate(&self, covariate: Covariate) -> &[f64] {
        let i = Covariate::ALL
            .iter()
            .position(|c| *c == covariate)
            .unwrap_or_default();
        &self.covariates[i]
    }

    /// National + local TV, if the bundle carries it.
    pub fn tv_aggregate(&self) -> Option<&[f64]> {
        self.tv_aggregate.as_deref()
    }

    pub fn value_at(&self, category: Category, year: i32) -> Option<f64> {
        self.year_index(year).map(|i| self.series(category)[i])
    }

    pub fn forecast(&self, category: Category) -> &ForecastSeries {
        &self.forecasts[category.ordinal()]
    }

    pub fn metrics(&self, category: Category) -> &ModelMetrics {
        &self.metrics[category.ordinal()]
    }

    /// Precomputed CAGR (%) over the category's own real span.
    pub fn cagr(&self, category: Category) -> f64 {
        self.cagr[category.ordinal()]
    }

    pub fn correlation(&self) -> &CorrelationMatrix {
        &self.correlation
    }

    pub fn regression(&self) -> &RegressionFit {
        &self.regression
    }

    pub fn breaks(&self) -> &[StructuralBreak] {
        &self.breaks
    }

    /// First and last year of the category's own historical axis.
    ///
    /// Categories do not share a span: Digital starts in 2008 and Exterior in
    /// 2014, while the shared axis starts in 1995.
    pub fn real_span(&self, category: Category) -> (i32, i32) {
        let f = self.forecast(category);
        (f.first_historical().year, f.last_historical().year)
    }

    /// First year on the shared axis with a strictly positive value.
    pub fn first_active_year(&self, category: Category) -> Option<i32> {
        self.years
            .iter()
            .zip(self.series(category))
            .find(|(_, v)| **v > 0.0)
            .map(|(y, _)| *y)
    }

    /// Years where `Total` is not the sum of the tracked categories.
    ///
    /// This is a soft invariant: early years of the source data carry filled
    /// values that do not reconcile.
    pub fn reconciliation_gaps(&self) -> Vec<ReconciliationGap> {
        let total = self.series(Category::Total);
        self.years
            .iter()
            .enumerate()
            .filter_map(|(i, &year)| {
                let tracked_sum: f64 = Category::TRACKED.iter().map(|c| self.series(*c)[i]).sum();
                let gap = ReconciliationGap {
                    year,
                    total: total[i],
                    tracked_sum,
                };
                (gap.gap().abs() > RECONCILIATION_TOLERANCE).then_some(gap)
            })
            .collect()
    }
}

fn resolve_categories<T>(
    section: &'static str,
    entries: BTreeMap<String, T>,
) -> Result<BTreeMap<Category, T>, SchemaError> {
    let mut out = BTreeMap::new();
    for (name, value) in entries {
        let category = Category::from_display_name(&name)
            .ok_or(SchemaError::UnknownCategory { section, name })?;
        out.insert(category, value);
    }
    Ok(out)
}

fn require_all<T: Copy>(section: &'static str, by_cat: &BTreeMap<Category, T>) -> Result<Vec<T>, SchemaError> {
    Category::ALL
        .iter()
        .map(|c| {
            by_cat.get(c).copied().ok_or_else(|| SchemaError::MissingCategory {
                section,
                name: c.display_name().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedded_value() -> serde_json::Value {
        serde_json::from_str(EMBEDDED_BUNDLE).unwrap()
    }

    fn load_value(v: serde_json::Value) -> Result<Dataset, SchemaError> {
        Dataset::from_json_str(&v.to_string())
    }

    #[test]
    fn embedded_bundle_loads() {
        let ds = Dataset::embedded().unwrap();
        assert_eq!(ds.first_year(), 1995);
        assert_eq!(ds.last_year(), 2025);
        assert_eq!(ds.years().len(), 31);
        assert_eq!(ds.series(Category::Digital).len(), 31);
        assert_eq!(ds.covariate(Covariate::Internet).len(), 31);
        assert_eq!(ds.correlation().dim(), 10);
        assert_eq!(ds.breaks().len(), 5);
        assert!(ds.tv_aggregate().is_some());
        assert_eq!(ds.cagr(Category::Digital), 28.97);
        assert_eq!(ds.metrics(Category::Prensa).aic, 567.8);
    }

    #[test]
    fn repeated_loads_are_equal() {
        let a = Dataset::embedded().unwrap();
        let b = Dataset::embedded().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn real_span_tracks_each_category() {
        let ds = Dataset::embedded().unwrap();
        assert_eq!(ds.real_span(Category::Digital), (2008, 2025));
        assert_eq!(ds.real_span(Category::Exterior), (2014, 2025));
        assert_eq!(ds.real_span(Category::Prensa), (2003, 2025));
        assert_eq!(ds.real_span(Category::Total), (1995, 2025));
        assert_eq!(ds.first_active_year(Category::Digital), Some(2008));
    }

    #[test]
    fn value_lookup_by_year() {
        let ds = Dataset::embedded().unwrap();
        assert_eq!(ds.value_at(Category::Revistas, 2025), Some(6839.0));
        assert_eq!(ds.value_at(Category::Revistas, 1990), None);
    }

    #[test]
    fn reconciliation_gaps_only_in_early_years() {
        let ds = Dataset::embedded().unwrap();
        let gaps = ds.reconciliation_gaps();
        assert!(!gaps.is_empty());
        assert!(gaps.iter().all(|g| g.year < 2014));
    }

    #[test]
    fn rejects_forecast_bound_violation() {
        let mut v = embedded_value();
        v["forecast"]["Radio"]["lo"][2] = serde_json::json!(1.0e9);
        let err = load_value(v).unwrap_err();
        assert!(matches!(err, SchemaError::ForecastBounds { .. }));
    }

    #[test]
    fn rejects_asymmetric_correlation() {
        let mut v = embedded_value();
        v["corr"][0][1] = serde_json::json!(0.1);
        let err = load_value(v).unwrap_err();
        assert!(matches!(err, SchemaError::CorrelationAsymmetric { .. }));
    }

    #[test]
    fn rejects_unknown_metrics_category() {
        let mut v = embedded_value();
        v["metrics"]["Cine"] = serde_json::json!({"aic": 1.0, "bic": 1.0, "rmse": 1.0, "cagr": 1.0});
        let err = load_value(v).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownCategory { section: "metrics", .. }));
    }

    #[test]
    fn rejects_unknown_cagr_category() {
        let mut v = embedded_value();
        v["cagr"]["Cine"] = serde_json::json!(2.0);
        let err = load_value(v).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownCategory { section: "cagr", .. }));
    }

    #[test]
    fn rejects_duplicate_year() {
        let mut v = embedded_value();
        v["hist"]["years"][3] = serde_json::json!(1997);
        let err = load_value(v).unwrap_err();
        assert!(matches!(err, SchemaError::YearAxis { .. }));
    }

    #[test]
    fn rejects_gapped_year_axis() {
        let mut v = embedded_value();
        for year in v["hist"]["years"].as_array_mut().unwrap().iter_mut().skip(1) {
            *year = serde_json::json!(year.as_i64().unwrap() + 1);
        }
        let err = load_value(v).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::YearAxis { index: 1, prev: 1995, next: 1997, .. }
        ));
    }

    #[test]
    fn rejects_empty_year_axis() {
        let mut v = embedded_value();
        for (_, series) in v["hist"].as_object_mut().unwrap().iter_mut() {
            *series = serde_json::json!([]);
        }
        let err = load_value(v).unwrap_err();
        assert!(matches!(err, SchemaError::EmptyYearAxis { .. }));
    }

    #[test]
    fn rejects_short_series() {
        let mut v = embedded_value();
        v["hist"]["radio"].as_array_mut().unwrap().pop();
        let err = load_value(v).unwrap_err();
        assert!(matches!(err, SchemaError::LengthMismatch { .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(Dataset::from_json_str("{\"hist\":"), Err(SchemaError::Parse(_))));
        assert!(matches!(Dataset::from_json_str("{}"), Err(SchemaError::Parse(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load(&BundleSource::File(PathBuf::from("/nonexistent/bundle.json"))).unwrap_err();
        assert!(matches!(err, SchemaError::Io { .. }));
    }
}
