//! Shared "dashboard pipeline" used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the derived-metric wiring:
//! dataset -> growth / shares / rankings / bridges -> view structs
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::{Dataset, ForecastPoint};
use crate::domain::{Category, Covariate, RegressionFit, StructuralBreak, Trend, YearValue, YoyPoint};
use crate::error::MetricError;
use crate::metrics::{
    ForecastBridge, forecast_anchor_bridge, rank_by_absolute_correlation, rank_year, share_of_total,
    share_series, stacked_share_by_year, trend, year_over_year_growth,
};

/// Years offered by the share snapshot selector.
pub const SNAPSHOT_YEARS: [i32; 3] = [2008, 2016, 2025];

/// Categories shown in the forecast interval table, in column order.
pub const FORECAST_TABLE_CATEGORIES: [Category; 6] = [
    Category::Total,
    Category::TvNacional,
    Category::Prensa,
    Category::Radio,
    Category::Digital,
    Category::Exterior,
];

/// Covariates plotted against total spend on the correlations tab.
pub const SCATTER_COVARIATES: [Covariate; 2] = [Covariate::Trm, Covariate::Ipc];

/// Correlation label the ranking is computed against.
pub const CORRELATION_REFERENCE: &str = "Total";

/// Dashboard tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Trends,
    Forecast,
    Media,
    Digital,
    Correlations,
    Models,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Trends,
        Tab::Forecast,
        Tab::Media,
        Tab::Digital,
        Tab::Correlations,
        Tab::Models,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Trends => "Trends",
            Tab::Forecast => "Forecast",
            Tab::Media => "Media",
            Tab::Digital => "Digital",
            Tab::Correlations => "Correlations",
            Tab::Models => "Models",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }
}

/// How the Trends tab draws the total.
///
/// `Line` stands in for the line, area and bar renderings of the total, which
/// look alike at terminal resolution. `StackedShare` replaces the stacked area
/// view with cumulative share outlines per medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendMode {
    Line,
    StackedShare,
}

impl TrendMode {
    pub fn toggle(self) -> TrendMode {
        match self {
            TrendMode::Line => TrendMode::StackedShare,
            TrendMode::StackedShare => TrendMode::Line,
        }
    }
}

/// UI selections. Only `category` and `snapshot_year` change derived values;
/// the rest is presentation state carried alongside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub tab: Tab,
    pub category: Category,
    pub snapshot_year: i32,
    pub trend_mode: TrendMode,
}

impl ViewState {
    /// `Total`, the last historical year, first tab.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        Self {
            tab: Tab::Trends,
            category: Category::Total,
            snapshot_year: dataset.last_year(),
            trend_mode: TrendMode::Line,
        }
    }

    /// Step through [`SNAPSHOT_YEARS`] that exist on the dataset's axis.
    pub fn cycle_snapshot(&mut self, dataset: &Dataset, forward: bool) {
        let years: Vec<i32> = SNAPSHOT_YEARS
            .iter()
            .copied()
            .filter(|y| dataset.year_index(*y).is_some())
            .collect();
        if years.is_empty() {
            return;
        }
        let pos = years.iter().position(|y| *y == self.snapshot_year);
        let next = match (pos, forward) {
            (None, _) => years.len() - 1,
            (Some(i), true) => (i + 1) % years.len(),
            (Some(i), false) => (i + years.len() - 1) % years.len(),
        };
        self.snapshot_year = years[next];
    }
}

/// Headline KPIs.
#[derive(Debug, Clone, Serialize)]
pub struct Headline {
    pub last_year: i32,
    pub total_last: f64,
    /// Total growth vs the previous year; `None` when undefined.
    pub total_yoy: Option<f64>,
    pub digital_share: f64,
    pub cagr_total: f64,
    pub cagr_digital: f64,
    pub forecast_year: i32,
    pub forecast_total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendView {
    pub total: Vec<YearValue>,
    pub yoy: Vec<YoyPoint>,
    pub shares: BTreeMap<i32, Vec<(Category, f64)>>,
    pub breaks: Vec<StructuralBreak>,
    /// Inflation in percent, every year.
    pub ipc: Vec<YearValue>,
    /// COP/USD exchange rate, every year.
    pub trm: Vec<YearValue>,
}

/// One macro covariate paired year by year with total spend.
#[derive(Debug, Clone, Serialize)]
pub struct CovariateScatter {
    pub covariate: Covariate,
    /// `(covariate, total)` per year; IPC is in percent.
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastView {
    pub category: Category,
    pub span: (i32, i32),
    pub history: Vec<YearValue>,
    pub bridge: ForecastBridge,
    pub points: Vec<ForecastPoint>,
    pub cagr: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingView {
    pub year: i32,
    pub ranked: Vec<(Category, f64)>,
    /// Share of the year's total, parallel to `ranked`.
    pub shares: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DigitalView {
    /// Digital spend from its first active year.
    pub spend: Vec<YearValue>,
    /// Digital share of total, every year.
    pub share: Vec<YearValue>,
    /// Internet penetration in percent, every year.
    pub internet: Vec<YearValue>,
    pub regression: RegressionFit,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelRow {
    pub category: Category,
    pub span: (i32, i32),
    pub aic: f64,
    pub bic: f64,
    pub rmse: f64,
    pub cagr: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastTableRow {
    pub year: i32,
    pub cells: Vec<(Category, ForecastPoint)>,
}

/// Every derived value the presentation layer needs for one set of selections.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub headline: Headline,
    pub trends: TrendView,
    pub forecast: ForecastView,
    pub ranking: RankingView,
    pub digital: DigitalView,
    pub correlations: Vec<(String, f64)>,
    pub scatters: Vec<CovariateScatter>,
    pub models: Vec<ModelRow>,
    pub forecast_table: Vec<ForecastTableRow>,
}

/// Build the dashboard for the given selections.
pub fn build_dashboard(dataset: &Dataset, view: &ViewState) -> Result<Dashboard, MetricError> {
    Ok(Dashboard {
        headline: headline(dataset),
        trends: trend_view(dataset),
        forecast: forecast_view(dataset, view.category),
        ranking: ranking_view(dataset, view.snapshot_year)?,
        digital: digital_view(dataset),
        correlations: rank_by_absolute_correlation(dataset.correlation(), CORRELATION_REFERENCE)?,
        scatters: SCATTER_COVARIATES
            .iter()
            .map(|&c| covariate_scatter(dataset, c))
            .collect(),
        models: model_rows(dataset),
        forecast_table: forecast_table(dataset),
    })
}

pub fn headline(dataset: &Dataset) -> Headline {
    let total = dataset.series(Category::Total);
    let digital = dataset.series(Category::Digital);
    let total_last = total.last().copied().unwrap_or_default();
    let digital_last = digital.last().copied().unwrap_or_default();
    let total_yoy = year_over_year_growth(dataset.years(), total)
        .last()
        .and_then(|p| p.percent);
    let forecast = dataset.forecast(Category::Total).last_forecast();

    Headline {
        last_year: dataset.last_year(),
        total_last,
        total_yoy,
        digital_share: share_of_total(digital_last, total_last),
        cagr_total: dataset.cagr(Category::Total),
        cagr_digital: dataset.cagr(Category::Digital),
        forecast_year: forecast.year,
        forecast_total: forecast.central,
    }
}

pub fn trend_view(dataset: &Dataset) -> TrendView {
    let total = dataset.series(Category::Total);
    TrendView {
        total: zip_years(dataset.years(), total),
        yoy: year_over_year_growth(dataset.years(), total),
        shares: stacked_share_by_year(dataset),
        breaks: dataset.breaks().to_vec(),
        ipc: covariate_series(dataset, Covariate::Ipc),
        trm: covariate_series(dataset, Covariate::Trm),
    }
}

pub fn covariate_scatter(dataset: &Dataset, covariate: Covariate) -> CovariateScatter {
    let points = covariate_series(dataset, covariate)
        .iter()
        .zip(dataset.series(Category::Total))
        .map(|(p, &total)| (p.value, total))
        .collect();
    CovariateScatter { covariate, points }
}

/// Fractional covariates are scaled to percent; TRM is kept in pesos.
fn covariate_series(dataset: &Dataset, covariate: Covariate) -> Vec<YearValue> {
    let scale = match covariate {
        Covariate::Trm => 1.0,
        Covariate::Ipc | Covariate::Internet => 100.0,
    };
    dataset
        .years()
        .iter()
        .zip(dataset.covariate(covariate))
        .map(|(&year, &v)| YearValue { year, value: v * scale })
        .collect()
}

pub fn forecast_view(dataset: &Dataset, category: Category) -> ForecastView {
    let forecast = dataset.forecast(category);
    ForecastView {
        category,
        span: dataset.real_span(category),
        history: zip_years(forecast.hist_years(), forecast.hist_values()),
        bridge: forecast_anchor_bridge(forecast),
        points: forecast.points().to_vec(),
        cagr: dataset.cagr(category),
    }
}

pub fn ranking_view(dataset: &Dataset, year: i32) -> Result<RankingView, MetricError> {
    let ranked = rank_year(dataset, year)?;
    let total = dataset.value_at(Category::Total, year).unwrap_or_default();
    let shares = ranked.iter().map(|(_, v)| share_of_total(*v, total)).collect();
    Ok(RankingView { year, ranked, shares })
}

pub fn digital_view(dataset: &Dataset) -> DigitalView {
    let years = dataset.years();
    let start = dataset
        .first_active_year(Category::Digital)
        .and_then(|y| dataset.year_index(y))
        .unwrap_or(years.len());
    let spend = zip_years(&years[start..], &dataset.series(Category::Digital)[start..]);
    let internet = covariate_series(dataset, Covariate::Internet);

    DigitalView {
        spend,
        share: share_series(dataset, Category::Digital),
        internet,
        regression: dataset.regression().clone(),
    }
}

pub fn model_rows(dataset: &Dataset) -> Vec<ModelRow> {
    Category::ALL
        .iter()
        .map(|&category| {
            let m = dataset.metrics(category);
            ModelRow {
                category,
                span: dataset.real_span(category),
                aic: m.aic,
                bic: m.bic,
                rmse: m.rmse,
                cagr: m.cagr,
                trend: trend(m.cagr),
            }
        })
        .collect()
}

pub fn forecast_table(dataset: &Dataset) -> Vec<ForecastTableRow> {
    let years: Vec<i32> = dataset
        .forecast(Category::Total)
        .points()
        .iter()
        .map(|p| p.year)
        .collect();

    years
        .iter()
        .enumerate()
        .map(|(i, &year)| ForecastTableRow {
            year,
            cells: FORECAST_TABLE_CATEGORIES
                .iter()
                .map(|&c| (c, dataset.forecast(c).points()[i]))
                .collect(),
        })
        .collect()
}

fn zip_years(years: &[i32], values: &[f64]) -> Vec<YearValue> {
    years
        .iter()
        .zip(values)
        .map(|(&year, &value)| YearValue { year, value })
        .collect()
}
