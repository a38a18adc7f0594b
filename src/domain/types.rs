//! Shared domain types.
//!
//! Category order is significant: every ranking breaks ties by the order in
//! which the categories are declared here, never by container iteration order.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A media channel tracked by the dataset, plus the aggregate `Total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    TvNacional,
    TvLocal,
    Prensa,
    Radio,
    Digital,
    Revistas,
    Exterior,
    Total,
}

impl Category {
    /// The individually tracked media, in declared order.
    pub const TRACKED: [Category; 7] = [
        Category::TvNacional,
        Category::TvLocal,
        Category::Prensa,
        Category::Radio,
        Category::Digital,
        Category::Revistas,
        Category::Exterior,
    ];

    /// Tracked media followed by the aggregate.
    pub const ALL: [Category; 8] = [
        Category::TvNacional,
        Category::TvLocal,
        Category::Prensa,
        Category::Radio,
        Category::Digital,
        Category::Revistas,
        Category::Exterior,
        Category::Total,
    ];

    /// Key of the category's series under `hist` in the bundle.
    pub fn code(self) -> &'static str {
        match self {
            Category::TvNacional => "tv_nac",
            Category::TvLocal => "tv_local",
            Category::Prensa => "prensa",
            Category::Radio => "radio",
            Category::Digital => "digital",
            Category::Revistas => "revistas",
            Category::Exterior => "exterior",
            Category::Total => "total",
        }
    }

    /// Key used by the `cagr`, `forecast` and `metrics` sections.
    pub fn display_name(self) -> &'static str {
        match self {
            Category::TvNacional => "TV Nacional",
            Category::TvLocal => "TV Local",
            Category::Prensa => "Prensa",
            Category::Radio => "Radio",
            Category::Digital => "Digital",
            Category::Revistas => "Revistas",
            Category::Exterior => "Exterior",
            Category::Total => "TOTAL",
        }
    }

    pub fn from_display_name(name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.display_name() == name)
    }

    pub fn from_code(code: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Position in the declared order.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Category {
        Category::ALL[(self.ordinal() + 1) % Category::ALL.len()]
    }

    pub fn prev(self) -> Category {
        let n = Category::ALL.len();
        Category::ALL[(self.ordinal() + n - 1) % n]
    }
}

/// Macro covariates aligned on the historical year axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Covariate {
    /// Consumer price inflation, as a fraction.
    Ipc,
    /// COP/USD exchange rate.
    Trm,
    /// Internet penetration, as a fraction of the population.
    Internet,
}

impl Covariate {
    pub const ALL: [Covariate; 3] = [Covariate::Ipc, Covariate::Trm, Covariate::Internet];

    pub fn code(self) -> &'static str {
        match self {
            Covariate::Ipc => "ipc",
            Covariate::Trm => "trm",
            Covariate::Internet => "internet",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Covariate::Ipc => "IPC",
            Covariate::Trm => "TRM",
            Covariate::Internet => "Internet",
        }
    }
}

/// One point of a yearly series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

/// Year-over-year growth for one year.
///
/// `percent` is `None` when growth is undefined: the first year of a series,
/// or any year whose previous value is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YoyPoint {
    pub year: i32,
    pub percent: Option<f64>,
}

/// Direction of a category's long-run growth, as shown in the models table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trend {
    Growing,
    RisingSlightly,
    FallingSlightly,
    Declining,
}

impl Trend {
    pub fn label(self) -> &'static str {
        match self {
            Trend::Growing => "growing",
            Trend::RisingSlightly => "rising slightly",
            Trend::FallingSlightly => "falling slightly",
            Trend::Declining => "declining",
        }
    }
}

/// A structural-break annotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructuralBreak {
    pub year: i32,
    pub delta: f64,
}

/// Precomputed model-fit record for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub aic: f64,
    pub bic: f64,
    pub rmse: f64,
    pub cagr: f64,
}

/// Internet penetration vs digital spend: an opaque precomputed artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionFit {
    pub x_scatter: Vec<f64>,
    pub y_scatter: Vec<f64>,
    pub yr_scatter: Vec<i32>,
    pub x_line: Vec<f64>,
    pub y_line: Vec<f64>,
    pub r2: f64,
    pub slope: f64,
    pub intercept: f64,
    pub p_value: f64,
}
