//! Derived metrics computed from a [`Dataset`](crate::dataset::Dataset).
//!
//! Every function here is pure: no I/O, no randomness, no clock reads.
//! Inputs are borrowed and never mutated; outputs are freshly allocated.

pub mod bridge;
pub mod correlation;
pub mod growth;
pub mod rank;
pub mod share;

pub use bridge::{ForecastBridge, forecast_anchor_bridge};
pub use correlation::pearson;
pub use growth::{category_cagr, compound_annual_growth_rate, trend, year_over_year_growth};
pub use rank::{rank_by_absolute_correlation, rank_by_value, rank_year};
pub use share::{share_of_total, share_series, stacked_share_by_year};
