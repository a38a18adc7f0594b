//! Continuity segment between history and forecast.

use serde::Serialize;

use crate::dataset::ForecastSeries;

/// The two endpoints joining the last observed point to the first forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastBridge {
    pub year0: i32,
    pub value0: f64,
    pub year1: i32,
    pub value1: f64,
}

/// Pair the last historical point with the first central forecast, verbatim.
pub fn forecast_anchor_bridge(forecast: &ForecastSeries) -> ForecastBridge {
    let last = forecast.last_historical();
    let first = forecast.first_forecast();
    ForecastBridge {
        year0: last.year,
        value0: last.value,
        year1: first.year,
        value1: first.central,
    }
}
