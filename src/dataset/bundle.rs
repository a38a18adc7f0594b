//! Wire shape of the statistics bundle.
//!
//! These structs mirror the JSON document field-for-field. They carry no
//! invariants of their own; `Dataset::from_raw` validates them.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::{ModelMetrics, RegressionFit, StructuralBreak};

/// The bundle compiled into the binary.
pub const EMBEDDED_BUNDLE: &str = include_str!("../../data/bundle.json");

#[derive(Debug, Clone, Deserialize)]
pub struct RawBundle {
    pub hist: RawHistory,
    pub cagr: BTreeMap<String, f64>,
    pub forecast: BTreeMap<String, RawForecast>,
    pub regression: RegressionFit,
    pub corr: Vec<Vec<f64>>,
    pub corr_labels: Vec<String>,
    pub metrics: BTreeMap<String, ModelMetrics>,
    #[serde(default)]
    pub breaks: Vec<StructuralBreak>,
}

/// Historical series keyed by category code, aligned to `years`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHistory {
    pub years: Vec<i32>,
    /// National + local TV. Informational; not one of the tracked categories.
    #[serde(default)]
    pub tv: Option<Vec<f64>>,
    pub tv_nac: Vec<f64>,
    pub tv_local: Vec<f64>,
    pub prensa: Vec<f64>,
    pub radio: Vec<f64>,
    pub digital: Vec<f64>,
    pub revistas: Vec<f64>,
    pub exterior: Vec<f64>,
    pub total: Vec<f64>,
    pub ipc: Vec<f64>,
    pub trm: Vec<f64>,
    pub internet: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawForecast {
    pub hist_x: Vec<i32>,
    pub hist_y: Vec<f64>,
    pub fc: Vec<f64>,
    pub lo: Vec<f64>,
    pub hi: Vec<f64>,
    pub fc_yrs: Vec<i32>,
}

impl RawHistory {
    /// Take the series stored under a category's code.
    pub(crate) fn take_category(&mut self, code: &str) -> Vec<f64> {
        let slot = match code {
            "tv_nac" => &mut self.tv_nac,
            "tv_local" => &mut self.tv_local,
            "prensa" => &mut self.prensa,
            "radio" => &mut self.radio,
            "digital" => &mut self.digital,
            "revistas" => &mut self.revistas,
            "exterior" => &mut self.exterior,
            "total" => &mut self.total,
            "ipc" => &mut self.ipc,
            "trm" => &mut self.trm,
            "internet" => &mut self.internet,
            _ => return Vec::new(),
        };
        std::mem::take(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_bundle_parses() {
        let raw: RawBundle = serde_json::from_str(EMBEDDED_BUNDLE).unwrap();
        assert_eq!(raw.hist.years.len(), 31);
        assert_eq!(raw.forecast.len(), 8);
        assert_eq!(raw.corr_labels.len(), raw.corr.len());
        assert_eq!(raw.breaks.len(), 5);
    }
}
