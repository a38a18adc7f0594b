//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the fixed category enumeration (`Category`) and macro covariates (`Covariate`)
//! - yearly points (`YearValue`, `YoyPoint`)
//! - opaque precomputed artifacts (`ModelMetrics`, `RegressionFit`, `StructuralBreak`)

pub mod types;

pub use types::*;
