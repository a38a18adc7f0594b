//! `adspend` library crate.
//!
//! The binary (`adspend`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the dataset, metrics and pipeline are reusable by other front-ends
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod dataset;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod metrics;
pub mod plot;
pub mod report;
pub mod tui;
