//! Input/output helpers.
//!
//! - dashboard, share and growth exports (JSON/CSV) (`export`)

pub mod export;

pub use export::*;
