//! Command-line parsing for the advertising investment dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the metric code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Category;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "adspend", version, about = "Advertising investment dashboard (Colombia, 1995-2025)")]
pub struct Cli {
    /// Load the statistics bundle from a JSON file instead of the embedded one.
    #[arg(long, global = true, env = "ADSPEND_BUNDLE", value_name = "JSON")]
    pub bundle: Option<PathBuf>,

    /// Log file used while the TUI owns the terminal.
    #[arg(long, global = true, value_name = "PATH", default_value = crate::logging::DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the headline KPIs and the forecast table.
    Summary,
    /// Print one category's forecast with its 95% interval.
    Forecast(ForecastArgs),
    /// Rank media by spend for one year.
    Rank(RankArgs),
    /// Print year-over-year growth for one category.
    Growth(GrowthArgs),
    /// Rank correlation labels by absolute correlation with a reference.
    Corr(CorrArgs),
    /// Print the precomputed model metrics with derived trends.
    Models,
    /// Validate the bundle and report reconciliation gaps.
    Validate,
    /// Write dashboard JSON plus share and growth CSVs.
    Export(ExportArgs),
    /// Write a markdown diagnostics report comparing embedded and recomputed figures.
    Diagnostics(DiagnosticsArgs),
    /// Launch the interactive TUI.
    Tui,
}

#[derive(Debug, Args, Clone)]
pub struct ForecastArgs {
    #[arg(short, long, value_enum, default_value_t = Category::Total)]
    pub category: Category,

    /// Render an ASCII plot below the table.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct RankArgs {
    /// Year to rank; defaults to the last historical year.
    #[arg(short, long)]
    pub year: Option<i32>,
}

#[derive(Debug, Args, Clone)]
pub struct GrowthArgs {
    #[arg(short, long, value_enum, default_value_t = Category::Total)]
    pub category: Category,
}

#[derive(Debug, Args, Clone)]
pub struct CorrArgs {
    /// Correlation label to rank against.
    #[arg(short, long, default_value = crate::app::pipeline::CORRELATION_REFERENCE)]
    pub reference: String,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// Output directory (created if missing).
    #[arg(short, long, value_name = "DIR")]
    pub out: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct DiagnosticsArgs {
    /// Output directory (created if missing).
    #[arg(short, long, value_name = "DIR", default_value = crate::diagnostics::DEFAULT_DIR)]
    pub dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_category_and_globals() {
        let cli = Cli::parse_from(["adspend", "forecast", "--category", "tv-nacional", "--plot", "--bundle", "b.json"]);
        assert_eq!(cli.bundle, Some(PathBuf::from("b.json")));
        match cli.command {
            Command::Forecast(args) => {
                assert_eq!(args.category, Category::TvNacional);
                assert!(args.plot);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["adspend", "corr"]);
        assert_eq!(cli.log_file, PathBuf::from("adspend.log"));
        match cli.command {
            Command::Corr(args) => assert_eq!(args.reference, "Total"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
