//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the tracing subscriber
//! - loads and validates the bundle once
//! - dispatches to a report printer, an exporter or the TUI

use std::path::Path;

use clap::Parser;
use tracing::{info, warn};

use crate::cli::{Cli, Command, CorrArgs, ForecastArgs, GrowthArgs, RankArgs};
use crate::dataset::{BundleSource, Dataset};
use crate::error::AppError;
use crate::logging::LogTarget;
use crate::metrics::{rank_by_absolute_correlation, year_over_year_growth};

pub mod pipeline;

use pipeline::{ViewState, build_dashboard};

/// Entry point for the `adspend` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is normal; only the variables it would set matter.
    let _ = dotenvy::dotenv();

    // We want `adspend` and `adspend --bundle x.json` to behave like `adspend tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    let log_target = match cli.command {
        Command::Tui => LogTarget::File(cli.log_file.clone()),
        _ => LogTarget::Stderr,
    };
    crate::logging::init(&log_target)?;

    let source = match &cli.bundle {
        Some(path) => BundleSource::File(path.clone()),
        None => BundleSource::Embedded,
    };
    let dataset = crate::dataset::load(&source)?;
    info!(years = dataset.years().len(), "bundle loaded");

    match cli.command {
        Command::Summary => handle_summary(&dataset),
        Command::Forecast(args) => handle_forecast(&dataset, &args),
        Command::Rank(args) => handle_rank(&dataset, &args),
        Command::Growth(args) => handle_growth(&dataset, &args),
        Command::Corr(args) => handle_corr(&dataset, &args),
        Command::Models => {
            print!("{}", crate::report::format_models_table(&pipeline::model_rows(&dataset)));
            Ok(())
        }
        Command::Validate => handle_validate(&dataset),
        Command::Export(args) => handle_export(&dataset, &args.out),
        Command::Diagnostics(args) => {
            let path = crate::diagnostics::write_diagnostics_report(&args.dir, &dataset)?;
            println!("Wrote diagnostics: {}", path.display());
            Ok(())
        }
        Command::Tui => crate::tui::run(dataset),
    }
}

fn handle_summary(dataset: &Dataset) -> Result<(), AppError> {
    let dashboard = build_dashboard(dataset, &ViewState::for_dataset(dataset))?;
    println!("{}", crate::report::format_headline(&dashboard.headline));
    print!("{}", crate::report::format_forecast_table(&dashboard.forecast_table));
    Ok(())
}

fn handle_forecast(dataset: &Dataset, args: &ForecastArgs) -> Result<(), AppError> {
    let view = pipeline::forecast_view(dataset, args.category);
    print!("{}", crate::report::format_forecast_view(&view));
    if args.plot {
        println!();
        print!("{}", crate::plot::render_forecast_plot(&view, args.width, args.height));
    }
    Ok(())
}

fn handle_rank(dataset: &Dataset, args: &RankArgs) -> Result<(), AppError> {
    let year = args.year.unwrap_or_else(|| dataset.last_year());
    let ranking = pipeline::ranking_view(dataset, year)?;
    print!("{}", crate::report::format_ranking(&ranking));
    Ok(())
}

fn handle_growth(dataset: &Dataset, args: &GrowthArgs) -> Result<(), AppError> {
    let values = dataset.series(args.category);
    let yoy = year_over_year_growth(dataset.years(), values);
    print!(
        "{}",
        crate::report::format_growth(args.category, dataset.years(), values, &yoy)
    );
    Ok(())
}

fn handle_corr(dataset: &Dataset, args: &CorrArgs) -> Result<(), AppError> {
    let ranked = rank_by_absolute_correlation(dataset.correlation(), &args.reference)?;
    print!("{}", crate::report::format_correlation_ranking(&args.reference, &ranked));
    Ok(())
}

fn handle_validate(dataset: &Dataset) -> Result<(), AppError> {
    let gaps = dataset.reconciliation_gaps();
    if !gaps.is_empty() {
        warn!(years = gaps.len(), "total does not reconcile with category sum");
    }
    print!("{}", crate::report::format_validation(dataset, &gaps));
    Ok(())
}

fn handle_export(dataset: &Dataset, out: &Path) -> Result<(), AppError> {
    let dashboard = build_dashboard(dataset, &ViewState::for_dataset(dataset))?;
    for path in crate::io::export::write_all(out, dataset, &dashboard)? {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Rewrite argv so `adspend` defaults to `adspend tui`.
///
/// Rules:
/// - `adspend`                      -> `adspend tui`
/// - `adspend --bundle x.json ...`  -> `adspend tui --bundle x.json ...`
/// - `adspend --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    // Global flags may precede a subcommand (`adspend --bundle x.json summary`),
    // so only insert `tui` when no subcommand appears anywhere.
    let has_subcommand = argv[1..].iter().any(|a| SUBCOMMANDS.contains(&a.as_str()));
    if !has_subcommand && arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }

    argv
}

const SUBCOMMANDS: [&str; 10] = [
    "summary",
    "forecast",
    "rank",
    "growth",
    "corr",
    "models",
    "validate",
    "export",
    "diagnostics",
    "tui",
];
