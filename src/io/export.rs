//! Export derived outputs to JSON and CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::app::pipeline::Dashboard;
use crate::dataset::Dataset;
use crate::domain::{Category, YoyPoint};
use crate::error::AppError;
use crate::metrics::stacked_share_by_year;

/// Write the full dashboard as pretty-printed JSON.
pub fn write_dashboard_json(path: &Path, dashboard: &Dashboard) -> Result<(), AppError> {
    let file = create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, dashboard)
        .map_err(|e| AppError::new(4, format!("Failed to write dashboard JSON: {e}")))?;
    writeln!(writer).map_err(|e| AppError::new(4, format!("Failed to write dashboard JSON: {e}")))?;
    info!(path = %path.display(), "wrote dashboard JSON");
    Ok(())
}

/// Year x category share table. One column per tracked category, in declared order.
pub fn write_shares_csv(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let mut file = create(path)?;

    let header: Vec<&str> = Category::TRACKED.iter().map(|c| c.code()).collect();
    writeln!(file, "year,{}", header.join(","))
        .map_err(|e| AppError::new(4, format!("Failed to write shares CSV header: {e}")))?;

    for (year, shares) in stacked_share_by_year(dataset) {
        let cells: Vec<String> = shares.iter().map(|(_, s)| format!("{s:.4}")).collect();
        writeln!(file, "{year},{}", cells.join(","))
            .map_err(|e| AppError::new(4, format!("Failed to write shares CSV row: {e}")))?;
    }

    info!(path = %path.display(), "wrote shares CSV");
    Ok(())
}

/// YoY growth per year. Undefined growth is an empty cell.
pub fn write_growth_csv(path: &Path, category: Category, yoy: &[YoyPoint]) -> Result<(), AppError> {
    let mut file = create(path)?;

    writeln!(file, "year,category,yoy_percent")
        .map_err(|e| AppError::new(4, format!("Failed to write growth CSV header: {e}")))?;
    for p in yoy {
        writeln!(
            file,
            "{},{},{}",
            p.year,
            category.code(),
            p.percent.map(|v| format!("{v:.4}")).unwrap_or_default()
        )
        .map_err(|e| AppError::new(4, format!("Failed to write growth CSV row: {e}")))?;
    }

    info!(path = %path.display(), "wrote growth CSV");
    Ok(())
}

/// Write the standard export set into `dir`, returning the files written.
pub fn write_all(dir: &Path, dataset: &Dataset, dashboard: &Dashboard) -> Result<Vec<PathBuf>, AppError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AppError::new(4, format!("Failed to create export dir '{}': {e}", dir.display())))?;

    let dashboard_path = dir.join("dashboard.json");
    let shares_path = dir.join("shares.csv");
    let growth_path = dir.join("growth_total.csv");

    write_dashboard_json(&dashboard_path, dashboard)?;
    write_shares_csv(&shares_path, dataset)?;
    write_growth_csv(&growth_path, Category::Total, &dashboard.trends.yoy)?;

    Ok(vec![dashboard_path, shares_path, growth_path])
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path).map_err(|e| AppError::new(4, format!("Failed to create '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::{ViewState, build_dashboard};

    #[test]
    fn growth_csv_leaves_undefined_cells_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("growth.csv");
        let yoy = [
            YoyPoint { year: 2007, percent: None },
            YoyPoint { year: 2008, percent: Some(12.5) },
        ];
        write_growth_csv(&path, Category::Digital, &yoy).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "year,category,yoy_percent\n2007,digital,\n2008,digital,12.5000\n");
    }

    #[test]
    fn write_all_produces_three_files() {
        let ds = Dataset::embedded().unwrap();
        let dash = build_dashboard(&ds, &ViewState::for_dataset(&ds)).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let written = write_all(dir.path(), &ds, &dash).unwrap();
        assert_eq!(written.len(), 3);

        let shares = std::fs::read_to_string(dir.path().join("shares.csv")).unwrap();
        assert_eq!(shares.lines().count(), 32);
        assert!(shares.starts_with("year,tv_nac,"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(json["headline"]["last_year"], 2025);
        assert_eq!(json["ranking"]["ranked"][0][0], "digital");
    }
}
