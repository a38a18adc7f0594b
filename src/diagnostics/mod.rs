//! Diagnostics report writer for inspecting a loaded bundle.
//!
//! The bundle is a set of precomputed artifacts. This report recomputes what
//! can be recomputed from the raw series and lays the two side by side.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use crate::dataset::Dataset;
use crate::domain::{Category, Covariate};
use crate::error::AppError;
use crate::math::fit_line;
use crate::metrics::{category_cagr, pearson};

/// Default output directory for `adspend diagnostics` and the TUI `d` key.
pub const DEFAULT_DIR: &str = "diagnostics";

/// Write a timestamped markdown report into `dir` and return its path.
pub fn write_diagnostics_report(dir: &Path, dataset: &Dataset) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::new(4, format!("Failed to create diagnostics dir: {e}")))?;

    let now = Local::now();
    let path = dir.join(format!("adspend_diagnostics_{}.md", now.format("%Y%m%d_%H%M%S")));
    std::fs::write(&path, render_report(dataset, now))
        .map_err(|e| AppError::new(4, format!("Failed to write diagnostics file: {e}")))?;

    info!(path = %path.display(), "wrote diagnostics report");
    Ok(path)
}

/// Render the report body. Pure apart from the supplied timestamp.
pub fn render_report(dataset: &Dataset, generated: DateTime<Local>) -> String {
    let mut out = String::new();

    out.push_str("# adspend diagnostics\n");
    out.push_str(&format!("- generated: {}\n", generated.to_rfc3339()));
    out.push_str(&format!(
        "- years: {}..{} ({})\n",
        dataset.first_year(),
        dataset.last_year(),
        dataset.years().len()
    ));

    out.push_str("\n## Reconciliation (total vs sum of categories)\n");
    let gaps = dataset.reconciliation_gaps();
    if gaps.is_empty() {
        out.push_str("All years reconcile.\n");
    } else {
        out.push_str("| year | total | sum | gap |\n");
        out.push_str("| - | - | - | - |\n");
        for g in &gaps {
            out.push_str(&format!(
                "| {} | {:.0} | {:.0} | {:.0} |\n",
                g.year,
                g.total,
                g.tracked_sum,
                g.gap()
            ));
        }
    }

    out.push_str("\n## CAGR (embedded vs recomputed over real span)\n");
    out.push_str("| category | span | embedded | recomputed | diff |\n");
    out.push_str("| - | - | - | - | - |\n");
    for category in Category::ALL {
        let (first, last) = dataset.real_span(category);
        let embedded = dataset.cagr(category);
        let recomputed = category_cagr(dataset, category).ok();
        out.push_str(&format!(
            "| {} | {}-{} | {:.2} | {} | {} |\n",
            category.display_name(),
            first,
            last,
            embedded,
            fmt_opt(recomputed, 2),
            fmt_opt(recomputed.map(|r| r - embedded), 3)
        ));
    }

    out.push_str("\n## Regression (internet penetration vs digital spend)\n");
    let reg = dataset.regression();
    let refit = fit_line(&reg.x_scatter, &reg.y_scatter);
    out.push_str("| term | embedded | refit |\n");
    out.push_str("| - | - | - |\n");
    out.push_str(&format!(
        "| slope | {:.2} | {} |\n",
        reg.slope,
        fmt_opt(refit.map(|f| f.slope), 2)
    ));
    out.push_str(&format!(
        "| intercept | {:.2} | {} |\n",
        reg.intercept,
        fmt_opt(refit.map(|f| f.intercept), 2)
    ));
    out.push_str(&format!("| r2 | {:.4} | {} |\n", reg.r2, fmt_opt(refit.map(|f| f.r2), 4)));
    out.push_str(&format!("- p_value (embedded): {:.3e}\n", reg.p_value));

    out.push_str("\n## Correlation with Total (embedded vs Pearson over full axis)\n");
    let matrix = dataset.correlation();
    let total = dataset.series(Category::Total);
    match matrix.index_of("Total") {
        Some(t) => {
            out.push_str("| label | embedded | recomputed |\n");
            out.push_str("| - | - | - |\n");
            for (i, label) in matrix.labels().iter().enumerate() {
                if i == t {
                    continue;
                }
                let recomputed = series_for_label(dataset, label).and_then(|s| pearson(&s, total));
                out.push_str(&format!(
                    "| {} | {:.3} | {} |\n",
                    label,
                    matrix.get(t, i),
                    fmt_opt(recomputed, 3)
                ));
            }
        }
        None => out.push_str("No `Total` label in the correlation matrix.\n"),
    }

    out.push_str("\n## Forecast interval widths (hi - lo, % of central)\n");
    out.push_str("| category | first year | first width | last year | last width |\n");
    out.push_str("| - | - | - | - | - |\n");
    for category in Category::ALL {
        let fc = dataset.forecast(category);
        let (a, b) = (fc.first_forecast(), fc.last_forecast());
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            category.display_name(),
            a.year,
            fmt_width(a.upper - a.lower, a.central),
            b.year,
            fmt_width(b.upper - b.lower, b.central)
        ));
    }

    out
}

/// Raw series behind a correlation label, when one exists.
fn series_for_label(dataset: &Dataset, label: &str) -> Option<Vec<f64>> {
    if label == "Total" {
        return Some(dataset.series(Category::Total).to_vec());
    }
    if label == "TV" {
        return match dataset.tv_aggregate() {
            Some(tv) => Some(tv.to_vec()),
            None => Some(
                dataset
                    .series(Category::TvNacional)
                    .iter()
                    .zip(dataset.series(Category::TvLocal))
                    .map(|(a, b)| a + b)
                    .collect(),
            ),
        };
    }
    if let Some(category) = Category::from_display_name(label) {
        return Some(dataset.series(category).to_vec());
    }
    Covariate::ALL
        .into_iter()
        .find(|c| c.display_name() == label)
        .map(|c| dataset.covariate(c).to_vec())
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => "-".to_string(),
    }
}

fn fmt_width(width: f64, central: f64) -> String {
    if central > 0.0 {
        format!("{:.0} ({:.1}%)", width, width / central * 100.0)
    } else {
        format!("{width:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_has_every_section() {
        let ds = Dataset::embedded().unwrap();
        let text = render_report(&ds, Local::now());
        for heading in [
            "## Reconciliation",
            "## CAGR",
            "## Regression",
            "## Correlation with Total",
            "## Forecast interval widths",
        ] {
            assert!(text.contains(heading), "missing {heading}");
        }
        assert!(text.contains("| slope | 4616800.59 | 4616800.59 |"));
        assert!(text.contains("| Radio | 0.894 | 0.906 |"));
    }

    #[test]
    fn tv_label_uses_aggregate_series() {
        let ds = Dataset::embedded().unwrap();
        let tv = series_for_label(&ds, "TV").unwrap();
        let r = pearson(&tv, ds.series(Category::Total)).unwrap();
        assert!((r - 0.81).abs() < 0.01);
        assert!(series_for_label(&ds, "Cine").is_none());
    }

    #[test]
    fn writes_into_directory() {
        let ds = Dataset::embedded().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_diagnostics_report(&dir.path().join("nested"), &ds).unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("adspend_diagnostics_") && name.ends_with(".md"));
    }
}
