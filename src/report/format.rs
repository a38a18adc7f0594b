//! Formatted terminal output for the CLI subcommands.
//!
//! We keep formatting code in one place so:
//! - the metric code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::{ForecastTableRow, ForecastView, Headline, ModelRow, RankingView};
use crate::dataset::{Dataset, ReconciliationGap};
use crate::domain::{Category, YoyPoint};

/// Currency value in millions (`x.xxM`), thousands (`xK`) or units.
pub fn format_value(v: f64) -> String {
    let a = v.abs();
    if a >= 1e6 {
        format!("{:.2}M", v / 1e6)
    } else if a >= 1e3 {
        format!("{:.0}K", v / 1e3)
    } else {
        format!("{v:.0}")
    }
}

/// Signed percentage with one decimal, `n/a` when undefined.
pub fn format_percent(v: Option<f64>) -> String {
    match v {
        Some(p) => format!("{p:+.1}%"),
        None => "n/a".to_string(),
    }
}

pub fn format_headline(h: &Headline) -> String {
    let mut out = String::new();
    out.push_str("=== adspend - Advertising Investment Dashboard ===\n");
    out.push_str(&format!(
        "Total {}: {} ({} vs previous year)\n",
        h.last_year,
        format_value(h.total_last),
        format_percent(h.total_yoy)
    ));
    out.push_str(&format!("Digital share {}: {:.1}%\n", h.last_year, h.digital_share));
    out.push_str(&format!(
        "CAGR total: {:+.2}% | CAGR digital: {:+.2}%\n",
        h.cagr_total, h.cagr_digital
    ));
    out.push_str(&format!(
        "Forecast total {}: {}\n",
        h.forecast_year,
        format_value(h.forecast_total)
    ));
    out
}

/// Forecast table: one row per forecast year, one `central [lo-hi]` cell per category.
pub fn format_forecast_table(rows: &[ForecastTableRow]) -> String {
    let mut out = String::new();
    let Some(first) = rows.first() else {
        return out;
    };

    let mut header = format!("{:<6}", "year");
    let mut rule = format!("{:-<6}", "");
    for (category, _) in &first.cells {
        header.push_str(&format!(" {:>24}", category.display_name()));
        rule.push_str(&format!(" {:-<24}", ""));
    }
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(rule.trim_end());
    out.push('\n');

    for row in rows {
        let mut line = format!("{:<6}", row.year);
        for (_, p) in &row.cells {
            let cell = format!(
                "{} [{}-{}]",
                format_value(p.central),
                format_value(p.lower),
                format_value(p.upper)
            );
            line.push_str(&format!(" {cell:>24}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// History tail, bridge and interval for one category.
pub fn format_forecast_view(view: &ForecastView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Forecast: {} (history {}-{}, CAGR {:+.2}%)\n",
        view.category.display_name(),
        view.span.0,
        view.span.1,
        view.cagr
    ));
    out.push_str(&format!(
        "Bridge: {} {} -> {} {}\n\n",
        view.bridge.year0,
        format_value(view.bridge.value0),
        view.bridge.year1,
        format_value(view.bridge.value1)
    ));

    out.push_str(format!("{:<6} {:>12} {:>12} {:>12}\n", "year", "central", "lower", "upper").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<6} {:-<12} {:-<12} {:-<12}\n", "", "", "", "").trim_end());
    out.push('\n');
    for p in &view.points {
        out.push_str(
            format!(
                "{:<6} {:>12} {:>12} {:>12}\n",
                p.year,
                format_value(p.central),
                format_value(p.lower),
                format_value(p.upper)
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

pub fn format_models_table(rows: &[ModelRow]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<12} {:>9} {:>10} {:>10} {:>12} {:>8} {:<16}\n",
            "category", "span", "AIC", "BIC", "RMSE", "CAGR", "trend"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<12} {:-<9} {:-<10} {:-<10} {:-<12} {:-<8} {:-<16}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in rows {
        out.push_str(
            format!(
                "{:<12} {:>9} {:>10.1} {:>10.1} {:>12} {:>7.2}% {:<16}\n",
                r.category.display_name(),
                format!("{}-{}", r.span.0, r.span.1),
                r.aic,
                r.bic,
                format_value(r.rmse),
                r.cagr,
                r.trend.label()
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

pub fn format_ranking(view: &RankingView) -> String {
    let mut out = String::new();
    out.push_str(&format!("Media ranking {}:\n", view.year));
    out.push_str(format!("{:>3} {:<12} {:>12} {:>8}\n", "#", "category", "spend", "share").trim_end());
    out.push('\n');
    out.push_str(format!("{:->3} {:-<12} {:-<12} {:-<8}\n", "", "", "", "").trim_end());
    out.push('\n');

    for (i, ((category, value), share)) in view.ranked.iter().zip(&view.shares).enumerate() {
        out.push_str(
            format!(
                "{:>3} {:<12} {:>12} {:>7.1}%\n",
                i + 1,
                category.display_name(),
                format_value(*value),
                share
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

pub fn format_correlation_ranking(reference: &str, ranked: &[(String, f64)]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Correlation with {reference} (by |r|):\n"));
    for (label, r) in ranked {
        out.push_str(format!("  {:<12} {:>+6.3}  {}", truncate(label, 12), r, bar(*r, 20)).trim_end());
        out.push('\n');
    }
    out
}

pub fn format_growth(category: Category, years: &[i32], values: &[f64], yoy: &[YoyPoint]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Year-over-year growth: {}\n", category.display_name()));
    out.push_str(format!("{:<6} {:>12} {:>8}\n", "year", "value", "yoy").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<6} {:-<12} {:-<8}\n", "", "", "").trim_end());
    out.push('\n');
    for ((year, value), point) in years.iter().zip(values).zip(yoy) {
        out.push_str(
            format!(
                "{:<6} {:>12} {:>8}\n",
                year,
                format_value(*value),
                format_percent(point.percent)
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Load summary plus any reconciliation gaps.
pub fn format_validation(dataset: &Dataset, gaps: &[ReconciliationGap]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Bundle OK: {} years ({}-{}), {} categories, {} correlation labels\n",
        dataset.years().len(),
        dataset.first_year(),
        dataset.last_year(),
        Category::ALL.len(),
        dataset.correlation().dim()
    ));

    if gaps.is_empty() {
        out.push_str("Total reconciles with the sum of categories in every year.\n");
        return out;
    }

    out.push_str(&format!(
        "Total differs from the sum of categories in {} year(s):\n",
        gaps.len()
    ));
    for g in gaps {
        out.push_str(&format!(
            "  {}: total {} vs sum {} (gap {})\n",
            g.year,
            format_value(g.total),
            format_value(g.tracked_sum),
            format_value(g.gap())
        ));
    }
    out
}

fn bar(r: f64, width: usize) -> String {
    let n = (r.abs() * width as f64).round() as usize;
    let ch = if r >= 0.0 { '#' } else { '=' };
    std::iter::repeat_n(ch, n.min(width)).collect()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::{ViewState, build_dashboard};

    #[test]
    fn value_units() {
        assert_eq!(format_value(5_139_889.1), "5.14M");
        assert_eq!(format_value(40_601.0), "41K");
        assert_eq!(format_value(999.4), "999");
        assert_eq!(format_value(0.0), "0");
    }

    #[test]
    fn percent_is_signed() {
        assert_eq!(format_percent(Some(4.708)), "+4.7%");
        assert_eq!(format_percent(Some(-1.26)), "-1.3%");
        assert_eq!(format_percent(None), "n/a");
    }

    #[test]
    fn tables_have_no_trailing_whitespace() {
        let ds = Dataset::embedded().unwrap();
        let dash = build_dashboard(&ds, &ViewState::for_dataset(&ds)).unwrap();
        for text in [
            format_forecast_table(&dash.forecast_table),
            format_models_table(&dash.models),
            format_ranking(&dash.ranking),
            format_forecast_view(&dash.forecast),
        ] {
            assert!(text.lines().all(|l| l == l.trim_end()), "{text}");
        }
    }

    #[test]
    fn ranking_lists_digital_first_in_2025() {
        let ds = Dataset::embedded().unwrap();
        let dash = build_dashboard(&ds, &ViewState::for_dataset(&ds)).unwrap();
        let text = format_ranking(&dash.ranking);
        let first = text.lines().nth(3).unwrap();
        assert!(first.contains("Digital"), "{first}");
        assert!(text.lines().last().unwrap().contains("Revistas"));
    }

    #[test]
    fn validation_lists_early_gaps() {
        let ds = Dataset::embedded().unwrap();
        let gaps = ds.reconciliation_gaps();
        let text = format_validation(&ds, &gaps);
        assert!(text.starts_with("Bundle OK: 31 years (1995-2025)"));
        assert!(text.contains("  1995: total"));
        assert!(!text.contains("  2020: total"));
    }

    #[test]
    fn correlation_bars_scale_with_r() {
        assert_eq!(bar(0.5, 10), "#####");
        assert_eq!(bar(-1.0, 4), "====");
    }
}
