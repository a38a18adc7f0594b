//! Category shares of the yearly total.

use std::collections::BTreeMap;

use crate::dataset::Dataset;
use crate::domain::{Category, YearValue};

/// `category_value / total_value * 100`, or `0.0` when the total is not positive.
///
/// A zero total is shown as a 0% share rather than failing the whole view.
pub fn share_of_total(category_value: f64, total_value: f64) -> f64 {
    if total_value > 0.0 {
        category_value / total_value * 100.0
    } else {
        0.0
    }
}

/// Share of every tracked category, for every year.
///
/// Shares are not normalised: a year may sum to more or less than 100 when
/// the total does not reconcile with the tracked categories.
pub fn stacked_share_by_year(dataset: &Dataset) -> BTreeMap<i32, Vec<(Category, f64)>> {
    let total = dataset.series(Category::Total);
    dataset
        .years()
        .iter()
        .enumerate()
        .map(|(i, &year)| {
            let shares = Category::TRACKED
                .iter()
                .map(|&c| (c, share_of_total(dataset.series(c)[i], total[i])))
                .collect();
            (year, shares)
        })
        .collect()
}

/// Share of one category in every year of the shared axis.
pub fn share_series(dataset: &Dataset, category: Category) -> Vec<YearValue> {
    let total = dataset.series(Category::Total);
    dataset
        .years()
        .iter()
        .zip(dataset.series(category).iter().zip(total))
        .map(|(&year, (&v, &t))| YearValue {
            year,
            value: share_of_total(v, t),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_is_bounded_when_total_dominates() {
        for (cv, tv) in [(0.0, 10.0), (5.0, 10.0), (10.0, 10.0), (1e-9, 1e9)] {
            let s = share_of_total(cv, tv);
            assert!((0.0..=100.0).contains(&s), "{cv}/{tv} -> {s}");
        }
        assert!((share_of_total(25.0, 200.0) - 12.5).abs() < 1e-12);
    }

    #[test]
    fn zero_total_falls_back_to_zero() {
        assert_eq!(share_of_total(0.0, 0.0), 0.0);
        assert_eq!(share_of_total(42.0, 0.0), 0.0);
    }

    #[test]
    fn stacked_shares_cover_every_year_and_category() {
        let ds = Dataset::embedded().unwrap();
        let shares = stacked_share_by_year(&ds);
        assert_eq!(shares.len(), ds.years().len());

        let y2025 = &shares[&2025];
        let order: Vec<Category> = y2025.iter().map(|(c, _)| *c).collect();
        assert_eq!(order, Category::TRACKED.to_vec());

        // Reconciled years sum to 100.
        let sum: f64 = y2025.iter().map(|(_, s)| s).sum();
        assert!((sum - 100.0).abs() < 1e-6, "2025 shares sum to {sum}");

        // Early years are left as observed, not normalised.
        let sum_1995: f64 = shares[&1995].iter().map(|(_, s)| s).sum();
        assert!(sum_1995 > 100.0);
    }

    #[test]
    fn digital_share_is_zero_before_launch() {
        let ds = Dataset::embedded().unwrap();
        let s = share_series(&ds, Category::Digital);
        assert_eq!(s[0].value, 0.0);
        let last = s.last().unwrap();
        assert_eq!(last.year, 2025);
        assert!(last.value > 50.0 && last.value < 70.0);
    }
}
