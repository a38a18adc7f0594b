//! Labelled Pearson correlation matrix.

use nalgebra::DMatrix;

use crate::error::SchemaError;

/// Absolute tolerance for symmetry and unit-diagonal checks.
pub const SYMMETRY_TOLERANCE: f64 = 1e-6;

/// A square, symmetric correlation matrix with one label per row/column.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    values: DMatrix<f64>,
}

impl CorrelationMatrix {
    pub fn new(labels: Vec<String>, rows: &[Vec<f64>]) -> Result<Self, SchemaError> {
        let n = rows.len();
        if n == 0 {
            return Err(SchemaError::CorrelationShape("matrix is empty".to_string()));
        }
        if labels.len() != n {
            return Err(SchemaError::CorrelationShape(format!(
                "{} labels for a {n}x{n} matrix",
                labels.len()
            )));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(SchemaError::CorrelationShape(format!(
                    "row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
        }
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(SchemaError::CorrelationShape(format!("duplicate label '{label}'")));
            }
        }

        let values = DMatrix::from_fn(n, n, |i, j| rows[i][j]);

        for i in 0..n {
            for j in 0..n {
                let v = values[(i, j)];
                if !v.is_finite() || !(-1.0..=1.0).contains(&v) {
                    return Err(SchemaError::CorrelationRange { row: i, col: j, value: v });
                }
            }
        }

        let asymmetry = &values - values.transpose();
        if asymmetry.amax() > SYMMETRY_TOLERANCE {
            for i in 0..n {
                for j in (i + 1)..n {
                    if asymmetry[(i, j)].abs() > SYMMETRY_TOLERANCE {
                        return Err(SchemaError::CorrelationAsymmetric {
                            row: i,
                            col: j,
                            a: values[(i, j)],
                            b: values[(j, i)],
                        });
                    }
                }
            }
        }

        for i in 0..n {
            let d = values[(i, i)];
            if (d - 1.0).abs() > SYMMETRY_TOLERANCE {
                return Err(SchemaError::CorrelationDiagonal { index: i, value: d });
            }
        }

        Ok(Self { labels, values })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn dim(&self) -> usize {
        self.labels.len()
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[(row, col)]
    }

    /// Coefficients of `label` against every label, in label order.
    pub fn row(&self, label: &str) -> Option<Vec<f64>> {
        let i = self.index_of(label)?;
        Some(self.values.row(i).iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn accepts_symmetric_unit_diagonal() {
        let m = CorrelationMatrix::new(
            labels(&["Total", "X", "Y"]),
            &[vec![1.0, 0.5, -0.9], vec![0.5, 1.0, 0.1], vec![-0.9, 0.1, 1.0]],
        )
        .unwrap();
        assert_eq!(m.dim(), 3);
        assert_eq!(m.row("Total").unwrap(), vec![1.0, 0.5, -0.9]);
        assert_eq!(m.get(2, 0), -0.9);
        assert!(m.row("Z").is_none());
    }

    #[test]
    fn tolerates_tiny_asymmetry() {
        let m = CorrelationMatrix::new(
            labels(&["A", "B"]),
            &[vec![1.0, 0.3], vec![0.3 + 5e-7, 1.0]],
        );
        assert!(m.is_ok());
    }

    #[test]
    fn rejects_asymmetric() {
        let err = CorrelationMatrix::new(labels(&["A", "B"]), &[vec![1.0, 0.3], vec![0.4, 1.0]]).unwrap_err();
        assert!(matches!(err, SchemaError::CorrelationAsymmetric { row: 0, col: 1, .. }));
    }

    #[test]
    fn rejects_non_square_and_label_mismatch() {
        assert!(matches!(
            CorrelationMatrix::new(labels(&["A", "B"]), &[vec![1.0, 0.3], vec![0.3]]),
            Err(SchemaError::CorrelationShape(_))
        ));
        assert!(matches!(
            CorrelationMatrix::new(labels(&["A"]), &[vec![1.0, 0.3], vec![0.3, 1.0]]),
            Err(SchemaError::CorrelationShape(_))
        ));
    }

    #[test]
    fn rejects_bad_diagonal_and_out_of_range() {
        assert!(matches!(
            CorrelationMatrix::new(labels(&["A", "B"]), &[vec![0.9, 0.3], vec![0.3, 1.0]]),
            Err(SchemaError::CorrelationDiagonal { index: 0, .. })
        ));
        assert!(matches!(
            CorrelationMatrix::new(labels(&["A", "B"]), &[vec![1.0, 1.3], vec![1.3, 1.0]]),
            Err(SchemaError::CorrelationRange { .. })
        ));
    }
}
