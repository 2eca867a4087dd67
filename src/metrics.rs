//! Metrics.
//!
//! Metrics are evaluation helpers (they do not participate in training).

use std::collections::BTreeSet;

use crate::linalg::{self, Matrix};
use crate::{Error, Result};

/// Counts of (true class, predicted class) pairs.
///
/// Classes are the sorted union of the labels seen in `y_true` and `y_pred`.
/// `counts()[i][j]` is the number of samples of class `classes()[i]` that were
/// predicted as `classes()[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix<L> {
    classes: Vec<L>,
    counts: Vec<Vec<usize>>,
}

impl<L: Clone + Ord> ConfusionMatrix<L> {
    /// Build the matrix.
    ///
    /// With `n_classes`, the matrix is padded with zero rows and columns up to
    /// `n_classes x n_classes` (classes that never occur have no label).
    pub fn new(y_true: &[L], y_pred: &[L], n_classes: Option<usize>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(Error::InvalidShape(format!(
                "y_true ({}) and y_pred ({}) must have the same length",
                y_true.len(),
                y_pred.len()
            )));
        }

        let classes: Vec<L> = y_true
            .iter()
            .chain(y_pred)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect();

        let n = n_classes.unwrap_or(classes.len());
        if n < classes.len() {
            return Err(Error::InvalidConfig(format!(
                "n_classes ({n}) is smaller than the number of classes found ({})",
                classes.len()
            )));
        }

        let mut counts = vec![vec![0; n]; n];
        for (t, p) in y_true.iter().zip(y_pred) {
            // Both labels are in `classes` by construction.
            if let (Ok(row), Ok(col)) = (classes.binary_search(t), classes.binary_search(p)) {
                counts[row][col] += 1;
            }
        }

        Ok(Self { classes, counts })
    }
}

impl<L> ConfusionMatrix<L> {
    #[inline]
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    #[inline]
    pub fn counts(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// Number of samples counted.
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Counts as a floating-point matrix.
    pub fn to_matrix(&self) -> Matrix {
        self.counts
            .iter()
            .map(|row| row.iter().map(|&c| c as f64).collect())
            .collect()
    }

    /// Correct predictions over all predictions.
    pub fn accuracy(&self) -> Result<f64> {
        let total = self.total();
        if total == 0 {
            return Err(Error::InvalidData(
                "accuracy is undefined for an empty set".to_owned(),
            ));
        }
        Ok(linalg::diagonal_sum(&self.to_matrix())? / total as f64)
    }
}

/// Fraction of positions where `y_true` and `y_pred` agree.
pub fn accuracy<L: Clone + Ord>(y_true: &[L], y_pred: &[L]) -> Result<f64> {
    ConfusionMatrix::new(y_true, y_pred, None)?.accuracy()
}
