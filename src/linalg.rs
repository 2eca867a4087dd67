//! Vector/matrix containers and distance metrics.
//!
//! Everything here is plain scalar arithmetic over `f64` slices.

use crate::{Error, Result};

/// One sample: position `i` is feature `i`.
pub type Vector = Vec<f64>;

/// Row-major samples.
pub type Matrix = Vec<Vector>;

/// A distance between two equally sized vectors.
pub type Metric = fn(&[f64], &[f64]) -> f64;

/// Check that `x` has one row per label in `y` and that all rows have the same length.
///
/// Returns the number of samples.
pub fn check_dimension_match<L>(x: &[Vector], y: &[L], allow_empty: bool) -> Result<usize> {
    if x.len() != y.len() {
        return Err(Error::InvalidShape(format!(
            "X rows ({}) must be the same as y size ({})",
            x.len(),
            y.len()
        )));
    }

    if !allow_empty && x.is_empty() {
        return Err(Error::InvalidData("X and y must not be empty".to_owned()));
    }

    check_rows(x)?;
    Ok(x.len())
}

/// Check that every row of `x` has the length of the first one.
///
/// Returns that length (zero for an empty matrix).
pub fn check_rows(x: &[Vector]) -> Result<usize> {
    let Some(first) = x.first() else {
        return Ok(0);
    };
    let width = first.len();
    for (i, row) in x.iter().enumerate() {
        if row.len() != width {
            return Err(Error::InvalidShape(format!(
                "X row {i} has len {}, expected {width}",
                row.len()
            )));
        }
    }
    Ok(width)
}

/// Sum of the main diagonal of a square matrix.
pub fn diagonal_sum(matrix: &[Vector]) -> Result<f64> {
    if matrix.is_empty() {
        return Err(Error::InvalidShape("the matrix must not be empty".to_owned()));
    }
    let width = matrix[0].len();
    if matrix.iter().any(|row| row.len() != width) {
        return Err(Error::InvalidShape(
            "all the rows of the matrix must be the same length".to_owned(),
        ));
    }
    if matrix.len() != width {
        return Err(Error::InvalidShape(format!(
            "matrix must be square, got {}x{width}",
            matrix.len()
        )));
    }

    Ok(matrix.iter().enumerate().map(|(i, row)| row[i]).sum())
}

/// Minkowski distance of order `p`. Generalizes Manhattan (`p = 1`) and Euclidean (`p = 2`).
#[inline]
pub fn minkowski(a: &[f64], b: &[f64], p: f64) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs().powf(p))
        .sum::<f64>()
        .powf(1.0 / p)
}

/// Sum of absolute coordinate differences.
#[inline]
pub fn manhattan(a: &[f64], b: &[f64]) -> f64 {
    minkowski(a, b, 1.0)
}

/// Length of the segment joining `a` and `b`.
#[inline]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    minkowski(a, b, 2.0)
}

/// Largest absolute coordinate difference.
#[inline]
pub fn chebyshev(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Number of positions whose coordinates differ.
#[inline]
pub fn hamming(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).filter(|(x, y)| x != y).count() as f64
}
