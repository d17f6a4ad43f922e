//! Metric tensors and their curvature: inverse, Christoffel symbols, Ricci
//! tensor, Ricci scalar and Einstein tensor, all as exact expressions.

use std::fmt;

use crate::core::cas::Expr;

pub mod christoffel;
pub mod coords;
pub mod inverse;
pub mod metric;
pub mod numeric;
pub mod pipeline;
pub mod report;
pub mod ricci;

pub use christoffel::Christoffel;
pub use coords::Coordinates;
pub use inverse::InverseMetric;
pub use metric::{Metric, MetricSpec, Preset};
pub use pipeline::{Curvature, Options};
pub use ricci::{EinsteinTensor, Ricci};

/// Spacetime dimension.
pub const DIM: usize = 4;

pub type Matrix4 = [[Expr; DIM]; DIM];

#[derive(Debug, Clone, PartialEq)]
pub enum TensorError {
    Dimension { rows: usize, cols: usize },
    CoordinateCount(usize),
    DuplicateCoordinate(String),
    Asymmetric { i: usize, j: usize },
    Singular,
    /// Coordinate names given for a preset that uses a different chart.
    PresetCoordinates { preset: String, coords: String },
}

impl fmt::Display for TensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorError::Dimension { rows, cols } => {
                write!(f, "metric must be {}x{}, got {}x{}", DIM, DIM, rows, cols)
            }
            TensorError::CoordinateCount(n) => write!(f, "expected {} coordinate names, got {}", DIM, n),
            TensorError::DuplicateCoordinate(name) => write!(f, "coordinate '{}' is listed twice", name),
            TensorError::Asymmetric { i, j } => {
                write!(f, "metric is not symmetric: g[{}][{}] differs from g[{}][{}]", i, j, j, i)
            }
            TensorError::Singular => write!(f, "metric is singular (determinant is identically zero)"),
            TensorError::PresetCoordinates { preset, coords } => {
                write!(f, "preset '{}' is written in coordinates {}; give diagonal or rows to rename them", preset, coords)
            }
        }
    }
}

impl std::error::Error for TensorError {}

pub(crate) fn matrix_from_fn(mut f: impl FnMut(usize, usize) -> Expr) -> Matrix4 {
    std::array::from_fn(|i| std::array::from_fn(|j| f(i, j)))
}

pub(crate) fn is_symmetric(m: &Matrix4) -> bool {
    (0..DIM).all(|i| (i + 1..DIM).all(|j| m[i][j].equivalent(&m[j][i])))
}

/// Upper-triangle index pairs, the independent entries of a symmetric tensor.
pub fn upper_pairs() -> impl Iterator<Item = (usize, usize)> {
    (0..DIM).flat_map(|i| (i..DIM).map(move |j| (i, j)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_pairs_cover_ten_entries() {
        let pairs: Vec<_> = upper_pairs().collect();
        assert_eq!(pairs.len(), 10);
        assert_eq!(pairs[0], (0, 0));
        assert_eq!(pairs[9], (3, 3));
    }

    #[test]
    fn error_messages() {
        assert_eq!(TensorError::Dimension { rows: 3, cols: 4 }.to_string(), "metric must be 4x4, got 3x4");
        assert_eq!(
            TensorError::Asymmetric { i: 0, j: 1 }.to_string(),
            "metric is not symmetric: g[0][1] differs from g[1][0]"
        );
    }
}
