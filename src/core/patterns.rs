//! Pattern-matrix demo: random matrices combined by product, element-wise
//! difference and increment, then folded into scalar "vortex" sums.

use std::fmt;

use rand::Rng;

pub type Matrix = Vec<Vec<f64>>;

#[derive(Debug, Clone, PartialEq)]
pub enum PatternError {
    Shape { op: &'static str, left: (usize, usize), right: (usize, usize) },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Shape { op, left, right } => write!(
                f,
                "{}: incompatible shapes {}x{} and {}x{}",
                op, left.0, left.1, right.0, right.1
            ),
        }
    }
}

impl std::error::Error for PatternError {}

pub fn shape(m: &[Vec<f64>]) -> (usize, usize) {
    (m.len(), m.first().map_or(0, Vec::len))
}

/// Entries uniform in `[0, 1)`.
pub fn random_matrix<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
    (0..rows).map(|_| (0..cols).map(|_| rng.gen::<f64>()).collect()).collect()
}

/// Matrix product `a * b`.
pub fn generate_pattern(a: &[Vec<f64>], b: &[Vec<f64>]) -> Result<Matrix, PatternError> {
    let (rows, inner) = shape(a);
    let (b_rows, cols) = shape(b);
    if inner != b_rows {
        return Err(PatternError::Shape { op: "generate_pattern", left: (rows, inner), right: (b_rows, cols) });
    }
    Ok((0..rows)
        .map(|i| (0..cols).map(|j| (0..inner).map(|k| a[i][k] * b[k][j]).sum()).collect())
        .collect())
}

/// Element-wise `|a - b|`.
pub fn relationship(a: &[Vec<f64>], b: &[Vec<f64>]) -> Result<Matrix, PatternError> {
    abs_difference("relationship", a, b)
}

/// The difference matrix of two patterns; same entries as [`relationship`].
pub fn difference_matrix(a: &[Vec<f64>], b: &[Vec<f64>]) -> Result<Matrix, PatternError> {
    abs_difference("difference_matrix", a, b)
}

fn abs_difference(op: &'static str, a: &[Vec<f64>], b: &[Vec<f64>]) -> Result<Matrix, PatternError> {
    if shape(a) != shape(b) || a.iter().zip(b).any(|(x, y)| x.len() != y.len()) {
        return Err(PatternError::Shape { op, left: shape(a), right: shape(b) });
    }
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| x.iter().zip(y).map(|(p, q)| (p - q).abs()).collect())
        .collect())
}

pub fn increment(a: &[Vec<f64>]) -> Matrix {
    a.iter().map(|row| row.iter().map(|v| v + 1.0).collect()).collect()
}

/// Sum of every entry of every matrix.
pub fn vortex(matrices: &[Matrix]) -> f64 {
    matrices.iter().flatten().flatten().sum()
}

pub fn simulate(vortices: &[f64]) -> f64 {
    vortices.iter().sum()
}

/// Every intermediate of one demo run.
#[derive(Debug, Clone)]
pub struct PatternRun {
    pub first: Matrix,
    pub second: Matrix,
    pub product: Matrix,
    pub relationship: Matrix,
    pub difference: Matrix,
    pub incremented: Matrix,
    pub vortex: f64,
    pub simulated: f64,
}

pub fn run_demo<R: Rng>(size: usize, rng: &mut R) -> Result<PatternRun, PatternError> {
    let first = random_matrix(size, size, rng);
    let second = random_matrix(size, size, rng);
    let product = generate_pattern(&first, &second)?;
    let relationship = relationship(&first, &second)?;
    let difference = difference_matrix(&first, &second)?;
    let incremented = increment(&first);
    let vortex = vortex(&[first.clone(), second.clone()]);
    let simulated = simulate(&[vortex, vortex]);
    crate::debug_log!("patterns: {}x{} vortex={} simulated={}", size, size, vortex, simulated);
    Ok(PatternRun { first, second, product, relationship, difference, incremented, vortex, simulated })
}

pub fn format_matrix(m: &[Vec<f64>]) -> String {
    m.iter()
        .map(|row| row.iter().map(|v| format!("{:8.4}", v)).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn product_of_known_matrices() {
        let a = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let b = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        assert_eq!(generate_pattern(&a, &b).unwrap(), vec![vec![2.0, 1.0], vec![4.0, 3.0]]);
        assert_eq!(relationship(&a, &b).unwrap(), vec![vec![1.0, 1.0], vec![2.0, 4.0]]);
        assert_eq!(increment(&b), vec![vec![1.0, 2.0], vec![2.0, 1.0]]);
        assert_eq!(vortex(&[a, b]), 12.0);
        assert_eq!(simulate(&[12.0, 12.0]), 24.0);
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let a = vec![vec![1.0, 2.0, 3.0]];
        let b = vec![vec![1.0, 2.0]];
        let err = generate_pattern(&a, &b).unwrap_err();
        assert_eq!(err.to_string(), "generate_pattern: incompatible shapes 1x3 and 1x2");
        assert!(relationship(&a, &b).is_err());
        let err = difference_matrix(&b, &a).unwrap_err();
        assert_eq!(err.to_string(), "difference_matrix: incompatible shapes 1x2 and 1x3");
    }

    #[test]
    fn seeded_runs_repeat() {
        let one = run_demo(4, &mut StdRng::seed_from_u64(7)).unwrap();
        let two = run_demo(4, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(one.product, two.product);
        assert_eq!(one.difference, one.relationship);
        assert!(one.first.iter().flatten().all(|v| (0.0..1.0).contains(v)));
        assert!((one.simulated - 2.0 * one.vortex).abs() < 1e-12);
        assert!(one.incremented.iter().flatten().all(|v| *v >= 1.0));
    }
}
