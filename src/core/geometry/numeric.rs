//! Floating-point cross-check of the symbolic results.
//!
//! The metric is evaluated at a point, Christoffel symbols come from central
//! differences of g, and the Ricci tensor from central differences of those.

use std::fmt;

use nalgebra::Matrix4;

use super::{Curvature, Metric, DIM};
use crate::core::cas::{Bindings, EvalError};

pub type Point = [f64; DIM];
pub type Mat4 = [[f64; DIM]; DIM];
pub type Gamma4 = [[[f64; DIM]; DIM]; DIM];

#[derive(Debug, Clone, PartialEq)]
pub enum NumericError {
    Eval(EvalError),
    /// The metric has no inverse at the sample point.
    Singular(Point),
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::Eval(e) => write!(f, "{}", e),
            NumericError::Singular(x) => write!(f, "metric is not invertible at {:?}", x),
        }
    }
}

impl std::error::Error for NumericError {}

impl From<EvalError> for NumericError {
    fn from(e: EvalError) -> Self {
        NumericError::Eval(e)
    }
}

/// A symbolic metric with its parameters bound to numbers.
pub struct NumericMetric<'a> {
    metric: &'a Metric,
    params: Bindings,
}

impl<'a> NumericMetric<'a> {
    pub fn new(metric: &'a Metric, params: Bindings) -> Self {
        Self { metric, params }
    }

    /// Parameters plus the coordinate values of `x`.
    pub fn bindings_at(&self, x: &Point) -> Bindings {
        let mut env = self.params.clone();
        for (i, value) in x.iter().enumerate() {
            env.insert(self.metric.coords().name(i).to_string(), *value);
        }
        env
    }

    pub fn at(&self, x: &Point) -> Result<Mat4, NumericError> {
        let env = self.bindings_at(x);
        let mut g = [[0.0; DIM]; DIM];
        for (i, row) in g.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = self.metric.get(i, j).eval(&env)?;
            }
        }
        Ok(g)
    }
}

/// Inverse of `m`, `None` when it is singular or has a non-finite entry.
pub fn invert4(m: &Mat4) -> Option<Mat4> {
    if m.iter().flatten().any(|v| !v.is_finite()) {
        return None;
    }
    let inv = Matrix4::from_fn(|i, j| m[i][j]).try_inverse()?;
    let out: Mat4 = std::array::from_fn(|i| std::array::from_fn(|j| inv[(i, j)]));
    out.iter().flatten().all(|v| v.is_finite()).then_some(out)
}

fn shifted(x: &Point, d: usize, by: f64) -> Point {
    let mut y = *x;
    y[d] += by;
    y
}

pub fn christoffel_fd(metric: &NumericMetric, x: &Point, h: f64) -> Result<Gamma4, NumericError> {
    let g = metric.at(x)?;
    let inv = invert4(&g).ok_or(NumericError::Singular(*x))?;
    let mut dg = [[[0.0; DIM]; DIM]; DIM];
    for (d, slot) in dg.iter_mut().enumerate() {
        let plus = metric.at(&shifted(x, d, h))?;
        let minus = metric.at(&shifted(x, d, -h))?;
        for a in 0..DIM {
            for b in 0..DIM {
                slot[a][b] = (plus[a][b] - minus[a][b]) / (2.0 * h);
            }
        }
    }
    let mut gamma = [[[0.0; DIM]; DIM]; DIM];
    for k in 0..DIM {
        for i in 0..DIM {
            for j in 0..DIM {
                let sum: f64 = (0..DIM).map(|l| inv[k][l] * (dg[j][l][i] + dg[i][l][j] - dg[l][i][j])).sum();
                gamma[k][i][j] = 0.5 * sum;
            }
        }
    }
    Ok(gamma)
}

pub fn ricci_fd(metric: &NumericMetric, x: &Point, h: f64) -> Result<Mat4, NumericError> {
    let gamma = christoffel_fd(metric, x, h)?;
    // dgamma[d][k][i][j] = d Gamma^k_ij / d x^d
    let mut dgamma = [[[[0.0; DIM]; DIM]; DIM]; DIM];
    for (d, slot) in dgamma.iter_mut().enumerate() {
        let plus = christoffel_fd(metric, &shifted(x, d, h), h)?;
        let minus = christoffel_fd(metric, &shifted(x, d, -h), h)?;
        for k in 0..DIM {
            for i in 0..DIM {
                for j in 0..DIM {
                    slot[k][i][j] = (plus[k][i][j] - minus[k][i][j]) / (2.0 * h);
                }
            }
        }
    }
    let mut r = [[0.0; DIM]; DIM];
    for i in 0..DIM {
        for j in 0..DIM {
            let mut sum = 0.0;
            for k in 0..DIM {
                sum += dgamma[k][k][i][j] - dgamma[j][k][i][k];
                for l in 0..DIM {
                    sum += gamma[l][i][j] * gamma[k][l][k] - gamma[l][i][k] * gamma[k][l][j];
                }
            }
            r[i][j] = sum;
        }
    }
    Ok(r)
}

/// `|a - b| / max(|a|, |b|, 1)`
pub fn mixed_error(a: f64, b: f64) -> f64 {
    if a == b {
        return 0.0;
    }
    (a - b).abs() / a.abs().max(b.abs()).max(1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossCheck {
    pub christoffel_error: f64,
    pub ricci_error: f64,
}

impl CrossCheck {
    pub fn max_error(&self) -> f64 {
        self.christoffel_error.max(self.ricci_error)
    }

    /// NaN errors never pass.
    pub fn passes(&self, tolerance: f64) -> bool {
        self.christoffel_error <= tolerance && self.ricci_error <= tolerance
    }
}

/// Largest mixed error between the symbolic Christoffel and Ricci
/// components, evaluated at `x`, and their finite-difference estimates.
pub fn cross_check(c: &Curvature, params: &Bindings, x: &Point, h: f64) -> Result<CrossCheck, NumericError> {
    let numeric = NumericMetric::new(&c.metric, params.clone());
    let env = numeric.bindings_at(x);

    let gamma = christoffel_fd(&numeric, x, h)?;
    let mut christoffel_error: f64 = 0.0;
    for k in 0..DIM {
        for i in 0..DIM {
            for j in 0..DIM {
                let exact = c.christoffel.get(k, i, j).eval(&env)?;
                christoffel_error = worst(christoffel_error, mixed_error(exact, gamma[k][i][j]));
            }
        }
    }

    let ricci = ricci_fd(&numeric, x, h)?;
    let mut ricci_error: f64 = 0.0;
    for i in 0..DIM {
        for j in 0..DIM {
            let exact = c.ricci.get(i, j).eval(&env)?;
            ricci_error = worst(ricci_error, mixed_error(exact, ricci[i][j]));
        }
    }
    crate::debug_log!("numeric: christoffel {:e} ricci {:e} at {:?}", christoffel_error, ricci_error, x);
    Ok(CrossCheck { christoffel_error, ricci_error })
}

// f64::max drops NaN, which would hide a failure
fn worst(acc: f64, e: f64) -> f64 {
    if e.is_nan() || acc.is_nan() {
        f64::NAN
    } else {
        acc.max(e)
    }
}
