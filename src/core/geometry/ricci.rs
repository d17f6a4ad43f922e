//! Ricci tensor by contraction of the Christoffel symbols, plus the Ricci
//! scalar and the Einstein tensor.

use std::time::Instant;

use super::{is_symmetric, matrix_from_fn, Christoffel, Coordinates, InverseMetric, Matrix4, Metric, DIM};
use crate::core::cas::Expr;

#[derive(Debug, Clone, PartialEq)]
pub struct Ricci {
    r: Matrix4,
}

impl Ricci {
    /// `R_ij = sum_k [d_k G^k_ij - d_j G^k_ik + sum_l (G^l_ij G^k_lk - G^l_ik G^k_lj)]`
    pub fn compute(gamma: &Christoffel, coords: &Coordinates, simplify: bool) -> Self {
        let started = Instant::now();
        let r = matrix_from_fn(|i, j| {
            let mut sum = Expr::zero();
            for k in 0..DIM {
                sum = sum + gamma.get(k, i, j).diff(coords.name(k));
                sum = sum - gamma.get(k, i, k).diff(coords.name(j));
                for l in 0..DIM {
                    sum = sum + product(gamma.get(l, i, j), gamma.get(k, l, k));
                    sum = sum - product(gamma.get(l, i, k), gamma.get(k, l, j));
                }
            }
            if simplify {
                sum.simplify()
            } else {
                sum
            }
        });
        crate::debug_log!("ricci: contracted in {:?}", started.elapsed());
        Self { r }
    }

    pub fn get(&self, i: usize, j: usize) -> &Expr {
        &self.r[i][j]
    }

    pub fn components(&self) -> &Matrix4 {
        &self.r
    }

    /// Every component is identically zero.
    pub fn is_vacuum(&self) -> bool {
        self.r.iter().flatten().all(Expr::is_zero)
    }

    pub fn is_symmetric(&self) -> bool {
        is_symmetric(&self.r)
    }

    /// `R = g^ij R_ij`
    pub fn scalar(&self, inverse: &InverseMetric) -> Expr {
        let mut sum = Expr::zero();
        for i in 0..DIM {
            for j in 0..DIM {
                sum = sum + product(inverse.get(i, j), &self.r[i][j]);
            }
        }
        sum.simplify()
    }

    /// `G_ij = R_ij - 1/2 g_ij R`
    pub fn einstein(&self, metric: &Metric, inverse: &InverseMetric) -> EinsteinTensor {
        let half_scalar = Expr::rational(1, 2) * self.scalar(inverse);
        let g = matrix_from_fn(|i, j| (&self.r[i][j] - metric.get(i, j) * &half_scalar).simplify());
        EinsteinTensor { g }
    }
}

fn product(a: &Expr, b: &Expr) -> Expr {
    if a.is_zero() || b.is_zero() {
        Expr::zero()
    } else {
        a * b
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EinsteinTensor {
    g: Matrix4,
}

impl EinsteinTensor {
    pub fn get(&self, i: usize, j: usize) -> &Expr {
        &self.g[i][j]
    }

    pub fn components(&self) -> &Matrix4 {
        &self.g
    }

    pub fn is_zero(&self) -> bool {
        self.g.iter().flatten().all(Expr::is_zero)
    }
}
