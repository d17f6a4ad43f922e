//! Exact inverse metric by adjugate over determinant.

use super::{matrix_from_fn, Matrix4, Metric, TensorError, DIM};
use crate::core::cas::Expr;

#[derive(Debug, Clone, PartialEq)]
pub struct InverseMetric {
    g: Matrix4,
}

impl InverseMetric {
    pub fn get(&self, i: usize, j: usize) -> &Expr {
        &self.g[i][j]
    }

    pub fn components(&self) -> &Matrix4 {
        &self.g
    }

    /// `g_ik g^kj == delta_ij` for every entry, decided exactly.
    pub fn is_inverse_of(&self, metric: &Metric) -> bool {
        (0..DIM).all(|i| {
            (0..DIM).all(|j| {
                let product: Expr = (0..DIM).map(|k| metric.get(i, k) * self.get(k, j)).sum();
                if i == j {
                    product.is_one()
                } else {
                    product.is_zero()
                }
            })
        })
    }
}

impl Metric {
    pub fn determinant(&self) -> Expr {
        let all = [0, 1, 2, 3];
        minor_det(self.components(), &all, &all)
    }

    pub fn inverse(&self) -> Result<InverseMetric, TensorError> {
        let det = self.determinant();
        if det.is_zero() || det.is_undefined() {
            return Err(TensorError::Singular);
        }
        let g = self.components();
        if self.is_diagonal() {
            let inv = matrix_from_fn(|i, j| if i == j { g[i][i].recip().simplify() } else { Expr::zero() });
            return Ok(InverseMetric { g: inv });
        }
        let inv_det = det.recip();
        let mut inv = matrix_from_fn(|_, _| Expr::zero());
        // symmetric, so fill the upper triangle and mirror
        for i in 0..DIM {
            for j in i..DIM {
                let entry = (cofactor(g, j, i) * &inv_det).simplify();
                inv[j][i] = entry.clone();
                inv[i][j] = entry;
            }
        }
        Ok(InverseMetric { g: inv })
    }
}

fn cofactor(g: &Matrix4, row: usize, col: usize) -> Expr {
    let rows: Vec<usize> = (0..DIM).filter(|&r| r != row).collect();
    let cols: Vec<usize> = (0..DIM).filter(|&c| c != col).collect();
    let minor = minor_det(g, &rows, &cols);
    if (row + col) % 2 == 0 {
        minor
    } else {
        -minor
    }
}

/// Laplace expansion along the first selected row, skipping zero entries.
fn minor_det(g: &Matrix4, rows: &[usize], cols: &[usize]) -> Expr {
    let Some((&first, rest)) = rows.split_first() else {
        return Expr::one();
    };
    let mut det = Expr::zero();
    for (k, &c) in cols.iter().enumerate() {
        let entry = &g[first][c];
        if entry.is_zero() {
            continue;
        }
        let sub: Vec<usize> = cols.iter().copied().filter(|&x| x != c).collect();
        let term = entry * minor_det(g, rest, &sub);
        det = if k % 2 == 0 { det + term } else { det - term };
    }
    det
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Coordinates;

    #[test]
    fn schwarzschild_inverse_is_exact() {
        let m = Metric::schwarzschild();
        let inv = m.inverse().unwrap();
        assert!(inv.is_inverse_of(&m));
        assert!((inv.get(0, 0) * m.get(0, 0)).is_one());
        assert!(inv.get(0, 1).is_zero());
    }

    #[test]
    fn determinant_of_schwarzschild() {
        // -r^4 sin^2(theta), the lapse factors cancel
        let r = Expr::symbol("r");
        let expected = -(r.pow(4) * Expr::sin(Expr::symbol("theta")).pow(2));
        assert!(Metric::schwarzschild().determinant().equivalent(&expected));
    }

    #[test]
    fn off_diagonal_metric_uses_cofactors() {
        let (a, b) = (Expr::symbol("a"), Expr::symbol("b"));
        let mut g = Metric::minkowski().components().clone();
        g[0][0] = Expr::zero();
        g[0][1] = a.clone();
        g[1][0] = a;
        g[1][1] = b;
        let m = Metric::new(Coordinates::spherical(), g).unwrap();
        let inv = m.inverse().unwrap();
        assert!(inv.is_inverse_of(&m));
        assert!(inv.get(0, 1).equivalent(inv.get(1, 0)));
    }

    #[test]
    fn zero_determinant_is_singular() {
        let mut g = Metric::minkowski().components().clone();
        g[3][3] = Expr::zero();
        let m = Metric::new(Coordinates::spherical(), g).unwrap();
        assert_eq!(m.inverse(), Err(TensorError::Singular));

        let x = Expr::symbol("x");
        let mut g = Metric::minkowski().components().clone();
        g[0][0] = x.clone();
        g[0][1] = x.clone();
        g[1][0] = x.clone();
        g[1][1] = x;
        let rank_deficient = Metric::new(Coordinates::spherical(), g).unwrap();
        assert_eq!(rank_deficient.inverse(), Err(TensorError::Singular));
    }
}
