//! Christoffel symbols of the second kind,
//! `Gamma^k_ij = 1/2 g^kl (d_j g_li + d_i g_lj - d_l g_ij)`.

use std::time::Instant;

use super::{InverseMetric, Metric, DIM};
use crate::core::cas::Expr;

pub type Rank3 = [[[Expr; DIM]; DIM]; DIM];

#[derive(Debug, Clone, PartialEq)]
pub struct Christoffel {
    gamma: Rank3,
}

impl Christoffel {
    pub fn compute(metric: &Metric, inverse: &InverseMetric, simplify: bool) -> Self {
        let started = Instant::now();
        let coords = metric.coords();
        let g = metric.components();
        // dg[d][a][b] = d g_ab / d x^d
        let dg: Rank3 = std::array::from_fn(|d| {
            std::array::from_fn(|a| std::array::from_fn(|b| g[a][b].diff(coords.name(d))))
        });
        let half = Expr::rational(1, 2);
        let gamma: Rank3 = std::array::from_fn(|k| {
            std::array::from_fn(|i| {
                std::array::from_fn(|j| {
                    let mut sum = Expr::zero();
                    for l in 0..DIM {
                        let up = inverse.get(k, l);
                        if up.is_zero() {
                            continue;
                        }
                        let bracket = &dg[j][l][i] + &dg[i][l][j] - &dg[l][i][j];
                        if bracket.is_zero() {
                            continue;
                        }
                        sum = sum + up * bracket;
                    }
                    let value = &half * sum;
                    if simplify {
                        value.simplify()
                    } else {
                        value
                    }
                })
            })
        });
        let out = Self { gamma };
        crate::debug_log!(
            "christoffel: {} nonzero of {} in {:?}",
            out.nonzero().count(),
            DIM * DIM * DIM,
            started.elapsed()
        );
        out
    }

    pub fn get(&self, k: usize, i: usize, j: usize) -> &Expr {
        &self.gamma[k][i][j]
    }

    pub fn components(&self) -> &Rank3 {
        &self.gamma
    }

    /// Nonzero entries in `(k, i, j)` order.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, usize, usize, &Expr)> + '_ {
        (0..DIM).flat_map(move |k| {
            (0..DIM).flat_map(move |i| {
                (0..DIM).filter_map(move |j| {
                    let e = &self.gamma[k][i][j];
                    (!e.is_zero()).then_some((k, i, j, e))
                })
            })
        })
    }

    /// `Gamma^k_ij == Gamma^k_ji` for all indices.
    pub fn is_symmetric(&self) -> bool {
        (0..DIM).all(|k| (0..DIM).all(|i| (i + 1..DIM).all(|j| self.gamma[k][i][j].equivalent(&self.gamma[k][j][i]))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(name: &str) -> Expr {
        Expr::symbol(name)
    }

    fn schwarzschild() -> Christoffel {
        let m = Metric::schwarzschild();
        let inv = m.inverse().unwrap();
        Christoffel::compute(&m, &inv, true)
    }

    #[test]
    fn textbook_schwarzschild_values() {
        let gamma = schwarzschild();
        let (g, m, c, r) = (s("G"), s("M"), s("c"), s("r"));
        let gm = &g * &m;
        // Gamma^r_tt = GM (c^2 r - 2GM) / (c^4 r^3)
        let r_tt = &gm * (c.pow(2) * &r - Expr::integer(2) * &gm) / (c.pow(4) * r.pow(3));
        assert!(gamma.get(1, 0, 0).equivalent(&r_tt));
        // Gamma^t_tr = GM / (r (c^2 r - 2GM))
        let t_tr = &gm / (&r * (c.pow(2) * &r - Expr::integer(2) * &gm));
        assert!(gamma.get(0, 0, 1).equivalent(&t_tr));
        let th = s("theta");
        assert!(gamma.get(2, 3, 3).equivalent(&-(Expr::sin(th.clone()) * Expr::cos(th.clone()))));
        assert!(gamma.get(3, 1, 3).equivalent(&r.recip()));
        assert!(gamma.get(3, 2, 3).equivalent(&(Expr::cos(th.clone()) / Expr::sin(th))));
    }

    #[test]
    fn lower_indices_commute() {
        let gamma = schwarzschild();
        assert!(gamma.is_symmetric());
        assert_eq!(gamma.nonzero().count(), 13);
    }

    #[test]
    fn flat_metric_in_spherical_coordinates() {
        let m = Metric::minkowski();
        let inv = m.inverse().unwrap();
        let gamma = Christoffel::compute(&m, &inv, false);
        assert!(gamma.get(0, 0, 1).is_zero());
        assert!(gamma.get(1, 0, 0).is_zero());
        assert!(gamma.get(1, 2, 2).equivalent(&-s("r")));
    }
}
