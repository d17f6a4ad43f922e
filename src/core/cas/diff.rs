//! Exact partial derivatives.

use std::collections::BTreeMap;

use num_rational::BigRational;

use super::atom::{Atom, FuncKind};
use super::expr::Expr;
use super::fraction::Fraction;
use super::poly::Poly;

impl Expr {
    /// Partial derivative with respect to the symbol `var`.
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Undefined => Expr::Undefined,
            Expr::Frac(f) if !f.depends_on(var) => Expr::zero(),
            Expr::Frac(f) => diff_fraction(f, var),
        }
    }
}

/// d(N / prod f_i^e_i) = N' / D - sum_i e_i * N * f_i' / (D * f_i)
fn diff_fraction(f: &Fraction, var: &str) -> Expr {
    let dnum = diff_poly(f.num(), var);
    if f.is_polynomial() {
        return dnum;
    }
    let num = Expr::from_poly(f.num().clone());
    let den: BTreeMap<Poly, u32> = f.factors().map(|(p, e)| (p.clone(), e)).collect();
    let inv_den = Expr::Frac(Fraction::from_parts(Poly::one(), den));
    let mut out = &dnum * &inv_den;
    for (factor, exp) in f.factors() {
        if !factor.depends_on(var) {
            continue;
        }
        let inv_factor = Expr::Frac(Fraction::from_parts(Poly::one(), BTreeMap::from([(factor.clone(), 1)])));
        let dfactor = diff_poly(factor, var);
        out = out - Expr::from(i64::from(exp)) * &num * dfactor * &inv_den * inv_factor;
    }
    out
}

/// Product rule over the atoms of every term. Plain symbols contribute
/// polynomial terms directly; function atoms are grouped so each chain
/// factor is multiplied in once.
fn diff_poly(p: &Poly, var: &str) -> Expr {
    let target = Atom::symbol(var);
    let mut direct = Poly::zero();
    let mut chained: BTreeMap<Atom, Poly> = BTreeMap::new();
    for (m, c) in p.terms() {
        for (atom, exp) in m.iter() {
            if !atom.depends_on(var) {
                continue;
            }
            let coeff = c * BigRational::from_integer(exp.into());
            let lowered = m.with_exponent(atom, exp - 1);
            if *atom == target {
                direct.add_term(lowered, coeff);
            } else {
                chained.entry(atom.clone()).or_default().add_term(lowered, coeff);
            }
        }
    }
    let mut out = Expr::from_poly(direct);
    for (atom, outer) in chained {
        out = out + Expr::from_poly(outer) * chain_factor(&atom, var);
    }
    out
}

/// d atom / d var for a function atom.
fn chain_factor(atom: &Atom, var: &str) -> Expr {
    let Atom::Func(kind, arg) = atom else {
        return Expr::zero();
    };
    let inner = arg.diff(var);
    let outer = match kind {
        FuncKind::Sin => Expr::cos((**arg).clone()),
        FuncKind::Cos => -Expr::sin((**arg).clone()),
        FuncKind::Exp => Expr::from_poly(Poly::atom(atom.clone())),
        FuncKind::Ln => arg.recip(),
    };
    outer * inner
}
