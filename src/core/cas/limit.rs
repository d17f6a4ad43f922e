use super::atom::Atom;
use super::expr::Expr;
use super::poly::Poly;

#[derive(Debug, Clone, PartialEq)]
pub enum Limit {
    Finite(Expr),
    Infinite,
    /// `var` occurs inside a function, or the expression is undefined.
    Undetermined,
}

impl Limit {
    pub fn is_zero(&self) -> bool {
        matches!(self, Limit::Finite(e) if e.is_zero())
    }
}

impl Expr {
    /// Limit as `var` grows without bound, read off after `var = 1/u`
    /// from the lowest power of `u` in numerator and denominator.
    pub fn limit_at_infinity(&self, var: &str) -> Limit {
        let Expr::Frac(f) = self else {
            return Limit::Undetermined;
        };
        if !f.depends_on(var) {
            return Limit::Finite(self.clone());
        }
        let nested = std::iter::once(f.num())
            .chain(f.factors().map(|(p, _)| p))
            .any(|p| p.atoms().iter().any(|a| a.nests(var)));
        if nested {
            return Limit::Undetermined;
        }
        let inv_name = format!("1/{}", var);
        let u = Atom::symbol(inv_name.clone());
        let flipped = self.subs(var, &Expr::symbol(inv_name).recip());
        let Expr::Frac(g) = flipped else {
            return Limit::Undetermined;
        };
        let (mut order, lead) = lowest_order(g.num(), &u);
        let mut value = Expr::from_poly(lead);
        for (factor, exp) in g.factors() {
            let (o, l) = lowest_order(factor, &u);
            order -= i64::from(o) * i64::from(exp);
            value = value / Expr::from_poly(l).pow(i64::from(exp));
        }
        match order {
            o if o > 0 => Limit::Finite(Expr::zero()),
            0 => Limit::Finite(value),
            _ => Limit::Infinite,
        }
    }
}

/// Lowest exponent of `u` and the coefficient polynomial at that order.
fn lowest_order(p: &Poly, u: &Atom) -> (i64, Poly) {
    let order = p.terms().map(|(m, _)| m.exponent(u)).min().unwrap_or(0);
    let mut lead = Poly::zero();
    for (m, c) in p.terms() {
        if m.exponent(u) == order {
            lead.add_term(m.with_exponent(u, 0), c.clone());
        }
    }
    (i64::from(order), lead)
}
