use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

use super::atom::{Atom, FuncKind};
use super::fraction::Fraction;
use super::poly::{Monomial, Poly};
use super::render;

/// An exact symbolic value.
///
/// `Undefined` is what division by an identically zero expression yields;
/// it absorbs every operation it takes part in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expr {
    Frac(Fraction),
    Undefined,
}

impl Expr {
    pub fn zero() -> Self {
        Expr::Frac(Fraction::zero())
    }

    pub fn one() -> Self {
        Expr::Frac(Fraction::one())
    }

    pub fn integer(n: i64) -> Self {
        Expr::from(BigRational::from_integer(BigInt::from(n)))
    }

    /// `p / q`; a zero denominator is `Undefined`.
    pub fn rational(p: i64, q: i64) -> Self {
        if q == 0 {
            return Expr::Undefined;
        }
        Expr::from(BigRational::new(BigInt::from(p), BigInt::from(q)))
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::from_poly(Poly::atom(Atom::symbol(name)))
    }

    pub fn from_poly(p: Poly) -> Self {
        Expr::Frac(Fraction::from_poly(p))
    }

    pub fn fraction(&self) -> Option<&Fraction> {
        match self {
            Expr::Frac(f) => Some(f),
            Expr::Undefined => None,
        }
    }

    pub fn func(kind: FuncKind, arg: Expr) -> Self {
        if arg.is_undefined() {
            return Expr::Undefined;
        }
        match kind {
            FuncKind::Sin if arg.is_zero() => Expr::zero(),
            FuncKind::Cos | FuncKind::Exp if arg.is_zero() => Expr::one(),
            FuncKind::Ln if arg.is_one() => Expr::zero(),
            FuncKind::Ln if arg.is_zero() => Expr::Undefined,
            _ => Expr::from_poly(Poly::atom(Atom::Func(kind, Box::new(arg)))),
        }
    }

    pub fn sin(arg: Expr) -> Self {
        Self::func(FuncKind::Sin, arg)
    }

    pub fn cos(arg: Expr) -> Self {
        Self::func(FuncKind::Cos, arg)
    }

    pub fn tan(arg: Expr) -> Self {
        Self::sin(arg.clone()) / Self::cos(arg)
    }

    pub fn exp(arg: Expr) -> Self {
        Self::func(FuncKind::Exp, arg)
    }

    pub fn ln(arg: Expr) -> Self {
        Self::func(FuncKind::Ln, arg)
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Frac(f) if f.is_zero())
    }

    pub fn is_one(&self) -> bool {
        self.as_rational().map(|c| c.is_one()).unwrap_or(false)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Expr::Undefined)
    }

    pub fn as_rational(&self) -> Option<BigRational> {
        self.fraction().and_then(Fraction::as_constant)
    }

    /// Exact equivalence, independent of how either side is factored.
    pub fn equivalent(&self, other: &Expr) -> bool {
        match (self, other) {
            (Expr::Undefined, Expr::Undefined) => true,
            (Expr::Frac(_), Expr::Frac(_)) => (self - other).is_zero(),
            _ => false,
        }
    }

    pub fn recip(&self) -> Expr {
        match self {
            Expr::Frac(f) => f.recip().map(Expr::Frac).unwrap_or(Expr::Undefined),
            Expr::Undefined => Expr::Undefined,
        }
    }

    /// Integer power. `0^0` is one and `0^-n` is `Undefined`.
    ///
    /// # Panics
    ///
    /// If an exponent of the result does not fit in `i32`; use
    /// [`Expr::checked_pow`] for exponents that come from input.
    pub fn pow(&self, n: i64) -> Expr {
        match self.checked_pow(n) {
            Some(e) => e,
            None => panic!("exponent overflow raising {} to {}", self, n),
        }
    }

    /// Integer power, or `None` when an exponent of the result overflows.
    pub fn checked_pow(&self, n: i64) -> Option<Expr> {
        let Expr::Frac(f) = self else {
            return Some(Expr::Undefined);
        };
        let k = u32::try_from(n.unsigned_abs()).ok()?;
        if n >= 0 {
            return f.checked_pow(k).map(Expr::Frac);
        }
        match f.recip() {
            Some(inv) => inv.checked_pow(k).map(Expr::Frac),
            None => Some(Expr::Undefined),
        }
    }

    /// Largest absolute exponent of any atom, counting expanded
    /// denominator factors.
    pub fn max_exponent(&self) -> u64 {
        self.fraction().map(Fraction::max_exponent).unwrap_or(0)
    }

    pub fn simplify(&self) -> Expr {
        match self {
            Expr::Frac(f) => Expr::Frac(f.simplify()),
            Expr::Undefined => Expr::Undefined,
        }
    }

    pub fn depends_on(&self, var: &str) -> bool {
        match self {
            Expr::Frac(f) => f.depends_on(var),
            Expr::Undefined => false,
        }
    }

    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        let Expr::Frac(f) = self else { return };
        let polys = std::iter::once(f.num()).chain(f.factors().map(|(p, _)| p));
        for p in polys {
            for atom in p.atoms() {
                match atom {
                    Atom::Symbol(name) => {
                        out.insert(name.clone());
                    }
                    Atom::Func(_, arg) => arg.collect_symbols(out),
                }
            }
        }
    }

    /// Replace every occurrence of the symbol `var`, including inside
    /// function arguments.
    pub fn subs(&self, var: &str, value: &Expr) -> Expr {
        if !self.depends_on(var) {
            return self.clone();
        }
        self.map_atoms(&|atom| match atom {
            Atom::Symbol(name) if name == var => value.clone(),
            Atom::Symbol(name) => Expr::symbol(name.clone()),
            Atom::Func(kind, arg) => Expr::func(*kind, arg.subs(var, value)),
        })
    }

    /// Rebuild the expression with every atom replaced by `map(atom)`.
    pub(crate) fn map_atoms(&self, map: &dyn Fn(&Atom) -> Expr) -> Expr {
        let Expr::Frac(f) = self else {
            return Expr::Undefined;
        };
        let mut cache = BTreeMap::new();
        let num = rebuild_poly(f.num(), map, &mut cache);
        f.factors().fold(num, |acc, (p, e)| {
            acc / rebuild_poly(p, map, &mut cache).pow(i64::from(e))
        })
    }
}

fn rebuild_poly(p: &Poly, map: &dyn Fn(&Atom) -> Expr, cache: &mut BTreeMap<Atom, Expr>) -> Expr {
    p.terms()
        .map(|(m, c)| rebuild_monomial(m, map, cache) * Expr::from(c.clone()))
        .sum()
}

fn rebuild_monomial(m: &Monomial, map: &dyn Fn(&Atom) -> Expr, cache: &mut BTreeMap<Atom, Expr>) -> Expr {
    let mut out = Expr::one();
    for (atom, exp) in m.iter() {
        let value = cache.entry(atom.clone()).or_insert_with(|| map(atom));
        out = out * value.pow(i64::from(exp));
    }
    out
}

impl From<BigRational> for Expr {
    fn from(c: BigRational) -> Self {
        Expr::Frac(Fraction::constant(c))
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::integer(n)
    }
}

impl Expr {
    fn add_ref(&self, rhs: &Expr) -> Expr {
        match (self, rhs) {
            (Expr::Frac(a), Expr::Frac(b)) => Expr::Frac(a.add(b)),
            _ => Expr::Undefined,
        }
    }

    fn sub_ref(&self, rhs: &Expr) -> Expr {
        match (self, rhs) {
            (Expr::Frac(a), Expr::Frac(b)) => Expr::Frac(a.sub(b)),
            _ => Expr::Undefined,
        }
    }

    fn mul_ref(&self, rhs: &Expr) -> Expr {
        match (self, rhs) {
            (Expr::Frac(a), Expr::Frac(b)) => Expr::Frac(a.mul(b)),
            _ => Expr::Undefined,
        }
    }

    fn div_ref(&self, rhs: &Expr) -> Expr {
        match (self, rhs) {
            (Expr::Frac(a), Expr::Frac(b)) => a.div(b).map(Expr::Frac).unwrap_or(Expr::Undefined),
            _ => Expr::Undefined,
        }
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $inner:ident) => {
        impl $trait<&Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                self.$inner(rhs)
            }
        }

        impl $trait<Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                self.$inner(&rhs)
            }
        }

        impl $trait<&Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                self.$inner(rhs)
            }
        }

        impl $trait<Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                self.$inner(&rhs)
            }
        }
    };
}

impl_binop!(Add, add, add_ref);
impl_binop!(Sub, sub, sub_ref);
impl_binop!(Mul, mul, mul_ref);
impl_binop!(Div, div, div_ref);

impl Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        match self {
            Expr::Frac(f) => Expr::Frac(f.neg()),
            Expr::Undefined => Expr::Undefined,
        }
    }
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        -&self
    }
}

impl Sum for Expr {
    fn sum<I: Iterator<Item = Expr>>(iter: I) -> Expr {
        iter.fold(Expr::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Expr> for Expr {
    fn sum<I: Iterator<Item = &'a Expr>>(iter: I) -> Expr {
        iter.fold(Expr::zero(), |acc, x| acc + x)
    }
}

impl Default for Expr {
    fn default() -> Self {
        Expr::zero()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render::plain(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(name: &str) -> Expr {
        Expr::symbol(name)
    }

    #[test]
    fn arithmetic_is_exact() {
        let half = Expr::rational(1, 2);
        let third = Expr::rational(1, 3);
        assert_eq!((&half + &third).as_rational(), Some(BigRational::new(5.into(), 6.into())));
        assert!((&half * Expr::integer(2)).is_one());
    }

    #[test]
    fn division_by_zero_is_undefined() {
        let x = s("x");
        assert!((&x / Expr::zero()).is_undefined());
        assert!((&x - &x).recip().is_undefined());
        assert!(Expr::zero().pow(-2).is_undefined());
        assert!(Expr::zero().pow(0).is_one());
        assert!((Expr::Undefined + x).is_undefined());
    }

    #[test]
    fn function_folding() {
        assert!(Expr::sin(Expr::zero()).is_zero());
        assert!(Expr::cos(Expr::zero()).is_one());
        assert!(Expr::exp(Expr::zero()).is_one());
        assert!(Expr::ln(Expr::one()).is_zero());
        assert!(Expr::ln(Expr::zero()).is_undefined());
    }

    #[test]
    fn checked_pow_reports_overflow() {
        let r = s("r");
        assert!(r.checked_pow(3_000_000_000).is_none());
        assert!(r.checked_pow(-3_000_000_000).is_none());
        let big = r.checked_pow(2_000_000_000).expect("fits in i32");
        assert_eq!(big.max_exponent(), 2_000_000_000);
        assert!(big.checked_pow(2).is_none());
        assert_eq!(Expr::Undefined.checked_pow(i64::MAX), Some(Expr::Undefined));
        assert_eq!(Expr::zero().checked_pow(-3), Some(Expr::Undefined));
        assert_eq!(r.pow(-2).max_exponent(), 2);
    }

    #[test]
    fn trig_identity_is_recognized() {
        let th = s("theta");
        let lhs = Expr::sin(th.clone()).pow(2) + Expr::cos(th.clone()).pow(2);
        assert!(lhs.is_one());
        let tan = Expr::tan(th.clone());
        let back = &tan * Expr::cos(th.clone());
        assert!(back.equivalent(&Expr::sin(th)));
    }

    #[test]
    fn rational_functions_cancel() {
        let x = s("x");
        let y = s("y");
        let q = (&x * &x - &y * &y) / (&x - &y);
        assert!(q.equivalent(&(&x + &y)));
        assert_eq!(q.simplify(), &x + &y);
    }

    #[test]
    fn substitution_reaches_function_arguments() {
        let x = s("x");
        let e = Expr::sin(&x * Expr::integer(2)) + &x;
        let replaced = e.subs("x", &Expr::zero());
        assert!(replaced.is_zero());
        let shifted = e.subs("x", &s("y"));
        assert_eq!(shifted.free_symbols().into_iter().collect::<Vec<_>>(), vec!["y".to_string()]);
    }

    #[test]
    fn negative_powers_invert() {
        let r = s("r");
        let e = r.pow(-2) * r.pow(3);
        assert_eq!(e, r);
    }
}
