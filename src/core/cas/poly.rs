//! Sparse multivariate Laurent polynomials with exact rational coefficients.
//!
//! Every product is brought into trigonometric normal form: `cos(u)` never
//! carries an exponent above one, `cos(u)^2` is rewritten as `1 - sin(u)^2`.
//! `cos(u)` is integral over the remaining atoms, so this form is canonical
//! and a polynomial vanishes exactly when it has no terms.

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::atom::Atom;

/// Product of atoms raised to non-zero integer powers.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Monomial(BTreeMap<Atom, i32>);

impl Monomial {
    pub fn one() -> Self {
        Self::default()
    }

    pub fn atom(atom: Atom, exp: i32) -> Self {
        let mut powers = BTreeMap::new();
        if exp != 0 {
            powers.insert(atom, exp);
        }
        Self(powers)
    }

    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    pub fn exponent(&self, atom: &Atom) -> i32 {
        self.0.get(atom).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Atom, i32)> {
        self.0.iter().map(|(a, e)| (a, *e))
    }

    pub fn degree(&self) -> i64 {
        self.0.values().map(|&e| i64::from(e)).sum()
    }

    pub fn with_exponent(&self, atom: &Atom, exp: i32) -> Self {
        let mut powers = self.0.clone();
        if exp == 0 {
            powers.remove(atom);
        } else {
            powers.insert(atom.clone(), exp);
        }
        Self(powers)
    }

    /// Product of two monomials.
    ///
    /// # Panics
    ///
    /// If an exponent of the product leaves the `i32` range. Callers that
    /// take exponents from user input bound them first, see
    /// [`Expr::checked_pow`](super::Expr::checked_pow).
    pub fn mul(&self, other: &Self) -> Self {
        match self.checked_mul(other) {
            Some(m) => m,
            None => panic!("monomial exponent overflow in {:?} * {:?}", self, other),
        }
    }

    pub fn checked_mul(&self, other: &Self) -> Option<Self> {
        let mut powers = self.0.clone();
        for (atom, exp) in &other.0 {
            let slot = powers.entry(atom.clone()).or_insert(0);
            *slot = slot.checked_add(*exp)?;
            if *slot == 0 {
                powers.remove(atom);
            }
        }
        Some(Self(powers))
    }

    /// Largest absolute exponent, zero for the unit monomial.
    pub fn max_exponent(&self) -> u32 {
        self.0.values().map(|e| e.unsigned_abs()).max().unwrap_or(0)
    }

    pub fn inv(&self) -> Self {
        Self(self.0.iter().map(|(a, e)| (a.clone(), -e)).collect())
    }

    /// Exact quotient of two monomials with non-negative exponents.
    pub fn checked_div(&self, other: &Self) -> Option<Self> {
        let mut powers = self.0.clone();
        for (atom, exp) in &other.0 {
            let have = powers.get(atom).copied().unwrap_or(0);
            match have.cmp(exp) {
                Ordering::Less => return None,
                Ordering::Equal => {
                    powers.remove(atom);
                }
                Ordering::Greater => {
                    powers.insert(atom.clone(), have - exp);
                }
            }
        }
        Some(Self(powers))
    }

    /// Split into the positive-power and negative-power parts, both returned
    /// with non-negative exponents.
    pub fn split_signs(&self) -> (Self, Self) {
        let mut upper = BTreeMap::new();
        let mut lower = BTreeMap::new();
        for (atom, &exp) in &self.0 {
            if exp > 0 {
                upper.insert(atom.clone(), exp);
            } else {
                lower.insert(atom.clone(), -exp);
            }
        }
        (Self(upper), Self(lower))
    }

    /// Split into the part over `cos` atoms and the rest.
    pub fn split_cos(&self) -> (Self, Self) {
        let (cos, rest): (BTreeMap<_, _>, BTreeMap<_, _>) =
            self.0.iter().map(|(a, e)| (a.clone(), *e)).partition(|(a, _)| a.is_cos());
        (Self(cos), Self(rest))
    }

    fn excess_cos(&self) -> Option<(&Atom, i32)> {
        self.0.iter().find(|(a, e)| a.is_cos() && **e >= 2).map(|(a, e)| (a, *e))
    }

    /// Pure lexicographic comparison; the smallest atom is the most significant.
    pub fn lex_cmp(&self, other: &Self) -> Ordering {
        let mut lhs = self.0.iter().peekable();
        let mut rhs = other.0.iter().peekable();
        loop {
            match (lhs.peek(), rhs.peek()) {
                (None, None) => return Ordering::Equal,
                (Some((_, ea)), None) => return (**ea).cmp(&0),
                (None, Some((_, eb))) => return 0.cmp(*eb),
                (Some((ka, ea)), Some((kb, eb))) => match ka.cmp(kb) {
                    Ordering::Less => return (**ea).cmp(&0),
                    Ordering::Greater => return 0.cmp(*eb),
                    Ordering::Equal => {
                        if ea != eb {
                            return (**ea).cmp(*eb);
                        }
                        lhs.next();
                        rhs.next();
                    }
                },
            }
        }
    }

    /// Graded lexicographic order, used for division and display.
    pub fn grlex_cmp(&self, other: &Self) -> Ordering {
        self.degree().cmp(&other.degree()).then_with(|| self.lex_cmp(other))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Poly {
    terms: BTreeMap<Monomial, BigRational>,
}

impl Poly {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn one() -> Self {
        Self::constant(BigRational::one())
    }

    pub fn constant(c: BigRational) -> Self {
        Self::term(Monomial::one(), c)
    }

    pub fn term(m: Monomial, c: BigRational) -> Self {
        let mut p = Self::zero();
        p.add_term(m, c);
        p
    }

    pub fn atom(atom: Atom) -> Self {
        Self::term(Monomial::atom(atom, 1), BigRational::one())
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &BigRational)> {
        self.terms.iter()
    }

    /// The value of a constant polynomial, `None` otherwise.
    pub fn as_constant(&self) -> Option<BigRational> {
        match self.terms.len() {
            0 => Some(BigRational::zero()),
            1 => self.terms.get(&Monomial::one()).cloned(),
            _ => None,
        }
    }

    pub fn single_term(&self) -> Option<(&Monomial, &BigRational)> {
        if self.terms.len() == 1 {
            self.terms.iter().next()
        } else {
            None
        }
    }

    pub(crate) fn add_term(&mut self, m: Monomial, c: BigRational) {
        if c.is_zero() {
            return;
        }
        match self.terms.entry(m) {
            Entry::Vacant(slot) => {
                slot.insert(c);
            }
            Entry::Occupied(mut slot) => {
                *slot.get_mut() += c;
                if slot.get().is_zero() {
                    slot.remove();
                }
            }
        }
    }

    pub fn scale(&self, c: &BigRational) -> Poly {
        if c.is_zero() {
            return Poly::zero();
        }
        Poly { terms: self.terms.iter().map(|(m, v)| (m.clone(), v * c)).collect() }
    }

    /// Multiply by a monomial without trigonometric reduction.
    pub fn mul_monomial_raw(&self, m: &Monomial) -> Poly {
        if m.is_one() {
            return self.clone();
        }
        Poly { terms: self.terms.iter().map(|(k, v)| (k.mul(m), v.clone())).collect() }
    }

    pub fn mul_monomial(&self, m: &Monomial) -> Poly {
        self.mul_monomial_raw(m).reduce()
    }

    /// Product in the free polynomial ring (no `cos^2` rewriting).
    pub fn mul_raw(&self, other: &Poly) -> Poly {
        let mut out = Poly::zero();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &other.terms {
                out.add_term(ma.mul(mb), ca * cb);
            }
        }
        out
    }

    pub fn max_exponent(&self) -> u32 {
        self.terms.keys().map(Monomial::max_exponent).max().unwrap_or(0)
    }

    pub fn pow(&self, n: u32) -> Poly {
        let mut result = Poly::one();
        let mut base = self.clone();
        let mut n = n;
        while n > 0 {
            if n & 1 == 1 {
                result = &result * &base;
            }
            n >>= 1;
            if n > 0 {
                base = &base * &base;
            }
        }
        result
    }

    /// Rewrite every `cos(u)^e` with `e >= 2` as `cos(u)^(e mod 2) * (1 - sin(u)^2)^(e div 2)`.
    pub fn reduce(self) -> Poly {
        if !self.terms.keys().any(|m| m.excess_cos().is_some()) {
            return self;
        }
        let mut out = Poly::zero();
        for (m, c) in self.terms {
            let reduced = Self::reduce_term(m, c);
            for (rm, rc) in reduced.terms {
                out.add_term(rm, rc);
            }
        }
        out
    }

    fn reduce_term(m: Monomial, c: BigRational) -> Poly {
        let Some((cos, exp)) = m.excess_cos().map(|(a, e)| (a.clone(), e)) else {
            return Poly::term(m, c);
        };
        let Some(sin) = cos.sin_partner() else {
            return Poly::term(m, c);
        };
        let base = m.with_exponent(&cos, exp % 2);
        let one_minus_sin2 = Poly::one()
            - Poly::term(Monomial::atom(sin, 2), BigRational::one());
        let mut expanded = Poly::term(base, c);
        for _ in 0..exp / 2 {
            expanded = expanded.mul_raw(&one_minus_sin2);
        }
        // other cos atoms in the same monomial are handled by the recursion
        expanded.reduce()
    }

    /// Leading term under graded lexicographic order.
    pub fn leading(&self) -> Option<(&Monomial, &BigRational)> {
        self.terms.iter().max_by(|(a, _), (b, _)| a.grlex_cmp(b))
    }

    /// Terms sorted for display, leading term first.
    pub fn sorted_terms(&self) -> Vec<(&Monomial, &BigRational)> {
        let mut terms: Vec<_> = self.terms.iter().collect();
        terms.sort_by(|(a, _), (b, _)| b.grlex_cmp(a));
        terms
    }

    pub fn atoms(&self) -> BTreeSet<&Atom> {
        self.terms.keys().flat_map(|m| m.iter().map(|(a, _)| a)).collect()
    }

    /// Per-atom minimum exponent over all terms, absent atoms counting as zero.
    pub fn min_exponents(&self) -> Monomial {
        let mut mins = Monomial::one();
        for atom in self.atoms() {
            let low = self.terms.keys().map(|m| m.exponent(atom)).min().unwrap_or(0);
            if low != 0 {
                mins = mins.with_exponent(atom, low);
            }
        }
        mins
    }

    /// Positive rational content: gcd of numerators over lcm of denominators.
    pub fn content(&self) -> BigRational {
        if self.is_zero() {
            return BigRational::one();
        }
        let mut g = BigInt::zero();
        let mut l = BigInt::one();
        for c in self.terms.values() {
            g = g.gcd(c.numer());
            l = l.lcm(c.denom());
        }
        BigRational::new(g, l)
    }

    /// Lowest common denominator of the coefficients.
    pub fn coefficient_lcm(&self) -> BigInt {
        self.terms.values().fold(BigInt::one(), |l, c| l.lcm(c.denom()))
    }

    pub fn depends_on(&self, var: &str) -> bool {
        self.atoms().iter().any(|a| a.depends_on(var))
    }

    /// Exact quotient `self / divisor`, if the division leaves no remainder
    /// in the free polynomial ring. `divisor` must have non-negative
    /// exponents; Laurent terms in `self` are shifted out and back.
    pub fn div_exact(&self, divisor: &Poly) -> Option<Poly> {
        let (lead_m, lead_c) = divisor.leading()?;
        let (_, shift) = self.min_exponents().split_signs();
        let mut rem = self.mul_monomial_raw(&shift);
        let mut quotient = Poly::zero();
        while let Some((rm, rc)) = rem.leading() {
            let m = rm.checked_div(lead_m)?;
            let c = rc / lead_c;
            let step = Poly::term(m.clone(), c.clone());
            rem = &rem - &divisor.mul_raw(&step);
            quotient.add_term(m, c);
        }
        Some(quotient.mul_monomial_raw(&shift.inv()).reduce())
    }

    /// Exact quotient by a denominator factor. A bare `cos(u)` factor is
    /// divided modulo `sin(u)^2 + cos(u)^2 = 1`, since the normal form of
    /// `cos(u)^2` no longer mentions `cos(u)`.
    pub fn div_factor(&self, factor: &Poly) -> Option<Poly> {
        let cos = factor.single_term().and_then(|(m, c)| {
            let mut atoms = m.iter();
            match (atoms.next(), atoms.next()) {
                (Some((a, 1)), None) if a.is_cos() && c.is_one() => Some(a.clone()),
                _ => None,
            }
        });
        let Some(cos) = cos else {
            return self.div_exact(factor);
        };
        let sin = cos.sin_partner()?;
        // self = free + cos * linear, with free and linear not mentioning cos
        let mut free = Poly::zero();
        let mut linear = Poly::zero();
        for (m, c) in &self.terms {
            if m.exponent(&cos) == 0 {
                free.add_term(m.clone(), c.clone());
            } else {
                linear.add_term(m.with_exponent(&cos, 0), c.clone());
            }
        }
        let one_minus_sin2 = Poly::one() - Poly::term(Monomial::atom(sin, 2), BigRational::one());
        let q = free.div_exact(&one_minus_sin2)?;
        Some(&linear + &q.mul_monomial(&Monomial::atom(cos, 1)))
    }

    /// Decompose `self = scale * laurent * cos_part * primitive` where the
    /// primitive part has integer coefficients with gcd one, a positive
    /// leading coefficient and no monomial content.
    pub fn split_content(&self) -> ContentSplit {
        let mins = self.min_exponents();
        let (cos_part, laurent) = mins.split_cos();
        let content = self.content();
        let mut primitive = self.mul_monomial_raw(&mins.inv()).scale(&content.recip());
        let mut scale = content;
        if primitive.leading().map(|(_, c)| c.is_negative()).unwrap_or(false) {
            primitive = -&primitive;
            scale = -scale;
        }
        ContentSplit { scale, laurent, cos_part, primitive }
    }
}

pub struct ContentSplit {
    pub scale: BigRational,
    pub laurent: Monomial,
    pub cos_part: Monomial,
    pub primitive: Poly,
}

impl Add for &Poly {
    type Output = Poly;
    fn add(self, rhs: &Poly) -> Poly {
        let mut out = self.clone();
        for (m, c) in &rhs.terms {
            out.add_term(m.clone(), c.clone());
        }
        out
    }
}

impl Sub for &Poly {
    type Output = Poly;
    fn sub(self, rhs: &Poly) -> Poly {
        let mut out = self.clone();
        for (m, c) in &rhs.terms {
            out.add_term(m.clone(), -c);
        }
        out
    }
}

impl Sub for Poly {
    type Output = Poly;
    fn sub(self, rhs: Poly) -> Poly {
        &self - &rhs
    }
}

impl Neg for &Poly {
    type Output = Poly;
    fn neg(self) -> Poly {
        Poly { terms: self.terms.iter().map(|(m, c)| (m.clone(), -c)).collect() }
    }
}

impl Mul for &Poly {
    type Output = Poly;
    fn mul(self, rhs: &Poly) -> Poly {
        self.mul_raw(rhs).reduce()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cas::atom::FuncKind;
    use crate::core::cas::expr::Expr;

    fn sym(name: &str) -> Poly {
        Poly::atom(Atom::symbol(name))
    }

    fn int(n: i64) -> Poly {
        Poly::constant(BigRational::from_integer(n.into()))
    }

    fn trig(kind: FuncKind) -> Poly {
        Poly::atom(Atom::Func(kind, Box::new(Expr::symbol("x"))))
    }

    #[test]
    fn pythagorean_identity_vanishes() {
        let s = trig(FuncKind::Sin);
        let c = trig(FuncKind::Cos);
        let sum = &(&s * &s) + &(&c * &c);
        assert_eq!(sum, Poly::one());
    }

    #[test]
    fn cos_cubed_keeps_a_linear_cos() {
        let c = trig(FuncKind::Cos);
        let cubed = c.pow(3);
        let cos_atom = Atom::Func(FuncKind::Cos, Box::new(Expr::symbol("x")));
        assert!(cubed.terms().all(|(m, _)| m.exponent(&cos_atom) <= 1));
        assert_eq!(cubed.len(), 2);
    }

    #[test]
    fn monomial_exponents_do_not_wrap() {
        let r = Atom::symbol("r");
        let big = Monomial::atom(r.clone(), i32::MAX);
        assert!(big.checked_mul(&big).is_none());
        assert!(big.inv().checked_mul(&big.inv()).is_none());
        let cancelled = big.checked_mul(&big.inv()).expect("in range");
        assert!(cancelled.is_one());
        assert_eq!(Monomial::atom(r, -7).max_exponent(), 7);
    }

    #[test]
    fn exact_division_of_product() {
        let x = sym("x");
        let y = sym("y");
        let a = &x + &int(1);
        let b = &(&x * &y) - &int(2);
        let prod = &a * &b;
        assert_eq!(prod.div_exact(&a), Some(b.clone()));
        assert_eq!(prod.div_exact(&b), Some(a));
        assert!(b.div_exact(&(&y + &int(3))).is_none());
    }

    #[test]
    fn division_shifts_laurent_terms() {
        let x = sym("x");
        let r = Atom::symbol("r");
        let a = &x + &int(1);
        let laurent = a.mul_monomial_raw(&Monomial::atom(r.clone(), -2));
        let q = laurent.div_exact(&a).expect("divisible");
        assert_eq!(q, Poly::term(Monomial::atom(r, -2), BigRational::one()));
    }

    #[test]
    fn content_split_normalizes_sign_and_scale() {
        let x = sym("x");
        let r = Atom::symbol("r");
        // -4*x*r - 6*r = -2 * r * (2*x + 3)
        let p = (&x.scale(&BigRational::from_integer((-4).into())) - &int(6))
            .mul_monomial_raw(&Monomial::atom(r.clone(), 1));
        let split = p.split_content();
        assert_eq!(split.scale, BigRational::from_integer((-2).into()));
        assert_eq!(split.laurent, Monomial::atom(r, 1));
        assert!(split.cos_part.is_one());
        assert_eq!(split.primitive, &x.scale(&BigRational::from_integer(2.into())) + &int(3));
    }

    #[test]
    fn cos_factor_divides_modulo_pythagoras() {
        let c = trig(FuncKind::Cos);
        let s = trig(FuncKind::Sin);
        // cos^2 * sin normalizes to sin - sin^3, which is still cos * (cos * sin)
        let p = &(&c * &c) * &s;
        assert_eq!(p.div_factor(&c), Some(&c * &s));
        assert!(s.div_factor(&c).is_none());
    }

    #[test]
    fn grlex_prefers_higher_degree() {
        let a = Monomial::atom(Atom::symbol("c"), 2).mul(&Monomial::atom(Atom::symbol("r"), 1));
        let b = Monomial::atom(Atom::symbol("G"), 1).mul(&Monomial::atom(Atom::symbol("M"), 1));
        assert_eq!(a.grlex_cmp(&b), Ordering::Greater);
        assert_eq!(b.lex_cmp(&a), Ordering::Greater);
    }
}
