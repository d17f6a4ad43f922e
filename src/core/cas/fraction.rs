//! Rational functions kept as a Laurent numerator over a factored denominator.

use std::collections::BTreeMap;

use num_rational::BigRational;

use super::poly::Poly;

/// `num / prod(factor^exp)`.
///
/// Denominator factors are primitive integer polynomials with a positive
/// leading coefficient and no monomial content, or a bare `cos(u)`.
/// Numeric and monomial content always lives in the numerator.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fraction {
    num: Poly,
    den: BTreeMap<Poly, u32>,
}

impl Fraction {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn one() -> Self {
        Self::from_poly(Poly::one())
    }

    pub fn constant(c: BigRational) -> Self {
        Self::from_poly(Poly::constant(c))
    }

    pub fn from_poly(num: Poly) -> Self {
        Self { num, den: BTreeMap::new() }
    }

    /// Rebuild from raw parts, cancelling what the numerator allows.
    pub(crate) fn from_parts(num: Poly, den: BTreeMap<Poly, u32>) -> Self {
        Self::reduced(num, den)
    }

    pub fn num(&self) -> &Poly {
        &self.num
    }

    pub fn factors(&self) -> impl Iterator<Item = (&Poly, u32)> {
        self.den.iter().map(|(f, e)| (f, *e))
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub fn is_polynomial(&self) -> bool {
        self.den.is_empty()
    }

    pub fn as_constant(&self) -> Option<BigRational> {
        if self.den.is_empty() {
            self.num.as_constant()
        } else {
            None
        }
    }

    /// The expanded denominator.
    pub fn den_poly(&self) -> Poly {
        self.den.iter().fold(Poly::one(), |acc, (f, e)| &acc * &f.pow(*e))
    }

    fn reduced(mut num: Poly, den: BTreeMap<Poly, u32>) -> Self {
        if num.is_zero() {
            return Self::zero();
        }
        let mut kept = BTreeMap::new();
        for (factor, mut exp) in den {
            while exp > 0 {
                match num.div_factor(&factor) {
                    Some(q) => {
                        num = q;
                        exp -= 1;
                    }
                    None => break,
                }
            }
            if exp > 0 {
                kept.insert(factor, exp);
            }
        }
        Self { num, den: kept }
    }

    /// `num / (den * divisor)` with `divisor` split into canonical factors.
    /// Known factors in `hints` are pulled out of `divisor` first so that
    /// equal factors share one denominator slot.
    fn over(num: Poly, mut den: BTreeMap<Poly, u32>, divisor: &Poly, hints: &[&Poly]) -> Self {
        let split = divisor.split_content();
        let mut num = num.mul_monomial(&split.laurent.inv()).scale(&split.scale.recip());
        for (cos, exp) in split.cos_part.iter() {
            *den.entry(Poly::atom(cos.clone())).or_insert(0) += exp.unsigned_abs();
        }
        let mut rest = split.primitive;
        for hint in hints {
            if hint.as_constant().is_some() {
                continue;
            }
            while rest.as_constant().is_none() {
                match rest.div_factor(hint) {
                    Some(q) => {
                        *den.entry((*hint).clone()).or_insert(0) += 1;
                        rest = q;
                    }
                    None => break,
                }
            }
        }
        match rest.as_constant() {
            Some(c) => num = num.scale(&c.recip()),
            None => {
                let tail = rest.split_content();
                num = num.mul_monomial(&tail.laurent.inv()).scale(&tail.scale.recip());
                *den.entry(tail.primitive).or_insert(0) += 1;
            }
        }
        Self::reduced(num, den)
    }

    pub fn neg(&self) -> Self {
        Self { num: -&self.num, den: self.den.clone() }
    }

    pub fn add(&self, other: &Self) -> Self {
        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }
        let mut lcm = self.den.clone();
        for (f, &e) in &other.den {
            let slot = lcm.entry(f.clone()).or_insert(0);
            *slot = (*slot).max(e);
        }
        let a = scale_up(&self.num, &self.den, &lcm);
        let b = scale_up(&other.num, &other.den, &lcm);
        Self::reduced(&a + &b, lcm)
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let mut den = self.den.clone();
        for (f, &e) in &other.den {
            *den.entry(f.clone()).or_insert(0) += e;
        }
        Self::reduced(&self.num * &other.num, den)
    }

    /// `None` when `other` is identically zero.
    pub fn div(&self, other: &Self) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        if self.is_zero() {
            return Some(Self::zero());
        }
        let num = &self.num * &other.den_poly();
        let hints: Vec<&Poly> = self.den.keys().chain(other.den.keys()).collect();
        Some(Self::over(num, self.den.clone(), &other.num, &hints))
    }

    pub fn recip(&self) -> Option<Self> {
        Self::one().div(self)
    }

    /// `self^n`, or `None` when an exponent of the result would not fit
    /// the monomial or denominator exponent types.
    pub fn checked_pow(&self, n: u32) -> Option<Self> {
        if n == 0 {
            return Some(Self::one());
        }
        let top = u64::from(self.num.max_exponent()).checked_mul(u64::from(n))?;
        if top > i32::MAX as u64 {
            return None;
        }
        let den = self
            .den
            .iter()
            .map(|(f, e)| e.checked_mul(n).map(|e| (f.clone(), e)))
            .collect::<Option<BTreeMap<_, _>>>()?;
        Some(Self { num: self.num.pow(n), den })
    }

    /// Largest exponent any atom reaches once the denominator is expanded.
    pub fn max_exponent(&self) -> u64 {
        let den = self
            .den
            .iter()
            .map(|(f, e)| u64::from(*e) * u64::from(f.max_exponent().max(1)))
            .max()
            .unwrap_or(0);
        u64::from(self.num.max_exponent()).max(den)
    }

    /// Split composite denominator factors along the other factors and
    /// cancel again.
    pub fn simplify(&self) -> Self {
        let mut num = self.num.clone();
        let mut den = self.den.clone();
        while let Some((composite, part, quotient)) = find_split(&den) {
            let exp = den.remove(&composite).unwrap_or(0);
            *den.entry(part).or_insert(0) += exp;
            let tail = quotient.split_content();
            num = &num * &Poly::term(tail.laurent.inv(), tail.scale.recip()).pow(exp);
            for (cos, e) in tail.cos_part.iter() {
                *den.entry(Poly::atom(cos.clone())).or_insert(0) += e.unsigned_abs() * exp;
            }
            if tail.primitive.as_constant().is_none() {
                *den.entry(tail.primitive).or_insert(0) += exp;
            }
        }
        Self::reduced(num, den)
    }

    pub fn depends_on(&self, var: &str) -> bool {
        self.num.depends_on(var) || self.den.keys().any(|f| f.depends_on(var))
    }
}

fn scale_up(num: &Poly, den: &BTreeMap<Poly, u32>, target: &BTreeMap<Poly, u32>) -> Poly {
    let mut out = num.clone();
    for (f, &e) in target {
        let have = den.get(f).copied().unwrap_or(0);
        if e > have {
            out = &out * &f.pow(e - have);
        }
    }
    out
}

impl From<Poly> for Fraction {
    fn from(p: Poly) -> Self {
        Self::from_poly(p)
    }
}

/// First pair of distinct factors where one divides the other.
fn find_split(den: &BTreeMap<Poly, u32>) -> Option<(Poly, Poly, Poly)> {
    den.keys().find_map(|f| {
        den.keys()
            .filter(|g| *g != f)
            .find_map(|g| f.div_factor(g).map(|q| (f.clone(), g.clone(), q)))
    })
}
