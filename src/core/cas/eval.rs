//! Numeric evaluation of exact expressions.

use std::collections::HashMap;
use std::fmt;

use num_traits::ToPrimitive;

use super::atom::{Atom, FuncKind};
use super::expr::Expr;
use super::poly::Poly;

pub type Bindings = HashMap<String, f64>;

#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    Unbound(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Unbound(name) => write!(f, "no numeric value bound for symbol '{}'", name),
        }
    }
}

impl std::error::Error for EvalError {}

impl Expr {
    /// Evaluate with every symbol looked up in `env`. Division by zero
    /// follows IEEE semantics; `Undefined` evaluates to NaN.
    pub fn eval(&self, env: &Bindings) -> Result<f64, EvalError> {
        let Expr::Frac(f) = self else {
            return Ok(f64::NAN);
        };
        let mut cache = HashMap::new();
        let mut value = eval_poly(f.num(), env, &mut cache)?;
        for (factor, exp) in f.factors() {
            value /= eval_poly(factor, env, &mut cache)?.powi(exp as i32);
        }
        Ok(value)
    }
}

fn eval_poly<'a>(p: &'a Poly, env: &Bindings, cache: &mut HashMap<&'a Atom, f64>) -> Result<f64, EvalError> {
    let mut total = 0.0;
    for (m, c) in p.terms() {
        let mut term = c.to_f64().unwrap_or(f64::NAN);
        for (atom, exp) in m.iter() {
            let base = match cache.get(atom) {
                Some(v) => *v,
                None => {
                    let v = eval_atom(atom, env)?;
                    cache.insert(atom, v);
                    v
                }
            };
            term *= base.powi(exp);
        }
        total += term;
    }
    Ok(total)
}

fn eval_atom(atom: &Atom, env: &Bindings) -> Result<f64, EvalError> {
    match atom {
        Atom::Symbol(name) => env.get(name).copied().ok_or_else(|| EvalError::Unbound(name.clone())),
        Atom::Func(kind, arg) => {
            let x = arg.eval(env)?;
            Ok(match kind {
                FuncKind::Sin => x.sin(),
                FuncKind::Cos => x.cos(),
                FuncKind::Exp => x.exp(),
                FuncKind::Ln => x.ln(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn env(pairs: &[(&str, f64)]) -> Bindings {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn evaluates_rational_function() {
        let r = Expr::symbol("r");
        let m = Expr::symbol("M");
        let f = Expr::one() - Expr::integer(2) * &m / &r;
        let v = f.recip().eval(&env(&[("r", 10.0), ("M", 1.0)])).unwrap();
        assert!(approx_eq(v, 1.25));
    }

    #[test]
    fn evaluates_functions() {
        let th = Expr::symbol("theta");
        let e = Expr::sin(th.clone()) * Expr::cos(th);
        let v = e.eval(&env(&[("theta", 0.3)])).unwrap();
        assert!(approx_eq(v, 0.3f64.sin() * 0.3f64.cos()));
    }

    #[test]
    fn unbound_symbol_is_an_error() {
        let e = Expr::symbol("x") + Expr::symbol("y");
        let err = e.eval(&env(&[("x", 1.0)])).unwrap_err();
        assert_eq!(err, EvalError::Unbound("y".into()));
        assert_eq!(err.to_string(), "no numeric value bound for symbol 'y'");
    }

    #[test]
    fn singular_points_are_non_finite() {
        let r = Expr::symbol("r");
        let v = r.recip().eval(&env(&[("r", 0.0)])).unwrap();
        assert!(v.is_infinite());
        assert!(Expr::Undefined.eval(&Bindings::new()).unwrap().is_nan());
    }
}
