//! Exact computer algebra over rational functions in symbols and the
//! elementary functions `sin`, `cos`, `exp` and `ln`.
//!
//! Values are `Expr`s: a Laurent polynomial numerator over a product of
//! irreducible-ish denominator factors, with `BigRational` coefficients.
//! Zero testing is exact, so identities such as the vanishing of the
//! Schwarzschild Ricci tensor come out as literal zeros.

pub mod atom;
pub mod diff;
pub mod eval;
pub mod expr;
pub mod fraction;
pub mod limit;
pub mod poly;
pub mod render;

pub use atom::{Atom, FuncKind};
pub use eval::{Bindings, EvalError};
pub use expr::Expr;
pub use limit::Limit;
