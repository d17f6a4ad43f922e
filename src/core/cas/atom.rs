//! Indeterminates of the polynomial ring: plain symbols and elementary
//! function applications.

use std::fmt;

use super::expr::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FuncKind {
    Sin,
    Cos,
    Exp,
    Ln,
}

impl FuncKind {
    pub fn name(self) -> &'static str {
        match self {
            FuncKind::Sin => "sin",
            FuncKind::Cos => "cos",
            FuncKind::Exp => "exp",
            FuncKind::Ln => "ln",
        }
    }

    /// Resolve a source-level function name. `log` is the natural log.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(FuncKind::Sin),
            "cos" => Some(FuncKind::Cos),
            "exp" => Some(FuncKind::Exp),
            "ln" | "log" => Some(FuncKind::Ln),
            _ => None,
        }
    }
}

impl fmt::Display for FuncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Atom {
    Symbol(String),
    Func(FuncKind, Box<Expr>),
}

impl Atom {
    pub fn symbol(name: impl Into<String>) -> Self {
        Atom::Symbol(name.into())
    }

    /// `cos(u)` atoms are reduced against `sin(u)` and never carry negative
    /// or super-linear exponents inside a normalized polynomial.
    pub fn is_cos(&self) -> bool {
        matches!(self, Atom::Func(FuncKind::Cos, _))
    }

    /// The `sin(u)` partner of a `cos(u)` atom.
    pub fn sin_partner(&self) -> Option<Atom> {
        match self {
            Atom::Func(FuncKind::Cos, arg) => Some(Atom::Func(FuncKind::Sin, arg.clone())),
            _ => None,
        }
    }

    pub fn depends_on(&self, var: &str) -> bool {
        match self {
            Atom::Symbol(name) => name == var,
            Atom::Func(_, arg) => arg.depends_on(var),
        }
    }

    /// True when `var` occurs inside a function argument.
    pub fn nests(&self, var: &str) -> bool {
        matches!(self, Atom::Func(_, arg) if arg.depends_on(var))
    }
}
