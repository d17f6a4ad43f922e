//! Text rendering of expressions.
//!
//! `plain` output is a single line that the expression parser reads back.
//! `pretty` output uses unicode operators, superscript exponents, Greek
//! letters for spelled-out names and a stacked fraction bar.

use num_rational::BigRational;
use num_traits::{One, Signed};

use super::atom::Atom;
use super::expr::Expr;
use super::fraction::Fraction;
use super::poly::{Monomial, Poly};

const GREEK: &[(&str, &str)] = &[
    ("alpha", "α"),
    ("beta", "β"),
    ("gamma", "γ"),
    ("delta", "δ"),
    ("epsilon", "ε"),
    ("theta", "θ"),
    ("lambda", "λ"),
    ("mu", "μ"),
    ("nu", "ν"),
    ("xi", "ξ"),
    ("pi", "π"),
    ("rho", "ρ"),
    ("sigma", "σ"),
    ("tau", "τ"),
    ("phi", "φ"),
    ("chi", "χ"),
    ("psi", "ψ"),
    ("omega", "ω"),
];

const SUPERSCRIPT: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

pub fn plain(expr: &Expr) -> String {
    inline(expr, Style { pretty: false })
}

pub fn pretty(expr: &Expr) -> String {
    pretty_lines(expr).join("\n")
}

/// Symbol name as shown to the reader.
pub fn display_name(name: &str, pretty: bool) -> String {
    if pretty {
        if let Some((_, greek)) = GREEK.iter().find(|(word, _)| *word == name) {
            return (*greek).to_string();
        }
    }
    name.to_string()
}

/// `label = expr`, with the label aligned to the fraction bar when the
/// pretty form spans several lines.
pub fn labeled(label: &str, expr: &Expr, pretty: bool) -> String {
    if !pretty {
        return format!("{} = {}", label, plain(expr));
    }
    let lines = pretty_lines(expr);
    if lines.len() == 1 {
        return format!("{} = {}", label, lines[0]);
    }
    let head = format!("{} = ", label);
    let pad = " ".repeat(head.chars().count());
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| if i == 1 { format!("{}{}", head, line) } else { format!("{}{}", pad, line) })
        .map(|line| line.trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn pretty_lines(expr: &Expr) -> Vec<String> {
    let style = Style { pretty: true };
    let Expr::Frac(f) = expr else {
        return vec!["undefined".to_string()];
    };
    let layout = Layout::of(f, style, true);
    let Some(den) = layout.den else {
        let sign = if layout.negative { style.minus() } else { "" };
        return vec![format!("{}{}", sign, layout.num)];
    };
    let width = layout.num.chars().count().max(den.chars().count());
    let bar = "─".repeat(width);
    let (lead, sign) = if layout.negative { ("  ", "− ") } else { ("", "") };
    vec![
        format!("{}{}", lead, center(&layout.num, width)).trim_end().to_string(),
        format!("{}{}", sign, bar),
        format!("{}{}", lead, center(&den, width)).trim_end().to_string(),
    ]
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let left = (width.saturating_sub(len)) / 2;
    format!("{}{}", " ".repeat(left), text)
}

#[derive(Clone, Copy)]
struct Style {
    pretty: bool,
}

impl Style {
    fn times(self) -> &'static str {
        if self.pretty {
            "·"
        } else {
            "*"
        }
    }

    fn minus(self) -> &'static str {
        if self.pretty {
            "−"
        } else {
            "-"
        }
    }

    fn power(self, base: &str, exp: i32) -> String {
        if exp == 1 {
            return base.to_string();
        }
        if self.pretty {
            let sup: String = exp
                .to_string()
                .chars()
                .map(|ch| match ch.to_digit(10) {
                    Some(d) => SUPERSCRIPT[d as usize],
                    None => '⁻',
                })
                .collect();
            format!("{}{}", base, sup)
        } else {
            format!("{}^{}", base, exp)
        }
    }
}

fn inline(expr: &Expr, style: Style) -> String {
    let Expr::Frac(f) = expr else {
        return "undefined".to_string();
    };
    let layout = Layout::of(f, style, false);
    let mut out = String::new();
    if layout.negative {
        out.push_str(style.minus());
    }
    out.push_str(&layout.num);
    if let Some(den) = layout.den {
        out.push('/');
        out.push_str(&den);
    }
    out
}

/// A fraction split into sign, numerator text and optional denominator text.
struct Layout {
    negative: bool,
    num: String,
    den: Option<String>,
}

impl Layout {
    fn of(f: &Fraction, style: Style, stacked: bool) -> Self {
        let p = f.num();
        if p.is_zero() {
            return Layout { negative: false, num: "0".to_string(), den: None };
        }
        // p = ratio * up / low * inner, inner integral with no monomial content
        let mins = p.min_exponents();
        let (up, low) = mins.split_signs();
        let inner = p.mul_monomial_raw(&mins.inv());
        let lcm = BigRational::from_integer(inner.coefficient_lcm());
        let scaled = inner.scale(&lcm);
        let gcd = scaled.content();
        let mut inner = scaled.scale(&gcd.recip());
        let ratio = gcd / lcm;
        let mut negative = false;
        if inner.sorted_terms().first().map(|(_, c)| c.is_negative()).unwrap_or(false) {
            inner = -&inner;
            negative = true;
        }

        let mut den_parts = Vec::new();
        let mut den_pieces = 0;
        if !ratio.denom().is_one() {
            den_parts.push(ratio.denom().to_string());
            den_pieces += 1;
        }
        if !low.is_one() {
            den_parts.push(monomial(&low, style));
            den_pieces += low.iter().count();
        }
        for (factor, exp) in f.factors() {
            den_parts.push(factor_text(factor, exp, style));
            den_pieces += 1;
        }
        let has_den = !den_parts.is_empty();

        let mut parts = Vec::new();
        if !ratio.numer().is_one() {
            parts.push(ratio.numer().to_string());
        }
        if !up.is_one() {
            parts.push(monomial(&up, style));
        }
        if inner.as_constant().map(|c| !c.is_one()).unwrap_or(true) {
            let body = sum(&inner, style);
            // over a bar the numerator needs no grouping of its own
            let bare = stacked && has_den;
            let grouped = !parts.is_empty() || (!bare && (negative || has_den));
            parts.push(if grouped && inner.len() > 1 { format!("({})", body) } else { body });
        }
        let num = if parts.is_empty() { "1".to_string() } else { parts.join(style.times()) };

        let den = has_den.then(|| {
            let joined = den_parts.join(style.times());
            if !stacked && den_pieces > 1 {
                format!("({})", joined)
            } else {
                joined
            }
        });
        Layout { negative, num, den }
    }
}

fn factor_text(factor: &Poly, exp: u32, style: Style) -> String {
    let exp = i32::try_from(exp).unwrap_or(i32::MAX);
    match factor.single_term() {
        Some((m, c)) if c.is_one() => m
            .iter()
            .map(|(atom, e)| style.power(&atom_text(atom, style), e * exp))
            .collect::<Vec<_>>()
            .join(style.times()),
        _ => style.power(&format!("({})", sum(factor, style)), exp),
    }
}

fn sum(p: &Poly, style: Style) -> String {
    let mut out = String::new();
    for (i, (m, c)) in p.sorted_terms().into_iter().enumerate() {
        let negative = c.is_negative();
        match (i, negative) {
            (0, true) => out.push_str(style.minus()),
            (0, false) => {}
            (_, true) => {
                out.push(' ');
                out.push_str(style.minus());
                out.push(' ');
            }
            (_, false) => out.push_str(" + "),
        }
        out.push_str(&term(m, &c.abs(), style));
    }
    out
}

fn term(m: &Monomial, c: &BigRational, style: Style) -> String {
    let mut pieces = Vec::new();
    if !c.is_one() || m.is_one() {
        pieces.push(coefficient(c));
    }
    if !m.is_one() {
        pieces.push(monomial(m, style));
    }
    pieces.join(style.times())
}

fn coefficient(c: &BigRational) -> String {
    if c.denom().is_one() {
        c.numer().to_string()
    } else {
        format!("{}/{}", c.numer(), c.denom())
    }
}

fn monomial(m: &Monomial, style: Style) -> String {
    m.iter()
        .map(|(atom, exp)| style.power(&atom_text(atom, style), exp))
        .collect::<Vec<_>>()
        .join(style.times())
}

fn atom_text(atom: &Atom, style: Style) -> String {
    match atom {
        Atom::Symbol(name) => display_name(name, style.pretty),
        Atom::Func(kind, arg) => format!("{}({})", kind.name(), inline(arg, style)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(name: &str) -> Expr {
        Expr::symbol(name)
    }

    fn schwarzschild_f() -> Expr {
        Expr::one() - Expr::integer(2) * s("G") * s("M") / (s("c").pow(2) * s("r"))
    }

    #[test]
    fn plain_rendering() {
        assert_eq!(plain(&Expr::zero()), "0");
        assert_eq!(plain(&Expr::rational(-3, 4)), "-3/4");
        assert_eq!(plain(&(s("x") / Expr::integer(2))), "x/2");
        assert_eq!(plain(&(-schwarzschild_f())), "-(c^2*r - 2*G*M)/(c^2*r)");
        assert_eq!(plain(&(Expr::integer(2) * s("G") * s("M") / (s("c").pow(2) * s("r")))), "2*G*M/(c^2*r)");
        let th = s("theta");
        assert_eq!(plain(&-(Expr::sin(th.clone()) * Expr::cos(th))), "-sin(theta)*cos(theta)");
        assert_eq!(plain(&Expr::Undefined), "undefined");
    }

    #[test]
    fn plain_rendering_of_factored_denominator() {
        assert_eq!(plain(&schwarzschild_f().recip()), "c^2*r/(c^2*r - 2*G*M)");
        assert_eq!(plain(&s("r").recip()), "1/r");
        assert_eq!(plain(&(s("x") + Expr::one()).pow(-2)), "1/(x + 1)^2");
    }

    #[test]
    fn pretty_rendering() {
        let th = s("theta");
        assert_eq!(pretty(&(s("r").pow(2) * Expr::sin(th.clone()).pow(2))), "r²·sin(θ)²");
        assert_eq!(pretty(&-(Expr::sin(th.clone()) * Expr::cos(th))), "−sin(θ)·cos(θ)");
        assert_eq!(pretty(&-(s("x") + Expr::one())), "−(x + 1)");
        let lines = pretty_lines(&-schwarzschild_f());
        assert_eq!(lines, vec!["  c²·r − 2·G·M", "− ────────────", "      c²·r"]);
    }

    #[test]
    fn labels_align_with_fraction_bar() {
        let text = labeled("g_tt", &-schwarzschild_f(), true);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("g_tt = − ─"));
        assert_eq!(labeled("g_θθ", &s("r").pow(2), true), "g_θθ = r²");
        assert_eq!(labeled("g_{r r}", &s("r").pow(2), false), "g_{r r} = r^2");
    }
}
