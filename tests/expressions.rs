use curvature::core::cas::{render, Bindings, Expr, Limit};
use curvature::core::compiler::compile_expr;
use curvature::core::diagnostics::{format_error, Span};
use curvature::core::error::CoreError;

fn parse(src: &str) -> Expr {
    compile_expr(src).unwrap_or_else(|e| panic!("{}: {}", src, e))
}

#[test]
fn derivatives_follow_the_usual_rules() {
    let f = parse("r^2*sin(theta)^2");
    assert!(f.diff("theta").equivalent(&parse("2*r^2*sin(theta)*cos(theta)")));
    assert!(parse("ln(r)").diff("r").equivalent(&parse("1/r")));
    assert!(parse("exp(2*t)").diff("t").equivalent(&parse("2*exp(2*t)")));
    assert!(parse("1/(1 - 2*M/r)").diff("r").equivalent(&parse("-2*M/(r - 2*M)^2")));
}

#[test]
fn trig_identities_cancel_exactly() {
    assert!(parse("sin(x)^2 + cos(x)^2 - 1").is_zero());
    assert!(parse("tan(x)*cos(x) - sin(x)").is_zero());
    assert!(parse("(1 - cos(x)^2)/sin(x)").simplify().equivalent(&parse("sin(x)")));
}

#[test]
fn division_by_zero_is_undefined() {
    let e = parse("1/(x - x)");
    assert!(e.is_undefined());
    assert!(e.eval(&Bindings::new()).unwrap().is_nan());
}

#[test]
fn evaluation_and_limits() {
    let f = parse("1 - 2*G*M/(c^2*r)");
    let env: Bindings = [("G", 1.0), ("M", 1.0), ("c", 1.0), ("r", 4.0)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    assert!((f.eval(&env).unwrap() - 0.5).abs() < 1e-15);
    assert!(matches!(f.limit_at_infinity("r"), Limit::Finite(ref e) if e.is_one()));
    assert_eq!(parse("r^2/(r + 1)").limit_at_infinity("r"), Limit::Infinite);
    assert_eq!(parse("sin(r)/r").limit_at_infinity("r"), Limit::Undetermined);
}

#[test]
fn plain_text_reads_back() {
    for src in ["-(1 - 2*G*M/(c^2*r))", "r^2*sin(theta)^2", "1/(x + 1)^2 - x/3", "exp(-t)*ln(r)"] {
        let e = parse(src);
        let again = parse(&render::plain(&e));
        assert!(again.equivalent(&e), "{} -> {}", src, render::plain(&e));
    }
}

#[test]
fn front_end_errors_point_at_the_source() {
    let src = "r^2*sin(theta";
    let err = compile_expr(src).unwrap_err();
    assert!(matches!(err, CoreError::Parse(_)));
    let (line, col) = err.location().unwrap();
    assert_eq!((line, col), (1, 14));

    colored::control::set_override(false);
    let text = format_error("<expr>", src, &err.to_string(), &Span::single(line, col));
    assert!(text.contains("r^2*sin(theta"));
    assert!(text.contains("Expected ')'"));
}
