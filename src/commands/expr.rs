use colored::Colorize;

use crate::core::cas::{render, Bindings};
use crate::core::compiler::compile_expr;
use crate::core::error::CoreError;

pub fn main_with_opts(text: &str, diff: &[String], at: &[(String, f64)], pretty: bool) -> anyhow::Result<()> {
    let mut expr = match compile_expr(text) {
        Ok(e) => e,
        Err(e) => super::fail_on_source("<expr>", text, &e, pretty),
    };
    for var in diff {
        expr = expr.diff(var);
        crate::debug_log!("expr: d/d{} -> {}", var, expr);
    }
    let expr = expr.simplify();
    let label = if diff.is_empty() {
        "f".to_string()
    } else {
        // last derivative taken is the outermost operator
        let ops: Vec<String> = diff.iter().rev().map(|v| format!("d/d{}", render::display_name(v, pretty))).collect();
        format!("{} f", ops.join(" "))
    };
    println!("{}", render::labeled(&label, &expr, pretty));

    if at.is_empty() {
        return Ok(());
    }
    let env: Bindings = at.iter().cloned().collect();
    let value = expr.eval(&env).map_err(CoreError::from)?;
    if !value.is_finite() {
        eprintln!("{} value is not finite at this point", "warn:".yellow().bold());
    }
    println!("= {}", value);
    Ok(())
}
