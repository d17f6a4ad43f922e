// src/core/diagnostics.rs
//! Colored, caret-underlined diagnostics for expression text.

use colored::Colorize;

use crate::core::error::CoreError;

pub struct Span {
    pub line: usize,
    pub col: usize,
    pub len: usize, // underline length (use 1 if unknown)
}

impl Span {
    pub fn single(line: usize, col: usize) -> Self {
        Self { line, col, len: 1 }
    }
}

/// Render the error block: title, location, source line and caret.
pub fn format_error(origin: &str, source: &str, title: &str, span: &Span) -> String {
    let (ln, col) = (span.line, span.col);
    let line_text = nth_line(source, ln).unwrap_or_default();

    // line number gutter
    let ln_str = format!("{:>4}", ln);
    let underline = " ".repeat(col.saturating_sub(1)) + &"^".repeat(span.len.max(1));
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", "error:".bright_red().bold(), title.bright_white()));
    out.push_str(&format!("{} {}\n", "-->".bright_blue(), format!("{}:{}:{}", origin, ln, col).bright_white()));
    out.push_str(&format!(" {} {}\n", ln_str.dimmed(), "|".dimmed()));
    out.push_str(&format!("{} {} {}\n", ln_str.dimmed(), "|".dimmed(), line_text));
    out.push_str(&format!(
        " {} {} {}\n",
        " ".repeat(ln_str.len()).dimmed(),
        "|".dimmed(),
        underline.bright_red()
    ));
    out
}

pub fn print_error(origin: &str, source: &str, title: &str, span: Span) {
    eprintln!("{}", format_error(origin, source, title, &span));
}

/// Print a front-end error against the text it came from. Returns false
/// when the error carries no source position.
pub fn report(origin: &str, source: &str, err: &CoreError) -> bool {
    let Some((line, col)) = err.location() else {
        return false;
    };
    print_error(origin, source, &err.to_string(), Span::single(line, col));
    true
}

fn nth_line(src: &str, n: usize) -> Option<String> {
    src.lines().nth(n.saturating_sub(1)).map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_sits_under_the_column() {
        colored::control::set_override(false);
        let text = format_error("g_tt", "1 - 2*M/$r", "Unexpected character '$'", &Span::single(1, 9));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "error: Unexpected character '$'");
        assert_eq!(lines[1], "--> g_tt:1:9");
        assert_eq!(lines[3], "   1 | 1 - 2*M/$r");
        assert_eq!(lines[4], "      |         ^");
    }
}
