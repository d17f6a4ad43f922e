use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "curvature",
    about = "Exact curvature of 4-D metrics: inverse, Christoffel symbols, Ricci and Einstein tensors",
    version,
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct CurvatureCli {
    /// Global: unicode output and caret diagnostics
    #[arg(long = "pretty", action = ArgAction::SetTrue, global = true)]
    pub pretty: bool,

    /// Global: stage timings on stderr (same as CURVATURE_DEBUG=1)
    #[arg(long = "debug", action = ArgAction::SetTrue, global = true)]
    pub debug: bool,

    /// Global: path to config (TOML); default: ~/.curvature/config.toml
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute and print every curvature artifact of a metric (default)
    ///
    /// Examples:
    ///   curvature run
    ///   curvature run --metric reissner-nordstrom --pretty
    Run {
        /// Preset name; overrides the [metric] table of the config
        #[arg(long = "metric", value_name = "NAME")]
        metric: Option<String>,

        /// Keep intermediate expressions unsimplified
        #[arg(long = "no-simplify", action = ArgAction::SetTrue)]
        no_simplify: bool,
    },

    /// Compare the symbolic results with finite differences at a point
    Check {
        #[arg(long = "metric", value_name = "NAME")]
        metric: Option<String>,

        /// Finite-difference step
        #[arg(long = "step", value_name = "H")]
        step: Option<f64>,

        /// Largest accepted mixed relative error
        #[arg(long = "tolerance", value_name = "T")]
        tolerance: Option<f64>,
    },

    /// Parse, differentiate and evaluate a single expression
    ///
    /// Examples:
    ///   curvature expr "r^2*sin(theta)^2" --diff theta
    ///   curvature expr "1 - 2*M/r" --at M=1 --at r=4
    Expr {
        #[arg(value_name = "TEXT")]
        text: String,

        /// Differentiate by VAR (repeatable, applied in order)
        #[arg(long = "diff", value_name = "VAR")]
        diff: Vec<String>,

        /// Bind NAME=VALUE for numeric evaluation (repeatable)
        #[arg(long = "at", value_name = "NAME=VALUE", value_parser = parse_binding)]
        at: Vec<(String, f64)>,
    },

    /// List the built-in metrics
    Metrics,

    /// Run the pattern-matrix demo
    Patterns {
        #[arg(long = "size", value_name = "N", default_value_t = 10)]
        size: usize,

        /// RNG seed; random when omitted
        #[arg(long = "seed", value_name = "S")]
        seed: Option<u64>,
    },
}

fn parse_binding(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s.split_once('=').ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let value: f64 = value.trim().parse().map_err(|_| format!("'{}' is not a number", value.trim()))?;
    Ok((name.trim().to_string(), value))
}
