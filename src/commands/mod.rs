pub mod check;
pub mod expr;
pub mod metrics;
pub mod patterns;
pub mod run;

use std::process::exit;

use colored::Colorize;

use crate::config::Config;
use crate::core::diagnostics;
use crate::core::error::CoreError;
use crate::core::geometry::{Metric, MetricSpec, Preset};

/// Metric named on the command line, else the one in the config.
pub(crate) fn select_metric(cfg: &Config, name: Option<&str>, pretty: bool) -> anyhow::Result<Metric> {
    let spec = match name {
        Some(name) => MetricSpec::preset(name.parse::<Preset>().map_err(anyhow::Error::msg)?),
        None => cfg.metric.clone(),
    };
    match Metric::from_spec(&spec) {
        Ok(m) => Ok(m),
        Err(e) => fail(&e, pretty),
    }
}

/// Print an expression error against its source text and exit.
pub(crate) fn fail_on_source(origin: &str, source: &str, err: &CoreError, pretty: bool) -> ! {
    if !(pretty && diagnostics::report(origin, source, err)) {
        eprintln!("{} {}", "error:".bright_red(), err);
    }
    exit(1);
}

fn fail(err: &CoreError, pretty: bool) -> ! {
    if let CoreError::Component { row, col, text, .. } = err {
        fail_on_source(&format!("[metric] g[{}][{}]", row, col), text, err, pretty);
    }
    eprintln!("{} {}", "error:".bright_red(), err);
    exit(1);
}
