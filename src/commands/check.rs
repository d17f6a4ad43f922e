use std::process::exit;

use anyhow::Context;
use colored::Colorize;

use crate::config::Config;
use crate::core::error::CoreError;
use crate::core::geometry::numeric::cross_check;
use crate::core::geometry::{Curvature, Options};

pub fn main_with_opts(
    cfg: &Config,
    metric: Option<&str>,
    step: Option<f64>,
    tolerance: Option<f64>,
    pretty: bool,
) -> anyhow::Result<()> {
    let metric = super::select_metric(cfg, metric, pretty)?;
    let step = step.unwrap_or(cfg.check.step);
    let tolerance = tolerance.unwrap_or(cfg.check.tolerance);
    let point = cfg.check.point_for(metric.coords())?;
    let curvature = Curvature::compute(metric, Options { simplify: cfg.output.simplify })?;

    let result = cross_check(&curvature, &cfg.check.bindings(), &point, step)
        .map_err(CoreError::from)
        .with_context(|| format!("evaluating at {:?}", point))?;

    println!("point:        {:?}", point);
    println!("step:         {:e}", step);
    println!("christoffel:  max mixed error {:e}", result.christoffel_error);
    println!("ricci:        max mixed error {:e}", result.ricci_error);
    if result.passes(tolerance) {
        println!("{} within tolerance {:e}", "ok:".green().bold(), tolerance);
        Ok(())
    } else {
        eprintln!("{} error {:e} exceeds tolerance {:e}", "fail:".bright_red().bold(), result.max_error(), tolerance);
        exit(1);
    }
}
