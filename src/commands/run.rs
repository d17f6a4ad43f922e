use crate::config::Config;
use crate::core::geometry::{report, Curvature, Options};

pub fn main_with_opts(cfg: &Config, metric: Option<&str>, no_simplify: bool, pretty: bool) -> anyhow::Result<()> {
    let metric = super::select_metric(cfg, metric, pretty)?;
    let opts = Options { simplify: cfg.output.simplify && !no_simplify };
    crate::debug_log!("run: {} parameters {:?}", metric.coords(), metric.parameters());
    let curvature = Curvature::compute(metric, opts)?;
    println!("{}", report::render(&curvature, pretty));
    Ok(())
}
