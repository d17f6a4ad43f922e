//! curvature main: subcommands, `run` by default.
use clap::Parser; // trait import enables CurvatureCli::parse()

use curvature::cli::{Command, CurvatureCli};
use curvature::commands;
use curvature::config::{resolve_config_path, Config};
use curvature::core::debug;

fn main() -> anyhow::Result<()> {
    let args = CurvatureCli::parse();
    if args.debug {
        debug::enable();
    }

    let cfg = Config::load_or_default(&args.config)?;
    curvature::debug_log!("config: {:?}", resolve_config_path(&args.config));
    let pretty = args.pretty || cfg.output.pretty;

    match args.cmd {
        None => commands::run::main_with_opts(&cfg, None, false, pretty),
        Some(Command::Run { metric, no_simplify }) => {
            commands::run::main_with_opts(&cfg, metric.as_deref(), no_simplify, pretty)
        }
        Some(Command::Check { metric, step, tolerance }) => {
            commands::check::main_with_opts(&cfg, metric.as_deref(), step, tolerance, pretty)
        }
        Some(Command::Expr { text, diff, at }) => commands::expr::main_with_opts(&text, &diff, &at, pretty),
        Some(Command::Metrics) => commands::metrics::main(pretty),
        Some(Command::Patterns { size, seed }) => commands::patterns::main_with_opts(size, seed),
    }
}
