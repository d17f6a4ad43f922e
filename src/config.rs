//! `~/.curvature/config.toml`: output switches, the metric to analyze and the
//! numeric cross-check settings. Every table and key is optional.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde::Deserialize;

use crate::core::cas::Bindings;
use crate::core::geometry::numeric::Point;
use crate::core::geometry::{Coordinates, MetricSpec, DIM};

pub fn default_config_path() -> Option<PathBuf> {
    // ~\Users\you\.curvature\config.toml on Windows; ~/.curvature/config.toml elsewhere
    dirs_next::home_dir().map(|h| h.join(".curvature").join("config.toml"))
}

pub fn resolve_config_path(cli_path: &Option<PathBuf>) -> Option<PathBuf> {
    if let Some(p) = cli_path {
        return Some(p.clone());
    }
    default_config_path()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub metric: MetricSpec,
    pub check: CheckConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
    pub simplify: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: false, simplify: true }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    pub step: f64,
    pub tolerance: f64,
    /// Coordinate values, by coordinate name.
    pub point: BTreeMap<String, f64>,
    /// Parameter values such as `G`, `c`, `M`.
    pub params: BTreeMap<String, f64>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        let pairs = |v: &[(&str, f64)]| v.iter().map(|(k, x)| (k.to_string(), *x)).collect();
        Self {
            step: 1e-4,
            tolerance: 1e-6,
            point: pairs(&[("t", 0.0), ("r", 5.0), ("theta", 1.0), ("phi", 0.5)]),
            params: pairs(&[("G", 1.0), ("c", 1.0), ("M", 1.0), ("Q", 0.5), ("k", 0.01)]),
        }
    }
}

impl CheckConfig {
    /// The sample point in the order of `coords`.
    pub fn point_for(&self, coords: &Coordinates) -> Result<Point> {
        let mut x = [0.0; DIM];
        for (i, slot) in x.iter_mut().enumerate() {
            let name = coords.name(i);
            *slot = match self.point.get(name) {
                Some(v) => *v,
                None => bail!("[check.point] has no value for coordinate '{}'", name),
            };
        }
        Ok(x)
    }

    pub fn bindings(&self) -> Bindings {
        self.params.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(text).context("parsing config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let cfg: Config = toml::from_str(&txt).with_context(|| format!("parsing {}", path.display()))?;
        cfg.validate().with_context(|| format!("checking {}", path.display()))?;
        Ok(cfg)
    }

    /// An explicit `--config` must load. The default location is optional:
    /// absent means built-in defaults, unreadable means a warning and defaults.
    pub fn load_or_default(cli_path: &Option<PathBuf>) -> Result<Self> {
        if let Some(path) = cli_path {
            return Self::from_toml_file(path);
        }
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        match Self::from_toml_file(&path) {
            Ok(cfg) => Ok(cfg),
            Err(e) => {
                eprintln!("{} {:#}; using built-in defaults", "warn:".yellow().bold(), e);
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.check.step > 0.0 && self.check.step.is_finite()) {
            bail!("[check] step must be a positive number, got {}", self.check.step);
        }
        if !(self.check.tolerance > 0.0) {
            bail!("[check] tolerance must be positive, got {}", self.check.tolerance);
        }
        Ok(())
    }
}
