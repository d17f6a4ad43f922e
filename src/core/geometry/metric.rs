//! Metric construction: explicit components, built-in presets and metrics
//! described in configuration text.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::{is_symmetric, matrix_from_fn, Coordinates, Matrix4, TensorError, DIM};
use crate::core::cas::Expr;
use crate::core::compiler::compile_expr;
use crate::core::error::CoreError;

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    coords: Coordinates,
    g: Matrix4,
}

impl Metric {
    /// Full component matrix; rejects asymmetric input.
    pub fn new(coords: Coordinates, g: Matrix4) -> Result<Self, TensorError> {
        for i in 0..DIM {
            for j in i + 1..DIM {
                if !g[i][j].equivalent(&g[j][i]) {
                    return Err(TensorError::Asymmetric { i, j });
                }
            }
        }
        Ok(Self { coords, g })
    }

    pub fn diagonal(coords: Coordinates, diag: [Expr; DIM]) -> Self {
        let mut diag = diag.map(Some);
        let g = matrix_from_fn(|i, j| if i == j { diag[i].take().unwrap_or_default() } else { Expr::zero() });
        Self { coords, g }
    }

    /// Dynamically sized input; anything but 4x4 is a `Dimension` error.
    pub fn from_rows(coords: Coordinates, rows: Vec<Vec<Expr>>) -> Result<Self, TensorError> {
        let n = rows.len();
        if let Some(bad) = rows.iter().find(|row| row.len() != DIM) {
            return Err(TensorError::Dimension { rows: n, cols: bad.len() });
        }
        if n != DIM {
            return Err(TensorError::Dimension { rows: n, cols: DIM });
        }
        let mut cells: Vec<Vec<Option<Expr>>> =
            rows.into_iter().map(|row| row.into_iter().map(Some).collect()).collect();
        let g = matrix_from_fn(|i, j| cells[i][j].take().unwrap_or_default());
        Self::new(coords, g)
    }

    pub fn coords(&self) -> &Coordinates {
        &self.coords
    }

    pub fn get(&self, i: usize, j: usize) -> &Expr {
        &self.g[i][j]
    }

    pub fn components(&self) -> &Matrix4 {
        &self.g
    }

    pub fn is_diagonal(&self) -> bool {
        (0..DIM).all(|i| (0..DIM).all(|j| i == j || self.g[i][j].is_zero()))
    }

    pub fn is_symmetric(&self) -> bool {
        is_symmetric(&self.g)
    }

    /// Symbols other than the coordinates, i.e. the parameters to bind
    /// before numeric evaluation.
    pub fn parameters(&self) -> Vec<String> {
        let mut names = std::collections::BTreeSet::new();
        for row in &self.g {
            for e in row {
                names.extend(e.free_symbols());
            }
        }
        names.into_iter().filter(|n| !self.coords.contains(n)).collect()
    }

    /// Exterior of a non-rotating mass `M`:
    /// `diag(-f, 1/f, r^2, r^2 sin^2 theta)` with `f = 1 - 2GM/(c^2 r)`.
    pub fn schwarzschild() -> Self {
        let f = Expr::one() - two_gm_over_c2r();
        spherical_static(f)
    }

    /// Flat spacetime in spherical coordinates.
    pub fn minkowski() -> Self {
        spherical_static(Expr::one())
    }

    /// Charged mass: `f = 1 - 2GM/(c^2 r) + G Q^2/(c^4 r^2)`.
    pub fn reissner_nordstrom() -> Self {
        let (g, c, q, r) = (sym("G"), sym("c"), sym("Q"), sym("r"));
        let charge = g * q.pow(2) / (c.pow(4) * r.pow(2));
        spherical_static(Expr::one() - two_gm_over_c2r() + charge)
    }

    /// Einstein static universe with spatial curvature `k`:
    /// `diag(-1, 1/(1 - k r^2), r^2, r^2 sin^2 theta)`.
    pub fn static_universe() -> Self {
        let r = sym("r");
        let grr = (Expr::one() - sym("k") * r.pow(2)).recip();
        let [_, _, gthth, gphph] = angular_part();
        Self::diagonal(Coordinates::spherical(), [-Expr::one(), grr, gthth, gphph])
    }

    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Schwarzschild => Self::schwarzschild(),
            Preset::Minkowski => Self::minkowski(),
            Preset::ReissnerNordstrom => Self::reissner_nordstrom(),
            Preset::StaticUniverse => Self::static_universe(),
        }
    }

    /// Build from configuration. `rows` wins over `diagonal`; with neither,
    /// the preset (Schwarzschild when unset) is used.
    pub fn from_spec(spec: &MetricSpec) -> Result<Self, CoreError> {
        if spec.rows.is_none() && spec.diagonal.is_none() {
            let preset = spec.preset.unwrap_or_default();
            let metric = Self::preset(preset);
            if let Some(names) = &spec.coordinates {
                if &Coordinates::from_vec(names.clone())? != metric.coords() {
                    return Err(TensorError::PresetCoordinates {
                        preset: preset.to_string(),
                        coords: metric.coords().to_string(),
                    }
                    .into());
                }
            }
            return Ok(metric);
        }
        let coords = match &spec.coordinates {
            Some(names) => Coordinates::from_vec(names.clone())?,
            None => Coordinates::spherical(),
        };
        if let Some(rows) = &spec.rows {
            let mut parsed = Vec::with_capacity(rows.len());
            for (i, row) in rows.iter().enumerate() {
                let mut out = Vec::with_capacity(row.len());
                for (j, text) in row.iter().enumerate() {
                    out.push(compile_component(i, j, text)?);
                }
                parsed.push(out);
            }
            return Ok(Self::from_rows(coords, parsed)?);
        }
        let diag = spec.diagonal.as_deref().unwrap_or_default();
        if diag.len() != DIM {
            return Err(TensorError::Dimension { rows: diag.len(), cols: diag.len() }.into());
        }
        let mut entries = Vec::with_capacity(DIM);
        for (i, text) in diag.iter().enumerate() {
            entries.push(compile_component(i, i, text)?);
        }
        let rows = (0..DIM)
            .map(|i| (0..DIM).map(|j| if i == j { entries[i].clone() } else { Expr::zero() }).collect())
            .collect();
        Ok(Self::from_rows(coords, rows)?)
    }
}

fn compile_component(row: usize, col: usize, text: &str) -> Result<Expr, CoreError> {
    compile_expr(text).map_err(|error| CoreError::Component {
        row,
        col,
        text: text.to_string(),
        error: Box::new(error),
    })
}

fn sym(name: &str) -> Expr {
    Expr::symbol(name)
}

fn two_gm_over_c2r() -> Expr {
    Expr::integer(2) * sym("G") * sym("M") / (sym("c").pow(2) * sym("r"))
}

fn angular_part() -> [Expr; DIM] {
    let r2 = sym("r").pow(2);
    let sin2 = Expr::sin(sym("theta")).pow(2);
    [Expr::zero(), Expr::zero(), r2.clone(), r2 * sin2]
}

/// `diag(-f, 1/f, r^2, r^2 sin^2 theta)`
fn spherical_static(f: Expr) -> Metric {
    let [_, _, gthth, gphph] = angular_part();
    let grr = f.recip();
    Metric::diagonal(Coordinates::spherical(), [-f, grr, gthth, gphph])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    #[default]
    Schwarzschild,
    Minkowski,
    #[serde(alias = "reissner_nordstrom", alias = "rn")]
    ReissnerNordstrom,
    #[serde(alias = "static_universe", alias = "einstein")]
    StaticUniverse,
}

impl Preset {
    pub fn all() -> [Preset; 4] {
        [Preset::Schwarzschild, Preset::Minkowski, Preset::ReissnerNordstrom, Preset::StaticUniverse]
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Schwarzschild => "schwarzschild",
            Preset::Minkowski => "minkowski",
            Preset::ReissnerNordstrom => "reissner-nordstrom",
            Preset::StaticUniverse => "static-universe",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::Schwarzschild => "vacuum exterior of a spherical mass M (params G, c, M)",
            Preset::Minkowski => "flat spacetime in spherical coordinates",
            Preset::ReissnerNordstrom => "charged spherical mass (params G, c, M, Q)",
            Preset::StaticUniverse => "Einstein static universe with spatial curvature k",
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "schwarzschild" => Ok(Preset::Schwarzschild),
            "minkowski" | "flat" => Ok(Preset::Minkowski),
            "reissner-nordstrom" | "rn" => Ok(Preset::ReissnerNordstrom),
            "static-universe" | "einstein" => Ok(Preset::StaticUniverse),
            other => Err(format!(
                "unknown metric '{}' (expected one of: {})",
                other,
                Preset::all().map(Preset::name).join(", ")
            )),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `[metric]` table of the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MetricSpec {
    pub preset: Option<Preset>,
    pub coordinates: Option<Vec<String>>,
    pub diagonal: Option<Vec<String>>,
    pub rows: Option<Vec<Vec<String>>>,
}

impl MetricSpec {
    pub fn preset(preset: Preset) -> Self {
        Self { preset: Some(preset), ..Self::default() }
    }
}
