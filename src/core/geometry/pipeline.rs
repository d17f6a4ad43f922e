//! One pass from a metric to every curvature artifact.

use std::time::Instant;

use super::{Christoffel, EinsteinTensor, InverseMetric, Metric, Ricci, TensorError};
use crate::core::cas::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Simplify each Christoffel and Ricci entry as it is produced.
    pub simplify: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { simplify: true }
    }
}

#[derive(Debug, Clone)]
pub struct Curvature {
    pub metric: Metric,
    pub inverse: InverseMetric,
    pub christoffel: Christoffel,
    pub ricci: Ricci,
    pub scalar: Expr,
    pub einstein: EinsteinTensor,
}

impl Curvature {
    pub fn compute(metric: Metric, opts: Options) -> Result<Self, TensorError> {
        let started = Instant::now();
        crate::debug_log!("curvature: coordinates {} simplify={}", metric.coords(), opts.simplify);

        let stage = Instant::now();
        let inverse = metric.inverse()?;
        crate::debug_log!("curvature: inverse in {:?}", stage.elapsed());

        let christoffel = Christoffel::compute(&metric, &inverse, opts.simplify);
        let ricci = Ricci::compute(&christoffel, metric.coords(), opts.simplify);

        let stage = Instant::now();
        let scalar = ricci.scalar(&inverse);
        let einstein = ricci.einstein(&metric, &inverse);
        crate::debug_log!("curvature: scalar and einstein in {:?}", stage.elapsed());

        crate::debug_log!("curvature: total {:?}", started.elapsed());
        Ok(Self { metric, inverse, christoffel, ricci, scalar, einstein })
    }

    pub fn is_vacuum(&self) -> bool {
        self.ricci.is_vacuum()
    }
}
