//! Series transforms.
//!
//! Transforms are pure functions: numeric series in, numeric series of the
//! same length out. The chart pipeline applies two of them per instrument,
//! percentage change from the first observed price followed by a trailing
//! rolling average, then combines instruments on a shared date axis.

pub mod percent_change;
pub mod pipeline;
pub mod rolling;

pub use percent_change::{percentage_change, PercentChange};
pub use pipeline::{build_series, build_series_with_findings, transform_prices, BuildOptions};
pub use rolling::{rolling_average, RollingAverage};

use thiserror::Error;

/// Smoothing window used by the chart.
pub const DEFAULT_WINDOW: usize = 20;

/// Reasons a transform refuses its input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("series is empty")]
    EmptySeries,

    #[error("baseline price is {0}; percentage change is undefined")]
    ZeroBaseline(f64),

    #[error("rolling window must be at least 1")]
    InvalidWindow,
}

/// A length-preserving numeric transform.
pub trait SeriesTransform: Send + Sync {
    /// Human-readable name (e.g., "pct_change", "rolling_20").
    fn name(&self) -> &str;

    /// Apply the transform. The output has the same length as `values`.
    fn apply(&self, values: &[f64]) -> Result<Vec<f64>, TransformError>;
}

/// Run `values` through each transform in turn.
pub fn apply_chain(
    chain: &[&dyn SeriesTransform],
    values: &[f64],
) -> Result<Vec<f64>, TransformError> {
    let mut current = values.to_vec();
    for transform in chain {
        current = transform.apply(&current)?;
        tracing::trace!(transform = transform.name(), len = current.len(), "applied transform");
    }
    Ok(current)
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for transform tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
