//! Percentage change from baseline.
//!
//! out[0] = 0
//! out[i] = (price[i] - price[0]) / price[0] * 100
//!
//! Every element is measured against the first observed price, not the
//! previous one.

use super::{SeriesTransform, TransformError};

#[derive(Debug, Clone, Default)]
pub struct PercentChange;

impl PercentChange {
    pub fn new() -> Self {
        Self
    }
}

impl SeriesTransform for PercentChange {
    fn name(&self) -> &str {
        "pct_change"
    }

    fn apply(&self, values: &[f64]) -> Result<Vec<f64>, TransformError> {
        percentage_change(values)
    }
}

/// Percentage change of each price relative to `prices[0]`.
///
/// A zero or non-finite baseline is rejected rather than producing
/// infinities or NaN further down the chart.
pub fn percentage_change(prices: &[f64]) -> Result<Vec<f64>, TransformError> {
    let base = *prices.first().ok_or(TransformError::EmptySeries)?;
    if base == 0.0 || !base.is_finite() {
        return Err(TransformError::ZeroBaseline(base));
    }

    Ok(prices
        .iter()
        .enumerate()
        .map(|(i, &price)| if i == 0 { 0.0 } else { (price - base) / base * 100.0 })
        .collect())
}
