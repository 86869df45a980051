//! Trailing rolling average with warm-up passthrough.
//!
//! out[i] = values[i]                        for i < window - 1
//! out[i] = mean(values[i-window+1 ..= i])   for i >= window - 1
//!
//! The warm-up region passes values through unchanged rather than averaging
//! a shorter window, so the first `window - 1` chart points are unsmoothed.

use super::{SeriesTransform, TransformError};

#[derive(Debug, Clone)]
pub struct RollingAverage {
    window: usize,
    name: String,
}

impl RollingAverage {
    pub fn new(window: usize) -> Result<Self, TransformError> {
        if window == 0 {
            return Err(TransformError::InvalidWindow);
        }
        Ok(Self {
            window,
            name: format!("rolling_{window}"),
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl SeriesTransform for RollingAverage {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, values: &[f64]) -> Result<Vec<f64>, TransformError> {
        rolling_average(values, self.window)
    }
}

/// Trailing mean over exactly `window` elements, with passthrough before
/// the first full window.
pub fn rolling_average(values: &[f64], window: usize) -> Result<Vec<f64>, TransformError> {
    if window == 0 {
        return Err(TransformError::InvalidWindow);
    }

    let n = values.len();
    let mut result = values.to_vec();
    if n < window {
        return Ok(result);
    }

    // Each window is summed directly so no rounding error accumulates
    // across a long series.
    for i in (window - 1)..n {
        let sum: f64 = values[(i + 1 - window)..=i].iter().sum();
        result[i] = sum / window as f64;
    }

    Ok(result)
}
