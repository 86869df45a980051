//! Alignment of instruments against the reference date axis.
//!
//! Every instrument is charted by index against the reference instrument's
//! dates, so an instrument with a different row count or a different date at
//! some index would be silently shifted. `Strict` turns that into a typed
//! error; `Legacy` keeps the old trusting behavior and only logs it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::RawSeries;
use crate::error::AlignmentError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentPolicy {
    /// Reject any instrument whose length or dates differ from the reference.
    #[default]
    Strict,
    /// Trust the reference axis; short instruments get missing values.
    Legacy,
}

/// Compare one series against the reference.
///
/// Reports the length mismatch first, then the first differing date.
pub fn check_against_reference(
    reference: &RawSeries,
    series: &RawSeries,
) -> Result<(), AlignmentError> {
    if series.len() != reference.len() {
        return Err(AlignmentError::LengthMismatch {
            symbol: series.symbol.clone(),
            reference: reference.symbol.clone(),
            expected: reference.len(),
            actual: series.len(),
        });
    }

    let mismatch = reference
        .points
        .iter()
        .zip(&series.points)
        .position(|(r, s)| r.date != s.date);

    match mismatch {
        Some(index) => Err(AlignmentError::DateMismatch {
            symbol: series.symbol.clone(),
            reference: reference.symbol.clone(),
            index,
            expected: reference.points[index].date,
            actual: series.points[index].date,
        }),
        None => Ok(()),
    }
}

/// Every alignment problem among `symbols`, without failing.
///
/// Missing series are reported as `MissingSeries`.
pub fn find_misalignments(
    raw: &HashMap<String, RawSeries>,
    symbols: &[String],
    reference: &str,
) -> Vec<AlignmentError> {
    let Some(reference_series) = raw.get(reference) else {
        return vec![AlignmentError::MissingSeries {
            symbol: reference.to_string(),
        }];
    };

    symbols
        .iter()
        .filter(|s| s.as_str() != reference)
        .filter_map(|symbol| match raw.get(symbol) {
            None => Some(AlignmentError::MissingSeries {
                symbol: symbol.clone(),
            }),
            Some(series) => check_against_reference(reference_series, series).err(),
        })
        .collect()
}

/// Apply `policy` to the loaded series.
///
/// A missing series is always an error. Under `Strict` the first
/// misalignment is returned; under `Legacy` misalignments are logged and
/// returned as findings for the caller to surface.
pub fn validate_alignment(
    raw: &HashMap<String, RawSeries>,
    symbols: &[String],
    reference: &str,
    policy: AlignmentPolicy,
) -> Result<Vec<AlignmentError>, AlignmentError> {
    let findings = find_misalignments(raw, symbols, reference);

    if let Some(missing) = findings
        .iter()
        .find(|e| matches!(e, AlignmentError::MissingSeries { .. }))
    {
        return Err(missing.clone());
    }

    match policy {
        AlignmentPolicy::Strict => match findings.into_iter().next() {
            Some(first) => Err(first),
            None => Ok(Vec::new()),
        },
        AlignmentPolicy::Legacy => {
            for finding in &findings {
                tracing::warn!(%finding, "series misaligned with reference; charting by index");
            }
            Ok(findings)
        }
    }
}
