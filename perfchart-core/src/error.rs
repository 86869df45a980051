//! Structured error types for loading and transforming series.
//!
//! These are designed to be displayable in CLI output and in log events.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

use crate::transform::TransformError;

/// Errors raised while turning static CSV files into a `SeriesSet`.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("{symbol}: malformed row at line {line}: {reason}")]
    MalformedRow {
        symbol: String,
        line: u64,
        reason: String,
    },

    #[error("{symbol}: data unavailable at {}: {reason}", path.display())]
    DataUnavailable {
        symbol: String,
        path: PathBuf,
        reason: String,
    },

    #[error("{symbol}: degenerate series: {source}")]
    DegenerateSeries {
        symbol: String,
        #[source]
        source: TransformError,
    },

    #[error("alignment error: {0}")]
    Alignment(#[from] AlignmentError),

    #[error("invalid transform parameters: {0}")]
    InvalidParameters(#[from] TransformError),
}

/// A series does not line up with the reference instrument's date axis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentError {
    #[error("no series loaded for '{symbol}'")]
    MissingSeries { symbol: String },

    #[error("'{symbol}' has {actual} rows but reference '{reference}' has {expected}")]
    LengthMismatch {
        symbol: String,
        reference: String,
        expected: usize,
        actual: usize,
    },

    #[error("'{symbol}' row {index} is dated {actual} but reference '{reference}' is dated {expected}")]
    DateMismatch {
        symbol: String,
        reference: String,
        index: usize,
        expected: NaiveDate,
        actual: NaiveDate,
    },
}
