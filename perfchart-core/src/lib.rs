//! Perfchart Core: domain types, CSV parsing, alignment, and the series transform.
//!
//! This crate contains the numeric heart of the chart pipeline:
//! - Domain types (price points, raw series, combined chart points, instruments)
//! - CSV row parsing with a uniform malformed-row policy
//! - Alignment validation against a reference instrument's date axis
//! - Percentage-change-from-baseline and trailing rolling-average transforms
//! - Axis helpers (quarter ticks, percent formatting) for presentation layers

pub mod axis;
pub mod data;
pub mod domain;
pub mod error;
pub mod transform;

pub use error::{AlignmentError, SeriesError};
