//! Domain types for the performance chart.

pub mod instrument;
pub mod series;

pub use instrument::Instrument;
pub use series::{CombinedPoint, PointRecord, PricePoint, RawSeries, SeriesSet};
