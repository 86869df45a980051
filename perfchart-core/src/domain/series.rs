//! Price series and the combined chart structure.
//!
//! A `RawSeries` is what one CSV file parses into. A `SeriesSet` is what the
//! transform hands to presentation: one `CombinedPoint` per date on the
//! reference instrument's axis, with one value slot per tracked instrument.

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One trading day's opening price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, open: f64) -> Self {
        Self { date, open }
    }
}

/// Ordered (date, open) pairs for one instrument, in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl RawSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Opening prices in order.
    pub fn opens(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.open).collect()
    }

    /// Dates in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }
}

/// One output record per date.
///
/// `values[k]` belongs to `SeriesSet::symbols[k]`. A slot is `None` only when
/// legacy alignment let an instrument run short of the reference axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedPoint {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

/// The full chart-ready output of the transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSet {
    /// Instrument symbols, in output column order.
    pub symbols: Vec<String>,
    /// Symbol whose date axis the points follow.
    pub reference: String,
    /// Rolling-average window the values were smoothed with.
    pub window: usize,
    pub points: Vec<CombinedPoint>,
}

impl SeriesSet {
    /// A set with no points, used when data could not be loaded.
    pub fn empty(symbols: Vec<String>, reference: impl Into<String>, window: usize) -> Self {
        Self {
            symbols,
            reference: reference.into(),
            window,
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn column_index(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Value for `symbol` at point `index`.
    pub fn get(&self, symbol: &str, index: usize) -> Option<f64> {
        let col = self.column_index(symbol)?;
        self.points
            .get(index)
            .and_then(|p| p.values.get(col).copied().flatten())
    }

    /// All values for one instrument, aligned to `dates()`.
    pub fn column(&self, symbol: &str) -> Option<Vec<Option<f64>>> {
        let col = self.column_index(symbol)?;
        Some(
            self.points
                .iter()
                .map(|p| p.values.get(col).copied().flatten())
                .collect(),
        )
    }

    /// The most recent present value for `symbol`.
    pub fn latest(&self, symbol: &str) -> Option<f64> {
        let col = self.column_index(symbol)?;
        self.points
            .iter()
            .rev()
            .find_map(|p| p.values.get(col).copied().flatten())
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Flat `{date, SYM: value, ...}` views of each point, for record-style output.
    pub fn records(&self) -> impl Iterator<Item = PointRecord<'_>> {
        self.points.iter().map(move |point| PointRecord {
            symbols: &self.symbols,
            point,
        })
    }
}

/// Borrowed record view of a `CombinedPoint`.
///
/// Serializes as `{"date": "YYYY-MM-DD", "<SYM>": <value|null>, ...}` with keys
/// in instrument order.
#[derive(Debug, Clone, Copy)]
pub struct PointRecord<'a> {
    symbols: &'a [String],
    point: &'a CombinedPoint,
}

impl PointRecord<'_> {
    pub fn date(&self) -> NaiveDate {
        self.point.date
    }

    /// `(symbol, value)` pairs in instrument order.
    pub fn values(&self) -> impl Iterator<Item = (&str, Option<f64>)> + '_ {
        self.symbols
            .iter()
            .map(String::as_str)
            .zip(self.point.values.iter().copied())
    }
}

impl Serialize for PointRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.symbols.len() + 1))?;
        map.serialize_entry("date", &self.point.date.format("%Y-%m-%d").to_string())?;
        for (symbol, value) in self.values() {
            map.serialize_entry(symbol, &value)?;
        }
        map.end()
    }
}
