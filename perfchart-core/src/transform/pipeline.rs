//! Multi-instrument chart build.
//!
//! For each instrument: percentage change from the first open, then a
//! trailing rolling average. The results are combined by index onto the
//! reference instrument's date axis.

use std::collections::HashMap;

use super::{
    apply_chain, PercentChange, RollingAverage, SeriesTransform, TransformError, DEFAULT_WINDOW,
};
use crate::data::align::{validate_alignment, AlignmentPolicy};
use crate::domain::{CombinedPoint, RawSeries, SeriesSet};
use crate::error::{AlignmentError, SeriesError};

/// Parameters for `build_series`.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    /// Instruments to chart, in output column order.
    pub symbols: Vec<String>,
    /// Instrument whose dates form the output axis.
    pub reference: String,
    pub window: usize,
    pub alignment: AlignmentPolicy,
}

impl BuildOptions {
    pub fn new(symbols: Vec<String>, reference: impl Into<String>) -> Self {
        Self {
            symbols,
            reference: reference.into(),
            window: DEFAULT_WINDOW,
            alignment: AlignmentPolicy::default(),
        }
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_alignment(mut self, alignment: AlignmentPolicy) -> Self {
        self.alignment = alignment;
        self
    }
}

/// Percentage change followed by the rolling average.
pub fn transform_prices(prices: &[f64], window: usize) -> Result<Vec<f64>, TransformError> {
    let rolling = RollingAverage::new(window)?;
    let chain: [&dyn SeriesTransform; 2] = [&PercentChange, &rolling];
    apply_chain(&chain, prices)
}

/// Build the combined chart series.
///
/// Pure: identical input yields identical output.
pub fn build_series(
    raw: &HashMap<String, RawSeries>,
    options: &BuildOptions,
) -> Result<SeriesSet, SeriesError> {
    build_series_with_findings(raw, options).map(|(set, _)| set)
}

/// Like `build_series`, also returning the alignment findings that the
/// legacy policy tolerated. Always empty under `Strict`.
pub fn build_series_with_findings(
    raw: &HashMap<String, RawSeries>,
    options: &BuildOptions,
) -> Result<(SeriesSet, Vec<AlignmentError>), SeriesError> {
    if options.window == 0 {
        return Err(TransformError::InvalidWindow.into());
    }

    let reference = raw
        .get(&options.reference)
        .ok_or_else(|| AlignmentError::MissingSeries {
            symbol: options.reference.clone(),
        })?;

    let findings =
        validate_alignment(raw, &options.symbols, &options.reference, options.alignment)?;

    let smoothed = options
        .symbols
        .iter()
        .map(|symbol| -> Result<Vec<f64>, SeriesError> {
            let series = raw.get(symbol).ok_or_else(|| AlignmentError::MissingSeries {
                symbol: symbol.clone(),
            })?;
            let values = transform_prices(&series.opens(), options.window).map_err(|source| {
                SeriesError::DegenerateSeries {
                    symbol: symbol.clone(),
                    source,
                }
            })?;
            Ok(values)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let points = reference
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| CombinedPoint {
            date: p.date,
            values: smoothed.iter().map(|column| column.get(i).copied()).collect(),
        })
        .collect();

    let set = SeriesSet {
        symbols: options.symbols.clone(),
        reference: options.reference.clone(),
        window: options.window,
        points,
    };
    Ok((set, findings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricePoint;
    use crate::transform::{assert_approx, percentage_change, rolling_average, DEFAULT_EPSILON};
    use chrono::NaiveDate;

    fn series(symbol: &str, opens: &[f64]) -> RawSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        RawSeries::new(
            symbol,
            opens
                .iter()
                .enumerate()
                .map(|(i, &o)| PricePoint::new(base + chrono::Duration::days(i as i64), o))
                .collect(),
        )
    }

    fn raw_map(list: Vec<RawSeries>) -> HashMap<String, RawSeries> {
        list.into_iter().map(|s| (s.symbol.clone(), s)).collect()
    }

    fn opts(symbols: &[&str], window: usize) -> BuildOptions {
        BuildOptions::new(symbols.iter().map(|s| s.to_string()).collect(), symbols[0])
            .with_window(window)
    }

    #[test]
    fn transform_prices_worked_example() {
        let result = transform_prices(&[100.0, 110.0, 90.0, 120.0], 2).unwrap();
        let expected = [0.0, 5.0, 0.0, 5.0];
        for (a, e) in result.iter().zip(expected) {
            assert_approx(*a, e, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn builds_one_point_per_reference_date() {
        let raw = raw_map(vec![
            series("SPY", &[100.0, 110.0, 90.0, 120.0]),
            series("NVDA", &[50.0, 60.0, 70.0, 80.0]),
        ]);
        let set = build_series(&raw, &opts(&["SPY", "NVDA"], 2)).unwrap();

        assert_eq!(set.len(), 4);
        assert_eq!(set.symbols, vec!["SPY", "NVDA"]);
        assert_eq!(set.reference, "SPY");
        assert_eq!(set.points[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_approx(set.get("SPY", 3).unwrap(), 5.0, DEFAULT_EPSILON);
        // NVDA changes: 0, 20, 40, 60 -> rolling(2): 0, 10, 30, 50
        assert_approx(set.get("NVDA", 1).unwrap(), 10.0, DEFAULT_EPSILON);
        assert_approx(set.get("NVDA", 3).unwrap(), 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_first_price_is_degenerate() {
        let raw = raw_map(vec![series("SPY", &[100.0, 101.0]), series("AMD", &[0.0, 1.0])]);
        let err = build_series(&raw, &opts(&["SPY", "AMD"], 2)).unwrap_err();
        match err {
            SeriesError::DegenerateSeries { symbol, source } => {
                assert_eq!(symbol, "AMD");
                assert_eq!(source, TransformError::ZeroBaseline(0.0));
            }
            other => panic!("expected DegenerateSeries, got {other:?}"),
        }
    }

    #[test]
    fn empty_reference_is_degenerate() {
        let raw = raw_map(vec![series("SPY", &[])]);
        assert!(matches!(
            build_series(&raw, &opts(&["SPY"], 20)),
            Err(SeriesError::DegenerateSeries { .. })
        ));
    }

    #[test]
    fn zero_window_is_invalid() {
        let raw = raw_map(vec![series("SPY", &[1.0])]);
        assert!(matches!(
            build_series(&raw, &opts(&["SPY"], 0)),
            Err(SeriesError::InvalidParameters(TransformError::InvalidWindow))
        ));
    }

    #[test]
    fn short_instrument_strict_is_rejected() {
        let raw = raw_map(vec![
            series("SPY", &[100.0, 110.0, 90.0, 120.0]),
            series("SMH", &[100.0, 110.0, 90.0]),
        ]);
        let err = build_series(&raw, &opts(&["SPY", "SMH"], 2)).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::Alignment(AlignmentError::LengthMismatch {
                expected: 4,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn short_instrument_legacy_leaves_last_slot_missing() {
        let raw = raw_map(vec![
            series("SPY", &[100.0, 110.0, 90.0, 120.0]),
            series("SMH", &[100.0, 110.0, 90.0]),
        ]);
        let options = opts(&["SPY", "SMH"], 2).with_alignment(AlignmentPolicy::Legacy);
        let set = build_series(&raw, &options).unwrap();

        assert_eq!(set.len(), 4);
        assert!(set.get("SMH", 2).is_some());
        assert_eq!(set.get("SMH", 3), None);
        assert_eq!(set.latest("SMH"), set.get("SMH", 2));
    }

    #[test]
    fn legacy_findings_come_back_with_the_set() {
        let raw = raw_map(vec![
            series("SPY", &[100.0, 110.0, 90.0, 120.0]),
            series("SMH", &[100.0, 110.0, 90.0]),
        ]);
        let options = opts(&["SPY", "SMH"], 2).with_alignment(AlignmentPolicy::Legacy);
        let (set, findings) = build_series_with_findings(&raw, &options).unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(findings.len(), 1);
        assert!(matches!(
            &findings[0],
            AlignmentError::LengthMismatch { symbol, .. } if symbol == "SMH"
        ));

        let aligned = raw_map(vec![
            series("SPY", &[100.0, 110.0]),
            series("SMH", &[100.0, 110.0]),
        ]);
        let (_, findings) =
            build_series_with_findings(&aligned, &opts(&["SPY", "SMH"], 2)).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn transform_prices_matches_step_by_step() {
        let prices = [472.16, 475.0, 468.3, 480.9, 479.2];
        let changes = percentage_change(&prices).unwrap();
        let stepwise = rolling_average(&changes, 3).unwrap();
        assert_eq!(transform_prices(&prices, 3).unwrap(), stepwise);
    }

    #[test]
    fn reference_need_not_be_charted() {
        let raw = raw_map(vec![series("SPY", &[1.0, 2.0]), series("AMD", &[4.0, 5.0])]);
        let options = BuildOptions::new(vec!["AMD".into()], "SPY").with_window(1);
        let set = build_series(&raw, &options).unwrap();
        assert_eq!(set.symbols, vec!["AMD"]);
        assert_approx(set.get("AMD", 1).unwrap(), 25.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rebuild_is_identical() {
        let raw = raw_map(vec![
            series("SPY", &[100.0, 102.0, 101.0, 105.0, 99.0]),
            series("SMH", &[200.0, 210.0, 190.0, 205.0, 220.0]),
        ]);
        let options = opts(&["SPY", "SMH"], 3);
        assert_eq!(
            build_series(&raw, &options).unwrap(),
            build_series(&raw, &options).unwrap()
        );
    }
}
