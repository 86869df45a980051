//! Per-instrument CSV parsing.
//!
//! Layout: a header line (discarded), then `date,open[,ignored...]` rows.
//! Blank lines are skipped. Rows may carry any number of trailing columns.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::domain::{PricePoint, RawSeries};
use crate::error::SeriesError;

/// What to do with a row that cannot be parsed.
///
/// One policy is applied to every instrument in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPolicy {
    /// Fail the whole series on the first malformed row.
    #[default]
    Abort,
    /// Drop malformed rows with a warning and keep going.
    Skip,
}

/// Parse one instrument's CSV stream into a `RawSeries`, in file order.
pub fn parse_csv<R: Read>(
    symbol: &str,
    reader: R,
    policy: RowPolicy,
) -> Result<RawSeries, SeriesError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut points = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.records() {
        let parsed = match result {
            Ok(record) => {
                if is_blank(&record) {
                    continue;
                }
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                parse_row(&record).map_err(|reason| (line, reason))
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                Err((line, e.to_string()))
            }
        };

        match parsed {
            Ok(point) => points.push(point),
            Err((line, reason)) => match policy {
                RowPolicy::Abort => {
                    return Err(SeriesError::MalformedRow {
                        symbol: symbol.to_string(),
                        line,
                        reason,
                    })
                }
                RowPolicy::Skip => {
                    tracing::warn!(symbol, line, %reason, "skipping malformed row");
                    skipped += 1;
                }
            },
        }
    }

    tracing::debug!(symbol, rows = points.len(), skipped, "parsed csv");
    Ok(RawSeries::new(symbol, points))
}

/// Parse CSV already held in memory.
pub fn parse_csv_str(symbol: &str, text: &str, policy: RowPolicy) -> Result<RawSeries, SeriesError> {
    parse_csv(symbol, text.as_bytes(), policy)
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.is_empty())
}

fn parse_row(record: &StringRecord) -> Result<PricePoint, String> {
    let raw_date = record.get(0).unwrap_or_default();
    let date = parse_date(raw_date).ok_or_else(|| format!("unrecognized date '{raw_date}'"))?;

    let raw_open = record
        .get(1)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "missing open price column".to_string())?;
    let open: f64 = raw_open
        .parse()
        .map_err(|_| format!("open price '{raw_open}' is not a number"))?;
    if !open.is_finite() {
        return Err(format!("open price '{raw_open}' is not finite"));
    }

    Ok(PricePoint::new(date, open))
}

/// Parse a calendar date from the layouts market-data exports commonly use.
///
/// Accepts `2024-01-02`, `2024-01-02 00:00:00-05:00`, `2024-01-02 00:00:00`,
/// and RFC 3339. Time and offset are discarded; the date is taken as written.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    const DOWNLOADER_CSV: &str = "\
Date,Open,High,Low,Close,Volume,Dividends,Stock Splits,Capital Gains
2024-01-02 00:00:00-05:00,472.16,473.67,470.49,472.65,123623700,0.0,0.0,0.0
2024-01-03 00:00:00-05:00,470.43,471.19,468.17,468.79,103585900,0.0,0.0,0.0
2024-01-04 00:00:00-05:00,468.30,470.96,467.05,467.28,84232200,0.0,0.0,0.0
";

    #[test]
    fn parses_downloader_layout_and_ignores_extra_columns() {
        let s = parse_csv_str("SPY", DOWNLOADER_CSV, RowPolicy::Abort).unwrap();
        assert_eq!(s.symbol, "SPY");
        assert_eq!(s.len(), 3);
        assert_eq!(s.points[0], PricePoint::new(d("2024-01-02"), 472.16));
        assert_eq!(s.points[2].open, 468.30);
    }

    #[test]
    fn header_only_is_empty_series() {
        let s = parse_csv_str("SPY", "Date,Open\n", RowPolicy::Abort).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn trailing_blank_line_is_tolerated() {
        let text = "Date,Open\n2024-01-02,100\n2024-01-03,101\n\n";
        let s = parse_csv_str("SMH", text, RowPolicy::Abort).unwrap();
        assert_eq!(s.opens(), vec![100.0, 101.0]);
    }

    #[test]
    fn two_column_rows_parse() {
        let text = "date,open\n2024-03-28,10.5\n2024-04-01,11";
        let s = parse_csv_str("AMD", text, RowPolicy::Abort).unwrap();
        assert_eq!(s.dates(), vec![d("2024-03-28"), d("2024-04-01")]);
    }

    #[test]
    fn abort_policy_reports_line_of_bad_price() {
        let text = "Date,Open\n2024-01-02,100\n2024-01-03,abc\n2024-01-04,102\n";
        let err = parse_csv_str("NVDA", text, RowPolicy::Abort).unwrap_err();
        match err {
            SeriesError::MalformedRow {
                symbol,
                line,
                reason,
            } => {
                assert_eq!(symbol, "NVDA");
                assert_eq!(line, 3);
                assert!(reason.contains("abc"), "{reason}");
            }
            other => panic!("expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn skip_policy_drops_bad_rows() {
        let text = "Date,Open\n2024-01-02,100\nnot-a-date,101\n2024-01-04,\n2024-01-05,103\n";
        let s = parse_csv_str("NVDA", text, RowPolicy::Skip).unwrap();
        assert_eq!(s.opens(), vec![100.0, 103.0]);
    }

    #[test]
    fn non_finite_price_is_malformed() {
        let text = "Date,Open\n2024-01-02,NaN\n";
        assert!(matches!(
            parse_csv_str("SPY", text, RowPolicy::Abort),
            Err(SeriesError::MalformedRow { .. })
        ));
        let text = "Date,Open\n2024-01-02,inf\n";
        assert!(parse_csv_str("SPY", text, RowPolicy::Skip).unwrap().is_empty());
    }

    #[test]
    fn missing_open_column_is_malformed() {
        let text = "Date,Open\n2024-01-02\n";
        let err = parse_csv_str("SPY", text, RowPolicy::Abort).unwrap_err();
        assert!(err.to_string().contains("missing open price"));
    }

    #[test]
    fn date_layouts() {
        assert_eq!(parse_date("2024-01-02"), Some(d("2024-01-02")));
        assert_eq!(parse_date("2024-01-02 00:00:00-05:00"), Some(d("2024-01-02")));
        assert_eq!(parse_date("2024-01-02 09:30:00"), Some(d("2024-01-02")));
        assert_eq!(parse_date("2024-01-02T00:00:00Z"), Some(d("2024-01-02")));
        assert_eq!(parse_date(" 2024-01-02 "), Some(d("2024-01-02")));
        assert_eq!(parse_date("01/02/2024"), None);
        assert_eq!(parse_date(""), None);
    }
}
