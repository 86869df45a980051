//! Axis and label helpers for chart surfaces.
//!
//! The time axis is quarter-aligned: one tick at the first trading day of
//! each calendar quarter, labeled `Q{n} {year}`. Values are percentages.

use chrono::{Datelike, NaiveDate};

/// Calendar quarter (1-4) of `date`.
pub fn quarter(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

/// `Q{n} {year}`, e.g. `Q2 2024`.
pub fn quarter_label(date: NaiveDate) -> String {
    format!("Q{} {}", quarter(date), date.year())
}

/// True for dates in January, April, July, or October.
pub fn is_quarter_start_month(date: NaiveDate) -> bool {
    date.month0() % 3 == 0
}

/// One tick per quarter: the first date seen in each quarter-start month.
///
/// `dates` is expected in ascending order. A quarter whose opening month has
/// no data (e.g. the series starts in February) gets no tick.
pub fn quarter_ticks(dates: &[NaiveDate]) -> Vec<NaiveDate> {
    let mut ticks: Vec<NaiveDate> = Vec::new();
    for &date in dates.iter().filter(|d| is_quarter_start_month(**d)) {
        let same_month = ticks
            .last()
            .is_some_and(|t| t.year() == date.year() && t.month() == date.month());
        if !same_month {
            ticks.push(date);
        }
    }
    ticks
}

/// Tooltip-style value: two decimals and a percent sign.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Axis-style value: as-is with a percent sign.
pub fn format_axis_percent(value: f64) -> String {
    format!("{value}%")
}
