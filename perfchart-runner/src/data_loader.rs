//! CSV loading for the runner.
//!
//! Resolves one file per configured instrument and reads them concurrently.
//! Each instrument's parse is independent; the rayon collect is the join
//! point, so the chart is only built once every file has been read.
//!
//! The first failure in configured instrument order is reported, which keeps
//! error output stable regardless of which worker finished first.

use perfchart_core::data::{parse_csv_str, RowPolicy};
use perfchart_core::domain::RawSeries;
use perfchart_core::SeriesError;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use crate::config::ChartConfig;

/// Raw series for every configured instrument.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub series: HashMap<String, RawSeries>,
    /// BLAKE3 over symbols, dates, and opens in configured order.
    pub dataset_hash: String,
}

/// Read and parse one instrument's file.
pub fn load_instrument(
    symbol: &str,
    path: &Path,
    policy: RowPolicy,
) -> Result<RawSeries, SeriesError> {
    let text = std::fs::read_to_string(path).map_err(|e| SeriesError::DataUnavailable {
        symbol: symbol.to_string(),
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_csv_str(symbol, &text, policy)
}

/// Load every instrument named by `config`.
pub fn load_all(config: &ChartConfig) -> Result<LoadedData, SeriesError> {
    let started = Instant::now();
    let symbols = config.symbols();

    let results: Vec<Result<RawSeries, SeriesError>> = symbols
        .par_iter()
        .map(|symbol| -> Result<RawSeries, SeriesError> {
            let path = config.path_for(symbol);
            let series = load_instrument(symbol, &path, config.row_policy)?;
            tracing::debug!(
                symbol = symbol.as_str(),
                path = %path.display(),
                rows = series.len(),
                "loaded instrument"
            );
            Ok(series)
        })
        .collect();

    let ordered = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    let dataset_hash = dataset_hash(&ordered);

    tracing::info!(
        instruments = ordered.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        dataset_hash = %dataset_hash,
        "loaded chart data"
    );

    let series = ordered
        .into_iter()
        .map(|s| (s.symbol.clone(), s))
        .collect();

    Ok(LoadedData {
        series,
        dataset_hash,
    })
}

fn dataset_hash(series: &[RawSeries]) -> String {
    let mut hasher = blake3::Hasher::new();
    for s in series {
        hasher.update(s.symbol.as_bytes());
        hasher.update(&(s.len() as u64).to_le_bytes());
        for p in &s.points {
            hasher.update(p.date.format("%Y-%m-%d").to_string().as_bytes());
            hasher.update(&p.open.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
