//! One-shot chart run: load, transform, package.

use perfchart_core::domain::{Instrument, SeriesSet};
use perfchart_core::transform::build_series_with_findings;
use perfchart_core::SeriesError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ChartConfig, ConfigError};
use crate::data_loader::{load_all, LoadedData};

/// Version of the serialized `ChartResult` layout.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Everything a chart surface needs to draw one view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartResult {
    pub schema_version: u32,
    /// Line metadata (symbol, display name, color) in column order.
    pub instruments: Vec<Instrument>,
    /// Fingerprint of the input data; empty when nothing was loaded.
    pub dataset_hash: String,
    /// Alignment findings tolerated under the legacy policy.
    #[serde(default)]
    pub warnings: Vec<String>,
    pub series: SeriesSet,
}

impl ChartResult {
    /// A result with no points for the configured instruments.
    pub fn empty(config: &ChartConfig) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            instruments: config.instruments.clone(),
            dataset_hash: String::new(),
            warnings: Vec::new(),
            series: SeriesSet::empty(config.symbols(), config.reference.clone(), config.window),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Load the configured files and build the chart.
pub fn run_chart(config: &ChartConfig) -> Result<ChartResult, RunError> {
    config.validate()?;
    let loaded = load_all(config)?;
    run_chart_from_data(config, &loaded)
}

/// Build the chart from already-loaded series.
pub fn run_chart_from_data(
    config: &ChartConfig,
    loaded: &LoadedData,
) -> Result<ChartResult, RunError> {
    let options = config.build_options();
    let (series, findings) = build_series_with_findings(&loaded.series, &options)?;
    let warnings: Vec<String> = findings.iter().map(ToString::to_string).collect();

    tracing::info!(
        points = series.len(),
        window = series.window,
        reference = %series.reference,
        warnings = warnings.len(),
        "built chart series"
    );

    Ok(ChartResult {
        schema_version: SCHEMA_VERSION,
        instruments: config.instruments.clone(),
        dataset_hash: loaded.dataset_hash.clone(),
        warnings,
        series,
    })
}

/// Like `run_chart`, but never fails: any error is logged and an empty
/// chart is returned so the surface can still render.
pub fn run_chart_or_empty(config: &ChartConfig) -> ChartResult {
    match run_chart(config) {
        Ok(result) => result,
        Err(error) => {
            tracing::error!(%error, "chart data unavailable; rendering empty chart");
            ChartResult::empty(config)
        }
    }
}
