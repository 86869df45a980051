//! Export: JSON and CSV artifacts for chart results.
//!
//! Provides three output shapes:
//! - **JSON**: the full `ChartResult`, with schema versioning
//! - **Records JSON**: `[{"date": ..., "<SYM>": <value|null>, ...}]`, the flat
//!   shape line-chart widgets consume directly
//! - **CSV**: `date,<SYM>...` with empty cells for missing values

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use perfchart_core::domain::{PointRecord, SeriesSet};

use crate::runner::{ChartResult, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `ChartResult` to pretty JSON.
pub fn export_json(result: &ChartResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize ChartResult to JSON")
}

/// Deserialize a `ChartResult` from JSON, rejecting unknown schema versions
/// and points whose value count does not match the instrument count.
pub fn import_json(json: &str) -> Result<ChartResult> {
    let result: ChartResult =
        serde_json::from_str(json).context("failed to deserialize ChartResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }

    let columns = result.series.symbols.len();
    if let Some((index, point)) = result
        .series
        .points
        .iter()
        .enumerate()
        .find(|(_, p)| p.values.len() != columns)
    {
        bail!(
            "point {index} has {} values but the chart has {columns} instruments",
            point.values.len()
        );
    }
    Ok(result)
}

/// Serialize the points as an array of flat records.
pub fn export_records_json(series: &SeriesSet) -> Result<String> {
    let records: Vec<PointRecord<'_>> = series.records().collect();
    serde_json::to_string_pretty(&records).context("failed to serialize chart records to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the points as CSV with one column per instrument.
pub fn export_csv(series: &SeriesSet) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["date".to_string()];
    header.extend(series.symbols.iter().cloned());
    wtr.write_record(&header)?;

    for record in series.records() {
        let mut row = vec![record.date().format("%Y-%m-%d").to_string()];
        row.extend(
            record
                .values()
                .map(|(_, v)| v.map(|v| format!("{v:.6}")).unwrap_or_default()),
        );
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for one chart run.
///
/// Creates a directory named `chart_{timestamp}/` under `output_dir`
/// containing:
/// - `manifest.json`: the full `ChartResult`
/// - `series.json`: record-style points
/// - `series.csv`: the same points as CSV
///
/// Returns the path to the created directory.
pub fn save_artifacts(result: &ChartResult, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!("chart_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("manifest.json"), export_json(result)?)?;
    std::fs::write(run_dir.join("series.json"), export_records_json(&result.series)?)?;
    std::fs::write(run_dir.join("series.csv"), export_csv(&result.series)?)?;

    Ok(run_dir)
}
