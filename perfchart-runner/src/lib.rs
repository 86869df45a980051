//! Perfchart Runner: configuration, data loading, chart orchestration, export.
//!
//! This crate builds on `perfchart-core` to provide:
//! - TOML configuration with defaults for the four tracked instruments
//! - Concurrent CSV loading with a join before the chart is built
//! - A one-shot run that turns a config into a serializable `ChartResult`
//! - An empty-chart fallback that logs load failures instead of propagating them
//! - JSON (full and record-style) and CSV export with schema versioning

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;

pub use config::{ChartConfig, ConfigError, LoggingConfig};
pub use data_loader::{load_all, load_instrument, LoadedData};
pub use export::{
    export_csv, export_json, export_records_json, import_json, save_artifacts,
};
pub use runner::{
    run_chart, run_chart_from_data, run_chart_or_empty, ChartResult, RunError, SCHEMA_VERSION,
};
