//! Serializable chart configuration.
//!
//! Every field has a default, so an empty TOML file describes the stock
//! four-instrument chart reading `data/{SYMBOL}_historical.csv`.

use perfchart_core::data::{AlignmentPolicy, RowPolicy};
use perfchart_core::domain::Instrument;
use perfchart_core::transform::{BuildOptions, DEFAULT_WINDOW};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Placeholder substituted with the ticker in `file_pattern`.
pub const SYMBOL_PLACEHOLDER: &str = "{symbol}";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Directory holding the per-instrument CSV files.
    pub data_dir: PathBuf,
    /// File name per instrument; `{symbol}` is replaced by the ticker.
    pub file_pattern: String,
    /// Instrument whose dates form the chart axis.
    pub reference: String,
    /// Rolling-average window.
    pub window: usize,
    pub row_policy: RowPolicy,
    pub alignment: AlignmentPolicy,
    pub instruments: Vec<Instrument>,
    pub logging: LoggingConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_pattern: format!("{SYMBOL_PLACEHOLDER}_historical.csv"),
            reference: "SPY".into(),
            window: DEFAULT_WINDOW,
            row_policy: RowPolicy::default(),
            alignment: AlignmentPolicy::default(),
            instruments: Instrument::default_set(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ChartConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instruments.is_empty() {
            return Err(ConfigError::Invalid("at least one instrument is required".into()));
        }
        if self.window == 0 {
            return Err(ConfigError::Invalid("window must be at least 1".into()));
        }
        if !self.file_pattern.contains(SYMBOL_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "file_pattern '{}' must contain {SYMBOL_PLACEHOLDER}",
                self.file_pattern
            )));
        }

        let mut seen = HashSet::new();
        for instrument in &self.instruments {
            if instrument.symbol.trim().is_empty() {
                return Err(ConfigError::Invalid("instrument symbol is empty".into()));
            }
            if !seen.insert(instrument.symbol.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "instrument '{}' is listed twice",
                    instrument.symbol
                )));
            }
        }
        if !seen.contains(self.reference.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "reference '{}' is not one of the configured instruments",
                self.reference
            )));
        }
        Ok(())
    }

    /// Symbols in chart column order.
    pub fn symbols(&self) -> Vec<String> {
        self.instruments.iter().map(|i| i.symbol.clone()).collect()
    }

    /// CSV path for one instrument.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.data_dir
            .join(self.file_pattern.replace(SYMBOL_PLACEHOLDER, symbol))
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions::new(self.symbols(), self.reference.clone())
            .with_window(self.window)
            .with_alignment(self.alignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default_chart() {
        let config = ChartConfig::from_toml("").unwrap();
        assert_eq!(config, ChartConfig::default());
        assert_eq!(config.symbols(), vec!["SPY", "SMH", "NVDA", "AMD"]);
        assert_eq!(config.window, 20);
        assert_eq!(config.row_policy, RowPolicy::Abort);
        assert_eq!(config.alignment, AlignmentPolicy::Strict);
    }

    #[test]
    fn toml_roundtrip() {
        let config = ChartConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = ChartConfig::from_toml(&text).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn parses_custom_config() {
        let text = r##"
data_dir = "fixtures"
file_pattern = "{symbol}.csv"
reference = "QQQ"
window = 5
row_policy = "skip"
alignment = "legacy"

[[instruments]]
symbol = "QQQ"
name = "Nasdaq 100"
color = "#123456"

[[instruments]]
symbol = "TSM"

[logging]
level = "debug"
"##;
        let config = ChartConfig::from_toml(text).unwrap();
        assert_eq!(config.reference, "QQQ");
        assert_eq!(config.window, 5);
        assert_eq!(config.row_policy, RowPolicy::Skip);
        assert_eq!(config.alignment, AlignmentPolicy::Legacy);
        assert_eq!(config.instruments[1].display_name(), "TSM");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.path_for("TSM"), PathBuf::from("fixtures/TSM.csv"));
    }

    #[test]
    fn default_path_pattern() {
        let config = ChartConfig::default();
        assert_eq!(
            config.path_for("NVDA"),
            PathBuf::from("data/NVDA_historical.csv")
        );
    }

    #[test]
    fn rejects_reference_outside_instruments() {
        let err = ChartConfig::from_toml("reference = \"QQQ\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("QQQ")));
    }

    #[test]
    fn rejects_zero_window() {
        assert!(matches!(
            ChartConfig::from_toml("window = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_duplicate_symbols() {
        let text = r#"
reference = "SPY"
[[instruments]]
symbol = "SPY"
[[instruments]]
symbol = "SPY"
"#;
        assert!(matches!(
            ChartConfig::from_toml(text),
            Err(ConfigError::Invalid(msg)) if msg.contains("twice")
        ));
    }

    #[test]
    fn rejects_pattern_without_placeholder() {
        assert!(matches!(
            ChartConfig::from_toml("file_pattern = \"prices.csv\""),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn unknown_policy_is_parse_error() {
        assert!(matches!(
            ChartConfig::from_toml("alignment = \"loose\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn build_options_follow_config() {
        let mut config = ChartConfig::default();
        config.window = 10;
        config.alignment = AlignmentPolicy::Legacy;
        let options = config.build_options();
        assert_eq!(options.window, 10);
        assert_eq!(options.reference, "SPY");
        assert_eq!(options.alignment, AlignmentPolicy::Legacy);
        assert_eq!(options.symbols.len(), 4);
    }
}
