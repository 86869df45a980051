use serde::{Deserialize, Serialize};

/// One tracked financial series (index fund or equity).
///
/// `name` and `color` are carried through to the output so a chart surface
/// can label and style each line without its own lookup table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Instrument {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            color: color.into(),
        }
    }

    /// Display name, falling back to the ticker symbol.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.symbol
        } else {
            &self.name
        }
    }

    /// The default tracked set: a broad-market index fund, a semiconductor
    /// sector fund, and two individual equities. The first entry is the
    /// reference instrument whose date axis is used.
    pub fn default_set() -> Vec<Instrument> {
        vec![
            Instrument::new("SPY", "S&P 500", "#8884d8"),
            Instrument::new("SMH", "Semicon ETF", "#82ca9d"),
            Instrument::new("NVDA", "NVIDIA", "#ff7300"),
            Instrument::new("AMD", "AMD", "#ff0000"),
        ]
    }
}
