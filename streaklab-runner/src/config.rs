//! Scan configuration: TOML file plus validated settings.
//!
//! ```toml
//! instruments = ["SPY", "QQQ", "IWM"]
//! confidence = 0.95
//! zero_returns = "down"   # down | skip | carry
//! parallel = true
//! verbose = false
//!
//! [screen]
//! start = "2015-01-01"
//! end = "2024-12-31"
//!
//! [backtest.train]
//! start = "2010-01-01"
//! end = "2019-12-31"
//!
//! [backtest.test]
//! start = "2020-01-01"
//! end = "2024-12-31"
//! ```

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use streaklab_core::ZeroReturnPolicy;
use thiserror::Error;

use crate::universe::{InstrumentArg, InstrumentSet};

/// Default confidence: a streak must be rarer than 5% to qualify.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(
        "instruments must be a collection of identifiers, not the single string \"{value}\" \
         (use [\"{value}\"] for one instrument)"
    )]
    InputShape { value: String },

    #[error("confidence must be strictly between 0 and 1 (got {0})")]
    Confidence(f64),

    #[error("{name} window starts on {start} after it ends on {end}")]
    InvertedWindow {
        name: &'static str,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("missing {0}")]
    Missing(&'static str),
}

/// Confidence level in (0, 1). The rarity threshold is its complement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    pub fn new(value: f64) -> Result<Self, ConfigError> {
        if value.is_finite() && value > 0.0 && value < 1.0 {
            Ok(Self(value))
        } else {
            Err(ConfigError::Confidence(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// `1 - confidence`: continuation probabilities below this are rare.
    pub fn threshold(self) -> f64 {
        1.0 - self.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self(DEFAULT_CONFIDENCE)
    }
}

impl TryFrom<f64> for Confidence {
    type Error = ConfigError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> f64 {
        c.0
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(name: &'static str, start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::InvertedWindow { name, start, end });
        }
        Ok(Self { start, end })
    }

    /// `years` back from `end` (Feb 29 falls back to Feb 28).
    pub fn trailing_years(end: NaiveDate, years: u32) -> Self {
        let start = end
            .checked_sub_months(chrono::Months::new(years * 12))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    pub fn overlaps(&self, other: &DateWindow) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Training and test windows of a backtest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktestWindows {
    pub train: DateWindow,
    pub test: DateWindow,
}

impl BacktestWindows {
    pub fn new(train: DateWindow, test: DateWindow) -> Self {
        if train.overlaps(&test) {
            log::warn!(
                "training window {}..{} overlaps test window {}..{}; results include in-sample days",
                train.start,
                train.end,
                test.start,
                test.end
            );
        }
        Self { train, test }
    }
}

/// Settings shared by screening and backtesting.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScanSettings {
    pub confidence: Confidence,
    pub zero_returns: ZeroReturnPolicy,
    /// Evaluate instruments on the rayon thread pool.
    pub parallel: bool,
}

impl ScanSettings {
    pub fn threshold(&self) -> f64 {
        self.confidence.threshold()
    }
}

#[derive(Debug, Deserialize)]
struct RawWindow {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct RawBacktest {
    train: RawWindow,
    test: RawWindow,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    instruments: Option<InstrumentArg>,
    confidence: Option<f64>,
    zero_returns: Option<ZeroReturnPolicy>,
    #[serde(default)]
    parallel: bool,
    #[serde(default)]
    verbose: bool,
    screen: Option<RawWindow>,
    backtest: Option<RawBacktest>,
}

/// Validated contents of a config file. Every section is optional so CLI
/// flags can fill the gaps.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    pub instruments: Option<InstrumentSet>,
    pub settings: ScanSettings,
    pub verbose: bool,
    pub screen: Option<DateWindow>,
    pub backtest: Option<BacktestWindows>,
}

impl ScanConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;

        let instruments = raw.instruments.map(InstrumentSet::try_from).transpose()?;
        let confidence = raw
            .confidence
            .map(Confidence::new)
            .transpose()?
            .unwrap_or_default();
        let screen = raw
            .screen
            .map(|w| DateWindow::new("screen", w.start, w.end))
            .transpose()?;
        let backtest = raw
            .backtest
            .map(|b| -> Result<BacktestWindows, ConfigError> {
                Ok(BacktestWindows::new(
                    DateWindow::new("train", b.train.start, b.train.end)?,
                    DateWindow::new("test", b.test.start, b.test.end)?,
                ))
            })
            .transpose()?;

        Ok(Self {
            instruments,
            settings: ScanSettings {
                confidence,
                zero_returns: raw.zero_returns.unwrap_or_default(),
                parallel: raw.parallel,
            },
            verbose: raw.verbose,
            screen,
            backtest,
        })
    }
}
