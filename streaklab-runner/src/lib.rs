//! StreakLab Runner — screening, backtesting, configuration, reports.
//!
//! This crate builds on `streaklab-core` to provide:
//! - Batch screening for statistically rare current streaks
//! - Train/test backtest of the contrarian streak-break rule
//! - TOML scan configuration with validated confidence and windows
//! - Per-instrument skip reasons instead of aborted batches
//! - Progress reporting, Markdown reports, JSON/CSV export

pub mod backtest;
mod batch;
pub mod config;
pub mod export;
pub mod outcome;
pub mod progress;
pub mod report;
pub mod screening;
pub mod universe;

pub use backtest::{
    evaluate_trades, generate_signals, run_backtest, seq_break, BacktestReport,
    InstrumentBacktest, SignalTrade,
};
pub use config::{
    BacktestWindows, Confidence, ConfigError, DateWindow, ScanConfig, ScanSettings,
    DEFAULT_CONFIDENCE,
};
pub use export::{save_artifacts, Artifact};
pub use outcome::{SkipReason, SkippedInstrument, WindowKind};
pub use progress::{progress_for, LogProgress, ScanProgress, SilentProgress};
pub use report::format_pct;
pub use screening::{
    profile_instrument, run_screen, ScreenHit, ScreenOutcome, ScreeningReport,
};
pub use universe::{InstrumentArg, InstrumentSet};
