//! Backtest: learn a streak-break length on one window, trade it on another.
//!
//! Per instrument:
//! 1. fetch the training window and learn its streak distribution
//! 2. `K` = the longest streak length whose tail `P(L >= K)` is still at or
//!    above the threshold; `seq_break = K - 1`, one day before the streak
//!    becomes statistically rare
//! 3. fetch the test window separately
//! 4. rolling sum of ±1 labels over `seq_break` rows: `-seq_break` (a down
//!    streak of that length just completed) enters long on the next row,
//!    `+seq_break` enters short on the next row
//! 5. long entries earn the next row's return, short entries its negative
//!
//! No costs, no sizing, no overlap handling: each triggered row contributes
//! one day of return.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use streaklab_core::data::PriceSource;
use streaklab_core::{DirectionSeries, Side, StreakProfile, TailCurve};

use crate::batch::evaluate_each;
use crate::config::{BacktestWindows, ScanSettings};
use crate::outcome::{SkipReason, SkippedInstrument, WindowKind};
use crate::progress::ScanProgress;
use crate::report::format_pct;
use crate::universe::InstrumentSet;

/// One triggered day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalTrade {
    /// Row on which the rolling sum hit ±seq_break.
    pub signal_date: NaiveDate,
    /// Following row, whose return is attributed.
    pub entry_date: NaiveDate,
    pub side: Side,
    /// Signed return: the next-row return for longs, its negative for shorts.
    pub ret: f64,
}

/// Backtest result for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentBacktest {
    pub instrument: String,
    pub seq_break: usize,
    /// Longest streak seen in training.
    pub training_max_streak: usize,
    pub long_return: f64,
    pub short_return: f64,
    pub total_return: f64,
    pub long_entries: usize,
    pub short_entries: usize,
    pub trades: Vec<SignalTrade>,
}

/// Result of a backtest over an instrument set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub windows: BacktestWindows,
    pub confidence: f64,
    pub threshold: f64,
    pub results: Vec<InstrumentBacktest>,
    pub skipped: Vec<SkippedInstrument>,
    /// Sum of per-instrument total returns.
    pub aggregate_return: f64,
}

impl BacktestReport {
    pub fn aggregate_percent(&self) -> String {
        format_pct(self.aggregate_return)
    }

    /// `(instrument, percentage)` per evaluated instrument.
    pub fn lines(&self) -> Vec<(String, String)> {
        self.results
            .iter()
            .map(|r| (r.instrument.clone(), format_pct(r.total_return)))
            .collect()
    }
}

/// Streak length at which to place the contrarian order.
///
/// `K - 1`, where `K` is the longest length with `P(L >= K) >= threshold`.
/// Returns 0 when no window can be formed.
pub fn seq_break(tail: &TailCurve, threshold: f64) -> usize {
    tail.last_length_at_or_above(threshold).saturating_sub(1)
}

/// Rolling-sum entries over a direction series.
///
/// The signal on the last row has no following row inside the series and is
/// dropped.
pub fn generate_signals(directions: &DirectionSeries, seq_break: usize) -> Vec<SignalTrade> {
    let points = directions.points();
    if seq_break == 0 || points.len() <= seq_break {
        return Vec::new();
    }

    let window = seq_break as i32;
    let mut trades = Vec::new();
    let mut rolling: i32 = points[..seq_break].iter().map(|p| p.direction.sign()).sum();

    for t in (seq_break - 1)..(points.len() - 1) {
        if t >= seq_break {
            rolling += points[t].direction.sign() - points[t - seq_break].direction.sign();
        }
        let next = &points[t + 1];
        let side = if rolling == -window {
            Side::Long
        } else if rolling == window {
            Side::Short
        } else {
            continue;
        };
        let ret = match side {
            Side::Long => next.ret,
            Side::Short => -next.ret,
        };
        trades.push(SignalTrade {
            signal_date: points[t].date,
            entry_date: next.date,
            side,
            ret,
        });
    }
    trades
}

/// Score a set of signals.
pub fn evaluate_trades(instrument: &str, seq_break: usize, training_max_streak: usize, trades: Vec<SignalTrade>) -> InstrumentBacktest {
    let (mut long_return, mut short_return) = (0.0, 0.0);
    let (mut long_entries, mut short_entries) = (0, 0);
    for trade in &trades {
        match trade.side {
            Side::Long => {
                long_return += trade.ret;
                long_entries += 1;
            }
            Side::Short => {
                short_return += trade.ret;
                short_entries += 1;
            }
        }
    }
    InstrumentBacktest {
        instrument: instrument.to_string(),
        seq_break,
        training_max_streak,
        long_return,
        short_return,
        total_return: long_return + short_return,
        long_entries,
        short_entries,
        trades,
    }
}

fn backtest_instrument(
    source: &dyn PriceSource,
    instrument: &str,
    windows: BacktestWindows,
    settings: &ScanSettings,
) -> Result<InstrumentBacktest, (WindowKind, SkipReason)> {
    let training = source
        .fetch(instrument, windows.train.start, windows.train.end)
        .map_err(|e| (WindowKind::Training, e.into()))?;
    let profile = StreakProfile::from_prices(&training.series, settings.zero_returns)
        .map_err(|e| (WindowKind::Training, e.into()))?;

    let seq_break = seq_break(&profile.continuation.tail, settings.threshold());
    if seq_break == 0 {
        return Err((WindowKind::Training, SkipReason::NoSignalWindow));
    }

    let test = source
        .fetch(instrument, windows.test.start, windows.test.end)
        .map_err(|e| (WindowKind::Test, e.into()))?;
    if test.series.len() < 2 {
        return Err((WindowKind::Test, SkipReason::InsufficientData(test.series.len())));
    }
    let directions = DirectionSeries::from_prices(&test.series, settings.zero_returns);
    if directions.is_empty() {
        return Err((WindowKind::Test, SkipReason::InsufficientData(test.series.len())));
    }

    let trades = generate_signals(&directions, seq_break);
    Ok(evaluate_trades(
        instrument,
        seq_break,
        profile.distribution.max_len(),
        trades,
    ))
}

/// Backtest every instrument and sum the returns.
pub fn run_backtest(
    source: &dyn PriceSource,
    instruments: &InstrumentSet,
    windows: BacktestWindows,
    settings: &ScanSettings,
    progress: &dyn ScanProgress,
) -> BacktestReport {
    let outcomes = evaluate_each(instruments, settings.parallel, progress, |instrument| {
        let outcome = backtest_instrument(source, instrument, windows, settings);
        match &outcome {
            Ok(r) => progress.on_evaluated(
                instrument,
                &format!(
                    "seq_break {}, {} long / {} short, return {}",
                    r.seq_break,
                    r.long_entries,
                    r.short_entries,
                    format_pct(r.total_return)
                ),
            ),
            Err((_, reason)) => progress.on_skip(instrument, reason),
        }
        outcome
    });

    let mut results = Vec::new();
    let mut skipped = Vec::new();
    for (instrument, outcome) in outcomes {
        match outcome {
            Ok(result) => results.push(result),
            Err((window, reason)) => skipped.push(SkippedInstrument {
                instrument,
                window,
                reason,
            }),
        }
    }

    progress.on_batch_complete(results.len(), skipped.len(), instruments.len());

    let aggregate_return = results.iter().fold(0.0, |acc, r| acc + r.total_return);
    BacktestReport {
        windows,
        confidence: settings.confidence.value(),
        threshold: settings.threshold(),
        results,
        skipped,
        aggregate_return,
    }
}
