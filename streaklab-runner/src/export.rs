//! Export: JSON and CSV renderings of screening and backtest reports.
//!
//! - **JSON**: the full report, loadable again with the `import_*` functions
//! - **CSV**: one row per screening candidate, or the backtest signal tape
//!
//! [`save_artifacts`] writes both into a timestamped directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::backtest::BacktestReport;
use crate::screening::ScreeningReport;

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_screening_json(report: &ScreeningReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize ScreeningReport to JSON")
}

pub fn import_screening_json(json: &str) -> Result<ScreeningReport> {
    serde_json::from_str(json).context("failed to deserialize ScreeningReport from JSON")
}

pub fn export_backtest_json(report: &BacktestReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize BacktestReport to JSON")
}

pub fn import_backtest_json(json: &str) -> Result<BacktestReport> {
    serde_json::from_str(json).context("failed to deserialize BacktestReport from JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Screening candidates as CSV.
///
/// Columns: instrument, probability, percent, current_streak, direction,
/// longest_streak, signal
pub fn export_screening_csv(report: &ScreeningReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "instrument",
        "probability",
        "percent",
        "current_streak",
        "direction",
        "longest_streak",
        "signal",
    ])?;

    for (instrument, hit) in &report.candidates {
        wtr.write_record([
            instrument,
            &format!("{:.6}", hit.probability),
            &hit.percent,
            &hit.current_streak.to_string(),
            &hit.direction.to_string(),
            &hit.longest_streak.to_string(),
            &hit.signal.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Backtest signal tape as CSV, instruments in report order.
///
/// Columns: instrument, signal_date, entry_date, side, return
pub fn export_trades_csv(report: &BacktestReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["instrument", "signal_date", "entry_date", "side", "return"])?;

    for result in &report.results {
        for t in &result.trades {
            wtr.write_record([
                &result.instrument,
                &t.signal_date.to_string(),
                &t.entry_date.to_string(),
                &t.side.to_string(),
                &format!("{:.6}", t.ret),
            ])?;
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Files ──────────────────────────────────────────────────────────

/// Write `contents` to `path`, creating parent directories.
pub fn save_to(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// A report that can be written out as an artifact bundle.
pub enum Artifact<'a> {
    Screening(&'a ScreeningReport),
    Backtest(&'a BacktestReport),
}

/// Save a report under `output_dir/{kind}_{timestamp}/`:
/// - `report.json`: the full report
/// - `candidates.csv` or `trades.csv`
///
/// Returns the created directory.
pub fn save_artifacts(artifact: Artifact<'_>, output_dir: &Path) -> Result<PathBuf> {
    let kind = match artifact {
        Artifact::Screening(_) => "screen",
        Artifact::Backtest(_) => "backtest",
    };
    let dirname = format!("{}_{}", kind, chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    match artifact {
        Artifact::Screening(report) => {
            save_to(&run_dir.join("report.json"), &export_screening_json(report)?)?;
            save_to(&run_dir.join("candidates.csv"), &export_screening_csv(report)?)?;
        }
        Artifact::Backtest(report) => {
            save_to(&run_dir.join("report.json"), &export_backtest_json(report)?)?;
            save_to(&run_dir.join("trades.csv"), &export_trades_csv(report)?)?;
        }
    }

    Ok(run_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use streaklab_core::{Direction, Side};

    use crate::backtest::{InstrumentBacktest, SignalTrade};
    use crate::config::{BacktestWindows, DateWindow};
    use crate::outcome::{SkipReason, SkippedInstrument, WindowKind};
    use crate::screening::ScreenHit;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_screening() -> ScreeningReport {
        let mut candidates = BTreeMap::new();
        candidates.insert(
            "SPY".to_string(),
            ScreenHit {
                probability: 0.0123,
                percent: "1.23%".into(),
                current_streak: 6,
                direction: Direction::Down,
                longest_streak: 7,
                signal: Side::Long,
            },
        );
        ScreeningReport {
            window: DateWindow::new("screen", d(2015, 1, 1), d(2024, 12, 31)).unwrap(),
            confidence: 0.95,
            threshold: 0.05,
            candidates,
            evaluated: 2,
            skipped: vec![SkippedInstrument {
                instrument: "TSLA".into(),
                window: WindowKind::Screen,
                reason: SkipReason::DataUnavailable("TSLA".into()),
            }],
        }
    }

    fn sample_backtest() -> BacktestReport {
        let trade = SignalTrade {
            signal_date: d(2023, 3, 2),
            entry_date: d(2023, 3, 3),
            side: Side::Short,
            ret: 0.004,
        };
        BacktestReport {
            windows: BacktestWindows::new(
                DateWindow::new("train", d(2010, 1, 1), d(2019, 12, 31)).unwrap(),
                DateWindow::new("test", d(2020, 1, 1), d(2024, 12, 31)).unwrap(),
            ),
            confidence: 0.95,
            threshold: 0.05,
            results: vec![InstrumentBacktest {
                instrument: "QQQ".into(),
                seq_break: 4,
                training_max_streak: 9,
                long_return: 0.0,
                short_return: 0.004,
                total_return: 0.004,
                long_entries: 0,
                short_entries: 1,
                trades: vec![trade],
            }],
            skipped: Vec::new(),
            aggregate_return: 0.004,
        }
    }

    #[test]
    fn screening_json_roundtrip() {
        let report = sample_screening();
        let json = export_screening_json(&report).unwrap();
        assert!(json.contains("\"data_unavailable\""));
        let loaded = import_screening_json(&json).unwrap();
        assert_eq!(loaded, report);
    }

    #[test]
    fn backtest_json_roundtrip() {
        let report = sample_backtest();
        let loaded = import_backtest_json(&export_backtest_json(&report).unwrap()).unwrap();
        assert_eq!(loaded.results[0].seq_break, 4);
        assert_eq!(loaded.results[0].trades.len(), 1);
    }

    #[test]
    fn screening_csv_rows() {
        let csv = export_screening_csv(&sample_screening()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "instrument,probability,percent,current_streak,direction,longest_streak,signal"
        );
        assert_eq!(lines[1], "SPY,0.012300,1.23%,6,down,7,long");
    }

    #[test]
    fn trades_csv_rows() {
        let csv = export_trades_csv(&sample_backtest()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "QQQ,2023-03-02,2023-03-03,short,0.004000");
    }

    #[test]
    fn save_artifacts_writes_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let run_dir = save_artifacts(Artifact::Backtest(&sample_backtest()), dir.path()).unwrap();
        assert!(run_dir.join("report.json").exists());
        assert!(run_dir.join("trades.csv").exists());

        let screen_dir =
            save_artifacts(Artifact::Screening(&sample_screening()), dir.path()).unwrap();
        assert!(screen_dir.join("candidates.csv").exists());
    }

    #[test]
    fn save_to_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        save_to(&path, "a,b\n").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "a,b\n");
    }
}
