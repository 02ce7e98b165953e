//! Human-readable Markdown reports for screening, backtest and profile runs.

use streaklab_core::StreakProfile;

use crate::backtest::BacktestReport;
use crate::outcome::SkippedInstrument;
use crate::screening::{ScreenOutcome, ScreeningReport};

/// Two-decimal percentage, e.g. `0.0123` → `"1.23%"`.
/// Values that round to zero print as `"0.00%"`, never `"-0.00%"`.
pub fn format_pct(fraction: f64) -> String {
    let pct = fraction * 100.0;
    if pct.abs() < 0.005 {
        return "0.00%".to_string();
    }
    format!("{pct:.2}%")
}

/// Markdown report for a screening run.
pub fn screening_report(report: &ScreeningReport) -> String {
    let mut md = String::with_capacity(1024);

    md.push_str("# Streak Screen\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!(
        "| Window | {} to {} |\n",
        report.window.start, report.window.end
    ));
    md.push_str(&format!("| Confidence | {} |\n", format_pct(report.confidence)));
    md.push_str(&format!("| Threshold | {} |\n", format_pct(report.threshold)));
    md.push_str(&format!("| Evaluated | {} |\n", report.evaluated));
    md.push_str(&format!("| Skipped | {} |\n", report.skipped.len()));
    md.push('\n');

    md.push_str("## Candidates\n\n");
    match report.outcome() {
        ScreenOutcome::Candidates(candidates) => {
            md.push_str("| Instrument | Continuation | Streak | Longest | Signal |\n");
            md.push_str("| --- | ---: | ---: | ---: | --- |\n");
            for (instrument, hit) in candidates {
                md.push_str(&format!(
                    "| {} | {} | {} {} | {} | {} |\n",
                    instrument,
                    hit.percent,
                    hit.current_streak,
                    hit.direction,
                    hit.longest_streak,
                    hit.signal
                ));
            }
        }
        ScreenOutcome::NoCandidates(message) => {
            md.push_str(&message);
            md.push('\n');
        }
    }
    md.push('\n');

    push_skipped(&mut md, &report.skipped);
    md
}

/// Markdown report for a backtest run.
pub fn backtest_report(report: &BacktestReport) -> String {
    let mut md = String::with_capacity(1024);

    md.push_str("# Streak Backtest\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!(
        "| Training | {} to {} |\n",
        report.windows.train.start, report.windows.train.end
    ));
    md.push_str(&format!(
        "| Test | {} to {} |\n",
        report.windows.test.start, report.windows.test.end
    ));
    md.push_str(&format!("| Confidence | {} |\n", format_pct(report.confidence)));
    md.push_str(&format!("| Threshold | {} |\n", format_pct(report.threshold)));
    md.push('\n');

    md.push_str("## Results\n\n");
    if report.results.is_empty() {
        md.push_str("No instrument produced a backtest.\n");
    } else {
        md.push_str("| Instrument | seq_break | Long | Short | Long Return | Short Return | Total |\n");
        md.push_str("| --- | ---: | ---: | ---: | ---: | ---: | ---: |\n");
        for r in &report.results {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} |\n",
                r.instrument,
                r.seq_break,
                r.long_entries,
                r.short_entries,
                format_pct(r.long_return),
                format_pct(r.short_return),
                format_pct(r.total_return)
            ));
        }
    }
    md.push('\n');
    md.push_str(&format!("**Aggregate return:** {}\n\n", report.aggregate_percent()));

    push_skipped(&mut md, &report.skipped);
    md
}

/// Distribution, tail curve and current streak of one instrument.
pub fn profile_report(instrument: &str, profile: &StreakProfile) -> String {
    let mut md = String::with_capacity(1024);

    md.push_str(&format!("# Streak Profile: {instrument}\n\n"));
    md.push_str(&format!(
        "Current streak: {} {} day(s), continuation {}{}\n\n",
        profile.current_streak(),
        profile.current_direction(),
        format_pct(profile.continuation_probability()),
        if profile.continuation.is_unprecedented() {
            " (unprecedented)"
        } else {
            ""
        }
    ));

    let dist = &profile.distribution;
    let tail = &profile.continuation.tail;
    md.push_str("| Length | Count | P(L = n) | P(L >= n) |\n");
    md.push_str("| ---: | ---: | ---: | ---: |\n");
    for (len, p) in dist.iter() {
        let filled = if dist.synthesized().contains(&len) { "*" } else { "" };
        md.push_str(&format!(
            "| {} | {}{} | {} | {} |\n",
            len,
            dist.counts().get(len - 1).copied().unwrap_or(0),
            filled,
            format_pct(p),
            format_pct(tail.at_least(len))
        ));
    }
    if !dist.synthesized().is_empty() {
        md.push_str("\n\\* count filled in for an unobserved length\n");
    }
    md
}

fn push_skipped(md: &mut String, skipped: &[SkippedInstrument]) {
    if skipped.is_empty() {
        return;
    }
    md.push_str("## Skipped\n\n");
    for s in skipped {
        md.push_str(&format!(
            "- {} ({:?} window): {}\n",
            s.instrument, s.window, s.reason
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BacktestWindows, DateWindow};
    use crate::outcome::{SkipReason, WindowKind};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use streaklab_core::{Direction, PricePoint, PriceSeries, ZeroReturnPolicy};

    fn window() -> DateWindow {
        DateWindow::new(
            "screen",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn pct_has_two_decimals() {
        assert_eq!(format_pct(0.0), "0.00%");
        assert_eq!(format_pct(0.0123), "1.23%");
        assert_eq!(format_pct(-0.5), "-50.00%");
    }

    #[test]
    fn pct_never_prints_negative_zero() {
        assert_eq!(format_pct(-0.0), "0.00%");
        assert_eq!(format_pct(-0.00001), "0.00%");
        assert_eq!(format_pct(-0.0001), "-0.01%");
    }

    #[test]
    fn empty_screen_prints_message_and_skips() {
        let report = ScreeningReport {
            window: window(),
            confidence: 0.95,
            threshold: 0.05,
            candidates: BTreeMap::new(),
            evaluated: 0,
            skipped: vec![SkippedInstrument {
                instrument: "GONE".into(),
                window: WindowKind::Screen,
                reason: SkipReason::DataUnavailable("GONE".into()),
            }],
        };
        let md = screening_report(&report);
        assert!(md.contains("No instrument has a current streak"));
        assert!(md.contains("## Skipped"));
        assert!(md.contains("No data found for: GONE"));
    }

    #[test]
    fn backtest_report_shows_aggregate() {
        let report = BacktestReport {
            windows: BacktestWindows::new(
                DateWindow::new(
                    "train",
                    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2021, 12, 31).unwrap(),
                )
                .unwrap(),
                window(),
            ),
            confidence: 0.95,
            threshold: 0.05,
            results: Vec::new(),
            skipped: Vec::new(),
            aggregate_return: 0.0125,
        };
        let md = backtest_report(&report);
        assert!(md.contains("No instrument produced a backtest."));
        assert!(md.contains("**Aggregate return:** 1.25%"));
        assert!(!md.contains("## Skipped"));
    }

    #[test]
    fn profile_marks_filled_lengths() {
        // up x3, down x1, up x1: length 2 never observed
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let prices = [100.0, 101.0, 102.0, 103.0, 102.0, 103.5];
        let series = PriceSeries::new(
            prices
                .iter()
                .enumerate()
                .map(|(i, &p)| PricePoint::new(start + chrono::Duration::days(i as i64), p))
                .collect(),
        )
        .unwrap();
        let profile = StreakProfile::from_prices(&series, ZeroReturnPolicy::Down).unwrap();
        assert_eq!(profile.current_direction(), Direction::Up);

        let md = profile_report("BBB", &profile);
        assert!(md.contains("# Streak Profile: BBB"));
        assert!(md.contains("| 2 | 1* |"));
        assert!(md.contains("count filled in"));
    }
}
