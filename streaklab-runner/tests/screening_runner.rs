use chrono::NaiveDate;
use streaklab_core::data::{DataError, FetchResult, InMemorySource, PriceSource, SyntheticSource};
use streaklab_core::{Direction, PricePoint, PriceSeries, Side};
use streaklab_runner::{
    run_screen, Confidence, DateWindow, InstrumentSet, ScanConfig, ScanSettings, ScreenOutcome,
    SilentProgress, SkipReason, WindowKind,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn series(prices: &[f64]) -> PriceSeries {
    PriceSeries::new(
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new(d(2024, 1, 2) + chrono::Duration::days(i as i64), p))
            .collect(),
    )
    .unwrap()
}

fn window() -> DateWindow {
    DateWindow::new("screen", d(2024, 1, 1), d(2024, 12, 31)).unwrap()
}

#[test]
fn unavailable_instrument_does_not_fail_the_batch() {
    let source = InMemorySource::new()
        .with_series("AAPL", series(&[100.0, 101.0, 100.5, 101.5, 100.0, 99.0, 97.5]));
    let report = run_screen(
        &source,
        &InstrumentSet::new(["TSLA", "AAPL"]),
        window(),
        &ScanSettings::default(),
        &SilentProgress,
    );

    assert_eq!(report.formatted().len(), 1);
    assert_eq!(report.formatted()["AAPL"], "0.00%");
    assert_eq!(report.evaluated, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].instrument, "TSLA");
    assert_eq!(report.skipped[0].window, WindowKind::Screen);
    assert_eq!(
        report.skipped[0].reason,
        SkipReason::DataUnavailable("TSLA".into())
    );

    match report.outcome() {
        ScreenOutcome::Candidates(c) => {
            assert_eq!(c["AAPL"].direction, Direction::Down);
            assert_eq!(c["AAPL"].signal, Side::Long);
        }
        other => panic!("expected candidates, got {other:?}"),
    }
}

/// Fails every fetch of one instrument with a network error.
struct FlakySource {
    inner: InMemorySource,
    down: &'static str,
}

impl PriceSource for FlakySource {
    fn name(&self) -> &str {
        "flaky"
    }

    fn fetch(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        if instrument == self.down {
            return Err(DataError::NetworkUnreachable(format!("{instrument}: timed out")));
        }
        self.inner.fetch(instrument, start, end)
    }
}

#[test]
fn network_failure_is_a_fetch_skip() {
    let source = FlakySource {
        inner: InMemorySource::new()
            .with_series("AAPL", series(&[100.0, 101.0, 100.5, 101.5, 100.0, 99.0, 97.5])),
        down: "MSFT",
    };
    let report = run_screen(
        &source,
        &InstrumentSet::new(["MSFT", "AAPL"]),
        window(),
        &ScanSettings::default(),
        &SilentProgress,
    );

    assert_eq!(report.evaluated, 1);
    assert_eq!(report.formatted()["AAPL"], "0.00%");
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].instrument, "MSFT");
    match &report.skipped[0].reason {
        SkipReason::FetchFailed(msg) => assert!(msg.contains("timed out")),
        other => panic!("expected a fetch failure, got {other:?}"),
    }
}

#[test]
fn single_price_is_insufficient_data() {
    let source = InMemorySource::new().with_series("ONE", series(&[100.0]));
    let report = run_screen(
        &source,
        &InstrumentSet::new(["ONE"]),
        window(),
        &ScanSettings::default(),
        &SilentProgress,
    );
    assert!(report.candidates.is_empty());
    assert_eq!(report.skipped[0].reason, SkipReason::InsufficientData(1));
}

#[test]
fn lower_confidence_admits_more_candidates() {
    // up x3, down, up: continuation of the one-day up streak is P(L >= 2) = 0.5
    let source = InMemorySource::new()
        .with_series("BBB", series(&[100.0, 101.0, 102.0, 103.0, 102.0, 103.5]));
    let strict = run_screen(
        &source,
        &InstrumentSet::new(["BBB"]),
        window(),
        &ScanSettings::default(),
        &SilentProgress,
    );
    assert!(strict.candidates.is_empty());

    let loose = ScanSettings {
        confidence: Confidence::new(0.4).unwrap(),
        ..ScanSettings::default()
    };
    let report = run_screen(
        &source,
        &InstrumentSet::new(["BBB"]),
        window(),
        &loose,
        &SilentProgress,
    );
    assert_eq!(report.formatted()["BBB"], "50.00%");
    assert_eq!(report.candidates["BBB"].signal, Side::Short);
}

#[test]
fn parallel_matches_sequential() {
    let source = SyntheticSource::new(d(2015, 1, 1));
    let instruments = InstrumentSet::new(["SPY", "QQQ", "IWM", "DIA", "TLT", "GLD", "XLE", "XLF"]);
    let window = DateWindow::new("screen", d(2015, 1, 1), d(2024, 12, 31)).unwrap();
    let loose = ScanSettings {
        confidence: Confidence::new(0.5).unwrap(),
        ..ScanSettings::default()
    };

    let sequential = run_screen(&source, &instruments, window, &loose, &SilentProgress);
    let parallel = run_screen(
        &source,
        &instruments,
        window,
        &ScanSettings {
            parallel: true,
            ..loose
        },
        &SilentProgress,
    );

    assert_eq!(sequential.evaluated, instruments.len());
    assert_eq!(sequential.candidates, parallel.candidates);
    assert_eq!(sequential.skipped, parallel.skipped);
}

#[test]
fn bare_string_instruments_reject_the_call() {
    let err = ScanConfig::from_toml(r#"instruments = "SPY""#).unwrap_err();
    assert!(err.to_string().contains("[\"SPY\"]"));
}
