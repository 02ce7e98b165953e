//! StreakLab CLI: screen, backtest and profile commands.
//!
//! Commands:
//! - `screen`: list instruments whose current streak is statistically rare
//! - `backtest`: learn a streak-break length on a training window and trade
//!   it on a test window
//! - `profile`: print the streak distribution of a single instrument

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use streaklab_core::data::{CsvSource, PriceSource, SyntheticSource, YahooProvider};
use streaklab_core::ZeroReturnPolicy;
use streaklab_runner::export::{
    export_backtest_json, export_screening_csv, export_screening_json, export_trades_csv, save_to,
};
use streaklab_runner::report::{backtest_report, profile_report, screening_report};
use streaklab_runner::{
    profile_instrument, progress_for, run_backtest, run_screen, save_artifacts, Artifact,
    BacktestWindows, Confidence, ConfigError, DateWindow, InstrumentSet, ScanConfig,
};

/// Default screening lookback when no start date is given.
const DEFAULT_LOOKBACK_YEARS: u32 = 10;

/// Anchor of the synthetic walk; every window of a run sees the same path.
const SYNTHETIC_ORIGIN: (i32, u32, u32) = (2000, 1, 3);

#[derive(Parser)]
#[command(
    name = "streaklab",
    about = "StreakLab CLI — streak-length screening and contrarian backtests"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen instruments for rare current streaks.
    Screen {
        /// Instruments to screen (e.g., SPY QQQ AAPL). Falls back to the config file.
        instruments: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 10 years before the end date.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        #[command(flatten)]
        scan: ScanArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Backtest the contrarian streak-break rule.
    Backtest {
        /// Instruments to backtest. Falls back to the config file.
        instruments: Vec<String>,

        /// Training window start (YYYY-MM-DD).
        #[arg(long)]
        train_start: Option<String>,

        /// Training window end (YYYY-MM-DD).
        #[arg(long)]
        train_end: Option<String>,

        /// Test window start (YYYY-MM-DD).
        #[arg(long)]
        test_start: Option<String>,

        /// Test window end (YYYY-MM-DD).
        #[arg(long)]
        test_end: Option<String>,

        #[command(flatten)]
        scan: ScanArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the streak distribution, tail curve and current streak of one instrument.
    Profile {
        instrument: String,

        /// Start date (YYYY-MM-DD). Defaults to 10 years before the end date.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        #[command(flatten)]
        scan: ScanArgs,

        /// Print the profile as JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceKind {
    /// Yahoo Finance chart API.
    Yahoo,
    /// `{data-dir}/{INSTRUMENT}.csv` files.
    Csv,
    /// Deterministic random walk, no network.
    Synthetic,
}

#[derive(Args)]
struct ScanArgs {
    /// TOML config file. Command-line flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Confidence level in (0, 1). Defaults to 0.95.
    #[arg(long)]
    confidence: Option<f64>,

    /// Price source.
    #[arg(long, value_enum, default_value = "yahoo")]
    source: SourceKind,

    /// Directory of CSV files for `--source csv`.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Labelling of zero-return days: down, skip or carry.
    #[arg(long)]
    zero_returns: Option<ZeroReturnPolicy>,

    /// Evaluate instruments in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Log per-instrument progress.
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

#[derive(Args)]
struct OutputArgs {
    /// Print the report as JSON instead of Markdown.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Also write the CSV export to this file.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Also save a report.json + CSV bundle under this directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Screen {
            instruments,
            start,
            end,
            scan,
            output,
        } => run_screen_cmd(instruments, start, end, scan, output),
        Commands::Backtest {
            instruments,
            train_start,
            train_end,
            test_start,
            test_end,
            scan,
            output,
        } => run_backtest_cmd(
            instruments,
            [train_start, train_end, test_start, test_end],
            scan,
            output,
        ),
        Commands::Profile {
            instrument,
            start,
            end,
            scan,
            json,
        } => run_profile_cmd(&instrument, start, end, scan, json),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn parse_date(value: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid {flag} date '{value}', expected YYYY-MM-DD"))
}

fn parse_opt_date(value: Option<String>, flag: &str) -> Result<Option<NaiveDate>> {
    value.as_deref().map(|v| parse_date(v, flag)).transpose()
}

/// Load the config file (if any) and fold the command-line flags over it.
fn load_config(scan: &ScanArgs, instruments: Vec<String>) -> Result<ScanConfig> {
    let mut config = match &scan.config {
        Some(path) => ScanConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ScanConfig::default(),
    };

    if !instruments.is_empty() {
        config.instruments = Some(InstrumentSet::new(instruments));
    }
    if let Some(c) = scan.confidence {
        config.settings.confidence = Confidence::new(c)?;
    }
    if let Some(policy) = scan.zero_returns {
        config.settings.zero_returns = policy;
    }
    config.settings.parallel |= scan.parallel;
    config.verbose |= scan.verbose;
    Ok(config)
}

fn require_instruments(config: &ScanConfig) -> Result<InstrumentSet> {
    match &config.instruments {
        Some(set) if !set.is_empty() => Ok(set.clone()),
        _ => Err(ConfigError::Missing(
            "instruments (pass them as arguments or set `instruments` in the config file)",
        )
        .into()),
    }
}

fn build_source(scan: &ScanArgs) -> Result<Box<dyn PriceSource>> {
    let source: Box<dyn PriceSource> = match scan.source {
        SourceKind::Yahoo => Box::new(YahooProvider::new(Duration::from_secs(30))?),
        SourceKind::Csv => {
            if !scan.data_dir.is_dir() {
                bail!("data directory does not exist: {}", scan.data_dir.display());
            }
            Box::new(CsvSource::new(&scan.data_dir))
        }
        SourceKind::Synthetic => {
            let (y, m, d) = SYNTHETIC_ORIGIN;
            let origin = NaiveDate::from_ymd_opt(y, m, d)
                .ok_or_else(|| anyhow!("invalid synthetic origin"))?;
            Box::new(SyntheticSource::new(origin))
        }
    };
    log::info!("Using {} price source", source.name());
    Ok(source)
}

/// `start..=end` with end defaulting to today and start to the lookback.
fn lookback_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    fallback: Option<DateWindow>,
) -> Result<DateWindow> {
    let end = end
        .or(fallback.map(|w| w.end))
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let start = start
        .or(fallback.map(|w| w.start))
        .unwrap_or_else(|| DateWindow::trailing_years(end, DEFAULT_LOOKBACK_YEARS).start);
    Ok(DateWindow::new("screen", start, end)?)
}

fn run_screen_cmd(
    instruments: Vec<String>,
    start: Option<String>,
    end: Option<String>,
    scan: ScanArgs,
    output: OutputArgs,
) -> Result<()> {
    let config = load_config(&scan, instruments)?;
    init_logging(config.verbose);

    let instruments = require_instruments(&config)?;
    let window = lookback_window(
        parse_opt_date(start, "--start")?,
        parse_opt_date(end, "--end")?,
        config.screen,
    )?;
    let source = build_source(&scan)?;

    let report = run_screen(
        source.as_ref(),
        &instruments,
        window,
        &config.settings,
        progress_for(config.verbose),
    );

    if output.json {
        println!("{}", export_screening_json(&report)?);
    } else {
        print!("{}", screening_report(&report));
    }
    if let Some(path) = &output.csv {
        save_to(path, &export_screening_csv(&report)?)?;
        eprintln!("CSV written to: {}", path.display());
    }
    if let Some(dir) = &output.output_dir {
        let run_dir = save_artifacts(Artifact::Screening(&report), dir)?;
        eprintln!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn backtest_windows(dates: [Option<String>; 4], config: &ScanConfig) -> Result<BacktestWindows> {
    let [train_start, train_end, test_start, test_end] = dates;
    let base = config.backtest;
    let pick = |cli: Option<String>, flag: &str, from_config: Option<NaiveDate>| -> Result<NaiveDate> {
        match parse_opt_date(cli, flag)?.or(from_config) {
            Some(date) => Ok(date),
            None => Err(ConfigError::Missing(
                "backtest windows (--train-start, --train-end, --test-start and --test-end, \
                 or [backtest] in the config file)",
            )
            .into()),
        }
    };

    let train = DateWindow::new(
        "train",
        pick(train_start, "--train-start", base.map(|b| b.train.start))?,
        pick(train_end, "--train-end", base.map(|b| b.train.end))?,
    )?;
    let test = DateWindow::new(
        "test",
        pick(test_start, "--test-start", base.map(|b| b.test.start))?,
        pick(test_end, "--test-end", base.map(|b| b.test.end))?,
    )?;
    Ok(BacktestWindows::new(train, test))
}

fn run_backtest_cmd(
    instruments: Vec<String>,
    dates: [Option<String>; 4],
    scan: ScanArgs,
    output: OutputArgs,
) -> Result<()> {
    let config = load_config(&scan, instruments)?;
    init_logging(config.verbose);

    let instruments = require_instruments(&config)?;
    let windows = backtest_windows(dates, &config)?;
    let source = build_source(&scan)?;

    let report = run_backtest(
        source.as_ref(),
        &instruments,
        windows,
        &config.settings,
        progress_for(config.verbose),
    );

    if output.json {
        println!("{}", export_backtest_json(&report)?);
    } else {
        print!("{}", backtest_report(&report));
    }
    if let Some(path) = &output.csv {
        save_to(path, &export_trades_csv(&report)?)?;
        eprintln!("Signal tape written to: {}", path.display());
    }
    if let Some(dir) = &output.output_dir {
        let run_dir = save_artifacts(Artifact::Backtest(&report), dir)?;
        eprintln!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn run_profile_cmd(
    instrument: &str,
    start: Option<String>,
    end: Option<String>,
    scan: ScanArgs,
    json: bool,
) -> Result<()> {
    let config = load_config(&scan, Vec::new())?;
    init_logging(config.verbose);

    let window = lookback_window(
        parse_opt_date(start, "--start")?,
        parse_opt_date(end, "--end")?,
        config.screen,
    )?;
    let source = build_source(&scan)?;

    let profile = profile_instrument(
        source.as_ref(),
        instrument,
        window,
        config.settings.zero_returns,
    )
    .map_err(|reason| anyhow!("{instrument}: {reason}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print!("{}", profile_report(instrument, &profile));
    }
    Ok(())
}
