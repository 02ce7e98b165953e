//! Progress reporting for multi-instrument runs.

use crate::outcome::SkipReason;

/// Callbacks for a batch over many instruments.
///
/// Must be `Sync`: with `parallel = true` the callbacks fire from rayon
/// worker threads, in completion order rather than input order.
pub trait ScanProgress: Sync {
    /// Called before an instrument is fetched.
    fn on_start(&self, instrument: &str, index: usize, total: usize);

    /// Called when an instrument evaluated, with a one-line summary.
    fn on_evaluated(&self, instrument: &str, summary: &str);

    /// Called when an instrument was skipped.
    fn on_skip(&self, instrument: &str, reason: &SkipReason);

    /// Called once the whole batch is done.
    fn on_batch_complete(&self, evaluated: usize, skipped: usize, total: usize);
}

/// Reports through the `log` facade.
pub struct LogProgress;

impl ScanProgress for LogProgress {
    fn on_start(&self, instrument: &str, index: usize, total: usize) {
        log::info!("[{}/{}] {instrument}", index + 1, total);
    }

    fn on_evaluated(&self, instrument: &str, summary: &str) {
        log::info!("  OK: {instrument}: {summary}");
    }

    fn on_skip(&self, instrument: &str, reason: &SkipReason) {
        match reason {
            SkipReason::DataUnavailable(_) => log::warn!("{reason}"),
            _ => log::warn!("  SKIP: {instrument}: {reason}"),
        }
    }

    fn on_batch_complete(&self, evaluated: usize, skipped: usize, total: usize) {
        log::info!("Done: {evaluated}/{total} evaluated, {skipped} skipped");
    }
}

/// Reports nothing; skips still land in the report.
pub struct SilentProgress;

impl ScanProgress for SilentProgress {
    fn on_start(&self, _instrument: &str, _index: usize, _total: usize) {}
    fn on_evaluated(&self, _instrument: &str, _summary: &str) {}
    fn on_skip(&self, _instrument: &str, _reason: &SkipReason) {}
    fn on_batch_complete(&self, _evaluated: usize, _skipped: usize, _total: usize) {}
}

/// Pick a reporter from the verbosity flag.
pub fn progress_for(verbose: bool) -> &'static dyn ScanProgress {
    if verbose {
        &LogProgress
    } else {
        &SilentProgress
    }
}
