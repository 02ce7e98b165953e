//! Per-instrument fan-out shared by the screening and backtest runners.

use rayon::prelude::*;

use crate::progress::ScanProgress;
use crate::universe::InstrumentSet;

/// Run `eval` once per instrument, sequentially or on the rayon pool.
///
/// Results come back in input order either way.
pub(crate) fn evaluate_each<T, F>(
    instruments: &InstrumentSet,
    parallel: bool,
    progress: &dyn ScanProgress,
    eval: F,
) -> Vec<(String, T)>
where
    T: Send,
    F: Fn(&str) -> T + Sync,
{
    let total = instruments.len();
    let run = |(index, instrument): (usize, &String)| {
        progress.on_start(instrument, index, total);
        (instrument.clone(), eval(instrument))
    };

    if parallel {
        instruments.as_slice().par_iter().enumerate().map(run).collect()
    } else {
        instruments.as_slice().iter().enumerate().map(run).collect()
    }
}
