//! Screening: which instruments are in a statistically rare streak right now.
//!
//! For every instrument the runner fetches the window, learns the streak
//! distribution, and keeps the instrument when the probability of its current
//! streak lasting one more day is below `1 - confidence`. Those are the
//! candidates for a contrarian entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use streaklab_core::data::PriceSource;
use streaklab_core::{Direction, Side, StreakProfile, ZeroReturnPolicy};

use crate::batch::evaluate_each;
use crate::config::{DateWindow, ScanSettings};
use crate::outcome::{SkipReason, SkippedInstrument, WindowKind};
use crate::progress::ScanProgress;
use crate::report::format_pct;
use crate::universe::InstrumentSet;

/// A screened instrument whose current streak is rare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenHit {
    /// Probability the current streak lasts at least one more day.
    pub probability: f64,
    /// `probability` as a two-decimal percentage string.
    pub percent: String,
    pub current_streak: usize,
    pub direction: Direction,
    /// Longest streak in the window.
    pub longest_streak: usize,
    /// Contrarian side: long after a down streak, short after an up streak.
    pub signal: Side,
}

/// Either the candidates or the reason there are none.
#[derive(Debug, PartialEq)]
pub enum ScreenOutcome<'a> {
    Candidates(&'a BTreeMap<String, ScreenHit>),
    NoCandidates(String),
}

/// Result of one screening run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub window: DateWindow,
    pub confidence: f64,
    pub threshold: f64,
    pub candidates: BTreeMap<String, ScreenHit>,
    /// Instruments that evaluated, whether or not they qualified.
    pub evaluated: usize,
    pub skipped: Vec<SkippedInstrument>,
}

impl ScreeningReport {
    /// Candidate instrument → percentage string.
    pub fn formatted(&self) -> BTreeMap<String, String> {
        self.candidates
            .iter()
            .map(|(id, hit)| (id.clone(), hit.percent.clone()))
            .collect()
    }

    pub fn outcome(&self) -> ScreenOutcome<'_> {
        if self.candidates.is_empty() {
            ScreenOutcome::NoCandidates(self.empty_message())
        } else {
            ScreenOutcome::Candidates(&self.candidates)
        }
    }

    fn empty_message(&self) -> String {
        format!(
            "No instrument has a current streak with continuation probability below {} \
             as of {} ({} evaluated, {} skipped).",
            format_pct(self.threshold),
            self.window.end,
            self.evaluated,
            self.skipped.len()
        )
    }
}

/// Learn the streak profile of one instrument over one window.
pub fn profile_instrument(
    source: &dyn PriceSource,
    instrument: &str,
    window: DateWindow,
    policy: ZeroReturnPolicy,
) -> Result<StreakProfile, SkipReason> {
    let fetched = source.fetch(instrument, window.start, window.end)?;
    Ok(StreakProfile::from_prices(&fetched.series, policy)?)
}

/// Screen every instrument as of `window.end`.
pub fn run_screen(
    source: &dyn PriceSource,
    instruments: &InstrumentSet,
    window: DateWindow,
    settings: &ScanSettings,
    progress: &dyn ScanProgress,
) -> ScreeningReport {
    let threshold = settings.threshold();
    let results = evaluate_each(instruments, settings.parallel, progress, |instrument| {
        let outcome = profile_instrument(source, instrument, window, settings.zero_returns);
        match &outcome {
            Ok(profile) => progress.on_evaluated(
                instrument,
                &format!(
                    "current {} streak of {}, continuation {}",
                    profile.current_direction(),
                    profile.current_streak(),
                    format_pct(profile.continuation_probability())
                ),
            ),
            Err(reason) => progress.on_skip(instrument, reason),
        }
        outcome
    });

    let mut candidates = BTreeMap::new();
    let mut skipped = Vec::new();
    let mut evaluated = 0;

    for (instrument, outcome) in results {
        match outcome {
            Ok(profile) => {
                evaluated += 1;
                let probability = profile.continuation_probability();
                if probability < threshold {
                    let direction = profile.current_direction();
                    candidates.insert(
                        instrument,
                        ScreenHit {
                            probability,
                            percent: format_pct(probability),
                            current_streak: profile.current_streak(),
                            direction,
                            longest_streak: profile.distribution.max_len(),
                            signal: direction.contrarian(),
                        },
                    );
                }
            }
            Err(reason) => skipped.push(SkippedInstrument {
                instrument,
                window: WindowKind::Screen,
                reason,
            }),
        }
    }

    progress.on_batch_complete(evaluated, skipped.len(), instruments.len());

    ScreeningReport {
        window,
        confidence: settings.confidence.value(),
        threshold,
        candidates,
        evaluated,
        skipped,
    }
}
