//! Per-event cut evaluation and histogram filling.
//!
//! For every event carrying a Higgs:
//! 1. `H_pT` gets the Higgs pT,
//! 2. each jet passing the cuts fills the slot of its *original* position in
//!    the jet list (positions past the declared slots are dropped),
//! 3. `Njets_excl` gets the number of passing jets `n`,
//! 4. `Njets_incl` gets one fill at each of `n, n-1, ..., 0`.
//!
//! Events without a Higgs touch nothing and are reported as skipped.

use hj_core::{Error, EventRecord, EventSource, Result};
use serde::Serialize;

use crate::classify::{ClassifiedEvent, classify};
use crate::config::AnalysisConfig;
use crate::set::{ClosedHistogramSet, HistogramSet};

/// Result of processing one accepted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Histograms were filled; `n_jets` jets passed the cuts.
    Accepted {
        /// Number of jets passing the cuts.
        n_jets: usize,
    },
}

/// Counters accumulated over a run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RunSummary {
    /// Records pulled from the source.
    pub n_read: u64,
    /// Events that filled histograms.
    pub n_accepted: u64,
    /// Events skipped for lack of a Higgs.
    pub n_skipped: u64,
    /// Sum of weights of accepted events.
    pub sum_weights_accepted: f64,
}

impl RunSummary {
    /// Add the counters of another run.
    pub fn merge(&mut self, other: &RunSummary) {
        self.n_read += other.n_read;
        self.n_accepted += other.n_accepted;
        self.n_skipped += other.n_skipped;
        self.sum_weights_accepted += other.sum_weights_accepted;
    }
}

/// Histogramming run: configuration, open histograms and counters.
pub struct Analysis {
    config: AnalysisConfig,
    histograms: HistogramSet,
    summary: RunSummary,
}

impl Analysis {
    /// Validate `config` and book the histograms.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let histograms = HistogramSet::new(&config)?;
        Ok(Self { config, histograms, summary: RunSummary::default() })
    }

    /// Configuration of this run.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Counters so far.
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Process the record at stream position `entry`.
    ///
    /// Returns [`Error::MissingHiggs`] without touching any histogram when the
    /// record has no Higgs; the caller decides whether to continue.
    pub fn process(&mut self, entry: u64, record: &EventRecord) -> Result<EventOutcome> {
        self.summary.n_read += 1;
        let event = classify(record, self.config.higgs_pid);
        match self.fill(&event, record.weight) {
            Some(n_jets) => {
                self.summary.n_accepted += 1;
                self.summary.sum_weights_accepted += record.weight;
                Ok(EventOutcome::Accepted { n_jets })
            }
            None => {
                self.summary.n_skipped += 1;
                Err(Error::MissingHiggs { entry })
            }
        }
    }

    /// Fill histograms for one classified event. `None` if there is no Higgs.
    fn fill(&mut self, event: &ClassifiedEvent, weight: f64) -> Option<usize> {
        let higgs = event.higgs.as_ref()?;
        self.histograms.higgs_pt_mut().fill(higgs.pt(), weight);

        let cuts = self.config.jet_cuts;
        let mut n_jets = 0usize;
        for (j, jet) in event.jets.iter().enumerate() {
            if !cuts.accepts(jet) {
                continue;
            }
            n_jets += 1;
            // Slot follows the jet's position in the event, not its rank among passing jets.
            if let Some(h) = self.histograms.jet_pt_mut(j) {
                h.fill(jet.pt(), weight);
            }
        }

        self.histograms.njets_excl_mut().fill(n_jets as f64, weight);
        let incl = self.histograms.njets_incl_mut();
        for k in (0..=n_jets).rev() {
            incl.fill(k as f64, weight);
        }
        Some(n_jets)
    }

    /// Consume `source` to exhaustion, then close the histograms.
    ///
    /// Events without a Higgs are logged and skipped. Any source error aborts
    /// the run; no partially filled set is returned.
    pub fn run<S: EventSource + ?Sized>(
        mut self,
        source: &mut S,
    ) -> Result<(ClosedHistogramSet, RunSummary)> {
        let total = source.len_hint();
        tracing::info!(entries = ?total, "processing events");

        let interval = self.config.progress_interval;
        let mut entry: u64 = 0;
        while let Some(record) = source.next_record() {
            let record = record?;
            match self.process(entry, &record) {
                Ok(_) => {}
                Err(Error::MissingHiggs { entry }) => {
                    tracing::warn!(entry, "no Higgs in entry");
                }
                Err(e) => return Err(e),
            }
            entry += 1;
            if interval > 0 && entry % interval == 0 {
                tracing::debug!(processed = entry, total = ?total, "progress");
            }
        }

        let summary = self.summary;
        tracing::info!(
            n_read = summary.n_read,
            n_accepted = summary.n_accepted,
            n_skipped = summary.n_skipped,
            sum_weights = summary.sum_weights_accepted,
            "run complete"
        );
        Ok(self.finish())
    }

    /// Hand back the open histograms, e.g. to merge independent runs.
    pub fn into_parts(self) -> (HistogramSet, RunSummary) {
        (self.histograms, self.summary)
    }

    /// Close the histograms and return them with the counters.
    pub fn finish(self) -> (ClosedHistogramSet, RunSummary) {
        (self.histograms.finalize(), self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hj_core::{FourVector, HIGGS_PID};

    fn higgs(pt: f64) -> FourVector {
        FourVector::from_pt_eta_phi_m(pt, 0.0, 0.0, 125.0)
    }

    fn jet(pt: f64, eta: f64) -> FourVector {
        FourVector::from_pt_eta_phi_m(pt, eta, 0.0, 0.0)
    }

    #[test]
    fn missing_higgs_is_reported_with_entry() {
        let mut a = Analysis::new(AnalysisConfig::default()).unwrap();
        let ev = EventRecord::new(Vec::new(), 1.0).with_particle(21, jet(50.0, 0.0));
        let err = a.process(7, &ev).unwrap_err();
        assert!(matches!(err, Error::MissingHiggs { entry: 7 }));
        assert_eq!(a.summary().n_skipped, 1);
        assert_eq!(a.summary().n_accepted, 0);
    }

    #[test]
    fn counts_passing_jets() {
        let mut a = Analysis::new(AnalysisConfig::default()).unwrap();
        let ev = EventRecord::new(Vec::new(), 0.5)
            .with_particle(HIGGS_PID, higgs(10.0))
            .with_particle(21, jet(45.0, 0.0))
            .with_particle(21, jet(10.0, 0.0))
            .with_particle(1, jet(60.0, 4.5))
            .with_particle(2, jet(35.0, -4.9));
        let out = a.process(0, &ev).unwrap();
        assert_eq!(out, EventOutcome::Accepted { n_jets: 2 });
        assert_eq!(a.summary().sum_weights_accepted, 0.5);
    }

    #[test]
    fn jets_past_the_last_slot_count_but_do_not_fill() {
        let mut a = Analysis::new(AnalysisConfig::new().jet_slots(1)).unwrap();
        let ev = EventRecord::new(Vec::new(), 1.0)
            .with_particle(HIGGS_PID, higgs(10.0))
            .with_particle(21, jet(45.0, 0.0))
            .with_particle(21, jet(55.0, 0.0));
        assert_eq!(a.process(0, &ev).unwrap(), EventOutcome::Accepted { n_jets: 2 });
        let (set, _) = a.finish();
        assert_eq!(set.jet_pt(0).unwrap().entries(), 1.0);
        // n = 2 lands in the overflow of a 0..=1 multiplicity axis.
        assert_eq!(set.njets_exclusive().overflow(), 1.0);
        assert_eq!(set.njets_inclusive().bin_contents(), &[1.0, 1.0]);
    }

    #[test]
    fn run_skips_and_continues() {
        let events: Vec<Result<EventRecord>> = vec![
            Ok(EventRecord::new(Vec::new(), 1.0).with_particle(HIGGS_PID, higgs(20.0))),
            Ok(EventRecord::new(Vec::new(), 1.0).with_particle(21, jet(40.0, 0.0))),
            Ok(EventRecord::new(Vec::new(), 3.0).with_particle(HIGGS_PID, higgs(40.0))),
        ];
        let a = Analysis::new(AnalysisConfig::default()).unwrap();
        let (set, summary) = a.run(&mut events.into_iter()).unwrap();
        assert_eq!(summary.n_read, 3);
        assert_eq!(summary.n_accepted, 2);
        assert_eq!(summary.n_skipped, 1);
        assert_eq!(set.higgs_pt().total_weight(), 4.0);
        assert_eq!(set.njets_inclusive().entries(), 2.0);
    }

    #[test]
    fn run_aborts_on_source_error() {
        let events: Vec<Result<EventRecord>> = vec![
            Ok(EventRecord::new(Vec::new(), 1.0).with_particle(HIGGS_PID, higgs(20.0))),
            Err(Error::Source("truncated row".into())),
            Ok(EventRecord::new(Vec::new(), 1.0).with_particle(HIGGS_PID, higgs(20.0))),
        ];
        let a = Analysis::new(AnalysisConfig::default()).unwrap();
        let err = a.run(&mut events.into_iter()).unwrap_err();
        assert!(err.to_string().contains("truncated row"));
    }

    #[test]
    fn summaries_merge() {
        let summary = |n_read, n_accepted, n_skipped, sum_weights_accepted| RunSummary {
            n_read,
            n_accepted,
            n_skipped,
            sum_weights_accepted,
        };
        let mut a = summary(2, 1, 1, 1.5);
        a.merge(&summary(3, 3, 0, 2.0));
        assert_eq!(a, summary(5, 4, 1, 3.5));
    }
}
