//! # hj-hist
//!
//! Classify collision events into a Higgs candidate plus jets, apply jet cuts,
//! and fill weighted histograms of Higgs pT, per-slot jet pT and jet
//! multiplicity (exclusive and inclusive).
//!
//! ## Example
//!
//! ```
//! use hj_core::{EventRecord, FourVector, HIGGS_PID};
//! use hj_hist::{Analysis, AnalysisConfig};
//!
//! let events = vec![Ok::<_, hj_core::Error>(EventRecord::new(Vec::new(), 1.0)
//!     .with_particle(HIGGS_PID, FourVector::new(30.0, 40.0, 0.0, 135.0))
//!     .with_particle(21, FourVector::from_pt_eta_phi_m(50.0, 1.0, 0.0, 0.0)))];
//!
//! let analysis = Analysis::new(AnalysisConfig::default()).unwrap();
//! let (hists, summary) = analysis.run(&mut events.into_iter()).unwrap();
//! assert_eq!(summary.n_accepted, 1);
//! assert_eq!(hists.higgs_pt().mean(), 50.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod config;
pub mod engine;
pub mod histogram;
pub mod set;

pub use classify::{ClassifiedEvent, classify};
pub use config::{AnalysisConfig, Binning, JetCuts};
pub use engine::{Analysis, EventOutcome, RunSummary};
pub use histogram::{BinIndex, Histogram1D, inclusive_from_exclusive};
pub use set::{ClosedHistogramSet, HIGGS_PT, HistogramSet, NJETS_EXCL, NJETS_INCL, jet_pt_name};
