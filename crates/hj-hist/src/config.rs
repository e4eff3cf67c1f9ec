//! Analysis configuration: identity code, jet cuts, slot count and binning.
//!
//! `AnalysisConfig::default()` reproduces the reference analysis:
//! Higgs PDG id 25, jets with `pT >= 30` and `eta <= 4.4`, four leading-jet
//! slots, and 100 pT bins over `[0, 1500)`.

use std::path::Path;

use hj_core::{DEFAULT_MAX_PARTICLES, Error, FourVector, HIGGS_PID, Result};
use serde::{Deserialize, Serialize};

/// Equal-width binning `n_bins` over `[x_min, x_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binning {
    /// Number of bins.
    pub n_bins: usize,
    /// Lower edge.
    pub x_min: f64,
    /// Upper edge.
    pub x_max: f64,
}

impl Binning {
    /// Create a binning.
    pub fn new(n_bins: usize, x_min: f64, x_max: f64) -> Self {
        Self { n_bins, x_min, x_max }
    }

    /// One bin per integer `0..=max`, centred on the integer.
    ///
    /// `None` if `max + 1` does not fit in `usize`.
    pub fn multiplicity(max: usize) -> Option<Self> {
        let n_bins = max.checked_add(1)?;
        Some(Self { n_bins, x_min: -0.5, x_max: max as f64 + 0.5 })
    }
}

impl Default for Binning {
    fn default() -> Self {
        Self::new(100, 0.0, 1.5e3)
    }
}

/// Jet selection thresholds.
///
/// The eta cut is one-sided: only `eta > eta_max` is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JetCuts {
    /// Minimum jet transverse momentum.
    pub pt_min: f64,
    /// Maximum jet pseudorapidity.
    pub eta_max: f64,
}

impl JetCuts {
    /// Whether a jet survives: rejected if `pt < pt_min` or `eta > eta_max`.
    #[inline]
    pub fn accepts(&self, jet: &FourVector) -> bool {
        let rejected = jet.pt() < self.pt_min || jet.eta() > self.eta_max;
        !rejected
    }
}

impl Default for JetCuts {
    fn default() -> Self {
        Self { pt_min: 30.0, eta_max: 4.4 }
    }
}

/// Full configuration of a histogramming run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Identity code of the distinguished particle.
    pub higgs_pid: i32,
    /// Jet selection.
    pub jet_cuts: JetCuts,
    /// Number of per-slot jet pT histograms (`jet1_pT` .. `jetN_pT`).
    pub jet_slots: usize,
    /// Particle capacity per record, enforced by the record source.
    pub max_particles: usize,
    /// Binning of `H_pT`.
    pub higgs_pt_binning: Binning,
    /// Binning of every `jetN_pT`.
    pub jet_pt_binning: Binning,
    /// Log progress every this many records (0 = never).
    pub progress_interval: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            higgs_pid: HIGGS_PID,
            jet_cuts: JetCuts::default(),
            jet_slots: DEFAULT_MAX_PARTICLES,
            max_particles: DEFAULT_MAX_PARTICLES,
            higgs_pt_binning: Binning::default(),
            jet_pt_binning: Binning::default(),
            progress_interval: 100_000,
        }
    }
}

impl AnalysisConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a JSON configuration file. Missing keys take default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let cfg: Self = serde_json::from_slice(&bytes)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Set the minimum jet pT.
    pub fn jet_pt_min(mut self, pt_min: f64) -> Self {
        self.jet_cuts.pt_min = pt_min;
        self
    }

    /// Set the maximum jet eta.
    pub fn jet_eta_max(mut self, eta_max: f64) -> Self {
        self.jet_cuts.eta_max = eta_max;
        self
    }

    /// Set the number of jet slots.
    pub fn jet_slots(mut self, slots: usize) -> Self {
        self.jet_slots = slots;
        self
    }

    /// Set the per-record particle capacity.
    pub fn max_particles(mut self, n: usize) -> Self {
        self.max_particles = n;
        self
    }

    /// Set the progress logging interval.
    pub fn progress_interval(mut self, n: u64) -> Self {
        self.progress_interval = n;
        self
    }

    /// Binning of the multiplicity histograms.
    pub fn multiplicity_binning(&self) -> Result<Binning> {
        let slots = self.jet_slots;
        Binning::multiplicity(slots).ok_or_else(|| {
            Error::Validation(format!("jet_slots ({slots}) too large for a multiplicity axis"))
        })
    }

    /// Check the configuration for obviously unusable values.
    pub fn validate(&self) -> Result<()> {
        if self.jet_slots == 0 {
            return Err(Error::Validation("jet_slots must be > 0".into()));
        }
        if self.max_particles == 0 {
            return Err(Error::Validation("max_particles must be > 0".into()));
        }
        // A record never holds more jets than particles.
        if self.jet_slots > self.max_particles {
            return Err(Error::Validation(format!(
                "jet_slots ({}) must not exceed max_particles ({})",
                self.jet_slots, self.max_particles
            )));
        }
        if self.jet_cuts.pt_min.is_nan() || self.jet_cuts.eta_max.is_nan() {
            return Err(Error::Validation("jet cuts must not be NaN".into()));
        }
        let binnings =
            [("higgs_pt_binning", self.higgs_pt_binning), ("jet_pt_binning", self.jet_pt_binning)];
        for (what, b) in binnings {
            let finite = b.x_min.is_finite() && b.x_max.is_finite();
            if b.n_bins == 0 || !finite || b.x_max <= b.x_min {
                return Err(Error::Validation(format!(
                    "{what}: invalid binning ({} bins over [{}, {}))",
                    b.n_bins, b.x_min, b.x_max
                )));
            }
        }
        Ok(())
    }
}
