//! The fixed collection of named histograms filled by a run.
//!
//! A [`HistogramSet`] accepts fills while the record stream is being consumed.
//! [`HistogramSet::finalize`] consumes it and returns a read-only
//! [`ClosedHistogramSet`], so a fill can never follow the entry fix-up.

use hj_core::Result;
use serde::Serialize;

use crate::config::{AnalysisConfig, Binning};
use crate::histogram::Histogram1D;

/// Name of the Higgs transverse momentum histogram.
pub const HIGGS_PT: &str = "H_pT";
/// Name of the exclusive jet multiplicity histogram.
pub const NJETS_EXCL: &str = "Njets_excl";
/// Name of the inclusive jet multiplicity histogram.
pub const NJETS_INCL: &str = "Njets_incl";

/// Name of the jet pT histogram for 0-based `slot` (`jet1_pT`, `jet2_pT`, ...).
pub fn jet_pt_name(slot: usize) -> String {
    format!("jet{}_pT", slot + 1)
}

fn book(name: impl Into<String>, b: Binning) -> Result<Histogram1D> {
    Histogram1D::new(name, b.n_bins, b.x_min, b.x_max)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Histograms {
    higgs_pt: Histogram1D,
    jet_pt: Vec<Histogram1D>,
    njets_excl: Histogram1D,
    njets_incl: Histogram1D,
}

impl Histograms {
    fn iter(&self) -> impl Iterator<Item = &Histogram1D> {
        std::iter::once(&self.higgs_pt)
            .chain(self.jet_pt.iter())
            .chain([&self.njets_excl, &self.njets_incl])
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Histogram1D> {
        std::iter::once(&mut self.higgs_pt)
            .chain(self.jet_pt.iter_mut())
            .chain([&mut self.njets_excl, &mut self.njets_incl])
    }
}

/// Histograms open for filling.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSet {
    inner: Histograms,
}

impl HistogramSet {
    /// Book every histogram declared by `config`.
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let mult = config.multiplicity_binning()?;
        let jet_pt = (0..config.jet_slots)
            .map(|slot| book(jet_pt_name(slot), config.jet_pt_binning))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            inner: Histograms {
                higgs_pt: book(HIGGS_PT, config.higgs_pt_binning)?,
                jet_pt,
                njets_excl: book(NJETS_EXCL, mult)?,
                njets_incl: book(NJETS_INCL, mult)?,
            },
        })
    }

    /// Number of per-slot jet pT histograms.
    pub fn jet_slots(&self) -> usize {
        self.inner.jet_pt.len()
    }

    pub(crate) fn higgs_pt_mut(&mut self) -> &mut Histogram1D {
        &mut self.inner.higgs_pt
    }

    /// Jet pT histogram for `slot`; `None` past the declared slots.
    pub(crate) fn jet_pt_mut(&mut self, slot: usize) -> Option<&mut Histogram1D> {
        self.inner.jet_pt.get_mut(slot)
    }

    pub(crate) fn njets_excl_mut(&mut self) -> &mut Histogram1D {
        &mut self.inner.njets_excl
    }

    pub(crate) fn njets_incl_mut(&mut self) -> &mut Histogram1D {
        &mut self.inner.njets_incl
    }

    /// Add another open set bin-for-bin.
    ///
    /// Both sets must come from configurations with identical binning and
    /// slot count. Call this only after both streams are exhausted and before
    /// [`finalize`](Self::finalize).
    pub fn merge(&mut self, other: &HistogramSet) -> Result<()> {
        if self.jet_slots() != other.jet_slots() {
            return Err(hj_core::Error::Validation(format!(
                "cannot merge histogram sets with {} and {} jet slots",
                self.jet_slots(),
                other.jet_slots()
            )));
        }
        for (a, b) in self.inner.iter_mut().zip(other.inner.iter()) {
            a.merge(b)?;
        }
        Ok(())
    }

    /// Close the set: the inclusive multiplicity histogram reports the entry
    /// count of the exclusive one. No fills are possible afterwards.
    pub fn finalize(mut self) -> ClosedHistogramSet {
        let entries = self.inner.njets_excl.entries();
        self.inner.njets_incl.set_entries(entries);
        ClosedHistogramSet { inner: self.inner }
    }
}

/// Finished, read-only histograms.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ClosedHistogramSet {
    inner: Histograms,
}

impl ClosedHistogramSet {
    /// Higgs transverse momentum.
    pub fn higgs_pt(&self) -> &Histogram1D {
        &self.inner.higgs_pt
    }

    /// Jet pT histogram for 0-based `slot`.
    pub fn jet_pt(&self, slot: usize) -> Option<&Histogram1D> {
        self.inner.jet_pt.get(slot)
    }

    /// Number of per-slot jet pT histograms.
    pub fn jet_slots(&self) -> usize {
        self.inner.jet_pt.len()
    }

    /// Exclusive jet multiplicity.
    pub fn njets_exclusive(&self) -> &Histogram1D {
        &self.inner.njets_excl
    }

    /// Inclusive ("at least N") jet multiplicity.
    pub fn njets_inclusive(&self) -> &Histogram1D {
        &self.inner.njets_incl
    }

    /// Look a histogram up by name.
    pub fn get(&self, name: &str) -> Option<&Histogram1D> {
        self.inner.iter().find(|h| h.name() == name)
    }

    /// All histograms in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Histogram1D> {
        self.inner.iter()
    }

    /// Histogram names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.inner.iter().map(|h| h.name()).collect()
    }
}
