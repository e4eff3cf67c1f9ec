//! Equal-width 1D weighted histogram with under/overflow and ROOT-style statistics.

use hj_core::{Error, Result};
use serde::Serialize;

/// Where a value lands relative to the binned range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinIndex {
    /// Below `x_min`.
    Underflow,
    /// In-range bin (0-based).
    Bin(usize),
    /// At or above `x_max`, or NaN.
    Overflow,
}

/// A 1D weighted histogram over `[x_min, x_max)` with `n_bins` equal-width bins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram1D {
    name: String,
    title: String,
    n_bins: usize,
    x_min: f64,
    x_max: f64,
    bin_edges: Vec<f64>,
    bin_content: Vec<f64>,
    sumw2: Vec<f64>,
    underflow: f64,
    overflow: f64,
    underflow_sumw2: f64,
    overflow_sumw2: f64,
    /// Sum of weights over every fill, flows included.
    total_weight: f64,
    /// Raw number of `fill` calls.
    fills: u64,
    /// Reported entry count; equals `fills` unless overridden.
    entries: f64,
    // In-range moments for mean / std-dev.
    #[serde(skip)]
    tsumw: f64,
    #[serde(skip)]
    tsumwx: f64,
    #[serde(skip)]
    tsumwx2: f64,
}

impl Histogram1D {
    /// Create an empty histogram.
    pub fn new(name: impl Into<String>, n_bins: usize, x_min: f64, x_max: f64) -> Result<Self> {
        let name = name.into();
        if n_bins == 0 {
            return Err(Error::Validation(format!("histogram '{name}': n_bins must be > 0")));
        }
        if !x_min.is_finite() || !x_max.is_finite() || x_max <= x_min {
            return Err(Error::Validation(format!(
                "histogram '{name}': invalid range [{x_min}, {x_max})"
            )));
        }
        let width = (x_max - x_min) / n_bins as f64;
        let mut bin_edges: Vec<f64> = (0..n_bins).map(|i| x_min + i as f64 * width).collect();
        bin_edges.push(x_max);

        Ok(Self {
            name,
            title: String::new(),
            n_bins,
            x_min,
            x_max,
            bin_edges,
            bin_content: vec![0.0; n_bins],
            sumw2: vec![0.0; n_bins],
            underflow: 0.0,
            overflow: 0.0,
            underflow_sumw2: 0.0,
            overflow_sumw2: 0.0,
            total_weight: 0.0,
            fills: 0,
            entries: 0.0,
            tsumw: 0.0,
            tsumwx: 0.0,
            tsumwx2: 0.0,
        })
    }

    /// Set the histogram title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Locate the bin for `x`.
    pub fn find_bin(&self, x: f64) -> BinIndex {
        if x < self.x_min {
            return BinIndex::Underflow;
        }
        if x >= self.x_max || x.is_nan() {
            return BinIndex::Overflow;
        }
        let b = ((x - self.x_min) * self.n_bins as f64 / (self.x_max - self.x_min)) as usize;
        BinIndex::Bin(b.min(self.n_bins - 1))
    }

    /// Add one entry of value `x` with weight `w`.
    pub fn fill(&mut self, x: f64, w: f64) -> BinIndex {
        let w2 = w * w;
        self.fills += 1;
        self.entries += 1.0;
        self.total_weight += w;

        let bin = self.find_bin(x);
        match bin {
            BinIndex::Underflow => {
                self.underflow += w;
                self.underflow_sumw2 += w2;
            }
            BinIndex::Overflow => {
                self.overflow += w;
                self.overflow_sumw2 += w2;
            }
            BinIndex::Bin(b) => {
                self.bin_content[b] += w;
                self.sumw2[b] += w2;
                self.tsumw += w;
                self.tsumwx += w * x;
                self.tsumwx2 += w * x * x;
            }
        }
        bin
    }

    /// Add another histogram bin-for-bin. Binning must match exactly.
    pub fn merge(&mut self, other: &Histogram1D) -> Result<()> {
        if self.n_bins != other.n_bins || self.x_min != other.x_min || self.x_max != other.x_max {
            return Err(Error::Validation(format!(
                "cannot merge '{}' ({} bins, [{}, {})) with '{}' ({} bins, [{}, {}))",
                self.name,
                self.n_bins,
                self.x_min,
                self.x_max,
                other.name,
                other.n_bins,
                other.x_min,
                other.x_max
            )));
        }
        for (a, b) in self.bin_content.iter_mut().zip(&other.bin_content) {
            *a += b;
        }
        for (a, b) in self.sumw2.iter_mut().zip(&other.sumw2) {
            *a += b;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.underflow_sumw2 += other.underflow_sumw2;
        self.overflow_sumw2 += other.overflow_sumw2;
        self.total_weight += other.total_weight;
        self.fills += other.fills;
        self.entries += other.entries;
        self.tsumw += other.tsumw;
        self.tsumwx += other.tsumwx;
        self.tsumwx2 += other.tsumwx2;
        Ok(())
    }

    /// Override the reported entry count.
    pub fn set_entries(&mut self, entries: f64) {
        self.entries = entries;
    }

    /// Histogram name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Histogram title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of in-range bins.
    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Lower edge of the first bin.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Upper edge of the last bin.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Bin edges (length = n_bins + 1).
    pub fn bin_edges(&self) -> &[f64] {
        &self.bin_edges
    }

    /// Bin contents (sum of weights per bin, flows excluded).
    pub fn bin_contents(&self) -> &[f64] {
        &self.bin_content
    }

    /// Content of bin `i`; `None` when out of range.
    pub fn bin_content(&self, i: usize) -> Option<f64> {
        self.bin_content.get(i).copied()
    }

    /// Sum of squared weights per bin.
    pub fn sumw2(&self) -> &[f64] {
        &self.sumw2
    }

    /// Underflow sum of weights.
    pub fn underflow(&self) -> f64 {
        self.underflow
    }

    /// Overflow sum of weights.
    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    /// Sum of weights over every fill, flows included.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Sum of in-range bin contents.
    pub fn integral(&self) -> f64 {
        self.bin_content.iter().sum()
    }

    /// Raw number of fills.
    pub fn fills(&self) -> u64 {
        self.fills
    }

    /// Reported number of entries.
    pub fn entries(&self) -> f64 {
        self.entries
    }

    /// Weighted mean of in-range fills.
    pub fn mean(&self) -> f64 {
        if self.tsumw == 0.0 { 0.0 } else { self.tsumwx / self.tsumw }
    }

    /// Weighted standard deviation of in-range fills.
    pub fn std_dev(&self) -> f64 {
        if self.tsumw == 0.0 {
            return 0.0;
        }
        let mean = self.mean();
        (self.tsumwx2 / self.tsumw - mean * mean).max(0.0).sqrt()
    }
}

/// Build the cumulative ("at least k") histogram from an exclusive one.
///
/// Bin `k` of the result holds the sum of exclusive bins `k..` plus the
/// exclusive overflow. Flows and fill statistics are not reconstructed; the
/// reported entry count is copied from `exclusive`.
pub fn inclusive_from_exclusive(
    exclusive: &Histogram1D,
    name: impl Into<String>,
) -> Histogram1D {
    let mut out = exclusive.clone();
    out.name = name.into();
    out.underflow = 0.0;
    out.underflow_sumw2 = 0.0;
    out.overflow = 0.0;
    out.overflow_sumw2 = 0.0;

    let mut acc = exclusive.overflow;
    let mut acc2 = exclusive.overflow_sumw2;
    for k in (0..exclusive.n_bins).rev() {
        acc += exclusive.bin_content[k];
        acc2 += exclusive.sumw2[k];
        out.bin_content[k] = acc;
        out.sumw2[k] = acc2;
    }
    out.total_weight = out.integral();
    out.fills = exclusive.fills;
    out.entries = exclusive.entries;
    out.tsumw = 0.0;
    out.tsumwx = 0.0;
    out.tsumwx2 = 0.0;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fill_simple() {
        let mut h = Histogram1D::new("h", 3, 0.0, 3.0).unwrap();
        for x in [0.5, 1.5, 2.5, 0.5, -1.0, 3.5] {
            h.fill(x, 1.0);
        }
        assert_eq!(h.bin_contents(), &[2.0, 1.0, 1.0]);
        assert_eq!(h.underflow(), 1.0);
        assert_eq!(h.overflow(), 1.0);
        assert_eq!(h.entries(), 6.0);
        assert_eq!(h.total_weight(), 6.0);
        assert_eq!(h.integral(), 4.0);
    }

    #[test]
    fn fill_with_weight() {
        let mut h = Histogram1D::new("h", 2, 0.0, 2.0).unwrap();
        h.fill(0.5, 2.0);
        h.fill(1.5, 3.0);
        h.fill(0.5, 1.0);
        assert_eq!(h.bin_contents(), &[3.0, 3.0]);
        assert_eq!(h.sumw2(), &[5.0, 9.0]);
    }

    #[test]
    fn negative_weights_are_kept() {
        let mut h = Histogram1D::new("h", 2, 0.0, 2.0).unwrap();
        h.fill(0.5, -1.0);
        h.fill(1.5, 2.0);
        assert_eq!(h.bin_contents(), &[-1.0, 2.0]);
        assert_eq!(h.total_weight(), 1.0);
        assert_eq!(h.sumw2(), &[1.0, 4.0]);
    }

    #[test]
    fn find_bin_edge_cases() {
        let h = Histogram1D::new("h", 3, 0.0, 3.0).unwrap();
        assert_eq!(h.find_bin(-0.5), BinIndex::Underflow);
        assert_eq!(h.find_bin(3.0), BinIndex::Overflow);
        assert_eq!(h.find_bin(f64::NAN), BinIndex::Overflow);
        assert_eq!(h.find_bin(f64::INFINITY), BinIndex::Overflow);
        assert_eq!(h.find_bin(0.0), BinIndex::Bin(0));
        assert_eq!(h.find_bin(1.0), BinIndex::Bin(1));
        assert_eq!(h.find_bin(2.99), BinIndex::Bin(2));
    }

    #[test]
    fn integer_values_land_on_bin_centres() {
        let h = Histogram1D::new("n", 5, -0.5, 4.5).unwrap();
        for k in 0..5 {
            assert_eq!(h.find_bin(k as f64), BinIndex::Bin(k));
        }
        assert_eq!(h.find_bin(5.0), BinIndex::Overflow);
    }

    #[test]
    fn bin_edges_cover_range() {
        let h = Histogram1D::new("pt", 100, 0.0, 1500.0).unwrap();
        assert_eq!(h.bin_edges().len(), 101);
        assert_eq!(h.bin_edges()[0], 0.0);
        assert_eq!(h.bin_edges()[100], 1500.0);
        assert_relative_eq!(h.bin_edges()[1], 15.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_binning_is_rejected() {
        assert!(Histogram1D::new("h", 0, 0.0, 1.0).is_err());
        assert!(Histogram1D::new("h", 5, 1.0, 1.0).is_err());
        assert!(Histogram1D::new("h", 5, 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn mean_and_std_dev_use_in_range_fills() {
        let mut h = Histogram1D::new("h", 10, 0.0, 10.0).unwrap();
        h.fill(2.0, 1.0);
        h.fill(4.0, 1.0);
        h.fill(100.0, 1.0);
        assert_relative_eq!(h.mean(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(h.std_dev(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn merge_sums_everything() {
        let mut a = Histogram1D::new("h", 2, 0.0, 2.0).unwrap();
        let mut b = Histogram1D::new("h", 2, 0.0, 2.0).unwrap();
        a.fill(0.5, 1.0);
        b.fill(1.5, 2.0);
        b.fill(5.0, 0.5);
        a.merge(&b).unwrap();
        assert_eq!(a.bin_contents(), &[1.0, 2.0]);
        assert_eq!(a.overflow(), 0.5);
        assert_eq!(a.entries(), 3.0);
        assert_eq!(a.fills(), 3);
        assert_eq!(a.total_weight(), 3.5);
    }

    #[test]
    fn merge_rejects_different_binning() {
        let mut a = Histogram1D::new("h", 2, 0.0, 2.0).unwrap();
        let b = Histogram1D::new("h", 3, 0.0, 2.0).unwrap();
        let err = a.merge(&b).unwrap_err();
        assert!(err.to_string().contains("cannot merge"));
    }

    #[test]
    fn set_entries_only_touches_the_statistic() {
        let mut h = Histogram1D::new("h", 2, 0.0, 2.0).unwrap();
        h.fill(0.5, 1.0);
        h.set_entries(10.0);
        assert_eq!(h.entries(), 10.0);
        assert_eq!(h.fills(), 1);
        assert_eq!(h.integral(), 1.0);
    }

    #[test]
    fn inclusive_is_suffix_sum_with_overflow() {
        let mut excl = Histogram1D::new("excl", 3, -0.5, 2.5).unwrap();
        excl.fill(0.0, 1.0);
        excl.fill(1.0, 2.0);
        excl.fill(2.0, 3.0);
        excl.fill(7.0, 0.5);
        let incl = inclusive_from_exclusive(&excl, "incl");
        assert_eq!(incl.name(), "incl");
        assert_eq!(incl.bin_contents(), &[6.5, 5.5, 3.5]);
        assert_eq!(incl.entries(), excl.entries());
        assert_eq!(incl.overflow(), 0.0);
    }
}
