//! Event data types: four-vectors, particles and event records.

use serde::{Deserialize, Serialize};

/// PDG identity code of the Higgs boson.
pub const HIGGS_PID: i32 = 25;

/// Default particle capacity of a record (the ntuple `Nmax`).
///
/// Honouring the capacity is the record source's contract; the core never checks it.
pub const DEFAULT_MAX_PARTICLES: usize = 4;

/// Immutable four-momentum `(px, py, pz, E)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FourVector {
    px: f64,
    py: f64,
    pz: f64,
    #[serde(rename = "E")]
    e: f64,
}

impl FourVector {
    /// Create from Cartesian components.
    pub fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Create from transverse momentum, pseudorapidity, azimuth and mass.
    pub fn from_pt_eta_phi_m(pt: f64, eta: f64, phi: f64, m: f64) -> Self {
        let px = pt * phi.cos();
        let py = pt * phi.sin();
        let pz = pt * eta.sinh();
        let p = pt * eta.cosh();
        Self { px, py, pz, e: (p * p + m * m).sqrt() }
    }

    /// x component of momentum.
    #[inline]
    pub fn px(&self) -> f64 {
        self.px
    }

    /// y component of momentum.
    #[inline]
    pub fn py(&self) -> f64 {
        self.py
    }

    /// z (beam axis) component of momentum.
    #[inline]
    pub fn pz(&self) -> f64 {
        self.pz
    }

    /// Energy.
    #[inline]
    pub fn e(&self) -> f64 {
        self.e
    }

    /// Transverse momentum `sqrt(px² + py²)`.
    #[inline]
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Magnitude of the 3-momentum.
    pub fn p(&self) -> f64 {
        (self.px * self.px + self.py * self.py + self.pz * self.pz).sqrt()
    }

    /// Pseudorapidity.
    ///
    /// On the beam axis this is `+inf` / `-inf` depending on the sign of `pz`,
    /// and `0` for a vector with no momentum at all.
    pub fn eta(&self) -> f64 {
        let pt = self.pt();
        if pt == 0.0 {
            return if self.pz > 0.0 {
                f64::INFINITY
            } else if self.pz < 0.0 {
                f64::NEG_INFINITY
            } else {
                0.0
            };
        }
        (self.pz / pt).asinh()
    }

    /// Azimuthal angle in `(-pi, pi]`.
    pub fn phi(&self) -> f64 {
        if self.px == 0.0 && self.py == 0.0 { 0.0 } else { self.py.atan2(self.px) }
    }

    /// Invariant mass; negative for space-like vectors.
    pub fn mass(&self) -> f64 {
        let p = self.p();
        let m2 = self.e * self.e - p * p;
        if m2 < 0.0 { -(-m2).sqrt() } else { m2.sqrt() }
    }
}

/// A particle entry: identity code plus four-momentum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// PDG Monte Carlo identity code.
    pub pid: i32,
    /// Four-momentum.
    pub p4: FourVector,
}

impl Particle {
    /// Create a particle.
    pub fn new(pid: i32, p4: FourVector) -> Self {
        Self { pid, p4 }
    }

    /// Whether this particle is the Higgs boson.
    pub fn is_higgs(&self) -> bool {
        self.pid == HIGGS_PID
    }
}

/// One collision event: particles in source order plus a signed weight.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventRecord {
    /// Particles, in the order the source supplied them.
    pub particles: Vec<Particle>,
    /// Event weight (may be negative).
    pub weight: f64,
}

impl EventRecord {
    /// Create a record.
    pub fn new(particles: Vec<Particle>, weight: f64) -> Self {
        Self { particles, weight }
    }

    /// Append a particle.
    pub fn with_particle(mut self, pid: i32, p4: FourVector) -> Self {
        self.particles.push(Particle::new(pid, p4));
        self
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the record has no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
