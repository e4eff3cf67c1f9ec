//! # hj-core
//!
//! Shared types for Higgs + jets histogramming: four-vectors, particles,
//! event records, the event source abstraction and the error type.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::EventSource;
pub use types::{DEFAULT_MAX_PARTICLES, EventRecord, FourVector, HIGGS_PID, Particle};
