//! JSON Lines record source chaining several files in order.
//!
//! Each non-blank line is one event in ntuple branch layout:
//!
//! ```text
//! {"nparticle": 2, "kf": [25, 21], "px": [..], "py": [..], "pz": [..], "E": [..], "weight2": 1.0}
//! ```
//!
//! `nparticle` defaults to the length of `kf`; `weight` is accepted as an
//! alias of `weight2`. A record with more particles than the configured
//! capacity, or with branch arrays shorter than `nparticle`, aborts the run.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use hj_core::{Error, EventRecord, FourVector, Particle, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct NtupleRow {
    nparticle: Option<usize>,
    kf: Vec<i32>,
    px: Vec<f64>,
    py: Vec<f64>,
    pz: Vec<f64>,
    #[serde(rename = "E")]
    e: Vec<f64>,
    #[serde(alias = "weight")]
    weight2: f64,
}

impl NtupleRow {
    fn into_record(self, max_particles: usize, at: &str) -> Result<EventRecord> {
        let n = self.nparticle.unwrap_or(self.kf.len());
        if n > max_particles {
            return Err(Error::Source(format!(
                "{at}: nparticle={n} exceeds capacity {max_particles}"
            )));
        }
        let branches = [
            ("kf", self.kf.len()),
            ("px", self.px.len()),
            ("py", self.py.len()),
            ("pz", self.pz.len()),
            ("E", self.e.len()),
        ];
        for (branch, len) in branches {
            if len < n {
                return Err(Error::Source(format!(
                    "{at}: branch '{branch}' has {len} values, nparticle={n}"
                )));
            }
        }
        let particles = (0..n)
            .map(|i| {
                let p4 = FourVector::new(self.px[i], self.py[i], self.pz[i], self.e[i]);
                Particle::new(self.kf[i], p4)
            })
            .collect();
        Ok(EventRecord::new(particles, self.weight2))
    }
}

struct OpenFile {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

/// Chain of JSON Lines event files, read strictly in order.
pub struct JsonlSource {
    pending: VecDeque<PathBuf>,
    current: Option<OpenFile>,
    max_particles: usize,
    failed: bool,
}

impl JsonlSource {
    /// Create a source over `paths`. Files are opened lazily, one at a time.
    pub fn new(paths: impl IntoIterator<Item = PathBuf>, max_particles: usize) -> Self {
        Self { pending: paths.into_iter().collect(), current: None, max_particles, failed: false }
    }

    /// Check up front that every input exists, like adding files to a chain.
    pub fn check_inputs(&self) -> Result<()> {
        for p in &self.pending {
            if !p.is_file() {
                return Err(Error::Source(format!("input file not found: {}", p.display())));
            }
        }
        Ok(())
    }

    fn open(path: &Path) -> Result<OpenFile> {
        let f = File::open(path)
            .map_err(|e| Error::Source(format!("cannot open {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "opened input");
        Ok(OpenFile { path: path.to_path_buf(), lines: BufReader::new(f).lines(), line_no: 0 })
    }

    fn next_inner(&mut self) -> Option<Result<EventRecord>> {
        loop {
            if self.current.is_none() {
                let path = self.pending.pop_front()?;
                match Self::open(&path) {
                    Ok(f) => self.current = Some(f),
                    Err(e) => return Some(Err(e)),
                }
            }
            let file = self.current.as_mut()?;
            match file.lines.next() {
                None => {
                    tracing::debug!(
                        path = %file.path.display(),
                        lines = file.line_no,
                        "input exhausted"
                    );
                    self.current = None;
                }
                Some(Err(e)) => return Some(Err(Error::Io(e))),
                Some(Ok(line)) => {
                    file.line_no += 1;
                    if line.trim().is_empty() {
                        continue;
                    }
                    let at = format!("{}:{}", file.path.display(), file.line_no);
                    let row = match serde_json::from_str::<NtupleRow>(&line) {
                        Ok(row) => row,
                        Err(e) => return Some(Err(Error::Source(format!("{at}: {e}")))),
                    };
                    return Some(row.into_record(self.max_particles, &at));
                }
            }
        }
    }
}

impl Iterator for JsonlSource {
    type Item = Result<EventRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.next_inner();
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }
}
