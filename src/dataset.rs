//! Recorded pose/scan sequences consumed by the engine.

use crate::types::{Pose2, RangeScan};

/// Identifier of one recorded timestep.
pub type Timestep = usize;

/// Source of recorded poses and scans.
///
/// The engine reads the whole trajectory once for sizing, then pulls one
/// timestep at a time, in order, for updates.
pub trait LaserDataset {
    /// All timesteps, in playback order.
    fn timesteps(&self) -> &[Timestep];

    fn pose(&self, t: Timestep) -> Option<Pose2>;

    fn scan(&self, t: Timestep) -> Option<&RangeScan>;

    /// Largest range the sensor can report, in meters.
    fn max_range(&self) -> f64;

    fn is_empty(&self) -> bool {
        self.timesteps().is_empty()
    }
}

/// A single recorded timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub pose: Pose2,
    pub scan: RangeScan,
}

/// In-memory dataset; timestep `t` is the `t`-th pushed record.
#[derive(Debug, Clone, Default)]
pub struct RecordedDataset {
    records: Vec<Record>,
    timesteps: Vec<Timestep>,
    max_range: f64,
}

impl RecordedDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pose: Pose2, scan: RangeScan) {
        self.max_range = self.max_range.max(scan.max_range());
        self.timesteps.push(self.records.len());
        self.records.push(Record { pose, scan });
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl FromIterator<(Pose2, RangeScan)> for RecordedDataset {
    fn from_iter<I: IntoIterator<Item = (Pose2, RangeScan)>>(iter: I) -> Self {
        let mut dataset = Self::new();
        for (pose, scan) in iter {
            dataset.push(pose, scan);
        }
        dataset
    }
}

impl LaserDataset for RecordedDataset {
    fn timesteps(&self) -> &[Timestep] {
        &self.timesteps
    }

    fn pose(&self, t: Timestep) -> Option<Pose2> {
        self.records.get(t).map(|r| r.pose)
    }

    fn scan(&self, t: Timestep) -> Option<&RangeScan> {
        self.records.get(t).map(|r| &r.scan)
    }

    fn max_range(&self) -> f64 {
        self.max_range
    }
}

/// Explicit position in a dataset's timestep list.
#[derive(Debug, Clone)]
pub struct TimestepCursor {
    timesteps: Vec<Timestep>,
    position: usize,
}

impl TimestepCursor {
    pub fn new<D: LaserDataset + ?Sized>(dataset: &D) -> Self {
        Self {
            timesteps: dataset.timesteps().to_vec(),
            position: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.position < self.timesteps.len()
    }

    /// Return the next timestep and move past it, or `None` once exhausted.
    pub fn advance(&mut self) -> Option<Timestep> {
        let t = self.timesteps.get(self.position).copied()?;
        self.position += 1;
        Some(t)
    }

    /// Final timestep of the sequence, held once playback is exhausted.
    pub fn last(&self) -> Option<Timestep> {
        self.timesteps.last().copied()
    }

    /// Number of timesteps already consumed.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.timesteps.len() - self.position
    }
}
