//! Per-scan bookkeeping so each cell receives at most one observation per scan.
//!
//! Beams fan out from the robot cell, so every beam of a scan crosses the
//! cells around the robot and neighbouring beams often end in the same cell.
//! Marks collect the cells a scan touched; an occupied mark overrides a free
//! one. Each mark carries the id of the scan that set it, so nothing has to
//! be cleared between scans.

use glam::UVec2;

use crate::grid::Grid2d;
use crate::types::{MapInfo, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Observation {
    Free,
    Occupied,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Mark {
    /// Id of the scan that set `observation`. 0 is never a live scan id.
    scan: u32,
    observation: Option<Observation>,
}

#[derive(Debug, Clone)]
pub(crate) struct ScanMarks {
    marks: Grid2d<Mark>,
    touched: Vec<UVec2>,
    scan: u32,
}

impl ScanMarks {
    pub(crate) fn new(info: MapInfo) -> Result<Self> {
        Ok(Self {
            marks: Grid2d::filled(info, Mark::default())?,
            touched: Vec::new(),
            scan: 0,
        })
    }

    /// Start collecting a new scan, forgetting the previous one.
    pub(crate) fn begin(&mut self) {
        self.touched.clear();
        self.scan = match self.scan.checked_add(1) {
            Some(id) => id,
            None => {
                // Ids wrapped; old stamps could collide with new ones.
                self.marks.fill(Mark::default());
                1
            }
        };
    }

    /// Record `observation` for `cell`. Occupied wins over free; out-of-grid
    /// cells are ignored.
    pub(crate) fn mark(&mut self, cell: UVec2, observation: Observation) {
        let scan = self.scan;
        let Some(mark) = self.marks.get_mut(cell) else {
            return;
        };
        if mark.scan != scan {
            *mark = Mark {
                scan,
                observation: Some(observation),
            };
            self.touched.push(cell);
        } else if observation == Observation::Occupied {
            mark.observation = Some(Observation::Occupied);
        }
    }

    /// Every cell touched by the current scan with its winning observation,
    /// in first-touched order.
    pub(crate) fn observations(&self) -> impl Iterator<Item = (UVec2, Observation)> + '_ {
        self.touched.iter().filter_map(|&cell| {
            let mark = self.marks.get(cell)?;
            Some((cell, mark.observation?))
        })
    }
}
