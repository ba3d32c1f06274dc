use glam::UVec2;

use crate::grid::Grid2d;
use crate::types::{DEFAULT_FREE_THRESH, DEFAULT_OCCUPIED_THRESH, MapInfo};

/// Classification of a cell against the default occupancy thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Free,
    Unknown,
    Occupied,
}

/// Per-state cell totals of a [`ProbabilityMap`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CellCounts {
    pub free: usize,
    pub unknown: usize,
    pub occupied: usize,
}

/// Owned snapshot of occupancy probabilities, one value in (0, 1) per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityMap {
    grid: Grid2d<f64>,
}

impl ProbabilityMap {
    pub(crate) fn new(grid: Grid2d<f64>) -> Self {
        Self { grid }
    }

    pub fn info(&self) -> &MapInfo {
        self.grid.info()
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn get(&self, cell: UVec2) -> Option<f64> {
        self.grid.get(cell).copied()
    }

    /// Row-major probabilities.
    pub fn values(&self) -> &[f64] {
        self.grid.data()
    }

    pub fn grid(&self) -> &Grid2d<f64> {
        &self.grid
    }

    /// Row-major occupancy percentages, `(p * 100)` truncated. Unknown cells
    /// come out as 50.
    pub fn quantize(&self) -> Vec<i8> {
        self.values().iter().map(|p| quantize(*p)).collect()
    }

    pub fn classify(&self, cell: UVec2) -> Option<CellState> {
        self.get(cell).map(classify)
    }

    pub fn counts(&self) -> CellCounts {
        self.values()
            .iter()
            .fold(CellCounts::default(), |mut counts, p| {
                match classify(*p) {
                    CellState::Free => counts.free += 1,
                    CellState::Unknown => counts.unknown += 1,
                    CellState::Occupied => counts.occupied += 1,
                }
                counts
            })
    }
}

#[inline]
fn quantize(p: f64) -> i8 {
    (p * 100.0) as i8
}

#[inline]
pub(crate) fn classify(p: f64) -> CellState {
    if p >= DEFAULT_OCCUPIED_THRESH {
        CellState::Occupied
    } else if p <= DEFAULT_FREE_THRESH {
        CellState::Free
    } else {
        CellState::Unknown
    }
}
