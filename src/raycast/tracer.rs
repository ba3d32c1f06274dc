//! Beam tracing for log-odds updates.
//!
//! A beam from the robot cell to its end cell marks every cell it crosses as
//! free. What happens at the far end depends on how the beam ended:
//!
//! - [`RayEnd::Hit`]: the end cell is reported as the hit cell.
//! - [`RayEnd::MaxRange`]: the end cell is excluded, nothing is hit.
//! - the beam leaves the grid first: tracing stops at the last in-bounds
//!   cell and the trace is flagged as clipped.

use glam::{IVec2, UVec2};

use crate::iterators::line::LineCells;
use crate::raycast::utils::in_bounds;

/// How a traced beam ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayEnd {
    /// Obstacle return in the end cell.
    Hit,
    /// No return; the end cell is the max-range cell.
    MaxRange,
}

/// Result of tracing one beam. Borrows the tracer's buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamTrace<'a> {
    /// Cells the beam passed through, in order from the start cell.
    pub free: &'a [UVec2],
    /// The obstacle cell, for in-bounds `Hit` beams.
    pub hit: Option<UVec2>,
    /// True if the beam left the grid (or started outside it).
    pub clipped: bool,
}

/// Traces beams over a grid of a fixed size, reusing one cell buffer.
#[derive(Debug, Clone, Default)]
pub struct RayTracer {
    free: Vec<UVec2>,
}

impl RayTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trace the beam from `start` to `end` over a grid of `bounds` cells.
    pub fn trace(&mut self, start: IVec2, end: IVec2, ray_end: RayEnd, bounds: UVec2) -> BeamTrace<'_> {
        self.free.clear();

        if !in_bounds(&start, &bounds) {
            return BeamTrace {
                free: &self.free,
                hit: None,
                clipped: true,
            };
        }

        let mut hit = None;
        let mut clipped = false;
        for cell in LineCells::new(start, end) {
            if !in_bounds(&cell, &bounds) {
                clipped = true;
                break;
            }
            if cell == end {
                if ray_end == RayEnd::Hit {
                    hit = Some(cell.as_uvec2());
                }
                break;
            }
            self.free.push(cell.as_uvec2());
        }

        BeamTrace {
            free: &self.free,
            hit,
            clipped,
        }
    }
}
