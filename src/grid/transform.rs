//! World <-> cell conversion.

use glam::{DVec2, IVec2, UVec2};

/// Offset, in cells, within which a world coordinate snaps up onto the next
/// cell boundary. Keeps exact multiples of the resolution (5.0 m at 0.1 m)
/// from landing one cell short after floating point division.
const BOUNDARY_SNAP: f64 = 1e-9;

/// Maps world coordinates (meters) to grid cells and back.
///
/// Cell `(i, j)` covers `[origin + (i, j) * resolution, origin + (i + 1, j + 1) * resolution)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    resolution: f64,
    origin: DVec2,
}

impl CoordinateTransform {
    pub fn new(resolution: f64, origin: DVec2) -> Self {
        Self { resolution, origin }
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    /// Continuous map coordinates (cells, not floored).
    #[inline]
    pub fn world_to_map(&self, world: DVec2) -> DVec2 {
        (world - self.origin) / self.resolution
    }

    /// Cell containing `world`. The result may lie outside any particular
    /// grid; callers check bounds before indexing.
    #[inline]
    pub fn to_cell(&self, world: DVec2) -> IVec2 {
        let map = self.world_to_map(world) + DVec2::splat(BOUNDARY_SNAP);
        map.floor().as_ivec2()
    }

    /// World coordinates of the centre of `cell`.
    #[inline]
    pub fn to_world(&self, cell: UVec2) -> DVec2 {
        self.cell_origin(cell) + DVec2::splat(0.5 * self.resolution)
    }

    /// World coordinates of the lower-left corner of `cell`.
    #[inline]
    pub fn cell_origin(&self, cell: UVec2) -> DVec2 {
        self.origin + cell.as_dvec2() * self.resolution
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn world_to_cell_to_world() {
        let transform = CoordinateTransform::new(0.5, DVec2::new(-1.0, -2.0));

        let cell = transform.to_cell(DVec2::new(0.1, 0.3));
        assert_eq!(cell, IVec2::new(2, 4));

        let centre = transform.to_world(cell.as_uvec2());
        assert_relative_eq!(centre.x, 0.25);
        assert_relative_eq!(centre.y, 0.25);
        assert_eq!(transform.to_cell(centre), cell);
    }

    #[test]
    fn points_below_origin_give_negative_cells() {
        let transform = CoordinateTransform::new(1.0, DVec2::ZERO);
        assert_eq!(transform.to_cell(DVec2::new(-0.5, 0.5)), IVec2::new(-1, 0));
        assert_eq!(transform.to_cell(DVec2::new(-1.0, -1.5)), IVec2::new(-1, -2));
    }

    #[test]
    fn exact_multiples_of_resolution_land_on_the_upper_cell() {
        let transform = CoordinateTransform::new(0.1, DVec2::new(-10.0, -10.0));
        assert_eq!(transform.to_cell(DVec2::new(0.0, 0.0)), IVec2::new(100, 100));
        assert_eq!(transform.to_cell(DVec2::new(5.0, 0.0)), IVec2::new(150, 100));
        assert_eq!(transform.to_cell(DVec2::new(4.99, 0.0)), IVec2::new(149, 100));
    }
}
