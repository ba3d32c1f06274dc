//! Map metadata.

use glam::{DVec2, UVec2};

use crate::grid::CoordinateTransform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapInfo {
    pub width: u32,
    pub height: u32,
    pub resolution: f64,
    /// Origin of cell (0, 0) in world coordinates (meters).
    pub origin: DVec2,
}

impl Default for MapInfo {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            resolution: 0.1,
            origin: DVec2::ZERO,
        }
    }
}

impl MapInfo {
    pub fn square(width: u32, resolution: f64) -> Self {
        Self {
            width,
            height: width,
            resolution,
            ..Default::default()
        }
    }

    /// Width of the map in world units (meters).
    #[inline]
    pub fn world_width(&self) -> f64 {
        self.width as f64 * self.resolution
    }

    /// Height of the map in world units (meters).
    #[inline]
    pub fn world_height(&self) -> f64 {
        self.height as f64 * self.resolution
    }

    #[inline]
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    #[inline]
    pub fn transform(&self) -> CoordinateTransform {
        CoordinateTransform::new(self.resolution, self.origin)
    }
}
