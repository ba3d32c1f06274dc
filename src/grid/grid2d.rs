use glam::{DVec2, IVec2, UVec2};

use crate::grid::CoordinateTransform;
use crate::raycast::utils::in_bounds;
use crate::types::{MapError, MapInfo, Result};

/// Dense row-major 2D grid. Cell `(x, y)` lives at `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2d<T> {
    info: MapInfo,
    transform: CoordinateTransform,
    data: Vec<T>,
}

impl<T> Grid2d<T> {
    pub fn new(info: MapInfo, data: Vec<T>) -> Result<Self> {
        let expected_len = info.cell_count();
        if data.len() != expected_len {
            return Err(MapError::InvalidConfig(format!(
                "data length {} does not match map size {}",
                data.len(),
                expected_len
            )));
        }
        if !(info.resolution > 0.0 && info.resolution.is_finite()) {
            return Err(MapError::InvalidConfig(format!(
                "resolution must be positive, got {}",
                info.resolution
            )));
        }

        Ok(Self {
            transform: info.transform(),
            info,
            data,
        })
    }

    pub fn filled(info: MapInfo, value: T) -> Result<Self>
    where
        T: Clone,
    {
        let data = vec![value; info.cell_count()];
        Self::new(info, data)
    }

    pub fn info(&self) -> &MapInfo {
        &self.info
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    /// Bounds check for signed cells, as produced while tracing.
    #[inline]
    pub fn contains(&self, cell: IVec2) -> bool {
        in_bounds(&cell, &self.info.size())
    }

    pub fn get(&self, cell: UVec2) -> Option<&T> {
        let idx = self.checked_index(cell)?;
        Some(&self.data[idx])
    }

    pub fn get_mut(&mut self, cell: UVec2) -> Option<&mut T> {
        let idx = self.checked_index(cell)?;
        Some(&mut self.data[idx])
    }

    pub fn set(&mut self, cell: UVec2, value: T) -> Result<()> {
        let idx = self
            .checked_index(cell)
            .ok_or_else(|| out_of_bounds(cell, &self.info))?;
        self.data[idx] = value;
        Ok(())
    }

    /// Overwrite every cell with `value`.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.data.fill(value);
    }

    #[inline]
    fn checked_index(&self, cell: UVec2) -> Option<usize> {
        if cell.x >= self.info.width || cell.y >= self.info.height {
            return None;
        }
        Some((cell.y as usize) * (self.info.width as usize) + (cell.x as usize))
    }

    /// In-grid cell containing `world`, if any.
    pub fn world_to_cell(&self, world: DVec2) -> Option<UVec2> {
        let cell = self.transform.to_cell(world);
        self.contains(cell).then(|| cell.as_uvec2())
    }

    /// World coordinates of the centre of `cell`.
    pub fn cell_to_world(&self, cell: UVec2) -> DVec2 {
        self.transform.to_world(cell)
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Apply `f` to every cell, producing a grid with the same geometry.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid2d<U> {
        Grid2d {
            info: self.info,
            transform: self.transform,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Iterate `(cell, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (UVec2, &T)> + '_ {
        let width = self.info.width as usize;
        self.data.iter().enumerate().map(move |(idx, value)| {
            let cell = UVec2::new((idx % width) as u32, (idx / width) as u32);
            (cell, value)
        })
    }
}

pub(crate) fn out_of_bounds(cell: UVec2, info: &MapInfo) -> MapError {
    MapError::OutOfBounds(format!(
        "cell ({}, {}) out of bounds for map {}x{}",
        cell.x, cell.y, info.width, info.height
    ))
}
