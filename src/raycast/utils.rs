use glam::{IVec2, UVec2};

/// Bounds check for signed cells; negative coordinates wrap past any width.
#[inline]
pub fn in_bounds(cell: &IVec2, bounds: &UVec2) -> bool {
    (cell.x as u32) < bounds.x && (cell.y as u32) < bounds.y
}
