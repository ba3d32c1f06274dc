//! Grid extent from a recorded trajectory.

use glam::DVec2;

use crate::dataset::LaserDataset;
use crate::types::{Bounds, MapError, MapInfo, Result};

/// Upper limit on allocated cells (1 GiB of f32 log-odds).
const MAX_GRID_CELLS: u64 = 1 << 28;

/// Bounding box of every recorded pose position.
pub fn trajectory_bounds<D: LaserDataset + ?Sized>(dataset: &D) -> Result<Bounds> {
    if dataset.is_empty() {
        return Err(MapError::Initialization(
            "dataset contains no timesteps".to_string(),
        ));
    }

    let mut bounds = Bounds::empty();
    for &t in dataset.timesteps() {
        let pose = dataset
            .pose(t)
            .ok_or_else(|| MapError::Initialization(format!("timestep {t} has no pose")))?;
        if !pose.is_finite() {
            return Err(MapError::Initialization(format!(
                "timestep {t} has a non-finite pose {pose:?}"
            )));
        }
        bounds.expand_to_include(pose.position);
    }
    Ok(bounds)
}

/// Size a grid so every beam cast from any recorded pose stays inside it.
///
/// A trajectory whose poses all coincide is rejected. A straight-line
/// trajectory is accepted: the range margin gives it a non-zero area.
///
/// The trajectory's bounding box is grown by `ceil(max_range / resolution)`
/// cells plus `padding_cells` on every side, then snapped to whole cells so
/// the origin is an integer multiple of `resolution`.
pub fn size_from_dataset<D: LaserDataset + ?Sized>(
    dataset: &D,
    resolution: f64,
    padding_cells: u32,
) -> Result<MapInfo> {
    let bounds = trajectory_bounds(dataset)?;
    if bounds.size() == DVec2::ZERO {
        return Err(MapError::Initialization(format!(
            "every pose of the trajectory is at ({:.3}, {:.3})",
            bounds.min.x, bounds.min.y
        )));
    }

    let max_range = dataset.max_range();
    if !(max_range > 0.0 && max_range.is_finite()) {
        return Err(MapError::Initialization(format!(
            "maximum sensor range must be positive and finite, got {max_range}"
        )));
    }

    let margin = (max_range / resolution).ceil() + padding_cells as f64;
    let min_cell = (bounds.min / resolution).floor() - DVec2::splat(margin);
    let max_cell = (bounds.max / resolution).floor() + DVec2::splat(margin + 1.0);
    let size = max_cell - min_cell;

    let cells = size.x * size.y;
    if !cells.is_finite() || cells > MAX_GRID_CELLS as f64 {
        return Err(MapError::Initialization(format!(
            "grid of {} x {} cells is too large",
            size.x, size.y
        )));
    }

    Ok(MapInfo {
        width: size.x as u32,
        height: size.y as u32,
        resolution,
        origin: min_cell * resolution,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::dataset::RecordedDataset;
    use crate::types::{Pose2, RangeScan};

    fn dataset(positions: &[(f64, f64)], max_range: f64) -> RecordedDataset {
        positions
            .iter()
            .map(|&(x, y)| {
                let scan = RangeScan::uniform(0.0, 0.1, max_range, vec![1.0]);
                (Pose2::from_xy_yaw(x, y, 0.0), scan)
            })
            .collect()
    }

    #[test]
    fn covers_trajectory_plus_range() {
        let data = dataset(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)], 5.0);
        let info = size_from_dataset(&data, 0.1, 2).unwrap();

        assert!(info.world_width() >= 20.0);
        assert!(info.world_height() >= 20.0);
        assert!(info.origin.x <= -5.0 && info.origin.y <= -5.0);
        assert!(info.origin.x + info.world_width() > 15.0);
        assert!(info.origin.y + info.world_height() > 15.0);
    }

    #[test]
    fn origin_is_a_whole_number_of_cells() {
        let data = dataset(&[(0.33, -1.27), (1.9, 0.4)], 2.0);
        let info = size_from_dataset(&data, 0.25, 0).unwrap();
        let cells = info.origin / 0.25;
        assert_relative_eq!(cells.x, cells.x.round(), epsilon = 1e-9);
        assert_relative_eq!(cells.y, cells.y.round(), epsilon = 1e-9);
    }

    #[test]
    fn straight_line_is_sized_by_range() {
        let data = dataset(&[(1.0, 1.0), (3.0, 1.0)], 3.0);
        let info = size_from_dataset(&data, 0.5, 0).unwrap();
        // 6 cells of range each side plus the cells the poses sit in.
        assert_eq!(info.width, 17);
        assert_eq!(info.height, 13);
    }

    #[test]
    fn rejects_coincident_poses() {
        for positions in [&[(1.0, 1.0)][..], &[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]] {
            let data = dataset(positions, 5.0);
            assert!(matches!(
                size_from_dataset(&data, 0.1, 2),
                Err(MapError::Initialization(_))
            ));
        }
    }

    #[test]
    fn rejects_empty_dataset() {
        let data = RecordedDataset::new();
        assert!(matches!(
            size_from_dataset(&data, 0.1, 2),
            Err(MapError::Initialization(_))
        ));
    }

    #[test]
    fn rejects_degenerate_range() {
        for range in [0.0, -1.0, f64::INFINITY] {
            let data = dataset(&[(0.0, 0.0), (1.0, 0.0)], range);
            assert!(matches!(
                size_from_dataset(&data, 0.1, 2),
                Err(MapError::Initialization(_))
            ));
        }
    }

    #[test]
    fn rejects_non_finite_pose() {
        let data = dataset(&[(0.0, 0.0), (f64::NAN, 0.0)], 5.0);
        assert!(matches!(
            size_from_dataset(&data, 0.1, 2),
            Err(MapError::Initialization(_))
        ));
    }
}
