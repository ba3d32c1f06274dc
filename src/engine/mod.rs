//! The grid-mapping engine.
//!
//! A [`GridMapEngine`] starts uninitialized. [`GridMapEngine::init_from_dataset`]
//! sizes and allocates the grid; from then on [`GridMapEngine::update`] fuses
//! one pose and scan at a time into it. Updates only ever add evidence, there
//! is no undo.

mod scan_marks;
pub mod sizing;

use glam::DVec2;
use log::{debug, info, warn};

use crate::config::GridMapConfig;
use crate::dataset::LaserDataset;
use crate::grid::{LogOddsGrid, ProbabilityMap};
use crate::raycast::{RayEnd, RayTracer};
use crate::engine::scan_marks::{Observation, ScanMarks};
use crate::types::{BeamReturn, MapError, MapInfo, Pose2, RangeScan, Result};

/// Per-update beam accounting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateStats {
    pub beams: usize,
    pub hits: usize,
    pub no_returns: usize,
    /// Beams skipped for a non-positive range or a non-finite pose.
    pub invalid: usize,
    /// Beams that reached the grid edge before their end cell.
    pub out_of_bounds: usize,
    /// Distinct cells lowered by this scan.
    pub free_updates: usize,
    /// Distinct cells raised by this scan.
    pub occupied_updates: usize,
}

/// Totals since initialization.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostics {
    pub updates: u64,
    pub beams: u64,
    pub invalid_beams: u64,
    pub out_of_bounds_beams: u64,
}

impl Diagnostics {
    fn record(&mut self, stats: &UpdateStats) {
        self.updates += 1;
        self.beams += stats.beams as u64;
        self.invalid_beams += stats.invalid as u64;
        self.out_of_bounds_beams += stats.out_of_bounds as u64;
    }
}

#[derive(Debug)]
struct ActiveMap {
    grid: LogOddsGrid,
    tracer: RayTracer,
    marks: ScanMarks,
    diagnostics: Diagnostics,
    /// Longest beam that can still end inside the grid.
    reach: f64,
}

#[derive(Debug)]
enum EngineState {
    Uninitialized,
    Active(ActiveMap),
}

#[derive(Debug)]
pub struct GridMapEngine {
    config: GridMapConfig,
    state: EngineState,
}

impl GridMapEngine {
    pub fn new(config: GridMapConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: EngineState::Uninitialized,
        })
    }

    pub fn config(&self) -> &GridMapConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, EngineState::Active(_))
    }

    /// Size the grid from the whole recorded trajectory and allocate it with
    /// every cell unknown.
    pub fn init_from_dataset<D: LaserDataset + ?Sized>(&mut self, dataset: &D) -> Result<()> {
        self.ensure_uninitialized()?;
        let info = sizing::size_from_dataset(
            dataset,
            self.config.resolution,
            self.config.padding_cells,
        )?;
        info!(
            "sized grid from {} timesteps (max range {:.2} m)",
            dataset.timesteps().len(),
            dataset.max_range()
        );
        self.activate(info)
    }

    /// Allocate a grid with explicit geometry instead of sizing it from a dataset.
    pub fn init_with_info(&mut self, info: MapInfo) -> Result<()> {
        self.ensure_uninitialized()?;
        if info.width == 0 || info.height == 0 {
            return Err(MapError::Initialization(format!(
                "grid of {} x {} cells has zero area",
                info.width, info.height
            )));
        }
        if info.resolution != self.config.resolution {
            warn!(
                "grid resolution {} overrides configured {}",
                info.resolution, self.config.resolution
            );
        }
        self.activate(info)
    }

    fn ensure_uninitialized(&self) -> Result<()> {
        match self.state {
            EngineState::Uninitialized => Ok(()),
            EngineState::Active(_) => Err(MapError::Initialization(
                "grid map engine is already initialized".to_string(),
            )),
        }
    }

    fn activate(&mut self, info: MapInfo) -> Result<()> {
        let grid = LogOddsGrid::new(info, self.config.log_odds)
            .map_err(|e| MapError::Initialization(e.to_string()))?;
        info!(
            "allocated {} x {} grid at {:.3} m/cell, origin ({:.3}, {:.3})",
            info.width, info.height, info.resolution, info.origin.x, info.origin.y
        );
        self.state = EngineState::Active(ActiveMap {
            grid,
            tracer: RayTracer::new(),
            marks: ScanMarks::new(info).map_err(|e| MapError::Initialization(e.to_string()))?,
            diagnostics: Diagnostics::default(),
            reach: info.world_width().hypot(info.world_height()) + info.resolution,
        });
        Ok(())
    }

    fn active(&self) -> Result<&ActiveMap> {
        match &self.state {
            EngineState::Active(map) => Ok(map),
            EngineState::Uninitialized => Err(MapError::NotInitialized),
        }
    }

    /// Fuse one scan taken at `pose` into the grid.
    ///
    /// Every beam frees the cells it crosses; beams with an obstacle return
    /// also mark their end cell occupied. Each cell receives at most one
    /// observation per scan, and occupied wins over free, so a single scan
    /// cannot classify a cell on its own. Beams that reach the grid edge are
    /// clipped there and counted, never reported as errors.
    pub fn update(&mut self, pose: &Pose2, scan: &RangeScan) -> Result<UpdateStats> {
        let EngineState::Active(map) = &mut self.state else {
            return Err(MapError::NotInitialized);
        };
        let ActiveMap {
            grid,
            tracer,
            marks,
            diagnostics,
            reach,
        } = map;

        let mut stats = UpdateStats {
            beams: scan.len(),
            ..Default::default()
        };

        if !pose.is_finite() {
            warn!("skipping scan at non-finite pose {pose:?}");
            stats.invalid = scan.len();
            diagnostics.record(&stats);
            return Ok(stats);
        }

        let info = *grid.info();
        let transform = info.transform();
        let bounds = info.size();
        let start = transform.to_cell(pose.position);
        marks.begin();

        for beam in scan.beams() {
            let ray_end = match beam.ret {
                BeamReturn::Hit => {
                    stats.hits += 1;
                    RayEnd::Hit
                }
                BeamReturn::NoReturn => {
                    stats.no_returns += 1;
                    RayEnd::MaxRange
                }
                BeamReturn::Invalid => {
                    stats.invalid += 1;
                    continue;
                }
            };

            // Past `reach` the end cell is off the grid either way; capping keeps
            // cell indices far from i32 limits.
            let end_world: DVec2 = pose.project(beam.bearing, beam.range.min(*reach));
            let end = transform.to_cell(end_world);

            let trace = tracer.trace(start, end, ray_end, bounds);
            for &cell in trace.free {
                marks.mark(cell, Observation::Free);
            }
            if let Some(cell) = trace.hit {
                marks.mark(cell, Observation::Occupied);
            }
            if trace.clipped {
                stats.out_of_bounds += 1;
            }
        }

        for (cell, observation) in marks.observations() {
            match observation {
                Observation::Free => {
                    grid.apply_free(cell)?;
                    stats.free_updates += 1;
                }
                Observation::Occupied => {
                    grid.apply_occupied(cell)?;
                    stats.occupied_updates += 1;
                }
            }
        }

        diagnostics.record(&stats);
        if stats.out_of_bounds > 0 {
            warn!(
                "{} of {} beams left the grid at ({:.2}, {:.2}); sizing underestimated the trajectory",
                stats.out_of_bounds, stats.beams, pose.position.x, pose.position.y
            );
        }
        debug!(
            "update {}: {} beams, {} hits, {} no return, {} free / {} occupied cell updates",
            diagnostics.updates,
            stats.beams,
            stats.hits,
            stats.no_returns,
            stats.free_updates,
            stats.occupied_updates
        );

        Ok(stats)
    }

    /// Owned probability snapshot of the whole grid.
    pub fn probability_map(&self) -> Result<ProbabilityMap> {
        Ok(self.active()?.grid.probability_map())
    }

    pub fn map_info(&self) -> Result<&MapInfo> {
        Ok(self.active()?.grid.info())
    }

    pub fn grid(&self) -> Result<&LogOddsGrid> {
        Ok(&self.active()?.grid)
    }

    pub fn diagnostics(&self) -> Result<&Diagnostics> {
        Ok(&self.active()?.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use glam::UVec2;

    use super::*;
    use crate::dataset::RecordedDataset;

    fn engine_at_origin() -> GridMapEngine {
        let mut engine = GridMapEngine::new(GridMapConfig::with_resolution(0.1)).unwrap();
        let data: RecordedDataset = [Pose2::default(), Pose2::from_xy_yaw(1.0, 1.0, 0.0)]
            .into_iter()
            .map(|pose| (pose, RangeScan::uniform(0.0, 0.1, 5.0, vec![5.0])))
            .collect();
        engine.init_from_dataset(&data).unwrap();
        engine
    }

    #[test]
    fn update_before_init_fails() {
        let mut engine = GridMapEngine::new(GridMapConfig::default()).unwrap();
        let scan = RangeScan::uniform(0.0, 0.1, 5.0, vec![1.0]);

        assert!(!engine.is_active());
        assert!(matches!(
            engine.update(&Pose2::default(), &scan),
            Err(MapError::NotInitialized)
        ));
        assert!(matches!(
            engine.probability_map(),
            Err(MapError::NotInitialized)
        ));
        assert!(matches!(engine.map_info(), Err(MapError::NotInitialized)));
    }

    #[test]
    fn init_twice_fails() {
        let mut engine = engine_at_origin();
        assert!(engine.is_active());
        assert!(matches!(
            engine.init_with_info(MapInfo::default()),
            Err(MapError::Initialization(_))
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GridMapConfig::with_resolution(0.0);
        assert!(matches!(
            GridMapEngine::new(config),
            Err(MapError::InvalidConfig(_))
        ));
    }

    #[test]
    fn beams_leaving_a_small_grid_are_clipped_and_counted() {
        let mut engine = GridMapEngine::new(GridMapConfig::with_resolution(1.0)).unwrap();
        engine.init_with_info(MapInfo::square(5, 1.0)).unwrap();

        let pose = Pose2::from_xy_yaw(2.5, 2.5, 0.0);
        let scan = RangeScan::from_pairs(50.0, [(0.0, 10.0), (std::f64::consts::PI, 1.0)]);
        let stats = engine.update(&pose, &scan).unwrap();

        assert_eq!(stats.beams, 2);
        assert_eq!(stats.out_of_bounds, 1);
        assert_eq!(stats.occupied_updates, 1);
        assert_eq!(engine.diagnostics().unwrap().out_of_bounds_beams, 1);

        let grid = engine.grid().unwrap();
        // Clipped beam frees up to the edge, marks nothing.
        for x in 2..5 {
            assert!(grid.log_odds(UVec2::new(x, 2)).unwrap() < 0.0);
        }
        // Short beam backwards hits cell (1, 2).
        assert!(grid.log_odds(UVec2::new(1, 2)).unwrap() > 0.0);
    }

    #[test]
    fn huge_ranges_do_not_overflow_cells() {
        let mut engine = GridMapEngine::new(GridMapConfig::with_resolution(1.0)).unwrap();
        engine.init_with_info(MapInfo::square(5, 1.0)).unwrap();

        let pose = Pose2::from_xy_yaw(2.5, 2.5, 0.3);
        let scan = RangeScan::from_pairs(f64::MAX, [(0.0, 1e300), (2.0, 1e300)]);
        let stats = engine.update(&pose, &scan).unwrap();
        assert_eq!(stats.out_of_bounds, 2);
    }

    #[test]
    fn invalid_beams_and_poses_are_skipped() {
        let mut engine = engine_at_origin();
        let before = engine.probability_map().unwrap();

        let scan = RangeScan::from_pairs(5.0, [(0.0, 0.0), (0.5, -2.0)]);
        let stats = engine.update(&Pose2::default(), &scan).unwrap();
        assert_eq!(stats.invalid, 2);

        let scan = RangeScan::from_pairs(5.0, [(0.0, 1.0)]);
        let stats = engine
            .update(&Pose2::from_xy_yaw(f64::NAN, 0.0, 0.0), &scan)
            .unwrap();
        assert_eq!(stats.invalid, 1);

        assert_eq!(engine.probability_map().unwrap(), before);
        assert_eq!(engine.diagnostics().unwrap().invalid_beams, 3);
        assert_eq!(engine.diagnostics().unwrap().updates, 2);
    }
}
