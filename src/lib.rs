//! Log-odds occupancy grid mapping from recorded robot poses and laser scans.
//!
//! ```
//! use gridmap::{GridMapConfig, GridMapEngine, Pose2, RangeScan, RecordedDataset};
//!
//! let scan = RangeScan::uniform(-0.1, 0.1, 5.0, vec![2.0, 2.0, 2.0]);
//! let dataset: RecordedDataset = [
//!     (Pose2::from_xy_yaw(0.0, 0.0, 0.0), scan.clone()),
//!     (Pose2::from_xy_yaw(1.0, 0.0, 0.0), scan),
//! ]
//! .into_iter()
//! .collect();
//!
//! let mut engine = GridMapEngine::new(GridMapConfig::with_resolution(0.1))?;
//! engine.init_from_dataset(&dataset)?;
//! for record in dataset.records() {
//!     engine.update(&record.pose, &record.scan)?;
//! }
//! let map = engine.probability_map()?;
//! assert!(map.values().iter().all(|p| *p > 0.0 && *p < 1.0));
//! # Ok::<(), gridmap::MapError>(())
//! ```

pub mod config;
pub mod dataset;
pub mod engine;
pub mod export;
pub mod grid;
pub mod iterators;
pub mod playback;
pub mod raycast;
pub mod types;
pub mod visualization;

pub use config::GridMapConfig;
pub use dataset::{LaserDataset, RecordedDataset, Timestep, TimestepCursor};
pub use engine::{Diagnostics, GridMapEngine, UpdateStats};
pub use grid::{CoordinateTransform, Grid2d, LogOddsGrid, LogOddsParams, ProbabilityMap};
pub use playback::{MapFrame, Playback, RobotTransform};
pub use types::{MapError, MapInfo, Pose2, RangeScan};
