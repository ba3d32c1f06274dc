//! Fixed-order playback of a dataset through the engine.
//!
//! Each [`Playback::step`] consumes one timestep and returns the frame a
//! publisher would ship: the quantized map, its metadata and the robot's
//! transform. Once the dataset is exhausted the last pose is held and the
//! last frame is returned again without touching the engine.

use glam::{DVec2, DVec4};
use log::{debug, info};

use crate::dataset::{LaserDataset, Timestep, TimestepCursor};
use crate::engine::GridMapEngine;
use crate::types::{MapError, MapInfo, Pose2, Result};

pub const MAP_FRAME_ID: &str = "map";
pub const ROBOT_FRAME_ID: &str = "robot_base";

/// Robot pose expressed as a planar transform from the map frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotTransform {
    pub parent_frame: &'static str,
    pub child_frame: &'static str,
    pub translation: DVec2,
    /// Rotation about +z as an `(x, y, z, w)` quaternion.
    pub rotation: DVec4,
}

impl RobotTransform {
    pub fn from_pose(pose: &Pose2) -> Self {
        let (sin, cos) = (0.5 * pose.yaw).sin_cos();
        Self {
            parent_frame: MAP_FRAME_ID,
            child_frame: ROBOT_FRAME_ID,
            translation: pose.position,
            rotation: DVec4::new(0.0, 0.0, sin, cos),
        }
    }
}

/// Everything published for one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFrame {
    /// Timestep whose pose this frame carries.
    pub timestep: Timestep,
    /// True if the engine was updated for this frame, false if it repeats
    /// the held state after the dataset ran out.
    pub updated: bool,
    pub info: MapInfo,
    /// Row-major occupancy percentages, see [`crate::grid::ProbabilityMap::quantize`].
    pub data: Vec<i8>,
    pub pose: Pose2,
    pub transform: RobotTransform,
}

#[derive(Debug, Clone)]
pub struct Playback {
    cursor: TimestepCursor,
    last_frame: Option<MapFrame>,
    frames_published: u64,
}

impl Playback {
    pub fn new<D: LaserDataset + ?Sized>(dataset: &D) -> Self {
        Self {
            cursor: TimestepCursor::new(dataset),
            last_frame: None,
            frames_published: 0,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        !self.cursor.has_next()
    }

    pub fn cursor(&self) -> &TimestepCursor {
        &self.cursor
    }

    pub fn frames_published(&self) -> u64 {
        self.frames_published
    }

    /// Advance one timestep, or republish the held frame once exhausted.
    pub fn step<D: LaserDataset + ?Sized>(
        &mut self,
        engine: &mut GridMapEngine,
        dataset: &D,
    ) -> Result<MapFrame> {
        if !engine.is_active() {
            return Err(MapError::NotInitialized);
        }

        let frame = match self.cursor.advance() {
            Some(t) => {
                let pose = pose_at(dataset, t)?;
                let scan = dataset
                    .scan(t)
                    .ok_or_else(|| MapError::Dataset(format!("timestep {t} has no scan")))?;
                let stats = engine.update(&pose, scan)?;
                debug!("timestep {t}: {} beams fused", stats.beams);
                if !self.cursor.has_next() {
                    info!("dataset exhausted after timestep {t}; holding last pose");
                }
                build_frame(engine, t, pose, true)?
            }
            None => match &self.last_frame {
                Some(held) => MapFrame {
                    updated: false,
                    ..held.clone()
                },
                None => {
                    // Nothing was ever played (empty cursor): publish the
                    // untouched map at the final recorded pose.
                    let t = self
                        .cursor
                        .last()
                        .ok_or_else(|| MapError::Dataset("dataset contains no timesteps".to_string()))?;
                    build_frame(engine, t, pose_at(dataset, t)?, false)?
                }
            },
        };

        self.last_frame = Some(frame.clone());
        self.frames_published += 1;
        Ok(frame)
    }
}

fn pose_at<D: LaserDataset + ?Sized>(dataset: &D, t: Timestep) -> Result<Pose2> {
    dataset
        .pose(t)
        .ok_or_else(|| MapError::Dataset(format!("timestep {t} has no pose")))
}

fn build_frame(engine: &GridMapEngine, timestep: Timestep, pose: Pose2, updated: bool) -> Result<MapFrame> {
    let map = engine.probability_map()?;
    Ok(MapFrame {
        timestep,
        updated,
        info: *map.info(),
        data: map.quantize(),
        pose,
        transform: RobotTransform::from_pose(&pose),
    })
}
