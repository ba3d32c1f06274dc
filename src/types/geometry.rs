//! Geometric types shared by the grid, the tracer and the engine.

use glam::DVec2;

/// Robot pose in world coordinates (meters, radians).
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Pose2 {
    pub position: DVec2,
    pub yaw: f64,
}

impl Pose2 {
    pub fn new(position: DVec2, yaw: f64) -> Self {
        Self { position, yaw }
    }

    pub fn from_xy_yaw(x: f64, y: f64, yaw: f64) -> Self {
        Self::new(DVec2::new(x, y), yaw)
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.yaw.is_finite()
    }

    /// World-frame point reached by travelling `range` meters along `bearing`,
    /// measured from the robot heading.
    #[inline]
    pub fn project(&self, bearing: f64, range: f64) -> DVec2 {
        let (sin, cos) = (self.yaw + bearing).sin_cos();
        self.position + DVec2::new(cos, sin) * range
    }
}

/// Bounding box of a set of world points, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// Bounds that contain nothing. Expanding them by a point yields a
    /// zero-size box around that point.
    pub fn empty() -> Self {
        Self {
            min: DVec2::splat(f64::INFINITY),
            max: DVec2::splat(f64::NEG_INFINITY),
        }
    }

    /// Extent along each axis; zero for empty or single-point bounds.
    pub fn size(&self) -> DVec2 {
        (self.max - self.min).max(DVec2::ZERO)
    }

    /// Expand this bounds to include the point (in place).
    pub fn expand_to_include(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }
}
