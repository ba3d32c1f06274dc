//! Laser range scans.

/// How a single beam ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeamReturn {
    /// The beam hit an obstacle at the reported range.
    Hit,
    /// No obstacle within the sensor's maximum range.
    NoReturn,
    /// Zero or negative range. The beam carries no information.
    Invalid,
}

/// One beam of a scan, relative to the robot heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beam {
    pub bearing: f64,
    /// Distance in meters. Capped to the scan's `max_range` for `NoReturn` beams.
    pub range: f64,
    pub ret: BeamReturn,
}

#[derive(Debug, Clone, PartialEq)]
enum Bearings {
    Uniform { angle_min: f64, increment: f64 },
    Explicit(Vec<f64>),
}

/// A single laser scan.
///
/// Any range that is non-finite or at least `max_range` is the "no return"
/// sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeScan {
    bearings: Bearings,
    ranges: Vec<f64>,
    max_range: f64,
}

impl RangeScan {
    /// Scan whose beam `k` points at `angle_min + k * angle_increment`.
    pub fn uniform(angle_min: f64, angle_increment: f64, max_range: f64, ranges: Vec<f64>) -> Self {
        Self {
            bearings: Bearings::Uniform {
                angle_min,
                increment: angle_increment,
            },
            ranges,
            max_range,
        }
    }

    /// Scan from explicit `(bearing, range)` pairs.
    pub fn from_pairs(max_range: f64, pairs: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let (bearings, ranges) = pairs.into_iter().unzip();
        Self {
            bearings: Bearings::Explicit(bearings),
            ranges,
            max_range,
        }
    }

    pub fn max_range(&self) -> f64 {
        self.max_range
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[f64] {
        &self.ranges
    }

    pub fn bearing(&self, index: usize) -> Option<f64> {
        if index >= self.ranges.len() {
            return None;
        }
        match &self.bearings {
            Bearings::Uniform {
                angle_min,
                increment,
            } => Some(angle_min + index as f64 * increment),
            Bearings::Explicit(bearings) => bearings.get(index).copied(),
        }
    }

    pub fn beam(&self, index: usize) -> Option<Beam> {
        let bearing = self.bearing(index)?;
        let range = *self.ranges.get(index)?;
        Some(self.classify(bearing, range))
    }

    pub fn beams(&self) -> impl Iterator<Item = Beam> + '_ {
        (0..self.ranges.len()).filter_map(|i| self.beam(i))
    }

    fn classify(&self, bearing: f64, range: f64) -> Beam {
        if !range.is_finite() || range >= self.max_range {
            Beam {
                bearing,
                range: self.max_range,
                ret: BeamReturn::NoReturn,
            }
        } else if range <= 0.0 {
            Beam {
                bearing,
                range,
                ret: BeamReturn::Invalid,
            }
        } else {
            Beam {
                bearing,
                range,
                ret: BeamReturn::Hit,
            }
        }
    }
}
