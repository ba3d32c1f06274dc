//! Log-odds occupancy grid.
//!
//! Each cell stores `l = ln(p / (1 - p))`. Observations are fused by adding a
//! fixed step per observation and clamping to `[l_min, l_max]`:
//!
//! ```text
//! free:     l <- clamp(l - d_free, l_min, l_max)
//! occupied: l <- clamp(l + d_occ,  l_min, l_max)
//! p = 1 / (1 + exp(-l))
//! ```
//!
//! The clamp keeps every probability strictly inside (0, 1).

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::grid::grid2d::out_of_bounds;
use crate::grid::{Grid2d, ProbabilityMap};
use crate::types::{
    DEFAULT_FREE_THRESH, DEFAULT_LOG_ODDS_FREE, DEFAULT_LOG_ODDS_MAX, DEFAULT_LOG_ODDS_MIN,
    DEFAULT_LOG_ODDS_OCCUPIED, DEFAULT_OCCUPIED_THRESH, LOG_ODDS_LIMIT, MapError, MapInfo, Result,
};

/// Step sizes and clamp range for log-odds accumulation.
///
/// Fixed for the lifetime of a grid. Use [`LogOddsParams::validate`] (or
/// [`LogOddsGrid::new`], which calls it) before accepting caller-supplied values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogOddsParams {
    /// Amount subtracted from a cell a beam passes through. Positive.
    pub d_free: f32,
    /// Amount added to the cell a beam ends in. Positive.
    pub d_occ: f32,
    pub l_min: f32,
    pub l_max: f32,
}

impl Default for LogOddsParams {
    fn default() -> Self {
        Self {
            d_free: DEFAULT_LOG_ODDS_FREE,
            d_occ: DEFAULT_LOG_ODDS_OCCUPIED,
            l_min: DEFAULT_LOG_ODDS_MIN,
            l_max: DEFAULT_LOG_ODDS_MAX,
        }
    }
}

impl LogOddsParams {
    pub fn validate(&self) -> Result<()> {
        let values = [self.d_free, self.d_occ, self.l_min, self.l_max];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MapError::InvalidConfig(
                "log-odds parameters must be finite".to_string(),
            ));
        }
        if self.d_free <= 0.0 || self.d_occ <= 0.0 {
            return Err(MapError::InvalidConfig(format!(
                "log-odds steps must be positive (d_free = {}, d_occ = {})",
                self.d_free, self.d_occ
            )));
        }
        if !(self.l_min < 0.0 && self.l_max > 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "log-odds clamp range [{}, {}] must contain 0",
                self.l_min, self.l_max
            )));
        }
        if self.l_min < -LOG_ODDS_LIMIT || self.l_max > LOG_ODDS_LIMIT {
            return Err(MapError::InvalidConfig(format!(
                "log-odds clamp range [{}, {}] exceeds +/-{}",
                self.l_min, self.l_max, LOG_ODDS_LIMIT
            )));
        }

        // One observation from "unknown" must not be enough to classify a cell.
        let occupied_level = logit(DEFAULT_OCCUPIED_THRESH) as f32;
        let free_level = logit(DEFAULT_FREE_THRESH) as f32;
        if self.d_occ >= occupied_level {
            return Err(MapError::InvalidConfig(format!(
                "d_occ = {} classifies a cell as occupied after a single hit (limit {})",
                self.d_occ, occupied_level
            )));
        }
        if -self.d_free <= free_level {
            return Err(MapError::InvalidConfig(format!(
                "d_free = {} classifies a cell as free after a single pass (limit {})",
                self.d_free, -free_level
            )));
        }
        Ok(())
    }

    #[inline]
    fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.l_min, self.l_max)
    }
}

/// `ln(p / (1 - p))`.
#[inline]
pub fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// `1 / (1 + exp(-l))`.
#[inline]
pub fn logistic(log_odds: f32) -> f64 {
    1.0 / (1.0 + (-(log_odds as f64)).exp())
}

/// Occupancy grid storing one log-odds value per cell. Every cell starts at
/// 0, i.e. probability 0.5.
#[derive(Debug, Clone)]
pub struct LogOddsGrid {
    cells: Grid2d<f32>,
    params: LogOddsParams,
}

impl LogOddsGrid {
    pub fn new(info: MapInfo, params: LogOddsParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            cells: Grid2d::filled(info, 0.0)?,
            params,
        })
    }

    pub fn info(&self) -> &MapInfo {
        self.cells.info()
    }

    pub fn params(&self) -> &LogOddsParams {
        &self.params
    }

    /// The underlying cells, for geometry queries and bounds checks.
    pub fn cells(&self) -> &Grid2d<f32> {
        &self.cells
    }

    pub fn apply_free(&mut self, cell: UVec2) -> Result<()> {
        self.add(cell, -self.params.d_free)
    }

    pub fn apply_occupied(&mut self, cell: UVec2) -> Result<()> {
        self.add(cell, self.params.d_occ)
    }

    #[inline]
    fn add(&mut self, cell: UVec2, delta: f32) -> Result<()> {
        let params = self.params;
        let info = *self.cells.info();
        let value = self
            .cells
            .get_mut(cell)
            .ok_or_else(|| out_of_bounds(cell, &info))?;
        *value = params.clamp(*value + delta);
        Ok(())
    }

    pub fn log_odds(&self, cell: UVec2) -> Option<f32> {
        self.cells.get(cell).copied()
    }

    pub fn probability(&self, cell: UVec2) -> Option<f64> {
        self.log_odds(cell).map(logistic)
    }

    /// Owned snapshot of every cell's probability. Later updates to this grid
    /// do not affect the returned map.
    pub fn probability_map(&self) -> ProbabilityMap {
        ProbabilityMap::new(self.cells.map(|l| logistic(*l)))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn test_grid() -> LogOddsGrid {
        LogOddsGrid::new(MapInfo::square(4, 0.1), LogOddsParams::default()).expect("grid should build")
    }

    #[test]
    fn starts_unknown() {
        let grid = test_grid();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(grid.probability(UVec2::new(x, y)), Some(0.5));
            }
        }
    }

    #[test]
    fn repeated_hits_increase_probability_until_clamped() {
        let mut grid = test_grid();
        let cell = UVec2::new(1, 2);
        let mut previous = grid.probability(cell).unwrap();

        for _ in 0..200 {
            let before = grid.log_odds(cell).unwrap();
            grid.apply_occupied(cell).unwrap();
            let p = grid.probability(cell).unwrap();

            if before < grid.params().l_max {
                assert!(p > previous, "{p} should exceed {previous}");
            } else {
                assert_eq!(p, previous);
            }
            assert!(p < 1.0);
            previous = p;
        }

        assert_relative_eq!(grid.log_odds(cell).unwrap(), DEFAULT_LOG_ODDS_MAX);
    }

    #[test]
    fn repeated_passes_decrease_probability_until_clamped() {
        let mut grid = test_grid();
        let cell = UVec2::new(3, 0);
        let mut previous = grid.probability(cell).unwrap();

        for _ in 0..200 {
            let before = grid.log_odds(cell).unwrap();
            grid.apply_free(cell).unwrap();
            let p = grid.probability(cell).unwrap();

            if before > grid.params().l_min {
                assert!(p < previous, "{p} should be below {previous}");
            } else {
                assert_eq!(p, previous);
            }
            assert!(p > 0.0);
            previous = p;
        }

        assert_relative_eq!(grid.log_odds(cell).unwrap(), DEFAULT_LOG_ODDS_MIN);
    }

    #[test]
    fn probabilities_stay_open_at_the_widest_allowed_range() {
        let params = LogOddsParams {
            l_min: -LOG_ODDS_LIMIT,
            l_max: LOG_ODDS_LIMIT,
            ..Default::default()
        };
        let mut grid = LogOddsGrid::new(MapInfo::square(2, 1.0), params).unwrap();
        let hit = UVec2::new(0, 0);
        let pass = UVec2::new(1, 1);
        for _ in 0..1000 {
            grid.apply_occupied(hit).unwrap();
            grid.apply_free(pass).unwrap();
        }

        let map = grid.probability_map();
        for p in map.values() {
            assert!(*p > 0.0 && *p < 1.0, "{p} escaped (0, 1)");
        }
    }

    #[test]
    fn out_of_bounds_updates_are_rejected() {
        let mut grid = test_grid();
        assert!(matches!(
            grid.apply_free(UVec2::new(4, 0)),
            Err(MapError::OutOfBounds(_))
        ));
        assert!(matches!(
            grid.apply_occupied(UVec2::new(0, 4)),
            Err(MapError::OutOfBounds(_))
        ));
        assert!(grid.probability(UVec2::new(4, 4)).is_none());
    }

    #[test]
    fn snapshot_is_independent_of_later_updates() {
        let mut grid = test_grid();
        let cell = UVec2::new(2, 2);
        let snapshot = grid.probability_map();

        grid.apply_occupied(cell).unwrap();

        assert_eq!(snapshot.get(cell), Some(0.5));
        assert!(grid.probability(cell).unwrap() > 0.5);
    }

    #[test]
    fn one_observation_never_classifies_a_cell() {
        let mut grid = test_grid();
        let hit = UVec2::new(0, 0);
        let pass = UVec2::new(1, 0);
        grid.apply_occupied(hit).unwrap();
        grid.apply_free(pass).unwrap();

        assert!(grid.probability(hit).unwrap() < DEFAULT_OCCUPIED_THRESH);
        assert!(grid.probability(pass).unwrap() > DEFAULT_FREE_THRESH);
    }

    #[test]
    fn validate_rejects_bad_params() {
        let bad = [
            LogOddsParams {
                d_free: 0.0,
                ..Default::default()
            },
            LogOddsParams {
                d_occ: -0.1,
                ..Default::default()
            },
            LogOddsParams {
                l_min: 1.0,
                ..Default::default()
            },
            LogOddsParams {
                l_max: 100.0,
                ..Default::default()
            },
            LogOddsParams {
                d_occ: 2.0,
                ..Default::default()
            },
            LogOddsParams {
                d_free: 3.0,
                ..Default::default()
            },
            LogOddsParams {
                l_max: f32::NAN,
                ..Default::default()
            },
        ];
        for params in bad {
            assert!(
                matches!(params.validate(), Err(MapError::InvalidConfig(_))),
                "{params:?} should be rejected"
            );
        }
        assert!(LogOddsParams::default().validate().is_ok());
    }
}
