pub mod grid2d;
pub mod log_odds;
pub mod probability;
pub mod transform;

pub use grid2d::Grid2d;
pub use log_odds::{LogOddsGrid, LogOddsParams, logistic, logit};
pub use probability::{CellCounts, CellState, ProbabilityMap};
pub use transform::CoordinateTransform;
