/// Probability at or above which a cell counts as occupied.
pub const DEFAULT_OCCUPIED_THRESH: f64 = 0.65;
/// Probability at or below which a cell counts as free.
pub const DEFAULT_FREE_THRESH: f64 = 0.196;

/// Log-odds added to a cell that terminates a beam.
pub const DEFAULT_LOG_ODDS_OCCUPIED: f32 = 0.4;
/// Log-odds removed from every cell a beam passes through.
pub const DEFAULT_LOG_ODDS_FREE: f32 = 0.2;
pub const DEFAULT_LOG_ODDS_MIN: f32 = -5.0;
pub const DEFAULT_LOG_ODDS_MAX: f32 = 5.0;

/// Hard limit on the clamp bounds. Past ~36 the logistic rounds to exactly
/// 0 or 1 in f64.
pub const LOG_ODDS_LIMIT: f32 = 30.0;

/// Extra cells added around the trajectory on every side, beyond the sensor range.
pub const DEFAULT_PADDING_CELLS: u32 = 2;
