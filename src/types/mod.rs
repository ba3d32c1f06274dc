pub mod constants;
pub mod error;
pub mod geometry;
pub mod info;
pub mod scan;

pub use constants::*;
pub use error::{MapError, Result};
pub use geometry::{Bounds, Pose2};
pub use info::MapInfo;
pub use scan::{Beam, BeamReturn, RangeScan};
