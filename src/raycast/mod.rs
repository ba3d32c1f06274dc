pub mod tracer;
pub(crate) mod utils;

pub use tracer::{BeamTrace, RayEnd, RayTracer};
