pub mod ros2;

pub use ros2::{MapMode, RosMapMetadata, save_ros2_map};
