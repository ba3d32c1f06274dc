//! Save a probability map as a ROS map (`.yaml` metadata plus a PNG image).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::grid::ProbabilityMap;
use crate::types::{DEFAULT_FREE_THRESH, DEFAULT_OCCUPIED_THRESH, MapError, Result};
use crate::visualization::{probability_map_to_image, probability_map_to_trinary_image};

/// Map metadata as read by ROS map servers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosMapMetadata {
    pub image: String,
    pub resolution: f64,
    pub origin: [f64; 3],
    pub negate: i32,
    pub occupied_thresh: f64,
    pub free_thresh: f64,
    pub mode: MapMode,
}

/// How pixel values encode occupancy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapMode {
    /// Free, occupied or unknown only.
    Trinary,
    /// Pixel darkness proportional to occupancy probability.
    Scale,
}

/// Write `map` next to `yaml_path`: the image goes to the same path with a
/// `.png` extension and is referenced relative to the YAML file.
///
/// Returns the written metadata.
pub fn save_ros2_map(
    map: &ProbabilityMap,
    yaml_path: impl AsRef<Path>,
    mode: MapMode,
) -> Result<RosMapMetadata> {
    let yaml_path = yaml_path.as_ref();
    let image_path = image_path_for(yaml_path)?;
    let image_name = image_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            MapError::InvalidConfig(format!("no file name in {}", image_path.display()))
        })?;

    let image = match mode {
        MapMode::Trinary => probability_map_to_trinary_image(map),
        MapMode::Scale => probability_map_to_image(map),
    };
    image.save(&image_path)?;

    let info = map.info();
    let metadata = RosMapMetadata {
        image: image_name,
        resolution: info.resolution,
        origin: [info.origin.x, info.origin.y, 0.0],
        negate: 0,
        occupied_thresh: DEFAULT_OCCUPIED_THRESH,
        free_thresh: DEFAULT_FREE_THRESH,
        mode,
    };
    std::fs::write(yaml_path, serde_yaml::to_string(&metadata)?)?;

    log::info!(
        "saved {}x{} map to {}",
        info.width,
        info.height,
        yaml_path.display()
    );
    Ok(metadata)
}

fn image_path_for(yaml_path: &Path) -> Result<PathBuf> {
    if yaml_path.file_stem().is_none() {
        return Err(MapError::InvalidConfig(format!(
            "map path {} has no file name",
            yaml_path.display()
        )));
    }
    let is_png = yaml_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        return Err(MapError::InvalidConfig(format!(
            "map metadata path {} would overwrite its own image",
            yaml_path.display()
        )));
    }
    Ok(yaml_path.with_extension("png"))
}
