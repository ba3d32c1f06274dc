use image::{GrayImage, Luma};

use crate::grid::probability::classify;
use crate::grid::{CellState, ProbabilityMap};

/// Convert a probability map to a grayscale image with pixel darkness
/// proportional to occupancy: `p = 0` is white, `p = 1` black, unknown mid-gray.
///
/// The output image is oriented like typical map images: the grid's \(y=0\) row
/// (lowest in map coordinates) is written to the **bottom** of the image.
pub fn probability_map_to_image(map: &ProbabilityMap) -> GrayImage {
    render(map, probability_to_gray)
}

/// Three-level rendering against the occupancy thresholds, using the usual
/// map palette: free 254, occupied 0, unknown 205.
pub fn probability_map_to_trinary_image(map: &ProbabilityMap) -> GrayImage {
    render(map, |p| cell_state_to_gray(classify(p)))
}

fn render(map: &ProbabilityMap, to_gray: impl Fn(f64) -> u8) -> GrayImage {
    let width = map.width();
    let height = map.height();
    let values = map.values();
    let mut img = GrayImage::new(width, height);

    for y_img in 0..height {
        // Image rows run top-down, grid rows bottom-up.
        let y_grid = height - 1 - y_img;
        let row = (y_grid as usize) * (width as usize);
        for x in 0..width {
            let p = values[row + x as usize];
            img.put_pixel(x, y_img, Luma([to_gray(p)]));
        }
    }

    img
}

pub(crate) fn probability_to_gray(p: f64) -> u8 {
    ((1.0 - p.clamp(0.0, 1.0)) * 255.0).round() as u8
}

pub(crate) fn cell_state_to_gray(state: CellState) -> u8 {
    match state {
        CellState::Free => 254,
        CellState::Unknown => 205,
        CellState::Occupied => 0,
    }
}
