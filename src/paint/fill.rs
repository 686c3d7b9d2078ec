use image::RgbaImage;
use log::debug;

use super::buffer::{PixelBuffer, pack, unpack};

const OPAQUE_WHITE: [u8; 4] = [255, 255, 255, 255];

/// `1.0` for identical colours, falling towards `0.0` as channels diverge.
pub fn color_similarity(c1: [u8; 4], c2: [u8; 4]) -> f64 {
    let difference: u32 = c1
        .iter()
        .zip(c2.iter())
        .map(|(a, b)| u32::from(a.abs_diff(*b)))
        .sum();
    1.0 - f64::from(difference) / (4.0 * 255.0)
}

/// Converts a user tolerance in percent into the similarity threshold used
/// by [`match_color_tolerance`].
pub fn adjusted_tolerance(requested: f64) -> f64 {
    1.0 - requested.clamp(0.0, 100.0) / 100.0
}

/// `tolerance` is the adjusted threshold, see [`adjusted_tolerance`].
pub fn match_color_tolerance(pixel: [u8; 4], target: [u8; 4], tolerance: f64) -> bool {
    let similarity = color_similarity(pixel, target);
    similarity * similarity >= tolerance
}

/// Unset pixels are matched as if they were opaque white paper.
fn matching_color(value: u32) -> [u8; 4] {
    let rgba = unpack(value);
    if rgba[3] == 0 { OPAQUE_WHITE } else { rgba }
}

struct Fill<'a> {
    buffer: &'a mut PixelBuffer,
    visited: Vec<u8>,
    target: [u8; 4],
    tolerance: f64,
    color: u32,
}

impl Fill<'_> {
    fn matches(&self, x: u32, y: u32) -> bool {
        let index = self.buffer.index(x, y);
        self.visited[index] == 0
            && match_color_tolerance(matching_color(self.buffer.get(x, y)), self.target, self.tolerance)
    }

    fn paint(&mut self, x: u32, y: u32) {
        let index = self.buffer.index(x, y);
        self.visited[index] = 1;
        self.buffer.set(x, y, self.color);
    }

    fn can_move_left(&self, x: u32) -> bool {
        x > 0
    }

    fn can_move_right(&self, x: u32) -> bool {
        x + 1 < self.buffer.width()
    }

    fn can_move_up(&self, y: u32) -> bool {
        y > 0
    }

    fn can_move_down(&self, y: u32) -> bool {
        y < self.buffer.height()
    }

    /// Scanline stack fill: walk up the seed column to the top of its run,
    /// then paint downwards, queueing the neighbouring columns each time a
    /// new run opens beside the current one.
    fn run(&mut self, seed_x: u32, seed_y: u32) {
        let mut stack = vec![(seed_x, seed_y)];

        while let Some((x, mut y)) = stack.pop() {
            while self.can_move_up(y) && self.matches(x, y - 1) {
                y -= 1;
            }

            let mut span_left = false;
            let mut span_right = false;

            while self.can_move_down(y) && self.matches(x, y) {
                self.paint(x, y);

                if self.can_move_left(x) {
                    if self.matches(x - 1, y) {
                        if !span_left {
                            stack.push((x - 1, y));
                            span_left = true;
                        }
                    } else {
                        span_left = false;
                    }
                }

                if self.can_move_right(x) {
                    if self.matches(x + 1, y) {
                        if !span_right {
                            stack.push((x + 1, y));
                            span_right = true;
                        }
                    } else {
                        span_right = false;
                    }
                }

                y += 1;
            }
        }
    }
}

/// Recolour every pixel 4-connected to `(x, y)` through pixels matching the
/// seed colour. Seeds outside the buffer leave it untouched.
pub fn flood_fill(buffer: &mut PixelBuffer, x: u32, y: u32, color: [u8; 4], tolerance: f64) {
    if !buffer.contains(x, y) {
        debug!("flood fill seed ({x}, {y}) outside the canvas");
        return;
    }
    let target = matching_color(buffer.get(x, y));
    let visited = vec![0; buffer.pixels().len()];
    let mut fill = Fill {
        buffer,
        visited,
        target,
        tolerance,
        color: pack(color),
    };
    fill.run(x, y);
}

/// Recolour every pixel matching the seed colour, wherever it is.
pub fn global_fill(buffer: &mut PixelBuffer, x: u32, y: u32, color: [u8; 4], tolerance: f64) {
    if !buffer.contains(x, y) {
        debug!("global fill seed ({x}, {y}) outside the canvas");
        return;
    }
    let target = matching_color(buffer.get(x, y));
    let color = pack(color);
    for pixel in buffer.pixels_mut() {
        if match_color_tolerance(matching_color(*pixel), target, tolerance) {
            *pixel = color;
        }
    }
}

/// Run a paint-bucket fill over `image` and return the recoloured raster.
///
/// `tolerance` is the user-facing percentage (0 matches identical colours only).
pub fn paint(
    image: &RgbaImage,
    x: u32,
    y: u32,
    color: [u8; 4],
    tolerance: f64,
    contiguous: bool,
) -> RgbaImage {
    let mut buffer = PixelBuffer::from_image(image);
    let threshold = adjusted_tolerance(tolerance);
    if contiguous {
        flood_fill(&mut buffer, x, y, color, threshold);
    } else {
        global_fill(&mut buffer, x, y, color, threshold);
    }
    buffer.into_image()
}
