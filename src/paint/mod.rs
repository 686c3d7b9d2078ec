//! Paint-bucket fills over packed pixel buffers.
//!
//! Both fills work on a [`PixelBuffer`], a packed `u32`-per-pixel copy of
//! the canvas, and hand back a new raster. Callers wrap that raster in a
//! [`Command::Paint`](crate::command::Command::Paint) so a fill is undone in
//! one step.

mod buffer;
mod fill;

pub use buffer::{PixelBuffer, pack, unpack};
pub use fill::{
    adjusted_tolerance, color_similarity, flood_fill, global_fill, match_color_tolerance, paint,
};
