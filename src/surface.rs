//! Surface - the RGBA raster every tool and command draws on.
//!
//! The editor keeps two of them: the committed ("base") canvas and a preview
//! overlay that tools redraw freely while a gesture is in progress.

use egui::{Pos2, Rect};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::command::CommandError;
use crate::geometry::distance_between_point_and_segment;
use crate::selection::Flip;

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Integer pixel span `[start, end)` covered by `[min, max]`, clipped to `limit`.
fn pixel_span(min: f32, max: f32, limit: u32) -> std::ops::Range<u32> {
    let start = min.min(max).round().max(0.0) as u32;
    let end = (min.max(max).round().max(0.0) as u32).min(limit);
    start.min(end)..end
}

fn pixel_center(x: u32, y: u32) -> Pos2 {
    Pos2::new(x as f32 + 0.5, y as f32 + 0.5)
}

fn inside_ellipse(point: Pos2, center: Pos2, rx: f32, ry: f32) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let nx = (point.x - center.x) / rx;
    let ny = (point.y - center.y) / ry;
    nx * nx + ny * ny <= 1.0
}

/// Source-over compositing of `src` onto `dst`, straight alpha.
fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = f32::from(src[3]) / 255.0;
    if sa <= 0.0 {
        return;
    }
    if sa >= 1.0 {
        *dst = src;
        return;
    }
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let value = (f32::from(src[c]) * sa + f32::from(dst[c]) * da * (1.0 - sa)) / out_a;
        dst[c] = value.round() as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, TRANSPARENT),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> [u32; 2] {
        [self.width(), self.height()]
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, egui::vec2(self.width() as f32, self.height() as f32))
    }

    /// Whether `pos` falls on a pixel of this surface.
    pub fn contains(&self, pos: Pos2) -> bool {
        pos.x >= 0.0 && pos.y >= 0.0 && pos.x < self.width() as f32 && pos.y < self.height() as f32
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn clear(&mut self) {
        self.fill(TRANSPARENT);
    }

    pub fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// Resizing drops the content, like resetting a canvas element's width.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::from_pixel(width, height, TRANSPARENT);
    }

    pub fn get_image_data(&self) -> RgbaImage {
        self.image.clone()
    }

    /// Copy of the pixels under `rect`, clipped to the surface.
    pub fn get_region(&self, rect: Rect) -> RgbaImage {
        let xs = pixel_span(rect.min.x, rect.max.x, self.width());
        let ys = pixel_span(rect.min.y, rect.max.y, self.height());
        image::imageops::crop_imm(&self.image, xs.start, ys.start, xs.len() as u32, ys.len() as u32)
            .to_image()
    }

    /// Overwrite pixels with `image` placed at `(x, y)`, without blending.
    pub fn put_image_data(&mut self, image: &RgbaImage, x: i64, y: i64) {
        image::imageops::replace(&mut self.image, image, x, y);
    }

    fn blend_at(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        if let Some(pixel) = self.image.get_pixel_mut_checked(x, y) {
            blend(pixel, color);
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        for y in pixel_span(rect.min.y, rect.max.y, self.height()) {
            for x in pixel_span(rect.min.x, rect.max.x, self.width()) {
                self.blend_at(x, y, color);
            }
        }
    }

    /// Outline drawn on the inside of `rect`.
    pub fn stroke_rect(&mut self, rect: Rect, width: f32, color: Rgba<u8>) {
        let inner = rect.shrink(width);
        if inner.width() <= 0.0 || inner.height() <= 0.0 {
            self.fill_rect(rect, color);
            return;
        }
        for y in pixel_span(rect.min.y, rect.max.y, self.height()) {
            for x in pixel_span(rect.min.x, rect.max.x, self.width()) {
                if !inner.contains(pixel_center(x, y)) {
                    self.blend_at(x, y, color);
                }
            }
        }
    }

    /// Ellipse inscribed in `rect`.
    pub fn fill_ellipse(&mut self, rect: Rect, color: Rgba<u8>) {
        let center = rect.center();
        let (rx, ry) = (rect.width() / 2.0, rect.height() / 2.0);
        for y in pixel_span(rect.min.y, rect.max.y, self.height()) {
            for x in pixel_span(rect.min.x, rect.max.x, self.width()) {
                if inside_ellipse(pixel_center(x, y), center, rx, ry) {
                    self.blend_at(x, y, color);
                }
            }
        }
    }

    /// Elliptical outline inscribed in `rect`, `width` pixels thick inwards.
    pub fn stroke_ellipse(&mut self, rect: Rect, width: f32, color: Rgba<u8>) {
        let center = rect.center();
        let (rx, ry) = (rect.width() / 2.0, rect.height() / 2.0);
        let (irx, iry) = (rx - width, ry - width);
        for y in pixel_span(rect.min.y, rect.max.y, self.height()) {
            for x in pixel_span(rect.min.x, rect.max.x, self.width()) {
                let p = pixel_center(x, y);
                if inside_ellipse(p, center, rx, ry) && !inside_ellipse(p, center, irx, iry) {
                    self.blend_at(x, y, color);
                }
            }
        }
    }

    /// Round-capped polyline. Each pixel is blended at most once per call,
    /// so translucent strokes keep a uniform tone at the joints.
    pub fn stroke_path(&mut self, points: &[Pos2], width: f32, color: Rgba<u8>) {
        let Some(first) = points.first() else {
            return;
        };
        let radius = (width / 2.0).max(0.5);
        let bbox = points
            .iter()
            .fold(Rect::from_min_max(*first, *first), |rect, p| rect.union(Rect::from_min_max(*p, *p)))
            .expand(radius);
        let xs = pixel_span(bbox.min.x.floor(), bbox.max.x.ceil(), self.width());
        let ys = pixel_span(bbox.min.y.floor(), bbox.max.y.ceil(), self.height());

        let segments: Vec<(Pos2, Pos2)> = if points.len() == 1 {
            vec![(*first, *first)]
        } else {
            points.windows(2).map(|pair| (pair[0], pair[1])).collect()
        };

        for y in ys {
            for x in xs.clone() {
                let center = pixel_center(x, y);
                let covered = segments
                    .iter()
                    .any(|(a, b)| distance_between_point_and_segment(center, *a, *b) <= radius);
                if covered {
                    self.blend_at(x, y, color);
                }
            }
        }
    }

    /// Square of side `size` centred on `center`.
    pub fn stamp_square(&mut self, center: Pos2, size: f32, color: Rgba<u8>) {
        self.fill_rect(Rect::from_center_size(center, egui::vec2(size, size)), color);
    }

    /// Draw `source` scaled into `dest` with nearest-neighbour sampling,
    /// mirrored on the axes requested by `flip`.
    pub fn draw_image(&mut self, source: &RgbaImage, dest: Rect, flip: Flip) {
        let (src_w, src_h) = source.dimensions();
        if src_w == 0 || src_h == 0 || dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }
        for y in pixel_span(dest.min.y, dest.max.y, self.height()) {
            for x in pixel_span(dest.min.x, dest.max.x, self.width()) {
                let center = pixel_center(x, y);
                let u = ((center.x - dest.min.x) / dest.width() * src_w as f32) as u32;
                let v = ((center.y - dest.min.y) / dest.height() * src_h as f32) as u32;
                let mut u = u.min(src_w - 1);
                let mut v = v.min(src_h - 1);
                if flip.vertical {
                    u = src_w - 1 - u;
                }
                if flip.horizontal {
                    v = src_h - 1 - v;
                }
                let color = *source.get_pixel(u, v);
                self.blend_at(x, y, color);
            }
        }
    }
}

/// Raw RGBA pixels captured from a surface, kept undecoded inside
/// selection commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl ImageData {
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// Turn the captured bytes back into a bitmap.
    pub async fn decode(&self) -> Result<RgbaImage, CommandError> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or(
            CommandError::MalformedSnapshot {
                width: self.width,
                height: self.height,
                expected: self.expected_len(),
                actual: self.data.len(),
            },
        )
    }
}

impl From<RgbaImage> for ImageData {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn count(surface: &Surface, color: Rgba<u8>) -> usize {
        surface.image().pixels().filter(|p| **p == color).count()
    }

    #[test]
    fn test_fill_rect_covers_exact_pixels() {
        let mut surface = Surface::new(10, 10);
        surface.fill_rect(Rect::from_min_max(pos2(2.0, 2.0), pos2(5.0, 4.0)), RED);
        assert_eq!(count(&surface, RED), 6);
        assert_eq!(surface.pixel(2, 2), Some(RED.0));
        assert_eq!(surface.pixel(5, 2), Some(TRANSPARENT.0));
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut surface = Surface::new(4, 4);
        surface.fill_rect(Rect::from_min_max(pos2(-5.0, -5.0), pos2(50.0, 2.0)), RED);
        assert_eq!(count(&surface, RED), 8);
    }

    #[test]
    fn test_stroke_rect_leaves_inside_untouched() {
        let mut surface = Surface::new(10, 10);
        surface.stroke_rect(Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 10.0)), 1.0, RED);
        assert_eq!(count(&surface, RED), 36);
        assert_eq!(surface.pixel(5, 5), Some(TRANSPARENT.0));
    }

    #[test]
    fn test_region_round_trip() {
        let mut surface = Surface::new(8, 8);
        surface.fill_rect(Rect::from_min_max(pos2(2.0, 2.0), pos2(4.0, 4.0)), RED);
        let region = surface.get_region(Rect::from_min_max(pos2(2.0, 2.0), pos2(6.0, 6.0)));
        assert_eq!(region.dimensions(), (4, 4));

        let mut other = Surface::new(8, 8);
        other.put_image_data(&region, 2, 2);
        assert_eq!(other.pixel(3, 3), Some(RED.0));
        assert_eq!(other.pixel(5, 5), Some(TRANSPARENT.0));
    }

    #[test]
    fn test_draw_image_flips() {
        let mut source = RgbaImage::from_pixel(2, 1, WHITE);
        source.put_pixel(0, 0, RED);
        let mut surface = Surface::new(2, 1);
        surface.draw_image(
            &source,
            surface.bounds(),
            Flip {
                vertical: true,
                horizontal: false,
            },
        );
        assert_eq!(surface.pixel(0, 0), Some(WHITE.0));
        assert_eq!(surface.pixel(1, 0), Some(RED.0));
    }

    #[test]
    fn test_malformed_snapshot_fails_to_decode() {
        let data = ImageData {
            width: 4,
            height: 4,
            data: vec![0; 7],
        };
        let result = futures::executor::block_on(data.decode());
        assert!(matches!(result, Err(CommandError::MalformedSnapshot { actual: 7, .. })));
    }
}
