use egui::{Pos2, Rect, Vec2};
use image::RgbaImage;

use super::CommandResult;
use crate::color::Color;
use crate::config::{FillStyle, ToolSettings};
use crate::palette::ColorPalette;
use crate::selection::Flip;
use crate::surface::{ImageData, Surface, WHITE};

/// Colours and widths resolved from the palette and settings at commit time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub fill_style: FillStyle,
    pub line_width: f32,
    pub fill: Color,
    pub outline: Color,
}

impl ShapeStyle {
    pub fn resolve(settings: &ToolSettings, palette: &ColorPalette) -> Self {
        Self {
            fill_style: settings.fill_style,
            line_width: settings.line_width,
            fill: palette.primary(),
            outline: palette.secondary(),
        }
    }
}

/// A rectangle or ellipse dragged from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeCommand {
    pub start: Pos2,
    pub end: Pos2,
    /// Square / circle mode: both sides take the shorter drag extent.
    pub is_even: bool,
    pub style: ShapeStyle,
}

impl ShapeCommand {
    pub fn bounds(&self) -> Rect {
        let mut extent = self.end - self.start;
        if self.is_even {
            let side = extent.x.abs().min(extent.y.abs());
            extent = Vec2::new(side.copysign(extent.x), side.copysign(extent.y));
        }
        Rect::from_two_pos(self.start, self.start + extent)
    }

    pub fn draw_rectangle(&self, surface: &mut Surface) {
        let rect = self.bounds();
        let style = &self.style;
        if style.fill_style.fills() {
            surface.fill_rect(rect, style.fill.into());
        }
        if style.fill_style.outlines() {
            surface.stroke_rect(rect, style.line_width, style.outline.into());
        }
    }

    pub fn draw_ellipse(&self, surface: &mut Surface) {
        let rect = self.bounds();
        let style = &self.style;
        if style.fill_style.fills() {
            surface.fill_ellipse(rect, style.fill.into());
        }
        if style.fill_style.outlines() {
            surface.stroke_ellipse(rect, style.line_width, style.outline.into());
        }
    }
}

/// Freehand pencil stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeCommand {
    pub points: Vec<Pos2>,
    pub width: f32,
    pub color: Color,
}

impl StrokeCommand {
    pub fn draw(&self, surface: &mut Surface) {
        surface.stroke_path(&self.points, self.width, self.color.into());
    }
}

/// Square eraser dragged along `points`, painting the paper colour.
#[derive(Debug, Clone, PartialEq)]
pub struct EraseCommand {
    pub points: Vec<Pos2>,
    pub size: f32,
}

impl EraseCommand {
    pub fn draw(&self, surface: &mut Surface) {
        let Some(first) = self.points.first() else {
            return;
        };
        surface.stamp_square(*first, self.size, WHITE);
        // Stamp at a quarter of the eraser size so quick drags leave no gaps.
        let step = (self.size / 4.0).max(1.0);
        for pair in self.points.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let steps = (from.distance(to) / step).ceil().max(1.0) as u32;
            for i in 1..=steps {
                surface.stamp_square(from.lerp(to, i as f32 / steps as f32), self.size, WHITE);
            }
        }
    }
}

/// Polyline with optional round junctions at every point.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCommand {
    pub points: Vec<Pos2>,
    pub width: f32,
    pub color: Color,
    pub junction_diameter: Option<f32>,
}

impl LineCommand {
    pub fn draw(&self, surface: &mut Surface) {
        surface.stroke_path(&self.points, self.width, self.color.into());
        if let Some(diameter) = self.junction_diameter {
            for point in &self.points {
                let rect = Rect::from_center_size(*point, Vec2::splat(diameter));
                surface.fill_ellipse(rect, self.color.into());
            }
        }
    }
}

/// Result of a paint-bucket fill, blitted over the whole canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintCommand {
    pub image: RgbaImage,
}

impl PaintCommand {
    pub fn draw(&self, surface: &mut Surface) {
        surface.put_image_data(&self.image, 0, 0);
    }
}

/// Moves, resizes and/or mirrors the pixels captured by a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionCommand {
    /// Where the pixels were taken from.
    pub source: Rect,
    /// Where they end up.
    pub dest: Rect,
    pub flip: Flip,
    pub content: ImageData,
}

impl SelectionCommand {
    /// Decoding happens before anything is drawn, so a bad snapshot leaves
    /// `surface` exactly as it was.
    pub async fn apply(&self, surface: &mut Surface) -> CommandResult {
        let bitmap = self.content.decode().await?;
        surface.fill_rect(self.source, WHITE);
        surface.draw_image(&bitmap, self.dest, self.flip);
        Ok(())
    }
}

/// Represents one committed drawing action that can be replayed onto a canvas.
///
/// A command owns copies of everything it draws with, so replaying it later
/// never depends on the tool that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Rectangle(ShapeCommand),
    Ellipse(ShapeCommand),
    Stroke(StrokeCommand),
    Erase(EraseCommand),
    Line(LineCommand),
    Paint(PaintCommand),
    Selection(SelectionCommand),
    /// Grow or crop the canvas, keeping existing pixels at the top-left and
    /// filling new area with white.
    ResizeCanvas { width: u32, height: u32 },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Rectangle(_) => "Rectangle",
            Command::Ellipse(_) => "Ellipse",
            Command::Stroke(_) => "Stroke",
            Command::Erase(_) => "Erase",
            Command::Line(_) => "Line",
            Command::Paint(_) => "Paint",
            Command::Selection(_) => "Selection",
            Command::ResizeCanvas { .. } => "ResizeCanvas",
        }
    }

    /// Draw this command onto `surface`.
    ///
    /// Applying the same command to the same starting pixels always yields the
    /// same result.
    pub async fn apply(&self, surface: &mut Surface) -> CommandResult {
        match self {
            Command::Rectangle(shape) => shape.draw_rectangle(surface),
            Command::Ellipse(shape) => shape.draw_ellipse(surface),
            Command::Stroke(stroke) => stroke.draw(surface),
            Command::Erase(erase) => erase.draw(surface),
            Command::Line(line) => line.draw(surface),
            Command::Paint(paint) => paint.draw(surface),
            Command::Selection(selection) => selection.apply(surface).await?,
            Command::ResizeCanvas { width, height } => {
                let previous = surface.get_image_data();
                surface.resize(*width, *height);
                surface.fill(WHITE);
                surface.put_image_data(&previous, 0, 0);
            }
        }
        Ok(())
    }
}
