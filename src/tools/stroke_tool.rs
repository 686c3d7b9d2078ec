use egui::{Pos2, Rect, Vec2};
use image::Rgba;

use super::{GestureState, Tool, ToolContext};
use crate::command::{Command, EraseCommand, StrokeCommand};
use crate::input::{Key, Modifiers, PointerButton};

/// The part of a freehand tool that differs between pencil and eraser.
pub trait StrokeKind {
    const NAME: &'static str;

    /// Paint one new segment of the in-progress path on the preview.
    fn draw_segment(from: Pos2, to: Pos2, ctx: &mut ToolContext<'_>);

    fn into_command(points: Vec<Pos2>, ctx: &ToolContext<'_>) -> Command;

    /// Outline shown under the pointer while no button is held.
    fn draw_cursor(_pos: Pos2, _ctx: &mut ToolContext<'_>) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PencilStroke;

impl StrokeKind for PencilStroke {
    const NAME: &'static str = "Pencil";

    fn draw_segment(from: Pos2, to: Pos2, ctx: &mut ToolContext<'_>) {
        let color = ctx.palette.primary();
        ctx.preview.stroke_path(&[from, to], ctx.settings.line_width, color.into());
    }

    fn into_command(points: Vec<Pos2>, ctx: &ToolContext<'_>) -> Command {
        Command::Stroke(StrokeCommand {
            points,
            width: ctx.settings.line_width,
            color: ctx.palette.primary(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EraserStroke;

impl StrokeKind for EraserStroke {
    const NAME: &'static str = "Eraser";

    fn draw_segment(from: Pos2, to: Pos2, ctx: &mut ToolContext<'_>) {
        let segment = EraseCommand {
            points: vec![from, to],
            size: ctx.settings.eraser_size,
        };
        segment.draw(ctx.preview);
    }

    fn into_command(points: Vec<Pos2>, ctx: &ToolContext<'_>) -> Command {
        Command::Erase(EraseCommand {
            points,
            size: ctx.settings.eraser_size,
        })
    }

    fn draw_cursor(pos: Pos2, ctx: &mut ToolContext<'_>) {
        let size = ctx.settings.eraser_size;
        let rect = Rect::from_center_size(pos, Vec2::splat(size));
        ctx.preview.clear();
        ctx.preview.stroke_rect(rect, 1.0, Rgba([0, 0, 0, 255]));
    }
}

/// Freehand drawing: the preview grows one segment per pointer move and the
/// whole path is committed on release.
#[derive(Debug, Clone, Default)]
pub struct StrokeTool<K> {
    gesture: GestureState,
    _kind: std::marker::PhantomData<K>,
}

pub type PencilTool = StrokeTool<PencilStroke>;
pub type EraserTool = StrokeTool<EraserStroke>;

impl<K: StrokeKind> StrokeTool<K> {
    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }
}

impl<K: StrokeKind> Tool for StrokeTool<K> {
    fn name(&self) -> &'static str {
        K::NAME
    }

    fn on_pointer_down(
        &mut self,
        button: PointerButton,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        if button != PointerButton::Primary {
            return None;
        }
        self.gesture.begin(pos);
        self.gesture.path_data.push(pos);
        ctx.preview.clear();
        K::draw_segment(pos, pos, ctx);
        None
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> Option<Command> {
        if !self.gesture.mouse_down {
            K::draw_cursor(pos, ctx);
            return None;
        }
        let from = self.gesture.last_mouse_pos;
        self.gesture.last_mouse_pos = pos;
        self.gesture.path_data.push(pos);
        K::draw_segment(from, pos, ctx);
        None
    }

    fn on_pointer_up(
        &mut self,
        button: PointerButton,
        _pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        if button != PointerButton::Primary || !self.gesture.mouse_down {
            return None;
        }
        self.gesture.mouse_down = false;
        let points = std::mem::take(&mut self.gesture.path_data);
        ctx.preview.clear();
        if points.is_empty() {
            return None;
        }
        Some(K::into_command(points, ctx))
    }

    fn on_pointer_leave(&mut self, ctx: &mut ToolContext<'_>) {
        if !self.gesture.mouse_down {
            ctx.preview.clear();
        }
    }

    fn on_key_down(
        &mut self,
        key: Key,
        _modifiers: Modifiers,
        ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        if key == Key::Escape {
            self.gesture.reset();
            ctx.preview.clear();
        }
        None
    }

    fn reset(&mut self) {
        self.gesture.reset();
    }

    fn is_busy(&self) -> bool {
        self.gesture.mouse_down
    }
}
