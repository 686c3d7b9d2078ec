use std::marker::PhantomData;

use egui::Pos2;
use log::debug;

use super::{GestureState, Tool, ToolContext};
use crate::command::{Command, ShapeCommand, ShapeStyle};
use crate::input::{Key, Modifiers, PointerButton};
use crate::surface::Surface;

/// The part of a drag-to-shape tool that differs between shapes.
pub trait ShapeKind {
    const NAME: &'static str;

    fn draw(shape: &ShapeCommand, surface: &mut Surface);

    fn into_command(shape: ShapeCommand) -> Command;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RectangleShape;

impl ShapeKind for RectangleShape {
    const NAME: &'static str = "Rectangle";

    fn draw(shape: &ShapeCommand, surface: &mut Surface) {
        shape.draw_rectangle(surface);
    }

    fn into_command(shape: ShapeCommand) -> Command {
        Command::Rectangle(shape)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EllipseShape;

impl ShapeKind for EllipseShape {
    const NAME: &'static str = "Ellipse";

    fn draw(shape: &ShapeCommand, surface: &mut Surface) {
        shape.draw_ellipse(surface);
    }

    fn into_command(shape: ShapeCommand) -> Command {
        Command::Ellipse(shape)
    }
}

/// Drag out a shape from the press point to the release point.
///
/// Holding shift constrains it to a square or circle.
#[derive(Debug, Clone, Default)]
pub struct ShapeTool<S> {
    gesture: GestureState,
    is_even: bool,
    _shape: PhantomData<S>,
}

pub type RectangleTool = ShapeTool<RectangleShape>;
pub type EllipseTool = ShapeTool<EllipseShape>;

impl<S: ShapeKind> ShapeTool<S> {
    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn is_even(&self) -> bool {
        self.is_even
    }

    fn shape(&self, ctx: &ToolContext<'_>) -> ShapeCommand {
        ShapeCommand {
            start: self.gesture.mouse_down_coord,
            end: self.gesture.last_mouse_pos,
            is_even: self.is_even,
            style: ShapeStyle::resolve(ctx.settings, ctx.palette),
        }
    }

    fn redraw_preview(&self, ctx: &mut ToolContext<'_>) {
        ctx.preview.clear();
        let shape = self.shape(ctx);
        S::draw(&shape, ctx.preview);
    }

    fn set_even(&mut self, is_even: bool, ctx: &mut ToolContext<'_>) {
        self.is_even = is_even;
        if self.gesture.mouse_down {
            self.redraw_preview(ctx);
        }
    }
}

impl<S: ShapeKind> Tool for ShapeTool<S> {
    fn name(&self) -> &'static str {
        S::NAME
    }

    fn on_pointer_down(
        &mut self,
        button: PointerButton,
        pos: Pos2,
        _ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        if button == PointerButton::Primary {
            self.gesture.begin(pos);
        }
        None
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> Option<Command> {
        if self.gesture.mouse_down {
            self.gesture.last_mouse_pos = pos;
            self.redraw_preview(ctx);
        }
        None
    }

    fn on_pointer_up(
        &mut self,
        button: PointerButton,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        if button != PointerButton::Primary || !self.gesture.mouse_down {
            return None;
        }
        self.gesture.mouse_down = false;
        self.gesture.last_mouse_pos = pos;
        ctx.preview.clear();

        let shape = self.shape(ctx);
        let bounds = shape.bounds();
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            debug!("{} has no area, nothing to draw", S::NAME);
            return None;
        }
        Some(S::into_command(shape))
    }

    fn on_key_down(
        &mut self,
        key: Key,
        _modifiers: Modifiers,
        ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        match key {
            Key::Shift => self.set_even(true, ctx),
            Key::Escape => {
                ctx.preview.clear();
                self.gesture.mouse_down = false;
            }
            _ => {}
        }
        None
    }

    fn on_key_up(
        &mut self,
        key: Key,
        _modifiers: Modifiers,
        ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        if key == Key::Shift {
            self.set_even(false, ctx);
        }
        None
    }

    fn reset(&mut self) {
        self.gesture.reset();
        self.is_even = false;
    }

    fn is_busy(&self) -> bool {
        self.gesture.mouse_down
    }
}
