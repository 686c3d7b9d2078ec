use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::config::ToolSettings;
use crate::input::{Key, Modifiers, PointerButton};
use crate::palette::ColorPalette;
use crate::surface::Surface;

/// What a tool can read and draw on while handling an event.
///
/// Tools never touch the committed canvas: they read `base`, draw their
/// in-progress feedback on `preview`, and hand back a [`Command`] when the
/// gesture is finished.
pub struct ToolContext<'a> {
    pub base: &'a Surface,
    pub preview: &'a mut Surface,
    pub palette: &'a ColorPalette,
    pub settings: &'a ToolSettings,
}

/// Tool trait defines the interface for all drawing tools.
///
/// Every handler has a no-op default, so a tool only implements the events it
/// cares about. Buttons other than [`PointerButton::Primary`] are ignored by
/// every tool in this crate.
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Handle pointer press on the canvas.
    fn on_pointer_down(
        &mut self,
        _button: PointerButton,
        _pos: Pos2,
        _ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        None
    }

    /// Handle pointer movement, with or without a button held.
    fn on_pointer_move(&mut self, _pos: Pos2, _ctx: &mut ToolContext<'_>) -> Option<Command> {
        None
    }

    /// Handle pointer release. Return a Command to **finalize** an action.
    fn on_pointer_up(
        &mut self,
        _button: PointerButton,
        _pos: Pos2,
        _ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        None
    }

    fn on_double_click(&mut self, _pos: Pos2, _ctx: &mut ToolContext<'_>) -> Option<Command> {
        None
    }

    /// The pointer left the canvas.
    fn on_pointer_leave(&mut self, _ctx: &mut ToolContext<'_>) {}

    fn on_key_down(
        &mut self,
        _key: Key,
        _modifiers: Modifiers,
        _ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        None
    }

    fn on_key_up(
        &mut self,
        _key: Key,
        _modifiers: Modifiers,
        _ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        None
    }

    fn on_wheel(&mut self, _delta: Vec2, _ctx: &mut ToolContext<'_>) {}

    /// Called when the tool is deselected. Returns whatever the tool had
    /// pending as a finished command.
    fn deactivate(&mut self, _ctx: &mut ToolContext<'_>) -> Option<Command> {
        None
    }

    /// Drop all gesture state without producing anything.
    fn reset(&mut self);

    /// True while a gesture is in progress; undo/redo stay disabled meanwhile.
    fn is_busy(&self) -> bool;
}

mod gesture;
pub use gesture::GestureState;

mod shape_tool;
pub use shape_tool::{EllipseShape, EllipseTool, RectangleShape, RectangleTool, ShapeKind, ShapeTool};

mod stroke_tool;
pub use stroke_tool::{EraserStroke, EraserTool, PencilStroke, PencilTool, StrokeKind, StrokeTool};

mod line_tool;
pub use line_tool::{CLOSE_DISTANCE, LineTool};

mod paint_bucket;
pub use paint_bucket::PaintBucketTool;

mod selection_tool;
pub use selection_tool::{NUDGE_STEP, SelectionTool};

/// Identifies a tool independently of its state; used by the UI and settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Pencil,
    Eraser,
    Rectangle,
    Ellipse,
    Line,
    PaintBucket,
    Selection,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Pencil,
        ToolKind::Eraser,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Line,
        ToolKind::PaintBucket,
        ToolKind::Selection,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ToolKind::Pencil => "Pencil",
            ToolKind::Eraser => "Eraser",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Ellipse => "Ellipse",
            ToolKind::Line => "Line",
            ToolKind::PaintBucket => "Paint bucket",
            ToolKind::Selection => "Selection",
        }
    }
}

/// Enum representing all available tool types
/// This allows us to avoid using Box<dyn Tool> and simplifies memory management
#[derive(Debug, Clone)]
pub enum ToolType {
    Pencil(PencilTool),
    Eraser(EraserTool),
    Rectangle(RectangleTool),
    Ellipse(EllipseTool),
    Line(LineTool),
    PaintBucket(PaintBucketTool),
    Selection(SelectionTool),
}

macro_rules! dispatch {
    ($self:ident, $tool:ident => $call:expr) => {
        match $self {
            ToolType::Pencil($tool) => $call,
            ToolType::Eraser($tool) => $call,
            ToolType::Rectangle($tool) => $call,
            ToolType::Ellipse($tool) => $call,
            ToolType::Line($tool) => $call,
            ToolType::PaintBucket($tool) => $call,
            ToolType::Selection($tool) => $call,
        }
    };
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        dispatch!(self, tool => tool.name())
    }

    fn on_pointer_down(
        &mut self,
        button: PointerButton,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        dispatch!(self, tool => tool.on_pointer_down(button, pos, ctx))
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> Option<Command> {
        dispatch!(self, tool => tool.on_pointer_move(pos, ctx))
    }

    fn on_pointer_up(
        &mut self,
        button: PointerButton,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        dispatch!(self, tool => tool.on_pointer_up(button, pos, ctx))
    }

    fn on_double_click(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> Option<Command> {
        dispatch!(self, tool => tool.on_double_click(pos, ctx))
    }

    fn on_pointer_leave(&mut self, ctx: &mut ToolContext<'_>) {
        dispatch!(self, tool => tool.on_pointer_leave(ctx))
    }

    fn on_key_down(
        &mut self,
        key: Key,
        modifiers: Modifiers,
        ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        dispatch!(self, tool => tool.on_key_down(key, modifiers, ctx))
    }

    fn on_key_up(
        &mut self,
        key: Key,
        modifiers: Modifiers,
        ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        dispatch!(self, tool => tool.on_key_up(key, modifiers, ctx))
    }

    fn on_wheel(&mut self, delta: Vec2, ctx: &mut ToolContext<'_>) {
        dispatch!(self, tool => tool.on_wheel(delta, ctx))
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) -> Option<Command> {
        dispatch!(self, tool => tool.deactivate(ctx))
    }

    fn reset(&mut self) {
        dispatch!(self, tool => tool.reset())
    }

    fn is_busy(&self) -> bool {
        dispatch!(self, tool => tool.is_busy())
    }
}

// Helper methods for ToolType
impl ToolType {
    pub fn kind(&self) -> ToolKind {
        match self {
            Self::Pencil(_) => ToolKind::Pencil,
            Self::Eraser(_) => ToolKind::Eraser,
            Self::Rectangle(_) => ToolKind::Rectangle,
            Self::Ellipse(_) => ToolKind::Ellipse,
            Self::Line(_) => ToolKind::Line,
            Self::PaintBucket(_) => ToolKind::PaintBucket,
            Self::Selection(_) => ToolKind::Selection,
        }
    }

    pub fn as_selection_tool(&self) -> Option<&SelectionTool> {
        match self {
            Self::Selection(tool) => Some(tool),
            _ => None,
        }
    }

    pub fn as_selection_tool_mut(&mut self) -> Option<&mut SelectionTool> {
        match self {
            Self::Selection(tool) => Some(tool),
            _ => None,
        }
    }
}

impl Default for ToolType {
    fn default() -> Self {
        new_tool(ToolKind::default())
    }
}

// Factory function to create a new tool of the specified type
pub fn new_tool(kind: ToolKind) -> ToolType {
    match kind {
        ToolKind::Pencil => ToolType::Pencil(PencilTool::default()),
        ToolKind::Eraser => ToolType::Eraser(EraserTool::default()),
        ToolKind::Rectangle => ToolType::Rectangle(RectangleTool::default()),
        ToolKind::Ellipse => ToolType::Ellipse(EllipseTool::default()),
        ToolKind::Line => ToolType::Line(LineTool::default()),
        ToolKind::PaintBucket => ToolType::PaintBucket(PaintBucketTool),
        ToolKind::Selection => ToolType::Selection(SelectionTool::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_matches_kind() {
        for kind in ToolKind::ALL {
            let tool = new_tool(kind);
            assert_eq!(tool.kind(), kind);
            assert!(!tool.is_busy());
        }
    }
}
