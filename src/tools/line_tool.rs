use egui::Pos2;
use log::debug;

use super::{Tool, ToolContext};
use crate::command::{Command, LineCommand};
use crate::geometry::snap_to_45;
use crate::input::{Key, Modifiers, PointerButton};

/// A finished line closes onto its first junction when it ends this close.
pub const CLOSE_DISTANCE: f32 = 20.0;

/// Polyline built one click at a time.
///
/// Each click adds a junction; a double-click (or Enter) finishes the line.
#[derive(Debug, Clone, Default)]
pub struct LineTool {
    junctions: Vec<Pos2>,
    cursor: Option<Pos2>,
    shift: bool,
}

impl LineTool {
    pub fn junctions(&self) -> &[Pos2] {
        &self.junctions
    }

    /// Where the next junction goes when the pointer is at `pos`.
    fn constrained(&self, pos: Pos2) -> Pos2 {
        match self.junctions.last() {
            Some(last) if self.shift => snap_to_45(*last, pos),
            _ => pos,
        }
    }

    fn line(&self, points: Vec<Pos2>, ctx: &ToolContext<'_>) -> LineCommand {
        let settings = ctx.settings;
        LineCommand {
            points,
            width: settings.line_width,
            color: ctx.palette.primary(),
            junction_diameter: settings.show_junctions.then_some(settings.junction_diameter),
        }
    }

    fn redraw_preview(&self, ctx: &mut ToolContext<'_>) {
        ctx.preview.clear();
        if self.junctions.is_empty() {
            return;
        }
        let mut points = self.junctions.clone();
        if let Some(cursor) = self.cursor {
            points.push(self.constrained(cursor));
        }
        let line = self.line(points, ctx);
        line.draw(ctx.preview);
    }

    fn finish(&mut self, ctx: &mut ToolContext<'_>) -> Option<Command> {
        let mut points = std::mem::take(&mut self.junctions);
        self.cursor = None;
        ctx.preview.clear();

        // The clicks of a double-click land on the same spot
        points.dedup_by(|a, b| a.distance(*b) < 1.0);
        if points.len() < 2 {
            debug!("line discarded with {} junction(s)", points.len());
            return None;
        }
        if points.len() > 2 && points[0].distance(points[points.len() - 1]) <= CLOSE_DISTANCE {
            let first = points[0];
            if let Some(last) = points.last_mut() {
                *last = first;
            }
        }
        Some(Command::Line(self.line(points, ctx)))
    }
}

impl Tool for LineTool {
    fn name(&self) -> &'static str {
        "Line"
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
        let junction = self.constrained(pos);
        self.junctions.push(junction);
        self.cursor = Some(junction);
        self.redraw_preview(ctx);
        None
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> Option<Command> {
        self.cursor = Some(pos);
        if !self.junctions.is_empty() {
            self.redraw_preview(ctx);
        }
        None
    }

    fn on_double_click(&mut self, _pos: Pos2, ctx: &mut ToolContext<'_>) -> Option<Command> {
        self.finish(ctx)
    }

    fn on_key_down(
        &mut self,
        key: Key,
        _modifiers: Modifiers,
        ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        match key {
            Key::Shift => {
                self.shift = true;
                self.redraw_preview(ctx);
            }
            Key::Backspace => {
                self.junctions.pop();
                self.redraw_preview(ctx);
            }
            Key::Enter => return self.finish(ctx),
            Key::Escape => {
                self.junctions.clear();
                self.cursor = None;
                ctx.preview.clear();
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
            self.shift = false;
            self.redraw_preview(ctx);
        }
        None
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) -> Option<Command> {
        self.finish(ctx)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn is_busy(&self) -> bool {
        !self.junctions.is_empty()
    }
}
