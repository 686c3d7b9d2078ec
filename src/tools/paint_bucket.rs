use egui::Pos2;
use log::info;

use super::{Tool, ToolContext};
use crate::command::{Command, PaintCommand};
use crate::input::PointerButton;
use crate::paint;

/// Fills the region under the pointer with the primary colour.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaintBucketTool;

impl Tool for PaintBucketTool {
    fn name(&self) -> &'static str {
        "PaintBucket"
    }

    fn on_pointer_down(
        &mut self,
        button: PointerButton,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        if button != PointerButton::Primary || !ctx.base.contains(pos) {
            return None;
        }
        let (x, y) = (pos.x as u32, pos.y as u32);
        let settings = ctx.settings;
        info!(
            "paint bucket at ({x}, {y}), tolerance {}%, contiguous {}",
            settings.tolerance, settings.contiguous
        );
        let image = paint::paint(
            ctx.base.image(),
            x,
            y,
            ctx.palette.primary().to_rgba(),
            settings.tolerance,
            settings.contiguous,
        );
        Some(Command::Paint(PaintCommand { image }))
    }

    fn reset(&mut self) {}

    fn is_busy(&self) -> bool {
        false
    }
}
