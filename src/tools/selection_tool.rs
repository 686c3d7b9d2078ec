use egui::{Pos2, Rect, Vec2, pos2};
use image::{Rgba, RgbaImage};
use log::{debug, info};

use super::{Tool, ToolContext};
use crate::command::{Command, SelectionCommand};
use crate::geometry::hit_testing::{HANDLE_RADIUS, handle_at, handle_position};
use crate::input::{Key, Modifiers, PointerButton, is_command};
use crate::selection::{Handle, Selection, SelectionState};
use crate::surface::{ImageData, WHITE};

/// Distance an arrow key moves an idle selection.
pub const NUDGE_STEP: f32 = 3.0;

const OUTLINE: Rgba<u8> = Rgba([0, 120, 215, 255]);
const HANDLE_FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Rectangular selection that can be moved, resized and mirrored before
/// being committed onto the canvas.
#[derive(Debug, Clone)]
pub struct SelectionTool {
    state: SelectionState,
    selection: Option<Selection>,
    /// Decoded copy of the selection content, used for previews.
    bitmap: Option<RgbaImage>,
    drag_start: Pos2,
    /// Pointer position relative to the selection origin while moving.
    move_offset: Vec2,
    keep_ratio: bool,
}

impl Default for SelectionTool {
    fn default() -> Self {
        Self {
            state: SelectionState::Off,
            selection: None,
            bitmap: None,
            drag_start: Pos2::ZERO,
            move_offset: Vec2::ZERO,
            keep_ratio: false,
        }
    }
}

/// Integer-aligned rectangle spanned by two points, clipped to `bounds`.
fn pixel_rect(a: Pos2, b: Pos2, bounds: Rect) -> Rect {
    let rect = Rect::from_two_pos(a, b);
    Rect::from_min_max(
        pos2(rect.min.x.round(), rect.min.y.round()),
        pos2(rect.max.x.round(), rect.max.y.round()),
    )
    .intersect(bounds)
}

impl SelectionTool {
    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    fn set_state(&mut self, state: SelectionState) {
        if self.state != state {
            debug!("selection {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    /// Capture the pixels under `rect` and make it the current selection.
    fn capture(&mut self, rect: Rect, ctx: &mut ToolContext<'_>) {
        let bitmap = ctx.base.get_region(rect);
        info!("selected {}x{} at {:?}", bitmap.width(), bitmap.height(), rect.min);
        self.selection = Some(Selection::new(rect, ImageData::from(bitmap.clone())));
        self.bitmap = Some(bitmap);
        self.set_state(SelectionState::Idle);
        self.redraw_preview(ctx);
    }

    /// Hand the pending transform over as a command and drop the selection.
    /// Unchanged selections produce nothing.
    fn commit(&mut self, ctx: &mut ToolContext<'_>) -> Option<Command> {
        self.set_state(SelectionState::Off);
        self.bitmap = None;
        ctx.preview.clear();

        let selection = self.selection.take()?;
        if !selection.is_modified() {
            debug!("selection unchanged, nothing to commit");
            return None;
        }
        info!("committing selection {:?} -> {:?}", selection.original_rect(), selection.rect());
        Some(Command::Selection(SelectionCommand {
            source: selection.original_rect(),
            dest: selection.rect(),
            flip: selection.has_flipped,
            content: selection.content,
        }))
    }

    fn redraw_preview(&self, ctx: &mut ToolContext<'_>) {
        ctx.preview.clear();
        let (Some(selection), Some(bitmap)) = (&self.selection, &self.bitmap) else {
            return;
        };
        let rect = selection.rect();
        ctx.preview.fill_rect(selection.original_rect(), WHITE);
        ctx.preview.draw_image(bitmap, rect, selection.has_flipped);
        ctx.preview.stroke_rect(rect.expand(1.0), 1.0, OUTLINE);
        for handle in Handle::ALL {
            let square = Rect::from_center_size(handle_position(rect, handle), Vec2::splat(HANDLE_RADIUS * 2.0));
            ctx.preview.fill_rect(square, HANDLE_FILL);
            ctx.preview.stroke_rect(square, 1.0, OUTLINE);
        }
    }

    fn draw_marquee(&self, pos: Pos2, ctx: &mut ToolContext<'_>) {
        ctx.preview.clear();
        let rect = Rect::from_two_pos(self.drag_start, pos);
        ctx.preview.stroke_rect(rect, 1.0, OUTLINE);
    }

    fn select_all(&mut self, ctx: &mut ToolContext<'_>) -> Option<Command> {
        let committed = self.commit(ctx);
        let bounds = ctx.base.bounds();
        self.capture(bounds, ctx);
        committed
    }

    fn nudge(&mut self, delta: Vec2, ctx: &mut ToolContext<'_>) {
        if self.state != SelectionState::Idle {
            return;
        }
        if let Some(selection) = &mut self.selection {
            selection.translate(delta);
            self.redraw_preview(ctx);
        }
    }
}

impl Tool for SelectionTool {
    fn name(&self) -> &'static str {
        "Selection"
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
        match self.state {
            SelectionState::Off => {
                self.drag_start = pos;
                self.set_state(SelectionState::Creating);
                None
            }
            SelectionState::Idle => {
                let selection = self.selection.as_mut()?;
                if let Some(handle) = handle_at(pos, selection.rect()) {
                    selection.begin_resize(handle);
                    self.set_state(SelectionState::Resize(handle));
                    None
                } else if selection.contains(pos) {
                    self.move_offset = pos - selection.position;
                    self.set_state(SelectionState::Move);
                    None
                } else {
                    let committed = self.commit(ctx);
                    self.drag_start = pos;
                    self.set_state(SelectionState::Creating);
                    committed
                }
            }
            SelectionState::Creating | SelectionState::Move | SelectionState::Resize(_) => None,
        }
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> Option<Command> {
        match self.state {
            SelectionState::Creating => self.draw_marquee(pos, ctx),
            SelectionState::Move => {
                if let Some(selection) = &mut self.selection {
                    selection.position = pos - self.move_offset;
                }
                self.redraw_preview(ctx);
            }
            SelectionState::Resize(handle) => {
                if let Some(selection) = &mut self.selection {
                    let handle = selection.resize(handle, pos, self.keep_ratio);
                    self.set_state(SelectionState::Resize(handle));
                }
                self.redraw_preview(ctx);
            }
            SelectionState::Off | SelectionState::Idle => {}
        }
        None
    }

    fn on_pointer_up(
        &mut self,
        button: PointerButton,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        if button != PointerButton::Primary {
            return None;
        }
        match self.state {
            SelectionState::Creating => {
                let rect = pixel_rect(self.drag_start, pos, ctx.base.bounds());
                if rect.width() < 1.0 || rect.height() < 1.0 {
                    debug!("empty selection discarded");
                    self.set_state(SelectionState::Off);
                    ctx.preview.clear();
                } else {
                    self.capture(rect, ctx);
                }
            }
            SelectionState::Move | SelectionState::Resize(_) => {
                self.set_state(SelectionState::Idle);
                self.redraw_preview(ctx);
            }
            SelectionState::Off | SelectionState::Idle => {}
        }
        None
    }

    fn on_key_down(
        &mut self,
        key: Key,
        modifiers: Modifiers,
        ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        match key {
            Key::Shift => self.keep_ratio = true,
            Key::Escape => {
                if self.state == SelectionState::Creating {
                    self.set_state(SelectionState::Off);
                    ctx.preview.clear();
                    return None;
                }
                return self.commit(ctx);
            }
            Key::Character('a') if is_command(modifiers) => return self.select_all(ctx),
            Key::ArrowUp => self.nudge(Vec2::new(0.0, -NUDGE_STEP), ctx),
            Key::ArrowDown => self.nudge(Vec2::new(0.0, NUDGE_STEP), ctx),
            Key::ArrowLeft => self.nudge(Vec2::new(-NUDGE_STEP, 0.0), ctx),
            Key::ArrowRight => self.nudge(Vec2::new(NUDGE_STEP, 0.0), ctx),
            _ => {}
        }
        None
    }

    fn on_key_up(
        &mut self,
        key: Key,
        _modifiers: Modifiers,
        _ctx: &mut ToolContext<'_>,
    ) -> Option<Command> {
        if key == Key::Shift {
            self.keep_ratio = false;
        }
        None
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) -> Option<Command> {
        if self.state == SelectionState::Creating {
            self.set_state(SelectionState::Off);
            ctx.preview.clear();
            return None;
        }
        self.commit(ctx)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn is_busy(&self) -> bool {
        self.state != SelectionState::Off
    }
}
