use image::RgbaImage;
use log::{debug, info};

use crate::command::{Command, CommandHistory, CommandResult};
use crate::config::{EditorConfig, ToolSettings};
use crate::input::{InputEvent, Key, is_command};
use crate::palette::ColorPalette;
use crate::state::persistence::SnapshotSink;
use crate::surface::{Surface, WHITE};
use crate::tools::{Tool, ToolContext, ToolKind, ToolType, new_tool};

fn blank_canvas(width: u32, height: u32) -> Surface {
    let mut surface = Surface::new(width, height);
    surface.fill(WHITE);
    surface
}

/// The editing session: owns the canvas, the preview overlay, the history and
/// the single active tool, and routes input between them.
///
/// Tools draw their in-progress feedback on the preview surface only. Every
/// finished gesture comes back as a [`Command`], which the context applies to
/// the base surface and records in the history.
///
/// # Example
///
/// ```rust,no_run
/// use futures::executor::block_on;
/// use paintbox::input::{InputEvent, PointerButton};
/// use paintbox::state::EditorContext;
/// use paintbox::tools::ToolKind;
///
/// let mut context = EditorContext::new(640, 480);
/// block_on(context.set_tool(ToolKind::Rectangle)).ok();
/// let pos = egui::pos2(10.0, 10.0);
/// block_on(context.handle_event(InputEvent::PointerDown { button: PointerButton::Primary, pos })).ok();
/// ```
#[derive(Debug)]
pub struct EditorContext {
    /// Committed pixels
    base: Surface,
    /// Transparent overlay the active tool draws its feedback on
    preview: Surface,
    history: CommandHistory,
    palette: ColorPalette,
    settings: ToolSettings,
    active_tool: ToolType,
}

impl EditorContext {
    /// Creates a context with a blank white canvas and default settings.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(&EditorConfig {
            canvas_width: width,
            canvas_height: height,
            ..EditorConfig::default()
        })
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        let config = config.clone().sanitized();
        let (width, height) = (config.canvas_width, config.canvas_height);
        let base = blank_canvas(width, height);
        let history = CommandHistory::new([width, height], Some(base.get_image_data()));
        Self {
            base,
            preview: Surface::new(width, height),
            history,
            palette: ColorPalette::default(),
            settings: config.tools,
            active_tool: ToolType::default(),
        }
    }

    pub fn base(&self) -> &Surface {
        &self.base
    }

    pub fn preview(&self) -> &Surface {
        &self.preview
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut ColorPalette {
        &mut self.palette
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: ToolSettings) {
        self.settings = settings.sanitized();
    }

    pub fn active_tool(&self) -> &ToolType {
        &self.active_tool
    }

    pub fn tool_kind(&self) -> ToolKind {
        self.active_tool.kind()
    }

    pub fn add_snapshot_sink(&mut self, sink: impl SnapshotSink + 'static) {
        self.history.add_snapshot_sink(sink);
    }

    fn with_tool<R>(&mut self, f: impl FnOnce(&mut ToolType, &mut ToolContext<'_>) -> R) -> R {
        let mut ctx = ToolContext {
            base: &self.base,
            preview: &mut self.preview,
            palette: &self.palette,
            settings: &self.settings,
        };
        f(&mut self.active_tool, &mut ctx)
    }

    /// Undo/redo stay disabled while the active tool is mid-gesture.
    fn sync_history_lock(&mut self) {
        if self.active_tool.is_busy() {
            self.history.disable();
        } else {
            self.history.enable();
        }
    }

    /// The preview follows the canvas size, which undo/redo can change.
    fn sync_preview_size(&mut self) {
        if self.preview.size() != self.base.size() {
            self.preview.resize(self.base.width(), self.base.height());
        }
    }

    /// Apply `command` to the canvas and record it. A command that fails to
    /// apply is not recorded.
    async fn commit(&mut self, command: Command) -> CommandResult {
        command.apply(&mut self.base).await?;
        info!("committed {}", command.name());
        self.history.add_command(command, &self.base);
        self.sync_preview_size();
        Ok(())
    }

    /// Switch tools. Whatever the outgoing tool had pending is committed
    /// first, then the preview is cleared.
    pub async fn set_tool(&mut self, kind: ToolKind) -> CommandResult {
        let pending = self.with_tool(|tool, ctx| tool.deactivate(ctx));
        self.active_tool.reset();
        self.active_tool = new_tool(kind);
        self.preview.clear();
        self.history.enable();
        info!("active tool: {}", kind.label());
        match pending {
            Some(command) => self.commit(command).await,
            None => Ok(()),
        }
    }

    /// Start over with a blank white canvas.
    pub fn new_document(&mut self, width: u32, height: u32) {
        let width = width.clamp(1, EditorConfig::MAX_CANVAS_SIZE);
        let height = height.clamp(1, EditorConfig::MAX_CANVAS_SIZE);
        self.replace_canvas(blank_canvas(width, height));
    }

    /// Start over from an existing picture.
    pub fn open_image(&mut self, image: RgbaImage) {
        self.replace_canvas(Surface::from_image(image));
    }

    fn replace_canvas(&mut self, base: Surface) {
        self.active_tool.reset();
        self.preview = Surface::new(base.width(), base.height());
        self.history.reset(base.size(), Some(base.get_image_data()));
        info!("new document {}x{}", base.width(), base.height());
        self.base = base;
    }

    /// Grow or crop the canvas as one undoable step.
    pub async fn resize_canvas(&mut self, width: u32, height: u32) -> CommandResult {
        let width = width.clamp(1, EditorConfig::MAX_CANVAS_SIZE);
        let height = height.clamp(1, EditorConfig::MAX_CANVAS_SIZE);
        if [width, height] == self.base.size() {
            return Ok(());
        }
        let pending = self.with_tool(|tool, ctx| tool.deactivate(ctx));
        if let Some(command) = pending {
            self.commit(command).await?;
        }
        self.active_tool.reset();
        self.preview.clear();
        self.commit(Command::ResizeCanvas { width, height }).await?;
        self.sync_history_lock();
        Ok(())
    }

    pub async fn undo(&mut self) -> CommandResult {
        let result = self.history.undo(&mut self.base).await;
        self.sync_preview_size();
        result
    }

    pub async fn redo(&mut self) -> CommandResult {
        let result = self.history.redo(&mut self.base).await;
        self.sync_preview_size();
        result
    }

    /// Route one input event to the active tool, committing whatever it
    /// finishes.
    pub async fn handle_event(&mut self, event: InputEvent) -> CommandResult {
        let command = match event {
            InputEvent::PointerDown { button, pos } => {
                if !self.base.contains(pos) {
                    debug!("pointer down outside the canvas at {pos:?}");
                    return Ok(());
                }
                self.with_tool(|tool, ctx| tool.on_pointer_down(button, pos, ctx))
            }
            InputEvent::PointerMove { pos } | InputEvent::PointerEnter { pos } => {
                self.with_tool(|tool, ctx| tool.on_pointer_move(pos, ctx))
            }
            InputEvent::PointerUp { button, pos } => {
                self.with_tool(|tool, ctx| tool.on_pointer_up(button, pos, ctx))
            }
            InputEvent::DoubleClick { pos } => self.with_tool(|tool, ctx| tool.on_double_click(pos, ctx)),
            InputEvent::PointerLeave => {
                self.with_tool(|tool, ctx| tool.on_pointer_leave(ctx));
                None
            }
            InputEvent::KeyDown { key, modifiers } => {
                if is_command(modifiers) {
                    match key {
                        Key::Character('z') if modifiers.shift => return self.redo().await,
                        Key::Character('z') => return self.undo().await,
                        Key::Character('y') => return self.redo().await,
                        _ => {}
                    }
                }
                self.with_tool(|tool, ctx| tool.on_key_down(key, modifiers, ctx))
            }
            InputEvent::KeyUp { key, modifiers } => {
                self.with_tool(|tool, ctx| tool.on_key_up(key, modifiers, ctx))
            }
            InputEvent::Wheel { delta } => {
                self.with_tool(|tool, ctx| tool.on_wheel(delta, ctx));
                None
            }
        };

        let result = match command {
            Some(command) => self.commit(command).await,
            None => Ok(()),
        };
        self.sync_history_lock();
        result
    }
}
