use egui::{ColorImage, TextureHandle, TextureOptions};
use futures::executor::block_on;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::command::CommandResult;
use crate::config::{EditorConfig, ToolSettings};
use crate::input::{InputEvent, InputHandler};
use crate::panels::{central_panel, tools_panel};
use crate::state::{EditorContext, FileSnapshotStore, LatestSnapshot};
use crate::surface::Surface;
use crate::tools::ToolKind;

/// Environment variable naming a JSON [`EditorConfig`] to start from.
pub const CONFIG_ENV_VAR: &str = "PAINTBOX_CONFIG";

/// What survives a restart. The canvas itself is not persisted here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
struct PersistedState {
    tool: ToolKind,
    settings: Option<ToolSettings>,
}

fn load_config() -> EditorConfig {
    let Ok(path) = std::env::var(CONFIG_ENV_VAR) else {
        return EditorConfig::default();
    };
    match EditorConfig::load(&path) {
        Ok(config) => {
            info!("loaded config from {path}");
            config
        }
        Err(err) => {
            warn!("ignoring config {path}: {err}");
            EditorConfig::default()
        }
    }
}

fn to_color_image(surface: &Surface) -> ColorImage {
    let size = [surface.width() as usize, surface.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, surface.image().as_raw())
}

/// Uploads `surface` into `slot`, creating the texture on first use.
fn upload(ctx: &egui::Context, slot: &mut Option<TextureHandle>, name: &str, surface: &Surface) {
    let image = to_color_image(surface);
    match slot {
        Some(texture) => texture.set(image, TextureOptions::NEAREST),
        None => *slot = Some(ctx.load_texture(name, image, TextureOptions::NEAREST)),
    }
}

pub struct PaintApp {
    context: EditorContext,
    input: InputHandler,
    latest_snapshot: LatestSnapshot,
    base_texture: Option<TextureHandle>,
    preview_texture: Option<TextureHandle>,
    /// Textures need a re-upload before the next paint
    dirty: bool,
    last_error: Option<String>,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = load_config();
        let mut app = Self::with_config(&config);

        if let Some(storage) = cc.storage {
            if let Some(state) = eframe::get_value::<PersistedState>(storage, eframe::APP_KEY) {
                if let Some(settings) = state.settings {
                    app.context.set_settings(settings);
                }
                app.set_tool(state.tool);
            }
        }
        app
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        let mut context = EditorContext::with_config(config);
        let latest_snapshot = LatestSnapshot::new();
        context.add_snapshot_sink(latest_snapshot.clone());
        if let Some(dir) = &config.snapshot_dir {
            info!("writing canvas snapshots to {}", dir.display());
            context.add_snapshot_sink(FileSnapshotStore::new(dir.clone()));
        }

        Self {
            context,
            input: InputHandler::new(),
            latest_snapshot,
            base_texture: None,
            preview_texture: None,
            dirty: true,
            last_error: None,
        }
    }

    pub fn context(&self) -> &EditorContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut EditorContext {
        self.dirty = true;
        &mut self.context
    }

    pub fn latest_snapshot(&self) -> &LatestSnapshot {
        &self.latest_snapshot
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn report(&mut self, result: CommandResult) {
        self.dirty = true;
        if let Err(err) = result {
            error!("{err}");
            self.last_error = Some(err.to_string());
        }
    }

    pub fn set_tool(&mut self, kind: ToolKind) {
        let result = block_on(self.context.set_tool(kind));
        self.report(result);
    }

    pub fn undo(&mut self) {
        let result = block_on(self.context.undo());
        self.report(result);
    }

    pub fn redo(&mut self) {
        let result = block_on(self.context.redo());
        self.report(result);
    }

    pub fn new_document(&mut self, width: u32, height: u32) {
        self.context.new_document(width, height);
        self.last_error = None;
        self.dirty = true;
    }

    pub fn resize_canvas(&mut self, width: u32, height: u32) {
        let result = block_on(self.context.resize_canvas(width, height));
        self.report(result);
    }

    /// Feed this frame's input to the editor. `canvas_rect` is where the
    /// canvas is drawn on screen.
    pub fn handle_input(&mut self, ctx: &egui::Context, canvas_rect: egui::Rect) {
        let wants_keyboard = ctx.wants_keyboard_input();
        for event in self.input.process_input(ctx, canvas_rect) {
            let is_key = matches!(event, InputEvent::KeyDown { .. } | InputEvent::KeyUp { .. });
            if is_key && wants_keyboard {
                continue;
            }
            let result = block_on(self.context.handle_event(event));
            self.report(result);
        }
    }

    /// Textures for the committed canvas and the tool preview, refreshed if
    /// anything changed since the last call.
    pub fn textures(&mut self, ctx: &egui::Context) -> Option<(&TextureHandle, &TextureHandle)> {
        if self.dirty || self.base_texture.is_none() {
            upload(ctx, &mut self.base_texture, "canvas", self.context.base());
            upload(ctx, &mut self.preview_texture, "preview", self.context.preview());
            self.dirty = false;
        }
        Some((self.base_texture.as_ref()?, self.preview_texture.as_ref()?))
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let state = PersistedState {
            tool: self.context.tool_kind(),
            settings: Some(self.context.settings().clone()),
        };
        eframe::set_value(storage, eframe::APP_KEY, &state);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}
