use image::RgbaImage;
use log::{debug, info};
use uuid::Uuid;

use super::{Command, CommandResult};
use crate::state::persistence::{CanvasSnapshot, SnapshotMetadata, SnapshotSink};
use crate::surface::Surface;
use crate::util::time;

/// Manages the history of executed commands for undo/redo functionality.
///
/// Undo does not invert anything: it rebuilds the canvas from the recorded
/// initial size and base image and replays every command still in the past.
/// That keeps non-invertible commands such as fills exact, at the cost of a
/// replay proportional to the history length.
pub struct CommandHistory {
    /// Commands already on the canvas, oldest first
    past_commands: Vec<Command>,
    /// Undone commands, most recently undone last
    redo_commands: Vec<Command>,
    /// Set while a gesture is in progress
    undo_redo_disabled: bool,
    initial_size: [u32; 2],
    base_image: Option<RgbaImage>,
    document_id: Uuid,
    snapshot_sinks: Vec<Box<dyn SnapshotSink>>,
}

impl std::fmt::Debug for CommandHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHistory")
            .field("past_commands", &self.past_commands.len())
            .field("redo_commands", &self.redo_commands.len())
            .field("undo_redo_disabled", &self.undo_redo_disabled)
            .field("initial_size", &self.initial_size)
            .field("document_id", &self.document_id)
            .finish_non_exhaustive()
    }
}

impl CommandHistory {
    /// Creates an empty history for a canvas of `initial_size` whose
    /// untouched state is `base_image` (transparent when `None`).
    pub fn new(initial_size: [u32; 2], base_image: Option<RgbaImage>) -> Self {
        Self {
            past_commands: Vec::new(),
            redo_commands: Vec::new(),
            undo_redo_disabled: false,
            initial_size,
            base_image,
            document_id: Uuid::new_v4(),
            snapshot_sinks: Vec::new(),
        }
    }

    /// Register a hook called with the canvas after every history change.
    pub fn add_snapshot_sink(&mut self, sink: impl SnapshotSink + 'static) {
        self.snapshot_sinks.push(Box::new(sink));
    }

    /// Start over for a new document.
    pub fn reset(&mut self, initial_size: [u32; 2], base_image: Option<RgbaImage>) {
        self.past_commands.clear();
        self.redo_commands.clear();
        self.undo_redo_disabled = false;
        self.initial_size = initial_size;
        self.base_image = base_image;
        self.document_id = Uuid::new_v4();
        info!("history reset for document {}", self.document_id);
    }

    /// Record a command that has already been applied to `canvas`.
    pub fn add_command(&mut self, command: Command, canvas: &Surface) {
        debug!("adding {} to history", command.name());
        self.past_commands.push(command);
        self.redo_commands.clear();
        self.undo_redo_disabled = false;
        self.persist(canvas);
    }

    /// Undo the last command by replaying everything before it.
    pub async fn undo(&mut self, canvas: &mut Surface) -> CommandResult {
        if self.undo_redo_disabled {
            debug!("undo ignored while a gesture is in progress");
            return Ok(());
        }
        let Some((command, remaining)) = self.past_commands.split_last() else {
            debug!("nothing to undo");
            return Ok(());
        };
        info!("undo {}", command.name());

        // Replay off-screen so a failing command leaves canvas and history as they were
        let mut rebuilt = self.initial_canvas();
        for command in remaining {
            command.apply(&mut rebuilt).await?;
        }

        if let Some(command) = self.past_commands.pop() {
            self.redo_commands.push(command);
        }
        *canvas = rebuilt;

        self.persist(canvas);
        Ok(())
    }

    /// Re-apply the most recently undone command.
    pub async fn redo(&mut self, canvas: &mut Surface) -> CommandResult {
        if self.undo_redo_disabled {
            debug!("redo ignored while a gesture is in progress");
            return Ok(());
        }
        let Some(command) = self.redo_commands.pop() else {
            debug!("nothing to redo");
            return Ok(());
        };
        info!("redo {}", command.name());

        if let Err(err) = command.apply(canvas).await {
            self.redo_commands.push(command);
            return Err(err);
        }
        self.past_commands.push(command);

        self.persist(canvas);
        Ok(())
    }

    fn initial_canvas(&self) -> Surface {
        let [width, height] = self.initial_size;
        let mut canvas = Surface::new(width, height);
        if let Some(base) = &self.base_image {
            canvas.put_image_data(base, 0, 0);
        }
        canvas
    }

    fn persist(&self, canvas: &Surface) {
        if self.snapshot_sinks.is_empty() {
            return;
        }
        let snapshot = CanvasSnapshot {
            metadata: SnapshotMetadata {
                document_id: self.document_id,
                width: canvas.width(),
                height: canvas.height(),
                timestamp: time::timestamp_secs(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                command_count: self.past_commands.len(),
            },
            image: canvas.get_image_data(),
        };
        for sink in &self.snapshot_sinks {
            sink.store(&snapshot);
        }
    }

    pub fn disable(&mut self) {
        self.undo_redo_disabled = true;
    }

    pub fn enable(&mut self) {
        self.undo_redo_disabled = false;
    }

    pub fn is_disabled(&self) -> bool {
        self.undo_redo_disabled
    }

    pub fn past_size(&self) -> usize {
        self.past_commands.len()
    }

    pub fn redo_size(&self) -> usize {
        self.redo_commands.len()
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_redo_disabled && !self.past_commands.is_empty()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.undo_redo_disabled && !self.redo_commands.is_empty()
    }

    pub fn past_commands(&self) -> &[Command] {
        &self.past_commands
    }

    pub fn initial_size(&self) -> [u32; 2] {
        self.initial_size
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }
}
