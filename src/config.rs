use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How rectangles and ellipses are painted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillStyle {
    /// Outline only, in the secondary colour
    #[default]
    Outline,
    /// Interior only, in the primary colour
    Fill,
    FillAndOutline,
}

impl FillStyle {
    pub fn fills(self) -> bool {
        matches!(self, FillStyle::Fill | FillStyle::FillAndOutline)
    }

    pub fn outlines(self) -> bool {
        matches!(self, FillStyle::Outline | FillStyle::FillAndOutline)
    }
}

/// Settings shared by the drawing tools.
///
/// Missing fields take their default value when deserializing, so settings
/// saved by an older build still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub line_width: f32,
    pub eraser_size: f32,
    pub fill_style: FillStyle,
    pub junction_diameter: f32,
    pub show_junctions: bool,
    /// Paint-bucket tolerance in percent.
    pub tolerance: f64,
    /// Paint-bucket fills only the connected region when true.
    pub contiguous: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            line_width: 5.0,
            eraser_size: 20.0,
            fill_style: FillStyle::default(),
            junction_diameter: 5.0,
            show_junctions: true,
            tolerance: 0.0,
            contiguous: true,
        }
    }
}

impl ToolSettings {
    pub const LINE_WIDTH_RANGE: (f32, f32) = (1.0, 100.0);
    pub const ERASER_SIZE_RANGE: (f32, f32) = (5.0, 200.0);
    pub const JUNCTION_RANGE: (f32, f32) = (1.0, 50.0);

    /// Clamp every value into its supported range.
    pub fn sanitized(mut self) -> Self {
        let (lo, hi) = Self::LINE_WIDTH_RANGE;
        self.line_width = self.line_width.clamp(lo, hi);
        let (lo, hi) = Self::ERASER_SIZE_RANGE;
        self.eraser_size = self.eraser_size.clamp(lo, hi);
        let (lo, hi) = Self::JUNCTION_RANGE;
        self.junction_diameter = self.junction_diameter.clamp(lo, hi);
        self.tolerance = self.tolerance.clamp(0.0, 100.0);
        self
    }
}

/// Start-up configuration of the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub tools: ToolSettings,
    /// Directory receiving a PNG + JSON snapshot after every history change.
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            tools: ToolSettings::default(),
            snapshot_dir: None,
        }
    }
}

impl EditorConfig {
    pub const MAX_CANVAS_SIZE: u32 = 8192;

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn sanitized(mut self) -> Self {
        self.canvas_width = self.canvas_width.clamp(1, Self::MAX_CANVAS_SIZE);
        self.canvas_height = self.canvas_height.clamp(1, Self::MAX_CANVAS_SIZE);
        self.tools = self.tools.sanitized();
        self
    }
}
