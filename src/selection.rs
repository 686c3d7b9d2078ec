//! Rectangular selection region and its move / resize / flip geometry.

use egui::{Pos2, Rect, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::geometry::is_below;
use crate::surface::ImageData;

/// Smallest width or height a resize can produce.
pub const MIN_SELECTION_SIZE: f32 = 1.0;

/// Mirroring applied to a selection's content.
///
/// `vertical` mirrors across the vertical axis (left and right swap),
/// `horizontal` mirrors across the horizontal axis (top and bottom swap).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flip {
    pub vertical: bool,
    pub horizontal: bool,
}

impl Flip {
    pub fn is_identity(&self) -> bool {
        !self.vertical && !self.horizontal
    }
}

/// One of the eight resize handles around a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::N,
        Handle::NE,
        Handle::E,
        Handle::SE,
        Handle::S,
        Handle::SW,
        Handle::W,
        Handle::NW,
    ];

    /// `1` for an east side, `-1` for a west side, `0` when the handle does
    /// not move horizontally.
    fn x_side(self) -> i8 {
        match self {
            Handle::NE | Handle::E | Handle::SE => 1,
            Handle::NW | Handle::W | Handle::SW => -1,
            Handle::N | Handle::S => 0,
        }
    }

    /// `1` for a south side, `-1` for a north side.
    fn y_side(self) -> i8 {
        match self {
            Handle::SE | Handle::S | Handle::SW => 1,
            Handle::NE | Handle::N | Handle::NW => -1,
            Handle::E | Handle::W => 0,
        }
    }

    pub fn is_corner(self) -> bool {
        self.x_side() != 0 && self.y_side() != 0
    }

    /// The handle on the other side of the vertical axis.
    pub fn mirrored_x(self) -> Self {
        match self {
            Handle::E => Handle::W,
            Handle::W => Handle::E,
            Handle::NE => Handle::NW,
            Handle::NW => Handle::NE,
            Handle::SE => Handle::SW,
            Handle::SW => Handle::SE,
            other => other,
        }
    }

    /// The handle on the other side of the horizontal axis.
    pub fn mirrored_y(self) -> Self {
        match self {
            Handle::N => Handle::S,
            Handle::S => Handle::N,
            Handle::NE => Handle::SE,
            Handle::SE => Handle::NE,
            Handle::NW => Handle::SW,
            Handle::SW => Handle::NW,
            other => other,
        }
    }
}

/// Where the selection tool is in its gesture cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// No selection.
    Off,
    /// Rubber-band drag that will become a selection on release.
    Creating,
    /// A selection exists and nothing is grabbed.
    Idle,
    Move,
    Resize(Handle),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub position: Pos2,
    pub dimension: Vec2,
    pub original_position: Pos2,
    pub original_dimension: Vec2,
    /// Dimension the selection was created with; its ratio is kept while
    /// shift is held on a corner.
    pub ratio_dimension: Vec2,
    pub has_flipped: Flip,
    /// Pixels that were under the region when it was created.
    pub content: ImageData,
    anchor: Pos2,
}

impl Selection {
    pub fn new(rect: Rect, content: ImageData) -> Self {
        Self {
            position: rect.min,
            dimension: rect.size(),
            original_position: rect.min,
            original_dimension: rect.size(),
            ratio_dimension: rect.size(),
            has_flipped: Flip::default(),
            content,
            anchor: rect.min,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.dimension)
    }

    pub fn original_rect(&self) -> Rect {
        Rect::from_min_size(self.original_position, self.original_dimension)
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        self.rect().contains(pos)
    }

    /// Whether committing would change any pixel.
    pub fn is_modified(&self) -> bool {
        self.position != self.original_position
            || self.dimension != self.original_dimension
            || !self.has_flipped.is_identity()
    }

    /// Back to the geometry the selection was created with.
    pub fn reset(&mut self) {
        self.position = self.original_position;
        self.dimension = self.original_dimension;
        self.ratio_dimension = self.original_dimension;
        self.has_flipped = Flip::default();
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Fix the anchor opposite to `handle` before a resize drag.
    pub fn begin_resize(&mut self, handle: Handle) {
        let rect = self.rect();
        self.anchor = Pos2::new(
            if handle.x_side() > 0 { rect.min.x } else { rect.max.x },
            if handle.y_side() > 0 { rect.min.y } else { rect.max.y },
        );
    }

    /// Resize from the fixed anchor towards `mouse` while dragging `handle`.
    ///
    /// Dragging past the anchor flips the selection on that axis and returns
    /// the mirrored handle, which the caller keeps dragging from then on.
    pub fn resize(&mut self, handle: Handle, mouse: Pos2, keep_ratio: bool) -> Handle {
        let mut handle = handle;
        let rect = self.rect();
        let mut width = rect.width();
        let mut height = rect.height();

        if handle.x_side() != 0 {
            let crossed = (handle.x_side() > 0 && mouse.x < self.anchor.x)
                || (handle.x_side() < 0 && mouse.x > self.anchor.x);
            if crossed {
                handle = handle.mirrored_x();
                self.has_flipped.vertical = !self.has_flipped.vertical;
                debug!("selection flipped across x = {}, now dragging {handle:?}", self.anchor.x);
            }
            width = (mouse.x - self.anchor.x).abs();
        }

        if handle.y_side() != 0 {
            let crossed = (handle.y_side() > 0 && mouse.y < self.anchor.y)
                || (handle.y_side() < 0 && mouse.y > self.anchor.y);
            if crossed {
                handle = handle.mirrored_y();
                self.has_flipped.horizontal = !self.has_flipped.horizontal;
                debug!("selection flipped across y = {}, now dragging {handle:?}", self.anchor.y);
            }
            height = (mouse.y - self.anchor.y).abs();
        }

        let ratio = self.ratio_dimension;
        if keep_ratio && handle.is_corner() && ratio.x > 0.0 && ratio.y > 0.0 {
            let diagonal = Pos2::new(ratio.x, ratio.y);
            if is_below(Pos2::ZERO, diagonal, Pos2::new(width, height)) {
                width = height * ratio.x / ratio.y;
            } else {
                height = width * ratio.y / ratio.x;
            }
        }

        let width = width.max(MIN_SELECTION_SIZE);
        let height = height.max(MIN_SELECTION_SIZE);

        let x = match handle.x_side() {
            1 => self.anchor.x,
            -1 => self.anchor.x - width,
            _ => rect.min.x,
        };
        let y = match handle.y_side() {
            1 => self.anchor.y,
            -1 => self.anchor.y - height,
            _ => rect.min.y,
        };
        self.position = Pos2::new(x, y);
        self.dimension = Vec2::new(width, height);

        handle
    }
}
