use egui::{Pos2, Rect};

use crate::selection::Handle;

/// Half the side of the square grab area drawn around each selection handle.
pub const HANDLE_RADIUS: f32 = 5.0;

/// Center of `handle` on the border of `rect`.
pub fn handle_position(rect: Rect, handle: Handle) -> Pos2 {
    let center = rect.center();
    match handle {
        Handle::N => Pos2::new(center.x, rect.min.y),
        Handle::NE => rect.right_top(),
        Handle::E => Pos2::new(rect.max.x, center.y),
        Handle::SE => rect.right_bottom(),
        Handle::S => Pos2::new(center.x, rect.max.y),
        Handle::SW => rect.left_bottom(),
        Handle::W => Pos2::new(rect.min.x, center.y),
        Handle::NW => rect.left_top(),
    }
}

/// The handle under `pos`, if any. Corners win over edges when they overlap
/// on very small selections.
pub fn handle_at(pos: Pos2, rect: Rect) -> Option<Handle> {
    const ORDER: [Handle; 8] = [
        Handle::NW,
        Handle::NE,
        Handle::SE,
        Handle::SW,
        Handle::N,
        Handle::E,
        Handle::S,
        Handle::W,
    ];

    ORDER.into_iter().find(|handle| {
        let center = handle_position(rect, *handle);
        (pos.x - center.x).abs() <= HANDLE_RADIUS && (pos.y - center.y).abs() <= HANDLE_RADIUS
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_handle_hit_priority() {
        let rect = Rect::from_min_size(pos2(10.0, 10.0), egui::vec2(100.0, 50.0));
        assert_eq!(handle_at(pos2(110.0, 35.0), rect), Some(Handle::E));
        assert_eq!(handle_at(pos2(12.0, 8.0), rect), Some(Handle::NW));
        assert_eq!(handle_at(pos2(60.0, 35.0), rect), None);
    }
}
