pub mod hit_testing;
mod segment;

pub use segment::{
    Orientation, distance_between_point_and_segment, is_below, on_segment, orientation,
    segments_intersect,
};

/// Bound `value` to `[lo, hi]`.
pub fn clamp<T: PartialOrd>(value: T, lo: T, hi: T) -> T {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

/// Snap the segment `from -> to` to the closest multiple of 45 degrees,
/// keeping its projected length along the chosen direction.
pub fn snap_to_45(from: egui::Pos2, to: egui::Pos2) -> egui::Pos2 {
    let delta = to - from;
    if delta == egui::Vec2::ZERO {
        return to;
    }
    let step = std::f32::consts::FRAC_PI_4;
    let angle = (delta.y.atan2(delta.x) / step).round() * step;
    let direction = egui::vec2(angle.cos(), angle.sin());
    let length = delta.dot(direction);
    from + direction * length
}
