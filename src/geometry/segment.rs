use egui::Pos2;

/// Turn direction of the ordered triplet `(p, q, r)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Colinear = 0,
    Clockwise = 1,
    CounterClockwise = 2,
}

fn cross(p: Pos2, q: Pos2, r: Pos2) -> f32 {
    (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y)
}

pub fn orientation(p: Pos2, q: Pos2, r: Pos2) -> Orientation {
    let value = cross(p, q, r);
    if value == 0.0 {
        Orientation::Colinear
    } else if value > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Whether `q` lies inside the bounding box of the segment `p -> r`.
pub fn on_segment(p: Pos2, q: Pos2, r: Pos2) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// General-position intersection test between `p1 -> q1` and `p2 -> q2`.
///
/// Colinear overlaps are not reported: two segments lying on the same line
/// never intersect according to this test.
pub fn segments_intersect(p1: Pos2, q1: Pos2, p2: Pos2, q2: Pos2) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    o1 != o2 && o3 != o4
}

pub fn distance_between_point_and_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_sq();
    if length_sq == 0.0 {
        return point.distance(start);
    }
    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}

/// True when `point` lies below the line `line_start -> line_end`
/// in screen coordinates (y grows downwards).
pub fn is_below(line_start: Pos2, line_end: Pos2, point: Pos2) -> bool {
    let line = line_end - line_start;
    let to_point = point - line_start;
    line.x * to_point.y - line.y * to_point.x > 0.0
}
