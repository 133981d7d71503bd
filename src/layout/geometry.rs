use crate::config::NodeGeometry;
use crate::ir::{GraphNode, NodeShape, Point};

// Tolerance for the orthogonal-extent check when a ray grazes a corner.
const EXTENT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeEndpoints {
    pub source_point: Point,
    pub target_point: Point,
}

/// Point on a circle's boundary along the ray from `center` towards `target`.
///
/// The angle is undefined when `target == center`; `atan2(0, 0)` yields the
/// rightmost point, which callers should not rely on.
pub fn circle_intersection(center: Point, radius: f64, target: Point) -> Point {
    let angle = (target.y - center.y).atan2(target.x - center.x);
    Point::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// Point where the ray from `center` towards `target` leaves an axis-aligned
/// rectangle of the given size centred on `center`.
pub fn rect_intersection(center: Point, width: f64, height: f64, target: Point) -> Point {
    let dx = target.x - center.x;
    let dy = target.y - center.y;
    let half_w = width / 2.0;
    let half_h = height / 2.0;

    if dx == 0.0 && dy == 0.0 {
        return Point::new(center.x + half_w, center.y);
    }

    // (t, offset_x, offset_y) for every side the ray can reach.
    let mut best: Option<(f64, f64, f64)> = None;
    let mut consider = |t: f64, ox: f64, oy: f64| {
        if ox.abs() > half_w + EXTENT_EPSILON || oy.abs() > half_h + EXTENT_EPSILON {
            return;
        }
        match best {
            Some((best_t, _, _)) if t >= best_t => {}
            _ => best = Some((t, ox, oy)),
        }
    };

    if dx > 0.0 {
        let t = half_w / dx;
        consider(t, half_w, dy * t);
    } else if dx < 0.0 {
        let t = -half_w / dx;
        consider(t, -half_w, dy * t);
    }
    if dy > 0.0 {
        let t = half_h / dy;
        consider(t, dx * t, half_h);
    } else if dy < 0.0 {
        let t = -half_h / dy;
        consider(t, dx * t, -half_h);
    }

    match best {
        Some((_, ox, oy)) => Point::new(
            center.x + ox.clamp(-half_w, half_w),
            center.y + oy.clamp(-half_h, half_h),
        ),
        // Only reachable with NaN input.
        None => Point::new(center.x + half_w, center.y),
    }
}

/// Anchor point connectors aim at.
///
/// The horizontal center follows the rendered width; the vertical center is
/// pinned to the avatar so wrapped label text never shifts it.
pub fn node_center(node: &GraphNode, geometry: &NodeGeometry) -> Point {
    let width = node
        .measured
        .map(|size| size.width)
        .unwrap_or(geometry.default_width);
    Point::new(
        node.position.x + width / 2.0,
        node.position.y + geometry.avatar_radius,
    )
}

fn boundary_point(
    node: &GraphNode,
    center: Point,
    toward: Point,
    geometry: &NodeGeometry,
) -> Point {
    match node.kind.shape() {
        NodeShape::Rectangle => {
            rect_intersection(center, geometry.item_size, geometry.item_size, toward)
        }
        NodeShape::Circle => circle_intersection(center, geometry.avatar_radius, toward),
    }
}

/// Connector endpoints between two nodes using the default node geometry.
pub fn edge_intersection_points(source: &GraphNode, target: &GraphNode) -> EdgeEndpoints {
    edge_intersection_points_with(source, target, &NodeGeometry::default())
}

pub fn edge_intersection_points_with(
    source: &GraphNode,
    target: &GraphNode,
    geometry: &NodeGeometry,
) -> EdgeEndpoints {
    let source_center = node_center(source, geometry);
    let target_center = node_center(target, geometry);
    EdgeEndpoints {
        source_point: boundary_point(source, source_center, target_center, geometry),
        target_point: boundary_point(target, target_center, source_center, geometry),
    }
}
