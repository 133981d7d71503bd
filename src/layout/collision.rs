use std::borrow::Cow;

use crate::config::{CollisionOptions, NodeGeometry};
use crate::ir::{GraphNode, Point};

// Displacements smaller than this on both axes count as "did not move".
const MOVE_EPSILON: f64 = 1e-2;

#[derive(Debug, Clone, Copy)]
struct BoundingBox {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl BoundingBox {
    fn for_node(node: &GraphNode, geometry: &NodeGeometry) -> Self {
        let size = node.measured.or(node.size);
        Self {
            x: node.position.x,
            y: node.position.y,
            width: size.map(|s| s.width).unwrap_or(geometry.default_width).max(0.0),
            height: size.map(|s| s.height).unwrap_or(geometry.default_height).max(0.0),
        }
    }

    fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Overlap of two boxes on each axis after inflating both by `margin / 2`
/// per side. Positive values mean the inflated boxes intersect.
fn overlap(a: &BoundingBox, b: &BoundingBox, margin: f64) -> (f64, f64) {
    let overlap_x = (a.width + b.width) / 2.0 + margin - (a.center_x() - b.center_x()).abs();
    let overlap_y = (a.height + b.height) / 2.0 + margin - (a.center_y() - b.center_y()).abs();
    (overlap_x, overlap_y)
}

/// Pushes `a` and `b` apart along `axis` by `amount`, split evenly.
/// Coincident centres send `a` towards negative coordinates.
fn separate(a: &mut BoundingBox, b: &mut BoundingBox, axis: Axis, amount: f64) {
    let half = amount / 2.0;
    match axis {
        Axis::X => {
            let sign = if a.center_x() > b.center_x() { 1.0 } else { -1.0 };
            a.x += sign * half;
            b.x -= sign * half;
        }
        Axis::Y => {
            let sign = if a.center_y() > b.center_y() { 1.0 } else { -1.0 };
            a.y += sign * half;
            b.y -= sign * half;
        }
    }
}

/// Resolves overlaps using the default node geometry for unsized nodes.
pub fn resolve_collisions<'a>(
    nodes: &'a [GraphNode],
    options: &CollisionOptions,
) -> Vec<Cow<'a, GraphNode>> {
    resolve_collisions_with(nodes, options, &NodeGeometry::default())
}

/// Iteratively pushes overlapping nodes apart.
///
/// Each pass visits every pair once and moves colliding pairs apart along the
/// axis with the smaller overlap. Passes stop after the first one without a
/// collision, or after `options.max_iterations`. Nodes that end up where they
/// started are returned borrowed, so callers can detect "nothing moved"
/// without comparing coordinates.
pub fn resolve_collisions_with<'a>(
    nodes: &'a [GraphNode],
    options: &CollisionOptions,
    geometry: &NodeGeometry,
) -> Vec<Cow<'a, GraphNode>> {
    if nodes.len() <= 1 {
        return nodes.iter().map(Cow::Borrowed).collect();
    }

    let margin = if options.margin.is_finite() {
        options.margin.max(0.0)
    } else {
        0.0
    };
    let threshold = options.overlap_threshold;
    let mut boxes: Vec<BoundingBox> = nodes
        .iter()
        .map(|node| BoundingBox::for_node(node, geometry))
        .collect();

    let mut passes = 0usize;
    let mut converged = false;
    while passes < options.max_iterations {
        passes += 1;
        let mut collided = false;
        for i in 0..boxes.len() {
            for j in (i + 1)..boxes.len() {
                let (head, tail) = boxes.split_at_mut(j);
                let a = &mut head[i];
                let b = &mut tail[0];
                let (overlap_x, overlap_y) = overlap(a, b, margin);
                if overlap_x <= threshold || overlap_y <= threshold {
                    continue;
                }
                collided = true;
                if overlap_x <= overlap_y {
                    separate(a, b, Axis::X, overlap_x);
                } else {
                    separate(a, b, Axis::Y, overlap_y);
                }
            }
        }
        if !collided {
            converged = true;
            break;
        }
    }

    let resolved: Vec<Cow<'a, GraphNode>> = nodes
        .iter()
        .zip(&boxes)
        .map(|(node, bbox)| {
            let dx = (bbox.x - node.position.x).abs();
            let dy = (bbox.y - node.position.y).abs();
            if dx < MOVE_EPSILON && dy < MOVE_EPSILON {
                Cow::Borrowed(node)
            } else {
                Cow::Owned(node.with_position(Point::new(bbox.x, bbox.y)))
            }
        })
        .collect();

    let moved = resolved
        .iter()
        .filter(|node| matches!(node, Cow::Owned(_)))
        .count();
    tracing::debug!(
        nodes = nodes.len(),
        passes,
        converged,
        moved,
        "collision resolution finished"
    );
    if !converged && options.max_iterations > 0 {
        tracing::trace!("collision resolution hit the iteration cap");
    }

    resolved
}
