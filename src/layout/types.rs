use serde::Serialize;

use crate::ir::{NodeKind, NodeShape, Point, RelationshipKind};

use super::ego::PositionMap;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Where connectors aim; see `geometry::node_center`.
    pub anchor: Point,
    /// Hop distance from the ego center, when the ego layout ran and reached it.
    pub distance: Option<usize>,
    /// Whether collision resolution displaced the node.
    pub moved: bool,
}

impl NodeLayout {
    pub fn shape(&self) -> NodeShape {
        self.kind.shape()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelDirection {
    /// Describes source -> target.
    Forward,
    /// Describes target -> source.
    Backward,
    Both,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub text: String,
    pub point: Point,
    pub direction: LabelDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLayout {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: RelationshipKind,
    pub arrow_start: bool,
    pub arrow_end: bool,
    pub source_point: Point,
    pub target_point: Point,
    pub labels: Vec<LabelLayout>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub center: Option<String>,
    pub nodes: Vec<NodeLayout>,
    pub edges: Vec<EdgeLayout>,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&EdgeLayout> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    /// Final node origins, ready to be merged back into the graph.
    pub fn positions(&self) -> PositionMap {
        self.nodes
            .iter()
            .map(|node| (node.id.clone(), Point::new(node.x, node.y)))
            .collect()
    }

    /// Extent of every node box and label point, or `None` for an empty layout.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.nodes.first()?;
        let mut bounds = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for node in &self.nodes {
            bounds.include(node.x, node.y);
            bounds.include(node.x + node.width, node.y + node.height);
        }
        for label in self.edges.iter().flat_map(|edge| &edge.labels) {
            bounds.include(label.point.x, label.point.y);
        }
        Some(bounds)
    }
}
