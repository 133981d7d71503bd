use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Visual kind of a node. People render as circular avatars, items as squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Person,
    Item,
}

impl NodeKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "person" | "people" => Some(Self::Person),
            "item" => Some(Self::Item),
            _ => None,
        }
    }

    pub fn shape(self) -> NodeShape {
        match self {
            Self::Person => NodeShape::Circle,
            Self::Item => NodeShape::Rectangle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Circle,
    Rectangle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    /// Top-left corner of the node's bounding box.
    pub position: Point,
    /// Declared box size. Defaults apply when absent.
    pub size: Option<Size>,
    /// Size reported by the renderer after the node was drawn.
    pub measured: Option<Size>,
}

impl GraphNode {
    pub fn new(id: &str, kind: NodeKind, position: Point) -> Self {
        Self {
            id: id.to_string(),
            label: id.to_string(),
            kind,
            position,
            size: None,
            measured: None,
        }
    }

    pub fn with_position(&self, position: Point) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub id: String,
    pub source: String,
    pub target: String,
    pub directed: bool,
    pub source_to_target_label: Option<String>,
    pub target_to_source_label: Option<String>,
}

/// How a relationship is drawn. Derived from the labels, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    Undirected,
    Bidirectional,
    DualDirected,
    OneWay,
}

impl RelationshipKind {
    /// Arrowheads as `(at_source, at_target)`.
    pub fn arrows(self, reversed: bool) -> (bool, bool) {
        match self {
            Self::Undirected => (false, false),
            Self::Bidirectional | Self::DualDirected => (true, true),
            Self::OneWay if reversed => (true, false),
            Self::OneWay => (false, true),
        }
    }
}

impl Relationship {
    pub fn new(id: &str, source: &str, target: &str) -> Self {
        Self {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            directed: false,
            source_to_target_label: None,
            target_to_source_label: None,
        }
    }

    pub fn kind(&self) -> RelationshipKind {
        if !self.directed {
            return RelationshipKind::Undirected;
        }
        match (
            non_empty(self.source_to_target_label.as_deref()),
            non_empty(self.target_to_source_label.as_deref()),
        ) {
            (Some(forward), Some(backward)) if forward == backward => {
                RelationshipKind::Bidirectional
            }
            (Some(_), Some(_)) => RelationshipKind::DualDirected,
            _ => RelationshipKind::OneWay,
        }
    }

    /// True when the only label present runs target -> source, so a one-way
    /// arrow points back at the source.
    pub fn is_reversed(&self) -> bool {
        non_empty(self.source_to_target_label.as_deref()).is_none()
            && non_empty(self.target_to_source_label.as_deref()).is_some()
    }

    pub fn arrows(&self) -> (bool, bool) {
        self.kind().arrows(self.is_reversed())
    }
}

fn non_empty(label: Option<&str>) -> Option<&str> {
    label.map(str::trim).filter(|text| !text.is_empty())
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub relationships: Vec<Relationship>,
    pub center: Option<String>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.id.as_str()).collect()
    }

    pub fn ensure_node(&mut self, id: &str, kind: NodeKind) -> &mut GraphNode {
        let idx = match self.nodes.iter().position(|node| node.id == id) {
            Some(idx) => idx,
            None => {
                self.nodes.push(GraphNode::new(id, kind, Point::default()));
                self.nodes.len() - 1
            }
        };
        &mut self.nodes[idx]
    }

    pub fn connect(&mut self, source: &str, target: &str) -> &mut Relationship {
        let id = (self.relationships.len() + 1..)
            .map(|n| format!("r{n}"))
            .find(|id| self.relationships.iter().all(|rel| &rel.id != id))
            .unwrap_or_default();
        self.relationships.push(Relationship::new(&id, source, target));
        let last = self.relationships.len() - 1;
        &mut self.relationships[last]
    }

    /// Number of relationships touching each node, in node order.
    pub fn degrees(&self) -> Vec<(&str, usize)> {
        self.nodes
            .iter()
            .map(|node| {
                let degree = self
                    .relationships
                    .iter()
                    .filter(|rel| rel.source == node.id || rel.target == node.id)
                    .count();
                (node.id.as_str(), degree)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(directed: bool, forward: Option<&str>, backward: Option<&str>) -> Relationship {
        Relationship {
            directed,
            source_to_target_label: forward.map(str::to_string),
            target_to_source_label: backward.map(str::to_string),
            ..Relationship::new("r", "a", "b")
        }
    }

    #[test]
    fn classifies_relationships() {
        assert_eq!(
            labelled(false, Some("friend"), Some("friend")).kind(),
            RelationshipKind::Undirected
        );
        assert_eq!(
            labelled(true, Some("sibling"), Some("sibling")).kind(),
            RelationshipKind::Bidirectional
        );
        assert_eq!(
            labelled(true, Some("parent of"), Some("child of")).kind(),
            RelationshipKind::DualDirected
        );
        assert_eq!(labelled(true, Some("mentor of"), None).kind(), RelationshipKind::OneWay);
        assert_eq!(labelled(true, None, Some("owned by")).kind(), RelationshipKind::OneWay);
        assert_eq!(labelled(true, Some("  "), None).kind(), RelationshipKind::OneWay);
    }

    #[test]
    fn one_way_arrow_follows_the_present_label() {
        assert_eq!(labelled(true, Some("likes"), None).arrows(), (false, true));
        assert_eq!(labelled(true, None, Some("likes")).arrows(), (true, false));
        assert_eq!(labelled(false, None, None).arrows(), (false, false));
        assert_eq!(labelled(true, Some("a"), Some("b")).arrows(), (true, true));
    }

    #[test]
    fn ensure_node_is_idempotent() {
        let mut graph = Graph::new();
        graph.ensure_node("A", NodeKind::Person);
        graph.ensure_node("A", NodeKind::Item);
        graph.ensure_node("B", NodeKind::Item);
        assert_eq!(graph.node_ids(), vec!["A", "B"]);
        assert_eq!(graph.node("A").map(|node| node.kind), Some(NodeKind::Person));
    }

    #[test]
    fn degrees_count_both_endpoints() {
        let mut graph = Graph::new();
        graph.ensure_node("A", NodeKind::Person);
        graph.ensure_node("B", NodeKind::Person);
        graph.ensure_node("C", NodeKind::Person);
        graph.connect("A", "B");
        graph.connect("C", "A");
        assert_eq!(graph.degrees(), vec![("A", 2), ("B", 1), ("C", 1)]);
    }

    #[test]
    fn connect_skips_ids_already_in_use() {
        let mut graph = Graph::new();
        graph.relationships.push(Relationship::new("r2", "A", "B"));
        graph.connect("B", "C");
        graph.connect("C", "A");
        let ids: Vec<&str> = graph.relationships.iter().map(|rel| rel.id.as_str()).collect();
        assert_eq!(ids, vec!["r2", "r3", "r4"]);
    }
}
