use crate::ir::{Graph, GraphNode, NodeKind, Point, Relationship, Size};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid JSON graph document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid JSON5 graph document: {0}")]
    Json5(#[from] json5::Error),
    #[error("node at index {index} has an empty id")]
    EmptyId { index: usize },
    #[error("duplicate node id '{id}'")]
    DuplicateNode { id: String },
    #[error("duplicate relationship id '{id}'")]
    DuplicateRelationship { id: String },
    #[error("node '{id}' has unknown kind '{kind}'")]
    UnknownKind { id: String, kind: String },
    #[error("node '{id}' has invalid geometry: {reason}")]
    InvalidGeometry { id: String, reason: &'static str },
    #[error("relationship '{relationship}' references unknown node '{node}'")]
    UnknownNode { relationship: String, node: String },
    #[error("relationship '{id}' connects a node to itself")]
    SelfRelationship { id: String },
    #[error("center '{id}' is not a node of the graph")]
    UnknownCenter { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    #[default]
    Json,
    Json5,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json5") => Self::Json5,
            _ => Self::Json,
        }
    }
}

#[derive(Debug, Default)]
pub struct ParseOutput {
    pub graph: Graph,
    /// Layout settings stored alongside the graph, in config-file shape.
    pub layout_settings: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphDocument {
    #[serde(alias = "people")]
    nodes: Vec<NodeDocument>,
    #[serde(default, alias = "edges")]
    relationships: Vec<RelationshipDocument>,
    center: Option<String>,
    layout: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeDocument {
    id: String,
    #[serde(alias = "label")]
    name: Option<String>,
    #[serde(alias = "type")]
    kind: Option<String>,
    position: Option<Point>,
    size: Option<Size>,
    measured: Option<Size>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelationshipDocument {
    id: Option<String>,
    #[serde(alias = "sourceId")]
    source: String,
    #[serde(alias = "targetId")]
    target: String,
    #[serde(default)]
    directed: bool,
    source_to_target_label: Option<String>,
    target_to_source_label: Option<String>,
    /// Shorthand for an undirected relationship's shared label.
    label: Option<String>,
}

pub fn parse_graph(input: &str, format: InputFormat) -> Result<ParseOutput, ParseError> {
    let document: GraphDocument = match format {
        InputFormat::Json => serde_json::from_str(input)?,
        InputFormat::Json5 => json5::from_str(input)?,
    };
    build_graph(document)
}

fn check_size(id: &str, size: Option<Size>) -> Result<(), ParseError> {
    let Some(size) = size else {
        return Ok(());
    };
    if !size.width.is_finite() || !size.height.is_finite() {
        return Err(ParseError::InvalidGeometry {
            id: id.to_string(),
            reason: "size must be finite",
        });
    }
    if size.width < 0.0 || size.height < 0.0 {
        return Err(ParseError::InvalidGeometry {
            id: id.to_string(),
            reason: "size must not be negative",
        });
    }
    Ok(())
}

fn build_node(index: usize, doc: NodeDocument) -> Result<GraphNode, ParseError> {
    let id = doc.id.trim().to_string();
    if id.is_empty() {
        return Err(ParseError::EmptyId { index });
    }
    let kind = match doc.kind.as_deref() {
        None => NodeKind::default(),
        Some(token) => NodeKind::from_token(&token.to_ascii_lowercase()).ok_or_else(|| {
            ParseError::UnknownKind {
                id: id.clone(),
                kind: token.to_string(),
            }
        })?,
    };
    let position = doc.position.unwrap_or_default();
    if !position.x.is_finite() || !position.y.is_finite() {
        return Err(ParseError::InvalidGeometry {
            id,
            reason: "position must be finite",
        });
    }
    check_size(&id, doc.size)?;
    check_size(&id, doc.measured)?;
    Ok(GraphNode {
        label: doc.name.unwrap_or_else(|| id.clone()),
        id,
        kind,
        position,
        size: doc.size,
        measured: doc.measured,
    })
}

fn build_relationship(id: String, doc: RelationshipDocument) -> Relationship {
    let (forward, backward) = if doc.directed {
        (doc.source_to_target_label, doc.target_to_source_label)
    } else {
        // Undirected relationships keep both labels equal.
        let shared = doc
            .label
            .or(doc.source_to_target_label)
            .or(doc.target_to_source_label);
        (shared.clone(), shared)
    };
    Relationship {
        id,
        source: doc.source.trim().to_string(),
        target: doc.target.trim().to_string(),
        directed: doc.directed,
        source_to_target_label: forward,
        target_to_source_label: backward,
    }
}

fn fallback_id(start: usize, taken: impl Fn(&str) -> bool) -> String {
    (start..)
        .map(|n| format!("r{n}"))
        .find(|id| !taken(id.as_str()))
        .unwrap_or_default()
}

fn build_graph(document: GraphDocument) -> Result<ParseOutput, ParseError> {
    let mut graph = Graph::new();
    let mut seen: HashSet<String> = HashSet::new();
    for (index, doc) in document.nodes.into_iter().enumerate() {
        let node = build_node(index, doc)?;
        if !seen.insert(node.id.clone()) {
            return Err(ParseError::DuplicateNode { id: node.id });
        }
        graph.nodes.push(node);
    }

    // Generated ids must not shadow ids given later in the document.
    let explicit_ids: HashSet<String> = document
        .relationships
        .iter()
        .filter_map(|doc| doc.id.clone())
        .collect();
    let mut relationship_ids: HashSet<String> = HashSet::new();
    for (index, doc) in document.relationships.into_iter().enumerate() {
        let id = match doc.id.clone() {
            Some(id) => id,
            None => fallback_id(index + 1, |id| {
                explicit_ids.contains(id) || relationship_ids.contains(id)
            }),
        };
        let relationship = build_relationship(id, doc);
        for endpoint in [&relationship.source, &relationship.target] {
            if !seen.contains(endpoint) {
                return Err(ParseError::UnknownNode {
                    relationship: relationship.id.clone(),
                    node: endpoint.clone(),
                });
            }
        }
        if relationship.source == relationship.target {
            return Err(ParseError::SelfRelationship {
                id: relationship.id,
            });
        }
        if !relationship_ids.insert(relationship.id.clone()) {
            return Err(ParseError::DuplicateRelationship {
                id: relationship.id,
            });
        }
        graph.relationships.push(relationship);
    }

    if let Some(center) = document.center.as_deref().map(str::trim) {
        if !seen.contains(center) {
            return Err(ParseError::UnknownCenter {
                id: center.to_string(),
            });
        }
        graph.center = Some(center.to_string());
    }

    tracing::debug!(
        nodes = graph.nodes.len(),
        relationships = graph.relationships.len(),
        "parsed graph document"
    );
    Ok(ParseOutput {
        graph,
        layout_settings: document.layout,
    })
}
