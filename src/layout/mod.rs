pub mod collision;
pub mod ego;
pub mod geometry;
pub mod label_placement;
pub(crate) mod types;
pub use types::*;

pub use collision::{resolve_collisions, resolve_collisions_with};
pub use ego::{
    DistanceMap, PositionMap, choose_center, compute_graph_distances, compute_radial_positions,
};
pub use geometry::{
    EdgeEndpoints, circle_intersection, edge_intersection_points, edge_intersection_points_with,
    node_center, rect_intersection,
};
pub use label_placement::label_position_on_edge;

use crate::config::{LayoutConfig, LayoutMode, NodeGeometry};
use crate::ir::{Graph, GraphNode};
use std::borrow::Cow;
use std::collections::HashMap;

/// Runs the full pipeline over a graph snapshot: placement (ego rings or the
/// incoming positions), collision resolution, connector endpoints and labels.
pub fn compute_layout(graph: &Graph, config: &LayoutConfig) -> Layout {
    let (placed, center, distances) = match config.mode {
        LayoutMode::Ego => place_ego(graph, config),
        LayoutMode::Preserve => (graph.nodes.clone(), None, None),
    };

    let resolved = resolve_collisions_with(&placed, &config.collision, &config.geometry);
    let nodes: Vec<NodeLayout> = resolved
        .iter()
        .map(|node| {
            let moved = matches!(node, Cow::Owned(_));
            let distance = distances
                .as_ref()
                .and_then(|map| map.get(node.id.as_str()).copied());
            node_layout(node, &config.geometry, distance, moved)
        })
        .collect();

    let by_id: HashMap<&str, &GraphNode> = resolved
        .iter()
        .map(|node| (node.id.as_str(), node.as_ref()))
        .collect();

    let mut edges = Vec::with_capacity(graph.relationships.len());
    for relationship in &graph.relationships {
        let (Some(source), Some(target)) = (
            by_id.get(relationship.source.as_str()),
            by_id.get(relationship.target.as_str()),
        ) else {
            tracing::warn!(
                edge = %relationship.id,
                "relationship references a missing node, skipped"
            );
            continue;
        };
        if relationship.source == relationship.target {
            tracing::warn!(edge = %relationship.id, "self relationship has no connector, skipped");
            continue;
        }
        let endpoints = edge_intersection_points_with(source, target, &config.geometry);
        let kind = relationship.kind();
        let (arrow_start, arrow_end) = relationship.arrows();
        edges.push(EdgeLayout {
            id: relationship.id.clone(),
            source: relationship.source.clone(),
            target: relationship.target.clone(),
            kind,
            arrow_start,
            arrow_end,
            source_point: endpoints.source_point,
            target_point: endpoints.target_point,
            labels: label_placement::edge_labels(relationship, &endpoints, &config.labels),
        });
    }

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        mode = ?config.mode,
        "layout computed"
    );

    Layout {
        center,
        nodes,
        edges,
    }
}

fn place_ego(
    graph: &Graph,
    config: &LayoutConfig,
) -> (Vec<GraphNode>, Option<String>, Option<DistanceMap>) {
    let center_id = match graph.center.as_deref() {
        Some(id) if graph.node(id).is_some() => Some(id),
        Some(id) => {
            tracing::warn!(center = id, "center node not found, choosing by degree");
            choose_center(graph)
        }
        None => choose_center(graph),
    };
    let Some(center_id) = center_id else {
        return (graph.nodes.clone(), None, None);
    };

    let node_ids = graph.node_ids();
    let distances = compute_graph_distances(center_id, &node_ids, &graph.relationships);
    let positions = compute_radial_positions(
        center_id,
        &distances,
        &node_ids,
        &config.ego.params,
        config.ego.center,
    );
    let placed = graph
        .nodes
        .iter()
        .map(|node| match positions.get(&node.id) {
            Some(&position) => node.with_position(position),
            None => node.clone(),
        })
        .collect();
    (placed, Some(center_id.to_string()), Some(distances))
}

fn node_layout(
    node: &GraphNode,
    geometry: &NodeGeometry,
    distance: Option<usize>,
    moved: bool,
) -> NodeLayout {
    let size = node.measured.or(node.size);
    NodeLayout {
        id: node.id.clone(),
        label: node.label.clone(),
        kind: node.kind,
        x: node.position.x,
        y: node.position.y,
        width: size.map(|s| s.width).unwrap_or(geometry.default_width),
        height: size.map(|s| s.height).unwrap_or(geometry.default_height),
        anchor: node_center(node, geometry),
        distance,
        moved,
    }
}

/// Writes computed positions back onto the graph's nodes.
pub fn apply_positions(graph: &mut Graph, positions: &PositionMap) {
    for node in &mut graph.nodes {
        if let Some(&position) = positions.get(&node.id) {
            node.position = position;
        }
    }
}
