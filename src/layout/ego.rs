use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::f64::consts::PI;

use crate::config::RadialParams;
use crate::ir::{Graph, Point, Relationship};

/// Hop count from the center. Unreachable nodes have no entry.
pub type DistanceMap = HashMap<String, usize>;
pub type PositionMap = BTreeMap<String, Point>;

// Each ring is rotated by this much relative to the previous one.
const RING_ANGLE_OFFSET: f64 = PI / 6.0;

/// Breadth-first hop distances from `center_id`, treating every relationship
/// as undirected.
///
/// Relationships touching ids outside `node_ids` are skipped. The center is
/// always present with distance 0.
pub fn compute_graph_distances(
    center_id: &str,
    node_ids: &[&str],
    edges: &[Relationship],
) -> DistanceMap {
    let known: HashSet<&str> = node_ids
        .iter()
        .copied()
        .chain(std::iter::once(center_id))
        .collect();

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        let (source, target) = (edge.source.as_str(), edge.target.as_str());
        if !known.contains(source) || !known.contains(target) {
            tracing::trace!(edge = %edge.id, "skipping relationship with unknown endpoint");
            continue;
        }
        adjacency.entry(source).or_default().push(target);
        adjacency.entry(target).or_default().push(source);
    }

    let mut distances = DistanceMap::new();
    distances.insert(center_id.to_string(), 0);
    let mut queue = VecDeque::from([(center_id, 0usize)]);
    while let Some((id, distance)) = queue.pop_front() {
        let Some(neighbors) = adjacency.get(id) else {
            continue;
        };
        for &neighbor in neighbors {
            if distances.contains_key(neighbor) {
                continue;
            }
            distances.insert(neighbor.to_string(), distance + 1);
            queue.push_back((neighbor, distance + 1));
        }
    }

    tracing::debug!(
        center = center_id,
        reachable = distances.len(),
        total = node_ids.len(),
        "computed graph distances"
    );
    distances
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

fn place_ring(
    positions: &mut PositionMap,
    ids: &[&str],
    ring: usize,
    radius: f64,
    center: Point,
) {
    if ids.is_empty() {
        return;
    }
    let step = 2.0 * PI / ids.len() as f64;
    let offset = ring as f64 * RING_ANGLE_OFFSET;
    for (idx, id) in ids.iter().enumerate() {
        let angle = offset + idx as f64 * step;
        positions.insert(
            (*id).to_string(),
            Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin()),
        );
    }
}

/// Places nodes on concentric rings around `center` by graph distance.
///
/// Ring `k` has radius `first_ring_radius + (k - 1) * ring_spacing`; its nodes
/// are spread evenly, starting at `k * 30°`. Nodes missing from `distances`
/// share one extra ring just beyond the farthest reachable one.
pub fn compute_radial_positions(
    center_id: &str,
    distances: &DistanceMap,
    all_node_ids: &[&str],
    params: &RadialParams,
    center: Point,
) -> PositionMap {
    let first_ring_radius = sanitize(params.first_ring_radius);
    let ring_spacing = sanitize(params.ring_spacing);

    let mut rings: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
    let mut unreachable: Vec<&str> = Vec::new();
    for &id in all_node_ids {
        if id == center_id {
            continue;
        }
        match distances.get(id) {
            Some(&distance) => rings.entry(distance.max(1)).or_default().push(id),
            None => unreachable.push(id),
        }
    }

    let mut positions = PositionMap::new();
    positions.insert(center_id.to_string(), center);

    for (&ring, ids) in &rings {
        let radius = first_ring_radius + (ring - 1) as f64 * ring_spacing;
        place_ring(&mut positions, ids, ring, radius, center);
    }

    let max_distance = rings.keys().next_back().copied().unwrap_or(0);
    let outer_radius = first_ring_radius + max_distance as f64 * ring_spacing;
    place_ring(&mut positions, &unreachable, max_distance + 1, outer_radius, center);

    tracing::debug!(
        rings = rings.len(),
        unreachable = unreachable.len(),
        "placed radial rings"
    );
    positions
}

/// Highest-degree node, first in document order on ties. Used when no center
/// was chosen explicitly.
pub fn choose_center(graph: &Graph) -> Option<&str> {
    let mut best: Option<(&str, usize)> = None;
    for (id, degree) in graph.degrees() {
        match best {
            Some((_, best_degree)) if degree <= best_degree => {}
            _ => best = Some((id, degree)),
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::NodeKind;

    const EPS: f64 = 1e-9;

    fn rel(source: &str, target: &str) -> Relationship {
        Relationship::new(&format!("{source}-{target}"), source, target)
    }

    fn directed(source: &str, target: &str) -> Relationship {
        Relationship {
            directed: true,
            ..rel(source, target)
        }
    }

    fn angle_of(point: Point, center: Point) -> f64 {
        (point.y - center.y).atan2(point.x - center.x).rem_euclid(2.0 * PI)
    }

    #[test]
    fn center_only_graph() {
        let distances = compute_graph_distances("A", &["A"], &[]);
        assert_eq!(distances.len(), 1);
        assert_eq!(distances["A"], 0);
        let positions = compute_radial_positions(
            "A",
            &distances,
            &["A"],
            &RadialParams::default(),
            Point::new(400.0, 300.0),
        );
        assert_eq!(positions.len(), 1);
        assert_eq!(positions["A"], Point::new(400.0, 300.0));
    }

    #[test]
    fn direction_is_ignored_for_reachability() {
        let edges = [directed("B", "A"), directed("C", "B")];
        let distances = compute_graph_distances("A", &["A", "B", "C"], &edges);
        assert_eq!(distances["B"], 1);
        assert_eq!(distances["C"], 2);
    }

    #[test]
    fn shortest_path_wins() {
        let edges = [rel("A", "B"), rel("B", "C"), rel("A", "C")];
        let distances = compute_graph_distances("A", &["A", "B", "C"], &edges);
        assert_eq!(distances["C"], 1);
    }

    #[test]
    fn unreachable_nodes_are_absent() {
        let edges = [rel("A", "B"), rel("C", "D")];
        let distances = compute_graph_distances("A", &["A", "B", "C", "D"], &edges);
        assert_eq!(distances.len(), 2);
        assert!(!distances.contains_key("C"));
        assert!(!distances.contains_key("D"));
    }

    #[test]
    fn dangling_relationships_are_ignored() {
        let edges = [rel("A", "ghost"), rel("ghost", "B")];
        let distances = compute_graph_distances("A", &["A", "B"], &edges);
        assert_eq!(distances.len(), 1);
        assert!(!distances.contains_key("ghost"));
    }

    #[test]
    fn adjacent_distances_differ_by_at_most_one() {
        let ids = ["A", "B", "C", "D", "E", "F", "G"];
        let edges = [
            rel("A", "B"),
            rel("B", "C"),
            rel("C", "D"),
            rel("D", "A"),
            rel("C", "E"),
            rel("E", "F"),
            rel("B", "F"),
        ];
        let distances = compute_graph_distances("A", &ids, &edges);
        assert_eq!(distances.len(), 6);
        for edge in &edges {
            let a = distances[edge.source.as_str()] as i64;
            let b = distances[edge.target.as_str()] as i64;
            assert!((a - b).abs() <= 1, "{} -> {}", edge.source, edge.target);
        }
        assert!(!distances.contains_key("G"));
    }

    #[test]
    fn rings_use_configured_radii() {
        let ids = ["A", "B", "C"];
        let edges = [rel("A", "B"), rel("B", "C")];
        let center = Point::new(400.0, 300.0);
        let params = RadialParams {
            ring_spacing: 200.0,
            first_ring_radius: 200.0,
        };
        let distances = compute_graph_distances("A", &ids, &edges);
        let positions = compute_radial_positions("A", &distances, &ids, &params, center);
        assert!((positions["B"].distance_to(center) - 200.0).abs() < EPS);
        assert!((positions["C"].distance_to(center) - 400.0).abs() < EPS);
    }

    #[test]
    fn ring_members_are_evenly_spaced() {
        let ids = ["hub", "a", "b", "c", "d", "e"];
        let edges: Vec<Relationship> = ids[1..].iter().map(|id| rel("hub", id)).collect();
        let center = Point::new(0.0, 0.0);
        let distances = compute_graph_distances("hub", &ids, &edges);
        let positions =
            compute_radial_positions("hub", &distances, &ids, &RadialParams::default(), center);

        let mut angles: Vec<f64> = ids[1..]
            .iter()
            .map(|id| angle_of(positions[*id], center))
            .collect();
        angles.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected = 2.0 * PI / 5.0;
        for pair in angles.windows(2) {
            assert!((pair[1] - pair[0] - expected).abs() < 1e-9);
        }
        assert!((angles[0] + 2.0 * PI - angles[4] - expected).abs() < 1e-9);
    }

    #[test]
    fn each_ring_is_rotated_thirty_degrees() {
        let ids = ["A", "B", "C"];
        let edges = [rel("A", "B"), rel("B", "C")];
        let center = Point::new(0.0, 0.0);
        let distances = compute_graph_distances("A", &ids, &edges);
        let positions =
            compute_radial_positions("A", &distances, &ids, &RadialParams::default(), center);
        assert!((angle_of(positions["B"], center) - PI / 6.0).abs() < EPS);
        assert!((angle_of(positions["C"], center) - PI / 3.0).abs() < EPS);
    }

    #[test]
    fn unreachable_ring_sits_one_step_out() {
        let ids = ["A", "B", "C", "X", "Y"];
        let edges = [rel("A", "B"), rel("B", "C"), rel("X", "Y")];
        let center = Point::new(10.0, 20.0);
        let params = RadialParams {
            ring_spacing: 150.0,
            first_ring_radius: 100.0,
        };
        let distances = compute_graph_distances("A", &ids, &edges);
        let positions = compute_radial_positions("A", &distances, &ids, &params, center);
        assert_eq!(positions.len(), 5);
        for id in ["X", "Y"] {
            assert!((positions[id].distance_to(center) - 400.0).abs() < EPS);
        }
        let gap = (angle_of(positions["X"], center) - angle_of(positions["Y"], center)).abs();
        assert!((gap - PI).abs() < EPS);
    }

    #[test]
    fn isolated_nodes_use_first_ring_radius() {
        let ids = ["A", "B", "C"];
        let center = Point::new(0.0, 0.0);
        let distances = compute_graph_distances("A", &ids, &[]);
        let positions =
            compute_radial_positions("A", &distances, &ids, &RadialParams::default(), center);
        assert!((positions["B"].distance_to(center) - 200.0).abs() < EPS);
        assert!((positions["C"].distance_to(center) - 200.0).abs() < EPS);
    }

    #[test]
    fn negative_params_are_clamped() {
        let ids = ["A", "B"];
        let edges = [rel("A", "B")];
        let center = Point::new(5.0, 5.0);
        let params = RadialParams {
            ring_spacing: -10.0,
            first_ring_radius: f64::NAN,
        };
        let distances = compute_graph_distances("A", &ids, &edges);
        let positions = compute_radial_positions("A", &distances, &ids, &params, center);
        assert!(positions["B"].distance_to(center) < EPS);
    }

    #[test]
    fn chooses_highest_degree_center() {
        let mut graph = Graph::new();
        for id in ["A", "B", "C", "D"] {
            graph.ensure_node(id, NodeKind::Person);
        }
        graph.connect("A", "B");
        graph.connect("C", "B");
        graph.connect("C", "D");
        assert_eq!(choose_center(&graph), Some("B"));
        assert_eq!(choose_center(&Graph::new()), None);
    }
}
