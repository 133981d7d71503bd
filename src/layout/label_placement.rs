use crate::config::LabelConfig;
use crate::ir::{Point, Relationship, RelationshipKind};

use super::geometry::EdgeEndpoints;
use super::types::{LabelDirection, LabelLayout};

/// Point at `ratio` along the segment from `source` to `target`.
///
/// Weighted form so that `ratio == 0.0` and `ratio == 1.0` reproduce the
/// endpoints bit for bit.
pub fn label_position_on_edge(source: Point, target: Point, ratio: f64) -> Point {
    let keep = 1.0 - ratio;
    Point::new(
        source.x * keep + target.x * ratio,
        source.y * keep + target.y * ratio,
    )
}

fn label_text(label: Option<&str>) -> Option<String> {
    label
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Labels for one relationship drawn between `endpoints`.
///
/// Dual-directed relationships get two labels, the source -> target one
/// nearer the source. Everything else gets at most one label in the middle.
pub fn edge_labels(
    relationship: &Relationship,
    endpoints: &EdgeEndpoints,
    config: &LabelConfig,
) -> Vec<LabelLayout> {
    let forward = label_text(relationship.source_to_target_label.as_deref());
    let backward = label_text(relationship.target_to_source_label.as_deref());
    let at = |ratio: f64| {
        label_position_on_edge(endpoints.source_point, endpoints.target_point, ratio)
    };

    match relationship.kind() {
        RelationshipKind::DualDirected => {
            let mut labels = Vec::with_capacity(2);
            if let Some(text) = forward {
                labels.push(LabelLayout {
                    text,
                    point: at(config.forward_ratio),
                    direction: LabelDirection::Forward,
                });
            }
            if let Some(text) = backward {
                labels.push(LabelLayout {
                    text,
                    point: at(config.backward_ratio),
                    direction: LabelDirection::Backward,
                });
            }
            labels
        }
        RelationshipKind::Undirected | RelationshipKind::Bidirectional => forward
            .or(backward)
            .map(|text| LabelLayout {
                text,
                point: at(config.single_ratio),
                direction: LabelDirection::Both,
            })
            .into_iter()
            .collect(),
        RelationshipKind::OneWay => {
            let direction = if relationship.is_reversed() {
                LabelDirection::Backward
            } else {
                LabelDirection::Forward
            };
            forward
                .or(backward)
                .map(|text| LabelLayout {
                    text,
                    point: at(config.single_ratio),
                    direction,
                })
                .into_iter()
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> EdgeEndpoints {
        EdgeEndpoints {
            source_point: Point::new(0.1, -7.3),
            target_point: Point::new(123.7, 45.9),
        }
    }

    fn relationship(directed: bool, forward: Option<&str>, backward: Option<&str>) -> Relationship {
        Relationship {
            directed,
            source_to_target_label: forward.map(str::to_string),
            target_to_source_label: backward.map(str::to_string),
            ..Relationship::new("r", "a", "b")
        }
    }

    #[test]
    fn ratio_endpoints_are_exact() {
        let ends = endpoints();
        let at = |ratio| label_position_on_edge(ends.source_point, ends.target_point, ratio);
        assert_eq!(at(0.0), ends.source_point);
        assert_eq!(at(1.0), ends.target_point);
    }

    #[test]
    fn half_ratio_is_midpoint() {
        let mid = label_position_on_edge(Point::new(0.0, 0.0), Point::new(10.0, -4.0), 0.5);
        assert_eq!(mid, Point::new(5.0, -2.0));
    }

    #[test]
    fn dual_directed_gets_two_labels() {
        let rel = relationship(true, Some("parent of"), Some("child of"));
        let labels = edge_labels(&rel, &endpoints(), &LabelConfig::default());
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].text, "parent of");
        assert_eq!(labels[0].direction, LabelDirection::Forward);
        assert_eq!(labels[1].direction, LabelDirection::Backward);
        let source = endpoints().source_point;
        assert!(labels[0].point.distance_to(source) < labels[1].point.distance_to(source));
    }

    #[test]
    fn shared_label_sits_in_the_middle() {
        let ends = EdgeEndpoints {
            source_point: Point::new(0.0, 0.0),
            target_point: Point::new(100.0, 0.0),
        };
        for rel in [
            relationship(true, Some("sibling"), Some("sibling")),
            relationship(false, Some("friend"), Some("friend")),
        ] {
            let labels = edge_labels(&rel, &ends, &LabelConfig::default());
            assert_eq!(labels.len(), 1);
            assert_eq!(labels[0].direction, LabelDirection::Both);
            assert_eq!(labels[0].point, Point::new(50.0, 0.0));
        }
    }

    #[test]
    fn one_way_label_tracks_direction() {
        let rel = relationship(true, None, Some("owned by"));
        let labels = edge_labels(&rel, &endpoints(), &LabelConfig::default());
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "owned by");
        assert_eq!(labels[0].direction, LabelDirection::Backward);
    }

    #[test]
    fn unlabelled_edges_have_no_labels() {
        let config = LabelConfig::default();
        let labels = edge_labels(&relationship(true, None, None), &endpoints(), &config);
        assert!(labels.is_empty());
        let labels = edge_labels(&relationship(false, Some(" "), None), &endpoints(), &config);
        assert!(labels.is_empty());
    }
}
