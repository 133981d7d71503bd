use crate::ir::{NodeKind, Point, RelationshipKind};
use crate::layout::{LabelDirection, Layout};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub center: Option<String>,
    pub bounds: Option<[f64; 4]>,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub anchor: Point,
    pub distance: Option<usize>,
    pub moved: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: RelationshipKind,
    pub arrow_start: bool,
    pub arrow_end: bool,
    pub points: [Point; 2],
    pub labels: Vec<LabelDump>,
}

#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub direction: LabelDirection,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                label: node.label.clone(),
                kind: node.kind,
                position: Point::new(node.x, node.y),
                width: node.width,
                height: node.height,
                anchor: node.anchor,
                distance: node.distance,
                moved: node.moved,
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                kind: edge.kind,
                arrow_start: edge.arrow_start,
                arrow_end: edge.arrow_end,
                points: [edge.source_point, edge.target_point],
                labels: edge
                    .labels
                    .iter()
                    .map(|label| LabelDump {
                        text: label.text.clone(),
                        x: label.point.x,
                        y: label.point.y,
                        direction: label.direction,
                    })
                    .collect(),
            })
            .collect();

        LayoutDump {
            center: layout.center.clone(),
            bounds: layout
                .bounds()
                .map(|b| [b.min_x, b.min_y, b.max_x, b.max_y]),
            nodes,
            edges,
        }
    }
}

pub fn layout_dump_json(layout: &Layout) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&LayoutDump::from_layout(layout))?)
}

pub fn write_layout_dump(path: Option<&Path>, layout: &Layout) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout);
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::Graph;
    use crate::layout::compute_layout;

    #[test]
    fn dump_uses_camel_case_keys() {
        let mut graph = Graph::new();
        graph.ensure_node("A", NodeKind::Person);
        graph.ensure_node("B", NodeKind::Item);
        let rel = graph.connect("A", "B");
        rel.directed = true;
        rel.source_to_target_label = Some("owns".to_string());
        let layout = compute_layout(&graph, &LayoutConfig::default());
        let json = layout_dump_json(&layout).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["center"], "A");
        assert_eq!(value["nodes"][1]["kind"], "item");
        assert_eq!(value["edges"][0]["kind"], "one-way");
        assert_eq!(value["edges"][0]["arrowEnd"], true);
        assert_eq!(value["edges"][0]["labels"][0]["direction"], "forward");
        assert_eq!(value["nodes"][1]["distance"], 1);
    }
}
