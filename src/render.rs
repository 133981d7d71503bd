use crate::config::{LayoutConfig, RenderConfig};
use crate::ir::NodeShape;
use crate::layout::{EdgeLayout, Layout, NodeLayout};
use crate::theme::Theme;
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

// Rough glyph advance used to size label backgrounds.
const LABEL_CHAR_WIDTH: f32 = 0.6;
const LABEL_PAD: f64 = 4.0;

/// Static SVG snapshot of a computed layout.
pub fn render_svg(
    layout: &Layout,
    theme: &Theme,
    config: &LayoutConfig,
    render: &RenderConfig,
) -> String {
    let pad = render.padding;
    let (min_x, min_y, width, height) = match layout.bounds() {
        Some(bounds) => (
            bounds.min_x - pad,
            bounds.min_y - pad,
            (bounds.width() + pad * 2.0).max(1.0),
            (bounds.height() + pad * 2.0).max(1.0),
        ),
        None => (0.0, 0.0, f64::from(render.width), f64::from(render.height)),
    };

    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"{min_x:.2} {min_y:.2} {width:.2} {height:.2}\">",
    );
    let _ = write!(
        svg,
        "<rect x=\"{min_x:.2}\" y=\"{min_y:.2}\" width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        render.background
    );
    let _ = write!(
        svg,
        "<defs><marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker></defs>",
        theme.line_color
    );

    for edge in &layout.edges {
        render_edge(&mut svg, edge, theme);
    }
    for node in &layout.nodes {
        render_node(&mut svg, node, theme, config);
    }
    for edge in &layout.edges {
        render_edge_labels(&mut svg, edge, theme);
    }

    svg.push_str("</svg>");
    svg
}

fn render_edge(svg: &mut String, edge: &EdgeLayout, theme: &Theme) {
    let mut markers = String::new();
    if edge.arrow_start {
        markers.push_str(" marker-start=\"url(#arrow)\"");
    }
    if edge.arrow_end {
        markers.push_str(" marker-end=\"url(#arrow)\"");
    }
    let _ = write!(
        svg,
        "<line data-id=\"{}\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1.4\"{markers}/>",
        escape_xml(&edge.id),
        edge.source_point.x,
        edge.source_point.y,
        edge.target_point.x,
        edge.target_point.y,
        theme.line_color,
    );
}

fn render_node(svg: &mut String, node: &NodeLayout, theme: &Theme, config: &LayoutConfig) {
    let geometry = &config.geometry;
    let anchor = node.anchor;
    match node.shape() {
        NodeShape::Circle => {
            let _ = write!(
                svg,
                "<circle data-id=\"{}\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.5\"/>",
                escape_xml(&node.id),
                anchor.x,
                anchor.y,
                geometry.avatar_radius,
                theme.person_fill,
                theme.node_border_color
            );
        }
        NodeShape::Rectangle => {
            let half = geometry.item_size / 2.0;
            let _ = write!(
                svg,
                "<rect data-id=\"{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"6\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.5\"/>",
                escape_xml(&node.id),
                anchor.x - half,
                anchor.y - half,
                geometry.item_size,
                geometry.item_size,
                theme.item_fill,
                theme.node_border_color
            );
        }
    }
    let text_y = anchor.y + geometry.avatar_radius + f64::from(theme.font_size) * 1.4;
    let _ = write!(
        svg,
        "<text x=\"{:.2}\" y=\"{text_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        anchor.x,
        escape_xml(&theme.font_family),
        theme.font_size,
        theme.text_color,
        escape_xml(&node.label)
    );
}

fn render_edge_labels(svg: &mut String, edge: &EdgeLayout, theme: &Theme) {
    let font_size = f64::from(theme.font_size);
    for label in &edge.labels {
        let chars = label.text.chars().count() as f64;
        let width = chars * font_size * f64::from(LABEL_CHAR_WIDTH) + LABEL_PAD * 2.0;
        let height = font_size + LABEL_PAD * 2.0;
        let _ = write!(
            svg,
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" rx=\"3\" fill=\"{}\"/>",
            label.point.x - width / 2.0,
            label.point.y - height / 2.0,
            theme.label_background
        );
        let _ = write!(
            svg,
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            label.point.x,
            label.point.y,
            escape_xml(&theme.font_family),
            theme.font_size,
            theme.label_color,
            escape_xml(&label.text)
        );
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|family| family.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| "Inter".to_string());
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("invalid render size"))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
