use crate::ir::Point;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ring geometry for the ego radial layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialParams {
    pub ring_spacing: f64,
    pub first_ring_radius: f64,
}

impl Default for RadialParams {
    fn default() -> Self {
        Self {
            ring_spacing: 200.0,
            first_ring_radius: 200.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EgoLayoutConfig {
    pub params: RadialParams,
    pub center: Point,
}

impl Default for EgoLayoutConfig {
    fn default() -> Self {
        Self {
            params: RadialParams::default(),
            center: Point::new(400.0, 300.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionOptions {
    pub max_iterations: usize,
    pub overlap_threshold: f64,
    pub margin: f64,
}

impl Default for CollisionOptions {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            overlap_threshold: 1.0,
            margin: 16.0,
        }
    }
}

/// Fixed visual dimensions of rendered nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeGeometry {
    /// Radius of a person's avatar circle. Also fixes every node's vertical center.
    pub avatar_radius: f64,
    /// Side of an item's square.
    pub item_size: f64,
    /// Width assumed for a node the renderer has not measured yet.
    pub default_width: f64,
    pub default_height: f64,
}

impl Default for NodeGeometry {
    fn default() -> Self {
        Self {
            avatar_radius: 40.0,
            item_size: 80.0,
            default_width: 100.0,
            default_height: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    pub single_ratio: f64,
    /// Where the source -> target label of a dual-directed edge sits.
    pub forward_ratio: f64,
    /// Where the target -> source label of a dual-directed edge sits.
    pub backward_ratio: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            single_ratio: 0.5,
            forward_ratio: 0.3,
            backward_ratio: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Radial rings around a center node, then collision resolution.
    #[default]
    Ego,
    /// Keep the incoming positions and only resolve collisions.
    Preserve,
}

impl LayoutMode {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "ego" | "radial" => Some(Self::Ego),
            "preserve" | "keep" => Some(Self::Preserve),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub mode: LayoutMode,
    pub ego: EgoLayoutConfig,
    pub collision: CollisionOptions,
    pub geometry: NodeGeometry,
    pub labels: LabelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub padding: f64,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            padding: 40.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    person_fill: Option<String>,
    item_fill: Option<String>,
    node_border_color: Option<String>,
    line_color: Option<String>,
    label_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    mode: Option<String>,
    ring_spacing: Option<f64>,
    first_ring_radius: Option<f64>,
    center_x: Option<f64>,
    center_y: Option<f64>,
    max_iterations: Option<usize>,
    overlap_threshold: Option<f64>,
    margin: Option<f64>,
    avatar_radius: Option<f64>,
    item_size: Option<f64>,
    default_width: Option<f64>,
    default_height: Option<f64>,
    label_ratio: Option<f64>,
    forward_label_ratio: Option<f64>,
    backward_label_ratio: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    padding: Option<f64>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" => config.theme = Theme::classic(),
            other => tracing::warn!(theme = other, "unknown theme, keeping default"),
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.person_fill {
            config.theme.person_fill = v;
        }
        if let Some(v) = vars.item_fill {
            config.theme.item_fill = v;
        }
        if let Some(v) = vars.node_border_color {
            config.theme.node_border_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.label_color {
            config.theme.label_color = v;
        }
        if let Some(v) = vars.background {
            config.render.background = v.clone();
            config.theme.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        apply_layout_overrides(&mut config.layout, layout)?;
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.padding {
            config.render.padding = v.max(0.0);
        }
    }

    Ok(config)
}

/// Applies layout settings stored inside a graph document (same keys as the
/// config file's `layout` section).
pub fn merge_layout_settings(
    config: &mut Config,
    settings: serde_json::Value,
) -> anyhow::Result<()> {
    let file: LayoutConfigFile = serde_json::from_value(settings)?;
    apply_layout_overrides(&mut config.layout, file)
}

fn apply_layout_overrides(layout: &mut LayoutConfig, file: LayoutConfigFile) -> anyhow::Result<()> {
    if let Some(mode) = file.mode.as_deref() {
        layout.mode = LayoutMode::from_token(mode)
            .ok_or_else(|| anyhow::anyhow!("unknown layout mode '{mode}'"))?;
    }
    if let Some(v) = file.ring_spacing {
        layout.ego.params.ring_spacing = v;
    }
    if let Some(v) = file.first_ring_radius {
        layout.ego.params.first_ring_radius = v;
    }
    if let Some(v) = file.center_x {
        layout.ego.center.x = v;
    }
    if let Some(v) = file.center_y {
        layout.ego.center.y = v;
    }
    if let Some(v) = file.max_iterations {
        layout.collision.max_iterations = v;
    }
    if let Some(v) = file.overlap_threshold {
        layout.collision.overlap_threshold = v;
    }
    if let Some(v) = file.margin {
        layout.collision.margin = v;
    }
    if let Some(v) = file.avatar_radius {
        layout.geometry.avatar_radius = v;
    }
    if let Some(v) = file.item_size {
        layout.geometry.item_size = v;
    }
    if let Some(v) = file.default_width {
        layout.geometry.default_width = v;
    }
    if let Some(v) = file.default_height {
        layout.geometry.default_height = v;
    }
    if let Some(v) = file.label_ratio {
        layout.labels.single_ratio = v;
    }
    if let Some(v) = file.forward_label_ratio {
        layout.labels.forward_ratio = v;
    }
    if let Some(v) = file.backward_label_ratio {
        layout.labels.backward_ratio = v;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.layout.ego.params, RadialParams::default());
        assert_eq!(config.layout.collision, CollisionOptions::default());
        assert_eq!(config.layout.mode, LayoutMode::Ego);
    }

    #[test]
    fn merges_layout_overrides() {
        let config = parse_config(
            r#"{
                "theme": "modern",
                "layout": {
                    "mode": "preserve",
                    "ringSpacing": 120,
                    "firstRingRadius": 90,
                    "centerX": 0,
                    "maxIterations": 10,
                    "forwardLabelRatio": 0.25
                },
                "render": { "padding": 12 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.layout.mode, LayoutMode::Preserve);
        assert_eq!(config.layout.ego.params.ring_spacing, 120.0);
        assert_eq!(config.layout.ego.params.first_ring_radius, 90.0);
        assert_eq!(config.layout.ego.center, Point::new(0.0, 300.0));
        assert_eq!(config.layout.collision.max_iterations, 10);
        assert_eq!(config.layout.labels.forward_ratio, 0.25);
        assert_eq!(config.render.padding, 12.0);
        assert_eq!(config.theme.font_family, Theme::modern().font_family);
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = parse_config(r#"{ "layout": { "mode": "force" } }"#).unwrap_err();
        assert!(err.to_string().contains("force"));
    }

    #[test]
    fn document_settings_merge_over_config() {
        let mut config = Config::default();
        merge_layout_settings(
            &mut config,
            serde_json::json!({ "ringSpacing": 80.0, "margin": 4.0 }),
        )
        .unwrap();
        assert_eq!(config.layout.ego.params.ring_spacing, 80.0);
        assert_eq!(config.layout.ego.params.first_ring_radius, 200.0);
        assert_eq!(config.layout.collision.margin, 4.0);
    }

    #[test]
    fn theme_variables_override_preset() {
        let config = parse_config(
            r##"{ "themeVariables": { "lineColor": "#123456", "background": "#000000" } }"##,
        )
        .unwrap();
        assert_eq!(config.theme.line_color, "#123456");
        assert_eq!(config.render.background, "#000000");
    }
}
