pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{CollisionOptions, Config, LayoutConfig, NodeGeometry, RadialParams, load_config};
pub use ir::{Graph, GraphNode, NodeKind, Point, Relationship, RelationshipKind, Size};
pub use layout::{Layout, compute_layout};
pub use parser::{InputFormat, ParseError, parse_graph};
pub use render::render_svg;
pub use theme::Theme;
