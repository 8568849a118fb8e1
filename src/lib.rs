#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod theme;
pub mod validate;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{ColorScheme, Config, LinkColorMode, RenderConfig, SankeyConfig, load_config};
pub use error::{Error, Result};
pub use ir::{Graph, Link, Node, RawGraph};
pub use layout::{Dimensions, ProcessedLink, ProcessedNode, SankeyLayout, compute_layout};
pub use parser::parse_graph;
pub use render::render_svg;
pub use theme::Theme;
pub use validate::{GraphIssue, GraphWarning, Validation, validate};
