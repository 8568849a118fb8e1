use crate::error::{Error, Result};

/// Drawable area after margins, in chart-local units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let usable = |side: f64| side.is_finite() && side > 0.0;
        if !usable(width) || !usable(height) {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedNode {
    pub id: String,
    pub name: String,
    /// Position in the input node list.
    pub index: usize,
    pub level: usize,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub category: Option<String>,
    /// Indices into `SankeyLayout::links` where this node is the source.
    pub source_links: Vec<usize>,
    /// Indices into `SankeyLayout::links` where this node is the target.
    pub target_links: Vec<usize>,
}

impl ProcessedNode {
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedLink {
    /// Position in the ingested link list.
    pub index: usize,
    /// Index into `SankeyLayout::nodes`.
    pub source: usize,
    /// Index into `SankeyLayout::nodes`.
    pub target: usize,
    pub value: f64,
    pub sy0: f64,
    pub sy1: f64,
    pub ty0: f64,
    pub ty1: f64,
    /// Band height at the source node.
    pub width: f64,
    pub path: String,
    pub color: String,
    /// `(start, end)` colors when links are drawn with gradients.
    pub gradient: Option<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    pub level: usize,
    pub x: f64,
    /// Minimum gap enforced between neighbours in this column.
    pub spacing: f64,
    /// Node indices, top to bottom.
    pub nodes: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SankeyLayout {
    pub width: f64,
    pub height: f64,
    pub node_width: f64,
    pub max_level: usize,
    pub nodes: Vec<ProcessedNode>,
    pub links: Vec<ProcessedLink>,
    pub levels: Vec<LevelLayout>,
    /// Leveling had to fall back for at least one back edge.
    pub cyclic: bool,
}

impl SankeyLayout {
    pub fn node(&self, id: &str) -> Option<&ProcessedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn link_source(&self, link: &ProcessedLink) -> &ProcessedNode {
        &self.nodes[link.source]
    }

    pub fn link_target(&self, link: &ProcessedLink) -> &ProcessedNode {
        &self.nodes[link.target]
    }
}
