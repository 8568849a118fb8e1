mod graph;
mod levels;
mod links;
mod placement;
pub(crate) mod types;
pub use types::*;

use crate::config::{LinkColorMode, SankeyConfig};
use crate::ir::Graph;

use graph::GraphIndex;
use levels::assign_levels;
use links::{allocate_bands, ribbon_path};
use placement::place_nodes;

/// Lays out a flow graph inside `dims`.
///
/// The result is rebuilt from scratch on every call and depends only on the
/// arguments. Links whose endpoints do not resolve are dropped; callers are
/// expected to run [`crate::validate::validate`] first and stop on errors.
pub fn compute_layout(graph: &Graph, dims: Dimensions, config: &SankeyConfig) -> SankeyLayout {
    let index = GraphIndex::build(graph);
    let levels = assign_levels(&index, config.cycle_fallback_columns);
    let placement = place_nodes(&index, &levels, dims, config);
    let bands = allocate_bands(&index, &placement);

    let node_colors: Vec<String> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| {
            node.color
                .clone()
                .unwrap_or_else(|| config.color_scheme.color(idx).to_string())
        })
        .collect();

    let nodes: Vec<ProcessedNode> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| ProcessedNode {
            id: node.id.clone(),
            name: node.name.clone(),
            index: idx,
            level: levels.level[idx],
            value: index.values[idx],
            x: placement.x[idx],
            y: placement.y[idx],
            width: config.node_width,
            height: placement.height[idx],
            color: node_colors[idx].clone(),
            category: node.category.clone(),
            // edge positions double as positions in `links`
            source_links: index.outgoing[idx].clone(),
            target_links: index.incoming[idx].clone(),
        })
        .collect();

    let links: Vec<ProcessedLink> = index
        .edges
        .iter()
        .zip(&bands)
        .map(|(edge, band)| {
            let sx = placement.x[edge.from_idx] + config.node_width;
            let tx = placement.x[edge.to_idx];
            let source_color = &node_colors[edge.from_idx];
            let target_color = &node_colors[edge.to_idx];
            let (color, gradient) = match config.link_color_mode {
                LinkColorMode::Source => (source_color.clone(), None),
                LinkColorMode::Target => (target_color.clone(), None),
                LinkColorMode::Gradient => (
                    source_color.clone(),
                    Some((source_color.clone(), target_color.clone())),
                ),
                LinkColorMode::Custom => (
                    graph.links[edge.index]
                        .color
                        .clone()
                        .unwrap_or_else(|| source_color.clone()),
                    None,
                ),
            };
            ProcessedLink {
                index: edge.index,
                source: edge.from_idx,
                target: edge.to_idx,
                value: edge.value,
                sy0: band.sy0,
                sy1: band.sy1,
                ty0: band.ty0,
                ty1: band.ty1,
                width: band.source_width(),
                path: ribbon_path(sx, tx, band, config.curvature),
                color,
                gradient,
            }
        })
        .collect();

    let column_width = dims.width / (levels.max_level + 1) as f64;
    let levels_out = placement
        .columns
        .iter()
        .enumerate()
        .map(|(level, column)| LevelLayout {
            level,
            x: level as f64 * column_width,
            spacing: column.spacing,
            nodes: column.order.clone(),
        })
        .collect();

    tracing::debug!(
        nodes = nodes.len(),
        links = links.len(),
        max_level = levels.max_level,
        "computed sankey layout"
    );

    SankeyLayout {
        width: dims.width,
        height: dims.height,
        node_width: config.node_width,
        max_level: levels.max_level,
        nodes,
        links,
        levels: levels_out,
        cyclic: levels.cyclic,
    }
}
