use std::fmt::Write as _;

use super::graph::GraphIndex;
use super::placement::Placement;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Band {
    pub sy0: f64,
    pub sy1: f64,
    pub ty0: f64,
    pub ty1: f64,
}

impl Band {
    pub fn source_width(&self) -> f64 {
        self.sy1 - self.sy0
    }
}

/// Splits every node's height between its links in proportion to flow.
/// Outgoing bands are ordered by the target's center and incoming bands by
/// the source's center, so ribbons leaving a node cross as little as a greedy
/// sort allows. The two sides are split independently.
pub(crate) fn allocate_bands(index: &GraphIndex, placement: &Placement) -> Vec<Band> {
    let center = |node: usize| placement.y[node] + placement.height[node] / 2.0;
    let mut bands = vec![Band::default(); index.edges.len()];

    for node in 0..index.node_count {
        let mut outgoing = index.outgoing[node].clone();
        outgoing.sort_by(|&a, &b| {
            center(index.edges[a].to_idx)
                .total_cmp(&center(index.edges[b].to_idx))
                .then_with(|| a.cmp(&b))
        });
        for (edge_idx, (top, bottom)) in stack_bands(index, &outgoing, placement, node) {
            bands[edge_idx].sy0 = top;
            bands[edge_idx].sy1 = bottom;
        }

        let mut incoming = index.incoming[node].clone();
        incoming.sort_by(|&a, &b| {
            center(index.edges[a].from_idx)
                .total_cmp(&center(index.edges[b].from_idx))
                .then_with(|| a.cmp(&b))
        });
        for (edge_idx, (top, bottom)) in stack_bands(index, &incoming, placement, node) {
            bands[edge_idx].ty0 = top;
            bands[edge_idx].ty1 = bottom;
        }
    }
    bands
}

fn stack_bands(
    index: &GraphIndex,
    ordered: &[usize],
    placement: &Placement,
    node: usize,
) -> Vec<(usize, (f64, f64))> {
    let total: f64 = ordered.iter().map(|&edge| index.edges[edge].value).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let node_height = placement.height[node];
    let mut cursor = placement.y[node];
    ordered
        .iter()
        .map(|&edge| {
            let band = node_height * index.edges[edge].value / total;
            let top = cursor;
            cursor += band;
            (edge, (top, cursor))
        })
        .collect()
}

/// Closed ribbon between a source band at `sx` and a target band at `tx`.
/// Both Bézier edges pull horizontally by `curvature * |tx - sx|`.
pub(crate) fn ribbon_path(sx: f64, tx: f64, band: &Band, curvature: f64) -> String {
    let offset = curvature * (tx - sx).abs();
    let (c0, c1) = (sx + offset, tx - offset);
    let mut d = String::new();
    let _ = write!(
        d,
        "M {sx:.2} {:.2} C {c0:.2} {:.2} {c1:.2} {:.2} {tx:.2} {:.2}",
        band.sy0, band.sy0, band.ty0, band.ty0
    );
    let _ = write!(d, " L {tx:.2} {:.2}", band.ty1);
    let _ = write!(
        d,
        " C {c1:.2} {:.2} {c0:.2} {:.2} {sx:.2} {:.2} Z",
        band.ty1, band.sy1, band.sy1
    );
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SankeyConfig;
    use crate::ir::Graph;
    use crate::layout::levels::assign_levels;
    use crate::layout::placement::place_nodes;
    use crate::layout::types::Dimensions;

    fn bands_for(graph: &Graph) -> (GraphIndex, Placement, Vec<Band>) {
        let index = GraphIndex::build(graph);
        let levels = assign_levels(&index, 3);
        let placement = place_nodes(
            &index,
            &levels,
            Dimensions {
                width: 600.0,
                height: 400.0,
            },
            &SankeyConfig::default(),
        );
        let bands = allocate_bands(&index, &placement);
        (index, placement, bands)
    }

    #[test]
    fn outgoing_bands_fill_source_height() {
        let graph = Graph::new()
            .node("s")
            .node("a")
            .node("b")
            .link("s", "a", 3.0)
            .link("s", "b", 1.0);
        let (_, placement, bands) = bands_for(&graph);
        let total: f64 = bands.iter().map(Band::source_width).sum();
        assert!((total - placement.height[0]).abs() < 1e-9);
        let first = bands[0].source_width();
        assert!((first - placement.height[0] * 0.75).abs() < 1e-9);
    }

    #[test]
    fn bands_follow_neighbour_order() {
        let graph = Graph::new()
            .node("s")
            .node("a")
            .node("b")
            .link("s", "a", 1.0)
            .link("s", "b", 1.0);
        let (_, placement, bands) = bands_for(&graph);
        let a_above_b = placement.y[1] < placement.y[2];
        assert_eq!(bands[0].sy0 < bands[1].sy0, a_above_b);
        assert!((bands[0].sy0.min(bands[1].sy0) - placement.y[0]).abs() < 1e-9);
    }

    #[test]
    fn incoming_bands_are_split_independently() {
        let graph = Graph::new()
            .node("a")
            .node("b")
            .node("t")
            .link("a", "t", 2.0)
            .link("b", "t", 6.0);
        let (_, placement, bands) = bands_for(&graph);
        let incoming: f64 = bands.iter().map(|band| band.ty1 - band.ty0).sum();
        assert!((incoming - placement.height[2]).abs() < 1e-9);
        assert!(((bands[1].ty1 - bands[1].ty0) - placement.height[2] * 0.75).abs() < 1e-9);
    }

    #[test]
    fn ribbon_path_closes_both_edges() {
        let band = Band {
            sy0: 10.0,
            sy1: 30.0,
            ty0: 50.0,
            ty1: 70.0,
        };
        let path = ribbon_path(20.0, 220.0, &band, 0.5);
        assert_eq!(
            path,
            "M 20.00 10.00 C 120.00 10.00 120.00 50.00 220.00 50.00 \
             L 220.00 70.00 C 120.00 70.00 120.00 30.00 20.00 30.00 Z"
        );
    }
}
