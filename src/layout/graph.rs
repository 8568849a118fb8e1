use std::collections::HashMap;

use crate::ir::Graph;

#[derive(Debug, Clone)]
pub(crate) struct EdgeData {
    /// Position in the input link list.
    pub index: usize,
    pub from_idx: usize,
    pub to_idx: usize,
    pub value: f64,
}

/// Index-based arena over the input graph. Nodes and edges refer to each
/// other by position only.
#[derive(Debug, Clone)]
pub(crate) struct GraphIndex {
    pub node_count: usize,
    pub edges: Vec<EdgeData>,
    pub incoming: Vec<Vec<usize>>,
    pub outgoing: Vec<Vec<usize>>,
    pub values: Vec<f64>,
}

impl GraphIndex {
    /// Resolves link endpoints against node ids. Links that do not resolve or
    /// that carry no positive flow are dropped here so later stages can index
    /// without checks.
    pub fn build(graph: &Graph) -> Self {
        let node_count = graph.nodes.len();
        let mut id_to_idx: HashMap<&str, usize> = HashMap::with_capacity(node_count);
        for (idx, node) in graph.nodes.iter().enumerate() {
            id_to_idx.entry(node.id.as_str()).or_insert(idx);
        }

        let mut edges = Vec::with_capacity(graph.links.len());
        let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        let mut in_total = vec![0.0f64; node_count];
        let mut out_total = vec![0.0f64; node_count];

        for (index, link) in graph.links.iter().enumerate() {
            let (Some(&from_idx), Some(&to_idx)) = (
                id_to_idx.get(link.source.as_str()),
                id_to_idx.get(link.target.as_str()),
            ) else {
                tracing::warn!(
                    link = index,
                    source = %link.source,
                    target = %link.target,
                    "dropping link with unknown endpoint"
                );
                continue;
            };
            if !(link.value.is_finite() && link.value > 0.0) {
                tracing::warn!(link = index, value = link.value, "dropping link without positive flow");
                continue;
            }
            let edge_idx = edges.len();
            edges.push(EdgeData {
                index,
                from_idx,
                to_idx,
                value: link.value,
            });
            outgoing[from_idx].push(edge_idx);
            incoming[to_idx].push(edge_idx);
            out_total[from_idx] += link.value;
            in_total[to_idx] += link.value;
        }

        let values = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| {
                let derived = in_total[idx].max(out_total[idx]);
                match node.value {
                    Some(explicit) if explicit.is_finite() && explicit > 0.0 => explicit,
                    _ if derived > 0.0 => derived,
                    _ => 1.0,
                }
            })
            .collect();

        Self {
            node_count,
            edges,
            incoming,
            outgoing,
            values,
        }
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(1.0, f64::max)
    }
}
