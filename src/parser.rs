use crate::error::Result;
use crate::ir::RawGraph;

/// Decodes a `{ "nodes": [...], "links": [...] }` document. Only JSON syntax
/// and shape problems fail here; field-level checks belong to validation.
pub fn parse_graph(input: &str) -> Result<RawGraph> {
    let trimmed = input.trim_start_matches('\u{feff}');
    let graph: RawGraph = serde_json::from_str(trimmed)?;
    tracing::debug!(
        nodes = graph.nodes.len(),
        links = graph.links.len(),
        "parsed graph input"
    );
    Ok(graph)
}
