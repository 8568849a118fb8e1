use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::ir::{Graph, Link, Node, RawGraph, coerce_id, coerce_number};

/// A structural problem that prevents layout.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphIssue {
    #[error("graph has no nodes")]
    NoNodes,
    #[error("graph has no links")]
    NoLinks,
    #[error("node {index}: missing required field `{field}`")]
    NodeMissingField { index: usize, field: &'static str },
    #[error("node {index}: `id` must be a non-empty string or a number")]
    InvalidNodeId { index: usize },
    #[error("node {index}: duplicate id \"{id}\" (first used by node {first})")]
    DuplicateNodeId { index: usize, id: String, first: usize },
    #[error("link {index}: missing required field `{field}`")]
    LinkMissingField { index: usize, field: &'static str },
    #[error("link {index}: field `{field}` must be a non-empty string or a number")]
    InvalidLinkEndpoint { index: usize, field: &'static str },
    #[error("link {index}: {field} \"{id}\" does not match any node id")]
    UnknownNode {
        index: usize,
        field: &'static str,
        id: String,
    },
    #[error("link {index}: field `value` must be a positive number, got {value}")]
    InvalidLinkValue { index: usize, value: String },
}

/// A problem that layout tolerates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphWarning {
    #[error("cycle detected: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },
    #[error("link {index}: \"{id}\" links to itself")]
    SelfLoop { index: usize, id: String },
    #[error("node {index}: ignoring `value`, expected a positive number")]
    IgnoredNodeValue { index: usize },
    #[error("{kind} {index}: ignoring non-string `{field}`")]
    IgnoredAttribute {
        kind: &'static str,
        index: usize,
        field: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<GraphIssue>,
    pub warnings: Vec<GraphWarning>,
    /// The normalized graph, present only when `valid`.
    pub graph: Option<Graph>,
}

impl Validation {
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    pub fn has_cycle(&self) -> bool {
        self.warnings
            .iter()
            .any(|warning| matches!(warning, GraphWarning::Cycle { .. }))
    }

    pub fn into_graph(self) -> Result<Graph> {
        match self.graph {
            Some(graph) if self.valid => Ok(graph),
            _ => Err(Error::InvalidGraph(self.errors)),
        }
    }
}

/// Checks a raw graph and normalizes it. Every problem is collected; nothing
/// here fails fast.
pub fn validate(raw: &RawGraph) -> Validation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if raw.nodes.is_empty() {
        errors.push(GraphIssue::NoNodes);
    }
    if raw.links.is_empty() {
        errors.push(GraphIssue::NoLinks);
    }

    let mut nodes = Vec::with_capacity(raw.nodes.len());
    // id -> raw input position of its first occurrence
    let mut id_to_idx: HashMap<String, usize> = HashMap::new();
    for (index, raw_node) in raw.nodes.iter().enumerate() {
        let id = match raw_node.id.as_ref().filter(|value| !value.is_null()) {
            None => {
                errors.push(GraphIssue::NodeMissingField { index, field: "id" });
                None
            }
            Some(value) => {
                let id = coerce_id(value);
                if id.is_none() {
                    errors.push(GraphIssue::InvalidNodeId { index });
                }
                id
            }
        };
        let name = match raw_node.name.as_ref() {
            Some(serde_json::Value::String(text)) => Some(text.clone()),
            Some(serde_json::Value::Number(number)) => Some(number.to_string()),
            _ => {
                errors.push(GraphIssue::NodeMissingField {
                    index,
                    field: "name",
                });
                None
            }
        };
        let value = match raw_node.value.as_ref().filter(|value| !value.is_null()) {
            None => None,
            Some(raw_value) => match coerce_number(raw_value) {
                Some(value) if value > 0.0 => Some(value),
                _ => {
                    warnings.push(GraphWarning::IgnoredNodeValue { index });
                    None
                }
            },
        };
        let color = text_attribute("node", index, "color", raw_node.color.as_ref(), &mut warnings);
        let category = text_attribute(
            "node",
            index,
            "category",
            raw_node.category.as_ref(),
            &mut warnings,
        );
        let (Some(id), Some(name)) = (id, name) else {
            continue;
        };
        if let Some(&first) = id_to_idx.get(&id) {
            errors.push(GraphIssue::DuplicateNodeId {
                index,
                id,
                first,
            });
            continue;
        }
        id_to_idx.insert(id.clone(), index);
        nodes.push(Node {
            id,
            name,
            value,
            color,
            category,
        });
    }

    let mut links = Vec::with_capacity(raw.links.len());
    for (index, raw_link) in raw.links.iter().enumerate() {
        let source = link_endpoint(index, "source", raw_link.source.as_ref(), &mut errors);
        let target = link_endpoint(index, "target", raw_link.target.as_ref(), &mut errors);
        let value = match raw_link.value.as_ref().filter(|value| !value.is_null()) {
            None => {
                errors.push(GraphIssue::LinkMissingField {
                    index,
                    field: "value",
                });
                None
            }
            Some(raw_value) => match coerce_number(raw_value) {
                Some(value) if value > 0.0 => Some(value),
                _ => {
                    errors.push(GraphIssue::InvalidLinkValue {
                        index,
                        value: raw_value.to_string(),
                    });
                    None
                }
            },
        };

        let color = text_attribute("link", index, "color", raw_link.color.as_ref(), &mut warnings);

        let mut resolved = true;
        for (field, id) in [("source", &source), ("target", &target)] {
            if let Some(id) = id {
                if !id_to_idx.contains_key(id) {
                    errors.push(GraphIssue::UnknownNode {
                        index,
                        field,
                        id: id.clone(),
                    });
                    resolved = false;
                }
            }
        }
        let (Some(source), Some(target), Some(value)) = (source, target, value) else {
            continue;
        };
        if !resolved {
            continue;
        }
        if source == target {
            warnings.push(GraphWarning::SelfLoop {
                index,
                id: source.clone(),
            });
        }
        links.push(Link {
            source,
            target,
            value,
            color,
        });
    }

    warnings.extend(
        detect_cycles(&nodes, &links)
            .into_iter()
            .map(|path| GraphWarning::Cycle { path }),
    );

    let valid = errors.is_empty();
    tracing::debug!(
        valid,
        errors = errors.len(),
        warnings = warnings.len(),
        "validated graph"
    );
    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    Validation {
        valid,
        errors,
        warnings,
        graph: valid.then_some(Graph { nodes, links }),
    }
}

fn link_endpoint(
    index: usize,
    field: &'static str,
    value: Option<&serde_json::Value>,
    errors: &mut Vec<GraphIssue>,
) -> Option<String> {
    match value.filter(|value| !value.is_null()) {
        None => {
            errors.push(GraphIssue::LinkMissingField { index, field });
            None
        }
        Some(value) => {
            let id = coerce_id(value);
            if id.is_none() {
                errors.push(GraphIssue::InvalidLinkEndpoint { index, field });
            }
            id
        }
    }
}

/// Optional display attributes must be strings; anything else is dropped.
fn text_attribute(
    kind: &'static str,
    index: usize,
    field: &'static str,
    value: Option<&serde_json::Value>,
    warnings: &mut Vec<GraphWarning>,
) -> Option<String> {
    match value? {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text.clone()),
        _ => {
            warnings.push(GraphWarning::IgnoredAttribute { kind, index, field });
            None
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Visited,
}

/// Depth-first search with an explicit recursion stack. Each back edge yields
/// one cycle, reported as the id path that closes on its first node.
/// Self-loops are reported separately and skipped here.
fn detect_cycles(nodes: &[Node], links: &[Link]) -> Vec<Vec<String>> {
    let id_to_idx: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id.as_str(), idx))
        .collect();
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for link in links {
        let (Some(&from), Some(&to)) = (
            id_to_idx.get(link.source.as_str()),
            id_to_idx.get(link.target.as_str()),
        ) else {
            continue;
        };
        if from != to && !outgoing[from].contains(&to) {
            outgoing[from].push(to);
        }
    }

    let mut marks = vec![Mark::Unvisited; nodes.len()];
    let mut cycles = Vec::new();
    for root in 0..nodes.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        // (node, next neighbour position)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        marks[root] = Mark::Visiting;
        while let Some(frame) = stack.last_mut() {
            let (node, pos) = *frame;
            if pos == outgoing[node].len() {
                marks[node] = Mark::Visited;
                stack.pop();
                continue;
            }
            frame.1 += 1;
            let next = outgoing[node][pos];
            match marks[next] {
                Mark::Unvisited => {
                    marks[next] = Mark::Visiting;
                    stack.push((next, 0));
                }
                Mark::Visiting => {
                    let start = stack
                        .iter()
                        .position(|(idx, _)| *idx == next)
                        .unwrap_or(0);
                    let mut path: Vec<String> = stack[start..]
                        .iter()
                        .map(|(idx, _)| nodes[*idx].id.clone())
                        .collect();
                    path.push(nodes[next].id.clone());
                    cycles.push(path);
                }
                Mark::Visited => {}
            }
        }
    }
    cycles
}
