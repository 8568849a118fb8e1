use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Graph input exactly as it arrived from JSON. Every field is optional and
/// ids/values stay untyped so that validation can report every problem at
/// once instead of failing on the first bad field during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGraph {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub links: Vec<RawLink>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub color: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLink {
    #[serde(default)]
    pub source: Option<Value>,
    #[serde(default)]
    pub target: Option<Value>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub color: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Normalized graph: ids are strings and link values are plain numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node whose display name equals its id.
    pub fn node(mut self, id: &str) -> Self {
        self.nodes.push(Node {
            id: id.to_string(),
            name: id.to_string(),
            value: None,
            color: None,
            category: None,
        });
        self
    }

    pub fn named_node(mut self, id: &str, name: &str) -> Self {
        self.nodes.push(Node {
            id: id.to_string(),
            name: name.to_string(),
            value: None,
            color: None,
            category: None,
        });
        self
    }

    pub fn link(mut self, source: &str, target: &str, value: f64) -> Self {
        self.links.push(Link {
            source: source.to_string(),
            target: target.to_string(),
            value,
            color: None,
        });
        self
    }
}

impl From<&Graph> for RawGraph {
    fn from(graph: &Graph) -> Self {
        let nodes = graph
            .nodes
            .iter()
            .map(|node| RawNode {
                id: Some(Value::String(node.id.clone())),
                name: Some(Value::String(node.name.clone())),
                value: node.value.map(Value::from),
                color: node.color.clone().map(Value::String),
                category: node.category.clone().map(Value::String),
            })
            .collect();
        let links = graph
            .links
            .iter()
            .map(|link| RawLink {
                source: Some(Value::String(link.source.clone())),
                target: Some(Value::String(link.target.clone())),
                value: Some(Value::from(link.value)),
                color: link.color.clone().map(Value::String),
            })
            .collect();
        Self { nodes, links }
    }
}

/// Coerces a JSON id to its string form. Strings pass through, numbers use
/// their JSON spelling; anything else is not an id.
pub fn coerce_id(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Reads a numeric field. Numeric strings count, since CSV-derived data
/// carries its numbers as text.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_ids_to_strings() {
        assert_eq!(coerce_id(&json!("A")), Some("A".to_string()));
        assert_eq!(coerce_id(&json!(7)), Some("7".to_string()));
        assert_eq!(coerce_id(&json!("  ")), None);
        assert_eq!(coerce_id(&json!(null)), None);
        assert_eq!(coerce_id(&json!([1])), None);
    }

    #[test]
    fn numeric_strings_are_numbers() {
        assert_eq!(coerce_number(&json!(2.5)), Some(2.5));
        assert_eq!(coerce_number(&json!("10")), Some(10.0));
        assert_eq!(coerce_number(&json!("ten")), None);
        assert_eq!(coerce_number(&json!(true)), None);
    }

    #[test]
    fn builder_round_trips_into_raw_graph() {
        let graph = Graph::new().node("A").node("B").link("A", "B", 3.0);
        let raw = RawGraph::from(&graph);
        assert_eq!(raw.nodes.len(), 2);
        assert_eq!(raw.links[0].value, Some(json!(3.0)));
    }
}
