use crate::layout::SankeyLayout;
use crate::validate::Validation;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serializable snapshot of a layout, with node/link references spelled as
/// ids so the dump stands alone.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub width: f64,
    pub height: f64,
    pub node_width: f64,
    pub max_level: usize,
    pub cyclic: bool,
    pub warnings: Vec<String>,
    pub nodes: Vec<NodeDump>,
    pub links: Vec<LinkDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub name: String,
    pub index: usize,
    pub level: usize,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub source_links: Vec<usize>,
    pub target_links: Vec<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDump {
    pub index: usize,
    pub source: String,
    pub target: String,
    pub value: f64,
    pub sy0: f64,
    pub sy1: f64,
    pub ty0: f64,
    pub ty1: f64,
    pub width: f64,
    pub path: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<[String; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &SankeyLayout, validation: Option<&Validation>) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                name: node.name.clone(),
                index: node.index,
                level: node.level,
                value: node.value,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                color: node.color.clone(),
                category: node.category.clone(),
                source_links: node.source_links.clone(),
                target_links: node.target_links.clone(),
            })
            .collect();
        let links = layout
            .links
            .iter()
            .map(|link| LinkDump {
                index: link.index,
                source: layout.link_source(link).id.clone(),
                target: layout.link_target(link).id.clone(),
                value: link.value,
                sy0: link.sy0,
                sy1: link.sy1,
                ty0: link.ty0,
                ty1: link.ty1,
                width: link.width,
                path: link.path.clone(),
                color: link.color.clone(),
                gradient: link
                    .gradient
                    .as_ref()
                    .map(|(start, end)| [start.clone(), end.clone()]),
            })
            .collect();
        Self {
            width: layout.width,
            height: layout.height,
            node_width: layout.node_width,
            max_level: layout.max_level,
            cyclic: layout.cyclic,
            warnings: validation
                .map(Validation::warning_messages)
                .unwrap_or_default(),
            nodes,
            links,
        }
    }
}

pub fn write_layout_dump(path: Option<&Path>, dump: &LayoutDump) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, dump)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, dump)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
