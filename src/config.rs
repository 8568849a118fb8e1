use crate::error::Result;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorScheme {
    #[default]
    Tableau10,
    Category10,
    Pastel,
    Monochrome,
}

const TABLEAU10: [&str; 10] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const PASTEL: [&str; 8] = [
    "#b3e2cd", "#fdcdac", "#cbd5e8", "#f4cae4", "#e6f5c9", "#fff2ae", "#f1e2cc", "#cccccc",
];

const MONOCHROME: [&str; 5] = ["#1c2430", "#3b4a60", "#5b6f8f", "#7a8aa6", "#a3b1c8"];

impl ColorScheme {
    pub fn palette(self) -> &'static [&'static str] {
        match self {
            Self::Tableau10 => &TABLEAU10,
            Self::Category10 => &CATEGORY10,
            Self::Pastel => &PASTEL,
            Self::Monochrome => &MONOCHROME,
        }
    }

    pub fn color(self, index: usize) -> &'static str {
        let palette = self.palette();
        palette[index % palette.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkColorMode {
    #[default]
    Source,
    Target,
    Gradient,
    Custom,
}

/// Tuning for the layout engine. Built once and passed by reference through
/// every stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SankeyConfig {
    /// Share of the chart height handed to inter-node gaps in a column.
    pub spacing_ratio: f64,
    /// Minimum vertical gap between neighbours; `None` means
    /// `max(30, chart_height * 0.15)`.
    pub min_spacing: Option<f64>,
    pub iterations: usize,
    pub damping: f64,
    pub node_width: f64,
    pub min_node_height: f64,
    /// Tallest node gets `chart_height / height_headroom`.
    pub height_headroom: f64,
    /// Columns spanning less than this share of the chart height are stretched.
    pub stretch_threshold: f64,
    /// Number of columns cyclic nodes are spread over.
    pub cycle_fallback_columns: usize,
    pub curvature: f64,
    pub color_scheme: ColorScheme,
    pub link_color_mode: LinkColorMode,
    /// Consumed by animated renderers only.
    pub animation_duration_ms: u32,
}

impl Default for SankeyConfig {
    fn default() -> Self {
        Self {
            spacing_ratio: 0.7,
            min_spacing: None,
            iterations: 5,
            damping: 0.15,
            node_width: 20.0,
            min_node_height: 12.0,
            height_headroom: 1.2,
            stretch_threshold: 0.9,
            cycle_fallback_columns: 3,
            curvature: 0.5,
            color_scheme: ColorScheme::default(),
            link_color_mode: LinkColorMode::default(),
            animation_duration_ms: 300,
        }
    }
}

impl SankeyConfig {
    pub fn resolved_min_spacing(&self, chart_height: f64) -> f64 {
        self.min_spacing
            .unwrap_or_else(|| (chart_height * 0.15).max(30.0))
            .max(0.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 120.0,
            bottom: 20.0,
            left: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    /// Full drawing size, margins included.
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub background: String,
    pub link_opacity: f64,
    pub show_labels: bool,
    pub show_values: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,
            margins: Margins::default(),
            background: "#FFFFFF".to_string(),
            link_opacity: 0.45,
            show_labels: true,
            show_values: true,
        }
    }
}

impl RenderConfig {
    /// Content area left after margins.
    pub fn content_size(&self) -> (f64, f64) {
        (
            self.width - self.margins.left - self.margins.right,
            self.height - self.margins.top - self.margins.bottom,
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub sankey: SankeyConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    sankey: Option<SankeyConfig>,
    render: Option<RenderConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f64>,
    text_color: Option<String>,
    node_stroke: Option<String>,
    background: Option<String>,
}

/// Loads a JSON or JSON5 config file on top of the defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)?;
    apply_config_file(&mut config, parsed);
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) {
    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        } else {
            tracing::warn!(theme = theme_name, "unknown theme, keeping default");
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.node_stroke {
            config.theme.node_stroke = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(sankey) = parsed.sankey {
        config.sankey = sankey;
    }
    if let Some(render) = parsed.render {
        config.render = render;
    }
}
