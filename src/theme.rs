use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f64,
    pub text_color: String,
    pub node_stroke: String,
    pub node_stroke_width: f64,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            text_color: "#333333".to_string(),
            node_stroke: "#333333".to_string(),
            node_stroke_width: 0.5,
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 12.0,
            text_color: "#1C2430".to_string(),
            node_stroke: "none".to_string(),
            node_stroke_width: 0.0,
            background: "#FFFFFF".to_string(),
        }
    }

    /// Rough label width without font metrics.
    pub fn estimate_text_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.font_size * 0.6
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}
