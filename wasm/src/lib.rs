use sankey_layout::config::{RenderConfig, SankeyConfig};
use sankey_layout::layout::{Dimensions, SankeyLayout, compute_layout};
use sankey_layout::layout_dump::LayoutDump;
use sankey_layout::{Theme, parse_graph, render_svg, validate};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Options accepted from the host page. Missing fields fall back to defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOptions {
    sankey: Option<SankeyConfig>,
    render: Option<RenderConfig>,
    theme: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationReport {
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

fn parse_options(options_json: Option<String>) -> Result<LayoutOptions, String> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| error.to_string()),
        None => Ok(LayoutOptions::default()),
    }
}

fn layout_from_json(
    graph_json: &str,
    width: f64,
    height: f64,
    sankey: &SankeyConfig,
) -> Result<(SankeyLayout, Vec<String>), String> {
    let raw = parse_graph(graph_json).map_err(|error| error.to_string())?;
    let validation = validate(&raw);
    let warnings = validation.warning_messages();
    let graph = validation.into_graph().map_err(|error| error.to_string())?;
    let dims = Dimensions::new(width, height).map_err(|error| error.to_string())?;
    Ok((compute_layout(&graph, dims, sankey), warnings))
}

fn validate_report(graph_json: &str) -> Result<String, String> {
    let raw = parse_graph(graph_json).map_err(|error| error.to_string())?;
    let validation = validate(&raw);
    let report = ValidationReport {
        valid: validation.valid,
        errors: validation.error_messages(),
        warnings: validation.warning_messages(),
    };
    serde_json::to_string(&report).map_err(|error| error.to_string())
}

fn layout_json(
    graph_json: &str,
    width: f64,
    height: f64,
    options: LayoutOptions,
) -> Result<String, String> {
    let sankey = options.sankey.unwrap_or_default();
    let (layout, _) = layout_from_json(graph_json, width, height, &sankey)?;
    let dump = LayoutDump::from_layout(&layout, None);
    serde_json::to_string(&dump).map_err(|error| error.to_string())
}

fn svg(graph_json: &str, options: LayoutOptions) -> Result<String, String> {
    let render = options.render.unwrap_or_default();
    let sankey = options.sankey.unwrap_or_default();
    let theme = match options.theme.as_deref() {
        Some("classic") => Theme::classic(),
        _ => Theme::modern(),
    };
    let (width, height) = render.content_size();
    let (layout, _) = layout_from_json(graph_json, width, height, &sankey)?;
    Ok(render_svg(&layout, &theme, &render))
}

/// Returns `{ valid, errors, warnings }` as JSON.
#[wasm_bindgen(js_name = validateGraph)]
pub fn validate_graph(graph_json: &str) -> Result<String, JsValue> {
    validate_report(graph_json).map_err(|error| JsValue::from_str(&error))
}

/// Returns the processed nodes and links for a `width` x `height` content area.
#[wasm_bindgen(js_name = computeLayout)]
pub fn compute_layout_json(
    graph_json: &str,
    width: f64,
    height: f64,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = parse_options(options_json).map_err(|error| JsValue::from_str(&error))?;
    layout_json(graph_json, width, height, options).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen(js_name = renderSvg)]
pub fn render_sankey_svg(graph_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json).map_err(|error| JsValue::from_str(&error))?;
    svg(graph_json, options).map_err(|error| JsValue::from_str(&error))
}
