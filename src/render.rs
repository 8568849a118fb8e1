use crate::config::RenderConfig;
use crate::layout::SankeyLayout;
use crate::theme::Theme;
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

const LABEL_GAP: f64 = 6.0;

/// Draws a computed layout. Link ribbons go first so nodes sit on top.
pub fn render_svg(layout: &SankeyLayout, theme: &Theme, config: &RenderConfig) -> String {
    let margins = config.margins;
    let width = (layout.width + margins.left + margins.right).max(1.0);
    let height = (layout.height + margins.top + margins.bottom).max(1.0);

    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    );
    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    );

    let gradients: Vec<_> = layout
        .links
        .iter()
        .enumerate()
        .filter_map(|(idx, link)| link.gradient.as_ref().map(|colors| (idx, link, colors)))
        .collect();
    if !gradients.is_empty() {
        svg.push_str("<defs>");
        for (idx, link, (start, end)) in gradients {
            let source = layout.link_source(link);
            let target = layout.link_target(link);
            let _ = write!(
                svg,
                "<linearGradient id=\"{}\" gradientUnits=\"userSpaceOnUse\" x1=\"{:.2}\" x2=\"{:.2}\"><stop offset=\"0%\" stop-color=\"{}\"/><stop offset=\"100%\" stop-color=\"{}\"/></linearGradient>",
                gradient_id(idx),
                source.x + source.width,
                target.x,
                escape_xml(start),
                escape_xml(end)
            );
        }
        svg.push_str("</defs>");
    }

    let _ = write!(
        svg,
        "<g transform=\"translate({:.2},{:.2})\">",
        margins.left, margins.top
    );

    svg.push_str("<g class=\"links\">");
    for (idx, link) in layout.links.iter().enumerate() {
        let fill = if link.gradient.is_some() {
            format!("url(#{})", gradient_id(idx))
        } else {
            escape_xml(&link.color)
        };
        let source = layout.link_source(link);
        let target = layout.link_target(link);
        let _ = write!(
            svg,
            "<path d=\"{}\" fill=\"{}\" fill-opacity=\"{:.2}\" stroke=\"none\"><title>{} → {}: {}</title></path>",
            link.path,
            fill,
            config.link_opacity,
            escape_xml(&source.name),
            escape_xml(&target.name),
            format_value(link.value)
        );
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"nodes\">");
    for node in &layout.nodes {
        let _ = write!(
            svg,
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"><title>{}: {}</title></rect>",
            node.x,
            node.y,
            node.width,
            node.height,
            escape_xml(&node.color),
            escape_xml(&theme.node_stroke),
            theme.node_stroke_width,
            escape_xml(&node.name),
            format_value(node.value)
        );
    }
    svg.push_str("</g>");

    if config.show_labels {
        svg.push_str("<g class=\"labels\">");
        for node in &layout.nodes {
            let text = if config.show_values {
                format!("{} ({})", node.name, format_value(node.value))
            } else {
                node.name.clone()
            };
            let text_width = theme.estimate_text_width(&text);
            let right_x = node.x + node.width + LABEL_GAP;
            let fits_right = right_x + text_width <= layout.width + margins.right;
            let (x, anchor) = if fits_right {
                (right_x, "start")
            } else {
                (node.x - LABEL_GAP, "end")
            };
            let _ = write!(
                svg,
                "<text x=\"{x:.2}\" y=\"{:.2}\" dy=\"0.35em\" text-anchor=\"{anchor}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                node.center_y(),
                escape_xml(&theme.font_family),
                theme.font_size,
                escape_xml(&theme.text_color),
                escape_xml(&text)
            );
        }
        svg.push_str("</g>");
    }

    svg.push_str("</g></svg>");
    svg
}

fn gradient_id(link_idx: usize) -> String {
    format!("sankey-grad-{link_idx}")
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|family| family.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| "Inter".to_string());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
