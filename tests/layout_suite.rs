use std::collections::HashSet;
use std::path::Path;

use sankey_layout::config::{LinkColorMode, RenderConfig};
use sankey_layout::layout_dump::LayoutDump;
use sankey_layout::{
    Dimensions, Graph, RawGraph, SankeyConfig, SankeyLayout, Theme, compute_layout, parse_graph,
    render_svg, validate,
};

const EPS: f64 = 1e-6;

fn load_fixture(rel: &str) -> RawGraph {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    parse_graph(&input).expect("fixture parse failed")
}

fn valid_graph(rel: &str) -> Graph {
    validate(&load_fixture(rel))
        .into_graph()
        .expect("fixture should validate")
}

fn layout_fixture(rel: &str, width: f64, height: f64) -> SankeyLayout {
    let dims = Dimensions::new(width, height).expect("dims");
    compute_layout(&valid_graph(rel), dims, &SankeyConfig::default())
}

fn assert_levels_total(layout: &SankeyLayout, fixture: &str) {
    for node in &layout.nodes {
        assert!(
            node.level <= layout.max_level,
            "{fixture}: {} has level {} beyond {}",
            node.id,
            node.level,
            layout.max_level
        );
    }
    let placed: usize = layout.levels.iter().map(|level| level.nodes.len()).sum();
    assert_eq!(placed, layout.nodes.len(), "{fixture}: every node in one column");
}

fn assert_bands_conserved(layout: &SankeyLayout, fixture: &str) {
    for node in &layout.nodes {
        if !node.source_links.is_empty() {
            let out: f64 = node.source_links.iter().map(|&l| layout.links[l].width).sum();
            assert!(
                (out - node.height).abs() < EPS,
                "{fixture}: outgoing bands of {} sum to {out}, height {}",
                node.id,
                node.height
            );
        }
        if !node.target_links.is_empty() {
            let incoming: f64 = node
                .target_links
                .iter()
                .map(|&l| layout.links[l].ty1 - layout.links[l].ty0)
                .sum();
            assert!(
                (incoming - node.height).abs() < EPS,
                "{fixture}: incoming bands of {} sum to {incoming}, height {}",
                node.id,
                node.height
            );
        }
    }
}

fn assert_spacing_and_bounds(layout: &SankeyLayout, config: &SankeyConfig, fixture: &str) {
    let min_spacing = config.resolved_min_spacing(layout.height);
    for level in &layout.levels {
        let gaps = level.nodes.len().saturating_sub(1) as f64;
        // The configured minimum only gives way when its gaps alone fill the chart.
        let required = if gaps * min_spacing < layout.height {
            assert!(
                (level.spacing - min_spacing).abs() < EPS,
                "{fixture}: level {} spacing {} instead of {min_spacing}",
                level.level,
                level.spacing
            );
            min_spacing
        } else {
            level.spacing
        };
        for pair in level.nodes.windows(2) {
            let prev = &layout.nodes[pair[0]];
            let next = &layout.nodes[pair[1]];
            assert!(
                next.y >= prev.bottom() + required - EPS,
                "{fixture}: {} and {} closer than {required}",
                prev.id,
                next.id
            );
        }
        for &idx in &level.nodes {
            let node = &layout.nodes[idx];
            assert!(node.y >= -EPS, "{fixture}: {} above chart", node.id);
            assert!(
                node.bottom() <= layout.height + EPS,
                "{fixture}: {} below chart ({} > {})",
                node.id,
                node.bottom(),
                layout.height
            );
        }
    }
}

#[test]
fn acyclic_levels_are_monotonic() {
    for fixture in ["energy.json", "budget.json", "crowded.json"] {
        let layout = layout_fixture(fixture, 800.0, 500.0);
        assert!(!layout.cyclic, "{fixture}");
        for link in &layout.links {
            let source = layout.link_source(link);
            let target = layout.link_target(link);
            assert!(
                source.level < target.level,
                "{fixture}: {} -> {} not left to right",
                source.id,
                target.id
            );
        }
        assert_levels_total(&layout, fixture);
    }
}

#[test]
fn energy_levels_match_topology() {
    let layout = layout_fixture("energy.json", 900.0, 500.0);
    let level = |id: &str| layout.node(id).expect("node").level;
    for source in ["coal", "gas", "solar", "wind"] {
        assert_eq!(level(source), 0);
    }
    assert_eq!(level("grid"), 1);
    assert_eq!(level("heat"), 1);
    for sink in ["homes", "industry", "losses"] {
        assert_eq!(level(sink), 2);
    }
    assert_eq!(layout.node("grid").expect("grid").x, 300.0);
    assert_eq!(layout.node("solar").expect("solar").color, "#f2c14e");
}

#[test]
fn every_fixture_keeps_geometry_invariants() {
    for fixture in [
        "energy.json",
        "budget.json",
        "cycle.json",
        "recycling.json",
        "crowded.json",
    ] {
        for (width, height) in [(800.0, 500.0), (320.0, 180.0), (1600.0, 1200.0)] {
            let layout = layout_fixture(fixture, width, height);
            assert_levels_total(&layout, fixture);
            assert_bands_conserved(&layout, fixture);
            assert_spacing_and_bounds(&layout, &SankeyConfig::default(), fixture);
            for link in &layout.links {
                assert!(!link.path.is_empty(), "{fixture}: empty path");
                assert!((link.width - (link.sy1 - link.sy0)).abs() < EPS);
            }
        }
    }
}

#[test]
fn effective_spacing_uses_configured_minimum_when_it_fits() {
    let layout = layout_fixture("energy.json", 800.0, 500.0);
    // max(30, 500 * 0.15) = 75; the four sources have 350 / 3 units of gap.
    assert!((layout.levels[0].spacing - 75.0).abs() < EPS);
}

#[test]
fn layout_is_deterministic() {
    let graph = valid_graph("recycling.json");
    let dims = Dimensions::new(700.0, 420.0).expect("dims");
    let config = SankeyConfig {
        iterations: 12,
        link_color_mode: LinkColorMode::Gradient,
        ..SankeyConfig::default()
    };
    let first = compute_layout(&graph, dims, &config);
    let second = compute_layout(&graph, dims, &config);
    assert_eq!(first, second);
    let dump_a = serde_json::to_string(&LayoutDump::from_layout(&first, None)).expect("json");
    let dump_b = serde_json::to_string(&LayoutDump::from_layout(&second, None)).expect("json");
    assert_eq!(dump_a, dump_b);
}

#[test]
fn dimension_changes_recompute_everything() {
    let small = layout_fixture("energy.json", 400.0, 300.0);
    let large = layout_fixture("energy.json", 1200.0, 900.0);
    let grid_small = small.node("grid").expect("grid");
    let grid_large = large.node("grid").expect("grid");
    assert_eq!(grid_small.level, grid_large.level);
    assert!(grid_large.height > grid_small.height);
    assert!(grid_large.x > grid_small.x);
}

#[test]
fn two_node_flow_scenario() {
    let graph = Graph::new().node("A").node("B").link("A", "B", 10.0);
    let layout = compute_layout(
        &graph,
        Dimensions::new(600.0, 400.0).expect("dims"),
        &SankeyConfig::default(),
    );
    let a = layout.node("A").expect("A");
    let b = layout.node("B").expect("B");
    assert_eq!((a.level, b.level), (0, 1));
    let link = &layout.links[0];
    assert!((link.width - a.height.min(b.height)).abs() < EPS);
    assert!(link.path.starts_with(&format!("M {:.2}", a.x + a.width)));
    assert!(link.path.contains(&format!("{:.2}", b.x)));
}

#[test]
fn cycle_scenario_still_lays_out() {
    let raw = load_fixture("cycle.json");
    let validation = validate(&raw);
    assert!(validation.valid);
    assert!(
        validation
            .warning_messages()
            .iter()
            .any(|warning| warning.contains("cycle"))
    );
    let graph = validation.into_graph().expect("valid");
    let layout = compute_layout(
        &graph,
        Dimensions::new(600.0, 400.0).expect("dims"),
        &SankeyConfig::default(),
    );
    assert_eq!(layout.nodes.len(), 3);
    assert_eq!(layout.links.len(), 3);
    assert!(layout.cyclic);
    assert_levels_total(&layout, "cycle.json");
}

#[test]
fn links_outside_cycles_keep_direction() {
    let layout = layout_fixture("recycling.json", 800.0, 500.0);
    let in_cycle: HashSet<&str> = ["factory", "waste", "recycler"].into_iter().collect();
    for link in &layout.links {
        let source = layout.link_source(link);
        let target = layout.link_target(link);
        if in_cycle.contains(source.id.as_str()) && in_cycle.contains(target.id.as_str()) {
            continue;
        }
        assert!(
            source.level < target.level,
            "{} -> {} should run left to right",
            source.id,
            target.id
        );
    }
}

#[test]
fn invalid_fixture_reports_all_errors() {
    let validation = validate(&load_fixture("invalid.json"));
    assert!(!validation.valid);
    assert!(validation.graph.is_none());
    let messages = validation.error_messages();
    assert!(messages.iter().any(|m| m.contains("node 1") && m.contains("name")));
    assert!(messages.iter().any(|m| m.contains("link 0") && m.contains("value")));
    assert!(messages.iter().any(|m| m.contains("link 1") && m.contains("ghost")));
    assert!(messages.iter().any(|m| m.contains("link 2") && m.contains("target")));
}

#[test]
fn dangling_reference_is_always_named() {
    for (field, id) in [("source", "ghost"), ("target", "phantom-42")] {
        let mut raw = RawGraph::from(&Graph::new().node("A").node("B").link("A", "B", 1.0));
        let mut bad = raw.links[0].clone();
        match field {
            "source" => bad.source = Some(serde_json::json!(id)),
            _ => bad.target = Some(serde_json::json!(id)),
        }
        raw.links.push(bad);
        let validation = validate(&raw);
        assert!(!validation.valid);
        let messages = validation.error_messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("link 1"));
        assert!(messages[0].contains(id));
    }
}

#[test]
fn isolated_node_gets_floor_value() {
    let graph = Graph::new().node("solo");
    let layout = compute_layout(
        &graph,
        Dimensions::new(400.0, 300.0).expect("dims"),
        &SankeyConfig::default(),
    );
    assert_eq!(layout.nodes.len(), 1);
    assert!(layout.links.is_empty());
    let node = &layout.nodes[0];
    assert_eq!(node.value, 1.0);
    let height_scale = 300.0 / (1.0 * 1.2);
    assert!((node.height - f64::max(12.0, height_scale)).abs() < EPS);
}

#[test]
fn crowded_column_is_compressed() {
    let layout = layout_fixture("crowded.json", 600.0, 500.0);
    let column = &layout.levels[1];
    assert_eq!(column.nodes.len(), 6);
    assert_spacing_and_bounds(&layout, &SankeyConfig::default(), "crowded.json");
    // Five gaps of max(30, 0.15 * 500) = 75 leave 125 units for the nodes.
    assert!((column.spacing - 75.0).abs() < EPS);
    let total: f64 = column
        .nodes
        .iter()
        .map(|&idx| layout.nodes[idx].height)
        .sum();
    assert!((total - 125.0).abs() < EPS);
}

#[test]
fn explicit_minimum_spacing_is_kept_when_it_fits() {
    let graph = valid_graph("crowded.json");
    let config = SankeyConfig {
        min_spacing: Some(75.0),
        ..SankeyConfig::default()
    };
    for height in [500.0, 420.0, 380.0] {
        let dims = Dimensions::new(600.0, height).expect("dims");
        let layout = compute_layout(&graph, dims, &config);
        assert_spacing_and_bounds(&layout, &config, "crowded.json");
    }
}

#[test]
fn numeric_ids_and_explicit_values() {
    let layout = layout_fixture("budget.json", 800.0, 500.0);
    let budget = layout.node("3").expect("budget node");
    assert!((budget.value - 4850.5).abs() < EPS);
    assert_eq!(layout.node("8").expect("unused").value, 3.0);
    assert_eq!(layout.node("8").expect("unused").level, 0);
}

#[test]
fn render_all_fixtures() {
    let theme = Theme::modern();
    let render = RenderConfig::default();
    let (width, height) = render.content_size();
    for fixture in [
        "energy.json",
        "budget.json",
        "cycle.json",
        "recycling.json",
        "crowded.json",
    ] {
        let dims = Dimensions::new(width, height).expect("dims");
        let layout = compute_layout(&valid_graph(fixture), dims, &SankeyConfig::default());
        let svg = render_svg(&layout, &theme, &render);
        assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
        assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
        assert_eq!(svg.matches("<path ").count(), layout.links.len(), "{fixture}");
    }
}
