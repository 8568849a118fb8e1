use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sankey_layout::config::{RenderConfig, SankeyConfig};
use sankey_layout::ir::Graph;
use sankey_layout::layout::{Dimensions, compute_layout};
use sankey_layout::parser::parse_graph;
use sankey_layout::render::render_svg;
use sankey_layout::theme::Theme;
use sankey_layout::validate::validate;
use std::hint::black_box;

/// `columns` levels of `per_column` nodes; every node feeds the next column
/// with a fan-out of `fanout`, plus one back edge per column.
fn layered_graph(columns: usize, per_column: usize, fanout: usize) -> Graph {
    let id = |col: usize, row: usize| format!("c{col}r{row}");
    let mut graph = Graph::new();
    for col in 0..columns {
        for row in 0..per_column {
            graph = graph.node(&id(col, row));
        }
    }
    for col in 0..columns.saturating_sub(1) {
        for row in 0..per_column {
            for step in 0..fanout.min(per_column) {
                let target = (row + step) % per_column;
                let value = 1.0 + ((row * 7 + step * 3 + col) % 11) as f64;
                graph = graph.link(&id(col, row), &id(col + 1, target), value);
            }
        }
        if col > 0 {
            graph = graph.link(&id(col, 0), &id(col - 1, per_column - 1), 0.5);
        }
    }
    graph
}

fn fixture(name: &str) -> &'static str {
    match name {
        "energy" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/energy.json"
        )),
        "budget" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/budget.json"
        )),
        "recycling" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/recycling.json"
        )),
        _ => panic!("unknown fixture {name}"),
    }
}

fn bench_fixtures(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_fixtures");
    let config = SankeyConfig::default();
    let dims = Dimensions::new(820.0, 500.0).expect("dims");
    for name in ["energy", "budget", "recycling"] {
        let raw = parse_graph(fixture(name)).expect("parse failed");
        let graph = validate(&raw).into_graph().expect("invalid fixture");
        group.bench_with_input(BenchmarkId::from_parameter(name), &graph, |b, graph| {
            b.iter(|| {
                let layout = compute_layout(black_box(graph), dims, &config);
                black_box(layout.links.len());
            });
        });
    }
    group.finish();
}

fn bench_layered(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_layered");
    let dims = Dimensions::new(1600.0, 900.0).expect("dims");
    for (columns, per_column, fanout) in [(4usize, 8usize, 2usize), (8, 20, 3), (12, 40, 4)] {
        let name = format!("{columns}x{per_column}_f{fanout}");
        let graph = layered_graph(columns, per_column, fanout);
        for iterations in [0usize, 5, 20] {
            let config = SankeyConfig {
                iterations,
                ..SankeyConfig::default()
            };
            group.bench_with_input(
                BenchmarkId::new(format!("iter{iterations}"), &name),
                &graph,
                |b, graph| {
                    b.iter(|| {
                        let layout = compute_layout(black_box(graph), dims, &config);
                        black_box(layout.nodes.len());
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    for (columns, per_column) in [(8usize, 20usize), (12, 40)] {
        let graph = layered_graph(columns, per_column, 3);
        let raw = sankey_layout::ir::RawGraph::from(&graph);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{columns}x{per_column}")),
            &raw,
            |b, raw| {
                b.iter(|| {
                    let validation = validate(black_box(raw));
                    black_box(validation.valid);
                });
            },
        );
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let theme = Theme::modern();
    let render = RenderConfig::default();
    let (width, height) = render.content_size();
    let dims = Dimensions::new(width, height).expect("dims");
    let graph = layered_graph(8, 20, 3);
    let layout = compute_layout(&graph, dims, &SankeyConfig::default());
    c.bench_function("render_svg_8x20", |b| {
        b.iter(|| {
            let svg = render_svg(black_box(&layout), &theme, &render);
            black_box(svg.len());
        });
    });
}

criterion_group!(
    benches,
    bench_fixtures,
    bench_layered,
    bench_validate,
    bench_render
);
criterion_main!(benches);
