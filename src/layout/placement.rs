use std::cmp::Ordering;

use crate::config::SankeyConfig;

use super::graph::GraphIndex;
use super::levels::Levels;
use super::types::Dimensions;

const MAX_SPACING_RATIO: f64 = 0.95;

#[derive(Debug, Clone)]
pub(crate) struct Column {
    /// Node indices, top to bottom.
    pub order: Vec<usize>,
    pub spacing: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct Placement {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub height: Vec<f64>,
    pub columns: Vec<Column>,
}

pub(crate) fn place_nodes(
    index: &GraphIndex,
    levels: &Levels,
    dims: Dimensions,
    config: &SankeyConfig,
) -> Placement {
    let chart_height = dims.height;
    let spacing_ratio = config.spacing_ratio.clamp(0.0, MAX_SPACING_RATIO);
    let min_spacing = config.resolved_min_spacing(chart_height);

    let headroom = config.height_headroom.max(1.0);
    let height_scale = chart_height / (index.max_value() * headroom);
    let mut height: Vec<f64> = index
        .values
        .iter()
        .map(|value| {
            (value * height_scale)
                .max(config.min_node_height)
                .min(chart_height)
        })
        .collect();

    let column_width = dims.width / (levels.max_level + 1) as f64;
    let x: Vec<f64> = levels
        .level
        .iter()
        .map(|&lvl| lvl as f64 * column_width)
        .collect();

    let mut y = vec![0.0f64; index.node_count];
    let mut columns = Vec::with_capacity(levels.by_level.len());
    for members in &levels.by_level {
        columns.push(initial_column(
            members,
            &index.values,
            &mut height,
            &mut y,
            chart_height,
            spacing_ratio,
            min_spacing,
        ));
    }

    let damping = config.damping.clamp(0.0, 1.0);
    let stretch_threshold = config.stretch_threshold.clamp(0.0, 1.0);
    for _ in 0..config.iterations {
        y = relax(index, &y, &height, damping);
        for column in &mut columns {
            fit_column(
                column,
                &mut y,
                &height,
                chart_height,
                stretch_threshold,
            );
        }
    }
    tracing::debug!(
        iterations = config.iterations,
        columns = columns.len(),
        "placed nodes"
    );

    Placement {
        x,
        y,
        height,
        columns,
    }
}

/// Sorts a column by value, shares the chart height between gaps and nodes,
/// and stacks the nodes from the top.
///
/// Gaps get `spacing_ratio` of the height, raised to `min_spacing` per gap
/// when that still fits; node heights shrink uniformly into what is left.
/// Only when the minimum gaps alone would fill the column does the spacing
/// drop below `min_spacing`.
fn initial_column(
    members: &[usize],
    values: &[f64],
    height: &mut [f64],
    y: &mut [f64],
    chart_height: f64,
    spacing_ratio: f64,
    min_spacing: f64,
) -> Column {
    let mut order = members.to_vec();
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });

    let gap_count = order.len().saturating_sub(1);
    let (gap_budget, spacing) = if gap_count == 0 {
        (0.0, min_spacing)
    } else {
        let ratio_budget = chart_height * spacing_ratio;
        let required = min_spacing * gap_count as f64;
        if required < chart_height {
            (ratio_budget.max(required), min_spacing)
        } else {
            (ratio_budget, ratio_budget / gap_count as f64)
        }
    };
    let node_budget = chart_height - gap_budget;
    let total: f64 = order.iter().map(|&node| height[node]).sum();
    if total > node_budget && total > 0.0 {
        let shrink = node_budget / total;
        for &node in &order {
            height[node] *= shrink;
        }
    }

    let gap = if gap_count > 0 {
        gap_budget / gap_count as f64
    } else {
        0.0
    };
    let mut cursor = 0.0;
    for &node in &order {
        y[node] = cursor;
        cursor += height[node] + gap;
    }

    Column { order, spacing }
}

/// One barycentric pass over a snapshot of positions: every linked node moves
/// part of the way toward the flow-weighted mean center of its neighbours.
fn relax(index: &GraphIndex, y: &[f64], height: &[f64], damping: f64) -> Vec<f64> {
    let center = |node: usize| y[node] + height[node] / 2.0;
    (0..index.node_count)
        .map(|node| {
            let mut weighted = 0.0;
            let mut weight = 0.0;
            let neighbours = index.incoming[node]
                .iter()
                .map(|&edge_idx| (index.edges[edge_idx].from_idx, edge_idx))
                .chain(
                    index.outgoing[node]
                        .iter()
                        .map(|&edge_idx| (index.edges[edge_idx].to_idx, edge_idx)),
                );
            for (other, edge_idx) in neighbours {
                if other == node {
                    continue;
                }
                let value = index.edges[edge_idx].value;
                weighted += center(other) * value;
                weight += value;
            }
            if weight <= 0.0 {
                return y[node];
            }
            let ideal = weighted / weight - height[node] / 2.0;
            y[node] * (1.0 - damping) + ideal * damping
        })
        .collect()
}

/// Re-sorts a column by position, pushes overlapping nodes down to keep the
/// column's spacing, then compresses or stretches the gaps so the column fits
/// inside `[0, chart_height]`, keeping the first node where it was if it can.
fn fit_column(
    column: &mut Column,
    y: &mut [f64],
    height: &[f64],
    chart_height: f64,
    stretch_threshold: f64,
) {
    let order = &mut column.order;
    if order.is_empty() {
        return;
    }
    order.sort_by(|&a, &b| y[a].total_cmp(&y[b]).then_with(|| a.cmp(&b)));

    let spacing = column.spacing;
    for pair in 1..order.len() {
        let (prev, node) = (order[pair - 1], order[pair]);
        let min_y = y[prev] + height[prev] + spacing;
        if y[node] < min_y {
            y[node] = min_y;
        }
    }

    let mut gaps: Vec<f64> = order
        .windows(2)
        .map(|pair| y[pair[1]] - (y[pair[0]] + height[pair[0]]))
        .collect();
    let total_height: f64 = order.iter().map(|&node| height[node]).sum();
    let span = total_height + gaps.iter().sum::<f64>();

    if span > chart_height {
        let min_span = total_height + spacing * gaps.len() as f64;
        let slack: f64 = gaps.iter().map(|gap| gap - spacing).sum();
        if slack > 0.0 {
            let keep = ((chart_height - min_span) / slack).clamp(0.0, 1.0);
            for gap in &mut gaps {
                *gap = spacing + (*gap - spacing) * keep;
            }
        }
    } else if !gaps.is_empty() && span < chart_height * stretch_threshold {
        let target = chart_height * stretch_threshold - total_height;
        let gap_sum: f64 = gaps.iter().sum();
        if gap_sum > 0.0 {
            let grow = target / gap_sum;
            for gap in &mut gaps {
                *gap *= grow;
            }
        } else {
            let even = target / gaps.len() as f64;
            gaps.fill(even);
        }
    }

    let span = total_height + gaps.iter().sum::<f64>();
    let top = y[order[0]].clamp(0.0, (chart_height - span).max(0.0));
    y[order[0]] = top;
    for (pair, gap) in gaps.iter().enumerate() {
        let (prev, node) = (order[pair], order[pair + 1]);
        y[node] = y[prev] + height[prev] + gap;
    }
}
