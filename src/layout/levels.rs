use super::graph::GraphIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Visited,
}

#[derive(Debug, Clone)]
pub(crate) struct Levels {
    pub level: Vec<usize>,
    /// Node indices per level, in input order.
    pub by_level: Vec<Vec<usize>>,
    pub max_level: usize,
    pub cyclic: bool,
}

struct Frame {
    node: usize,
    next_pred: usize,
    max_pred: Option<usize>,
}

/// Longest-path depth over predecessors: sources sit at level 0 and every
/// other node one column right of its deepest predecessor.
///
/// A predecessor reached while still on the traversal stack closes a cycle.
/// It is not descended into; it contributes `index % fallback_columns` to the
/// node being resolved and is itself resolved to at least that level. Links
/// that are not part of a cycle keep `level(source) < level(target)`.
pub(crate) fn assign_levels(index: &GraphIndex, fallback_columns: usize) -> Levels {
    let columns = fallback_columns.max(1);
    let fallback = |node: usize| node % columns;
    let n = index.node_count;

    let mut marks = vec![Mark::Unvisited; n];
    let mut level = vec![0usize; n];
    let mut on_cycle = vec![false; n];

    for root in 0..n {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::Visiting;
        let mut stack = vec![Frame {
            node: root,
            next_pred: 0,
            max_pred: None,
        }];

        while let Some(frame) = stack.last_mut() {
            let node = frame.node;
            if let Some(&edge_idx) = index.incoming[node].get(frame.next_pred) {
                frame.next_pred += 1;
                let pred = index.edges[edge_idx].from_idx;
                if pred == node {
                    continue;
                }
                match marks[pred] {
                    Mark::Visited => {
                        frame.max_pred = frame.max_pred.max(Some(level[pred]));
                    }
                    Mark::Visiting => {
                        on_cycle[pred] = true;
                        frame.max_pred = frame.max_pred.max(Some(fallback(pred)));
                    }
                    Mark::Unvisited => {
                        marks[pred] = Mark::Visiting;
                        stack.push(Frame {
                            node: pred,
                            next_pred: 0,
                            max_pred: None,
                        });
                    }
                }
                continue;
            }

            let depth = frame.max_pred.map_or(0, |max_pred| max_pred + 1);
            let resolved = if on_cycle[node] {
                depth.max(fallback(node))
            } else {
                depth
            };
            level[node] = resolved;
            marks[node] = Mark::Visited;
            stack.pop();
            if let Some(parent) = stack.last_mut() {
                parent.max_pred = parent.max_pred.max(Some(resolved));
            }
        }
    }

    compact_levels(&mut level);
    let max_level = level.iter().copied().max().unwrap_or(0);
    let mut by_level: Vec<Vec<usize>> = vec![Vec::new(); max_level + 1];
    for (node, &lvl) in level.iter().enumerate() {
        by_level[lvl].push(node);
    }
    let cyclic = on_cycle.iter().any(|&flag| flag);
    if cyclic {
        tracing::warn!(
            nodes = on_cycle.iter().filter(|&&flag| flag).count(),
            "cycle in flow graph, using fallback leveling"
        );
    }
    tracing::debug!(max_level, cyclic, "assigned levels");

    Levels {
        level,
        by_level,
        max_level,
        cyclic,
    }
}

/// Fallback levels can leave columns empty; renumber so every level in
/// `[0, max_level]` holds at least one node. Order between levels is kept.
fn compact_levels(level: &mut [usize]) {
    let Some(max_level) = level.iter().copied().max() else {
        return;
    };
    let mut occupied = vec![false; max_level + 1];
    for &lvl in level.iter() {
        occupied[lvl] = true;
    }
    let mut remap = vec![0usize; max_level + 1];
    let mut next = 0;
    for (lvl, used) in occupied.iter().enumerate() {
        if *used {
            remap[lvl] = next;
            next += 1;
        }
    }
    for lvl in level.iter_mut() {
        *lvl = remap[*lvl];
    }
}
