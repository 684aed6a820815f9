//! Reply-tree flattening for display.
//!
//! Upstream data is not guaranteed to be acyclic, so the walk keeps a visited
//! set and clamps indentation at a depth bound. Every record of the set shows
//! up exactly once.

use serde::Serialize;

use super::record_set::{RecordIndex, RecordSet};
use super::sorting::Sorting;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThreadRow {
    /// Reply depth, clamped to the bound the rows were built with.
    pub depth: usize,
    pub index: RecordIndex,
}

/// Depth-first rows: roots first (records without a resolved parent), each
/// followed by its replies. Siblings are ordered by `sorting`. Records only
/// reachable through a cycle are emitted afterwards as extra roots.
pub fn thread_rows(set: &RecordSet, sorting: &Sorting, max_depth: usize) -> Vec<ThreadRow> {
    let records = set.records();
    let count = records.len();

    let mut children: Vec<Vec<RecordIndex>> = vec![Vec::new(); count];
    let mut roots = Vec::new();
    for index in 0..count {
        match set.parent_index(index) {
            Some(parent) if parent != index => children[parent].push(index),
            _ => roots.push(index),
        }
    }
    sorting.sort_indices(records, &mut roots);
    for siblings in &mut children {
        sorting.sort_indices(records, siblings);
    }

    let mut visited = vec![false; count];
    let mut rows = Vec::with_capacity(count);
    let mut stack: Vec<(RecordIndex, usize)> = Vec::new();

    let mut leftovers: Vec<RecordIndex> = (0..count).collect();
    sorting.sort_indices(records, &mut leftovers);

    for start in roots.into_iter().chain(leftovers) {
        if visited[start] {
            continue;
        }
        stack.push((start, 0));
        while let Some((index, depth)) = stack.pop() {
            if visited[index] {
                continue;
            }
            visited[index] = true;
            rows.push(ThreadRow {
                depth: depth.min(max_depth),
                index,
            });
            for &child in children[index].iter().rev() {
                if !visited[child] {
                    stack.push((child, depth.saturating_add(1)));
                }
            }
        }
    }

    if rows.iter().any(|row| row.depth == max_depth && max_depth > 0) {
        tracing::debug!(max_depth, "Thread deeper than the display bound, indentation clamped");
    }
    rows
}
