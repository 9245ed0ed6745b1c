//! Partition quality metrics
//!
//! The formulas here work on aggregates only, so the engine can evaluate a
//! partition without touching the graph. The `*_rescan` variants recompute
//! the same quantities from a plain assignment vector by scanning every edge;
//! they are the reference the incremental bookkeeping is checked against.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::graph::Graph;

/// How per-community conductance values are combined into one number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ConductancePolicy {
    /// Largest conductance over all communities
    WorstCase,
    /// Mean conductance weighted by community size
    WeightedAverage,
}

/// Contribution of one community to modularity:
/// `internal / m - (degree_sum / 2m)^2`
pub fn modularity_term(internal_edges: usize, degree_sum: usize, num_edges: usize) -> f64 {
    if num_edges == 0 {
        return 0.0;
    }
    let m = num_edges as f64;
    let share = degree_sum as f64 / (2.0 * m);
    internal_edges as f64 / m - share * share
}

/// Conductance of one community: `cut / min(volume, 2m - volume)`.
///
/// A community with no volume on one side (isolated vertices, or a
/// community holding every edge) has nothing to cut and scores 0.
pub fn conductance_ratio(cut_edges: usize, degree_sum: usize, total_degree: usize) -> f64 {
    let volume = degree_sum.min(total_degree.saturating_sub(degree_sum));
    if volume == 0 {
        return 0.0;
    }
    cut_edges as f64 / volume as f64
}

/// Combine `(size, conductance)` pairs under `policy`
pub fn aggregate_conductance<I>(values: I, num_vertices: usize, policy: ConductancePolicy) -> f64
where
    I: IntoIterator<Item = (usize, f64)>,
{
    match policy {
        ConductancePolicy::WorstCase => values
            .into_iter()
            .map(|(_, phi)| phi)
            .fold(0.0, f64::max),
        ConductancePolicy::WeightedAverage => {
            if num_vertices == 0 {
                return 0.0;
            }
            values
                .into_iter()
                .map(|(size, phi)| size as f64 * phi)
                .sum::<f64>()
                / num_vertices as f64
        }
    }
}

/// Density (actual edges / potential edges) of an undirected community
pub fn density(internal_edges: usize, size: usize) -> f32 {
    if size <= 1 {
        return 1.0; // By convention, singleton communities have density 1
    }
    let potential_edges = size * (size - 1) / 2;
    internal_edges as f32 / potential_edges as f32
}

/// Per-label size, internal edge count, degree sum and cut, from a full edge scan
fn rescan(graph: &Graph, assignment: &[usize]) -> HashMap<usize, (usize, usize, usize, usize)> {
    // label -> (size, internal edges, degree sum, cut edges)
    let mut totals: HashMap<usize, (usize, usize, usize, usize)> = HashMap::new();

    for (v, &label) in assignment.iter().enumerate() {
        let entry = totals.entry(label).or_insert((0, 0, 0, 0));
        entry.0 += 1;
        entry.2 += graph.degree(v);
    }

    for edge in graph.edges() {
        let a = assignment[edge.v1 as usize];
        let b = assignment[edge.v2 as usize];
        if a == b {
            if let Some(entry) = totals.get_mut(&a) {
                entry.1 += 1;
            }
        } else {
            for label in [a, b] {
                if let Some(entry) = totals.get_mut(&label) {
                    entry.3 += 1;
                }
            }
        }
    }

    totals
}

/// Modularity of `assignment` (one label per vertex) by scanning all edges
pub fn modularity_rescan(graph: &Graph, assignment: &[usize]) -> f64 {
    rescan(graph, assignment)
        .values()
        .map(|&(_, internal, degree_sum, _)| modularity_term(internal, degree_sum, graph.num_edges()))
        .sum()
}

/// Conductance of `assignment` by scanning all edges
pub fn conductance_rescan(graph: &Graph, assignment: &[usize], policy: ConductancePolicy) -> f64 {
    let total_degree = graph.total_degree();
    let values = rescan(graph, assignment)
        .into_values()
        .map(|(size, _, degree_sum, cut)| (size, conductance_ratio(cut, degree_sum, total_degree)));
    aggregate_conductance(values, graph.num_vertices(), policy)
}
