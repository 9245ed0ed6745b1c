//! Whole-graph statistics used for reporting

use itertools::Itertools;
use serde::Serialize;

use crate::graph::Graph;

/// Summary counts for a loaded graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub num_vertices: usize,
    pub num_edges: usize,
    pub avg_degree: f64,
    pub min_degree: usize,
    pub max_degree: usize,
    pub isolated_vertices: usize,
}

/// Compute summary counts in one pass over the vertices
pub fn graph_stats(graph: &Graph) -> GraphStats {
    let n = graph.num_vertices();

    let (min_degree, max_degree) = (0..n)
        .map(|v| graph.degree(v))
        .minmax()
        .into_option()
        .unwrap_or((0, 0));

    let isolated_vertices = (0..n).filter(|&v| graph.degree(v) == 0).count();

    let avg_degree = if n == 0 {
        0.0
    } else {
        graph.total_degree() as f64 / n as f64
    };

    GraphStats {
        num_vertices: n,
        num_edges: graph.num_edges(),
        avg_degree,
        min_degree,
        max_degree,
        isolated_vertices,
    }
}

/// Histogram of vertex degrees; the last bucket collects every degree `>= max_bucket`
pub fn degree_distribution(graph: &Graph, max_bucket: usize) -> Vec<usize> {
    let mut buckets = vec![0; max_bucket + 1];
    for v in 0..graph.num_vertices() {
        buckets[graph.degree(v).min(max_bucket)] += 1;
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    fn star(leaves: usize) -> Graph {
        let mut builder = GraphBuilder::with_capacity(leaves + 2);
        for leaf in 1..=leaves {
            builder.add_edge(0, leaf).unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_graph_stats() {
        let graph = star(4);
        let stats = graph_stats(&graph);

        assert_eq!(stats.num_vertices, 6);
        assert_eq!(stats.num_edges, 4);
        assert_eq!(stats.min_degree, 0);
        assert_eq!(stats.max_degree, 4);
        assert_eq!(stats.isolated_vertices, 1);
        assert!((stats.avg_degree - 8.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_degree_distribution_clamps() {
        let graph = star(4);
        let dist = degree_distribution(&graph, 2);
        assert_eq!(dist, vec![1, 4, 1]);
    }

    #[test]
    fn test_empty_graph_stats() {
        let graph = GraphBuilder::with_capacity(0).build();
        let stats = graph_stats(&graph);
        assert_eq!(stats.num_vertices, 0);
        assert_eq!(stats.avg_degree, 0.0);
        assert_eq!(stats.max_degree, 0);
    }
}
