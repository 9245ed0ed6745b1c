//! Immutable undirected graph in compressed sparse form

use std::collections::HashMap;
use std::mem;

use serde::{Deserialize, Serialize};

use crate::graph::UnorderedPair;

/// Canonical edge key (smaller vertex first)
pub type EdgeKey = UnorderedPair<u32>;

/// Per-edge payload.
///
/// The engine only relies on the presence of the edge; the pheromone
/// fields and visit counter are carried for external optimizers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Smaller endpoint
    pub v1: u32,
    /// Larger endpoint
    pub v2: u32,
    pub pheromone: f64,
    pub initial_pheromone: f64,
    pub visits: u32,
}

impl Edge {
    pub fn new(key: EdgeKey) -> Self {
        Self {
            v1: key.low(),
            v2: key.high(),
            pheromone: 1.0,
            initial_pheromone: 1.0,
            visits: 0,
        }
    }
}

/// Compressed sparse representation of an undirected simple graph.
///
/// Every edge appears twice in the adjacency arrays (once per endpoint)
/// and once in the canonical edge set. Built by
/// [`GraphBuilder`](crate::graph::GraphBuilder) and never mutated after.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Number of vertices in the graph
    pub(crate) num_vertices: usize,

    /// Offset array: `offsets[v]..offsets[v + 1]` is the neighbor range of `v`
    pub(crate) offsets: Vec<u32>,

    /// Concatenated, sorted neighbor lists
    pub(crate) neighbors: Vec<u32>,

    /// Canonical edge set
    pub(crate) edges: HashMap<EdgeKey, Edge>,
}

impl Graph {
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Neighbors of `vertex`, sorted ascending
    pub fn neighbors(&self, vertex: usize) -> &[u32] {
        let start = self.offsets[vertex] as usize;
        let end = self.offsets[vertex + 1] as usize;
        &self.neighbors[start..end]
    }

    pub fn degree(&self, vertex: usize) -> usize {
        (self.offsets[vertex + 1] - self.offsets[vertex]) as usize
    }

    /// Sum of all degrees, `2m`
    pub fn total_degree(&self) -> usize {
        self.neighbors.len()
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        a < self.num_vertices && self.neighbors(a).binary_search(&(b as u32)).is_ok()
    }

    pub fn edge(&self, a: usize, b: usize) -> Option<&Edge> {
        self.edges.get(&UnorderedPair::new(a as u32, b as u32))
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Payloads of the edges incident to `vertex`, in neighbor order
    pub fn incident_edges(&self, vertex: usize) -> impl Iterator<Item = &Edge> + '_ {
        let v = vertex as u32;
        self.neighbors(vertex)
            .iter()
            .filter_map(move |&u| self.edges.get(&UnorderedPair::new(v, u)))
    }

    /// Estimate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let offsets = self.offsets.capacity() * mem::size_of::<u32>();
        let neighbors = self.neighbors.capacity() * mem::size_of::<u32>();
        let edges = self.edges.capacity() * (mem::size_of::<EdgeKey>() + mem::size_of::<Edge>());

        base + offsets + neighbors + edges
    }
}
