//! Graph construction module

use std::collections::HashMap;

use crate::error::GraphError;
use crate::graph::compressed::{Edge, EdgeKey};
use crate::graph::{Graph, UnorderedPair};

/// Builder for incrementally constructing a [`Graph`]
pub struct GraphBuilder {
    /// Number of vertices
    node_count: usize,

    /// Adjacency lists for each vertex
    adjacency_lists: Vec<Vec<u32>>,

    /// Canonical edge set, used for duplicate detection
    edges: HashMap<EdgeKey, Edge>,

    /// Number of duplicate edges that were dropped
    duplicates: usize,
}

impl GraphBuilder {
    /// Create a builder with `node_count` isolated vertices
    pub fn with_capacity(node_count: usize) -> Self {
        Self {
            node_count,
            adjacency_lists: vec![Vec::new(); node_count],
            edges: HashMap::new(),
            duplicates: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Grow the vertex set so that `vertex` is a valid index
    pub fn ensure_vertex(&mut self, vertex: usize) {
        if vertex >= self.node_count {
            self.node_count = vertex + 1;
            self.adjacency_lists.resize_with(self.node_count, Vec::new);
        }
    }

    /// Add an undirected edge.
    ///
    /// Returns `Ok(false)` when the edge was already present; duplicates
    /// are logged and ignored. A self-loop, or a vertex index that does not
    /// fit the `u32` adjacency storage, is rejected.
    pub fn add_edge(&mut self, a: usize, b: usize) -> Result<bool, GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop { vertex: a });
        }
        let largest = a.max(b);
        if largest >= u32::MAX as usize {
            return Err(GraphError::VertexOutOfRange {
                id: i64::try_from(largest).unwrap_or(i64::MAX),
                num_vertices: self.node_count,
            });
        }
        self.ensure_vertex(largest);

        let key = UnorderedPair::new(a as u32, b as u32);
        if self.edges.contains_key(&key) {
            log::warn!("Ignoring duplicate edge {} - {}", key.low(), key.high());
            self.duplicates += 1;
            return Ok(false);
        }

        self.edges.insert(key, Edge::new(key));
        self.adjacency_lists[a].push(b as u32);
        self.adjacency_lists[b].push(a as u32);

        Ok(true)
    }

    /// Build the compressed graph
    pub fn build(mut self) -> Graph {
        let total: usize = self.adjacency_lists.iter().map(Vec::len).sum();

        let mut offsets = Vec::with_capacity(self.node_count + 1);
        offsets.push(0);

        let mut offset = 0;
        for list in &self.adjacency_lists {
            offset += list.len() as u32;
            offsets.push(offset);
        }

        let mut neighbors = Vec::with_capacity(total);
        for list in &mut self.adjacency_lists {
            // Sort for binary search in has_edge
            list.sort_unstable();
            neighbors.extend_from_slice(list);
        }

        if self.duplicates > 0 {
            log::info!("Dropped {} duplicate edges", self.duplicates);
        }

        Graph {
            num_vertices: self.node_count,
            offsets,
            neighbors,
            edges: self.edges,
        }
    }
}
