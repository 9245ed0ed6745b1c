//! A single community and its cached aggregates

use std::collections::{HashMap, HashSet};

use crate::cluster::{metrics, CommunityId};
use crate::error::PartitionError;
use crate::graph::Graph;

/// Neighbor communities whose crossing-edge count changed, with the amount
pub type NeighborChanges = Vec<(CommunityId, usize)>;

/// A set of vertices plus the statistics needed to score it.
///
/// The community never looks at the shared tables of its owner. Callers pass
/// a lookup resolving the current community of the *other* vertices, and
/// mirror the returned [`NeighborChanges`] onto the neighbor side.
#[derive(Debug, Clone)]
pub struct Community {
    id: CommunityId,

    /// Vertices of the graph assigned here
    members: HashSet<usize>,

    /// Neighboring communities and the number of graph edges crossing to each
    neighbors: HashMap<CommunityId, usize>,

    /// Member edge endpoints whose other end is outside (the cut size)
    total_out_degree: usize,

    /// Member edge endpoints whose other end is inside (twice the internal edges)
    total_in_degree: usize,

    degree_sum: usize,
    internal_edges: usize,
}

impl Community {
    pub fn new(id: CommunityId) -> Self {
        Self {
            id,
            members: HashSet::new(),
            neighbors: HashMap::new(),
            total_out_degree: 0,
            total_in_degree: 0,
            degree_sum: 0,
            internal_edges: 0,
        }
    }

    /// Insert `vertex`, counting its edges to members as internal and
    /// recording every other resolved neighbor community.
    ///
    /// `community_of` may return `None` for vertices that are not assigned
    /// yet; those edges are picked up when the other endpoint is added.
    pub fn add_vertex<F>(
        &mut self,
        vertex: usize,
        graph: &Graph,
        community_of: F,
    ) -> Result<NeighborChanges, PartitionError>
    where
        F: Fn(usize) -> Option<CommunityId>,
    {
        self.check_vertex(vertex, graph)?;
        if self.members.contains(&vertex) {
            return Err(PartitionError::AlreadyMember {
                vertex,
                community: self.id,
            });
        }

        let (internal, crossing) = self.split_neighbors(vertex, graph, &community_of);

        self.members.insert(vertex);
        self.degree_sum += graph.degree(vertex);
        self.internal_edges += internal;
        self.total_in_degree += 2 * internal;
        self.total_out_degree = self.degree_sum - self.total_in_degree;

        for &(other, count) in &crossing {
            self.link(other, count);
        }

        Ok(crossing)
    }

    /// Exact inverse of [`add_vertex`](Self::add_vertex).
    ///
    /// Neighbor relations whose last crossing edge went through `vertex`
    /// are dropped. Removing the last member leaves an empty community,
    /// which the owner is expected to dissolve.
    pub fn remove_vertex<F>(
        &mut self,
        vertex: usize,
        graph: &Graph,
        community_of: F,
    ) -> Result<NeighborChanges, PartitionError>
    where
        F: Fn(usize) -> Option<CommunityId>,
    {
        self.check_vertex(vertex, graph)?;
        if !self.members.remove(&vertex) {
            return Err(PartitionError::NotMember {
                vertex,
                community: self.id,
            });
        }

        let (internal, crossing) = self.split_neighbors(vertex, graph, &community_of);

        decrement(&mut self.degree_sum, graph.degree(vertex), "degree sum", self.id);
        decrement(&mut self.internal_edges, internal, "internal edges", self.id);
        decrement(&mut self.total_in_degree, 2 * internal, "in-degree", self.id);
        self.total_out_degree = self.degree_sum - self.total_in_degree;

        for &(other, count) in &crossing {
            self.unlink(other, count);
        }

        Ok(crossing)
    }

    /// Record `count` more crossing edges to `other`
    pub fn link(&mut self, other: CommunityId, count: usize) {
        if count > 0 {
            *self.neighbors.entry(other).or_insert(0) += count;
        }
    }

    /// Forget `count` crossing edges to `other`, dropping the relation at zero
    pub fn unlink(&mut self, other: CommunityId, count: usize) {
        if count == 0 {
            return;
        }
        let Some(current) = self.neighbors.get_mut(&other) else {
            panic!("community {}: no crossing edges to {other} to remove", self.id);
        };
        decrement(current, count, "crossing edges", self.id);
        if *current == 0 {
            self.neighbors.remove(&other);
        }
    }

    pub fn id(&self) -> CommunityId {
        self.id
    }

    pub fn members(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().copied()
    }

    /// Members in ascending order
    pub fn sorted_members(&self) -> Vec<usize> {
        let mut members: Vec<_> = self.members.iter().copied().collect();
        members.sort_unstable();
        members
    }

    pub fn contains(&self, vertex: usize) -> bool {
        self.members.contains(&vertex)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Communities sharing at least one graph edge with this one
    pub fn neighbors(&self) -> impl Iterator<Item = CommunityId> + '_ {
        self.neighbors.keys().copied()
    }

    pub fn crossing_edges_to(&self, other: CommunityId) -> usize {
        self.neighbors.get(&other).copied().unwrap_or(0)
    }

    pub fn degree_sum(&self) -> usize {
        self.degree_sum
    }

    pub fn internal_edges(&self) -> usize {
        self.internal_edges
    }

    pub fn total_in_degree(&self) -> usize {
        self.total_in_degree
    }

    pub fn total_out_degree(&self) -> usize {
        self.total_out_degree
    }

    pub fn density(&self) -> f32 {
        metrics::density(self.internal_edges, self.members.len())
    }

    fn check_vertex(&self, vertex: usize, graph: &Graph) -> Result<(), PartitionError> {
        if vertex >= graph.num_vertices() {
            return Err(PartitionError::VertexOutOfRange {
                vertex,
                num_vertices: graph.num_vertices(),
            });
        }
        Ok(())
    }

    /// Count `vertex`'s edges to current members and group the rest by the
    /// community on the other end.
    fn split_neighbors<F>(
        &self,
        vertex: usize,
        graph: &Graph,
        community_of: &F,
    ) -> (usize, NeighborChanges)
    where
        F: Fn(usize) -> Option<CommunityId>,
    {
        let mut internal = 0;
        let mut crossing: HashMap<CommunityId, usize> = HashMap::new();

        for &u in graph.neighbors(vertex) {
            let u = u as usize;
            if self.members.contains(&u) {
                internal += 1;
            } else if let Some(other) = community_of(u).filter(|&c| c != self.id) {
                *crossing.entry(other).or_insert(0) += 1;
            }
        }

        (internal, crossing.into_iter().collect())
    }
}

/// Subtract from an aggregate; going below zero means the caller broke an invariant
fn decrement(counter: &mut usize, by: usize, what: &str, id: CommunityId) {
    match counter.checked_sub(by) {
        Some(value) => *counter = value,
        None => panic!("community {id}: {what} would become negative ({counter} - {by})"),
    }
}
