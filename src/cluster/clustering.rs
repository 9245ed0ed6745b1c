//! Partition of a graph into communities with incrementally maintained tables
//!
//! Communities live in an arena indexed by [`CommunityId`]; every cross
//! reference (vertex lookup, neighbor sets, the community-pair edge table,
//! per-vertex connection caches) stores ids. A vertex move touches only the
//! entries reachable from that vertex's neighbor list.

use std::collections::HashMap;

use crate::cluster::community::{Community, NeighborChanges};
use crate::cluster::metrics::{self, ConductancePolicy};
use crate::cluster::{CommunityId, CommunitySummary};
use crate::data::partition;
use crate::error::PartitionError;
use crate::graph::{Graph, UnorderedPair};

/// Key of the inter-community edge table
pub type CommunityPair = UnorderedPair<CommunityId>;

/// What a successful move did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub vertex: usize,
    pub from: CommunityId,
    pub to: CommunityId,
    /// `from` lost its last member and was removed
    pub dissolved: bool,
}

/// A partition of a graph's vertices
#[derive(Debug, Clone)]
pub struct Clustering<'g> {
    graph: &'g Graph,

    /// Arena of communities; `None` marks a dissolved id
    communities: Vec<Option<Community>>,

    /// Number of live communities
    live: usize,

    /// Community of every vertex
    vertex_community: Vec<CommunityId>,

    /// Crossing edge count per unordered community pair; absent means zero
    community_edges: HashMap<CommunityPair, usize>,

    /// Per vertex: neighboring community -> edges from the vertex into it
    vertex_connections: Vec<HashMap<CommunityId, usize>>,

    modularity: f64,
}

impl<'g> Clustering<'g> {
    /// One singleton community per vertex
    pub fn new(graph: &'g Graph) -> Self {
        let labels = partition::singleton_partition(graph.num_vertices());
        match Self::with_initial_partition(graph, &labels) {
            Ok(clustering) => clustering,
            Err(err) => unreachable!("singleton partition is always valid: {err}"),
        }
    }

    /// Build from a per-vertex label vector.
    ///
    /// `-1` puts the vertex in its own community; vertices sharing a
    /// non-negative label share a community. Community ids are assigned in
    /// order of first appearance.
    pub fn with_initial_partition(graph: &'g Graph, labels: &[i64]) -> Result<Self, PartitionError> {
        let n = graph.num_vertices();
        if labels.len() != n {
            return Err(PartitionError::PartitionLength {
                expected: n,
                found: labels.len(),
            });
        }

        let mut label_ids: HashMap<i64, CommunityId> = HashMap::new();
        let mut staged = Vec::with_capacity(n);
        let mut next = 0;

        for (vertex, &label) in labels.iter().enumerate() {
            let id = match label {
                -1 => {
                    next += 1;
                    CommunityId(next - 1)
                }
                label if label >= 0 => *label_ids.entry(label).or_insert_with(|| {
                    next += 1;
                    CommunityId(next - 1)
                }),
                label => return Err(PartitionError::InvalidLabel { vertex, label }),
            };
            staged.push(id);
        }

        let mut communities: Vec<Option<Community>> =
            (0..next).map(|id| Some(Community::new(CommunityId(id)))).collect();
        let mut community_edges = HashMap::new();
        let mut assigned: Vec<Option<CommunityId>> = vec![None; n];

        // Each crossing edge is recorded once, when its second endpoint is added
        for (vertex, &id) in staged.iter().enumerate() {
            let gained = slot(&mut communities, id).add_vertex(vertex, graph, |u| assigned[u])?;
            for (other, count) in gained {
                slot(&mut communities, other).link(id, count);
                *community_edges.entry(UnorderedPair::new(id, other)).or_insert(0) += count;
            }
            assigned[vertex] = Some(id);
        }

        let vertex_connections = (0..n)
            .map(|vertex| connections_of(graph, &staged, vertex))
            .collect();

        let mut clustering = Self {
            graph,
            communities,
            live: next,
            vertex_community: staged,
            community_edges,
            vertex_connections,
            modularity: 0.0,
        };
        clustering.modularity = clustering.recompute_modularity();

        log::debug!(
            "Built clustering with {} communities over {} vertices",
            clustering.live,
            n
        );

        Ok(clustering)
    }

    /// Move `vertex` from `from` into the existing community `to`.
    ///
    /// All arguments are validated before anything is mutated, so an error
    /// leaves the clustering untouched. Moving within the same community is
    /// a no-op.
    pub fn move_vertex(
        &mut self,
        vertex: usize,
        from: CommunityId,
        to: CommunityId,
    ) -> Result<MoveOutcome, PartitionError> {
        self.check_source(vertex, from)?;
        if self.community(to).is_none() {
            return Err(PartitionError::UnknownCommunity(to));
        }
        if from == to {
            return Ok(MoveOutcome {
                vertex,
                from,
                to,
                dissolved: false,
            });
        }
        Ok(self.apply_move(vertex, from, to))
    }

    /// Move `vertex` out of `from` into a freshly minted community
    pub fn move_to_new_community(
        &mut self,
        vertex: usize,
        from: CommunityId,
    ) -> Result<MoveOutcome, PartitionError> {
        self.check_source(vertex, from)?;

        let to = CommunityId(self.communities.len());
        self.communities.push(Some(Community::new(to)));
        self.live += 1;

        Ok(self.apply_move(vertex, from, to))
    }

    fn check_source(&self, vertex: usize, from: CommunityId) -> Result<(), PartitionError> {
        let num_vertices = self.graph.num_vertices();
        if vertex >= num_vertices {
            return Err(PartitionError::VertexOutOfRange { vertex, num_vertices });
        }
        let community = self.community(from).ok_or(PartitionError::UnknownCommunity(from))?;
        if self.vertex_community[vertex] != from || !community.contains(vertex) {
            return Err(PartitionError::NotMember {
                vertex,
                community: from,
            });
        }
        Ok(())
    }

    /// Apply a validated move. Failures past this point are broken invariants.
    fn apply_move(&mut self, vertex: usize, from: CommunityId, to: CommunityId) -> MoveOutcome {
        let graph = self.graph;

        // Stage: the vertex's edge counts per community fix every table delta
        let connections = connections_of(graph, &self.vertex_community, vertex);
        let before = self.modularity_term(from) + self.modularity_term(to);

        let vertex_community = &self.vertex_community;
        let lookup = |u: usize| Some(vertex_community[u]);

        let lost = expect_consistent(slot(&mut self.communities, from).remove_vertex(vertex, graph, lookup));
        mirror(&mut self.communities, from, &lost, Community::unlink);

        let gained = expect_consistent(slot(&mut self.communities, to).add_vertex(vertex, graph, lookup));
        mirror(&mut self.communities, to, &gained, Community::link);

        for (&community, &count) in &connections {
            if community != from {
                self.adjust_community_edges(from, community, -(count as i64));
            }
            if community != to {
                self.adjust_community_edges(to, community, count as i64);
            }
        }

        for &u in graph.neighbors(vertex) {
            let cache = &mut self.vertex_connections[u as usize];
            decrement_connection(cache, from);
            *cache.entry(to).or_insert(0) += 1;
        }
        self.vertex_connections[vertex] = connections;
        self.vertex_community[vertex] = to;

        let dissolved = slot(&mut self.communities, from).is_empty();
        if dissolved {
            let community = self.communities[from.0].take();
            debug_assert!(community.map_or(true, |c| c.neighbors().next().is_none()));
            self.live -= 1;
            log::debug!("Community {} dissolved", from);
        }

        let after = self.modularity_term(from) + self.modularity_term(to);
        self.modularity += after - before;

        log::trace!("Moved vertex {} from {} to {}", vertex, from, to);

        MoveOutcome {
            vertex,
            from,
            to,
            dissolved,
        }
    }

    fn adjust_community_edges(&mut self, a: CommunityId, b: CommunityId, delta: i64) {
        let key = UnorderedPair::new(a, b);
        let current = self.community_edges.get(&key).copied().unwrap_or(0) as i64;
        let updated = current + delta;
        assert!(
            updated >= 0,
            "crossing edges between {a} and {b} would become negative"
        );
        if updated == 0 {
            self.community_edges.remove(&key);
        } else {
            self.community_edges.insert(key, updated as usize);
        }
    }

    fn modularity_term(&self, id: CommunityId) -> f64 {
        self.community(id).map_or(0.0, |c| {
            metrics::modularity_term(c.internal_edges(), c.degree_sum(), self.graph.num_edges())
        })
    }

    /// Cached modularity, maintained across moves
    pub fn modularity(&self) -> f64 {
        self.modularity
    }

    /// Modularity summed over the community aggregates (no graph scan)
    pub fn recompute_modularity(&self) -> f64 {
        self.communities()
            .map(|c| metrics::modularity_term(c.internal_edges(), c.degree_sum(), self.graph.num_edges()))
            .sum()
    }

    /// Change in modularity if `vertex` moved to `to`, computed from the
    /// connection cache in constant time
    pub fn modularity_delta(&self, vertex: usize, to: CommunityId) -> Result<f64, PartitionError> {
        let num_vertices = self.graph.num_vertices();
        if vertex >= num_vertices {
            return Err(PartitionError::VertexOutOfRange { vertex, num_vertices });
        }
        let from = self.vertex_community[vertex];
        let target = self.community(to).ok_or(PartitionError::UnknownCommunity(to))?;
        if from == to {
            return Ok(0.0);
        }
        let source = self.community(from).ok_or(PartitionError::UnknownCommunity(from))?;

        let m = self.graph.num_edges();
        let degree = self.graph.degree(vertex);
        let connections = &self.vertex_connections[vertex];
        let k_from = connections.get(&from).copied().unwrap_or(0);
        let k_to = connections.get(&to).copied().unwrap_or(0);

        let before = metrics::modularity_term(source.internal_edges(), source.degree_sum(), m)
            + metrics::modularity_term(target.internal_edges(), target.degree_sum(), m);
        let after = metrics::modularity_term(source.internal_edges() - k_from, source.degree_sum() - degree, m)
            + metrics::modularity_term(target.internal_edges() + k_to, target.degree_sum() + degree, m);

        Ok(after - before)
    }

    /// Conductance of a single community
    pub fn community_conductance(&self, id: CommunityId) -> Option<f64> {
        self.community(id).map(|c| {
            metrics::conductance_ratio(c.total_out_degree(), c.degree_sum(), self.graph.total_degree())
        })
    }

    /// Partition conductance under the caller's aggregation policy
    pub fn conductance(&self, policy: ConductancePolicy) -> f64 {
        let total_degree = self.graph.total_degree();
        let values = self.communities().map(|c| {
            (
                c.len(),
                metrics::conductance_ratio(c.total_out_degree(), c.degree_sum(), total_degree),
            )
        });
        metrics::aggregate_conductance(values, self.graph.num_vertices(), policy)
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn community(&self, id: CommunityId) -> Option<&Community> {
        self.communities.get(id.0).and_then(Option::as_ref)
    }

    /// Live communities in id order
    pub fn communities(&self) -> impl Iterator<Item = &Community> + '_ {
        self.communities.iter().flatten()
    }

    pub fn num_communities(&self) -> usize {
        self.live
    }

    pub fn community_of(&self, vertex: usize) -> Option<CommunityId> {
        self.vertex_community.get(vertex).copied()
    }

    pub fn community_edges(&self) -> &HashMap<CommunityPair, usize> {
        &self.community_edges
    }

    /// Graph edges crossing between `a` and `b`
    pub fn crossing_edges(&self, a: CommunityId, b: CommunityId) -> usize {
        self.community_edges
            .get(&UnorderedPair::new(a, b))
            .copied()
            .unwrap_or(0)
    }

    /// Edges from `vertex` into each community it touches
    pub fn vertex_connections(&self, vertex: usize) -> Option<&HashMap<CommunityId, usize>> {
        self.vertex_connections.get(vertex)
    }

    /// Edges from `vertex` to members of its own community
    pub fn vertex_in_degree(&self, vertex: usize) -> Option<usize> {
        let own = self.community_of(vertex)?;
        let connections = self.vertex_connections.get(vertex)?;
        Some(connections.get(&own).copied().unwrap_or(0))
    }

    /// Edges from `vertex` leaving its community
    pub fn vertex_out_degree(&self, vertex: usize) -> Option<usize> {
        let inside = self.vertex_in_degree(vertex)?;
        Some(self.graph.degree(vertex) - inside)
    }

    /// Community id of every vertex, in the label format accepted by
    /// [`with_initial_partition`](Self::with_initial_partition)
    pub fn assignment(&self) -> Vec<i64> {
        self.vertex_community.iter().map(|id| id.0 as i64).collect()
    }

    /// Reporting snapshot of every live community
    pub fn summaries(&self) -> Vec<CommunitySummary> {
        let total_degree = self.graph.total_degree();
        self.communities()
            .map(|c| CommunitySummary {
                id: c.id(),
                members: c.sorted_members().into_iter().map(|v| v as u32).collect(),
                size: c.len(),
                internal_edges: c.internal_edges(),
                degree_sum: c.degree_sum(),
                cut_edges: c.total_out_degree(),
                neighbor_count: c.neighbors().count(),
                density: c.density(),
                conductance: metrics::conductance_ratio(c.total_out_degree(), c.degree_sum(), total_degree),
            })
            .collect()
    }
}

/// Edges from `vertex` into each community, derived from its neighbor list
fn connections_of(graph: &Graph, vertex_community: &[CommunityId], vertex: usize) -> HashMap<CommunityId, usize> {
    let mut connections = HashMap::new();
    for &u in graph.neighbors(vertex) {
        *connections.entry(vertex_community[u as usize]).or_insert(0) += 1;
    }
    connections
}

fn slot(communities: &mut [Option<Community>], id: CommunityId) -> &mut Community {
    match communities.get_mut(id.0).and_then(Option::as_mut) {
        Some(community) => community,
        None => panic!("community {id} referenced but not alive"),
    }
}

/// Apply the neighbor side of a relation change reported by `source`
fn mirror(
    communities: &mut [Option<Community>],
    source: CommunityId,
    changes: &NeighborChanges,
    apply: fn(&mut Community, CommunityId, usize),
) {
    for &(other, count) in changes {
        apply(slot(communities, other), source, count);
    }
}

fn decrement_connection(cache: &mut HashMap<CommunityId, usize>, id: CommunityId) {
    match cache.get_mut(&id) {
        Some(count) if *count > 1 => *count -= 1,
        Some(_) => {
            cache.remove(&id);
        }
        None => panic!("connection cache has no edge into community {id}"),
    }
}

fn expect_consistent<T>(result: Result<T, PartitionError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("clustering tables out of sync: {err}"),
    }
}
