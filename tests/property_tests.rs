//! Property-based tests for the partition engine
//!
//! Random simple graphs, random initial partitions and random move
//! sequences; after every move the incrementally maintained tables are
//! compared against an exhaustive recount.

use proptest::prelude::*;
use std::collections::HashMap;

use graph_community_engine::cluster::clustering::CommunityPair;
use graph_community_engine::cluster::metrics::{conductance_rescan, modularity_rescan};
use graph_community_engine::graph::UnorderedPair;
use graph_community_engine::{Clustering, CommunityId, ConductancePolicy, Graph, GraphBuilder};

const EPSILON: f64 = 1e-9;

fn build_graph(n: usize, pairs: &[(usize, usize)]) -> Graph {
    let mut builder = GraphBuilder::with_capacity(n);
    for &(a, b) in pairs {
        let (a, b) = (a % n, b % n);
        if a != b {
            builder.add_edge(a, b).unwrap();
        }
    }
    builder.build()
}

fn labels_for(n: usize, raw: &[i64]) -> Vec<i64> {
    (0..n).map(|v| raw[v % raw.len()]).collect()
}

fn dense_assignment(clustering: &Clustering<'_>) -> Vec<usize> {
    clustering.assignment().iter().map(|&id| id as usize).collect()
}

/// Recount every maintained quantity from scratch and compare
fn check_invariants(clustering: &Clustering<'_>, graph: &Graph) -> Result<(), TestCaseError> {
    let n = graph.num_vertices();

    // Partition: every vertex in exactly one live community
    let mut seen = 0;
    for community in clustering.communities() {
        prop_assert!(!community.is_empty(), "live community {} is empty", community.id());
        for v in community.members() {
            prop_assert_eq!(clustering.community_of(v), Some(community.id()));
        }
        seen += community.len();
    }
    prop_assert_eq!(seen, n);
    prop_assert_eq!(clustering.num_communities(), clustering.communities().count());
    for v in 0..n {
        let id = clustering.community_of(v).unwrap();
        prop_assert!(clustering.community(id).map_or(false, |c| c.contains(v)));
    }

    // Per-community aggregates
    let mut expected_pairs: HashMap<CommunityPair, usize> = HashMap::new();
    let mut internal: HashMap<CommunityId, usize> = HashMap::new();
    for edge in graph.edges() {
        let a = clustering.community_of(edge.v1 as usize).unwrap();
        let b = clustering.community_of(edge.v2 as usize).unwrap();
        if a == b {
            *internal.entry(a).or_insert(0) += 1;
        } else {
            *expected_pairs.entry(UnorderedPair::new(a, b)).or_insert(0) += 1;
        }
    }

    for community in clustering.communities() {
        let degree_sum: usize = community.members().map(|v| graph.degree(v)).sum();
        let internal_edges = internal.get(&community.id()).copied().unwrap_or(0);
        prop_assert_eq!(community.degree_sum(), degree_sum);
        prop_assert_eq!(community.internal_edges(), internal_edges);
        prop_assert_eq!(community.total_in_degree(), 2 * internal_edges);
        prop_assert_eq!(community.total_out_degree(), degree_sum - 2 * internal_edges);

        for other in community.neighbors() {
            let key = UnorderedPair::new(community.id(), other);
            prop_assert_eq!(
                community.crossing_edges_to(other),
                expected_pairs.get(&key).copied().unwrap_or(0)
            );
        }
    }

    // Community-pair edge table
    prop_assert_eq!(clustering.community_edges(), &expected_pairs);
    for (pair, &count) in &expected_pairs {
        let low = clustering.community(pair.low()).unwrap();
        let high = clustering.community(pair.high()).unwrap();
        prop_assert_eq!(low.crossing_edges_to(pair.high()), count);
        prop_assert_eq!(high.crossing_edges_to(pair.low()), count);
    }

    // Per-vertex connection cache
    for v in 0..n {
        let mut expected: HashMap<CommunityId, usize> = HashMap::new();
        for &u in graph.neighbors(v) {
            *expected.entry(clustering.community_of(u as usize).unwrap()).or_insert(0) += 1;
        }
        prop_assert_eq!(clustering.vertex_connections(v).unwrap(), &expected);

        let own = clustering.community_of(v).unwrap();
        let inside = graph
            .neighbors(v)
            .iter()
            .filter(|&&u| clustering.community_of(u as usize) == Some(own))
            .count();
        prop_assert_eq!(clustering.vertex_in_degree(v), Some(inside));
        prop_assert_eq!(clustering.vertex_out_degree(v), Some(graph.degree(v) - inside));
    }

    // Metrics
    let assignment = dense_assignment(clustering);
    let rescanned = modularity_rescan(graph, &assignment);
    prop_assert!((clustering.modularity() - rescanned).abs() < EPSILON);
    prop_assert!((clustering.recompute_modularity() - rescanned).abs() < EPSILON);
    prop_assert!(clustering.modularity() >= -0.5 - EPSILON);
    prop_assert!(clustering.modularity() <= 1.0 + EPSILON);

    for policy in [ConductancePolicy::WorstCase, ConductancePolicy::WeightedAverage] {
        let expected = conductance_rescan(graph, &assignment, policy);
        prop_assert!((clustering.conductance(policy) - expected).abs() < EPSILON);
    }

    Ok(())
}

fn prop_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (2usize..14).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..40)))
}

// Property: every table matches a recount after arbitrary moves
proptest! {
    #[test]
    fn prop_invariants_hold_after_moves(
        (n, pairs) in prop_graph(),
        raw_labels in prop::collection::vec(-1i64..4, 1..8),
        moves in prop::collection::vec((any::<usize>(), any::<usize>()), 0..40),
    ) {
        let graph = build_graph(n, &pairs);
        let mut clustering = Clustering::with_initial_partition(&graph, &labels_for(n, &raw_labels)).unwrap();
        check_invariants(&clustering, &graph)?;

        for (vertex_choice, target_choice) in moves {
            let vertex = vertex_choice % n;
            let from = clustering.community_of(vertex).unwrap();
            let live: Vec<CommunityId> = clustering.communities().map(|c| c.id()).collect();

            let pick = target_choice % (live.len() + 1);
            let outcome = if pick == live.len() {
                clustering.move_to_new_community(vertex, from).unwrap()
            } else {
                clustering.move_vertex(vertex, from, live[pick]).unwrap()
            };

            prop_assert_eq!(clustering.community_of(vertex), Some(outcome.to));
            if outcome.dissolved {
                prop_assert!(clustering.community(from).is_none());
                prop_assert!((0..n).all(|v| clustering.community_of(v) != Some(from)));
            }
            check_invariants(&clustering, &graph)?;
        }
    }
}

// Property: moving a vertex away and straight back restores every table
proptest! {
    #[test]
    fn prop_move_and_back_is_identity(
        (n, pairs) in prop_graph(),
        raw_labels in prop::collection::vec(0i64..3, 1..6),
        vertex_choice in any::<usize>(),
        target_choice in any::<usize>(),
    ) {
        let graph = build_graph(n, &pairs);
        let mut clustering = Clustering::with_initial_partition(&graph, &labels_for(n, &raw_labels)).unwrap();

        let vertex = vertex_choice % n;
        let from = clustering.community_of(vertex).unwrap();
        prop_assume!(clustering.community(from).unwrap().len() > 1);

        let targets: Vec<CommunityId> = clustering
            .communities()
            .map(|c| c.id())
            .filter(|&id| id != from)
            .collect();
        prop_assume!(!targets.is_empty());
        let to = targets[target_choice % targets.len()];

        let edges_before = clustering.community_edges().clone();
        let connections_before: Vec<_> = (0..n)
            .map(|v| clustering.vertex_connections(v).unwrap().clone())
            .collect();
        let aggregates_before: Vec<_> = clustering
            .communities()
            .map(|c| (c.id(), c.sorted_members(), c.degree_sum(), c.internal_edges(), c.total_out_degree()))
            .collect();
        let modularity_before = clustering.modularity();

        clustering.move_vertex(vertex, from, to).unwrap();
        clustering.move_vertex(vertex, to, from).unwrap();

        let aggregates_after: Vec<_> = clustering
            .communities()
            .map(|c| (c.id(), c.sorted_members(), c.degree_sum(), c.internal_edges(), c.total_out_degree()))
            .collect();

        prop_assert_eq!(clustering.community_edges(), &edges_before);
        for (v, expected) in connections_before.iter().enumerate() {
            prop_assert_eq!(clustering.vertex_connections(v).unwrap(), expected);
        }
        prop_assert_eq!(aggregates_after, aggregates_before);
        prop_assert!((clustering.modularity() - modularity_before).abs() < EPSILON);
    }
}

// Property: the constant-time gain estimate equals the realised change
proptest! {
    #[test]
    fn prop_modularity_delta_predicts_move(
        (n, pairs) in prop_graph(),
        raw_labels in prop::collection::vec(-1i64..3, 1..6),
        vertex_choice in any::<usize>(),
        target_choice in any::<usize>(),
    ) {
        let graph = build_graph(n, &pairs);
        let mut clustering = Clustering::with_initial_partition(&graph, &labels_for(n, &raw_labels)).unwrap();

        let vertex = vertex_choice % n;
        let from = clustering.community_of(vertex).unwrap();
        let live: Vec<CommunityId> = clustering.communities().map(|c| c.id()).collect();
        let to = live[target_choice % live.len()];

        let predicted = clustering.modularity_delta(vertex, to).unwrap();
        let before = clustering.modularity();
        clustering.move_vertex(vertex, from, to).unwrap();

        prop_assert!((clustering.modularity() - before - predicted).abs() < EPSILON);
    }
}
