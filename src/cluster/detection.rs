//! Seeding initial partitions from graph structure

use itertools::Itertools;

use crate::graph::Graph;

/// Union-Find over vertex indices
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of vertex i)
    parent: Vec<u32>,

    /// Size of each set, valid at roots (for union by size)
    size: Vec<u32>,
}

impl DisjointSets {
    /// Create a new DisjointSets with every vertex in its own set
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
            size: vec![1; size],
        }
    }

    /// Find the root of the set containing x, halving the path on the way
    pub fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grandparent = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grandparent;
            x = grandparent;
        }
        x
    }

    /// Union the sets containing x and y
    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return;
        }

        // Attach the smaller tree under the larger one
        if self.size[root_x as usize] >= self.size[root_y as usize] {
            self.parent[root_y as usize] = root_x;
            self.size[root_x as usize] += self.size[root_y as usize];
        } else {
            self.parent[root_x as usize] = root_y;
            self.size[root_y as usize] += self.size[root_x as usize];
        }
    }

    /// Get the size of the set containing x
    pub fn set_size(&mut self, x: u32) -> u32 {
        let root = self.find(x);
        self.size[root as usize]
    }
}

/// Label every vertex with its connected component, as an initial partition.
///
/// Components smaller than `min_component_size` are labelled `-1`, so their
/// vertices start as singletons.
pub fn component_partition(graph: &Graph, min_component_size: usize) -> Vec<i64> {
    let n = graph.num_vertices();
    let mut sets = DisjointSets::new(n);

    for edge in graph.edges() {
        sets.union(edge.v1, edge.v2);
    }

    let labels: Vec<i64> = (0..n as u32)
        .map(|v| {
            if (sets.set_size(v) as usize) < min_component_size {
                -1
            } else {
                i64::from(sets.find(v))
            }
        })
        .collect();

    let components = labels.iter().filter(|&&l| l >= 0).unique().count();
    log::info!(
        "Seeded {} components of {} or more vertices",
        components,
        min_component_size
    );

    labels
}
