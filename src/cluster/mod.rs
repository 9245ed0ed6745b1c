//! Community partition engine

pub mod clustering;
pub mod community;
pub mod detection;
pub mod metrics;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use clustering::{Clustering, MoveOutcome};
pub use community::Community;
pub use metrics::ConductancePolicy;

/// Stable identifier of a community within one [`Clustering`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommunityId(pub usize);

impl fmt::Display for CommunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of one community for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunitySummary {
    /// Identifier of the community
    pub id: CommunityId,

    /// Members of this community, sorted
    pub members: Vec<u32>,

    /// Number of members
    pub size: usize,

    /// Graph edges with both endpoints inside
    pub internal_edges: usize,

    /// Sum of member degrees
    pub degree_sum: usize,

    /// Graph edges leaving the community
    pub cut_edges: usize,

    /// Number of neighboring communities
    pub neighbor_count: usize,

    /// Density: internal edges / potential edges
    pub density: f32,

    /// Cut over the smaller side's volume
    pub conductance: f64,
}
