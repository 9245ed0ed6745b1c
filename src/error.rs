//! Error types for graph ingestion and the partition engine

use std::path::PathBuf;
use thiserror::Error;

use crate::cluster::CommunityId;

/// Failures while turning a text file into a [`Graph`](crate::graph::Graph).
///
/// Every variant is fatal: no partially built graph is ever returned.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The input file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No format was given and none could be guessed from the file name
    #[error("unknown or unspecified graph format for {0}")]
    UnknownFormat(String),

    /// A Pajek file without a usable `*Vertices` header
    #[error("missing or unparseable vertex count")]
    MissingVertexCount,

    /// A line that could not be parsed
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// An edge whose two endpoints are the same vertex
    #[error("self-loop on vertex {vertex} is not allowed")]
    SelfLoop { vertex: usize },

    /// A vertex id that resolves outside `[0, num_vertices)`
    #[error("vertex id {id} is outside the graph ({num_vertices} vertices)")]
    VertexOutOfRange { id: i64, num_vertices: usize },
}

/// Misuse of the partition engine.
///
/// These signal caller bugs; they are returned so the search layer
/// above the engine can surface them, never silently corrected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    #[error("vertex {vertex} is already a member of community {community}")]
    AlreadyMember { vertex: usize, community: CommunityId },

    #[error("vertex {vertex} is not a member of community {community}")]
    NotMember { vertex: usize, community: CommunityId },

    #[error("community {0} does not exist")]
    UnknownCommunity(CommunityId),

    #[error("vertex {vertex} is outside the graph ({num_vertices} vertices)")]
    VertexOutOfRange { vertex: usize, num_vertices: usize },

    #[error("initial partition has {found} entries, graph has {expected} vertices")]
    PartitionLength { expected: usize, found: usize },

    #[error("invalid community label {label} for vertex {vertex}")]
    InvalidLabel { vertex: usize, label: i64 },
}
