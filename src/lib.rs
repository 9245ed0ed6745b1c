//! Core library for the graph community engine
//!
//! Loads a graph from GML, Pajek or edge-list text into an immutable
//! [`Graph`], then maintains a partition of its vertices
//! ([`Clustering`]) whose aggregates are updated in time proportional to
//! the degree of the moved vertex.

pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod storage;

pub use anyhow::{anyhow, Result};
pub use cluster::{Clustering, Community, CommunityId, ConductancePolicy, MoveOutcome};
pub use error::{GraphError, PartitionError};
pub use graph::{Graph, GraphBuilder};
