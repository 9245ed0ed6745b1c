//! Graph representation and algorithms module

pub mod algorithms;
pub mod builder;
pub mod compressed;
pub mod key;

pub use builder::GraphBuilder;
pub use compressed::{Edge, EdgeKey, Graph};
pub use key::UnorderedPair;
