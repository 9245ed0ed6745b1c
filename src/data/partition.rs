//! Initial-partition files: a JSON array with one label per vertex

use std::path::Path;

use crate::error::GraphError;

/// Label meaning "start this vertex in its own community"
pub const UNASSIGNED: i64 = -1;

/// A partition where every vertex starts as a singleton
pub fn singleton_partition(num_vertices: usize) -> Vec<i64> {
    vec![UNASSIGNED; num_vertices]
}

/// Read a partition vector such as `[0, 0, 1, -1]`
pub fn read_partition(path: &Path) -> Result<Vec<i64>, GraphError> {
    let text = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_partition(&text)
}

pub fn parse_partition(text: &str) -> Result<Vec<i64>, GraphError> {
    serde_json::from_str(text).map_err(|err| GraphError::Parse {
        line: err.line(),
        message: err.to_string(),
    })
}
