//! Graph ingestion from plain-text formats

pub mod edgelist;
pub mod gml;
pub mod pajek;
pub mod partition;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::graph::Graph;

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphFormat {
    Gml,
    EdgeList,
    /// Pajek `.net`
    Pajek,
}

impl GraphFormat {
    /// Map a format name (`gml`, `edgelist`, `net`) to a format
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "gml" => Some(Self::Gml),
            "edgelist" => Some(Self::EdgeList),
            "net" => Some(Self::Pajek),
            _ => None,
        }
    }

    /// Guess the format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => Self::from_name(ext),
            None => {
                log::debug!("No file extension specified: {}", path.display());
                None
            }
        }
    }
}

impl fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gml => "gml",
            Self::EdgeList => "edgelist",
            Self::Pajek => "net",
        };
        f.write_str(name)
    }
}

/// Whether vertex ids in the source text start at 0 or 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndexBase {
    Zero,
    #[default]
    One,
}

impl IndexBase {
    pub fn offset(self) -> i64 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }

    /// Convert an id from the file into a vertex index.
    ///
    /// `None` when the index would be negative or does not fit the
    /// graph's `u32` vertex storage.
    pub fn resolve(self, id: i64) -> Option<usize> {
        let index = id.checked_sub(self.offset())?;
        u32::try_from(index)
            .ok()
            .filter(|&v| v < u32::MAX)
            .map(|v| v as usize)
    }

    /// Like [`resolve`](Self::resolve), additionally bounded by `num_vertices`
    pub fn resolve_within(self, id: i64, num_vertices: usize) -> Result<usize, GraphError> {
        match self.resolve(id) {
            Some(vertex) if vertex < num_vertices => Ok(vertex),
            _ => Err(GraphError::VertexOutOfRange { id, num_vertices }),
        }
    }
}

/// Load a graph file, guessing the format from the extension when `format` is `None`
pub fn load_graph(
    path: &Path,
    format: Option<GraphFormat>,
    index_base: IndexBase,
) -> Result<Graph, GraphError> {
    let format = format
        .or_else(|| GraphFormat::from_path(path))
        .ok_or_else(|| GraphError::UnknownFormat(path.display().to_string()))?;

    log::info!("Reading {} file: {}", format, path.display());

    let text = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let graph = parse_graph(&text, format, index_base)?;

    log::info!(
        "Loaded graph with {} vertices and {} edges",
        graph.num_vertices(),
        graph.num_edges()
    );

    Ok(graph)
}

/// Parse graph text already in memory
pub fn parse_graph(text: &str, format: GraphFormat, index_base: IndexBase) -> Result<Graph, GraphError> {
    match format {
        GraphFormat::Gml => gml::parse(text, index_base),
        GraphFormat::EdgeList => edgelist::parse(text, index_base),
        GraphFormat::Pajek => pajek::parse(text, index_base),
    }
}

/// Parse a vertex id token
pub(crate) fn parse_id(token: &str, line: usize) -> Result<i64, GraphError> {
    token.parse().map_err(|_| GraphError::Parse {
        line,
        message: format!("expected an integer vertex id, found {token:?}"),
    })
}
