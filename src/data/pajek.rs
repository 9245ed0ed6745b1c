//! Pajek `.net` reader

use crate::data::{parse_id, IndexBase};
use crate::error::GraphError;
use crate::graph::{Graph, GraphBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Vertices,
    Edges,
    /// `*Edgeslist` / `*Arcslist`: a source followed by all its targets
    EdgeList,
    Other,
}

/// Parse a Pajek network.
///
/// The `*Vertices N` line fixes the vertex count. Pairs under `*Edges` and
/// `*Arcs` both become undirected edges, so a pair of reciprocal arcs
/// collapses into one edge. Weights after the pair are ignored. Lines under
/// `*Edgeslist` and `*Arcslist` read `s t1 t2 ...`, one edge per target.
pub fn parse(text: &str, index_base: IndexBase) -> Result<Graph, GraphError> {
    let mut section = Section::Header;
    let mut builder: Option<GraphBuilder> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.trim();
        if content.is_empty() || content.starts_with('%') {
            continue;
        }

        if content.starts_with('*') {
            let mut tokens = content.split_whitespace();
            let keyword = tokens.next().unwrap_or_default().to_ascii_lowercase();
            section = match keyword.as_str() {
                "*vertices" => {
                    let count = tokens
                        .next()
                        .and_then(|t| t.parse::<usize>().ok())
                        .ok_or(GraphError::MissingVertexCount)?;
                    builder = Some(GraphBuilder::with_capacity(count));
                    Section::Vertices
                }
                "*edges" | "*arcs" => Section::Edges,
                "*edgeslist" | "*arcslist" => Section::EdgeList,
                other => {
                    log::warn!("Skipping unsupported Pajek section {} at line {}", other, line);
                    Section::Other
                }
            };
            continue;
        }

        match section {
            Section::Header => return Err(GraphError::MissingVertexCount),
            // Vertex labels carry nothing the engine needs
            Section::Vertices | Section::Other => {}
            Section::Edges | Section::EdgeList => {
                let builder = builder.as_mut().ok_or(GraphError::MissingVertexCount)?;
                let mut tokens = content.split_whitespace();
                let (Some(a), Some(b)) = (tokens.next(), tokens.next()) else {
                    return Err(GraphError::Parse {
                        line,
                        message: "expected a vertex pair".to_string(),
                    });
                };
                let n = builder.node_count();
                let source = index_base.resolve_within(parse_id(a, line)?, n)?;
                let target = index_base.resolve_within(parse_id(b, line)?, n)?;
                builder.add_edge(source, target)?;

                if section == Section::EdgeList {
                    for token in tokens {
                        let target = index_base.resolve_within(parse_id(token, line)?, n)?;
                        builder.add_edge(source, target)?;
                    }
                }
            }
        }
    }

    builder
        .map(GraphBuilder::build)
        .ok_or(GraphError::MissingVertexCount)
}
