//! Plain edge-list reader: one `u v` pair per line

use crate::data::{parse_id, IndexBase};
use crate::error::GraphError;
use crate::graph::{Graph, GraphBuilder};

/// Parse an edge list.
///
/// Blank lines and lines starting with `#` or `%` are skipped; tokens after
/// the first two (weights, timestamps) are ignored. The vertex count is the
/// largest id seen.
pub fn parse(text: &str, index_base: IndexBase) -> Result<Graph, GraphError> {
    let mut builder = GraphBuilder::with_capacity(0);

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.trim();
        if content.is_empty() || content.starts_with('#') || content.starts_with('%') {
            continue;
        }

        let mut tokens = content.split_whitespace();
        let (Some(a), Some(b)) = (tokens.next(), tokens.next()) else {
            return Err(GraphError::Parse {
                line,
                message: "expected two vertex ids".to_string(),
            });
        };

        let source = resolve(parse_id(a, line)?, index_base, &builder)?;
        let target = resolve(parse_id(b, line)?, index_base, &builder)?;
        builder.add_edge(source, target)?;
    }

    Ok(builder.build())
}

fn resolve(id: i64, index_base: IndexBase, builder: &GraphBuilder) -> Result<usize, GraphError> {
    index_base.resolve(id).ok_or(GraphError::VertexOutOfRange {
        id,
        num_vertices: builder.node_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_one_based() {
        let text = "# triangle\n1 2\n2 3 0.5\n\n3 1\n";
        let graph = parse(text, IndexBase::One).unwrap();

        assert_eq!(graph.num_vertices(), 3);
        assert_eq!(graph.num_edges(), 3);
        assert!(graph.has_edge(0, 2));
    }

    #[test]
    fn test_parse_zero_based_with_duplicates() {
        let text = "0 1\n1 0\n1 3\n";
        let graph = parse(text, IndexBase::Zero).unwrap();

        assert_eq!(graph.num_vertices(), 4);
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.degree(1), 2);
        assert_eq!(graph.degree(2), 0);
    }

    #[test]
    fn test_self_loop_is_fatal() {
        let err = parse("1 2\n2 2\n", IndexBase::One).unwrap_err();
        assert!(matches!(err, GraphError::SelfLoop { vertex: 1 }));
    }

    #[test]
    fn test_bad_lines() {
        assert!(matches!(
            parse("1 2\n3\n", IndexBase::One),
            Err(GraphError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            parse("1 x\n", IndexBase::One),
            Err(GraphError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse("0 1\n", IndexBase::One),
            Err(GraphError::VertexOutOfRange { id: 0, .. })
        ));
    }
}
