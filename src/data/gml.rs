//! GML reader
//!
//! Only the parts of GML that describe topology are read: every
//! `node [ id N ... ]` block declares a vertex and every
//! `edge [ source S target T ... ]` block an edge. Other keys, quoted
//! strings and nested lists (graphics, labels) are skipped.

use std::collections::HashMap;

use crate::data::{parse_id, IndexBase};
use crate::error::GraphError;
use crate::graph::{Graph, GraphBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'a> {
    text: &'a str,
    line: usize,
}

/// Split GML text into words, brackets and quoted strings
fn tokenize(text: &str) -> Result<Vec<Token<'_>>, GraphError> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            '\n' => line += 1,
            c if c.is_whitespace() => {}
            '[' | ']' => tokens.push(Token {
                text: &text[start..start + 1],
                line,
            }),
            '"' => {
                let first_line = line;
                let mut end = None;
                for (idx, c) in chars.by_ref() {
                    if c == '\n' {
                        line += 1;
                    }
                    if c == '"' {
                        end = Some(idx + 1);
                        break;
                    }
                }
                let end = end.ok_or(GraphError::Parse {
                    line: first_line,
                    message: "unterminated string".to_string(),
                })?;
                tokens.push(Token {
                    text: &text[start..end],
                    line: first_line,
                });
            }
            '#' => {
                // Comment to end of line
                while let Some(&(_, c)) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            _ => {
                let mut end = text.len();
                while let Some(&(idx, c)) = chars.peek() {
                    if c.is_whitespace() || c == '[' || c == ']' || c == '"' {
                        end = idx;
                        break;
                    }
                    chars.next();
                }
                tokens.push(Token {
                    text: &text[start..end],
                    line,
                });
            }
        }
    }

    Ok(tokens)
}

/// Read the scalar key/value pairs directly inside a `[ ... ]` block.
///
/// `pos` points at the opening bracket and is left after the closing one.
fn read_block<'a>(
    tokens: &[Token<'a>],
    pos: &mut usize,
) -> Result<HashMap<&'a str, Token<'a>>, GraphError> {
    let open = tokens[*pos];
    *pos += 1;

    let mut values = HashMap::new();
    loop {
        let Some(&key) = tokens.get(*pos) else {
            return Err(GraphError::Parse {
                line: open.line,
                message: "unclosed list".to_string(),
            });
        };
        *pos += 1;

        if key.text == "]" {
            return Ok(values);
        }

        let Some(&value) = tokens.get(*pos) else {
            return Err(GraphError::Parse {
                line: key.line,
                message: format!("key {} has no value", key.text),
            });
        };

        if value.text == "[" {
            skip_list(tokens, pos)?;
        } else {
            *pos += 1;
            values.insert(key.text, value);
        }
    }
}

/// Skip a nested list starting at `pos`
fn skip_list(tokens: &[Token<'_>], pos: &mut usize) -> Result<(), GraphError> {
    let open = tokens[*pos];
    let mut depth = 0usize;
    while let Some(token) = tokens.get(*pos) {
        *pos += 1;
        match token.text {
            "[" => depth += 1,
            "]" => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            _ => {}
        }
    }
    Err(GraphError::Parse {
        line: open.line,
        message: "unclosed list".to_string(),
    })
}

fn required<'a>(
    block: &HashMap<&str, Token<'a>>,
    key: &str,
    kind: &str,
    line: usize,
) -> Result<i64, GraphError> {
    let token = block.get(key).ok_or_else(|| GraphError::Parse {
        line,
        message: format!("{kind} without {key}"),
    })?;
    parse_id(token.text, token.line)
}

/// Parse a GML graph
pub fn parse(text: &str, index_base: IndexBase) -> Result<Graph, GraphError> {
    let tokens = tokenize(text)?;

    let mut node_ids = Vec::new();
    let mut edges = Vec::new();

    let mut pos = 0;
    while pos < tokens.len() {
        let token = tokens[pos];
        let opens_block = tokens.get(pos + 1).map_or(false, |t| t.text == "[");

        match token.text {
            "node" | "edge" if opens_block => {
                pos += 1;
                let block = read_block(&tokens, &mut pos)?;
                if token.text == "node" {
                    node_ids.push(required(&block, "id", "node", token.line)?);
                } else {
                    let source = required(&block, "source", "edge", token.line)?;
                    let target = required(&block, "target", "edge", token.line)?;
                    edges.push((source, target));
                }
            }
            // Descend into `graph [` and any other wrapper list
            _ => pos += 1,
        }
    }

    let n = node_ids.len();
    for &id in &node_ids {
        index_base.resolve_within(id, n)?;
    }
    log::debug!("GML declares {} nodes and {} edges", n, edges.len());

    let mut builder = GraphBuilder::with_capacity(n);
    for (source, target) in edges {
        let source = index_base.resolve_within(source, n)?;
        let target = index_base.resolve_within(target, n)?;
        builder.add_edge(source, target)?;
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = r#"
Creator "test"
graph
[
  directed 0
  node
  [
    id 1
    label "first node"
    graphics [ x 1.0 y 2.0 ]
  ]
  node [ id 2 ]
  node [ id 3 label "x]y" ]
  edge
  [
    source 1
    target 2
    value 1.0
  ]
  edge [ source 3 target 2 ]
]
"#;

    #[test]
    fn test_parse_path_one_based() {
        let graph = parse(PATH, IndexBase::One).unwrap();
        assert_eq!(graph.num_vertices(), 3);
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.neighbors(1), &[0, 2]);
    }

    #[test]
    fn test_zero_based_ids() {
        let text = "graph [ node [ id 0 ] node [ id 1 ] edge [ source 0 target 1 ] ]";
        let graph = parse(text, IndexBase::Zero).unwrap();
        assert_eq!(graph.num_edges(), 1);

        // 1-based reading of 0-based ids puts vertex 0 out of range
        assert!(matches!(
            parse(text, IndexBase::One),
            Err(GraphError::VertexOutOfRange { id: 0, .. })
        ));
    }

    #[test]
    fn test_duplicate_and_self_loop() {
        let dup = "graph [ node [ id 1 ] node [ id 2 ] edge [ source 1 target 2 ] edge [ source 2 target 1 ] ]";
        assert_eq!(parse(dup, IndexBase::One).unwrap().num_edges(), 1);

        let looped = "graph [ node [ id 1 ] edge [ source 1 target 1 ] ]";
        assert!(matches!(
            parse(looped, IndexBase::One),
            Err(GraphError::SelfLoop { vertex: 0 })
        ));
    }

    #[test]
    fn test_malformed_blocks() {
        assert!(matches!(
            parse("graph [ node [ label \"a\" ] ]", IndexBase::One),
            Err(GraphError::Parse { .. })
        ));
        assert!(matches!(
            parse("graph [ node [ id 1 ", IndexBase::One),
            Err(GraphError::Parse { .. })
        ));
        assert!(matches!(
            parse("graph [ node [ id \"open ] ]", IndexBase::One),
            Err(GraphError::Parse { .. })
        ));
    }
}
