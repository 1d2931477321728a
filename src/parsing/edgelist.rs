use std::path::Path;
use thiserror::Error;

use crate::adjacency::AdjacencyGraph;

#[derive(Error, Debug)]
pub enum EdgeListError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid edge list on line {line}: {message}")]
    Malformed { line: usize, message: String },
}

/// Parse an adjacency edge-list file.
///
/// # Errors
///
/// Returns `EdgeListError::Io` if the file cannot be read, or
/// `EdgeListError::Malformed` if any line is not a valid edge.
pub fn parse_edge_list_file(path: &Path) -> Result<AdjacencyGraph, EdgeListError> {
    let content = std::fs::read_to_string(path)?;
    parse_edge_list_text(&content)
}

/// Parse edge-list text: one `u v [{attributes}]` edge per line.
///
/// Blank lines and `#` comments are ignored. Attribute dictionaries are
/// accepted but discarded since edge weights are always recomputed.
///
/// # Errors
///
/// Returns `EdgeListError::Malformed` if a line has fewer than two node ids
/// or trailing data that is not a `{...}` dictionary.
pub fn parse_edge_list_text(text: &str) -> Result<AdjacencyGraph, EdgeListError> {
    let mut graph = AdjacencyGraph::new();

    for (i, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        let (u, rest) = split_token(line);
        let (v, rest) = split_token(rest);
        if v.is_empty() {
            return Err(EdgeListError::Malformed {
                line: line_num,
                message: format!("expected two node ids, found '{line}'"),
            });
        }

        if !rest.is_empty() && !(rest.starts_with('{') && rest.ends_with('}')) {
            return Err(EdgeListError::Malformed {
                line: line_num,
                message: format!("unexpected edge data '{rest}'"),
            });
        }

        graph.add_edge(u, v);
    }

    Ok(graph)
}

/// Split off the first whitespace-delimited token
fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim()),
        None => (s, ""),
    }
}
