//! Graph file loading.
//!
//! Two formats:
//! - `*.json`: `{"nodes": ["a", "b"], "edges": [["a", "b"]]}`
//! - anything else: whitespace-separated edge list, one `a b` pair per line.
//!   A line with a single token declares an isolated node, `#` starts a
//!   comment. Nodes are numbered in order of first appearance.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use kuramoto_core::Graph;
use tracing::info;

use crate::error::LoadError;

/// Loads a graph from `path`, choosing the format by extension.
pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<Graph, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let graph = if is_json {
        Graph::from_json(&text)?
    } else {
        parse_edge_list(&text)?
    };

    info!(
        "Loaded graph from {}: {} nodes, {} edges",
        path.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Parses the edge-list text format.
pub fn parse_edge_list(text: &str) -> Result<Graph, LoadError> {
    let mut graph = Graph::new();
    let mut seen: HashSet<String> = HashSet::new();

    let mut declare = |graph: &mut Graph, id: &str| {
        if seen.insert(id.to_string()) {
            graph.add_node(id);
        }
    };

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [id] => declare(&mut graph, *id),
            [a, b] => {
                declare(&mut graph, *a);
                declare(&mut graph, *b);
                graph.add_edge(*a, *b);
            }
            _ => {
                return Err(LoadError::Malformed {
                    line: lineno + 1,
                    content: raw.to_string(),
                })
            }
        }
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuramoto_core::TopologyModel;
    use uuid::Uuid;

    #[test]
    fn test_parse_edge_list() {
        let text = "# karate club excerpt\n1 2\n2 3  # trailing comment\n\n4\n3 1\n";
        let g = parse_edge_list(text).unwrap();

        assert_eq!(g.nodes, vec!["1", "2", "3", "4"]);
        assert_eq!(g.edge_count(), 3);

        let topo = TopologyModel::from_graph(&g).unwrap();
        assert!(topo.is_isolated(3).unwrap());
        assert_eq!(topo.degree(0).unwrap(), 2);
    }

    #[test]
    fn test_parse_malformed_line() {
        let err = parse_edge_list("a b\na b c\n").unwrap_err();
        match err {
            LoadError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_edge_list_yields_empty_graph() {
        let g = parse_edge_list("# nothing here\n").unwrap();
        assert_eq!(g.node_count(), 0);
        assert!(TopologyModel::from_graph(&g).is_err());
    }

    #[test]
    fn test_load_json_file() {
        let path = std::env::temp_dir().join(format!("kuramoto-{}.json", Uuid::new_v4()));
        fs::write(&path, r#"{"nodes": ["x", "y"], "edges": [["x", "y"]]}"#).unwrap();

        let g = load_graph(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(g.nodes, vec!["x", "y"]);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_load_edge_list_file() {
        let path = std::env::temp_dir().join(format!("kuramoto-{}.edges", Uuid::new_v4()));
        fs::write(&path, "a b\nb c\n").unwrap();

        let g = load_graph(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(g.node_count(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_graph("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
