use std::collections::{BTreeSet, HashMap};

/// Undirected graph of physically adjacent targets.
///
/// Nodes are target identifiers, kept in first-appearance order. Duplicate
/// edges collapse into one.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    neighbors: Vec<BTreeSet<usize>>,
}

impl AdjacencyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(u, v)` pairs
    pub fn from_edges<I, S>(edges: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut graph = Self::new();
        for (u, v) in edges {
            graph.add_edge(u.as_ref(), v.as_ref());
        }
        graph
    }

    /// Add a node if absent and return its index
    pub fn add_node(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(id.to_string());
        self.index.insert(id.to_string(), idx);
        self.neighbors.push(BTreeSet::new());
        idx
    }

    pub fn add_edge(&mut self, u: &str, v: &str) {
        let u = self.add_node(u);
        let v = self.add_node(v);
        self.neighbors[u].insert(v);
        self.neighbors[v].insert(u);
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    #[must_use]
    pub fn node_id(&self, idx: usize) -> &str {
        &self.nodes[idx]
    }

    /// Node identifiers in first-appearance order
    #[must_use]
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbors[idx].iter().copied()
    }

    /// Each edge once, as `(u, v)` with `u <= v`
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.neighbors.iter().enumerate().flat_map(|(u, adjacent)| {
            adjacent.range(u..).map(move |&v| (u, v))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges() {
        let graph = AdjacencyGraph::from_edges([("T1", "T2"), ("T2", "T3"), ("T2", "T1")]);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.nodes(), &["T1", "T2", "T3"]);

        let t2 = graph.node_index("T2").unwrap();
        let neighbors: Vec<&str> = graph.neighbors(t2).map(|i| graph.node_id(i)).collect();
        assert_eq!(neighbors, vec!["T1", "T3"]);
    }

    #[test]
    fn test_self_loop_counted_once() {
        let graph = AdjacencyGraph::from_edges([("T1", "T1"), ("T1", "T2")]);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.contains("T1"));
        assert!(!graph.contains("T9"));
    }
}
