//! Candidate paths and the path index consumed by failure checking.
//!
//! Shortest paths and the high-weight classification are computed
//! upstream; this module only stores and looks them up.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::{NodeId, Request};

/// An ordered node sequence from source to destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    nodes: Vec<NodeId>,
}

impl Path {
    /// Creates a path from its node sequence.
    pub fn new<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<NodeId>,
    {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
        }
    }

    /// Nodes in traversal order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Whether any node on the path is in `nodes`.
    pub fn intersects(&self, nodes: &BTreeSet<NodeId>) -> bool {
        self.nodes.iter().any(|n| nodes.contains(n))
    }
}

/// Read-only lookup of candidate paths.
///
/// Shortest paths are keyed by `(source, destination)`; high-weight paths
/// are tagged per request ID.
#[derive(Debug, Clone, Default)]
pub struct PathIndex {
    shortest: HashMap<(NodeId, NodeId), Vec<Path>>,
    high_weight: HashMap<String, Vec<Path>>,
}

impl PathIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the shortest paths between two nodes.
    pub fn with_shortest_paths(
        mut self,
        source: impl Into<NodeId>,
        destination: impl Into<NodeId>,
        paths: Vec<Path>,
    ) -> Self {
        self.shortest
            .entry((source.into(), destination.into()))
            .or_default()
            .extend(paths);
        self
    }

    /// Flags a path as high weight for a request.
    pub fn with_high_weight_path(mut self, request_id: impl Into<String>, path: Path) -> Self {
        self.high_weight
            .entry(request_id.into())
            .or_default()
            .push(path);
        self
    }

    /// Shortest paths between two nodes (empty if unknown).
    pub fn shortest_paths(&self, source: &str, destination: &str) -> &[Path] {
        self.shortest
            .get(&(source.to_string(), destination.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// High-weight paths flagged for a request (empty if none).
    pub fn high_weight_paths(&self, request_id: &str) -> &[Path] {
        self.high_weight
            .get(request_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The path a request is checked against.
    ///
    /// The first flagged high-weight path wins; otherwise the first known
    /// shortest path. `None` if the request has neither.
    pub fn path_for(&self, request: &Request) -> Option<&Path> {
        self.high_weight_paths(&request.id)
            .first()
            .or_else(|| {
                self.shortest_paths(&request.source, &request.destination)
                    .first()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_basics() {
        let p = Path::new(["n1", "n2", "n3"]);
        assert_eq!(p.nodes(), ["n1", "n2", "n3"]);

        let failed: BTreeSet<NodeId> = ["n3".to_string()].into_iter().collect();
        assert!(p.intersects(&failed));
        assert!(!p.intersects(&BTreeSet::new()));
    }

    #[test]
    fn test_path_for_prefers_first_high_weight() {
        let request = Request::new("r1", 0, "n1", "n3");
        let index = PathIndex::new()
            .with_shortest_paths("n1", "n3", vec![Path::new(["n1", "n2", "n3"])])
            .with_high_weight_path("r1", Path::new(["n1", "n4", "n3"]))
            .with_high_weight_path("r1", Path::new(["n1", "n5", "n3"]));

        let path = index.path_for(&request).unwrap();
        assert_eq!(path.nodes()[1], "n4");
    }

    #[test]
    fn test_path_for_falls_back_to_shortest() {
        let request = Request::new("r1", 0, "n1", "n3");
        let index = PathIndex::new().with_shortest_paths(
            "n1",
            "n3",
            vec![Path::new(["n1", "n2", "n3"]), Path::new(["n1", "n6", "n3"])],
        );

        let path = index.path_for(&request).unwrap();
        assert_eq!(path.nodes()[1], "n2");
        assert_eq!(index.shortest_paths("n1", "n3").len(), 2);
    }

    #[test]
    fn test_path_for_missing() {
        let request = Request::new("r1", 0, "n1", "n3");
        let index = PathIndex::new().with_shortest_paths("n3", "n1", vec![Path::new(["n3", "n1"])]);
        assert!(index.path_for(&request).is_none());
        assert!(index.high_weight_paths("r1").is_empty());
    }
}
