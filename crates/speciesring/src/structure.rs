//! Distance graph between the reference and every other species.
//!
//! The graph is a star: one node per distinct species name and one undirected
//! edge from the reference to each other node, weighted by edit distance.

use indexmap::IndexMap;
use log::debug;
use petgraph::graph::{NodeIndex, UnGraph};

use speciesring_core::{
    CoreError,
    ranking::DistancePair,
    record::{Entity, name_matches},
};

/// Undirected, weighted distance graph.
#[derive(Debug)]
pub struct DistanceGraph {
    graph: UnGraph<String, usize>,
    reference: NodeIndex,
}

impl DistanceGraph {
    /// Builds the graph from ranked distances.
    ///
    /// The first entity matching `reference_name` (ignoring case) becomes the
    /// reference node. Every other entity with a name not seen before gets a
    /// node joined to the reference by an edge carrying its distance.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ReferenceNotFound`] when no entity matches
    /// `reference_name`.
    pub fn from_pairs<E: Entity>(
        pairs: &[DistancePair<'_, E>],
        reference_name: &str,
    ) -> Result<Self, CoreError> {
        let reference_pair = pairs
            .iter()
            .find(|pair| name_matches(pair.entity(), reference_name))
            .ok_or_else(|| CoreError::reference_not_found(reference_name))?;

        let mut graph = UnGraph::new_undirected();
        let mut nodes: IndexMap<&str, NodeIndex> = IndexMap::new();

        let reference_label = reference_pair.entity().display_name();
        let reference = graph.add_node(reference_label.to_string());
        nodes.insert(reference_label, reference);

        for pair in pairs {
            let name = pair.entity().display_name();
            if name_matches(pair.entity(), reference_name) || nodes.contains_key(name) {
                continue;
            }

            let node = graph.add_node(name.to_string());
            nodes.insert(name, node);
            graph.add_edge(reference, node, pair.distance());
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count();
            "Distance graph built"
        );

        Ok(Self { graph, reference })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn reference_name(&self) -> &str {
        &self.graph[self.reference]
    }

    /// Node names in insertion order, reference first.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// Edges as `(source, target, distance)`.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, usize)> {
        self.graph.raw_edges().iter().map(|edge| {
            (
                self.graph[edge.source()].as_str(),
                self.graph[edge.target()].as_str(),
                edge.weight,
            )
        })
    }

    /// Distance stored on the edge between two named nodes, in either order.
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<usize> {
        let a = self.find_node(a)?;
        let b = self.find_node(b)?;
        let edge = self.graph.find_edge(a, b)?;
        self.graph.edge_weight(edge).copied()
    }

    pub(crate) fn graph(&self) -> &UnGraph<String, usize> {
        &self.graph
    }

    fn find_node(&self, name: &str) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|idx| self.graph[*idx] == name)
    }
}

#[cfg(test)]
mod tests {
    use speciesring_core::record::{SequenceRecord, Species};

    use super::*;

    fn record(name: &str) -> SequenceRecord {
        SequenceRecord::new(Species::new(name, format!("{name} sp."), 1), "")
    }

    #[test]
    fn test_human_mouse_graph() {
        let records = vec![record("Human"), record("Mouse")];
        let pairs = vec![
            DistancePair::new(&records[0], 0),
            DistancePair::new(&records[1], 1),
        ];

        let graph = DistanceGraph::from_pairs(&pairs, "Human").unwrap();

        let names: Vec<&str> = graph.node_names().collect();
        assert_eq!(names, vec!["Human", "Mouse"]);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_weight("Human", "Mouse"), Some(1));
        assert_eq!(graph.edge_weight("Mouse", "Human"), Some(1));
        assert_eq!(graph.reference_name(), "Human");
    }

    #[test]
    fn test_reference_not_first() {
        let records = vec![record("Rat"), record("human"), record("Mouse")];
        let pairs = vec![
            DistancePair::new(&records[0], 4),
            DistancePair::new(&records[1], 0),
            DistancePair::new(&records[2], 2),
        ];

        let graph = DistanceGraph::from_pairs(&pairs, "Human").unwrap();
        assert_eq!(graph.reference_name(), "human");
        assert_eq!(graph.node_count(), 3);

        let edges: Vec<(&str, &str, usize)> = graph.edges().collect();
        assert_eq!(edges, vec![("human", "Rat", 4), ("human", "Mouse", 2)]);
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let records = vec![record("Human"), record("Mouse"), record("Mouse")];
        let pairs = vec![
            DistancePair::new(&records[0], 0),
            DistancePair::new(&records[1], 1),
            DistancePair::new(&records[2], 3),
        ];

        let graph = DistanceGraph::from_pairs(&pairs, "Human").unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_weight("Human", "Mouse"), Some(1));
    }

    #[test]
    fn test_missing_reference() {
        let records = vec![record("Mouse")];
        let pairs = vec![DistancePair::new(&records[0], 1)];

        let err = DistanceGraph::from_pairs(&pairs, "Human").unwrap_err();
        assert_eq!(err, CoreError::reference_not_found("Human"));
    }

    #[test]
    fn test_unknown_edge() {
        let records = vec![record("Human")];
        let pairs = vec![DistancePair::new(&records[0], 0)];

        let graph = DistanceGraph::from_pairs(&pairs, "Human").unwrap();
        assert_eq!(graph.edge_weight("Human", "Cat"), None);
        assert_eq!(graph.edge_count(), 0);
    }
}
