//! Positioned distance graphs.
//!
//! The [`force`] engine turns a [`DistanceGraph`](crate::structure::DistanceGraph)
//! into a [`GraphLayout`]: node positions inside the output canvas plus the
//! edges between them, ready for export.

pub mod force;

use speciesring_core::geometry::{Point, Size};

/// A node placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    name: String,
    position: Point,
}

impl PlacedNode {
    pub fn new(name: impl Into<String>, position: Point) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

/// An edge between two placed nodes, referenced by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedEdge {
    source: usize,
    target: usize,
    distance: usize,
}

impl PlacedEdge {
    pub fn new(source: usize, target: usize, distance: usize) -> Self {
        Self {
            source,
            target,
            distance,
        }
    }

    pub fn source(self) -> usize {
        self.source
    }

    pub fn target(self) -> usize {
        self.target
    }

    pub fn distance(self) -> usize {
        self.distance
    }
}

/// Result of a graph layout.
#[derive(Debug, Clone)]
pub struct GraphLayout {
    canvas: Size,
    nodes: Vec<PlacedNode>,
    edges: Vec<PlacedEdge>,
}

impl GraphLayout {
    pub fn new(canvas: Size, nodes: Vec<PlacedNode>, edges: Vec<PlacedEdge>) -> Self {
        Self {
            canvas,
            nodes,
            edges,
        }
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn nodes(&self) -> &[PlacedNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[PlacedEdge] {
        &self.edges
    }

    /// Endpoints of `edge`, or `None` if it references unknown nodes.
    pub fn endpoints(&self, edge: PlacedEdge) -> Option<(&PlacedNode, &PlacedNode)> {
        Some((self.nodes.get(edge.source)?, self.nodes.get(edge.target)?))
    }
}
