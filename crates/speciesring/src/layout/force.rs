//! Force-directed graph layout engine
//!
//! This module implements a force-directed layout for distance graphs. Nodes
//! repel each other, edges act as springs whose rest length grows with the
//! distance they carry, and velocities are damped every step. The simulation
//! starts from a seeded grid so the same graph always yields the same layout.

use indexmap::IndexMap;
use log::debug;
use petgraph::graph::NodeIndex;
use rand::{Rng, SeedableRng, rngs::StdRng};

use speciesring_core::geometry::{Bounds, Point, Size};

use crate::{
    SpeciesRingError,
    layout::{GraphLayout, PlacedEdge, PlacedNode},
    structure::DistanceGraph,
};

/// Force layout engine for distance graphs
pub struct Engine {
    // Simulation parameters
    iterations: usize,
    spring_constant: f32,
    repulsion_constant: f32,
    damping_factor: f32,
    // Spring rest length per unit of `1 + distance`
    rest_length: f32,
    // Used for maintaining distance between nodes
    min_distance: f32,
    // Canvas margin kept free for node labels
    padding: f32,
    seed: u64,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create a new force layout engine
    pub fn new() -> Self {
        Self {
            iterations: 200,
            spring_constant: 0.05,
            repulsion_constant: 1000.0,
            damping_factor: 0.85,
            rest_length: 10.0,
            min_distance: 40.0,
            padding: 30.0,
            seed: 42,
        }
    }

    /// Set the number of iterations for the force simulation
    pub fn set_iterations(&mut self, iterations: usize) -> &mut Self {
        self.iterations = iterations;
        self
    }

    /// Set the spring constant for edge forces
    pub fn set_spring_constant(&mut self, constant: f32) -> &mut Self {
        self.spring_constant = constant;
        self
    }

    /// Set the repulsion constant for node forces
    pub fn set_repulsion_constant(&mut self, constant: f32) -> &mut Self {
        self.repulsion_constant = constant;
        self
    }

    /// Set the damping factor for the simulation
    pub fn set_damping_factor(&mut self, factor: f32) -> &mut Self {
        self.damping_factor = factor;
        self
    }

    /// Set the seed of the initial placement
    pub fn set_seed(&mut self, seed: u64) -> &mut Self {
        self.seed = seed;
        self
    }

    /// Set the margin kept between nodes and the canvas edge
    pub fn set_padding(&mut self, padding: f32) -> &mut Self {
        self.padding = padding;
        self
    }

    /// Lay out `graph` inside a canvas of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`SpeciesRingError::Layout`] when the canvas has no positive
    /// area left once padding is removed.
    pub fn calculate(
        &self,
        graph: &DistanceGraph,
        canvas: Size,
    ) -> Result<GraphLayout, SpeciesRingError> {
        let inner = Size::new(
            canvas.width() - 2.0 * self.padding,
            canvas.height() - 2.0 * self.padding,
        );
        if inner.width() <= 0.0 || inner.height() <= 0.0 {
            return Err(SpeciesRingError::Layout(format!(
                "canvas {}x{} is too small for padding {}",
                canvas.width(),
                canvas.height(),
                self.padding
            )));
        }

        debug!(
            nodes = graph.node_count(),
            iterations = self.iterations;
            "Running force simulation"
        );

        let positions = self.run_force_simulation(graph);
        let positions = self.scale_into(positions, inner);

        let inner_graph = graph.graph();
        let slots: IndexMap<NodeIndex, usize> = positions
            .keys()
            .enumerate()
            .map(|(slot, idx)| (*idx, slot))
            .collect();

        let nodes = positions
            .iter()
            .map(|(idx, position)| PlacedNode::new(inner_graph[*idx].clone(), *position))
            .collect();

        let edges = inner_graph
            .raw_edges()
            .iter()
            .filter_map(|edge| {
                let source = *slots.get(&edge.source())?;
                let target = *slots.get(&edge.target())?;
                Some(PlacedEdge::new(source, target, edge.weight))
            })
            .collect();

        Ok(GraphLayout::new(canvas, nodes, edges))
    }

    /// Initialize seeded positions for nodes
    fn initialize_positions(&self, graph: &DistanceGraph) -> IndexMap<NodeIndex, Point> {
        let mut rng = StdRng::seed_from_u64(self.seed);

        // Calculate approximate grid dimensions
        let node_count = graph.node_count();
        let grid_size = ((node_count as f32).sqrt().ceil() as usize).max(1);
        let cell_size = self.min_distance * 1.5;

        // Place nodes in a grid pattern with some randomness
        graph
            .graph()
            .node_indices()
            .enumerate()
            .map(|(i, idx)| {
                let row = i / grid_size;
                let col = i % grid_size;

                let base = Point::new(col as f32 * cell_size, row as f32 * cell_size);

                // Add some randomness to avoid perfect grid alignment
                let jitter =
                    Point::new(rng.random_range(-20.0..20.0), rng.random_range(-20.0..20.0));

                (idx, base.add_point(jitter))
            })
            .collect()
    }

    /// Run force-directed layout algorithm
    fn run_force_simulation(&self, graph: &DistanceGraph) -> IndexMap<NodeIndex, Point> {
        let mut positions = self.initialize_positions(graph);
        let mut velocities: IndexMap<NodeIndex, Point> =
            positions.keys().map(|idx| (*idx, Point::default())).collect();
        let nodes: Vec<NodeIndex> = positions.keys().copied().collect();

        for _ in 0..self.iterations {
            let mut forces: IndexMap<NodeIndex, Point> =
                nodes.iter().map(|idx| (*idx, Point::default())).collect();

            // Repulsive forces between all nodes
            for &node_i in &nodes {
                let mut total = Point::default();
                for &node_j in &nodes {
                    if node_i == node_j {
                        continue;
                    }

                    let trans = positions[&node_i].sub_point(positions[&node_j]);

                    // Avoid division by zero
                    let distance = trans.hypot().max(1.0);

                    // Stronger repulsion when nodes are too close
                    let force_factor = if distance < self.min_distance {
                        self.repulsion_constant * (self.min_distance / distance).powf(2.0)
                            / self.min_distance
                    } else {
                        self.repulsion_constant / distance
                    };

                    total = total.add_point(trans.scale(force_factor / distance));
                }
                forces[&node_i] = forces[&node_i].add_point(total);
            }

            // Spring forces along edges
            for edge in graph.graph().raw_edges() {
                let source = edge.source();
                let target = edge.target();

                let delta = positions[&source].sub_point(positions[&target]);
                let distance = delta.hypot().max(1.0);
                let rest = self.rest_length * (1.0 + edge.weight as f32);

                // Positive when stretched, negative when compressed
                let force = self.spring_constant * (distance - rest);
                let pull = delta.scale(force / distance);

                forces[&source] = forces[&source].sub_point(pull);
                forces[&target] = forces[&target].add_point(pull);
            }

            // Update velocities and positions
            for &idx in &nodes {
                let velocity = velocities[&idx]
                    .add_point(forces[&idx])
                    .scale(self.damping_factor);
                velocities[&idx] = velocity;
                positions[&idx] = positions[&idx].add_point(velocity);
            }
        }

        positions
    }

    /// Min/max scale positions into `inner`, offset by the padding.
    ///
    /// A zero span along an axis is treated as 1 so single nodes and
    /// collinear layouts stay finite.
    fn scale_into(
        &self,
        mut positions: IndexMap<NodeIndex, Point>,
        inner: Size,
    ) -> IndexMap<NodeIndex, Point> {
        let Some(bounds) = Bounds::enclosing(positions.values().copied()) else {
            return positions;
        };

        let span_x = non_zero(bounds.width());
        let span_y = non_zero(bounds.height());
        let offset = Point::new(self.padding, self.padding);

        for position in positions.values_mut() {
            let relative = position.sub_point(bounds.min_point());
            *position = Point::new(
                relative.x() / span_x * inner.width(),
                relative.y() / span_y * inner.height(),
            )
            .add_point(offset);
        }

        positions
    }
}

fn non_zero(span: f32) -> f32 {
    if span == 0.0 { 1.0 } else { span }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;
    use speciesring_core::{
        ranking::DistancePair,
        record::{SequenceRecord, Species},
    };

    use super::*;

    /// Every node lands inside the canvas and every position is finite.
    fn check_nodes_inside_canvas(
        distances: Vec<usize>,
        width: f32,
        height: f32,
    ) -> Result<(), TestCaseError> {
        let mut records = vec![SequenceRecord::new(Species::new("Center", "C", 0), "")];
        records.extend(
            (0..distances.len())
                .map(|i| SequenceRecord::new(Species::new(format!("N{i}"), "X", 1), "")),
        );
        let mut pairs = vec![DistancePair::new(&records[0], 0)];
        pairs.extend(
            records[1..]
                .iter()
                .zip(&distances)
                .map(|(record, d)| DistancePair::new(record, *d)),
        );
        let graph = DistanceGraph::from_pairs(&pairs, "Center").unwrap();

        let mut engine = Engine::new();
        engine.set_iterations(50);
        let layout = engine.calculate(&graph, Size::new(width, height)).unwrap();

        prop_assert_eq!(layout.nodes().len(), distances.len() + 1);
        for node in layout.nodes() {
            let p = node.position();
            prop_assert!(p.x().is_finite() && p.y().is_finite());
            prop_assert!(p.x() >= 29.9 && p.x() <= width - 29.9);
            prop_assert!(p.y() >= 29.9 && p.y() <= height - 29.9);
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn nodes_inside_canvas(
            distances in prop::collection::vec(0usize..150, 0..12),
            width in 100.0f32..1200.0,
            height in 100.0f32..1200.0,
        ) {
            check_nodes_inside_canvas(distances, width, height)?;
        }
    }
}
