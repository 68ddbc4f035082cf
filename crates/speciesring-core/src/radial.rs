//! Concentric ring placement.
//!
//! [`plan_layout`] turns ranked distances into positions on a square canvas:
//! the reference entity sits at the centre and every other entity is placed
//! on a ring whose index grows with its distance value.
//!
//! ```text
//!               ring 2
//!          .-------------.
//!         /    ring 1     \
//!        |   .-------.     |
//!        |  |    C    |  ● |   ● at angle 0 (positive x-axis)
//!        |   '-------'     |
//!         \               /
//!          '-------------'
//! ```
//!
//! Distinct distance values are sorted ascending before ring indices are
//! assigned, so the result never depends on hashing or insertion order.

use std::collections::BTreeMap;

use log::debug;

use crate::{
    CoreError,
    geometry::{Point, Size},
    ranking::DistancePair,
    record::{Entity, name_matches},
};

/// The excluded reference entity, drawn at the canvas centre.
#[derive(Debug)]
pub struct CenterPlacement<'a, E> {
    entity: &'a E,
    distance: usize,
    position: Point,
}

impl<'a, E> CenterPlacement<'a, E> {
    pub fn entity(&self) -> &'a E {
        self.entity
    }

    pub fn distance(&self) -> usize {
        self.distance
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

/// Placement of one entity on a ring.
#[derive(Debug)]
pub struct RingAssignment<'a, E> {
    entity: &'a E,
    distance: usize,
    ring: usize,
    angle_degrees: f32,
    position: Point,
}

impl<'a, E> RingAssignment<'a, E> {
    pub fn entity(&self) -> &'a E {
        self.entity
    }

    pub fn distance(&self) -> usize {
        self.distance
    }

    /// Ring index, starting at 1 for the innermost ring.
    pub fn ring(&self) -> usize {
        self.ring
    }

    pub fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

/// Result of [`plan_layout`].
#[derive(Debug)]
pub struct RadialLayout<'a, E> {
    canvas: Size,
    ring_spacing: f32,
    center: CenterPlacement<'a, E>,
    assignments: Vec<RingAssignment<'a, E>>,
}

impl<'a, E> RadialLayout<'a, E> {
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn ring_spacing(&self) -> f32 {
        self.ring_spacing
    }

    pub fn center(&self) -> &CenterPlacement<'a, E> {
        &self.center
    }

    /// Ring assignments ordered by ring, then by input order within a ring.
    pub fn assignments(&self) -> &[RingAssignment<'a, E>] {
        &self.assignments
    }

    /// Number of rings in use.
    pub fn ring_count(&self) -> usize {
        self.assignments.last().map_or(0, |a| a.ring)
    }

    /// Radii of all rings in use, innermost first.
    pub fn ring_radii(&self) -> Vec<f32> {
        (1..=self.ring_count())
            .map(|ring| ring as f32 * self.ring_spacing)
            .collect()
    }
}

/// Plans the concentric ring layout.
///
/// The first entity whose name matches `exclude_name` (ignoring case) becomes
/// the centre; it and any other entity with the same name are left off the
/// rings. The remaining entities are grouped by distance, ring `k` holding the
/// `k`-th smallest distinct distance at radius `k * ring_spacing`. Within a
/// ring of `n` entities the `i`-th, in input order, sits at `i * 360 / n`
/// degrees.
///
/// # Errors
///
/// Returns [`CoreError::InvalidInput`] when `canvas_size` or `ring_spacing`
/// is zero, and [`CoreError::ReferenceNotFound`] when no entity matches
/// `exclude_name`.
///
/// # Examples
///
/// ```
/// use speciesring_core::{
///     radial::plan_layout,
///     ranking::compute_distances,
///     record::{SequenceRecord, Species},
/// };
///
/// let records = vec![
///     SequenceRecord::new(Species::new("Human", "Homo sapiens", 9606), "ACGT"),
///     SequenceRecord::new(Species::new("Mouse", "Mus musculus", 10090), "ACGA"),
/// ];
/// let pairs = compute_distances(&records, "Human").unwrap();
/// let layout = plan_layout(&pairs, "Human", 800, 120).unwrap();
///
/// assert_eq!(layout.assignments().len(), 1);
/// assert_eq!(layout.assignments()[0].ring(), 1);
/// assert_eq!(layout.assignments()[0].position().x(), 520.0);
/// ```
pub fn plan_layout<'a, E: Entity>(
    pairs: &[DistancePair<'a, E>],
    exclude_name: &str,
    canvas_size: u32,
    ring_spacing: u32,
) -> Result<RadialLayout<'a, E>, CoreError> {
    if canvas_size == 0 {
        return Err(CoreError::invalid_input("canvas_size", "must be positive"));
    }
    if ring_spacing == 0 {
        return Err(CoreError::invalid_input("ring_spacing", "must be positive"));
    }

    let canvas = Size::square(canvas_size as f32);
    let center_point = canvas.center();
    let spacing = ring_spacing as f32;

    let center_pair = pairs
        .iter()
        .find(|pair| name_matches(pair.entity(), exclude_name))
        .ok_or_else(|| CoreError::reference_not_found(exclude_name))?;
    let center = CenterPlacement {
        entity: center_pair.entity(),
        distance: center_pair.distance(),
        position: center_point,
    };

    let mut rings: BTreeMap<usize, Vec<&DistancePair<'a, E>>> = BTreeMap::new();
    for pair in pairs
        .iter()
        .filter(|pair| !name_matches(pair.entity(), exclude_name))
    {
        rings.entry(pair.distance()).or_default().push(pair);
    }

    let mut assignments = Vec::with_capacity(pairs.len().saturating_sub(1));
    for (ring_idx, (distance, members)) in rings.into_iter().enumerate() {
        let ring = ring_idx + 1;
        let radius = ring as f32 * spacing;
        let step = 360.0 / members.len() as f32;

        debug!(ring, distance, members = members.len(); "Placing ring");

        for (i, pair) in members.into_iter().enumerate() {
            let angle_degrees = i as f32 * step;
            assignments.push(RingAssignment {
                entity: pair.entity(),
                distance,
                ring,
                angle_degrees,
                position: Point::from_polar(center_point, radius, angle_degrees),
            });
        }
    }

    Ok(RadialLayout {
        canvas,
        ring_spacing: spacing,
        center,
        assignments,
    })
}
