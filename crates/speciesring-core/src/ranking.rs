//! Distance-to-reference ranking.
//!
//! [`compute_distances`] pairs every entity with its edit distance to a
//! named reference entity. Output order follows input order; sorting is left
//! to the consumer.

use log::debug;

use crate::{
    CoreError,
    alignment::edit_distance,
    record::{Entity, name_matches},
};

/// Progress is logged every this many entities.
const PROGRESS_INTERVAL: usize = 50;

/// An entity paired with its edit distance to the reference.
#[derive(Debug, PartialEq, Eq)]
pub struct DistancePair<'a, E> {
    entity: &'a E,
    distance: usize,
}

impl<E> Clone for DistancePair<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for DistancePair<'_, E> {}

impl<'a, E> DistancePair<'a, E> {
    pub fn new(entity: &'a E, distance: usize) -> Self {
        Self { entity, distance }
    }

    pub fn entity(&self) -> &'a E {
        self.entity
    }

    pub fn distance(&self) -> usize {
        self.distance
    }
}

/// Returns the first entity whose display name matches `name`, ignoring case.
///
/// # Errors
///
/// Returns [`CoreError::ReferenceNotFound`] naming `name` when no entity
/// matches.
pub fn find_reference<'a, E: Entity>(entities: &'a [E], name: &str) -> Result<&'a E, CoreError> {
    entities
        .iter()
        .find(|entity| name_matches(*entity, name))
        .ok_or_else(|| CoreError::reference_not_found(name))
}

/// Computes the edit distance of every entity to the reference named
/// `reference_name`.
///
/// The reference itself, when present in `entities`, yields distance 0.
///
/// # Errors
///
/// Returns [`CoreError::ReferenceNotFound`] when no entity's display name
/// matches `reference_name` case-insensitively. No partial result is
/// returned.
///
/// # Examples
///
/// ```
/// use speciesring_core::{
///     ranking::compute_distances,
///     record::{SequenceRecord, Species},
/// };
///
/// let records = vec![
///     SequenceRecord::new(Species::new("Human", "Homo sapiens", 9606), "ACGT"),
///     SequenceRecord::new(Species::new("Mouse", "Mus musculus", 10090), "ACGA"),
/// ];
/// let pairs = compute_distances(&records, "human").unwrap();
/// let distances: Vec<usize> = pairs.iter().map(|p| p.distance()).collect();
/// assert_eq!(distances, vec![0, 1]);
/// ```
pub fn compute_distances<'a, E: Entity>(
    entities: &'a [E],
    reference_name: &str,
) -> Result<Vec<DistancePair<'a, E>>, CoreError> {
    let reference = find_reference(entities, reference_name)?;
    let reference_sequence = reference.sequence();

    debug!(
        reference = reference.display_name(),
        entity_count = entities.len();
        "Computing distances to reference"
    );

    let pairs = entities
        .iter()
        .enumerate()
        .map(|(idx, entity)| {
            if idx > 0 && idx % PROGRESS_INTERVAL == 0 {
                debug!(done = idx, total = entities.len(); "Distance computation progress");
            }
            DistancePair::new(entity, edit_distance(entity.sequence(), reference_sequence))
        })
        .collect();

    Ok(pairs)
}
