//! Species and sequence records.
//!
//! A [`SequenceRecord`] pairs the protein sequence fetched for one species with
//! the metadata identifying that species. The algorithms in this crate only
//! need a display name and a sequence, which they read through the [`Entity`]
//! trait, so callers can rank and place their own record types as well.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Identifying metadata of a species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    common_name: String,
    scientific_name: String,
    taxonomy_id: u32,
}

impl Species {
    /// Creates a new species description.
    pub fn new(
        common_name: impl Into<String>,
        scientific_name: impl Into<String>,
        taxonomy_id: u32,
    ) -> Self {
        Self {
            common_name: common_name.into(),
            scientific_name: scientific_name.into(),
            taxonomy_id,
        }
    }

    /// Returns the common (display) name, e.g. `Human`.
    pub fn common_name(&self) -> &str {
        &self.common_name
    }

    /// Returns the binomial name, e.g. `Homo sapiens`.
    pub fn scientific_name(&self) -> &str {
        &self.scientific_name
    }

    /// Returns the NCBI taxonomy identifier.
    pub fn taxonomy_id(&self) -> u32 {
        self.taxonomy_id
    }
}

/// A sequence fetched for one species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    species: Species,
    sequence: String,
}

impl SequenceRecord {
    pub fn new(species: Species, sequence: impl Into<String>) -> Self {
        Self {
            species,
            sequence: sequence.into(),
        }
    }

    pub fn species(&self) -> &Species {
        &self.species
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }
}

/// A named record carrying a sequence.
///
/// This is the only view the ranking and placement algorithms take of their
/// inputs; any other metadata travels along untouched.
pub trait Entity {
    /// Name used to look up the reference and to label the entity.
    fn display_name(&self) -> &str;

    /// The sequence compared against the reference.
    fn sequence(&self) -> &str;
}

impl Entity for SequenceRecord {
    fn display_name(&self) -> &str {
        self.species.common_name()
    }

    fn sequence(&self) -> &str {
        &self.sequence
    }
}

impl<E: Entity + ?Sized> Entity for &E {
    fn display_name(&self) -> &str {
        (**self).display_name()
    }

    fn sequence(&self) -> &str {
        (**self).sequence()
    }
}

/// Returns true when `name` matches the display name of `entity`, ignoring case.
pub fn name_matches<E: Entity + ?Sized>(entity: &E, name: &str) -> bool {
    entity.display_name().to_lowercase() == name.to_lowercase()
}

/// Checks that a sequence contains no whitespace or control characters.
///
/// The alignment functions accept any string; this check is applied where
/// sequences enter the system. An empty sequence is valid.
///
/// # Errors
///
/// Returns [`CoreError::InvalidInput`] naming the first offending character
/// and its position.
pub fn validate_sequence(sequence: &str) -> Result<(), CoreError> {
    match sequence
        .chars()
        .enumerate()
        .find(|(_, c)| c.is_whitespace() || c.is_control())
    {
        Some((position, c)) => Err(CoreError::invalid_input(
            "sequence",
            format!("unexpected character {c:?} at position {position}"),
        )),
        None => Ok(()),
    }
}
