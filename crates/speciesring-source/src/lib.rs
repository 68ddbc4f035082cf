//! Data acquisition for SpeciesRing.
//!
//! Fetches sequence records from UniProt, caches raw responses on disk,
//! resolves species photos and stores records and comparison rows as CSV.

pub mod cache;
pub mod images;
pub mod store;
pub mod transport;
pub mod uniprot;

mod error;

pub use error::SourceError;

use speciesring_core::record::SequenceRecord;

/// A provider of sequence records for a gene.
pub trait SequenceSource {
    /// Fetches every record annotated with `gene`.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the records cannot be retrieved.
    fn fetch(&self, gene: &str) -> Result<Vec<SequenceRecord>, SourceError>;
}

impl<S: SequenceSource + ?Sized> SequenceSource for &S {
    fn fetch(&self, gene: &str) -> Result<Vec<SequenceRecord>, SourceError> {
        (**self).fetch(gene)
    }
}

impl<S: SequenceSource + ?Sized> SequenceSource for Box<S> {
    fn fetch(&self, gene: &str) -> Result<Vec<SequenceRecord>, SourceError> {
        (**self).fetch(gene)
    }
}
