//! Error types for SpeciesRing operations.
//!
//! This module provides the main error type [`SpeciesRingError`] which wraps
//! the errors of the core algorithms and the data source together with the
//! conditions raised while laying out and exporting reports.

use std::io;

use thiserror::Error;

use speciesring_core::CoreError;
use speciesring_source::SourceError;

/// The main error type for SpeciesRing operations.
#[derive(Debug, Error)]
pub enum SpeciesRingError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl From<std::fmt::Error> for SpeciesRingError {
    fn from(error: std::fmt::Error) -> Self {
        Self::Export(error.to_string())
    }
}
