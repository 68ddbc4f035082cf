//! CSV persistence of fetched records and comparison rows.

use std::{fs, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};

use speciesring_core::{
    alignment::Mask,
    record::{Entity, SequenceRecord, Species},
};

use crate::SourceError;

/// Placeholder written when no image was found.
pub const MISSING_IMAGE: &str = "N/A";

#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    common_name: String,
    scientific_name: String,
    taxonomy_id: u32,
    sequence: String,
}

impl From<&SequenceRecord> for StoredRecord {
    fn from(record: &SequenceRecord) -> Self {
        let species = record.species();
        Self {
            common_name: species.common_name().to_string(),
            scientific_name: species.scientific_name().to_string(),
            taxonomy_id: species.taxonomy_id(),
            sequence: record.sequence().to_string(),
        }
    }
}

impl From<StoredRecord> for SequenceRecord {
    fn from(stored: StoredRecord) -> Self {
        SequenceRecord::new(
            Species::new(stored.common_name, stored.scientific_name, stored.taxonomy_id),
            stored.sequence,
        )
    }
}

/// One species in the comparison against the reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesReportRow {
    name: String,
    scientific_name: String,
    taxonomy_id: u32,
    sequence: String,
    sequence_length: usize,
    distance: usize,
    image_url: String,
    different: String,
}

impl SpeciesReportRow {
    /// Builds the row for `record`.
    ///
    /// `mask` is the difference mask of the record's sequence against the
    /// reference; a missing image is stored as `N/A`.
    pub fn new(
        record: &SequenceRecord,
        distance: usize,
        image_url: Option<String>,
        mask: &Mask,
    ) -> Self {
        let species = record.species();
        Self {
            name: species.common_name().to_string(),
            scientific_name: species.scientific_name().to_string(),
            taxonomy_id: species.taxonomy_id(),
            sequence: record.sequence().to_string(),
            sequence_length: record.sequence().chars().count(),
            distance,
            image_url: image_url.unwrap_or_else(|| MISSING_IMAGE.to_string()),
            different: mask.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scientific_name(&self) -> &str {
        &self.scientific_name
    }

    pub fn taxonomy_id(&self) -> u32 {
        self.taxonomy_id
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    pub fn distance(&self) -> usize {
        self.distance
    }

    /// Returns the image URL, or `None` for the `N/A` placeholder.
    pub fn image_url(&self) -> Option<&str> {
        Some(self.image_url.as_str()).filter(|url| *url != MISSING_IMAGE && !url.is_empty())
    }

    /// The difference mask in its `0`/`1` form.
    pub fn different(&self) -> &str {
        &self.different
    }
}

impl Entity for SpeciesReportRow {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn sequence(&self) -> &str {
        &self.sequence
    }
}

/// Writes `records` as flat CSV rows, creating parent directories.
///
/// # Errors
///
/// Returns an error when the file cannot be created or written.
pub fn save_records(path: &Path, records: &[SequenceRecord]) -> Result<(), SourceError> {
    write_rows(path, records.iter().map(StoredRecord::from))?;
    debug!(path = path.display().to_string(), records = records.len(); "Saved records");
    Ok(())
}

/// Reads records written by [`save_records`].
///
/// # Errors
///
/// Returns an error when the file cannot be read or a row does not parse.
pub fn load_records(path: &Path) -> Result<Vec<SequenceRecord>, SourceError> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize::<StoredRecord>()
        .map(|row| row.map(SequenceRecord::from).map_err(SourceError::from))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(path = path.display().to_string(), records = records.len(); "Loaded records");
    Ok(records)
}

/// Writes the comparison CSV, creating parent directories.
///
/// # Errors
///
/// Returns an error when the file cannot be created or written.
pub fn write_report_rows(path: &Path, rows: &[SpeciesReportRow]) -> Result<(), SourceError> {
    write_rows(path, rows.iter())?;
    debug!(path = path.display().to_string(), rows = rows.len(); "Saved comparison rows");
    Ok(())
}

/// Reads a comparison CSV written by [`write_report_rows`].
///
/// # Errors
///
/// Returns an error when the file cannot be read or a row does not parse.
pub fn read_report_rows(path: &Path) -> Result<Vec<SpeciesReportRow>, SourceError> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn write_rows<S: Serialize>(
    path: &Path,
    rows: impl Iterator<Item = S>,
) -> Result<(), SourceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
