//! UniProt REST client.
//!
//! Searches UniProtKB for every entry of a gene and follows the cursor links
//! in the `Link` header until the result set is exhausted.

use std::collections::HashSet;

use log::{debug, info, warn};
use reqwest::Url;
use serde::Deserialize;

use speciesring_core::record::{SequenceRecord, Species, validate_sequence};

use crate::{SequenceSource, SourceError, transport::Transport};

pub const SEARCH_URL: &str = "https://rest.uniprot.org/uniprotkb/search";

/// Results requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

#[derive(Debug, Deserialize)]
struct SearchPage {
    results: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    organism: Organism,
    sequence: SequenceField,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Organism {
    scientific_name: String,
    common_name: Option<String>,
    taxon_id: u32,
}

#[derive(Debug, Deserialize)]
struct SequenceField {
    value: String,
}

/// Builds the first search URL for `gene`.
///
/// # Errors
///
/// Returns [`SourceError::InvalidUrl`] if the URL cannot be assembled.
///
/// # Examples
///
/// ```
/// use speciesring_source::uniprot::search_url;
///
/// let url = search_url("HBB", 500).unwrap();
/// assert_eq!(
///     url,
///     "https://rest.uniprot.org/uniprotkb/search?query=gene%3AHBB&format=json&size=500"
/// );
/// ```
pub fn search_url(gene: &str, page_size: u32) -> Result<String, SourceError> {
    let query = format!("gene:{gene}");
    let size = page_size.to_string();
    Url::parse_with_params(
        SEARCH_URL,
        &[
            ("query", query.as_str()),
            ("format", "json"),
            ("size", size.as_str()),
        ],
    )
    .map(String::from)
    .map_err(|err| SourceError::InvalidUrl {
        url: SEARCH_URL.to_string(),
        reason: err.to_string(),
    })
}

/// Parses one page of search results.
///
/// `offset` is the number of records kept from earlier pages and is only
/// used to number entries in messages. Entries without a common name use
/// their scientific name instead. An entry whose sequence contains control
/// or whitespace characters is logged and skipped, so one bad entry does not
/// abort a multi-page fetch.
///
/// # Errors
///
/// Returns [`SourceError::Json`] when the body is not a search page, and
/// [`SourceError::MalformedRecord`] when an entry lacks a required field.
pub fn parse_search_page(body: &str, offset: usize) -> Result<Vec<SequenceRecord>, SourceError> {
    let page: SearchPage = serde_json::from_str(body)?;
    let mut records = Vec::with_capacity(page.results.len());

    for (idx, value) in page.results.into_iter().enumerate() {
        let index = offset + idx;
        let entry: Entry = serde_json::from_value(value)
            .map_err(|err| SourceError::malformed(index, err.to_string()))?;

        if let Err(err) = validate_sequence(&entry.sequence.value) {
            warn!(
                index,
                scientific_name = entry.organism.scientific_name.as_str(),
                reason = err.to_string();
                "Skipping UniProt entry with an unusable sequence"
            );
            continue;
        }

        let Organism {
            scientific_name,
            common_name,
            taxon_id,
        } = entry.organism;
        let common_name = common_name.unwrap_or_else(|| scientific_name.clone());

        records.push(SequenceRecord::new(
            Species::new(common_name, scientific_name, taxon_id),
            entry.sequence.value,
        ));
    }

    Ok(records)
}

/// Client for the UniProtKB search endpoint.
#[derive(Debug)]
pub struct UniprotClient<T> {
    transport: T,
    page_size: u32,
}

impl<T: Transport> UniprotClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the number of results requested per page.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Fetches every UniProtKB entry annotated with `gene`.
    ///
    /// # Errors
    ///
    /// Returns the first transport or parsing error encountered. Records from
    /// pages fetched before the failure are discarded. Entries with unusable
    /// sequences are skipped rather than treated as errors.
    pub fn fetch_gene(&self, gene: &str) -> Result<Vec<SequenceRecord>, SourceError> {
        let mut next = Some(search_url(gene, self.page_size)?);
        let mut visited = HashSet::new();
        let mut records = Vec::new();

        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                warn!(url; "Pagination revisited a page, stopping");
                break;
            }

            let page = self.transport.get(&url)?;
            let batch = parse_search_page(page.body(), records.len())?;
            debug!(page = visited.len(), records = batch.len(); "Fetched UniProt page");

            records.extend(batch);
            next = page.next().map(str::to_string);
        }

        info!(gene, records = records.len(), pages = visited.len(); "UniProt search complete");
        Ok(records)
    }
}

impl<T: Transport> SequenceSource for UniprotClient<T> {
    fn fetch(&self, gene: &str) -> Result<Vec<SequenceRecord>, SourceError> {
        self.fetch_gene(gene)
    }
}
