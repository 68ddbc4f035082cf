//! End-to-end report generation.
//!
//! A [`Pipeline`] fetches records for the configured gene (or reuses the ones
//! saved by an earlier run), compares them against the reference species and
//! writes every artefact into the processed data directory:
//!
//! | File | Content |
//! |---|---|
//! | `all_sequences.csv` | every fetched record |
//! | `close_to_reference.csv` | one comparison row per species |
//! | `close_to_reference.html` | concentric ring report |
//! | `distance_graph.html` | force-directed distance graph |

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use log::{debug, info};

use speciesring_source::{
    SequenceSource,
    cache::{CachedTransport, ResponseCache},
    images::{INaturalistResolver, ImageResolver, NoImages},
    store,
    transport::HttpTransport,
    uniprot::UniprotClient,
};

use crate::{ReportBuilder, SpeciesRingError, config::AppConfig};

pub const ALL_RECORDS_FILE: &str = "all_sequences.csv";
pub const COMPARISON_FILE: &str = "close_to_reference.csv";
pub const RADAR_REPORT_FILE: &str = "close_to_reference.html";
pub const GRAPH_REPORT_FILE: &str = "distance_graph.html";

const UNIPROT_CACHE_DIR: &str = "uniprot_cache";
const INATURALIST_CACHE_DIR: &str = "inat_cache";

/// Paths written by a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    all_records: PathBuf,
    comparison: PathBuf,
    radar_report: PathBuf,
    graph_report: PathBuf,
    record_count: usize,
    fetched: bool,
}

impl RunReport {
    pub fn all_records(&self) -> &Path {
        &self.all_records
    }

    pub fn comparison(&self) -> &Path {
        &self.comparison
    }

    pub fn radar_report(&self) -> &Path {
        &self.radar_report
    }

    pub fn graph_report(&self) -> &Path {
        &self.graph_report
    }

    /// Number of records compared.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Whether records were fetched from the source during this run.
    pub fn fetched(&self) -> bool {
        self.fetched
    }

    /// Every artefact path, in the order they were written.
    pub fn artefacts(&self) -> [&Path; 4] {
        [
            self.all_records.as_path(),
            self.comparison.as_path(),
            self.radar_report.as_path(),
            self.graph_report.as_path(),
        ]
    }
}

/// Sequential fetch, compare and render pipeline.
pub struct Pipeline<S, R> {
    builder: ReportBuilder,
    source: S,
    images: R,
}

impl<S: SequenceSource, R: ImageResolver> Pipeline<S, R> {
    pub fn new(config: AppConfig, source: S, images: R) -> Self {
        Self {
            builder: ReportBuilder::new(config),
            source,
            images,
        }
    }

    pub fn config(&self) -> &AppConfig {
        self.builder.config()
    }

    /// Runs every stage and returns the paths written.
    ///
    /// Records are fetched from the source when `force_refresh` is set or no
    /// saved records exist yet; otherwise the saved CSV is reused.
    ///
    /// # Errors
    ///
    /// Returns `SpeciesRingError` when fetching, comparing, rendering or
    /// writing any artefact fails. Artefacts written before the failure are
    /// left in place.
    pub fn run(&self, force_refresh: bool) -> Result<RunReport, SpeciesRingError> {
        let config = self.builder.config();
        let processed = config.paths().processed_dir();
        let all_records = processed.join(ALL_RECORDS_FILE);

        let fetched = force_refresh || !all_records.exists();
        if fetched {
            let gene = config.source().gene();
            info!(gene = gene, refresh = force_refresh; "Fetching sequences");
            let records = self.source.fetch(gene)?;
            store::save_records(&all_records, &records)?;
            info!(count = records.len(), path:? = all_records; "Sequences saved");
        } else {
            info!(path:? = all_records; "Reusing saved sequences");
        }

        let records = store::load_records(&all_records)?;
        debug!(count = records.len(); "Sequences loaded");

        let rows = self.builder.compare(&records, &self.images)?;
        let comparison = processed.join(COMPARISON_FILE);
        store::write_report_rows(&comparison, &rows)?;
        info!(path:? = comparison; "Comparison saved");

        let radar_report = processed.join(RADAR_REPORT_FILE);
        let html = self.builder.render_radar_html(&rows)?;
        write_file(&radar_report, &html)?;
        info!(path:? = radar_report; "Concentric report written");

        let graph_report = processed.join(GRAPH_REPORT_FILE);
        let html = self.builder.render_graph_html(&rows)?;
        write_file(&graph_report, &html)?;
        info!(path:? = graph_report; "Distance graph written");

        Ok(RunReport {
            all_records,
            comparison,
            radar_report,
            graph_report,
            record_count: records.len(),
            fetched,
        })
    }
}

impl Pipeline<Box<dyn SequenceSource>, Box<dyn ImageResolver>> {
    /// Builds a pipeline backed by UniProt and, when enabled, iNaturalist.
    ///
    /// Both clients cache their responses under the raw data directory.
    ///
    /// # Errors
    ///
    /// Returns [`SpeciesRingError::Source`] when the HTTP client cannot be
    /// created.
    pub fn networked(config: AppConfig) -> Result<Self, SpeciesRingError> {
        let raw = config.paths().raw_dir();
        let expiry = Duration::from_secs(config.source().cache_expiry_secs());

        let uniprot = UniprotClient::new(CachedTransport::new(
            HttpTransport::new()?,
            ResponseCache::new(raw.join(UNIPROT_CACHE_DIR), expiry),
        ))
        .with_page_size(config.source().page_size());

        let images: Box<dyn ImageResolver> = if config.source().resolve_images() {
            Box::new(INaturalistResolver::new(CachedTransport::new(
                HttpTransport::new()?,
                ResponseCache::new(raw.join(INATURALIST_CACHE_DIR), expiry),
            )))
        } else {
            Box::new(NoImages)
        };

        debug!(raw_dir:? = raw; "Networked pipeline ready");
        Ok(Self::new(config, Box::new(uniprot), images))
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), SpeciesRingError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}
