//! SpeciesRing - Species similarity reports for a gene.
//!
//! Compares protein sequences of many species against a reference species and
//! renders the result as a concentric ring report and a force-directed
//! distance graph. The [`pipeline`] module ties fetching, caching, comparison
//! and rendering together; [`ReportBuilder`] exposes the comparison and
//! rendering stages on their own.

pub mod config;
pub mod export;
pub mod layout;
pub mod pipeline;
pub mod structure;

mod error;

pub use speciesring_core::{alignment, color, geometry, radial, ranking, record};
pub use speciesring_source::{SequenceSource, images, store};

pub use error::SpeciesRingError;

use log::{debug, info};

use speciesring_core::{
    alignment::difference_mask,
    geometry::Size,
    radial::plan_layout,
    ranking::{DistancePair, compute_distances, find_reference},
    record::SequenceRecord,
};
use speciesring_source::{images::ImageResolver, store::SpeciesReportRow};

use config::AppConfig;
use export::Palette;
use structure::DistanceGraph;

/// Builder for comparing species and rendering the reports.
///
/// # Examples
///
/// ```rust
/// use speciesring::{
///     ReportBuilder,
///     config::AppConfig,
///     images::NoImages,
///     record::{SequenceRecord, Species},
/// };
///
/// let records = vec![
///     SequenceRecord::new(Species::new("Human", "Homo sapiens", 9606), "ACGT"),
///     SequenceRecord::new(Species::new("Mouse", "Mus musculus", 10090), "ACGA"),
/// ];
///
/// let builder = ReportBuilder::new(AppConfig::default());
/// let rows = builder.compare(&records, &NoImages).expect("Failed to compare");
/// assert_eq!(rows[1].different(), "0001");
///
/// let html = builder.render_radar_html(&rows).expect("Failed to render");
/// assert!(html.contains("<svg"));
/// ```
#[derive(Default)]
pub struct ReportBuilder {
    config: AppConfig,
}

impl ReportBuilder {
    /// Create a new report builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Compare every record against the configured reference species.
    ///
    /// Rows keep the order of `records`. Each carries the edit distance to
    /// the reference, the difference mask of its sequence and, when image
    /// resolution is enabled, a photo URL from `images`.
    ///
    /// # Errors
    ///
    /// Returns [`SpeciesRingError::Core`] when the reference species is not
    /// among `records`.
    pub fn compare<R>(
        &self,
        records: &[SequenceRecord],
        images: &R,
    ) -> Result<Vec<SpeciesReportRow>, SpeciesRingError>
    where
        R: ImageResolver + ?Sized,
    {
        let reference_name = self.config.report().reference();
        info!(reference = reference_name, records = records.len(); "Comparing species");

        let pairs = compute_distances(records, reference_name)?;
        let reference = find_reference(records, reference_name)?;
        let resolve_images = self.config.source().resolve_images();

        let rows: Vec<SpeciesReportRow> = pairs
            .iter()
            .map(|pair| {
                let record = pair.entity();
                let mask = difference_mask(reference.sequence(), record.sequence());
                let image_url = if resolve_images {
                    images.image_url(record.species().scientific_name())
                } else {
                    None
                };
                SpeciesReportRow::new(record, pair.distance(), image_url, &mask)
            })
            .collect();

        debug!(
            rows = rows.len(),
            with_images = rows.iter().filter(|row| row.image_url().is_some()).count();
            "Comparison rows built"
        );
        Ok(rows)
    }

    /// Render the concentric ring report for comparison rows.
    ///
    /// Rows are stably sorted by distance before layout, so species at equal
    /// distance keep their relative order around the ring.
    ///
    /// # Errors
    ///
    /// Returns `SpeciesRingError` when the reference is missing from `rows`,
    /// the report dimensions or colors are invalid, or rendering fails.
    pub fn render_radar_html(&self, rows: &[SpeciesReportRow]) -> Result<String, SpeciesRingError> {
        let report = self.config.report();
        info!(reference = report.reference(); "Rendering concentric report");

        let mut sorted = rows.to_vec();
        sorted.sort_by_key(SpeciesReportRow::distance);

        let pairs: Vec<DistancePair<'_, SpeciesReportRow>> = sorted
            .iter()
            .map(|row| DistancePair::new(row, row.distance()))
            .collect();
        let layout = plan_layout(
            &pairs,
            report.reference(),
            report.canvas_size(),
            report.ring_spacing(),
        )?;
        info!(rings = layout.ring_count(); "Concentric layout planned");

        let palette = Palette::from_style(self.config.style())?;
        export::radar::render_html(self.config.source().gene(), &layout, &sorted, &palette)
    }

    /// Render the force-directed distance graph for comparison rows.
    ///
    /// # Errors
    ///
    /// Returns `SpeciesRingError` when the reference is missing from `rows`,
    /// the canvas is too small for the layout, or rendering fails.
    pub fn render_graph_html(&self, rows: &[SpeciesReportRow]) -> Result<String, SpeciesRingError> {
        let graph_config = self.config.graph();
        info!("Building distance graph");

        let pairs: Vec<DistancePair<'_, SpeciesReportRow>> = rows
            .iter()
            .map(|row| DistancePair::new(row, row.distance()))
            .collect();
        let graph = DistanceGraph::from_pairs(&pairs, self.config.report().reference())?;

        let mut engine = layout::force::Engine::new();
        engine
            .set_iterations(graph_config.iterations())
            .set_seed(graph_config.seed())
            .set_spring_constant(graph_config.spring_constant())
            .set_repulsion_constant(graph_config.repulsion())
            .set_damping_factor(graph_config.damping())
            .set_padding(graph_config.padding());

        let canvas = Size::new(graph_config.width() as f32, graph_config.height() as f32);
        let graph_layout = engine.calculate(&graph, canvas)?;
        info!(
            nodes = graph_layout.nodes().len(),
            edges = graph_layout.edges().len();
            "Graph layout calculated"
        );

        let palette = Palette::from_style(self.config.style())?;
        export::graph::render_html(&graph_layout, &palette)
    }
}
