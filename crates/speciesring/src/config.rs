//! Configuration types for SpeciesRing runs.
//!
//! This module provides configuration structures that control where data is
//! fetched from, how reports are laid out and styled, and where artefacts are
//! written. All types implement [`serde::Deserialize`] and every field has a
//! default, so an empty TOML document is a valid configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`SourceConfig`] - Gene to fetch, paging, caching and image lookup.
//! - [`ReportConfig`] - Reference species and concentric ring geometry.
//! - [`GraphConfig`] - Force graph canvas and simulation settings.
//! - [`StyleConfig`] - Colors used by both reports.
//! - [`PathsConfig`] - Data directory layout.
//!
//! # Example
//!
//! ```
//! # use speciesring::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.report().reference(), "Human");
//! assert!(config.style().mismatch_color().is_ok());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use speciesring_core::color::Color;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    source: SourceConfig,

    #[serde(default)]
    report: ReportConfig,

    #[serde(default)]
    graph: GraphConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    paths: PathsConfig,
}

impl AppConfig {
    pub fn source(&self) -> &SourceConfig {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut SourceConfig {
        &mut self.source
    }

    pub fn report(&self) -> &ReportConfig {
        &self.report
    }

    pub fn report_mut(&mut self) -> &mut ReportConfig {
        &mut self.report
    }

    pub fn graph(&self) -> &GraphConfig {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut GraphConfig {
        &mut self.graph
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn paths(&self) -> &PathsConfig {
        &self.paths
    }

    pub fn paths_mut(&mut self) -> &mut PathsConfig {
        &mut self.paths
    }
}

/// Where sequences come from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Gene symbol searched in UniProtKB.
    gene: String,

    /// Results requested per UniProt page.
    page_size: u32,

    /// Lifetime of cached HTTP responses in seconds; 0 disables caching.
    cache_expiry_secs: u64,

    /// Whether species photos are looked up on iNaturalist.
    resolve_images: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            gene: "HBB".to_string(),
            page_size: 500,
            cache_expiry_secs: 86_400,
            resolve_images: true,
        }
    }
}

impl SourceConfig {
    pub fn gene(&self) -> &str {
        &self.gene
    }

    pub fn set_gene(&mut self, gene: impl Into<String>) -> &mut Self {
        self.gene = gene.into();
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn cache_expiry_secs(&self) -> u64 {
        self.cache_expiry_secs
    }

    pub fn resolve_images(&self) -> bool {
        self.resolve_images
    }

    pub fn set_resolve_images(&mut self, resolve: bool) -> &mut Self {
        self.resolve_images = resolve;
        self
    }
}

/// Reference species and concentric report geometry.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Common name of the species drawn at the centre.
    reference: String,

    /// Side length of the square canvas in pixels.
    canvas_size: u32,

    /// Radius step between consecutive rings in pixels.
    ring_spacing: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            reference: "Human".to_string(),
            canvas_size: 800,
            ring_spacing: 120,
        }
    }
}

impl ReportConfig {
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn set_reference(&mut self, reference: impl Into<String>) -> &mut Self {
        self.reference = reference.into();
        self
    }

    pub fn canvas_size(&self) -> u32 {
        self.canvas_size
    }

    pub fn ring_spacing(&self) -> u32 {
        self.ring_spacing
    }
}

/// Force graph canvas and simulation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    width: u32,
    height: u32,

    /// Number of simulation steps.
    iterations: usize,

    /// Seed for the initial node placement.
    seed: u64,

    /// Pull of an edge towards its rest length.
    spring_constant: f32,

    /// Push between every pair of nodes.
    repulsion: f32,

    /// Fraction of velocity kept after each step, in `(0, 1]`.
    damping: f32,

    /// Margin kept free on every side of the canvas.
    padding: f32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            iterations: 200,
            seed: 42,
            spring_constant: 0.05,
            repulsion: 1000.0,
            damping: 0.85,
            padding: 30.0,
        }
    }
}

impl GraphConfig {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn set_iterations(&mut self, iterations: usize) -> &mut Self {
        self.iterations = iterations;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn spring_constant(&self) -> f32 {
        self.spring_constant
    }

    pub fn repulsion(&self) -> f32 {
        self.repulsion
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn set_padding(&mut self, padding: f32) -> &mut Self {
        self.padding = padding;
        self
    }
}

/// Colors used by the reports, as CSS color strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    mismatch_color: String,
    background_color: String,
    node_color: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            mismatch_color: "red".to_string(),
            background_color: "#ffffff".to_string(),
            node_color: "#0d6efd".to_string(),
        }
    }
}

impl StyleConfig {
    /// Returns the parsed color of mismatching residues.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid [`Color`].
    pub fn mismatch_color(&self) -> Result<Color, String> {
        parse_color("mismatch", &self.mismatch_color)
    }

    /// Returns the parsed background [`Color`] of both canvases.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid [`Color`].
    pub fn background_color(&self) -> Result<Color, String> {
        parse_color("background", &self.background_color)
    }

    /// Returns the parsed fill [`Color`] of graph nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid [`Color`].
    pub fn node_color(&self) -> Result<Color, String> {
        parse_color("node", &self.node_color)
    }
}

fn parse_color(which: &str, value: &str) -> Result<Color, String> {
    Color::new(value).map_err(|err| format!("Invalid {which} color in config: {err}"))
}

/// Data directory layout.
///
/// Raw HTTP caches live under `<data_dir>/raw`, CSV and HTML artefacts under
/// `<data_dir>/processed`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    data_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl PathsConfig {
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn set_data_dir(&mut self, data_dir: impl Into<PathBuf>) -> &mut Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.source().gene(), "HBB");
        assert_eq!(config.source().page_size(), 500);
        assert_eq!(config.source().cache_expiry_secs(), 86_400);
        assert!(config.source().resolve_images());
        assert_eq!(config.report().canvas_size(), 800);
        assert_eq!(config.report().ring_spacing(), 120);
        assert_eq!(config.graph().width(), 600);
        assert_eq!(config.graph().height(), 400);
        assert_eq!(config.paths().raw_dir(), PathBuf::from("data").join("raw"));
        assert_eq!(
            config.paths().processed_dir(),
            PathBuf::from("data").join("processed")
        );
    }

    #[test]
    fn test_default_colors_parse() {
        let style = StyleConfig::default();
        assert_eq!(style.mismatch_color().unwrap().to_string(), "red");
        assert!(style.background_color().is_ok());
        assert!(style.node_color().is_ok());
    }

    #[test]
    fn test_invalid_color_is_reported() {
        let style = StyleConfig {
            mismatch_color: "not-a-color".to_string(),
            ..StyleConfig::default()
        };
        let err = style.mismatch_color().unwrap_err();
        assert!(err.starts_with("Invalid mismatch color in config"));
    }

    #[test]
    fn test_setters_override() {
        let mut config = AppConfig::default();
        config.report_mut().set_reference("Mouse");
        config.source_mut().set_gene("MB").set_resolve_images(false);
        config.paths_mut().set_data_dir("/tmp/sr");

        assert_eq!(config.report().reference(), "Mouse");
        assert_eq!(config.source().gene(), "MB");
        assert!(!config.source().resolve_images());
        assert_eq!(config.paths().data_dir(), Path::new("/tmp/sr"));
    }
}
