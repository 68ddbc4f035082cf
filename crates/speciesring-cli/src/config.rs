//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use speciesring::{SpeciesRingError, config::AppConfig, export::Palette};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for SpeciesRingError {
    fn from(err: ConfigError) -> Self {
        SpeciesRingError::Config(err.to_string())
    }
}

/// Find and load the SpeciesRing configuration
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (speciesring/config.toml)
/// 3. Platform config directory (`speciesring/config.toml` under the
///    `com.speciesring.speciesring` project dirs)
/// 4. [`AppConfig::default`] if none found
///
/// A loaded file is checked with [`validate`] straight away so that errors
/// point at the file. Command-line overrides are applied later by the
/// caller, which must validate the final configuration again.
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed or fails validation
pub fn load_config(
    explicit_path: Option<impl AsRef<Path>>,
) -> Result<AppConfig, SpeciesRingError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("speciesring/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "speciesring", "speciesring") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load and validate configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, SpeciesRingError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;

    Ok(config)
}

/// Parse TOML text into a validated [`AppConfig`].
fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

/// Check a complete configuration, including any command-line overrides.
///
/// Colors must parse, the gene and reference must not be blank, and every
/// size, page size and graph setting must be usable by the layouts.
pub(crate) fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    Palette::from_style(config.style()).map_err(|err| ConfigError::Validation(err.to_string()))?;

    let source = config.source();
    if source.gene().trim().is_empty() {
        return Err(ConfigError::Validation("source.gene must not be empty".to_string()));
    }
    if source.page_size() == 0 {
        return Err(ConfigError::Validation(
            "source.page_size must be positive".to_string(),
        ));
    }

    let report = config.report();
    if report.reference().trim().is_empty() {
        return Err(ConfigError::Validation(
            "report.reference must not be empty".to_string(),
        ));
    }
    if report.canvas_size() == 0 || report.ring_spacing() == 0 {
        return Err(ConfigError::Validation(
            "report.canvas_size and report.ring_spacing must be positive".to_string(),
        ));
    }

    let graph = config.graph();
    if graph.width() == 0 || graph.height() == 0 {
        return Err(ConfigError::Validation(
            "graph.width and graph.height must be positive".to_string(),
        ));
    }
    let damping = graph.damping();
    if damping.is_nan() || damping <= 0.0 || damping > 1.0 {
        return Err(ConfigError::Validation(
            "graph.damping must be in (0, 1]".to_string(),
        ));
    }
    let padding = graph.padding();
    if padding.is_nan() || padding < 0.0 {
        return Err(ConfigError::Validation(
            "graph.padding must not be negative".to_string(),
        ));
    }
    if !graph.spring_constant().is_finite() || !graph.repulsion().is_finite() {
        return Err(ConfigError::Validation(
            "graph.spring_constant and graph.repulsion must be finite".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.source().gene(), "HBB");
        assert_eq!(config.report().reference(), "Human");
        assert_eq!(config.graph().width(), 600);
    }

    #[test]
    fn test_partial_sections() {
        let config = parse_config(
            r##"
            [source]
            gene = "MB"
            resolve_images = false

            [report]
            reference = "Mouse"
            ring_spacing = 80

            [style]
            mismatch_color = "#ff8800"

            [paths]
            data_dir = "/var/lib/speciesring"
            "##,
        )
        .unwrap();

        assert_eq!(config.source().gene(), "MB");
        assert!(!config.source().resolve_images());
        assert_eq!(config.source().page_size(), 500);
        assert_eq!(config.report().reference(), "Mouse");
        assert_eq!(config.report().ring_spacing(), 80);
        assert_eq!(config.report().canvas_size(), 800);
        assert_eq!(config.paths().data_dir(), Path::new("/var/lib/speciesring"));
    }

    #[test]
    fn test_syntax_error() {
        let err = parse_config("[source\ngene = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_color_rejected() {
        let err = parse_config("[style]\nnode_color = \"not-a-color\"").unwrap_err();
        match err {
            ConfigError::Validation(message) => assert!(message.contains("not-a-color")),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_ring_spacing_rejected() {
        let err = parse_config("[report]\nring_spacing = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = parse_config("[source]\npage_size = 0").unwrap_err();
        match err {
            ConfigError::Validation(message) => assert!(message.contains("page_size")),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_reference_rejected() {
        let err = parse_config("[report]\nreference = \"  \"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_graph_forces() {
        let config = parse_config(
            "[graph]\nspring_constant = 0.1\nrepulsion = 500.0\ndamping = 0.5\npadding = 12.5\n",
        )
        .unwrap();
        assert_eq!(config.graph().spring_constant(), 0.1);
        assert_eq!(config.graph().repulsion(), 500.0);
        assert_eq!(config.graph().damping(), 0.5);
        assert_eq!(config.graph().padding(), 12.5);
        assert_eq!(config.graph().width(), 600);
    }

    #[test]
    fn test_bad_damping_rejected() {
        for value in ["0.0", "1.5"] {
            let err = parse_config(&format!("[graph]\ndamping = {value}")).unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)), "damping {value}");
        }
    }

    #[test]
    fn test_negative_padding_rejected() {
        let err = parse_config("[graph]\npadding = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some("/definitely/not/here/config.toml")).unwrap_err();
        assert!(matches!(err, SpeciesRingError::Config(_)));
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[graph]\niterations = 10\nseed = 7\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.graph().iterations(), 10);
        assert_eq!(config.graph().seed(), 7);
    }
}
