//! CLI logic for the SpeciesRing report tool.
//!
//! This module contains the core CLI logic: loading configuration, applying
//! command-line overrides and running the report pipeline.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use log::info;

use speciesring::{SpeciesRingError, config::AppConfig, pipeline::Pipeline};

/// Run the SpeciesRing CLI application
///
/// Loads the configuration, applies the command-line overrides, validates
/// the result and writes every report artefact into the processed data
/// directory.
///
/// # Errors
///
/// Returns `SpeciesRingError` for:
/// - Configuration loading errors, or overrides that fail validation
/// - Network and cache errors while fetching sequences
/// - A reference species missing from the records
/// - File I/O, layout and rendering errors
pub fn run(args: &Args) -> Result<(), SpeciesRingError> {
    let app_config = configure(args)?;

    info!(
        gene = app_config.source().gene(),
        reference = app_config.report().reference(),
        data_dir = app_config.paths().data_dir().display().to_string();
        "Generating species reports"
    );

    let pipeline = Pipeline::networked(app_config)?;
    let report = pipeline.run(args.refresh)?;

    info!(
        records = report.record_count(),
        radar_report = report.radar_report().display().to_string(),
        graph_report = report.graph_report().display().to_string();
        "Reports written successfully"
    );

    Ok(())
}

/// Load the configuration and validate it once the overrides are applied.
fn configure(args: &Args) -> Result<AppConfig, SpeciesRingError> {
    let mut app_config = config::load_config(args.config.as_ref())?;
    apply_overrides(&mut app_config, args);
    config::validate(&app_config)?;
    Ok(app_config)
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(gene) = &args.gene {
        config.source_mut().set_gene(gene);
    }
    if args.no_images {
        config.source_mut().set_resolve_images(false);
    }
    if let Some(reference) = &args.reference {
        config.report_mut().set_reference(reference);
    }
    if let Some(data_dir) = &args.data_dir {
        config.paths_mut().set_data_dir(data_dir);
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use clap::Parser;

    use super::*;

    fn args_with_config(path: &Path, extra: &[&str]) -> Args {
        let mut argv = vec!["speciesring", "--config", path.to_str().unwrap()];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    fn empty_config() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "").unwrap();
        (dir, path)
    }

    #[test]
    fn test_overrides_applied() {
        let (_dir, path) = empty_config();
        let args = args_with_config(
            &path,
            &["--gene", "MB", "--reference", "Mouse", "--data-dir", "out", "--no-images"],
        );

        let config = configure(&args).unwrap();
        assert_eq!(config.source().gene(), "MB");
        assert!(!config.source().resolve_images());
        assert_eq!(config.report().reference(), "Mouse");
        assert_eq!(config.paths().data_dir(), Path::new("out"));
    }

    #[test]
    fn test_blank_gene_override_rejected() {
        let (_dir, path) = empty_config();
        let args = args_with_config(&path, &["--gene", ""]);

        let err = configure(&args).unwrap_err();
        assert!(matches!(err, SpeciesRingError::Config(_)));
        assert!(err.to_string().contains("source.gene"));
    }

    #[test]
    fn test_blank_reference_override_rejected() {
        let (_dir, path) = empty_config();
        let args = args_with_config(&path, &["--reference", " "]);

        let err = configure(&args).unwrap_err();
        assert!(err.to_string().contains("report.reference"));
    }
}
