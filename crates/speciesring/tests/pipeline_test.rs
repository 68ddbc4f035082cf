//! End-to-end pipeline runs against an in-memory sequence source.

use std::{cell::Cell, fs};

use speciesring::{
    SequenceSource,
    config::AppConfig,
    images::NoImages,
    pipeline::{COMPARISON_FILE, Pipeline},
    record::{SequenceRecord, Species},
    store,
};
use speciesring_source::SourceError;

struct StubSource {
    records: Vec<SequenceRecord>,
    calls: Cell<usize>,
}

impl StubSource {
    fn new() -> Self {
        Self {
            records: vec![
                SequenceRecord::new(Species::new("Human", "Homo sapiens", 9606), "VHLTPEEK"),
                SequenceRecord::new(Species::new("Mouse", "Mus musculus", 10090), "VHLTDAEK"),
                SequenceRecord::new(Species::new("Gorilla", "Gorilla gorilla", 9595), "VHLTPEEK"),
                SequenceRecord::new(Species::new("Chicken", "Gallus gallus", 9031), "VHWTAEEK"),
            ],
            calls: Cell::new(0),
        }
    }
}

impl SequenceSource for StubSource {
    fn fetch(&self, gene: &str) -> Result<Vec<SequenceRecord>, SourceError> {
        assert_eq!(gene, "HBB");
        self.calls.set(self.calls.get() + 1);
        Ok(self.records.clone())
    }
}

fn config_in(dir: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.paths_mut().set_data_dir(dir);
    config
}

#[test]
fn test_pipeline_writes_every_artefact() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pipeline = Pipeline::new(config_in(temp_dir.path()), StubSource::new(), NoImages);

    let report = pipeline.run(false).expect("Pipeline run failed");

    assert!(report.fetched());
    assert_eq!(report.record_count(), 4);
    for path in report.artefacts() {
        assert!(path.exists(), "missing artefact {}", path.display());
        assert!(path.starts_with(temp_dir.path().join("processed")));
    }
    assert!(report.comparison().ends_with(COMPARISON_FILE));

    let comparison = fs::read_to_string(report.comparison()).expect("Failed to read comparison");
    for name in ["Homo sapiens", "Mus musculus", "Gorilla gorilla", "Gallus gallus"] {
        assert!(comparison.contains(name), "comparison CSV is missing {name}");
    }

    let radar = fs::read_to_string(report.radar_report()).expect("Failed to read radar report");
    assert!(radar.contains("<svg"));
    assert!(radar.contains("Chicken"));

    let graph = fs::read_to_string(report.graph_report()).expect("Failed to read graph report");
    assert!(graph.contains("<svg"));
    assert!(graph.contains("Gorilla"));
}

#[test]
fn test_pipeline_comparison_rows() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pipeline = Pipeline::new(config_in(temp_dir.path()), StubSource::new(), NoImages);

    let report = pipeline.run(false).expect("Pipeline run failed");
    let rows = store::read_report_rows(report.comparison()).expect("Failed to read rows");

    let distances: Vec<(&str, usize)> = rows
        .iter()
        .map(|row| (row.name(), row.distance()))
        .collect();
    assert_eq!(
        distances,
        vec![("Human", 0), ("Mouse", 2), ("Gorilla", 0), ("Chicken", 2)]
    );
    assert_eq!(rows[1].different(), "00001100");
    assert_eq!(rows[1].image_url(), None);
}

#[test]
fn test_pipeline_reuses_saved_records() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let source = StubSource::new();
    let pipeline = Pipeline::new(config_in(temp_dir.path()), &source, NoImages);

    let first = pipeline.run(false).expect("First run failed");
    let second = pipeline.run(false).expect("Second run failed");

    assert!(first.fetched());
    assert!(!second.fetched());
    assert_eq!(source.calls.get(), 1);
    assert_eq!(second.record_count(), 4);
}

#[test]
fn test_pipeline_refresh_fetches_again() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let source = StubSource::new();
    let pipeline = Pipeline::new(config_in(temp_dir.path()), &source, NoImages);

    pipeline.run(false).expect("First run failed");
    let refreshed = pipeline.run(true).expect("Refresh run failed");

    assert!(refreshed.fetched());
    assert_eq!(source.calls.get(), 2);
}

#[test]
fn test_pipeline_missing_reference_fails() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = config_in(temp_dir.path());
    config.report_mut().set_reference("Platypus");

    let pipeline = Pipeline::new(config, StubSource::new(), NoImages);
    let result = pipeline.run(false);

    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Platypus")
    );
    // Records fetched before the failure stay on disk.
    assert!(temp_dir.path().join("processed/all_sequences.csv").exists());
}
