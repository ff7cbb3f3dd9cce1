//! Shared fixtures for fundtrace tests.

use std::path::Path;

use fundtrace_common::{NetworkTemplate, SynthesisConfig, TemplateSpec};
use tempfile::TempDir;

pub use pretty_assertions::assert_eq;

/// Seed used by the reference scenario.
pub const REFERENCE_SEED: u64 = 42;

/// `{Cancer, CAR-T, 2015–2019, 2024, 1 chain}`.
pub fn cancer_spec() -> TemplateSpec {
    TemplateSpec::new(
        "Cancer",
        "CAR-T",
        &["immunotherapy", "T-cell", "cancer", "oncology"],
        2024,
        1,
    )
}

pub fn alzheimers_spec() -> TemplateSpec {
    TemplateSpec::new(
        "Alzheimer's Disease",
        "Aducanumab Plus",
        &["alzheimer", "amyloid", "neurodegenerative"],
        2023,
        2,
    )
}

pub fn diabetes_spec() -> TemplateSpec {
    TemplateSpec::new("Diabetes", "Smart Insulin Patch", &["diabetes", "insulin", "glucose"], 2025, 3)
}

pub fn three_network_catalog() -> Vec<TemplateSpec> {
    vec![cancer_spec(), alzheimers_spec(), diabetes_spec()]
}

pub fn template(spec: TemplateSpec) -> NetworkTemplate {
    NetworkTemplate::try_from(spec).expect("fixture template must be valid")
}

pub fn cancer_template() -> NetworkTemplate {
    template(cancer_spec())
}

pub fn seeded_config(seed: u64) -> SynthesisConfig {
    SynthesisConfig::seeded(seed)
}

pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Write `specs` as a JSON catalog into `dir` and return its path.
pub fn write_json_catalog(dir: &Path, specs: &[TemplateSpec]) -> std::path::PathBuf {
    let path = dir.join("catalog.json");
    let body = serde_json::to_string_pretty(specs).expect("catalog serializes");
    std::fs::write(&path, body).expect("failed to write catalog");
    path
}
