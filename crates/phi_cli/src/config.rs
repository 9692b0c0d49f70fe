//! Pipeline/report configuration consumed by external batch drivers.
//!
//! The CLI only validates and summarizes this file; the report renderer
//! and the `.eo` translator live outside this workspace.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::CliError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub report: ReportConfig,
    #[serde(rename = "test-sets")]
    pub test_sets: Vec<TestSetConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub html: Option<PathBuf>,
    #[serde(default)]
    pub json: Option<PathBuf>,
    #[serde(default)]
    pub markdown: Option<PathBuf>,
    /// Expected relative change per metric, e.g. `dispatches: -0.2`.
    #[serde(rename = "expected-metric-change", default)]
    pub expected_metric_change: BTreeMap<String, f64>,
    #[serde(rename = "expected-improved-programs-percentage", default)]
    pub expected_improved_programs_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSetConfig {
    /// The object-language source this set starts from.
    pub eo: PathBuf,
    /// Intermediate φ-syntax artifact.
    pub phi: PathBuf,
    #[serde(rename = "phi-normalized")]
    pub phi_normalized: PathBuf,
    /// Dotted name scoping metrics before normalization.
    #[serde(rename = "bindings-path-before")]
    pub bindings_path_before: String,
    #[serde(rename = "bindings-path-after")]
    pub bindings_path_after: String,
    #[serde(default = "enabled_by_default")]
    pub enable: bool,
    /// Test objects skipped inside this set.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn enabled_by_default() -> bool {
    true
}

impl PipelineConfig {
    pub fn from_yaml(src: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(src)
    }

    pub fn load(path: &Path) -> Result<Self, CliError> {
        let src = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        Self::from_yaml(&src)
            .map_err(|e| CliError::Parse(format!("{}: {}", path.display(), e)))
    }

    pub fn enabled_test_sets(&self) -> impl Iterator<Item = &TestSetConfig> {
        self.test_sets.iter().filter(|ts| ts.enable)
    }
}
