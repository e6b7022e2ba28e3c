use std::fs;
use std::path::{Path, PathBuf};

use gcool_core::errors::ErrorInfo;
use gcool_core::VolError;
use serde::{Deserialize, Serialize};

use crate::config::VolumeConfig;
use crate::driver::VolumeEstimate;

/// Structured manifest describing a completed estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeManifest {
    /// Configuration used for the run.
    pub config: VolumeConfig,
    /// Master seed of the generator.
    pub master_seed: u64,
    /// Optional seed label captured from the configuration.
    pub seed_label: Option<String>,
    /// Canonical hash of the input region.
    pub region_hash: String,
    /// Temperature schedule.
    pub schedule: Vec<f64>,
    /// Volume estimate.
    pub volume: f64,
    /// Ratio-phase samples plus schedule budget.
    pub total_steps: usize,
    /// Ratio-phase samples only.
    pub phase_steps: usize,
    /// Determinant correction from rounding.
    pub rounding_factor: f64,
    /// Phase trace written next to the manifest, if any.
    pub trace_file: Option<PathBuf>,
}

impl VolumeManifest {
    /// Captures a finished estimate.
    pub fn from_estimate(
        config: &VolumeConfig,
        region_hash: impl Into<String>,
        estimate: &VolumeEstimate,
    ) -> Self {
        Self {
            config: config.clone(),
            master_seed: config.seed_policy.master_seed,
            seed_label: config.seed_policy.label.clone(),
            region_hash: region_hash.into(),
            schedule: estimate.schedule.clone(),
            volume: estimate.volume,
            total_steps: estimate.total_steps,
            phase_steps: estimate.phase_steps,
            rounding_factor: estimate.rounding_factor,
            trace_file: None,
        }
    }

    /// Records the trace file path relative to the manifest.
    pub fn with_trace_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.trace_file = Some(path.into());
        self
    }

    /// Writes the manifest to a JSON file.
    pub fn write(&self, path: &Path) -> Result<(), VolError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                VolError::Serde(
                    ErrorInfo::new("manifest-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            VolError::Serde(
                ErrorInfo::new("manifest-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| {
            VolError::Serde(
                ErrorInfo::new("manifest-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, VolError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            VolError::Serde(
                ErrorInfo::new("manifest-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            VolError::Serde(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}
