use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use gcool_core::errors::ErrorInfo;
use gcool_core::VolError;
use serde::{Deserialize, Serialize};

/// Diagnostics for one ratio phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseRecord {
    /// Zero-based phase index.
    pub phase: usize,
    /// Temperature sampled at.
    pub a_from: f64,
    /// Next temperature.
    pub a_to: f64,
    /// Ratio estimate.
    pub ratio: f64,
    /// Samples drawn.
    pub samples: usize,
    /// Relative window spread at termination.
    pub window_spread: f64,
}

/// Collects phase records and exports them as CSV.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AnnealingTrace {
    records: Vec<PhaseRecord>,
}

impl AnnealingTrace {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn push(&mut self, record: PhaseRecord) {
        self.records.push(record);
    }

    /// Recorded phases in order.
    pub fn records(&self) -> &[PhaseRecord] {
        &self.records
    }

    /// Consumes the trace.
    pub fn into_records(self) -> Vec<PhaseRecord> {
        self.records
    }

    /// Sum of the per-phase sample counts.
    pub fn total_samples(&self) -> usize {
        self.records.iter().map(|record| record.samples).sum()
    }

    /// Writes `phase,a_from,a_to,ratio,samples,window_spread` rows.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), VolError> {
        let path = path.as_ref();
        let io_error = |err: std::io::Error| {
            VolError::Serde(
                ErrorInfo::new("trace-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        };
        let mut file = BufWriter::new(File::create(path).map_err(io_error)?);
        writeln!(file, "phase,a_from,a_to,ratio,samples,window_spread").map_err(io_error)?;
        for record in &self.records {
            writeln!(
                file,
                "{},{},{},{},{},{}",
                record.phase,
                record.a_from,
                record.a_to,
                record.ratio,
                record.samples,
                record.window_spread
            )
            .map_err(io_error)?;
        }
        file.flush().map_err(io_error)
    }
}

impl From<Vec<PhaseRecord>> for AnnealingTrace {
    fn from(records: Vec<PhaseRecord>) -> Self {
        Self { records }
    }
}
