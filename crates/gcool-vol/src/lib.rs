#![deny(missing_docs)]

//! Gaussian-cooling volume estimation for convex regions.
//!
//! The driver walks a decreasing schedule of Gaussian temperatures and
//! multiplies importance-sampled ratios of consecutive Gaussian integrals,
//! each phase stopping on a sliding-window convergence test.

/// YAML configuration schema and defaults.
pub mod config;
/// Annealing driver and its entry points.
pub mod driver;
/// Run manifest serialization helpers.
pub mod manifest;
/// Per-phase importance-sampling ratio estimator.
pub mod ratio;
/// Minimum-volume-ellipsoid rounding.
pub mod rounding;
/// Temperature schedule generation and validation.
pub mod schedule;
/// Phase records and CSV export.
pub mod trace;
/// Sliding-window extrema tracker.
pub mod window;

pub use config::{ResolvedParams, RoundingConfig, SeedPolicy, VolumeConfig};
pub use driver::{
    estimate_volume, estimate_volume_with, Collaborators, DefaultCollaborators, VolumeEstimate,
    VolumeOutcome,
};
pub use manifest::VolumeManifest;
pub use ratio::{estimate_ratio, PhaseOutcome, PhaseSpec};
pub use rounding::{min_volume_ellipsoid, Ellipsoid, MinEllipsoidRounding, RoundingTransform};
pub use schedule::{
    first_gaussian, AnnealingSchedule, GaussianAnnealing, ScheduleGenerator, ScheduleRequest,
};
pub use trace::{AnnealingTrace, PhaseRecord};
pub use window::WindowedExtrema;
