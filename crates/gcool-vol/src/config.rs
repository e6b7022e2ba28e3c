use gcool_core::errors::ErrorInfo;
use gcool_core::{RngHandle, VolError};
use serde::{Deserialize, Serialize};

/// YAML-configurable parameters governing a volume estimate.
///
/// Dimension-dependent defaults (`ratio`, `N`, `W`, rounding sample count)
/// stay unset here and are filled in by [`VolumeConfig::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Round the region with a fitted ellipsoid before sampling.
    #[serde(default)]
    pub round: bool,
    /// Stop after the schedule is computed and report only the phase count.
    #[serde(default, alias = "rand_only")]
    pub steps_only: bool,
    /// Use the ball walk instead of coordinate-direction hit-and-run.
    #[serde(default)]
    pub ball_walk: bool,
    /// Internal walk moves per sample.
    #[serde(default = "default_walk_steps")]
    pub walk_steps: usize,
    /// Target relative error of the estimate.
    #[serde(default = "default_error")]
    pub error: f64,
    /// Share of the error reserved for schedule calibration.
    #[serde(default = "default_frac")]
    pub frac: f64,
    /// Cooling ratio proposed by the schedule generator.
    #[serde(default)]
    pub ratio: Option<f64>,
    /// Variance bound accepted between consecutive temperatures.
    #[serde(rename = "C", default = "default_c")]
    pub c: f64,
    /// Samples drawn by the schedule generator per temperature.
    #[serde(rename = "N", default)]
    pub n: Option<usize>,
    /// Width of the sliding convergence window.
    #[serde(rename = "W", default)]
    pub w: Option<usize>,
    /// Ball-walk step radius; derived from the inscribed radius when unset.
    #[serde(default)]
    pub delta: Option<f64>,
    /// Samples every phase draws before convergence may be declared.
    #[serde(default)]
    pub min_phase_samples: usize,
    /// Rounding pass settings.
    #[serde(default)]
    pub rounding: RoundingConfig,
    /// Reserved for multi-chain sampling; validated but unused.
    #[serde(default = "default_threads")]
    pub n_threads: usize,
    /// Master seed and substream policy.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
}

fn default_walk_steps() -> usize {
    1
}

fn default_error() -> f64 {
    0.1
}

fn default_frac() -> f64 {
    0.1
}

fn default_c() -> f64 {
    2.0
}

fn default_threads() -> usize {
    1
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            round: false,
            steps_only: false,
            ball_walk: false,
            walk_steps: default_walk_steps(),
            error: default_error(),
            frac: default_frac(),
            ratio: None,
            c: default_c(),
            n: None,
            w: None,
            delta: None,
            min_phase_samples: 0,
            rounding: RoundingConfig::default(),
            n_threads: default_threads(),
            seed_policy: SeedPolicy::default(),
        }
    }
}

/// Minimum-volume-ellipsoid rounding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundingConfig {
    /// Uniform samples fed to the ellipsoid fit; defaults to `max(100, 50n)`.
    #[serde(default)]
    pub samples: Option<usize>,
    /// Hit-and-run moves between rounding samples.
    #[serde(default = "default_rounding_walk_steps")]
    pub walk_steps: usize,
    /// Upper bound on repeated rounding passes.
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,
    /// Another pass runs while the fitted ellipsoid's axis ratio exceeds this.
    #[serde(default = "default_max_axis_ratio")]
    pub max_axis_ratio: f64,
}

fn default_rounding_walk_steps() -> usize {
    10
}

fn default_max_passes() -> usize {
    2
}

fn default_max_axis_ratio() -> f64 {
    6.0
}

impl Default for RoundingConfig {
    fn default() -> Self {
        Self {
            samples: None,
            walk_steps: default_rounding_walk_steps(),
            max_passes: default_max_passes(),
            max_axis_ratio: default_max_axis_ratio(),
        }
    }
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed for the run.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded in manifests.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x05EE_D5EE_DD15_5EED_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

impl SeedPolicy {
    /// Generator for a single estimate.
    pub fn rng(&self) -> RngHandle {
        RngHandle::from_seed(self.master_seed)
    }

    /// Independent generator for the `trial`-th repeated estimate.
    pub fn trial_rng(&self, trial: usize) -> RngHandle {
        RngHandle::substream(self.master_seed, trial as u64)
    }
}

/// Validated parameter bundle for one estimate in a fixed dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedParams {
    /// Ambient dimension.
    pub dimension: usize,
    /// Whether to round first.
    pub round: bool,
    /// Whether to stop after the schedule.
    pub steps_only: bool,
    /// Whether to use the ball walk.
    pub ball_walk: bool,
    /// Internal moves per sample.
    pub walk_steps: usize,
    /// Target relative error.
    pub error: f64,
    /// Schedule share of the error.
    pub frac: f64,
    /// Cooling ratio.
    pub ratio: f64,
    /// Variance bound.
    pub c: f64,
    /// Schedule samples per temperature.
    pub n: usize,
    /// Window width.
    pub w: usize,
    /// Configured ball-walk radius.
    pub delta: Option<f64>,
    /// Per-phase sample floor.
    pub min_phase_samples: usize,
    /// Rounding samples.
    pub rounding_samples: usize,
    /// Rounding walk length.
    pub rounding_walk_steps: usize,
    /// Rounding pass limit.
    pub rounding_max_passes: usize,
    /// Rounding axis-ratio threshold.
    pub rounding_max_axis_ratio: f64,
    /// Reserved thread count.
    pub n_threads: usize,
}

impl VolumeConfig {
    /// Parses a YAML document; absent keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, VolError> {
        serde_yaml::from_str(yaml).map_err(|err| {
            VolError::Serde(ErrorInfo::new("config-parse", err.to_string()))
        })
    }

    /// Serialises the configuration as YAML.
    pub fn to_yaml_string(&self) -> Result<String, VolError> {
        serde_yaml::to_string(self).map_err(|err| {
            VolError::Serde(ErrorInfo::new("config-serialize", err.to_string()))
        })
    }

    /// Enables or disables rounding.
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Enables or disables the steps-only exit.
    pub fn with_steps_only(mut self, steps_only: bool) -> Self {
        self.steps_only = steps_only;
        self
    }

    /// Selects the ball walk.
    pub fn with_ball_walk(mut self, ball_walk: bool) -> Self {
        self.ball_walk = ball_walk;
        self
    }

    /// Sets the internal walk length.
    pub fn with_walk_steps(mut self, walk_steps: usize) -> Self {
        self.walk_steps = walk_steps;
        self
    }

    /// Sets the target relative error.
    pub fn with_error(mut self, error: f64) -> Self {
        self.error = error;
        self
    }

    /// Sets the schedule share of the error.
    pub fn with_frac(mut self, frac: f64) -> Self {
        self.frac = frac;
        self
    }

    /// Sets the cooling ratio.
    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = Some(ratio);
        self
    }

    /// Sets the variance bound `C`.
    pub fn with_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Sets the schedule sample budget `N`.
    pub fn with_n(mut self, n: usize) -> Self {
        self.n = Some(n);
        self
    }

    /// Sets the window width `W`.
    pub fn with_window(mut self, w: usize) -> Self {
        self.w = Some(w);
        self
    }

    /// Fixes the ball-walk step radius.
    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = Some(delta);
        self
    }

    /// Sets the per-phase sample floor.
    pub fn with_min_phase_samples(mut self, samples: usize) -> Self {
        self.min_phase_samples = samples;
        self
    }

    /// Sets the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed_policy.master_seed = seed;
        self
    }

    /// Validates every value and fills in the dimension-dependent defaults.
    pub fn resolve(&self, dimension: usize) -> Result<ResolvedParams, VolError> {
        if dimension == 0 {
            return Err(VolError::config("dimension", "dimension must be at least 1"));
        }
        open_unit("error", self.error)?;
        open_unit("frac", self.frac)?;
        let ratio = match self.ratio {
            Some(ratio) => ratio,
            None => 1.0 - 1.0 / dimension.max(2) as f64,
        };
        open_unit("ratio", ratio)?;
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(VolError::config("C", "C must be positive and finite"));
        }
        let n = self
            .n
            .unwrap_or_else(|| (500.0 * self.c).floor() as usize + dimension * dimension / 2);
        at_least_one("N", n)?;
        let w = self.w.unwrap_or(4 * dimension * dimension + 500);
        at_least_one("W", w)?;
        at_least_one("walk_steps", self.walk_steps)?;
        if let Some(delta) = self.delta {
            if !(delta.is_finite() && delta > 0.0) {
                return Err(VolError::config("delta", "delta must be positive and finite"));
            }
        }
        at_least_one("n_threads", self.n_threads)?;
        let rounding_samples = self.rounding.samples.unwrap_or((50 * dimension).max(100));
        at_least_one("rounding.samples", rounding_samples)?;
        at_least_one("rounding.walk_steps", self.rounding.walk_steps)?;
        at_least_one("rounding.max_passes", self.rounding.max_passes)?;
        let axis_ratio = self.rounding.max_axis_ratio;
        if axis_ratio.is_nan() || axis_ratio < 1.0 {
            return Err(VolError::config(
                "rounding.max_axis_ratio",
                "axis ratio threshold must be at least 1",
            ));
        }
        Ok(ResolvedParams {
            dimension,
            round: self.round,
            steps_only: self.steps_only,
            ball_walk: self.ball_walk,
            walk_steps: self.walk_steps,
            error: self.error,
            frac: self.frac,
            ratio,
            c: self.c,
            n,
            w,
            delta: self.delta,
            min_phase_samples: self.min_phase_samples,
            rounding_samples,
            rounding_walk_steps: self.rounding.walk_steps,
            rounding_max_passes: self.rounding.max_passes,
            rounding_max_axis_ratio: self.rounding.max_axis_ratio,
            n_threads: self.n_threads,
        })
    }
}

fn open_unit(field: &str, value: f64) -> Result<(), VolError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(VolError::InvalidConfiguration(
            ErrorInfo::new("config-error", format!("{field} must lie in (0, 1)"))
                .with_context("field", field)
                .with_context("value", value.to_string()),
        ))
    }
}

fn at_least_one(field: &str, value: usize) -> Result<(), VolError> {
    if value >= 1 {
        Ok(())
    } else {
        Err(VolError::config(field, format!("{field} must be at least 1")))
    }
}
