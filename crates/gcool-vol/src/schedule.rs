use std::f64::consts::PI;

use gcool_core::errors::ErrorInfo;
use gcool_core::{weight_ratio, Region, RngHandle, VolError};
use gcool_walk::{AnyWalk, RandomWalk, WalkState};
use serde::{Deserialize, Serialize};

use crate::config::ResolvedParams;

const MAX_UPPER_GROWTH: usize = 10_000;
const BISECTION_TOL: f64 = 1e-7;
const NEXT_GAUSSIAN_TOL: f64 = 1e-5;
const MAX_DOUBLINGS: usize = 64;
const SCHEDULE_TOL: f64 = 0.001;
const MAX_SCHEDULE_LEN: usize = 100_000;

/// Parameters handed to a schedule generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleRequest {
    /// Inscribed-ball radius after centring.
    pub radius: f64,
    /// Cooling ratio.
    pub ratio: f64,
    /// Variance bound between consecutive temperatures.
    pub c: f64,
    /// Share of the error reserved for the schedule.
    pub frac: f64,
    /// Samples per temperature.
    pub n: usize,
    /// Total error budget.
    pub error: f64,
    /// Internal walk moves per sample.
    pub walk_steps: usize,
}

impl ScheduleRequest {
    /// Builds the request from resolved parameters and the inscribed radius.
    pub fn from_params(params: &ResolvedParams, radius: f64) -> Self {
        Self {
            radius,
            ratio: params.ratio,
            c: params.c,
            frac: params.frac,
            n: params.n,
            error: params.error,
            walk_steps: params.walk_steps,
        }
    }
}

/// Produces a decreasing sequence of temperatures for a centred region.
pub trait ScheduleGenerator {
    /// Computes the schedule; validation happens in [`AnnealingSchedule::new`].
    fn compute<R: Region>(
        &mut self,
        region: &R,
        request: &ScheduleRequest,
        rng: &mut RngHandle,
    ) -> Result<Vec<f64>, VolError>;
}

/// Validated temperature schedule `a_0 > a_1 > … > a_mm ≥ 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct AnnealingSchedule(Vec<f64>);

impl AnnealingSchedule {
    /// Validates a raw schedule.
    pub fn new(values: Vec<f64>) -> Result<Self, VolError> {
        if values.len() < 2 {
            return Err(VolError::DegenerateRegion(
                ErrorInfo::new("short-schedule", "schedule needs at least two temperatures")
                    .with_context("length", values.len().to_string()),
            ));
        }
        if let Some(position) = values.iter().position(|a| !a.is_finite()) {
            return Err(VolError::DegenerateRegion(
                ErrorInfo::new("non-finite-schedule", "schedule contains a non-finite value")
                    .with_context("position", position.to_string()),
            ));
        }
        if values[0] <= 0.0 {
            return Err(VolError::DegenerateRegion(
                ErrorInfo::new("non-positive-start", "first temperature must be positive")
                    .with_context("a0", values[0].to_string()),
            ));
        }
        if let Some(position) = values.windows(2).position(|pair| pair[1] >= pair[0]) {
            return Err(VolError::DegenerateRegion(
                ErrorInfo::new("non-decreasing-schedule", "temperatures must strictly decrease")
                    .with_context("position", (position + 1).to_string()),
            ));
        }
        let last = values[values.len() - 1];
        if last < 0.0 {
            return Err(VolError::DegenerateRegion(
                ErrorInfo::new("negative-temperature", "last temperature must be non-negative")
                    .with_context("last", last.to_string()),
            ));
        }
        Ok(Self(values))
    }

    /// Temperatures in decreasing order.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// First, sharpest temperature.
    pub fn first(&self) -> f64 {
        self.0[0]
    }

    /// Number of ratio phases, `len - 1`.
    pub fn phases(&self) -> usize {
        self.0.len() - 1
    }

    /// Consecutive `(a_i, a_{i+1})` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.0.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

impl TryFrom<Vec<f64>> for AnnealingSchedule {
    type Error = VolError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<AnnealingSchedule> for Vec<f64> {
    fn from(schedule: AnnealingSchedule) -> Self {
        schedule.0
    }
}

/// Adaptive Gaussian cooling schedule.
///
/// Owns its sampler, so calibration draws never touch the chain used for
/// the ratio phases.
#[derive(Debug, Clone)]
pub struct GaussianAnnealing {
    walk: AnyWalk,
}

impl GaussianAnnealing {
    /// Schedule generator sampling with `walk`.
    pub fn new(walk: AnyWalk) -> Self {
        Self { walk }
    }

    /// Schedule generator using the walk variant selected by the parameters.
    pub fn from_params(params: &ResolvedParams) -> Self {
        Self::new(AnyWalk::from_flags(params.ball_walk, params.delta))
    }

    fn next_gaussian<R: Region>(
        &mut self,
        region: &R,
        state: &mut WalkState,
        a: f64,
        request: &ScheduleRequest,
        rng: &mut RngHandle,
    ) -> Result<f64, VolError> {
        let mut points = Vec::with_capacity(request.n);
        for _ in 0..request.n {
            self.walk
                .next_point(region, state, request.walk_steps, a, rng)?;
            points.push(state.point().to_vec());
        }

        let mut k = 1.0;
        let mut last_mean = 0.1;
        let mut weights = vec![0.0; points.len()];
        for _ in 0..MAX_DOUBLINGS {
            let candidate = a * request.ratio.powf(k);
            for (weight, point) in weights.iter_mut().zip(points.iter()) {
                *weight = weight_ratio(point, candidate, a);
            }
            let (mean, variance) = mean_variance(&weights);
            if variance / (mean * mean) >= request.c || mean / last_mean < 1.0 + NEXT_GAUSSIAN_TOL {
                if k != 1.0 {
                    k /= 2.0;
                }
                return Ok(a * request.ratio.powf(k));
            }
            k *= 2.0;
            last_mean = mean;
        }
        Ok(a * request.ratio.powf(k))
    }
}

impl ScheduleGenerator for GaussianAnnealing {
    fn compute<R: Region>(
        &mut self,
        region: &R,
        request: &ScheduleRequest,
        rng: &mut RngHandle,
    ) -> Result<Vec<f64>, VolError> {
        let dimension = region.dimension();
        self.walk.calibrate(request.radius, dimension);
        let a0 = first_gaussian(&region.facet_distances(), request.frac * request.error)?;
        let mut values = vec![a0];

        let total_steps = (150.0 / ((1.0 - request.frac) * request.error)).floor() as usize + 1;
        let mut state = WalkState::at_origin(region);
        self.walk
            .initialize(region, &mut state, request.walk_steps, a0, rng)?;

        loop {
            let current = values[values.len() - 1];
            let next = self.next_gaussian(region, &mut state, current, request, rng)?;

            let mut sum = 0.0;
            for _ in 0..total_steps {
                self.walk
                    .next_point(region, &mut state, request.walk_steps, current, rng)?;
                sum += weight_ratio(state.point(), next, current);
            }
            let mean = sum / total_steps as f64;

            if next > 0.0 && mean > 1.0 + SCHEDULE_TOL {
                values.push(next);
            } else if next <= 0.0 {
                values.push(0.0);
                break;
            } else {
                let last = values.len() - 1;
                values[last] = 0.0;
                break;
            }
            if values.len() >= MAX_SCHEDULE_LEN {
                return Err(VolError::Collaborator(
                    ErrorInfo::new("schedule-limit", "annealing schedule did not reach zero")
                        .with_context("length", values.len().to_string()),
                ));
            }
        }
        Ok(values)
    }
}

/// First temperature, whose Gaussian mass outside the region is about `budget`.
///
/// Grows an upper bound by powers of ten, then bisects on
/// `Σ exp(-a d²) / (2d sqrt(πa)) ≤ budget` over the facet distances `d`.
pub fn first_gaussian(distances: &[f64], budget: f64) -> Result<f64, VolError> {
    if let Some(position) = distances.iter().position(|d| !(*d > 0.0)) {
        return Err(VolError::DegenerateRegion(
            ErrorInfo::new("origin-outside", "origin must lie strictly inside every facet")
                .with_context("facet", position.to_string()),
        ));
    }
    let tail = |a: f64| -> f64 {
        distances
            .iter()
            .map(|d| (-a * d * d).exp() / (2.0 * d * (PI * a).sqrt()))
            .sum()
    };

    let mut upper = 1.0;
    let mut bounded = false;
    for _ in 0..MAX_UPPER_GROWTH {
        if tail(upper) <= budget {
            bounded = true;
            break;
        }
        upper *= 10.0;
        if !upper.is_finite() {
            break;
        }
    }
    if !bounded {
        return Err(VolError::DegenerateRegion(
            ErrorInfo::new("no-sharp-gaussian", "no temperature concentrates inside the region")
                .with_context("budget", budget.to_string()),
        ));
    }

    let mut lower = 0.0;
    while upper - lower > BISECTION_TOL {
        let mid = (upper + lower) / 2.0;
        if mid <= lower || mid >= upper {
            break;
        }
        if tail(mid) < budget {
            upper = mid;
        } else {
            lower = mid;
        }
    }
    Ok((upper + lower) / 2.0)
}

fn mean_variance(values: &[f64]) -> (f64, f64) {
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = if values.len() > 1 {
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1.0)
    } else {
        0.0
    };
    (mean, variance)
}
