use std::f64::consts::PI;

use gcool_core::errors::ErrorInfo;
use gcool_core::{InnerBall, Region, RngHandle, VolError};
use gcool_walk::{AnyWalk, RandomWalk, WalkState};
use serde::{Deserialize, Serialize};

use crate::config::{ResolvedParams, VolumeConfig};
use crate::ratio::{estimate_ratio, PhaseSpec};
use crate::rounding::{MinEllipsoidRounding, RoundingTransform};
use crate::schedule::{AnnealingSchedule, GaussianAnnealing, ScheduleGenerator, ScheduleRequest};
use crate::trace::{AnnealingTrace, PhaseRecord};

/// The three collaborators consumed by the driver.
#[derive(Debug, Clone)]
pub struct Collaborators<W, S, T> {
    /// Sampler advancing the chain during the ratio phases.
    pub walk: W,
    /// Temperature schedule generator.
    pub schedule: S,
    /// Rounding transform, used only when rounding is requested.
    pub rounding: T,
}

/// Collaborators built from configuration.
pub type DefaultCollaborators = Collaborators<AnyWalk, GaussianAnnealing, MinEllipsoidRounding>;

impl DefaultCollaborators {
    /// Walk, schedule and rounding selected by the parameters.
    pub fn from_params(params: &ResolvedParams) -> Self {
        Self {
            walk: AnyWalk::from_flags(params.ball_walk, params.delta),
            schedule: GaussianAnnealing::from_params(params),
            rounding: MinEllipsoidRounding::from_params(params),
        }
    }
}

/// Finished volume estimate with its bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeEstimate {
    /// Estimated volume of the input region.
    pub volume: f64,
    /// Ratio-phase samples plus `N` per phase for the schedule.
    pub total_steps: usize,
    /// Ratio-phase samples only.
    pub phase_steps: usize,
    /// One record per ratio phase.
    pub phases: Vec<PhaseRecord>,
    /// Temperature schedule used.
    pub schedule: Vec<f64>,
    /// Determinant correction from rounding, `1` without rounding.
    pub rounding_factor: f64,
    /// Inscribed radius after the optional rounding.
    pub inner_radius: f64,
}

impl VolumeEstimate {
    /// Number of ratio phases.
    pub fn num_phases(&self) -> usize {
        self.phases.len()
    }

    /// Phase records as a trace ready for CSV export.
    pub fn trace(&self) -> AnnealingTrace {
        AnnealingTrace::from(self.phases.clone())
    }
}

/// Outcome of [`estimate_volume`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VolumeOutcome {
    /// Steps-only exit: number of ratio phases of the schedule.
    PhaseCount(usize),
    /// Full estimate.
    Estimate(VolumeEstimate),
}

impl VolumeOutcome {
    /// Number of ratio phases in either case.
    pub fn phases(&self) -> usize {
        match self {
            VolumeOutcome::PhaseCount(phases) => *phases,
            VolumeOutcome::Estimate(estimate) => estimate.num_phases(),
        }
    }

    /// The estimate, if one was computed.
    pub fn estimate(&self) -> Option<&VolumeEstimate> {
        match self {
            VolumeOutcome::PhaseCount(_) => None,
            VolumeOutcome::Estimate(estimate) => Some(estimate),
        }
    }
}

/// Estimates the volume of `region` with collaborators built from `config`.
///
/// The region is shifted (and rounded, if requested) in place.
pub fn estimate_volume<R: Region>(
    region: &mut R,
    config: &VolumeConfig,
    inner_ball: &InnerBall,
    steps_only: bool,
    rng: &mut RngHandle,
) -> Result<VolumeOutcome, VolError> {
    let params = config.resolve(region.dimension())?;
    let mut collaborators = DefaultCollaborators::from_params(&params);
    run(region, &params, inner_ball, steps_only, &mut collaborators, rng)
}

/// Estimates the volume of `region` with caller-supplied collaborators.
pub fn estimate_volume_with<R, W, S, T>(
    region: &mut R,
    config: &VolumeConfig,
    inner_ball: &InnerBall,
    steps_only: bool,
    collaborators: &mut Collaborators<W, S, T>,
    rng: &mut RngHandle,
) -> Result<VolumeOutcome, VolError>
where
    R: Region,
    W: RandomWalk,
    S: ScheduleGenerator,
    T: RoundingTransform,
{
    let params = config.resolve(region.dimension())?;
    run(region, &params, inner_ball, steps_only, collaborators, rng)
}

fn run<R, W, S, T>(
    region: &mut R,
    params: &ResolvedParams,
    inner_ball: &InnerBall,
    steps_only: bool,
    collaborators: &mut Collaborators<W, S, T>,
    rng: &mut RngHandle,
) -> Result<VolumeOutcome, VolError>
where
    R: Region,
    W: RandomWalk,
    S: ScheduleGenerator,
    T: RoundingTransform,
{
    let dimension = params.dimension;
    inner_ball.ensure_dimension(dimension)?;

    let mut ball = inner_ball.clone();
    let mut rounding_factor = 1.0;
    if params.round {
        rounding_factor = collaborators.rounding.round(region, &ball, rng)?;
        if !(rounding_factor.is_finite() && rounding_factor != 0.0) {
            return Err(VolError::Collaborator(
                ErrorInfo::new("rounding-factor", "rounding returned an unusable correction")
                    .with_context("factor", rounding_factor.to_string()),
            ));
        }
        ball = region.inner_ball()?;
        ball.ensure_dimension(dimension)?;
    }

    let radius = ball.radius();
    region.shift(ball.center());
    collaborators.walk.calibrate(radius, dimension);

    let request = ScheduleRequest::from_params(params, radius);
    let schedule = AnnealingSchedule::new(collaborators.schedule.compute(region, &request, rng)?)?;
    let phases = schedule.phases();
    if steps_only || params.steps_only {
        return Ok(VolumeOutcome::PhaseCount(phases));
    }

    let mut volume = (PI / schedule.first()).powf(dimension as f64 / 2.0) * rounding_factor.abs();
    let mut state = WalkState::at_origin(region);
    collaborators
        .walk
        .initialize(region, &mut state, params.walk_steps, schedule.first(), rng)?;

    let curr_eps = params.error / (phases as f64).sqrt();
    let mut trace = AnnealingTrace::new();
    for (phase, (a_from, a_to)) in schedule.pairs().enumerate() {
        let spec = PhaseSpec {
            a_from,
            a_to,
            walk_steps: params.walk_steps,
            curr_eps,
            window: params.w,
            min_samples: params.min_phase_samples,
        };
        let outcome = estimate_ratio(region, &mut state, &mut collaborators.walk, &spec, rng)?;
        volume *= outcome.ratio;
        if !volume.is_finite() {
            return Err(VolError::NumericInstability(
                ErrorInfo::new("non-finite-volume", "running volume is not finite")
                    .with_context("phase", phase.to_string()),
            ));
        }
        trace.push(PhaseRecord {
            phase,
            a_from,
            a_to,
            ratio: outcome.ratio,
            samples: outcome.samples,
            window_spread: outcome.window_spread,
        });
    }

    let phase_steps = trace.total_samples();
    Ok(VolumeOutcome::Estimate(VolumeEstimate {
        volume,
        total_steps: phase_steps + params.n * phases,
        phase_steps,
        phases: trace.into_records(),
        schedule: schedule.into(),
        rounding_factor,
        inner_radius: radius,
    }))
}
