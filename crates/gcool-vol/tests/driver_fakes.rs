use std::f64::consts::PI;

use gcool_core::{InnerBall, Region, RngHandle, VolError};
use gcool_poly::cube;
use gcool_vol::{
    estimate_volume, estimate_volume_with, Collaborators, GaussianAnnealing, RoundingTransform,
    ScheduleGenerator, ScheduleRequest, VolumeConfig, VolumeOutcome,
};
use gcool_walk::{AnyWalk, CoordinateHitAndRun, RandomWalk, WalkState};

#[derive(Default)]
struct CountingWalk {
    inner: CoordinateHitAndRun,
    calls: usize,
    initialized: usize,
    calibrated: Option<f64>,
}

impl RandomWalk for CountingWalk {
    fn calibrate(&mut self, radius: f64, _dimension: usize) {
        self.calibrated = Some(radius);
    }

    fn initialize<R: Region>(
        &mut self,
        region: &R,
        state: &mut WalkState,
        walk_len: usize,
        a: f64,
        rng: &mut RngHandle,
    ) -> Result<(), VolError> {
        self.initialized += 1;
        self.inner.initialize(region, state, walk_len, a, rng)
    }

    fn next_point<R: Region>(
        &mut self,
        region: &R,
        state: &mut WalkState,
        walk_len: usize,
        a: f64,
        rng: &mut RngHandle,
    ) -> Result<(), VolError> {
        self.calls += 1;
        self.inner.next_point(region, state, walk_len, a, rng)
    }
}

struct PinnedWalk {
    point: Vec<f64>,
}

impl RandomWalk for PinnedWalk {
    fn next_point<R: Region>(
        &mut self,
        region: &R,
        state: &mut WalkState,
        _walk_len: usize,
        _a: f64,
        _rng: &mut RngHandle,
    ) -> Result<(), VolError> {
        state.relocate(region, self.point.clone())
    }
}

struct FixedSchedule(Vec<f64>);

impl ScheduleGenerator for FixedSchedule {
    fn compute<R: Region>(
        &mut self,
        _region: &R,
        _request: &ScheduleRequest,
        _rng: &mut RngHandle,
    ) -> Result<Vec<f64>, VolError> {
        Ok(self.0.clone())
    }
}

#[derive(Default)]
struct ScaleRounding {
    factor: f64,
    calls: usize,
}

impl RoundingTransform for ScaleRounding {
    fn round<R: Region>(
        &mut self,
        _region: &mut R,
        _ball: &InnerBall,
        _rng: &mut RngHandle,
    ) -> Result<f64, VolError> {
        self.calls += 1;
        Ok(self.factor)
    }
}

fn unit_ball(dimension: usize) -> InnerBall {
    InnerBall::new(vec![0.0; dimension], 1.0).unwrap()
}

fn counting(schedule: Vec<f64>) -> Collaborators<CountingWalk, FixedSchedule, ScaleRounding> {
    Collaborators {
        walk: CountingWalk::default(),
        schedule: FixedSchedule(schedule),
        rounding: ScaleRounding::default(),
    }
}

#[test]
fn steps_only_reports_phases_without_sampling() {
    let mut region = cube(2, 1.0).unwrap();
    let mut collaborators = counting(vec![3.0, 2.0, 1.0, 0.0]);
    let mut rng = RngHandle::from_seed(1);
    let outcome = estimate_volume_with(
        &mut region,
        &VolumeConfig::default(),
        &unit_ball(2),
        true,
        &mut collaborators,
        &mut rng,
    )
    .unwrap();
    assert_eq!(outcome, VolumeOutcome::PhaseCount(3));
    assert_eq!(collaborators.walk.calls, 0);
    assert_eq!(collaborators.walk.initialized, 0);
    assert_eq!(collaborators.rounding.calls, 0);
}

#[test]
fn configured_steps_only_matches_the_argument() {
    let mut region = cube(2, 1.0).unwrap();
    let mut collaborators = counting(vec![1.0, 0.0]);
    let mut rng = RngHandle::from_seed(1);
    let config = VolumeConfig::default().with_steps_only(true);
    let outcome = estimate_volume_with(
        &mut region,
        &config,
        &unit_ball(2),
        false,
        &mut collaborators,
        &mut rng,
    )
    .unwrap();
    assert_eq!(outcome.phases(), 1);
    assert!(outcome.estimate().is_none());
    assert_eq!(collaborators.walk.calls, 0);
}

#[test]
fn real_schedule_never_touches_the_phase_walk_when_steps_only() {
    let mut region = cube(2, 1.0).unwrap();
    let config = VolumeConfig::default();
    let params = config.resolve(2).unwrap();
    let mut collaborators = Collaborators {
        walk: CountingWalk::default(),
        schedule: GaussianAnnealing::from_params(&params),
        rounding: ScaleRounding::default(),
    };
    let mut rng = RngHandle::from_seed(4);
    let outcome = estimate_volume_with(
        &mut region,
        &config,
        &unit_ball(2),
        true,
        &mut collaborators,
        &mut rng,
    )
    .unwrap();
    assert!(outcome.phases() >= 1);
    assert_eq!(collaborators.walk.calls, 0);
}

#[test]
fn total_steps_add_schedule_budget_per_phase() {
    let mut region = cube(2, 1.0).unwrap();
    let mut collaborators = counting(vec![2.0, 1.0, 0.5, 0.0]);
    let mut rng = RngHandle::from_seed(9);
    let config = VolumeConfig::default().with_n(40).with_window(30);
    let outcome = estimate_volume_with(
        &mut region,
        &config,
        &unit_ball(2),
        false,
        &mut collaborators,
        &mut rng,
    )
    .unwrap();
    let estimate = outcome.estimate().unwrap();
    let sampled: usize = estimate.phases.iter().map(|p| p.samples).sum();
    assert_eq!(estimate.num_phases(), 3);
    assert_eq!(estimate.phase_steps, sampled);
    assert_eq!(estimate.total_steps, sampled + 40 * 3);
    assert_eq!(collaborators.walk.calls, sampled);
    assert_eq!(collaborators.walk.initialized, 1);
    assert_eq!(collaborators.walk.calibrated, Some(1.0));
    assert!(estimate.phases.iter().all(|p| p.samples >= 30));
    assert!(estimate.phases.iter().all(|p| p.ratio >= 1.0));
}

#[test]
fn constant_ratios_give_closed_form_volume() {
    let mut region = cube(2, 1.0).unwrap();
    let mut collaborators = Collaborators {
        walk: PinnedWalk {
            point: vec![0.0, 0.0],
        },
        schedule: FixedSchedule(vec![1.0, 0.5, 0.0]),
        rounding: ScaleRounding {
            factor: -2.0,
            calls: 0,
        },
    };
    let mut rng = RngHandle::from_seed(2);
    let config = VolumeConfig::default()
        .with_round(true)
        .with_window(5)
        .with_n(10);
    let outcome = estimate_volume_with(
        &mut region,
        &config,
        &unit_ball(2),
        false,
        &mut collaborators,
        &mut rng,
    )
    .unwrap();
    let estimate = outcome.estimate().unwrap();
    assert_eq!(collaborators.rounding.calls, 1);
    assert!((estimate.volume - 2.0 * PI).abs() < 1e-9);
    assert_eq!(estimate.rounding_factor, -2.0);
    assert_eq!(estimate.phase_steps, 10);
    assert_eq!(estimate.total_steps, 30);
    assert!(estimate.phases.iter().all(|p| p.samples == 5));
    assert!((estimate.inner_radius - 1.0).abs() < 1e-6);
}

#[test]
fn malformed_schedules_are_degenerate() {
    let cases = [
        (vec![1.0], "short-schedule"),
        (vec![1.0, 1.0, 0.0], "non-decreasing-schedule"),
        (vec![0.0, -1.0], "non-positive-start"),
        (vec![1.0, -0.5], "negative-temperature"),
    ];
    for (schedule, code) in cases {
        let mut region = cube(2, 1.0).unwrap();
        let mut collaborators = counting(schedule);
        let mut rng = RngHandle::from_seed(0);
        let err = estimate_volume_with(
            &mut region,
            &VolumeConfig::default(),
            &unit_ball(2),
            false,
            &mut collaborators,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, VolError::DegenerateRegion(_)));
        assert_eq!(err.info().code, code);
        assert_eq!(collaborators.walk.calls, 0);
    }
}

#[test]
fn invalid_configuration_fails_before_sampling() {
    let mut region = cube(2, 1.0).unwrap();
    let mut collaborators = counting(vec![1.0, 0.0]);
    let mut rng = RngHandle::from_seed(0);
    let err = estimate_volume_with(
        &mut region,
        &VolumeConfig::default().with_error(1.5),
        &unit_ball(2),
        false,
        &mut collaborators,
        &mut rng,
    )
    .unwrap_err();
    assert!(matches!(err, VolError::InvalidConfiguration(_)));
    assert_eq!(collaborators.walk.calls, 0);
}

#[test]
fn mismatched_ball_is_rejected() {
    let mut region = cube(3, 1.0).unwrap();
    let mut rng = RngHandle::from_seed(0);
    let err = estimate_volume(
        &mut region,
        &VolumeConfig::default(),
        &unit_ball(2),
        false,
        &mut rng,
    )
    .unwrap_err();
    assert_eq!(err.info().code, "ball-dimension");
}

#[test]
fn overflowing_volume_is_numeric_instability() {
    let mut region = cube(3, 1.0).unwrap();
    let mut collaborators = Collaborators {
        walk: PinnedWalk {
            point: vec![0.0; 3],
        },
        schedule: FixedSchedule(vec![1e-300, 0.0]),
        rounding: ScaleRounding::default(),
    };
    let mut rng = RngHandle::from_seed(0);
    let err = estimate_volume_with(
        &mut region,
        &VolumeConfig::default().with_window(2),
        &unit_ball(3),
        false,
        &mut collaborators,
        &mut rng,
    )
    .unwrap_err();
    assert_eq!(err.info().code, "non-finite-volume");
}

#[test]
fn ball_walk_collaborators_come_from_flags() {
    let params = VolumeConfig::default()
        .with_ball_walk(true)
        .resolve(2)
        .unwrap();
    let defaults = gcool_vol::DefaultCollaborators::from_params(&params);
    assert!(matches!(defaults.walk, AnyWalk::Ball(_)));
}
