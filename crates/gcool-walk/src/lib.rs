#![deny(missing_docs)]

//! Gaussian random walks confined to a convex region.
//!
//! A single [`WalkState`] is threaded through every temperature of an
//! annealing run; only the target density `∝ exp(-a·‖x‖²)` changes between
//! phases.

use gcool_core::{Region, RngHandle, VolError};

mod ball;
mod hit_and_run;
mod state;
mod truncated;

pub use ball::BallWalk;
pub use hit_and_run::CoordinateHitAndRun;
pub use state::WalkState;
pub use truncated::sample_truncated_gaussian;

/// Markov-chain step generator targeting `exp(-a·‖x‖²)` restricted to a region.
pub trait RandomWalk {
    /// Supplies the inscribed radius and dimension once the region is centred.
    fn calibrate(&mut self, _radius: f64, _dimension: usize) {}

    /// Prepares the chain before the first phase.
    fn initialize<R: Region>(
        &mut self,
        _region: &R,
        _state: &mut WalkState,
        _walk_len: usize,
        _a: f64,
        _rng: &mut RngHandle,
    ) -> Result<(), VolError> {
        Ok(())
    }

    /// Advances the chain by `walk_len` internal moves at temperature `a`.
    fn next_point<R: Region>(
        &mut self,
        region: &R,
        state: &mut WalkState,
        walk_len: usize,
        a: f64,
        rng: &mut RngHandle,
    ) -> Result<(), VolError>;
}

/// Walk variant selected from configuration.
#[derive(Debug, Clone)]
pub enum AnyWalk {
    /// Coordinate-direction hit-and-run.
    HitAndRun(CoordinateHitAndRun),
    /// Metropolis ball walk.
    Ball(BallWalk),
}

impl AnyWalk {
    /// Picks the ball walk when `ball_walk` is set, hit-and-run otherwise.
    pub fn from_flags(ball_walk: bool, delta: Option<f64>) -> Self {
        if ball_walk {
            AnyWalk::Ball(BallWalk::new(delta))
        } else {
            AnyWalk::HitAndRun(CoordinateHitAndRun::new())
        }
    }

    /// Whether this is the coordinate-direction walk.
    pub fn is_coordinate(&self) -> bool {
        matches!(self, AnyWalk::HitAndRun(_))
    }
}

impl RandomWalk for AnyWalk {
    fn calibrate(&mut self, radius: f64, dimension: usize) {
        match self {
            AnyWalk::HitAndRun(walk) => walk.calibrate(radius, dimension),
            AnyWalk::Ball(walk) => walk.calibrate(radius, dimension),
        }
    }

    fn initialize<R: Region>(
        &mut self,
        region: &R,
        state: &mut WalkState,
        walk_len: usize,
        a: f64,
        rng: &mut RngHandle,
    ) -> Result<(), VolError> {
        match self {
            AnyWalk::HitAndRun(walk) => walk.initialize(region, state, walk_len, a, rng),
            AnyWalk::Ball(walk) => walk.initialize(region, state, walk_len, a, rng),
        }
    }

    fn next_point<R: Region>(
        &mut self,
        region: &R,
        state: &mut WalkState,
        walk_len: usize,
        a: f64,
        rng: &mut RngHandle,
    ) -> Result<(), VolError> {
        match self {
            AnyWalk::HitAndRun(walk) => walk.next_point(region, state, walk_len, a, rng),
            AnyWalk::Ball(walk) => walk.next_point(region, state, walk_len, a, rng),
        }
    }
}
