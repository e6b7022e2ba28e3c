use gcool_core::errors::{ErrorInfo, VolError};
use gcool_core::{Region, RngHandle};
use rand::Rng;

use crate::state::WalkState;
use crate::truncated::sample_truncated_gaussian;
use crate::RandomWalk;

/// Gaussian coordinate-direction hit-and-run.
///
/// Each move resamples one uniformly chosen coordinate from the target
/// density restricted to the chord through the current point.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateHitAndRun;

impl CoordinateHitAndRun {
    /// Creates the walk.
    pub fn new() -> Self {
        Self
    }

    fn step<R: Region>(
        &self,
        region: &R,
        state: &mut WalkState,
        a: f64,
        rng: &mut RngHandle,
    ) -> Result<(), VolError> {
        state.sync(region);
        let coordinate = rng.gen_range(0..region.dimension());
        let (lo, hi) = region.coordinate_chord(&state.slack, coordinate);
        if !(lo.is_finite() && hi.is_finite()) {
            return Err(VolError::DegenerateRegion(
                ErrorInfo::new("unbounded-chord", "coordinate chord leaves the region")
                    .with_context("coordinate", coordinate.to_string()),
            ));
        }
        let x = state.point[coordinate];
        state.point[coordinate] = sample_truncated_gaussian(x + lo, x + hi, a, rng);
        state.last_coordinate = Some(coordinate);
        Ok(())
    }
}

impl RandomWalk for CoordinateHitAndRun {
    fn initialize<R: Region>(
        &mut self,
        region: &R,
        state: &mut WalkState,
        walk_len: usize,
        a: f64,
        rng: &mut RngHandle,
    ) -> Result<(), VolError> {
        state.refresh(region);
        self.next_point(region, state, walk_len, a, rng)
    }

    fn next_point<R: Region>(
        &mut self,
        region: &R,
        state: &mut WalkState,
        walk_len: usize,
        a: f64,
        rng: &mut RngHandle,
    ) -> Result<(), VolError> {
        for _ in 0..walk_len {
            self.step(region, state, a, rng)?;
        }
        Ok(())
    }
}
