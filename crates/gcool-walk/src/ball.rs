use gcool_core::errors::{ErrorInfo, VolError};
use gcool_core::{squared_norm, Region, RngHandle};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::state::WalkState;
use crate::RandomWalk;

/// Gaussian ball walk with Metropolis acceptance.
#[derive(Debug, Clone, Default)]
pub struct BallWalk {
    delta: Option<f64>,
    radius: Option<f64>,
    dimension: usize,
}

impl BallWalk {
    /// Creates the walk; `None` derives the step radius after calibration.
    pub fn new(delta: Option<f64>) -> Self {
        Self {
            delta,
            radius: None,
            dimension: 0,
        }
    }

    /// Step radius used at temperature `a`.
    ///
    /// A configured radius wins; otherwise `4r / sqrt(max(1, a)·n)` from the
    /// calibrated inscribed radius `r`.
    pub fn step_radius(&self, a: f64) -> Result<f64, VolError> {
        if let Some(delta) = self.delta {
            return Ok(delta);
        }
        match self.radius {
            Some(radius) => Ok(4.0 * radius / (a.max(1.0) * self.dimension as f64).sqrt()),
            None => Err(VolError::Collaborator(
                ErrorInfo::new(
                    "uncalibrated-ball-walk",
                    "ball walk needs an inscribed radius or an explicit delta",
                )
                .with_hint("call calibrate before sampling or set delta"),
            )),
        }
    }
}

fn uniform_in_ball(dimension: usize, rng: &mut RngHandle) -> Vec<f64> {
    let mut direction: Vec<f64> = (0..dimension).map(|_| rng.sample(StandardNormal)).collect();
    let norm = squared_norm(&direction).sqrt();
    let scale = rng.gen::<f64>().powf(1.0 / dimension as f64) / norm.max(f64::MIN_POSITIVE);
    direction.iter_mut().for_each(|v| *v *= scale);
    direction
}

impl RandomWalk for BallWalk {
    fn calibrate(&mut self, radius: f64, dimension: usize) {
        self.radius = Some(radius);
        self.dimension = dimension;
    }

    fn next_point<R: Region>(
        &mut self,
        region: &R,
        state: &mut WalkState,
        walk_len: usize,
        a: f64,
        rng: &mut RngHandle,
    ) -> Result<(), VolError> {
        let delta = self.step_radius(a)?;
        let dimension = region.dimension();
        for _ in 0..walk_len {
            let offset = uniform_in_ball(dimension, rng);
            let candidate: Vec<f64> = state
                .point
                .iter()
                .zip(offset.iter())
                .map(|(x, u)| x + delta * u)
                .collect();
            let slack = region.slack(&candidate);
            if slack.iter().any(|s| *s < 0.0) {
                continue;
            }
            let log_ratio = -a * (squared_norm(&candidate) - squared_norm(&state.point));
            if log_ratio >= 0.0 || rng.gen::<f64>() < log_ratio.exp() {
                state.adopt(candidate, slack);
            }
        }
        Ok(())
    }
}
