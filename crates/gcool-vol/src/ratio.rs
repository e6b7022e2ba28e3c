use gcool_core::errors::ErrorInfo;
use gcool_core::{weight_ratio, Region, RngHandle, VolError};
use gcool_walk::{RandomWalk, WalkState};
use serde::{Deserialize, Serialize};

use crate::window::WindowedExtrema;

/// Inputs of one ratio phase between consecutive temperatures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSpec {
    /// Temperature the chain samples at.
    pub a_from: f64,
    /// Next, smaller temperature.
    pub a_to: f64,
    /// Internal walk moves per sample.
    pub walk_steps: usize,
    /// Relative half-width target for this phase.
    pub curr_eps: f64,
    /// Convergence window width.
    pub window: usize,
    /// Samples required before the phase may stop.
    pub min_samples: usize,
}

/// Result of one ratio phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseOutcome {
    /// Estimate of `Z(a_to) / Z(a_from)`.
    pub ratio: f64,
    /// Samples drawn.
    pub samples: usize,
    /// Relative window spread when the phase stopped.
    pub window_spread: f64,
}

/// Estimates `Z(a_to) / Z(a_from)` by importance sampling along the chain.
///
/// Stops once the relative spread of the last `window` running averages has
/// dropped to `curr_eps / 2` at least once and `min_samples` samples exist.
pub fn estimate_ratio<R, W>(
    region: &R,
    state: &mut WalkState,
    walk: &mut W,
    spec: &PhaseSpec,
    rng: &mut RngHandle,
) -> Result<PhaseOutcome, VolError>
where
    R: Region,
    W: RandomWalk,
{
    let mut tracker = WindowedExtrema::new(spec.window);
    let mut sum = 0.0;
    let mut samples = 0usize;
    let mut converged = false;
    let mut spread = f64::INFINITY;

    while !converged || samples < spec.min_samples {
        walk.next_point(region, state, spec.walk_steps, spec.a_from, rng)?;
        samples += 1;
        sum += weight_ratio(state.point(), spec.a_to, spec.a_from);
        let val = sum / samples as f64;
        if !val.is_finite() {
            return Err(VolError::NumericInstability(
                ErrorInfo::new("non-finite-ratio", "running ratio is not finite")
                    .with_context("a_from", spec.a_from.to_string())
                    .with_context("a_to", spec.a_to.to_string())
                    .with_context("samples", samples.to_string()),
            ));
        }
        tracker.insert(val);
        let (_, max) = tracker.extrema();
        if max == 0.0 {
            return Err(VolError::NumericInstability(
                ErrorInfo::new("zero-window-max", "window maximum is zero")
                    .with_context("a_from", spec.a_from.to_string())
                    .with_context("samples", samples.to_string()),
            ));
        }
        spread = tracker.relative_spread();
        if spread <= spec.curr_eps / 2.0 {
            converged = true;
        }
    }

    Ok(PhaseOutcome {
        ratio: sum / samples as f64,
        samples,
        window_spread: spread,
    })
}
