#![deny(missing_docs)]
#![doc = "Core traits and data types for the Gaussian-cooling volume estimator."]

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

pub mod errors;
pub mod gaussian;
pub mod rng;

pub use errors::{ErrorInfo, VolError};
pub use gaussian::{gaussian_weight, squared_norm, weight_ratio};
pub use rng::{derive_substream_seed, RngHandle};

/// Inscribed ball of a region: centre point and strictly positive radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInnerBall")]
pub struct InnerBall {
    center: Vec<f64>,
    radius: f64,
}

#[derive(Deserialize)]
struct RawInnerBall {
    center: Vec<f64>,
    radius: f64,
}

impl TryFrom<RawInnerBall> for InnerBall {
    type Error = VolError;

    fn try_from(raw: RawInnerBall) -> Result<Self, Self::Error> {
        InnerBall::new(raw.center, raw.radius)
    }
}

impl InnerBall {
    /// Creates a ball, rejecting non-positive or non-finite radii and centres.
    pub fn new(center: Vec<f64>, radius: f64) -> Result<Self, VolError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(VolError::DegenerateRegion(
                ErrorInfo::new("non-positive-radius", "inscribed ball radius must be positive")
                    .with_context("radius", radius.to_string()),
            ));
        }
        if center.iter().any(|c| !c.is_finite()) {
            return Err(VolError::DegenerateRegion(ErrorInfo::new(
                "non-finite-center",
                "inscribed ball centre has non-finite coordinates",
            )));
        }
        Ok(Self { center, radius })
    }

    /// Centre of the ball.
    pub fn center(&self) -> &[f64] {
        &self.center
    }

    /// Radius of the ball.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Dimension of the ambient space.
    pub fn dimension(&self) -> usize {
        self.center.len()
    }

    /// Checks that the ball lives in a space of the given dimension.
    pub fn ensure_dimension(&self, dimension: usize) -> Result<(), VolError> {
        if self.center.len() != dimension {
            return Err(VolError::DegenerateRegion(
                ErrorInfo::new("ball-dimension", "inscribed ball does not match region dimension")
                    .with_context("ball", self.center.len().to_string())
                    .with_context("region", dimension.to_string()),
            ));
        }
        Ok(())
    }
}

/// Structural contract for a bounded convex region given by linear inequalities.
///
/// Walks keep a per-constraint slack cache `b - A·x`; the chord helpers work
/// on that cache so a coordinate move costs `O(m)` instead of `O(mn)`.
pub trait Region {
    /// Dimension `n` of the ambient space.
    fn dimension(&self) -> usize;

    /// Number `m` of linear constraints.
    fn num_constraints(&self) -> usize;

    /// Computes the largest inscribed (Chebyshev) ball.
    fn inner_ball(&self) -> Result<InnerBall, VolError>;

    /// Translates the region so that `center` becomes the origin.
    fn shift(&mut self, center: &[f64]);

    /// Replaces the region `P` with `{y : T·y ∈ P}`.
    fn linear_transform(&mut self, map: &DMatrix<f64>) -> Result<(), VolError>;

    /// Signed distance from the origin to every facet hyperplane.
    fn facet_distances(&self) -> Vec<f64>;

    /// Per-constraint slack `b - A·x` of a point.
    fn slack(&self, point: &[f64]) -> Vec<f64>;

    /// Displacements `[lo, hi]` along `e_coordinate` that keep the point inside.
    fn coordinate_chord(&self, slack: &[f64], coordinate: usize) -> (f64, f64);

    /// Updates a slack cache after moving `step` along `e_coordinate`.
    fn advance_slack(&self, slack: &mut [f64], coordinate: usize, step: f64);

    /// Whether the point satisfies every constraint.
    fn contains(&self, point: &[f64]) -> bool {
        self.slack(point).iter().all(|s| *s >= 0.0)
    }
}
