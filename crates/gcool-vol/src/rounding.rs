use gcool_core::errors::ErrorInfo;
use gcool_core::{InnerBall, Region, RngHandle, VolError};
use gcool_walk::{CoordinateHitAndRun, RandomWalk, WalkState};
use nalgebra::{Cholesky, DMatrix, DVector};

use crate::config::ResolvedParams;

const KHACHIYAN_TOL: f64 = 1e-3;
const KHACHIYAN_MAX_ITER: usize = 1000;

/// Affine preconditioning applied to a region before sampling.
pub trait RoundingTransform {
    /// Transforms `region` in place and returns the determinant correction
    /// `c` with `vol(before) = c · vol(after)`.
    fn round<R: Region>(
        &mut self,
        region: &mut R,
        ball: &InnerBall,
        rng: &mut RngHandle,
    ) -> Result<f64, VolError>;
}

/// Rounding by the minimum-volume ellipsoid enclosing near-uniform samples.
#[derive(Debug, Clone, PartialEq)]
pub struct MinEllipsoidRounding {
    /// Samples fed to every ellipsoid fit.
    pub samples: usize,
    /// Hit-and-run moves between samples.
    pub walk_steps: usize,
    /// Maximum number of passes.
    pub max_passes: usize,
    /// A further pass runs while the fitted axis ratio exceeds this.
    pub max_axis_ratio: f64,
}

impl MinEllipsoidRounding {
    /// Rounding settings taken from resolved parameters.
    pub fn from_params(params: &ResolvedParams) -> Self {
        Self {
            samples: params.rounding_samples,
            walk_steps: params.rounding_walk_steps,
            max_passes: params.rounding_max_passes,
            max_axis_ratio: params.rounding_max_axis_ratio,
        }
    }

    fn sample<R: Region>(&self, region: &R, rng: &mut RngHandle) -> Result<Vec<Vec<f64>>, VolError> {
        let mut walk = CoordinateHitAndRun::new();
        let mut state = WalkState::at_origin(region);
        walk.initialize(region, &mut state, self.walk_steps, 0.0, rng)?;
        let mut points = Vec::with_capacity(self.samples);
        for _ in 0..self.samples {
            walk.next_point(region, &mut state, self.walk_steps, 0.0, rng)?;
            points.push(state.point().to_vec());
        }
        Ok(points)
    }
}

impl RoundingTransform for MinEllipsoidRounding {
    fn round<R: Region>(
        &mut self,
        region: &mut R,
        ball: &InnerBall,
        rng: &mut RngHandle,
    ) -> Result<f64, VolError> {
        let dimension = region.dimension();
        ball.ensure_dimension(dimension)?;
        if self.samples <= dimension {
            return Err(VolError::Collaborator(
                ErrorInfo::new("rounding-too-few-samples", "ellipsoid fit needs more than n samples")
                    .with_context("samples", self.samples.to_string())
                    .with_context("dimension", dimension.to_string()),
            ));
        }

        let mut factor = 1.0;
        let mut center = ball.center().to_vec();
        for pass in 0..self.max_passes {
            region.shift(&center);
            let points = self.sample(region, rng)?;
            let ellipsoid = min_volume_ellipsoid(&points, KHACHIYAN_TOL, KHACHIYAN_MAX_ITER)?;

            region.shift(ellipsoid.center.as_slice());
            let transform = ellipsoid.normalizing_map()?;
            region.linear_transform(&transform)?;
            factor *= transform.determinant().abs();

            if ellipsoid.axis_ratio() <= self.max_axis_ratio || pass + 1 == self.max_passes {
                break;
            }
            center = region.inner_ball()?.center().to_vec();
        }
        Ok(factor)
    }
}

/// Ellipsoid `{x : (x - center)ᵀ shape (x - center) ≤ 1}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipsoid {
    /// Centre.
    pub center: DVector<f64>,
    /// Positive definite shape matrix.
    pub shape: DMatrix<f64>,
}

impl Ellipsoid {
    /// Linear map `T = L⁻ᵀ` (with `shape = L·Lᵀ`) sending the unit ball onto
    /// the centred ellipsoid.
    pub fn normalizing_map(&self) -> Result<DMatrix<f64>, VolError> {
        let cholesky = Cholesky::new(self.shape.clone()).ok_or_else(|| {
            VolError::Collaborator(ErrorInfo::new(
                "rounding-cholesky",
                "ellipsoid shape matrix is not positive definite",
            ))
        })?;
        cholesky.l().transpose().try_inverse().ok_or_else(|| {
            VolError::Collaborator(ErrorInfo::new(
                "rounding-singular",
                "ellipsoid factor is singular",
            ))
        })
    }

    /// Ratio of the longest to the shortest semi-axis.
    pub fn axis_ratio(&self) -> f64 {
        let eigenvalues = self.shape.symmetric_eigenvalues();
        let max = eigenvalues.max();
        let min = eigenvalues.min();
        (max / min).sqrt()
    }
}

/// Khachiyan's algorithm for the minimum-volume enclosing ellipsoid.
pub fn min_volume_ellipsoid(
    points: &[Vec<f64>],
    tolerance: f64,
    max_iter: usize,
) -> Result<Ellipsoid, VolError> {
    let count = points.len();
    let dimension = points.first().map(Vec::len).unwrap_or(0);
    if count <= dimension || dimension == 0 {
        return Err(VolError::Collaborator(
            ErrorInfo::new("rounding-too-few-samples", "ellipsoid fit needs more than n points")
                .with_context("points", count.to_string()),
        ));
    }
    let p = DMatrix::from_fn(dimension, count, |i, j| points[j][i]);
    let q = DMatrix::from_fn(dimension + 1, count, |i, j| {
        if i < dimension {
            points[j][i]
        } else {
            1.0
        }
    });

    let lifted = (dimension + 1) as f64;
    let mut u = DVector::from_element(count, 1.0 / count as f64);
    for _ in 0..max_iter {
        let x = weighted_columns(&q, &u) * q.transpose();
        let x_inv = x.try_inverse().ok_or_else(singular_scatter)?;
        let mut best = 0;
        let mut maximum = f64::NEG_INFINITY;
        for j in 0..count {
            let column = q.column(j);
            let m = column.dot(&(&x_inv * column));
            if m > maximum {
                maximum = m;
                best = j;
            }
        }
        let step = (maximum - lifted) / (lifted * (maximum - 1.0));
        let mut next = &u * (1.0 - step);
        next[best] += step;
        let change = (&next - &u).norm();
        u = next;
        if change < tolerance {
            break;
        }
    }

    let center = &p * &u;
    let scatter = weighted_columns(&p, &u) * p.transpose() - &center * center.transpose();
    let shape = scatter.try_inverse().ok_or_else(singular_scatter)? / dimension as f64;
    Ok(Ellipsoid { center, shape })
}

/// `m · diag(weights)` without forming the diagonal matrix.
fn weighted_columns(m: &DMatrix<f64>, weights: &DVector<f64>) -> DMatrix<f64> {
    let mut scaled = m.clone();
    for (j, weight) in weights.iter().enumerate() {
        scaled.column_mut(j).scale_mut(*weight);
    }
    scaled
}

fn singular_scatter() -> VolError {
    VolError::Collaborator(ErrorInfo::new(
        "rounding-singular-scatter",
        "samples do not span the space",
    ))
}
