use gcool_core::errors::{ErrorInfo, VolError};
use nalgebra::{DMatrix, DVector};

use crate::polytope::HPolytope;

const MAX_CROSS_DIMENSION: usize = 20;

fn ensure_dimension(dimension: usize) -> Result<(), VolError> {
    if dimension == 0 {
        return Err(VolError::DegenerateRegion(ErrorInfo::new(
            "empty-polytope",
            "generators require at least one dimension",
        )));
    }
    Ok(())
}

/// Generates the cube `[-half_width, half_width]^n`.
pub fn cube(dimension: usize, half_width: f64) -> Result<HPolytope, VolError> {
    ensure_dimension(dimension)?;
    axis_box(&vec![-half_width; dimension], &vec![half_width; dimension])
}

/// Generates the axis-aligned box `lower ≤ x ≤ upper`.
///
/// Rows `0..n` hold the upper faces `e_i`, rows `n..2n` the lower faces `-e_i`.
pub fn axis_box(lower: &[f64], upper: &[f64]) -> Result<HPolytope, VolError> {
    let n = lower.len();
    ensure_dimension(n)?;
    if upper.len() != n {
        return Err(VolError::DegenerateRegion(
            ErrorInfo::new("shape-mismatch", "box bounds disagree in dimension")
                .with_context("lower", n.to_string())
                .with_context("upper", upper.len().to_string()),
        ));
    }
    if let Some(axis) = (0..n).find(|&i| lower[i] >= upper[i]) {
        return Err(VolError::DegenerateRegion(
            ErrorInfo::new("empty-box", "box lower bound must be below upper bound")
                .with_context("axis", axis.to_string()),
        ));
    }
    let a = DMatrix::from_fn(2 * n, n, |i, j| {
        if i == j {
            1.0
        } else if i == j + n {
            -1.0
        } else {
            0.0
        }
    });
    let b = DVector::from_fn(2 * n, |i, _| if i < n { upper[i] } else { -lower[i - n] });
    HPolytope::new(a, b)
}

/// Generates the cross-polytope `{x : ‖x‖₁ ≤ 1}` with its `2^n` facets.
pub fn cross_polytope(dimension: usize) -> Result<HPolytope, VolError> {
    ensure_dimension(dimension)?;
    if dimension > MAX_CROSS_DIMENSION {
        return Err(VolError::DegenerateRegion(
            ErrorInfo::new("too-many-facets", "cross-polytope facet count grows as 2^n")
                .with_context("dimension", dimension.to_string()),
        ));
    }
    let m = 1usize << dimension;
    let a = DMatrix::from_fn(m, dimension, |i, j| if (i >> j) & 1 == 1 { -1.0 } else { 1.0 });
    HPolytope::new(a, DVector::from_element(m, 1.0))
}

/// Generates the simplex `{x : x ≥ 0, Σ x_i ≤ 1}`.
pub fn unit_simplex(dimension: usize) -> Result<HPolytope, VolError> {
    ensure_dimension(dimension)?;
    let a = DMatrix::from_fn(dimension + 1, dimension, |i, j| {
        if i == dimension {
            1.0
        } else if i == j {
            -1.0
        } else {
            0.0
        }
    });
    let b = DVector::from_fn(dimension + 1, |i, _| if i == dimension { 1.0 } else { 0.0 });
    HPolytope::new(a, b)
}
