use gcool_core::errors::{ErrorInfo, VolError};
use gcool_core::{InnerBall, Region};
use nalgebra::{DMatrix, DVector};

use crate::lp;

/// Bounded convex polytope in halfspace form `{x : A·x ≤ b}`.
#[derive(Debug, Clone, PartialEq)]
pub struct HPolytope {
    a: DMatrix<f64>,
    b: DVector<f64>,
}

impl HPolytope {
    /// Creates a polytope from its constraint matrix and offsets.
    pub fn new(a: DMatrix<f64>, b: DVector<f64>) -> Result<Self, VolError> {
        if a.nrows() != b.len() {
            return Err(VolError::DegenerateRegion(
                ErrorInfo::new("shape-mismatch", "constraint matrix and offsets disagree")
                    .with_context("rows", a.nrows().to_string())
                    .with_context("offsets", b.len().to_string()),
            ));
        }
        if a.ncols() == 0 || a.nrows() == 0 {
            return Err(VolError::DegenerateRegion(ErrorInfo::new(
                "empty-polytope",
                "polytope requires at least one dimension and one constraint",
            )));
        }
        if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
            return Err(VolError::DegenerateRegion(ErrorInfo::new(
                "non-finite-constraint",
                "constraint data contains non-finite values",
            )));
        }
        if let Some(row) = (0..a.nrows()).find(|&i| a.row(i).norm() == 0.0) {
            return Err(VolError::DegenerateRegion(
                ErrorInfo::new("zero-row", "constraint normal must be non-zero")
                    .with_context("row", row.to_string()),
            ));
        }
        Ok(Self { a, b })
    }

    /// Creates a polytope from row-major constraint normals.
    pub fn from_rows(rows: &[Vec<f64>], offsets: &[f64]) -> Result<Self, VolError> {
        let dimension = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|row| row.len() != dimension) {
            return Err(VolError::DegenerateRegion(ErrorInfo::new(
                "ragged-rows",
                "all constraint normals must share one dimension",
            )));
        }
        let a = DMatrix::from_fn(rows.len(), dimension, |i, j| rows[i][j]);
        Self::new(a, DVector::from_column_slice(offsets))
    }

    /// Constraint matrix `A`.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.a
    }

    /// Offsets `b`.
    pub fn offsets(&self) -> &DVector<f64> {
        &self.b
    }

    /// Constraint normals as row vectors.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        (0..self.a.nrows())
            .map(|i| self.a.row(i).iter().copied().collect())
            .collect()
    }

    pub(crate) fn row_norms(&self) -> Vec<f64> {
        (0..self.a.nrows()).map(|i| self.a.row(i).norm()).collect()
    }
}

impl Region for HPolytope {
    fn dimension(&self) -> usize {
        self.a.ncols()
    }

    fn num_constraints(&self) -> usize {
        self.a.nrows()
    }

    fn inner_ball(&self) -> Result<InnerBall, VolError> {
        lp::chebyshev_ball(self)
    }

    fn shift(&mut self, center: &[f64]) {
        let c = DVector::from_column_slice(center);
        self.b -= &self.a * c;
    }

    fn linear_transform(&mut self, map: &DMatrix<f64>) -> Result<(), VolError> {
        let n = self.dimension();
        if map.nrows() != n || map.ncols() != n {
            return Err(VolError::DegenerateRegion(
                ErrorInfo::new("transform-shape", "linear map must be square in the region dimension")
                    .with_context("rows", map.nrows().to_string())
                    .with_context("cols", map.ncols().to_string()),
            ));
        }
        if map.determinant().abs() <= f64::EPSILON {
            return Err(VolError::DegenerateRegion(ErrorInfo::new(
                "singular-transform",
                "linear map is singular",
            )));
        }
        self.a = &self.a * map;
        Ok(())
    }

    fn facet_distances(&self) -> Vec<f64> {
        self.row_norms()
            .into_iter()
            .zip(self.b.iter())
            .map(|(norm, b)| b / norm)
            .collect()
    }

    fn slack(&self, point: &[f64]) -> Vec<f64> {
        let x = DVector::from_column_slice(point);
        (&self.b - &self.a * x).iter().copied().collect()
    }

    fn coordinate_chord(&self, slack: &[f64], coordinate: usize) -> (f64, f64) {
        let mut lo = f64::NEG_INFINITY;
        let mut hi = f64::INFINITY;
        for (i, s) in slack.iter().enumerate() {
            let coefficient = self.a[(i, coordinate)];
            if coefficient > 0.0 {
                hi = hi.min(s / coefficient);
            } else if coefficient < 0.0 {
                lo = lo.max(s / coefficient);
            }
        }
        (lo, hi)
    }

    fn advance_slack(&self, slack: &mut [f64], coordinate: usize, step: f64) {
        for (i, s) in slack.iter_mut().enumerate() {
            *s -= self.a[(i, coordinate)] * step;
        }
    }
}
