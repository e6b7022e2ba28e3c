//! Unnormalized isotropic Gaussian weights centred at the origin.

/// Squared Euclidean norm of `point`.
pub fn squared_norm(point: &[f64]) -> f64 {
    point.iter().map(|x| x * x).sum()
}

/// Returns `exp(-a * ‖x‖²)`.
///
/// Underflows to zero for large `a‖x‖²`.
pub fn gaussian_weight(point: &[f64], a: f64) -> f64 {
    (-a * squared_norm(point)).exp()
}

/// Returns `gaussian_weight(x, numerator) / gaussian_weight(x, denominator)`.
///
/// Evaluated as a single exponential so that the quotient stays finite when
/// both weights underflow.
pub fn weight_ratio(point: &[f64], numerator: f64, denominator: f64) -> f64 {
    (-(numerator - denominator) * squared_norm(point)).exp()
}
