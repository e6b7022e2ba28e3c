use gcool_core::{gaussian_weight, squared_norm, weight_ratio};

#[test]
fn weight_at_origin_is_one() {
    assert_eq!(gaussian_weight(&[0.0, 0.0, 0.0], 17.0), 1.0);
}

#[test]
fn weight_matches_closed_form() {
    let x = [1.0, -2.0];
    assert!((squared_norm(&x) - 5.0).abs() < 1e-15);
    assert!((gaussian_weight(&x, 0.3) - (-1.5f64).exp()).abs() < 1e-15);
}

#[test]
fn zero_temperature_is_uniform() {
    assert_eq!(gaussian_weight(&[3.0, 4.0], 0.0), 1.0);
}

#[test]
fn ratio_equals_quotient_of_weights() {
    let x = [0.4, 0.1, -0.7];
    let quotient = gaussian_weight(&x, 0.5) / gaussian_weight(&x, 2.0);
    assert!((weight_ratio(&x, 0.5, 2.0) - quotient).abs() < 1e-12);
}

#[test]
fn ratio_survives_underflow_of_both_weights() {
    let x = [30.0, 30.0];
    assert_eq!(gaussian_weight(&x, 10.0), 0.0);
    let ratio = weight_ratio(&x, 9.999, 10.0);
    assert!(ratio.is_finite());
    assert!(ratio > 1.0);
}
