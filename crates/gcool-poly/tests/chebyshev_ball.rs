use gcool_core::{Region, VolError};
use gcool_poly::{axis_box, cross_polytope, cube, unit_simplex, HPolytope};

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn cube_ball_is_centered_unit_ball() {
    let ball = cube(3, 1.0).unwrap().inner_ball().unwrap();
    assert_close(ball.radius(), 1.0, 1e-9);
    for c in ball.center() {
        assert_close(*c, 0.0, 1e-9);
    }
}

#[test]
fn elongated_box_radius_is_half_the_short_side() {
    let region = axis_box(&[0.0, 0.0], &[4.0, 1.0]).unwrap();
    let ball = region.inner_ball().unwrap();
    assert_close(ball.radius(), 0.5, 1e-9);
    assert_close(ball.center()[1], 0.5, 1e-9);
    assert!(region.contains(ball.center()));
}

#[test]
fn simplex_ball_matches_closed_form() {
    let ball = unit_simplex(2).unwrap().inner_ball().unwrap();
    let expected = 1.0 / (2.0 + 2f64.sqrt());
    assert_close(ball.radius(), expected, 1e-9);
    assert_close(ball.center()[0], expected, 1e-9);
    assert_close(ball.center()[1], expected, 1e-9);
}

#[test]
fn cross_polytope_ball_touches_every_facet() {
    let ball = cross_polytope(3).unwrap().inner_ball().unwrap();
    assert_close(ball.radius(), 1.0 / 3f64.sqrt(), 1e-9);
}

#[test]
fn unbounded_region_is_rejected() {
    let half_line = HPolytope::from_rows(&[vec![1.0]], &[1.0]).unwrap();
    let err = half_line.inner_ball().unwrap_err();
    assert!(matches!(err, VolError::DegenerateRegion(_)));
    assert_eq!(err.info().code, "lp-unbounded");
}

#[test]
fn infeasible_region_is_rejected() {
    let empty = HPolytope::from_rows(&[vec![1.0], vec![-1.0]], &[-1.0, -1.0]).unwrap();
    let err = empty.inner_ball().unwrap_err();
    assert_eq!(err.info().code, "lp-infeasible");
}

#[test]
fn flat_region_has_no_positive_radius() {
    let flat = HPolytope::from_rows(&[vec![1.0, 0.0], vec![-1.0, 0.0], vec![0.0, 1.0], vec![0.0, -1.0]], &[0.0, 0.0, 1.0, 1.0])
        .unwrap();
    let err = flat.inner_ball().unwrap_err();
    assert_eq!(err.info().code, "non-positive-radius");
}
