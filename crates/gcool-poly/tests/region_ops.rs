use gcool_core::{Region, VolError};
use gcool_poly::{axis_box, cube, HPolytope};
use nalgebra::DMatrix;

#[test]
fn constructors_report_shape() {
    let region = cube(4, 2.0).unwrap();
    assert_eq!(region.dimension(), 4);
    assert_eq!(region.num_constraints(), 8);
}

#[test]
fn invalid_constructions_are_degenerate() {
    assert!(matches!(cube(0, 1.0), Err(VolError::DegenerateRegion(_))));
    assert_eq!(
        axis_box(&[1.0], &[0.0]).unwrap_err().info().code,
        "empty-box"
    );
    assert_eq!(
        HPolytope::from_rows(&[vec![0.0, 0.0]], &[1.0]).unwrap_err().info().code,
        "zero-row"
    );
    assert_eq!(
        HPolytope::from_rows(&[vec![1.0, 0.0], vec![1.0]], &[1.0, 1.0])
            .unwrap_err()
            .info()
            .code,
        "ragged-rows"
    );
}

#[test]
fn shift_moves_center_to_origin() {
    let mut region = axis_box(&[1.0, 1.0], &[3.0, 5.0]).unwrap();
    region.shift(&[2.0, 3.0]);
    assert!(region.contains(&[0.0, 0.0]));
    assert!(region.contains(&[-0.99, 1.99]));
    assert!(!region.contains(&[1.01, 0.0]));
    let distances = region.facet_distances();
    assert_eq!(distances, vec![1.0, 2.0, 1.0, 2.0]);
}

#[test]
fn coordinate_chord_spans_the_region() {
    let region = axis_box(&[-1.0, -2.0], &[3.0, 2.0]).unwrap();
    let slack = region.slack(&[0.0, 0.0]);
    assert_eq!(region.coordinate_chord(&slack, 0), (-1.0, 3.0));
    assert_eq!(region.coordinate_chord(&slack, 1), (-2.0, 2.0));
}

#[test]
fn advance_slack_matches_recomputation() {
    let region = cube(3, 1.0).unwrap();
    let mut slack = region.slack(&[0.1, 0.2, 0.3]);
    region.advance_slack(&mut slack, 1, -0.5);
    let fresh = region.slack(&[0.1, -0.3, 0.3]);
    for (a, b) in slack.iter().zip(fresh.iter()) {
        assert!((a - b).abs() < 1e-12);
    }
}

#[test]
fn linear_transform_rescales_region() {
    let mut region = cube(2, 1.0).unwrap();
    let map = DMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![2.0, 1.0]));
    region.linear_transform(&map).unwrap();
    assert!(region.contains(&[0.49, 0.99]));
    assert!(!region.contains(&[0.51, 0.0]));
}

#[test]
fn singular_transform_is_rejected() {
    let mut region = cube(2, 1.0).unwrap();
    let map = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
    let err = region.linear_transform(&map).unwrap_err();
    assert_eq!(err.info().code, "singular-transform");
}
