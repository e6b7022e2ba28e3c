use gcool_core::Region;
use gcool_poly::{canonical_hash, polytope_from_json, polytope_to_json, unit_simplex};

#[test]
fn polytope_round_trip_json() {
    let simplex = unit_simplex(3).unwrap();
    let json = polytope_to_json(&simplex).unwrap();
    let decoded = polytope_from_json(&json).unwrap();
    assert_eq!(decoded, simplex);
    assert_eq!(canonical_hash(&decoded), canonical_hash(&simplex));
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = polytope_from_json("{\"rows\": 3}").unwrap_err();
    assert_eq!(err.info().code, "deserialize-json");
}

#[test]
fn hash_tracks_shifts() {
    let mut simplex = unit_simplex(2).unwrap();
    let before = canonical_hash(&simplex);
    simplex.shift(&[0.1, 0.1]);
    assert_ne!(before, canonical_hash(&simplex));
    assert_eq!(before.len(), 64);
}
