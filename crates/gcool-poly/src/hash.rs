use gcool_core::Region;
use sha2::{Digest, Sha256};

use crate::polytope::HPolytope;

/// Computes the canonical hash of the constraint data.
///
/// Hashes the exact bit patterns, so any shift or transform changes the hash.
pub fn canonical_hash(polytope: &HPolytope) -> String {
    let mut hasher = Sha256::new();
    hasher.update((polytope.dimension() as u64).to_le_bytes());
    hasher.update((polytope.num_constraints() as u64).to_le_bytes());
    for row in polytope.rows() {
        update_slice(&row, &mut hasher);
    }
    update_slice(polytope.offsets().as_slice(), &mut hasher);
    format!("{:x}", hasher.finalize())
}

fn update_slice(values: &[f64], hasher: &mut Sha256) {
    hasher.update((values.len() as u64).to_le_bytes());
    for value in values {
        hasher.update(value.to_bits().to_le_bytes());
    }
}
