#![deny(missing_docs)]

//! Halfspace-form convex polytopes implementing the `gcool-core` region contract.

mod generators;
mod hash;
mod lp;
mod polytope;
mod serialization;

pub use generators::{axis_box, cross_polytope, cube, unit_simplex};
pub use hash::canonical_hash;
pub use polytope::HPolytope;
pub use serialization::{polytope_from_json, polytope_to_json};
