use gcool_core::{gaussian_weight, RngHandle};
use rand::Rng;
use rand_distr::StandardNormal;

const SHARPNESS_TOL: f64 = 1e-8;
const NORMAL_ATTEMPTS: usize = 1000;

/// Draws from the density `∝ exp(-a·x²)` restricted to `[lo, hi]`.
///
/// Wide intervals use rejection from the untruncated normal; narrow ones
/// (and `a = 0`) use a uniform proposal under the weight's maximum on the
/// interval.
pub fn sample_truncated_gaussian(lo: f64, hi: f64, a: f64, rng: &mut RngHandle) -> f64 {
    if hi <= lo {
        return lo;
    }
    if a > SHARPNESS_TOL && hi - lo >= 2.0 / (2.0 * a).sqrt() {
        let sigma = 1.0 / (2.0 * a).sqrt();
        for _ in 0..NORMAL_ATTEMPTS {
            let z: f64 = rng.sample(StandardNormal);
            let x = z * sigma;
            if x >= lo && x <= hi {
                return x;
            }
        }
    }
    let peak = if lo <= 0.0 && hi >= 0.0 {
        1.0
    } else {
        let nearest = if hi < 0.0 { hi } else { lo };
        gaussian_weight(&[nearest], a)
    };
    loop {
        let u: f64 = rng.gen();
        let x = lo + u * (hi - lo);
        let threshold = peak * rng.gen::<f64>();
        if threshold <= gaussian_weight(&[x], a) {
            return x;
        }
    }
}
