pub mod codec;
pub mod density;
mod error;

pub use density::{DensityMatrix, MatrixFile};
pub use error::LinalgError;

use num_complex::Complex64;

pub type C64 = Complex64;

/// Squared Euclidean norm of a complex vector.
pub fn norm_sqr(v: &[C64]) -> f64 {
    v.iter().map(|z| z.norm_sqr()).sum()
}

/// Scales `v` to unit norm. A zero vector is left untouched.
pub fn normalize(v: &mut [C64]) {
    let n = norm_sqr(v).sqrt();
    if n == 0.0 {
        return;
    }
    for z in v.iter_mut() {
        *z /= n;
    }
}
