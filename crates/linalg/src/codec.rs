//! Interleaved real/imaginary halves <-> complex vectors.
//!
//! A complex vector `w` of length `k` is stored as `2k` reals: the `k` real
//! parts followed by the `k` imaginary parts.

use crate::{LinalgError, C64};

pub fn to_complex(real: &[f64]) -> Result<Vec<C64>, LinalgError> {
    if real.len() % 2 != 0 {
        return Err(LinalgError::OddLength(real.len()));
    }
    let k = real.len() / 2;
    Ok((0..k).map(|i| C64::new(real[i], real[k + i])).collect())
}

pub fn to_real(complex: &[C64]) -> Vec<f64> {
    let mut out = vec![0.0; 2 * complex.len()];
    write_real(complex, &mut out);
    out
}

/// Allocation-free [`to_real`]; `out.len()` must be `2 * complex.len()`.
pub fn write_real(complex: &[C64], out: &mut [f64]) {
    let k = complex.len();
    debug_assert_eq!(out.len(), 2 * k);
    for (i, z) in complex.iter().enumerate() {
        out[i] = z.re;
        out[k + i] = z.im;
    }
}

/// Allocation-free [`to_complex`]; `real.len()` must be `2 * out.len()`.
pub fn read_complex_into(real: &[f64], out: &mut [C64]) {
    let k = out.len();
    debug_assert_eq!(real.len(), 2 * k);
    for (i, z) in out.iter_mut().enumerate() {
        *z = C64::new(real[i], real[k + i]);
    }
}
