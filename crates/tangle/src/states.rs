//! Reference three-qubit states.

use crate::TangleError;
use linalg::{DensityMatrix, C64};

/// Computational basis state `|bits>`, `bits` in `0..8`.
pub fn basis(bits: usize) -> [C64; 8] {
    let mut phi = [C64::new(0.0, 0.0); 8];
    phi[bits % 8] = C64::new(1.0, 0.0);
    phi
}

/// (|000> + |111>) / sqrt(2)
pub fn ghz() -> [C64; 8] {
    let s = 1.0 / 2.0_f64.sqrt();
    let mut phi = [C64::new(0.0, 0.0); 8];
    phi[0] = C64::new(s, 0.0);
    phi[7] = C64::new(s, 0.0);
    phi
}

/// (|001> + |010> + |100>) / sqrt(3)
pub fn w() -> [C64; 8] {
    let s = 1.0 / 3.0_f64.sqrt();
    let mut phi = [C64::new(0.0, 0.0); 8];
    phi[1] = C64::new(s, 0.0);
    phi[2] = C64::new(s, 0.0);
    phi[4] = C64::new(s, 0.0);
    phi
}

/// `p |GHZ><GHZ| + (1 - p) |W><W|`.
pub fn ghz_w_mixture(p: f64) -> Result<DensityMatrix, TangleError> {
    let (g, w) = (ghz(), w());
    Ok(DensityMatrix::mixture(&[(p, &g[..]), (1.0 - p, &w[..])])?)
}
