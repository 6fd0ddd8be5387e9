//! Closed-form three-tangle of a three-qubit pure state.
//!
//! With amplitudes `a0..a7` in the order |000>, |001>, ..., |111>:
//!
//! ```text
//! d1  = a0²a7² + a1²a6² + a2²a5² + a4²a3²
//! d2  = a0a7a3a4 + a0a7a5a2 + a0a7a6a1 + a3a4a5a2 + a3a4a6a1 + a5a2a6a1
//! d3  = a0a6a5a3 + a7a1a2a4
//! tau = 4 |d1 - 2 d2 + 4 d3|
//! ```

use linalg::C64;

/// Monomials of `d1 - 2 d2 + 4 d3` as (coefficient, amplitude indices).
const HYPERDET: [(f64, [usize; 4]); 12] = [
    (1.0, [0, 0, 7, 7]),
    (1.0, [1, 1, 6, 6]),
    (1.0, [2, 2, 5, 5]),
    (1.0, [4, 4, 3, 3]),
    (-2.0, [0, 7, 3, 4]),
    (-2.0, [0, 7, 5, 2]),
    (-2.0, [0, 7, 6, 1]),
    (-2.0, [3, 4, 5, 2]),
    (-2.0, [3, 4, 6, 1]),
    (-2.0, [5, 2, 6, 1]),
    (4.0, [0, 6, 5, 3]),
    (4.0, [7, 1, 2, 4]),
];

/// Cayley hyperdeterminant polynomial `d1 - 2 d2 + 4 d3`.
pub fn hyperdeterminant(phi: &[C64; 8]) -> C64 {
    HYPERDET
        .iter()
        .map(|&(coef, [i, j, k, l])| phi[i] * phi[j] * phi[k] * phi[l] * coef)
        .sum()
}

pub fn three_tangle(phi: &[C64; 8]) -> f64 {
    4.0 * hyperdeterminant(phi).norm()
}

/// Three-tangle and its gradient with respect to `(Re phi, Im phi)`, laid out
/// as the 8 real-part derivatives followed by the 8 imaginary-part ones.
///
/// Where the hyperdeterminant vanishes the modulus is not differentiable and
/// the zero subgradient is returned.
pub fn three_tangle_gradient(phi: &[C64; 8], grad: &mut [f64; 16]) -> f64 {
    let zero = C64::new(0.0, 0.0);
    let mut value = zero;
    let mut dg = [zero; 8];

    for &(coef, idx) in HYPERDET.iter() {
        let f = [phi[idx[0]], phi[idx[1]], phi[idx[2]], phi[idx[3]]];
        value += f[0] * f[1] * f[2] * f[3] * coef;
        for p in 0..4 {
            let mut rest = C64::new(coef, 0.0);
            for (q, fq) in f.iter().enumerate() {
                if q != p {
                    rest *= *fq;
                }
            }
            dg[idx[p]] += rest;
        }
    }

    let modulus = value.norm();
    if modulus == 0.0 {
        grad.fill(0.0);
        return 0.0;
    }

    // d|g|/d(re) = Re(conj(g) g') / |g|, d|g|/d(im) = -Im(conj(g) g') / |g|
    let unit = value.conj() / modulus;
    for m in 0..8 {
        let w = unit * dg[m];
        grad[m] = 4.0 * w.re;
        grad[8 + m] = -4.0 * w.im;
    }
    4.0 * modulus
}
