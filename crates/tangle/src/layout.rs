use crate::TangleError;
use linalg::{codec, C64};
use std::ops::Range;

/// Amplitude count of a three-qubit state.
pub const THREE_QUBITS: usize = 8;

/// Terms sufficient for the optimal decomposition of the states of interest.
pub const DEFAULT_TERMS: usize = 4;

/// Shape of the flat decomposition vector.
///
/// `x[0..np]` are the weights; state `i` occupies `2 * nc` entries starting at
/// `np + 2 * nc * i`, real parts first, then imaginary parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    nc: usize,
    np: usize,
}

impl Layout {
    pub fn new(nc: usize, np: usize) -> Result<Self, TangleError> {
        if nc != THREE_QUBITS {
            return Err(TangleError::UnsupportedDimension(nc));
        }
        if np == 0 {
            return Err(TangleError::NoTerms);
        }
        Ok(Self { nc, np })
    }

    pub fn three_qubits(np: usize) -> Result<Self, TangleError> {
        Self::new(THREE_QUBITS, np)
    }

    /// State dimension.
    pub fn nc(&self) -> usize {
        self.nc
    }

    /// Number of decomposition terms.
    pub fn np(&self) -> usize {
        self.np
    }

    /// Length of the flat parameter vector.
    pub fn dim(&self) -> usize {
        self.np + 2 * self.nc * self.np
    }

    pub fn weights<'a>(&self, x: &'a [f64]) -> &'a [f64] {
        &x[..self.np]
    }

    pub fn state_range(&self, i: usize) -> Range<usize> {
        let start = self.np + 2 * self.nc * i;
        start..start + 2 * self.nc
    }

    /// Index of `Re c_i[k]` in the flat vector; `Im c_i[k]` sits `nc` later.
    #[inline]
    pub fn re_index(&self, i: usize, k: usize) -> usize {
        self.np + 2 * self.nc * i + k
    }

    #[inline]
    pub fn im_index(&self, i: usize, k: usize) -> usize {
        self.re_index(i, k) + self.nc
    }

    pub fn read_state(&self, x: &[f64], i: usize, out: &mut [C64]) {
        codec::read_complex_into(&x[self.state_range(i)], out);
    }

    /// Builds a parameter vector from explicit weights and states.
    pub fn pack(&self, weights: &[f64], states: &[Vec<C64>]) -> Result<Vec<f64>, TangleError> {
        if weights.len() != self.np || states.len() != self.np {
            return Err(TangleError::ParameterLength {
                expected: self.np,
                found: weights.len().min(states.len()),
            });
        }
        let mut x = vec![0.0; self.dim()];
        x[..self.np].copy_from_slice(weights);
        for (i, c) in states.iter().enumerate() {
            if c.len() != self.nc {
                return Err(TangleError::UnsupportedDimension(c.len()));
            }
            codec::write_real(c, &mut x[self.state_range(i)]);
        }
        Ok(x)
    }

    /// Splits a parameter vector into weights and states.
    pub fn unpack(&self, x: &[f64]) -> Result<(Vec<f64>, Vec<Vec<C64>>), TangleError> {
        if x.len() != self.dim() {
            return Err(TangleError::ParameterLength {
                expected: self.dim(),
                found: x.len(),
            });
        }
        let states = (0..self.np)
            .map(|i| codec::to_complex(&x[self.state_range(i)]))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((self.weights(x).to_vec(), states))
    }
}
