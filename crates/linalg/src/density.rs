use crate::{normalize, LinalgError, C64};
use faer::{complex_native::c64, Mat, Side};
use serde::{Deserialize, Serialize};

const HERMITIAN_TOL: f64 = 1e-9;
const TRACE_TOL: f64 = 1e-6;

/// Square complex matrix, row-major, validated as Hermitian with unit trace.
///
/// Positivity is not checked on construction; call
/// [`DensityMatrix::check_positive_semidefinite`] when the source is untrusted.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityMatrix {
    dim: usize,
    data: Vec<C64>,
}

impl DensityMatrix {
    pub fn from_entries(dim: usize, data: Vec<C64>) -> Result<Self, LinalgError> {
        if dim == 0 {
            return Err(LinalgError::Empty);
        }
        if data.len() != dim * dim {
            return Err(LinalgError::ShapeMismatch {
                dim,
                entries: data.len(),
            });
        }
        if let Some(k) = data.iter().position(|z| !(z.re.is_finite() && z.im.is_finite())) {
            return Err(LinalgError::NonFinite {
                row: k / dim,
                col: k % dim,
            });
        }
        let rho = Self { dim, data };
        rho.check_hermitian()?;
        let tr = rho.trace();
        if (tr - 1.0).abs() > TRACE_TOL {
            return Err(LinalgError::Trace(tr));
        }
        Ok(rho)
    }

    pub fn from_rows(rows: Vec<Vec<C64>>) -> Result<Self, LinalgError> {
        let dim = rows.len();
        let mut data = Vec::with_capacity(dim * dim);
        for row in rows {
            if row.len() != dim {
                return Err(LinalgError::NotSquare {
                    rows: dim,
                    expected: dim,
                    found: row.len(),
                });
            }
            data.extend(row);
        }
        Self::from_entries(dim, data)
    }

    /// `|psi><psi|` for the normalized copy of `psi`.
    pub fn pure(psi: &[C64]) -> Result<Self, LinalgError> {
        Self::mixture(&[(1.0, psi)])
    }

    /// `sum_i p_i |psi_i><psi_i|`, each `psi_i` normalized first.
    pub fn mixture(terms: &[(f64, &[C64])]) -> Result<Self, LinalgError> {
        let dim = terms.first().map(|(_, psi)| psi.len()).ok_or(LinalgError::Empty)?;
        let mut data = vec![C64::new(0.0, 0.0); dim * dim];
        for &(p, psi) in terms {
            if psi.len() != dim {
                return Err(LinalgError::ShapeMismatch {
                    dim,
                    entries: psi.len(),
                });
            }
            let mut v = psi.to_vec();
            normalize(&mut v);
            for r in 0..dim {
                for c in 0..dim {
                    data[r * dim + c] += v[r] * v[c].conj() * p;
                }
            }
        }
        Self::from_entries(dim, data)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> C64 {
        self.data[row * self.dim + col]
    }

    /// Row-major entries.
    pub fn entries(&self) -> &[C64] {
        &self.data
    }

    pub fn trace(&self) -> f64 {
        (0..self.dim).map(|i| self.get(i, i).re).sum()
    }

    /// Eigenvalues in ascending order.
    pub fn eigenvalues(&self) -> Vec<f64> {
        let m = Mat::<c64>::from_fn(self.dim, self.dim, |i, j| {
            let z = self.get(i, j);
            c64::new(z.re, z.im)
        });
        let mut ev = m.selfadjoint_eigenvalues(Side::Lower);
        ev.sort_by(|a, b| a.total_cmp(b));
        ev
    }

    pub fn check_positive_semidefinite(&self, tol: f64) -> Result<(), LinalgError> {
        let min = self.eigenvalues().first().copied().unwrap_or(0.0);
        if !(min >= -tol) {
            return Err(LinalgError::NotPositive(min));
        }
        Ok(())
    }

    /// Number of eigenvalues above `tol`.
    pub fn rank(&self, tol: f64) -> usize {
        self.eigenvalues().into_iter().filter(|&l| l > tol).count()
    }

    fn check_hermitian(&self) -> Result<(), LinalgError> {
        for r in 0..self.dim {
            for c in r..self.dim {
                let deviation = (self.get(r, c) - self.get(c, r).conj()).norm();
                if deviation > HERMITIAN_TOL {
                    return Err(LinalgError::NotHermitian {
                        row: r,
                        col: c,
                        deviation,
                    });
                }
            }
        }
        Ok(())
    }
}

/// On-disk matrix: real and (optional) imaginary parts as nested rows.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatrixFile {
    pub re: Vec<Vec<f64>>,
    #[serde(default)]
    pub im: Option<Vec<Vec<f64>>>,
}

impl MatrixFile {
    pub fn into_density(self) -> Result<DensityMatrix, LinalgError> {
        let dim = self.re.len();
        let mut rows = Vec::with_capacity(dim);
        for (r, re_row) in self.re.into_iter().enumerate() {
            let im_row = match &self.im {
                Some(im) => {
                    let row = im.get(r).ok_or(LinalgError::NotSquare {
                        rows: dim,
                        expected: dim,
                        found: 0,
                    })?;
                    if row.len() != re_row.len() {
                        return Err(LinalgError::NotSquare {
                            rows: dim,
                            expected: re_row.len(),
                            found: row.len(),
                        });
                    }
                    row.clone()
                }
                None => vec![0.0; re_row.len()],
            };
            rows.push(
                re_row
                    .into_iter()
                    .zip(im_row)
                    .map(|(a, b)| C64::new(a, b))
                    .collect(),
            );
        }
        DensityMatrix::from_rows(rows)
    }

    pub fn from_density(rho: &DensityMatrix) -> Self {
        let n = rho.dim();
        let re = (0..n).map(|r| (0..n).map(|c| rho.get(r, c).re).collect()).collect();
        let im = (0..n).map(|r| (0..n).map(|c| rho.get(r, c).im).collect()).collect();
        Self { re, im: Some(im) }
    }
}
