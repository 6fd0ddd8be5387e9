use thiserror::Error;

/// Errors raised at the linear-algebra boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LinalgError {
    #[error("real vector length must be even, got {0}")]
    OddLength(usize),

    #[error("matrix is not square: {rows} rows, expected {expected} entries per row, found a row with {found}")]
    NotSquare {
        rows: usize,
        expected: usize,
        found: usize,
    },

    #[error("matrix has {entries} entries, which is not {dim}x{dim}")]
    ShapeMismatch { dim: usize, entries: usize },

    #[error("matrix is not Hermitian: |rho[{row}][{col}] - conj(rho[{col}][{row}])| = {deviation:.3e}")]
    NotHermitian {
        row: usize,
        col: usize,
        deviation: f64,
    },

    #[error("matrix entry [{row}][{col}] is not finite")]
    NonFinite { row: usize, col: usize },

    #[error("trace must be 1, got {0:.9}")]
    Trace(f64),

    #[error("matrix is not positive semidefinite: smallest eigenvalue {0:.3e}")]
    NotPositive(f64),

    #[error("matrix must not be empty")]
    Empty,
}
