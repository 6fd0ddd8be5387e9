use linalg::LinalgError;
use optim::SolverError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TangleError {
    /// The hyperdeterminant formula is defined for three qubits only.
    #[error("state dimension must be 8 (three qubits), got {0}")]
    UnsupportedDimension(usize),

    #[error("a decomposition needs at least one term")]
    NoTerms,

    #[error("density matrix is {found}x{found}, expected {expected}x{expected}")]
    MatrixDimension { expected: usize, found: usize },

    #[error("parameter vector has length {found}, expected {expected}")]
    ParameterLength { expected: usize, found: usize },

    #[error(transparent)]
    Linalg(#[from] LinalgError),

    #[error("problem construction failed: {0}")]
    Problem(#[from] SolverError),
}
