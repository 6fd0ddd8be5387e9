use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("empty bound range at index {index}: [{lower}, {upper}]")]
    InvalidBounds { index: usize, lower: f64, upper: f64 },

    #[error("starting point x0[{index}] = {value} lies outside its bounds")]
    OutsideBounds { index: usize, value: f64 },

    #[error("non-finite {stage} encountered")]
    NonFinite { stage: &'static str },

    #[error("invalid solver option: {0}")]
    InvalidOption(String),
}
