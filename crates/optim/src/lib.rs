//! Contract between a problem and a constrained nonlinear solver, plus one
//! solver implementation.
//!
//! A [`Problem`] bundles an [`Objective`], box [`Bounds`] and a list of
//! [`NonlinearConstraint`] blocks whose residuals must stay inside
//! per-component ranges. Anything implementing [`Solver`] can minimize it.

mod augmented;
mod error;
pub mod fd;
mod lbfgs;
mod options;
mod problem;

pub use augmented::AugmentedLagrangian;
pub use error::SolverError;
pub use options::SolverOptions;
pub use problem::{Bounds, ConstraintFn, NonlinearConstraint, Objective, Problem};

/// How a solver run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Stationarity and feasibility tolerances met.
    Converged,
    /// Feasible, inner problem solved, and the last major step was shorter
    /// than `xtol`.
    StepTolerance,
    /// Major iteration budget exhausted.
    MaxIterations,
}

#[derive(Clone, Debug)]
pub struct Solution {
    pub x: Vec<f64>,
    /// Objective value at `x`.
    pub fun: f64,
    pub status: Status,
    /// Major iterations performed.
    pub iterations: usize,
    /// Inner (quasi-Newton) iterations summed over all major iterations.
    pub inner_iterations: usize,
    /// Largest distance of any constraint residual outside its range.
    pub constraint_violation: f64,
}

pub trait Solver {
    fn minimize(&self, problem: &Problem, x0: &[f64]) -> Result<Solution, SolverError>;
}

impl<S: Solver + ?Sized> Solver for &S {
    fn minimize(&self, problem: &Problem, x0: &[f64]) -> Result<Solution, SolverError> {
        (**self).minimize(problem, x0)
    }
}
