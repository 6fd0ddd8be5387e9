pub mod constraints;
mod error;
pub mod layout;
pub mod objective;
pub mod pure;
pub mod states;

pub use error::TangleError;
pub use layout::Layout;

use linalg::DensityMatrix;
use optim::Problem;

/// Default constraint slack.
pub const DEFAULT_SLACK: f64 = 1e-30;

/// Minimization of the average pure-state tangle over decompositions of `rho`
/// with `layout.np()` terms, each constraint block held within `[-eps, eps]`.
pub fn decomposition_problem(
    layout: Layout,
    rho: &DensityMatrix,
    eps: f64,
) -> Result<Problem, TangleError> {
    let constraints = constraints::constraint_set(layout, rho, eps)?;
    let problem = Problem::new(
        Box::new(objective::DecompositionObjective::new(layout)),
        constraints::bounds(layout)?,
        constraints,
    )?;
    Ok(problem)
}
