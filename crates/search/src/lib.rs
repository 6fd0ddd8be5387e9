//! Multi-start estimation of the mixed-state three-tangle.
//!
//! The convex roof is approximated by minimizing the average pure-state
//! tangle over decompositions of `rho` from `starts` random initial
//! decompositions and keeping the smallest converged value. The result is an
//! upper bound on the infimum that can only tighten as `starts` grows; it is
//! a Monte Carlo estimate, not an exact value.

mod config;
mod driver;
mod error;
mod outcome;
pub mod start;

pub use config::SearchConfig;
pub use driver::MultiStart;
pub use error::SearchError;
pub use outcome::{SearchReport, StartOutcome};

use linalg::DensityMatrix;
use optim::AugmentedLagrangian;

/// Runs the search with the bundled solver configured by `config.solver`.
pub fn estimate(rho: &DensityMatrix, config: &SearchConfig) -> Result<SearchReport, SearchError> {
    let solver = AugmentedLagrangian::new(config.solver.clone());
    MultiStart::new(config.clone(), solver)?.run(rho)
}
