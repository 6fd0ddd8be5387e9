use crate::start::start_point;
use crate::{SearchConfig, SearchError, SearchReport, StartOutcome};
use linalg::DensityMatrix;
use optim::{Problem, Solver};
use rayon::prelude::*;
use tangle::{decomposition_problem, Layout};
use tracing::{debug, info, warn};

/// Runs one solver call per random start and reduces by minimum.
pub struct MultiStart<S> {
    config: SearchConfig,
    solver: S,
}

impl<S: Solver + Sync> MultiStart<S> {
    pub fn new(config: SearchConfig, solver: S) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self { config, solver })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn run(&self, rho: &DensityMatrix) -> Result<SearchReport, SearchError> {
        let layout = Layout::new(self.config.nc, self.config.np)?;
        let problem = decomposition_problem(layout, rho, self.config.slack)?;
        self.run_problem(layout, &problem)
    }

    /// Searches an arbitrary problem over decomposition-shaped vectors.
    pub fn run_problem(&self, layout: Layout, problem: &Problem) -> Result<SearchReport, SearchError> {
        if problem.dim() != layout.dim() {
            return Err(SearchError::ProblemDimension {
                expected: layout.dim(),
                found: problem.dim(),
            });
        }

        let n = self.config.starts;
        let outcomes: Vec<StartOutcome> = match self.config.threads {
            1 => (0..n).map(|k| self.run_start(k, layout, problem)).collect(),
            0 => (0..n)
                .into_par_iter()
                .map(|k| self.run_start(k, layout, problem))
                .collect(),
            t => rayon::ThreadPoolBuilder::new()
                .num_threads(t)
                .build()?
                .install(|| {
                    (0..n)
                        .into_par_iter()
                        .map(|k| self.run_start(k, layout, problem))
                        .collect()
                }),
        };

        let report = SearchReport::from_outcomes(outcomes);
        match report.best() {
            Some(best) => info!(
                starts = n,
                converged = report.converged(),
                discarded = report.discarded(),
                failed = report.failed(),
                best,
                best_start = ?report.best_start(),
                "multi-start search finished"
            ),
            None => warn!(
                starts = n,
                discarded = report.discarded(),
                failed = report.failed(),
                "no start produced a feasible non-negative minimum"
            ),
        }
        Ok(report)
    }

    fn run_start(&self, k: usize, layout: Layout, problem: &Problem) -> StartOutcome {
        let x0 = start_point(&self.config.seed, k, layout);

        let sol = match self.solver.minimize(problem, &x0) {
            Ok(sol) => sol,
            Err(error) => {
                debug!(start = k, %error, "solver failed");
                return StartOutcome::Failed { error };
            }
        };

        if sol.fun < 0.0 {
            debug!(start = k, value = sol.fun, "negative minimum discarded");
            return StartOutcome::Negative { value: sol.fun };
        }
        if sol.constraint_violation > self.config.feasibility_tol {
            debug!(
                start = k,
                value = sol.fun,
                violation = sol.constraint_violation,
                "infeasible minimum discarded"
            );
            return StartOutcome::Infeasible {
                value: sol.fun,
                violation: sol.constraint_violation,
            };
        }

        debug!(
            start = k,
            value = sol.fun,
            status = ?sol.status,
            iterations = sol.iterations,
            "start converged"
        );
        StartOutcome::Converged {
            value: sol.fun,
            status: sol.status,
            iterations: sol.iterations,
            x: sol.x,
        }
    }
}
