use crate::lbfgs::{self, InnerSettings, Merit};
use crate::{Problem, Solution, Solver, SolverError, SolverOptions, Status};
use tracing::debug;

const PENALTY_GROWTH: f64 = 10.0;
const MAX_PENALTY: f64 = 1e8;
const MAX_MULTIPLIER: f64 = 1e10;
const REQUIRED_PROGRESS: f64 = 0.5;
const TOLERANCE_SHRINK: f64 = 0.1;

/// Augmented Lagrangian for range constraints over a box.
///
/// Each major iteration approximately minimizes
///
/// ```text
/// f(x) + sum_j psi_j(c_j(x))    subject to  l <= x <= u
/// ```
///
/// with projected limited-memory BFGS, where `psi_j` is the shifted quadratic
/// penalty of the range `[lo_j, hi_j]`. Multipliers are then updated and the
/// penalty grows whenever the combined infeasibility and complementarity
/// measure fails to halve. Box bounds are never penalized: iterates stay on
/// the box and may sit exactly on a bound.
#[derive(Clone, Debug, Default)]
pub struct AugmentedLagrangian {
    options: SolverOptions,
}

impl AugmentedLagrangian {
    pub fn new(options: SolverOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }
}

struct LagrangianMerit<'a> {
    problem: &'a Problem,
    lambda: &'a [f64],
    mu: f64,
    residuals: Vec<f64>,
    weights: Vec<f64>,
}

impl<'a> LagrangianMerit<'a> {
    fn new(problem: &'a Problem, lambda: &'a [f64], mu: f64) -> Self {
        let m = problem.constraint_dim();
        Self {
            problem,
            lambda,
            mu,
            residuals: vec![0.0; m],
            weights: vec![0.0; m],
        }
    }
}

impl Merit for LagrangianMerit<'_> {
    fn eval(&mut self, x: &[f64], grad: &mut [f64]) -> f64 {
        let objective = self.problem.objective();
        let mut value = objective.value(x);
        objective.gradient(x, grad);

        self.problem.residuals(x, &mut self.residuals);
        let mut off = 0;
        for c in self.problem.constraints() {
            let m = c.dim();
            for j in 0..m {
                let k = off + j;
                let s = self.residuals[k] + self.lambda[k] / self.mu;
                let d = s - s.clamp(c.lower()[j], c.upper()[j]);
                value += 0.5 * self.mu * d * d - self.lambda[k] * self.lambda[k] / (2.0 * self.mu);
                self.weights[k] = self.mu * d;
            }
            c.func().accumulate_jtw(x, &self.weights[off..off + m], grad);
            off += m;
        }

        value
    }
}

impl Solver for AugmentedLagrangian {
    fn minimize(&self, problem: &Problem, x0: &[f64]) -> Result<Solution, SolverError> {
        let opts = &self.options;
        opts.validate()?;

        let n = problem.dim();
        if x0.len() != n {
            return Err(SolverError::DimensionMismatch {
                what: "starting point",
                expected: n,
                found: x0.len(),
            });
        }
        if x0.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::NonFinite {
                stage: "starting point",
            });
        }
        let bounds = problem.bounds();
        for (index, &value) in x0.iter().enumerate() {
            if value < bounds.lower()[index] || value > bounds.upper()[index] {
                return Err(SolverError::OutsideBounds { index, value });
            }
        }

        let mut x = x0.to_vec();
        let m = problem.constraint_dim();
        let mut lambda = vec![0.0; m];
        let mut residuals = vec![0.0; m];
        let mut mu = opts.initial_constr_penalty;
        let mut radius = opts.initial_tr_radius;
        let mut prev_measure = f64::INFINITY;
        let mut inner_iterations = 0;
        let mut iterations = 0;
        let mut status = Status::MaxIterations;
        let mut settings = InnerSettings {
            tol: opts.initial_barrier_tolerance.max(opts.gtol),
            max_iter: opts.max_inner_iter,
            memory: opts.lbfgs_memory,
            active_tol: opts.initial_barrier_parameter,
            log_steps: opts.verbose >= 3,
        };

        for major in 1..=opts.maxiter {
            iterations = major;
            let x_prev = x.clone();

            let inner = {
                let mut merit = LagrangianMerit::new(problem, &lambda, mu);
                lbfgs::minimize(&mut merit, &mut x, bounds, &settings, &mut radius)?
            };
            inner_iterations += inner.iterations;

            problem.residuals(&x, &mut residuals);
            if residuals.iter().any(|r| !r.is_finite()) {
                return Err(SolverError::NonFinite {
                    stage: "constraint residual",
                });
            }
            let violation = problem.violation_of(&residuals);

            // |c - proj(c + lambda/mu)| vanishes only when c is feasible and
            // lambda is zero unless c sits on its range boundary
            let mut measure: f64 = 0.0;
            let mut off = 0;
            for c in problem.constraints() {
                for j in 0..c.dim() {
                    let k = off + j;
                    let (lo, hi) = (c.lower()[j], c.upper()[j]);
                    let s = residuals[k] + lambda[k] / mu;
                    measure = measure.max((residuals[k] - s.clamp(lo, hi)).abs());
                    lambda[k] = (mu * (s - s.clamp(lo, hi))).clamp(-MAX_MULTIPLIER, MAX_MULTIPLIER);
                }
                off += c.dim();
            }
            if measure > REQUIRED_PROGRESS * prev_measure {
                mu = (mu * PENALTY_GROWTH).min(MAX_PENALTY);
            }
            prev_measure = measure;

            let step = x
                .iter()
                .zip(&x_prev)
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                .sqrt();

            if opts.verbose >= 2 {
                debug!(
                    major,
                    objective = problem.objective().value(&x),
                    violation,
                    penalty = mu,
                    step,
                    inner = inner.iterations,
                    projected_gradient = inner.pg_norm,
                    inner_converged = inner.converged,
                    "major iteration"
                );
            }

            let feasible = violation <= opts.barrier_tol;
            if feasible && inner.converged {
                if settings.tol <= opts.gtol {
                    status = Status::Converged;
                    break;
                }
                if step < opts.xtol {
                    status = Status::StepTolerance;
                    break;
                }
            }

            settings.tol = (settings.tol * TOLERANCE_SHRINK).max(opts.gtol);
        }

        let fun = problem.objective().value(&x);
        if !fun.is_finite() {
            return Err(SolverError::NonFinite { stage: "objective" });
        }
        let constraint_violation = problem.max_violation(&x);

        if opts.verbose >= 1 {
            debug!(
                ?status,
                fun,
                constraint_violation,
                iterations,
                inner_iterations,
                "solver finished"
            );
        }

        Ok(Solution {
            x,
            fun,
            status,
            iterations,
            inner_iterations,
            constraint_violation,
        })
    }
}
