use crate::SolverError;
use serde::{Deserialize, Serialize};

/// Tunables for [`crate::AugmentedLagrangian`].
///
/// Field names follow the usual trust-region interior-point vocabulary so
/// configurations written for such a solver load unchanged; the comments give
/// each field's role here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Final tolerance on the inner projected gradient (infinity norm).
    pub gtol: f64,
    /// Major-step tolerance.
    pub xtol: f64,
    /// Largest constraint violation accepted as feasible.
    pub barrier_tol: f64,
    /// Major iterations.
    pub maxiter: usize,
    /// Initial cap on the length of an inner step.
    pub initial_tr_radius: f64,
    /// Initial augmented-Lagrangian penalty.
    pub initial_constr_penalty: f64,
    /// Distance to a bound within which a variable pushed outward by the
    /// gradient is held fixed.
    pub initial_barrier_parameter: f64,
    /// Inner gradient tolerance used by the first major iteration.
    pub initial_barrier_tolerance: f64,
    /// Inner iterations per major iteration.
    pub max_inner_iter: usize,
    /// Correction pairs kept by the quasi-Newton update.
    pub lbfgs_memory: usize,
    /// 0 silent, 1 summary, 2 per major iteration, 3 per inner iteration.
    pub verbose: u8,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            gtol: 1e-8,
            xtol: 1e-8,
            barrier_tol: 1e-8,
            maxiter: 200,
            initial_tr_radius: 1.0,
            initial_constr_penalty: 1.0,
            initial_barrier_parameter: 1e-8,
            initial_barrier_tolerance: 1.0,
            max_inner_iter: 100,
            lbfgs_memory: 10,
            verbose: 0,
        }
    }
}

impl SolverOptions {
    pub fn validate(&self) -> Result<(), SolverError> {
        let positive = [
            ("gtol", self.gtol),
            ("xtol", self.xtol),
            ("barrier_tol", self.barrier_tol),
            ("initial_tr_radius", self.initial_tr_radius),
            ("initial_constr_penalty", self.initial_constr_penalty),
            ("initial_barrier_tolerance", self.initial_barrier_tolerance),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(SolverError::InvalidOption(format!(
                    "{name} must be finite and > 0, got {v}"
                )));
            }
        }
        if !(self.initial_barrier_parameter.is_finite() && self.initial_barrier_parameter >= 0.0) {
            return Err(SolverError::InvalidOption(format!(
                "initial_barrier_parameter must be finite and >= 0, got {}",
                self.initial_barrier_parameter
            )));
        }
        if self.maxiter == 0 || self.max_inner_iter == 0 {
            return Err(SolverError::InvalidOption(
                "maxiter and max_inner_iter must be > 0".into(),
            ));
        }
        if self.lbfgs_memory == 0 {
            return Err(SolverError::InvalidOption("lbfgs_memory must be > 0".into()));
        }
        Ok(())
    }
}
