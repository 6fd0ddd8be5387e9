//! Projected limited-memory BFGS on a box.
//!
//! A variable sitting on one of its bounds while the gradient pushes it
//! outward is held fixed for the iteration. The quasi-Newton direction moves
//! the remaining variables and every trial point is projected back onto the
//! box, so bounds are met exactly rather than approached.

use crate::{Bounds, SolverError};
use std::collections::VecDeque;
use tracing::trace;

const ARMIJO_C1: f64 = 1e-4;
const BACKTRACK: f64 = 0.5;
const MAX_BACKTRACKS: usize = 40;
const MIN_CURVATURE: f64 = 1e-12;
const MIN_RADIUS: f64 = 1e-14;
const MAX_RADIUS: f64 = 1e3;

pub(crate) trait Merit {
    /// Value at `x`; writes the gradient into `grad`.
    fn eval(&mut self, x: &[f64], grad: &mut [f64]) -> f64;
}

pub(crate) struct InnerSettings {
    /// Projected-gradient tolerance (infinity norm).
    pub tol: f64,
    pub max_iter: usize,
    pub memory: usize,
    /// Distance to a bound below which an outward-pushed variable is fixed.
    pub active_tol: f64,
    pub log_steps: bool,
}

pub(crate) struct InnerOutcome {
    pub iterations: usize,
    /// Infinity norm of `P(x - g) - x` at the returned point.
    pub pg_norm: f64,
    pub converged: bool,
}

struct History {
    memory: usize,
    s: VecDeque<Vec<f64>>,
    y: VecDeque<Vec<f64>>,
    rho: VecDeque<f64>,
}

impl History {
    fn new(memory: usize) -> Self {
        Self {
            memory,
            s: VecDeque::with_capacity(memory),
            y: VecDeque::with_capacity(memory),
            rho: VecDeque::with_capacity(memory),
        }
    }

    fn is_empty(&self) -> bool {
        self.s.is_empty()
    }

    fn clear(&mut self) {
        self.s.clear();
        self.y.clear();
        self.rho.clear();
    }

    fn push(&mut self, s: Vec<f64>, y: Vec<f64>) {
        let sy = dot(&s, &y);
        if sy <= MIN_CURVATURE {
            return;
        }
        if self.s.len() == self.memory {
            self.s.pop_front();
            self.y.pop_front();
            self.rho.pop_front();
        }
        self.s.push_back(s);
        self.y.push_back(y);
        self.rho.push_back(1.0 / sy);
    }

    /// Two-loop recursion: `-H g`.
    fn direction(&self, grad: &[f64]) -> Vec<f64> {
        let k = self.s.len();
        if k == 0 {
            return grad.iter().map(|&g| -g).collect();
        }

        let mut q = grad.to_vec();
        let mut alpha = vec![0.0; k];
        for i in (0..k).rev() {
            alpha[i] = self.rho[i] * dot(&self.s[i], &q);
            axpy(-alpha[i], &self.y[i], &mut q);
        }

        let yy = dot(&self.y[k - 1], &self.y[k - 1]);
        let gamma = if yy > 1e-30 {
            dot(&self.s[k - 1], &self.y[k - 1]) / yy
        } else {
            1.0
        };
        for v in q.iter_mut() {
            *v *= gamma;
        }

        for i in 0..k {
            let beta = self.rho[i] * dot(&self.y[i], &q);
            axpy(alpha[i] - beta, &self.s[i], &mut q);
        }

        for v in q.iter_mut() {
            *v = -*v;
        }
        q
    }
}

/// Minimizes `merit` over `bounds` starting from `x`, which is first
/// projected onto the box. `radius` caps the step length and carries over
/// between calls.
pub(crate) fn minimize<M: Merit>(
    merit: &mut M,
    x: &mut [f64],
    bounds: &Bounds,
    settings: &InnerSettings,
    radius: &mut f64,
) -> Result<InnerOutcome, SolverError> {
    let n = x.len();
    let (lower, upper) = (bounds.lower(), bounds.upper());
    for i in 0..n {
        x[i] = x[i].clamp(lower[i], upper[i]);
    }

    let mut grad = vec![0.0; n];
    let mut value = merit.eval(x, &mut grad);
    if !value.is_finite() || grad.iter().any(|g| !g.is_finite()) {
        return Err(SolverError::NonFinite { stage: "merit" });
    }

    let mut history = History::new(settings.memory);
    let mut free_grad = vec![0.0; n];
    let mut active = vec![false; n];
    let mut trial = vec![0.0; n];
    let mut trial_grad = vec![0.0; n];
    let mut iterations = 0;

    while iterations < settings.max_iter {
        let pg_norm = projected_gradient_norm(x, &grad, bounds);
        if pg_norm < settings.tol {
            return Ok(InnerOutcome {
                iterations,
                pg_norm,
                converged: true,
            });
        }
        iterations += 1;

        for i in 0..n {
            active[i] = (x[i] - lower[i] <= settings.active_tol && grad[i] > 0.0)
                || (upper[i] - x[i] <= settings.active_tol && grad[i] < 0.0);
            free_grad[i] = if active[i] { 0.0 } else { grad[i] };
        }

        let mut d = history.direction(&free_grad);
        mask(&mut d, &active);
        let mut slope = dot(&grad, &d);
        if !(slope < 0.0) {
            history.clear();
            d = free_grad.iter().map(|&g| -g).collect();
            slope = dot(&grad, &d);
        }
        if !(slope < 0.0) {
            // only outward-pushed variables left, all within active_tol of their bound
            return Ok(InnerOutcome {
                iterations,
                pg_norm,
                converged: true,
            });
        }

        let d_norm = dot(&d, &d).sqrt();
        let cap = if d_norm > *radius { *radius / d_norm } else { 1.0 };
        let mut alpha = cap;

        let mut accepted = None;
        for backtracks in 0..MAX_BACKTRACKS {
            for i in 0..n {
                trial[i] = (x[i] + alpha * d[i]).clamp(lower[i], upper[i]);
            }
            let decrease: f64 = (0..n).map(|i| grad[i] * (trial[i] - x[i])).sum();
            if decrease < 0.0 {
                let v = merit.eval(&trial, &mut trial_grad);
                if v.is_finite() && v <= value + ARMIJO_C1 * decrease {
                    accepted = Some((v, backtracks));
                    break;
                }
            }
            alpha *= BACKTRACK;
        }

        let Some((new_value, backtracks)) = accepted else {
            if settings.log_steps {
                trace!(iteration = iterations, radius = *radius, "line search failed");
            }
            if history.is_empty() {
                // steepest descent failed too: no further progress at this precision
                break;
            }
            history.clear();
            continue;
        };

        if backtracks == 0 && cap < 1.0 {
            *radius = (*radius * 2.0).min(MAX_RADIUS);
        } else if backtracks > 2 {
            *radius = (*radius * 0.5).max(alpha * d_norm).max(MIN_RADIUS);
        }

        let s: Vec<f64> = trial.iter().zip(x.iter()).map(|(t, xi)| t - xi).collect();
        let y: Vec<f64> = trial_grad.iter().zip(&grad).map(|(t, g)| t - g).collect();
        history.push(s, y);

        x.copy_from_slice(&trial);
        grad.copy_from_slice(&trial_grad);
        value = new_value;

        if settings.log_steps {
            trace!(
                iteration = iterations,
                merit = value,
                step = alpha * d_norm,
                radius = *radius,
                "inner step"
            );
        }
    }

    Ok(InnerOutcome {
        iterations,
        pg_norm: projected_gradient_norm(x, &grad, bounds),
        converged: false,
    })
}

/// `|| P(x - g) - x ||_inf`; zero exactly at first-order points of the box
/// problem.
pub(crate) fn projected_gradient_norm(x: &[f64], grad: &[f64], bounds: &Bounds) -> f64 {
    let (lower, upper) = (bounds.lower(), bounds.upper());
    (0..x.len()).fold(0.0, |m: f64, i| {
        let p = (x[i] - grad[i]).clamp(lower[i], upper[i]);
        m.max((p - x[i]).abs())
    })
}

fn mask(d: &mut [f64], active: &[bool]) {
    for (di, &a) in d.iter_mut().zip(active) {
        if a {
            *di = 0.0;
        }
    }
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn axpy(a: f64, x: &[f64], y: &mut [f64]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += a * xi;
    }
}
