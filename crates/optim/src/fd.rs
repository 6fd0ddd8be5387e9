//! Central finite differences for black-box objectives.

use crate::Objective;

/// Central difference of `f` along coordinate `i` of `x`.
pub fn central_difference<F>(f: &F, x: &[f64], i: usize, h: f64) -> f64
where
    F: Fn(&[f64]) -> f64,
{
    let mut xp = x.to_vec();
    let mut xm = x.to_vec();
    xp[i] += h;
    xm[i] -= h;
    0.5 * (f(&xp) - f(&xm)) / h
}

/// Adapts any closure to [`Objective`], differentiating numerically.
pub struct FiniteDifference<F> {
    f: F,
    dim: usize,
    step: f64,
}

impl<F> FiniteDifference<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    pub fn new(dim: usize, f: F) -> Self {
        Self { f, dim, step: 1e-6 }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }
}

impl<F> Objective for FiniteDifference<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn dim(&self) -> usize {
        self.dim
    }

    fn value(&self, x: &[f64]) -> f64 {
        (self.f)(x)
    }

    fn gradient(&self, x: &[f64], grad: &mut [f64]) {
        for (i, g) in grad.iter_mut().enumerate() {
            let h = self.step * x[i].abs().max(1.0);
            *g = central_difference(&self.f, x, i, h);
        }
    }
}
