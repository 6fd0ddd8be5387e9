//! Residual blocks stating that `x` encodes a convex decomposition of `rho`.

use crate::layout::Layout;
use crate::TangleError;
use linalg::{DensityMatrix, C64};
use optim::{Bounds, ConstraintFn, NonlinearConstraint};

/// `1 - sum_i p_i`.
pub struct WeightSum {
    layout: Layout,
}

impl WeightSum {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }
}

impl ConstraintFn for WeightSum {
    fn dim(&self) -> usize {
        1
    }

    fn residual(&self, x: &[f64], out: &mut [f64]) {
        out[0] = 1.0 - self.layout.weights(x).iter().sum::<f64>();
    }

    fn accumulate_jtw(&self, _x: &[f64], w: &[f64], grad: &mut [f64]) {
        for g in grad[..self.layout.np()].iter_mut() {
            *g -= w[0];
        }
    }
}

/// `1 - ||c_i||^2` for every state.
pub struct UnitNorm {
    layout: Layout,
}

impl UnitNorm {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }
}

impl ConstraintFn for UnitNorm {
    fn dim(&self) -> usize {
        self.layout.np()
    }

    fn residual(&self, x: &[f64], out: &mut [f64]) {
        for (i, r) in out.iter_mut().enumerate() {
            let sq: f64 = x[self.layout.state_range(i)].iter().map(|v| v * v).sum();
            *r = 1.0 - sq;
        }
    }

    fn accumulate_jtw(&self, x: &[f64], w: &[f64], grad: &mut [f64]) {
        for (i, &wi) in w.iter().enumerate() {
            for k in self.layout.state_range(i) {
                grad[k] -= 2.0 * x[k] * wi;
            }
        }
    }
}

/// `sum_i p_i c_i c_i^† - rho`, real parts of all entries (row-major) followed
/// by imaginary parts.
pub struct Reconstruction {
    layout: Layout,
    target: Vec<C64>,
}

impl Reconstruction {
    pub fn new(layout: Layout, rho: &DensityMatrix) -> Result<Self, TangleError> {
        if rho.dim() != layout.nc() {
            return Err(TangleError::MatrixDimension {
                expected: layout.nc(),
                found: rho.dim(),
            });
        }
        Ok(Self {
            layout,
            target: rho.entries().to_vec(),
        })
    }

    fn states(&self, x: &[f64]) -> Vec<C64> {
        let nc = self.layout.nc();
        let mut c = vec![C64::new(0.0, 0.0); nc * self.layout.np()];
        for (i, chunk) in c.chunks_mut(nc).enumerate() {
            self.layout.read_state(x, i, chunk);
        }
        c
    }
}

impl ConstraintFn for Reconstruction {
    fn dim(&self) -> usize {
        2 * self.layout.nc() * self.layout.nc()
    }

    fn residual(&self, x: &[f64], out: &mut [f64]) {
        let nc = self.layout.nc();
        let p = self.layout.weights(x);
        let c = self.states(x);
        let (re, im) = out.split_at_mut(nc * nc);

        for a in 0..nc {
            for b in 0..nc {
                let mut acc = -self.target[a * nc + b];
                for (i, &pi) in p.iter().enumerate() {
                    acc += c[i * nc + a] * c[i * nc + b].conj() * pi;
                }
                re[a * nc + b] = acc.re;
                im[a * nc + b] = acc.im;
            }
        }
    }

    fn accumulate_jtw(&self, x: &[f64], w: &[f64], grad: &mut [f64]) {
        let layout = self.layout;
        let nc = layout.nc();
        let (w_re, w_im) = w.split_at(nc * nc);

        for i in 0..layout.np() {
            let p = x[i];
            for a in 0..nc {
                let (xa, ya) = (x[layout.re_index(i, a)], x[layout.im_index(i, a)]);
                for b in 0..nc {
                    let (xb, yb) = (x[layout.re_index(i, b)], x[layout.im_index(i, b)]);
                    let wr = w_re[a * nc + b];
                    let wi = w_im[a * nc + b];

                    // entry = p * ((xa xb + ya yb) + i (ya xb - xa yb))
                    grad[i] += wr * (xa * xb + ya * yb) + wi * (ya * xb - xa * yb);
                    grad[layout.re_index(i, a)] += p * (wr * xb - wi * yb);
                    grad[layout.im_index(i, a)] += p * (wr * yb + wi * xb);
                    grad[layout.re_index(i, b)] += p * (wr * xa + wi * ya);
                    grad[layout.im_index(i, b)] += p * (wr * ya - wi * xa);
                }
            }
        }
    }
}

/// Weight-sum, unit-norm and reconstruction blocks, each within `[-eps, eps]`.
pub fn constraint_set(
    layout: Layout,
    rho: &DensityMatrix,
    eps: f64,
) -> Result<Vec<NonlinearConstraint>, TangleError> {
    Ok(vec![
        NonlinearConstraint::symmetric(Box::new(WeightSum::new(layout)), eps)?,
        NonlinearConstraint::symmetric(Box::new(UnitNorm::new(layout)), eps)?,
        NonlinearConstraint::symmetric(Box::new(Reconstruction::new(layout, rho)?), eps)?,
    ])
}

/// Weights in `[0, 1]`, every real or imaginary coefficient in `[-1, 1]`.
pub fn bounds(layout: Layout) -> Result<Bounds, TangleError> {
    let n = layout.dim();
    let mut lower = vec![-1.0; n];
    lower[..layout.np()].fill(0.0);
    Ok(Bounds::new(lower, vec![1.0; n])?)
}
