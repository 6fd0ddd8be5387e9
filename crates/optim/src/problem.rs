use crate::SolverError;

/// Scalar function to minimize, with its gradient.
pub trait Objective: Send + Sync {
    fn dim(&self) -> usize;

    fn value(&self, x: &[f64]) -> f64;

    /// Writes the gradient at `x` into `grad`.
    fn gradient(&self, x: &[f64], grad: &mut [f64]);
}

/// Vector-valued constraint residual `c: R^n -> R^m`.
pub trait ConstraintFn: Send + Sync {
    /// Number of residual components `m`.
    fn dim(&self) -> usize;

    fn residual(&self, x: &[f64], out: &mut [f64]);

    /// Adds `J(x)^T w` to `grad`, where `J` is the `m x n` Jacobian.
    fn accumulate_jtw(&self, x: &[f64], w: &[f64], grad: &mut [f64]);
}

/// A residual block with per-component ranges `lower <= c(x) <= upper`.
pub struct NonlinearConstraint {
    func: Box<dyn ConstraintFn>,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl NonlinearConstraint {
    pub fn new(
        func: Box<dyn ConstraintFn>,
        lower: Vec<f64>,
        upper: Vec<f64>,
    ) -> Result<Self, SolverError> {
        let m = func.dim();
        if lower.len() != m {
            return Err(SolverError::DimensionMismatch {
                what: "constraint lower bounds",
                expected: m,
                found: lower.len(),
            });
        }
        if upper.len() != m {
            return Err(SolverError::DimensionMismatch {
                what: "constraint upper bounds",
                expected: m,
                found: upper.len(),
            });
        }
        for (index, (&lo, &hi)) in lower.iter().zip(&upper).enumerate() {
            if lo > hi || lo.is_nan() || hi.is_nan() {
                return Err(SolverError::InvalidBounds {
                    index,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(Self { func, lower, upper })
    }

    /// Every component constrained to `[-eps, eps]`.
    pub fn symmetric(func: Box<dyn ConstraintFn>, eps: f64) -> Result<Self, SolverError> {
        let m = func.dim();
        Self::new(func, vec![-eps; m], vec![eps; m])
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn func(&self) -> &dyn ConstraintFn {
        self.func.as_ref()
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, SolverError> {
        if lower.len() != upper.len() {
            return Err(SolverError::DimensionMismatch {
                what: "bounds",
                expected: lower.len(),
                found: upper.len(),
            });
        }
        for (index, (&lo, &hi)) in lower.iter().zip(&upper).enumerate() {
            if !(lo < hi) {
                return Err(SolverError::InvalidBounds {
                    index,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(Self { lower, upper })
    }

    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }
}

/// Objective, bounds and constraint blocks of one minimization.
pub struct Problem {
    objective: Box<dyn Objective>,
    bounds: Bounds,
    constraints: Vec<NonlinearConstraint>,
}

impl Problem {
    pub fn new(
        objective: Box<dyn Objective>,
        bounds: Bounds,
        constraints: Vec<NonlinearConstraint>,
    ) -> Result<Self, SolverError> {
        if bounds.len() != objective.dim() {
            return Err(SolverError::DimensionMismatch {
                what: "bounds",
                expected: objective.dim(),
                found: bounds.len(),
            });
        }
        Ok(Self {
            objective,
            bounds,
            constraints,
        })
    }

    pub fn dim(&self) -> usize {
        self.objective.dim()
    }

    pub fn objective(&self) -> &dyn Objective {
        self.objective.as_ref()
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn constraints(&self) -> &[NonlinearConstraint] {
        &self.constraints
    }

    /// Total number of residual components over all blocks.
    pub fn constraint_dim(&self) -> usize {
        self.constraints.iter().map(NonlinearConstraint::dim).sum()
    }

    /// Writes all residual blocks, concatenated, into `out`.
    pub fn residuals(&self, x: &[f64], out: &mut [f64]) {
        let mut off = 0;
        for c in &self.constraints {
            let m = c.dim();
            c.func().residual(x, &mut out[off..off + m]);
            off += m;
        }
    }

    /// Largest distance of any residual outside its range; 0 when feasible.
    pub fn max_violation(&self, x: &[f64]) -> f64 {
        let mut r = vec![0.0; self.constraint_dim()];
        self.residuals(x, &mut r);
        self.violation_of(&r)
    }

    pub(crate) fn violation_of(&self, residuals: &[f64]) -> f64 {
        let mut worst: f64 = 0.0;
        let mut off = 0;
        for c in &self.constraints {
            for j in 0..c.dim() {
                let v = residuals[off + j];
                let d = (c.lower()[j] - v).max(v - c.upper()[j]).max(0.0);
                worst = worst.max(d);
            }
            off += c.dim();
        }
        worst
    }
}
