use optim::{SolverError, Status};

/// Result of one random start.
#[derive(Clone, Debug, PartialEq)]
pub enum StartOutcome {
    /// Feasible, non-negative minimum; the only kind that competes for the
    /// best value.
    Converged {
        value: f64,
        status: Status,
        iterations: usize,
        x: Vec<f64>,
    },
    /// Negative objective, a numerical artifact.
    Negative { value: f64 },
    /// Solver returned but the decomposition does not reproduce `rho`.
    Infeasible { value: f64, violation: f64 },
    /// Solver raised an error.
    Failed { error: SolverError },
}

impl StartOutcome {
    pub fn value(&self) -> Option<f64> {
        match self {
            StartOutcome::Converged { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, StartOutcome::Converged { .. })
    }

    pub fn is_discarded(&self) -> bool {
        matches!(
            self,
            StartOutcome::Negative { .. } | StartOutcome::Infeasible { .. }
        )
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StartOutcome::Failed { .. })
    }
}

/// Every start's outcome plus the minimum over converged starts.
#[derive(Clone, Debug)]
pub struct SearchReport {
    outcomes: Vec<StartOutcome>,
    best: Option<usize>,
}

impl SearchReport {
    pub fn from_outcomes(outcomes: Vec<StartOutcome>) -> Self {
        let mut best: Option<(usize, f64)> = None;
        for (k, o) in outcomes.iter().enumerate() {
            if let Some(v) = o.value() {
                if best.map_or(true, |(_, b)| v < b) {
                    best = Some((k, v));
                }
            }
        }
        Self {
            outcomes,
            best: best.map(|(k, _)| k),
        }
    }

    /// Smallest converged value, `None` when every start failed or was discarded.
    pub fn best(&self) -> Option<f64> {
        self.best.and_then(|k| self.outcomes[k].value())
    }

    pub fn best_start(&self) -> Option<usize> {
        self.best
    }

    /// Parameter vector of the best decomposition.
    pub fn best_x(&self) -> Option<&[f64]> {
        match self.best.map(|k| &self.outcomes[k]) {
            Some(StartOutcome::Converged { x, .. }) => Some(x),
            _ => None,
        }
    }

    /// [`Self::best`] with `+inf` standing for "no start succeeded".
    pub fn value_or_infinity(&self) -> f64 {
        self.best().unwrap_or(f64::INFINITY)
    }

    pub fn outcomes(&self) -> &[StartOutcome] {
        &self.outcomes
    }

    pub fn starts(&self) -> usize {
        self.outcomes.len()
    }

    pub fn converged(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_converged()).count()
    }

    pub fn discarded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_discarded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}
