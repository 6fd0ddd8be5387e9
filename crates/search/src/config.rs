use crate::SearchError;
use optim::SolverOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tangle::layout::{DEFAULT_TERMS, THREE_QUBITS};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of random starts `N`.
    pub starts: usize,
    /// Half-width `eps` of every constraint range `[-eps, eps]`.
    #[serde(alias = "error")]
    pub slack: f64,
    /// State dimension; only 8 is supported.
    pub nc: usize,
    /// Decomposition terms.
    pub np: usize,
    /// Seed of the per-start random streams.
    pub seed: String,
    /// 1 runs starts sequentially, 0 uses the global rayon pool, n > 1 a
    /// dedicated pool with n workers.
    pub threads: usize,
    /// Starts ending with a larger constraint violation are discarded.
    pub feasibility_tol: f64,
    pub solver: SolverOptions,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            starts: 10,
            slack: tangle::DEFAULT_SLACK,
            nc: THREE_QUBITS,
            np: DEFAULT_TERMS,
            seed: "three-tangle".to_string(),
            threads: 1,
            feasibility_tol: 1e-4,
            solver: SolverOptions::default(),
        }
    }
}

impl SearchConfig {
    pub fn from_json(path: &Path) -> Result<Self, SearchError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SearchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: SearchConfig = serde_json::from_str(&contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.starts == 0 {
            return Err(SearchError::InvalidConfig("starts must be > 0".into()));
        }
        if !(self.slack.is_finite() && self.slack >= 0.0) {
            return Err(SearchError::InvalidConfig(format!(
                "slack must be finite and >= 0, got {}",
                self.slack
            )));
        }
        if !(self.feasibility_tol.is_finite() && self.feasibility_tol > 0.0) {
            return Err(SearchError::InvalidConfig(format!(
                "feasibility_tol must be finite and > 0, got {}",
                self.feasibility_tol
            )));
        }
        self.solver
            .validate()
            .map_err(|e| SearchError::InvalidConfig(e.to_string()))
    }
}
