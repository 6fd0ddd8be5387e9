use std::path::PathBuf;
use tangle::TangleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Tangle(#[from] TangleError),

    #[error("problem has dimension {found}, layout expects {expected}")]
    ProblemDimension { expected: usize, found: usize },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to read {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
