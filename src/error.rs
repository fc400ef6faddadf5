use thiserror::Error;

/// Errors produced by the analysis core.
///
/// Collaborator failures (missing CSV file, unreachable Census API,
/// malformed payloads) are not represented here; they propagate as
/// `anyhow`/`reqwest` errors from the loading layer.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid bucket spec: {0}")]
    InvalidBucketSpec(String),

    #[error("No records to bucket")]
    EmptyInput,
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
