use thiserror::Error;

/// Core error type shared across surveysynth crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The study design violates a structural precondition.
    #[error("invalid study design: {0}")]
    InvalidDesign(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by surveysynth crates.
pub type Result<T> = std::result::Result<T, Error>;
