use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid study design: {0}")]
    InvalidDesign(String),
    #[error("core error: {0}")]
    Core(#[from] surveysynth_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl GenerationError {
    /// Wrap a distribution-construction failure; these always indicate a
    /// malformed parameter set, never a data condition.
    pub(crate) fn distribution(err: impl std::fmt::Display) -> Self {
        GenerationError::InvalidDesign(err.to_string())
    }
}
