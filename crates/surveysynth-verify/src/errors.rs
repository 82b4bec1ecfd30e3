use thiserror::Error;

/// Errors emitted by the verification engine.
///
/// A missing record is a fatal error rather than a recorded mismatch: the
/// linkage map names both sides of every pair, so absence means a corrupted
/// or truncated artifact, not a field-level disagreement.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("missing {side} record for linked pair: {id}")]
    MissingRecord { side: &'static str, id: String },
    #[error("missing column '{0}' in table header")]
    MissingColumn(String),
    #[error("invalid field {field} for {id}: {value}")]
    InvalidField {
        id: String,
        field: &'static str,
        value: String,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
