//! Consistency verification for generated run artifacts.
//!
//! Checks that every linked interview/survey pair agrees on the shared
//! demographic fields and the masked link key, either on an in-memory
//! dataset or on artifacts loaded back from a run directory.

pub mod engine;
pub mod errors;
pub mod loader;
pub mod model;
pub mod report;

pub use engine::VerificationEngine;
pub use errors::VerifyError;
pub use model::{FieldMismatch, Mismatch, ParticipantView, VerifyReport};
pub use report::render_report;
