//! Deterministic generation of the paired survey/interview dataset.
//!
//! The [`GenerationEngine`] runs the seeded pipeline end to end and writes
//! the run artifacts (both CSV tables, the masked linkage map, summary
//! statistics, and a generation report) into a per-run directory.

pub mod constructs;
pub mod engine;
pub mod errors;
pub mod items;
pub mod linkage;
pub mod model;
pub mod output;
pub mod sampler;

pub use engine::{Dataset, Generation, GenerationEngine, GenerationResult, summarize};
pub use errors::GenerationError;
pub use model::{GenerateOptions, GenerationReport, SummaryStatistics};
