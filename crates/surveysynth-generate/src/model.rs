use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where run artifacts are written.
    pub out_dir: PathBuf,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("research_data"),
        }
    }
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    /// Pipeline stages in execution order; the draw sequence is a
    /// reproducibility contract, so reordering must show up here.
    pub stages: Vec<String>,
    pub survey_rows: usize,
    pub interview_rows: usize,
    pub linked_pairs: usize,
    pub duration_ms: u64,
    pub bytes_written: u64,
}

/// Per-country survey-cohort summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveySummary {
    pub n: usize,
    pub mean_age: f64,
    pub sd_age: f64,
    pub pct_male: f64,
    pub mean_tenure: f64,
    pub sd_tenure: f64,
    /// Dimension label -> (mean, sd) for the four readiness scores.
    pub readiness: BTreeMap<String, DimensionSummary>,
    pub outcomes: OutcomeSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionSummary {
    pub mean: f64,
    pub sd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub operational: f64,
    pub strategic: f64,
    pub learning: f64,
    pub overall: f64,
}

/// Per-country interview-cohort summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSummary {
    pub n: usize,
    pub avg_duration_min: f64,
    pub in_both_phases: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlapSummary {
    pub total_in_both_phases: usize,
    pub japan_overlap: usize,
    pub vietnam_overlap: usize,
    pub overlap_percentage: f64,
}

/// Summary statistics exported alongside the tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub quantitative: BTreeMap<String, SurveySummary>,
    pub qualitative: BTreeMap<String, InterviewSummary>,
    pub overlap: OverlapSummary,
}
