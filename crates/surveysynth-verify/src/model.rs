use serde::{Deserialize, Serialize};

use surveysynth_core::{InterviewRecord, SurveyRecord};

/// The fields a linked pair must agree on, reduced to strings so records
/// loaded back from CSV compare identically to in-memory records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantView {
    pub id: String,
    pub country: String,
    pub age: u32,
    pub gender: String,
    pub industry: String,
    pub link_key: Option<String>,
}

impl ParticipantView {
    pub fn from_survey(record: &SurveyRecord) -> Self {
        let demo = &record.demographics;
        Self {
            id: record.participant_id.clone(),
            country: demo.country.name().to_string(),
            age: demo.age,
            gender: demo.gender.as_str().to_string(),
            industry: demo.industry.as_str().to_string(),
            link_key: record.link_key.clone(),
        }
    }

    pub fn from_interview(record: &InterviewRecord) -> Self {
        Self {
            id: record.interview_id.clone(),
            country: record.country.name().to_string(),
            age: record.age,
            gender: record.gender.as_str().to_string(),
            industry: record.industry.as_str().to_string(),
            link_key: record.link_key.clone(),
        }
    }
}

/// One field both sides of a linked pair disagree on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMismatch {
    pub field: String,
    pub interview: String,
    pub survey: String,
}

/// All disagreements found for one linked pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    pub qual_id: String,
    pub quant_id: String,
    pub fields: Vec<FieldMismatch>,
}

/// Outcome of a verification pass over the linkage map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    pub checked_pairs: usize,
    pub mismatches: Vec<Mismatch>,
}

impl VerifyReport {
    pub fn all_match(&self) -> bool {
        self.mismatches.is_empty()
    }
}
