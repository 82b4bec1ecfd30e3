//! Cross-cohort consistency verification.
//!
//! Every entry in the linkage map is resolved against both tables, and the
//! shared demographic fields plus the masked link key are compared. The
//! engine works on [`ParticipantView`]s so the same pass runs on an
//! in-memory dataset and on artifacts loaded back from disk.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

use surveysynth_core::LinkageMap;
use surveysynth_generate::linkage::link_key;

use crate::errors::VerifyError;
use crate::loader::{load_interview_views, load_linkage, load_survey_views};
use crate::model::{FieldMismatch, Mismatch, ParticipantView, VerifyReport};

/// Verifies linked-pair consistency for a run.
#[derive(Debug, Clone, Default)]
pub struct VerificationEngine;

impl VerificationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Load the artifacts of one run directory and verify them.
    pub fn run(&self, run_dir: &Path) -> Result<VerifyReport, VerifyError> {
        let survey = load_survey_views(&run_dir.join("survey_data_complete.csv"))?;
        let interviews = load_interview_views(&run_dir.join("interview_metadata.csv"))?;
        let linkage = load_linkage(&run_dir.join("participant_linkage_masked.json"))?;
        info!(
            survey_rows = survey.len(),
            interview_rows = interviews.len(),
            linked_pairs = linkage.len(),
            "artifacts loaded"
        );
        self.verify(&interviews, &survey, &linkage)
    }

    /// Verify every linked pair. A record named by the linkage map but
    /// absent from its table is fatal.
    pub fn verify(
        &self,
        interviews: &[ParticipantView],
        survey: &[ParticipantView],
        linkage: &LinkageMap,
    ) -> Result<VerifyReport, VerifyError> {
        let interview_index: HashMap<&str, &ParticipantView> = interviews
            .iter()
            .map(|view| (view.id.as_str(), view))
            .collect();
        let survey_index: HashMap<&str, &ParticipantView> =
            survey.iter().map(|view| (view.id.as_str(), view)).collect();

        let mut mismatches = Vec::new();
        for (qual_id, entry) in linkage {
            let interview = interview_index.get(qual_id.as_str()).ok_or_else(|| {
                VerifyError::MissingRecord {
                    side: "interview",
                    id: qual_id.clone(),
                }
            })?;
            let survey = survey_index.get(entry.quant_id.as_str()).ok_or_else(|| {
                VerifyError::MissingRecord {
                    side: "survey",
                    id: entry.quant_id.clone(),
                }
            })?;

            let fields = compare_pair(interview, survey, qual_id, &entry.quant_id, &entry.link_key);
            if !fields.is_empty() {
                warn!(
                    qual_id = %qual_id,
                    quant_id = %entry.quant_id,
                    fields = fields.len(),
                    "linked pair mismatch"
                );
                mismatches.push(Mismatch {
                    qual_id: qual_id.clone(),
                    quant_id: entry.quant_id.clone(),
                    fields,
                });
            }
        }

        let report = VerifyReport {
            checked_pairs: linkage.len(),
            mismatches,
        };
        info!(
            checked_pairs = report.checked_pairs,
            mismatches = report.mismatches.len(),
            all_match = report.all_match(),
            "verification finished"
        );
        Ok(report)
    }
}

fn compare_pair(
    interview: &ParticipantView,
    survey: &ParticipantView,
    qual_id: &str,
    quant_id: &str,
    recorded_key: &str,
) -> Vec<FieldMismatch> {
    let mut fields = Vec::new();
    let mut check = |field: &str, interview_value: String, survey_value: String, ok: bool| {
        if !ok {
            fields.push(FieldMismatch {
                field: field.to_string(),
                interview: interview_value,
                survey: survey_value,
            });
        }
    };

    check(
        "Age",
        interview.age.to_string(),
        survey.age.to_string(),
        interview.age == survey.age,
    );
    check(
        "Gender",
        interview.gender.clone(),
        survey.gender.clone(),
        interview.gender == survey.gender,
    );
    check(
        "Industry",
        interview.industry.clone(),
        survey.industry.clone(),
        interview.industry == survey.industry,
    );
    check(
        "Country",
        interview.country.clone(),
        survey.country.clone(),
        interview.country == survey.country,
    );

    // The recorded key must equal the key recomputed from the pair's IDs,
    // and both records must carry it.
    let expected = link_key(qual_id, quant_id);
    let key_ok = recorded_key == expected
        && interview.link_key.as_deref() == Some(expected.as_str())
        && survey.link_key.as_deref() == Some(expected.as_str());
    check(
        "Link_Key",
        interview.link_key.clone().unwrap_or_default(),
        survey.link_key.clone().unwrap_or_default(),
        key_ok,
    );

    fields
}
