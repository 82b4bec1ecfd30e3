//! Loaders that read run artifacts back into comparison views.
//!
//! Columns are resolved by header name, not position, so the loaders keep
//! working if downstream-compatible columns are appended to the tables.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use surveysynth_core::LinkageMap;

use crate::errors::VerifyError;
use crate::model::ParticipantView;

pub fn load_survey_views(path: &Path) -> Result<Vec<ParticipantView>, VerifyError> {
    load_views(path, "Participant_ID")
}

pub fn load_interview_views(path: &Path) -> Result<Vec<ParticipantView>, VerifyError> {
    load_views(path, "Interview_ID")
}

pub fn load_linkage(path: &Path) -> Result<LinkageMap, VerifyError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn load_views(path: &Path, id_column: &str) -> Result<Vec<ParticipantView>, VerifyError> {
    let mut reader = csv::Reader::from_reader(BufReader::new(File::open(path)?));
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| VerifyError::MissingColumn(name.to_string()))
    };

    let id_idx = column(id_column)?;
    let country_idx = column("Country")?;
    let age_idx = column("Age")?;
    let gender_idx = column("Gender")?;
    let industry_idx = column("Industry")?;
    let key_idx = column("Survey_Link_Key")?;

    let mut views = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or_default().to_string();

        let id = field(id_idx);
        let age_raw = field(age_idx);
        let age = age_raw
            .parse::<u32>()
            .map_err(|_| VerifyError::InvalidField {
                id: id.clone(),
                field: "Age",
                value: age_raw,
            })?;
        let key = field(key_idx);

        views.push(ParticipantView {
            id,
            country: field(country_idx),
            age,
            gender: field(gender_idx),
            industry: field(industry_idx),
            link_key: if key.is_empty() { None } else { Some(key) },
        });
    }

    Ok(views)
}
