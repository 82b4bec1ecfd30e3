//! Record types for both cohorts, the linkage map, and the fixed export
//! column layout.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::study::{Country, Phase};

/// Masked participant identifier, e.g. `JP_QUANT_007`.
pub fn participant_id(country: Country, phase: Phase, sequence: usize) -> String {
    format!("{}_{}_{:03}", country.code(), phase.tag(), sequence)
}

/// Highest completed degree; keys the career-start age used for the tenure
/// ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Education {
    Bachelor,
    Master,
    Phd,
}

impl Education {
    pub const ALL: [Education; 3] = [Education::Bachelor, Education::Master, Education::Phd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Education::Bachelor => "Bachelor",
            Education::Master => "Master",
            Education::Phd => "PhD",
        }
    }

    /// Typical age at which working life starts for this degree.
    pub fn career_start_age(&self) -> u32 {
        match self {
            Education::Bachelor => 22,
            Education::Master => 24,
            Education::Phd => 28,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Survey-cohort position levels, ordered junior to senior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionLevel {
    TeamLeader,
    DepartmentHead,
    SeniorExecutive,
}

impl PositionLevel {
    pub const ALL: [PositionLevel; 3] = [
        PositionLevel::TeamLeader,
        PositionLevel::DepartmentHead,
        PositionLevel::SeniorExecutive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PositionLevel::TeamLeader => "Team Leader",
            PositionLevel::DepartmentHead => "Department Head",
            PositionLevel::SeniorExecutive => "Senior Executive",
        }
    }

    /// Coarser tier used in the interview table.
    pub fn tier(&self) -> PositionTier {
        match self {
            PositionLevel::SeniorExecutive => PositionTier::SeniorLeader,
            _ => PositionTier::MidLevelLeader,
        }
    }
}

/// Interview-cohort position tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionTier {
    SeniorLeader,
    MidLevelLeader,
}

impl PositionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionTier::SeniorLeader => "Senior Leader",
            PositionTier::MidLevelLeader => "Mid-level Leader",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Industry {
    Manufacturing,
    FinancialServices,
    Retail,
    Technology,
    Healthcare,
    Other,
}

impl Industry {
    pub const ALL: [Industry; 6] = [
        Industry::Manufacturing,
        Industry::FinancialServices,
        Industry::Retail,
        Industry::Technology,
        Industry::Healthcare,
        Industry::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Manufacturing => "Manufacturing",
            Industry::FinancialServices => "Financial Services",
            Industry::Retail => "Retail",
            Industry::Technology => "Technology",
            Industry::Healthcare => "Healthcare",
            Industry::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrgSizeCategory {
    Small,
    Medium,
    Large,
}

impl OrgSizeCategory {
    pub const ALL: [OrgSizeCategory; 3] = [
        OrgSizeCategory::Small,
        OrgSizeCategory::Medium,
        OrgSizeCategory::Large,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrgSizeCategory::Small => "Small (< 500)",
            OrgSizeCategory::Medium => "Medium (500-2000)",
            OrgSizeCategory::Large => "Large (> 2000)",
        }
    }

    /// Half-open headcount range the numeric size is drawn from.
    pub fn numeric_range(&self) -> (u32, u32) {
        match self {
            OrgSizeCategory::Small => (50, 500),
            OrgSizeCategory::Medium => (500, 2000),
            OrgSizeCategory::Large => (2000, 10000),
        }
    }
}

/// One sampled demographic row; the shared payload between linked records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub country: Country,
    pub age: u32,
    pub gender: Gender,
    pub position: PositionLevel,
    /// Rounded to one decimal.
    pub tenure_years: f64,
    pub education: Education,
    pub industry: Industry,
    pub org_size: OrgSizeCategory,
    /// Present for the survey cohort only.
    pub org_size_numeric: Option<u32>,
}

/// One quantitative (survey) participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub participant_id: String,
    pub demographics: Demographics,
    /// TC, CMC, EA, ALO, each the mean of its items (2 dp).
    pub readiness_scores: [f64; 4],
    pub readiness_items: [[u8; 8]; 4],
    /// OI, SA, OL, each the mean of its items (2 dp).
    pub outcome_scores: [f64; 3],
    /// Mean of the three outcome scores, 2 dp.
    pub overall_success: f64,
    pub outcome_items: [[u8; 4]; 3],
    /// PD, UA, IC (collectivism), LTO, each the mean of its items (2 dp).
    pub cultural_scores: [f64; 4],
    pub cultural_items: [[u8; 3]; 4],
    pub survey_date: NaiveDate,
    pub link_key: Option<String>,
}

/// One qualitative (interview) participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub interview_id: String,
    pub country: Country,
    pub interview_date: NaiveDate,
    pub position: PositionTier,
    pub industry: Industry,
    pub age: u32,
    pub gender: Gender,
    pub duration_min: u32,
    pub ai_experience_years: u32,
    pub also_in_survey: bool,
    pub link_key: Option<String>,
}

/// Target of one linkage entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkageEntry {
    pub quant_id: String,
    pub link_key: String,
}

/// Qualitative ID → linked survey ID plus masked key. A `BTreeMap` keeps the
/// serialized form stable across runs.
pub type LinkageMap = BTreeMap<String, LinkageEntry>;

/// Short labels for the readiness dimensions, in score/item order.
pub const READINESS_DIMS: [&str; 4] = ["TC", "CMC", "EA", "ALO"];
/// Short labels for the outcome sub-scales.
pub const OUTCOME_DIMS: [&str; 3] = ["OI", "SA", "OL"];
/// Short labels for the cultural values; IC items back the
/// `Collectivism_Score` column.
pub const CULTURAL_DIMS: [&str; 4] = ["PD", "UA", "IC", "LTO"];

/// Exported survey column layout. Positional order is a compatibility
/// contract for downstream consumers; do not reorder.
pub const SURVEY_COLUMNS: [&str; 80] = [
    "Participant_ID",
    "Country",
    "Age",
    "Gender",
    "Position_Level",
    "Tenure_Years",
    "Education",
    "Industry",
    "Org_Size_Category",
    "Org_Size_Numeric",
    "TC_Score",
    "CMC_Score",
    "EA_Score",
    "ALO_Score",
    "TC1",
    "TC2",
    "TC3",
    "TC4",
    "TC5",
    "TC6",
    "TC7",
    "TC8",
    "CMC1",
    "CMC2",
    "CMC3",
    "CMC4",
    "CMC5",
    "CMC6",
    "CMC7",
    "CMC8",
    "EA1",
    "EA2",
    "EA3",
    "EA4",
    "EA5",
    "EA6",
    "EA7",
    "EA8",
    "ALO1",
    "ALO2",
    "ALO3",
    "ALO4",
    "ALO5",
    "ALO6",
    "ALO7",
    "ALO8",
    "OI_Score",
    "SA_Score",
    "OL_Score",
    "Overall_Success",
    "OI1",
    "OI2",
    "OI3",
    "OI4",
    "SA1",
    "SA2",
    "SA3",
    "SA4",
    "OL1",
    "OL2",
    "OL3",
    "OL4",
    "PD_Score",
    "UA_Score",
    "Collectivism_Score",
    "LTO_Score",
    "PD1",
    "PD2",
    "PD3",
    "UA1",
    "UA2",
    "UA3",
    "IC1",
    "IC2",
    "IC3",
    "LTO1",
    "LTO2",
    "LTO3",
    "Survey_Date",
    "Survey_Link_Key",
];

/// Exported interview column layout.
pub const INTERVIEW_COLUMNS: [&str; 11] = [
    "Interview_ID",
    "Country",
    "Interview_Date",
    "Position",
    "Industry",
    "Age",
    "Gender",
    "Interview_Duration_Min",
    "AI_Experience_Years",
    "Also_In_Survey",
    "Survey_Link_Key",
];

impl SurveyRecord {
    /// Serialize into the [`SURVEY_COLUMNS`] layout.
    pub fn to_row(&self) -> Vec<String> {
        let demo = &self.demographics;
        let mut row = Vec::with_capacity(SURVEY_COLUMNS.len());
        row.push(self.participant_id.clone());
        row.push(demo.country.name().to_string());
        row.push(demo.age.to_string());
        row.push(demo.gender.as_str().to_string());
        row.push(demo.position.as_str().to_string());
        row.push(format!("{:.1}", demo.tenure_years));
        row.push(demo.education.as_str().to_string());
        row.push(demo.industry.as_str().to_string());
        row.push(demo.org_size.as_str().to_string());
        row.push(
            demo.org_size_numeric
                .map(|size| size.to_string())
                .unwrap_or_default(),
        );
        for score in self.readiness_scores {
            row.push(format!("{score:.2}"));
        }
        for items in self.readiness_items {
            for item in items {
                row.push(item.to_string());
            }
        }
        for score in self.outcome_scores {
            row.push(format!("{score:.2}"));
        }
        row.push(format!("{:.2}", self.overall_success));
        for items in self.outcome_items {
            for item in items {
                row.push(item.to_string());
            }
        }
        for score in self.cultural_scores {
            row.push(format!("{score:.2}"));
        }
        for items in self.cultural_items {
            for item in items {
                row.push(item.to_string());
            }
        }
        row.push(self.survey_date.format("%Y-%m-%d").to_string());
        row.push(self.link_key.clone().unwrap_or_default());
        row
    }
}

impl InterviewRecord {
    /// Serialize into the [`INTERVIEW_COLUMNS`] layout.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.interview_id.clone(),
            self.country.name().to_string(),
            self.interview_date.format("%Y-%m-%d").to_string(),
            self.position.as_str().to_string(),
            self.industry.as_str().to_string(),
            self.age.to_string(),
            self.gender.as_str().to_string(),
            self.duration_min.to_string(),
            self.ai_experience_years.to_string(),
            self.also_in_survey.to_string(),
            self.link_key.clone().unwrap_or_default(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_ids_are_zero_padded() {
        assert_eq!(participant_id(Country::Japan, Phase::Qual, 1), "JP_QUAL_001");
        assert_eq!(
            participant_id(Country::Vietnam, Phase::Quant, 215),
            "VN_QUANT_215"
        );
    }

    #[test]
    fn survey_row_matches_column_count() {
        let record = SurveyRecord {
            participant_id: participant_id(Country::Japan, Phase::Quant, 1),
            demographics: Demographics {
                country: Country::Japan,
                age: 44,
                gender: Gender::Male,
                position: PositionLevel::DepartmentHead,
                tenure_years: 8.5,
                education: Education::Master,
                industry: Industry::Manufacturing,
                org_size: OrgSizeCategory::Medium,
                org_size_numeric: Some(1200),
            },
            readiness_scores: [5.25; 4],
            readiness_items: [[5; 8]; 4],
            outcome_scores: [4.75; 3],
            overall_success: 4.75,
            outcome_items: [[5; 4]; 3],
            cultural_scores: [5.0; 4],
            cultural_items: [[5; 3]; 4],
            survey_date: NaiveDate::from_ymd_opt(2023, 6, 15).expect("date"),
            link_key: None,
        };
        let row = record.to_row();
        assert_eq!(row.len(), SURVEY_COLUMNS.len());
        assert_eq!(row[5], "8.5");
        assert_eq!(row[79], "");
    }

    #[test]
    fn senior_executive_maps_to_senior_leader_tier() {
        assert_eq!(
            PositionLevel::SeniorExecutive.tier(),
            PositionTier::SeniorLeader
        );
        assert_eq!(
            PositionLevel::TeamLeader.tier(),
            PositionTier::MidLevelLeader
        );
    }
}
