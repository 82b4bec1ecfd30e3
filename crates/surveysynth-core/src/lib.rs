//! Shared contracts for surveysynth: the fixed study design, participant
//! record types, and the export column layout both cohort tables follow.

pub mod error;
pub mod participant;
pub mod study;

pub use error::{Error, Result};
pub use participant::{
    CULTURAL_DIMS, Demographics, Education, Gender, INTERVIEW_COLUMNS, Industry, InterviewRecord,
    LinkageEntry, LinkageMap, OUTCOME_DIMS, OrgSizeCategory, PositionLevel, PositionTier,
    READINESS_DIMS, SURVEY_COLUMNS, SurveyRecord, participant_id,
};
pub use study::{
    CULTURAL_SDS, CohortKind, ConstructParams, Country, DemographicParams, EDUCATION_SPLIT,
    MODERATION_WEIGHTS, ORG_SIZE_SPLIT, OUTCOME_INTERCEPT, OUTCOME_WEIGHTS, Phase,
    READINESS_CORRELATION, SCALE_MAX, SCALE_MIN, StudyDesign,
};
