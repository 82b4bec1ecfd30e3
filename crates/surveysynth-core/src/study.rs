//! Fixed study design: countries, cohorts, and every distributional
//! parameter the generation pipeline draws from.
//!
//! Country-specific parameters live on the [`Country`] variants as data so
//! that no component branches on country strings.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tolerance when checking that categorical probability vectors sum to 1.
const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// One of the two surveyed countries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    Japan,
    Vietnam,
}

impl Country {
    pub const ALL: [Country; 2] = [Country::Japan, Country::Vietnam];

    /// Two-letter code used in participant IDs.
    pub fn code(&self) -> &'static str {
        match self {
            Country::Japan => "JP",
            Country::Vietnam => "VN",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Country::Japan => "Japan",
            Country::Vietnam => "Vietnam",
        }
    }

    /// Demographic parameter bundle for one cohort.
    pub fn demographics(&self, cohort: CohortKind) -> DemographicParams {
        let mut params = match self {
            Country::Japan => DemographicParams {
                age_mean: 44.8,
                age_sd: 8.2,
                male_share: 0.793,
                position_split: [0.282, 0.455, 0.263],
                tenure_mean: 8.9,
                tenure_sd: 5.2,
                industry_split: [0.244, 0.221, 0.164, 0.122, 0.146, 0.103],
            },
            Country::Vietnam => DemographicParams {
                age_mean: 39.4,
                age_sd: 7.6,
                male_share: 0.647,
                position_split: [0.321, 0.442, 0.237],
                tenure_mean: 6.4,
                tenure_sd: 4.1,
                industry_split: [0.186, 0.284, 0.195, 0.177, 0.093, 0.065],
            },
        };

        // The interview sample skews senior relative to the survey sample.
        if cohort == CohortKind::Interview {
            params.position_split[0] -= 0.05;
            params.position_split[1] -= 0.05;
            params.position_split[2] += 0.10;
        }

        params
    }

    /// Target means/SDs for the four readiness dimensions (TC, CMC, EA, ALO).
    pub fn readiness(&self) -> ConstructParams {
        match self {
            Country::Japan => ConstructParams {
                means: [5.32, 4.76, 5.41, 4.68],
                sds: [0.87, 0.92, 0.81, 0.95],
            },
            Country::Vietnam => ConstructParams {
                means: [4.89, 5.18, 5.08, 5.29],
                sds: [0.94, 0.89, 0.88, 0.87],
            },
        }
    }

    /// Target means for the four cultural values (PD, UA, IC, LTO).
    pub fn cultural_means(&self) -> [f64; 4] {
        match self {
            Country::Japan => [4.2, 5.8, 5.1, 6.2],
            Country::Vietnam => [5.0, 4.0, 5.8, 5.5],
        }
    }

    /// Additive shift applied to outcome sub-scale noise means.
    pub fn outcome_boost(&self) -> f64 {
        match self {
            Country::Japan => 0.0,
            Country::Vietnam => 0.20,
        }
    }
}

/// Which of the two cohorts a sample belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CohortKind {
    Survey,
    Interview,
}

/// Phase tag embedded in participant IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Qual,
    Quant,
}

impl Phase {
    pub fn tag(&self) -> &'static str {
        match self {
            Phase::Qual => "QUAL",
            Phase::Quant => "QUANT",
        }
    }
}

/// Per-country, per-cohort demographic distribution parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DemographicParams {
    pub age_mean: f64,
    pub age_sd: f64,
    pub male_share: f64,
    /// Team leader / department head / senior executive.
    pub position_split: [f64; 3],
    pub tenure_mean: f64,
    pub tenure_sd: f64,
    /// Manufacturing / financial services / retail / technology /
    /// healthcare / other.
    pub industry_split: [f64; 6],
}

/// Target means and standard deviations for one construct family.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructParams {
    pub means: [f64; 4],
    pub sds: [f64; 4],
}

/// Bachelor / Master / PhD split, shared across countries.
pub const EDUCATION_SPLIT: [f64; 3] = [0.45, 0.48, 0.07];

/// Small / medium / large organization split, shared across countries.
pub const ORG_SIZE_SPLIT: [f64; 3] = [0.25, 0.40, 0.35];

/// Inter-dimension correlation matrix for the readiness family.
pub const READINESS_CORRELATION: [[f64; 4]; 4] = [
    [1.00, 0.54, 0.48, 0.51],
    [0.54, 1.00, 0.52, 0.58],
    [0.48, 0.52, 1.00, 0.47],
    [0.51, 0.58, 0.47, 1.00],
];

/// Standard deviations for the cultural value draws (PD, UA, IC, LTO).
pub const CULTURAL_SDS: [f64; 4] = [1.3, 1.2, 1.1, 1.2];

/// Outcome regression intercept.
pub const OUTCOME_INTERCEPT: f64 = 1.2;

/// Outcome weights on the four readiness dimensions.
pub const OUTCOME_WEIGHTS: [f64; 4] = [0.26, 0.33, 0.17, 0.26];

/// Moderation weights for (readiness dim × cultural value) interactions:
/// TC×PD, CMC×UA, EA×IC, ALO×LTO, all on mean-centered variables.
pub const MODERATION_WEIGHTS: [f64; 4] = [-0.16, 0.19, 0.14, 0.17];

/// Bounds every Likert item and dimension score is clipped to.
pub const SCALE_MIN: f64 = 1.0;
pub const SCALE_MAX: f64 = 7.0;

/// The two fixed cohort sizes per country plus the overlap protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyDesign {
    pub japan_survey_n: usize,
    pub vietnam_survey_n: usize,
    pub japan_interview_n: usize,
    pub vietnam_interview_n: usize,
    /// Fraction of interview participants also assigned a linked survey
    /// record, in [0, 1].
    pub overlap_fraction: f64,
    pub seed: u64,
}

impl Default for StudyDesign {
    fn default() -> Self {
        Self {
            japan_survey_n: 213,
            vietnam_survey_n: 215,
            japan_interview_n: 23,
            vietnam_interview_n: 22,
            overlap_fraction: 0.35,
            seed: 42,
        }
    }
}

impl StudyDesign {
    pub fn survey_n(&self, country: Country) -> usize {
        match country {
            Country::Japan => self.japan_survey_n,
            Country::Vietnam => self.vietnam_survey_n,
        }
    }

    pub fn interview_n(&self, country: Country) -> usize {
        match country {
            Country::Japan => self.japan_interview_n,
            Country::Vietnam => self.vietnam_interview_n,
        }
    }

    /// Number of linked pairs for one country: floor(interview n × fraction).
    pub fn overlap_n(&self, country: Country) -> usize {
        (self.interview_n(country) as f64 * self.overlap_fraction).floor() as usize
    }

    /// Fail-fast structural validation, run before any randomness is
    /// consumed.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.overlap_fraction) {
            return Err(Error::InvalidDesign(format!(
                "overlap fraction must be within [0, 1], got {}",
                self.overlap_fraction
            )));
        }

        check_probability_vector("education split", &EDUCATION_SPLIT)?;
        check_probability_vector("organization size split", &ORG_SIZE_SPLIT)?;

        for country in Country::ALL {
            let overlap = self.overlap_n(country);
            if overlap > self.survey_n(country) {
                return Err(Error::InvalidDesign(format!(
                    "{} overlap count {} exceeds survey cohort size {}",
                    country.name(),
                    overlap,
                    self.survey_n(country)
                )));
            }
            if overlap > self.interview_n(country) {
                return Err(Error::InvalidDesign(format!(
                    "{} overlap count {} exceeds interview cohort size {}",
                    country.name(),
                    overlap,
                    self.interview_n(country)
                )));
            }
        }

        for country in Country::ALL {
            for cohort in [CohortKind::Survey, CohortKind::Interview] {
                let params = country.demographics(cohort);
                check_probability_vector(
                    &format!("{} position split", country.name()),
                    &params.position_split,
                )?;
                check_probability_vector(
                    &format!("{} industry split", country.name()),
                    &params.industry_split,
                )?;
                if !(0.0..=1.0).contains(&params.male_share) {
                    return Err(Error::InvalidDesign(format!(
                        "{} male share must be within [0, 1]",
                        country.name()
                    )));
                }
            }
        }

        Ok(())
    }
}

fn check_probability_vector(label: &str, probabilities: &[f64]) -> Result<()> {
    if probabilities.iter().any(|p| !(0.0..=1.0).contains(p)) {
        return Err(Error::InvalidDesign(format!(
            "{label} contains a probability outside [0, 1]"
        )));
    }
    let total: f64 = probabilities.iter().sum();
    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(Error::InvalidDesign(format!(
            "{label} sums to {total}, expected 1.0"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_design_is_valid() {
        StudyDesign::default().validate().expect("default design");
    }

    #[test]
    fn overlap_counts_floor() {
        let design = StudyDesign::default();
        assert_eq!(design.overlap_n(Country::Japan), 8);
        assert_eq!(design.overlap_n(Country::Vietnam), 7);
    }

    #[test]
    fn overlap_fraction_out_of_range_is_rejected() {
        let design = StudyDesign {
            overlap_fraction: 1.2,
            ..StudyDesign::default()
        };
        assert!(design.validate().is_err());
    }

    #[test]
    fn overlap_exceeding_survey_cohort_is_rejected() {
        // 100 interviews at fraction 0.5 ask for 50 linked pairs, but only
        // 5 survey rows exist to link against.
        let design = StudyDesign {
            japan_survey_n: 5,
            japan_interview_n: 100,
            overlap_fraction: 0.5,
            ..StudyDesign::default()
        };
        assert!(design.validate().is_err());
    }

    #[test]
    fn interview_position_split_still_sums_to_one() {
        for country in Country::ALL {
            let split = country.demographics(CohortKind::Interview).position_split;
            let total: f64 = split.iter().sum();
            assert!((total - 1.0).abs() < 1e-9, "{country:?}: {total}");
        }
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        for i in 0..4 {
            assert_eq!(READINESS_CORRELATION[i][i], 1.0);
            for j in 0..4 {
                assert_eq!(READINESS_CORRELATION[i][j], READINESS_CORRELATION[j][i]);
            }
        }
    }
}
