//! Constrained demographic sampler.
//!
//! Draws are column-wise (every age, then every education, ...) and the
//! column order is part of the reproducibility contract: a fixed seed must
//! yield byte-identical output, so the sequence here may not be reordered
//! without re-deriving reference data.

use rand::Rng;
use rand::distr::weighted::WeightedIndex;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Beta, Distribution, Normal};

use surveysynth_core::{
    CohortKind, Country, Demographics, EDUCATION_SPLIT, Education, Gender, Industry,
    ORG_SIZE_SPLIT, OrgSizeCategory, PositionLevel, PositionTier,
};

use crate::errors::GenerationError;

/// Working-age band ages are clipped to before integer truncation.
const AGE_MIN: f64 = 25.0;
const AGE_MAX: f64 = 65.0;

/// Tenure ceiling band: at least 2 years of tenure are always possible, and
/// the ceiling derived from career length is capped at 40.
const TENURE_CEILING_MIN: f64 = 2.0;
const TENURE_CEILING_MAX: f64 = 40.0;

/// Final tenure band after rescaling.
const TENURE_MIN: f64 = 2.0;
const TENURE_MAX: f64 = 30.0;

/// Draw `n` demographic rows for one country and cohort.
///
/// Tenure is jointly constrained: a Beta(2, 2) proportion of each row's
/// ceiling (age minus career-start age), rescaled so the column mean hits the
/// country target, then re-clipped to the ceiling. `n == 0` returns an empty
/// table.
pub fn sample_demographics(
    rng: &mut ChaCha8Rng,
    country: Country,
    n: usize,
    cohort: CohortKind,
) -> Result<Vec<Demographics>, GenerationError> {
    if n == 0 {
        return Ok(Vec::new());
    }
    let params = country.demographics(cohort);

    let age_dist =
        Normal::new(params.age_mean, params.age_sd).map_err(GenerationError::distribution)?;
    let ages: Vec<u32> = (0..n)
        .map(|_| age_dist.sample(rng).clamp(AGE_MIN, AGE_MAX) as u32)
        .collect();

    let education_dist =
        WeightedIndex::new(EDUCATION_SPLIT).map_err(GenerationError::distribution)?;
    let educations: Vec<Education> = (0..n)
        .map(|_| Education::ALL[education_dist.sample(rng)])
        .collect();

    let ceilings: Vec<f64> = ages
        .iter()
        .zip(&educations)
        .map(|(age, education)| {
            (f64::from(*age) - f64::from(education.career_start_age()))
                .clamp(TENURE_CEILING_MIN, TENURE_CEILING_MAX)
        })
        .collect();

    let proportion_dist = Beta::new(2.0, 2.0).map_err(GenerationError::distribution)?;
    let mut tenures: Vec<f64> = ceilings
        .iter()
        .map(|ceiling| ceiling * proportion_dist.sample(rng))
        .collect();

    let tenure_mean: f64 = tenures.iter().sum::<f64>() / n as f64;
    if tenure_mean > 0.0 {
        let scale = params.tenure_mean / tenure_mean;
        for tenure in &mut tenures {
            *tenure *= scale;
        }
    }
    for (tenure, ceiling) in tenures.iter_mut().zip(&ceilings) {
        *tenure = tenure.min(*ceiling).clamp(TENURE_MIN, TENURE_MAX);
        *tenure = (*tenure * 10.0).round() / 10.0;
    }

    let genders: Vec<Gender> = (0..n)
        .map(|_| {
            if rng.random_bool(params.male_share) {
                Gender::Male
            } else {
                Gender::Female
            }
        })
        .collect();

    let position_dist =
        WeightedIndex::new(params.position_split).map_err(GenerationError::distribution)?;
    let positions: Vec<PositionLevel> = (0..n)
        .map(|_| PositionLevel::ALL[position_dist.sample(rng)])
        .collect();

    let industry_dist =
        WeightedIndex::new(params.industry_split).map_err(GenerationError::distribution)?;
    let industries: Vec<Industry> = (0..n)
        .map(|_| Industry::ALL[industry_dist.sample(rng)])
        .collect();

    let org_size_dist = WeightedIndex::new(ORG_SIZE_SPLIT).map_err(GenerationError::distribution)?;
    let org_sizes: Vec<OrgSizeCategory> = (0..n)
        .map(|_| OrgSizeCategory::ALL[org_size_dist.sample(rng)])
        .collect();

    let org_size_numeric: Vec<Option<u32>> = org_sizes
        .iter()
        .map(|category| match cohort {
            CohortKind::Survey => {
                let (low, high) = category.numeric_range();
                Some(rng.random_range(low..high))
            }
            CohortKind::Interview => None,
        })
        .collect();

    let rows = (0..n)
        .map(|i| Demographics {
            country,
            age: ages[i],
            gender: genders[i],
            position: positions[i],
            tenure_years: tenures[i],
            education: educations[i],
            industry: industries[i],
            org_size: org_sizes[i],
            org_size_numeric: org_size_numeric[i],
        })
        .collect();

    Ok(rows)
}

/// Reduced demographic profile for an interview-only participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewProfile {
    pub age: u32,
    pub gender: Gender,
    pub position: PositionTier,
    pub industry: Industry,
}

/// Industries interviewees were recruited from, drawn uniformly.
const INTERVIEW_INDUSTRIES: [Industry; 5] = [
    Industry::Manufacturing,
    Industry::FinancialServices,
    Industry::Retail,
    Industry::Technology,
    Industry::Healthcare,
];

/// Draw the reduced demographic set for one interview participant with no
/// linked survey record.
pub fn sample_interview_profile(rng: &mut ChaCha8Rng, country: Country) -> InterviewProfile {
    let (age_low, age_high, male_share, senior_share) = match country {
        Country::Japan => (35, 65, 0.87, 0.39),
        Country::Vietnam => (30, 60, 0.68, 0.36),
    };

    let age = rng.random_range(age_low..age_high);
    let gender = if rng.random_bool(male_share) {
        Gender::Male
    } else {
        Gender::Female
    };
    let position = if rng.random_bool(senior_share) {
        PositionTier::SeniorLeader
    } else {
        PositionTier::MidLevelLeader
    };
    let industry = INTERVIEW_INDUSTRIES[rng.random_range(0..INTERVIEW_INDUSTRIES.len())];

    InterviewProfile {
        age,
        gender,
        position,
        industry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn empty_sample_is_allowed() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rows = sample_demographics(&mut rng, Country::Japan, 0, CohortKind::Survey)
            .expect("empty sample");
        assert!(rows.is_empty());
    }

    #[test]
    fn tenure_never_exceeds_career_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let rows = sample_demographics(&mut rng, Country::Japan, 500, CohortKind::Survey)
            .expect("sample");
        for row in &rows {
            let ceiling = (f64::from(row.age) - f64::from(row.education.career_start_age()))
                .clamp(2.0, 40.0);
            assert!(
                row.tenure_years <= ceiling + 1e-9,
                "tenure {} exceeds ceiling {} (age {}, education {:?})",
                row.tenure_years,
                ceiling,
                row.age,
                row.education
            );
            assert!(row.tenure_years >= 2.0);
            assert!(row.tenure_years <= 30.0);
            assert!((25..=65).contains(&row.age));
        }
    }

    #[test]
    fn survey_rows_carry_numeric_org_size_within_bucket() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let rows = sample_demographics(&mut rng, Country::Vietnam, 200, CohortKind::Survey)
            .expect("sample");
        for row in &rows {
            let size = row.org_size_numeric.expect("survey rows carry numeric size");
            let (low, high) = row.org_size.numeric_range();
            assert!((low..high).contains(&size));
        }
    }

    #[test]
    fn interview_rows_omit_numeric_org_size() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let rows = sample_demographics(&mut rng, Country::Vietnam, 50, CohortKind::Interview)
            .expect("sample");
        assert!(rows.iter().all(|row| row.org_size_numeric.is_none()));
    }

    #[test]
    fn sampling_is_deterministic_for_a_fixed_seed() {
        let mut rng_a = ChaCha8Rng::seed_from_u64(42);
        let mut rng_b = ChaCha8Rng::seed_from_u64(42);
        let rows_a = sample_demographics(&mut rng_a, Country::Japan, 5, CohortKind::Survey)
            .expect("sample a");
        let rows_b = sample_demographics(&mut rng_b, Country::Japan, 5, CohortKind::Survey)
            .expect("sample b");
        assert_eq!(rows_a, rows_b);
    }
}
