//! Correlated latent-construct generation.
//!
//! Readiness scores come from a Cholesky-correlated standard-normal draw
//! rescaled to per-country targets; outcome scores are a regression on the
//! readiness dimensions plus cultural-value moderation terms. The
//! draw -> scale -> clip -> adjust -> clip sequence is non-commutative and
//! must stay in this order.

use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use surveysynth_core::{
    CULTURAL_SDS, Country, Demographics, Education, MODERATION_WEIGHTS, OUTCOME_INTERCEPT,
    OUTCOME_WEIGHTS, PositionLevel, READINESS_CORRELATION, SCALE_MAX, SCALE_MIN,
};

use crate::errors::GenerationError;

/// Cholesky factorization of a symmetric positive-definite 4x4 matrix.
/// Returns the lower-triangular factor.
pub fn cholesky4(matrix: [[f64; 4]; 4]) -> Result<[[f64; 4]; 4], GenerationError> {
    let mut factor = [[0.0_f64; 4]; 4];
    for i in 0..4 {
        for j in 0..=i {
            let mut sum = matrix[i][j];
            for k in 0..j {
                sum -= factor[i][k] * factor[j][k];
            }
            if i == j {
                if sum <= 0.0 {
                    return Err(GenerationError::InvalidDesign(
                        "correlation matrix is not positive definite".to_string(),
                    ));
                }
                factor[i][j] = sum.sqrt();
            } else {
                factor[i][j] = sum / factor[j][j];
            }
        }
    }
    Ok(factor)
}

/// Draw target readiness scores (TC, CMC, EA, ALO) for each demographic row.
///
/// These are generative targets only: the exported scores are recomputed
/// from the synthesized items.
pub fn readiness_scores(
    rng: &mut ChaCha8Rng,
    country: Country,
    demographics: &[Demographics],
) -> Result<Vec<[f64; 4]>, GenerationError> {
    let n = demographics.len();
    let params = country.readiness();
    let factor = cholesky4(READINESS_CORRELATION)?;
    let standard = Normal::new(0.0, 1.0).map_err(GenerationError::distribution)?;

    let mut scores: Vec<[f64; 4]> = Vec::with_capacity(n);
    for _ in 0..n {
        let z: [f64; 4] = std::array::from_fn(|_| standard.sample(rng));
        let mut row = [0.0_f64; 4];
        for dim in 0..4 {
            let mut value = 0.0;
            for k in 0..=dim {
                value += z[k] * factor[dim][k];
            }
            row[dim] = (value * params.sds[dim] + params.means[dim]).clamp(SCALE_MIN, SCALE_MAX);
        }
        scores.push(row);
    }

    // Covariate shifts, applied in fixed order; each clip can saturate, so
    // the order is load-bearing.
    if country == Country::Japan {
        let mean_age = demographics.iter().map(|d| f64::from(d.age)).sum::<f64>() / n.max(1) as f64;
        for (row, demo) in scores.iter_mut().zip(demographics) {
            row[0] += (f64::from(demo.age) - mean_age) * -0.02;
        }
    }
    if country == Country::Vietnam {
        for (row, demo) in scores.iter_mut().zip(demographics) {
            row[3] += match demo.education {
                Education::Bachelor => 0.0,
                Education::Master => 0.2,
                Education::Phd => 0.4,
            };
        }
    }
    for (row, demo) in scores.iter_mut().zip(demographics) {
        row[1] += match demo.position {
            PositionLevel::TeamLeader => 0.0,
            PositionLevel::DepartmentHead => 0.15,
            PositionLevel::SeniorExecutive => 0.30,
        };
    }
    for row in &mut scores {
        for value in row {
            *value = value.clamp(SCALE_MIN, SCALE_MAX);
        }
    }

    Ok(scores)
}

/// Draw target cultural-value scores (PD, UA, IC, LTO), column-wise.
pub fn cultural_scores(
    rng: &mut ChaCha8Rng,
    country: Country,
    n: usize,
) -> Result<Vec<[f64; 4]>, GenerationError> {
    let means = country.cultural_means();
    let mut scores = vec![[0.0_f64; 4]; n];
    for dim in 0..4 {
        let dist =
            Normal::new(means[dim], CULTURAL_SDS[dim]).map_err(GenerationError::distribution)?;
        for row in scores.iter_mut() {
            row[dim] = dist.sample(rng).clamp(SCALE_MIN, SCALE_MAX);
        }
    }
    Ok(scores)
}

/// Base scores for the three outcome sub-scales (OI, SA, OL), derived from a
/// moderated regression composite.
#[derive(Debug, Clone)]
pub struct OutcomeBases {
    pub operational: Vec<f64>,
    pub strategic: Vec<f64>,
    pub learning: Vec<f64>,
}

/// Compute the outcome composite and the three sub-scale base scores.
///
/// `readiness` and `cultural` must be the item-recomputed scores so the
/// moderation terms are centered on what the output table actually carries.
pub fn outcome_bases(
    rng: &mut ChaCha8Rng,
    country: Country,
    demographics: &[Demographics],
    readiness: &[[f64; 4]],
    cultural: &[[f64; 4]],
) -> Result<OutcomeBases, GenerationError> {
    let n = demographics.len();
    let readiness_means = column_means(readiness);
    let cultural_means = column_means(cultural);

    let mut composite = Vec::with_capacity(n);
    for i in 0..n {
        let mut value = OUTCOME_INTERCEPT;
        for dim in 0..4 {
            value += OUTCOME_WEIGHTS[dim] * readiness[i][dim];
        }
        for dim in 0..4 {
            let readiness_centered = readiness[i][dim] - readiness_means[dim];
            let cultural_centered = cultural[i][dim] - cultural_means[dim];
            value += MODERATION_WEIGHTS[dim] * readiness_centered * cultural_centered;
        }
        value += match demographics[i].position {
            PositionLevel::TeamLeader => 0.0,
            PositionLevel::DepartmentHead => 0.25,
            PositionLevel::SeniorExecutive => 0.50,
        };
        composite.push(value);
    }

    let noise = Normal::new(0.0, 0.30).map_err(GenerationError::distribution)?;
    for value in &mut composite {
        *value = (*value + noise.sample(rng)).clamp(SCALE_MIN, SCALE_MAX);
    }

    let boost = country.outcome_boost();
    let operational = shifted_column(rng, &composite, 0.0, boost, 0.28)?;
    let strategic = shifted_column(rng, &composite, -0.35, boost, 0.30)?;
    let learning = shifted_column(rng, &composite, 0.10, boost + 0.25, 0.27)?;

    Ok(OutcomeBases {
        operational,
        strategic,
        learning,
    })
}

fn shifted_column(
    rng: &mut ChaCha8Rng,
    composite: &[f64],
    offset: f64,
    noise_mean: f64,
    noise_sd: f64,
) -> Result<Vec<f64>, GenerationError> {
    let noise = Normal::new(noise_mean, noise_sd).map_err(GenerationError::distribution)?;
    Ok(composite
        .iter()
        .map(|value| (value + offset + noise.sample(rng)).clamp(SCALE_MIN, SCALE_MAX))
        .collect())
}

fn column_means(rows: &[[f64; 4]]) -> [f64; 4] {
    let mut means = [0.0_f64; 4];
    if rows.is_empty() {
        return means;
    }
    for row in rows {
        for dim in 0..4 {
            means[dim] += row[dim];
        }
    }
    for mean in &mut means {
        *mean /= rows.len() as f64;
    }
    means
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use surveysynth_core::CohortKind;

    use crate::sampler::sample_demographics;

    #[test]
    fn cholesky_reconstructs_the_correlation_matrix() {
        let factor = cholesky4(READINESS_CORRELATION).expect("factor");
        for i in 0..4 {
            for j in 0..4 {
                let mut value = 0.0;
                for k in 0..4 {
                    value += factor[i][k] * factor[j][k];
                }
                assert!(
                    (value - READINESS_CORRELATION[i][j]).abs() < 1e-12,
                    "({i},{j}): {value}"
                );
            }
        }
    }

    #[test]
    fn cholesky_rejects_non_positive_definite_input() {
        let mut matrix = READINESS_CORRELATION;
        matrix[0][1] = 2.0;
        matrix[1][0] = 2.0;
        assert!(cholesky4(matrix).is_err());
    }

    #[test]
    fn readiness_scores_stay_on_the_scale() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let demographics =
            sample_demographics(&mut rng, Country::Japan, 300, CohortKind::Survey).expect("demo");
        let scores = readiness_scores(&mut rng, Country::Japan, &demographics).expect("scores");
        assert_eq!(scores.len(), 300);
        for row in &scores {
            for value in row {
                assert!((SCALE_MIN..=SCALE_MAX).contains(value));
            }
        }
    }

    #[test]
    fn readiness_correlations_are_near_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let demographics =
            sample_demographics(&mut rng, Country::Vietnam, 4000, CohortKind::Survey)
                .expect("demo");
        let scores = readiness_scores(&mut rng, Country::Vietnam, &demographics).expect("scores");

        // TC/CMC target correlation is .54; shifts and clipping loosen it,
        // so accept a broad band around the target.
        let observed = correlation(&scores, 0, 1);
        assert!(
            (0.35..0.70).contains(&observed),
            "TC/CMC correlation {observed}"
        );
    }

    #[test]
    fn outcome_bases_stay_on_the_scale() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let demographics =
            sample_demographics(&mut rng, Country::Vietnam, 200, CohortKind::Survey).expect("demo");
        let readiness =
            readiness_scores(&mut rng, Country::Vietnam, &demographics).expect("readiness");
        let cultural = cultural_scores(&mut rng, Country::Vietnam, 200).expect("cultural");
        let bases = outcome_bases(&mut rng, Country::Vietnam, &demographics, &readiness, &cultural)
            .expect("bases");
        for column in [&bases.operational, &bases.strategic, &bases.learning] {
            assert_eq!(column.len(), 200);
            for value in column {
                assert!((SCALE_MIN..=SCALE_MAX).contains(value));
            }
        }
    }

    fn correlation(rows: &[[f64; 4]], a: usize, b: usize) -> f64 {
        let n = rows.len() as f64;
        let mean_a = rows.iter().map(|r| r[a]).sum::<f64>() / n;
        let mean_b = rows.iter().map(|r| r[b]).sum::<f64>() / n;
        let mut cov = 0.0;
        let mut var_a = 0.0;
        let mut var_b = 0.0;
        for row in rows {
            let da = row[a] - mean_a;
            let db = row[b] - mean_b;
            cov += da * db;
            var_a += da * da;
            var_b += db * db;
        }
        cov / (var_a.sqrt() * var_b.sqrt())
    }
}
