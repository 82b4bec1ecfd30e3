//! Privacy-preserving record linkage between the two cohorts.
//!
//! For each country an overlap subset of interview participants is paired
//! with survey participants. Each pair shares one demographic row (exact
//! equality, not statistical similarity) and a masked link key: the first 16
//! hex characters of SHA-256 over `"{qual_id}_{quant_id}"`. The key is a
//! deterministic pseudonymization, not a security boundary.

use std::collections::HashMap;

use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

use surveysynth_core::{
    CohortKind, Country, Demographics, LinkageEntry, LinkageMap, Phase, StudyDesign,
    participant_id,
};

use crate::errors::GenerationError;
use crate::sampler::sample_demographics;

/// Hex characters retained from the SHA-256 digest.
const LINK_KEY_LEN: usize = 16;

/// Masked link key binding a qualitative ID to a quantitative ID.
pub fn link_key(qual_id: &str, quant_id: &str) -> String {
    let digest = Sha256::digest(format!("{qual_id}_{quant_id}").as_bytes());
    hex::encode(digest)[..LINK_KEY_LEN].to_string()
}

/// Linkage map plus the shared demographic payload for both sides of every
/// pair.
#[derive(Debug, Clone)]
pub struct LinkagePlan {
    pub linkage: LinkageMap,
    /// Survey participant ID -> shared demographic row.
    pub shared_survey: HashMap<String, Demographics>,
    /// Interview participant ID -> shared demographic row.
    pub shared_interview: HashMap<String, Demographics>,
}

impl LinkagePlan {
    /// Link keys indexed by survey participant ID.
    pub fn survey_keys(&self) -> HashMap<String, String> {
        self.linkage
            .values()
            .map(|entry| (entry.quant_id.clone(), entry.link_key.clone()))
            .collect()
    }
}

/// Build the overlap linkage for both countries.
///
/// Draw order (fixed): qualitative overlap indices for Japan then Vietnam,
/// quantitative overlap indices for Japan then Vietnam, shared demographics
/// for Japan then Vietnam. An overlap count of zero yields an empty plan.
pub fn build_linkage(
    rng: &mut ChaCha8Rng,
    design: &StudyDesign,
) -> Result<LinkagePlan, GenerationError> {
    let mut qual_indices = HashMap::new();
    for country in Country::ALL {
        qual_indices.insert(
            country,
            draw_sorted_indices(rng, design.interview_n(country), design.overlap_n(country)),
        );
    }
    let mut quant_indices = HashMap::new();
    for country in Country::ALL {
        quant_indices.insert(
            country,
            draw_sorted_indices(rng, design.survey_n(country), design.overlap_n(country)),
        );
    }

    let mut plan = LinkagePlan {
        linkage: LinkageMap::new(),
        shared_survey: HashMap::new(),
        shared_interview: HashMap::new(),
    };

    for country in Country::ALL {
        let overlap = design.overlap_n(country);
        // Shared rows use the survey parameterization so the numeric
        // organization size is present on the quantitative side.
        let shared = sample_demographics(rng, country, overlap, CohortKind::Survey)?;
        let quals = &qual_indices[&country];
        let quants = &quant_indices[&country];

        for slot in 0..overlap {
            let qual_id = participant_id(country, Phase::Qual, quals[slot] + 1);
            let quant_id = participant_id(country, Phase::Quant, quants[slot] + 1);
            let key = link_key(&qual_id, &quant_id);

            plan.shared_interview
                .insert(qual_id.clone(), shared[slot].clone());
            plan.shared_survey
                .insert(quant_id.clone(), shared[slot].clone());
            plan.linkage.insert(
                qual_id,
                LinkageEntry {
                    quant_id,
                    link_key: key,
                },
            );
        }
    }

    Ok(plan)
}

fn draw_sorted_indices(rng: &mut ChaCha8Rng, population: usize, amount: usize) -> Vec<usize> {
    let mut indices = rand::seq::index::sample(rng, population, amount).into_vec();
    indices.sort_unstable();
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn link_key_matches_sha256_prefix() {
        // SHA-256("JP_QUAL_001_JP_QUANT_007"), first 16 hex chars.
        let key = link_key("JP_QUAL_001", "JP_QUANT_007");
        assert_eq!(key.len(), 16);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, link_key("JP_QUAL_001", "JP_QUANT_007"));
        assert_ne!(key, link_key("JP_QUAL_002", "JP_QUANT_007"));
        assert_ne!(key, link_key("JP_QUAL_001", "JP_QUANT_008"));

        let digest = Sha256::digest("JP_QUAL_001_JP_QUANT_007".as_bytes());
        assert_eq!(key, hex::encode(digest)[..16]);
    }

    #[test]
    fn overlap_counts_floor_per_country() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let design = StudyDesign::default();
        let plan = build_linkage(&mut rng, &design).expect("plan");

        let japan = plan
            .linkage
            .keys()
            .filter(|id| id.starts_with("JP"))
            .count();
        let vietnam = plan
            .linkage
            .keys()
            .filter(|id| id.starts_with("VN"))
            .count();
        assert_eq!(japan, 8);
        assert_eq!(vietnam, 7);
        assert_eq!(plan.linkage.len(), 15);
    }

    #[test]
    fn zero_overlap_yields_empty_plan() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let design = StudyDesign {
            overlap_fraction: 0.0,
            ..StudyDesign::default()
        };
        let plan = build_linkage(&mut rng, &design).expect("plan");
        assert!(plan.linkage.is_empty());
        assert!(plan.shared_survey.is_empty());
        assert!(plan.shared_interview.is_empty());
    }

    #[test]
    fn shared_rows_are_identical_on_both_sides() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let plan = build_linkage(&mut rng, &StudyDesign::default()).expect("plan");
        for (qual_id, entry) in &plan.linkage {
            let interview_side = &plan.shared_interview[qual_id];
            let survey_side = &plan.shared_survey[&entry.quant_id];
            assert_eq!(interview_side, survey_side);
        }
    }

    #[test]
    fn paired_ids_are_distinct_within_each_side() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let plan = build_linkage(&mut rng, &StudyDesign::default()).expect("plan");
        let quant_ids: std::collections::HashSet<_> =
            plan.linkage.values().map(|entry| &entry.quant_id).collect();
        assert_eq!(quant_ids.len(), plan.linkage.len());
    }
}
