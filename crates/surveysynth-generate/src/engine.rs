//! Generation engine: runs the fixed-order pipeline and writes run
//! artifacts.
//!
//! The pipeline consumes the single seeded random stream in a strict
//! sequence (linkage plan, interview cohort per country, survey cohort per
//! country). Each executed stage is recorded in the report so any reordering
//! shows up as a reviewable diff instead of a silent reproducibility break.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::time::Instant;

use chrono::{Duration, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use surveysynth_core::{
    CohortKind, Country, Demographics, InterviewRecord, LinkageMap, Phase, StudyDesign,
    SurveyRecord, participant_id,
};

use crate::constructs::{cultural_scores, outcome_bases, readiness_scores};
use crate::errors::GenerationError;
use crate::items::{
    CULTURAL_ITEM_SD, OUTCOME_ITEM_SD, expand_column, readiness_items, round2,
};
use crate::linkage::{LinkagePlan, build_linkage};
use crate::model::{
    DimensionSummary, GenerateOptions, GenerationReport, InterviewSummary, OutcomeSummary,
    OverlapSummary, SummaryStatistics, SurveySummary,
};
use crate::output::csv::{write_interview_csv, write_survey_csv};
use crate::sampler::{sample_demographics, sample_interview_profile};

/// The two assembled cohort tables plus their linkage map.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub survey: Vec<SurveyRecord>,
    pub interviews: Vec<InterviewRecord>,
    pub linkage: LinkageMap,
}

/// Dataset plus the executed pipeline stages, in order.
#[derive(Debug, Clone)]
pub struct Generation {
    pub dataset: Dataset,
    pub stages: Vec<String>,
}

/// Result of a full generation run, including written artifacts.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub run_dir: PathBuf,
    pub report: GenerationReport,
    pub dataset: Dataset,
}

/// Entry point for generating the study dataset.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    /// Generate both cohorts in memory without touching the filesystem.
    pub fn generate(&self, design: &StudyDesign) -> Result<Generation, GenerationError> {
        design.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(design.seed);
        let mut stages = Vec::new();

        stages.push("linkage_plan".to_string());
        let plan = build_linkage(&mut rng, design)?;
        info!(linked_pairs = plan.linkage.len(), "linkage plan built");

        let mut interviews = Vec::new();
        for country in Country::ALL {
            stages.push(format!("interview_cohort_{}", country.code().to_lowercase()));
            generate_interviews(&mut rng, design, country, &plan, &mut interviews)?;
        }
        info!(rows = interviews.len(), "interview cohort generated");

        let survey_keys = plan.survey_keys();
        let mut survey = Vec::new();
        for country in Country::ALL {
            stages.push(format!("survey_cohort_{}", country.code().to_lowercase()));
            generate_survey_cohort(&mut rng, design, country, &plan, &survey_keys, &mut survey)?;
        }
        info!(rows = survey.len(), "survey cohort generated");

        stages.push("assembly".to_string());
        Ok(Generation {
            dataset: Dataset {
                survey,
                interviews,
                linkage: plan.linkage,
            },
            stages,
        })
    }

    /// Generate and write all run artifacts into a fresh run directory.
    pub fn run(&self, design: &StudyDesign) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string();
        let run_dir = self
            .options
            .out_dir
            .join(format!("{timestamp}__run_{run_id}"));
        std::fs::create_dir_all(&run_dir)?;

        info!(run_id = %run_id, seed = design.seed, "generation started");
        let generation = self.generate(design)?;
        let dataset = generation.dataset;

        let mut bytes_written = 0_u64;
        bytes_written += write_survey_csv(&run_dir.join("survey_data_complete.csv"), &dataset.survey)?;
        bytes_written +=
            write_interview_csv(&run_dir.join("interview_metadata.csv"), &dataset.interviews)?;

        let linkage_json = serde_json::to_vec_pretty(&dataset.linkage)?;
        bytes_written += linkage_json.len() as u64;
        std::fs::write(run_dir.join("participant_linkage_masked.json"), linkage_json)?;

        let summary = summarize(&dataset);
        let summary_json = serde_json::to_vec_pretty(&summary)?;
        bytes_written += summary_json.len() as u64;
        std::fs::write(run_dir.join("summary_statistics.json"), summary_json)?;

        let report = GenerationReport {
            run_id: run_id.clone(),
            seed: design.seed,
            stages: generation.stages,
            survey_rows: dataset.survey.len(),
            interview_rows: dataset.interviews.len(),
            linked_pairs: dataset.linkage.len(),
            duration_ms: start.elapsed().as_millis() as u64,
            bytes_written,
        };
        std::fs::write(
            run_dir.join("generation_report.json"),
            serde_json::to_vec_pretty(&report)?,
        )?;

        info!(
            run_id = %run_id,
            survey_rows = report.survey_rows,
            interview_rows = report.interview_rows,
            linked_pairs = report.linked_pairs,
            duration_ms = report.duration_ms,
            bytes_written = report.bytes_written,
            "generation completed"
        );

        Ok(GenerationResult {
            run_dir,
            report,
            dataset,
        })
    }
}

fn generate_interviews(
    rng: &mut ChaCha8Rng,
    design: &StudyDesign,
    country: Country,
    plan: &LinkagePlan,
    out: &mut Vec<InterviewRecord>,
) -> Result<(), GenerationError> {
    let base_date = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap_or_default();
    let (duration_low, duration_high, experience_low, experience_high) = match country {
        Country::Japan => (55, 95, 1, 6),
        Country::Vietnam => (60, 90, 1, 5),
    };

    for sequence in 1..=design.interview_n(country) {
        let qual_id = participant_id(country, Phase::Qual, sequence);
        let interview_date = base_date + Duration::days(rng.random_range(0..90));

        let (age, gender, position, industry) = match plan.shared_interview.get(&qual_id) {
            Some(shared) => (
                shared.age,
                shared.gender,
                shared.position.tier(),
                shared.industry,
            ),
            None => {
                let profile = sample_interview_profile(rng, country);
                (profile.age, profile.gender, profile.position, profile.industry)
            }
        };

        let link_key = plan
            .linkage
            .get(&qual_id)
            .map(|entry| entry.link_key.clone());

        out.push(InterviewRecord {
            interview_id: qual_id,
            country,
            interview_date,
            position,
            industry,
            age,
            gender,
            duration_min: rng.random_range(duration_low..duration_high),
            ai_experience_years: rng.random_range(experience_low..experience_high),
            also_in_survey: link_key.is_some(),
            link_key,
        });
    }

    Ok(())
}

fn generate_survey_cohort(
    rng: &mut ChaCha8Rng,
    design: &StudyDesign,
    country: Country,
    plan: &LinkagePlan,
    survey_keys: &HashMap<String, String>,
    out: &mut Vec<SurveyRecord>,
) -> Result<(), GenerationError> {
    let n = design.survey_n(country);
    let linked_count = plan
        .shared_survey
        .keys()
        .filter(|id| id.starts_with(country.code()))
        .count();

    let fresh = sample_demographics(rng, country, n - linked_count, CohortKind::Survey)?;
    let mut fresh_rows = fresh.into_iter();

    let mut ids = Vec::with_capacity(n);
    let mut demographics: Vec<Demographics> = Vec::with_capacity(n);
    for sequence in 1..=n {
        let quant_id = participant_id(country, Phase::Quant, sequence);
        let row = match plan.shared_survey.get(&quant_id) {
            Some(shared) => shared.clone(),
            None => fresh_rows.next().ok_or_else(|| {
                GenerationError::InvalidDesign(
                    "survey cohort ran out of demographic rows".to_string(),
                )
            })?,
        };
        ids.push(quant_id);
        demographics.push(row);
    }

    // Constructs: target readiness draws seed the items, and the exported
    // scores are recomputed from those items before the outcome regression
    // consumes them.
    let targets = readiness_scores(rng, country, &demographics)?;
    let (readiness_item_rows, readiness) = readiness_items(rng, &targets)?;

    let cultural_targets = cultural_scores(rng, country, n)?;
    let mut cultural_item_rows = vec![[[0_u8; 3]; 4]; n];
    let mut cultural = vec![[0.0_f64; 4]; n];
    for dim in 0..4 {
        let column: Vec<f64> = cultural_targets.iter().map(|row| row[dim]).collect();
        let (item_rows, scores) = expand_column::<3>(rng, &column, CULTURAL_ITEM_SD)?;
        for i in 0..n {
            cultural_item_rows[i][dim] = item_rows[i];
            cultural[i][dim] = scores[i];
        }
    }

    let bases = outcome_bases(rng, country, &demographics, &readiness, &cultural)?;
    let (operational_items, operational) =
        expand_column::<4>(rng, &bases.operational, OUTCOME_ITEM_SD)?;
    let (strategic_items, strategic) = expand_column::<4>(rng, &bases.strategic, OUTCOME_ITEM_SD)?;
    let (learning_items, learning) = expand_column::<4>(rng, &bases.learning, OUTCOME_ITEM_SD)?;

    let survey_base = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap_or_default();
    let survey_dates: Vec<NaiveDate> = (0..n)
        .map(|_| survey_base + Duration::days(rng.random_range(0..120)))
        .collect();

    for i in 0..n {
        let overall =
            round2((operational[i] + strategic[i] + learning[i]) / 3.0);
        out.push(SurveyRecord {
            link_key: survey_keys.get(&ids[i]).cloned(),
            participant_id: ids[i].clone(),
            demographics: demographics[i].clone(),
            readiness_scores: readiness[i],
            readiness_items: readiness_item_rows[i],
            outcome_scores: [operational[i], strategic[i], learning[i]],
            overall_success: overall,
            outcome_items: [operational_items[i], strategic_items[i], learning_items[i]],
            cultural_scores: cultural[i],
            cultural_items: cultural_item_rows[i],
            survey_date: survey_dates[i],
        });
    }

    Ok(())
}

/// Summary statistics over the assembled dataset, per country.
pub fn summarize(dataset: &Dataset) -> SummaryStatistics {
    let mut quantitative = BTreeMap::new();
    let mut qualitative = BTreeMap::new();

    for country in Country::ALL {
        let rows: Vec<&SurveyRecord> = dataset
            .survey
            .iter()
            .filter(|record| record.demographics.country == country)
            .collect();

        let ages: Vec<f64> = rows
            .iter()
            .map(|record| f64::from(record.demographics.age))
            .collect();
        let tenures: Vec<f64> = rows
            .iter()
            .map(|record| record.demographics.tenure_years)
            .collect();
        let male = rows
            .iter()
            .filter(|record| record.demographics.gender == surveysynth_core::Gender::Male)
            .count();

        let mut readiness = BTreeMap::new();
        for (dim, label) in surveysynth_core::READINESS_DIMS.iter().enumerate() {
            let scores: Vec<f64> = rows
                .iter()
                .map(|record| record.readiness_scores[dim])
                .collect();
            readiness.insert(
                (*label).to_string(),
                DimensionSummary {
                    mean: mean(&scores),
                    sd: sample_sd(&scores),
                },
            );
        }

        let outcome_mean = |dim: usize| {
            let scores: Vec<f64> = rows.iter().map(|record| record.outcome_scores[dim]).collect();
            mean(&scores)
        };
        let overall: Vec<f64> = rows.iter().map(|record| record.overall_success).collect();

        quantitative.insert(
            country.name().to_string(),
            SurveySummary {
                n: rows.len(),
                mean_age: mean(&ages),
                sd_age: sample_sd(&ages),
                pct_male: if rows.is_empty() {
                    0.0
                } else {
                    male as f64 / rows.len() as f64 * 100.0
                },
                mean_tenure: mean(&tenures),
                sd_tenure: sample_sd(&tenures),
                readiness,
                outcomes: OutcomeSummary {
                    operational: outcome_mean(0),
                    strategic: outcome_mean(1),
                    learning: outcome_mean(2),
                    overall: mean(&overall),
                },
            },
        );

        let interviews: Vec<&InterviewRecord> = dataset
            .interviews
            .iter()
            .filter(|record| record.country == country)
            .collect();
        let durations: Vec<f64> = interviews
            .iter()
            .map(|record| f64::from(record.duration_min))
            .collect();
        qualitative.insert(
            country.name().to_string(),
            InterviewSummary {
                n: interviews.len(),
                avg_duration_min: mean(&durations),
                in_both_phases: interviews
                    .iter()
                    .filter(|record| record.also_in_survey)
                    .count(),
            },
        );
    }

    let japan_overlap = dataset
        .linkage
        .keys()
        .filter(|id| id.starts_with("JP"))
        .count();
    let vietnam_overlap = dataset.linkage.len() - japan_overlap;

    SummaryStatistics {
        quantitative,
        qualitative,
        overlap: OverlapSummary {
            total_in_both_phases: dataset.linkage.len(),
            japan_overlap,
            vietnam_overlap,
            overlap_percentage: if dataset.interviews.is_empty() {
                0.0
            } else {
                dataset.linkage.len() as f64 / dataset.interviews.len() as f64 * 100.0
            },
        },
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n − 1 denominator).
fn sample_sd(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let center = mean(values);
    let variance = values
        .iter()
        .map(|value| (value - center).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}
