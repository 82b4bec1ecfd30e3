use std::fs;

use surveysynth_core::StudyDesign;
use surveysynth_generate::engine::Dataset;
use surveysynth_generate::{GenerateOptions, GenerationEngine};
use surveysynth_verify::{ParticipantView, VerificationEngine, VerifyError};

fn generated_dataset() -> Dataset {
    GenerationEngine::new(GenerateOptions::default())
        .generate(&StudyDesign::default())
        .expect("generate")
        .dataset
}

fn views(dataset: &Dataset) -> (Vec<ParticipantView>, Vec<ParticipantView>) {
    let interviews = dataset
        .interviews
        .iter()
        .map(ParticipantView::from_interview)
        .collect();
    let survey = dataset
        .survey
        .iter()
        .map(ParticipantView::from_survey)
        .collect();
    (interviews, survey)
}

#[test]
fn generated_dataset_verifies_clean() {
    let dataset = generated_dataset();
    let (interviews, survey) = views(&dataset);
    let report = VerificationEngine::new()
        .verify(&interviews, &survey, &dataset.linkage)
        .expect("verify");
    assert_eq!(report.checked_pairs, 15);
    assert!(report.all_match(), "mismatches: {:?}", report.mismatches);
}

#[test]
fn corrupted_age_yields_exactly_one_mismatch() {
    let dataset = generated_dataset();
    let (mut interviews, survey) = views(&dataset);

    let qual_id = dataset.linkage.keys().next().expect("linked pair").clone();
    let target = interviews
        .iter_mut()
        .find(|view| view.id == qual_id)
        .expect("linked interview");
    target.age += 1;

    let report = VerificationEngine::new()
        .verify(&interviews, &survey, &dataset.linkage)
        .expect("verify");
    assert!(!report.all_match());
    assert_eq!(report.mismatches.len(), 1);

    let mismatch = &report.mismatches[0];
    assert_eq!(mismatch.qual_id, qual_id);
    assert_eq!(mismatch.fields.len(), 1);
    assert_eq!(mismatch.fields[0].field, "Age");
}

#[test]
fn corrupting_an_unlinked_record_is_ignored() {
    let dataset = generated_dataset();
    let (mut interviews, survey) = views(&dataset);

    let target = interviews
        .iter_mut()
        .find(|view| !dataset.linkage.contains_key(&view.id))
        .expect("unlinked interview");
    target.age += 1;

    let report = VerificationEngine::new()
        .verify(&interviews, &survey, &dataset.linkage)
        .expect("verify");
    assert!(report.all_match());
}

#[test]
fn missing_survey_record_is_fatal() {
    let dataset = generated_dataset();
    let (interviews, mut survey) = views(&dataset);

    let linked_quant_id = dataset
        .linkage
        .values()
        .next()
        .expect("linked pair")
        .quant_id
        .clone();
    survey.retain(|view| view.id != linked_quant_id);

    let result = VerificationEngine::new().verify(&interviews, &survey, &dataset.linkage);
    match result {
        Err(VerifyError::MissingRecord { side, id }) => {
            assert_eq!(side, "survey");
            assert_eq!(id, linked_quant_id);
        }
        other => panic!("expected MissingRecord, got {other:?}"),
    }
}

#[test]
fn artifacts_loaded_from_disk_verify_clean() {
    let out_dir =
        std::env::temp_dir().join(format!("surveysynth-verify-{}", uuid::Uuid::new_v4()));
    let result = GenerationEngine::new(GenerateOptions {
        out_dir: out_dir.clone(),
    })
    .run(&StudyDesign::default())
    .expect("run");

    let report = VerificationEngine::new()
        .run(&result.run_dir)
        .expect("verify from artifacts");
    assert_eq!(report.checked_pairs, 15);
    assert!(report.all_match(), "mismatches: {:?}", report.mismatches);

    fs::remove_dir_all(&out_dir).ok();
}
