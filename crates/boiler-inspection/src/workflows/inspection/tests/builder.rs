use super::common::*;

use crate::workflows::inspection::builder::{
    build, build_replacement, RawInspectionForm, RequiredField, Violation,
};
use crate::workflows::inspection::derivation::BadgeTag;
use crate::workflows::inspection::domain::{
    ChecklistAnswer, ChecklistDecision, InspectionResult, InstalledProduct, TechnicalAttribute,
};
use crate::workflows::inspection::reference::{CHECKLIST_CATALOG, CHECKLIST_SIZE};
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[test]
fn scenario_builds_with_derived_values() {
    let inspection = scenario_inspection();

    assert_eq!(inspection.total_installed(), 2);
    assert_eq!(
        inspection
            .usage_duration(now())
            .map(|duration| duration.to_string())
            .as_deref(),
        Some("2년 0개월")
    );
    assert_eq!(inspection.badge(), BadgeTag::Success);
    assert_eq!(inspection.result(), InspectionResult::Normal);
    assert_eq!(inspection.checklist().len(), CHECKLIST_SIZE);
    assert!(inspection
        .checklist()
        .values()
        .all(|answer| answer.decision == ChecklistDecision::Unanswered));
    assert_eq!(inspection.created_at(), now());
    assert_eq!(inspection.site().address(), "서울특별시 강남구");
}

#[test]
fn checklist_keys_match_the_catalog() {
    let inspection = detailed_submission()
        .build(now())
        .expect("detailed submission builds");

    let keys: Vec<&str> = inspection.checklist().keys().map(String::as_str).collect();
    let mut catalog: Vec<&str> = CHECKLIST_CATALOG.iter().map(|item| item.id).collect();
    catalog.sort_unstable();
    assert_eq!(keys, catalog);
    assert_eq!(
        inspection.checklist()["exhaust_pipe_joint"],
        ChecklistAnswer::no("실리콘 마감 누락")
    );
    assert_eq!(inspection.checklist_completion().to_string(), "2/23");
}

#[test]
fn empty_form_lists_every_missing_field() {
    let error = build(
        &RawInspectionForm::default(),
        &[],
        &BTreeMap::new(),
        0,
        now(),
    )
    .expect_err("empty form rejected");

    assert_eq!(
        error.missing_fields(),
        vec![
            RequiredField::InspectionDate,
            RequiredField::Inspector,
            RequiredField::SiteName,
            RequiredField::Region,
            RequiredField::SubRegion,
            RequiredField::Result,
        ]
    );
}

#[test]
fn whitespace_only_fields_count_as_missing() {
    let mut form = scenario_form();
    form.inspector = Some("   ".to_string());

    let error = build(&form, &[], &BTreeMap::new(), 0, now()).expect_err("blank inspector");
    assert_eq!(error.missing_fields(), vec![RequiredField::Inspector]);
}

#[test]
fn sub_region_must_belong_to_region() {
    let mut form = scenario_form();
    form.region = Some("경기도".to_string());

    let error = build(&form, &[], &BTreeMap::new(), 0, now()).expect_err("mismatch rejected");
    assert_eq!(
        error.violations,
        vec![Violation::SubRegionMismatch {
            region: "경기도".to_string(),
            sub_region: "강남구".to_string(),
        }]
    );
}

#[test]
fn unknown_region_is_rejected() {
    let mut form = scenario_form();
    form.region = Some("제주특별자치도".to_string());

    let error = build(&form, &[], &BTreeMap::new(), 0, now()).expect_err("unknown region");
    assert_eq!(
        error.violations,
        vec![Violation::UnknownRegion("제주특별자치도".to_string())]
    );
}

#[test]
fn collects_every_violation_in_one_pass() {
    let mut form = scenario_form();
    form.inspection_date = Some("2024/01/10".to_string());
    form.result = Some("양호".to_string());
    form.fuel = Some("석탄".to_string());

    let mut answers = BTreeMap::new();
    answers.insert("exhaust_pipe_joint".to_string(), ChecklistAnswer::no("  "));
    answers.insert("boiler_color".to_string(), ChecklistAnswer::yes());

    let products = vec![
        InstalledProduct::new("NCB790", 0),
        InstalledProduct::new("XYZ-1", 1),
    ];

    let error = build(&form, &products, &answers, 6, now()).expect_err("invalid submission");
    let violations = error.violations;

    assert!(violations.contains(&Violation::InvalidDate {
        field: "inspection_date",
        value: "2024/01/10".to_string(),
    }));
    assert!(violations.contains(&Violation::UnknownResult("양호".to_string())));
    assert!(violations.contains(&Violation::UnknownOption {
        attribute: TechnicalAttribute::Fuel,
        value: "석탄".to_string(),
    }));
    assert!(violations.contains(&Violation::InvalidProductCount {
        product_id: "NCB790".to_string(),
    }));
    assert!(violations.contains(&Violation::UnknownProduct("XYZ-1".to_string())));
    assert!(violations.contains(&Violation::MissingFailureReason(
        "exhaust_pipe_joint".to_string()
    )));
    assert!(violations.contains(&Violation::UnknownChecklistItem(
        "boiler_color".to_string()
    )));
    assert!(violations.contains(&Violation::TooManyPhotos { count: 6, max: 5 }));
    assert_eq!(violations.len(), 8);
}

#[test]
fn future_installation_date_is_rejected() {
    let mut form = scenario_form();
    form.installation_date = Some("2025-03-01".to_string());

    let error = build(&form, &[], &BTreeMap::new(), 0, now()).expect_err("future install");
    assert_eq!(
        error.violations,
        vec![Violation::InstallationInFuture(
            NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date")
        )]
    );
}

#[test]
fn result_accepts_english_aliases() {
    let mut form = scenario_form();
    form.result = Some("defective".to_string());

    let inspection = build(&form, &[], &BTreeMap::new(), 0, now()).expect("alias accepted");
    assert_eq!(inspection.result(), InspectionResult::Defective);
    assert_eq!(inspection.badge(), BadgeTag::Danger);
}

#[test]
fn optional_text_is_trimmed_and_blank_dropped() {
    let mut submission = scenario_submission();
    submission.form.summary = Some("  정상 작동  ".to_string());
    submission.form.contractor_name = Some(" ".to_string());

    let inspection = submission.build(now()).expect("builds");
    assert_eq!(inspection.summary(), Some("정상 작동"));
    assert_eq!(inspection.contractor_name(), None);
}

#[test]
fn replacement_keeps_identity() {
    let original = scenario_inspection();
    let mut corrected = detailed_submission();
    corrected.form.site_name = Some("Plant B".to_string());

    let later = at(2025, 2, 1);
    let replacement = build_replacement(&original, &corrected, later).expect("replacement builds");

    assert_eq!(replacement.id(), original.id());
    assert_eq!(replacement.created_at(), original.created_at());
    assert_eq!(replacement.site().site_name, "Plant B");
    assert_eq!(replacement.photo_count(), 3);
}

#[test]
fn fresh_builds_get_distinct_ids() {
    let first = scenario_inspection();
    let second = scenario_inspection();
    assert_ne!(first.id(), second.id());
}
