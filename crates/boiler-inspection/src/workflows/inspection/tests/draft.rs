use super::common::*;

use crate::workflows::inspection::builder::{FormField, RequiredField};
use crate::workflows::inspection::domain::{
    ChecklistAnswer, ChecklistDecision, InstalledProduct, TechnicalAttribute, MAX_PHOTO_COUNT,
};
use crate::workflows::inspection::draft::{DraftError, DraftIntent, InspectionDraft};

fn set(field: FormField, value: &str) -> DraftIntent {
    DraftIntent::SetField {
        field,
        value: value.to_string(),
    }
}

fn scenario_draft() -> InspectionDraft {
    let mut draft = InspectionDraft::new();
    for intent in [
        set(FormField::InspectionDate, "2024-01-10"),
        set(FormField::Inspector, "Kim"),
        set(FormField::SiteName, "Plant A"),
        set(FormField::Region, "서울특별시"),
        set(FormField::SubRegion, "강남구"),
        set(FormField::Result, "정상"),
        set(FormField::InstallationDate, "2023-01-10"),
        DraftIntent::AddProduct {
            product_id: "NCB790".to_string(),
            count: 2,
        },
    ] {
        draft.apply(intent).expect("intent applies");
    }
    draft
}

#[test]
fn intents_build_the_scenario_record() {
    let inspection = scenario_draft().commit(now()).expect("draft commits");

    assert_eq!(inspection.total_installed(), 2);
    assert_eq!(inspection.site().address(), "서울특별시 강남구");
    assert!(inspection
        .checklist()
        .values()
        .all(|answer| answer.decision == ChecklistDecision::Unanswered));
}

#[test]
fn commit_reports_missing_fields_without_consuming_the_draft() {
    let mut draft = scenario_draft();
    draft
        .apply(DraftIntent::ClearField {
            field: FormField::Inspector,
        })
        .expect("clear applies");

    let error = draft.commit(now()).expect_err("inspector missing");
    assert_eq!(error.missing_fields(), vec![RequiredField::Inspector]);

    draft.apply(set(FormField::Inspector, "Lee")).expect("set applies");
    let inspection = draft.commit(now()).expect("draft commits after fix");
    assert_eq!(inspection.inspector(), "Lee");
}

#[test]
fn changing_region_drops_a_stale_sub_region() {
    let mut draft = scenario_draft();
    draft
        .apply(set(FormField::Region, "경기도"))
        .expect("region change applies");
    assert_eq!(draft.submission().form.sub_region, None);

    draft
        .apply(set(FormField::SubRegion, "수원시"))
        .expect("sub-region applies");
    draft
        .apply(set(FormField::Region, "경기도"))
        .expect("same region applies");
    assert_eq!(draft.submission().form.sub_region.as_deref(), Some("수원시"));
}

#[test]
fn adding_the_same_product_merges_lines() {
    let mut draft = scenario_draft();
    draft
        .apply(DraftIntent::AddProduct {
            product_id: "NCB790".to_string(),
            count: 3,
        })
        .expect("merge applies");
    draft
        .apply(DraftIntent::AddProduct {
            product_id: "NR-20".to_string(),
            count: 1,
        })
        .expect("second product applies");

    assert_eq!(
        draft.submission().products,
        vec![
            InstalledProduct::new("NCB790", 5),
            InstalledProduct::new("NR-20", 1)
        ]
    );

    draft
        .apply(DraftIntent::SetProductCount { index: 1, count: 4 })
        .expect("count applies");
    draft
        .apply(DraftIntent::RemoveProduct { index: 0 })
        .expect("remove applies");
    assert_eq!(
        draft.submission().products,
        vec![InstalledProduct::new("NR-20", 4)]
    );

    let error = draft
        .apply(DraftIntent::RemoveProduct { index: 3 })
        .expect_err("index out of range");
    assert_eq!(error, DraftError::ProductIndexOutOfRange(3));
}

#[test]
fn photo_intake_stops_at_the_cap() {
    let mut draft = scenario_draft();
    for _ in 0..MAX_PHOTO_COUNT {
        draft.apply(DraftIntent::AttachPhoto).expect("photo attaches");
    }

    let error = draft
        .apply(DraftIntent::AttachPhoto)
        .expect_err("sixth photo refused");
    assert_eq!(error, DraftError::PhotoLimitReached { max: 5 });

    draft.apply(DraftIntent::DetachPhoto).expect("detach applies");
    let inspection = draft.commit(now()).expect("draft commits");
    assert_eq!(inspection.photo_count(), 4);
}

#[test]
fn checklist_and_technical_intents_flow_into_the_record() {
    let mut draft = scenario_draft();
    draft
        .apply(DraftIntent::SetChecklistAnswer {
            item_id: "flame_state".to_string(),
            answer: ChecklistAnswer::no("불꽃 색상 불량"),
        })
        .expect("answer applies");
    draft
        .apply(set(
            FormField::Technical(TechnicalAttribute::ExhaustType),
            "FE (강제배기)",
        ))
        .expect("technical applies");

    let inspection = draft.commit(now()).expect("draft commits");
    assert_eq!(
        inspection.checklist()["flame_state"].decision,
        ChecklistDecision::No
    );
    assert_eq!(
        inspection.technical().get(TechnicalAttribute::ExhaustType),
        Some("FE (강제배기)")
    );
}

#[test]
fn correction_draft_keeps_identity() {
    let original = scenario_inspection();
    let mut draft = InspectionDraft::from_inspection(&original);
    assert!(draft.is_correction());

    draft
        .apply(set(FormField::Result, "불량"))
        .expect("result applies");
    let corrected = draft.commit(at(2025, 3, 1)).expect("correction commits");

    assert_eq!(corrected.id(), original.id());
    assert_eq!(corrected.created_at(), original.created_at());
    assert_eq!(corrected.result().label(), "불량");
}

#[test]
fn intents_deserialize_from_tagged_json() {
    let intent: DraftIntent = serde_json::from_str(
        r#"{"intent":"set_field","field":"site_name","value":"Plant C"}"#,
    )
    .expect("intent parses");
    assert_eq!(intent, set(FormField::SiteName, "Plant C"));
}
