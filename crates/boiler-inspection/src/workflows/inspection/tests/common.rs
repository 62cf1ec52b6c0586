use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::inspection::builder::{InspectionSubmission, RawInspectionForm};
use crate::workflows::inspection::domain::{
    ChecklistAnswer, Inspection, InspectionId, InspectionPatch, InstalledProduct,
};
use crate::workflows::inspection::repository::{
    newest_first, InspectionRepository, RepositoryError,
};
use crate::workflows::inspection::{inspection_router, InspectionService};

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn now() -> DateTime<Utc> {
    at(2025, 1, 10)
}

pub(super) fn scenario_form() -> RawInspectionForm {
    RawInspectionForm {
        inspection_date: Some("2024-01-10".to_string()),
        inspector: Some("Kim".to_string()),
        site_name: Some("Plant A".to_string()),
        region: Some("서울특별시".to_string()),
        sub_region: Some("강남구".to_string()),
        result: Some("정상".to_string()),
        installation_date: Some("2023-01-10".to_string()),
        ..RawInspectionForm::default()
    }
}

pub(super) fn scenario_submission() -> InspectionSubmission {
    InspectionSubmission {
        form: scenario_form(),
        products: vec![InstalledProduct::new("NCB790", 2)],
        ..InspectionSubmission::default()
    }
}

/// Every optional section filled in, one failed checklist item.
pub(super) fn detailed_submission() -> InspectionSubmission {
    let mut submission = scenario_submission();
    submission.form.result = Some("주의".to_string());
    submission.form.summary = Some("배기통 접속부 재시공 필요".to_string());
    submission.form.facility_manager = Some("Park".to_string());
    submission.form.contractor_name = Some("한빛설비".to_string());
    submission.form.business_type = Some("설비 시공".to_string());
    submission.form.fuel = Some("LNG".to_string());
    submission.form.exhaust_type = Some("FF (강제급배기)".to_string());
    submission.form.purpose = Some("가정용".to_string());
    submission.products.push(InstalledProduct::new("NR-20", 1));
    submission
        .checklist_answers
        .insert("install_location".to_string(), ChecklistAnswer::yes());
    submission.checklist_answers.insert(
        "exhaust_pipe_joint".to_string(),
        ChecklistAnswer::no("실리콘 마감 누락"),
    );
    submission
        .checklist_answers
        .insert("ignition_test".to_string(), ChecklistAnswer::yes());
    submission.photo_count = 3;
    submission
}

pub(super) fn scenario_inspection() -> Inspection {
    scenario_submission()
        .build(now())
        .expect("scenario submission builds")
}

pub(super) fn build_service() -> (InspectionService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = InspectionService::new(repository.clone());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<Vec<Inspection>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl InspectionRepository for MemoryRepository {
    fn list(&self) -> Result<Vec<Inspection>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut inspections = guard.clone();
        inspections.sort_by(newest_first);
        Ok(inspections)
    }

    fn fetch(&self, id: &InspectionId) -> Result<Option<Inspection>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|inspection| inspection.id() == id).cloned())
    }

    fn save(&self, inspection: Inspection) -> Result<Inspection, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id() == inspection.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(inspection.clone());
        Ok(inspection)
    }

    fn update(
        &self,
        id: &InspectionId,
        patch: &InspectionPatch,
    ) -> Result<Inspection, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|inspection| inspection.id() == id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = slot.with_patch(patch);
        Ok(slot.clone())
    }

    fn replace(&self, inspection: Inspection) -> Result<Inspection, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id() == inspection.id())
            .ok_or(RepositoryError::NotFound)?;
        *slot = inspection.clone();
        Ok(inspection)
    }

    fn delete(&self, id: &InspectionId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let before = guard.len();
        guard.retain(|inspection| inspection.id() != id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl InspectionRepository for UnavailableRepository {
    fn list(&self) -> Result<Vec<Inspection>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn fetch(&self, _id: &InspectionId) -> Result<Option<Inspection>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn save(&self, _inspection: Inspection) -> Result<Inspection, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn update(
        &self,
        _id: &InspectionId,
        _patch: &InspectionPatch,
    ) -> Result<Inspection, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn replace(&self, _inspection: Inspection) -> Result<Inspection, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn delete(&self, _id: &InspectionId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }
}

pub(super) fn router_with_service(service: InspectionService<MemoryRepository>) -> axum::Router {
    inspection_router(Arc::new(service))
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
