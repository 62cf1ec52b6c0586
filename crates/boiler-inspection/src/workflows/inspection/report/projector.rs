use super::super::domain::{ChecklistDecision, Inspection, TechnicalAttribute};
use super::super::reference::{self, CHECKLIST_CATALOG};
use super::views::{
    ChecklistRow, ReportDocument, ReportField, ReportSection, SectionBody, SectionKind,
    MISSING_SUMMARY, REPORT_TITLE,
};
use chrono::{DateTime, Utc};

/// Raised only for records that bypassed the builder's invariants.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("product {0:?} is not in the catalog")]
    UnknownProduct(String),
    #[error("checklist item {0:?} is not in the catalog")]
    UnknownChecklistItem(String),
    #[error("checklist is missing item {0:?}")]
    IncompleteChecklist(&'static str),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ReportProjector;

impl ReportProjector {
    pub fn new() -> Self {
        Self
    }

    /// Same inspection and `now` always yield the same document. `now`
    /// drives both the usage duration and the generation stamp.
    pub fn project(
        &self,
        inspection: &Inspection,
        now: DateTime<Utc>,
    ) -> Result<ReportDocument, ProjectionError> {
        let sections = SectionKind::ordered()
            .into_iter()
            .map(|kind| -> Result<ReportSection, ProjectionError> {
                let body = match kind {
                    SectionKind::Header => header(inspection),
                    SectionKind::Site => site(inspection),
                    SectionKind::Contractor => contractor(inspection),
                    SectionKind::Products => products(inspection)?,
                    SectionKind::Installation => installation(inspection, now),
                    SectionKind::Technical => technical(inspection),
                    SectionKind::Checklist => checklist(inspection)?,
                    SectionKind::Summary => SectionBody::Text(
                        inspection.summary().unwrap_or(MISSING_SUMMARY).to_string(),
                    ),
                    SectionKind::Attachments => SectionBody::Fields(vec![ReportField::new(
                        "첨부 사진",
                        format!("{}장", inspection.photo_count()),
                    )]),
                    SectionKind::Generation => SectionBody::Fields(vec![ReportField::new(
                        "생성 시간",
                        now.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                    )]),
                };
                Ok(ReportSection::new(kind, body))
            })
            .collect::<Result<Vec<_>, ProjectionError>>()?;

        Ok(ReportDocument {
            title: REPORT_TITLE,
            inspection_id: inspection.id().clone(),
            site_name: inspection.site().site_name.clone(),
            inspection_date: inspection.inspection_date(),
            badge: inspection.badge(),
            sections,
            generated_at: now,
        })
    }
}

fn header(inspection: &Inspection) -> SectionBody {
    SectionBody::Fields(vec![
        ReportField::new("점검 번호", inspection.id().as_str()),
        ReportField::new(
            "점검일",
            inspection.inspection_date().format("%Y-%m-%d").to_string(),
        ),
        ReportField::new("점검자", inspection.inspector()),
        ReportField::new("점검 결과", inspection.result().label()),
    ])
}

fn site(inspection: &Inspection) -> SectionBody {
    SectionBody::Fields(vec![
        ReportField::new("현장명", inspection.site().site_name.as_str()),
        ReportField::new("주소", inspection.site().address()),
        ReportField::or_missing("시설 관리자", inspection.facility_manager()),
    ])
}

fn contractor(inspection: &Inspection) -> SectionBody {
    SectionBody::Fields(vec![
        ReportField::or_missing("시공업체", inspection.contractor_name()),
        ReportField::or_missing("업종", inspection.business_type()),
    ])
}

fn products(inspection: &Inspection) -> Result<SectionBody, ProjectionError> {
    let mut fields = inspection
        .products()
        .iter()
        .map(|product| -> Result<ReportField, ProjectionError> {
            let label = reference::product_label(&product.product_id)
                .ok_or_else(|| ProjectionError::UnknownProduct(product.product_id.clone()))?;
            Ok(ReportField::new(label, format!("{}대", product.count)))
        })
        .collect::<Result<Vec<_>, ProjectionError>>()?;

    fields.push(ReportField::new(
        "총 설치 대수",
        format!("{}대", inspection.total_installed()),
    ));
    Ok(SectionBody::Fields(fields))
}

fn installation(inspection: &Inspection, now: DateTime<Utc>) -> SectionBody {
    let installed_on = inspection
        .installation_date()
        .map(|date| date.format("%Y-%m-%d").to_string());
    let usage = inspection
        .usage_duration(now)
        .map(|duration| duration.to_string());

    SectionBody::Fields(vec![
        ReportField::or_missing("설치일", installed_on.as_deref()),
        ReportField::or_missing("사용 기간", usage.as_deref()),
    ])
}

fn technical(inspection: &Inspection) -> SectionBody {
    let specs = inspection.technical();
    SectionBody::Fields(
        TechnicalAttribute::ordered()
            .into_iter()
            .map(|attribute| ReportField::or_missing(attribute.label(), specs.get(attribute)))
            .collect(),
    )
}

fn checklist(inspection: &Inspection) -> Result<SectionBody, ProjectionError> {
    let answers = inspection.checklist();
    if let Some(unknown) = answers
        .keys()
        .find(|id| reference::checklist_item(id).is_none())
    {
        return Err(ProjectionError::UnknownChecklistItem(unknown.clone()));
    }

    let rows = CHECKLIST_CATALOG
        .iter()
        .map(|item| -> Result<ChecklistRow, ProjectionError> {
            let answer = answers
                .get(item.id)
                .ok_or(ProjectionError::IncompleteChecklist(item.id))?;
            let reason = (answer.decision == ChecklistDecision::No)
                .then(|| answer.reason.clone())
                .filter(|reason| !reason.is_empty());
            Ok(ChecklistRow {
                item_id: item.id,
                category: item.category,
                category_label: item.category.label(),
                label: item.label,
                decision: answer.decision,
                mark: answer.decision.symbol(),
                reason,
            })
        })
        .collect::<Result<Vec<_>, ProjectionError>>()?;

    Ok(SectionBody::Checklist(rows))
}
