use super::super::derivation::BadgeTag;
use super::super::domain::{ChecklistCategory, ChecklistDecision, InspectionId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

pub const REPORT_TITLE: &str = "보일러 점검 보고서";
pub const MISSING_VALUE: &str = "미입력";
pub const MISSING_SUMMARY: &str = "점검 요약 없음";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Site,
    Contractor,
    Products,
    Installation,
    Technical,
    Checklist,
    Summary,
    Attachments,
    Generation,
}

impl SectionKind {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Header,
            Self::Site,
            Self::Contractor,
            Self::Products,
            Self::Installation,
            Self::Technical,
            Self::Checklist,
            Self::Summary,
            Self::Attachments,
            Self::Generation,
        ]
    }

    pub const fn heading(self) -> &'static str {
        match self {
            Self::Header => "점검 개요",
            Self::Site => "현장 정보",
            Self::Contractor => "시공 업체 정보",
            Self::Products => "설치 제품",
            Self::Installation => "설치 정보",
            Self::Technical => "기술 사양",
            Self::Checklist => "점검 체크리스트",
            Self::Summary => "점검 요약",
            Self::Attachments => "첨부 자료",
            Self::Generation => "보고서 정보",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportField {
    pub label: &'static str,
    pub value: String,
}

impl ReportField {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }

    pub fn or_missing(label: &'static str, value: Option<&str>) -> Self {
        Self::new(label, value.unwrap_or(MISSING_VALUE))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistRow {
    pub item_id: &'static str,
    pub category: ChecklistCategory,
    pub category_label: &'static str,
    pub label: &'static str,
    pub decision: ChecklistDecision,
    pub mark: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ChecklistRow {
    /// `[설치] 배기통 ...: ✗ (사유)`
    pub fn line(&self) -> String {
        let mut line = format!("[{}] {}: {}", self.category_label, self.label, self.mark);
        if let Some(reason) = &self.reason {
            line.push_str(&format!(" ({reason})"));
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum SectionBody {
    Fields(Vec<ReportField>),
    Checklist(Vec<ChecklistRow>),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    pub kind: SectionKind,
    pub heading: &'static str,
    pub body: SectionBody,
}

impl ReportSection {
    pub fn new(kind: SectionKind, body: SectionBody) -> Self {
        Self {
            kind,
            heading: kind.heading(),
            body,
        }
    }

    pub fn fields(&self) -> &[ReportField] {
        match &self.body {
            SectionBody::Fields(fields) => fields,
            _ => &[],
        }
    }

    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields()
            .iter()
            .find(|field| field.label == label)
            .map(|field| field.value.as_str())
    }
}

/// Renderer-agnostic report: ordered sections plus the values a renderer
/// needs to name its output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    pub title: &'static str,
    pub inspection_id: InspectionId,
    pub site_name: String,
    pub inspection_date: NaiveDate,
    pub badge: BadgeTag,
    pub sections: Vec<ReportSection>,
    pub generated_at: DateTime<Utc>,
}

impl ReportDocument {
    pub fn section(&self, kind: SectionKind) -> Option<&ReportSection> {
        self.sections.iter().find(|section| section.kind == kind)
    }

    pub fn checklist_rows(&self) -> &[ChecklistRow] {
        match self.section(SectionKind::Checklist).map(|section| &section.body) {
            Some(SectionBody::Checklist(rows)) => rows,
            _ => &[],
        }
    }

    /// `점검보고서_{site_name}_{inspection_date}.{extension}`
    pub fn filename(&self, extension: &str) -> String {
        let site: String = self
            .site_name
            .chars()
            .map(|ch| if matches!(ch, '/' | '\\') { '_' } else { ch })
            .collect();
        format!(
            "점검보고서_{}_{}.{}",
            site,
            self.inspection_date.format("%Y-%m-%d"),
            extension
        )
    }
}
