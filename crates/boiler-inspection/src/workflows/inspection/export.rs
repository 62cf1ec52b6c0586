//! Register export: one CSV row per inspection for spreadsheets and audits.

use std::io::Write;

use serde::Serialize;

use super::domain::Inspection;

const HEADERS: [&str; 12] = [
    "id",
    "inspection_date",
    "site_name",
    "address",
    "inspector",
    "result",
    "badge",
    "total_installed",
    "checklist_yes",
    "checklist_total",
    "photo_count",
    "created_at",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRow {
    pub id: String,
    pub inspection_date: String,
    pub site_name: String,
    pub address: String,
    pub inspector: String,
    pub result: &'static str,
    pub badge: &'static str,
    pub total_installed: u32,
    pub checklist_yes: usize,
    pub checklist_total: usize,
    pub photo_count: u8,
    pub created_at: String,
}

impl From<&Inspection> for RegisterRow {
    fn from(inspection: &Inspection) -> Self {
        let completion = inspection.checklist_completion();
        Self {
            id: inspection.id().to_string(),
            inspection_date: inspection.inspection_date().format("%Y-%m-%d").to_string(),
            site_name: inspection.site().site_name.clone(),
            address: inspection.site().address(),
            inspector: inspection.inspector().to_string(),
            result: inspection.result().label(),
            badge: inspection.badge().label(),
            total_installed: inspection.total_installed(),
            checklist_yes: completion.answered_yes,
            checklist_total: completion.total_items,
            photo_count: inspection.photo_count(),
            created_at: inspection.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write register: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid register row: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes the header row even when there are no inspections.
pub fn write_register<W: Write>(inspections: &[Inspection], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(HEADERS)?;
    for inspection in inspections {
        csv_writer.serialize(RegisterRow::from(inspection))?;
    }
    csv_writer.flush()?;
    Ok(())
}
