//! Persisted shape of an inspection and the load-time upgrade of records
//! written before checklists, products, and photos were captured.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::derivation::{BadgeTag, ChecklistCompletion};
use super::domain::{
    ChecklistAnswer, Inspection, InspectionId, InspectionResult, InstalledProduct, SiteLocation,
    TechnicalSpecs, MAX_PHOTO_COUNT,
};
use super::reference::CHECKLIST_CATALOG;

/// Version written by this crate. Records without a version are the legacy
/// shape (schema 0).
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionRecord {
    #[serde(default)]
    pub schema_version: u32,
    pub id: InspectionId,
    pub inspection_date: NaiveDate,
    pub inspector: String,
    pub site_name: String,
    pub address: String,
    pub result: InspectionResult,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub facility_manager: Option<String>,
    #[serde(default)]
    pub contractor_name: Option<String>,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub products: Vec<InstalledProduct>,
    #[serde(default)]
    pub fuel: Option<String>,
    #[serde(default)]
    pub exhaust_type: Option<String>,
    #[serde(default)]
    pub electrical: Option<String>,
    #[serde(default)]
    pub piping: Option<String>,
    #[serde(default)]
    pub water_supply: Option<String>,
    #[serde(default)]
    pub control: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub delivery_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub installation_date: Option<NaiveDate>,
    /// Usage duration as of `created_at`. A snapshot, never refreshed.
    #[serde(default)]
    pub usage_years: String,
    #[serde(default)]
    pub checklist_answers: BTreeMap<String, ChecklistAnswer>,
    #[serde(default)]
    pub photo_count: u8,
    pub created_at: DateTime<Utc>,
}

impl InspectionRecord {
    pub fn is_legacy(&self) -> bool {
        self.schema_version < SCHEMA_VERSION
    }

    /// Bring a record to the current schema: every catalog checklist id is
    /// present, blank optional text reads as absent, and the photo count
    /// respects the cap.
    pub fn upgrade(mut self) -> Self {
        for field in [
            &mut self.summary,
            &mut self.facility_manager,
            &mut self.contractor_name,
            &mut self.business_type,
            &mut self.fuel,
            &mut self.exhaust_type,
            &mut self.electrical,
            &mut self.piping,
            &mut self.water_supply,
            &mut self.control,
            &mut self.purpose,
            &mut self.delivery_type,
        ] {
            *field = blank_as_none(field.take());
        }
        for item in CHECKLIST_CATALOG.iter() {
            self.checklist_answers
                .entry(item.id.to_string())
                .or_insert_with(ChecklistAnswer::unanswered);
        }
        self.photo_count = self.photo_count.min(MAX_PHOTO_COUNT);
        self.schema_version = SCHEMA_VERSION;
        self
    }
}

impl From<&Inspection> for InspectionRecord {
    fn from(inspection: &Inspection) -> Self {
        let technical = inspection.technical();
        let usage_years = inspection
            .usage_duration(inspection.created_at())
            .map(|duration| duration.to_string())
            .unwrap_or_default();

        Self {
            schema_version: SCHEMA_VERSION,
            id: inspection.id().clone(),
            inspection_date: inspection.inspection_date(),
            inspector: inspection.inspector().to_string(),
            site_name: inspection.site().site_name.clone(),
            address: inspection.site().address(),
            result: inspection.result(),
            summary: inspection.summary().map(str::to_string),
            facility_manager: inspection.facility_manager().map(str::to_string),
            contractor_name: inspection.contractor_name().map(str::to_string),
            business_type: inspection.business_type().map(str::to_string),
            products: inspection.products().to_vec(),
            fuel: technical.fuel.clone(),
            exhaust_type: technical.exhaust_type.clone(),
            electrical: technical.electrical.clone(),
            piping: technical.piping.clone(),
            water_supply: technical.water_supply.clone(),
            control: technical.control.clone(),
            purpose: technical.purpose.clone(),
            delivery_type: technical.delivery_type.clone(),
            installation_date: inspection.installation_date(),
            usage_years,
            checklist_answers: inspection.checklist().clone(),
            photo_count: inspection.photo_count(),
            created_at: inspection.created_at(),
        }
    }
}

/// Loaded records are trusted as written; legacy free-text addresses keep
/// the whole text as the region.
impl From<InspectionRecord> for Inspection {
    fn from(record: InspectionRecord) -> Self {
        let record = record.upgrade();
        let (region, sub_region) = match record.address.trim().split_once(' ') {
            Some((region, sub_region)) => (region.to_string(), sub_region.trim().to_string()),
            None => (record.address.trim().to_string(), String::new()),
        };

        Inspection {
            id: record.id,
            inspection_date: record.inspection_date,
            created_at: record.created_at,
            inspector: record.inspector,
            facility_manager: record.facility_manager,
            contractor_name: record.contractor_name,
            business_type: record.business_type,
            site: SiteLocation {
                site_name: record.site_name,
                region,
                sub_region,
            },
            result: record.result,
            summary: record.summary,
            products: record.products,
            technical: TechnicalSpecs {
                fuel: record.fuel,
                exhaust_type: record.exhaust_type,
                electrical: record.electrical,
                piping: record.piping,
                water_supply: record.water_supply,
                control: record.control,
                purpose: record.purpose,
                delivery_type: record.delivery_type,
            },
            installation_date: record.installation_date,
            checklist: record.checklist_answers,
            photo_count: record.photo_count,
        }
    }
}

/// API representation: the persisted record plus derived values computed at
/// read time.
#[derive(Debug, Clone, Serialize)]
pub struct InspectionView {
    #[serde(flatten)]
    pub record: InspectionRecord,
    pub total_installed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_duration: Option<String>,
    pub checklist_completion: ChecklistCompletion,
    pub badge: BadgeTag,
}

impl InspectionView {
    pub fn at(inspection: &Inspection, now: DateTime<Utc>) -> Self {
        Self {
            record: InspectionRecord::from(inspection),
            total_installed: inspection.total_installed(),
            usage_duration: inspection
                .usage_duration(now)
                .map(|duration| duration.to_string()),
            checklist_completion: inspection.checklist_completion(),
            badge: inspection.badge(),
        }
    }
}

fn blank_as_none(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
