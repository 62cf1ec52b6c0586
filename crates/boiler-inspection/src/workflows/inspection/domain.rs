use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::derivation::{self, BadgeTag, ChecklistCompletion, UsageDuration};
use super::reference;

/// Hard cap on attached photographs, enforced at intake.
pub const MAX_PHOTO_COUNT: u8 = 5;

/// Identifier wrapper for inspection records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InspectionId(pub String);

impl InspectionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InspectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InspectionResult {
    #[serde(rename = "정상", alias = "normal")]
    Normal,
    #[serde(rename = "주의", alias = "caution")]
    Caution,
    #[serde(rename = "불량", alias = "defective")]
    Defective,
}

impl InspectionResult {
    pub const fn ordered() -> [Self; 3] {
        [Self::Normal, Self::Caution, Self::Defective]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "정상",
            Self::Caution => "주의",
            Self::Defective => "불량",
        }
    }

    /// Accepts the Korean form labels as well as the English variant names.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ordered().into_iter().find(|result| {
            result.label() == raw || format!("{result:?}").eq_ignore_ascii_case(raw)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistCategory {
    Installation,
    Operational,
}

impl ChecklistCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Installation => "설치",
            Self::Operational => "운영",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistDecision {
    Yes,
    No,
    #[default]
    Unanswered,
}

impl ChecklistDecision {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Yes => "✓",
            Self::No => "✗",
            Self::Unanswered => "미확인",
        }
    }
}

/// One answered (or pending) checklist row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistAnswer {
    #[serde(rename = "answer", default)]
    pub decision: ChecklistDecision,
    #[serde(default)]
    pub reason: String,
}

impl ChecklistAnswer {
    pub fn unanswered() -> Self {
        Self::default()
    }

    pub fn yes() -> Self {
        Self {
            decision: ChecklistDecision::Yes,
            reason: String::new(),
        }
    }

    pub fn no(reason: impl Into<String>) -> Self {
        Self {
            decision: ChecklistDecision::No,
            reason: reason.into(),
        }
    }
}

/// Equipment line: catalog product id plus installed unit count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledProduct {
    #[serde(rename = "name")]
    pub product_id: String,
    pub count: u32,
}

impl InstalledProduct {
    pub fn new(product_id: impl Into<String>, count: u32) -> Self {
        Self {
            product_id: product_id.into(),
            count,
        }
    }
}

/// The eight optional technical attributes recorded per installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnicalAttribute {
    Fuel,
    ExhaustType,
    Electrical,
    Piping,
    WaterSupply,
    Control,
    Purpose,
    DeliveryType,
}

impl TechnicalAttribute {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Fuel,
            Self::ExhaustType,
            Self::Electrical,
            Self::Piping,
            Self::WaterSupply,
            Self::Control,
            Self::Purpose,
            Self::DeliveryType,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fuel => "연료",
            Self::ExhaustType => "배기방식",
            Self::Electrical => "전기사양",
            Self::Piping => "배관재질",
            Self::WaterSupply => "급수방식",
            Self::Control => "제어방식",
            Self::Purpose => "용도",
            Self::DeliveryType => "납품형태",
        }
    }

    /// Field name used by forms and the persisted record.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Fuel => "fuel",
            Self::ExhaustType => "exhaust_type",
            Self::Electrical => "electrical",
            Self::Piping => "piping",
            Self::WaterSupply => "water_supply",
            Self::Control => "control",
            Self::Purpose => "purpose",
            Self::DeliveryType => "delivery_type",
        }
    }

    pub fn options(self) -> &'static [&'static str] {
        reference::options(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnicalSpecs {
    pub fuel: Option<String>,
    pub exhaust_type: Option<String>,
    pub electrical: Option<String>,
    pub piping: Option<String>,
    pub water_supply: Option<String>,
    pub control: Option<String>,
    pub purpose: Option<String>,
    pub delivery_type: Option<String>,
}

impl TechnicalSpecs {
    pub fn get(&self, attribute: TechnicalAttribute) -> Option<&str> {
        self.slot(attribute).as_deref()
    }

    pub fn set(&mut self, attribute: TechnicalAttribute, value: Option<String>) {
        *self.slot_mut(attribute) = value;
    }

    fn slot(&self, attribute: TechnicalAttribute) -> &Option<String> {
        match attribute {
            TechnicalAttribute::Fuel => &self.fuel,
            TechnicalAttribute::ExhaustType => &self.exhaust_type,
            TechnicalAttribute::Electrical => &self.electrical,
            TechnicalAttribute::Piping => &self.piping,
            TechnicalAttribute::WaterSupply => &self.water_supply,
            TechnicalAttribute::Control => &self.control,
            TechnicalAttribute::Purpose => &self.purpose,
            TechnicalAttribute::DeliveryType => &self.delivery_type,
        }
    }

    fn slot_mut(&mut self, attribute: TechnicalAttribute) -> &mut Option<String> {
        match attribute {
            TechnicalAttribute::Fuel => &mut self.fuel,
            TechnicalAttribute::ExhaustType => &mut self.exhaust_type,
            TechnicalAttribute::Electrical => &mut self.electrical,
            TechnicalAttribute::Piping => &mut self.piping,
            TechnicalAttribute::WaterSupply => &mut self.water_supply,
            TechnicalAttribute::Control => &mut self.control,
            TechnicalAttribute::Purpose => &mut self.purpose,
            TechnicalAttribute::DeliveryType => &mut self.delivery_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLocation {
    pub site_name: String,
    pub region: String,
    pub sub_region: String,
}

impl SiteLocation {
    pub fn address(&self) -> String {
        if self.sub_region.is_empty() {
            self.region.clone()
        } else {
            format!("{} {}", self.region, self.sub_region)
        }
    }
}

/// A committed boiler inspection. Only the record builder and the persisted
/// record conversion construct one; edits produce a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    pub(super) id: InspectionId,
    pub(super) inspection_date: NaiveDate,
    pub(super) created_at: DateTime<Utc>,
    pub(super) inspector: String,
    pub(super) facility_manager: Option<String>,
    pub(super) contractor_name: Option<String>,
    pub(super) business_type: Option<String>,
    pub(super) site: SiteLocation,
    pub(super) result: InspectionResult,
    pub(super) summary: Option<String>,
    pub(super) products: Vec<InstalledProduct>,
    pub(super) technical: TechnicalSpecs,
    pub(super) installation_date: Option<NaiveDate>,
    pub(super) checklist: BTreeMap<String, ChecklistAnswer>,
    pub(super) photo_count: u8,
}

impl Inspection {
    pub fn id(&self) -> &InspectionId {
        &self.id
    }

    pub fn inspection_date(&self) -> NaiveDate {
        self.inspection_date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn inspector(&self) -> &str {
        &self.inspector
    }

    pub fn facility_manager(&self) -> Option<&str> {
        self.facility_manager.as_deref()
    }

    pub fn contractor_name(&self) -> Option<&str> {
        self.contractor_name.as_deref()
    }

    pub fn business_type(&self) -> Option<&str> {
        self.business_type.as_deref()
    }

    pub fn site(&self) -> &SiteLocation {
        &self.site
    }

    pub fn result(&self) -> InspectionResult {
        self.result
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn products(&self) -> &[InstalledProduct] {
        &self.products
    }

    pub fn technical(&self) -> &TechnicalSpecs {
        &self.technical
    }

    pub fn installation_date(&self) -> Option<NaiveDate> {
        self.installation_date
    }

    pub fn checklist(&self) -> &BTreeMap<String, ChecklistAnswer> {
        &self.checklist
    }

    pub fn photo_count(&self) -> u8 {
        self.photo_count
    }

    pub fn total_installed(&self) -> u32 {
        derivation::total_installed_count(&self.products)
    }

    pub fn usage_duration(&self, now: DateTime<Utc>) -> Option<UsageDuration> {
        derivation::usage_duration(self.installation_date, now)
    }

    pub fn checklist_completion(&self) -> ChecklistCompletion {
        derivation::checklist_completion(&self.checklist)
    }

    pub fn badge(&self) -> BadgeTag {
        derivation::classify_badge(Some(self.result))
    }

    /// Returns a new record with the patch applied; identity is preserved.
    pub fn with_patch(&self, patch: &InspectionPatch) -> Self {
        let mut next = self.clone();
        if let Some(result) = patch.result {
            next.result = result;
        }
        apply_text(&mut next.summary, patch.summary.as_deref());
        apply_text(&mut next.facility_manager, patch.facility_manager.as_deref());
        apply_text(&mut next.contractor_name, patch.contractor_name.as_deref());
        apply_text(&mut next.business_type, patch.business_type.as_deref());
        next
    }
}

fn apply_text(slot: &mut Option<String>, value: Option<&str>) {
    if let Some(value) = value {
        let trimmed = value.trim();
        *slot = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }
}

/// Partial update for fields that carry no reference-data constraints.
/// An empty string clears the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionPatch {
    #[serde(default)]
    pub result: Option<InspectionResult>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub facility_manager: Option<String>,
    #[serde(default)]
    pub contractor_name: Option<String>,
    #[serde(default)]
    pub business_type: Option<String>,
}

impl InspectionPatch {
    pub fn is_empty(&self) -> bool {
        self.result.is_none()
            && self.summary.is_none()
            && self.facility_manager.is_none()
            && self.contractor_name.is_none()
            && self.business_type.is_none()
    }
}
