use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    ChecklistAnswer, ChecklistDecision, Inspection, InspectionId, InspectionResult,
    InstalledProduct, SiteLocation, TechnicalAttribute, TechnicalSpecs, MAX_PHOTO_COUNT,
};
use super::reference::{self, CHECKLIST_CATALOG};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Scalar form fields exactly as the technician entered them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInspectionForm {
    #[serde(default)]
    pub inspection_date: Option<String>,
    #[serde(default)]
    pub inspector: Option<String>,
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub sub_region: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub facility_manager: Option<String>,
    #[serde(default)]
    pub contractor_name: Option<String>,
    #[serde(default)]
    pub business_type: Option<String>,
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
    #[serde(default)]
    pub installation_date: Option<String>,
}

impl RawInspectionForm {
    pub fn field(&self, field: FormField) -> Option<&str> {
        let slot = match field {
            FormField::InspectionDate => &self.inspection_date,
            FormField::Inspector => &self.inspector,
            FormField::SiteName => &self.site_name,
            FormField::Region => &self.region,
            FormField::SubRegion => &self.sub_region,
            FormField::Result => &self.result,
            FormField::Summary => &self.summary,
            FormField::FacilityManager => &self.facility_manager,
            FormField::ContractorName => &self.contractor_name,
            FormField::BusinessType => &self.business_type,
            FormField::InstallationDate => &self.installation_date,
            FormField::Technical(attribute) => self.technical_slot(attribute),
        };
        slot.as_deref()
    }

    pub(super) fn field_mut(&mut self, field: FormField) -> &mut Option<String> {
        match field {
            FormField::InspectionDate => &mut self.inspection_date,
            FormField::Inspector => &mut self.inspector,
            FormField::SiteName => &mut self.site_name,
            FormField::Region => &mut self.region,
            FormField::SubRegion => &mut self.sub_region,
            FormField::Result => &mut self.result,
            FormField::Summary => &mut self.summary,
            FormField::FacilityManager => &mut self.facility_manager,
            FormField::ContractorName => &mut self.contractor_name,
            FormField::BusinessType => &mut self.business_type,
            FormField::InstallationDate => &mut self.installation_date,
            FormField::Technical(attribute) => match attribute {
                TechnicalAttribute::Fuel => &mut self.fuel,
                TechnicalAttribute::ExhaustType => &mut self.exhaust_type,
                TechnicalAttribute::Electrical => &mut self.electrical,
                TechnicalAttribute::Piping => &mut self.piping,
                TechnicalAttribute::WaterSupply => &mut self.water_supply,
                TechnicalAttribute::Control => &mut self.control,
                TechnicalAttribute::Purpose => &mut self.purpose,
                TechnicalAttribute::DeliveryType => &mut self.delivery_type,
            },
        }
    }

    fn technical_slot(&self, attribute: TechnicalAttribute) -> &Option<String> {
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
}

/// Addressable form field, used by draft intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    InspectionDate,
    Inspector,
    SiteName,
    Region,
    SubRegion,
    Result,
    Summary,
    FacilityManager,
    ContractorName,
    BusinessType,
    InstallationDate,
    Technical(TechnicalAttribute),
}

/// Everything a completed form submits in one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InspectionSubmission {
    #[serde(flatten)]
    pub form: RawInspectionForm,
    #[serde(default)]
    pub products: Vec<InstalledProduct>,
    #[serde(default)]
    pub checklist_answers: BTreeMap<String, ChecklistAnswer>,
    #[serde(default)]
    pub photo_count: u32,
}

impl InspectionSubmission {
    pub fn build(&self, now: DateTime<Utc>) -> Result<Inspection, ValidationError> {
        build(
            &self.form,
            &self.products,
            &self.checklist_answers,
            self.photo_count,
            now,
        )
    }
}

impl From<&Inspection> for InspectionSubmission {
    fn from(inspection: &Inspection) -> Self {
        let technical = inspection.technical();
        let form = RawInspectionForm {
            inspection_date: Some(inspection.inspection_date().format(DATE_FORMAT).to_string()),
            inspector: Some(inspection.inspector().to_string()),
            site_name: Some(inspection.site().site_name.clone()),
            region: Some(inspection.site().region.clone()),
            sub_region: Some(inspection.site().sub_region.clone()),
            result: Some(inspection.result().label().to_string()),
            summary: inspection.summary().map(str::to_string),
            facility_manager: inspection.facility_manager().map(str::to_string),
            contractor_name: inspection.contractor_name().map(str::to_string),
            business_type: inspection.business_type().map(str::to_string),
            fuel: technical.fuel.clone(),
            exhaust_type: technical.exhaust_type.clone(),
            electrical: technical.electrical.clone(),
            piping: technical.piping.clone(),
            water_supply: technical.water_supply.clone(),
            control: technical.control.clone(),
            purpose: technical.purpose.clone(),
            delivery_type: technical.delivery_type.clone(),
            installation_date: inspection
                .installation_date()
                .map(|date| date.format(DATE_FORMAT).to_string()),
        };

        Self {
            form,
            products: inspection.products().to_vec(),
            checklist_answers: inspection.checklist().clone(),
            photo_count: u32::from(inspection.photo_count()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    InspectionDate,
    Inspector,
    SiteName,
    Region,
    SubRegion,
    Result,
}

impl RequiredField {
    pub const fn key(self) -> &'static str {
        match self {
            Self::InspectionDate => "inspection_date",
            Self::Inspector => "inspector",
            Self::SiteName => "site_name",
            Self::Region => "region",
            Self::SubRegion => "sub_region",
            Self::Result => "result",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::InspectionDate => "점검일",
            Self::Inspector => "점검자",
            Self::SiteName => "현장명",
            Self::Region => "지역",
            Self::SubRegion => "세부 지역",
            Self::Result => "점검 결과",
        }
    }
}

/// One reason a submission cannot become an inspection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("missing required field `{}`", .0.key())]
    Missing(RequiredField),
    #[error("`{field}` must be a YYYY-MM-DD date (found {value:?})")]
    InvalidDate { field: &'static str, value: String },
    #[error("unknown inspection result {0:?}")]
    UnknownResult(String),
    #[error("unknown region {0:?}")]
    UnknownRegion(String),
    #[error("sub-region {sub_region:?} does not belong to region {region:?}")]
    SubRegionMismatch { region: String, sub_region: String },
    #[error("product {0:?} is not in the catalog")]
    UnknownProduct(String),
    #[error("product {product_id:?} must be installed at least once")]
    InvalidProductCount { product_id: String },
    #[error("{value:?} is not a valid option for `{}`", .attribute.key())]
    UnknownOption {
        attribute: TechnicalAttribute,
        value: String,
    },
    #[error("checklist item {0:?} is not in the catalog")]
    UnknownChecklistItem(String),
    #[error("checklist item {0:?} was answered no without a reason")]
    MissingFailureReason(String),
    #[error("{count} photos attached, at most {max} allowed")]
    TooManyPhotos { count: u32, max: u8 },
    #[error("installation date {0} is after the inspection is recorded")]
    InstallationInFuture(NaiveDate),
}

/// Every violation found in a submission; no record is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn missing_fields(&self) -> Vec<RequiredField> {
        self.violations
            .iter()
            .filter_map(|violation| match violation {
                Violation::Missing(field) => Some(*field),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inspection failed validation: {}", self.messages().join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Identity stamped on a built record: fresh for new submissions, carried
/// over for corrections.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct RecordIdentity {
    pub(super) id: InspectionId,
    pub(super) created_at: DateTime<Utc>,
}

impl RecordIdentity {
    fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            id: InspectionId::generate(),
            created_at: now,
        }
    }

    pub(super) fn of(inspection: &Inspection) -> Self {
        Self {
            id: inspection.id().clone(),
            created_at: inspection.created_at(),
        }
    }
}

/// Normalize a completed form into a new inspection with a fresh id and
/// `created_at = now`.
pub fn build(
    form: &RawInspectionForm,
    products: &[InstalledProduct],
    checklist_answers: &BTreeMap<String, ChecklistAnswer>,
    photo_count: u32,
    now: DateTime<Utc>,
) -> Result<Inspection, ValidationError> {
    let identity = RecordIdentity::fresh(now);
    assemble(identity, form, products, checklist_answers, photo_count, now)
}

/// Rebuild a corrected record under the identity of `existing`.
pub fn build_replacement(
    existing: &Inspection,
    submission: &InspectionSubmission,
    now: DateTime<Utc>,
) -> Result<Inspection, ValidationError> {
    assemble(
        RecordIdentity::of(existing),
        &submission.form,
        &submission.products,
        &submission.checklist_answers,
        submission.photo_count,
        now,
    )
}

pub(super) fn assemble(
    identity: RecordIdentity,
    form: &RawInspectionForm,
    products: &[InstalledProduct],
    checklist_answers: &BTreeMap<String, ChecklistAnswer>,
    photo_count: u32,
    now: DateTime<Utc>,
) -> Result<Inspection, ValidationError> {
    let mut violations = Vec::new();

    let inspection_date = required_text(
        &form.inspection_date,
        RequiredField::InspectionDate,
        &mut violations,
    )
    .and_then(|raw| parse_date("inspection_date", &raw, &mut violations));
    let inspector = required_text(&form.inspector, RequiredField::Inspector, &mut violations);
    let site_name = required_text(&form.site_name, RequiredField::SiteName, &mut violations);
    let region = required_text(&form.region, RequiredField::Region, &mut violations);
    let sub_region = required_text(&form.sub_region, RequiredField::SubRegion, &mut violations);
    let result = required_text(&form.result, RequiredField::Result, &mut violations).and_then(
        |raw| {
            let parsed = InspectionResult::parse(&raw);
            if parsed.is_none() {
                violations.push(Violation::UnknownResult(raw));
            }
            parsed
        },
    );

    if let Some(region) = region.as_deref() {
        if !reference::is_known_region(region) {
            violations.push(Violation::UnknownRegion(region.to_string()));
        } else if let Some(sub_region) = sub_region.as_deref() {
            if !reference::sub_regions(region).contains(&sub_region) {
                violations.push(Violation::SubRegionMismatch {
                    region: region.to_string(),
                    sub_region: sub_region.to_string(),
                });
            }
        }
    }

    let products = normalize_products(products, &mut violations);
    let technical = normalize_technical(form, &mut violations);

    let installation_date = optional_text(&form.installation_date)
        .and_then(|raw| parse_date("installation_date", &raw, &mut violations));
    if let Some(installed) = installation_date {
        if installed > now.date_naive() {
            violations.push(Violation::InstallationInFuture(installed));
        }
    }

    let checklist = complete_checklist(checklist_answers, &mut violations);

    if photo_count > u32::from(MAX_PHOTO_COUNT) {
        violations.push(Violation::TooManyPhotos {
            count: photo_count,
            max: MAX_PHOTO_COUNT,
        });
    }

    let (
        Some(inspection_date),
        Some(inspector),
        Some(site_name),
        Some(region),
        Some(sub_region),
        Some(result),
    ) = (inspection_date, inspector, site_name, region, sub_region, result)
    else {
        return Err(ValidationError::new(violations));
    };

    if !violations.is_empty() {
        return Err(ValidationError::new(violations));
    }

    Ok(Inspection {
        id: identity.id,
        inspection_date,
        created_at: identity.created_at,
        inspector,
        facility_manager: optional_text(&form.facility_manager),
        contractor_name: optional_text(&form.contractor_name),
        business_type: optional_text(&form.business_type),
        site: SiteLocation {
            site_name,
            region,
            sub_region,
        },
        result,
        summary: optional_text(&form.summary),
        products,
        technical,
        installation_date,
        checklist,
        photo_count: photo_count as u8,
    })
}

fn optional_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

fn required_text(
    value: &Option<String>,
    field: RequiredField,
    violations: &mut Vec<Violation>,
) -> Option<String> {
    let text = optional_text(value);
    if text.is_none() {
        violations.push(Violation::Missing(field));
    }
    text
}

fn parse_date(
    field: &'static str,
    raw: &str,
    violations: &mut Vec<Violation>,
) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            violations.push(Violation::InvalidDate {
                field,
                value: raw.to_string(),
            });
            None
        }
    }
}

fn normalize_products(
    products: &[InstalledProduct],
    violations: &mut Vec<Violation>,
) -> Vec<InstalledProduct> {
    products
        .iter()
        .map(|product| {
            let product_id = product.product_id.trim().to_string();
            if reference::product_label(&product_id).is_none() {
                violations.push(Violation::UnknownProduct(product_id.clone()));
            }
            if product.count == 0 {
                violations.push(Violation::InvalidProductCount {
                    product_id: product_id.clone(),
                });
            }
            InstalledProduct {
                product_id,
                count: product.count,
            }
        })
        .collect()
}

fn normalize_technical(
    form: &RawInspectionForm,
    violations: &mut Vec<Violation>,
) -> TechnicalSpecs {
    let mut specs = TechnicalSpecs::default();
    for attribute in TechnicalAttribute::ordered() {
        let Some(value) = optional_text(form.technical_slot(attribute)) else {
            continue;
        };
        if !attribute.options().contains(&value.as_str()) {
            violations.push(Violation::UnknownOption {
                attribute,
                value: value.clone(),
            });
        }
        specs.set(attribute, Some(value));
    }
    specs
}

fn complete_checklist(
    answers: &BTreeMap<String, ChecklistAnswer>,
    violations: &mut Vec<Violation>,
) -> BTreeMap<String, ChecklistAnswer> {
    for (item_id, answer) in answers {
        if reference::checklist_item(item_id).is_none() {
            violations.push(Violation::UnknownChecklistItem(item_id.clone()));
        } else if answer.decision == ChecklistDecision::No && answer.reason.trim().is_empty() {
            violations.push(Violation::MissingFailureReason(item_id.clone()));
        }
    }

    CHECKLIST_CATALOG
        .iter()
        .map(|item| {
            let answer = answers
                .get(item.id)
                .map(|answer| ChecklistAnswer {
                    decision: answer.decision,
                    reason: answer.reason.trim().to_string(),
                })
                .unwrap_or_default();
            (item.id.to_string(), answer)
        })
        .collect()
}
