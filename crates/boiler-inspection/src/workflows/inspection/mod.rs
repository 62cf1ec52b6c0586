//! Boiler inspection records: intake validation, derived values, report
//! projection, and the storage port.
//!
//! An [`Inspection`] only exists once the builder has accepted a form, so
//! every stored record carries the full 23-item checklist, catalog products,
//! and a region/sub-region pair drawn from the reference tables.

pub mod builder;
pub mod derivation;
pub mod domain;
pub mod draft;
pub mod export;
pub mod record;
pub mod reference;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use builder::{
    build, build_replacement, FormField, InspectionSubmission, RawInspectionForm, RequiredField,
    ValidationError, Violation,
};
pub use derivation::{BadgeTag, ChecklistCompletion, UsageDuration};
pub use domain::{
    ChecklistAnswer, ChecklistCategory, ChecklistDecision, Inspection, InspectionId,
    InspectionPatch, InspectionResult, InstalledProduct, SiteLocation, TechnicalAttribute,
    TechnicalSpecs, MAX_PHOTO_COUNT,
};
pub use draft::{DraftError, DraftIntent, InspectionDraft};
pub use export::{write_register, ExportError, RegisterRow};
pub use record::{InspectionRecord, InspectionView, SCHEMA_VERSION};
pub use reference::{ReferenceSnapshot, CHECKLIST_CATALOG, CHECKLIST_SIZE, PRODUCT_CATALOG};
pub use report::{
    DocumentRenderer, PlainTextRenderer, ProjectionError, RenderError, RenderedReport,
    ReportDocument, ReportProjector,
};
pub use repository::{newest_first, InspectionRepository, RepositoryError};
pub use router::inspection_router;
pub use service::{InspectionService, InspectionServiceError};
