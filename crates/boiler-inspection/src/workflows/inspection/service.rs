use std::io::Write;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::builder::{self, InspectionSubmission, ValidationError};
use super::domain::{Inspection, InspectionId, InspectionPatch};
use super::draft::InspectionDraft;
use super::export::{self, ExportError};
use super::report::{
    DocumentRenderer, ProjectionError, RenderError, RenderedReport, ReportDocument,
    ReportProjector,
};
use super::repository::{InspectionRepository, RepositoryError};

/// Service composing the record builder, repository, and report projector.
pub struct InspectionService<R> {
    repository: Arc<R>,
    projector: ReportProjector,
}

impl<R> InspectionService<R>
where
    R: InspectionRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            projector: ReportProjector::new(),
        }
    }

    /// Validate a completed form and persist the resulting record. Nothing is
    /// written when validation fails.
    pub fn submit(
        &self,
        submission: &InspectionSubmission,
        now: DateTime<Utc>,
    ) -> Result<Inspection, InspectionServiceError> {
        let inspection = submission.build(now).map_err(|error| {
            warn!(violations = error.violations.len(), "inspection rejected");
            error
        })?;
        let stored = self.repository.save(inspection)?;
        info!(
            inspection_id = %stored.id(),
            site = %stored.site().site_name,
            result = stored.result().label(),
            "inspection recorded"
        );
        Ok(stored)
    }

    /// Commit a draft: new drafts are saved, correction drafts replace the
    /// record they were seeded from.
    pub fn commit_draft(
        &self,
        draft: &InspectionDraft,
        now: DateTime<Utc>,
    ) -> Result<Inspection, InspectionServiceError> {
        let inspection = draft.commit(now)?;
        let stored = if draft.is_correction() {
            self.repository.replace(inspection)?
        } else {
            self.repository.save(inspection)?
        };
        info!(inspection_id = %stored.id(), correction = draft.is_correction(), "draft committed");
        Ok(stored)
    }

    pub fn list(&self) -> Result<Vec<Inspection>, InspectionServiceError> {
        let inspections = self.repository.list()?;
        debug!(count = inspections.len(), "listed inspections");
        Ok(inspections)
    }

    pub fn get(&self, id: &InspectionId) -> Result<Inspection, InspectionServiceError> {
        let inspection = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(inspection)
    }

    /// Whole-record correction; id and `created_at` are kept from the stored
    /// record.
    pub fn replace(
        &self,
        id: &InspectionId,
        submission: &InspectionSubmission,
        now: DateTime<Utc>,
    ) -> Result<Inspection, InspectionServiceError> {
        let existing = self.get(id)?;
        let corrected = builder::build_replacement(&existing, submission, now)?;
        let stored = self.repository.replace(corrected)?;
        info!(inspection_id = %stored.id(), "inspection corrected");
        Ok(stored)
    }

    pub fn update(
        &self,
        id: &InspectionId,
        patch: &InspectionPatch,
    ) -> Result<Inspection, InspectionServiceError> {
        if patch.is_empty() {
            return self.get(id);
        }
        let updated = self.repository.update(id, patch)?;
        info!(inspection_id = %updated.id(), "inspection updated");
        Ok(updated)
    }

    pub fn delete(&self, id: &InspectionId) -> Result<(), InspectionServiceError> {
        self.repository.delete(id)?;
        info!(inspection_id = %id, "inspection deleted");
        Ok(())
    }

    pub fn report(
        &self,
        id: &InspectionId,
        now: DateTime<Utc>,
    ) -> Result<ReportDocument, InspectionServiceError> {
        let inspection = self.get(id)?;
        Ok(self.projector.project(&inspection, now)?)
    }

    pub fn render_report(
        &self,
        id: &InspectionId,
        now: DateTime<Utc>,
        renderer: &dyn DocumentRenderer,
    ) -> Result<RenderedReport, InspectionServiceError> {
        let document = self.report(id, now)?;
        let rendered = RenderedReport::render(renderer, &document)?;
        debug!(inspection_id = %id, filename = %rendered.filename, "report rendered");
        Ok(rendered)
    }

    pub fn export_register<W: Write>(&self, writer: W) -> Result<usize, InspectionServiceError> {
        let inspections = self.list()?;
        export::write_register(&inspections, writer)?;
        Ok(inspections.len())
    }
}

/// Error raised by the inspection service.
#[derive(Debug, thiserror::Error)]
pub enum InspectionServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
