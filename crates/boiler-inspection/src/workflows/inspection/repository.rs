use std::cmp::Ordering;

use super::domain::{Inspection, InspectionId, InspectionPatch};

/// Storage abstraction so the service module can be exercised in isolation.
/// Every call is atomic from the caller's view; last write wins.
pub trait InspectionRepository: Send + Sync {
    /// Newest `created_at` first.
    fn list(&self) -> Result<Vec<Inspection>, RepositoryError>;
    fn fetch(&self, id: &InspectionId) -> Result<Option<Inspection>, RepositoryError>;
    fn save(&self, inspection: Inspection) -> Result<Inspection, RepositoryError>;
    fn update(
        &self,
        id: &InspectionId,
        patch: &InspectionPatch,
    ) -> Result<Inspection, RepositoryError>;
    fn replace(&self, inspection: Inspection) -> Result<Inspection, RepositoryError>;
    fn delete(&self, id: &InspectionId) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Listing order shared by the stores: newest first, ties broken by id so
/// the order is stable.
pub fn newest_first(left: &Inspection, right: &Inspection) -> Ordering {
    right
        .created_at()
        .cmp(&left.created_at())
        .then_with(|| right.id().as_str().cmp(left.id().as_str()))
}
