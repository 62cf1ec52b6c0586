use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::builder::{self, FormField, InspectionSubmission, RecordIdentity, ValidationError};
use super::domain::{ChecklistAnswer, Inspection, InstalledProduct, MAX_PHOTO_COUNT};
use super::reference;

/// Discrete edits a form client sends while filling in an inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum DraftIntent {
    SetField { field: FormField, value: String },
    ClearField { field: FormField },
    AddProduct { product_id: String, count: u32 },
    SetProductCount { index: usize, count: u32 },
    RemoveProduct { index: usize },
    SetChecklistAnswer { item_id: String, answer: ChecklistAnswer },
    AttachPhoto,
    DetachPhoto,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("photo limit reached ({max} per inspection)")]
    PhotoLimitReached { max: u8 },
    #[error("no product line at position {0}")]
    ProductIndexOutOfRange(usize),
}

/// Mutable intake state. It only turns into an [`Inspection`] through
/// [`InspectionDraft::commit`], which runs the full record validation.
#[derive(Debug, Clone, Default)]
pub struct InspectionDraft {
    identity: Option<RecordIdentity>,
    submission: InspectionSubmission,
}

impl InspectionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a correction draft; committing it keeps the original id and
    /// creation timestamp.
    pub fn from_inspection(inspection: &Inspection) -> Self {
        Self {
            identity: Some(RecordIdentity::of(inspection)),
            submission: InspectionSubmission::from(inspection),
        }
    }

    pub fn submission(&self) -> &InspectionSubmission {
        &self.submission
    }

    pub fn is_correction(&self) -> bool {
        self.identity.is_some()
    }

    pub fn apply(&mut self, intent: DraftIntent) -> Result<(), DraftError> {
        let submission = &mut self.submission;
        match intent {
            DraftIntent::SetField { field, value } => {
                *submission.form.field_mut(field) = Some(value);
                if field == FormField::Region {
                    reset_stale_sub_region(submission);
                }
            }
            DraftIntent::ClearField { field } => {
                *submission.form.field_mut(field) = None;
                if field == FormField::Region {
                    submission.form.sub_region = None;
                }
            }
            DraftIntent::AddProduct { product_id, count } => {
                let product_id = product_id.trim().to_string();
                match submission
                    .products
                    .iter_mut()
                    .find(|line| line.product_id == product_id)
                {
                    Some(line) => line.count = line.count.saturating_add(count),
                    None => submission
                        .products
                        .push(InstalledProduct::new(product_id, count)),
                }
            }
            DraftIntent::SetProductCount { index, count } => {
                let line = submission
                    .products
                    .get_mut(index)
                    .ok_or(DraftError::ProductIndexOutOfRange(index))?;
                line.count = count;
            }
            DraftIntent::RemoveProduct { index } => {
                if index >= submission.products.len() {
                    return Err(DraftError::ProductIndexOutOfRange(index));
                }
                submission.products.remove(index);
            }
            DraftIntent::SetChecklistAnswer { item_id, answer } => {
                submission.checklist_answers.insert(item_id, answer);
            }
            DraftIntent::AttachPhoto => {
                if submission.photo_count >= u32::from(MAX_PHOTO_COUNT) {
                    return Err(DraftError::PhotoLimitReached {
                        max: MAX_PHOTO_COUNT,
                    });
                }
                submission.photo_count += 1;
            }
            DraftIntent::DetachPhoto => {
                submission.photo_count = submission.photo_count.saturating_sub(1);
            }
        }
        Ok(())
    }

    pub fn commit(&self, now: DateTime<Utc>) -> Result<Inspection, ValidationError> {
        match &self.identity {
            Some(identity) => builder::assemble(
                identity.clone(),
                &self.submission.form,
                &self.submission.products,
                &self.submission.checklist_answers,
                self.submission.photo_count,
                now,
            ),
            None => self.submission.build(now),
        }
    }
}

fn reset_stale_sub_region(submission: &mut InspectionSubmission) {
    let region = submission.form.region.as_deref().unwrap_or_default();
    let keep = submission
        .form
        .sub_region
        .as_deref()
        .is_some_and(|sub_region| reference::sub_regions(region).contains(&sub_region));
    if !keep {
        submission.form.sub_region = None;
    }
}
