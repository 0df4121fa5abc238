//! SaveCourseHandler - Command handler for creating and editing courses in billing.
//!
//! Admin only. The role is checked locally before anything is sent; billing
//! checks it again.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::billing::{AccessToken, BillingError, CourseDraft, Identity};
use crate::domain::foundation::ValidationError;
use crate::ports::BillingService;

/// Command to save a course.
#[derive(Debug, Clone)]
pub struct SaveCourseCommand {
    pub access_token: AccessToken,

    /// The identity resolved for this request.
    pub identity: Identity,

    pub draft: CourseDraft,

    /// Code of the course being edited; `None` creates a new course.
    pub existing_code: Option<String>,
}

/// Result of a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveCourseResult {
    pub code: String,
    pub created: bool,
    pub success: bool,
}

/// Why a save failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveCourseError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Billing(#[from] BillingError),
}

/// Handler for saving courses.
pub struct SaveCourseHandler {
    billing: Arc<dyn BillingService>,
}

impl SaveCourseHandler {
    pub fn new(billing: Arc<dyn BillingService>) -> Self {
        Self { billing }
    }

    pub async fn handle(&self, cmd: SaveCourseCommand) -> Result<SaveCourseResult, SaveCourseError> {
        if !cmd.identity.is_admin() {
            tracing::warn!(username = %cmd.identity.username, "Non-admin attempted to save a course");
            return Err(BillingError::Forbidden.into());
        }
        cmd.draft.validate()?;

        let success = self
            .billing
            .save_course(&cmd.access_token, &cmd.draft, cmd.existing_code.as_deref())
            .await?;

        Ok(SaveCourseResult {
            code: cmd.draft.code,
            created: cmd.existing_code.is_none(),
            success,
        })
    }
}
