//! Error types for wellspring

use std::fmt;
use thiserror::Error;

use crate::types::EntryId;

/// One offending field in a rejected mutation or form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// All field issues collected from one validation pass.
///
/// Validation never stops at the first bad field; the caller gets the full
/// list so the UI can surface every problem inline at once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(pub Vec<FieldIssue>);

impl ValidationErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldIssue::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any issue concerns the given field.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|issue| issue.field == field)
    }

    /// Converts accumulated issues into a result: `Ok` when clean,
    /// `Err(CoreError::Validation)` otherwise.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for issue in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", issue.field, issue.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Errors surfaced by the analytics core
///
/// Nothing here is fatal to the host: validation and not-found errors are
/// recoverable user-input failures, corrupt snapshots are recovered by
/// resetting to an empty store, and external-service failures abandon the
/// operation without retry.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("no entry with id {0}")]
    NotFound(EntryId),

    #[error("removal not confirmed")]
    NotConfirmed,

    #[error("goal target must be positive and finite, got {0}")]
    InvalidGoal(f64),

    #[error("stored snapshot is corrupt: {0}")]
    CorruptSnapshot(String),

    #[error("storage backend failure: {0}")]
    Storage(String),

    #[error("external service failure: {0}")]
    ExternalService(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Field issues of a validation failure, if that is what this is.
    pub fn validation_issues(&self) -> Option<&[FieldIssue]> {
        match self {
            CoreError::Validation(errors) => Some(&errors.0),
            _ => None,
        }
    }
}
