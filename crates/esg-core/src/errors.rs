//! Errores del core ESG.

use esg_domain::{DomainError, EsgType, SubmissionStatus};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum CoreError {
    #[error("validation failed: {0}")] Validation(String),
    #[error("not found: {0}")] NotFound(String),
    #[error("invalid transition {from} -> {to}")] InvalidTransition { from: SubmissionStatus, to: SubmissionStatus },
    #[error("column '{column}' does not exist in {} table", esg_type.detail_table())] UnknownColumn { esg_type: EsgType, column: String },
    #[error("conflict: {0}")] Conflict(String),
    #[error("storage error: {0}")] Storage(String),
}

impl From<DomainError> for CoreError {
    fn from(e: DomainError) -> Self {
        CoreError::Validation(e.to_string())
    }
}
