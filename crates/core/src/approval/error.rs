//! Approval error types for the grade sign-off chain.

use thiserror::Error;
use uuid::Uuid;

use crate::approval::types::{ApprovalAction, GradeStatus};

/// Errors that can occur during approval operations.
#[derive(Debug, Error)]
pub enum ApprovalError {
    /// Attempted an action whose required predecessor state does not match.
    #[error(
        "Cannot {action} a grade in status {current}; requires status {required}"
    )]
    InvalidTransition {
        /// The attempted action.
        action: ApprovalAction,
        /// The grade's current status.
        current: GradeStatus,
        /// The status the action requires.
        required: GradeStatus,
    },

    /// Unrecognized action value.
    #[error("Unknown approval action: {0}")]
    UnknownAction(String),

    /// The caller's role may not perform this action.
    #[error("Role {role} is not permitted to {action}")]
    RoleNotPermitted {
        /// The caller's role.
        role: String,
        /// The attempted action.
        action: ApprovalAction,
    },

    /// Grade not found.
    #[error("Grade {0} not found")]
    GradeNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl ApprovalError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. } | Self::UnknownAction(_) => 400,
            Self::RoleNotPermitted { .. } => 403,
            Self::GradeNotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::UnknownAction(_) => "UNKNOWN_ACTION",
            Self::RoleNotPermitted { .. } => "ROLE_NOT_PERMITTED",
            Self::GradeNotFound(_) => "GRADE_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
