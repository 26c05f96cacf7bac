//! Payment error types for the enrollment ledger.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::payment::types::{EnrollmentStatus, PaymentStatus};

/// Errors that can occur during payment and verification operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Enrollment not found.
    #[error("Enrollment {0} not found")]
    EnrollmentNotFound(Uuid),

    /// Payment attempted against an enrollment that is not verified.
    #[error("No verified enrollment to pay against; current status is {status}")]
    NotVerified {
        /// The enrollment's current status.
        status: EnrollmentStatus,
    },

    /// Payment amount must be positive.
    #[error("Invalid payment amount {0}; amount must be greater than zero")]
    InvalidAmount(Decimal),

    /// No fee schedule row matches the enrollment.
    #[error(
        "No fee schedule for program {program_id}, year {year_level}, \
         {semester} semester, AY {academic_year}"
    )]
    FeeScheduleMissing {
        /// The enrollment's program.
        program_id: Uuid,
        /// The enrollment's year level.
        year_level: i16,
        /// The enrollment's semester.
        semester: String,
        /// The enrollment's academic year.
        academic_year: String,
    },

    /// A fee schedule row exists but a component is absent.
    #[error("Fee schedule is missing the {0} component")]
    IncompleteFeeSchedule(&'static str),

    /// Enrollment cannot be confirmed until fully paid.
    #[error("Enrollment cannot be confirmed; payment status is {payment_status}")]
    NotFullyPaid {
        /// The enrollment's current payment status.
        payment_status: PaymentStatus,
    },

    /// A transaction with this reference number already exists.
    #[error("Duplicate payment reference number: {0}")]
    DuplicateReference(String),

    /// The attempted status change is not legal from the current status.
    #[error("Cannot move enrollment from {current} to {target}")]
    InvalidStatusChange {
        /// The enrollment's current status.
        current: EnrollmentStatus,
        /// The attempted target status.
        target: EnrollmentStatus,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl PaymentError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount(_) | Self::NotFullyPaid { .. } | Self::InvalidStatusChange { .. } => {
                400
            }
            Self::EnrollmentNotFound(_)
            | Self::NotVerified { .. }
            | Self::FeeScheduleMissing { .. }
            | Self::IncompleteFeeSchedule(_) => 404,
            Self::DuplicateReference(_) => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EnrollmentNotFound(_) => "ENROLLMENT_NOT_FOUND",
            Self::NotVerified { .. } => "NOT_VERIFIED",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::FeeScheduleMissing { .. } => "FEE_SCHEDULE_MISSING",
            Self::IncompleteFeeSchedule(_) => "INCOMPLETE_FEE_SCHEDULE",
            Self::NotFullyPaid { .. } => "NOT_FULLY_PAID",
            Self::DuplicateReference(_) => "DUPLICATE_REFERENCE",
            Self::InvalidStatusChange { .. } => "INVALID_STATUS_CHANGE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
