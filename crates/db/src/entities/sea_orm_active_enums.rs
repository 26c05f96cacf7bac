//! Postgres enum mappings for the Registra schema.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Grade approval status enum (`grade_approval_status`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "grade_approval_status"
)]
pub enum GradeApprovalStatus {
    /// Awaiting the registrar's sign-off.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Signed off by the registrar.
    #[sea_orm(string_value = "registrar_approved")]
    RegistrarApproved,
    /// Signed off by the dean.
    #[sea_orm(string_value = "dean_approved")]
    DeanApproved,
    /// Released.
    #[sea_orm(string_value = "final")]
    Final,
}

/// Enrollment status enum (`enrollment_status`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "enrollment_status")]
pub enum EnrollmentStatus {
    /// Awaiting registrar verification.
    #[sea_orm(string_value = "Pending")]
    Pending,
    /// Verified; payable.
    #[sea_orm(string_value = "Verified")]
    Verified,
    /// Receipt submitted, awaiting cashier.
    #[sea_orm(string_value = "For Payment")]
    ForPayment,
    /// Fully paid and confirmed.
    #[sea_orm(string_value = "Officially Enrolled")]
    OfficiallyEnrolled,
    /// Rejected during review.
    #[sea_orm(string_value = "Rejected")]
    Rejected,
}

/// Payment status enum (`payment_status`).
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
pub enum PaymentStatus {
    /// Nothing paid yet.
    #[sea_orm(string_value = "Unpaid")]
    Unpaid,
    /// Partially paid.
    #[sea_orm(string_value = "Partial")]
    Partial,
    /// Total fee met or exceeded.
    #[sea_orm(string_value = "Fully Paid")]
    FullyPaid,
}
