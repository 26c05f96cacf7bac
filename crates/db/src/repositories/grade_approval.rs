//! Grade approval repository.
//!
//! Executes approval chain transitions transactionally: the grade row
//! is locked (`SELECT ... FOR UPDATE`) before the precondition is
//! evaluated against the current persisted status, so two concurrent
//! attempts to advance the same grade past the same gate serialize and
//! exactly one succeeds.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use registra_core::approval::{
    ApprovalAction, ApprovalError, ApprovalService, ApprovalTransition, GradeStatus,
};
use registra_shared::StaffRole;

use crate::entities::{grades, sea_orm_active_enums::GradeApprovalStatus};

/// Result of a successful approval transition.
#[derive(Debug, Clone)]
pub struct AppliedApproval {
    /// The updated grade row.
    pub grade: grades::Model,
    /// The status before the transition.
    pub previous_status: GradeStatus,
    /// The status after the transition.
    pub new_status: GradeStatus,
}

/// Repository for grade approval transitions.
#[derive(Debug, Clone)]
pub struct GradeApprovalRepository {
    db: DatabaseConnection,
}

impl GradeApprovalRepository {
    /// Creates a new grade approval repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches a grade by id.
    ///
    /// # Errors
    ///
    /// Returns `ApprovalError::GradeNotFound` if the grade does not exist.
    pub async fn get_grade(&self, grade_id: Uuid) -> Result<grades::Model, ApprovalError> {
        grades::Entity::find_by_id(grade_id)
            .one(&self.db)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?
            .ok_or(ApprovalError::GradeNotFound(grade_id))
    }

    /// Applies an approval action to a single grade.
    ///
    /// The whole read-check-write sequence is one transaction. The
    /// precondition is evaluated against the row's current persisted
    /// status under an exclusive lock, never a caller-supplied value.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor's role may not perform the action
    /// - The grade is not found
    /// - The grade's current status does not match the action's
    ///   required predecessor
    /// - The database operation fails
    pub async fn apply_action(
        &self,
        grade_id: Uuid,
        action: ApprovalAction,
        actor_id: Uuid,
        actor_role: StaffRole,
    ) -> Result<AppliedApproval, ApprovalError> {
        ApprovalService::authorize(action, actor_role)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?;

        let grade = grades::Entity::find_by_id(grade_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?
            .ok_or(ApprovalError::GradeNotFound(grade_id))?;

        let previous_status = db_status_to_core(&grade.approval_status);

        // Dropping the transaction on the error path rolls it back.
        let transition = ApprovalService::apply(action, previous_status, actor_id)?;
        let new_status = transition.new_status();

        let now = Utc::now().into();
        let mut active: grades::ActiveModel = grade.into();
        match transition {
            ApprovalTransition::RegistrarApprove {
                approved_by,
                approved_at,
                ..
            } => {
                active.approval_status = Set(GradeApprovalStatus::RegistrarApproved);
                active.registrar_approved_by = Set(Some(approved_by));
                active.registrar_approved_at = Set(Some(approved_at.into()));
            }
            ApprovalTransition::DeanApprove {
                approved_by,
                approved_at,
                ..
            } => {
                active.approval_status = Set(GradeApprovalStatus::DeanApproved);
                active.dean_approved_by = Set(Some(approved_by));
                active.dean_approved_at = Set(Some(approved_at.into()));
            }
            ApprovalTransition::FinalApprove { approved_at, .. } => {
                active.approval_status = Set(GradeApprovalStatus::Final);
                active.final_approved_at = Set(Some(approved_at.into()));
            }
            ApprovalTransition::Reject { .. } => {
                active.approval_status = Set(GradeApprovalStatus::Pending);
                active.registrar_approved_by = Set(None);
                active.registrar_approved_at = Set(None);
                active.dean_approved_by = Set(None);
                active.dean_approved_at = Set(None);
                active.final_approved_at = Set(None);
            }
        }
        active.updated_at = Set(now);

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?;

        Ok(AppliedApproval {
            grade: updated,
            previous_status,
            new_status,
        })
    }

    /// Applies an approval action to every grade of a course offering.
    ///
    /// Batch variant used for whole-class approval: the action's set
    /// clause is applied unconditionally to every matching row in one
    /// statement, with no per-row precondition check. Whether this
    /// should re-validate each row is an open product question; the
    /// observed administrative-override behavior is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor's role may not perform the action
    /// or the database operation fails. Zero matching rows is not an
    /// error.
    pub async fn apply_action_to_offering(
        &self,
        course_offering_id: Uuid,
        action: ApprovalAction,
        actor_id: Uuid,
        actor_role: StaffRole,
    ) -> Result<u64, ApprovalError> {
        ApprovalService::authorize(action, actor_role)?;

        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let mut update = grades::Entity::update_many()
            .filter(grades::Column::CourseOfferingId.eq(course_offering_id));

        update = match action {
            ApprovalAction::RegistrarApprove => update
                .col_expr(
                    grades::Column::ApprovalStatus,
                    GradeApprovalStatus::RegistrarApproved.as_enum(),
                )
                .col_expr(grades::Column::RegistrarApprovedBy, Expr::value(Some(actor_id)))
                .col_expr(grades::Column::RegistrarApprovedAt, Expr::value(Some(now))),
            ApprovalAction::DeanApprove => update
                .col_expr(
                    grades::Column::ApprovalStatus,
                    GradeApprovalStatus::DeanApproved.as_enum(),
                )
                .col_expr(grades::Column::DeanApprovedBy, Expr::value(Some(actor_id)))
                .col_expr(grades::Column::DeanApprovedAt, Expr::value(Some(now))),
            ApprovalAction::FinalApprove => update
                .col_expr(
                    grades::Column::ApprovalStatus,
                    GradeApprovalStatus::Final.as_enum(),
                )
                .col_expr(grades::Column::FinalApprovedAt, Expr::value(Some(now))),
            ApprovalAction::Reject => update
                .col_expr(
                    grades::Column::ApprovalStatus,
                    GradeApprovalStatus::Pending.as_enum(),
                )
                .col_expr(
                    grades::Column::RegistrarApprovedBy,
                    Expr::value(Option::<Uuid>::None),
                )
                .col_expr(
                    grades::Column::RegistrarApprovedAt,
                    Expr::value(Option::<sea_orm::prelude::DateTimeWithTimeZone>::None),
                )
                .col_expr(
                    grades::Column::DeanApprovedBy,
                    Expr::value(Option::<Uuid>::None),
                )
                .col_expr(
                    grades::Column::DeanApprovedAt,
                    Expr::value(Option::<sea_orm::prelude::DateTimeWithTimeZone>::None),
                )
                .col_expr(
                    grades::Column::FinalApprovedAt,
                    Expr::value(Option::<sea_orm::prelude::DateTimeWithTimeZone>::None),
                ),
        };

        let result = update
            .col_expr(grades::Column::UpdatedAt, Expr::value(now))
            .exec(&self.db)
            .await
            .map_err(|e| ApprovalError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

// ============================================================================
// Conversion helpers
// ============================================================================

/// Converts the database approval status to the core status.
pub(crate) fn db_status_to_core(status: &GradeApprovalStatus) -> GradeStatus {
    match status {
        GradeApprovalStatus::Pending => GradeStatus::Pending,
        GradeApprovalStatus::RegistrarApproved => GradeStatus::RegistrarApproved,
        GradeApprovalStatus::DeanApproved => GradeStatus::DeanApproved,
        GradeApprovalStatus::Final => GradeStatus::Final,
    }
}
