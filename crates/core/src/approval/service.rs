//! State transition and authorization logic for the grade approval chain.
//!
//! All methods are associated functions that validate and execute
//! transitions against the grade's *current persisted* status, returning
//! the `ApprovalTransition` with audit trail information. The repository
//! layer re-reads the status under a row lock before calling in here.

use chrono::Utc;
use uuid::Uuid;

use registra_shared::StaffRole;

use crate::approval::error::ApprovalError;
use crate::approval::types::{ApprovalAction, ApprovalTransition, GradeStatus};

/// Stateless service for grade approval transitions.
pub struct ApprovalService;

impl ApprovalService {
    /// Applies an action to a grade in the given status.
    ///
    /// # Arguments
    /// * `action` - The approval action to apply
    /// * `current_status` - The grade's current persisted status
    /// * `actor` - The staff member performing the action
    ///
    /// # Returns
    /// * `Ok(ApprovalTransition)` with the audit fields to write
    /// * `Err(ApprovalError::InvalidTransition)` naming the required
    ///   predecessor state if the precondition fails
    pub fn apply(
        action: ApprovalAction,
        current_status: GradeStatus,
        actor: Uuid,
    ) -> Result<ApprovalTransition, ApprovalError> {
        match action {
            ApprovalAction::RegistrarApprove => Self::registrar_approve(current_status, actor),
            ApprovalAction::DeanApprove => Self::dean_approve(current_status, actor),
            ApprovalAction::FinalApprove => Self::final_approve(current_status),
            ApprovalAction::Reject => Ok(Self::reject()),
        }
    }

    /// Registrar signs off a pending grade.
    pub fn registrar_approve(
        current_status: GradeStatus,
        approved_by: Uuid,
    ) -> Result<ApprovalTransition, ApprovalError> {
        match current_status {
            GradeStatus::Pending => Ok(ApprovalTransition::RegistrarApprove {
                new_status: GradeStatus::RegistrarApproved,
                approved_by,
                approved_at: Utc::now(),
            }),
            _ => Err(ApprovalError::InvalidTransition {
                action: ApprovalAction::RegistrarApprove,
                current: current_status,
                required: GradeStatus::Pending,
            }),
        }
    }

    /// Dean signs off a registrar-approved grade.
    pub fn dean_approve(
        current_status: GradeStatus,
        approved_by: Uuid,
    ) -> Result<ApprovalTransition, ApprovalError> {
        match current_status {
            GradeStatus::RegistrarApproved => Ok(ApprovalTransition::DeanApprove {
                new_status: GradeStatus::DeanApproved,
                approved_by,
                approved_at: Utc::now(),
            }),
            _ => Err(ApprovalError::InvalidTransition {
                action: ApprovalAction::DeanApprove,
                current: current_status,
                required: GradeStatus::RegistrarApproved,
            }),
        }
    }

    /// Final authority releases a dean-approved grade.
    pub fn final_approve(current_status: GradeStatus) -> Result<ApprovalTransition, ApprovalError> {
        match current_status {
            GradeStatus::DeanApproved => Ok(ApprovalTransition::FinalApprove {
                new_status: GradeStatus::Final,
                approved_at: Utc::now(),
            }),
            _ => Err(ApprovalError::InvalidTransition {
                action: ApprovalAction::FinalApprove,
                current: current_status,
                required: GradeStatus::DeanApproved,
            }),
        }
    }

    /// Resets a grade to pending, clearing the approval trail.
    ///
    /// Legal from any status; rejecting an already-pending grade is a
    /// state-wise no-op.
    #[must_use]
    pub fn reject() -> ApprovalTransition {
        ApprovalTransition::Reject {
            new_status: GradeStatus::Pending,
        }
    }

    /// Returns the predecessor status an action requires, or `None`
    /// for `reject` which is legal from any status.
    #[must_use]
    pub fn required_predecessor(action: ApprovalAction) -> Option<GradeStatus> {
        match action {
            ApprovalAction::RegistrarApprove => Some(GradeStatus::Pending),
            ApprovalAction::DeanApprove => Some(GradeStatus::RegistrarApproved),
            ApprovalAction::FinalApprove => Some(GradeStatus::DeanApproved),
            ApprovalAction::Reject => None,
        }
    }

    /// Checks whether the caller's role may perform the action.
    ///
    /// Admin is the final authority and may perform any action.
    /// This is an explicit capability check, not a UI-level assumption.
    pub fn authorize(action: ApprovalAction, role: StaffRole) -> Result<(), ApprovalError> {
        let permitted = match action {
            ApprovalAction::RegistrarApprove => {
                matches!(role, StaffRole::Registrar | StaffRole::Admin)
            }
            ApprovalAction::DeanApprove => matches!(role, StaffRole::Dean | StaffRole::Admin),
            ApprovalAction::FinalApprove => matches!(role, StaffRole::Admin),
            ApprovalAction::Reject => matches!(
                role,
                StaffRole::Registrar | StaffRole::Dean | StaffRole::Admin
            ),
        };

        if permitted {
            Ok(())
        } else {
            Err(ApprovalError::RoleNotPermitted {
                role: role.as_str().to_string(),
                action,
            })
        }
    }
}
