//! Approval domain types for the grade sign-off chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Grade approval status.
///
/// Grades progress through these states from submission to release.
/// The valid transitions are:
/// - pending → registrar_approved (registrar_approve)
/// - registrar_approved → dean_approved (dean_approve)
/// - dean_approved → final (final_approve)
/// - any → pending (reject, clears the approval trail)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeStatus {
    /// Submitted, awaiting the registrar's sign-off.
    Pending,
    /// Signed off by the registrar, awaiting the dean.
    RegistrarApproved,
    /// Signed off by the dean, awaiting final release.
    DeanApproved,
    /// Released; terminal state.
    Final,
}

impl GradeStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::RegistrarApproved => "registrar_approved",
            Self::DeanApproved => "dean_approved",
            Self::Final => "final",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "registrar_approved" => Some(Self::RegistrarApproved),
            "dean_approved" => Some(Self::DeanApproved),
            "final" => Some(Self::Final),
            _ => None,
        }
    }

    /// Returns true if the grade has been fully released.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Final)
    }
}

impl fmt::Display for GradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Action applied to a grade record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    /// Registrar signs off a pending grade.
    RegistrarApprove,
    /// Dean signs off a registrar-approved grade.
    DeanApprove,
    /// Final authority releases a dean-approved grade.
    FinalApprove,
    /// Reset the grade to pending, clearing the approval trail.
    Reject,
}

impl ApprovalAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RegistrarApprove => "registrar_approve",
            Self::DeanApprove => "dean_approve",
            Self::FinalApprove => "final_approve",
            Self::Reject => "reject",
        }
    }

    /// Parses an action from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "registrar_approve" => Some(Self::RegistrarApprove),
            "dean_approve" => Some(Self::DeanApprove),
            "final_approve" => Some(Self::FinalApprove),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Approval transition representing a state change with audit data.
///
/// Each variant captures the resulting status and the role-specific
/// actor/timestamp fields to be written.
#[derive(Debug, Clone)]
pub enum ApprovalTransition {
    /// Registrar sign-off.
    RegistrarApprove {
        /// The new status after the sign-off.
        new_status: GradeStatus,
        /// The registrar who approved.
        approved_by: Uuid,
        /// When the approval happened.
        approved_at: DateTime<Utc>,
    },
    /// Dean sign-off.
    DeanApprove {
        /// The new status after the sign-off.
        new_status: GradeStatus,
        /// The dean who approved.
        approved_by: Uuid,
        /// When the approval happened.
        approved_at: DateTime<Utc>,
    },
    /// Final release.
    FinalApprove {
        /// The new status after release.
        new_status: GradeStatus,
        /// When the release happened.
        approved_at: DateTime<Utc>,
    },
    /// Reset to pending, clearing all actor/timestamp fields.
    Reject {
        /// The new status after rejection (pending).
        new_status: GradeStatus,
    },
}

impl ApprovalTransition {
    /// Returns the new status resulting from this transition.
    #[must_use]
    pub fn new_status(&self) -> GradeStatus {
        match self {
            Self::RegistrarApprove { new_status, .. }
            | Self::DeanApprove { new_status, .. }
            | Self::FinalApprove { new_status, .. }
            | Self::Reject { new_status } => *new_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(GradeStatus::Pending.as_str(), "pending");
        assert_eq!(GradeStatus::RegistrarApproved.as_str(), "registrar_approved");
        assert_eq!(GradeStatus::DeanApproved.as_str(), "dean_approved");
        assert_eq!(GradeStatus::Final.as_str(), "final");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(GradeStatus::parse("pending"), Some(GradeStatus::Pending));
        assert_eq!(
            GradeStatus::parse("REGISTRAR_APPROVED"),
            Some(GradeStatus::RegistrarApproved)
        );
        assert_eq!(GradeStatus::parse("Final"), Some(GradeStatus::Final));
        assert_eq!(GradeStatus::parse("approved"), None);
    }

    #[test]
    fn test_status_terminal() {
        assert!(!GradeStatus::Pending.is_terminal());
        assert!(!GradeStatus::DeanApproved.is_terminal());
        assert!(GradeStatus::Final.is_terminal());
    }

    #[test]
    fn test_action_parse() {
        assert_eq!(
            ApprovalAction::parse("registrar_approve"),
            Some(ApprovalAction::RegistrarApprove)
        );
        assert_eq!(
            ApprovalAction::parse("DEAN_APPROVE"),
            Some(ApprovalAction::DeanApprove)
        );
        assert_eq!(ApprovalAction::parse("reject"), Some(ApprovalAction::Reject));
        assert_eq!(ApprovalAction::parse("approve"), None);
    }

    #[test]
    fn test_transition_new_status() {
        let t = ApprovalTransition::Reject {
            new_status: GradeStatus::Pending,
        };
        assert_eq!(t.new_status(), GradeStatus::Pending);
    }
}
