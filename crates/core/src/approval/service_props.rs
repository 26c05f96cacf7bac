//! Property-based tests for ApprovalService.
//!
//! Validates the state machine properties with randomized inputs.

use proptest::prelude::*;
use uuid::Uuid;

use crate::approval::error::ApprovalError;
use crate::approval::service::ApprovalService;
use crate::approval::types::{ApprovalAction, GradeStatus};

/// Strategy for generating random GradeStatus values.
fn arb_status() -> impl Strategy<Value = GradeStatus> {
    prop_oneof![
        Just(GradeStatus::Pending),
        Just(GradeStatus::RegistrarApproved),
        Just(GradeStatus::DeanApproved),
        Just(GradeStatus::Final),
    ]
}

/// Strategy for generating random approval actions.
fn arb_action() -> impl Strategy<Value = ApprovalAction> {
    prop_oneof![
        Just(ApprovalAction::RegistrarApprove),
        Just(ApprovalAction::DeanApprove),
        Just(ApprovalAction::FinalApprove),
        Just(ApprovalAction::Reject),
    ]
}

/// Strategy for generating random UUIDs.
fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// An action succeeds iff the current status equals its required
    /// predecessor; reject succeeds from every status.
    #[test]
    fn prop_action_legal_iff_predecessor_matches(
        action in arb_action(),
        status in arb_status(),
        actor in arb_uuid()
    ) {
        let result = ApprovalService::apply(action, status, actor);
        match ApprovalService::required_predecessor(action) {
            None => prop_assert!(result.is_ok()),
            Some(required) if required == status => prop_assert!(result.is_ok()),
            Some(required) => {
                match result {
                    Err(ApprovalError::InvalidTransition { required: r, current, .. }) => {
                        prop_assert_eq!(r, required);
                        prop_assert_eq!(current, status);
                    }
                    other => prop_assert!(false, "expected InvalidTransition, got {:?}", other),
                }
            }
        }
    }

    /// Reject always lands on pending regardless of the current status.
    #[test]
    fn prop_reject_always_yields_pending(status in arb_status(), actor in arb_uuid()) {
        let transition = ApprovalService::apply(ApprovalAction::Reject, status, actor).unwrap();
        prop_assert_eq!(transition.new_status(), GradeStatus::Pending);
    }

    /// A successful non-reject transition advances exactly one step in
    /// the chain; the chain never skips a gate.
    #[test]
    fn prop_advance_moves_one_step(action in arb_action(), status in arb_status(), actor in arb_uuid()) {
        if let Ok(transition) = ApprovalService::apply(action, status, actor) {
            let new_status = transition.new_status();
            match action {
                ApprovalAction::RegistrarApprove => {
                    prop_assert_eq!(new_status, GradeStatus::RegistrarApproved);
                }
                ApprovalAction::DeanApprove => {
                    prop_assert_eq!(new_status, GradeStatus::DeanApproved);
                }
                ApprovalAction::FinalApprove => {
                    prop_assert_eq!(new_status, GradeStatus::Final);
                }
                ApprovalAction::Reject => {
                    prop_assert_eq!(new_status, GradeStatus::Pending);
                }
            }
        }
    }
}
