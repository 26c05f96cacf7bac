//! Property-based tests for PaymentService.
//!
//! Validates the ledger arithmetic contract with randomized inputs.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::payment::error::PaymentError;
use crate::payment::service::PaymentService;
use crate::payment::types::PaymentStatus;

/// Strategy for money amounts in [0.01, 1_000_000.00] at two decimals.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for non-negative accumulated totals.
fn arb_paid() -> impl Strategy<Value = Decimal> {
    (0i64..=100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Ledger invariant: amount_paid + remaining_balance == total_fee.
    #[test]
    fn prop_ledger_invariant_holds(
        total in arb_amount(),
        previous in arb_paid(),
        amount in arb_amount()
    ) {
        let outcome = PaymentService::apply_payment(total, previous, amount).unwrap();
        prop_assert_eq!(outcome.amount_paid + outcome.remaining_balance, total);
    }

    /// Status derivation is consistent with the accumulated total.
    #[test]
    fn prop_status_matches_arithmetic(
        total in arb_amount(),
        previous in arb_paid(),
        amount in arb_amount()
    ) {
        let outcome = PaymentService::apply_payment(total, previous, amount).unwrap();
        match outcome.payment_status {
            PaymentStatus::FullyPaid => prop_assert!(outcome.amount_paid >= total),
            PaymentStatus::Partial => {
                prop_assert!(outcome.amount_paid > Decimal::ZERO);
                prop_assert!(outcome.amount_paid < total);
            }
            PaymentStatus::Unpaid => prop_assert_eq!(outcome.amount_paid, Decimal::ZERO),
        }
    }

    /// Remaining balance is negative exactly when the total fee is exceeded.
    #[test]
    fn prop_negative_remaining_iff_overpaid(
        total in arb_amount(),
        previous in arb_paid(),
        amount in arb_amount()
    ) {
        let outcome = PaymentService::apply_payment(total, previous, amount).unwrap();
        prop_assert_eq!(
            outcome.remaining_balance < Decimal::ZERO,
            outcome.amount_paid > total
        );
    }

    /// Non-positive amounts are always rejected without an outcome.
    #[test]
    fn prop_non_positive_amount_rejected(
        total in arb_amount(),
        previous in arb_paid(),
        cents in 0i64..=100_000
    ) {
        let amount = Decimal::new(-cents, 2);
        let result = PaymentService::apply_payment(total, previous, amount);
        prop_assert!(matches!(result, Err(PaymentError::InvalidAmount(_))));
    }
}
