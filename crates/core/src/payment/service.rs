//! Fee computation and payment application logic.
//!
//! All arithmetic is `Decimal` at two-decimal precision. The ledger
//! contract is `amount_paid + remaining_balance == total_fee` after every
//! payment; an overpayment stores the true negative remaining balance
//! rather than clamping to zero.

use rust_decimal::Decimal;

use crate::payment::error::PaymentError;
use crate::payment::types::{FeeSchedule, PaymentOutcome, PaymentStatus};

/// Stateless service for enrollment payment arithmetic.
pub struct PaymentService;

impl PaymentService {
    /// Computes the total fee from a fee schedule row.
    ///
    /// All four components are mandatory; an absent component is an
    /// error, not zero.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::IncompleteFeeSchedule` naming the first
    /// missing component.
    pub fn total_fee(schedule: &FeeSchedule) -> Result<Decimal, PaymentError> {
        let tuition = schedule
            .tuition_amount
            .ok_or(PaymentError::IncompleteFeeSchedule("tuition_amount"))?;
        let misc = schedule
            .misc_fees
            .ok_or(PaymentError::IncompleteFeeSchedule("misc_fees"))?;
        let lab = schedule
            .lab_fees
            .ok_or(PaymentError::IncompleteFeeSchedule("lab_fees"))?;
        let other = schedule
            .other_fees
            .ok_or(PaymentError::IncompleteFeeSchedule("other_fees"))?;

        Ok((tuition + misc + lab + other).round_dp(2))
    }

    /// Applies a payment to the ledger.
    ///
    /// # Arguments
    /// * `total_fee` - The enrollment's total fee set at verification
    /// * `previous_paid` - The accumulated amount paid so far
    /// * `amount` - The payment being recorded (must be > 0)
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::InvalidAmount` if `amount` is zero or
    /// negative.
    pub fn apply_payment(
        total_fee: Decimal,
        previous_paid: Decimal,
        amount: Decimal,
    ) -> Result<PaymentOutcome, PaymentError> {
        if amount <= Decimal::ZERO {
            return Err(PaymentError::InvalidAmount(amount));
        }

        let amount_paid = (previous_paid + amount).round_dp(2);
        let remaining_balance = (total_fee - amount_paid).round_dp(2);
        let payment_status = Self::derive_status(total_fee, amount_paid);

        Ok(PaymentOutcome {
            amount_paid,
            remaining_balance,
            payment_status,
        })
    }

    /// Derives the payment status from the accumulated amount paid.
    ///
    /// `Fully Paid` iff paid >= total; else `Partial` iff paid > 0;
    /// else `Unpaid`.
    #[must_use]
    pub fn derive_status(total_fee: Decimal, total_paid: Decimal) -> PaymentStatus {
        if total_paid >= total_fee {
            PaymentStatus::FullyPaid
        } else if total_paid > Decimal::ZERO {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn full_schedule() -> FeeSchedule {
        FeeSchedule {
            tuition_amount: Some(dec!(18500.00)),
            misc_fees: Some(dec!(2500.00)),
            lab_fees: Some(dec!(1200.00)),
            other_fees: Some(dec!(800.00)),
        }
    }

    #[test]
    fn test_total_fee_sums_all_components() {
        let total = PaymentService::total_fee(&full_schedule()).unwrap();
        assert_eq!(total, dec!(23000.00));
    }

    #[test]
    fn test_total_fee_rejects_missing_component() {
        let mut schedule = full_schedule();
        schedule.lab_fees = None;
        let err = PaymentService::total_fee(&schedule).unwrap_err();
        assert!(matches!(
            err,
            PaymentError::IncompleteFeeSchedule("lab_fees")
        ));
    }

    #[test]
    fn test_total_fee_missing_component_is_not_zero() {
        // A schedule with a NULL component must error, not treat it as 0.
        let schedule = FeeSchedule {
            tuition_amount: Some(dec!(5000)),
            misc_fees: None,
            lab_fees: Some(dec!(0)),
            other_fees: Some(dec!(0)),
        };
        assert!(PaymentService::total_fee(&schedule).is_err());
    }

    #[test]
    fn test_partial_payment() {
        let outcome = PaymentService::apply_payment(dec!(5000), dec!(0), dec!(1500)).unwrap();
        assert_eq!(outcome.amount_paid, dec!(1500));
        assert_eq!(outcome.remaining_balance, dec!(3500));
        assert_eq!(outcome.payment_status, PaymentStatus::Partial);
    }

    #[test]
    fn test_payments_accumulate_to_fully_paid() {
        let first = PaymentService::apply_payment(dec!(5000), dec!(0), dec!(2000)).unwrap();
        assert_eq!(first.payment_status, PaymentStatus::Partial);

        let second =
            PaymentService::apply_payment(dec!(5000), first.amount_paid, dec!(3000)).unwrap();
        assert_eq!(second.amount_paid, dec!(5000));
        assert_eq!(second.remaining_balance, dec!(0));
        assert_eq!(second.payment_status, PaymentStatus::FullyPaid);
    }

    #[test]
    fn test_ten_thousand_scenario() {
        let first = PaymentService::apply_payment(dec!(10000), dec!(0), dec!(4000)).unwrap();
        assert_eq!(first.payment_status, PaymentStatus::Partial);
        assert_eq!(first.remaining_balance, dec!(6000));

        let second =
            PaymentService::apply_payment(dec!(10000), first.amount_paid, dec!(6000)).unwrap();
        assert_eq!(second.payment_status, PaymentStatus::FullyPaid);
        assert_eq!(second.remaining_balance, dec!(0));
    }

    #[test]
    fn test_overpayment_keeps_negative_remaining() {
        let outcome = PaymentService::apply_payment(dec!(5000), dec!(4000), dec!(2000)).unwrap();
        assert_eq!(outcome.amount_paid, dec!(6000));
        // Overpayment signal: true negative remainder, not clamped.
        assert_eq!(outcome.remaining_balance, dec!(-1000));
        assert_eq!(outcome.payment_status, PaymentStatus::FullyPaid);
    }

    #[test]
    fn test_zero_amount_rejected() {
        let result = PaymentService::apply_payment(dec!(5000), dec!(0), dec!(0));
        assert!(matches!(result, Err(PaymentError::InvalidAmount(_))));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result = PaymentService::apply_payment(dec!(5000), dec!(1000), dec!(-500));
        assert!(matches!(result, Err(PaymentError::InvalidAmount(_))));
    }

    #[test]
    fn test_derive_status_boundaries() {
        assert_eq!(
            PaymentService::derive_status(dec!(5000), dec!(0)),
            PaymentStatus::Unpaid
        );
        assert_eq!(
            PaymentService::derive_status(dec!(5000), dec!(0.01)),
            PaymentStatus::Partial
        );
        assert_eq!(
            PaymentService::derive_status(dec!(5000), dec!(4999.99)),
            PaymentStatus::Partial
        );
        assert_eq!(
            PaymentService::derive_status(dec!(5000), dec!(5000)),
            PaymentStatus::FullyPaid
        );
        assert_eq!(
            PaymentService::derive_status(dec!(5000), dec!(5000.01)),
            PaymentStatus::FullyPaid
        );
    }
}
