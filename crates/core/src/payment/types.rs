//! Payment domain types for the enrollment ledger.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Enrollment lifecycle status.
///
/// The valid progression is:
/// - Pending → Verified (registrar attaches the fee schedule)
/// - Verified → For Payment (a receipt awaits cashier processing)
/// - Verified / For Payment → Officially Enrolled (full payment confirmed)
/// - Pending / Verified → Rejected (enrollment review)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    /// Submitted, awaiting registrar verification.
    Pending,
    /// Verified; total fee set, payable.
    Verified,
    /// A receipt has been submitted and awaits the cashier.
    ForPayment,
    /// Fully paid and confirmed; terminal.
    OfficiallyEnrolled,
    /// Rejected during enrollment review; terminal.
    Rejected,
}

impl EnrollmentStatus {
    /// Returns the display string used in responses and storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Verified => "Verified",
            Self::ForPayment => "For Payment",
            Self::OfficiallyEnrolled => "Officially Enrolled",
            Self::Rejected => "Rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "verified" => Some(Self::Verified),
            "for payment" => Some(Self::ForPayment),
            "officially enrolled" => Some(Self::OfficiallyEnrolled),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if payments may be recorded against this status.
    #[must_use]
    pub fn is_payable(&self) -> bool {
        matches!(self, Self::Verified | Self::ForPayment)
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment status derived from the accumulated amount paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Nothing paid yet.
    Unpaid,
    /// Some but not all of the total fee has been paid.
    Partial,
    /// The total fee has been met or exceeded.
    FullyPaid,
}

impl PaymentStatus {
    /// Returns the display string used in responses and storage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::Partial => "Partial",
            Self::FullyPaid => "Fully Paid",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unpaid" => Some(Self::Unpaid),
            "partial" => Some(Self::Partial),
            "fully paid" => Some(Self::FullyPaid),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fee components for a program/year/semester/academic-year.
///
/// Components are optional at the storage level; verification treats an
/// absent component as an error, never as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    /// Base tuition amount.
    pub tuition_amount: Option<Decimal>,
    /// Miscellaneous fees.
    pub misc_fees: Option<Decimal>,
    /// Laboratory fees.
    pub lab_fees: Option<Decimal>,
    /// Other fees.
    pub other_fees: Option<Decimal>,
}

/// Result of applying a payment to an enrollment's ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOutcome {
    /// New accumulated amount paid.
    pub amount_paid: Decimal,
    /// Remaining balance; negative when overpaid (never clamped).
    pub remaining_balance: Decimal,
    /// Derived payment status.
    pub payment_status: PaymentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrollment_status_strings() {
        assert_eq!(EnrollmentStatus::ForPayment.as_str(), "For Payment");
        assert_eq!(
            EnrollmentStatus::OfficiallyEnrolled.as_str(),
            "Officially Enrolled"
        );
        assert_eq!(
            EnrollmentStatus::parse("for payment"),
            Some(EnrollmentStatus::ForPayment)
        );
        assert_eq!(
            EnrollmentStatus::parse("Officially Enrolled"),
            Some(EnrollmentStatus::OfficiallyEnrolled)
        );
        assert_eq!(EnrollmentStatus::parse("enrolled"), None);
    }

    #[test]
    fn test_payable_statuses() {
        assert!(EnrollmentStatus::Verified.is_payable());
        assert!(EnrollmentStatus::ForPayment.is_payable());
        assert!(!EnrollmentStatus::Pending.is_payable());
        assert!(!EnrollmentStatus::OfficiallyEnrolled.is_payable());
        assert!(!EnrollmentStatus::Rejected.is_payable());
    }

    #[test]
    fn test_payment_status_strings() {
        assert_eq!(PaymentStatus::FullyPaid.as_str(), "Fully Paid");
        assert_eq!(
            PaymentStatus::parse("fully paid"),
            Some(PaymentStatus::FullyPaid)
        );
        assert_eq!(PaymentStatus::parse("paid"), None);
    }
}
