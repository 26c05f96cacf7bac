//! Enrollment repository: verification and the payment ledger.
//!
//! `record_payment` appends one immutable payment transaction and
//! updates the enrollment's accumulated totals inside one database
//! transaction; a failure between the two writes rolls both back.

use chrono::{Months, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use registra_core::payment::{
    EnrollmentStatus, FeeSchedule, PaymentError, PaymentService, PaymentStatus,
    generate_reference_number,
};

use crate::entities::{enrollments, payment_transactions, sea_orm_active_enums, tuition_fees};

/// Input for recording a counter payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentInput {
    /// Payment amount; must be positive.
    pub amount: Decimal,
    /// Payment method (e.g. "cash", "gcash", "bank_transfer").
    pub payment_method: String,
    /// Caller-supplied reference number; generated when absent.
    pub reference_number: Option<String>,
    /// The cashier or registrar recording the payment.
    pub processed_by: Uuid,
}

/// Result of a recorded payment.
#[derive(Debug, Clone)]
pub struct PaymentRecorded {
    /// The appended transaction's id.
    pub transaction_id: Uuid,
    /// The reference number stored on the transaction.
    pub reference_number: String,
    /// The enrollment's new payment status.
    pub payment_status: PaymentStatus,
    /// The enrollment's new remaining balance.
    pub remaining_balance: Decimal,
}

/// Repository for enrollment verification and payments.
#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    db: DatabaseConnection,
}

impl EnrollmentRepository {
    /// Creates a new enrollment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches an enrollment by id.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::EnrollmentNotFound` if it does not exist.
    pub async fn get_enrollment(
        &self,
        enrollment_id: Uuid,
    ) -> Result<enrollments::Model, PaymentError> {
        enrollments::Entity::find_by_id(enrollment_id)
            .one(&self.db)
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?
            .ok_or(PaymentError::EnrollmentNotFound(enrollment_id))
    }

    /// Verifies an enrollment: attaches the applicable fee schedule and
    /// makes it payable.
    ///
    /// Looks up the fee row for (program, year level, semester, academic
    /// year), computes the total fee from all four components, and in one
    /// write sets status Verified, the total fee, and the remaining
    /// balance and payment status derived against the amount already
    /// paid. A fresh enrollment lands on the full balance and Unpaid; a
    /// re-verification refreshes the fee snapshot without disturbing the
    /// ledger contract `amount_paid + remaining_balance == total_fee`.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment is not found, no fee schedule
    /// row matches, a fee component is absent, or the database fails.
    /// On failure the enrollment is left unchanged.
    pub async fn verify(&self, enrollment_id: Uuid) -> Result<enrollments::Model, PaymentError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        let enrollment = enrollments::Entity::find_by_id(enrollment_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?
            .ok_or(PaymentError::EnrollmentNotFound(enrollment_id))?;

        let fee_row = tuition_fees::Entity::find()
            .filter(tuition_fees::Column::ProgramId.eq(enrollment.program_id))
            .filter(tuition_fees::Column::YearLevel.eq(enrollment.year_level))
            .filter(tuition_fees::Column::Semester.eq(enrollment.semester.clone()))
            .filter(tuition_fees::Column::AcademicYear.eq(enrollment.academic_year.clone()))
            .one(&txn)
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?
            .ok_or_else(|| PaymentError::FeeScheduleMissing {
                program_id: enrollment.program_id,
                year_level: enrollment.year_level,
                semester: enrollment.semester.clone(),
                academic_year: enrollment.academic_year.clone(),
            })?;

        let schedule = FeeSchedule {
            tuition_amount: fee_row.tuition_amount,
            misc_fees: fee_row.misc_fees,
            lab_fees: fee_row.lab_fees,
            other_fees: fee_row.other_fees,
        };
        let total_fee = PaymentService::total_fee(&schedule)?;
        let amount_paid = enrollment.amount_paid;
        let remaining_balance = (total_fee - amount_paid).round_dp(2);
        let payment_status = PaymentService::derive_status(total_fee, amount_paid);

        let now = Utc::now().into();
        let mut active: enrollments::ActiveModel = enrollment.into();
        active.enrollment_status = Set(sea_orm_active_enums::EnrollmentStatus::Verified);
        active.total_fee = Set(Some(total_fee));
        active.remaining_balance = Set(Some(remaining_balance));
        active.payment_status = Set(core_payment_status_to_db(payment_status));
        active.updated_at = Set(now);

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        Ok(updated)
    }

    /// Records a counter payment against a verified enrollment.
    ///
    /// Appends one immutable payment transaction carrying the derived
    /// status snapshot, then updates the enrollment's accumulated
    /// amount paid, remaining balance, payment status, and next payment
    /// date (advanced one calendar month). Both writes happen in one
    /// transaction; the enrollment row is locked before the totals are
    /// read so concurrent payments serialize.
    ///
    /// Does not promote the enrollment to Officially Enrolled; that is
    /// a separately authorized confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error if the enrollment is not found or not payable,
    /// the amount is not positive, the reference number collides, or
    /// the database fails.
    pub async fn record_payment(
        &self,
        enrollment_id: Uuid,
        input: RecordPaymentInput,
    ) -> Result<PaymentRecorded, PaymentError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        let enrollment = enrollments::Entity::find_by_id(enrollment_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?
            .ok_or(PaymentError::EnrollmentNotFound(enrollment_id))?;

        let status = db_enrollment_status_to_core(&enrollment.enrollment_status);
        let total_fee = match enrollment.total_fee {
            Some(total) if status.is_payable() => total,
            _ => return Err(PaymentError::NotVerified { status }),
        };

        let outcome = PaymentService::apply_payment(total_fee, enrollment.amount_paid, input.amount)?;

        let today = Utc::now().date_naive();
        let reference_number = input
            .reference_number
            .unwrap_or_else(|| generate_reference_number(today));

        let transaction_id = Uuid::new_v4();
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let transaction = payment_transactions::ActiveModel {
            id: Set(transaction_id),
            enrollment_id: Set(enrollment.id),
            student_id: Set(enrollment.student_id),
            amount_paid: Set(input.amount),
            payment_date: Set(now),
            payment_method: Set(input.payment_method),
            reference_number: Set(reference_number.clone()),
            payment_status: Set(core_payment_status_to_db(outcome.payment_status)),
            processed_by: Set(input.processed_by),
            created_at: Set(now),
        };

        transaction.insert(&txn).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                PaymentError::DuplicateReference(reference_number.clone())
            } else {
                PaymentError::Database(e.to_string())
            }
        })?;

        let next_payment_date = today.checked_add_months(Months::new(1));

        let mut active: enrollments::ActiveModel = enrollment.into();
        active.amount_paid = Set(outcome.amount_paid);
        active.remaining_balance = Set(Some(outcome.remaining_balance));
        active.payment_status = Set(core_payment_status_to_db(outcome.payment_status));
        active.next_payment_date = Set(next_payment_date);
        active.updated_at = Set(now);

        active
            .update(&txn)
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        Ok(PaymentRecorded {
            transaction_id,
            reference_number,
            payment_status: outcome.payment_status,
            remaining_balance: outcome.remaining_balance,
        })
    }

    /// Moves a verified enrollment to For Payment (a receipt awaits
    /// the cashier).
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::InvalidStatusChange` unless the current
    /// status is Verified.
    pub async fn submit_receipt(
        &self,
        enrollment_id: Uuid,
    ) -> Result<enrollments::Model, PaymentError> {
        self.transition_status(
            enrollment_id,
            EnrollmentStatus::ForPayment,
            |status, _| matches!(status, EnrollmentStatus::Verified),
        )
        .await
    }

    /// Confirms full payment, promoting the enrollment to Officially
    /// Enrolled.
    ///
    /// This is the separately authorized action layered on top of a
    /// Fully Paid payment status.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::NotFullyPaid` if the payment status is
    /// not Fully Paid, or `PaymentError::InvalidStatusChange` if the
    /// enrollment is not in a payable status.
    pub async fn mark_officially_enrolled(
        &self,
        enrollment_id: Uuid,
    ) -> Result<enrollments::Model, PaymentError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        let enrollment = enrollments::Entity::find_by_id(enrollment_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?
            .ok_or(PaymentError::EnrollmentNotFound(enrollment_id))?;

        let status = db_enrollment_status_to_core(&enrollment.enrollment_status);
        if !status.is_payable() {
            return Err(PaymentError::InvalidStatusChange {
                current: status,
                target: EnrollmentStatus::OfficiallyEnrolled,
            });
        }

        let payment_status = db_payment_status_to_core(&enrollment.payment_status);
        if payment_status != PaymentStatus::FullyPaid {
            return Err(PaymentError::NotFullyPaid { payment_status });
        }

        let mut active: enrollments::ActiveModel = enrollment.into();
        active.enrollment_status =
            Set(sea_orm_active_enums::EnrollmentStatus::OfficiallyEnrolled);
        active.updated_at = Set(Utc::now().into());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        Ok(updated)
    }

    /// Lists an enrollment's payment transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::EnrollmentNotFound` if the enrollment
    /// does not exist.
    pub async fn list_payments(
        &self,
        enrollment_id: Uuid,
    ) -> Result<Vec<payment_transactions::Model>, PaymentError> {
        // Existence check so an unknown id is a 404, not an empty list.
        self.get_enrollment(enrollment_id).await?;

        payment_transactions::Entity::find()
            .filter(payment_transactions::Column::EnrollmentId.eq(enrollment_id))
            .order_by_desc(payment_transactions::Column::PaymentDate)
            .all(&self.db)
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))
    }

    /// Shared guard-and-set for simple status transitions.
    async fn transition_status(
        &self,
        enrollment_id: Uuid,
        target: EnrollmentStatus,
        precondition: impl Fn(EnrollmentStatus, &enrollments::Model) -> bool,
    ) -> Result<enrollments::Model, PaymentError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        let enrollment = enrollments::Entity::find_by_id(enrollment_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?
            .ok_or(PaymentError::EnrollmentNotFound(enrollment_id))?;

        let current = db_enrollment_status_to_core(&enrollment.enrollment_status);
        if !precondition(current, &enrollment) {
            return Err(PaymentError::InvalidStatusChange { current, target });
        }

        let mut active: enrollments::ActiveModel = enrollment.into();
        active.enrollment_status = Set(core_enrollment_status_to_db(target));
        active.updated_at = Set(Utc::now().into());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        Ok(updated)
    }
}

// ============================================================================
// Conversion helpers
// ============================================================================

/// Converts the database enrollment status to the core status.
pub(crate) fn db_enrollment_status_to_core(
    status: &sea_orm_active_enums::EnrollmentStatus,
) -> EnrollmentStatus {
    match status {
        sea_orm_active_enums::EnrollmentStatus::Pending => EnrollmentStatus::Pending,
        sea_orm_active_enums::EnrollmentStatus::Verified => EnrollmentStatus::Verified,
        sea_orm_active_enums::EnrollmentStatus::ForPayment => EnrollmentStatus::ForPayment,
        sea_orm_active_enums::EnrollmentStatus::OfficiallyEnrolled => {
            EnrollmentStatus::OfficiallyEnrolled
        }
        sea_orm_active_enums::EnrollmentStatus::Rejected => EnrollmentStatus::Rejected,
    }
}

/// Converts the core enrollment status to the database status.
pub(crate) fn core_enrollment_status_to_db(
    status: EnrollmentStatus,
) -> sea_orm_active_enums::EnrollmentStatus {
    match status {
        EnrollmentStatus::Pending => sea_orm_active_enums::EnrollmentStatus::Pending,
        EnrollmentStatus::Verified => sea_orm_active_enums::EnrollmentStatus::Verified,
        EnrollmentStatus::ForPayment => sea_orm_active_enums::EnrollmentStatus::ForPayment,
        EnrollmentStatus::OfficiallyEnrolled => {
            sea_orm_active_enums::EnrollmentStatus::OfficiallyEnrolled
        }
        EnrollmentStatus::Rejected => sea_orm_active_enums::EnrollmentStatus::Rejected,
    }
}

/// Converts the database payment status to the core status.
pub(crate) fn db_payment_status_to_core(
    status: &sea_orm_active_enums::PaymentStatus,
) -> PaymentStatus {
    match status {
        sea_orm_active_enums::PaymentStatus::Unpaid => PaymentStatus::Unpaid,
        sea_orm_active_enums::PaymentStatus::Partial => PaymentStatus::Partial,
        sea_orm_active_enums::PaymentStatus::FullyPaid => PaymentStatus::FullyPaid,
    }
}

/// Converts the core payment status to the database status.
pub(crate) fn core_payment_status_to_db(
    status: PaymentStatus,
) -> sea_orm_active_enums::PaymentStatus {
    match status {
        PaymentStatus::Unpaid => sea_orm_active_enums::PaymentStatus::Unpaid,
        PaymentStatus::Partial => sea_orm_active_enums::PaymentStatus::Partial,
        PaymentStatus::FullyPaid => sea_orm_active_enums::PaymentStatus::FullyPaid,
    }
}
