//! Initial database migration.
//!
//! Creates the enums, core tables, and constraints for the grade
//! approval chain and the enrollment payment ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: GRADE APPROVAL
        // ============================================================
        db.execute_unprepared(GRADES_SQL).await?;

        // ============================================================
        // PART 3: ENROLLMENT & PAYMENT LEDGER
        // ============================================================
        db.execute_unprepared(TUITION_FEES_SQL).await?;
        db.execute_unprepared(ENROLLMENTS_SQL).await?;
        db.execute_unprepared(PAYMENT_TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 4: COURSE ASSIGNMENTS
        // ============================================================
        db.execute_unprepared(COURSE_ASSIGNMENTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Grade approval chain states
CREATE TYPE grade_approval_status AS ENUM (
    'pending',
    'registrar_approved',
    'dean_approved',
    'final'
);

-- Enrollment lifecycle states
CREATE TYPE enrollment_status AS ENUM (
    'Pending',
    'Verified',
    'For Payment',
    'Officially Enrolled',
    'Rejected'
);

-- Derived payment states
CREATE TYPE payment_status AS ENUM (
    'Unpaid',
    'Partial',
    'Fully Paid'
);
";

const GRADES_SQL: &str = r"
CREATE TABLE grades (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_id UUID NOT NULL,
    course_offering_id UUID NOT NULL,
    final_grade NUMERIC(5, 2),
    approval_status grade_approval_status NOT NULL DEFAULT 'pending',
    registrar_approved_by UUID,
    registrar_approved_at TIMESTAMPTZ,
    dean_approved_by UUID,
    dean_approved_at TIMESTAMPTZ,
    final_approved_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (student_id, course_offering_id)
);

CREATE INDEX idx_grades_course_offering ON grades (course_offering_id);
CREATE INDEX idx_grades_approval_status ON grades (approval_status);
";

const TUITION_FEES_SQL: &str = r"
CREATE TABLE tuition_fees (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    program_id UUID NOT NULL,
    year_level SMALLINT NOT NULL,
    semester VARCHAR(20) NOT NULL,
    academic_year VARCHAR(9) NOT NULL,
    -- Components are nullable; verification rejects an incomplete row
    tuition_amount NUMERIC(12, 2),
    misc_fees NUMERIC(12, 2),
    lab_fees NUMERIC(12, 2),
    other_fees NUMERIC(12, 2),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (program_id, year_level, semester, academic_year)
);
";

const ENROLLMENTS_SQL: &str = r"
CREATE TABLE enrollments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    student_id UUID NOT NULL,
    program_id UUID NOT NULL,
    year_level SMALLINT NOT NULL,
    semester VARCHAR(20) NOT NULL,
    academic_year VARCHAR(9) NOT NULL,
    enrollment_status enrollment_status NOT NULL DEFAULT 'Pending',
    total_fee NUMERIC(12, 2),
    amount_paid NUMERIC(12, 2) NOT NULL DEFAULT 0 CHECK (amount_paid >= 0),
    -- No lower bound: a negative remainder is the overpayment signal
    remaining_balance NUMERIC(12, 2),
    payment_status payment_status NOT NULL DEFAULT 'Unpaid',
    next_payment_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (student_id, academic_year)
);

CREATE INDEX idx_enrollments_student ON enrollments (student_id);
CREATE INDEX idx_enrollments_status ON enrollments (enrollment_status);
";

const PAYMENT_TRANSACTIONS_SQL: &str = r"
CREATE TABLE payment_transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    enrollment_id UUID NOT NULL REFERENCES enrollments (id),
    student_id UUID NOT NULL,
    amount_paid NUMERIC(12, 2) NOT NULL CHECK (amount_paid > 0),
    payment_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    payment_method VARCHAR(40) NOT NULL,
    reference_number VARCHAR(40) NOT NULL UNIQUE,
    payment_status payment_status NOT NULL,
    processed_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_payment_transactions_enrollment
    ON payment_transactions (enrollment_id);
";

const COURSE_ASSIGNMENTS_SQL: &str = r"
CREATE TABLE course_assignments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    staff_id UUID NOT NULL,
    course_offering_id UUID NOT NULL UNIQUE,
    section VARCHAR(40) NOT NULL,
    day VARCHAR(10) NOT NULL,
    start_time TIME NOT NULL,
    end_time TIME NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CHECK (start_time < end_time)
);

CREATE INDEX idx_course_assignments_staff_day
    ON course_assignments (staff_id, day);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS course_assignments;
DROP TABLE IF EXISTS payment_transactions;
DROP TABLE IF EXISTS enrollments;
DROP TABLE IF EXISTS tuition_fees;
DROP TABLE IF EXISTS grades;
DROP TYPE IF EXISTS payment_status;
DROP TYPE IF EXISTS enrollment_status;
DROP TYPE IF EXISTS grade_approval_status;
";
