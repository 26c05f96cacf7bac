//! Database seeder for Registra development and testing.
//!
//! Seeds a fee schedule, a pending enrollment, and a class of pending
//! grades for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::str::FromStr;
use uuid::Uuid;

use registra_db::entities::{
    enrollments, grades,
    sea_orm_active_enums::{EnrollmentStatus, GradeApprovalStatus, PaymentStatus},
    tuition_fees,
};

/// Test program ID (consistent for all seeds)
const TEST_PROGRAM_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Test student ID (consistent for all seeds)
const TEST_STUDENT_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Test enrollment ID (consistent for all seeds)
const TEST_ENROLLMENT_ID: &str = "00000000-0000-0000-0000-000000000003";
/// Test course offering ID (consistent for all seeds)
const TEST_OFFERING_ID: &str = "00000000-0000-0000-0000-000000000004";

const ACADEMIC_YEAR: &str = "2026-2027";
const SEMESTER: &str = "1st";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = registra_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding fee schedule...");
    seed_fee_schedule(&db).await;

    println!("Seeding enrollment...");
    seed_enrollment(&db).await;

    println!("Seeding grades...");
    seed_grades(&db).await;

    println!("Seeding complete!");
}

fn test_program_id() -> Uuid {
    Uuid::parse_str(TEST_PROGRAM_ID).unwrap()
}

fn test_student_id() -> Uuid {
    Uuid::parse_str(TEST_STUDENT_ID).unwrap()
}

fn test_enrollment_id() -> Uuid {
    Uuid::parse_str(TEST_ENROLLMENT_ID).unwrap()
}

fn test_offering_id() -> Uuid {
    Uuid::parse_str(TEST_OFFERING_ID).unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Seeds the fee schedule row used by enrollment verification.
async fn seed_fee_schedule(db: &DatabaseConnection) {
    let already_seeded = tuition_fees::Entity::find()
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some();
    if already_seeded {
        println!("  Fee schedule already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let fee = tuition_fees::ActiveModel {
        id: Set(Uuid::new_v4()),
        program_id: Set(test_program_id()),
        year_level: Set(2),
        semester: Set(SEMESTER.to_string()),
        academic_year: Set(ACADEMIC_YEAR.to_string()),
        tuition_amount: Set(Some(dec("25000.00"))),
        misc_fees: Set(Some(dec("3500.00"))),
        lab_fees: Set(Some(dec("2000.00"))),
        other_fees: Set(Some(dec("500.00"))),
        created_at: Set(now),
        updated_at: Set(now),
    };

    fee.insert(db).await.expect("Failed to seed fee schedule");
}

/// Seeds a pending enrollment awaiting verification.
async fn seed_enrollment(db: &DatabaseConnection) {
    if enrollments::Entity::find_by_id(test_enrollment_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Enrollment already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let enrollment = enrollments::ActiveModel {
        id: Set(test_enrollment_id()),
        student_id: Set(test_student_id()),
        program_id: Set(test_program_id()),
        year_level: Set(2),
        semester: Set(SEMESTER.to_string()),
        academic_year: Set(ACADEMIC_YEAR.to_string()),
        enrollment_status: Set(EnrollmentStatus::Pending),
        total_fee: Set(None),
        amount_paid: Set(Decimal::ZERO),
        remaining_balance: Set(None),
        payment_status: Set(PaymentStatus::Unpaid),
        next_payment_date: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    enrollment
        .insert(db)
        .await
        .expect("Failed to seed enrollment");
}

/// Seeds a class of pending grades for the test course offering.
async fn seed_grades(db: &DatabaseConnection) {
    let already_seeded = grades::Entity::find()
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some();
    if already_seeded {
        println!("  Grades already exist, skipping...");
        return;
    }

    let now = Utc::now().into();
    let final_grades = ["1.25", "1.75", "2.50"];

    for final_grade in final_grades {
        let grade = grades::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(Uuid::new_v4()),
            course_offering_id: Set(test_offering_id()),
            final_grade: Set(Some(dec(final_grade))),
            approval_status: Set(GradeApprovalStatus::Pending),
            registrar_approved_by: Set(None),
            registrar_approved_at: Set(None),
            dean_approved_by: Set(None),
            dean_approved_at: Set(None),
            final_approved_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        grade.insert(db).await.expect("Failed to seed grade");
    }
}
