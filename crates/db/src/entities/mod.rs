//! `SeaORM` entity definitions for the Registra schema.

pub mod course_assignments;
pub mod enrollments;
pub mod grades;
pub mod payment_transactions;
pub mod sea_orm_active_enums;
pub mod tuition_fees;
