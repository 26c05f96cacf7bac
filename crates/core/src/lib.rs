//! Core business logic for Registra.
//!
//! Pure domain logic with no web or database dependencies:
//!
//! - `approval` - Grade approval chain state machine
//! - `payment` - Enrollment payment ledger and fee computation
//! - `schedule` - Instructor schedule conflict detection

pub mod approval;
pub mod payment;
pub mod schedule;
