//! Payment ledger logic for enrollment tuition reconciliation.
//!
//! An enrollment accumulates partial payments against a total fee
//! computed at verification time from the applicable fee schedule.
//! This module owns the pure ledger arithmetic; the repository layer
//! makes it durable inside one database transaction.
//!
//! # Modules
//!
//! - `types` - Payment domain types (EnrollmentStatus, PaymentStatus, FeeSchedule)
//! - `error` - Payment-specific error types
//! - `service` - Fee computation and payment application
//! - `reference` - Payment reference number generation

pub mod error;
pub mod reference;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::PaymentError;
pub use reference::generate_reference_number;
pub use service::PaymentService;
pub use types::{EnrollmentStatus, FeeSchedule, PaymentOutcome, PaymentStatus};
