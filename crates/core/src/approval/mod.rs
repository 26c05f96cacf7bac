//! Grade approval chain for Registra.
//!
//! A grade record passes through an ordered chain of role sign-offs
//! before becoming final. This module implements the state machine,
//! the per-action role capability check, and the transition audit data.
//!
//! # Modules
//!
//! - `types` - Approval domain types (GradeStatus, ApprovalAction, ApprovalTransition)
//! - `error` - Approval-specific error types
//! - `service` - State transition and authorization logic

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::ApprovalError;
pub use service::ApprovalService;
pub use types::{ApprovalAction, ApprovalTransition, GradeStatus};
