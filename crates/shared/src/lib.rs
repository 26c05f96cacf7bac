//! Shared types, errors, and configuration for Registra.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token validation
//! - Staff role type used for capability checks

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

pub use auth::{Claims, StaffRole};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
