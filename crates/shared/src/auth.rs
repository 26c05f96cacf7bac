//! Authentication types for JWT bearer tokens and staff roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Staff role carried in the JWT and checked per operation.
///
/// Authorization is an explicit capability check on the caller's role,
/// never an assumption about which client called which endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Accepts counter payments.
    Cashier,
    /// Verifies enrollments and signs off grades first.
    Registrar,
    /// Second approval gate in the grade chain.
    Dean,
    /// Manages course offerings and schedules.
    ProgramHead,
    /// Final authority; can perform any action.
    Admin,
}

impl StaffRole {
    /// Parse a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cashier" => Some(Self::Cashier),
            "registrar" => Some(Self::Registrar),
            "dean" => Some(Self::Dean),
            "program_head" => Some(Self::ProgramHead),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cashier => "cashier",
            Self::Registrar => "registrar",
            Self::Dean => "dean",
            Self::ProgramHead => "program_head",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (staff ID).
    pub sub: Uuid,
    /// Staff member's role.
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a staff member.
    #[must_use]
    pub fn new(staff_id: Uuid, role: StaffRole, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: staff_id,
            role: role.as_str().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the staff ID from claims.
    #[must_use]
    pub const fn staff_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the typed role, if the stored string is a known role.
    #[must_use]
    pub fn staff_role(&self) -> Option<StaffRole> {
        StaffRole::parse(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_roundtrip() {
        for role in [
            StaffRole::Cashier,
            StaffRole::Registrar,
            StaffRole::Dean,
            StaffRole::ProgramHead,
            StaffRole::Admin,
        ] {
            assert_eq!(StaffRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(StaffRole::parse("REGISTRAR"), Some(StaffRole::Registrar));
        assert_eq!(StaffRole::parse("student"), None);
    }

    #[test]
    fn test_claims_role() {
        let claims = Claims::new(
            Uuid::new_v4(),
            StaffRole::Dean,
            Utc::now() + chrono::Duration::minutes(15),
        );
        assert_eq!(claims.staff_role(), Some(StaffRole::Dean));
        assert_eq!(claims.role, "dean");
    }
}
