use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPER_ADMIN: &str = "super_admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_FINANCIAL: &str = "financial";
pub const ROLE_ACADEMIC_COORDINATOR: &str = "academic_coordinator";
pub const ROLE_STATE_ADMIN: &str = "state_admin";
pub const ROLE_CENTER_ADMIN: &str = "center_admin";
pub const ROLE_TEACHER: &str = "teacher";
pub const ROLE_CARD_ADMIN: &str = "card_admin";

/// Role carried in the `role` claim of a session credential.
///
/// Parsing is exact and case-sensitive. Anything outside the closed set is
/// kept verbatim in [`Role::Unknown`] so the router can fail closed on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    SuperAdmin,
    Manager,
    Financial,
    AcademicCoordinator,
    StateAdmin,
    CenterAdmin,
    Teacher,
    CardAdmin,
    Unknown(String),
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Admin,
        Role::SuperAdmin,
        Role::Manager,
        Role::Financial,
        Role::AcademicCoordinator,
        Role::StateAdmin,
        Role::CenterAdmin,
        Role::Teacher,
        Role::CardAdmin,
    ];

    pub fn from_claim(value: &str) -> Self {
        match value {
            ROLE_ADMIN => Role::Admin,
            ROLE_SUPER_ADMIN => Role::SuperAdmin,
            ROLE_MANAGER => Role::Manager,
            ROLE_FINANCIAL => Role::Financial,
            ROLE_ACADEMIC_COORDINATOR => Role::AcademicCoordinator,
            ROLE_STATE_ADMIN => Role::StateAdmin,
            ROLE_CENTER_ADMIN => Role::CenterAdmin,
            ROLE_TEACHER => Role::Teacher,
            ROLE_CARD_ADMIN => Role::CardAdmin,
            other => Role::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::SuperAdmin => ROLE_SUPER_ADMIN,
            Role::Manager => ROLE_MANAGER,
            Role::Financial => ROLE_FINANCIAL,
            Role::AcademicCoordinator => ROLE_ACADEMIC_COORDINATOR,
            Role::StateAdmin => ROLE_STATE_ADMIN,
            Role::CenterAdmin => ROLE_CENTER_ADMIN,
            Role::Teacher => ROLE_TEACHER,
            Role::CardAdmin => ROLE_CARD_ADMIN,
            Role::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Role::Unknown(_))
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::from_claim(s))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::from_claim(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_round_trip_through_claim_strings() {
        for role in Role::ALL {
            assert_eq!(Role::from_claim(role.as_str()), role);
            assert!(role.is_known());
        }
    }

    #[test]
    fn parsing_is_case_sensitive() {
        let role = Role::from_claim("Teacher");
        assert_eq!(role, Role::Unknown("Teacher".into()));
        assert_eq!(role.as_str(), "Teacher");
        assert!(!role.is_known());
    }

    #[test]
    fn serde_uses_claim_strings() {
        let json = serde_json::to_string(&Role::CenterAdmin).expect("serialize");
        assert_eq!(json, "\"center_admin\"");
        let back: Role = serde_json::from_str("\"librarian\"").expect("deserialize");
        assert_eq!(back, Role::Unknown("librarian".into()));
    }
}
