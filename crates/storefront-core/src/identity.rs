//! Identity model handed to the data layer by the auth collaborator.
//!
//! Authentication mechanics live outside this workspace; services only
//! see a resolved user id plus a role. Role promotion to `developer`
//! happens through the moderation workflow, never by self-service.

use serde::{Deserialize, Serialize};

/// Role of an authenticated user, as stored in `profiles.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Developer,
    Admin,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Developer => "developer",
            Self::Admin => "admin",
        }
    }

    /// Parse a stored role string. Unknown values map to `User`.
    pub fn parse(s: &str) -> Self {
        match s {
            "developer" => Self::Developer,
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved caller identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

impl Identity {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::User,
        }
    }

    pub fn developer(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Developer,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role: Role::Admin,
        }
    }

    pub const fn is_moderator(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}
