//! Administrator account types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Permission level of a back-office administrator.
///
/// Wire/storage format: lower-case string. Every account provisioned through
/// the login flow is an `Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    #[default]
    Admin,
}

impl AdminRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
        }
    }
}

impl FromStr for AdminRole {
    type Err = UnknownAdminRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            other => Err(UnknownAdminRole(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown admin role: {0}")]
pub struct UnknownAdminRole(pub String);
