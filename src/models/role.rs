//! Agent role classification.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a role name is not in the closed role set.
#[derive(Debug, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Coarse agent category used as a recommendation filter.
///
/// The set is closed: every agent in the role table belongs to exactly
/// one of these four categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Duelist,
    Controller,
    Initiator,
    Sentinel,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Duelist => "duelist",
            Role::Controller => "controller",
            Role::Initiator => "initiator",
            Role::Sentinel => "sentinel",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Stat sites label roles in either singular or plural form.
        match s.trim().to_lowercase().as_str() {
            "duelist" | "duelists" => Ok(Role::Duelist),
            "controller" | "controllers" => Ok(Role::Controller),
            "initiator" | "initiators" => Ok(Role::Initiator),
            "sentinel" | "sentinels" => Ok(Role::Sentinel),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
