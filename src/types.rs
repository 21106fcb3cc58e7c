use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use unicase::UniCase;

use crate::error::DeskError;

/// Lifecycle status of a ticket as reported by the backend.
///
/// Only the exact upper-case constants are recognized. Anything else is kept
/// verbatim in `Unknown` so it can be displayed instead of rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    New,
    Open,
    Closed,
    Unknown(String),
}

impl TicketStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "NEW" => TicketStatus::New,
            "OPEN" => TicketStatus::Open,
            "CLOSED" => TicketStatus::Closed,
            other => TicketStatus::Unknown(other.to_string()),
        }
    }

    /// The status text as it appears on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::New => "NEW",
            TicketStatus::Open => "OPEN",
            TicketStatus::Closed => "CLOSED",
            TicketStatus::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TicketStatus::Unknown(_))
    }
}

impl Default for TicketStatus {
    fn default() -> Self {
        TicketStatus::Unknown(String::new())
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketStatus::Unknown(raw) if raw.trim().is_empty() => write!(f, "UNKNOWN"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl Serialize for TicketStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TicketStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TicketStatus::parse(&raw))
    }
}

pub const VALID_STATUSES: &[&str] = &["NEW", "OPEN", "CLOSED"];

/// Ticket priority. Source endpoints disagree on casing, so parsing ignores case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
    Unknown(String),
}

const PRIORITY_NAMES: &[(&str, Priority)] = &[
    ("CRITICAL", Priority::Critical),
    ("HIGH", Priority::High),
    ("MEDIUM", Priority::Medium),
    ("LOW", Priority::Low),
];

impl Priority {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        PRIORITY_NAMES
            .iter()
            .find(|(name, _)| UniCase::new(*name) == UniCase::new(trimmed))
            .map(|(_, priority)| priority.clone())
            .unwrap_or_else(|| Priority::Unknown(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Priority::Critical => "CRITICAL",
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
            Priority::Unknown(raw) => raw,
        }
    }

    /// Sort rank, most urgent first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
            Priority::Unknown(_) => 4,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Unknown(String::new())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Unknown(raw) if raw.trim().is_empty() => write!(f, "NONE"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Dashboard role, decided by the backend at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Agent,
}

impl Role {
    /// Map the role string returned by the authenticate endpoint.
    ///
    /// Anything other than ADMIN is treated as an agent session.
    pub fn from_login(raw: &str) -> Self {
        if UniCase::new(raw.trim()) == UniCase::new("ADMIN") {
            Role::Admin
        } else {
            Role::Agent
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Agent => write!(f, "agent"),
        }
    }
}

impl FromStr for Role {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = UniCase::new(s.trim());
        if key == UniCase::new("admin") {
            Ok(Role::Admin)
        } else if key == UniCase::new("agent") {
            Ok(Role::Agent)
        } else {
            Err(DeskError::InvalidRole(s.to_string()))
        }
    }
}
